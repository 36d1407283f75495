use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, Utc};
use deadpool_postgres::{Config, ManagerConfig, Pool, PoolConfig, RecyclingMethod, Runtime};
use tokio_postgres::{NoTls, Row};
use uuid::Uuid;

use super::backend::{DatabaseBackend, SqlDialect};
use crate::types::{DocumentRecord, FieldValues, LegalTerm, NewDocument, NewLegalTerm, User};

const SCHEMA: &str = r#"
DO $$ BEGIN
    CREATE TYPE document_type AS ENUM
        ('arrendamiento', 'servicios', 'confidencialidad', 'denuncia', 'compraventa');
EXCEPTION
    WHEN duplicate_object THEN NULL;
END $$;

CREATE TABLE IF NOT EXISTS users (
    id UUID PRIMARY KEY,
    email VARCHAR(320) NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE TABLE IF NOT EXISTS sessions (
    token_hash VARCHAR(64) PRIMARY KEY,
    user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    expires_at TIMESTAMPTZ NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_sessions_user ON sessions(user_id);

CREATE TABLE IF NOT EXISTS documents (
    id UUID PRIMARY KEY,
    user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    document_type document_type NOT NULL,
    title TEXT NOT NULL,
    fields_data JSONB NOT NULL DEFAULT '{}'::jsonb,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    file_url TEXT
);
CREATE INDEX IF NOT EXISTS idx_documents_owner ON documents(user_id, created_at DESC);

CREATE OR REPLACE FUNCTION documents_owner_immutable() RETURNS TRIGGER AS $$
BEGIN
    IF NEW.user_id <> OLD.user_id OR NEW.document_type <> OLD.document_type THEN
        RAISE EXCEPTION 'document owner and type cannot change';
    END IF;
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

DROP TRIGGER IF EXISTS documents_owner_immutable ON documents;
CREATE TRIGGER documents_owner_immutable BEFORE UPDATE ON documents
    FOR EACH ROW EXECUTE FUNCTION documents_owner_immutable();

CREATE TABLE IF NOT EXISTS legal_terms (
    id UUID PRIMARY KEY,
    term TEXT NOT NULL UNIQUE,
    definition TEXT NOT NULL,
    category TEXT NOT NULL
);
"#;

const DOCUMENT_COLUMNS: &str =
  "id, user_id, document_type, title, fields_data, created_at, file_url";

pub struct PostgresBackend {
  pool: Pool,
}

impl PostgresBackend {
  pub fn new(url: &str, max_connections: usize) -> Result<Self, anyhow::Error> {
    let mut cfg = Config::new();
    cfg.url = Some(url.into());
    cfg.manager = Some(ManagerConfig {
      recycling_method: RecyclingMethod::Fast,
    });
    cfg.pool = Some(PoolConfig::new(max_connections.max(1)));
    let pool = cfg.create_pool(Some(Runtime::Tokio1), NoTls)?;
    Ok(Self { pool })
  }
}

fn row_to_document(row: &Row) -> Result<DocumentRecord, anyhow::Error> {
  let fields: serde_json::Value = row.try_get(4)?;
  let fields_data: FieldValues = serde_json::from_value(fields)?;
  Ok(DocumentRecord {
    id: row.try_get(0)?,
    user_id: row.try_get(1)?,
    document_type: row.try_get(2)?,
    title: row.try_get(3)?,
    fields_data,
    created_at: row.try_get(5)?,
    file_url: row.try_get(6)?,
  })
}

fn row_to_term(row: &Row) -> Result<LegalTerm, anyhow::Error> {
  Ok(LegalTerm {
    id: row.try_get(0)?,
    term: row.try_get(1)?,
    definition: row.try_get(2)?,
    category: row.try_get(3)?,
  })
}

fn row_to_user(row: &Row) -> Result<User, anyhow::Error> {
  Ok(User {
    id: row.try_get(0)?,
    email: row.try_get(1)?,
    created_at: row.try_get(2)?,
  })
}

#[async_trait]
impl DatabaseBackend for PostgresBackend {
  fn dialect(&self) -> SqlDialect {
    SqlDialect::Postgres
  }

  async fn init_schema(&self) -> Result<(), anyhow::Error> {
    self.pool.get().await?.batch_execute(SCHEMA).await?;
    tracing::info!("PostgreSQL schema initialized");
    Ok(())
  }

  async fn drop_schema(&self) -> Result<(), anyhow::Error> {
    self
      .pool
      .get()
      .await?
      .batch_execute(
        "DROP TABLE IF EXISTS documents;
       DROP FUNCTION IF EXISTS documents_owner_immutable();
       DROP TABLE IF EXISTS sessions;
       DROP TABLE IF EXISTS legal_terms;
       DROP TABLE IF EXISTS users;
       DROP TYPE IF EXISTS document_type;",
      )
      .await?;
    Ok(())
  }

  async fn ping(&self) -> Result<(), anyhow::Error> {
    self.pool.get().await?.query_one("SELECT 1", &[]).await?;
    Ok(())
  }

  async fn insert_document(&self, doc: NewDocument) -> Result<DocumentRecord, anyhow::Error> {
    let id = Uuid::new_v4();
    let created_at = Utc::now().trunc_subsecs(6);
    let fields = serde_json::to_value(&doc.fields_data)?;

    self
      .pool
      .get()
      .await?
      .execute(
        "INSERT INTO documents (id, user_id, document_type, title, fields_data, created_at)
         VALUES ($1, $2, $3, $4, $5, $6)",
        &[
          &id,
          &doc.user_id,
          &doc.document_type,
          &doc.title,
          &fields,
          &created_at,
        ],
      )
      .await?;

    Ok(DocumentRecord {
      id,
      user_id: doc.user_id,
      document_type: doc.document_type,
      title: doc.title,
      fields_data: doc.fields_data,
      created_at,
      file_url: None,
    })
  }

  async fn get_document(
    &self,
    user_id: Uuid,
    id: Uuid,
  ) -> Result<Option<DocumentRecord>, anyhow::Error> {
    let sql = format!("SELECT {DOCUMENT_COLUMNS} FROM documents WHERE id = $1 AND user_id = $2");
    let row = self
      .pool
      .get()
      .await?
      .query_opt(&sql, &[&id, &user_id])
      .await?;
    row.as_ref().map(row_to_document).transpose()
  }

  async fn list_documents(&self, user_id: Uuid) -> Result<Vec<DocumentRecord>, anyhow::Error> {
    let sql = format!(
      "SELECT {DOCUMENT_COLUMNS} FROM documents WHERE user_id = $1 ORDER BY created_at DESC"
    );
    let rows = self.pool.get().await?.query(&sql, &[&user_id]).await?;
    rows.iter().map(row_to_document).collect()
  }

  async fn delete_document(&self, user_id: Uuid, id: Uuid) -> Result<bool, anyhow::Error> {
    let deleted = self
      .pool
      .get()
      .await?
      .execute(
        "DELETE FROM documents WHERE id = $1 AND user_id = $2",
        &[&id, &user_id],
      )
      .await?;
    Ok(deleted > 0)
  }

  async fn upsert_legal_term(&self, term: &NewLegalTerm) -> Result<LegalTerm, anyhow::Error> {
    let row = self
      .pool
      .get()
      .await?
      .query_one(
        "INSERT INTO legal_terms (id, term, definition, category) VALUES ($1, $2, $3, $4)
         ON CONFLICT (term) DO UPDATE SET
           definition = EXCLUDED.definition,
           category = EXCLUDED.category
         RETURNING id, term, definition, category",
        &[&Uuid::new_v4(), &term.term, &term.definition, &term.category],
      )
      .await?;
    row_to_term(&row)
  }

  async fn list_legal_terms(&self) -> Result<Vec<LegalTerm>, anyhow::Error> {
    let rows = self
      .pool
      .get()
      .await?
      .query(
        "SELECT id, term, definition, category FROM legal_terms ORDER BY lower(term) ASC, term ASC",
        &[],
      )
      .await?;
    rows.iter().map(row_to_term).collect()
  }

  async fn count_legal_terms(&self) -> Result<usize, anyhow::Error> {
    let row = self
      .pool
      .get()
      .await?
      .query_one("SELECT COUNT(*) FROM legal_terms", &[])
      .await?;
    let count: i64 = row.try_get(0)?;
    Ok(count.max(0) as usize)
  }

  async fn create_user(&self, email: &str, password_hash: &str) -> Result<User, anyhow::Error> {
    let id = Uuid::new_v4();
    let created_at = Utc::now().trunc_subsecs(6);
    self
      .pool
      .get()
      .await?
      .execute(
        "INSERT INTO users (id, email, password_hash, created_at) VALUES ($1, $2, $3, $4)",
        &[&id, &email, &password_hash, &created_at],
      )
      .await?;
    Ok(User {
      id,
      email: email.to_string(),
      created_at,
    })
  }

  async fn get_user_by_email(&self, email: &str) -> Result<Option<(User, String)>, anyhow::Error> {
    let row = self
      .pool
      .get()
      .await?
      .query_opt(
        "SELECT id, email, created_at, password_hash FROM users WHERE email = $1",
        &[&email],
      )
      .await?;
    match row {
      Some(r) => Ok(Some((row_to_user(&r)?, r.try_get(3)?))),
      None => Ok(None),
    }
  }

  async fn list_users(&self) -> Result<Vec<User>, anyhow::Error> {
    let rows = self
      .pool
      .get()
      .await?
      .query("SELECT id, email, created_at FROM users ORDER BY email", &[])
      .await?;
    rows.iter().map(row_to_user).collect()
  }

  async fn create_session(
    &self,
    user_id: Uuid,
    token_hash: &str,
    expires_at: DateTime<Utc>,
  ) -> Result<(), anyhow::Error> {
    self
      .pool
      .get()
      .await?
      .execute(
        "INSERT INTO sessions (token_hash, user_id, expires_at) VALUES ($1, $2, $3)",
        &[&token_hash, &user_id, &expires_at],
      )
      .await?;
    Ok(())
  }

  async fn resolve_session(&self, token_hash: &str) -> Result<Option<User>, anyhow::Error> {
    let row = self
      .pool
      .get()
      .await?
      .query_opt(
        "SELECT u.id, u.email, u.created_at
         FROM sessions s JOIN users u ON u.id = s.user_id
         WHERE s.token_hash = $1 AND s.expires_at > NOW()",
        &[&token_hash],
      )
      .await?;
    row.as_ref().map(row_to_user).transpose()
  }

  async fn delete_session(&self, token_hash: &str) -> Result<bool, anyhow::Error> {
    let deleted = self
      .pool
      .get()
      .await?
      .execute("DELETE FROM sessions WHERE token_hash = $1", &[&token_hash])
      .await?;
    Ok(deleted > 0)
  }
}
