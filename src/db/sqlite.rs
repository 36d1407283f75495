use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use rusqlite::{params, OptionalExtension};
use tokio_rusqlite::Connection;
use uuid::Uuid;

use super::backend::{DatabaseBackend, SqlDialect};
use crate::types::{DocumentRecord, FieldValues, LegalTerm, NewDocument, NewLegalTerm, User};

const PRAGMAS: &str = r#"
PRAGMA journal_mode = WAL;
PRAGMA synchronous = NORMAL;
PRAGMA foreign_keys = ON;
PRAGMA temp_store = MEMORY;
"#;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    created_at TEXT NOT NULL
) WITHOUT ROWID;

CREATE TABLE IF NOT EXISTS sessions (
    token_hash TEXT PRIMARY KEY,
    user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    created_at TEXT NOT NULL,
    expires_at TEXT NOT NULL
) WITHOUT ROWID;
CREATE INDEX IF NOT EXISTS idx_sessions_user ON sessions(user_id);

CREATE TABLE IF NOT EXISTS documents (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    document_type TEXT NOT NULL CHECK (document_type IN
        ('arrendamiento', 'servicios', 'confidencialidad', 'denuncia', 'compraventa')),
    title TEXT NOT NULL,
    fields_data TEXT NOT NULL,
    created_at TEXT NOT NULL,
    file_url TEXT
);
CREATE INDEX IF NOT EXISTS idx_documents_owner ON documents(user_id, created_at);

CREATE TRIGGER IF NOT EXISTS documents_owner_immutable
BEFORE UPDATE OF user_id, document_type ON documents
BEGIN
    SELECT RAISE(ABORT, 'document owner and type cannot change');
END;

CREATE TABLE IF NOT EXISTS legal_terms (
    id TEXT PRIMARY KEY,
    term TEXT NOT NULL UNIQUE,
    definition TEXT NOT NULL,
    category TEXT NOT NULL
) WITHOUT ROWID;
"#;

const DOCUMENT_COLUMNS: &str =
  "id, user_id, document_type, title, fields_data, created_at, file_url";

/// Timestamps are stored as fixed-width RFC 3339 text so that string order is
/// time order.
fn fmt_ts(ts: DateTime<Utc>) -> String {
  ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_ts(raw: &str) -> Result<DateTime<Utc>, anyhow::Error> {
  Ok(DateTime::parse_from_rfc3339(raw)?.with_timezone(&Utc))
}

pub struct SqliteBackend {
  conn: Connection,
}

impl SqliteBackend {
  pub async fn new(path: &str) -> Result<Self, anyhow::Error> {
    let conn = if path == ":memory:" {
      Connection::open_in_memory().await?
    } else {
      Connection::open(path).await?
    };

    conn
      .call(|conn| conn.execute_batch(PRAGMAS).map_err(|e| e.into()))
      .await?;

    Ok(Self { conn })
  }

  pub async fn in_memory() -> Result<Self, anyhow::Error> {
    Self::new(":memory:").await
  }
}

#[async_trait]
impl DatabaseBackend for SqliteBackend {
  fn dialect(&self) -> SqlDialect {
    SqlDialect::Sqlite
  }

  async fn init_schema(&self) -> Result<(), anyhow::Error> {
    self
      .conn
      .call(|conn| conn.execute_batch(SCHEMA).map_err(|e| e.into()))
      .await?;
    tracing::info!("SQLite schema initialized");
    Ok(())
  }

  async fn drop_schema(&self) -> Result<(), anyhow::Error> {
    self
      .conn
      .call(|conn| {
        conn
          .execute_batch(
            "DROP TRIGGER IF EXISTS documents_owner_immutable;
         DROP TABLE IF EXISTS documents;
         DROP TABLE IF EXISTS sessions;
         DROP TABLE IF EXISTS legal_terms;
         DROP TABLE IF EXISTS users;",
          )
          .map_err(|e| e.into())
      })
      .await?;
    Ok(())
  }

  async fn ping(&self) -> Result<(), anyhow::Error> {
    self
      .conn
      .call(|conn| {
        conn
          .query_row("SELECT 1", [], |_| Ok(()))
          .map_err(|e| e.into())
      })
      .await?;
    Ok(())
  }

  async fn insert_document(&self, doc: NewDocument) -> Result<DocumentRecord, anyhow::Error> {
    let id = Uuid::new_v4();
    let created_at = Utc::now().trunc_subsecs(6);
    let fields_json = serde_json::to_string(&doc.fields_data)?;

    let id_str = id.to_string();
    let user_str = doc.user_id.to_string();
    let type_str = doc.document_type.as_str();
    let title = doc.title.clone();
    let created_str = fmt_ts(created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO documents (id, user_id, document_type, title, fields_data, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          params![id_str, user_str, type_str, title, fields_json, created_str],
        )?;
        Ok(())
      })
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
    let sql = format!("SELECT {DOCUMENT_COLUMNS} FROM documents WHERE id = ?1 AND user_id = ?2");
    let (id_str, user_str) = (id.to_string(), user_id.to_string());

    let row = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare_cached(&sql)?;
        let row = stmt
          .query_row(params![id_str, user_str], DocumentRow::from_row)
          .optional()?;
        Ok(row)
      })
      .await?;

    row.map(DocumentRow::into_record).transpose()
  }

  async fn list_documents(&self, user_id: Uuid) -> Result<Vec<DocumentRecord>, anyhow::Error> {
    let sql = format!(
      "SELECT {DOCUMENT_COLUMNS} FROM documents WHERE user_id = ?1
       ORDER BY created_at DESC, rowid DESC"
    );
    let user_str = user_id.to_string();

    let rows = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare_cached(&sql)?;
        let rows = stmt
          .query_map(params![user_str], DocumentRow::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    rows.into_iter().map(DocumentRow::into_record).collect()
  }

  async fn delete_document(&self, user_id: Uuid, id: Uuid) -> Result<bool, anyhow::Error> {
    let (id_str, user_str) = (id.to_string(), user_id.to_string());
    let deleted = self
      .conn
      .call(move |conn| {
        conn
          .execute(
            "DELETE FROM documents WHERE id = ?1 AND user_id = ?2",
            params![id_str, user_str],
          )
          .map_err(|e| e.into())
      })
      .await?;
    Ok(deleted > 0)
  }

  async fn upsert_legal_term(&self, term: &NewLegalTerm) -> Result<LegalTerm, anyhow::Error> {
    let new_id = Uuid::new_v4().to_string();
    let term = term.clone();

    let row = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO legal_terms (id, term, definition, category) VALUES (?1, ?2, ?3, ?4)
           ON CONFLICT(term) DO UPDATE SET
             definition = excluded.definition,
             category = excluded.category",
          params![new_id, term.term, term.definition, term.category],
        )?;
        let row = conn.query_row(
          "SELECT id, term, definition, category FROM legal_terms WHERE term = ?1",
          params![term.term],
          TermRow::from_row,
        )?;
        Ok(row)
      })
      .await?;

    row.into_term()
  }

  async fn list_legal_terms(&self) -> Result<Vec<LegalTerm>, anyhow::Error> {
    let rows = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare_cached(
          "SELECT id, term, definition, category FROM legal_terms ORDER BY term COLLATE NOCASE ASC",
        )?;
        let rows = stmt
          .query_map([], TermRow::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    rows.into_iter().map(TermRow::into_term).collect()
  }

  async fn count_legal_terms(&self) -> Result<usize, anyhow::Error> {
    let count: i64 = self
      .conn
      .call(|conn| {
        conn
          .query_row("SELECT COUNT(*) FROM legal_terms", [], |row| row.get(0))
          .map_err(|e| e.into())
      })
      .await?;
    Ok(count.max(0) as usize)
  }

  async fn create_user(&self, email: &str, password_hash: &str) -> Result<User, anyhow::Error> {
    let id = Uuid::new_v4();
    let created_at = Utc::now().trunc_subsecs(6);
    let id_str = id.to_string();
    let email_owned = email.to_string();
    let hash_owned = password_hash.to_string();
    let created_str = fmt_ts(created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO users (id, email, password_hash, created_at) VALUES (?1, ?2, ?3, ?4)",
          params![id_str, email_owned, hash_owned, created_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(User {
      id,
      email: email.to_string(),
      created_at,
    })
  }

  async fn get_user_by_email(&self, email: &str) -> Result<Option<(User, String)>, anyhow::Error> {
    let email_owned = email.to_string();
    let row = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare_cached(
          "SELECT id, email, created_at, password_hash FROM users WHERE email = ?1",
        )?;
        let row = stmt
          .query_row(params![email_owned], |row| {
            Ok((UserRow::from_row(row)?, row.get::<_, String>(3)?))
          })
          .optional()?;
        Ok(row)
      })
      .await?;

    match row {
      Some((user, hash)) => Ok(Some((user.into_user()?, hash))),
      None => Ok(None),
    }
  }

  async fn list_users(&self) -> Result<Vec<User>, anyhow::Error> {
    let rows = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare_cached("SELECT id, email, created_at FROM users ORDER BY email")?;
        let rows = stmt
          .query_map([], UserRow::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    rows.into_iter().map(UserRow::into_user).collect()
  }

  async fn create_session(
    &self,
    user_id: Uuid,
    token_hash: &str,
    expires_at: DateTime<Utc>,
  ) -> Result<(), anyhow::Error> {
    let user_str = user_id.to_string();
    let hash_owned = token_hash.to_string();
    let now_str = fmt_ts(Utc::now());
    let expires_str = fmt_ts(expires_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO sessions (token_hash, user_id, created_at, expires_at) VALUES (?1, ?2, ?3, ?4)",
          params![hash_owned, user_str, now_str, expires_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn resolve_session(&self, token_hash: &str) -> Result<Option<User>, anyhow::Error> {
    let hash_owned = token_hash.to_string();
    let now_str = fmt_ts(Utc::now());

    let row = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare_cached(
          "SELECT u.id, u.email, u.created_at
           FROM sessions s JOIN users u ON u.id = s.user_id
           WHERE s.token_hash = ?1 AND s.expires_at > ?2",
        )?;
        let row = stmt
          .query_row(params![hash_owned, now_str], UserRow::from_row)
          .optional()?;
        Ok(row)
      })
      .await?;

    row.map(UserRow::into_user).transpose()
  }

  async fn delete_session(&self, token_hash: &str) -> Result<bool, anyhow::Error> {
    let hash_owned = token_hash.to_string();
    let deleted = self
      .conn
      .call(move |conn| {
        conn
          .execute(
            "DELETE FROM sessions WHERE token_hash = ?1",
            params![hash_owned],
          )
          .map_err(|e| e.into())
      })
      .await?;
    Ok(deleted > 0)
  }
}

/// Raw column values, decoded outside the connection thread.
struct DocumentRow {
  id: String,
  user_id: String,
  document_type: String,
  title: String,
  fields_data: String,
  created_at: String,
  file_url: Option<String>,
}

impl DocumentRow {
  fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
    Ok(Self {
      id: row.get(0)?,
      user_id: row.get(1)?,
      document_type: row.get(2)?,
      title: row.get(3)?,
      fields_data: row.get(4)?,
      created_at: row.get(5)?,
      file_url: row.get(6)?,
    })
  }

  fn into_record(self) -> Result<DocumentRecord, anyhow::Error> {
    let fields_data: FieldValues = serde_json::from_str(&self.fields_data)?;
    Ok(DocumentRecord {
      id: self.id.parse()?,
      user_id: self.user_id.parse()?,
      document_type: self.document_type.parse()?,
      title: self.title,
      fields_data,
      created_at: parse_ts(&self.created_at)?,
      file_url: self.file_url,
    })
  }
}

struct TermRow {
  id: String,
  term: String,
  definition: String,
  category: String,
}

impl TermRow {
  fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
    Ok(Self {
      id: row.get(0)?,
      term: row.get(1)?,
      definition: row.get(2)?,
      category: row.get(3)?,
    })
  }

  fn into_term(self) -> Result<LegalTerm, anyhow::Error> {
    Ok(LegalTerm {
      id: self.id.parse()?,
      term: self.term,
      definition: self.definition,
      category: self.category,
    })
  }
}

struct UserRow {
  id: String,
  email: String,
  created_at: String,
}

impl UserRow {
  fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
    Ok(Self {
      id: row.get(0)?,
      email: row.get(1)?,
      created_at: row.get(2)?,
    })
  }

  fn into_user(self) -> Result<User, anyhow::Error> {
    Ok(User {
      id: self.id.parse()?,
      email: self.email,
      created_at: parse_ts(&self.created_at)?,
    })
  }
}
