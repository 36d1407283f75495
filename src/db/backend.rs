use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::types::{DocumentRecord, LegalTerm, NewDocument, NewLegalTerm, User};

/// Which SQL engine a backend talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlDialect {
  Postgres,
  Sqlite,
}

impl SqlDialect {
  pub fn name(&self) -> &'static str {
    match self {
      Self::Postgres => "postgres",
      Self::Sqlite => "sqlite",
    }
  }
}

/// Storage for documents, the glossary, and user sessions.
///
/// Ownership is enforced here: every document query is scoped to the
/// requesting user, so a caller can never read or delete another user's row.
#[async_trait]
pub trait DatabaseBackend: Send + Sync {
  fn dialect(&self) -> SqlDialect;

  async fn init_schema(&self) -> Result<(), anyhow::Error>;
  async fn drop_schema(&self) -> Result<(), anyhow::Error>;

  /// Cheap round trip used by the readiness probe
  async fn ping(&self) -> Result<(), anyhow::Error>;

  // Documents
  async fn insert_document(&self, doc: NewDocument) -> Result<DocumentRecord, anyhow::Error>;
  async fn get_document(
    &self,
    user_id: Uuid,
    id: Uuid,
  ) -> Result<Option<DocumentRecord>, anyhow::Error>;
  /// The user's documents, newest first
  async fn list_documents(&self, user_id: Uuid) -> Result<Vec<DocumentRecord>, anyhow::Error>;
  /// Returns false when no document with that id belongs to the user
  async fn delete_document(&self, user_id: Uuid, id: Uuid) -> Result<bool, anyhow::Error>;

  // Glossary
  /// Insert a term, or replace the definition and category of an existing
  /// term with the same name
  async fn upsert_legal_term(&self, term: &NewLegalTerm) -> Result<LegalTerm, anyhow::Error>;
  /// All terms, alphabetical
  async fn list_legal_terms(&self) -> Result<Vec<LegalTerm>, anyhow::Error>;
  async fn count_legal_terms(&self) -> Result<usize, anyhow::Error>;

  // Users and sessions
  async fn create_user(&self, email: &str, password_hash: &str) -> Result<User, anyhow::Error>;
  /// The user and their password hash
  async fn get_user_by_email(&self, email: &str) -> Result<Option<(User, String)>, anyhow::Error>;
  async fn list_users(&self) -> Result<Vec<User>, anyhow::Error>;
  async fn create_session(
    &self,
    user_id: Uuid,
    token_hash: &str,
    expires_at: DateTime<Utc>,
  ) -> Result<(), anyhow::Error>;
  /// The owner of an unexpired session
  async fn resolve_session(&self, token_hash: &str) -> Result<Option<User>, anyhow::Error>;
  async fn delete_session(&self, token_hash: &str) -> Result<bool, anyhow::Error>;
}
