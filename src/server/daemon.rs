use std::sync::Arc;
use tokio::sync::broadcast;

use super::{BackendType, ServerConfig};
use crate::api::ApiServer;
use crate::db::{DatabaseBackend, PostgresBackend, SqliteBackend};
use crate::glossary::seed_terms;

/// Connect to the database selected by the config.
pub async fn open_backend(config: &ServerConfig) -> Result<Arc<dyn DatabaseBackend>, anyhow::Error> {
  let backend: Arc<dyn DatabaseBackend> = match config.backend {
    BackendType::Postgres => Arc::new(PostgresBackend::new(
      &config.postgres.url,
      config.postgres.max_connections,
    )?),
    BackendType::Sqlite => Arc::new(SqliteBackend::new(&config.sqlite.path).await?),
  };
  tracing::info!("Using {} backend", backend.dialect().name());
  Ok(backend)
}

/// Load the built-in glossary into an empty `legal_terms` table.
/// Returns the number of terms written.
pub async fn seed_glossary_if_empty(backend: &dyn DatabaseBackend) -> Result<usize, anyhow::Error> {
  if backend.count_legal_terms().await? > 0 {
    return Ok(0);
  }
  let terms = seed_terms();
  for term in &terms {
    backend.upsert_legal_term(term).await?;
  }
  Ok(terms.len())
}

pub struct Daemon {
  config: ServerConfig,
  backend: Arc<dyn DatabaseBackend>,
  shutdown_tx: broadcast::Sender<()>,
}

impl Daemon {
  pub fn new(config: ServerConfig, backend: Arc<dyn DatabaseBackend>) -> Self {
    let (shutdown_tx, _) = broadcast::channel(1);
    Self {
      config,
      backend,
      shutdown_tx,
    }
  }

  /// Trigger graceful shutdown of the HTTP server
  pub fn shutdown(&self) {
    tracing::info!("Initiating graceful shutdown...");
    let _ = self.shutdown_tx.send(());
  }

  pub async fn run(&self) -> Result<(), anyhow::Error> {
    tracing::info!("Initializing database schema...");
    self.backend.init_schema().await?;

    if self.config.glossary.seed {
      let seeded = seed_glossary_if_empty(self.backend.as_ref()).await?;
      if seeded > 0 {
        tracing::info!("Seeded glossary with {} terms", seeded);
      }
    }

    let api = ApiServer::new(
      self.backend.clone(),
      self.config.clone(),
      self.shutdown_tx.subscribe(),
    );
    api.run(&self.config.address()).await
  }
}
