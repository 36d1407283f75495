use axum::{
  routing::{get, post},
  Router,
};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::broadcast;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use super::routes::*;
use crate::db::DatabaseBackend;
use crate::server::ServerConfig;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
  pub backend: Arc<dyn DatabaseBackend>,
  pub config: ServerConfig,
  pub start_time: std::time::Instant,
}

impl AppState {
  pub fn new(backend: Arc<dyn DatabaseBackend>, config: ServerConfig) -> Self {
    Self {
      backend,
      config,
      start_time: std::time::Instant::now(),
    }
  }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
  if origins.is_empty() || origins.iter().any(|o| o == "*") {
    return CorsLayer::permissive();
  }
  let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
  CorsLayer::new()
    .allow_origin(origins)
    .allow_methods(Any)
    .allow_headers(Any)
}

/// Every route of the service, with the web UI served as the fallback.
pub fn router(state: AppState) -> Router {
  let public = Router::new()
    // Probes live outside /api for orchestrators
    .route("/health", get(health_check))
    .route("/ready", get(readiness_check))
    .route("/style.css", get(serve_css))
    .route("/api/status", get(api_status))
    .route("/api/auth/signup", post(api_signup))
    .route("/api/auth/login", post(api_login))
    .route("/api/auth/logout", post(api_logout))
    .route("/api/document-types", get(api_document_types))
    .route("/api/document-types/{type}/fields", get(api_document_fields))
    .route("/api/legal-terms", get(api_legal_terms));

  let protected = Router::new()
    .route("/api/auth/user", get(api_current_user))
    .route(
      "/api/documents",
      get(api_list_documents).post(api_create_document),
    )
    .route(
      "/api/documents/{id}",
      get(api_get_document).delete(api_delete_document),
    )
    .layer(axum::middleware::from_fn_with_state(
      state.clone(),
      require_user,
    ));

  let static_dir = Path::new(&state.config.server.static_dir);
  let spa =
    ServeDir::new(static_dir).not_found_service(ServeFile::new(static_dir.join("index.html")));

  public
    .merge(protected)
    .fallback_service(spa)
    .layer(cors_layer(&state.config.server.cors_origins))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

/// HTTP server for the JSON API and the web UI bundle
pub struct ApiServer {
  backend: Arc<dyn DatabaseBackend>,
  config: ServerConfig,
  shutdown_rx: broadcast::Receiver<()>,
}

impl ApiServer {
  pub fn new(
    backend: Arc<dyn DatabaseBackend>,
    config: ServerConfig,
    shutdown_rx: broadcast::Receiver<()>,
  ) -> Self {
    Self {
      backend,
      config,
      shutdown_rx,
    }
  }

  pub async fn run(mut self, addr: &str) -> Result<(), anyhow::Error> {
    let app = router(AppState::new(self.backend, self.config));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("LegalDocs listening on http://{}", addr);

    axum::serve(listener, app.into_make_service())
      .with_graceful_shutdown(async move {
        let _ = self.shutdown_rx.recv().await;
        tracing::info!("HTTP server shutting down");
      })
      .await?;
    Ok(())
  }
}
