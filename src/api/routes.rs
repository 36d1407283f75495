use axum::{
  extract::{Path, Query, Request, State},
  http::{header, HeaderMap, StatusCode},
  middleware::Next,
  response::{IntoResponse, Response},
  Extension, Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::auth;
use super::error::AppError;
use super::AppState;
use crate::forms::{fields_for, validate_request, FieldDescriptor};
use crate::glossary::filter_terms;
use crate::types::{
  CreateDocumentRequest, Credentials, DeleteResponse, DocumentRecord, DocumentType,
  DocumentTypeInfo, LegalTerm, SessionResponse, User,
};

/// The authenticated caller, inserted by [`require_user`].
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

// =============================================================================
// Probes and status
// =============================================================================

/// Liveness probe
pub async fn health_check() -> StatusCode {
  StatusCode::OK
}

/// Readiness probe - 200 once the database answers
pub async fn readiness_check(State(state): State<AppState>) -> StatusCode {
  match state.backend.ping().await {
    Ok(()) => StatusCode::OK,
    Err(e) => {
      tracing::warn!("Readiness check failed: {}", e);
      StatusCode::SERVICE_UNAVAILABLE
    }
  }
}

#[derive(Serialize)]
pub struct StatusResponse {
  name: &'static str,
  version: &'static str,
  backend: &'static str,
  uptime_secs: u64,
}

pub async fn api_status(State(state): State<AppState>) -> Json<StatusResponse> {
  Json(StatusResponse {
    name: "LegalDocs",
    version: env!("CARGO_PKG_VERSION"),
    backend: state.backend.dialect().name(),
    uptime_secs: state.start_time.elapsed().as_secs(),
  })
}

pub async fn serve_css() -> impl IntoResponse {
  (
    [(header::CONTENT_TYPE, "text/css")],
    include_str!("../web/styles.css"),
  )
}

// =============================================================================
// Auth
// =============================================================================

/// Resolve the bearer token to a user or answer 401.
pub async fn require_user(
  State(state): State<AppState>,
  mut req: Request,
  next: Next,
) -> Result<Response, AppError> {
  let token_hash = auth::bearer_token(req.headers())
    .map(auth::hash_session_token)
    .ok_or_else(AppError::unauthenticated)?;
  let user = state
    .backend
    .resolve_session(&token_hash)
    .await?
    .ok_or_else(AppError::unauthenticated)?;
  req.extensions_mut().insert(CurrentUser(user));
  Ok(next.run(req).await)
}

async fn open_session(state: &AppState, user: User) -> Result<SessionResponse, AppError> {
  let token = auth::generate_session_token();
  let expires_at = chrono::Utc::now() + state.config.session_ttl();
  state
    .backend
    .create_session(user.id, &auth::hash_session_token(&token), expires_at)
    .await?;
  Ok(SessionResponse { token, user })
}

/// POST /api/auth/signup
pub async fn api_signup(
  State(state): State<AppState>,
  Json(req): Json<Credentials>,
) -> Result<(StatusCode, Json<SessionResponse>), AppError> {
  if !state.config.auth.allow_signup {
    return Err(AppError::Forbidden(
      "El registro de usuarios está deshabilitado".to_string(),
    ));
  }
  let email = auth::normalize_email(&req.email)
    .ok_or_else(|| AppError::BadRequest("Correo electrónico no válido".to_string()))?;
  if req.password.chars().count() < auth::MIN_PASSWORD_LEN {
    return Err(AppError::BadRequest(format!(
      "La contraseña debe tener al menos {} caracteres",
      auth::MIN_PASSWORD_LEN
    )));
  }
  if state.backend.get_user_by_email(&email).await?.is_some() {
    return Err(AppError::Conflict(
      "Ya existe una cuenta con ese correo".to_string(),
    ));
  }

  let password_hash = auth::hash_password(&req.password)?;
  let user = state.backend.create_user(&email, &password_hash).await?;
  tracing::info!(user_id = %user.id, "User signed up");

  let session = open_session(&state, user).await?;
  Ok((StatusCode::CREATED, Json(session)))
}

/// POST /api/auth/login
pub async fn api_login(
  State(state): State<AppState>,
  Json(req): Json<Credentials>,
) -> Result<Json<SessionResponse>, AppError> {
  let invalid = || AppError::Unauthorized("Correo o contraseña incorrectos".to_string());

  let email = auth::normalize_email(&req.email).ok_or_else(invalid)?;
  let (user, password_hash) = state
    .backend
    .get_user_by_email(&email)
    .await?
    .ok_or_else(invalid)?;
  if !auth::verify_password(&req.password, &password_hash) {
    return Err(invalid());
  }

  Ok(Json(open_session(&state, user).await?))
}

/// POST /api/auth/logout - drops the session named by the bearer token, if any
pub async fn api_logout(
  State(state): State<AppState>,
  headers: HeaderMap,
) -> Result<Json<DeleteResponse>, AppError> {
  let deleted = match auth::bearer_token(&headers) {
    Some(token) => {
      state
        .backend
        .delete_session(&auth::hash_session_token(token))
        .await?
    }
    None => false,
  };
  Ok(Json(DeleteResponse { deleted }))
}

/// GET /api/auth/user
pub async fn api_current_user(Extension(CurrentUser(user)): Extension<CurrentUser>) -> Json<User> {
  Json(user)
}

// =============================================================================
// Document templates
// =============================================================================

pub async fn api_document_types() -> Json<Vec<DocumentTypeInfo>> {
  Json(DocumentType::ALL.iter().copied().map(Into::into).collect())
}

pub async fn api_document_fields(
  Path(tag): Path<String>,
) -> Result<Json<&'static [FieldDescriptor]>, AppError> {
  let doc_type: DocumentType = tag
    .parse()
    .map_err(|e: crate::types::ParseDocumentTypeError| AppError::NotFound(e.to_string()))?;
  Ok(Json(fields_for(doc_type)))
}

// =============================================================================
// Documents
// =============================================================================

fn parse_document_id(id: &str) -> Result<Uuid, AppError> {
  Uuid::parse_str(id)
    .map_err(|_| AppError::BadRequest("Identificador de documento no válido".to_string()))
}

fn document_not_found() -> AppError {
  AppError::NotFound("Documento no encontrado".to_string())
}

pub async fn api_list_documents(
  State(state): State<AppState>,
  Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<Vec<DocumentRecord>>, AppError> {
  Ok(Json(state.backend.list_documents(user.id).await?))
}

pub async fn api_create_document(
  State(state): State<AppState>,
  Extension(CurrentUser(user)): Extension<CurrentUser>,
  Json(req): Json<CreateDocumentRequest>,
) -> Result<(StatusCode, Json<DocumentRecord>), AppError> {
  let draft = validate_request(req.document_type.as_deref(), &req.fields_data)?;
  let record = state
    .backend
    .insert_document(draft.into_new_document(user.id))
    .await?;
  tracing::info!(
    document_id = %record.id,
    document_type = %record.document_type,
    "Document created"
  );
  Ok((StatusCode::CREATED, Json(record)))
}

pub async fn api_get_document(
  State(state): State<AppState>,
  Extension(CurrentUser(user)): Extension<CurrentUser>,
  Path(id): Path<String>,
) -> Result<Json<DocumentRecord>, AppError> {
  let id = parse_document_id(&id)?;
  state
    .backend
    .get_document(user.id, id)
    .await?
    .map(Json)
    .ok_or_else(document_not_found)
}

pub async fn api_delete_document(
  State(state): State<AppState>,
  Extension(CurrentUser(user)): Extension<CurrentUser>,
  Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, AppError> {
  let id = parse_document_id(&id)?;
  if !state.backend.delete_document(user.id, id).await? {
    return Err(document_not_found());
  }
  tracing::info!(document_id = %id, "Document deleted");
  Ok(Json(DeleteResponse { deleted: true }))
}

// =============================================================================
// Glossary
// =============================================================================

#[derive(Deserialize)]
pub struct TermsQuery {
  #[serde(default)]
  q: Option<String>,
}

pub async fn api_legal_terms(
  State(state): State<AppState>,
  Query(query): Query<TermsQuery>,
) -> Result<Json<Vec<LegalTerm>>, AppError> {
  let terms = state.backend.list_legal_terms().await?;
  let Some(q) = query.q else {
    return Ok(Json(terms));
  };
  Ok(Json(filter_terms(&terms, &q).into_iter().cloned().collect()))
}
