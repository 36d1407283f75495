use axum::{
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};

use crate::forms::FormError;
use crate::types::ErrorBody;

/// Message of every 401 answered by the document routes.
pub const NOT_AUTHENTICATED: &str = "Usuario no autenticado";

#[derive(Debug)]
pub enum AppError {
  Internal(anyhow::Error),
  NotFound(String),
  BadRequest(String),
  Unauthorized(String),
  Forbidden(String),
  Conflict(String),
}

impl AppError {
  pub fn unauthenticated() -> Self {
    Self::Unauthorized(NOT_AUTHENTICATED.to_string())
  }
}

impl From<anyhow::Error> for AppError {
  fn from(e: anyhow::Error) -> Self {
    Self::Internal(e)
  }
}

impl From<FormError> for AppError {
  fn from(e: FormError) -> Self {
    Self::BadRequest(e.to_string())
  }
}

impl IntoResponse for AppError {
  fn into_response(self) -> Response {
    let (status, error) = match self {
      Self::Internal(e) => {
        tracing::error!("Request failed: {:#}", e);
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          "Error interno del servidor".to_string(),
        )
      }
      Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
      Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
      Self::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
      Self::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
      Self::Conflict(msg) => (StatusCode::CONFLICT, msg),
    };
    (status, Json(ErrorBody { error })).into_response()
  }
}
