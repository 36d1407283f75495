//! HTTP client for the JSON API

use gloo_net::http::{Request, RequestBuilder, Response};
use gloo_storage::{LocalStorage, Storage};
use serde::{de::DeserializeOwned, Serialize};
use uuid::Uuid;

use crate::types::{
  CreateDocumentRequest, Credentials, DeleteResponse, DocumentRecord, ErrorBody, LegalTerm,
  SessionResponse, User,
};

const TOKEN_KEY: &str = "legaldocs_session";

pub fn get_stored_token() -> Option<String> {
  LocalStorage::get(TOKEN_KEY).ok()
}

/// Persist the session token so a reload resumes the session.
pub fn set_stored_token(token: &str) -> Result<(), String> {
  LocalStorage::set(TOKEN_KEY, token).map_err(|e| {
    leptos::logging::warn!("Failed to store session token: {}", e);
    "No se pudo guardar la sesión en este navegador".to_string()
  })
}

pub fn clear_stored_token() {
  LocalStorage::delete(TOKEN_KEY);
}

fn add_auth_header(req: RequestBuilder) -> RequestBuilder {
  match get_stored_token() {
    Some(token) => req.header("Authorization", &format!("Bearer {}", token)),
    None => req,
  }
}

/// Body of a successful response, or the server's `{"error": ...}` message
async fn read_json<T: DeserializeOwned>(resp: Response) -> Result<T, String> {
  if !resp.ok() {
    let status = resp.status();
    return Err(match resp.json::<ErrorBody>().await {
      Ok(body) => body.error,
      Err(_) => format!("Error HTTP {}", status),
    });
  }
  resp.json().await.map_err(|e| e.to_string())
}

async fn get_json<T: DeserializeOwned>(url: &str) -> Result<T, String> {
  let resp = add_auth_header(Request::get(url))
    .send()
    .await
    .map_err(|e| e.to_string())?;
  read_json(resp).await
}

async fn post_json<B: Serialize, T: DeserializeOwned>(url: &str, body: &B) -> Result<T, String> {
  let req = add_auth_header(Request::post(url))
    .json(body)
    .map_err(|e| e.to_string())?;
  let resp = req.send().await.map_err(|e| e.to_string())?;
  read_json(resp).await
}

async fn delete_json<T: DeserializeOwned>(url: &str) -> Result<T, String> {
  let resp = add_auth_header(Request::delete(url))
    .send()
    .await
    .map_err(|e| e.to_string())?;
  read_json(resp).await
}

// =============================================================================
// Auth
// =============================================================================

pub async fn login(email: &str, password: &str) -> Result<SessionResponse, String> {
  let creds = Credentials {
    email: email.to_string(),
    password: password.to_string(),
  };
  let session: SessionResponse = post_json("/api/auth/login", &creds).await?;
  set_stored_token(&session.token)?;
  Ok(session)
}

pub async fn signup(email: &str, password: &str) -> Result<SessionResponse, String> {
  let creds = Credentials {
    email: email.to_string(),
    password: password.to_string(),
  };
  let session: SessionResponse = post_json("/api/auth/signup", &creds).await?;
  set_stored_token(&session.token)?;
  Ok(session)
}

pub async fn logout() {
  let _: Result<DeleteResponse, String> = post_json("/api/auth/logout", &()).await;
  clear_stored_token();
}

pub async fn current_user() -> Result<User, String> {
  get_json("/api/auth/user").await
}

// =============================================================================
// Documents and glossary
// =============================================================================

pub async fn fetch_documents() -> Result<Vec<DocumentRecord>, String> {
  get_json("/api/documents").await
}

pub async fn create_document(req: &CreateDocumentRequest) -> Result<DocumentRecord, String> {
  post_json("/api/documents", req).await
}

pub async fn delete_document(id: Uuid) -> Result<(), String> {
  let resp: DeleteResponse = delete_json(&format!("/api/documents/{}", id)).await?;
  if resp.deleted {
    Ok(())
  } else {
    Err("Documento no encontrado".to_string())
  }
}

pub async fn fetch_legal_terms() -> Result<Vec<LegalTerm>, String> {
  get_json("/api/legal-terms").await
}
