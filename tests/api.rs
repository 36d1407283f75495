//! Router tests against an in-memory SQLite backend

use axum::{
  body::Body,
  http::{header, Method, Request, StatusCode},
  Router,
};
use http_body_util::BodyExt;
use legaldocs::api::{router, AppState, NOT_AUTHENTICATED};
use legaldocs::db::{DatabaseBackend, SqliteBackend};
use legaldocs::server::{seed_glossary_if_empty, ServerConfig};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

async fn app_with(config: ServerConfig) -> Router {
  let backend = SqliteBackend::in_memory().await.unwrap();
  backend.init_schema().await.unwrap();
  seed_glossary_if_empty(&backend).await.unwrap();
  let backend: Arc<dyn DatabaseBackend> = Arc::new(backend);
  router(AppState::new(backend, config))
}

async fn app() -> Router {
  app_with(ServerConfig::default()).await
}

async fn send(
  app: &Router,
  method: Method,
  uri: &str,
  token: Option<&str>,
  body: Option<Value>,
) -> (StatusCode, Value) {
  let mut req = Request::builder().method(method).uri(uri);
  if let Some(token) = token {
    req = req.header(header::AUTHORIZATION, format!("Bearer {}", token));
  }
  let req = match body {
    Some(body) => req
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from(body.to_string()))
      .unwrap(),
    None => req.body(Body::empty()).unwrap(),
  };

  let res = app.clone().oneshot(req).await.unwrap();
  let status = res.status();
  let bytes = res.into_body().collect().await.unwrap().to_bytes();
  let value = if bytes.is_empty() {
    Value::Null
  } else {
    serde_json::from_slice(&bytes).unwrap_or(Value::Null)
  };
  (status, value)
}

async fn signup(app: &Router, email: &str) -> String {
  let (status, body) = send(
    app,
    Method::POST,
    "/api/auth/signup",
    None,
    Some(json!({"email": email, "password": "secreto123"})),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED, "{body}");
  body["token"].as_str().unwrap().to_string()
}

fn lease_fields(title: &str) -> Value {
  json!({
    "titulo": title,
    "parte1_nombre": "Ana Pérez",
    "parte1_identificacion": "1020304050",
    "parte2_nombre": "Luis Gómez",
    "parte2_identificacion": "5040302010",
    "direccion_inmueble": "Calle 10 # 5-20",
    "canon_mensual": "1500000",
    "duracion_meses": "12",
    "deposito_garantia": "3000000"
  })
}

// =============================================================================
// Probes
// =============================================================================

#[tokio::test]
async fn test_health_and_ready() {
  let app = app().await;
  let (status, _) = send(&app, Method::GET, "/health", None, None).await;
  assert_eq!(status, StatusCode::OK);
  let (status, _) = send(&app, Method::GET, "/ready", None, None).await;
  assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_status() {
  let app = app().await;
  let (status, body) = send(&app, Method::GET, "/api/status", None, None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["name"], "LegalDocs");
  assert_eq!(body["backend"], "sqlite");
}

// =============================================================================
// Auth
// =============================================================================

#[tokio::test]
async fn test_signup_login_logout() {
  let app = app().await;
  let token = signup(&app, "Ana@Example.com").await;

  let (status, body) = send(&app, Method::GET, "/api/auth/user", Some(&token), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["email"], "ana@example.com");

  let (status, body) = send(
    &app,
    Method::POST,
    "/api/auth/login",
    None,
    Some(json!({"email": "ana@example.com", "password": "secreto123"})),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  let second = body["token"].as_str().unwrap().to_string();
  assert_ne!(second, token);

  let (status, body) = send(&app, Method::POST, "/api/auth/logout", Some(&token), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["deleted"], true);

  let (status, _) = send(&app, Method::GET, "/api/auth/user", Some(&token), None).await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
  let (status, _) = send(&app, Method::GET, "/api/auth/user", Some(&second), None).await;
  assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_login_wrong_password() {
  let app = app().await;
  signup(&app, "ana@example.com").await;
  let (status, body) = send(
    &app,
    Method::POST,
    "/api/auth/login",
    None,
    Some(json!({"email": "ana@example.com", "password": "incorrecta"})),
  )
  .await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
  assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_signup_rejections() {
  let app = app().await;
  signup(&app, "ana@example.com").await;

  let (status, _) = send(
    &app,
    Method::POST,
    "/api/auth/signup",
    None,
    Some(json!({"email": "ana@example.com", "password": "secreto123"})),
  )
  .await;
  assert_eq!(status, StatusCode::CONFLICT);

  let (status, _) = send(
    &app,
    Method::POST,
    "/api/auth/signup",
    None,
    Some(json!({"email": "luis@example.com", "password": "123"})),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  let (status, _) = send(
    &app,
    Method::POST,
    "/api/auth/signup",
    None,
    Some(json!({"email": "sin-arroba", "password": "secreto123"})),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_signup_disabled() {
  let mut config = ServerConfig::default();
  config.auth.allow_signup = false;
  let app = app_with(config).await;

  let (status, _) = send(
    &app,
    Method::POST,
    "/api/auth/signup",
    None,
    Some(json!({"email": "ana@example.com", "password": "secreto123"})),
  )
  .await;
  assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_documents_require_session() {
  let app = app().await;
  for (method, uri) in [
    (Method::GET, "/api/documents"),
    (Method::POST, "/api/documents"),
    (Method::GET, "/api/auth/user"),
  ] {
    let (status, body) = send(&app, method, uri, None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], NOT_AUTHENTICATED);
  }

  let (status, body) = send(&app, Method::GET, "/api/documents", Some("bogus"), None).await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
  assert_eq!(body["error"], NOT_AUTHENTICATED);
}

// =============================================================================
// Templates
// =============================================================================

#[tokio::test]
async fn test_document_types_and_fields() {
  let app = app().await;
  let (status, body) = send(&app, Method::GET, "/api/document-types", None, None).await;
  assert_eq!(status, StatusCode::OK);
  let values: Vec<_> = body
    .as_array()
    .unwrap()
    .iter()
    .map(|t| t["value"].as_str().unwrap())
    .collect();
  assert_eq!(
    values,
    vec!["arrendamiento", "servicios", "confidencialidad", "denuncia", "compraventa"]
  );

  let (status, body) = send(
    &app,
    Method::GET,
    "/api/document-types/denuncia/fields",
    None,
    None,
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  let fields = body.as_array().unwrap();
  assert_eq!(fields.len(), 7);
  assert_eq!(fields[0]["name"], "titulo");
  assert_eq!(fields[0]["label"], "Título de la Denuncia");
  assert!(fields.iter().any(|f| f["kind"] == "date"));

  let (status, _) = send(
    &app,
    Method::GET,
    "/api/document-types/testamento/fields",
    None,
    None,
  )
  .await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

// =============================================================================
// Documents
// =============================================================================

#[tokio::test]
async fn test_create_list_get_delete() {
  let app = app().await;
  let token = signup(&app, "ana@example.com").await;

  let (status, created) = send(
    &app,
    Method::POST,
    "/api/documents",
    Some(&token),
    Some(json!({"document_type": "arrendamiento", "fields_data": lease_fields("Apartamento centro")})),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED, "{created}");
  assert_eq!(created["title"], "Apartamento centro");
  assert_eq!(created["document_type"], "arrendamiento");
  assert!(created["file_url"].is_null());
  let id = created["id"].as_str().unwrap().to_string();

  let (status, list) = send(&app, Method::GET, "/api/documents", Some(&token), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(list.as_array().unwrap().len(), 1);

  let uri = format!("/api/documents/{id}");
  let (status, doc) = send(&app, Method::GET, &uri, Some(&token), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(doc["fields_data"]["canon_mensual"], "1500000");

  let (status, body) = send(&app, Method::DELETE, &uri, Some(&token), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["deleted"], true);

  let (status, list) = send(&app, Method::GET, "/api/documents", Some(&token), None).await;
  assert_eq!(status, StatusCode::OK);
  assert!(list.as_array().unwrap().is_empty());

  let (status, _) = send(&app, Method::DELETE, &uri, Some(&token), None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_validation_errors() {
  let app = app().await;
  let token = signup(&app, "ana@example.com").await;

  let (status, body) = send(
    &app,
    Method::POST,
    "/api/documents",
    Some(&token),
    Some(json!({"fields_data": lease_fields("x")})),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["error"], "Por favor selecciona un tipo de documento");

  let mut fields = lease_fields("x");
  fields["canon_mensual"] = json!("  ");
  let (status, body) = send(
    &app,
    Method::POST,
    "/api/documents",
    Some(&token),
    Some(json!({"document_type": "arrendamiento", "fields_data": fields})),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["error"], "Por favor completa todos los campos obligatorios");

  let (status, _) = send(
    &app,
    Method::POST,
    "/api/documents",
    Some(&token),
    Some(json!({"document_type": "testamento", "fields_data": {}})),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  let (status, list) = send(&app, Method::GET, "/api/documents", Some(&token), None).await;
  assert_eq!(status, StatusCode::OK);
  assert!(list.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_undeclared_fields_are_dropped() {
  let app = app().await;
  let token = signup(&app, "ana@example.com").await;

  let mut fields = lease_fields("Bodega");
  fields["hechos"] = json!("no pertenece a este formulario");
  let (status, created) = send(
    &app,
    Method::POST,
    "/api/documents",
    Some(&token),
    Some(json!({"document_type": "arrendamiento", "fields_data": fields})),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  assert!(created["fields_data"].get("hechos").is_none());
  assert_eq!(created["fields_data"].as_object().unwrap().len(), 9);
}

#[tokio::test]
async fn test_other_user_cannot_see_or_delete() {
  let app = app().await;
  let ana = signup(&app, "ana@example.com").await;
  let luis = signup(&app, "luis@example.com").await;

  let (_, created) = send(
    &app,
    Method::POST,
    "/api/documents",
    Some(&ana),
    Some(json!({"document_type": "arrendamiento", "fields_data": lease_fields("Casa")})),
  )
  .await;
  let uri = format!("/api/documents/{}", created["id"].as_str().unwrap());

  let (status, list) = send(&app, Method::GET, "/api/documents", Some(&luis), None).await;
  assert_eq!(status, StatusCode::OK);
  assert!(list.as_array().unwrap().is_empty());

  let (status, _) = send(&app, Method::GET, &uri, Some(&luis), None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  let (status, _) = send(&app, Method::DELETE, &uri, Some(&luis), None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);

  let (status, _) = send(&app, Method::GET, &uri, Some(&ana), None).await;
  assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_bad_document_id() {
  let app = app().await;
  let token = signup(&app, "ana@example.com").await;
  let (status, body) = send(
    &app,
    Method::GET,
    "/api/documents/no-es-un-uuid",
    Some(&token),
    None,
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].is_string());
}

// =============================================================================
// Glossary
// =============================================================================

#[tokio::test]
async fn test_legal_terms_sorted_and_filtered() {
  let app = app().await;
  let (status, body) = send(&app, Method::GET, "/api/legal-terms", None, None).await;
  assert_eq!(status, StatusCode::OK);
  let terms: Vec<String> = body
    .as_array()
    .unwrap()
    .iter()
    .map(|t| t["term"].as_str().unwrap().to_string())
    .collect();
  assert!(!terms.is_empty());
  let mut sorted = terms.clone();
  sorted.sort_by_key(|t| t.to_lowercase());
  assert_eq!(terms, sorted);

  let (status, body) = send(&app, Method::GET, "/api/legal-terms?q=ARRENDAMIENTO", None, None).await;
  assert_eq!(status, StatusCode::OK);
  let hits = body.as_array().unwrap();
  assert!(!hits.is_empty());
  assert!(hits.len() < terms.len());
  for hit in hits {
    let text = format!("{} {} {}", hit["term"], hit["definition"], hit["category"]).to_lowercase();
    assert!(text.contains("arrendamiento"));
  }

  let (_, body) = send(&app, Method::GET, "/api/legal-terms?q=zzzz", None, None).await;
  assert!(body.as_array().unwrap().is_empty());
}
