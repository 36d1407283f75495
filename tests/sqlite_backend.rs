use chrono::{Duration, Utc};
use legaldocs::db::{DatabaseBackend, SqlDialect, SqliteBackend};
use legaldocs::server::seed_glossary_if_empty;
use legaldocs::types::{DocumentType, FieldValues, NewDocument, NewLegalTerm, User};
use tokio_test::{assert_err, assert_ok};
use uuid::Uuid;

async fn backend() -> SqliteBackend {
  let backend = SqliteBackend::in_memory().await.unwrap();
  backend.init_schema().await.unwrap();
  backend
}

async fn user(backend: &SqliteBackend, email: &str) -> User {
  backend.create_user(email, "hash").await.unwrap()
}

fn new_doc(user_id: Uuid, doc_type: DocumentType, title: &str) -> NewDocument {
  let mut fields = FieldValues::new();
  fields.insert("titulo".to_string(), title.to_string());
  NewDocument {
    user_id,
    document_type: doc_type,
    title: title.to_string(),
    fields_data: fields,
  }
}

// =============================================================================
// Schema
// =============================================================================

#[tokio::test]
async fn test_init_schema_is_idempotent() {
  let backend = backend().await;
  assert_ok!(backend.init_schema().await);
  assert_ok!(backend.ping().await);
  assert_eq!(backend.dialect(), SqlDialect::Sqlite);
}

#[tokio::test]
async fn test_drop_schema() {
  let backend = backend().await;
  backend.drop_schema().await.unwrap();
  assert_err!(backend.list_legal_terms().await);
  backend.init_schema().await.unwrap();
  assert_eq!(backend.count_legal_terms().await.unwrap(), 0);
}

#[tokio::test]
async fn test_file_backed_database_persists() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("legaldocs.db");
  let path = path.to_str().unwrap();

  let owner_id = {
    let backend = SqliteBackend::new(path).await.unwrap();
    backend.init_schema().await.unwrap();
    let owner = user(&backend, "ana@example.com").await;
    backend
      .insert_document(new_doc(owner.id, DocumentType::Lease, "Local"))
      .await
      .unwrap()
      .user_id
  };

  let backend = SqliteBackend::new(path).await.unwrap();
  let docs = backend.list_documents(owner_id).await.unwrap();
  assert_eq!(docs.len(), 1);
  assert_eq!(docs[0].title, "Local");
}

// =============================================================================
// Documents
// =============================================================================

#[tokio::test]
async fn test_insert_and_get_document() {
  let backend = backend().await;
  let owner = user(&backend, "ana@example.com").await;

  let doc = backend
    .insert_document(new_doc(owner.id, DocumentType::Confidentiality, "NDA Proveedor"))
    .await
    .unwrap();
  assert_eq!(doc.user_id, owner.id);
  assert_eq!(doc.file_url, None);

  let fetched = backend.get_document(owner.id, doc.id).await.unwrap().unwrap();
  assert_eq!(fetched, doc);
  assert_eq!(fetched.document_type, DocumentType::Confidentiality);
  assert_eq!(fetched.fields_data.get("titulo").unwrap(), "NDA Proveedor");
}

#[tokio::test]
async fn test_list_documents_newest_first() {
  let backend = backend().await;
  let owner = user(&backend, "ana@example.com").await;

  for title in ["primero", "segundo", "tercero"] {
    backend
      .insert_document(new_doc(owner.id, DocumentType::Services, title))
      .await
      .unwrap();
  }

  let titles: Vec<_> = backend
    .list_documents(owner.id)
    .await
    .unwrap()
    .into_iter()
    .map(|d| d.title)
    .collect();
  assert_eq!(titles, vec!["tercero", "segundo", "primero"]);
}

#[tokio::test]
async fn test_documents_scoped_to_owner() {
  let backend = backend().await;
  let ana = user(&backend, "ana@example.com").await;
  let luis = user(&backend, "luis@example.com").await;

  let doc = backend
    .insert_document(new_doc(ana.id, DocumentType::Sale, "Vehículo"))
    .await
    .unwrap();

  assert!(backend.list_documents(luis.id).await.unwrap().is_empty());
  assert!(backend.get_document(luis.id, doc.id).await.unwrap().is_none());

  // Another user cannot delete it
  assert!(!backend.delete_document(luis.id, doc.id).await.unwrap());
  assert_eq!(backend.list_documents(ana.id).await.unwrap().len(), 1);

  assert!(backend.delete_document(ana.id, doc.id).await.unwrap());
  assert!(backend.list_documents(ana.id).await.unwrap().is_empty());
  assert!(!backend.delete_document(ana.id, doc.id).await.unwrap());
}

#[tokio::test]
async fn test_document_requires_existing_owner() {
  let backend = backend().await;
  let result = backend
    .insert_document(new_doc(Uuid::new_v4(), DocumentType::Lease, "huérfano"))
    .await;
  assert_err!(result);
}

// =============================================================================
// Glossary
// =============================================================================

#[tokio::test]
async fn test_terms_alphabetical() {
  let backend = backend().await;
  for (term, category) in [("usufructo", "Civil"), ("Arras", "Contratos"), ("Mora", "Obligaciones")] {
    backend
      .upsert_legal_term(&NewLegalTerm::new(term, "definición", category))
      .await
      .unwrap();
  }

  let terms: Vec<_> = backend
    .list_legal_terms()
    .await
    .unwrap()
    .into_iter()
    .map(|t| t.term)
    .collect();
  assert_eq!(terms, vec!["Arras", "Mora", "usufructo"]);
  assert_eq!(backend.count_legal_terms().await.unwrap(), 3);
}

#[tokio::test]
async fn test_upsert_term_replaces_definition() {
  let backend = backend().await;
  let first = backend
    .upsert_legal_term(&NewLegalTerm::new("Mora", "vieja", "Obligaciones"))
    .await
    .unwrap();
  let second = backend
    .upsert_legal_term(&NewLegalTerm::new("Mora", "nueva", "Civil"))
    .await
    .unwrap();

  assert_eq!(first.id, second.id);
  assert_eq!(second.definition, "nueva");
  assert_eq!(second.category, "Civil");
  assert_eq!(backend.count_legal_terms().await.unwrap(), 1);
}

#[tokio::test]
async fn test_seed_only_when_empty() {
  let backend = backend().await;
  let seeded = seed_glossary_if_empty(&backend).await.unwrap();
  assert!(seeded > 0);
  assert_eq!(backend.count_legal_terms().await.unwrap(), seeded);

  assert_eq!(seed_glossary_if_empty(&backend).await.unwrap(), 0);
  assert_eq!(backend.count_legal_terms().await.unwrap(), seeded);
}

// =============================================================================
// Users and sessions
// =============================================================================

#[tokio::test]
async fn test_users_unique_email() {
  let backend = backend().await;
  user(&backend, "ana@example.com").await;
  assert_err!(backend.create_user("ana@example.com", "otro").await);

  let (found, hash) = backend
    .get_user_by_email("ana@example.com")
    .await
    .unwrap()
    .unwrap();
  assert_eq!(found.email, "ana@example.com");
  assert_eq!(hash, "hash");
  assert!(backend.get_user_by_email("nadie@example.com").await.unwrap().is_none());
  assert_eq!(backend.list_users().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_session_lifecycle() {
  let backend = backend().await;
  let ana = user(&backend, "ana@example.com").await;

  backend
    .create_session(ana.id, "live", Utc::now() + Duration::days(1))
    .await
    .unwrap();
  backend
    .create_session(ana.id, "stale", Utc::now() - Duration::minutes(1))
    .await
    .unwrap();

  assert_eq!(backend.resolve_session("live").await.unwrap(), Some(ana));
  assert_eq!(backend.resolve_session("stale").await.unwrap(), None);
  assert_eq!(backend.resolve_session("unknown").await.unwrap(), None);

  assert!(backend.delete_session("live").await.unwrap());
  assert_eq!(backend.resolve_session("live").await.unwrap(), None);
  assert!(!backend.delete_session("live").await.unwrap());
}
