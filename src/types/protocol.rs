//! JSON bodies exchanged between the web client and the server.

use serde::{Deserialize, Serialize};

use super::{DocumentType, FieldValues, User};

/// `POST /api/documents`
///
/// `document_type` stays a raw string so an unknown or missing tag can be
/// reported with the same error body as every other validation failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateDocumentRequest {
  #[serde(default)]
  pub document_type: Option<String>,
  #[serde(default)]
  pub fields_data: FieldValues,
}

/// One entry of `GET /api/document-types`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentTypeInfo {
  pub value: DocumentType,
  pub label: String,
  pub short_label: String,
}

impl From<DocumentType> for DocumentTypeInfo {
  fn from(t: DocumentType) -> Self {
    Self {
      value: t,
      label: t.label().to_string(),
      short_label: t.short_label().to_string(),
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
  pub email: String,
  pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
  pub token: String,
  pub user: User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResponse {
  pub deleted: bool,
}

/// Body of every non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
  pub error: String,
}
