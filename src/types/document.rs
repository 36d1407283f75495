use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Form values keyed by field name.
pub type FieldValues = BTreeMap<String, String>;

/// Closed set of document templates a user can fill in.
///
/// The serialized tag (`arrendamiento`, `servicios`, ...) is what the
/// database enum and the JSON API carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(
  feature = "server",
  derive(postgres_types::ToSql, postgres_types::FromSql),
  postgres(name = "document_type")
)]
pub enum DocumentType {
  #[serde(rename = "arrendamiento")]
  #[cfg_attr(feature = "server", postgres(name = "arrendamiento"))]
  Lease,
  #[serde(rename = "servicios")]
  #[cfg_attr(feature = "server", postgres(name = "servicios"))]
  Services,
  #[serde(rename = "confidencialidad")]
  #[cfg_attr(feature = "server", postgres(name = "confidencialidad"))]
  Confidentiality,
  #[serde(rename = "denuncia")]
  #[cfg_attr(feature = "server", postgres(name = "denuncia"))]
  Complaint,
  #[serde(rename = "compraventa")]
  #[cfg_attr(feature = "server", postgres(name = "compraventa"))]
  Sale,
}

impl DocumentType {
  /// Every type, in the order the selector lists them.
  pub const ALL: [DocumentType; 5] = [
    Self::Lease,
    Self::Services,
    Self::Confidentiality,
    Self::Complaint,
    Self::Sale,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Lease => "arrendamiento",
      Self::Services => "servicios",
      Self::Confidentiality => "confidencialidad",
      Self::Complaint => "denuncia",
      Self::Sale => "compraventa",
    }
  }

  /// Label shown in the template selector.
  pub fn label(&self) -> &'static str {
    match self {
      Self::Lease => "Contrato de Arrendamiento",
      Self::Services => "Contrato de Servicios",
      Self::Confidentiality => "Acuerdo de Confidencialidad",
      Self::Complaint => "Denuncia",
      Self::Sale => "Contrato de Compraventa",
    }
  }

  /// Label shown as the badge in the history table.
  pub fn short_label(&self) -> &'static str {
    match self {
      Self::Lease => "Arrendamiento",
      Self::Services => "Servicios",
      Self::Confidentiality => "Confidencialidad",
      Self::Complaint => "Denuncia",
      Self::Sale => "Compraventa",
    }
  }
}

impl fmt::Display for DocumentType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown document type: {0}")]
pub struct ParseDocumentTypeError(pub String);

impl FromStr for DocumentType {
  type Err = ParseDocumentTypeError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::ALL
      .into_iter()
      .find(|t| t.as_str() == s)
      .ok_or_else(|| ParseDocumentTypeError(s.to_string()))
  }
}

/// A persisted document.
///
/// Records are never edited in place: `user_id` and `document_type` are fixed
/// when the row is inserted, and a change means delete-and-recreate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
  pub id: Uuid,
  pub user_id: Uuid,
  pub document_type: DocumentType,
  pub title: String,
  pub fields_data: FieldValues,
  pub created_at: DateTime<Utc>,
  /// Reference to a generated file. Generation is not available yet, so this
  /// is always empty.
  pub file_url: Option<String>,
}

/// Insert payload for the `documents` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDocument {
  pub user_id: Uuid,
  pub document_type: DocumentType,
  pub title: String,
  pub fields_data: FieldValues,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_tags_round_trip_through_from_str() {
    for t in DocumentType::ALL {
      assert_eq!(t.as_str().parse::<DocumentType>().unwrap(), t);
    }
  }

  #[test]
  fn test_unknown_tag_is_rejected() {
    let err = "testamento".parse::<DocumentType>().unwrap_err();
    assert_eq!(err, ParseDocumentTypeError("testamento".into()));
  }

  #[test]
  fn test_serde_uses_spanish_tags() {
    let json = serde_json::to_string(&DocumentType::Confidentiality).unwrap();
    assert_eq!(json, "\"confidencialidad\"");
    let back: DocumentType = serde_json::from_str("\"compraventa\"").unwrap();
    assert_eq!(back, DocumentType::Sale);
  }
}
