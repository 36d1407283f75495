use chrono::NaiveDate;
use uuid::Uuid;

use super::fields::{fields_for, FieldDescriptor, InputKind};
use crate::types::{DocumentType, FieldValues, NewDocument};

/// Title stored when the form carries no `titulo` value.
pub const UNTITLED: &str = "Documento sin título";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
  #[error("Por favor selecciona un tipo de documento")]
  NoDocumentType,
  #[error("Tipo de documento desconocido: {0}")]
  UnknownDocumentType(String),
  #[error("Por favor completa todos los campos obligatorios")]
  MissingFields(Vec<&'static str>),
  #[error("El campo \"{label}\" tiene un valor no válido")]
  InvalidValue {
    field: &'static str,
    label: &'static str,
  },
}

/// A submission that passed validation, not yet bound to an owner.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentDraft {
  pub document_type: DocumentType,
  pub title: String,
  pub fields_data: FieldValues,
}

impl DocumentDraft {
  pub fn into_new_document(self, user_id: Uuid) -> NewDocument {
    NewDocument {
      user_id,
      document_type: self.document_type,
      title: self.title,
      fields_data: self.fields_data,
    }
  }
}

fn is_blank(value: Option<&String>) -> bool {
  value.map_or(true, |v| v.trim().is_empty())
}

/// Required fields with no value. Whitespace-only counts as no value.
pub fn missing_required<'a>(
  fields: &'a [FieldDescriptor],
  values: &FieldValues,
) -> Vec<&'a FieldDescriptor> {
  fields
    .iter()
    .filter(|f| f.required && is_blank(values.get(f.name)))
    .collect()
}

fn value_matches_kind(kind: InputKind, value: &str) -> bool {
  match kind {
    InputKind::Text | InputKind::Textarea => true,
    InputKind::Number => value.parse::<f64>().map_or(false, f64::is_finite),
    InputKind::Date => NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok(),
  }
}

/// Check a form submission against its template.
///
/// Values for fields the template does not declare are dropped, so switching
/// templates halfway through filling the form cannot leak stale values into
/// the stored record.
pub fn validate_submission(
  doc_type: Option<DocumentType>,
  values: &FieldValues,
) -> Result<DocumentDraft, FormError> {
  let document_type = doc_type.ok_or(FormError::NoDocumentType)?;
  let fields = fields_for(document_type);

  let missing = missing_required(fields, values);
  if !missing.is_empty() {
    return Err(FormError::MissingFields(
      missing.iter().map(|f| f.name).collect(),
    ));
  }

  let mut fields_data = FieldValues::new();
  for field in fields {
    let Some(value) = values.get(field.name) else {
      continue;
    };
    let value = value.trim();
    if value.is_empty() {
      continue;
    }
    if !value_matches_kind(field.kind, value) {
      return Err(FormError::InvalidValue {
        field: field.name,
        label: field.label,
      });
    }
    fields_data.insert(field.name.to_string(), value.to_string());
  }

  let title = fields_data
    .get("titulo")
    .cloned()
    .unwrap_or_else(|| UNTITLED.to_string());

  Ok(DocumentDraft {
    document_type,
    title,
    fields_data,
  })
}

/// Same as [`validate_submission`] but starting from the raw tag sent by a
/// client.
pub fn validate_request(
  doc_type: Option<&str>,
  values: &FieldValues,
) -> Result<DocumentDraft, FormError> {
  let parsed = match doc_type.map(str::trim).filter(|t| !t.is_empty()) {
    None => None,
    Some(tag) => Some(
      tag
        .parse::<DocumentType>()
        .map_err(|e| FormError::UnknownDocumentType(e.0))?,
    ),
  };
  validate_submission(parsed, values)
}
