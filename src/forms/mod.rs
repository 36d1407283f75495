//! Per-template form schema and the checks run before a document is saved.

mod fields;
mod validate;

pub use fields::{fields_for, find_field, FieldDescriptor, InputKind};
pub use validate::{
  missing_required, validate_request, validate_submission, DocumentDraft, FormError, UNTITLED,
};
