use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Glossary entry. The web application only ever reads these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalTerm {
  pub id: Uuid,
  pub term: String,
  pub definition: String,
  pub category: String,
}

/// Glossary entry as written by the seeding and import paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLegalTerm {
  pub term: String,
  pub definition: String,
  pub category: String,
}

impl NewLegalTerm {
  pub fn new(term: &str, definition: &str, category: &str) -> Self {
    Self {
      term: term.to_string(),
      definition: definition.to_string(),
      category: category.to_string(),
    }
  }
}
