//! Screen state for the web UI, kept free of any browser dependency so it can
//! be exercised by plain unit tests.

use chrono::{DateTime, Datelike, Utc};
use uuid::Uuid;

use crate::forms::{fields_for, validate_submission, FieldDescriptor};
use crate::glossary::{filter_terms, sort_terms};
use crate::types::{CreateDocumentRequest, DocumentRecord, DocumentType, FieldValues, LegalTerm};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NoticeVariant {
  #[default]
  Default,
  Destructive,
}

/// A transient toast message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
  pub title: String,
  pub description: String,
  pub variant: NoticeVariant,
}

impl Notice {
  pub fn info(title: &str, description: &str) -> Self {
    Self {
      title: title.to_string(),
      description: description.to_string(),
      variant: NoticeVariant::Default,
    }
  }

  /// Error toast showing `message`, or `fallback` when the message is blank.
  pub fn error(message: &str, fallback: &str) -> Self {
    let description = if message.trim().is_empty() {
      fallback
    } else {
      message
    };
    Self {
      title: "Error".to_string(),
      description: description.to_string(),
      variant: NoticeVariant::Destructive,
    }
  }
}

// =============================================================================
// Create screen
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct CreateForm {
  selected: Option<DocumentType>,
  values: FieldValues,
  loading: bool,
}

impl CreateForm {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn selected(&self) -> Option<DocumentType> {
    self.selected
  }

  pub fn loading(&self) -> bool {
    self.loading
  }

  /// Values typed so far are kept across type changes; fields the new type
  /// does not declare are dropped at submit time.
  pub fn select_type(&mut self, doc_type: Option<DocumentType>) {
    self.selected = doc_type;
  }

  pub fn set_value(&mut self, name: &str, value: &str) {
    self.values.insert(name.to_string(), value.to_string());
  }

  pub fn value(&self, name: &str) -> &str {
    self.values.get(name).map(String::as_str).unwrap_or("")
  }

  /// Exactly the fields of the selected type, none before a type is picked.
  pub fn visible_fields(&self) -> &'static [FieldDescriptor] {
    self.selected.map(fields_for).unwrap_or(&[])
  }

  /// Validate and, on success, enter the loading state. The caller sends
  /// the returned request and reports back through [`Self::finish_submit`].
  pub fn begin_submit(&mut self) -> Result<CreateDocumentRequest, Notice> {
    if self.loading {
      return Err(Notice::error("", "Ya se está generando un documento"));
    }
    let draft =
      validate_submission(self.selected, &self.values).map_err(|e| Notice::error(&e.to_string(), ""))?;
    self.loading = true;
    Ok(CreateDocumentRequest {
      document_type: Some(draft.document_type.as_str().to_string()),
      fields_data: draft.fields_data,
    })
  }

  pub fn finish_submit(&mut self, result: Result<(), String>) -> Notice {
    self.loading = false;
    match result {
      Ok(()) => {
        self.values.clear();
        self.selected = None;
        Notice::info(
          "Documento generado",
          "El documento se ha creado correctamente. La generación del PDF estará disponible pronto.",
        )
      }
      Err(msg) => Notice::error(&msg, "Error al generar el documento"),
    }
  }
}

// =============================================================================
// History screen
// =============================================================================

/// The user's documents. Every fetch gets a ticket; a response is applied
/// only if no later fetch has already been applied.
#[derive(Debug, Clone)]
pub struct HistoryView {
  rows: Vec<DocumentRecord>,
  issued: u64,
  applied: u64,
  loading: bool,
}

impl Default for HistoryView {
  fn default() -> Self {
    Self::new()
  }
}

impl HistoryView {
  /// Starts in the loading state; the screen issues its first fetch on mount.
  pub fn new() -> Self {
    Self {
      rows: Vec::new(),
      issued: 0,
      applied: 0,
      loading: true,
    }
  }

  pub fn rows(&self) -> &[DocumentRecord] {
    &self.rows
  }

  pub fn loading(&self) -> bool {
    self.loading
  }

  pub fn is_empty(&self) -> bool {
    self.rows.is_empty()
  }

  /// Start a fetch and return its ticket
  pub fn begin_load(&mut self) -> u64 {
    self.issued += 1;
    self.loading = true;
    self.issued
  }

  pub fn loaded(
    &mut self,
    ticket: u64,
    result: Result<Vec<DocumentRecord>, String>,
  ) -> Option<Notice> {
    if ticket == self.issued {
      self.loading = false;
    }
    match result {
      Ok(rows) => {
        if ticket > self.applied {
          self.rows = rows;
          self.applied = ticket;
        }
        None
      }
      Err(msg) => Some(Notice::error(&msg, "Error al cargar documentos")),
    }
  }

  /// Apply the outcome of a delete call. A successful delete removes the row
  /// right away; the caller should then refresh.
  pub fn deleted(&mut self, id: Uuid, result: Result<(), String>) -> Notice {
    match result {
      Ok(()) => {
        self.rows.retain(|d| d.id != id);
        Notice::info(
          "Documento eliminado",
          "El documento se ha eliminado correctamente",
        )
      }
      Err(msg) => Notice::error(&msg, "Error al eliminar documento"),
    }
  }
}

// =============================================================================
// Glossary screen
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct GlossaryView {
  terms: Vec<LegalTerm>,
  pub search: String,
  loading: bool,
}

impl GlossaryView {
  pub fn new() -> Self {
    Self {
      loading: true,
      ..Self::default()
    }
  }

  pub fn loading(&self) -> bool {
    self.loading
  }

  pub fn loaded(&mut self, result: Result<Vec<LegalTerm>, String>) -> Option<Notice> {
    self.loading = false;
    match result {
      Ok(mut terms) => {
        sort_terms(&mut terms);
        self.terms = terms;
        None
      }
      Err(msg) => Some(Notice::error(&msg, "Error al cargar términos legales")),
    }
  }

  pub fn visible(&self) -> Vec<&LegalTerm> {
    filter_terms(&self.terms, &self.search)
  }
}

// =============================================================================
// Formatting
// =============================================================================

const MONTHS: [&str; 12] = [
  "enero",
  "febrero",
  "marzo",
  "abril",
  "mayo",
  "junio",
  "julio",
  "agosto",
  "septiembre",
  "octubre",
  "noviembre",
  "diciembre",
];

/// "5 de marzo, 2025"
pub fn format_spanish_date(ts: DateTime<Utc>) -> String {
  let month = MONTHS[ts.month0() as usize];
  format!("{} de {}, {}", ts.day(), month, ts.year())
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::TimeZone;

  fn record(title: &str) -> DocumentRecord {
    DocumentRecord {
      id: Uuid::new_v4(),
      user_id: Uuid::nil(),
      document_type: DocumentType::Sale,
      title: title.to_string(),
      fields_data: FieldValues::new(),
      created_at: Utc::now(),
      file_url: None,
    }
  }

  fn fill(form: &mut CreateForm) {
    for field in form.visible_fields() {
      let value = match field.kind {
        crate::forms::InputKind::Number => "100",
        crate::forms::InputKind::Date => "2025-03-05",
        _ => "valor",
      };
      form.set_value(field.name, value);
    }
  }

  #[test]
  fn test_no_fields_until_type_selected() {
    let mut form = CreateForm::new();
    assert!(form.visible_fields().is_empty());

    form.select_type(Some(DocumentType::Complaint));
    let names: Vec<_> = form.visible_fields().iter().map(|f| f.name).collect();
    assert_eq!(names, fields_for(DocumentType::Complaint).iter().map(|f| f.name).collect::<Vec<_>>());
  }

  #[test]
  fn test_submit_without_type() {
    let mut form = CreateForm::new();
    let notice = form.begin_submit().unwrap_err();
    assert_eq!(notice.description, "Por favor selecciona un tipo de documento");
    assert_eq!(notice.variant, NoticeVariant::Destructive);
    assert!(!form.loading());
  }

  #[test]
  fn test_submit_with_missing_field_is_blocked() {
    let mut form = CreateForm::new();
    form.select_type(Some(DocumentType::Lease));
    fill(&mut form);
    form.set_value("canon_mensual", "  ");

    let notice = form.begin_submit().unwrap_err();
    assert_eq!(
      notice.description,
      "Por favor completa todos los campos obligatorios"
    );
    assert!(!form.loading());
  }

  #[test]
  fn test_successful_submit_resets_form() {
    let mut form = CreateForm::new();
    form.select_type(Some(DocumentType::Services));
    fill(&mut form);
    form.set_value("titulo", "Soporte anual");

    let req = form.begin_submit().unwrap();
    assert_eq!(req.document_type.as_deref(), Some("servicios"));
    assert_eq!(req.fields_data.get("titulo").unwrap(), "Soporte anual");
    assert!(form.loading());
    assert!(form.begin_submit().is_err());

    let notice = form.finish_submit(Ok(()));
    assert_eq!(notice.title, "Documento generado");
    assert!(!form.loading());
    assert_eq!(form.selected(), None);
    assert_eq!(form.value("titulo"), "");
  }

  #[test]
  fn test_failed_submit_keeps_values() {
    let mut form = CreateForm::new();
    form.select_type(Some(DocumentType::Confidentiality));
    fill(&mut form);
    form.begin_submit().unwrap();

    let notice = form.finish_submit(Err(String::new()));
    assert_eq!(notice.description, "Error al generar el documento");
    assert_eq!(form.selected(), Some(DocumentType::Confidentiality));
    assert_eq!(form.value("titulo"), "valor");
  }

  #[test]
  fn test_delete_removes_row_immediately() {
    let mut view = HistoryView::new();
    let ticket = view.begin_load();
    let a = record("A");
    let b = record("B");
    let a_id = a.id;
    view.loaded(ticket, Ok(vec![a, b]));

    let notice = view.deleted(a_id, Ok(()));
    assert_eq!(notice.title, "Documento eliminado");
    assert_eq!(view.rows().len(), 1);
    assert_eq!(view.rows()[0].title, "B");
  }

  #[test]
  fn test_failed_delete_keeps_row() {
    let mut view = HistoryView::new();
    let ticket = view.begin_load();
    let a = record("A");
    let a_id = a.id;
    view.loaded(ticket, Ok(vec![a]));

    let notice = view.deleted(a_id, Err("Documento no encontrado".into()));
    assert_eq!(notice.description, "Documento no encontrado");
    assert_eq!(view.rows().len(), 1);
  }

  #[test]
  fn test_history_starts_loading() {
    let mut view = HistoryView::new();
    assert!(view.loading());
    assert!(view.is_empty());

    let ticket = view.begin_load();
    view.loaded(ticket, Ok(Vec::new()));
    assert!(!view.loading());
    assert!(view.is_empty());
  }

  #[test]
  fn test_stale_fetch_is_ignored() {
    let mut view = HistoryView::new();
    let first = view.begin_load();
    let second = view.begin_load();

    view.loaded(second, Ok(vec![record("nuevo")]));
    view.loaded(first, Ok(vec![record("viejo"), record("viejo")]));

    assert_eq!(view.rows().len(), 1);
    assert_eq!(view.rows()[0].title, "nuevo");
    assert!(!view.loading());
  }

  #[test]
  fn test_glossary_sorted_and_filtered() {
    let mut view = GlossaryView::new();
    assert!(view.loading());
    let term = |t: &str, c: &str| LegalTerm {
      id: Uuid::new_v4(),
      term: t.to_string(),
      definition: "definición".to_string(),
      category: c.to_string(),
    };
    view.loaded(Ok(vec![term("Usufructo", "Civil"), term("Arras", "Contratos")]));
    assert!(!view.loading());

    let all: Vec<_> = view.visible().iter().map(|t| t.term.as_str()).collect();
    assert_eq!(all, vec!["Arras", "Usufructo"]);

    view.search = "CIVIL".to_string();
    let hits: Vec<_> = view.visible().iter().map(|t| t.term.as_str()).collect();
    assert_eq!(hits, vec!["Usufructo"]);
  }

  #[test]
  fn test_spanish_date() {
    let ts = Utc.with_ymd_and_hms(2025, 3, 5, 23, 59, 0).unwrap();
    assert_eq!(format_spanish_date(ts), "5 de marzo, 2025");
    let ts = Utc.with_ymd_and_hms(2024, 12, 31, 0, 0, 0).unwrap();
    assert_eq!(format_spanish_date(ts), "31 de diciembre, 2024");
  }
}
