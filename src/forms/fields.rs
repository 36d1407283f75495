//! Field schema for every document template.

use serde::Serialize;

use crate::types::DocumentType;

/// How a field is rendered and what its value must look like.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
  Text,
  Number,
  Textarea,
  Date,
}

impl InputKind {
  /// The `type` attribute of the `<input>` element. Textareas have none.
  pub fn html_type(&self) -> Option<&'static str> {
    match self {
      Self::Text => Some("text"),
      Self::Number => Some("number"),
      Self::Date => Some("date"),
      Self::Textarea => None,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldDescriptor {
  pub name: &'static str,
  pub label: &'static str,
  pub kind: InputKind,
  pub required: bool,
}

const fn required(name: &'static str, label: &'static str, kind: InputKind) -> FieldDescriptor {
  FieldDescriptor {
    name,
    label,
    kind,
    required: true,
  }
}

use InputKind::{Date, Number, Text, Textarea};

/// Parties and title shared by every contract template.
const CONTRACT_FIELDS: [FieldDescriptor; 5] = [
  required("titulo", "Título del Documento", Text),
  required("parte1_nombre", "Nombre Parte 1", Text),
  required("parte1_identificacion", "Identificación Parte 1", Text),
  required("parte2_nombre", "Nombre Parte 2", Text),
  required("parte2_identificacion", "Identificación Parte 2", Text),
];

static LEASE: [FieldDescriptor; 9] = [
  CONTRACT_FIELDS[0],
  CONTRACT_FIELDS[1],
  CONTRACT_FIELDS[2],
  CONTRACT_FIELDS[3],
  CONTRACT_FIELDS[4],
  required("direccion_inmueble", "Dirección del Inmueble", Text),
  required("canon_mensual", "Canon Mensual", Number),
  required("duracion_meses", "Duración (meses)", Number),
  required("deposito_garantia", "Depósito de Garantía", Number),
];

static SERVICES: [FieldDescriptor; 8] = [
  CONTRACT_FIELDS[0],
  CONTRACT_FIELDS[1],
  CONTRACT_FIELDS[2],
  CONTRACT_FIELDS[3],
  CONTRACT_FIELDS[4],
  required("descripcion_servicio", "Descripción del Servicio", Textarea),
  required("valor_total", "Valor Total", Number),
  required("plazo_entrega", "Plazo de Entrega (días)", Number),
];

static CONFIDENTIALITY: [FieldDescriptor; 7] = [
  CONTRACT_FIELDS[0],
  CONTRACT_FIELDS[1],
  CONTRACT_FIELDS[2],
  CONTRACT_FIELDS[3],
  CONTRACT_FIELDS[4],
  required(
    "informacion_confidencial",
    "Descripción de Información Confidencial",
    Textarea,
  ),
  required("duracion_anos", "Duración (años)", Number),
];

// A complaint has a complainant and an accused party instead of two
// contracting parties.
static COMPLAINT: [FieldDescriptor; 7] = [
  required("titulo", "Título de la Denuncia", Text),
  required("denunciante_nombre", "Nombre del Denunciante", Text),
  required(
    "denunciante_identificacion",
    "Identificación del Denunciante",
    Text,
  ),
  required("denunciado_nombre", "Nombre del Denunciado", Text),
  required("hechos", "Descripción de los Hechos", Textarea),
  required("fecha_hechos", "Fecha de los Hechos", Date),
  required("lugar_hechos", "Lugar de los Hechos", Text),
];

static SALE: [FieldDescriptor; 8] = [
  CONTRACT_FIELDS[0],
  CONTRACT_FIELDS[1],
  CONTRACT_FIELDS[2],
  CONTRACT_FIELDS[3],
  CONTRACT_FIELDS[4],
  required("descripcion_bien", "Descripción del Bien", Textarea),
  required("precio_venta", "Precio de Venta", Number),
  required("forma_pago", "Forma de Pago", Text),
];

/// Ordered form fields for a document type.
pub fn fields_for(doc_type: DocumentType) -> &'static [FieldDescriptor] {
  match doc_type {
    DocumentType::Lease => &LEASE,
    DocumentType::Services => &SERVICES,
    DocumentType::Confidentiality => &CONFIDENTIALITY,
    DocumentType::Complaint => &COMPLAINT,
    DocumentType::Sale => &SALE,
  }
}

/// Look up a single field of a template by name.
pub fn find_field(doc_type: DocumentType, name: &str) -> Option<&'static FieldDescriptor> {
  fields_for(doc_type).iter().find(|f| f.name == name)
}
