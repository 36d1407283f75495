use crate::types::NewLegalTerm;

const SEED: &[(&str, &str, &str)] = &[
  (
    "Arras",
    "Suma de dinero que una parte entrega a la otra como garantía del cumplimiento de un contrato o como parte del precio.",
    "Contratos",
  ),
  (
    "Canon de arrendamiento",
    "Precio periódico que el arrendatario paga al arrendador por el uso y goce del inmueble.",
    "Arrendamiento",
  ),
  (
    "Cláusula penal",
    "Estipulación por la cual una parte se obliga a pagar una suma determinada en caso de incumplir sus obligaciones.",
    "Contratos",
  ),
  (
    "Cláusula de confidencialidad",
    "Pacto por el que las partes se obligan a no divulgar la información reservada a la que tengan acceso.",
    "Confidencialidad",
  ),
  (
    "Compraventa",
    "Contrato en el que una parte se obliga a dar una cosa y la otra a pagarla en dinero.",
    "Compraventa",
  ),
  (
    "Denuncia",
    "Acto por el cual se pone en conocimiento de la autoridad la comisión de un hecho que puede constituir delito.",
    "Derecho penal",
  ),
  (
    "Depósito de garantía",
    "Suma que entrega el arrendatario para respaldar el pago de daños o cánones pendientes al terminar el contrato.",
    "Arrendamiento",
  ),
  (
    "Fuerza mayor",
    "Imprevisto al que no es posible resistir y que exime de responsabilidad por el incumplimiento.",
    "Obligaciones",
  ),
  (
    "Incumplimiento",
    "Falta de ejecución total, parcial o tardía de una obligación contractual.",
    "Obligaciones",
  ),
  (
    "Información confidencial",
    "Datos técnicos, comerciales o personales que una parte revela a otra bajo deber de reserva.",
    "Confidencialidad",
  ),
  (
    "Obligación solidaria",
    "Aquella en la que cada deudor puede ser exigido por la totalidad de la deuda.",
    "Obligaciones",
  ),
  (
    "Prestación de servicios",
    "Contrato por el cual una persona se obliga a realizar una actividad a favor de otra a cambio de un precio.",
    "Servicios",
  ),
  (
    "Saneamiento por evicción",
    "Obligación del vendedor de amparar al comprador en el dominio y posesión pacífica de la cosa vendida.",
    "Compraventa",
  ),
  (
    "Vicios ocultos",
    "Defectos de la cosa vendida, no aparentes al momento de la entrega, que la hacen impropia para su uso.",
    "Compraventa",
  ),
];

/// Built-in glossary loaded into an empty `legal_terms` table.
pub fn seed_terms() -> Vec<NewLegalTerm> {
  SEED
    .iter()
    .map(|(term, definition, category)| NewLegalTerm::new(term, definition, category))
    .collect()
}
