mod document;
mod protocol;
mod term;
mod user;

pub use document::{DocumentRecord, DocumentType, FieldValues, NewDocument, ParseDocumentTypeError};
pub use protocol::{
  CreateDocumentRequest, Credentials, DeleteResponse, DocumentTypeInfo, ErrorBody,
  SessionResponse,
};
pub use term::{LegalTerm, NewLegalTerm};
pub use user::User;
