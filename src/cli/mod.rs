//! The `legaldocs` operator tool.

mod commands;

pub use commands::{
  parse_terms_file, run, CliArgs, Commands, DocumentsAction, OutputFormat, TermsAction,
  UsersAction,
};
