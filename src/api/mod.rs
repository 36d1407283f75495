//! JSON API consumed by the web UI.

pub mod auth;
mod error;
mod routes;
mod server;

pub use error::{AppError, NOT_AUTHENTICATED};
pub use routes::CurrentUser;
pub use server::{router, ApiServer, AppState};
