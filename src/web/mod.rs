//! Browser UI: the create, history, and glossary screens.

pub mod model;

#[cfg(feature = "csr")]
pub mod apiclient;
#[cfg(feature = "csr")]
pub mod components;
#[cfg(feature = "csr")]
pub mod state;
