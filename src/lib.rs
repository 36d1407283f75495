// Shared between the server and the WASM UI
pub mod forms;
pub mod glossary;
pub mod types;
pub mod web;

// Server-side modules (only compiled with server feature)
#[cfg(feature = "server")]
pub mod api;
#[cfg(feature = "server")]
pub mod cli;
#[cfg(feature = "server")]
pub mod db;
#[cfg(feature = "server")]
pub mod server;
