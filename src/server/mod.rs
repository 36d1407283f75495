mod config;
mod daemon;

pub use config::{
  expand_env_vars, AuthSection, BackendType, GlossarySection, LoggingSection, PostgresSection,
  ServerConfig, ServerSection, SqliteSection, CONFIG_FILES, MAX_SESSION_TTL_DAYS,
};
pub use daemon::{open_backend, seed_glossary_if_empty, Daemon};
