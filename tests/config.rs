use legaldocs::server::{BackendType, ServerConfig, MAX_SESSION_TTL_DAYS};
use std::io::Write;

#[test]
fn test_defaults() {
  let config = ServerConfig::from_yaml("{}").unwrap();
  assert_eq!(config.backend, BackendType::Sqlite);
  assert_eq!(config.address(), "0.0.0.0:8080");
  assert_eq!(config.server.cors_origins, vec!["*"]);
  assert_eq!(config.server.static_dir, "target/web");
  assert_eq!(config.sqlite.path, "legaldocs.db");
  assert_eq!(config.postgres.max_connections, 16);
  assert_eq!(config.logging.level, "info");
  assert!(config.auth.allow_signup);
  assert!(config.glossary.seed);
  assert_eq!(config.session_ttl(), chrono::Duration::days(30));
}

#[test]
fn test_partial_sections_keep_defaults() {
  let yaml = r#"
server:
  port: 9090
backend: postgres
postgres:
  url: postgres://db/legal
auth:
  allow_signup: false
"#;
  let config = ServerConfig::from_yaml(yaml).unwrap();
  assert_eq!(config.address(), "0.0.0.0:9090");
  assert_eq!(config.backend, BackendType::Postgres);
  assert_eq!(config.postgres.url, "postgres://db/legal");
  assert_eq!(config.postgres.max_connections, 16);
  assert!(!config.auth.allow_signup);
  assert_eq!(config.auth.session_ttl_days, 30);
}

#[test]
fn test_session_ttl_has_floor() {
  let config = ServerConfig::from_yaml("auth:\n  session_ttl_days: 0\n").unwrap();
  assert_eq!(config.session_ttl(), chrono::Duration::days(1));
}

#[test]
fn test_session_ttl_has_ceiling() {
  let config = ServerConfig::from_yaml("auth:\n  session_ttl_days: 200000000\n").unwrap();
  assert_eq!(
    config.session_ttl(),
    chrono::Duration::days(i64::from(MAX_SESSION_TTL_DAYS))
  );
  // Expiry computed at login must not overflow
  assert!(chrono::Utc::now()
    .checked_add_signed(config.session_ttl())
    .is_some());
}

#[test]
fn test_env_vars_expanded_before_parsing() {
  std::env::set_var("LEGALDOCS_CFG_TEST_PATH", "/var/lib/legaldocs/data.db");
  let config = ServerConfig::from_yaml("sqlite:\n  path: ${LEGALDOCS_CFG_TEST_PATH}\n").unwrap();
  assert_eq!(config.sqlite.path, "/var/lib/legaldocs/data.db");
}

#[test]
fn test_unknown_backend_rejected() {
  assert!(ServerConfig::from_yaml("backend: mysql\n").is_err());
}

#[test]
fn test_from_file() {
  let mut file = tempfile::NamedTempFile::new().unwrap();
  writeln!(file, "server:\n  host: 127.0.0.1\n  port: 3000\nglossary:\n  seed: false").unwrap();

  let config = ServerConfig::from_file(file.path()).unwrap();
  assert_eq!(config.address(), "127.0.0.1:3000");
  assert!(!config.glossary.seed);

  let path = file.path().to_str().unwrap().to_string();
  let loaded = ServerConfig::load(Some(&path)).unwrap();
  assert_eq!(loaded.address(), config.address());
}

#[test]
fn test_missing_explicit_file_is_an_error() {
  assert!(ServerConfig::load(Some("/nonexistent/legaldocs.yaml")).is_err());
}
