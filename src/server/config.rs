use serde::{Deserialize, Serialize};
use std::path::Path;

/// Config file names probed in the working directory, in order.
pub const CONFIG_FILES: [&str; 2] = ["legaldocs.yaml", "legaldocs.yml"];

/// Upper bound for `auth.session_ttl_days` (ten years).
pub const MAX_SESSION_TTL_DAYS: u32 = 3650;

/// Replace `$NAME` and `${NAME}` with the value of the environment variable.
/// Unset variables expand to an empty string.
pub fn expand_env_vars(input: &str) -> String {
  let mut out = String::with_capacity(input.len());
  let mut chars = input.char_indices().peekable();

  while let Some((i, c)) = chars.next() {
    if c != '$' {
      out.push(c);
      continue;
    }

    let rest = &input[i + 1..];
    if let Some(braced) = rest.strip_prefix('{') {
      if let Some(end) = braced.find('}') {
        out.push_str(&std::env::var(&braced[..end]).unwrap_or_default());
        // Skip `{NAME}`
        for (_, ch) in chars.by_ref() {
          if ch == '}' {
            break;
          }
        }
        continue;
      }
      out.push(c);
      continue;
    }

    let len = rest
      .chars()
      .take_while(|ch| ch.is_ascii_alphanumeric() || *ch == '_')
      .count();
    if len == 0 {
      out.push(c);
      continue;
    }
    out.push_str(&std::env::var(&rest[..len]).unwrap_or_default());
    for _ in 0..len {
      chars.next();
    }
  }

  out
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendType {
  Postgres,
  #[default]
  Sqlite,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
  #[serde(default)]
  pub server: ServerSection,
  #[serde(default)]
  pub backend: BackendType,
  #[serde(default)]
  pub postgres: PostgresSection,
  #[serde(default)]
  pub sqlite: SqliteSection,
  #[serde(default)]
  pub logging: LoggingSection,
  #[serde(default)]
  pub auth: AuthSection,
  #[serde(default)]
  pub glossary: GlossarySection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSection {
  #[serde(default = "default_host")]
  pub host: String,
  #[serde(default = "default_port")]
  pub port: u16,
  /// Origins allowed to call the API from a browser.
  /// `["*"]` (or an empty list) allows any origin.
  #[serde(default = "default_cors_origins")]
  pub cors_origins: Vec<String>,
  /// Directory holding the built web UI (`index.html` plus the WASM bundle)
  #[serde(default = "default_static_dir")]
  pub static_dir: String,
}

fn default_host() -> String {
  "0.0.0.0".into()
}
fn default_port() -> u16 {
  8080
}
fn default_cors_origins() -> Vec<String> {
  vec!["*".to_string()]
}
fn default_static_dir() -> String {
  "target/web".into()
}

impl Default for ServerSection {
  fn default() -> Self {
    Self {
      host: default_host(),
      port: default_port(),
      cors_origins: default_cors_origins(),
      static_dir: default_static_dir(),
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostgresSection {
  #[serde(default = "default_pg_url")]
  pub url: String,
  #[serde(default = "default_max_conn")]
  pub max_connections: usize,
}
fn default_pg_url() -> String {
  "postgres://localhost/legaldocs".into()
}
fn default_max_conn() -> usize {
  16
}
impl Default for PostgresSection {
  fn default() -> Self {
    Self {
      url: default_pg_url(),
      max_connections: default_max_conn(),
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqliteSection {
  #[serde(default = "default_sqlite_path")]
  pub path: String,
}
fn default_sqlite_path() -> String {
  "legaldocs.db".into()
}
impl Default for SqliteSection {
  fn default() -> Self {
    Self {
      path: default_sqlite_path(),
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSection {
  #[serde(default = "default_level")]
  pub level: String,
}
fn default_level() -> String {
  "info".into()
}
impl Default for LoggingSection {
  fn default() -> Self {
    Self {
      level: default_level(),
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSection {
  /// Lifetime of a login session
  #[serde(default = "default_session_ttl_days")]
  pub session_ttl_days: u32,
  /// Whether `POST /api/auth/signup` creates accounts. When off, accounts
  /// are created with the `legaldocs users add` command.
  #[serde(default = "default_true")]
  pub allow_signup: bool,
}
fn default_session_ttl_days() -> u32 {
  30
}
fn default_true() -> bool {
  true
}
impl Default for AuthSection {
  fn default() -> Self {
    Self {
      session_ttl_days: default_session_ttl_days(),
      allow_signup: true,
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlossarySection {
  /// Load the built-in glossary when the `legal_terms` table is empty
  #[serde(default = "default_true")]
  pub seed: bool,
}
impl Default for GlossarySection {
  fn default() -> Self {
    Self { seed: true }
  }
}

impl ServerConfig {
  pub fn from_file(path: impl AsRef<Path>) -> Result<Self, anyhow::Error> {
    let content = std::fs::read_to_string(&path)?;
    Self::from_yaml(&content)
  }

  pub fn from_yaml(content: &str) -> Result<Self, anyhow::Error> {
    Ok(serde_yaml::from_str(&expand_env_vars(content))?)
  }

  pub fn find_and_load() -> Result<Option<Self>, anyhow::Error> {
    for p in CONFIG_FILES {
      if Path::new(p).exists() {
        tracing::info!("Loading config from {}", p);
        return Ok(Some(Self::from_file(p)?));
      }
    }
    Ok(None)
  }

  /// Explicit path if given, otherwise the first config file found, otherwise
  /// defaults.
  pub fn load(path: Option<&str>) -> Result<Self, anyhow::Error> {
    match path {
      Some(p) => Self::from_file(p),
      None => Ok(Self::find_and_load()?.unwrap_or_default()),
    }
  }

  pub fn address(&self) -> String {
    format!("{}:{}", self.server.host, self.server.port)
  }

  /// Session lifetime, clamped to 1..=[`MAX_SESSION_TTL_DAYS`] days.
  pub fn session_ttl(&self) -> chrono::Duration {
    let days = self.auth.session_ttl_days.clamp(1, MAX_SESSION_TTL_DAYS);
    chrono::Duration::days(i64::from(days))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_expand_braced_and_bare() {
    std::env::set_var("LEGALDOCS_TEST_HOST", "db.internal");
    std::env::set_var("LEGALDOCS_TEST_PORT", "5433");
    let out = expand_env_vars("postgres://${LEGALDOCS_TEST_HOST}:$LEGALDOCS_TEST_PORT/app");
    assert_eq!(out, "postgres://db.internal:5433/app");
  }

  #[test]
  fn test_expand_leaves_lone_dollar() {
    assert_eq!(expand_env_vars("cost: $ 5"), "cost: $ 5");
    assert_eq!(expand_env_vars("open ${brace"), "open ${brace");
  }

  #[test]
  fn test_expand_unset_is_empty() {
    std::env::remove_var("LEGALDOCS_TEST_UNSET");
    assert_eq!(expand_env_vars("[${LEGALDOCS_TEST_UNSET}]"), "[]");
  }

  #[test]
  fn test_expand_multibyte_braced_name() {
    std::env::set_var("LEGALDOCS_TEST_Á", "x");
    assert_eq!(expand_env_vars("${LEGALDOCS_TEST_Á}tail"), "xtail");
    assert_eq!(expand_env_vars("a${LEGALDOCS_TEST_Á}ñb"), "axñb");
  }

  #[test]
  fn test_expand_keeps_multibyte_text() {
    std::env::set_var("LEGALDOCS_TEST_CITY", "Bogotá");
    assert_eq!(
      expand_env_vars("ciudad: $LEGALDOCS_TEST_CITY, año"),
      "ciudad: Bogotá, año"
    );
  }
}
