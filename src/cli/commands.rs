use clap::{Parser, Subcommand};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use std::path::PathBuf;

use crate::api::auth;
use crate::db::DatabaseBackend;
use crate::glossary::{filter_terms, seed_terms};
use crate::server::{open_backend, BackendType, ServerConfig};
use crate::types::NewLegalTerm;
use crate::web::model::format_spanish_date;

#[derive(Parser)]
#[command(name = "legaldocs", about = "LegalDocs operator tool", version)]
pub struct CliArgs {
  /// Config file (defaults to ./legaldocs.yaml if present)
  #[arg(short, long)]
  pub config: Option<String>,
  #[arg(long, env = "LEGALDOCS_PG_URL")]
  pub pg_url: Option<String>,
  #[arg(long, env = "LEGALDOCS_SQLITE_PATH")]
  pub sqlite: Option<String>,
  #[arg(long, value_enum, default_value = "table")]
  pub format: OutputFormat,
  #[command(subcommand)]
  pub command: Commands,
}

#[derive(Clone, Copy, Default, clap::ValueEnum)]
pub enum OutputFormat {
  #[default]
  Table,
  Json,
}

#[derive(Subcommand)]
pub enum Commands {
  /// Create the database schema
  Init,
  /// Manage user accounts
  Users {
    #[command(subcommand)]
    action: UsersAction,
  },
  /// Manage the legal term glossary
  Terms {
    #[command(subcommand)]
    action: TermsAction,
  },
  /// Inspect saved documents
  Documents {
    #[command(subcommand)]
    action: DocumentsAction,
  },
}

#[derive(Subcommand)]
pub enum UsersAction {
  List,
  Add {
    email: String,
    /// Prompted for when omitted
    #[arg(short, long)]
    password: Option<String>,
  },
}

#[derive(Subcommand)]
pub enum TermsAction {
  List {
    #[arg(short, long)]
    search: Option<String>,
  },
  /// Load terms from a YAML or JSON list of {term, definition, category}
  Import { file: PathBuf },
  /// Write the built-in glossary, replacing definitions of existing terms
  Seed,
}

#[derive(Subcommand)]
pub enum DocumentsAction {
  /// Documents owned by a user, newest first
  List { email: String },
}

impl CliArgs {
  /// Config file, then command-line overrides
  pub fn resolve_config(&self) -> Result<ServerConfig, anyhow::Error> {
    let mut config = ServerConfig::load(self.config.as_deref())?;
    if let Some(url) = &self.pg_url {
      config.postgres.url = url.clone();
      config.backend = BackendType::Postgres;
    }
    if let Some(path) = &self.sqlite {
      config.sqlite.path = path.clone();
      config.backend = BackendType::Sqlite;
    }
    Ok(config)
  }
}

pub async fn run(args: CliArgs) -> Result<(), anyhow::Error> {
  let config = args.resolve_config()?;
  let backend = open_backend(&config).await?;
  let backend = backend.as_ref();

  match args.command {
    Commands::Init => {
      backend.init_schema().await?;
      println!("{} Schema initialized", "✓".green());
    }
    Commands::Users { action } => run_users(backend, action, args.format).await?,
    Commands::Terms { action } => run_terms(backend, action, args.format).await?,
    Commands::Documents { action } => run_documents(backend, action, args.format).await?,
  }
  Ok(())
}

async fn run_users(
  backend: &dyn DatabaseBackend,
  action: UsersAction,
  format: OutputFormat,
) -> Result<(), anyhow::Error> {
  match action {
    UsersAction::List => {
      let users = backend.list_users().await?;
      print_rows(
        format,
        &users,
        &["ID", "EMAIL", "CREATED"],
        |u| vec![u.id.to_string(), u.email.clone(), u.created_at.to_rfc3339()],
      )?;
    }
    UsersAction::Add { email, password } => {
      let email = auth::normalize_email(&email)
        .ok_or_else(|| anyhow::anyhow!("'{}' is not a valid email address", email))?;
      if backend.get_user_by_email(&email).await?.is_some() {
        return Err(anyhow::anyhow!("User '{}' already exists", email));
      }
      let password = match password {
        Some(p) => p,
        None => prompt_password("Password: ")?,
      };
      if password.chars().count() < auth::MIN_PASSWORD_LEN {
        return Err(anyhow::anyhow!(
          "Password must be at least {} characters",
          auth::MIN_PASSWORD_LEN
        ));
      }
      let user = backend
        .create_user(&email, &auth::hash_password(&password)?)
        .await?;
      println!("{} User '{}' created ({})", "✓".green(), user.email, user.id);
    }
  }
  Ok(())
}

async fn run_terms(
  backend: &dyn DatabaseBackend,
  action: TermsAction,
  format: OutputFormat,
) -> Result<(), anyhow::Error> {
  match action {
    TermsAction::List { search } => {
      let terms = backend.list_legal_terms().await?;
      let shown = filter_terms(&terms, search.as_deref().unwrap_or(""));
      print_rows(
        format,
        &shown,
        &["TERM", "CATEGORY", "DEFINITION"],
        |t| vec![t.term.clone(), t.category.clone(), t.definition.clone()],
      )?;
    }
    TermsAction::Import { file } => {
      let content = std::fs::read_to_string(&file)?;
      let terms = parse_terms_file(&content)?;
      for term in &terms {
        backend.upsert_legal_term(term).await?;
      }
      println!(
        "{} Imported {} terms from {}",
        "✓".green(),
        terms.len(),
        file.display()
      );
    }
    TermsAction::Seed => {
      let terms = seed_terms();
      for term in &terms {
        backend.upsert_legal_term(term).await?;
      }
      println!("{} Wrote {} built-in terms", "✓".green(), terms.len());
    }
  }
  Ok(())
}

async fn run_documents(
  backend: &dyn DatabaseBackend,
  action: DocumentsAction,
  format: OutputFormat,
) -> Result<(), anyhow::Error> {
  match action {
    DocumentsAction::List { email } => {
      let email = auth::normalize_email(&email).unwrap_or(email);
      let (user, _) = backend
        .get_user_by_email(&email)
        .await?
        .ok_or_else(|| anyhow::anyhow!("No user with email '{}'", email))?;
      let docs = backend.list_documents(user.id).await?;
      print_rows(
        format,
        &docs,
        &["ID", "TYPE", "TITLE", "CREATED"],
        |d| {
          vec![
            d.id.to_string(),
            d.document_type.short_label().to_string(),
            d.title.clone(),
            format_spanish_date(d.created_at),
          ]
        },
      )?;
    }
  }
  Ok(())
}

/// Parse an import file. YAML is a superset of JSON, so both are accepted.
pub fn parse_terms_file(content: &str) -> Result<Vec<NewLegalTerm>, anyhow::Error> {
  let raw: Vec<NewLegalTerm> = serde_yaml::from_str(content)?;
  raw
    .into_iter()
    .enumerate()
    .map(|(i, t)| {
      let term = NewLegalTerm::new(t.term.trim(), t.definition.trim(), t.category.trim());
      if term.term.is_empty() || term.definition.is_empty() {
        return Err(anyhow::anyhow!(
          "Entry {} needs both a term and a definition",
          i + 1
        ));
      }
      Ok(term)
    })
    .collect()
}

fn print_rows<T: Serialize>(
  format: OutputFormat,
  rows: &[T],
  header: &[&str],
  cells: impl Fn(&T) -> Vec<String>,
) -> Result<(), anyhow::Error> {
  match format {
    OutputFormat::Json => println!("{}", serde_json::to_string_pretty(rows)?),
    OutputFormat::Table => {
      if rows.is_empty() {
        println!("{}", "(no rows)".dimmed());
        return Ok(());
      }
      let mut table = Table::new();
      table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header.to_vec());
      for row in rows {
        table.add_row(cells(row));
      }
      println!("{table}");
    }
  }
  Ok(())
}

/// Prompt for password input (hidden)
fn prompt_password(prompt: &str) -> Result<String, anyhow::Error> {
  use std::io::{self, Write};

  print!("{}", prompt);
  io::stdout().flush()?;

  #[cfg(unix)]
  {
    use std::os::unix::io::AsRawFd;
    let fd = io::stdin().as_raw_fd();

    let mut termios = unsafe { std::mem::zeroed::<libc::termios>() };
    // Not a terminal: read the line as-is
    if unsafe { libc::tcgetattr(fd, &mut termios) } != 0 {
      let mut input = String::new();
      io::stdin().read_line(&mut input)?;
      return Ok(input.trim().to_string());
    }

    let saved = termios;
    termios.c_lflag &= !libc::ECHO;
    unsafe {
      libc::tcsetattr(fd, libc::TCSANOW, &termios);
    }

    let mut input = String::new();
    let result = io::stdin().read_line(&mut input);

    unsafe {
      libc::tcsetattr(fd, libc::TCSANOW, &saved);
    }
    println!();

    result?;
    Ok(input.trim().to_string())
  }

  #[cfg(not(unix))]
  {
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
  }
}
