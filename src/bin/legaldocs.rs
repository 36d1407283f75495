use clap::Parser;
use colored::Colorize;
use legaldocs::cli::{run, CliArgs};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
  let args = CliArgs::parse();

  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
    )
    .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
    .init();

  if let Err(e) = run(args).await {
    eprintln!("{}: {:#}", "Error".red(), e);
    std::process::exit(1);
  }
}
