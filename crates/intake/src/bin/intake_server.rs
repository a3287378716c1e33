//! Intake REST Server
//!
//! HTTP API for the intake kiosk and the staff dashboard: form submission,
//! record review and AI report generation.

use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use intake::server::startup::start_server;
use intake::IntakeConfig;

#[derive(Parser)]
#[command(name = "intake_server")]
#[command(about = "Massage Philosophy intake REST API server")]
#[command(version)]
struct Args {
  /// Server bind address, overrides the config file
  #[arg(long)]
  bind: Option<SocketAddr>,

  /// Path to a JSON config file
  #[arg(long, env = "INTAKE_CONFIG")]
  config: Option<PathBuf>,

  /// Enable verbose logging
  #[arg(short, long)]
  verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();

  let filter = if args.verbose {
    EnvFilter::new("intake=debug,herald=debug,tower_http=debug,info")
  } else {
    EnvFilter::new("intake=info,herald=info,warn")
  };
  tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

  let mut config = IntakeConfig::load(args.config.as_deref())?;
  if let Some(bind) = args.bind {
    config.bind = bind;
  }

  herald::info!(&format!("Starting intake REST server v{}", env!("CARGO_PKG_VERSION")));
  if config.api_key.is_none() {
    herald::warn!("No API key configured; report generation will fail until one is set");
  }

  start_server(&config).await
}
