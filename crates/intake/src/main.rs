use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use intake::cli::{commands, SubmitArgs};
use intake::{IntakeConfig, Language};

#[derive(Parser)]
#[command(name = "intake")]
#[command(about = "Massage Philosophy client intake\nRecord client intake forms and draft treatment reports")]
#[command(version)]
struct Cli {
  /// Path to a JSON config file
  #[arg(long, global = true, env = "INTAKE_CONFIG")]
  config: Option<PathBuf>,

  /// Show debug logging
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Submit a completed intake form
  Submit {
    #[command(flatten)]
    form: SubmitArgs,
  },
  /// List stored records, newest first
  List {
    /// Show clinical details for each record
    #[arg(short, long)]
    details: bool,
  },
  /// Show one record with its report
  Show {
    /// Record id
    id: String,
  },
  /// Generate or regenerate the AI treatment report for a record
  Report {
    /// Record id
    id: String,
    /// Staff language (en or zh)
    #[arg(long)]
    lang: Option<Language>,
  },
  /// Delete every stored record
  Clear {
    /// Skip confirmation prompt
    #[arg(short, long)]
    force: bool,
  },
  /// Print the effective configuration
  Config,
}

async fn handle(command: Command, config: IntakeConfig) -> Result<()> {
  if let Command::Config = command {
    return commands::show_config(&config);
  }

  let mut controller = intake::open_controller(&config);
  match command {
    Command::Submit { form } => commands::submit(&mut controller, &form),
    Command::List { details } => commands::list_records(&controller, details),
    Command::Show { id } => commands::show_record(&controller, &id),
    Command::Report { id, lang } => commands::generate_report(&mut controller, &id, lang).await,
    Command::Clear { force } => commands::clear_records(&mut controller, force),
    Command::Config => Ok(()),
  }
}

#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();

  let filter = if cli.verbose { EnvFilter::new("intake=debug,warn") } else { EnvFilter::new("warn") };
  tracing_subscriber::registry().with(fmt::layer().with_writer(std::io::stderr)).with(filter).init();

  let config = IntakeConfig::load(cli.config.as_deref())?;
  if cli.verbose {
    herald::debug(&format!("Using data directory {}", config.data_dir.display()));
  }
  handle(cli.command, config).await
}
