//! Command-line surface for front-desk and staff use

pub mod commands;
pub mod display;

use clap::Args;

/// Every intake form field as a flag
#[derive(Args, Debug, Default, Clone)]
pub struct SubmitArgs {
  /// Client name
  #[arg(long, default_value = "")]
  pub name: String,
  #[arg(long, default_value = "")]
  pub email: String,
  #[arg(long, default_value = "")]
  pub insurance: String,
  /// Pain area (repeat for up to three)
  #[arg(long = "pain-area")]
  pub pain_areas: Vec<String>,
  #[arg(long, default_value = "")]
  pub pain_side: String,
  /// How long the pain has been present
  #[arg(long, default_value = "")]
  pub duration: String,
  /// Kind of pain, e.g. dull or sharp (repeatable)
  #[arg(long = "pain-desc")]
  pub pain_descs: Vec<String>,
  /// Pain level from 0 to 10
  #[arg(long)]
  pub pain_level: Option<u8>,
  /// Daily activity or occupation
  #[arg(long, default_value = "")]
  pub activity: String,
  /// Hours spent sitting per day
  #[arg(long)]
  pub sitting: Option<String>,
  /// Goal for today's session (repeatable)
  #[arg(long = "goal")]
  pub goals: Vec<String>,
  #[arg(long, default_value = "")]
  pub notes: String,
  /// Client consents to treatment
  #[arg(long)]
  pub consent: bool,
}
