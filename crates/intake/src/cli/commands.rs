use anyhow::{anyhow, Result};
use colored::*;
use std::io::{self, BufRead, Write};

use crate::cli::display::{detail_lines, full_record, summary_line};
use crate::cli::SubmitArgs;
use crate::config::IntakeConfig;
use crate::controller::IntakeController;
use crate::error::IntakeError;
use crate::form::{FieldValue, FormField, ListField, Toggle, MAX_PAIN_AREAS};
use crate::i18n::Language;

/// Fill the form from flags and submit it
pub fn submit(controller: &mut IntakeController, args: &SubmitArgs) -> Result<()> {
  controller.reset();

  let text_fields = [
    (FormField::Name, &args.name),
    (FormField::Email, &args.email),
    (FormField::Insurance, &args.insurance),
    (FormField::PainSide, &args.pain_side),
    (FormField::Duration, &args.duration),
    (FormField::Activity, &args.activity),
    (FormField::Notes, &args.notes),
  ];
  for (field, value) in text_fields {
    controller.set_field(field, FieldValue::Text(value.clone()))?;
  }
  if let Some(sitting) = &args.sitting {
    controller.set_field(FormField::Sitting, FieldValue::Text(sitting.clone()))?;
  }
  if let Some(level) = args.pain_level {
    controller.set_field(FormField::PainLevel, FieldValue::Level(level))?;
  }
  controller.set_field(FormField::Consent, FieldValue::Flag(args.consent))?;

  for area in &args.pain_areas {
    if controller.toggle_multi_value(ListField::PainArea, area) == Toggle::CapReached {
      herald::warn!(&format!("Only {MAX_PAIN_AREAS} pain areas can be selected; ignoring '{area}'"));
    }
  }
  for desc in &args.pain_descs {
    controller.toggle_multi_value(ListField::PainDesc, desc);
  }
  for goal in &args.goals {
    controller.toggle_multi_value(ListField::Goals, goal);
  }

  match controller.submit() {
    Ok(record) => {
      let messages = controller.language().messages();
      println!("{} {} {}", "✓".green(), messages.success, record.id.cyan());
      Ok(())
    }
    Err(IntakeError::Validation(validation)) => {
      if let Some(warning) = controller.warning() {
        herald::warn!(warning);
      }
      Err(anyhow!("Form not submitted: {validation}"))
    }
    Err(e) => Err(e.into()),
  }
}

/// Records newest first
pub fn list_records(controller: &IntakeController, details: bool) -> Result<()> {
  let language = controller.language();
  let records = controller.records();

  if records.is_empty() {
    println!("{}", language.messages().no_records);
    return Ok(());
  }

  for record in records {
    println!("{}", summary_line(record, language));
    if details {
      for line in detail_lines(record) {
        println!("    {}", line.dimmed());
      }
    }
  }
  Ok(())
}

pub fn show_record(controller: &IntakeController, id: &str) -> Result<()> {
  let record = controller.record(id).ok_or_else(|| IntakeError::record_not_found(id))?;
  println!("{}", full_record(record, controller.language()));
  Ok(())
}

/// Generate or regenerate the report for one record and print it
pub async fn generate_report(
  controller: &mut IntakeController,
  id: &str,
  language: Option<Language>,
) -> Result<()> {
  if let Some(language) = language {
    controller.set_language(language);
  }

  let regenerating = controller.record(id).is_some_and(|r| r.has_report());
  herald::info!(&format!(
    "{} report for {id}...",
    if regenerating { "Regenerating" } else { "Generating" }
  ));

  match controller.generate_report(id).await {
    Ok(record) => {
      herald::success!("Report saved");
      if let Some(report) = &record.ai_result {
        herald::heading(&format!("Report for {}", record.form.name));
        println!("{report}");
      }
      Ok(())
    }
    Err(IntakeError::Generation(e)) => {
      herald::error!(controller.language().messages().generation_failed);
      Err(anyhow!("Report generation failed: {e}"))
    }
    Err(e) => Err(e.into()),
  }
}

/// Remove every record, asking first unless `force`
pub fn clear_records(controller: &mut IntakeController, force: bool) -> Result<()> {
  let count = controller.records().len();
  if count == 0 {
    println!("{}", controller.language().messages().no_records);
    return Ok(());
  }

  if !force && !confirm(&format!("Clear all {count} records? [y/N] "))? {
    println!("Nothing cleared.");
    return Ok(());
  }

  controller.clear_records()?;
  println!("{} Cleared {count} records", "✓".green());
  Ok(())
}

/// Print the effective configuration with the API key masked
pub fn show_config(config: &IntakeConfig) -> Result<()> {
  println!("{}", serde_json::to_string_pretty(&config.redacted())?);
  Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
  eprint!("{prompt}");
  io::stderr().flush()?;

  let mut answer = String::new();
  io::stdin().lock().read_line(&mut answer)?;
  Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}
