//! Display formatting for records on the terminal

use colored::*;

use crate::i18n::Language;
use crate::record::ClientRecord;

/// Localized status badge for a record
pub fn status_label(record: &ClientRecord, language: Language) -> String {
  let messages = language.messages();
  if record.has_report() {
    messages.status_done.green().to_string()
  } else {
    messages.status_pending.yellow().to_string()
  }
}

/// One line per record: time, name, status, id
pub fn summary_line(record: &ClientRecord, language: Language) -> String {
  format!(
    "{}  {}  [{}]  {}",
    record.timestamp.dimmed(),
    record.form.name.bold(),
    status_label(record, language),
    record.id.cyan()
  )
}

/// The clinical fields staff scan before a session
pub fn detail_lines(record: &ClientRecord) -> Vec<String> {
  let form = &record.form;
  let or_dash = |s: &str| if s.trim().is_empty() { "-".to_string() } else { s.to_string() };

  vec![
    format!("Pain area:   {} | {} | {}/10", or_dash(&form.pain_area.join(", ")), or_dash(&form.pain_side), form.pain_level),
    format!("Duration:    {}", or_dash(&form.duration)),
    format!("Goals:       {}", or_dash(&form.goals.join(", "))),
    format!("Lifestyle:   {} (sit: {})", or_dash(&form.activity), or_dash(&form.sitting)),
    format!("Type:        {}", or_dash(&form.pain_desc.join(", "))),
  ]
}

/// Everything on file for one record, report included
pub fn full_record(record: &ClientRecord, language: Language) -> String {
  let form = &record.form;
  let mut out = vec![
    summary_line(record, language),
    format!("Email:       {}", form.email),
    format!("Insurance:   {}", form.insurance),
  ];
  out.extend(detail_lines(record));
  if !form.notes.is_empty() {
    out.push(format!("Notes:       \"{}\"", form.notes));
  }
  out.push(String::new());
  match &record.ai_result {
    Some(report) => {
      out.push("Assessment & Strategy".bold().to_string());
      out.push(report.clone());
    }
    None => out.push("Assessment pending generation.".dimmed().to_string()),
  }
  out.join("\n")
}
