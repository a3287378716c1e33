//! Submitted intake records

use chrono::Local;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::form::IntakeForm;

/// Format of [`ClientRecord::timestamp`]
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A snapshot of a submitted form.
///
/// Only `ai_result` changes after creation; it is set when a report is
/// generated and overwritten on regeneration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientRecord {
  pub id: String,
  pub timestamp: String,
  #[serde(flatten)]
  pub form: IntakeForm,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub ai_result: Option<String>,
}

impl ClientRecord {
  /// Snapshot `form` under a fresh id and the current local time
  pub fn from_form(form: IntakeForm) -> Self {
    Self::new(new_record_id(), Local::now().format(TIMESTAMP_FORMAT).to_string(), form)
  }

  pub fn new(id: impl Into<String>, timestamp: impl Into<String>, form: IntakeForm) -> Self {
    Self { id: id.into(), timestamp: timestamp.into(), form, ai_result: None }
  }

  pub fn has_report(&self) -> bool {
    self.ai_result.is_some()
  }

  /// Copy of this record carrying `report` as its AI result
  pub fn with_report(mut self, report: impl Into<String>) -> Self {
    self.ai_result = Some(report.into());
    self
  }
}

/// Random v4 UUIDs, so rapid submissions never collide
pub fn new_record_id() -> String {
  Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::form::ListField;

  fn sample_form() -> IntakeForm {
    let mut form = IntakeForm::default();
    form.name = "Jane".to_string();
    form.toggle_multi_value(ListField::PainArea, "Lower Back");
    form.consent = true;
    form
  }

  #[test]
  fn test_from_form_assigns_id_and_timestamp() {
    let record = ClientRecord::from_form(sample_form());

    assert!(!record.id.is_empty());
    assert!(chrono::NaiveDateTime::parse_from_str(&record.timestamp, TIMESTAMP_FORMAT).is_ok());
    assert_eq!(record.form.name, "Jane");
    assert!(!record.has_report());
  }

  #[test]
  fn test_ids_are_unique() {
    let a = ClientRecord::from_form(sample_form());
    let b = ClientRecord::from_form(sample_form());
    assert_ne!(a.id, b.id);
  }

  #[test]
  fn test_json_is_flat_and_omits_missing_report() {
    let record = ClientRecord::new("r1", "2026-01-01 09:00:00", sample_form());
    let json = serde_json::to_value(&record).unwrap();

    assert_eq!(json["id"], "r1");
    assert_eq!(json["name"], "Jane");
    assert_eq!(json["painArea"], serde_json::json!(["Lower Back"]));
    assert!(json.get("aiResult").is_none());

    let with_report = record.with_report("REPORT TEXT");
    let json = serde_json::to_value(&with_report).unwrap();
    assert_eq!(json["aiResult"], "REPORT TEXT");
  }

  #[test]
  fn test_reads_records_written_by_the_web_form() {
    let stored = serde_json::json!({
      "name": "Bob", "email": "", "insurance": "", "painArea": ["Neck"],
      "painSide": "Left", "duration": "", "painDesc": [], "painLevel": "7",
      "activity": "", "sitting": "<2h", "goals": [], "notes": "", "consent": true,
      "id": "1735700000000", "timestamp": "1/1/2025, 9:00:00 AM"
    });

    let record: ClientRecord = serde_json::from_value(stored).unwrap();
    assert_eq!(record.id, "1735700000000");
    assert_eq!(record.form.pain_level, 7);
    assert_eq!(record.ai_result, None);
  }
}
