use crate::i18n::Language;
use crate::record::ClientRecord;

/// Placeholder for optional fields the client left blank
const NOT_PROVIDED: &str = "N/A";

/// Render every field of `record` into the fixed report request.
///
/// The report always has the same three sections: a bilingual front-desk
/// script, an English clinical strategy and a Chinese take-home summary.
pub fn build_prompt(record: &ClientRecord, language: Language) -> String {
  format!(
    r#"Role: Senior Massage Therapy Consultant AI for "Massage Philosophy".
Task: Analyze clinical intake data and provide a structured report.
Staff interface language: {language}

Data:
{data}
CRITICAL INSTRUCTIONS:
- BE PROFESSIONAL. NO EMOJIS.
- STRICTLY SEPARATE SECTIONS BY LANGUAGE AS SPECIFIED.
- Use Clear Markdown Headers.

Report Structure Required:

1. [STAFF TALK SCRIPT / 前台沟通话术]
- BILINGUAL (English and Chinese).
- Provide a professional, empathetic 2-3 sentence script for the receptionist to use when the client arrives.
- It should acknowledge the specific pain areas mentioned and set expectations for the professional care they will receive.

2. [THERAPIST CLINICAL STRATEGY]
- ENGLISH ONLY.
- Technical analysis for the practitioner.
- Identify potential muscles involved (e.g., hypertonicity, postural patterns).
- Suggest treatment sequence (e.g., Warm up -> Myofascial Release -> Trigger Point therapy -> Passive stretching).
- Recommend session length (60/90/120 min).

3. [疗后客人总结与建议]
- CHINESE ONLY.
- Friendly summary to be given to the client AFTER the session.
- Include 1-2 specific home care suggestions (stretches, hydration, heat/cold).
"#,
    language = language.english_name(),
    data = client_data(record),
  )
}

fn client_data(record: &ClientRecord) -> String {
  let form = &record.form;
  let lines = [
    format!("Name: {} | Email: {}", form.name, or_na(&form.email)),
    format!("Insurance: {}", or_na(&form.insurance)),
    format!("Pain: {} ({})", form.pain_area.join(", "), or_na(&form.pain_side)),
    format!("Level: {}/10 | Type: {}", form.pain_level, or_na(&form.pain_desc.join(", "))),
    format!("History: {}", or_na(&form.duration)),
    format!("Lifestyle: {}, Sit {}", or_na(&form.activity), or_na(&form.sitting)),
    format!("Goal: {}", or_na(&form.goals.join(", "))),
    format!("Note: {}", or_na(&form.notes)),
  ];

  let mut data = String::new();
  for line in lines {
    data.push_str(&line);
    data.push('\n');
  }
  data
}

fn or_na(value: &str) -> &str {
  if value.trim().is_empty() {
    NOT_PROVIDED
  } else {
    value
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::form::{IntakeForm, ListField};

  fn record() -> ClientRecord {
    let mut form = IntakeForm::default();
    form.name = "Jane".into();
    form.email = "jane@example.com".into();
    form.toggle_multi_value(ListField::PainArea, "Lower Back");
    form.toggle_multi_value(ListField::PainArea, "Neck");
    form.pain_side = "Both".into();
    form.pain_level = 7;
    form.toggle_multi_value(ListField::PainDesc, "Dull");
    form.duration = "3+ months".into();
    form.activity = "Desk job".into();
    form.toggle_multi_value(ListField::Goals, "Pain relief");
    form.notes = "Worse in the morning".into();
    form.consent = true;
    ClientRecord::new("r1", "2026-10-19 09:30:00", form)
  }

  #[test]
  fn test_prompt_embeds_every_field() {
    let prompt = build_prompt(&record(), Language::En);

    for expected in [
      "Name: Jane | Email: jane@example.com",
      "Insurance: N/A",
      "Pain: Lower Back, Neck (Both)",
      "Level: 7/10 | Type: Dull",
      "History: 3+ months",
      "Lifestyle: Desk job, Sit <2h",
      "Goal: Pain relief",
      "Note: Worse in the morning",
    ] {
      assert!(prompt.contains(expected), "missing {expected:?}");
    }
  }

  #[test]
  fn test_prompt_requests_three_sections() {
    let prompt = build_prompt(&record(), Language::Zh);

    assert!(prompt.contains("1. [STAFF TALK SCRIPT / 前台沟通话术]"));
    assert!(prompt.contains("2. [THERAPIST CLINICAL STRATEGY]"));
    assert!(prompt.contains("3. [疗后客人总结与建议]"));
    assert!(prompt.contains("Staff interface language: Chinese"));
    assert!(prompt.contains("NO EMOJIS"));
  }
}
