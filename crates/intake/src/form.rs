//! The intake questionnaire and the edits a client makes to it

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::FormError;

/// Most pain areas a client may select
pub const MAX_PAIN_AREAS: usize = 3;

/// Sitting option selected when the form is fresh
pub const DEFAULT_SITTING: &str = "<2h";

/// Pain level selected when the form is fresh
pub const DEFAULT_PAIN_LEVEL: u8 = 5;

pub const MAX_PAIN_LEVEL: u8 = 10;

/// Ordered, duplicate-free selection of at most [`MAX_PAIN_AREAS`] areas.
///
/// The bound holds for every value of this type: toggling refuses to grow
/// past it, and deserializing a longer list fails.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct PainAreas(Vec<String>);

impl PainAreas {
  pub fn as_slice(&self) -> &[String] {
    &self.0
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn contains(&self, area: &str) -> bool {
    self.0.iter().any(|a| a == area)
  }

  pub fn is_full(&self) -> bool {
    self.0.len() >= MAX_PAIN_AREAS
  }

  pub fn join(&self, sep: &str) -> String {
    self.0.join(sep)
  }

  fn toggle(&mut self, area: &str) -> Toggle {
    if self.contains(area) {
      self.0.retain(|a| a != area);
      return Toggle::Removed;
    }
    if self.is_full() {
      return Toggle::CapReached;
    }
    self.0.push(area.to_string());
    Toggle::Added
  }
}

impl TryFrom<Vec<String>> for PainAreas {
  type Error = FormError;

  fn try_from(areas: Vec<String>) -> Result<Self, Self::Error> {
    let mut unique: Vec<String> = Vec::with_capacity(areas.len());
    for area in areas {
      if !unique.contains(&area) {
        unique.push(area);
      }
    }
    if unique.len() > MAX_PAIN_AREAS {
      return Err(FormError::TooManyPainAreas { count: unique.len() });
    }
    Ok(Self(unique))
  }
}

impl From<PainAreas> for Vec<String> {
  fn from(areas: PainAreas) -> Self {
    areas.0
  }
}

/// The questionnaire as the client is filling it in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IntakeForm {
  pub name: String,
  pub email: String,
  pub insurance: String,
  pub pain_area: PainAreas,
  pub pain_side: String,
  pub duration: String,
  pub pain_desc: Vec<String>,
  #[serde(deserialize_with = "pain_level_in_range")]
  pub pain_level: u8,
  pub activity: String,
  pub sitting: String,
  pub goals: Vec<String>,
  pub notes: String,
  pub consent: bool,
}

impl Default for IntakeForm {
  fn default() -> Self {
    Self {
      name: String::new(),
      email: String::new(),
      insurance: String::new(),
      pain_area: PainAreas::default(),
      pain_side: String::new(),
      duration: String::new(),
      pain_desc: Vec::new(),
      pain_level: DEFAULT_PAIN_LEVEL,
      activity: String::new(),
      sitting: DEFAULT_SITTING.to_string(),
      goals: Vec::new(),
      notes: String::new(),
      consent: false,
    }
  }
}

/// Single-valued form fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
  Name,
  Email,
  Insurance,
  PainSide,
  Duration,
  Activity,
  Sitting,
  Notes,
  PainLevel,
  Consent,
}

/// Multi-select form fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListField {
  PainArea,
  PainDesc,
  Goals,
}

/// A value written into a [`FormField`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
  Text(String),
  Level(u8),
  Flag(bool),
}

/// What a multi-select toggle did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
  Added,
  Removed,
  /// The pain-area selection is full; nothing changed
  CapReached,
}

/// Result of checking a form before submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Validation {
  Valid,
  MissingRequired,
  MissingConsent,
}

impl fmt::Display for Validation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Validation::Valid => f.write_str("form is complete"),
      Validation::MissingRequired => f.write_str("name and at least one pain area are required"),
      Validation::MissingConsent => f.write_str("consent has not been given"),
    }
  }
}

impl IntakeForm {
  /// Replace a scalar field. Content is not validated here.
  pub fn set_field(&mut self, field: FormField, value: FieldValue) -> Result<(), FormError> {
    match (field, value) {
      (FormField::PainLevel, FieldValue::Level(level)) => {
        self.pain_level = level.min(MAX_PAIN_LEVEL);
      }
      (FormField::Consent, FieldValue::Flag(consent)) => {
        self.consent = consent;
      }
      (field, FieldValue::Text(text)) => match self.text_field_mut(field) {
        Some(slot) => *slot = text,
        None => return Err(FormError::WrongValueKind { field: field.to_string() }),
      },
      (field, _) => return Err(FormError::WrongValueKind { field: field.to_string() }),
    }
    Ok(())
  }

  /// Remove `value` from the list if present, otherwise append it.
  ///
  /// Appending to a full pain-area selection is a no-op.
  pub fn toggle_multi_value(&mut self, field: ListField, value: &str) -> Toggle {
    match field {
      ListField::PainArea => self.pain_area.toggle(value),
      ListField::PainDesc => toggle_in(&mut self.pain_desc, value),
      ListField::Goals => toggle_in(&mut self.goals, value),
    }
  }

  /// Current contents of a multi-select field
  pub fn list(&self, field: ListField) -> &[String] {
    match field {
      ListField::PainArea => self.pain_area.as_slice(),
      ListField::PainDesc => &self.pain_desc,
      ListField::Goals => &self.goals,
    }
  }

  pub fn validate_for_submit(&self) -> Validation {
    validate_for_submit(self)
  }

  pub fn reset(&mut self) {
    *self = Self::default();
  }

  fn text_field_mut(&mut self, field: FormField) -> Option<&mut String> {
    let slot = match field {
      FormField::Name => &mut self.name,
      FormField::Email => &mut self.email,
      FormField::Insurance => &mut self.insurance,
      FormField::PainSide => &mut self.pain_side,
      FormField::Duration => &mut self.duration,
      FormField::Activity => &mut self.activity,
      FormField::Sitting => &mut self.sitting,
      FormField::Notes => &mut self.notes,
      FormField::PainLevel | FormField::Consent => return None,
    };
    Some(slot)
  }
}

/// Accepts a number or numeric text; range inputs on the web form store text
fn pain_level_in_range<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
  D: serde::Deserializer<'de>,
{
  #[derive(Deserialize)]
  #[serde(untagged)]
  enum RawLevel {
    Number(u64),
    Text(String),
  }

  let level = match RawLevel::deserialize(deserializer)? {
    RawLevel::Number(n) => n,
    RawLevel::Text(text) => text
      .trim()
      .parse::<u64>()
      .map_err(|_| serde::de::Error::custom(format!("pain level '{text}' is not a number")))?,
  };
  if level > u64::from(MAX_PAIN_LEVEL) {
    return Err(serde::de::Error::custom(format!("pain level {level} is above {MAX_PAIN_LEVEL}")));
  }
  Ok(level as u8)
}

fn toggle_in(values: &mut Vec<String>, value: &str) -> Toggle {
  if values.iter().any(|v| v == value) {
    values.retain(|v| v != value);
    Toggle::Removed
  } else {
    values.push(value.to_string());
    Toggle::Added
  }
}

/// Required fields are checked before consent
pub fn validate_for_submit(form: &IntakeForm) -> Validation {
  if form.name.is_empty() || form.pain_area.is_empty() {
    return Validation::MissingRequired;
  }
  if !form.consent {
    return Validation::MissingConsent;
  }
  Validation::Valid
}

impl fmt::Display for FormField {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      FormField::Name => "name",
      FormField::Email => "email",
      FormField::Insurance => "insurance",
      FormField::PainSide => "painSide",
      FormField::Duration => "duration",
      FormField::Activity => "activity",
      FormField::Sitting => "sitting",
      FormField::Notes => "notes",
      FormField::PainLevel => "painLevel",
      FormField::Consent => "consent",
    };
    f.write_str(name)
  }
}

impl FromStr for FormField {
  type Err = FormError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match normalize(s).as_str() {
      "name" => Ok(FormField::Name),
      "email" => Ok(FormField::Email),
      "insurance" => Ok(FormField::Insurance),
      "painside" => Ok(FormField::PainSide),
      "duration" => Ok(FormField::Duration),
      "activity" => Ok(FormField::Activity),
      "sitting" => Ok(FormField::Sitting),
      "notes" => Ok(FormField::Notes),
      "painlevel" => Ok(FormField::PainLevel),
      "consent" => Ok(FormField::Consent),
      _ => Err(FormError::UnknownField { name: s.to_string() }),
    }
  }
}

impl fmt::Display for ListField {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      ListField::PainArea => "painArea",
      ListField::PainDesc => "painDesc",
      ListField::Goals => "goals",
    };
    f.write_str(name)
  }
}

impl FromStr for ListField {
  type Err = FormError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match normalize(s).as_str() {
      "painarea" => Ok(ListField::PainArea),
      "paindesc" => Ok(ListField::PainDesc),
      "goals" => Ok(ListField::Goals),
      _ => Err(FormError::UnknownField { name: s.to_string() }),
    }
  }
}

/// `painSide`, `pain-side` and `pain_side` all name the same field
fn normalize(name: &str) -> String {
  name.chars().filter(|c| *c != '-' && *c != '_').flat_map(char::to_lowercase).collect()
}

impl FieldValue {
  /// Parse raw text into the kind of value `field` holds
  pub fn parse_for(field: FormField, raw: &str) -> Result<Self, FormError> {
    match field {
      FormField::PainLevel => raw
        .trim()
        .parse::<u8>()
        .map(FieldValue::Level)
        .map_err(|_| FormError::InvalidPainLevel { raw: raw.to_string() }),
      FormField::Consent => match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Ok(FieldValue::Flag(true)),
        "false" | "no" | "0" | "off" | "" => Ok(FieldValue::Flag(false)),
        _ => Err(FormError::WrongValueKind { field: field.to_string() }),
      },
      _ => Ok(FieldValue::Text(raw.to_string())),
    }
  }
}
