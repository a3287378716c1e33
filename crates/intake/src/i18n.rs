//! Interface language and the messages the controller shows

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::form::Validation;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
  #[default]
  En,
  Zh,
}

impl Language {
  pub fn toggled(self) -> Self {
    match self {
      Language::En => Language::Zh,
      Language::Zh => Language::En,
    }
  }

  /// English name, used inside the report prompt
  pub fn english_name(self) -> &'static str {
    match self {
      Language::En => "English",
      Language::Zh => "Chinese",
    }
  }

  pub fn messages(self) -> &'static Messages {
    match self {
      Language::En => &EN,
      Language::Zh => &ZH,
    }
  }
}

impl fmt::Display for Language {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Language::En => f.write_str("en"),
      Language::Zh => f.write_str("zh"),
    }
  }
}

impl FromStr for Language {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "en" | "english" => Ok(Language::En),
      "zh" | "chinese" | "cn" => Ok(Language::Zh),
      other => Err(format!("unsupported language '{other}' (expected en or zh)")),
    }
  }
}

/// Which side of the kiosk is showing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
  #[default]
  Client,
  Staff,
}

/// User-facing strings set by the controller
#[derive(Debug)]
pub struct Messages {
  pub required_warning: &'static str,
  pub consent_warning: &'static str,
  pub success: &'static str,
  pub status_pending: &'static str,
  pub status_done: &'static str,
  pub no_records: &'static str,
  pub generation_failed: &'static str,
}

impl Messages {
  /// Warning for a failed validation; `None` when the form is valid
  pub fn warning_for(&self, validation: Validation) -> Option<&'static str> {
    match validation {
      Validation::Valid => None,
      Validation::MissingRequired => Some(self.required_warning),
      Validation::MissingConsent => Some(self.consent_warning),
    }
  }
}

static EN: Messages = Messages {
  required_warning: "Please enter your name and select at least one pain area.",
  consent_warning: "Please confirm your consent before submitting.",
  success: "Submitted successfully",
  status_pending: "Pending",
  status_done: "Report ready",
  no_records: "No client records yet.",
  generation_failed: "AI generation failed. Check your API configuration.",
};

static ZH: Messages = Messages {
  required_warning: "请填写姓名并至少选择一个疼痛部位。",
  consent_warning: "提交前请确认同意条款。",
  success: "提交成功",
  status_pending: "待生成",
  status_done: "报告已生成",
  no_records: "暂无客户记录。",
  generation_failed: "AI 生成失败，请检查 API 配置。",
};

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_language_parse_and_toggle() {
    assert_eq!("ZH".parse::<Language>().unwrap(), Language::Zh);
    assert_eq!("english".parse::<Language>().unwrap(), Language::En);
    assert!("fr".parse::<Language>().is_err());
    assert_eq!(Language::En.toggled(), Language::Zh);
    assert_eq!(Language::Zh.toggled().toggled(), Language::Zh);
  }

  #[test]
  fn test_warning_for_validation() {
    let en = Language::En.messages();
    assert_eq!(en.warning_for(Validation::Valid), None);
    assert_eq!(en.warning_for(Validation::MissingRequired), Some(en.required_warning));
    assert_eq!(Language::Zh.messages().warning_for(Validation::MissingConsent), Some(ZH.consent_warning));
  }
}
