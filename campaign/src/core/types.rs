//! Shared deterministic types for the validation engine.
//!
//! These types define stable contracts between core components. They should
//! not depend on external state or I/O and must remain deterministic across
//! runs.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The declared type of a prompt, driving value coercion and constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptType {
    Timestamp,
    Number,
    HoursBeforeNow,
    Text,
    SingleChoice,
    SingleChoiceCustom,
    MultiChoice,
    MultiChoiceCustom,
    Photo,
    RemoteActivity,
}

impl fmt::Display for PromptType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PromptType::Timestamp => "timestamp",
            PromptType::Number => "number",
            PromptType::HoursBeforeNow => "hours_before_now",
            PromptType::Text => "text",
            PromptType::SingleChoice => "single_choice",
            PromptType::SingleChoiceCustom => "single_choice_custom",
            PromptType::MultiChoice => "multi_choice",
            PromptType::MultiChoiceCustom => "multi_choice_custom",
            PromptType::Photo => "photo",
            PromptType::RemoteActivity => "remote_activity",
        };
        f.write_str(label)
    }
}

/// How data consumers should present responses to this prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayType {
    Measurement,
    Event,
    Count,
    Category,
    Metadata,
}

/// Sentinel recorded when a prompt has no real value.
///
/// Wire forms are the upper-case labels `SKIPPED` / `NOT_DISPLAYED`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoResponse {
    #[serde(rename = "SKIPPED")]
    Skipped,
    #[serde(rename = "NOT_DISPLAYED")]
    NotDisplayed,
}

impl NoResponse {
    /// Decode a raw string into a sentinel, if it is one.
    pub fn from_label(raw: &str) -> Option<NoResponse> {
        match raw {
            "SKIPPED" => Some(NoResponse::Skipped),
            "NOT_DISPLAYED" => Some(NoResponse::NotDisplayed),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            NoResponse::Skipped => "SKIPPED",
            NoResponse::NotDisplayed => "NOT_DISPLAYED",
        }
    }
}

impl fmt::Display for NoResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One run reported by a remote-activity prompt.
///
/// The score is the only field the engine interprets; launchers may attach
/// arbitrary extra fields which are preserved verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteActivityRun {
    pub score: f64,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Canonical typed value produced by prompt validation.
///
/// `validate_value` coerces every legal raw submission into exactly one of
/// these variants; the same raw input always yields the same variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Value {
    /// Whole-number value (number and hours-before-now prompts).
    Integer(i64),
    /// Free text.
    Text(String),
    /// A configured choice key (single-choice prompts).
    ChoiceKey(i64),
    /// Configured choice keys, sorted ascending (multi-choice prompts).
    ChoiceKeys(Vec<i64>),
    /// A label, possibly outside the configured set (single-choice-custom).
    CustomLabel(String),
    /// Labels in submission order (multi-choice-custom).
    CustomLabels(Vec<String>),
    /// Calendar timestamp without timezone.
    Timestamp(NaiveDateTime),
    /// Identifier of an uploaded photo.
    Photo(Uuid),
    /// Remote-activity runs in submission order.
    RemoteActivity(Vec<RemoteActivityRun>),
    /// The prompt was skipped or never displayed.
    NoResponse(NoResponse),
}

impl Value {
    /// The sentinel carried by this value, if any.
    pub fn as_no_response(&self) -> Option<NoResponse> {
        match self {
            Value::NoResponse(sentinel) => Some(*sentinel),
            _ => None,
        }
    }
}

/// Accepted timestamp formats, tried in order.
pub(crate) const TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// Parse a timestamp literal in one of the accepted formats.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
}
