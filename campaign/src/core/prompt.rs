//! Prompt configuration and the type-driven validation dispatch.

use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

use crate::core::condition::{ConditionPair, Literal};
use crate::core::error::{ConditionError, ValueError};
use crate::core::prompt_types::choice::ChoiceRules;
use crate::core::prompt_types::number::NumberRules;
use crate::core::prompt_types::photo::PhotoRules;
use crate::core::prompt_types::remote_activity::RemoteActivityRules;
use crate::core::prompt_types::text::TextRules;
use crate::core::prompt_types::timestamp;
use crate::core::response::PromptResponse;
use crate::core::types::{DisplayType, NoResponse, PromptType, Value};

/// Type-specific constraint payload, tagged by `prompt_type` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "prompt_type", rename_all = "snake_case")]
pub enum PromptKind {
    Timestamp,
    Number(NumberRules),
    HoursBeforeNow(NumberRules),
    Text(TextRules),
    SingleChoice(ChoiceRules),
    SingleChoiceCustom(ChoiceRules),
    MultiChoice(ChoiceRules),
    MultiChoiceCustom(ChoiceRules),
    Photo(PhotoRules),
    RemoteActivity(RemoteActivityRules),
}

impl PromptKind {
    pub fn prompt_type(&self) -> PromptType {
        match self {
            PromptKind::Timestamp => PromptType::Timestamp,
            PromptKind::Number(_) => PromptType::Number,
            PromptKind::HoursBeforeNow(_) => PromptType::HoursBeforeNow,
            PromptKind::Text(_) => PromptType::Text,
            PromptKind::SingleChoice(_) => PromptType::SingleChoice,
            PromptKind::SingleChoiceCustom(_) => PromptType::SingleChoiceCustom,
            PromptKind::MultiChoice(_) => PromptType::MultiChoice,
            PromptKind::MultiChoiceCustom(_) => PromptType::MultiChoiceCustom,
            PromptKind::Photo(_) => PromptType::Photo,
            PromptKind::RemoteActivity(_) => PromptType::RemoteActivity,
        }
    }
}

/// One question in a survey.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prompt {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abbreviated_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation_text: Option<String>,
    pub skippable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_label: Option<String>,
    pub display_type: DisplayType,
    pub display_label: String,
    #[serde(flatten)]
    pub kind: PromptKind,
}

impl Prompt {
    pub fn prompt_type(&self) -> PromptType {
        self.kind.prompt_type()
    }

    /// Coerce a raw submitted value into the canonical typed value.
    ///
    /// Sentinels are resolved first: `SKIPPED` is legal only for skippable
    /// prompts; `NOT_DISPLAYED` always passes this layer (the submission
    /// pipeline checks it against the display condition). Coercion is
    /// deterministic: the same raw input yields the same value or the same
    /// error kind.
    pub fn validate_value(&self, raw: &Json) -> Result<Value, ValueError> {
        if let Some(sentinel) = decode_sentinel(raw) {
            if sentinel == NoResponse::Skipped && !self.skippable {
                return Err(ValueError::NotSkippable {
                    id: self.id.clone(),
                });
            }
            return Ok(Value::NoResponse(sentinel));
        }

        match &self.kind {
            PromptKind::Timestamp => timestamp::validate(&self.id, raw),
            PromptKind::Number(rules) | PromptKind::HoursBeforeNow(rules) => {
                rules.validate(&self.id, raw)
            }
            PromptKind::Text(rules) => rules.validate(&self.id, raw),
            PromptKind::SingleChoice(rules) => rules.validate_single(&self.id, raw),
            PromptKind::SingleChoiceCustom(rules) => rules.validate_single_custom(&self.id, raw),
            PromptKind::MultiChoice(rules) => rules.validate_multi(&self.id, raw),
            PromptKind::MultiChoiceCustom(rules) => rules.validate_multi_custom(&self.id, raw),
            PromptKind::Photo(rules) => rules.validate(&self.id, raw),
            PromptKind::RemoteActivity(rules) => rules.validate(&self.id, raw),
        }
    }

    /// Check that a condition clause's operator and literal are legal against
    /// this prompt's value domain.
    ///
    /// Sentinel literals are accepted for every type (with `==`/`!=` only,
    /// and `SKIPPED` only when skippable). Types with no orderable domain
    /// accept nothing else.
    pub fn validate_condition_pair(&self, pair: &ConditionPair) -> Result<(), ConditionError> {
        if let Literal::Sentinel(sentinel) = &pair.literal {
            if !pair.op.is_equality() {
                return Err(ConditionError::SentinelOrdering {
                    id: self.id.clone(),
                });
            }
            if *sentinel == NoResponse::Skipped && !self.skippable {
                return Err(ConditionError::SkippedNotPossible {
                    id: self.id.clone(),
                });
            }
            return Ok(());
        }

        match &self.kind {
            PromptKind::Timestamp => timestamp::check_literal(&self.id, &pair.literal),
            PromptKind::Number(rules) | PromptKind::HoursBeforeNow(rules) => {
                rules.check_literal(&self.id, &pair.literal)
            }
            PromptKind::SingleChoice(rules) => rules.check_key_literal(&self.id, &pair.literal),
            PromptKind::Text(_)
            | PromptKind::SingleChoiceCustom(_)
            | PromptKind::MultiChoice(_)
            | PromptKind::MultiChoiceCustom(_)
            | PromptKind::Photo(_)
            | PromptKind::RemoteActivity(_) => Err(ConditionError::SentinelOnly {
                id: self.id.clone(),
                prompt_type: self.prompt_type().to_string(),
            }),
        }
    }

    /// Validate a raw value and attach survey context.
    pub fn create_response(
        &self,
        iteration: Option<u32>,
        raw: &Json,
    ) -> Result<PromptResponse, ValueError> {
        let value = self.validate_value(raw)?;
        Ok(PromptResponse {
            prompt_id: self.id.clone(),
            prompt_type: self.prompt_type(),
            iteration,
            value,
        })
    }

    /// Prompt-level configuration invariants, reported as stable messages.
    pub fn invariants(&self, path: &str, errors: &mut Vec<String>) {
        if self.text.trim().is_empty() {
            errors.push(format!("{path}: text must not be empty"));
        }
        if self.display_label.trim().is_empty() {
            errors.push(format!("{path}: display_label must not be empty"));
        }
        if self.skippable
            && self
                .skip_label
                .as_deref()
                .is_none_or(|label| label.trim().is_empty())
        {
            errors.push(format!(
                "{path}: skippable prompts must declare a skip_label"
            ));
        }

        match &self.kind {
            PromptKind::Timestamp | PromptKind::Photo(_) => {}
            PromptKind::Number(rules) | PromptKind::HoursBeforeNow(rules) => {
                rules.invariants(path, errors);
            }
            PromptKind::Text(rules) => rules.invariants(path, errors),
            PromptKind::SingleChoice(rules)
            | PromptKind::SingleChoiceCustom(rules)
            | PromptKind::MultiChoice(rules)
            | PromptKind::MultiChoiceCustom(rules) => rules.invariants(path, errors),
            PromptKind::RemoteActivity(rules) => rules.invariants(path, errors),
        }
    }
}

/// Decode the raw value as a sentinel, if it is one.
///
/// Sentinels only ever arrive as the bare upper-case label, never inside an
/// array or object.
fn decode_sentinel(raw: &Json) -> Option<NoResponse> {
    match raw {
        Json::String(text) => NoResponse::from_label(text),
        _ => None,
    }
}
