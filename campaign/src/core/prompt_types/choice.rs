//! Choice prompts: single/multi, with and without custom entries.
//!
//! Canonical values differ by variant: the fixed variants record configured
//! choice keys; the custom variants record labels, because respondents may
//! submit entries outside the configured set.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

use crate::core::condition::Literal;
use crate::core::error::{ConditionError, ValueError};
use crate::core::prompt_types::unwrap_json_string;
use crate::core::types::Value;

/// One configured choice: a stable integer key, a label, and an optional
/// numeric value for data consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    pub key: i64,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

/// The configured choice set shared by all four choice prompt types.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChoiceRules {
    pub choices: Vec<Choice>,
}

impl ChoiceRules {
    pub fn contains_key(&self, key: i64) -> bool {
        self.choices.iter().any(|choice| choice.key == key)
    }

    pub fn label_for_key(&self, key: i64) -> Option<&str> {
        self.choices
            .iter()
            .find(|choice| choice.key == key)
            .map(|choice| choice.label.as_str())
    }

    /// `single_choice`: one configured key, as an integer or numeric string.
    pub fn validate_single(&self, id: &str, raw: &Json) -> Result<Value, ValueError> {
        let key = decode_key(id, raw)?;
        if !self.contains_key(key) {
            return Err(ValueError::UnknownChoiceKey {
                id: id.to_string(),
                key,
            });
        }
        Ok(Value::ChoiceKey(key))
    }

    /// `single_choice_custom`: a label, or a configured key which resolves to
    /// its label. Unconfigured labels are accepted as custom entries.
    pub fn validate_single_custom(&self, id: &str, raw: &Json) -> Result<Value, ValueError> {
        if let Ok(key) = decode_key(id, raw) {
            let label = self
                .label_for_key(key)
                .ok_or(ValueError::UnknownChoiceKey {
                    id: id.to_string(),
                    key,
                })?;
            return Ok(Value::CustomLabel(label.to_string()));
        }
        let label = decode_label(id, raw)?;
        Ok(Value::CustomLabel(label))
    }

    /// `multi_choice`: an array of configured keys, no duplicates. The
    /// canonical form sorts keys ascending.
    pub fn validate_multi(&self, id: &str, raw: &Json) -> Result<Value, ValueError> {
        let unwrapped = unwrap_json_string(raw);
        let Json::Array(entries) = &unwrapped else {
            return Err(ValueError::WrongType {
                id: id.to_string(),
                expected: "array of choice keys",
            });
        };
        let mut keys = Vec::with_capacity(entries.len());
        let mut seen = HashSet::new();
        for entry in entries {
            let key = decode_key(id, entry)?;
            if !self.contains_key(key) {
                return Err(ValueError::UnknownChoiceKey {
                    id: id.to_string(),
                    key,
                });
            }
            if !seen.insert(key) {
                return Err(ValueError::DuplicateEntry { id: id.to_string() });
            }
            keys.push(key);
        }
        keys.sort_unstable();
        Ok(Value::ChoiceKeys(keys))
    }

    /// `multi_choice_custom`: an array of labels in submission order, no
    /// duplicates. Labels outside the configured set are accepted.
    pub fn validate_multi_custom(&self, id: &str, raw: &Json) -> Result<Value, ValueError> {
        let unwrapped = unwrap_json_string(raw);
        let Json::Array(entries) = &unwrapped else {
            return Err(ValueError::WrongType {
                id: id.to_string(),
                expected: "array of labels",
            });
        };
        let mut labels = Vec::with_capacity(entries.len());
        let mut seen = HashSet::new();
        for entry in entries {
            let label = decode_label(id, entry)?;
            if !seen.insert(label.clone()) {
                return Err(ValueError::DuplicateEntry { id: id.to_string() });
            }
            labels.push(label);
        }
        Ok(Value::CustomLabels(labels))
    }

    /// Condition literals against fixed single-choice prompts must name a
    /// configured key.
    pub fn check_key_literal(&self, id: &str, literal: &Literal) -> Result<(), ConditionError> {
        match literal {
            Literal::Number(key) if self.contains_key(*key) => Ok(()),
            Literal::Number(key) => Err(ConditionError::BadLiteral {
                id: id.to_string(),
                reason: format!("{key} is not a configured choice key"),
            }),
            _ => Err(ConditionError::BadLiteral {
                id: id.to_string(),
                reason: "expected a choice key literal".to_string(),
            }),
        }
    }

    pub fn invariants(&self, path: &str, errors: &mut Vec<String>) {
        if self.choices.is_empty() {
            errors.push(format!("{path}: choice set must not be empty"));
        }
        let mut keys = HashSet::new();
        let mut labels = HashSet::new();
        for choice in &self.choices {
            if !keys.insert(choice.key) {
                errors.push(format!("{path}: duplicate choice key {}", choice.key));
            }
            if choice.label.trim().is_empty() {
                errors.push(format!(
                    "{path}: choice {} has an empty label",
                    choice.key
                ));
            } else if !labels.insert(choice.label.as_str()) {
                errors.push(format!(
                    "{path}: duplicate choice label '{}'",
                    choice.label
                ));
            }
        }
    }
}

fn decode_key(id: &str, raw: &Json) -> Result<i64, ValueError> {
    match raw {
        Json::Number(number) => number.as_i64().ok_or_else(|| ValueError::Unparseable {
            id: id.to_string(),
            raw: number.to_string(),
            expected: "choice key",
        }),
        Json::String(text) => text
            .trim()
            .parse::<i64>()
            .map_err(|_| ValueError::Unparseable {
                id: id.to_string(),
                raw: text.clone(),
                expected: "choice key",
            }),
        _ => Err(ValueError::WrongType {
            id: id.to_string(),
            expected: "choice key",
        }),
    }
}

fn decode_label(id: &str, raw: &Json) -> Result<String, ValueError> {
    let Json::String(label) = raw else {
        return Err(ValueError::WrongType {
            id: id.to_string(),
            expected: "label",
        });
    };
    if label.trim().is_empty() {
        return Err(ValueError::Unparseable {
            id: id.to_string(),
            raw: label.clone(),
            expected: "non-empty label",
        });
    }
    Ok(label.clone())
}
