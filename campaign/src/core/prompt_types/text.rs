//! Free-text prompts.

use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

use crate::core::error::ValueError;
use crate::core::types::Value;

/// Length bounds for text prompts, counted in characters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextRules {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<u64>,
}

impl TextRules {
    pub fn validate(&self, id: &str, raw: &Json) -> Result<Value, ValueError> {
        let Json::String(text) = raw else {
            return Err(ValueError::WrongType {
                id: id.to_string(),
                expected: "string",
            });
        };
        let length = text.chars().count() as u64;
        if let Some(min) = self.min
            && length < min
        {
            return Err(ValueError::OutOfRange {
                id: id.to_string(),
                reason: format!("text length {length} is below the minimum {min}"),
            });
        }
        if let Some(max) = self.max
            && length > max
        {
            return Err(ValueError::OutOfRange {
                id: id.to_string(),
                reason: format!("text length {length} is above the maximum {max}"),
            });
        }
        Ok(Value::Text(text.clone()))
    }

    pub fn invariants(&self, path: &str, errors: &mut Vec<String>) {
        if let (Some(min), Some(max)) = (self.min, self.max)
            && min > max
        {
            errors.push(format!("{path}: min length {min} exceeds max length {max}"));
        }
    }
}
