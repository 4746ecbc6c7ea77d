//! Timestamp prompts.

use serde_json::Value as Json;

use crate::core::condition::Literal;
use crate::core::error::{ConditionError, ValueError};
use crate::core::types::{Value, parse_timestamp};

/// Coerce a raw value into a calendar timestamp.
pub fn validate(id: &str, raw: &Json) -> Result<Value, ValueError> {
    let Json::String(text) = raw else {
        return Err(ValueError::WrongType {
            id: id.to_string(),
            expected: "timestamp string",
        });
    };
    let timestamp = parse_timestamp(text).ok_or_else(|| ValueError::Unparseable {
        id: id.to_string(),
        raw: text.clone(),
        expected: "timestamp",
    })?;
    Ok(Value::Timestamp(timestamp))
}

/// A condition literal against a timestamp prompt must itself parse as one.
pub fn check_literal(id: &str, literal: &Literal) -> Result<(), ConditionError> {
    match literal {
        Literal::Text(raw) if parse_timestamp(raw).is_some() => Ok(()),
        _ => Err(ConditionError::BadLiteral {
            id: id.to_string(),
            reason: "expected a timestamp literal".to_string(),
        }),
    }
}
