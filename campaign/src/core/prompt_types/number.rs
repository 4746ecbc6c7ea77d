//! Whole-number prompts (`number`, `hours_before_now`).

use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

use crate::core::condition::Literal;
use crate::core::error::{ConditionError, ValueError};
use crate::core::types::Value;

/// Bounds for numeric prompts. All bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumberRules {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<i64>,
    /// Pre-filled value offered to the respondent; must lie in range.
    #[serde(rename = "default", skip_serializing_if = "Option::is_none")]
    pub default_value: Option<i64>,
}

impl NumberRules {
    /// Coerce a raw value into an in-range integer.
    ///
    /// Accepts JSON integers and strings holding an integer. Fractional
    /// numbers are rejected rather than rounded.
    pub fn validate(&self, id: &str, raw: &Json) -> Result<Value, ValueError> {
        let number = match raw {
            Json::Number(number) => number.as_i64().ok_or_else(|| ValueError::Unparseable {
                id: id.to_string(),
                raw: number.to_string(),
                expected: "whole number",
            })?,
            Json::String(text) => {
                text.trim()
                    .parse::<i64>()
                    .map_err(|_| ValueError::Unparseable {
                        id: id.to_string(),
                        raw: text.clone(),
                        expected: "whole number",
                    })?
            }
            _ => {
                return Err(ValueError::WrongType {
                    id: id.to_string(),
                    expected: "number",
                });
            }
        };
        self.check_range(id, number)?;
        Ok(Value::Integer(number))
    }

    /// Check a condition literal against the configured range.
    pub fn check_literal(&self, id: &str, literal: &Literal) -> Result<(), ConditionError> {
        match literal {
            Literal::Number(number) => self.check_range(id, *number).map_err(|err| {
                ConditionError::BadLiteral {
                    id: id.to_string(),
                    reason: err.to_string(),
                }
            }),
            _ => Err(ConditionError::BadLiteral {
                id: id.to_string(),
                reason: "expected a numeric literal".to_string(),
            }),
        }
    }

    /// Configuration sanity, reported as stable messages.
    pub fn invariants(&self, path: &str, errors: &mut Vec<String>) {
        if let (Some(min), Some(max)) = (self.min, self.max)
            && min > max
        {
            errors.push(format!("{path}: min {min} exceeds max {max}"));
        }
        if let Some(default) = self.default_value
            && self.check_range(path, default).is_err()
        {
            errors.push(format!("{path}: default {default} is out of range"));
        }
    }

    fn check_range(&self, id: &str, number: i64) -> Result<(), ValueError> {
        if let Some(min) = self.min
            && number < min
        {
            return Err(ValueError::OutOfRange {
                id: id.to_string(),
                reason: format!("{number} is below the minimum {min}"),
            });
        }
        if let Some(max) = self.max
            && number > max
        {
            return Err(ValueError::OutOfRange {
                id: id.to_string(),
                reason: format!("{number} is above the maximum {max}"),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rules(min: i64, max: i64) -> NumberRules {
        NumberRules {
            min: Some(min),
            max: Some(max),
            default_value: None,
        }
    }

    #[test]
    fn accepts_integer_and_numeric_string() {
        let rules = rules(0, 10);
        assert_eq!(rules.validate("n", &json!(4)).expect("ok"), Value::Integer(4));
        assert_eq!(
            rules.validate("n", &json!("4")).expect("ok"),
            Value::Integer(4)
        );
    }

    #[test]
    fn rejects_fractional_numbers() {
        let err = rules(0, 10).validate("n", &json!(4.5)).expect_err("fail");
        assert!(matches!(err, ValueError::Unparseable { .. }));
    }

    #[test]
    fn rejects_out_of_range() {
        let err = rules(0, 10).validate("n", &json!(11)).expect_err("fail");
        assert!(matches!(err, ValueError::OutOfRange { .. }));
        let err = rules(0, 10).validate("n", &json!(-1)).expect_err("fail");
        assert!(matches!(err, ValueError::OutOfRange { .. }));
    }

    #[test]
    fn rejects_non_numeric_types() {
        let err = rules(0, 10)
            .validate("n", &json!({"v": 1}))
            .expect_err("fail");
        assert!(matches!(err, ValueError::WrongType { .. }));
    }

    #[test]
    fn same_input_yields_same_error_kind() {
        let first = rules(0, 10).validate("n", &json!("abc")).expect_err("fail");
        let second = rules(0, 10).validate("n", &json!("abc")).expect_err("fail");
        assert_eq!(first, second);
    }

    #[test]
    fn literal_must_be_numeric_and_in_range() {
        let rules = rules(0, 10);
        assert!(rules.check_literal("n", &Literal::Number(5)).is_ok());
        assert!(rules.check_literal("n", &Literal::Number(11)).is_err());
        assert!(
            rules
                .check_literal("n", &Literal::Text("x".to_string()))
                .is_err()
        );
    }

    #[test]
    fn invariants_flag_inverted_bounds_and_bad_default() {
        let mut errors = Vec::new();
        NumberRules {
            min: Some(5),
            max: Some(1),
            default_value: Some(9),
        }
        .invariants("s/n", &mut errors);
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("min 5 exceeds max 1"));
        assert!(errors[1].contains("default 9 is out of range"));
    }
}
