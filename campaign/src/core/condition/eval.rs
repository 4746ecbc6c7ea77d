//! Condition evaluation against responses recorded earlier in the survey.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::core::condition::{Condition, ConditionPair, Literal, Op};
use crate::core::error::ConditionError;
use crate::core::types::{Value, parse_timestamp};

/// Responses visible to a condition: prompt id -> canonical value.
///
/// The submission pipeline seeds this with every prompt validated so far, so
/// a well-formed campaign (conditions only reference earlier prompts) never
/// hits a missing entry.
pub type ResponseContext = HashMap<String, Value>;

/// Evaluate a condition. True means the gated item is displayed.
pub fn evaluate(condition: &Condition, context: &ResponseContext) -> Result<bool, ConditionError> {
    match condition {
        Condition::Clause(pair) => evaluate_clause(pair, context),
        Condition::And(parts) => {
            for part in parts {
                if !evaluate(part, context)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        Condition::Or(parts) => {
            for part in parts {
                if evaluate(part, context)? {
                    return Ok(true);
                }
            }
            Ok(false)
        }
    }
}

fn evaluate_clause(pair: &ConditionPair, context: &ResponseContext) -> Result<bool, ConditionError> {
    let value = context
        .get(&pair.prompt_id)
        .ok_or_else(|| ConditionError::UnknownPrompt {
            id: pair.prompt_id.clone(),
        })?;

    // Sentinel literals: pure equality against the recorded sentinel.
    if let Literal::Sentinel(expected) = &pair.literal {
        if !pair.op.is_equality() {
            return Err(ConditionError::SentinelOrdering {
                id: pair.prompt_id.clone(),
            });
        }
        let matches = value.as_no_response() == Some(*expected);
        return Ok(match pair.op {
            Op::Eq => matches,
            _ => !matches,
        });
    }

    // A sentinel-valued response compares false against every real literal,
    // for every operator.
    if value.as_no_response().is_some() {
        return Ok(false);
    }

    let ordering = compare(pair, value)?;
    Ok(match pair.op {
        Op::Eq => ordering == Ordering::Equal,
        Op::Ne => ordering != Ordering::Equal,
        Op::Lt => ordering == Ordering::Less,
        Op::Gt => ordering == Ordering::Greater,
        Op::Le => ordering != Ordering::Greater,
        Op::Ge => ordering != Ordering::Less,
    })
}

/// Ordering of the recorded value relative to the literal.
fn compare(pair: &ConditionPair, value: &Value) -> Result<Ordering, ConditionError> {
    match (value, &pair.literal) {
        (Value::Integer(recorded), Literal::Number(literal)) => Ok(recorded.cmp(literal)),
        (Value::ChoiceKey(recorded), Literal::Number(literal)) => Ok(recorded.cmp(literal)),
        (Value::Timestamp(recorded), Literal::Text(raw)) => {
            let literal = parse_timestamp(raw).ok_or_else(|| ConditionError::BadLiteral {
                id: pair.prompt_id.clone(),
                reason: format!("'{raw}' is not a timestamp"),
            })?;
            Ok(recorded.cmp(&literal))
        }
        _ => Err(ConditionError::BadLiteral {
            id: pair.prompt_id.clone(),
            reason: format!(
                "literal is not comparable with the recorded response ({})",
                pair.op.symbol()
            ),
        }),
    }
}
