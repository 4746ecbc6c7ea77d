//! Remote-activity prompts.
//!
//! The client launches an external activity (a game, a cognitive test) and
//! reports one JSON object per run; each run must carry a numeric `score`.

use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

use crate::core::error::ValueError;
use crate::core::prompt_types::unwrap_json_string;
use crate::core::types::{RemoteActivityRun, Value};

fn default_min_runs() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteActivityRules {
    pub package_id: String,
    pub activity_id: String,
    pub action_name: String,
    #[serde(default)]
    pub autolaunch: bool,
    /// How many times the activity may be relaunched; runs are capped at
    /// `retries + 1`.
    #[serde(default)]
    pub retries: u32,
    #[serde(default = "default_min_runs")]
    pub min_runs: u32,
}

impl RemoteActivityRules {
    pub fn max_runs(&self) -> u32 {
        // retries is client-supplied configuration and may be u32::MAX.
        self.retries.saturating_add(1)
    }

    /// Coerce a raw value into the canonical run list.
    ///
    /// Accepts a JSON array of run objects, a single run object, or either
    /// encoded as a string.
    pub fn validate(&self, id: &str, raw: &Json) -> Result<Value, ValueError> {
        let unwrapped = unwrap_json_string(raw);
        let entries = match unwrapped {
            Json::Array(entries) => entries,
            Json::Object(_) => vec![unwrapped],
            _ => {
                return Err(ValueError::WrongType {
                    id: id.to_string(),
                    expected: "array of run objects",
                });
            }
        };

        let count = entries.len() as u32;
        if count < self.min_runs || count > self.max_runs() {
            return Err(ValueError::OutOfRange {
                id: id.to_string(),
                reason: format!(
                    "{count} runs reported, expected between {} and {}",
                    self.min_runs,
                    self.max_runs()
                ),
            });
        }

        let mut runs = Vec::with_capacity(entries.len());
        for entry in entries {
            let run: RemoteActivityRun =
                serde_json::from_value(entry).map_err(|_| ValueError::WrongType {
                    id: id.to_string(),
                    expected: "run object with a numeric 'score'",
                })?;
            if !run.score.is_finite() {
                return Err(ValueError::OutOfRange {
                    id: id.to_string(),
                    reason: "run score must be finite".to_string(),
                });
            }
            runs.push(run);
        }
        Ok(Value::RemoteActivity(runs))
    }

    pub fn invariants(&self, path: &str, errors: &mut Vec<String>) {
        for (field, value) in [
            ("package_id", &self.package_id),
            ("activity_id", &self.activity_id),
            ("action_name", &self.action_name),
        ] {
            if value.trim().is_empty() {
                errors.push(format!("{path}: {field} must not be empty"));
            }
        }
        if self.min_runs > self.max_runs() {
            errors.push(format!(
                "{path}: min_runs {} exceeds maximum runs {}",
                self.min_runs,
                self.max_runs()
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rules() -> RemoteActivityRules {
        RemoteActivityRules {
            package_id: "org.example.game".to_string(),
            activity_id: "Game".to_string(),
            action_name: "PLAY".to_string(),
            autolaunch: false,
            retries: 2,
            min_runs: 1,
        }
    }

    #[test]
    fn accepts_run_arrays_and_single_objects() {
        let value = rules()
            .validate("ra", &json!([{"score": 10.5}, {"score": 3.0, "level": 2}]))
            .expect("ok");
        let Value::RemoteActivity(runs) = value else {
            panic!("expected remote-activity value");
        };
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].score, 10.5);
        assert_eq!(runs[1].extra.get("level"), Some(&json!(2)));

        assert!(rules().validate("ra", &json!({"score": 1.0})).is_ok());
    }

    #[test]
    fn accepts_string_encoded_runs() {
        assert!(rules().validate("ra", &json!("[{\"score\": 4}]")).is_ok());
    }

    #[test]
    fn enforces_run_count_bounds() {
        let err = rules()
            .validate("ra", &json!([{"score": 1}, {"score": 2}, {"score": 3}, {"score": 4}]))
            .expect_err("fail");
        assert!(matches!(err, ValueError::OutOfRange { .. }));

        let strict = RemoteActivityRules {
            min_runs: 2,
            ..rules()
        };
        assert!(matches!(
            strict.validate("ra", &json!([{"score": 1}])).expect_err("fail"),
            ValueError::OutOfRange { .. }
        ));
    }

    #[test]
    fn rejects_runs_without_scores() {
        assert!(matches!(
            rules().validate("ra", &json!([{"points": 5}])).expect_err("fail"),
            ValueError::WrongType { .. }
        ));
    }

    #[test]
    fn max_retries_does_not_overflow_the_run_cap() {
        let generous = RemoteActivityRules {
            retries: u32::MAX,
            ..rules()
        };
        assert_eq!(generous.max_runs(), u32::MAX);
        let mut errors = Vec::new();
        generous.invariants("s/ra", &mut errors);
        assert!(errors.is_empty());
        assert!(generous.validate("ra", &json!([{"score": 1.0}])).is_ok());
    }

    #[test]
    fn invariants_flag_empty_identifiers_and_run_bounds() {
        let mut errors = Vec::new();
        RemoteActivityRules {
            package_id: String::new(),
            min_runs: 9,
            ..rules()
        }
        .invariants("s/ra", &mut errors);
        assert!(errors.iter().any(|e| e.contains("package_id")));
        assert!(errors.iter().any(|e| e.contains("min_runs 9")));
    }
}
