//! Survey submission validation: condition-gated response checking.
//!
//! Walks the survey items in order, evaluating each item's display condition
//! against the responses validated so far. Displayed prompts must carry a
//! real (or legitimately skipped) value; hidden prompts must carry the
//! `NOT_DISPLAYED` sentinel.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

use crate::core::campaign::Campaign;
use crate::core::condition::{Condition, ResponseContext, evaluate};
use crate::core::error::{SubmissionError, ValueError};
use crate::core::prompt::Prompt;
use crate::core::response::{PromptResponse, SurveyResponse};
use crate::core::survey_item::{RepeatableSet, SurveyItem};
use crate::core::types::{NoResponse, Value};

/// Engine-level caps applied on top of per-prompt constraints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    /// Maximum raw responses accepted in one submission.
    pub max_responses: usize,
    /// Hard cap on text length, regardless of the prompt's own max.
    pub max_text_length: u64,
    /// Maximum entries in a custom multi-choice response.
    pub max_custom_choices: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_responses: 500,
            max_text_length: 65_536,
            max_custom_choices: 100,
        }
    }
}

/// One raw prompt response as submitted by a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawResponse {
    pub prompt_id: String,
    /// 0-based repeatable-set iteration; absent for top-level prompts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iteration: Option<u32>,
    pub value: Json,
}

/// A raw survey submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub survey_id: String,
    pub responses: Vec<RawResponse>,
}

/// Validate a submission against its campaign.
///
/// Returns canonical responses in survey order (iteration-major within
/// repeatable sets), or the error for the first offending prompt in walk
/// order.
pub fn validate_submission(
    campaign: &Campaign,
    submission: &Submission,
    limits: &Limits,
) -> Result<SurveyResponse, SubmissionError> {
    if submission.responses.len() > limits.max_responses {
        return Err(SubmissionError::TooManyResponses {
            count: submission.responses.len(),
            limit: limits.max_responses,
        });
    }

    let survey = campaign
        .survey(&submission.survey_id)
        .ok_or_else(|| SubmissionError::UnknownSurvey {
            id: submission.survey_id.clone(),
        })?;

    let mut index = ResponseIndex::new(&submission.responses)?;
    let mut context = ResponseContext::new();
    let mut out = Vec::new();

    for item in &survey.items {
        match item {
            SurveyItem::Message(message) => {
                if index.has_any(&message.id) {
                    return Err(SubmissionError::MessageResponse {
                        id: message.id.clone(),
                    });
                }
            }
            SurveyItem::Prompt(prompt) => {
                if let Some(iteration) = index.stray_iteration(&prompt.id) {
                    return Err(SubmissionError::UnexpectedIteration {
                        id: prompt.id.clone(),
                        iteration,
                    });
                }
                let displayed = item_displayed(item.condition(), &context)?;
                let response =
                    validate_prompt_response(prompt, None, displayed, &mut index, limits)?;
                context.insert(prompt.id.clone(), response.value.clone());
                out.push(response);
            }
            SurveyItem::RepeatableSet(set) => {
                validate_set(set, &context, &mut index, limits, &mut out)?;
            }
        }
    }

    if let Some(stray) = index.first_unconsumed(&submission.responses) {
        return Err(SubmissionError::UnknownPrompt {
            id: stray.prompt_id.clone(),
        });
    }

    Ok(SurveyResponse {
        survey_id: survey.id.clone(),
        responses: out,
    })
}

fn item_displayed(
    condition: Option<&str>,
    context: &ResponseContext,
) -> Result<bool, SubmissionError> {
    match condition {
        None => Ok(true),
        Some(raw) => {
            let parsed = Condition::parse(raw)?;
            Ok(evaluate(&parsed, context)?)
        }
    }
}

/// Validate one prompt's response under its display outcome.
fn validate_prompt_response(
    prompt: &Prompt,
    iteration: Option<u32>,
    displayed: bool,
    index: &mut ResponseIndex<'_>,
    limits: &Limits,
) -> Result<PromptResponse, SubmissionError> {
    let raw = index
        .take(&prompt.id, iteration)
        .ok_or_else(|| SubmissionError::MissingResponse {
            id: prompt.id.clone(),
            iteration,
        })?;

    if !displayed {
        let is_not_displayed = matches!(
            raw,
            Json::String(text) if NoResponse::from_label(text) == Some(NoResponse::NotDisplayed)
        );
        if !is_not_displayed {
            return Err(SubmissionError::HiddenPromptAnswered {
                id: prompt.id.clone(),
            });
        }
        return Ok(PromptResponse {
            prompt_id: prompt.id.clone(),
            prompt_type: prompt.prompt_type(),
            iteration,
            value: Value::NoResponse(NoResponse::NotDisplayed),
        });
    }

    let response = prompt.create_response(iteration, raw)?;
    if response.value.as_no_response() == Some(NoResponse::NotDisplayed) {
        return Err(SubmissionError::NotDisplayedButShown {
            id: prompt.id.clone(),
        });
    }
    apply_limits(&prompt.id, &response.value, limits)?;
    Ok(response)
}

fn validate_set(
    set: &RepeatableSet,
    outer: &ResponseContext,
    index: &mut ResponseIndex<'_>,
    limits: &Limits,
    out: &mut Vec<PromptResponse>,
) -> Result<(), SubmissionError> {
    let displayed = item_displayed(set.condition.as_deref(), outer)?;

    if !displayed {
        for prompt in &set.prompts {
            if index.has_any(&prompt.id) {
                return Err(SubmissionError::HiddenSetAnswered { id: set.id.clone() });
            }
        }
        return Ok(());
    }

    for prompt in &set.prompts {
        if index.has_key(&prompt.id, None) {
            return Err(SubmissionError::MissingIteration {
                id: prompt.id.clone(),
            });
        }
    }

    let iterations = contiguous_iterations(set, index)?;
    for iteration in iterations {
        // Nested conditions see outer prompts plus this iteration's values.
        let mut context = outer.clone();
        for prompt in &set.prompts {
            let displayed = item_displayed(prompt.condition.as_deref(), &context)?;
            let response =
                validate_prompt_response(prompt, Some(iteration), displayed, index, limits)?;
            context.insert(prompt.id.clone(), response.value.clone());
            out.push(response);
        }
    }
    Ok(())
}

/// Iterations present for a set, validated to be contiguous from 0.
///
/// Zero iterations is legal: the respondent may terminate the set before the
/// first pass.
fn contiguous_iterations(
    set: &RepeatableSet,
    index: &ResponseIndex<'_>,
) -> Result<Vec<u32>, SubmissionError> {
    let mut seen: Vec<u32> = set
        .prompts
        .iter()
        .flat_map(|prompt| index.iterations_for(&prompt.id))
        .collect::<HashSet<u32>>()
        .into_iter()
        .collect();
    seen.sort_unstable();

    let contiguous = seen
        .iter()
        .enumerate()
        .all(|(position, iteration)| *iteration == position as u32);
    if !contiguous {
        return Err(SubmissionError::IterationGap {
            id: set.id.clone(),
            seen,
        });
    }
    Ok(seen)
}

fn apply_limits(id: &str, value: &Value, limits: &Limits) -> Result<(), ValueError> {
    match value {
        Value::Text(text) => {
            let length = text.chars().count() as u64;
            if length > limits.max_text_length {
                return Err(ValueError::OutOfRange {
                    id: id.to_string(),
                    reason: format!(
                        "text length {length} is above the engine cap {}",
                        limits.max_text_length
                    ),
                });
            }
        }
        Value::CustomLabels(labels) => {
            if labels.len() > limits.max_custom_choices {
                return Err(ValueError::OutOfRange {
                    id: id.to_string(),
                    reason: format!(
                        "{} custom choices is above the engine cap {}",
                        labels.len(),
                        limits.max_custom_choices
                    ),
                });
            }
        }
        _ => {}
    }
    Ok(())
}

/// Index over raw responses keyed by `(prompt_id, iteration)`.
struct ResponseIndex<'a> {
    by_key: HashMap<(&'a str, Option<u32>), &'a Json>,
    consumed: HashSet<(&'a str, Option<u32>)>,
}

impl<'a> ResponseIndex<'a> {
    fn new(responses: &'a [RawResponse]) -> Result<Self, SubmissionError> {
        let mut by_key = HashMap::new();
        for response in responses {
            let key = (response.prompt_id.as_str(), response.iteration);
            if by_key.insert(key, &response.value).is_some() {
                return Err(SubmissionError::DuplicateResponse {
                    id: response.prompt_id.clone(),
                    iteration: response.iteration,
                });
            }
        }
        Ok(Self {
            by_key,
            consumed: HashSet::new(),
        })
    }

    // Lookups scan the keys instead of hashing: hashed lookups would tie the
    // probe key's lifetime to the index, but callers pass ids borrowed from
    // the campaign.
    fn take(&mut self, prompt_id: &str, iteration: Option<u32>) -> Option<&'a Json> {
        let (key, value) = self
            .by_key
            .iter()
            .find(|(key, _)| key.0 == prompt_id && key.1 == iteration)
            .map(|(key, value)| (*key, *value))?;
        self.consumed.insert(key);
        Some(value)
    }

    fn has_key(&self, prompt_id: &str, iteration: Option<u32>) -> bool {
        self.by_key
            .keys()
            .any(|key| key.0 == prompt_id && key.1 == iteration)
    }

    /// Any unconsumed response for this prompt id, at any iteration.
    fn has_any(&self, prompt_id: &str) -> bool {
        self.by_key
            .keys()
            .any(|(id, iteration)| *id == prompt_id && !self.consumed.contains(&(*id, *iteration)))
    }

    /// An iteration submitted for a prompt that lives outside any set.
    fn stray_iteration(&self, prompt_id: &str) -> Option<u32> {
        self.by_key
            .keys()
            .filter(|(id, _)| *id == prompt_id)
            .find_map(|(_, iteration)| *iteration)
    }

    fn iterations_for(&self, prompt_id: &str) -> Vec<u32> {
        self.by_key
            .keys()
            .filter(|(id, _)| *id == prompt_id)
            .filter_map(|(_, iteration)| *iteration)
            .collect()
    }

    /// First submitted response that no survey item consumed.
    fn first_unconsumed(&self, responses: &'a [RawResponse]) -> Option<&'a RawResponse> {
        responses.iter().find(|response| {
            !self
                .consumed
                .contains(&(response.prompt_id.as_str(), response.iteration))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{
        campaign, number_prompt, repeatable_set, response, survey, text_prompt,
    };
    use serde_json::json;

    fn gated_campaign() -> Campaign {
        let mut notes = text_prompt("notes");
        notes.condition = Some("mood >= 5".to_string());
        campaign(vec![survey(
            "daily",
            vec![
                SurveyItem::Prompt(number_prompt("mood", 0, 10)),
                SurveyItem::Prompt(notes),
            ],
        )])
    }

    fn check(campaign: &Campaign, responses: Vec<RawResponse>) -> Result<SurveyResponse, SubmissionError> {
        let submission = Submission {
            survey_id: "daily".to_string(),
            responses,
        };
        validate_submission(campaign, &submission, &Limits::default())
    }

    #[test]
    fn displayed_prompt_requires_a_real_value() {
        let campaign = gated_campaign();
        let result = check(
            &campaign,
            vec![
                response("mood", None, json!(7)),
                response("notes", None, json!("feeling good")),
            ],
        )
        .expect("ok");
        assert_eq!(result.responses.len(), 2);
        assert_eq!(
            result.response("notes", None).expect("notes").value,
            Value::Text("feeling good".to_string())
        );
    }

    #[test]
    fn hidden_prompt_requires_not_displayed_sentinel() {
        let campaign = gated_campaign();
        // mood < 5 hides notes.
        let result = check(
            &campaign,
            vec![
                response("mood", None, json!(2)),
                response("notes", None, json!("NOT_DISPLAYED")),
            ],
        )
        .expect("ok");
        assert_eq!(
            result.response("notes", None).expect("notes").value,
            Value::NoResponse(NoResponse::NotDisplayed)
        );

        let err = check(
            &campaign,
            vec![
                response("mood", None, json!(2)),
                response("notes", None, json!("sneaky")),
            ],
        )
        .expect_err("fail");
        assert_eq!(
            err,
            SubmissionError::HiddenPromptAnswered {
                id: "notes".to_string()
            }
        );
    }

    #[test]
    fn displayed_prompt_rejects_not_displayed_sentinel() {
        let campaign = gated_campaign();
        let err = check(
            &campaign,
            vec![
                response("mood", None, json!(9)),
                response("notes", None, json!("NOT_DISPLAYED")),
            ],
        )
        .expect_err("fail");
        assert_eq!(
            err,
            SubmissionError::NotDisplayedButShown {
                id: "notes".to_string()
            }
        );
    }

    #[test]
    fn skip_is_rejected_for_non_skippable_prompts() {
        let campaign = gated_campaign();
        let err = check(&campaign, vec![response("mood", None, json!("SKIPPED"))])
            .expect_err("fail");
        assert_eq!(
            err,
            SubmissionError::Value(ValueError::NotSkippable {
                id: "mood".to_string()
            })
        );
    }

    #[test]
    fn missing_and_duplicate_and_unknown_responses_are_errors() {
        let campaign = gated_campaign();
        assert_eq!(
            check(&campaign, vec![]).expect_err("fail"),
            SubmissionError::MissingResponse {
                id: "mood".to_string(),
                iteration: None
            }
        );

        assert_eq!(
            check(
                &campaign,
                vec![
                    response("mood", None, json!(7)),
                    response("mood", None, json!(8)),
                ],
            )
            .expect_err("fail"),
            SubmissionError::DuplicateResponse {
                id: "mood".to_string(),
                iteration: None
            }
        );

        assert_eq!(
            check(
                &campaign,
                vec![
                    response("mood", None, json!(7)),
                    response("notes", None, json!("ok")),
                    response("ghost", None, json!(1)),
                ],
            )
            .expect_err("fail"),
            SubmissionError::UnknownPrompt {
                id: "ghost".to_string()
            }
        );
    }

    #[test]
    fn unknown_survey_is_an_error() {
        let campaign = gated_campaign();
        let submission = Submission {
            survey_id: "nightly".to_string(),
            responses: vec![],
        };
        assert_eq!(
            validate_submission(&campaign, &submission, &Limits::default()).expect_err("fail"),
            SubmissionError::UnknownSurvey {
                id: "nightly".to_string()
            }
        );
    }

    #[test]
    fn messages_take_no_responses() {
        let campaign = campaign(vec![survey(
            "daily",
            vec![
                SurveyItem::Message(crate::core::survey_item::Message {
                    id: "welcome".to_string(),
                    condition: None,
                    text: "Welcome.".to_string(),
                }),
                SurveyItem::Prompt(number_prompt("mood", 0, 10)),
            ],
        )]);
        let err = check(
            &campaign,
            vec![
                response("welcome", None, json!("hi")),
                response("mood", None, json!(3)),
            ],
        )
        .expect_err("fail");
        assert_eq!(
            err,
            SubmissionError::MessageResponse {
                id: "welcome".to_string()
            }
        );
    }

    fn set_campaign() -> Campaign {
        let mut detail = text_prompt("detail");
        detail.condition = Some("rating >= 2".to_string());
        campaign(vec![survey(
            "daily",
            vec![
                SurveyItem::Prompt(number_prompt("mood", 0, 10)),
                SurveyItem::RepeatableSet(repeatable_set(
                    "meals",
                    vec![number_prompt("rating", 0, 3), detail],
                )),
            ],
        )])
    }

    #[test]
    fn repeatable_set_validates_each_iteration() {
        let campaign = set_campaign();
        let result = check(
            &campaign,
            vec![
                response("mood", None, json!(7)),
                response("rating", Some(0), json!(3)),
                response("detail", Some(0), json!("pasta")),
                response("rating", Some(1), json!(1)),
                response("detail", Some(1), json!("NOT_DISPLAYED")),
            ],
        )
        .expect("ok");
        assert_eq!(result.responses.len(), 5);
        assert_eq!(
            result.response("detail", Some(0)).expect("detail 0").value,
            Value::Text("pasta".to_string())
        );
        assert_eq!(
            result.response("detail", Some(1)).expect("detail 1").value,
            Value::NoResponse(NoResponse::NotDisplayed)
        );
    }

    #[test]
    fn repeatable_set_allows_zero_iterations() {
        let campaign = set_campaign();
        let result = check(&campaign, vec![response("mood", None, json!(7))]).expect("ok");
        assert_eq!(result.responses.len(), 1);
    }

    #[test]
    fn repeatable_set_iterations_must_be_contiguous() {
        let campaign = set_campaign();
        let err = check(
            &campaign,
            vec![
                response("mood", None, json!(7)),
                response("rating", Some(1), json!(3)),
                response("detail", Some(1), json!("pasta")),
            ],
        )
        .expect_err("fail");
        assert_eq!(
            err,
            SubmissionError::IterationGap {
                id: "meals".to_string(),
                seen: vec![1]
            }
        );
    }

    #[test]
    fn each_iteration_consumes_its_own_responses() {
        let campaign = set_campaign();
        // Iteration 0 is complete; iteration 1 is missing its detail response,
        // and the consumed iteration-0 entry must not stand in for it.
        let err = check(
            &campaign,
            vec![
                response("mood", None, json!(7)),
                response("rating", Some(0), json!(3)),
                response("detail", Some(0), json!("pasta")),
                response("rating", Some(1), json!(3)),
            ],
        )
        .expect_err("fail");
        assert_eq!(
            err,
            SubmissionError::MissingResponse {
                id: "detail".to_string(),
                iteration: Some(1)
            }
        );
    }

    #[test]
    fn nested_prompt_without_iteration_is_an_error() {
        let campaign = set_campaign();
        let err = check(
            &campaign,
            vec![
                response("mood", None, json!(7)),
                response("rating", None, json!(3)),
            ],
        )
        .expect_err("fail");
        assert_eq!(
            err,
            SubmissionError::MissingIteration {
                id: "rating".to_string()
            }
        );
    }

    #[test]
    fn hidden_set_rejects_responses() {
        let mut campaign = set_campaign();
        // Gate the set on a high mood.
        let Campaign { surveys, .. } = &mut campaign;
        let SurveyItem::RepeatableSet(set) = &mut surveys[0].items[1] else {
            panic!("expected set");
        };
        set.condition = Some("mood >= 5".to_string());

        let err = check(
            &campaign,
            vec![
                response("mood", None, json!(2)),
                response("rating", Some(0), json!(3)),
            ],
        )
        .expect_err("fail");
        assert_eq!(
            err,
            SubmissionError::HiddenSetAnswered {
                id: "meals".to_string()
            }
        );
    }

    #[test]
    fn top_level_prompt_rejects_iterations() {
        let campaign = gated_campaign();
        let err = check(
            &campaign,
            vec![response("mood", Some(0), json!(7))],
        )
        .expect_err("fail");
        assert_eq!(
            err,
            SubmissionError::UnexpectedIteration {
                id: "mood".to_string(),
                iteration: 0
            }
        );
    }

    #[test]
    fn engine_caps_apply_on_top_of_prompt_bounds() {
        let campaign = campaign(vec![survey(
            "daily",
            vec![SurveyItem::Prompt(text_prompt("notes"))],
        )]);
        let limits = Limits {
            max_text_length: 3,
            ..Limits::default()
        };
        let submission = Submission {
            survey_id: "daily".to_string(),
            responses: vec![response("notes", None, json!("too long"))],
        };
        let err = validate_submission(&campaign, &submission, &limits).expect_err("fail");
        assert!(matches!(
            err,
            SubmissionError::Value(ValueError::OutOfRange { .. })
        ));
    }

    #[test]
    fn too_many_responses_is_rejected_up_front() {
        let campaign = gated_campaign();
        let limits = Limits {
            max_responses: 1,
            ..Limits::default()
        };
        let submission = Submission {
            survey_id: "daily".to_string(),
            responses: vec![
                response("mood", None, json!(7)),
                response("notes", None, json!("hi")),
            ],
        };
        assert_eq!(
            validate_submission(&campaign, &submission, &limits).expect_err("fail"),
            SubmissionError::TooManyResponses { count: 2, limit: 1 }
        );
    }
}
