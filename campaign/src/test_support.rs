//! Test-only helpers for constructing campaigns and submissions.

use serde_json::Value as Json;

use crate::core::campaign::{Campaign, Survey};
use crate::core::prompt::{Prompt, PromptKind};
use crate::core::prompt_types::choice::{Choice, ChoiceRules};
use crate::core::prompt_types::number::NumberRules;
use crate::core::submission::RawResponse;
use crate::core::survey_item::{RepeatableSet, SurveyItem};
use crate::core::types::DisplayType;

/// Create a deterministic prompt with default fields around the given kind.
pub fn prompt(id: &str, kind: PromptKind) -> Prompt {
    Prompt {
        id: id.to_string(),
        condition: None,
        unit: None,
        text: format!("{id} text"),
        abbreviated_text: None,
        explanation_text: None,
        skippable: false,
        skip_label: None,
        display_type: DisplayType::Measurement,
        display_label: format!("{id} label"),
        kind,
    }
}

/// Non-skippable number prompt with inclusive bounds.
pub fn number_prompt(id: &str, min: i64, max: i64) -> Prompt {
    prompt(
        id,
        PromptKind::Number(NumberRules {
            min: Some(min),
            max: Some(max),
            default_value: None,
        }),
    )
}

/// Skippable free-text prompt with no length bounds.
pub fn text_prompt(id: &str) -> Prompt {
    let mut prompt = prompt(id, PromptKind::Text(Default::default()));
    prompt.skippable = true;
    prompt.skip_label = Some("Skip".to_string());
    prompt
}

/// Single-choice prompt over keys `0..labels.len()`.
pub fn single_choice_prompt(id: &str, labels: &[&str]) -> Prompt {
    let choices = labels
        .iter()
        .enumerate()
        .map(|(key, label)| Choice {
            key: key as i64,
            label: (*label).to_string(),
            value: None,
        })
        .collect();
    prompt(id, PromptKind::SingleChoice(ChoiceRules { choices }))
}

/// Repeatable set with deterministic termination labels.
pub fn repeatable_set(id: &str, prompts: Vec<Prompt>) -> RepeatableSet {
    RepeatableSet {
        id: id.to_string(),
        condition: None,
        termination_question: format!("Another {id}?"),
        termination_true_label: "Yes".to_string(),
        termination_false_label: "No".to_string(),
        termination_skip_enabled: false,
        termination_skip_label: None,
        prompts,
    }
}

/// Survey with deterministic title and submit text.
pub fn survey(id: &str, items: Vec<SurveyItem>) -> Survey {
    Survey {
        id: id.to_string(),
        title: format!("{id} title"),
        description: None,
        intro_text: None,
        submit_text: "Submit".to_string(),
        items,
    }
}

/// Campaign wrapping the given surveys.
pub fn campaign(surveys: Vec<Survey>) -> Campaign {
    Campaign {
        urn: "urn:campaign:test".to_string(),
        name: "Test campaign".to_string(),
        description: None,
        surveys,
    }
}

/// Raw submission entry.
pub fn response(prompt_id: &str, iteration: Option<u32>, value: Json) -> RawResponse {
    RawResponse {
        prompt_id: prompt_id.to_string(),
        iteration,
        value,
    }
}
