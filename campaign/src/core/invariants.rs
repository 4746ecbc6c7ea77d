//! Semantic campaign invariants not expressible via JSON Schema.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use crate::core::campaign::{Campaign, Survey};
use crate::core::condition::Condition;
use crate::core::prompt::Prompt;
use crate::core::survey_item::{RepeatableSet, SurveyItem};

static ID_RE: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"^[a-zA-Z0-9_]+$").expect("valid regex"));

/// Check semantic invariants beyond schema conformance:
/// - survey ids unique; item and nested prompt ids unique per survey
/// - ids restricted to `[a-zA-Z0-9_]`
/// - prompt-level constraint sanity (delegated to each prompt type)
/// - every condition parses, references only prompts visible at that point,
///   and each clause is legal for the referenced prompt
/// - the first item of a survey carries no condition
pub fn validate_invariants(campaign: &Campaign) -> Vec<String> {
    let mut errors = Vec::new();

    let mut survey_ids = HashSet::new();
    for survey in &campaign.surveys {
        if !survey_ids.insert(survey.id.as_str()) {
            errors.push(format!("duplicate survey id '{}'", survey.id));
        }
        check_id(&survey.id, &survey.id, &mut errors);
        validate_survey(survey, &mut errors);
    }

    errors
}

fn validate_survey(survey: &Survey, errors: &mut Vec<String>) {
    let mut seen_ids = HashSet::new();
    // Prompts visible to a condition at the current walk position.
    let mut visible: HashMap<String, Prompt> = HashMap::new();

    for (index, item) in survey.items.iter().enumerate() {
        let path = format!("{}/{}", survey.id, item.id());
        check_id(item.id(), &path, errors);
        if !seen_ids.insert(item.id().to_string()) {
            errors.push(format!("duplicate id '{}' in survey '{}'", item.id(), survey.id));
        }

        if index == 0 && item.condition().is_some() {
            errors.push(format!(
                "{path}: the first item of a survey cannot have a condition"
            ));
        } else if let Some(condition) = item.condition() {
            check_condition(condition, &path, &visible, errors);
        }

        match item {
            SurveyItem::Message(message) => {
                if message.text.trim().is_empty() {
                    errors.push(format!("{path}: text must not be empty"));
                }
            }
            SurveyItem::Prompt(prompt) => {
                prompt.invariants(&path, errors);
                visible.insert(prompt.id.clone(), prompt.clone());
            }
            SurveyItem::RepeatableSet(set) => {
                validate_repeatable_set(set, survey, &path, &mut seen_ids, &visible, errors);
            }
        }
    }
}

fn validate_repeatable_set(
    set: &RepeatableSet,
    survey: &Survey,
    path: &str,
    seen_ids: &mut HashSet<String>,
    outer: &HashMap<String, Prompt>,
    errors: &mut Vec<String>,
) {
    if set.termination_skip_enabled
        && set
            .termination_skip_label
            .as_deref()
            .is_none_or(|label| label.trim().is_empty())
    {
        errors.push(format!(
            "{path}: termination_skip_enabled requires a termination_skip_label"
        ));
    }

    // Nested conditions see outer prompts plus earlier prompts in the set.
    let mut visible = outer.clone();
    for prompt in &set.prompts {
        let prompt_path = format!("{path}/{}", prompt.id);
        check_id(&prompt.id, &prompt_path, errors);
        if !seen_ids.insert(prompt.id.clone()) {
            errors.push(format!(
                "duplicate id '{}' in survey '{}'",
                prompt.id, survey.id
            ));
        }
        if let Some(condition) = prompt.condition.as_deref() {
            check_condition(condition, &prompt_path, &visible, errors);
        }
        prompt.invariants(&prompt_path, errors);
        visible.insert(prompt.id.clone(), prompt.clone());
    }
}

fn check_condition(
    condition: &str,
    path: &str,
    visible: &HashMap<String, Prompt>,
    errors: &mut Vec<String>,
) {
    let parsed = match Condition::parse(condition) {
        Ok(parsed) => parsed,
        Err(err) => {
            errors.push(format!("{path}: {err}"));
            return;
        }
    };

    for pair in parsed.clauses() {
        match visible.get(&pair.prompt_id) {
            None => errors.push(format!(
                "{path}: condition references '{}' which is not an earlier prompt",
                pair.prompt_id
            )),
            Some(prompt) => {
                if let Err(err) = prompt.validate_condition_pair(pair) {
                    errors.push(format!("{path}: {err}"));
                }
            }
        }
    }
}

fn check_id(id: &str, path: &str, errors: &mut Vec<String>) {
    if !ID_RE.is_match(id) {
        errors.push(format!("{path}: id '{id}' must match [a-zA-Z0-9_]+"));
    }
}
