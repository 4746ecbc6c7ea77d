//! Campaign and survey configuration model.

use serde::{Deserialize, Serialize};

use crate::core::prompt::Prompt;
use crate::core::survey_item::SurveyItem;

/// An ordered questionnaire within a campaign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Survey {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intro_text: Option<String>,
    pub submit_text: String,
    pub items: Vec<SurveyItem>,
}

impl Survey {
    /// Find a prompt by id anywhere in the survey, with the id of its
    /// enclosing repeatable set if nested.
    pub fn find_prompt(&self, prompt_id: &str) -> Option<(&Prompt, Option<&str>)> {
        for item in &self.items {
            match item {
                SurveyItem::Prompt(prompt) if prompt.id == prompt_id => {
                    return Some((prompt, None));
                }
                SurveyItem::RepeatableSet(set) => {
                    if let Some(prompt) = set.prompts.iter().find(|p| p.id == prompt_id) {
                        return Some((prompt, Some(set.id.as_str())));
                    }
                }
                _ => {}
            }
        }
        None
    }

    pub fn num_prompts(&self) -> usize {
        self.items.iter().map(SurveyItem::num_prompts).sum()
    }
}

/// A campaign: identity plus its surveys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    pub urn: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub surveys: Vec<Survey>,
}

impl Campaign {
    pub fn survey(&self, survey_id: &str) -> Option<&Survey> {
        self.surveys.iter().find(|survey| survey.id == survey_id)
    }
}
