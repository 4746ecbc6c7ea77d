//! Survey items: messages, prompts, and repeatable sets.

use serde::{Deserialize, Serialize};

use crate::core::prompt::Prompt;

/// Display-only item. Takes no response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    pub text: String,
}

/// A block of prompts the respondent may answer repeatedly.
///
/// After each iteration the client asks the termination question; responses
/// to the nested prompts carry a 0-based `iteration`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepeatableSet {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    pub termination_question: String,
    pub termination_true_label: String,
    pub termination_false_label: String,
    #[serde(default)]
    pub termination_skip_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub termination_skip_label: Option<String>,
    pub prompts: Vec<Prompt>,
}

/// One ordered entry in a survey, tagged by `item_type` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "item_type", rename_all = "snake_case")]
pub enum SurveyItem {
    Message(Message),
    RepeatableSet(RepeatableSet),
    Prompt(Prompt),
}

impl SurveyItem {
    pub fn id(&self) -> &str {
        match self {
            SurveyItem::Message(message) => &message.id,
            SurveyItem::RepeatableSet(set) => &set.id,
            SurveyItem::Prompt(prompt) => &prompt.id,
        }
    }

    pub fn condition(&self) -> Option<&str> {
        match self {
            SurveyItem::Message(message) => message.condition.as_deref(),
            SurveyItem::RepeatableSet(set) => set.condition.as_deref(),
            SurveyItem::Prompt(prompt) => prompt.condition.as_deref(),
        }
    }

    /// Prompts contained in this item, itself included if it is one.
    pub fn num_prompts(&self) -> usize {
        match self {
            SurveyItem::Prompt(_) => 1,
            SurveyItem::RepeatableSet(set) => set.prompts.len(),
            SurveyItem::Message(_) => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn item_type_tag_selects_the_variant() {
        let item: SurveyItem = serde_json::from_value(json!({
            "item_type": "message",
            "id": "welcome",
            "text": "Welcome to the study."
        }))
        .expect("deserialize");
        assert!(matches!(item, SurveyItem::Message(_)));
        assert_eq!(item.id(), "welcome");
        assert_eq!(item.num_prompts(), 0);
    }
}
