//! Validated response records produced by the submission pipeline.

use serde::{Deserialize, Serialize};

use crate::core::types::{PromptType, Value};

/// One validated prompt response with its survey context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptResponse {
    pub prompt_id: String,
    pub prompt_type: PromptType,
    /// Iteration within a repeatable set, if the prompt lives in one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iteration: Option<u32>,
    pub value: Value,
}

/// A fully validated survey submission, responses in survey order
/// (iteration-major within repeatable sets).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyResponse {
    pub survey_id: String,
    pub responses: Vec<PromptResponse>,
}

impl SurveyResponse {
    /// Find the response for a prompt at an optional iteration.
    pub fn response(&self, prompt_id: &str, iteration: Option<u32>) -> Option<&PromptResponse> {
        self.responses
            .iter()
            .find(|response| response.prompt_id == prompt_id && response.iteration == iteration)
    }
}
