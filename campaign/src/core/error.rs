//! Typed errors for the validation core.
//!
//! Error kinds are part of the engine contract: the same bad input always
//! produces the same kind, which callers match on to classify rejections.

use thiserror::Error;

/// Rejection of a submitted prompt value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    #[error("prompt '{id}' is not skippable")]
    NotSkippable { id: String },
    #[error("prompt '{id}': value has wrong type (expected {expected})")]
    WrongType { id: String, expected: &'static str },
    #[error("prompt '{id}': {reason}")]
    OutOfRange { id: String, reason: String },
    #[error("prompt '{id}': unknown choice key {key}")]
    UnknownChoiceKey { id: String, key: i64 },
    #[error("prompt '{id}': duplicate entry in multi-valued response")]
    DuplicateEntry { id: String },
    #[error("prompt '{id}': '{raw}' is not a valid {expected}")]
    Unparseable {
        id: String,
        raw: String,
        expected: &'static str,
    },
}

/// Rejection of a condition expression, clause, or its evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConditionError {
    #[error("condition parse error at byte {pos}: {message}")]
    Parse { pos: usize, message: String },
    #[error("condition references unknown prompt '{id}'")]
    UnknownPrompt { id: String },
    #[error("prompt '{id}' cannot be skipped, so comparing against SKIPPED is invalid")]
    SkippedNotPossible { id: String },
    #[error("prompt '{id}' ({prompt_type}) only supports sentinel comparisons")]
    SentinelOnly { id: String, prompt_type: String },
    #[error("sentinel literals only support == and != (prompt '{id}')")]
    SentinelOrdering { id: String },
    #[error("condition literal invalid for prompt '{id}': {reason}")]
    BadLiteral { id: String, reason: String },
}

/// Rejection of a survey submission as a whole.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SubmissionError {
    #[error("unknown survey '{id}'")]
    UnknownSurvey { id: String },
    #[error("response references unknown prompt '{id}'")]
    UnknownPrompt { id: String },
    #[error("duplicate response for prompt '{id}'{}", iteration_suffix(.iteration))]
    DuplicateResponse { id: String, iteration: Option<u32> },
    #[error("missing response for prompt '{id}'{}", iteration_suffix(.iteration))]
    MissingResponse { id: String, iteration: Option<u32> },
    #[error("prompt '{id}' was not displayed but carries a real value")]
    HiddenPromptAnswered { id: String },
    #[error("prompt '{id}' was displayed but carries NOT_DISPLAYED")]
    NotDisplayedButShown { id: String },
    #[error("'{id}' is a message and takes no response")]
    MessageResponse { id: String },
    #[error("repeatable set '{id}' was not displayed but has responses")]
    HiddenSetAnswered { id: String },
    #[error("repeatable set '{id}': iterations must be contiguous from 0 (saw {seen:?})")]
    IterationGap { id: String, seen: Vec<u32> },
    #[error("prompt '{id}' requires a repeatable-set iteration")]
    MissingIteration { id: String },
    #[error("prompt '{id}' is not in a repeatable set but carries iteration {iteration}")]
    UnexpectedIteration { id: String, iteration: u32 },
    #[error("submission has {count} responses, over the limit of {limit}")]
    TooManyResponses { count: usize, limit: usize },
    #[error(transparent)]
    Value(#[from] ValueError),
    #[error(transparent)]
    Condition(#[from] ConditionError),
}

fn iteration_suffix(iteration: &Option<u32>) -> String {
    match iteration {
        Some(iteration) => format!(" (iteration {iteration})"),
        None => String::new(),
    }
}
