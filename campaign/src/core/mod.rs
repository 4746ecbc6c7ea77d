//! Pure validation logic: campaign model, prompt coercion, conditions, and
//! the submission pipeline. No I/O; fully deterministic.

pub mod campaign;
pub mod condition;
pub mod error;
pub mod invariants;
pub mod prompt;
pub mod prompt_types;
pub mod response;
pub mod submission;
pub mod survey_item;
pub mod types;
