//! Stable exit codes for the campaign CLI.

/// Command succeeded.
pub const OK: i32 = 0;
/// I/O or usage failure (missing file, unreadable JSON, bad settings).
pub const INVALID: i32 = 1;
/// The campaign definition failed schema or invariant validation.
pub const CAMPAIGN_INVALID: i32 = 2;
/// The submission was rejected by the validation pipeline.
pub const SUBMISSION_REJECTED: i32 = 3;
