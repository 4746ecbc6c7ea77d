//! Side-effecting operations: loading definitions, submissions, settings.

pub mod campaign_store;
pub mod settings;
pub mod submission_store;
