//! Campaign-driven survey response validation engine.
//!
//! A campaign definition declares surveys of typed prompts; prompts can be
//! gated by boolean conditions over earlier responses. This crate validates
//! both sides of that contract:
//!
//! - **[`core`]**: Pure, deterministic logic (prompt value coercion,
//!   condition parsing and evaluation, campaign invariants, the submission
//!   pipeline). No I/O, fully testable in isolation.
//! - **[`io`]**: Side-effecting operations (loading campaign definitions with
//!   schema validation, submissions, engine settings).
//!
//! The `campaign` binary wires both into `init` / `validate` / `check`
//! commands.

pub mod core;
pub mod exit_codes;
pub mod io;
pub mod logging;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
