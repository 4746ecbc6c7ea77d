//! Submission load helpers.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::core::submission::Submission;

/// Load a raw submission from a JSON file.
pub fn load_submission(path: &Path) -> Result<Submission> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read submission {}", path.display()))?;
    let submission: Submission = serde_json::from_str(&contents)
        .with_context(|| format!("parse submission {}", path.display()))?;
    Ok(submission)
}

/// Write a submission with pretty-printed formatting.
pub fn write_submission(path: &Path, submission: &Submission) -> Result<()> {
    let mut buf = serde_json::to_string_pretty(submission).context("serialize submission")?;
    buf.push('\n');
    fs::write(path, buf).with_context(|| format!("write submission {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::response;
    use serde_json::json;

    #[test]
    fn write_then_load_round_trips() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("submission.json");
        let submission = Submission {
            survey_id: "daily".to_string(),
            responses: vec![response("mood", None, json!(7))],
        };
        write_submission(&path, &submission).expect("write");
        let loaded = load_submission(&path).expect("load");
        assert_eq!(loaded, submission);
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("submission.json");
        fs::write(&path, "{not json").expect("write");
        let err = load_submission(&path).expect_err("should fail");
        assert!(err.to_string().contains("parse submission"));
    }
}
