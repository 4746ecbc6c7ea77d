//! CLI tests for the `campaign` binary.
//!
//! Spawns the binary and verifies exit codes for valid and rejected
//! campaigns and submissions.

use std::fs;
use std::path::Path;
use std::process::Command;

use serde_json::json;

use campaign::core::submission::Submission;
use campaign::exit_codes;
use campaign::io::submission_store::write_submission;
use campaign::test_support::response;

fn run(dir: &Path, args: &[&str]) -> i32 {
    Command::new(env!("CARGO_BIN_EXE_campaign"))
        .current_dir(dir)
        .args(args)
        .status()
        .expect("run campaign binary")
        .code()
        .expect("exit code")
}

fn init(dir: &Path) {
    assert_eq!(run(dir, &["init"]), exit_codes::OK);
}

#[test]
fn init_then_validate_succeeds() {
    let temp = tempfile::tempdir().expect("tempdir");
    init(temp.path());
    assert!(temp.path().join("campaign.json").exists());
    assert!(temp.path().join("settings.toml").exists());
    assert_eq!(
        run(temp.path(), &["validate", "campaign.json"]),
        exit_codes::OK
    );
}

#[test]
fn validate_rejects_broken_definitions() {
    let temp = tempfile::tempdir().expect("tempdir");
    init(temp.path());
    fs::write(temp.path().join("broken.json"), r#"{"urn": "urn:x"}"#).expect("write");
    assert_eq!(
        run(temp.path(), &["validate", "broken.json"]),
        exit_codes::CAMPAIGN_INVALID
    );
}

#[test]
fn check_accepts_a_well_formed_submission() {
    let temp = tempfile::tempdir().expect("tempdir");
    init(temp.path());

    let submission = Submission {
        survey_id: "daily".to_string(),
        responses: vec![
            response("mood", None, json!(8)),
            response("sleep_quality", None, json!(1)),
            response("low_mood_notes", None, json!("NOT_DISPLAYED")),
            response("wake_time", None, json!("2026-08-24T07:30:00")),
        ],
    };
    write_submission(&temp.path().join("submission.json"), &submission).expect("write");

    assert_eq!(
        run(temp.path(), &["check", "campaign.json", "submission.json"]),
        exit_codes::OK
    );
}

#[test]
fn check_rejects_a_hidden_prompt_with_a_real_value() {
    let temp = tempfile::tempdir().expect("tempdir");
    init(temp.path());

    // mood=8 hides low_mood_notes, so a real value there must be rejected.
    let submission = Submission {
        survey_id: "daily".to_string(),
        responses: vec![
            response("mood", None, json!(8)),
            response("sleep_quality", None, json!(1)),
            response("low_mood_notes", None, json!("still writing notes")),
            response("wake_time", None, json!("2026-08-24T07:30:00")),
        ],
    };
    write_submission(&temp.path().join("submission.json"), &submission).expect("write");

    assert_eq!(
        run(temp.path(), &["check", "campaign.json", "submission.json"]),
        exit_codes::SUBMISSION_REJECTED
    );
}

#[test]
fn check_honors_settings_caps() {
    let temp = tempfile::tempdir().expect("tempdir");
    init(temp.path());
    fs::write(
        temp.path().join("settings.toml"),
        "max_responses = 1\nmax_text_length = 65536\nmax_custom_choices = 100\n",
    )
    .expect("write settings");

    let submission = Submission {
        survey_id: "daily".to_string(),
        responses: vec![
            response("mood", None, json!(8)),
            response("sleep_quality", None, json!(1)),
            response("low_mood_notes", None, json!("NOT_DISPLAYED")),
            response("wake_time", None, json!("2026-08-24T07:30:00")),
        ],
    };
    write_submission(&temp.path().join("submission.json"), &submission).expect("write");

    assert_eq!(
        run(temp.path(), &["check", "campaign.json", "submission.json"]),
        exit_codes::SUBMISSION_REJECTED
    );
}
