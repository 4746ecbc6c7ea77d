//! Campaign validation CLI.
//!
//! Validates campaign definitions (schema + invariants) and survey
//! submissions (condition-gated prompt validation) offline.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;

use campaign::core::submission::validate_submission;
use campaign::exit_codes;
use campaign::io::campaign_store::{load_campaign, write_campaign};
use campaign::io::settings::{Settings, load_settings, write_settings};
use campaign::io::submission_store::load_submission;

const V1_SCHEMA: &str = include_str!("../../schemas/campaign/v1.schema.json");
const STARTER_CAMPAIGN: &str = include_str!("../starter/campaign.json");

#[derive(Parser)]
#[command(
    name = "campaign",
    version,
    about = "Campaign-driven survey response validator"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write the bundled schema, a starter campaign, and default settings.
    Init {
        /// Overwrite existing files.
        #[arg(short, long)]
        force: bool,
    },
    /// Check a campaign definition against the schema and invariants.
    Validate {
        /// Path to the campaign definition JSON.
        campaign: PathBuf,
    },
    /// Validate a survey submission against a campaign definition.
    Check {
        /// Path to the campaign definition JSON.
        campaign: PathBuf,
        /// Path to the submission JSON.
        submission: PathBuf,
        /// Engine settings TOML (defaults apply when missing).
        #[arg(long, default_value = "settings.toml")]
        settings: PathBuf,
    },
}

fn main() -> ExitCode {
    campaign::logging::init();
    match run() {
        Ok(code) => ExitCode::from(code as u8),
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::from(exit_codes::INVALID as u8)
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    match cli.command {
        Command::Init { force } => cmd_init(force),
        Command::Validate { campaign } => cmd_validate(&campaign),
        Command::Check {
            campaign,
            submission,
            settings,
        } => cmd_check(&campaign, &submission, &settings),
    }
}

fn cmd_init(force: bool) -> Result<i32> {
    let schema_path = Path::new("schemas/campaign/v1.schema.json");
    fs::create_dir_all("schemas/campaign").context("create schema directory")?;
    if force || !schema_path.exists() {
        fs::write(schema_path, V1_SCHEMA).context("write v1 schema")?;
    }

    let campaign_path = Path::new("campaign.json");
    if force || !campaign_path.exists() {
        // The starter is itself a valid definition; round-trip it through the
        // model so init fails loudly if the bundle ever drifts.
        let starter = campaign::io::campaign_store::parse_campaign(V1_SCHEMA, STARTER_CAMPAIGN)
            .context("bundled starter campaign is invalid")?;
        write_campaign(campaign_path, &starter)?;
    }

    let settings_path = Path::new("settings.toml");
    if force || !settings_path.exists() {
        write_settings(settings_path, &Settings::default())?;
    }

    Ok(exit_codes::OK)
}

fn cmd_validate(campaign_path: &Path) -> Result<i32> {
    match load_campaign(V1_SCHEMA, campaign_path) {
        Ok(definition) => {
            println!(
                "campaign '{}' is valid ({} survey(s))",
                definition.urn,
                definition.surveys.len()
            );
            Ok(exit_codes::OK)
        }
        Err(err) => {
            eprintln!("{err:#}");
            Ok(exit_codes::CAMPAIGN_INVALID)
        }
    }
}

fn cmd_check(campaign_path: &Path, submission_path: &Path, settings_path: &Path) -> Result<i32> {
    let definition = match load_campaign(V1_SCHEMA, campaign_path) {
        Ok(definition) => definition,
        Err(err) => {
            eprintln!("{err:#}");
            return Ok(exit_codes::CAMPAIGN_INVALID);
        }
    };

    let settings = load_settings(settings_path)?;
    let submission = load_submission(submission_path)?;
    debug!(
        survey = %submission.survey_id,
        responses = submission.responses.len(),
        "checking submission"
    );

    match validate_submission(&definition, &submission, &settings.limits()) {
        Ok(result) => {
            println!(
                "submission to '{}' is valid ({} response(s))",
                result.survey_id,
                result.responses.len()
            );
            Ok(exit_codes::OK)
        }
        Err(err) => {
            eprintln!("submission rejected: {err}");
            Ok(exit_codes::SUBMISSION_REJECTED)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_init() {
        let cli = Cli::parse_from(["campaign", "init"]);
        assert!(matches!(cli.command, Command::Init { force: false }));
    }

    #[test]
    fn parse_init_force() {
        let cli = Cli::parse_from(["campaign", "init", "--force"]);
        assert!(matches!(cli.command, Command::Init { force: true }));
    }

    #[test]
    fn parse_check_with_default_settings_path() {
        let cli = Cli::parse_from(["campaign", "check", "c.json", "s.json"]);
        let Command::Check { settings, .. } = cli.command else {
            panic!("expected check");
        };
        assert_eq!(settings, PathBuf::from("settings.toml"));
    }

    #[test]
    fn bundled_starter_campaign_is_valid() {
        campaign::io::campaign_store::parse_campaign(V1_SCHEMA, STARTER_CAMPAIGN)
            .expect("starter campaign must validate");
    }
}
