//! Engine settings stored as TOML.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::core::submission::Limits;

/// Engine settings (TOML).
///
/// Intended to be edited by operators. Missing fields (or a missing file)
/// default to the engine's built-in caps.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Maximum raw responses accepted in one submission.
    pub max_responses: usize,
    /// Hard cap on text response length, in characters.
    pub max_text_length: u64,
    /// Maximum entries in a custom multi-choice response.
    pub max_custom_choices: usize,
}

impl Default for Settings {
    fn default() -> Self {
        let limits = Limits::default();
        Self {
            max_responses: limits.max_responses,
            max_text_length: limits.max_text_length,
            max_custom_choices: limits.max_custom_choices,
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        if self.max_responses == 0 {
            return Err(anyhow!("max_responses must be > 0"));
        }
        if self.max_text_length == 0 {
            return Err(anyhow!("max_text_length must be > 0"));
        }
        if self.max_custom_choices == 0 {
            return Err(anyhow!("max_custom_choices must be > 0"));
        }
        Ok(())
    }

    pub fn limits(&self) -> Limits {
        Limits {
            max_responses: self.max_responses,
            max_text_length: self.max_text_length,
            max_custom_choices: self.max_custom_choices,
        }
    }
}

/// Load settings from a TOML file.
///
/// If the file is missing, returns `Settings::default()`.
pub fn load_settings(path: &Path) -> Result<Settings> {
    if !path.exists() {
        let settings = Settings::default();
        settings.validate()?;
        return Ok(settings);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let settings: Settings =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    settings.validate()?;
    Ok(settings)
}

/// Atomically write settings to disk (temp file + rename).
pub fn write_settings(path: &Path, settings: &Settings) -> Result<()> {
    settings.validate()?;
    let mut buf = toml::to_string_pretty(settings).context("serialize settings toml")?;
    buf.push('\n');
    write_atomic(path, &buf)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("settings path missing parent {}", path.display()))?;
    fs::create_dir_all(parent).with_context(|| format!("create directory {}", parent.display()))?;
    let tmp_path = path.with_extension("toml.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp settings {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace settings {}", path.display()))?;
    Ok(())
}
