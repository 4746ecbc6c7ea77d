//! Campaign definition load/save with schema + invariant validation.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use jsonschema::Draft;
use serde_json::Value;

use crate::core::campaign::Campaign;
use crate::core::invariants::validate_invariants;

/// Load and validate a campaign definition from disk (schema + invariants).
pub fn load_campaign(schema_raw: &str, path: &Path) -> Result<Campaign> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read campaign {}", path.display()))?;
    parse_campaign(schema_raw, &contents)
        .with_context(|| format!("validate campaign {}", path.display()))
}

/// Parse and validate a campaign definition: schema conformance first, then
/// semantic invariants.
pub fn parse_campaign(schema_raw: &str, contents: &str) -> Result<Campaign> {
    let instance: Value = serde_json::from_str(contents).context("parse campaign json")?;
    validate_schema(schema_raw, &instance)?;
    let campaign: Campaign =
        serde_json::from_value(instance).context("deserialize campaign definition")?;
    let errors = validate_invariants(&campaign);
    if !errors.is_empty() {
        bail!("campaign invariants failed:\n- {}", errors.join("\n- "));
    }
    Ok(campaign)
}

/// Write a campaign definition with pretty-printed formatting.
pub fn write_campaign(path: &Path, campaign: &Campaign) -> Result<()> {
    let mut buf = serde_json::to_string_pretty(campaign).context("serialize campaign")?;
    buf.push('\n');
    fs::write(path, buf).with_context(|| format!("write campaign {}", path.display()))
}

/// Validate a JSON instance against the campaign schema (Draft 2020-12).
fn validate_schema(schema_raw: &str, instance: &Value) -> Result<()> {
    let schema: Value = serde_json::from_str(schema_raw).context("parse campaign schema")?;
    let compiled = jsonschema::options()
        .with_draft(Draft::Draft202012)
        .build(&schema)
        .context("compile campaign schema")?;
    let messages: Vec<String> = compiled
        .iter_errors(instance)
        .map(|err| err.to_string())
        .collect();
    if !messages.is_empty() {
        bail!("campaign schema validation failed:\n- {}", messages.join("\n- "));
    }
    Ok(())
}
