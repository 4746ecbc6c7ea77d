//! Per-type constraint payloads and coercion rules.
//!
//! Each prompt type owns its own module: how a raw submitted value is coerced
//! into the canonical [`crate::core::types::Value`], which condition literals
//! are legal against it, and what its configuration must look like.

pub mod choice;
pub mod number;
pub mod photo;
pub mod remote_activity;
pub mod text;
pub mod timestamp;

use serde_json::Value as Json;

/// Decode a raw value that may arrive as a JSON string wrapping JSON.
///
/// Mobile clients post multi-valued responses both as native arrays and as
/// strings containing a JSON array; both decode to the same canonical value.
pub(crate) fn unwrap_json_string(raw: &Json) -> Json {
    if let Json::String(inner) = raw
        && let Ok(parsed) = serde_json::from_str::<Json>(inner)
        && matches!(parsed, Json::Array(_) | Json::Object(_))
    {
        return parsed;
    }
    raw.clone()
}
