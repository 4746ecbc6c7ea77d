//! Photo prompts. The response value is the UUID of the uploaded image.

use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use uuid::Uuid;

use crate::core::error::ValueError;
use crate::core::types::Value;

/// Capture constraints for photo prompts. Resolution bounds are advisory for
/// clients; the engine only records them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhotoRules {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vertical_resolution: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub horizontal_resolution: Option<u32>,
}

impl PhotoRules {
    pub fn validate(&self, id: &str, raw: &Json) -> Result<Value, ValueError> {
        let Json::String(text) = raw else {
            return Err(ValueError::WrongType {
                id: id.to_string(),
                expected: "photo UUID string",
            });
        };
        let uuid = Uuid::parse_str(text.trim()).map_err(|_| ValueError::Unparseable {
            id: id.to_string(),
            raw: text.clone(),
            expected: "UUID",
        })?;
        Ok(Value::Photo(uuid))
    }
}
