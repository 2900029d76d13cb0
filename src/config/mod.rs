//! Configuration - Parameters and extras as the host hands them over.
//!
//! Both arrive as JSON with camelCase keys. Decoding is lenient wherever the
//! data is only advisory: a non-string image height limit, a previous state
//! without a `children` array or unknown keys are ignored rather than
//! rejected.
//!
//! ```ignore
//! let params = PlaceholderParams::from_json(r#"{"arrangement": "2-1", "fields": []}"#)?;
//! let extras = ContentExtras::from_value(json!({ "isRoot": true }))?;
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::layout::DEFAULT_ARRANGEMENT;
use crate::types::{RawField, empty_state};
use crate::xapi::format_language_code;

/// Background value meaning "no explicit background".
pub const TRANSPARENT_BACKGROUND: &str = "rgba(0, 0, 0, 0)";

const DEFAULT_LANGUAGE: &str = "en";

fn default_arrangement() -> String {
    DEFAULT_ARRANGEMENT.to_string()
}

fn string_or_none<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(value) => Some(value),
        _ => None,
    })
}

// =============================================================================
// Parameters
// =============================================================================

/// Layout parameters of one placeholder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceholderParams {
    #[serde(default = "default_arrangement")]
    pub arrangement: String,
    #[serde(default)]
    pub fields: Vec<RawField>,
    /// Free-form CSS length, unsanitized.
    #[serde(default, deserialize_with = "string_or_none", skip_serializing_if = "Option::is_none")]
    pub image_height_limit: Option<String>,
    #[serde(default, deserialize_with = "string_or_none", skip_serializing_if = "Option::is_none")]
    pub color_background: Option<String>,
}

impl Default for PlaceholderParams {
    fn default() -> Self {
        Self {
            arrangement: default_arrangement(),
            fields: Vec::new(),
            image_height_limit: None,
            color_background: None,
        }
    }
}

impl PlaceholderParams {
    /// Decode parameters, either bare or wrapped as `{"placeholder": {...}}`.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(mut map) if map.contains_key("placeholder") => {
                Self::from_value(map.remove("placeholder").unwrap_or(Value::Null))
            }
            Value::Null => Ok(Self::default()),
            other => Ok(serde_json::from_value(other)?),
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_value(serde_json::from_str(json)?)
    }

    /// Sanitized image height limit, see [`sanitize_image_height_limit`].
    pub fn image_height_limit(&self) -> Option<String> {
        self.image_height_limit
            .as_deref()
            .and_then(sanitize_image_height_limit)
    }

    /// Background color to apply, `None` for the transparent sentinel.
    pub fn background(&self) -> Option<String> {
        self.color_background
            .as_deref()
            .filter(|color| !color.is_empty() && *color != TRANSPARENT_BACKGROUND)
            .map(str::to_string)
    }
}

/// Normalize a CSS length: drop the first space, assume `px` for bare numbers.
///
/// Empty input yields `None`.
pub fn sanitize_image_height_limit(length: &str) -> Option<String> {
    let length = length.replacen(' ', "", 1);
    if length.trim().is_empty() {
        return None;
    }

    let is_number = length.trim().parse::<f64>().is_ok_and(|value| !value.is_nan());
    Some(if is_number { format!("{length}px") } else { length })
}

// =============================================================================
// Extras
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentMetadata {
    #[serde(default, deserialize_with = "string_or_none", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "string_or_none", skip_serializing_if = "Option::is_none")]
    pub default_language: Option<String>,
}

/// Everything besides the parameters: saved state, metadata, root flag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentExtras {
    /// As saved from a previous `current_state()`, i.e. `{"children": [...]}`.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub previous_state: Value,
    #[serde(default)]
    pub metadata: ContentMetadata,
    /// Set when the placeholder is the top-level content.
    #[serde(default)]
    pub is_root: bool,
}

impl ContentExtras {
    pub fn from_value(value: Value) -> Result<Self> {
        if value.is_null() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_value(value)?)
    }

    pub fn with_previous_children(mut self, children: Vec<Value>) -> Self {
        self.previous_state = serde_json::json!({ "children": children });
        self
    }

    /// Per-field previous states, positional. Empty when none were saved.
    pub fn previous_children(&self) -> Vec<Value> {
        self.previous_state
            .get("children")
            .and_then(Value::as_array)
            .map(|children| {
                children
                    .iter()
                    .map(|child| if child.is_null() { empty_state() } else { child.clone() })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Language tag of the content, e.g. `en-US`.
    pub fn language_tag(&self) -> String {
        format_language_code(
            self.metadata
                .default_language
                .as_deref()
                .filter(|language| !language.is_empty())
                .unwrap_or(DEFAULT_LANGUAGE),
        )
    }
}
