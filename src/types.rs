//! Core types for spark-placeholder.
//!
//! These types describe the fields a placeholder arranges. They are decoded
//! from the host's parameter JSON, normalized once, and then flow unchanged
//! through the layout and into the instance wrappers.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Relative weight a field gets when the parameters do not set one.
pub const DEFAULT_FIELD_WIDTH: f64 = 100.0;

/// An empty JSON object, the neutral value for opaque per-field state.
pub fn empty_state() -> Value {
    Value::Object(Map::new())
}

// =============================================================================
// Vertical Alignment
// =============================================================================

/// Vertical placement of a field's content inside its row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlignment {
    #[default]
    Top,
    Center,
    Bottom,
}

impl VerticalAlignment {
    /// Parse an alignment keyword, falling back to `Top` for anything unknown.
    pub fn parse_lossy(value: &str) -> Self {
        match value.trim() {
            "center" => Self::Center,
            "bottom" => Self::Bottom,
            _ => Self::Top,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Center => "center",
            Self::Bottom => "bottom",
        }
    }
}

// =============================================================================
// Content Reference
// =============================================================================

/// Descriptor of the embedded content a field hosts.
///
/// `library` is the versioned type identifier as the host spells it,
/// e.g. `"H5P.Image 1.1"`. `params` is handed to the host untouched, apart
/// from registered parameter patches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentReference {
    #[serde(default)]
    pub library: String,
    #[serde(default)]
    pub params: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_content_id: Option<String>,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub metadata: Value,
}

impl ContentReference {
    pub fn new(library: impl Into<String>) -> Self {
        Self {
            library: library.into(),
            params: empty_state(),
            sub_content_id: None,
            metadata: Value::Null,
        }
    }

    pub fn with_params(mut self, params: Value) -> Self {
        self.params = params;
        self
    }

    pub fn with_sub_content_id(mut self, id: impl Into<String>) -> Self {
        self.sub_content_id = Some(id.into());
        self
    }

    /// Type identifier without the version suffix (`"H5P.Image 1.1"` → `"H5P.Image"`).
    pub fn machine_name(&self) -> &str {
        self.library.split(' ').next().unwrap_or_default()
    }
}

// =============================================================================
// Field Descriptors
// =============================================================================

/// A field exactly as it appears in the parameters; every member may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawField {
    #[serde(default)]
    pub content: Option<ContentReference>,
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub vertical_alignment: Option<String>,
    #[serde(default)]
    pub is_hidden: bool,
}

/// A normalized field: defaults filled in, immutable for the session.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    pub content: Option<ContentReference>,
    /// Relative weight inside the row. Never negative.
    pub width: f64,
    pub vertical_alignment: VerticalAlignment,
    pub is_hidden: bool,
}

impl Default for FieldDescriptor {
    fn default() -> Self {
        Self {
            content: None,
            width: DEFAULT_FIELD_WIDTH,
            vertical_alignment: VerticalAlignment::Top,
            is_hidden: false,
        }
    }
}

impl FieldDescriptor {
    /// Field holding `content` with default weight and alignment.
    pub fn with_content(content: ContentReference) -> Self {
        Self {
            content: Some(content),
            ..Self::default()
        }
    }

    pub fn width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }

    pub fn aligned(mut self, alignment: VerticalAlignment) -> Self {
        self.vertical_alignment = alignment;
        self
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.is_hidden = hidden;
        self
    }

    /// Machine name of the hosted content, empty when there is none.
    pub fn machine_name(&self) -> &str {
        self.content
            .as_ref()
            .map(ContentReference::machine_name)
            .unwrap_or_default()
    }
}

impl From<RawField> for FieldDescriptor {
    fn from(raw: RawField) -> Self {
        // Negative or non-finite weights would make the row shares meaningless
        let width = match raw.width {
            Some(w) if w.is_finite() && w >= 0.0 => w,
            Some(_) => 0.0,
            None => DEFAULT_FIELD_WIDTH,
        };

        Self {
            content: raw.content,
            width,
            vertical_alignment: raw
                .vertical_alignment
                .as_deref()
                .map(VerticalAlignment::parse_lossy)
                .unwrap_or_default(),
            is_hidden: raw.is_hidden,
        }
    }
}
