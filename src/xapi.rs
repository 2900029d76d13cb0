//! xAPI statements - Scored results and compound reports.
//!
//! Statements are plain JSON values (`serde_json::Value`) so children's
//! reports, produced by whatever content type they are, can be embedded
//! without a schema of our own.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

pub const VERB_BASE: &str = "http://adlnet.gov/expapi/verbs/";
pub const INTERACTION_ACTIVITY: &str = "http://adlnet.gov/expapi/activities/cmi.interaction";

/// Reporting tools expect an `en-US` entry even when the content is not English.
const FALLBACK_LANGUAGE: &str = "en-US";

static HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid HTML tag pattern"));

/// A statement plus the reports of the children it aggregates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XapiData {
    pub statement: Value,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<XapiData>,
}

// =============================================================================
// Text helpers
// =============================================================================

/// Normalize a language code to `ll-CC` form (`en_us` → `en-US`).
pub fn format_language_code(code: &str) -> String {
    let mut parts = code.trim().split(['-', '_']).filter(|part| !part.is_empty());
    let Some(language) = parts.next() else {
        return "en".to_string();
    };

    let mut tag = language.to_lowercase();
    for region in parts {
        tag.push('-');
        tag.push_str(&region.to_uppercase());
    }
    tag
}

/// Remove HTML tags from `text`.
pub fn strip_html(text: &str) -> String {
    HTML_TAG.replace_all(text, "").into_owned()
}

/// Longest title reported, in characters, ellipsis included.
pub const MAX_TITLE_LENGTH: usize = 60;

/// Plain-text title from metadata, or `fallback` when it is missing or empty.
///
/// Titles longer than [`MAX_TITLE_LENGTH`] are cut and end in `...`.
pub fn create_title(title: Option<&str>, fallback: &str) -> String {
    let title = title.map(strip_html).unwrap_or_default();
    let title = match title.trim() {
        "" => fallback,
        title => title,
    };

    if title.chars().count() > MAX_TITLE_LENGTH {
        let cut: String = title.chars().take(MAX_TITLE_LENGTH - 3).collect();
        format!("{cut}...")
    } else {
        title.to_string()
    }
}

// =============================================================================
// Statements
// =============================================================================

/// Object definition of a compound activity.
pub fn activity_definition(language_tag: &str, title: &str, description: &str) -> Value {
    let localized = |text: &str| {
        let mut map = Map::new();
        map.insert(language_tag.to_string(), Value::String(text.to_string()));
        map.insert(FALLBACK_LANGUAGE.to_string(), Value::String(text.to_string()));
        Value::Object(map)
    };

    json!({
        "name": localized(title),
        "description": localized(&strip_html(description)),
        "type": INTERACTION_ACTIVITY,
        "interactionType": "compound",
    })
}

/// A statement with `verb` (short id, e.g. `"answered"`) about an activity.
pub fn statement(verb: &str, definition: Value) -> Value {
    json!({
        "verb": {
            "id": format!("{VERB_BASE}{verb}"),
            "display": { FALLBACK_LANGUAGE: verb },
        },
        "object": {
            "objectType": "Activity",
            "definition": definition,
        },
    })
}

/// Attach a scored result to `statement`.
///
/// `scaled` is rounded to four decimals and omitted when `max_score` is 0.
/// `completion` and `success` are only reported when given.
pub fn set_scored_result(
    statement: &mut Value,
    score: f64,
    max_score: f64,
    completion: Option<bool>,
    success: Option<bool>,
) {
    let mut result_score = json!({ "min": 0, "max": max_score, "raw": score });
    if max_score > 0.0 {
        result_score["scaled"] = json!((score / max_score * 10_000.0).round() / 10_000.0);
    }

    let mut result = json!({ "score": result_score });
    if let Some(completion) = completion {
        result["completion"] = json!(completion);
    }
    if let Some(success) = success {
        result["success"] = json!(success);
    }
    statement["result"] = result;
}
