//! Error types.
//!
//! Almost nothing in this crate fails: malformed fields, short previous-state
//! lists, missing capabilities and stray scoring events are all defaulted or
//! ignored. The few real failures are collected here.

use thiserror::Error;

/// Errors raised at the configuration and layout boundaries.
#[derive(Debug, Error)]
pub enum PlaceholderError {
    /// A row-size token of the arrangement string is not a non-negative integer.
    #[error("invalid arrangement token {token:?}: {reason}")]
    InvalidArrangement { token: String, reason: String },

    /// Parameters or extras could not be decoded from JSON.
    #[error("failed to decode parameters: {0}")]
    Params(#[from] serde_json::Error),

    /// The layout engine rejected the tree.
    #[error("layout computation failed: {0}")]
    Layout(#[from] taffy::TaffyError),
}

pub type Result<T> = std::result::Result<T, PlaceholderError>;
