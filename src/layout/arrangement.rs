//! Arrangement Parser - Row sizes from a compact `"2-1-3"` string.
//!
//! An arrangement lists how many fields sit in each row, top to bottom.
//! Parsing happens once per session; the result is immutable.

use std::fmt;
use std::str::FromStr;

use crate::error::{PlaceholderError, Result};

/// Arrangement used when the parameters do not provide one.
pub const DEFAULT_ARRANGEMENT: &str = "1";

/// Ordered row sizes of a layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arrangement {
    rows: Vec<usize>,
}

impl Arrangement {
    /// Parse a `-`-separated list of non-negative integers.
    ///
    /// Every token must be a plain decimal number. Empty tokens (`"2--1"`),
    /// signs, and anything else are rejected instead of being coerced.
    pub fn parse(input: &str) -> Result<Self> {
        let rows = input
            .split('-')
            .map(|token| parse_row_size(token.trim()))
            .collect::<Result<Vec<_>>>()?;

        if rows.iter().try_fold(0usize, |total, &size| total.checked_add(size)).is_none() {
            return Err(PlaceholderError::InvalidArrangement {
                token: input.to_string(),
                reason: "total field count out of range".to_string(),
            });
        }

        Ok(Self { rows })
    }

    /// Build an arrangement from row sizes directly.
    pub fn from_rows(rows: impl Into<Vec<usize>>) -> Self {
        Self { rows: rows.into() }
    }

    /// Row sizes in order.
    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of fields the arrangement demands (sum of all row sizes).
    pub fn field_count(&self) -> usize {
        self.rows.iter().fold(0, |total, &size| total.saturating_add(size))
    }

    /// Absolute index ranges of each row within the flat field list.
    pub fn row_ranges(&self) -> impl Iterator<Item = std::ops::Range<usize>> + '_ {
        self.rows.iter().scan(0usize, |cursor, &size| {
            let start = *cursor;
            *cursor = cursor.saturating_add(size);
            Some(start..*cursor)
        })
    }
}

impl Default for Arrangement {
    fn default() -> Self {
        Self { rows: vec![1] }
    }
}

impl FromStr for Arrangement {
    type Err = PlaceholderError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Arrangement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, size) in self.rows.iter().enumerate() {
            if i > 0 {
                f.write_str("-")?;
            }
            write!(f, "{size}")?;
        }
        Ok(())
    }
}

fn parse_row_size(token: &str) -> Result<usize> {
    let invalid = |reason: &str| PlaceholderError::InvalidArrangement {
        token: token.to_string(),
        reason: reason.to_string(),
    };

    if token.is_empty() {
        return Err(invalid("empty row size"));
    }
    if !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid("row size must be a non-negative integer"));
    }

    token.parse::<usize>().map_err(|_| invalid("row size out of range"))
}
