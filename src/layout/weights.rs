//! Proportional sizing of fields inside a row.

use crate::types::FieldDescriptor;

/// Sum of the relative weights of a row's fields.
pub fn total_weight(fields: &[FieldDescriptor]) -> f64 {
    fields.iter().map(|field| field.width).sum()
}

/// Percentage of the row width a field with `width` takes.
///
/// A row without any weight (empty, or all zero) yields 0% for every field.
pub fn width_relative(width: f64, total_weight: f64) -> f64 {
    if total_weight > 0.0 {
        100.0 * width / total_weight
    } else {
        0.0
    }
}

/// Percentage shares for every field of a row, in order.
pub fn row_shares(fields: &[FieldDescriptor]) -> Vec<f64> {
    let total = total_weight(fields);
    fields
        .iter()
        .map(|field| width_relative(field.width, total))
        .collect()
}

/// CSS width for a percentage share.
pub fn percent_css(share: f64) -> String {
    format!("{share}%")
}
