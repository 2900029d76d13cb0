//! Field Normalizer - Defaults and exact field count.
//!
//! Row slicing always works on a list whose length equals the arrangement's
//! declared total, so this step runs before anything else touches the fields.

use crate::types::{FieldDescriptor, RawField};

use super::arrangement::Arrangement;

/// Normalize raw fields to exactly `arrangement.field_count()` entries.
///
/// Surplus fields are dropped from the end. Missing fields are appended as
/// empty placeholders (no content, weight 100, aligned top). Every kept field
/// gets its weight and alignment defaults filled in.
pub fn normalize_fields(raw: Vec<RawField>, arrangement: &Arrangement) -> Vec<FieldDescriptor> {
    let count = arrangement.field_count();
    let supplied = raw.len();

    let mut fields: Vec<FieldDescriptor> = raw
        .into_iter()
        .take(count)
        .map(FieldDescriptor::from)
        .collect();
    fields.resize_with(count, FieldDescriptor::default);

    if supplied != count {
        tracing::debug!(
            supplied,
            expected = count,
            arrangement = %arrangement,
            "field list adjusted to arrangement"
        );
    }

    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ContentReference, DEFAULT_FIELD_WIDTH};

    fn raw_with(library: &str) -> RawField {
        RawField {
            content: Some(ContentReference::new(library)),
            ..RawField::default()
        }
    }

    #[test]
    fn test_pads_short_list() {
        // "2-2" with three fields: the fourth slot is an empty placeholder
        let arrangement = Arrangement::parse("2-2").unwrap();
        let raw = vec![raw_with("H5P.A 1.0"), raw_with("H5P.B 1.0"), raw_with("H5P.C 1.0")];

        let fields = normalize_fields(raw, &arrangement);

        assert_eq!(fields.len(), 4);
        assert_eq!(fields[2].machine_name(), "H5P.C");
        assert!(fields[3].content.is_none());
        assert_eq!(fields[3].width, DEFAULT_FIELD_WIDTH);
    }

    #[test]
    fn test_truncates_long_list() {
        let arrangement = Arrangement::parse("1").unwrap();
        let raw = vec![raw_with("H5P.A 1.0"), raw_with("H5P.B 1.0")];

        let fields = normalize_fields(raw, &arrangement);

        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].machine_name(), "H5P.A");
    }

    #[test]
    fn test_fills_defaults() {
        let arrangement = Arrangement::parse("1").unwrap();
        let raw = vec![RawField {
            width: Some(50.0),
            ..RawField::default()
        }];

        let fields = normalize_fields(raw, &arrangement);

        assert_eq!(fields[0].width, 50.0);
        assert_eq!(fields[0].vertical_alignment.as_str(), "top");
    }

    #[test]
    fn test_zero_total() {
        let arrangement = Arrangement::parse("0").unwrap();
        assert!(normalize_fields(vec![raw_with("H5P.A 1.0")], &arrangement).is_empty());
    }
}
