//! Composition Root - All rows, one flat wrapper list.
//!
//! ```text
//! arrangement "2-1"     fields [a, b, c]
//!   row 0: cursor 0..2  → wrappers #0 #1
//!   row 1: cursor 2..3  → wrapper  #2
//! flat wrappers: [#0, #1, #2]   (position == absolute index)
//! ```

use std::rc::Rc;

use crate::instance::{InstanceWrapper, WrapperContext};
use crate::layout::{Arrangement, LayoutTree, normalize_fields};
use crate::types::{FieldDescriptor, RawField};

use super::row::build_row;

#[derive(Debug)]
pub struct Composition {
    pub arrangement: Arrangement,
    /// Normalized fields; exactly `arrangement.field_count()` of them.
    pub fields: Vec<FieldDescriptor>,
    pub tree: LayoutTree,
    /// Wrapper for field `i` at position `i`.
    pub wrappers: Rc<[InstanceWrapper]>,
    /// True when any field is a task.
    pub is_task: bool,
}

impl Composition {
    /// Normalize `raw_fields` against `arrangement` and build every row.
    pub fn build(
        arrangement: Arrangement,
        raw_fields: Vec<RawField>,
        background: Option<String>,
        context: &WrapperContext<'_>,
    ) -> Self {
        let fields = normalize_fields(raw_fields, &arrangement);

        let mut tree = LayoutTree {
            background,
            rows: Vec::with_capacity(arrangement.row_count()),
        };
        let mut wrappers = Vec::with_capacity(fields.len());

        for range in arrangement.row_ranges() {
            let start = range.start;
            let row = build_row(&fields[range], start, context);
            tree.rows.push(row.node);
            wrappers.extend(row.wrappers);
        }

        let is_task = wrappers.iter().any(InstanceWrapper::is_task);
        tracing::debug!(
            arrangement = %arrangement,
            fields = fields.len(),
            is_task,
            "composition built"
        );

        Self {
            arrangement,
            fields,
            tree,
            wrappers: Rc::from(wrappers),
            is_task,
        }
    }

    pub fn wrapper(&self, index: usize) -> Option<&InstanceWrapper> {
        self.wrappers.get(index)
    }
}
