//! Row Builder - One row of slots from a contiguous run of fields.

use crate::instance::{InstanceWrapper, WrapperContext};
use crate::layout::{RowNode, SlotNode, row_shares};
use crate::types::FieldDescriptor;

/// A built row: its layout node and the wrappers of its fields, in order.
#[derive(Debug)]
pub struct BuiltRow {
    pub node: RowNode,
    pub wrappers: Vec<InstanceWrapper>,
}

/// Build the row for `fields`, the first of which sits at absolute index `start`.
///
/// Every field gets one wrapper, addressed by its absolute index, and one
/// slot sized to its share of the row's total weight.
pub fn build_row(fields: &[FieldDescriptor], start: usize, context: &WrapperContext<'_>) -> BuiltRow {
    let shares = row_shares(fields);
    let mut node = RowNode { slots: Vec::with_capacity(fields.len()) };
    let mut wrappers = Vec::with_capacity(fields.len());

    for (offset, (field, share)) in fields.iter().zip(shares).enumerate() {
        let index = start + offset;
        let wrapper = InstanceWrapper::new(index, field, context);

        node.slots.push(SlotNode {
            index,
            width_percent: share,
            vertical_alignment: field.vertical_alignment,
            target: wrapper.target().clone(),
        });
        wrappers.push(wrapper);
    }

    tracing::debug!(start, fields = fields.len(), "row built");
    BuiltRow { node, wrappers }
}
