//! Taffy Bridge - Concrete geometry for an arranged layout
//!
//! Converts the layout tree into a Taffy flex tree, runs layout for a given
//! container width, and extracts one rectangle per slot.
//!
//! - The root is a column; each row is a flex row spanning the full width.
//! - Each slot is a leaf sized to its percentage share, never grown or shrunk.
//! - Vertical alignment maps to `align_self` inside the row.
//! - Slot heights come from the host through a measure callback.

use taffy::{
    AlignSelf as TaffyAlignSelf, AvailableSpace, Dimension as TaffyDimension,
    FlexDirection as TaffyFlexDirection, NodeId, Size, Style, TaffyTree,
};

use crate::error::Result;
use crate::types::VerticalAlignment;

use super::types::{LayoutTree, ResolvedLayout, ResolvedRow, ResolvedSlot, SlotNode};

// =============================================================================
// STYLE BUILDING
// =============================================================================

fn to_taffy_align_self(alignment: VerticalAlignment) -> Option<TaffyAlignSelf> {
    Some(match alignment {
        VerticalAlignment::Top => TaffyAlignSelf::FlexStart,
        VerticalAlignment::Center => TaffyAlignSelf::Center,
        VerticalAlignment::Bottom => TaffyAlignSelf::FlexEnd,
    })
}

fn root_style(container_width: f32) -> Style {
    Style {
        flex_direction: TaffyFlexDirection::Column,
        size: Size {
            width: TaffyDimension::Length(container_width),
            height: TaffyDimension::Auto,
        },
        ..Default::default()
    }
}

fn row_style() -> Style {
    Style {
        flex_direction: TaffyFlexDirection::Row,
        flex_shrink: 0.0,
        size: Size {
            width: TaffyDimension::Percent(1.0),
            height: TaffyDimension::Auto,
        },
        ..Default::default()
    }
}

fn slot_style(slot: &SlotNode) -> Style {
    Style {
        flex_grow: 0.0,
        flex_shrink: 0.0,
        flex_basis: TaffyDimension::Auto,
        align_self: to_taffy_align_self(slot.vertical_alignment),
        size: Size {
            width: TaffyDimension::Percent((slot.width_percent / 100.0) as f32),
            height: TaffyDimension::Auto,
        },
        ..Default::default()
    }
}

// =============================================================================
// MAIN ENTRY POINT
// =============================================================================

/// Resolve the layout tree for a container of `container_width`.
///
/// `content_height(index, width)` reports how tall the content of the field at
/// absolute `index` is when laid out at `width`. Rows are as tall as their
/// tallest slot; shorter slots are placed according to their alignment.
pub fn resolve_layout<F>(
    tree: &LayoutTree,
    container_width: f32,
    mut content_height: F,
) -> Result<ResolvedLayout>
where
    F: FnMut(usize, f32) -> f32,
{
    let mut taffy: TaffyTree<usize> = TaffyTree::new();

    // Build rows bottom-up, remembering which node belongs to which field
    let mut row_nodes: Vec<(NodeId, Vec<(usize, NodeId)>)> = Vec::with_capacity(tree.rows.len());
    for row in &tree.rows {
        let mut slot_nodes = Vec::with_capacity(row.slots.len());
        for slot in &row.slots {
            let node = taffy.new_leaf_with_context(slot_style(slot), slot.index)?;
            slot_nodes.push((slot.index, node));
        }

        let children: Vec<NodeId> = slot_nodes.iter().map(|&(_, node)| node).collect();
        let row_node = taffy.new_with_children(row_style(), &children)?;
        row_nodes.push((row_node, slot_nodes));
    }

    let root_children: Vec<NodeId> = row_nodes.iter().map(|(node, _)| *node).collect();
    let root = taffy.new_with_children(root_style(container_width), &root_children)?;

    let available = Size {
        width: AvailableSpace::Definite(container_width),
        height: AvailableSpace::MaxContent,
    };

    let mut measure_fn = |known_dimensions: Size<Option<f32>>,
                          available_space: Size<AvailableSpace>,
                          _node_id: NodeId,
                          context: Option<&mut usize>,
                          _style: &Style| {
        let Some(&mut index) = context else {
            return Size::ZERO;
        };

        let width = known_dimensions.width.unwrap_or(match available_space.width {
            AvailableSpace::Definite(w) => w,
            AvailableSpace::MinContent | AvailableSpace::MaxContent => 0.0,
        });

        Size {
            width,
            height: known_dimensions
                .height
                .unwrap_or_else(|| content_height(index, width).max(0.0)),
        }
    };

    taffy.compute_layout_with_measure(root, available, &mut measure_fn)?;

    // Extract results
    let root_layout = taffy.layout(root)?;
    let mut resolved = ResolvedLayout {
        width: root_layout.size.width,
        height: root_layout.size.height,
        rows: Vec::with_capacity(row_nodes.len()),
    };

    for (row_node, slot_nodes) in &row_nodes {
        let row_layout = taffy.layout(*row_node)?;
        let row_y = row_layout.location.y;

        let mut slots = Vec::with_capacity(slot_nodes.len());
        for &(index, node) in slot_nodes {
            let layout = taffy.layout(node)?;
            slots.push(ResolvedSlot {
                index,
                x: row_layout.location.x + layout.location.x,
                y: row_y + layout.location.y,
                width: layout.size.width,
                height: layout.size.height,
            });
        }

        resolved.rows.push(ResolvedRow {
            y: row_y,
            height: row_layout.size.height,
            slots,
        });
    }

    Ok(resolved)
}
