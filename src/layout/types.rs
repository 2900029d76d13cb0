//! Layout tree types.
//!
//! The tree mirrors what a host renders:
//!
//! ```text
//! LayoutTree (h5p-portfolio-placeholder-contents, optional background)
//! ├── RowNode (h5p-portfolio-placeholder-content-row)
//! │   ├── SlotNode (width 50%, vertical-alignment-top) → RenderTarget #0
//! │   └── SlotNode (width 50%, vertical-alignment-top) → RenderTarget #1
//! └── RowNode
//!     └── SlotNode (width 100%, vertical-alignment-center) → RenderTarget #2
//! ```

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::types::VerticalAlignment;

use super::weights::percent_css;

pub const SLOT_CLASS: &str = "h5p-portfolio-placeholder-content";
pub const INSTANCE_CLASS: &str = "h5p-portfolio-placeholder-content-instance";

// =============================================================================
// Render Target
// =============================================================================

/// The container one field's instance renders into.
///
/// Shared between the instance factory, customization hooks and the layout
/// tree, so styles set by any of them end up on the same node.
#[derive(Debug)]
pub struct RenderTarget {
    index: usize,
    classes: RefCell<Vec<String>>,
    styles: RefCell<BTreeMap<String, String>>,
}

impl RenderTarget {
    pub fn new(index: usize) -> Rc<Self> {
        Rc::new(Self {
            index,
            classes: RefCell::new(vec![INSTANCE_CLASS.to_string()]),
            styles: RefCell::new(BTreeMap::new()),
        })
    }

    /// Absolute index of the field this target belongs to.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn add_class(&self, class: impl Into<String>) {
        let class = class.into();
        let mut classes = self.classes.borrow_mut();
        if !classes.contains(&class) {
            classes.push(class);
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.borrow().iter().any(|c| c == class)
    }

    pub fn classes(&self) -> Vec<String> {
        self.classes.borrow().clone()
    }

    /// Set an inline style property. An empty value removes it.
    pub fn set_style(&self, property: impl Into<String>, value: impl Into<String>) {
        let property = property.into();
        let value = value.into();
        let mut styles = self.styles.borrow_mut();
        if value.is_empty() {
            styles.remove(&property);
        } else {
            styles.insert(property, value);
        }
    }

    pub fn style(&self, property: &str) -> Option<String> {
        self.styles.borrow().get(property).cloned()
    }
}

// =============================================================================
// Tree Nodes
// =============================================================================

/// One field's cell inside a row.
#[derive(Debug, Clone)]
pub struct SlotNode {
    /// Absolute index in the flat field list.
    pub index: usize,
    /// Share of the row width in percent.
    pub width_percent: f64,
    pub vertical_alignment: VerticalAlignment,
    pub target: Rc<RenderTarget>,
}

impl SlotNode {
    pub fn width_css(&self) -> String {
        percent_css(self.width_percent)
    }

    pub fn classes(&self) -> [String; 2] {
        [
            SLOT_CLASS.to_string(),
            format!("vertical-alignment-{}", self.vertical_alignment.as_str()),
        ]
    }
}

/// A horizontal run of slots.
#[derive(Debug, Clone, Default)]
pub struct RowNode {
    pub slots: Vec<SlotNode>,
}

impl RowNode {
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// The complete arranged layout.
#[derive(Debug, Clone, Default)]
pub struct LayoutTree {
    /// Explicit background color, `None` when the host default applies.
    pub background: Option<String>,
    pub rows: Vec<RowNode>,
}

impl LayoutTree {
    /// All slots in absolute field order.
    pub fn slots(&self) -> impl Iterator<Item = &SlotNode> {
        self.rows.iter().flat_map(|row| row.slots.iter())
    }

    pub fn slot(&self, index: usize) -> Option<&SlotNode> {
        self.slots().find(|slot| slot.index == index)
    }

    pub fn slot_count(&self) -> usize {
        self.rows.iter().map(RowNode::len).sum()
    }
}

// =============================================================================
// Resolved Geometry
// =============================================================================

/// Concrete placement of one slot, relative to the layout's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedSlot {
    pub index: usize,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResolvedRow {
    pub y: f32,
    pub height: f32,
    pub slots: Vec<ResolvedSlot>,
}

/// Layout tree resolved for a specific container width.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResolvedLayout {
    pub width: f32,
    pub height: f32,
    pub rows: Vec<ResolvedRow>,
}

impl ResolvedLayout {
    pub fn slot(&self, index: usize) -> Option<&ResolvedSlot> {
        self.rows
            .iter()
            .flat_map(|row| row.slots.iter())
            .find(|slot| slot.index == index)
    }
}
