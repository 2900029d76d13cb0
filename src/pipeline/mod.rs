//! Composition Pipeline
//!
//! Connects the layout pieces with instance construction.
//!
//! ```text
//! raw fields → normalize → row ranges → build_row (wrappers + slots) → Composition
//! ```
//!
//! - [`build_row`] sizes one row and wraps each of its fields
//! - [`Composition`] walks the arrangement with a running cursor and keeps
//!   every wrapper in one flat list, addressed by absolute field index

pub mod compose;
pub mod row;

pub use compose::Composition;
pub use row::{BuiltRow, build_row};
