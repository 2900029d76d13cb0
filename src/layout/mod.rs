//! Layout Module - Rows, shares and geometry
//!
//! Turns an arrangement string and a field list into a row-based layout tree.
//!
//! # Pipeline
//!
//! 1. [`Arrangement::parse`] reads `"2-1-3"` into row sizes
//! 2. [`normalize_fields`] pads or truncates the fields to the row-size total
//! 3. [`row_shares`] gives every field its percentage of the row width
//! 4. [`resolve_layout`] (optional) lays the tree out with Taffy for a concrete width
//!
//! Building the tree itself happens in the pipeline, since every slot also
//! needs an instance wrapper.
//!
//! # Example
//!
//! ```ignore
//! use spark_placeholder::layout::{Arrangement, normalize_fields, row_shares};
//!
//! let arrangement = Arrangement::parse("2-1")?;
//! let fields = normalize_fields(raw_fields, &arrangement);
//! for range in arrangement.row_ranges() {
//!     let shares = row_shares(&fields[range]);
//! }
//! ```

mod arrangement;
mod normalize;
mod taffy_bridge;
mod types;
mod weights;

pub use arrangement::*;
pub use normalize::*;
pub use taffy_bridge::resolve_layout;
pub use types::*;
pub use weights::*;
