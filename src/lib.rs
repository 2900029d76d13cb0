//! # spark-placeholder
//!
//! Row-based arrangement of embedded interactive content, with completion
//! tracking and aggregate scoring.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals) for the
//! shared completion flags and [Taffy](https://github.com/DioxusLabs/taffy) for
//! concrete geometry.
//!
//! ## Architecture
//!
//! A placeholder arranges a flat list of fields into rows (`"2-1-3"` means
//! two fields, then one, then three). Every field gets an instance wrapper,
//! addressed by its absolute index, that owns the embedded instance and its
//! done flag.
//!
//! ```text
//! params → Arrangement + normalized fields → rows of slots + flat wrappers
//!                                                       │
//!              scoring events → Aggregator → "completed" (next frame)
//! ```
//!
//! Resize notifications bubble both ways between the root channel and each
//! instance, guarded so they never ping-pong.
//!
//! ## Modules
//!
//! - [`types`] - Field descriptors and content references
//! - [`layout`] - Arrangement parsing, normalization, shares, Taffy geometry
//! - [`engine`] - Event channels, bubbling, frame scheduling
//! - [`instance`] - Host contract, customizations, instance wrappers
//! - [`state`] - Completion aggregation
//! - [`pipeline`] - Row builder and composition root
//! - [`config`] - Parameters and extras
//! - [`xapi`] - Statements and compound reports

pub mod config;
pub mod engine;
pub mod error;
pub mod instance;
pub mod layout;
pub mod pipeline;
pub mod placeholder;
pub mod state;
pub mod types;
pub mod xapi;

// Re-export commonly used items
pub use types::*;

pub use error::{PlaceholderError, Result};

pub use config::{ContentExtras, ContentMetadata, PlaceholderParams, sanitize_image_height_limit};

pub use engine::{
    Event, EventChannel, FrameQueue, FrameScheduler, HandlerId, RESIZE, XAPI, bubble_down,
    bubble_up,
};

pub use layout::{
    Arrangement, LayoutTree, RenderTarget, ResolvedLayout, RowNode, SlotNode, normalize_fields,
    resolve_layout, row_shares, width_relative,
};

pub use instance::{
    Capabilities, ConstructRequest, CustomizationContext, Customizations, DoneFlag, Instance,
    InstanceFactory, InstanceWrapper, WrapperContext,
};

pub use state::{Aggregator, CompletionState};

pub use pipeline::{Composition, build_row};

pub use placeholder::{Host, Placeholder};

pub use xapi::XapiData;
