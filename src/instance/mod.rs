//! Instance Module - Embedded content and its wrapper
//!
//! - [`host`] is the contract with the embedding runtime: the [`Instance`]
//!   trait, its [`Capabilities`] and the [`InstanceFactory`]
//! - [`customizations`] holds per-type patches applied around construction
//! - [`wrapper`] owns one field's instance and completion flag

pub mod customizations;
pub mod host;
pub mod wrapper;

#[cfg(test)]
pub(crate) mod mock;

pub use customizations::*;
pub use host::*;
pub use wrapper::*;
