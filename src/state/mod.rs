//! State Module - Session state that outlives a single event
//!
//! - **Completion** - per-field done flags and the once-only completion transition

mod completion;

pub use completion::*;
