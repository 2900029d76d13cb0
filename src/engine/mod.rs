//! Engine - Event plumbing and frame scheduling.
//!
//! - Events: named pub/sub channels with a bubbling guard
//! - Bubble: parent ↔ child forwarding without feedback loops
//! - Scheduler: the host's "before next paint" primitive and a manual queue
//!
//! # Ownership
//!
//! ```text
//! root channel ──(strong)──▶ child channels     bubble_down
//! child channel ──(weak)───▶ root channel       bubble_up
//! ```
//!
//! Parents keep children alive, never the other way round, so dropping the
//! root releases the whole tree.

mod bubble;
mod events;
mod scheduler;

pub use bubble::*;
pub use events::*;
pub use scheduler::*;
