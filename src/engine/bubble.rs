//! Event bubbling between a parent channel and its children's channels.
//!
//! ```text
//! parent ──bubble_down──▶ child A, child B      (skipped while parent is bubbling upwards)
//! child A ──bubble_up───▶ parent                 (parent marked as bubbling upwards)
//! ```
//!
//! A parent-originated resize reaches every child once; each child echoes it
//! back up to the parent's listeners once, and the echo stops there. A
//! child-originated resize reaches the parent's listeners once and is not sent
//! back down to any child.

use super::events::{EventChannel, HandlerId};

/// Forward every `name` event on `origin` to all `targets`.
///
/// Events that arrive while `origin` is bubbling upwards came from a child
/// and are not sent back down.
pub fn bubble_down(origin: &EventChannel, name: &str, targets: Vec<EventChannel>) -> HandlerId {
    let weak_origin = origin.downgrade();
    let event_name = name.to_string();

    origin.on(name, move |event| {
        let Some(origin) = weak_origin.upgrade() else {
            return;
        };
        if origin.is_bubbling_upwards() {
            return;
        }

        tracing::trace!(event = %event_name, targets = targets.len(), "bubbling down");
        for target in &targets {
            target.trigger(event);
        }
    })
}

/// Forward every `name` event on `origin` to `target`, marking `target` as
/// bubbling upwards for the duration of the forward.
///
/// Only a weak reference to `target` is kept, so a child never keeps its
/// parent alive.
pub fn bubble_up(origin: &EventChannel, name: &str, target: &EventChannel) -> HandlerId {
    let weak_target = target.downgrade();
    let event_name = name.to_string();

    origin.on(name, move |event| {
        let Some(target) = weak_target.upgrade() else {
            return;
        };

        tracing::trace!(event = %event_name, "bubbling up");
        let _guard = target.begin_bubbling_upwards();
        target.trigger(event);
    })
}
