//! Event Channel - Named pub/sub with a bubbling guard
//!
//! Every component that takes part in event propagation owns one
//! [`EventChannel`]: the root placeholder, and every embedded instance.
//!
//! - `on(name, handler)` subscribes and returns a [`HandlerId`]
//! - `off(id)` unsubscribes
//! - `trigger(event)` dispatches to every handler registered for `event.name`
//!
//! Handlers are snapshotted before dispatch, so a handler may subscribe,
//! unsubscribe or trigger further events on the same channel.
//!
//! # Bubbling guard
//!
//! While a child-originated event is forwarded to a parent, the parent's
//! channel is marked as "bubbling upwards". Handlers that forward parent
//! events down to children check the mark and stay quiet, which is what
//! stops resize events from ping-ponging between parent and child. The mark
//! is only ever held through a [`BubbleGuard`], which restores the previous
//! value when dropped, including during unwinding.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use serde_json::{Value, json};

/// Layout of the host changed; sizes must be recomputed.
pub const RESIZE: &str = "resize";

/// An xAPI statement was produced.
pub const XAPI: &str = "xAPI";

// =============================================================================
// Event
// =============================================================================

/// A named event with an opaque JSON payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub name: String,
    pub data: Value,
}

impl Event {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: Value::Null,
        }
    }

    pub fn with_data(name: impl Into<String>, data: Value) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    /// A resize notification.
    pub fn resize() -> Self {
        Self::new(RESIZE)
    }

    /// An xAPI event wrapping `statement`.
    pub fn xapi(statement: Value) -> Self {
        Self::with_data(XAPI, json!({ "statement": statement }))
    }

    /// The xAPI statement carried by this event, if any.
    pub fn statement(&self) -> Option<&Value> {
        self.data.get("statement").filter(|s| s.is_object())
    }

    /// Raw score reported by the statement (`result.score.raw`).
    ///
    /// `None` for events without a statement, without a result, or with a
    /// null score. Such events are not scoring events.
    pub fn score(&self) -> Option<f64> {
        self.statement()?
            .get("result")?
            .get("score")?
            .get("raw")?
            .as_f64()
    }

    /// Verb id of the statement, e.g. `http://adlnet.gov/expapi/verbs/answered`.
    pub fn verb(&self) -> Option<&str> {
        self.statement()?.get("verb")?.get("id")?.as_str()
    }
}

// =============================================================================
// Channel
// =============================================================================

/// Identifier of a registered handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(usize);

/// Event handler (Rc so dispatch can snapshot the handler list).
pub type EventHandler = Rc<dyn Fn(&Event)>;

#[derive(Default)]
struct ChannelInner {
    handlers: RefCell<Vec<(HandlerId, String, EventHandler)>>,
    next_id: Cell<usize>,
    bubbling_upwards: Cell<bool>,
}

/// Shared handle to a pub/sub channel. Cloning is cheap and yields the same channel.
#[derive(Clone, Default)]
pub struct EventChannel {
    inner: Rc<ChannelInner>,
}

impl EventChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe `handler` to events called `name`.
    pub fn on<F>(&self, name: &str, handler: F) -> HandlerId
    where
        F: Fn(&Event) + 'static,
    {
        let id = HandlerId(self.inner.next_id.get());
        self.inner.next_id.set(id.0 + 1);
        self.inner
            .handlers
            .borrow_mut()
            .push((id, name.to_string(), Rc::new(handler)));
        id
    }

    /// Remove a handler. Unknown ids are ignored.
    pub fn off(&self, id: HandlerId) {
        self.inner
            .handlers
            .borrow_mut()
            .retain(|(handler_id, _, _)| *handler_id != id);
    }

    /// Dispatch `event` to all handlers registered for its name.
    pub fn trigger(&self, event: &Event) {
        let handlers: Vec<EventHandler> = self
            .inner
            .handlers
            .borrow()
            .iter()
            .filter(|(_, name, _)| *name == event.name)
            .map(|(_, _, handler)| handler.clone())
            .collect();

        for handler in handlers {
            handler(event);
        }
    }

    /// Number of handlers registered for `name`.
    pub fn handler_count(&self, name: &str) -> usize {
        self.inner
            .handlers
            .borrow()
            .iter()
            .filter(|(_, handler_name, _)| handler_name == name)
            .count()
    }

    /// True while a child-originated event is being forwarded to this channel.
    pub fn is_bubbling_upwards(&self) -> bool {
        self.inner.bubbling_upwards.get()
    }

    /// Mark this channel as receiving an upward-bubbling event until the guard drops.
    pub fn begin_bubbling_upwards(&self) -> BubbleGuard {
        let previous = self.inner.bubbling_upwards.replace(true);
        BubbleGuard {
            inner: self.inner.clone(),
            previous,
        }
    }

    /// Non-owning handle, for back-references that must not keep the channel alive.
    pub fn downgrade(&self) -> WeakEventChannel {
        WeakEventChannel {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Whether two handles refer to the same channel.
    pub fn ptr_eq(&self, other: &EventChannel) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for EventChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventChannel")
            .field("handlers", &self.inner.handlers.borrow().len())
            .field("bubbling_upwards", &self.inner.bubbling_upwards.get())
            .finish()
    }
}

/// Weak counterpart of [`EventChannel`].
#[derive(Clone, Default)]
pub struct WeakEventChannel {
    inner: Weak<ChannelInner>,
}

impl WeakEventChannel {
    pub fn upgrade(&self) -> Option<EventChannel> {
        self.inner.upgrade().map(|inner| EventChannel { inner })
    }
}

impl fmt::Debug for WeakEventChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakEventChannel")
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}

/// Holds a channel's bubbling mark; restores the previous value on drop.
#[must_use = "the bubbling mark is released as soon as the guard is dropped"]
pub struct BubbleGuard {
    inner: Rc<ChannelInner>,
    previous: bool,
}

impl Drop for BubbleGuard {
    fn drop(&mut self) {
        self.inner.bubbling_upwards.set(self.previous);
    }
}
