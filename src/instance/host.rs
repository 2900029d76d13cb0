//! Host contract - What the embedding runtime provides.
//!
//! The host constructs embedded instances ([`InstanceFactory`]) and each
//! instance exposes an optional set of capabilities ([`Instance`]). Which
//! ones it really implements is declared once through [`Capabilities`];
//! the wrapper never calls a method whose flag is not set.

use std::rc::Rc;

use serde_json::Value;

use crate::engine::EventChannel;
use crate::layout::RenderTarget;
use crate::types::{ContentReference, empty_state};
use crate::xapi::XapiData;

// =============================================================================
// Capabilities (bitflags)
// =============================================================================

bitflags::bitflags! {
    /// Optional capabilities an embedded instance implements.
    ///
    /// Combine with bitwise OR: `Capabilities::SCORE | Capabilities::MAX_SCORE`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Capabilities: u16 {
        const NONE = 0;
        /// The instance decides on its own whether it is a task.
        const IS_TASK = 1 << 0;
        const SCORE = 1 << 1;
        const MAX_SCORE = 1 << 2;
        const ANSWER_GIVEN = 1 << 3;
        const RESET = 1 << 4;
        const SHOW_SOLUTIONS = 1 << 5;
        const CURRENT_STATE = 1 << 6;
        const XAPI_DATA = 1 << 7;
    }
}

impl Capabilities {
    /// What a typical scorable question implements.
    pub const QUESTION: Self = Self::SCORE
        .union(Self::MAX_SCORE)
        .union(Self::ANSWER_GIVEN)
        .union(Self::RESET)
        .union(Self::SHOW_SOLUTIONS)
        .union(Self::CURRENT_STATE)
        .union(Self::XAPI_DATA);
}

// =============================================================================
// Instance
// =============================================================================

/// A runnable embedded content instance.
///
/// Only `capabilities` and `events` are mandatory. Every other method has a
/// neutral default and is only called when the matching capability is set.
pub trait Instance {
    /// Capabilities this instance implements. Read once, when wrapped.
    fn capabilities(&self) -> Capabilities;

    /// The instance's own event channel (resize, xAPI, ...).
    fn events(&self) -> &EventChannel;

    /// Machine name from the instance's library metadata.
    fn machine_name(&self) -> &str {
        ""
    }

    fn sub_content_id(&self) -> Option<&str> {
        None
    }

    /// Requires [`Capabilities::IS_TASK`].
    fn is_task(&self) -> bool {
        false
    }

    /// Requires [`Capabilities::SCORE`].
    fn score(&self) -> f64 {
        0.0
    }

    /// Requires [`Capabilities::MAX_SCORE`].
    fn max_score(&self) -> f64 {
        0.0
    }

    /// Requires [`Capabilities::ANSWER_GIVEN`].
    fn answer_given(&self) -> bool {
        false
    }

    /// Requires [`Capabilities::RESET`].
    fn reset_task(&mut self) {}

    /// Requires [`Capabilities::SHOW_SOLUTIONS`].
    fn show_solutions(&mut self) {}

    /// Requires [`Capabilities::CURRENT_STATE`].
    fn current_state(&self) -> Value {
        empty_state()
    }

    /// Requires [`Capabilities::XAPI_DATA`].
    fn xapi_data(&self) -> Option<XapiData> {
        None
    }
}

// =============================================================================
// Factory
// =============================================================================

/// Everything the host needs to construct one instance.
#[derive(Debug, Clone, Copy)]
pub struct ConstructRequest<'a> {
    pub content: &'a ContentReference,
    pub content_id: &'a str,
    pub target: &'a Rc<RenderTarget>,
    pub previous_state: &'a Value,
}

/// The host's instance-construction facility.
pub trait InstanceFactory {
    /// Construct an instance rendering into `request.target`.
    ///
    /// `None` means the host could not (or would not) build the content; the
    /// field then behaves like an empty one.
    fn construct(&self, request: ConstructRequest<'_>) -> Option<Box<dyn Instance>>;
}

impl<F> InstanceFactory for F
where
    F: Fn(ConstructRequest<'_>) -> Option<Box<dyn Instance>>,
{
    fn construct(&self, request: ConstructRequest<'_>) -> Option<Box<dyn Instance>> {
        self(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Static {
        events: EventChannel,
    }

    impl Instance for Static {
        fn capabilities(&self) -> Capabilities {
            Capabilities::NONE
        }

        fn events(&self) -> &EventChannel {
            &self.events
        }
    }

    #[test]
    fn test_defaults_are_neutral() {
        let mut instance = Static { events: EventChannel::new() };
        assert_eq!(instance.score(), 0.0);
        assert_eq!(instance.max_score(), 0.0);
        assert!(!instance.answer_given());
        assert_eq!(instance.current_state(), empty_state());
        assert!(instance.xapi_data().is_none());
        instance.reset_task();
        instance.show_solutions();
    }

    #[test]
    fn test_question_capabilities() {
        assert!(Capabilities::QUESTION.contains(Capabilities::MAX_SCORE));
        assert!(!Capabilities::QUESTION.contains(Capabilities::IS_TASK));
    }

    #[test]
    fn test_closure_factory() {
        let factory = |request: ConstructRequest<'_>| -> Option<Box<dyn Instance>> {
            (!request.content.library.is_empty())
                .then(|| Box::new(Static { events: EventChannel::new() }) as Box<dyn Instance>)
        };

        let content = ContentReference::new("H5P.Text 1.1");
        let target = RenderTarget::new(0);
        let state = empty_state();
        let request = ConstructRequest {
            content: &content,
            content_id: "1",
            target: &target,
            previous_state: &state,
        };

        assert!(factory.construct(request).is_some());
    }
}
