//! Completion Aggregator - "every field is done" detection
//!
//! Each field owns a done flag (a [`DoneFlag`] signal shared with its
//! wrapper). Scoring events mark fields done; once every flag is set the
//! aggregate moves from [`CompletionState::Incomplete`] to
//! [`CompletionState::Complete`] and the completion handler runs on the
//! following frame, after the child's own event has finished dispatching.
//!
//! The transition is one-way. Later scoring events never fire the handler
//! again; only [`Aggregator::reset`] reopens it.
//!
//! # Example
//!
//! ```ignore
//! let aggregator = Aggregator::new(scheduler);
//! aggregator.on_complete(|| println!("all fields done"));
//! let on_scoring = aggregator.scoring_callback();
//! // ... build wrappers with `on_scoring` ...
//! aggregator.track(wrappers.iter().map(InstanceWrapper::done_flag).collect());
//! ```

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use spark_signals::{Signal, signal};

use crate::engine::{Event, FrameScheduler};
use crate::instance::{DoneFlag, ScoringCallback};

/// Aggregate completion of all tracked fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompletionState {
    #[default]
    Incomplete,
    Complete,
}

pub struct Aggregator {
    flags: RefCell<Vec<DoneFlag>>,
    state: Signal<CompletionState>,
    scheduler: Rc<dyn FrameScheduler>,
    on_complete: RefCell<Option<Rc<dyn Fn()>>>,
    // Bumped on reset so a completion scheduled before it is dropped
    generation: Cell<u64>,
    self_ref: Weak<Aggregator>,
}

impl Aggregator {
    pub fn new(scheduler: Rc<dyn FrameScheduler>) -> Rc<Self> {
        Rc::new_cyclic(|self_ref| Self {
            flags: RefCell::new(Vec::new()),
            state: signal(CompletionState::Incomplete),
            scheduler,
            on_complete: RefCell::new(None),
            generation: Cell::new(0),
            self_ref: self_ref.clone(),
        })
    }

    /// Set the handler run once all fields are done.
    pub fn on_complete<F>(&self, handler: F)
    where
        F: Fn() + 'static,
    {
        *self.on_complete.borrow_mut() = Some(Rc::new(handler));
    }

    /// Track these flags, indexed by absolute field index.
    pub fn track(&self, flags: Vec<DoneFlag>) {
        tracing::debug!(fields = flags.len(), "tracking completion");
        *self.flags.borrow_mut() = flags;
    }

    /// Scoring callback for instance wrappers. Holds the aggregator weakly.
    pub fn scoring_callback(&self) -> ScoringCallback {
        let aggregator = self.self_ref.clone();
        Rc::new(move |event: &Event, index: usize| {
            if let Some(aggregator) = aggregator.upgrade() {
                aggregator.track_scoring(event, index);
            }
        })
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Handle a scoring event from the field at `index`.
    ///
    /// Returns `false` when the event was ignored: it carries no score, or
    /// `index` is not a tracked field.
    pub fn track_scoring(&self, event: &Event, index: usize) -> bool {
        if event.score().is_none() {
            tracing::debug!(index, "ignoring xAPI event without score");
            return false;
        }

        let all_done = {
            let flags = self.flags.borrow();
            let Some(flag) = flags.get(index) else {
                tracing::debug!(index, fields = flags.len(), "ignoring scoring event for unknown field");
                return false;
            };
            flag.set(true);
            flags.iter().all(|flag| flag.get())
        };

        if all_done && self.state.get() == CompletionState::Incomplete {
            self.state.set(CompletionState::Complete);
            self.schedule_completion();
        }
        true
    }

    fn schedule_completion(&self) {
        let generation = self.generation.get();
        let aggregator = self.self_ref.clone();
        tracing::debug!(generation, "all fields done, completing on next frame");

        self.scheduler.request_frame(Box::new(move || {
            let Some(aggregator) = aggregator.upgrade() else {
                return;
            };
            if aggregator.generation.get() != generation {
                return;
            }

            let handler = aggregator.on_complete.borrow().clone();
            if let Some(handler) = handler {
                tracing::debug!("firing completion");
                handler();
            }
        }));
    }

    /// Back to `Incomplete`. Field flags are reset by their wrappers.
    pub fn reset(&self) {
        self.generation.set(self.generation.get() + 1);
        self.state.set(CompletionState::Incomplete);
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn state(&self) -> CompletionState {
        self.state.get()
    }

    /// Reactive handle to the aggregate state.
    pub fn state_signal(&self) -> Signal<CompletionState> {
        self.state.clone()
    }

    pub fn is_complete(&self) -> bool {
        self.state() == CompletionState::Complete
    }

    pub fn field_count(&self) -> usize {
        self.flags.borrow().len()
    }

    pub fn all_done(&self) -> bool {
        self.flags.borrow().iter().all(|flag| flag.get())
    }
}

impl fmt::Debug for Aggregator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Aggregator")
            .field("state", &self.state.get())
            .field("fields", &self.field_count())
            .field("generation", &self.generation.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::FrameQueue;
    use serde_json::json;

    fn scored(raw: f64) -> Event {
        Event::xapi(json!({ "result": { "score": { "raw": raw } } }))
    }

    fn unscored() -> Event {
        Event::xapi(json!({ "result": { "score": { "raw": null } } }))
    }

    fn setup(done: &[bool]) -> (Rc<Aggregator>, FrameQueue, Vec<DoneFlag>, Rc<Cell<usize>>) {
        let frames = FrameQueue::new();
        let aggregator = Aggregator::new(Rc::new(frames.clone()));
        let flags: Vec<DoneFlag> = done.iter().map(|&d| signal(d)).collect();
        aggregator.track(flags.clone());

        let fired = Rc::new(Cell::new(0));
        let fired_clone = fired.clone();
        aggregator.on_complete(move || fired_clone.set(fired_clone.get() + 1));

        (aggregator, frames, flags, fired)
    }

    #[test]
    fn test_event_without_score_ignored() {
        let (aggregator, _, flags, _) = setup(&[false, true]);

        assert!(!aggregator.track_scoring(&unscored(), 0));
        assert!(!aggregator.track_scoring(&Event::xapi(json!({})), 0));
        assert!(!flags[0].get());
    }

    #[test]
    fn test_out_of_range_index_ignored() {
        let (aggregator, frames, flags, fired) = setup(&[false]);

        assert!(!aggregator.track_scoring(&scored(1.0), 1));
        assert!(!aggregator.track_scoring(&scored(1.0), usize::MAX));
        assert!(!flags[0].get());
        assert_eq!(frames.pending(), 0);
        assert_eq!(fired.get(), 0);
    }

    #[test]
    fn test_completion_fires_on_next_frame() {
        let (aggregator, frames, _, fired) = setup(&[false, false, true]);

        aggregator.track_scoring(&scored(1.0), 0);
        assert_eq!(aggregator.state(), CompletionState::Incomplete);

        aggregator.track_scoring(&scored(0.0), 1);
        assert!(aggregator.is_complete());
        assert_eq!(fired.get(), 0);

        frames.run_frame();
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn test_completion_fires_once() {
        let (aggregator, frames, _, fired) = setup(&[false, false]);

        aggregator.track_scoring(&scored(1.0), 0);
        aggregator.track_scoring(&scored(1.0), 1);
        aggregator.track_scoring(&scored(2.0), 1);
        frames.run_frame();
        aggregator.track_scoring(&scored(1.0), 0);
        frames.run_until_idle(5);

        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn test_reset_reopens_completion() {
        let (aggregator, frames, flags, fired) = setup(&[false]);

        aggregator.track_scoring(&scored(1.0), 0);
        frames.run_frame();
        assert_eq!(fired.get(), 1);

        flags[0].set(false);
        aggregator.reset();
        assert_eq!(aggregator.state(), CompletionState::Incomplete);

        aggregator.track_scoring(&scored(1.0), 0);
        frames.run_frame();
        assert_eq!(fired.get(), 2);
    }

    #[test]
    fn test_reset_cancels_pending_completion() {
        let (aggregator, frames, _, fired) = setup(&[false]);

        aggregator.track_scoring(&scored(1.0), 0);
        aggregator.reset();
        frames.run_frame();

        assert_eq!(fired.get(), 0);
    }

    #[test]
    fn test_scoring_callback_is_weak() {
        let (aggregator, frames, flags, _) = setup(&[false]);
        let callback = aggregator.scoring_callback();

        callback(&scored(1.0), 0);
        assert!(flags[0].get());

        drop(aggregator);
        frames.run_frame();
        callback(&scored(1.0), 0);
    }

    #[test]
    fn test_state_signal_observes_transition() {
        let (aggregator, _, _, _) = setup(&[false]);
        let state = aggregator.state_signal();

        aggregator.track_scoring(&scored(1.0), 0);
        assert_eq!(state.get(), CompletionState::Complete);
    }
}
