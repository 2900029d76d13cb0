//! Frame scheduling - "run this before the next paint".
//!
//! The host owns the real rendering tick. The core only ever asks for a
//! callback on the next frame, through [`FrameScheduler`].
//!
//! [`FrameQueue`] is an in-memory scheduler for hosts that tick manually
//! (and for tests):
//!
//! ```ignore
//! let frames = FrameQueue::new();
//! frames.request_frame(Box::new(|| println!("next frame")));
//! frames.run_frame(); // prints
//! ```

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

/// Callback run on a future frame.
pub type FrameCallback = Box<dyn FnOnce()>;

/// The host's rendering-tick primitive.
pub trait FrameScheduler {
    /// Run `callback` once, before the next frame is painted.
    fn request_frame(&self, callback: FrameCallback);
}

/// Request a callback two frames from now.
///
/// The first frame lets freshly attached content reach the document; the
/// second runs once it has been laid out.
pub fn after_two_frames(scheduler: &Rc<dyn FrameScheduler>, callback: FrameCallback) {
    let inner = scheduler.clone();
    scheduler.request_frame(Box::new(move || inner.request_frame(callback)));
}

/// Manually ticked frame queue.
#[derive(Clone, Default)]
pub struct FrameQueue {
    queue: Rc<RefCell<VecDeque<FrameCallback>>>,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of callbacks waiting for a frame.
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Run one frame: every callback requested before this call.
    ///
    /// Callbacks requested while the frame runs wait for the next one.
    /// Returns how many callbacks ran.
    pub fn run_frame(&self) -> usize {
        let batch: Vec<FrameCallback> = self.queue.borrow_mut().drain(..).collect();
        let count = batch.len();
        for callback in batch {
            callback();
        }
        count
    }

    /// Run frames until nothing is pending or `max_frames` have run.
    /// Returns the number of frames run.
    pub fn run_until_idle(&self, max_frames: usize) -> usize {
        let mut frames = 0;
        while frames < max_frames && self.pending() > 0 {
            self.run_frame();
            frames += 1;
        }
        frames
    }
}

impl FrameScheduler for FrameQueue {
    fn request_frame(&self, callback: FrameCallback) {
        self.queue.borrow_mut().push_back(callback);
    }
}

impl fmt::Debug for FrameQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameQueue")
            .field("pending", &self.pending())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_callbacks_wait_for_frame() {
        let frames = FrameQueue::new();
        let ran = Rc::new(Cell::new(false));
        let ran_clone = ran.clone();

        frames.request_frame(Box::new(move || ran_clone.set(true)));
        assert!(!ran.get());
        assert_eq!(frames.pending(), 1);

        assert_eq!(frames.run_frame(), 1);
        assert!(ran.get());
        assert_eq!(frames.pending(), 0);
    }

    #[test]
    fn test_nested_request_runs_next_frame() {
        let frames = FrameQueue::new();
        let scheduler: Rc<dyn FrameScheduler> = Rc::new(frames.clone());
        let ran = Rc::new(Cell::new(false));
        let ran_clone = ran.clone();

        after_two_frames(&scheduler, Box::new(move || ran_clone.set(true)));

        frames.run_frame();
        assert!(!ran.get());
        frames.run_frame();
        assert!(ran.get());
    }

    #[test]
    fn test_run_until_idle() {
        let frames = FrameQueue::new();
        let scheduler: Rc<dyn FrameScheduler> = Rc::new(frames.clone());
        after_two_frames(&scheduler, Box::new(|| {}));

        assert_eq!(frames.run_until_idle(10), 2);
        assert_eq!(frames.run_until_idle(10), 0);
    }
}
