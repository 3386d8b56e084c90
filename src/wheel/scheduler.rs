//! Frame scheduling capability
//!
//! The controller never owns a clock or an event loop. It asks its scheduler
//! for "one more frame" and the host calls back into
//! [`SpinController::on_frame`](super::SpinController::on_frame) with the
//! frame timestamp. In the browser this is requestAnimationFrame; in tests
//! and the native demo it is a [`ManualScheduler`] stepped by hand.

/// Abstraction over "advance to the next display refresh"
pub trait FrameScheduler {
    /// Ask for one frame callback. Repeated calls before the frame fires
    /// coalesce into a single callback.
    fn request_frame(&mut self);

    /// Drop any pending frame callback (teardown)
    fn cancel(&mut self);
}

/// Deterministic scheduler driven by the caller
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    pending: bool,
    /// Total number of frames requested (for assertions)
    pub requests: u64,
    /// Number of cancel calls
    pub cancels: u64,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a frame is waiting to be delivered
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Consume the pending frame, if any. The host then calls `on_frame`.
    pub fn take_pending(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) {
        self.pending = true;
        self.requests += 1;
    }

    fn cancel(&mut self) {
        self.pending = false;
        self.cancels += 1;
    }
}

impl<S: FrameScheduler + ?Sized> FrameScheduler for Box<S> {
    fn request_frame(&mut self) {
        (**self).request_frame();
    }

    fn cancel(&mut self) {
        (**self).cancel();
    }
}
