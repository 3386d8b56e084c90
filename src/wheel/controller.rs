//! Frame-driven spin controller
//!
//! Owns the rotation, the RNG and the [`SpinPhase`]; every mutation happens
//! inside `request_spin`, `set_spinning` or `on_frame`, so no locking is
//! needed. The scheduler is injected so tests can step frames by hand.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::scheduler::FrameScheduler;
use super::spin::{SpinPhase, SpinPlan, SpinResult, SpinTarget};
use crate::settings::WheelSettings;

/// Listener invoked once per completed spin
pub type WinnerListener = Box<dyn FnMut(&SpinResult)>;

/// Outcome of a spin request. Rejections are no-ops, not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinRequest {
    Started,
    AlreadySpinning,
    NoItems,
    /// Controller was torn down
    Disposed,
}

/// What a frame did
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FrameOutcome {
    /// Current rotation (wrapped to [0, 2π))
    pub rotation: f64,
    /// The wheel moved and should be redrawn
    pub redraw: bool,
    /// Set on the frame a spin completes
    pub winner: Option<SpinResult>,
}

/// Spin requested through the external flag, started on the next frame
#[derive(Debug, Clone)]
struct DeferredSpin {
    items: Vec<String>,
    forced: Option<String>,
}

pub struct SpinController<S: FrameScheduler> {
    settings: WheelSettings,
    rng: Pcg32,
    phase: SpinPhase,
    rotation: f64,
    scheduler: S,
    listener: Option<WinnerListener>,
    /// Last value of the external "spinning" flag
    external_spinning: bool,
    deferred: Option<DeferredSpin>,
    disposed: bool,
}

impl<S: FrameScheduler> SpinController<S> {
    pub fn new(settings: &WheelSettings, scheduler: S, seed: u64) -> Self {
        Self {
            settings: settings.clone().validated(),
            rng: Pcg32::seed_from_u64(seed),
            phase: SpinPhase::Idle,
            rotation: 0.0,
            scheduler,
            listener: None,
            external_spinning: false,
            deferred: None,
            disposed: false,
        }
    }

    /// Register the winner listener (replaces any previous one)
    pub fn on_winner(&mut self, listener: impl FnMut(&SpinResult) + 'static) {
        self.listener = Some(Box::new(listener));
    }

    pub fn phase(&self) -> &SpinPhase {
        &self.phase
    }

    /// Current rotation to draw at (wrapped)
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn is_spinning(&self) -> bool {
        self.phase.is_spinning()
    }

    /// Whether a spin button for `items` should be enabled
    pub fn can_spin<T: AsRef<str>>(&self, items: &[T]) -> bool {
        !self.disposed && !self.is_spinning() && !items.is_empty()
    }

    pub fn settings(&self) -> &WheelSettings {
        &self.settings
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Start a spin over `items` at time `now_ms`.
    ///
    /// A forced label absent from `items` falls back to a random spin.
    pub fn request_spin<T: AsRef<str>>(
        &mut self,
        items: &[T],
        forced: Option<&str>,
        now_ms: f64,
    ) -> SpinRequest {
        if self.disposed {
            return SpinRequest::Disposed;
        }
        if self.is_spinning() {
            log::debug!("Spin ignored: already spinning");
            return SpinRequest::AlreadySpinning;
        }
        if items.is_empty() {
            log::debug!("Spin ignored: no items");
            return SpinRequest::NoItems;
        }

        let plan = SpinPlan::new(items, forced, &self.settings, &mut self.rng);
        if plan.target == SpinTarget::ForcedNotFound {
            log::warn!("Forced label {:?} not in items, spinning randomly", forced);
        }
        match self.phase.begin(items, plan, now_ms) {
            Some(phase) => {
                log::info!(
                    "Spin started: {} items, {:?}, {:.0} ms",
                    items.len(),
                    plan.target,
                    plan.duration_ms
                );
                self.phase = phase;
                self.scheduler.request_frame();
                SpinRequest::Started
            }
            None => SpinRequest::AlreadySpinning,
        }
    }

    /// Mirror an externally owned "spinning" flag.
    ///
    /// A rising edge schedules one spin for the next frame rather than
    /// starting it inside the caller's own update. Clearing the flag before
    /// that frame cancels the deferred spin.
    pub fn set_spinning<T: AsRef<str>>(&mut self, spinning: bool, items: &[T], forced: Option<&str>) {
        if self.disposed {
            return;
        }
        let rising = spinning && !self.external_spinning;
        self.external_spinning = spinning;

        if !spinning {
            self.deferred = None;
            return;
        }
        if rising && !self.is_spinning() {
            self.deferred = Some(DeferredSpin {
                items: items.iter().map(|s| s.as_ref().to_string()).collect(),
                forced: forced.map(str::to_string),
            });
            self.scheduler.request_frame();
        }
    }

    /// Advance by one display frame at `now_ms`
    pub fn on_frame(&mut self, now_ms: f64) -> FrameOutcome {
        if self.disposed {
            return FrameOutcome {
                rotation: self.rotation,
                ..Default::default()
            };
        }

        if let Some(deferred) = self.deferred.take() {
            let request = self.request_spin(&deferred.items, deferred.forced.as_deref(), now_ms);
            if request == SpinRequest::Started {
                return FrameOutcome {
                    rotation: self.rotation,
                    ..Default::default()
                };
            }
            // A direct request won the race; keep driving that session
        }

        let step = std::mem::take(&mut self.phase).advance(now_ms);
        self.phase = step.phase;

        let redraw = step.rotation.is_some();
        if let Some(rotation) = step.rotation {
            self.rotation = rotation;
        }

        match &step.winner {
            Some(result) => {
                log::info!("Spin finished: #{} {:?}", result.index, result.label);
                if let Some(listener) = self.listener.as_mut() {
                    listener(result);
                }
            }
            None if self.phase.is_spinning() => self.scheduler.request_frame(),
            None => {}
        }

        FrameOutcome {
            rotation: self.rotation,
            redraw,
            winner: step.winner,
        }
    }

    /// Stop scheduling frames; later frames and requests are ignored
    pub fn teardown(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.deferred = None;
        self.phase = SpinPhase::Idle;
        self.listener = None;
        self.scheduler.cancel();
    }
}

impl<S: FrameScheduler> Drop for SpinController<S> {
    fn drop(&mut self) {
        self.teardown();
    }
}
