//! Spin selection logic
//!
//! Everything that decides the outcome lives here. This module must stay
//! free of rendering and platform dependencies:
//! - Randomness from a seeded RNG only
//! - Time from caller-provided frame timestamps only
//! - Frames requested through an injected scheduler

pub mod controller;
pub mod scheduler;
pub mod sector;
pub mod spin;

pub use controller::{FrameOutcome, SpinController, SpinRequest, WinnerListener};
pub use scheduler::{FrameScheduler, ManualScheduler};
pub use sector::{Sector, arc_size, sector_at, sectors};
pub use spin::{
    SpinPhase, SpinPlan, SpinResult, SpinSession, SpinTarget, Step, ease_out_cubic,
    forced_target_angle, winning_index,
};
