//! Spin Wheel - a randomized selection wheel
//!
//! Core modules:
//! - `wheel`: Spin math, state machine and frame-driven controller
//! - `renderer`: Wheel tessellation, software raster and WebGPU pipeline
//! - `images`: Lazy reward icon cache and loaders
//! - `platform`: Browser integration (frame scheduler, image loader, overlay)
//! - `settings`: Data-driven wheel configuration
//! - `history`: Record of completed spins

pub mod history;
pub mod images;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod wheel;

pub use history::WinnerHistory;
pub use images::{ImageCache, ImageLoader, LoadEvent};
pub use settings::WheelSettings;
pub use wheel::{FrameScheduler, SpinController, SpinRequest, SpinResult};

use glam::Vec2;

/// Wheel configuration constants
pub mod consts {
    use std::f64::consts::PI;

    /// Default rendering surface size (pixels, square)
    pub const DEFAULT_SIZE: u32 = 600;
    /// Gap between the wheel edge and the surface edge
    pub const WHEEL_MARGIN: f32 = 10.0;

    /// Pointer sits at the top of the wheel (canvas angle convention, y down)
    pub const POINTER_ANGLE: f64 = 3.0 * PI / 2.0;

    /// Spin duration range (milliseconds, max exclusive)
    pub const MIN_SPIN_DURATION_MS: f64 = 5000.0;
    pub const MAX_SPIN_DURATION_MS: f64 = 7000.0;
    /// Full revolutions before the wheel settles on its final offset
    pub const FULL_TURNS: u32 = 10;

    /// Label policy
    pub const LABEL_MAX_CHARS: usize = 20;
    pub const LABEL_TRUNCATED_CHARS: usize = 17;
    pub const LABEL_FONT_PX: f32 = 16.0;
    pub const LABEL_FONT_PX_DENSE: f32 = 10.0;
    /// Item count above which the dense font is used
    pub const DENSE_ITEM_THRESHOLD: usize = 30;

    /// Chrome
    pub const OUTER_RING_WIDTH: f32 = 12.0;
    pub const INNER_RING_INSET: f32 = 6.0;
    pub const INNER_RING_WIDTH: f32 = 2.0;
    pub const SECTOR_BORDER_WIDTH: f32 = 2.0;
    pub const HUB_RADIUS: f32 = 25.0;
    pub const HUB_STROKE_WIDTH: f32 = 4.0;
}

/// Normalize an angle to [0, 2π)
#[inline]
pub fn normalize_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(std::f64::consts::TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= std::f64::consts::TAU {
        0.0
    } else {
        wrapped
    }
}

/// Convert polar (r, theta) to cartesian (x, y), y pointing down
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{PI, TAU};

    #[test]
    fn test_normalize_angle() {
        assert!((normalize_angle(TAU + 1.0) - 1.0).abs() < 1e-12);
        assert!((normalize_angle(-PI / 2.0) - 3.0 * PI / 2.0).abs() < 1e-12);
        assert_eq!(normalize_angle(0.0), 0.0);
        assert!(normalize_angle(-1e-20) < TAU);
    }

    #[test]
    fn test_polar_top_is_pointer() {
        let p = polar_to_cartesian(100.0, consts::POINTER_ANGLE as f32);
        assert!(p.x.abs() < 1e-3);
        assert!((p.y + 100.0).abs() < 1e-3);
    }
}
