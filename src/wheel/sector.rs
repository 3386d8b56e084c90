//! Sector geometry for the wheel
//!
//! The wheel is split into N equal slices. Sector `i` covers
//! `[i * arc_size, (i + 1) * arc_size)` measured from the rotating zero
//! reference, so at rotation `r` it occupies
//! `[i * arc_size + r, (i + 1) * arc_size + r)` in canvas angles.

use std::f64::consts::TAU;

use crate::normalize_angle;

/// Angular width of one sector for `count` items (radians)
#[inline]
pub fn arc_size(count: usize) -> f64 {
    TAU / count.max(1) as f64
}

/// One angular slice of the wheel at a given rotation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sector {
    /// Item index this sector belongs to
    pub index: usize,
    /// Start angle (radians, unnormalized: `index * arc + rotation`)
    pub theta_start: f64,
    /// Angular width (radians)
    pub span: f64,
}

impl Sector {
    pub fn new(index: usize, count: usize, rotation: f64) -> Self {
        let span = arc_size(count);
        Self {
            index,
            theta_start: index as f64 * span + rotation,
            span,
        }
    }

    /// End angle (exclusive)
    #[inline]
    pub fn theta_end(&self) -> f64 {
        self.theta_start + self.span
    }

    /// Angle through the middle of the sector, where the label sits
    #[inline]
    pub fn mid_angle(&self) -> f64 {
        self.theta_start + self.span / 2.0
    }

    /// Check if an angle falls inside `[start, end)` (handles wraparound)
    pub fn contains_angle(&self, theta: f64) -> bool {
        let offset = normalize_angle(theta - self.theta_start);
        offset < self.span
    }
}

/// All sectors of a wheel with `count` items at `rotation`
pub fn sectors(count: usize, rotation: f64) -> impl Iterator<Item = Sector> {
    (0..count).map(move |i| Sector::new(i, count, rotation))
}

/// Index of the sector covering `theta` at `rotation`
pub fn sector_at(count: usize, rotation: f64, theta: f64) -> Option<usize> {
    if count == 0 {
        return None;
    }
    let offset = normalize_angle(theta - rotation);
    Some(((offset / arc_size(count)).floor() as usize).min(count - 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::f64::consts::PI;

    #[test]
    fn test_arc_size() {
        assert!((arc_size(4) - PI / 2.0).abs() < 1e-12);
        assert!((arc_size(1) - TAU).abs() < 1e-12);
        // Degenerate count never divides by zero
        assert!((arc_size(0) - TAU).abs() < 1e-12);
    }

    #[test]
    fn test_sector_contains_angle_no_wrap() {
        let s = Sector::new(1, 4, 0.0);
        assert!(s.contains_angle(PI / 2.0));
        assert!(s.contains_angle(3.0 * PI / 4.0));
        assert!(!s.contains_angle(PI));
        assert!(!s.contains_angle(0.1));
    }

    #[test]
    fn test_sector_contains_angle_wraparound() {
        // Sector 3 of 4 rotated by π/4 spans [7π/4, 9π/4)
        let s = Sector::new(3, 4, PI / 4.0);
        assert!(s.contains_angle(2.0 * PI - 0.1));
        assert!(s.contains_angle(0.1));
        assert!(!s.contains_angle(PI));
    }

    #[test]
    fn test_mid_angle() {
        let s = Sector::new(2, 4, 0.0);
        assert!((s.mid_angle() - 5.0 * PI / 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_sector_at_empty() {
        assert_eq!(sector_at(0, 0.0, 1.0), None);
    }

    proptest! {
        #[test]
        fn prop_sectors_partition_circle(
            count in 1usize..64,
            rotation in 0.0f64..TAU,
            theta in 0.0f64..TAU,
        ) {
            let covering: Vec<usize> = sectors(count, rotation)
                .filter(|s| s.contains_angle(theta))
                .map(|s| s.index)
                .collect();
            prop_assert!(covering.len() <= 1);
            prop_assert!(sector_at(count, rotation, theta).is_some());

            // Away from float boundaries every angle has exactly one owner
            let arc = arc_size(count);
            let offset = normalize_angle(theta - rotation) / arc;
            let to_edge = (offset - offset.round()).abs() * arc;
            if to_edge > 1e-9 {
                prop_assert_eq!(covering.len(), 1);
                prop_assert_eq!(Some(covering[0]), sector_at(count, rotation, theta));
            }
        }

        #[test]
        fn prop_spans_sum_to_full_turn(count in 1usize..500) {
            let total: f64 = sectors(count, 0.0).map(|s| s.span).sum();
            prop_assert!((total - TAU).abs() < 1e-9);
        }
    }
}
