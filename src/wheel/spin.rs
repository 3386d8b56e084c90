//! Spin math and state machine
//!
//! All functions here are pure: randomness comes from a caller-provided RNG
//! and time from caller-provided timestamps, so a spin can be replayed
//! exactly in tests without a real display.

use std::f64::consts::{PI, TAU};

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::sector::arc_size;
use crate::consts::POINTER_ANGLE;
use crate::normalize_angle;
use crate::settings::WheelSettings;

/// Cubic ease-out: fast start, smooth deceleration
#[inline]
pub fn ease_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

/// Final offset that parks the centre of sector `index` under the pointer
pub fn forced_target_angle(index: usize, count: usize) -> f64 {
    let arc = arc_size(count);
    (POINTER_ANGLE - (index as f64 + 0.5) * arc + 10.0 * PI).rem_euclid(TAU)
}

/// Sector under the pointer for a wheel resting at `rotation`
///
/// Exact inverse of [`forced_target_angle`] modulo 2π.
pub fn winning_index(rotation: f64, count: usize) -> usize {
    if count == 0 {
        return 0;
    }
    let rotation = normalize_angle(rotation);
    let under_pointer = (POINTER_ANGLE - rotation + 4.0 * PI).rem_euclid(TAU);
    ((under_pointer / arc_size(count)).floor() as usize).min(count - 1)
}

/// How the final resting sector is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpinTarget {
    /// Uniformly random offset
    Random,
    /// Forced label found; lands on its first occurrence
    Forced { index: usize },
    /// Forced label requested but absent from the items; spins randomly
    ForcedNotFound,
}

impl SpinTarget {
    /// Resolve an optional forced label against the items.
    ///
    /// Duplicate labels: only the first occurrence is reachable.
    pub fn resolve<S: AsRef<str>>(items: &[S], forced: Option<&str>) -> Self {
        match forced {
            None => SpinTarget::Random,
            // An empty label never names an item (items are non-empty trimmed)
            Some("") => SpinTarget::Random,
            Some(label) => match items.iter().position(|item| item.as_ref() == label) {
                Some(index) => SpinTarget::Forced { index },
                None => SpinTarget::ForcedNotFound,
            },
        }
    }

    pub fn is_forced(&self) -> bool {
        matches!(self, SpinTarget::Forced { .. })
    }
}

/// Everything decided up front when a spin starts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpinPlan {
    pub target: SpinTarget,
    /// Cumulative rotation reached at the end of the spin (radians)
    pub total_rotation: f64,
    pub duration_ms: f64,
}

impl SpinPlan {
    /// Draw a duration and target rotation for `items`
    pub fn new<S: AsRef<str>, R: Rng>(
        items: &[S],
        forced: Option<&str>,
        settings: &WheelSettings,
        rng: &mut R,
    ) -> Self {
        let target = SpinTarget::resolve(items, forced);
        let duration_ms = if settings.max_duration_ms > settings.min_duration_ms {
            rng.random_range(settings.min_duration_ms..settings.max_duration_ms)
        } else {
            settings.min_duration_ms
        };
        let turns = settings.full_turns as f64 * TAU;

        let offset = match target {
            SpinTarget::Forced { index } => forced_target_angle(index, items.len()),
            SpinTarget::Random | SpinTarget::ForcedNotFound => rng.random_range(0.0..TAU),
        };

        Self {
            target,
            total_rotation: turns + offset,
            duration_ms,
        }
    }

    /// Cumulative (unwrapped) rotation at a given progress in [0, 1]
    #[inline]
    pub fn rotation_at(&self, progress: f64) -> f64 {
        self.total_rotation * ease_out_cubic(progress)
    }
}

/// An active spin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpinSession {
    pub plan: SpinPlan,
    pub start_ms: f64,
    /// Items snapshot taken when the spin started
    pub items: Vec<String>,
}

impl SpinSession {
    /// Progress in [0, 1] at time `now_ms`
    pub fn progress(&self, now_ms: f64) -> f64 {
        if self.plan.duration_ms <= 0.0 {
            return 1.0;
        }
        ((now_ms - self.start_ms) / self.plan.duration_ms).clamp(0.0, 1.0)
    }

    /// Rotation fed to the renderer at `now_ms` (wrapped to [0, 2π))
    pub fn rotation(&self, now_ms: f64) -> f64 {
        normalize_angle(self.plan.rotation_at(self.progress(now_ms)))
    }

    /// Build the result for a wheel that came to rest at `rotation`
    fn finish(&self, rotation: f64) -> SpinResult {
        let index = winning_index(rotation, self.items.len());
        SpinResult {
            index,
            label: self.items[index].clone(),
            forced: self.plan.target.is_forced(),
            final_rotation: rotation,
        }
    }
}

/// Outcome of a completed spin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpinResult {
    pub index: usize,
    pub label: String,
    /// Whether the outcome was scripted
    pub forced: bool,
    /// Resting rotation in [0, 2π)
    pub final_rotation: f64,
}

/// Spin lifecycle
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SpinPhase {
    #[default]
    Idle,
    Spinning(SpinSession),
    Completed(SpinResult),
}

/// Result of advancing the phase by one frame
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub phase: SpinPhase,
    /// Rotation to draw (wrapped), if the frame moved the wheel
    pub rotation: Option<f64>,
    /// Set exactly once, on the frame the spin completes
    pub winner: Option<SpinResult>,
}

impl SpinPhase {
    pub fn is_spinning(&self) -> bool {
        matches!(self, SpinPhase::Spinning(_))
    }

    /// Start a spin. Returns `None` (phase unchanged) if one is already
    /// active or there is nothing to spin.
    pub fn begin<S: AsRef<str>>(&self, items: &[S], plan: SpinPlan, now_ms: f64) -> Option<Self> {
        if self.is_spinning() || items.is_empty() {
            return None;
        }
        Some(SpinPhase::Spinning(SpinSession {
            plan,
            start_ms: now_ms,
            items: items.iter().map(|s| s.as_ref().to_string()).collect(),
        }))
    }

    /// Advance to `now_ms`
    pub fn advance(self, now_ms: f64) -> Step {
        match self {
            SpinPhase::Spinning(session) => {
                let progress = session.progress(now_ms);
                let rotation = session.rotation(now_ms);
                if progress < 1.0 {
                    Step {
                        phase: SpinPhase::Spinning(session),
                        rotation: Some(rotation),
                        winner: None,
                    }
                } else {
                    let result = session.finish(rotation);
                    Step {
                        phase: SpinPhase::Completed(result.clone()),
                        rotation: Some(rotation),
                        winner: Some(result),
                    }
                }
            }
            phase => Step {
                phase,
                rotation: None,
                winner: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn items(labels: &[&str]) -> Vec<String> {
        labels.iter().map(|s| s.to_string()).collect()
    }

    /// Run a plan to completion and extract the winner
    fn land(plan: &SpinPlan, count: usize) -> usize {
        winning_index(normalize_angle(plan.rotation_at(1.0)), count)
    }

    #[test]
    fn test_ease_out_cubic_endpoints() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
        assert!((ease_out_cubic(0.5) - 0.875).abs() < 1e-12);
        // Decelerates: first half covers more than second half
        assert!(ease_out_cubic(0.5) > 0.5);
    }

    #[test]
    fn test_forced_scenario_abcd() {
        let labels = items(&["A", "B", "C", "D"]);
        let expected = (3.0 * PI / 2.0 - 2.5 * (PI / 2.0) + 10.0 * PI).rem_euclid(TAU);
        assert!((forced_target_angle(2, 4) - expected).abs() < 1e-12);

        let mut rng = Pcg32::seed_from_u64(7);
        let plan = SpinPlan::new(&labels, Some("C"), &WheelSettings::default(), &mut rng);
        assert_eq!(plan.target, SpinTarget::Forced { index: 2 });
        assert!((plan.total_rotation - (20.0 * PI + expected)).abs() < 1e-9);
        assert_eq!(land(&plan, 4), 2);
    }

    #[test]
    fn test_single_item_always_wins() {
        let labels = items(&["Solo"]);
        let settings = WheelSettings::default();
        let mut rng = Pcg32::seed_from_u64(1);
        for forced in [None, Some("Solo"), Some("Nobody")] {
            for _ in 0..50 {
                let plan = SpinPlan::new(&labels, forced, &settings, &mut rng);
                assert_eq!(land(&plan, 1), 0);
            }
        }
    }

    #[test]
    fn test_forced_label_missing_is_explicit_random() {
        let labels = items(&["A", "B"]);
        assert_eq!(SpinTarget::resolve(&labels, Some("Z")), SpinTarget::ForcedNotFound);
        assert_eq!(SpinTarget::resolve(&labels, None), SpinTarget::Random);
        assert_eq!(SpinTarget::resolve(&labels, Some("")), SpinTarget::Random);
    }

    #[test]
    fn test_forced_duplicate_targets_first() {
        let labels = items(&["X", "Y", "X", "X"]);
        assert_eq!(SpinTarget::resolve(&labels, Some("X")), SpinTarget::Forced { index: 0 });
    }

    #[test]
    fn test_duration_range() {
        let settings = WheelSettings::default();
        let mut rng = Pcg32::seed_from_u64(99);
        let labels = items(&["A", "B", "C"]);
        for _ in 0..1000 {
            let plan = SpinPlan::new(&labels, None, &settings, &mut rng);
            assert!(plan.duration_ms >= 5000.0 && plan.duration_ms < 7000.0);
            assert!(plan.total_rotation >= 20.0 * PI && plan.total_rotation < 22.0 * PI);
        }
    }

    #[test]
    fn test_fairness_unforced() {
        let settings = WheelSettings::default();
        let mut rng = Pcg32::seed_from_u64(2024);
        let labels = items(&["A", "B", "C", "D", "E"]);
        let runs = 50_000;
        let mut counts = [0usize; 5];
        for _ in 0..runs {
            let plan = SpinPlan::new(&labels, None, &settings, &mut rng);
            counts[land(&plan, labels.len())] += 1;
        }
        let expected = runs as f64 / labels.len() as f64;
        for &c in &counts {
            // Well outside 5 standard deviations for a binomial(50k, 0.2)
            assert!((c as f64 - expected).abs() < expected * 0.05, "counts: {:?}", counts);
        }
    }

    #[test]
    fn test_phase_begin_rejects_while_spinning() {
        let labels = items(&["A", "B"]);
        let mut rng = Pcg32::seed_from_u64(3);
        let plan = SpinPlan::new(&labels, None, &WheelSettings::default(), &mut rng);
        let spinning = SpinPhase::Idle.begin(&labels, plan, 0.0).unwrap();

        let other = SpinPlan::new(&labels, Some("B"), &WheelSettings::default(), &mut rng);
        assert!(spinning.begin(&labels, other, 10.0).is_none());
        match &spinning {
            SpinPhase::Spinning(session) => assert_eq!(session.plan, plan),
            other => panic!("unexpected phase {:?}", other),
        }
    }

    #[test]
    fn test_phase_begin_rejects_empty() {
        let labels: Vec<String> = Vec::new();
        let mut rng = Pcg32::seed_from_u64(3);
        let plan = SpinPlan::new(&labels, None, &WheelSettings::default(), &mut rng);
        assert!(SpinPhase::Idle.begin(&labels, plan, 0.0).is_none());
    }

    #[test]
    fn test_advance_completes_once() {
        let labels = items(&["A", "B", "C", "D"]);
        let mut rng = Pcg32::seed_from_u64(11);
        let plan = SpinPlan::new(&labels, Some("D"), &WheelSettings::default(), &mut rng);
        let phase = SpinPhase::Idle.begin(&labels, plan, 1000.0).unwrap();

        let step = phase.advance(1000.0 + plan.duration_ms / 2.0);
        assert!(step.winner.is_none());
        assert!(step.phase.is_spinning());

        let step = step.phase.advance(1000.0 + plan.duration_ms);
        let winner = step.winner.expect("spin should complete");
        assert_eq!(winner.index, 3);
        assert_eq!(winner.label, "D");
        assert!(winner.forced);

        // Stale frame after completion is a no-op
        let step = step.phase.advance(1000.0 + plan.duration_ms + 16.0);
        assert!(step.winner.is_none());
        assert!(step.rotation.is_none());
    }

    proptest! {
        #[test]
        fn prop_forced_round_trip(count in 1usize..400, pick in 0usize..400) {
            let index = pick % count;
            let total = 10.0 * TAU + forced_target_angle(index, count);
            prop_assert_eq!(winning_index(total.rem_euclid(TAU), count), index);
        }

        #[test]
        fn prop_forced_plan_lands_on_target(count in 1usize..200, pick in 0usize..200, seed: u64) {
            let index = pick % count;
            let labels: Vec<String> = (0..count).map(|i| format!("item-{i}")).collect();
            let mut rng = Pcg32::seed_from_u64(seed);
            let plan = SpinPlan::new(
                &labels,
                Some(labels[index].as_str()),
                &WheelSettings::default(),
                &mut rng,
            );
            prop_assert_eq!(land(&plan, count), index);
        }

        #[test]
        fn prop_winning_index_in_range(count in 1usize..1000, rotation in -100.0f64..100.0) {
            prop_assert!(winning_index(rotation, count) < count);
        }
    }
}
