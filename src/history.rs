//! Winner history
//!
//! Persisted to LocalStorage, newest first, bounded to the last 100 spins.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::wheel::SpinResult;

/// Maximum number of winners to keep
pub const MAX_HISTORY: usize = 100;

/// A single completed spin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WinnerEntry {
    pub label: String,
    /// Sector index at the time of the spin
    pub index: usize,
    /// Outcome was scripted
    #[serde(default)]
    pub forced: bool,
    /// Wall-clock time (ms since the Unix epoch) when recorded
    pub timestamp: f64,
}

/// Winners pool, most recent first
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WinnerHistory {
    pub entries: Vec<WinnerEntry>,
}

impl WinnerHistory {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "spin_wheel_history";

    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Record a finished spin at the front
    pub fn record(&mut self, result: &SpinResult, timestamp: f64) {
        self.entries.insert(
            0,
            WinnerEntry {
                label: result.label.clone(),
                index: result.index,
                forced: result.forced,
                timestamp,
            },
        );
        self.entries.truncate(MAX_HISTORY);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Most recent winner
    pub fn latest(&self) -> Option<&WinnerEntry> {
        self.entries.first()
    }

    /// Display number of the entry at `position` (oldest is 1)
    pub fn ordinal(&self, position: usize) -> Option<usize> {
        (position < self.entries.len()).then(|| self.entries.len() - position)
    }

    /// How many times each label has won
    pub fn tally(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for entry in &self.entries {
            *counts.entry(entry.label.as_str()).or_insert(0) += 1;
        }
        counts
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Load history from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(history) = serde_json::from_str::<WinnerHistory>(&json) {
                    log::info!("Loaded {} past winners", history.entries.len());
                    return history;
                }
            }
        }

        log::info!("No winner history found, starting fresh");
        Self::new()
    }

    /// Save history to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Winner history saved ({} entries)", self.entries.len());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(label: &str, index: usize) -> SpinResult {
        SpinResult {
            index,
            label: label.to_string(),
            forced: false,
            final_rotation: 0.0,
        }
    }

    #[test]
    fn test_newest_first_with_ordinals() {
        let mut h = WinnerHistory::new();
        h.record(&result("Ana", 0), 1.0);
        h.record(&result("Bo", 1), 2.0);
        assert_eq!(h.latest().map(|e| e.label.as_str()), Some("Bo"));
        assert_eq!(h.ordinal(0), Some(2));
        assert_eq!(h.ordinal(1), Some(1));
        assert_eq!(h.ordinal(2), None);
    }

    #[test]
    fn test_bounded() {
        let mut h = WinnerHistory::new();
        for i in 0..MAX_HISTORY + 5 {
            h.record(&result("x", i), i as f64);
        }
        assert_eq!(h.len(), MAX_HISTORY);
        assert_eq!(h.latest().map(|e| e.index), Some(MAX_HISTORY + 4));
    }

    #[test]
    fn test_tally_counts_duplicates() {
        let mut h = WinnerHistory::new();
        h.record(&result("A", 0), 0.0);
        h.record(&result("B", 1), 0.0);
        h.record(&result("A", 0), 0.0);
        let tally = h.tally();
        assert_eq!(tally.get("A"), Some(&2));
        assert_eq!(tally.get("B"), Some(&1));
    }

    #[test]
    fn test_clear_then_record_restarts_ordinals() {
        let mut h = WinnerHistory::new();
        h.record(&result("A", 0), 0.0);
        h.record(&result("B", 1), 0.0);
        h.clear();
        assert!(h.is_empty());
        assert!(h.latest().is_none());
        h.record(&result("C", 2), 0.0);
        assert_eq!(h.ordinal(0), Some(1));
    }
}
