//! Superstep state cache
//!
//! Keeps every full scenario computed during a debug session so stepping
//! backwards never hits the server again.

use std::collections::BTreeMap;

use crate::scenario::Scenario;

/// Superstep index of the empty baseline scenario
pub const BASELINE_SUPERSTEP: i64 = -1;

/// Full scenarios keyed by superstep
///
/// Always holds an empty scenario at [`BASELINE_SUPERSTEP`]. There is no
/// eviction: entries live until [`StateCache::reset`].
#[derive(Debug, Clone, PartialEq)]
pub struct StateCache {
    entries: BTreeMap<i64, Scenario>,
}

impl Default for StateCache {
    fn default() -> Self {
        Self::new()
    }
}

impl StateCache {
    /// Cache holding only the baseline entry
    pub fn new() -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(BASELINE_SUPERSTEP, Scenario::new());
        Self { entries }
    }

    pub fn get(&self, step: i64) -> Option<&Scenario> {
        self.entries.get(&step)
    }

    pub fn has(&self, step: i64) -> bool {
        self.entries.contains_key(&step)
    }

    /// Store the full scenario for `step`
    pub fn put(&mut self, step: i64, scenario: Scenario) {
        if self.entries.insert(step, scenario).is_some() {
            tracing::debug!(step, "Replaced cached scenario");
        }
    }

    /// Drop everything but the baseline
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// True when nothing beyond the baseline has been stored yet
    pub fn is_bootstrap_state(&self) -> bool {
        self.entries.len() == 1
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Cached superstep indices in ascending order
    pub fn steps(&self) -> Vec<i64> {
        self.entries.keys().copied().collect()
    }
}
