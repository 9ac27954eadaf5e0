//! # Probing Debouncer
//!
//! Eventually-consistent backends sometimes report a resource as available
//! before a dependent mutation has landed. A probe requires `threshold`
//! consecutive positive observations under the same name before the signal is
//! trusted. Counters live in the [`ProbingContext`], which is persisted in the
//! callback state between invocations.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Named consecutive-success counters for one logical operation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbingContext {
    #[serde(default)]
    enabled: bool,
    #[serde(default)]
    counters: BTreeMap<String, u32>,
}

impl ProbingContext {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            counters: BTreeMap::new(),
        }
    }

    pub fn enabled() -> Self {
        Self::new(true)
    }

    pub fn disabled() -> Self {
        Self::new(false)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Debounce `check` under `name`.
    ///
    /// Returns `true` only on the `threshold`-th consecutive positive result, at
    /// which point the counter resets for the next cycle. A negative result
    /// resets the counter immediately. When probing is disabled `check` is
    /// passed through untouched. A threshold of zero behaves like one.
    pub fn with_probing<F>(&mut self, name: &str, threshold: u32, check: F) -> bool
    where
        F: FnOnce() -> bool,
    {
        if !self.enabled {
            return check();
        }
        let observed = check();
        self.record(name, threshold, observed)
    }

    /// Like [`with_probing`](Self::with_probing) for fallible checks.
    ///
    /// An error leaves the counter exactly as it was and is returned as-is.
    pub fn try_with_probing<F, E>(&mut self, name: &str, threshold: u32, check: F) -> Result<bool, E>
    where
        F: FnOnce() -> Result<bool, E>,
    {
        if !self.enabled {
            return check();
        }
        let observed = check()?;
        Ok(self.record(name, threshold, observed))
    }

    /// Current consecutive-success count for `name`; unseen names report zero
    pub fn probes(&self, name: &str) -> u32 {
        self.counters.get(name).copied().unwrap_or(0)
    }

    pub fn reset(&mut self, name: &str) {
        self.counters.remove(name);
    }

    fn record(&mut self, name: &str, threshold: u32, observed: bool) -> bool {
        if !observed {
            if self.counters.remove(name).is_some() {
                debug!(probe = name, "Probe negative, counter reset");
            }
            return false;
        }

        let count = self.probes(name).saturating_add(1);
        if count >= threshold.max(1) {
            self.counters.remove(name);
            debug!(probe = name, count, threshold, "Probe confirmed");
            true
        } else {
            self.counters.insert(name.to_string(), count);
            debug!(probe = name, count, threshold, "Probe positive, awaiting confirmation");
            false
        }
    }
}
