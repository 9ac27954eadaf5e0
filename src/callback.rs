//! # Callback State
//!
//! The bag of fields a handler carries between invocations of one logical
//! operation. The host persists it verbatim and hands it back on re-invocation;
//! this core only reads and writes fields in it. Exactly one operation owns a
//! given state at a time, so every component takes it by value or `&mut`.

use crate::error::Result;
use crate::probing::ProbingContext;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Value of a named milestone field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Milestone {
    Flag(bool),
    Count(i64),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CallbackState {
    #[serde(default)]
    probing: ProbingContext,
    #[serde(default)]
    timestamps: BTreeMap<String, DateTime<Utc>>,
    #[serde(default)]
    milestones: BTreeMap<String, Milestone>,
}

impl CallbackState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh state whose probing context is enabled or disabled
    pub fn with_probing_enabled(enabled: bool) -> Self {
        Self {
            probing: ProbingContext::new(enabled),
            ..Self::default()
        }
    }

    pub fn probing(&self) -> &ProbingContext {
        &self.probing
    }

    pub fn probing_mut(&mut self) -> &mut ProbingContext {
        &mut self.probing
    }

    pub fn set_probing(&mut self, probing: ProbingContext) {
        self.probing = probing;
    }

    pub fn timestamp(&self, name: &str) -> Option<DateTime<Utc>> {
        self.timestamps.get(name).copied()
    }

    pub fn set_timestamp(&mut self, name: impl Into<String>, at: DateTime<Utc>) {
        self.timestamps.insert(name.into(), at);
    }

    pub fn clear_timestamp(&mut self, name: &str) {
        self.timestamps.remove(name);
    }

    /// Boolean milestone; absent or numeric fields read as `false`
    pub fn flag(&self, name: &str) -> bool {
        matches!(self.milestones.get(name), Some(Milestone::Flag(true)))
    }

    pub fn set_flag(&mut self, name: impl Into<String>, value: bool) {
        self.milestones.insert(name.into(), Milestone::Flag(value));
    }

    /// Numeric milestone; absent or boolean fields read as `None`
    pub fn count(&self, name: &str) -> Option<i64> {
        match self.milestones.get(name) {
            Some(Milestone::Count(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn set_count(&mut self, name: impl Into<String>, value: i64) {
        self.milestones.insert(name.into(), Milestone::Count(value));
    }

    pub fn clear_milestone(&mut self, name: &str) {
        self.milestones.remove(name);
    }

    pub fn milestone(&self, name: &str) -> Option<Milestone> {
        self.milestones.get(name).copied()
    }

    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn from_json(value: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }
}
