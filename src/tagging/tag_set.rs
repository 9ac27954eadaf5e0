//! Tag collections by provenance, and the add/remove diff between two views.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Key/value tags with unique keys
pub type Tags = BTreeMap<String, String>;

/// Tags split by who owns them
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagSet {
    /// Owned by the orchestrating platform, never user-editable
    #[serde(default)]
    pub system: Tags,
    /// Owned by the enclosing deployment unit
    #[serde(default)]
    pub stack: Tags,
    /// Owned by the resource template author
    #[serde(default)]
    pub resource: Tags,
}

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_system(mut self, tags: Tags) -> Self {
        self.system = tags;
        self
    }

    pub fn with_stack(mut self, tags: Tags) -> Self {
        self.stack = tags;
        self
    }

    pub fn with_resource(mut self, tags: Tags) -> Self {
        self.resource = tags;
        self
    }

    /// Single view sent to the remote service; resource tags override stack
    /// tags, which override system tags
    pub fn merged(&self) -> Tags {
        let mut merged = self.system.clone();
        merged.extend(self.stack.iter().map(|(k, v)| (k.clone(), v.clone())));
        merged.extend(self.resource.iter().map(|(k, v)| (k.clone(), v.clone())));
        merged
    }

    /// Diff from `previous` to `self` over merged views. Keys owned by the
    /// system bucket of either side are never scheduled for removal.
    pub fn diff_from(&self, previous: &TagSet) -> TagDiff {
        let mut diff = diff(&previous.merged(), &self.merged());
        diff.to_remove
            .retain(|key| !previous.system.contains_key(key) && !self.system.contains_key(key));
        diff
    }
}

/// Minimal mutation turning one tag view into another
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagDiff {
    pub to_add: Tags,
    pub to_remove: BTreeSet<String>,
}

impl TagDiff {
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }

    /// Result of applying this diff to `previous`
    pub fn apply_to(&self, previous: &Tags) -> Tags {
        let mut tags = previous.clone();
        tags.retain(|key, _| !self.to_remove.contains(key));
        tags.extend(self.to_add.iter().map(|(k, v)| (k.clone(), v.clone())));
        tags
    }
}

/// Keys new or changed in `desired` go to `to_add`; keys only in `previous`
/// go to `to_remove`. Unchanged pairs appear in neither.
pub fn diff(previous: &Tags, desired: &Tags) -> TagDiff {
    let to_add = desired
        .iter()
        .filter(|(key, value)| previous.get(*key) != Some(*value))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    let to_remove = previous
        .keys()
        .filter(|key| !desired.contains_key(*key))
        .cloned()
        .collect();

    TagDiff { to_add, to_remove }
}
