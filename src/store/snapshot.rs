//! Snapshot of all target states.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::health::state::{StatePolicy, TargetState};

/// Target URL → state. Serialized as a plain JSON object keyed by URL.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoreSnapshot {
    targets: BTreeMap<String, TargetState>,
}

impl StoreSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// A snapshot with a fresh default state for every target.
    pub fn with_defaults(targets: &[String]) -> Self {
        targets
            .iter()
            .map(|url| (url.clone(), TargetState::default()))
            .collect()
    }

    pub fn get(&self, url: &str) -> Option<&TargetState> {
        self.targets.get(url)
    }

    pub fn get_mut(&mut self, url: &str) -> Option<&mut TargetState> {
        self.targets.get_mut(url)
    }

    /// State for `url`, inserting a default entry if absent.
    pub fn entry(&mut self, url: &str) -> &mut TargetState {
        self.targets.entry(url.to_string()).or_default()
    }

    pub fn insert(&mut self, url: String, state: TargetState) -> Option<TargetState> {
        self.targets.insert(url, state)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &TargetState)> + '_ {
        self.targets.iter()
    }

    pub fn urls(&self) -> impl Iterator<Item = &str> + '_ {
        self.targets.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Clamp every entry to the window and history sizes in `policy`.
    pub fn enforce_bounds(&mut self, policy: &StatePolicy) {
        for state in self.targets.values_mut() {
            state.enforce_bounds(policy);
        }
    }
}

impl FromIterator<(String, TargetState)> for StoreSnapshot {
    fn from_iter<I: IntoIterator<Item = (String, TargetState)>>(iter: I) -> Self {
        Self {
            targets: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for StoreSnapshot {
    type Item = (String, TargetState);
    type IntoIter = std::collections::btree_map::IntoIter<String, TargetState>;

    fn into_iter(self) -> Self::IntoIter {
        self.targets.into_iter()
    }
}
