use kat_types::ProfilesConfig;

use super::{Firing, RuleSet};
use crate::capability::{Clock, MessageSink, TargetResolver};
use crate::config::EngineConfig;
use crate::storage::{SlotStore, StorageError};

const DEFAULT_PROFILE_NAME: &str = "Default";

/// Named rule sets of one vessel; exactly one is current.
///
/// The list is never empty: removing the last profile replaces it with a
/// fresh default one.
#[derive(Debug)]
pub struct RuleProfiles {
    profiles: Vec<RuleSet>,
    current: usize,
}

impl Default for RuleProfiles {
    fn default() -> Self {
        Self {
            profiles: vec![RuleSet::new(DEFAULT_PROFILE_NAME)],
            current: 0,
        }
    }
}

impl RuleProfiles {
    pub fn new() -> Self {
        Self::default()
    }

    // --- Accessors ---

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.profiles.iter().map(RuleSet::name).collect()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current(&self) -> &RuleSet {
        &self.profiles[self.current]
    }

    pub fn current_mut(&mut self) -> &mut RuleSet {
        &mut self.profiles[self.current]
    }

    pub fn get(&self, index: usize) -> Option<&RuleSet> {
        self.profiles.get(index)
    }

    // --- Profile list ---

    /// Append an empty profile and make it current
    pub fn add_new(&mut self, name: impl Into<String>) -> usize {
        self.profiles.push(RuleSet::new(name));
        self.current = self.profiles.len() - 1;
        self.current
    }

    pub fn rename_current(&mut self, name: impl Into<String>) {
        self.current_mut().set_name(name);
    }

    /// Remove the current profile; the last remaining one becomes current
    pub fn remove_current(&mut self) -> RuleSet {
        let removed = self.profiles.remove(self.current);
        if self.profiles.is_empty() {
            self.profiles.push(RuleSet::new(DEFAULT_PROFILE_NAME));
        }
        self.current = self.profiles.len() - 1;
        tracing::debug!(profile = %removed.name(), "Removed profile");
        removed
    }

    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.profiles.len() {
            return false;
        }
        self.current = index;
        true
    }

    // --- Timers of the current profile ---

    pub fn add_timer(&mut self, name: &str) -> bool {
        self.current_mut().add_timer(name)
    }

    pub fn add_countdown(&mut self, name: &str) -> bool {
        self.current_mut().add_countdown(name)
    }

    pub fn remove_timer(&mut self, name: &str) -> bool {
        self.current_mut().remove_timer(name)
    }

    // --- Import / export ---

    pub fn importable(&self, store: &SlotStore) -> Result<Vec<String>, StorageError> {
        store.list()
    }

    /// Load a slot as a new profile and make it current
    pub fn import(
        &mut self,
        store: &SlotStore,
        name: &str,
        resolver: &dyn TargetResolver,
    ) -> Result<usize, StorageError> {
        let config = store.import(name)?;
        self.profiles.push(RuleSet::from_config(&config, resolver));
        self.current = self.profiles.len() - 1;
        Ok(self.current)
    }

    /// Save the current profile to slot `name`. Returns false when the slot
    /// exists and `overwrite` is not set.
    pub fn export(
        &self,
        store: &SlotStore,
        name: &str,
        overwrite: bool,
    ) -> Result<bool, StorageError> {
        store.export(name, &self.current().to_config(), overwrite)
    }

    // ─── Tick ───────────────────────────────────────────────────────────────

    /// Only the current profile is evaluated
    pub fn update(
        &mut self,
        clock: &dyn Clock,
        messages: &mut dyn MessageSink,
        config: &EngineConfig,
    ) -> Vec<Firing> {
        self.current_mut().evaluate(clock, messages, config)
    }

    // ─── Persistence ────────────────────────────────────────────────────────

    pub fn to_config(&self) -> ProfilesConfig {
        ProfilesConfig {
            current: self.current,
            profiles: self.profiles.iter().map(RuleSet::to_config).collect(),
        }
    }

    /// An empty list becomes one default profile; an out-of-range current
    /// index selects the first profile
    pub fn from_config(config: &ProfilesConfig, resolver: &dyn TargetResolver) -> Self {
        let profiles: Vec<RuleSet> = config
            .profiles
            .iter()
            .map(|p| RuleSet::from_config(p, resolver))
            .collect();
        if profiles.is_empty() {
            return Self::default();
        }
        let current = if config.current < profiles.len() {
            config.current
        } else {
            tracing::warn!(current = config.current, "Current profile out of range, using first");
            0
        };
        Self { profiles, current }
    }
}
