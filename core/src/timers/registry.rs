use std::cell::RefCell;
use std::rc::Rc;

use hashbrown::HashMap;
use kat_types::{TimerConfig, TimerKind};

use super::Timer;

/// Shared handle; conditions and actions keep `Weak` copies
pub type TimerHandle = Rc<RefCell<Timer>>;

/// Named timers owned by one rule set
#[derive(Debug, Default)]
pub struct TimerRegistry {
    timers: HashMap<String, TimerHandle>,
}

impl TimerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.timers.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<TimerHandle> {
        self.timers.get(name).cloned()
    }

    /// Add a timer. Fails on an empty or already used name.
    pub fn insert(&mut self, timer: Timer) -> bool {
        if timer.name().is_empty() || self.contains(timer.name()) {
            return false;
        }
        self.timers
            .insert(timer.name().to_string(), Rc::new(RefCell::new(timer)));
        true
    }

    pub fn add_timer(&mut self, name: &str) -> bool {
        self.insert(Timer::new(name, TimerKind::Timer))
    }

    pub fn add_countdown(&mut self, name: &str) -> bool {
        self.insert(Timer::new(name, TimerKind::Countdown))
    }

    /// Remove a timer. Conditions and actions naming it become invalid.
    pub fn remove(&mut self, name: &str) -> bool {
        self.timers.remove(name).is_some()
    }

    /// Timer names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.timers.keys().cloned().collect();
        names.sort();
        names
    }

    /// Handles sorted by name
    pub fn handles(&self) -> Vec<TimerHandle> {
        self.names()
            .iter()
            .filter_map(|name| self.get(name))
            .collect()
    }

    /// Let expired countdowns stop themselves
    pub fn poll(&self, now: f64) {
        for timer in self.timers.values() {
            timer.borrow_mut().poll(now);
        }
    }

    pub fn to_configs(&self) -> Vec<TimerConfig> {
        self.handles()
            .iter()
            .map(|t| t.borrow().to_config())
            .collect()
    }

    pub fn from_configs(configs: &[TimerConfig]) -> Self {
        let mut registry = Self::new();
        for config in configs {
            if !registry.insert(Timer::from_config(config)) {
                tracing::warn!(timer = %config.name, "Skipping duplicate or unnamed timer");
            }
        }
        registry
    }
}
