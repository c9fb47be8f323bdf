use kat_types::RuleSetConfig;

use super::Rule;
use crate::action::ActionContext;
use crate::capability::{Clock, MessageSink, TargetResolver};
use crate::config::EngineConfig;
use crate::scope::BindScope;
use crate::timers::{TimerHandle, TimerRegistry};

/// A rule that ran its actions during a tick
#[derive(Debug, Clone, PartialEq)]
pub struct Firing {
    pub index: usize,
    pub rule: String,
    pub time: f64,
}

/// Rules and the timers they share, evaluated together once per tick
#[derive(Debug, Default)]
pub struct RuleSet {
    name: String,
    rules: Vec<Rule>,
    timers: TimerRegistry,
}

impl RuleSet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    // --- Accessors ---

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn rule(&self, index: usize) -> Option<&Rule> {
        self.rules.get(index)
    }

    pub fn rule_mut(&mut self, index: usize) -> Option<&mut Rule> {
        self.rules.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn timers(&self) -> &TimerRegistry {
        &self.timers
    }

    /// Resolution scope for editing rules of this set
    pub fn scope<'a>(&'a self, resolver: &'a dyn TargetResolver) -> BindScope<'a> {
        BindScope::new(resolver, &self.timers)
    }

    // --- Rules ---

    /// Append a rule, returning its index
    pub fn add_rule(&mut self, rule: Rule) -> usize {
        self.rules.push(rule);
        self.rules.len() - 1
    }

    pub fn remove_rule(&mut self, index: usize) -> Option<Rule> {
        (index < self.rules.len()).then(|| self.rules.remove(index))
    }

    /// Insert a copy right after the source rule
    pub fn duplicate_rule(&mut self, index: usize) -> Option<usize> {
        let copy = self.rules.get(index)?.duplicate();
        self.rules.insert(index + 1, copy);
        Some(index + 1)
    }

    /// Move a rule one place towards the front
    pub fn move_up(&mut self, index: usize) -> bool {
        if index == 0 || index >= self.rules.len() {
            return false;
        }
        self.rules.swap(index - 1, index);
        true
    }

    pub fn move_down(&mut self, index: usize) -> bool {
        if index + 1 >= self.rules.len() {
            return false;
        }
        self.rules.swap(index, index + 1);
        true
    }

    /// Rearm every event
    pub fn reset_events(&mut self) {
        for rule in &mut self.rules {
            rule.reset_event();
        }
    }

    // --- Timers ---

    pub fn add_timer(&mut self, name: &str) -> bool {
        self.timers.add_timer(name)
    }

    pub fn add_countdown(&mut self, name: &str) -> bool {
        self.timers.add_countdown(name)
    }

    /// Conditions and actions naming the timer stay invalid afterwards
    pub fn remove_timer(&mut self, name: &str) -> bool {
        self.timers.remove(name)
    }

    pub fn timer(&self, name: &str) -> Option<TimerHandle> {
        self.timers.get(name)
    }

    // ─── Tick ───────────────────────────────────────────────────────────────

    /// Evaluate every rule in order against one reading of the clock.
    /// Countdowns are polled first so expiry is visible to this tick.
    pub fn evaluate(
        &mut self,
        clock: &dyn Clock,
        messages: &mut dyn MessageSink,
        config: &EngineConfig,
    ) -> Vec<Firing> {
        let now = clock.now();
        self.timers.poll(now);

        let mut ctx = ActionContext {
            now,
            messages,
            message_duration_secs: config.message_duration_secs,
        };
        let mut fired = Vec::new();
        for (index, rule) in self.rules.iter_mut().enumerate() {
            if rule.evaluate(&mut ctx) {
                fired.push(Firing {
                    index,
                    rule: rule.name().to_string(),
                    time: now,
                });
            }
        }
        fired
    }

    // ─── Persistence ────────────────────────────────────────────────────────

    pub fn to_config(&self) -> RuleSetConfig {
        RuleSetConfig {
            name: self.name.clone(),
            rules: self.rules.iter().map(Rule::to_config).collect(),
            timers: self.timers.to_configs(),
        }
    }

    /// Timers are restored first so timer conditions and actions can bind
    pub fn from_config(config: &RuleSetConfig, resolver: &dyn TargetResolver) -> Self {
        let timers = TimerRegistry::from_configs(&config.timers);
        let scope = BindScope::new(resolver, &timers);
        let rules: Vec<Rule> = config
            .rules
            .iter()
            .map(|r| Rule::from_config(r, scope))
            .collect();
        let invalid = rules.iter().filter(|r| !r.is_valid()).count();
        if invalid > 0 {
            tracing::warn!(rule_set = %config.name, invalid, "Rules with invalid entries after load");
        }
        Self {
            name: config.name.clone(),
            rules,
            timers,
        }
    }
}
