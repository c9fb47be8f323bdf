use kat_types::{CombinationPolicy, ConditionGroupConfig};

use super::Condition;
use crate::scope::BindScope;

/// Ordered condition slots combined under one policy.
///
/// Slots may be unconfigured (`None`); those are skipped. A group with no
/// configured condition is true.
#[derive(Debug, Default)]
pub struct ConditionGroup {
    policy: CombinationPolicy,
    conditions: Vec<Option<Condition>>,
}

impl ConditionGroup {
    pub fn new(policy: CombinationPolicy) -> Self {
        Self {
            policy,
            conditions: Vec::new(),
        }
    }

    pub fn policy(&self) -> CombinationPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: CombinationPolicy) {
        self.policy = policy;
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn configured(&self) -> impl Iterator<Item = &Condition> {
        self.conditions.iter().flatten()
    }

    pub fn get(&self, index: usize) -> Option<&Condition> {
        self.conditions.get(index).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Condition> {
        self.conditions.get_mut(index).and_then(Option::as_mut)
    }

    /// Append an empty slot, returning its index
    pub fn add_slot(&mut self) -> usize {
        self.conditions.push(None);
        self.conditions.len() - 1
    }

    pub fn push(&mut self, condition: Condition) {
        self.conditions.push(Some(condition));
    }

    /// Configure slot `index`. False when out of range.
    pub fn set(&mut self, index: usize, condition: Condition) -> bool {
        match self.conditions.get_mut(index) {
            Some(slot) => {
                *slot = Some(condition);
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, index: usize) -> Option<Condition> {
        if index < self.conditions.len() {
            self.conditions.remove(index)
        } else {
            None
        }
    }

    /// `All` evaluates every condition; `AtLeastOne` stops at the first true
    pub fn evaluate(&mut self, now: f64) -> bool {
        match self.policy {
            CombinationPolicy::All => {
                let mut result = true;
                for condition in self.conditions.iter_mut().flatten() {
                    result &= condition.evaluate(now);
                }
                result
            }
            CombinationPolicy::AtLeastOne => {
                let mut any_configured = false;
                for condition in self.conditions.iter_mut().flatten() {
                    any_configured = true;
                    if condition.evaluate(now) {
                        return true;
                    }
                }
                !any_configured
            }
        }
    }

    pub fn is_valid(&self) -> bool {
        self.configured().all(Condition::is_valid)
    }

    pub fn is_edited(&self) -> bool {
        self.configured().any(Condition::is_edited)
    }

    pub fn acknowledge(&mut self) {
        for condition in self.conditions.iter_mut().flatten() {
            condition.acknowledge();
        }
    }

    /// `Always true` / `N condition(s)`
    pub fn summary(&self) -> String {
        match self.configured().count() {
            0 => "Always true".to_string(),
            n => format!("{n} condition(s)"),
        }
    }

    pub fn duplicate(&self) -> Self {
        Self {
            policy: self.policy,
            conditions: self
                .conditions
                .iter()
                .map(|slot| slot.as_ref().map(Condition::duplicate))
                .collect(),
        }
    }

    pub fn to_config(&self) -> ConditionGroupConfig {
        ConditionGroupConfig {
            policy: self.policy,
            conditions: self.configured().map(Condition::to_config).collect(),
        }
    }

    pub fn from_config(config: &ConditionGroupConfig, scope: BindScope<'_>) -> Self {
        Self {
            policy: config.policy,
            conditions: config
                .conditions
                .iter()
                .map(|c| Some(Condition::from_config(c, scope)))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::TimerCondition;
    use crate::timers::TimerRegistry;

    fn running_timers() -> TimerRegistry {
        let mut timers = TimerRegistry::new();
        timers.add_timer("A");
        timers.add_timer("B");
        for t in timers.handles() {
            t.borrow_mut().start(0.0);
        }
        timers
    }

    fn after(timers: &TimerRegistry, name: &str, secs: &str) -> Condition {
        let mut c = TimerCondition::new();
        c.set_timer(name, timers);
        c.set_target_text(secs);
        Condition::Timer(c)
    }

    #[test]
    fn test_empty_group_is_true() {
        let mut group = ConditionGroup::default();
        assert!(group.evaluate(0.0));
        group.add_slot();
        group.set_policy(CombinationPolicy::AtLeastOne);
        assert!(group.evaluate(0.0), "unconfigured slots are skipped");
        assert_eq!(group.summary(), "Always true");
    }

    #[test]
    fn test_all_and_at_least_one() {
        let timers = running_timers();
        let mut group = ConditionGroup::new(CombinationPolicy::All);
        group.push(after(&timers, "A", "5"));
        group.push(after(&timers, "B", "20"));

        assert!(!group.evaluate(10.0));
        assert!(group.evaluate(25.0));

        group.set_policy(CombinationPolicy::AtLeastOne);
        assert!(group.evaluate(10.0));
        assert!(!group.evaluate(1.0));
        assert_eq!(group.summary(), "2 condition(s)");
    }

    #[test]
    fn test_invalid_member_is_false() {
        let timers = running_timers();
        let mut group = ConditionGroup::default();
        group.push(after(&timers, "A", "5"));
        group.push(after(&timers, "Missing", "5"));
        assert!(!group.is_valid());
        assert!(!group.evaluate(100.0));
    }

    #[test]
    fn test_config_skips_empty_slots() {
        let timers = running_timers();
        let mut group = ConditionGroup::default();
        group.add_slot();
        group.push(after(&timers, "A", "5"));
        assert_eq!(group.len(), 2);
        assert_eq!(group.to_config().conditions.len(), 1);
    }
}
