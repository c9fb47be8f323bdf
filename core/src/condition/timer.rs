use std::cell::RefCell;
use std::rc::{Rc, Weak};

use kat_types::TimerKind;

use crate::timers::{Timer, TimerHandle, TimerRegistry};
use crate::value::{SemanticType, TypedValue};

/// Fires on a named timer's elapsed time (timer) or remaining time
/// (countdown) crossing a threshold
#[derive(Debug)]
pub struct TimerCondition {
    timer_name: String,
    timer: Weak<RefCell<Timer>>,
    target: TypedValue,
    edited: bool,
}

impl Default for TimerCondition {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerCondition {
    pub fn new() -> Self {
        Self {
            timer_name: String::new(),
            timer: Weak::new(),
            target: TypedValue::new("target", SemanticType::Float),
            edited: true,
        }
    }

    pub fn timer_name(&self) -> &str {
        &self.timer_name
    }

    /// Live timer, unless it was removed from the registry
    pub fn timer(&self) -> Option<TimerHandle> {
        self.timer.upgrade()
    }

    pub fn target_value(&self) -> &TypedValue {
        &self.target
    }

    /// Point at a timer by name. When a countdown is chosen while the
    /// threshold text does not parse, the threshold becomes `0.0` (fires on
    /// expiry). Out-of-range thresholds are left for the user to fix.
    pub fn set_timer(&mut self, name: &str, timers: &TimerRegistry) {
        if name == self.timer_name && self.timer().is_some() {
            return;
        }
        self.timer_name = name.to_string();
        self.timer = timers
            .get(name)
            .map(|t| Rc::downgrade(&t))
            .unwrap_or_default();
        self.edited = true;

        let countdown = self.timer().is_some_and(|t| t.borrow().is_countdown());
        if countdown && !self.target.is_valid() {
            self.target.set_raw_text("0.0");
        }
    }

    pub fn set_target_text(&mut self, text: &str) -> bool {
        self.target.set_raw_text(text)
    }

    /// Countdown thresholds must lie in `[0, initial duration)`; timer
    /// thresholds must be positive
    pub fn is_valid(&self) -> bool {
        let (Some(timer), Some(t)) = (self.timer(), self.threshold()) else {
            return false;
        };
        let timer = timer.borrow();
        match timer.kind() {
            TimerKind::Countdown => (0.0..timer.initial_duration()).contains(&t),
            TimerKind::Timer => t > 0.0,
        }
    }

    fn threshold(&self) -> Option<f64> {
        self.target.value().and_then(|v| v.as_f64())
    }

    pub fn evaluate(&mut self, now: f64) -> bool {
        if !self.is_valid() {
            return false;
        }
        match (self.timer(), self.threshold()) {
            (Some(timer), Some(t)) => timer.borrow_mut().evaluate(t, now),
            _ => false,
        }
    }

    pub fn is_edited(&self) -> bool {
        self.edited || self.target.is_edited()
    }

    pub fn acknowledge(&mut self) {
        self.edited = false;
        self.target.acknowledge();
    }

    /// `Countdown Deorbit < 5.0` / `Timer Burn > 12.0`, or `invalid`
    pub fn describe(&self) -> String {
        let Some(timer) = self.timer().filter(|_| self.is_valid()) else {
            return "invalid".to_string();
        };
        let timer = timer.borrow();
        match timer.kind() {
            TimerKind::Countdown => format!("Countdown {} < {}", self.timer_name, self.target),
            TimerKind::Timer => format!("Timer {} > {}", self.timer_name, self.target),
        }
    }

    pub fn load(&mut self, name: &str, target_text: &str, timers: &TimerRegistry) {
        self.set_timer(name, timers);
        if self.timer().is_none() {
            tracing::warn!(timer = name, "Timer condition refers to a missing timer");
        }
        self.target.set_raw_text(target_text);
        self.acknowledge();
    }

    pub fn duplicate(&self) -> Self {
        Self {
            timer_name: self.timer_name.clone(),
            timer: self.timer.clone(),
            target: {
                let mut target = self.target.clone();
                target.acknowledge();
                target
            },
            edited: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> TimerRegistry {
        let mut timers = TimerRegistry::new();
        timers.add_timer("Burn");
        timers.add_countdown("Deorbit");
        timers
    }

    #[test]
    fn test_countdown_selection_defaults_threshold() {
        let timers = registry();
        let mut c = TimerCondition::new();
        c.set_timer("Deorbit", &timers);
        assert_eq!(c.target_value().raw_text(), "0.0");
        assert!(c.is_valid());
    }

    #[test]
    fn test_countdown_keeps_valid_threshold() {
        let timers = registry();
        let mut c = TimerCondition::new();
        c.set_target_text("5");
        c.set_timer("Deorbit", &timers);
        assert_eq!(c.target_value().raw_text(), "5");
    }

    #[test]
    fn test_countdown_keeps_out_of_range_threshold() {
        let timers = registry();
        let mut c = TimerCondition::new();
        c.set_target_text("15");
        c.set_timer("Deorbit", &timers);
        assert_eq!(c.target_value().raw_text(), "15");
        assert!(!c.is_valid());
    }

    #[test]
    fn test_load_countdown_keeps_saved_threshold() {
        let timers = registry();
        let mut c = TimerCondition::new();
        c.load("Deorbit", "15", &timers);
        assert_eq!(c.target_value().raw_text(), "15");
        assert!(!c.is_valid());

        let mut blank = TimerCondition::new();
        blank.load("Deorbit", "", &timers);
        assert_eq!(blank.target_value().raw_text(), "");
        assert!(!blank.is_edited());
    }

    #[test]
    fn test_threshold_ranges_by_kind() {
        let timers = registry();
        let mut c = TimerCondition::new();
        c.set_timer("Deorbit", &timers);
        c.set_target_text("10");
        assert!(!c.is_valid(), "threshold must be below the initial duration");
        c.set_target_text("-1");
        assert!(!c.is_valid());

        c.set_timer("Burn", &timers);
        c.set_target_text("0");
        assert!(!c.is_valid(), "timer threshold must be positive");
        c.set_target_text("12");
        assert!(c.is_valid());
    }

    #[test]
    fn test_timer_fires_after_threshold() {
        let timers = registry();
        let mut c = TimerCondition::new();
        c.set_timer("Burn", &timers);
        c.set_target_text("12");

        assert!(!c.evaluate(50.0), "pending timer");
        timers.get("Burn").unwrap().borrow_mut().start(100.0);
        assert!(!c.evaluate(111.0));
        assert!(c.evaluate(112.5));
        assert_eq!(c.describe(), "Timer Burn > 12");
    }

    #[test]
    fn test_removed_timer_invalidates() {
        let mut timers = registry();
        let mut c = TimerCondition::new();
        c.set_timer("Burn", &timers);
        c.set_target_text("1");
        assert!(c.is_valid());

        timers.remove("Burn");
        assert!(!c.is_valid());
        assert!(!c.evaluate(10.0));
        assert_eq!(c.timer_name(), "Burn");
        assert_eq!(c.describe(), "invalid");

        timers.add_timer("Burn");
        assert!(!c.is_valid(), "a new timer with the same name is not picked up");
    }

    #[test]
    fn test_load_missing_timer_keeps_name() {
        let timers = registry();
        let mut c = TimerCondition::new();
        c.load("Ghost", "3", &timers);
        assert_eq!(c.timer_name(), "Ghost");
        assert_eq!(c.target_value().raw_text(), "3");
        assert!(!c.is_valid());
        assert!(!c.is_edited());
    }
}
