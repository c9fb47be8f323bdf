//! Edge-triggered rule event
//!
//! ```text
//! condition:  F  F  T  T  F  T
//! one-shot:         ▲                 (latched afterwards)
//! auto-reset:       ▲           ▲
//! ```

use kat_types::EventConfig;

use crate::condition::Condition;
use crate::scope::BindScope;

#[derive(Debug)]
pub struct Event {
    condition: Condition,
    previous: bool,
    auto_reset: bool,
    has_fired: bool,
}

impl Event {
    pub fn new(condition: Condition) -> Self {
        Self {
            condition,
            // A condition already true at setup must not fire
            previous: true,
            auto_reset: false,
            has_fired: false,
        }
    }

    // --- Accessors ---

    pub fn condition(&self) -> &Condition {
        &self.condition
    }

    pub fn condition_mut(&mut self) -> &mut Condition {
        &mut self.condition
    }

    /// Replacing the condition rearms the event
    pub fn set_condition(&mut self, condition: Condition) {
        self.condition = condition;
        self.reset();
    }

    pub fn auto_reset(&self) -> bool {
        self.auto_reset
    }

    pub fn set_auto_reset(&mut self, auto_reset: bool) {
        self.auto_reset = auto_reset;
    }

    pub fn has_fired(&self) -> bool {
        self.has_fired
    }

    pub fn is_valid(&self) -> bool {
        self.condition.is_valid()
    }

    // --- Evaluation ---

    /// True on a false → true transition, unless latched
    pub fn evaluate(&mut self, now: f64) -> bool {
        let current = self.condition.evaluate(now);
        let fire = if current && !self.previous {
            let fire = self.auto_reset || !self.has_fired;
            self.has_fired = !self.auto_reset;
            fire
        } else {
            false
        };
        self.previous = current;
        fire
    }

    /// Rearm a one-shot event
    pub fn reset(&mut self) {
        self.has_fired = false;
        self.previous = true;
    }

    pub fn describe(&self) -> String {
        let mode = if self.auto_reset { "auto-reset" } else { "once" };
        format!("{} ({})", self.condition.describe(), mode)
    }

    pub fn duplicate(&self) -> Self {
        Self {
            condition: self.condition.duplicate(),
            previous: true,
            auto_reset: self.auto_reset,
            has_fired: self.has_fired,
        }
    }

    // ─── Persistence ────────────────────────────────────────────────────────

    pub fn to_config(&self) -> EventConfig {
        EventConfig {
            auto_reset: self.auto_reset,
            has_fired: self.has_fired,
            condition: self.condition.to_config(),
        }
    }

    pub fn from_config(config: &EventConfig, scope: BindScope<'_>) -> Self {
        Self {
            condition: Condition::from_config(&config.condition, scope),
            previous: true,
            auto_reset: config.auto_reset,
            has_fired: config.has_fired,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::TimerCondition;
    use crate::timers::TimerRegistry;

    /// Event on a countdown whose threshold makes the condition
    /// `remaining < 5`. The countdown is driven by start/reset.
    fn countdown_event(timers: &TimerRegistry) -> Event {
        let mut c = TimerCondition::new();
        c.set_timer("C", timers);
        c.set_target_text("5");
        Event::new(Condition::Timer(c))
    }

    fn registry() -> TimerRegistry {
        let mut timers = TimerRegistry::new();
        timers.add_countdown("C");
        timers
    }

    /// Drive the condition to `state` at `now` by (re)starting or resetting
    fn drive(timers: &TimerRegistry, state: bool, now: f64) {
        let Some(timer) = timers.get("C") else {
            return;
        };
        let mut timer = timer.borrow_mut();
        if state {
            // started 6s ago on a 10s countdown: 4s left
            timer.reset();
            timer.start(now - 6.0);
        } else {
            timer.reset();
        }
    }

    fn run(event: &mut Event, timers: &TimerRegistry, sequence: &[bool]) -> Vec<usize> {
        let mut fired = Vec::new();
        for (i, &state) in sequence.iter().enumerate() {
            let now = 100.0 + i as f64;
            drive(timers, state, now);
            if event.evaluate(now) {
                fired.push(i);
            }
        }
        fired
    }

    const SEQUENCE: [bool; 6] = [false, false, true, true, false, true];

    #[test]
    fn test_one_shot_fires_once() {
        let timers = registry();
        let mut event = countdown_event(&timers);
        assert_eq!(run(&mut event, &timers, &SEQUENCE), vec![2]);
        assert!(event.has_fired());
    }

    #[test]
    fn test_auto_reset_fires_on_every_edge() {
        let timers = registry();
        let mut event = countdown_event(&timers);
        event.set_auto_reset(true);
        assert_eq!(run(&mut event, &timers, &SEQUENCE), vec![2, 5]);
        assert!(!event.has_fired());
    }

    #[test]
    fn test_initially_true_does_not_fire() {
        let timers = registry();
        let mut event = countdown_event(&timers);
        assert!(run(&mut event, &timers, &[true, true]).is_empty());
    }

    #[test]
    fn test_reset_rearms_without_spurious_edge() {
        let timers = registry();
        let mut event = countdown_event(&timers);
        assert_eq!(run(&mut event, &timers, &[false, true]), vec![1]);

        event.reset();
        assert!(!event.has_fired());
        assert!(run(&mut event, &timers, &[true]).is_empty(), "still true after reset");
        assert_eq!(run(&mut event, &timers, &[false, true]), vec![1]);
    }

    #[test]
    fn test_duplicate_keeps_latch() {
        let timers = registry();
        let mut event = countdown_event(&timers);
        run(&mut event, &timers, &[false, true]);

        let copy = event.duplicate();
        assert!(copy.has_fired());
        assert!(!copy.auto_reset());
        assert_eq!(copy.to_config(), event.to_config());
    }
}
