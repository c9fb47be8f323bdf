//! Boolean checks over live state
//!
//! ```text
//! ConditionGroup ──► [Option<Condition>]
//!                        │
//!          ┌─────────────┼──────────────┐
//!        Flight         Part          Timer
//!     (vessel prop)  (part prop)   (elapsed / remaining)
//! ```

mod group;
mod property;
mod timer;

pub use group::ConditionGroup;
pub use property::PropertyCondition;
pub use timer::TimerCondition;

use kat_types::ConditionConfig;

use crate::scope::BindScope;

#[derive(Debug)]
pub enum Condition {
    /// Property of the controlled vessel (or a static facility)
    Flight(PropertyCondition),
    /// Property of one part
    Part(PropertyCondition),
    Timer(TimerCondition),
}

impl Condition {
    /// Fresh flight condition bound to the current vessel
    pub fn flight(scope: BindScope<'_>) -> Self {
        let mut condition = PropertyCondition::new();
        condition.set_target_object(scope.resolver.vessel().as_ref());
        Condition::Flight(condition)
    }

    /// Fresh part condition; the part is chosen later
    pub fn part() -> Self {
        Condition::Part(PropertyCondition::new())
    }

    pub fn timer() -> Self {
        Condition::Timer(TimerCondition::new())
    }

    pub fn kind_label(&self) -> &'static str {
        match self {
            Condition::Flight(_) => "Flight",
            Condition::Part(_) => "Part",
            Condition::Timer(_) => "Timer",
        }
    }

    pub fn is_valid(&self) -> bool {
        match self {
            Condition::Flight(c) | Condition::Part(c) => c.is_valid(),
            Condition::Timer(c) => c.is_valid(),
        }
    }

    pub fn evaluate(&mut self, now: f64) -> bool {
        match self {
            Condition::Flight(c) | Condition::Part(c) => c.evaluate(),
            Condition::Timer(c) => c.evaluate(now),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Condition::Flight(c) | Condition::Part(c) => c.describe(),
            Condition::Timer(c) => c.describe(),
        }
    }

    pub fn is_edited(&self) -> bool {
        match self {
            Condition::Flight(c) | Condition::Part(c) => c.is_edited(),
            Condition::Timer(c) => c.is_edited(),
        }
    }

    pub fn acknowledge(&mut self) {
        match self {
            Condition::Flight(c) | Condition::Part(c) => c.acknowledge(),
            Condition::Timer(c) => c.acknowledge(),
        }
    }

    pub fn duplicate(&self) -> Self {
        match self {
            Condition::Flight(c) => Condition::Flight(c.duplicate()),
            Condition::Part(c) => Condition::Part(c.duplicate()),
            Condition::Timer(c) => Condition::Timer(c.duplicate()),
        }
    }

    // ─── Persistence ────────────────────────────────────────────────────────

    pub fn to_config(&self) -> ConditionConfig {
        match self {
            Condition::Flight(c) => ConditionConfig::Flight {
                property: c.property().to_string(),
                comparator: c.comparator(),
                target_value: c.target_text().to_string(),
                parameters: c.binding().parameter_texts(),
            },
            Condition::Part(c) => ConditionConfig::Part {
                part_id: c.part_id(),
                property: c.property().to_string(),
                comparator: c.comparator(),
                target_value: c.target_text().to_string(),
                parameters: c.binding().parameter_texts(),
            },
            Condition::Timer(c) => ConditionConfig::Timer {
                timer: c.timer_name().to_string(),
                target_value: c.target_value().raw_text().to_string(),
            },
        }
    }

    /// Rebuild against live objects. References that no longer resolve are
    /// kept as configured and the condition reads as invalid.
    pub fn from_config(config: &ConditionConfig, scope: BindScope<'_>) -> Self {
        match config {
            ConditionConfig::Flight {
                property,
                comparator,
                target_value,
                parameters,
            } => {
                let mut c = PropertyCondition::new();
                c.load(scope.resolver.vessel(), None, property, *comparator, target_value, parameters);
                Condition::Flight(c)
            }
            ConditionConfig::Part {
                part_id,
                property,
                comparator,
                target_value,
                parameters,
            } => {
                let part = part_id.and_then(|id| scope.resolver.part(id));
                if part.is_none() && part_id.is_some() {
                    tracing::warn!(part_id = ?part_id, property = %property, "Condition part not found");
                }
                let mut c = PropertyCondition::new();
                c.load(part, *part_id, property, *comparator, target_value, parameters);
                Condition::Part(c)
            }
            ConditionConfig::Timer {
                timer,
                target_value,
            } => {
                let mut c = TimerCondition::new();
                c.load(timer, target_value, scope.timers);
                Condition::Timer(c)
            }
        }
    }
}
