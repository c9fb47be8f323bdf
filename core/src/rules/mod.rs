//! Rules, the rule set evaluated each tick, and per-vessel profiles
//!
//! ```text
//! RuleProfiles ──current──► RuleSet ──► [Rule] ──► Event ─► ConditionGroup ─► ActionList
//!                              └──► TimerRegistry (shared by conditions/actions)
//! ```

mod profiles;
mod rule;
mod rule_set;


pub use profiles::RuleProfiles;
pub use rule::Rule;
pub use rule_set::{Firing, RuleSet};
