//! Shared types for the KAT automation engine.
//!
//! Everything in this crate is plain serde data: the on-disk shape of rule
//! sets, timers and profiles, plus the small enums (comparators, timer states)
//! that both the engine and the tooling speak. No engine behaviour lives here.

pub mod formatting;
mod rules;
mod timers;

pub use rules::{
    ActionConfig, CombinationPolicy, Comparator, ConditionConfig, ConditionGroupConfig,
    EventConfig, ProfilesConfig, RULES_FORMAT_VERSION, RuleConfig, RuleSetConfig, SlotFile,
};
pub use timers::{TimerCommand, TimerConfig, TimerKind, TimerState};
