//! Rule engine for in-flight vessel automation.
//!
//! A [`RuleSet`] holds rules of the form *when EVENT, if CONDITIONS, do
//! ACTIONS*, evaluated once per simulation tick against a host described by
//! a [`CapabilityCatalog`]. [`RuleProfiles`] keeps several named rule sets
//! per vessel and persists them through [`storage`].

pub mod action;
pub mod capability;
pub mod condition;
pub mod config;
pub mod event;
pub mod rules;
pub mod scope;
pub mod sim;
pub mod storage;
pub mod timers;
pub mod value;

// Re-exports for convenience
pub use action::{Action, ActionContext, ActionList};
pub use capability::{
    CapabilityCatalog, Clock, HostFault, MessageSink, Target, TargetCategory, TargetHandle,
    TargetResolver,
};
pub use condition::{Condition, ConditionGroup};
pub use config::EngineConfig;
pub use event::Event;
pub use rules::{Firing, Rule, RuleProfiles, RuleSet};
pub use scope::BindScope;
pub use storage::{SlotStore, StorageError};
pub use timers::{Timer, TimerRegistry};
pub use value::{SemanticType, TypedValue, Value};
