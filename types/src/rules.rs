//! Persisted rule set shapes
//!
//! Rule sets are stored as raw text: capability names, part ids and the
//! user's typed strings. Nothing here holds a resolved handle, so a rule that
//! names a capability the current host does not offer still round-trips.

use serde::{Deserialize, Serialize};

use crate::timers::{TimerCommand, TimerConfig};

/// Version stamped into exported slot files
pub const RULES_FORMAT_VERSION: u32 = 1;

// ═══════════════════════════════════════════════════════════════════════════
// Comparators & Policies
// ═══════════════════════════════════════════════════════════════════════════

/// How a live value is compared against a condition's target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparator {
    #[default]
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl Comparator {
    /// Every comparator, equality first
    pub const ALL: [Comparator; 6] = [
        Comparator::Eq,
        Comparator::Ne,
        Comparator::Lt,
        Comparator::Le,
        Comparator::Gt,
        Comparator::Ge,
    ];

    /// The two comparators available to unordered types
    pub const EQUALITY: [Comparator; 2] = [Comparator::Eq, Comparator::Ne];

    pub fn is_ordering(self) -> bool {
        !matches!(self, Comparator::Eq | Comparator::Ne)
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Comparator::Eq => "==",
            Comparator::Ne => "!=",
            Comparator::Lt => "<",
            Comparator::Le => "<=",
            Comparator::Gt => ">",
            Comparator::Ge => ">=",
        }
    }
}

/// How a rule's gating conditions combine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombinationPolicy {
    /// Every condition must hold
    #[default]
    All,
    /// Any single condition is enough
    AtLeastOne,
}

// ═══════════════════════════════════════════════════════════════════════════
// Conditions
// ═══════════════════════════════════════════════════════════════════════════

/// A single persisted condition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum ConditionConfig {
    /// Property of the whole vessel
    Flight {
        #[serde(default)]
        property: String,
        #[serde(default)]
        comparator: Comparator,
        #[serde(default)]
        target_value: String,
        #[serde(default)]
        parameters: Vec<String>,
    },
    /// Property of one part, addressed by its persistent id
    Part {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        part_id: Option<u32>,
        #[serde(default)]
        property: String,
        #[serde(default)]
        comparator: Comparator,
        #[serde(default)]
        target_value: String,
        #[serde(default)]
        parameters: Vec<String>,
    },
    /// Elapsed (timer) or remaining (countdown) time of a named timer
    Timer {
        #[serde(default)]
        timer: String,
        #[serde(default)]
        target_value: String,
    },
}

/// Ordered gating conditions and how they combine
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConditionGroupConfig {
    #[serde(default)]
    pub policy: CombinationPolicy,

    /// Unconfigured slots are not persisted
    #[serde(default)]
    pub conditions: Vec<ConditionConfig>,
}

// ═══════════════════════════════════════════════════════════════════════════
// Events & Actions
// ═══════════════════════════════════════════════════════════════════════════

/// Edge-triggered event wrapping a single condition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventConfig {
    /// Re-arm after each firing instead of firing once
    #[serde(default)]
    pub auto_reset: bool,

    /// Latch for one-shot events
    #[serde(default)]
    pub has_fired: bool,

    pub condition: ConditionConfig,
}

/// A single persisted action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum ActionConfig {
    /// Vessel-level action (staging, action groups, autopilot)
    Flight {
        #[serde(default)]
        action: String,
        #[serde(default)]
        parameters: Vec<String>,
    },
    /// Action or writable field on one part
    Part {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        part_id: Option<u32>,
        #[serde(default)]
        action: String,
        #[serde(default)]
        parameters: Vec<String>,
    },
    /// On-screen message
    Message {
        #[serde(default)]
        text: String,
        /// Falls back to the engine's configured duration when absent
        #[serde(default, skip_serializing_if = "Option::is_none")]
        duration_secs: Option<f32>,
    },
    /// Start, stop or reset a named timer
    Timer {
        #[serde(default)]
        timer: String,
        #[serde(default)]
        command: TimerCommand,
    },
}

// ═══════════════════════════════════════════════════════════════════════════
// Rules, Rule Sets & Profiles
// ═══════════════════════════════════════════════════════════════════════════

/// One rule: event, gating conditions, actions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleConfig {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<EventConfig>,

    #[serde(default)]
    pub conditions: ConditionGroupConfig,

    /// Unconfigured slots are not persisted
    #[serde(default)]
    pub actions: Vec<ActionConfig>,
}

impl RuleConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            event: None,
            conditions: ConditionGroupConfig::default(),
            actions: Vec::new(),
        }
    }
}

/// A named set of rules and the timers they share
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RuleSetConfig {
    #[serde(default)]
    pub name: String,

    #[serde(default, rename = "rule")]
    pub rules: Vec<RuleConfig>,

    #[serde(default, rename = "timer")]
    pub timers: Vec<TimerConfig>,
}

/// Every rule set attached to one vessel, plus which one is active
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProfilesConfig {
    #[serde(default)]
    pub current: usize,

    #[serde(default, rename = "profile")]
    pub profiles: Vec<RuleSetConfig>,
}

/// Envelope for an exported rule set slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotFile {
    #[serde(default = "default_version")]
    pub format_version: u32,

    pub config: RuleSetConfig,
}

fn default_version() -> u32 {
    RULES_FORMAT_VERSION
}

impl SlotFile {
    pub fn new(config: RuleSetConfig) -> Self {
        Self {
            format_version: RULES_FORMAT_VERSION,
            config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rule_set_toml() {
        let toml = r#"
name = "Ascent"

[[rule]]
name = "Stage3"

[rule.event]
auto_reset = false

[rule.event.condition]
type = "flight"
property = "Altitude"
comparator = "gt"
target_value = "10000"

[[rule.actions]]
type = "flight"
action = "NextStage"

[[rule.actions]]
type = "message"
text = "Staging"

[[timer]]
name = "T1"
kind = "countdown"
initial_duration = 30.0
"#;

        let config: RuleSetConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.name, "Ascent");
        assert_eq!(config.rules.len(), 1);

        let rule = &config.rules[0];
        let event = rule.event.as_ref().unwrap();
        assert!(!event.auto_reset);
        assert!(!event.has_fired);
        assert_eq!(
            event.condition,
            ConditionConfig::Flight {
                property: "Altitude".to_string(),
                comparator: Comparator::Gt,
                target_value: "10000".to_string(),
                parameters: vec![],
            }
        );
        assert_eq!(rule.actions.len(), 2);
        assert!(matches!(
            rule.actions[1],
            ActionConfig::Message { duration_secs: None, .. }
        ));
        assert_eq!(config.timers[0].initial_duration, Some(30.0));
    }

    #[test]
    fn test_part_condition_without_part_id() {
        let toml = r#"
type = "part"
property = "Temperature"
comparator = "ge"
target_value = "1200"
"#;
        let cond: ConditionConfig = toml::from_str(toml).unwrap();
        match cond {
            ConditionConfig::Part { part_id, comparator, .. } => {
                assert_eq!(part_id, None);
                assert_eq!(comparator, Comparator::Ge);
            }
            other => panic!("unexpected condition {other:?}"),
        }
    }

    #[test]
    fn test_comparator_choices() {
        assert!(Comparator::ALL.iter().filter(|c| c.is_ordering()).count() == 4);
        assert!(Comparator::EQUALITY.iter().all(|c| !c.is_ordering()));
        assert_eq!(Comparator::Le.symbol(), "<=");
    }

    #[test]
    fn test_profiles_serialize_roundtrip_keeps_order() {
        let config = ProfilesConfig {
            current: 1,
            profiles: vec![
                RuleSetConfig {
                    name: "Launch".to_string(),
                    ..Default::default()
                },
                RuleSetConfig {
                    name: "Landing".to_string(),
                    rules: vec![RuleConfig::new("Chutes")],
                    timers: vec![],
                },
            ],
        };

        let text = toml::to_string_pretty(&config).unwrap();
        let back: ProfilesConfig = toml::from_str(&text).unwrap();
        assert_eq!(back, config);
    }
}
