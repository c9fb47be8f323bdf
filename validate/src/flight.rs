//! Scripted flights: a vessel layout plus timed telemetry, replayed tick by
//! tick through a rule profile.
//!
//! ```toml
//! [vessel]
//! name = "Kerbal X"
//! stage = 3
//!
//! [[vessel.parts]]
//! id = 2
//! title = "LV-T45 Engine"
//! stage = 2
//! modules = ["engine"]
//!
//! [[tick]]
//! time = 12.0
//! telemetry = { Altitude = 10500.0 }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use kat_core::config::EngineConfig;
use kat_core::sim::{RESOURCES, RecordedMessages, SimFlight, SimPart};
use kat_core::{Firing, RuleProfiles};
use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════════════════════
// Script format
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FlightScript {
    /// Absent: the built-in sample rocket
    pub vessel: Option<VesselSpec>,
    pub tick: Vec<Tick>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VesselSpec {
    pub name: String,
    #[serde(default)]
    pub stage: i64,
    #[serde(default)]
    pub situation: Option<String>,
    #[serde(default)]
    pub parts: Vec<PartSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PartSpec {
    pub id: u32,
    pub title: String,
    #[serde(default)]
    pub stage: Option<i64>,
    #[serde(default)]
    pub modules: Vec<PartModule>,
    /// Resource name → amount and capacity
    #[serde(default)]
    pub resources: BTreeMap<String, ResourceLevel>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartModule {
    Engine,
    Parachute,
    Light,
    Decoupler,
    Deployable,
    Generator,
    Drain,
    AeroSurface,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ResourceLevel {
    pub amount: f64,
    pub max: f64,
}

/// State changes applied before one evaluation
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Tick {
    pub time: f64,
    pub situation: Option<String>,
    pub telemetry: BTreeMap<String, f64>,
    /// Parts destroyed at this tick
    pub destroyed: Vec<u32>,
}

const ENGINE_THRUST: f64 = 200.0;
const GENERATOR_EFFICIENCY: f64 = 1.0;

impl FlightScript {
    pub fn load(path: &Path) -> Result<Self, String> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
        toml::from_str(&text).map_err(|e| format!("failed to parse {}: {e}", path.display()))
    }

    /// Build the simulated flight described by `[vessel]`
    pub fn build(&self) -> Result<SimFlight, String> {
        let Some(spec) = &self.vessel else {
            return Ok(SimFlight::sample());
        };
        let flight = SimFlight::new(spec.name.clone());
        for part in &spec.parts {
            flight.add_part(build_part(part)?);
        }
        flight.vessel().set_current_stage(spec.stage);
        if let Some(situation) = &spec.situation {
            set_situation(&flight, situation)?;
        }
        Ok(flight)
    }
}

fn build_part(spec: &PartSpec) -> Result<SimPart, String> {
    let mut part = SimPart::new(spec.id, spec.title.clone());
    if let Some(stage) = spec.stage {
        part = part.in_stage(stage);
    }
    for module in &spec.modules {
        part = match module {
            PartModule::Engine => part.with_engine(ENGINE_THRUST),
            PartModule::Parachute => part.with_parachute(),
            PartModule::Light => part.with_light(),
            PartModule::Decoupler => part.with_decoupler(),
            PartModule::Deployable => part.with_deployable(),
            PartModule::Generator => part.with_generator(GENERATOR_EFFICIENCY),
            PartModule::Drain => part.with_drain(),
            PartModule::AeroSurface => part.with_aero_surface(),
        };
    }
    for (name, level) in &spec.resources {
        let id = RESOURCES
            .get(name.as_str())
            .copied()
            .ok_or_else(|| format!("part {}: unknown resource {name:?}", spec.id))?;
        part = part.with_resource(id, level.amount, level.max);
    }
    Ok(part)
}

fn set_situation(flight: &SimFlight, situation: &str) -> Result<(), String> {
    if flight.vessel().set_situation(situation) {
        Ok(())
    } else {
        Err(format!("unknown situation {situation:?}"))
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Replay
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    pub vessel: String,
    pub profile: String,
    pub ticks: usize,
    pub firings: Vec<FiringRecord>,
    pub messages: Vec<MessageRecord>,
    pub final_stage: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct FiringRecord {
    pub time: f64,
    pub index: usize,
    pub rule: String,
}

impl From<Firing> for FiringRecord {
    fn from(firing: Firing) -> Self {
        Self {
            time: firing.time,
            index: firing.index,
            rule: firing.rule,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageRecord {
    pub time: f64,
    pub text: String,
    pub duration_secs: f32,
}

/// Apply every tick in order and evaluate the current profile after each
pub fn replay(
    script: &FlightScript,
    flight: &SimFlight,
    profiles: &mut RuleProfiles,
    config: &EngineConfig,
) -> Result<ReplayReport, String> {
    let mut messages = RecordedMessages::default();
    let mut report = ReplayReport {
        vessel: flight.vessel().name().to_string(),
        profile: profiles.current().name().to_string(),
        ticks: script.tick.len(),
        firings: Vec::new(),
        messages: Vec::new(),
        final_stage: 0,
    };

    for tick in &script.tick {
        flight.clock().set(tick.time);
        if let Some(situation) = &tick.situation {
            set_situation(flight, situation)?;
        }
        for (name, value) in &tick.telemetry {
            flight.vessel().set_telemetry(name, *value);
        }
        for id in &tick.destroyed {
            if !flight.remove_part(*id) {
                tracing::warn!(part = id, time = tick.time, "Destroyed part not on vessel");
            }
        }

        let seen = messages.posted().len();
        let fired = profiles.update(flight.clock(), &mut messages, config);
        report.firings.extend(fired.into_iter().map(FiringRecord::from));
        report.messages.extend(messages.posted()[seen..].iter().map(|(text, secs)| {
            MessageRecord {
                time: tick.time,
                text: text.clone(),
                duration_secs: *secs,
            }
        }));
    }

    report.final_stage = flight.vessel().current_stage();
    tracing::debug!(
        ticks = report.ticks,
        firings = report.firings.len(),
        "Replay finished"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kat_core::action::Action;
    use kat_core::condition::Condition;
    use kat_core::event::Event;
    use kat_core::rules::Rule;
    use kat_core::sim::install_catalog;
    use kat_types::Comparator;

    const SCRIPT: &str = r#"
[vessel]
name = "Hopper"
stage = 1
situation = "Flying"

[[vessel.parts]]
id = 7
title = "Chute"
stage = 0
modules = ["parachute"]

[[vessel.parts]]
id = 8
title = "Tank"
resources = { LiquidFuel = { amount = 90.0, max = 180.0 } }

[[tick]]
time = 1.0
telemetry = { Altitude = 500.0 }

[[tick]]
time = 2.0
telemetry = { Altitude = 300.0 }

[[tick]]
time = 3.0
telemetry = { Altitude = 150.0 }
"#;

    fn below(flight: &SimFlight, profiles: &RuleProfiles, threshold: &str) -> Rule {
        let scope = profiles.current().scope(flight);
        let mut condition = Condition::flight(scope);
        if let Condition::Flight(c) = &mut condition {
            c.set_property("Altitude");
            c.set_comparator(Comparator::Lt);
            c.set_target_text(threshold);
        }
        let mut stage = Action::flight(scope);
        if let Action::Flight(a) = &mut stage {
            a.set_action("NextStage");
        }
        let mut rule = Rule::new("Chutes");
        rule.set_event(Some(Event::new(condition)));
        rule.actions_mut().push(stage);
        rule.actions_mut().push(Action::message("Chutes out"));
        rule
    }

    #[test]
    fn test_script_builds_vessel() {
        let script: FlightScript = toml::from_str(SCRIPT).unwrap();
        let flight = script.build().unwrap();
        assert_eq!(flight.vessel().name(), "Hopper");
        assert_eq!(flight.vessel().parts().len(), 2);
        assert_eq!(flight.vessel().current_stage(), 1);
        let tank = flight.vessel().part(8).unwrap();
        assert_eq!(tank.tank(1).map(|t| t.amount), Some(90.0));
    }

    #[test]
    fn test_unknown_resource_is_an_error() {
        let script: FlightScript = toml::from_str(
            r#"
[vessel]
name = "Bad"

[[vessel.parts]]
id = 1
title = "Tank"
resources = { Unobtainium = { amount = 1.0, max = 1.0 } }
"#,
        )
        .unwrap();
        assert!(script.build().unwrap_err().contains("Unobtainium"));
    }

    #[test]
    fn test_missing_vessel_uses_sample() {
        let script: FlightScript = toml::from_str("[[tick]]\ntime = 1.0\n").unwrap();
        let flight = script.build().unwrap();
        assert_eq!(flight.vessel().parts().len(), 5);
    }

    #[test]
    fn test_replay_reports_firings_and_messages() {
        install_catalog().unwrap();
        let script: FlightScript = toml::from_str(SCRIPT).unwrap();
        let flight = script.build().unwrap();
        let mut profiles = RuleProfiles::new();
        let rule = below(&flight, &profiles, "200");
        profiles.current_mut().add_rule(rule);

        let report = replay(&script, &flight, &mut profiles, &EngineConfig::default()).unwrap();
        assert_eq!(report.ticks, 3);
        assert_eq!(report.firings.len(), 1);
        assert_eq!(report.firings[0].time, 3.0);
        assert_eq!(report.firings[0].rule, "Chutes");
        assert_eq!(report.messages.len(), 1);
        assert_eq!(report.messages[0].text, "Chutes out");
        assert_eq!(report.final_stage, 0);
        assert!(flight.vessel().part(7).is_some_and(|p| p.parachute.as_ref().is_some_and(|c| c.get() == 1)));
    }
}
