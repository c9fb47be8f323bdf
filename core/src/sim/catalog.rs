//! Capability names of the simulated host and the functions behind them

use crate::capability::{
    CapabilityCatalog, CatalogError, HostFault, ParameterSpec, Target, TargetCategory, catalog,
    downcast,
};
use crate::value::{SemanticType, Value};

use super::part::{CHUTE_ACTIVE, CHUTE_CUT, CHUTE_DEPLOYED, CHUTE_STOWED, SimPart};
use super::vessel::{ControlKind, SimVessel};

type Read = Result<Option<Value>, HostFault>;
type Done = Result<(), HostFault>;

// ═══════════════════════════════════════════════════════════════════════════
// Host vocabularies
// ═══════════════════════════════════════════════════════════════════════════

pub static SITUATIONS: &[&str] = &[
    "Landed",
    "Splashed",
    "Prelaunch",
    "Flying",
    "SubOrbital",
    "Orbiting",
    "Escaping",
    "Docked",
];

/// Index of `Prelaunch` in [`SITUATIONS`]
pub const PRELAUNCH: usize = 2;

pub static SAS_MODES: &[&str] = &[
    "StabilityAssist",
    "Prograde",
    "Retrograde",
    "Normal",
    "Antinormal",
    "RadialIn",
    "RadialOut",
    "Target",
    "AntiTarget",
    "Maneuver",
];

pub static DEPLOYMENT_STATES: &[&str] = &["Stowed", "Active", "SemiDeployed", "Deployed", "Cut"];

pub static ACTION_GROUPS: &[&str] = &[
    "Stage", "Gear", "Light", "RCS", "SAS", "Brakes", "Abort", "Custom01", "Custom02", "Custom03",
    "Custom04", "Custom05", "Custom06", "Custom07", "Custom08", "Custom09", "Custom10",
];

const GROUP_GEAR: usize = 1;
const GROUP_LIGHT: usize = 2;
const GROUP_RCS: usize = 3;
const GROUP_SAS: usize = 4;
const GROUP_BRAKES: usize = 5;
const GROUP_ABORT: usize = 6;
const GROUP_CUSTOM01: usize = 7;

/// Resource name → resource id
pub static RESOURCES: phf::OrderedMap<&'static str, i64> = phf::phf_ordered_map! {
    "LiquidFuel" => 1,
    "Oxidizer" => 2,
    "ElectricCharge" => 3,
    "MonoPropellant" => 4,
    "SolidFuel" => 5,
    "XenonGas" => 6,
    "Ore" => 7,
    "IntakeAir" => 8,
};

/// Float telemetry channels of a vessel, with their readers
pub static TELEMETRY: &[(&str, catalog::ReadFn)] = &[
    ("Altitude", read_altitude),
    ("RadarAltitude", read_radar_altitude),
    ("TerrainHeight", read_terrain_height),
    ("VerticalSpeed", read_vertical_speed),
    ("TimeToAp", read_time_to_ap),
    ("TimeToPe", read_time_to_pe),
    ("OrbitPeriod", read_orbit_period),
    ("GeeForce", read_gee_force),
    ("ApoapsisAltitude", read_apoapsis_altitude),
    ("PeriapsisAltitude", read_periapsis_altitude),
    ("ApoapsisRadius", read_apoapsis_radius),
    ("PeriapsisRadius", read_periapsis_radius),
    ("OrbitalSpeed", read_orbital_speed),
    ("GroundSpeed", read_ground_speed),
];

// ═══════════════════════════════════════════════════════════════════════════
// Catalog
// ═══════════════════════════════════════════════════════════════════════════

/// Every capability of the simulated host
pub fn build_catalog() -> Result<CapabilityCatalog, CatalogError> {
    use SemanticType::{Bool, Enum, Float, Integer};
    use TargetCategory::{Part, Static, Vessel};

    let resource = || ParameterSpec::new("resource", Integer).with_options(&RESOURCES);
    let float = |name| ParameterSpec::new(name, Float);

    let mut builder = CapabilityCatalog::builder();
    for &(name, read) in TELEMETRY {
        builder = builder.readable(Vessel, name, Float, vec![], always, read);
    }

    builder
        // ─── Flight conditions ──────────────────────────────────────────────
        .readable(Vessel, "Situation", Enum(SITUATIONS), vec![], always, read_situation)
        .readable(Vessel, "CurrentStage", Integer, vec![], always, read_current_stage)
        .readable(Vessel, "ResourceAmount", Float, vec![resource()], always, read_vessel_resource)
        .readable(Vessel, "ResourceAmount%", Float, vec![resource()], always, read_vessel_resource_pct)
        // ─── Flight actions ─────────────────────────────────────────────────
        .invokable(Static, "NextStage", vec![], always, next_stage)
        .invokable(Static, "ActiveStage", vec![ParameterSpec::new("stage", Integer)], always, activate_stage)
        .invokable(Vessel, "SASMode", vec![ParameterSpec::new("mode", Enum(SAS_MODES))], always, set_sas_mode)
        .invokable(Vessel, "CustomGroup", vec![ParameterSpec::new("group", Integer)], always, custom_group)
        .invokable(Vessel, "RCS", group_toggle(GROUP_RCS), always, set_group)
        .invokable(Vessel, "SAS", group_toggle(GROUP_SAS), always, set_group)
        .invokable(Vessel, "Brakes", group_toggle(GROUP_BRAKES), always, set_group)
        .invokable(Vessel, "Gear", group_toggle(GROUP_GEAR), always, set_group)
        .invokable(Vessel, "Light", group_toggle(GROUP_LIGHT), always, set_group)
        .invokable(
            Vessel,
            "Abort",
            vec![group_param(GROUP_ABORT), ParameterSpec::new("state", Bool).fixed(Value::Bool(true))],
            always,
            set_group,
        )
        .invokable(Vessel, "Throttle", vec![float("throttle")], always, set_throttle)
        .invokable(
            Vessel,
            "Rotate",
            vec![float("yaw"), float("pitch"), float("roll"), float("duration")],
            always,
            rotate,
        )
        .invokable(
            Vessel,
            "Translate",
            vec![float("x"), float("y"), float("z"), float("duration")],
            always,
            translate,
        )
        // ─── Part conditions ────────────────────────────────────────────────
        .readable(Part, "Temperature", Float, vec![], always, read_temperature)
        .readable(Part, "Ignited", Bool, vec![], has_engine, read_ignited)
        .readable(Part, "Shutdown", Bool, vec![], has_engine, read_shutdown)
        .readable(Part, "Flameout", Bool, vec![], has_engine, read_flameout)
        .readable(Part, "CurrentThrust", Float, vec![], has_engine, read_thrust)
        .readable(Part, "DeploymentState", Enum(DEPLOYMENT_STATES), vec![], has_parachute, read_deployment)
        .readable(Part, "Efficiency", Float, vec![], has_generator, read_efficiency)
        .readable(Part, "LightOn", Bool, vec![], has_light, read_light)
        .readable(Part, "ResourceAmount", Float, vec![resource()], always, read_part_resource)
        .readable(Part, "ResourceAmount%", Float, vec![resource()], always, read_part_resource_pct)
        // ─── Part actions ───────────────────────────────────────────────────
        .invokable(Part, "Explode", vec![], always, explode)
        .invokable(Part, "ActivateEngine", vec![], has_engine, activate_engine)
        .invokable(Part, "ShutdownEngine", vec![], has_engine, shutdown_engine)
        .invokable(Part, "Decouple", vec![], has_decoupler, decouple)
        .invokable(Part, "Extend", vec![], has_deployable, extend)
        .invokable(Part, "Retract", vec![], has_deployable, retract)
        .invokable(Part, "Cut", vec![], has_parachute, cut_chute)
        .invokable(Part, "Deploy", vec![], has_parachute, deploy_chute)
        .invokable(Part, "Disarm", vec![], has_parachute, disarm_chute)
        .invokable(Part, "ActivateGenerator", vec![], has_generator, activate_generator)
        .invokable(Part, "ShutdownGenerator", vec![], has_generator, shutdown_generator)
        .invokable(Part, "LightsOn", vec![], has_light, lights_on)
        .invokable(Part, "LightsOff", vec![], has_light, lights_off)
        .invokable(Part, "StartDrain", vec![], has_drain, start_drain)
        .invokable(Part, "StopDrain", vec![], has_drain, stop_drain)
        .writable(Part, "DeployAngle", float("angle"), has_aero_surface, write_deploy_angle)
        .writable(Part, "DrainRate", float("rate"), has_drain, write_drain_rate)
        .writable(Part, "WholeVessel", ParameterSpec::new("enabled", Bool), has_drain, write_whole_vessel)
        .build()
}

/// Install the simulated host's catalog unless one is already installed
pub fn install_catalog() -> Result<&'static CapabilityCatalog, CatalogError> {
    catalog::install_with(build_catalog)
}

fn group_param(index: usize) -> ParameterSpec {
    ParameterSpec::new("group", SemanticType::Enum(ACTION_GROUPS)).fixed(Value::Enum {
        index,
        name: ACTION_GROUPS[index],
    })
}

fn group_toggle(index: usize) -> Vec<ParameterSpec> {
    vec![group_param(index), ParameterSpec::new("state", SemanticType::Bool)]
}

// ─── Target & argument access ───────────────────────────────────────────────

fn vessel_of(target: &dyn Target) -> Result<&SimVessel, HostFault> {
    downcast::<SimVessel>(target).ok_or(HostFault::Missing("vessel"))
}

fn part_of(target: &dyn Target) -> Result<&SimPart, HostFault> {
    downcast::<SimPart>(target).ok_or(HostFault::Missing("part"))
}

fn float_arg(capability: &'static str, args: &[Value], index: usize) -> Result<f64, HostFault> {
    args.get(index)
        .and_then(Value::as_f64)
        .ok_or(HostFault::BadArgument { capability, index, expected: "float" })
}

fn int_arg(capability: &'static str, args: &[Value], index: usize) -> Result<i64, HostFault> {
    args.get(index)
        .and_then(Value::as_i64)
        .ok_or(HostFault::BadArgument { capability, index, expected: "integer" })
}

fn bool_arg(capability: &'static str, args: &[Value], index: usize) -> Result<bool, HostFault> {
    args.get(index)
        .and_then(Value::as_bool)
        .ok_or(HostFault::BadArgument { capability, index, expected: "bool" })
}

fn enum_arg(capability: &'static str, args: &[Value], index: usize) -> Result<usize, HostFault> {
    args.get(index)
        .and_then(Value::as_enum)
        .ok_or(HostFault::BadArgument { capability, index, expected: "enum" })
}

// ─── Presence ───────────────────────────────────────────────────────────────

fn always(_: &dyn Target) -> bool {
    true
}

fn part_has(target: &dyn Target, facet: fn(&SimPart) -> bool) -> bool {
    downcast::<SimPart>(target).is_some_and(facet)
}

fn has_engine(target: &dyn Target) -> bool {
    part_has(target, |p| p.engine.is_some())
}

fn has_parachute(target: &dyn Target) -> bool {
    part_has(target, |p| p.parachute.is_some())
}

fn has_light(target: &dyn Target) -> bool {
    part_has(target, |p| p.light.is_some())
}

fn has_decoupler(target: &dyn Target) -> bool {
    part_has(target, |p| p.decoupler.is_some())
}

fn has_deployable(target: &dyn Target) -> bool {
    part_has(target, |p| p.deployable.is_some())
}

fn has_generator(target: &dyn Target) -> bool {
    part_has(target, |p| p.generator.is_some())
}

fn has_drain(target: &dyn Target) -> bool {
    part_has(target, |p| p.drain.is_some())
}

fn has_aero_surface(target: &dyn Target) -> bool {
    part_has(target, |p| p.aero_surface.is_some())
}

// ═══════════════════════════════════════════════════════════════════════════
// Vessel accessors
// ═══════════════════════════════════════════════════════════════════════════

macro_rules! telemetry_readers {
    ($($fn_name:ident => $key:literal),* $(,)?) => {
        $(
            fn $fn_name(target: &dyn Target, _: &[Value]) -> Read {
                Ok(vessel_of(target)?.telemetry($key)?.map(Value::Float))
            }
        )*
    };
}

telemetry_readers! {
    read_altitude => "Altitude",
    read_radar_altitude => "RadarAltitude",
    read_terrain_height => "TerrainHeight",
    read_vertical_speed => "VerticalSpeed",
    read_time_to_ap => "TimeToAp",
    read_time_to_pe => "TimeToPe",
    read_orbit_period => "OrbitPeriod",
    read_gee_force => "GeeForce",
    read_apoapsis_altitude => "ApoapsisAltitude",
    read_periapsis_altitude => "PeriapsisAltitude",
    read_apoapsis_radius => "ApoapsisRadius",
    read_periapsis_radius => "PeriapsisRadius",
    read_orbital_speed => "OrbitalSpeed",
    read_ground_speed => "GroundSpeed",
}

fn read_situation(target: &dyn Target, _: &[Value]) -> Read {
    let index = vessel_of(target)?.situation();
    Ok(SITUATIONS.get(index).map(|&name| Value::Enum { index, name }))
}

fn read_current_stage(target: &dyn Target, _: &[Value]) -> Read {
    Ok(Some(Value::Int(vessel_of(target)?.current_stage())))
}

fn read_vessel_resource(target: &dyn Target, args: &[Value]) -> Read {
    let resource = int_arg("ResourceAmount", args, 0)?;
    let (amount, _) = vessel_of(target)?.resource_totals(resource);
    Ok(Some(Value::Float(amount)))
}

/// No capacity for the resource on board: no value
fn read_vessel_resource_pct(target: &dyn Target, args: &[Value]) -> Read {
    let resource = int_arg("ResourceAmount%", args, 0)?;
    let (amount, max) = vessel_of(target)?.resource_totals(resource);
    Ok((max != 0.0).then(|| Value::Float(100.0 * amount / max)))
}

fn next_stage(target: &dyn Target, _: &[Value]) -> Done {
    vessel_of(target)?.next_stage()
}

fn activate_stage(target: &dyn Target, args: &[Value]) -> Done {
    let stage = int_arg("ActiveStage", args, 0)?;
    vessel_of(target)?.activate_stage(stage);
    Ok(())
}

fn set_sas_mode(target: &dyn Target, args: &[Value]) -> Done {
    let mode = enum_arg("SASMode", args, 0)?;
    vessel_of(target)?.set_sas_mode(mode);
    Ok(())
}

/// Groups 1..=10 map to Custom01..Custom10
fn custom_group(target: &dyn Target, args: &[Value]) -> Done {
    let group = int_arg("CustomGroup", args, 0)?;
    if !(1..=10).contains(&group) {
        return Err(HostFault::Rejected {
            capability: "CustomGroup",
            reason: format!("group {group} is not between 1 and 10"),
        });
    }
    vessel_of(target)?.set_action_group(GROUP_CUSTOM01 + group as usize - 1, true)
}

fn set_group(target: &dyn Target, args: &[Value]) -> Done {
    let group = enum_arg("SetGroup", args, 0)?;
    let state = bool_arg("SetGroup", args, 1)?;
    vessel_of(target)?.set_action_group(group, state)
}

fn set_throttle(target: &dyn Target, args: &[Value]) -> Done {
    let throttle = float_arg("Throttle", args, 0)?;
    vessel_of(target)?.set_throttle(throttle);
    Ok(())
}

fn control(kind: ControlKind, capability: &'static str, target: &dyn Target, args: &[Value]) -> Done {
    let axes = [
        float_arg(capability, args, 0)?,
        float_arg(capability, args, 1)?,
        float_arg(capability, args, 2)?,
    ];
    let duration = float_arg(capability, args, 3)?;
    vessel_of(target)?.set_control(kind, axes, duration);
    Ok(())
}

fn rotate(target: &dyn Target, args: &[Value]) -> Done {
    control(ControlKind::Rotate, "Rotate", target, args)
}

fn translate(target: &dyn Target, args: &[Value]) -> Done {
    control(ControlKind::Translate, "Translate", target, args)
}

// ═══════════════════════════════════════════════════════════════════════════
// Part accessors
// ═══════════════════════════════════════════════════════════════════════════

fn read_temperature(target: &dyn Target, _: &[Value]) -> Read {
    Ok(Some(Value::Float(part_of(target)?.temperature.get())))
}

fn engine_flag(target: &dyn Target, flag: fn(&super::part::EngineModule) -> bool) -> Read {
    let engine = part_of(target)?.engine.as_ref().ok_or(HostFault::Missing("engine"))?;
    Ok(Some(Value::Bool(flag(engine))))
}

fn read_ignited(target: &dyn Target, _: &[Value]) -> Read {
    engine_flag(target, |e| e.ignited.get())
}

fn read_shutdown(target: &dyn Target, _: &[Value]) -> Read {
    engine_flag(target, |e| e.shutdown.get())
}

fn read_flameout(target: &dyn Target, _: &[Value]) -> Read {
    engine_flag(target, |e| e.flameout.get())
}

fn read_thrust(target: &dyn Target, _: &[Value]) -> Read {
    Ok(Some(Value::Float(part_of(target)?.current_thrust())))
}

fn read_deployment(target: &dyn Target, _: &[Value]) -> Read {
    let chute = part_of(target)?.parachute.as_ref().ok_or(HostFault::Missing("parachute"))?;
    let index = chute.get();
    Ok(DEPLOYMENT_STATES.get(index).map(|&name| Value::Enum { index, name }))
}

fn read_efficiency(target: &dyn Target, _: &[Value]) -> Read {
    let generator = part_of(target)?.generator.as_ref().ok_or(HostFault::Missing("generator"))?;
    let efficiency = if generator.active.get() { generator.efficiency.get() } else { 0.0 };
    Ok(Some(Value::Float(efficiency)))
}

fn read_light(target: &dyn Target, _: &[Value]) -> Read {
    let light = part_of(target)?.light.as_ref().ok_or(HostFault::Missing("light"))?;
    Ok(Some(Value::Bool(light.get())))
}

/// Parts without the resource hold none of it
fn read_part_resource(target: &dyn Target, args: &[Value]) -> Read {
    let resource = int_arg("ResourceAmount", args, 0)?;
    let amount = part_of(target)?.tank(resource).map_or(0.0, |t| t.amount);
    Ok(Some(Value::Float(amount)))
}

fn read_part_resource_pct(target: &dyn Target, args: &[Value]) -> Read {
    let resource = int_arg("ResourceAmount%", args, 0)?;
    let pct = match part_of(target)?.tank(resource) {
        Some(t) if t.max > 0.0 => 100.0 * t.amount / t.max,
        _ => 0.0,
    };
    Ok(Some(Value::Float(pct)))
}

fn explode(target: &dyn Target, _: &[Value]) -> Done {
    part_of(target)?.explode()
}

fn activate_engine(target: &dyn Target, _: &[Value]) -> Done {
    part_of(target)?.activate_engine();
    Ok(())
}

fn shutdown_engine(target: &dyn Target, _: &[Value]) -> Done {
    part_of(target)?.shutdown_engine();
    Ok(())
}

fn decouple(target: &dyn Target, _: &[Value]) -> Done {
    part_of(target)?.decouple()
}

fn set_deployed(target: &dyn Target, extended: bool) -> Done {
    let deployable = part_of(target)?.deployable.as_ref().ok_or(HostFault::Missing("deployable"))?;
    deployable.set(extended);
    Ok(())
}

fn extend(target: &dyn Target, _: &[Value]) -> Done {
    set_deployed(target, true)
}

fn retract(target: &dyn Target, _: &[Value]) -> Done {
    set_deployed(target, false)
}

fn deploy_chute(target: &dyn Target, _: &[Value]) -> Done {
    let chute = part_of(target)?.parachute.as_ref().ok_or(HostFault::Missing("parachute"))?;
    if chute.get() == CHUTE_CUT {
        return Err(HostFault::Rejected {
            capability: "Deploy",
            reason: "parachute was cut".to_string(),
        });
    }
    chute.set(CHUTE_DEPLOYED);
    Ok(())
}

fn cut_chute(target: &dyn Target, _: &[Value]) -> Done {
    let chute = part_of(target)?.parachute.as_ref().ok_or(HostFault::Missing("parachute"))?;
    if chute.get() != CHUTE_STOWED {
        chute.set(CHUTE_CUT);
    }
    Ok(())
}

fn disarm_chute(target: &dyn Target, _: &[Value]) -> Done {
    let chute = part_of(target)?.parachute.as_ref().ok_or(HostFault::Missing("parachute"))?;
    if chute.get() == CHUTE_ACTIVE {
        chute.set(CHUTE_STOWED);
    }
    Ok(())
}

fn set_generator(target: &dyn Target, active: bool) -> Done {
    let generator = part_of(target)?.generator.as_ref().ok_or(HostFault::Missing("generator"))?;
    generator.active.set(active);
    Ok(())
}

fn activate_generator(target: &dyn Target, _: &[Value]) -> Done {
    set_generator(target, true)
}

fn shutdown_generator(target: &dyn Target, _: &[Value]) -> Done {
    set_generator(target, false)
}

fn set_light(target: &dyn Target, on: bool) -> Done {
    let light = part_of(target)?.light.as_ref().ok_or(HostFault::Missing("light"))?;
    light.set(on);
    Ok(())
}

fn lights_on(target: &dyn Target, _: &[Value]) -> Done {
    set_light(target, true)
}

fn lights_off(target: &dyn Target, _: &[Value]) -> Done {
    set_light(target, false)
}

fn drain_of(target: &dyn Target) -> Result<&super::part::DrainModule, HostFault> {
    part_of(target)?.drain.as_ref().ok_or(HostFault::Missing("drain"))
}

fn start_drain(target: &dyn Target, _: &[Value]) -> Done {
    drain_of(target)?.active.set(true);
    Ok(())
}

fn stop_drain(target: &dyn Target, _: &[Value]) -> Done {
    drain_of(target)?.active.set(false);
    Ok(())
}

fn write_deploy_angle(target: &dyn Target, value: &Value) -> Done {
    let angle = value.as_f64().ok_or(HostFault::BadArgument {
        capability: "DeployAngle",
        index: 0,
        expected: "float",
    })?;
    let surface = part_of(target)?.aero_surface.as_ref().ok_or(HostFault::Missing("aero surface"))?;
    surface.set(angle);
    Ok(())
}

fn write_drain_rate(target: &dyn Target, value: &Value) -> Done {
    let rate = value.as_f64().ok_or(HostFault::BadArgument {
        capability: "DrainRate",
        index: 0,
        expected: "float",
    })?;
    drain_of(target)?.rate.set(rate);
    Ok(())
}

fn write_whole_vessel(target: &dyn Target, value: &Value) -> Done {
    let enabled = value.as_bool().ok_or(HostFault::BadArgument {
        capability: "WholeVessel",
        index: 0,
        expected: "bool",
    })?;
    drain_of(target)?.whole_vessel.set(enabled);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::Role;
    use crate::sim::SimFlight;

    #[test]
    fn test_catalog_builds_without_duplicates() {
        let catalog = build_catalog().unwrap();
        assert!(catalog.lookup(TargetCategory::Vessel, "ResourceAmount").is_some());
        assert!(catalog.lookup(TargetCategory::Part, "ResourceAmount").is_some());
        assert!(catalog.lookup(TargetCategory::Vessel, "NextStage").is_some());
    }

    #[test]
    fn test_second_install_is_rejected() {
        install_catalog().unwrap();
        let again = catalog::install(build_catalog().unwrap());
        assert!(matches!(again, Err(CatalogError::AlreadyInstalled)));
        assert!(install_catalog().is_ok(), "install_with keeps the first catalog");
    }

    #[test]
    fn test_part_capabilities_follow_modules() {
        let catalog = build_catalog().unwrap();
        let flight = SimFlight::sample();
        let tank = flight.part_handle(5).unwrap();
        let actions = catalog.applicable_names(&*tank, Role::Action);
        assert_eq!(actions, vec!["Explode"]);

        let vessel = flight.vessel_handle();
        let names = catalog.applicable_names(&*vessel, Role::Action);
        assert!(names.contains(&"NextStage"));
        assert!(names.contains(&"Rotate"));
        assert!(!names.contains(&"Explode"));
    }

    #[test]
    fn test_custom_group_range() {
        let flight = SimFlight::sample();
        let vessel = flight.vessel_handle();
        assert!(custom_group(&*vessel, &[Value::Int(3)]).is_ok());
        assert!(flight.vessel().action_group_by_name("Custom03"));
        assert!(matches!(
            custom_group(&*vessel, &[Value::Int(11)]),
            Err(HostFault::Rejected { capability: "CustomGroup", .. })
        ));
        assert!(matches!(
            custom_group(&*vessel, &[Value::Text("3".into())]),
            Err(HostFault::BadArgument { index: 0, .. })
        ));
    }

    #[test]
    fn test_resource_percent_without_capacity_has_no_value() {
        let flight = SimFlight::sample();
        let vessel = flight.vessel_handle();
        let ore = RESOURCES.get("Ore").copied().unwrap();
        assert_eq!(read_vessel_resource_pct(&*vessel, &[Value::Int(ore)]), Ok(None));

        let fuel = RESOURCES.get("LiquidFuel").copied().unwrap();
        assert_eq!(
            read_vessel_resource_pct(&*vessel, &[Value::Int(fuel)]),
            Ok(Some(Value::Float(100.0)))
        );
    }

    #[test]
    fn test_rotate_holds_until_duration() {
        let flight = SimFlight::sample();
        let vessel = flight.vessel_handle();
        flight.clock().set(10.0);
        let args = [Value::Float(0.1), Value::Float(0.0), Value::Float(0.0), Value::Float(5.0)];
        rotate(&*vessel, &args).unwrap();

        let control = flight.vessel().control().unwrap();
        assert_eq!(control.kind, ControlKind::Rotate);
        assert_eq!(control.until, 15.0);
        flight.clock().set(15.0);
        assert!(flight.vessel().control().is_none());
    }
}
