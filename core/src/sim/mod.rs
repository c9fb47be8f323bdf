//! In-memory host: one vessel, its parts and a settable clock
//!
//! Used by the engine's tests and by `kat-validate` to replay flights. The
//! vessel and its parts implement [`Target`]; [`catalog`] registers what the
//! engine may read and do on them.
//!
//! ```text
//! SimFlight ── Rc<SimClock>
//!     └── Rc<SimVessel> ──► [Rc<SimPart>]
//! ```

mod catalog;
mod part;
mod vessel;

use std::cell::Cell;
use std::rc::Rc;

use crate::capability::{Clock, MessageSink, TargetHandle, TargetResolver};

pub use catalog::{
    ACTION_GROUPS, DEPLOYMENT_STATES, RESOURCES, SAS_MODES, SITUATIONS, build_catalog,
    install_catalog,
};
pub use part::{SimPart, Tank};
pub use vessel::{ControlKind, ControlOverride, SimVessel};

/// Settable simulation clock
#[derive(Debug, Default)]
pub struct SimClock {
    now: Cell<f64>,
}

impl SimClock {
    pub fn new(now: f64) -> Self {
        Self { now: Cell::new(now) }
    }

    pub fn set(&self, now: f64) {
        self.now.set(now);
    }

    pub fn advance(&self, secs: f64) {
        self.now.set(self.now.get() + secs);
    }
}

impl Clock for SimClock {
    fn now(&self) -> f64 {
        self.now.get()
    }
}

/// Message sink that keeps every posted message
#[derive(Debug, Default)]
pub struct RecordedMessages {
    posted: Vec<(String, f32)>,
}

impl RecordedMessages {
    pub fn posted(&self) -> &[(String, f32)] {
        &self.posted
    }
}

impl MessageSink for RecordedMessages {
    fn post(&mut self, text: &str, duration_secs: f32) {
        tracing::info!(duration_secs, "{}", text);
        self.posted.push((text.to_string(), duration_secs));
    }
}

/// The active flight: the controlled vessel plus the clock it runs on
#[derive(Debug)]
pub struct SimFlight {
    clock: Rc<SimClock>,
    vessel: Rc<SimVessel>,
}

impl SimFlight {
    pub fn new(name: impl Into<String>) -> Self {
        let clock = Rc::new(SimClock::default());
        let vessel = Rc::new(SimVessel::new(name, Rc::clone(&clock)));
        Self { clock, vessel }
    }

    /// Small staged rocket:
    ///
    /// | id | part          | stage | modules                         |
    /// |----|---------------|-------|---------------------------------|
    /// | 1  | Mk1 Pod       | -     | light, ElectricCharge           |
    /// | 2  | LV-T45 Engine | 2     | engine                          |
    /// | 3  | TD-12 Decoupler | 1   | decoupler                       |
    /// | 4  | Mk16 Parachute | 0    | parachute                       |
    /// | 5  | FL-T400 Tank  | -     | LiquidFuel, Oxidizer            |
    ///
    /// The vessel sits on the pad with stage 3 current.
    pub fn sample() -> Self {
        let flight = Self::new("Kerbal X");
        let resource = |name: &str| RESOURCES.get(name).copied().unwrap_or_default();

        flight.add_part(
            SimPart::new(1, "Mk1 Pod")
                .with_light()
                .with_resource(resource("ElectricCharge"), 50.0, 50.0),
        );
        flight.add_part(SimPart::new(2, "LV-T45 Engine").in_stage(2).with_engine(215.0));
        flight.add_part(SimPart::new(3, "TD-12 Decoupler").in_stage(1).with_decoupler());
        flight.add_part(SimPart::new(4, "Mk16 Parachute").in_stage(0).with_parachute());
        flight.add_part(
            SimPart::new(5, "FL-T400 Tank")
                .with_resource(resource("LiquidFuel"), 180.0, 180.0)
                .with_resource(resource("Oxidizer"), 220.0, 220.0),
        );
        flight.vessel.set_current_stage(3);
        flight
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    pub fn vessel(&self) -> &SimVessel {
        &self.vessel
    }

    pub fn vessel_handle(&self) -> TargetHandle {
        Rc::clone(&self.vessel) as TargetHandle
    }

    pub fn part_handle(&self, id: u32) -> Option<TargetHandle> {
        self.vessel.part(id).map(|p| p as TargetHandle)
    }

    pub fn add_part(&self, part: SimPart) -> Rc<SimPart> {
        self.vessel.add_part(part)
    }

    /// Destroy a part. Engine objects bound to it go stale.
    pub fn remove_part(&self, id: u32) -> bool {
        self.vessel.remove_part(id)
    }
}

impl TargetResolver for SimFlight {
    fn vessel(&self) -> Option<TargetHandle> {
        Some(self.vessel_handle())
    }

    fn part(&self, id: u32) -> Option<TargetHandle> {
        self.part_handle(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_flight_layout() {
        let flight = SimFlight::sample();
        assert_eq!(flight.vessel().parts().len(), 5);
        assert_eq!(flight.vessel().current_stage(), 3);
        assert!(flight.part_handle(99).is_none());
        assert_eq!(
            flight.part_handle(4).map(|p| p.label()),
            Some("Mk16 Parachute (4)".to_string())
        );
    }

    #[test]
    fn test_staging_activates_parts() {
        let flight = SimFlight::sample();
        let vessel = flight.vessel();

        vessel.next_stage().unwrap();
        assert_eq!(vessel.current_stage(), 2);
        let engine = vessel.part(2).unwrap();
        assert!(engine.current_thrust() > 0.0);

        vessel.next_stage().unwrap();
        vessel.next_stage().unwrap();
        assert_eq!(vessel.activated_stages(), vec![2, 1, 0]);
        assert!(vessel.next_stage().is_err(), "no stage below zero");
    }

    #[test]
    fn test_removed_part_no_longer_resolves() {
        let flight = SimFlight::sample();
        let weak = Rc::downgrade(&flight.part_handle(3).unwrap());
        assert!(flight.remove_part(3));
        assert!(weak.upgrade().is_none());
        assert!(TargetResolver::part(&flight, 3).is_none());
        assert!(!flight.remove_part(3));
    }

    #[test]
    fn test_clock_advances() {
        let flight = SimFlight::sample();
        flight.clock().set(5.0);
        flight.clock().advance(2.5);
        assert_eq!(flight.clock().now(), 7.5);
    }

    #[test]
    fn test_recorded_messages() {
        let mut messages = RecordedMessages::default();
        messages.post("Stage separation", 2.0);
        assert_eq!(messages.posted(), &[("Stage separation".to_string(), 2.0)]);
    }
}
