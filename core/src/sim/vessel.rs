use std::any::Any;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use hashbrown::HashMap;

use super::catalog::{ACTION_GROUPS, PRELAUNCH, SAS_MODES, SITUATIONS, TELEMETRY};
use super::part::SimPart;
use super::SimClock;
use crate::capability::{Clock, HostFault, Target, TargetCategory};

/// Control input held by the autopilot until `until`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlOverride {
    pub kind: ControlKind,
    pub axes: [f64; 3],
    pub until: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    Rotate,
    Translate,
}

/// In-memory vessel: telemetry, staging, action groups, autopilot and parts
#[derive(Debug)]
pub struct SimVessel {
    name: String,
    clock: Rc<SimClock>,
    telemetry: RefCell<HashMap<String, f64>>,
    situation: Cell<usize>,
    current_stage: Cell<i64>,
    activated_stages: RefCell<Vec<i64>>,
    action_groups: RefCell<Vec<bool>>,
    sas_mode: Cell<usize>,
    throttle: Cell<f64>,
    control: Cell<Option<ControlOverride>>,
    parts: RefCell<Vec<Rc<SimPart>>>,
    reads: Cell<usize>,
    fail_reads: Cell<bool>,
}

impl SimVessel {
    pub fn new(name: impl Into<String>, clock: Rc<SimClock>) -> Self {
        let telemetry = TELEMETRY.iter().map(|(k, _)| (k.to_string(), 0.0)).collect();
        Self {
            name: name.into(),
            clock,
            telemetry: RefCell::new(telemetry),
            situation: Cell::new(PRELAUNCH),
            current_stage: Cell::new(0),
            activated_stages: RefCell::new(Vec::new()),
            action_groups: RefCell::new(vec![false; ACTION_GROUPS.len()]),
            sas_mode: Cell::new(0),
            throttle: Cell::new(0.0),
            control: Cell::new(None),
            parts: RefCell::new(Vec::new()),
            reads: Cell::new(0),
            fail_reads: Cell::new(false),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    // ─── Telemetry ──────────────────────────────────────────────────────────

    /// Set a telemetry channel. Unknown names are accepted and readable.
    pub fn set_telemetry(&self, name: &str, value: f64) {
        self.telemetry.borrow_mut().insert(name.to_string(), value);
    }

    pub fn telemetry(&self, name: &str) -> Result<Option<f64>, HostFault> {
        self.reads.set(self.reads.get() + 1);
        if self.fail_reads.get() {
            return Err(HostFault::Rejected {
                capability: "telemetry",
                reason: "sensor offline".to_string(),
            });
        }
        Ok(self.telemetry.borrow().get(name).copied())
    }

    /// Number of telemetry reads so far
    pub fn read_count(&self) -> usize {
        self.reads.get()
    }

    /// Make every telemetry read fail
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.set(fail);
    }

    pub fn situation(&self) -> usize {
        self.situation.get()
    }

    pub fn set_situation(&self, name: &str) -> bool {
        match SITUATIONS.iter().position(|s| *s == name) {
            Some(index) => {
                self.situation.set(index);
                true
            }
            None => false,
        }
    }

    // ─── Staging ────────────────────────────────────────────────────────────

    pub fn current_stage(&self) -> i64 {
        self.current_stage.get()
    }

    pub fn set_current_stage(&self, stage: i64) {
        self.current_stage.set(stage);
    }

    pub fn activated_stages(&self) -> Vec<i64> {
        self.activated_stages.borrow().clone()
    }

    /// Stages count down towards zero
    pub fn next_stage(&self) -> Result<(), HostFault> {
        let stage = self.current_stage.get();
        if stage <= 0 {
            return Err(HostFault::Rejected {
                capability: "NextStage",
                reason: "no stage left".to_string(),
            });
        }
        self.activate_stage(stage - 1);
        Ok(())
    }

    pub fn activate_stage(&self, stage: i64) {
        self.current_stage.set(stage);
        self.activated_stages.borrow_mut().push(stage);
        for part in self.parts.borrow().iter() {
            if part.stage() == Some(stage) {
                part.activate();
            }
        }
        tracing::debug!(vessel = %self.name, stage, "Stage activated");
    }

    // ─── Action groups & autopilot ──────────────────────────────────────────

    pub fn action_group(&self, index: usize) -> bool {
        self.action_groups.borrow().get(index).copied().unwrap_or(false)
    }

    pub fn action_group_by_name(&self, name: &str) -> bool {
        ACTION_GROUPS
            .iter()
            .position(|g| *g == name)
            .is_some_and(|i| self.action_group(i))
    }

    pub fn set_action_group(&self, index: usize, state: bool) -> Result<(), HostFault> {
        match self.action_groups.borrow_mut().get_mut(index) {
            Some(group) => {
                *group = state;
                Ok(())
            }
            None => Err(HostFault::Rejected {
                capability: "SetGroup",
                reason: format!("no action group {index}"),
            }),
        }
    }

    pub fn sas_mode(&self) -> &'static str {
        SAS_MODES.get(self.sas_mode.get()).copied().unwrap_or("StabilityAssist")
    }

    pub fn set_sas_mode(&self, index: usize) {
        self.sas_mode.set(index);
    }

    pub fn throttle(&self) -> f64 {
        self.throttle.get()
    }

    pub fn set_throttle(&self, throttle: f64) {
        self.throttle.set(throttle.clamp(0.0, 1.0));
    }

    /// Override in effect right now, if any
    pub fn control(&self) -> Option<ControlOverride> {
        self.control
            .get()
            .filter(|c| c.until > self.clock.now())
    }

    pub fn set_control(&self, kind: ControlKind, axes: [f64; 3], duration: f64) {
        self.control.set(Some(ControlOverride {
            kind,
            axes,
            until: self.clock.now() + duration,
        }));
    }

    // ─── Parts ──────────────────────────────────────────────────────────────

    pub fn add_part(&self, part: SimPart) -> Rc<SimPart> {
        let part = Rc::new(part);
        self.parts.borrow_mut().push(Rc::clone(&part));
        part
    }

    pub fn part(&self, id: u32) -> Option<Rc<SimPart>> {
        self.parts.borrow().iter().find(|p| p.id() == id).cloned()
    }

    pub fn parts(&self) -> Vec<Rc<SimPart>> {
        self.parts.borrow().clone()
    }

    /// Drop the vessel's handle; bindings to the part go stale
    pub fn remove_part(&self, id: u32) -> bool {
        let mut parts = self.parts.borrow_mut();
        let before = parts.len();
        parts.retain(|p| p.id() != id);
        parts.len() != before
    }

    /// Connected totals over every part: (amount, max)
    pub fn resource_totals(&self, resource: i64) -> (f64, f64) {
        self.parts
            .borrow()
            .iter()
            .filter_map(|p| p.tank(resource))
            .fold((0.0, 0.0), |(amount, max), t| (amount + t.amount, max + t.max))
    }
}

impl Target for SimVessel {
    fn category(&self) -> TargetCategory {
        TargetCategory::Vessel
    }

    fn label(&self) -> String {
        self.name.clone()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
