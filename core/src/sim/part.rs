use std::any::Any;
use std::cell::{Cell, RefCell};

use hashbrown::HashMap;

use crate::capability::{HostFault, Target, TargetCategory};

/// Index of `Stowed` in [`super::DEPLOYMENT_STATES`]
pub const CHUTE_STOWED: usize = 0;
pub const CHUTE_ACTIVE: usize = 1;
pub const CHUTE_DEPLOYED: usize = 3;
pub const CHUTE_CUT: usize = 4;

#[derive(Debug)]
pub struct EngineModule {
    pub ignited: Cell<bool>,
    pub shutdown: Cell<bool>,
    pub flameout: Cell<bool>,
    pub max_thrust: f64,
}

#[derive(Debug)]
pub struct GeneratorModule {
    pub active: Cell<bool>,
    pub efficiency: Cell<f64>,
}

#[derive(Debug)]
pub struct DrainModule {
    pub active: Cell<bool>,
    pub rate: Cell<f64>,
    pub whole_vessel: Cell<bool>,
}

#[derive(Debug, Clone, Copy)]
pub struct Tank {
    pub amount: f64,
    pub max: f64,
}

/// One simulated part. Optional modules decide which capabilities apply.
#[derive(Debug)]
pub struct SimPart {
    id: u32,
    title: String,
    stage: Option<i64>,
    pub temperature: Cell<f64>,
    pub engine: Option<EngineModule>,
    /// Deployment state index
    pub parachute: Option<Cell<usize>>,
    pub light: Option<Cell<bool>>,
    /// Decoupled yet
    pub decoupler: Option<Cell<bool>>,
    /// Extended yet
    pub deployable: Option<Cell<bool>>,
    pub generator: Option<GeneratorModule>,
    pub drain: Option<DrainModule>,
    /// Aero surface deploy angle
    pub aero_surface: Option<Cell<f64>>,
    resources: RefCell<HashMap<i64, Tank>>,
    exploded: Cell<bool>,
}

impl SimPart {
    pub fn new(id: u32, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            stage: None,
            temperature: Cell::new(290.0),
            engine: None,
            parachute: None,
            light: None,
            decoupler: None,
            deployable: None,
            generator: None,
            drain: None,
            aero_surface: None,
            resources: RefCell::new(HashMap::new()),
            exploded: Cell::new(false),
        }
    }

    // --- Builders ---

    /// Activated when the vessel reaches `stage`
    pub fn in_stage(mut self, stage: i64) -> Self {
        self.stage = Some(stage);
        self
    }

    pub fn with_engine(mut self, max_thrust: f64) -> Self {
        self.engine = Some(EngineModule {
            ignited: Cell::new(false),
            shutdown: Cell::new(false),
            flameout: Cell::new(false),
            max_thrust,
        });
        self
    }

    pub fn with_parachute(mut self) -> Self {
        self.parachute = Some(Cell::new(CHUTE_STOWED));
        self
    }

    pub fn with_light(mut self) -> Self {
        self.light = Some(Cell::new(false));
        self
    }

    pub fn with_decoupler(mut self) -> Self {
        self.decoupler = Some(Cell::new(false));
        self
    }

    pub fn with_deployable(mut self) -> Self {
        self.deployable = Some(Cell::new(false));
        self
    }

    pub fn with_generator(mut self, efficiency: f64) -> Self {
        self.generator = Some(GeneratorModule {
            active: Cell::new(false),
            efficiency: Cell::new(efficiency),
        });
        self
    }

    pub fn with_drain(mut self) -> Self {
        self.drain = Some(DrainModule {
            active: Cell::new(false),
            rate: Cell::new(1.0),
            whole_vessel: Cell::new(false),
        });
        self
    }

    pub fn with_aero_surface(mut self) -> Self {
        self.aero_surface = Some(Cell::new(0.0));
        self
    }

    pub fn with_resource(self, resource: i64, amount: f64, max: f64) -> Self {
        self.resources.borrow_mut().insert(resource, Tank { amount, max });
        self
    }

    // --- Accessors ---

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn stage(&self) -> Option<i64> {
        self.stage
    }

    pub fn is_exploded(&self) -> bool {
        self.exploded.get()
    }

    pub fn tank(&self, resource: i64) -> Option<Tank> {
        self.resources.borrow().get(&resource).copied()
    }

    pub fn set_amount(&self, resource: i64, amount: f64) {
        if let Some(tank) = self.resources.borrow_mut().get_mut(&resource) {
            tank.amount = amount.clamp(0.0, tank.max);
        }
    }

    pub fn current_thrust(&self) -> f64 {
        match &self.engine {
            Some(e) if e.ignited.get() && !e.shutdown.get() && !e.flameout.get() => e.max_thrust,
            _ => 0.0,
        }
    }

    // --- Host operations ---

    pub fn explode(&self) -> Result<(), HostFault> {
        if self.exploded.replace(true) {
            return Err(HostFault::Rejected {
                capability: "Explode",
                reason: format!("{} already exploded", self.title),
            });
        }
        tracing::debug!(part = self.id, "Part exploded");
        Ok(())
    }

    pub fn decouple(&self) -> Result<(), HostFault> {
        let decoupler = self.decoupler.as_ref().ok_or(HostFault::Missing("decoupler"))?;
        if decoupler.replace(true) {
            return Err(HostFault::Rejected {
                capability: "Decouple",
                reason: format!("{} already decoupled", self.title),
            });
        }
        Ok(())
    }

    pub fn activate_engine(&self) {
        if let Some(e) = &self.engine {
            e.ignited.set(true);
            e.shutdown.set(false);
        }
    }

    pub fn shutdown_engine(&self) {
        if let Some(e) = &self.engine {
            e.shutdown.set(true);
        }
    }

    /// Staging side effects of this part
    pub fn activate(&self) {
        self.activate_engine();
        if let Some(d) = &self.decoupler {
            d.set(true);
        }
        if let Some(chute) = &self.parachute {
            if chute.get() == CHUTE_STOWED {
                chute.set(CHUTE_ACTIVE);
            }
        }
    }
}

impl Target for SimPart {
    fn category(&self) -> TargetCategory {
        TargetCategory::Part
    }

    fn persistent_id(&self) -> Option<u32> {
        Some(self.id)
    }

    fn label(&self) -> String {
        format!("{} ({})", self.title, self.id)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
