//! One NPC: its body, its sensor and the controller the sensor feeds.
//!
//! The controller sits behind `Rc<RefCell<..>>` because three parties hold
//! it: the sensor (as a percept listener), the ranger directory (as a help
//! responder, rangers only) and the [`Npc`] itself, which ticks it.
use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec3;
use log::{info, warn};

use crate::agent::{AgentId, BodyHandle};
use crate::alert::AlertState;
use crate::behavior::{
    AgentWiring, Camper, CamperController, Controller, Ranger, RangerController, Role,
};
use crate::directory::{RangerDirectory, ResponderHandle};
use crate::flashlight::Flashlight;
use crate::layers::Layers;
use crate::sensor::{ListenerHandle, Sensor, SensorConfig};
use crate::spatial::SpatialQuery;

/// Which controller drives an [`Npc`].
pub enum Brain {
    /// A camper.
    Camper(Rc<RefCell<CamperController>>),
    /// A ranger, listed in `directory` until it dies.
    Ranger {
        /// The ranger's controller.
        controller: Rc<RefCell<RangerController>>,
        /// Directory the ranger registered with at spawn.
        directory: Rc<RangerDirectory>,
        /// Cleared once the ranger has been deregistered.
        listed: bool,
    },
}

/// A spawned NPC.
pub struct Npc {
    id: AgentId,
    body: BodyHandle,
    sensor: Sensor,
    brain: Brain,
}

fn spawn_controller<R: Role + 'static>(
    wiring: AgentWiring,
    role: R,
    sensor: &mut Sensor,
    now: f32,
) -> Rc<RefCell<Controller<R>>> {
    let controller = Rc::new(RefCell::new(Controller::spawn(wiring, role, now)));
    let listener: ListenerHandle = controller.clone();
    sensor.subscribe(listener);
    controller
}

fn tick_controller<R: Role>(id: AgentId, controller: &RefCell<Controller<R>>, now: f32) -> bool {
    match controller.try_borrow_mut() {
        Ok(mut guard) => {
            guard.tick(now);
            guard.is_dead()
        }
        Err(_) => {
            warn!("{id}: controller busy, skipped tick at t={now:.2}");
            false
        }
    }
}

impl Npc {
    /// Spawns a camper.
    #[must_use]
    pub fn camper(wiring: AgentWiring, sensor: SensorConfig, camper: Camper, now: f32) -> Self {
        let (id, body) = (wiring.id, wiring.body.clone());
        let mut sensor = Sensor::new(id, sensor, body.clone());
        let controller = spawn_controller(wiring, camper, &mut sensor, now);
        Self {
            id,
            body,
            sensor,
            brain: Brain::Camper(controller),
        }
    }

    /// Spawns a ranger and lists it in `directory`.
    #[must_use]
    pub fn ranger(
        wiring: AgentWiring,
        sensor: SensorConfig,
        ranger: Ranger,
        directory: Rc<RangerDirectory>,
        now: f32,
    ) -> Self {
        let (id, body) = (wiring.id, wiring.body.clone());
        let mut sensor = Sensor::new(id, sensor, body.clone());
        let controller = spawn_controller(wiring, ranger, &mut sensor, now);
        let responder: ResponderHandle = controller.clone();
        directory.register(id, &responder);
        Self {
            id,
            body,
            sensor,
            brain: Brain::Ranger {
                controller,
                directory,
                listed: true,
            },
        }
    }

    /// Identity of the NPC.
    #[must_use]
    pub const fn id(&self) -> AgentId {
        self.id
    }

    /// Current position.
    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.body.position()
    }

    /// The NPC's sensor.
    #[must_use]
    pub const fn sensor(&self) -> &Sensor {
        &self.sensor
    }

    /// Mutable access for emitters and trigger volumes.
    pub fn sensor_mut(&mut self) -> &mut Sensor {
        &mut self.sensor
    }

    /// The controller driving this NPC.
    #[must_use]
    pub const fn brain(&self) -> &Brain {
        &self.brain
    }

    /// Runs the sensor timer, then one behaviour step.
    pub fn update(&mut self, now: f32, spatial: &dyn SpatialQuery) {
        self.sensor.update(now, spatial);
        match &mut self.brain {
            Brain::Camper(controller) => {
                tick_controller(self.id, controller, now);
            }
            Brain::Ranger {
                controller,
                directory,
                listed,
            } => {
                let dead = tick_controller(self.id, controller, now);
                if dead && *listed {
                    directory.deregister(self.id);
                    *listed = false;
                    info!("{}: removed from ranger directory", self.id);
                }
            }
        }
    }

    /// Forwards a trigger-volume entry to the sensor.
    pub fn on_contact(&mut self, now: f32, position: Vec3, layers: Layers) {
        self.sensor.on_physical_contact(now, position, layers);
    }

    /// Debug name of the current state, or `"busy"` if the controller is
    /// mid-update.
    #[must_use]
    pub fn state_label(&self) -> String {
        let label = match &self.brain {
            Brain::Camper(controller) => controller
                .try_borrow()
                .map(|guard| format!("{:?}", guard.state())),
            Brain::Ranger { controller, .. } => controller
                .try_borrow()
                .map(|guard| format!("{:?}", guard.state())),
        };
        label.unwrap_or_else(|_| "busy".to_owned())
    }

    /// Alert level currently shown, if the controller can be read.
    #[must_use]
    pub fn alert(&self) -> Option<AlertState> {
        match &self.brain {
            Brain::Camper(controller) => controller.try_borrow().ok().map(|guard| guard.alert()),
            Brain::Ranger { controller, .. } => {
                controller.try_borrow().ok().map(|guard| guard.alert())
            }
        }
    }

    /// Returns `true` once the controller has reached its terminal state.
    #[must_use]
    pub fn is_dead(&self) -> bool {
        match &self.brain {
            Brain::Camper(controller) => controller.try_borrow().is_ok_and(|guard| guard.is_dead()),
            Brain::Ranger { controller, .. } => {
                controller.try_borrow().is_ok_and(|guard| guard.is_dead())
            }
        }
    }

    /// Beam matching this NPC's sight and reach; campers carry no light.
    #[must_use]
    pub fn flashlight(&self) -> Option<Flashlight> {
        let Brain::Ranger { controller, .. } = &self.brain else {
            return None;
        };
        let capture_distance = controller
            .try_borrow()
            .ok()?
            .role()
            .config()
            .capture_distance;
        Some(Flashlight::new(self.sensor.config(), capture_distance))
    }
}
