//! Finite-state behaviour controllers.
//!
//! Campers and rangers share one engine. [`Controller`] owns the agent-wide
//! data in an [`AgentCore`] and delegates every decision to a [`Role`], which
//! supplies the state enum and the transition table. The engine handles what
//! every role agrees on:
//!
//! - `Dead` is terminal and swallows all further input,
//! - physical contact kills the agent and reports a failure exactly once,
//! - the body faces along its velocity unless the state says otherwise,
//! - every transition is logged and projected onto the alert indicator.
//!
//! The investigation sub-machine (heard something, walk over, look around)
//! is shared by both roles, as is the looping waypoint cursor.

mod agent_core;
pub mod camper;
mod investigate;
mod patrol;
pub mod ranger;

use std::fmt::Debug;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::agent::{AgentId, BodyHandle};
use crate::alert::{AlertDisplay, AlertIndicator, AlertState};
use crate::config::{ensure_non_negative, ensure_positive, ConfigError};
use crate::constants::{ARRIVAL_TOLERANCE, RUN_SPEED, TURN_RATE, WALK_SPEED};
use crate::navigation::PathAgent;
use crate::outcome::{FailureReason, OutcomeSink};
use crate::percept::{Contact, PerceptListener, Sighting, Sound};

pub use agent_core::AgentCore;
pub use camper::{Camper, CamperConfig, CamperController, CamperState};
pub use investigate::{InvestigationConfig, Lead, PointOfInterest};
pub use ranger::{Ranger, RangerConfig, RangerController, RangerState};

/// A role's state enum.
pub trait BehaviorState: Copy + Eq + Debug {
    /// State entered at spawn.
    const INITIAL: Self;
    /// Terminal state.
    const DEAD: Self;

    /// Alert level shown while in this state.
    fn alert(self) -> AlertState;

    /// Returns `true` when the body should keep its heading while moving.
    fn holds_heading(self) -> bool {
        false
    }
}

/// States that embed the shared investigation sub-machine.
pub trait Investigates: BehaviorState {
    /// Turning towards a remembered noise.
    const HEARD: Self;
    /// Walking to the point of interest.
    const MOVING: Self;
    /// Looking around at the point of interest.
    const AT_POINT: Self;
}

/// Clock reading handed to [`Role::on_tick`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tick {
    /// Simulation time in seconds.
    pub now: f32,
    /// Seconds since the previous tick; zero on the first.
    pub dt: f32,
}

/// Role-specific transition table plugged into a [`Controller`].
pub trait Role {
    /// State enum of this role.
    type State: BehaviorState;

    /// Movement tunables shared with the engine.
    fn motion(&self) -> MotionConfig;

    /// Issues the initial movement commands.
    fn start(&mut self, core: &mut AgentCore<Self::State>, now: f32);

    /// Reacts to a sighting. Never called once dead.
    fn on_sighting(&mut self, core: &mut AgentCore<Self::State>, sighting: &Sighting);

    /// Reacts to a sound. Never called once dead.
    fn on_sound(&mut self, core: &mut AgentCore<Self::State>, sound: &Sound);

    /// Evaluates clock-driven transitions. Never called once dead.
    fn on_tick(&mut self, core: &mut AgentCore<Self::State>, tick: Tick);
}

/// Speeds and steering tolerances of an agent.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Speed while patrolling, investigating or going home.
    pub walk_speed: f32,
    /// Speed while fleeing, chasing or answering a call.
    pub run_speed: f32,
    /// Slack added to the path agent's stopping distance when testing
    /// arrival.
    pub arrival_tolerance: f32,
    /// Fraction of the remaining heading error closed per second.
    pub turn_rate: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            walk_speed: WALK_SPEED,
            run_speed: RUN_SPEED,
            arrival_tolerance: ARRIVAL_TOLERANCE,
            turn_rate: TURN_RATE,
        }
    }
}

impl MotionConfig {
    /// Checks the documented ranges of every field.
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] for the first field out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_non_negative("motion.walk_speed", self.walk_speed)?;
        ensure_non_negative("motion.run_speed", self.run_speed)?;
        ensure_non_negative("motion.arrival_tolerance", self.arrival_tolerance)?;
        ensure_positive("motion.turn_rate", self.turn_rate)
    }
}

/// Engine-side collaborators of one agent.
pub struct AgentWiring {
    /// Identity used in logs and failure reports.
    pub id: AgentId,
    /// Shared pose.
    pub body: BodyHandle,
    /// Movement capability.
    pub path: Box<dyn PathAgent>,
    /// Receiver of terminal failures.
    pub outcome: Rc<dyn OutcomeSink>,
    /// Marker renderer; `None` when the agent was spawned without markers.
    pub alert_display: Option<Box<dyn AlertDisplay>>,
}

/// A behaviour state machine bound to one agent.
pub struct Controller<R: Role> {
    core: AgentCore<R::State>,
    role: R,
}

impl<R: Role> Controller<R> {
    /// Wires up a controller, enters the initial state and lets the role
    /// issue its first commands.
    pub fn spawn(wiring: AgentWiring, mut role: R, now: f32) -> Self {
        let alert = AlertIndicator::new(wiring.id, wiring.alert_display);
        let mut core = AgentCore::new(
            wiring.id,
            wiring.body,
            wiring.path,
            alert,
            wiring.outcome,
            role.motion(),
            now,
        );
        role.start(&mut core, now);
        Self { core, role }
    }

    /// Identity of the agent.
    #[must_use]
    pub const fn id(&self) -> AgentId {
        self.core.id()
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> R::State {
        self.core.state()
    }

    /// Alert level currently shown.
    #[must_use]
    pub const fn alert(&self) -> AlertState {
        self.core.alert()
    }

    /// Returns `true` once the terminal state has been reached.
    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.core.is_dead()
    }

    /// Shared agent data.
    #[must_use]
    pub const fn core(&self) -> &AgentCore<R::State> {
        &self.core
    }

    /// Role-specific data.
    #[must_use]
    pub const fn role(&self) -> &R {
        &self.role
    }

    pub(crate) fn parts_mut(&mut self) -> (&mut AgentCore<R::State>, &mut R) {
        (&mut self.core, &mut self.role)
    }

    /// Runs one behaviour step at simulation time `now`.
    pub fn tick(&mut self, now: f32) {
        if self.core.is_dead() {
            return;
        }
        let dt = self.core.advance_clock(now);
        self.core.face_velocity();
        self.role.on_tick(&mut self.core, Tick { now, dt });
    }
}

impl<R: Role> PerceptListener for Controller<R> {
    fn on_sighting(&mut self, sighting: &Sighting) {
        if self.core.is_dead() {
            return;
        }
        self.role.on_sighting(&mut self.core, sighting);
    }

    fn on_sound(&mut self, sound: &Sound) {
        if self.core.is_dead() {
            return;
        }
        self.role.on_sound(&mut self.core, sound);
    }

    fn on_contact(&mut self, contact: &Contact) {
        self.core.fail(FailureReason::Contact, contact.at);
    }
}

#[cfg(test)]
mod tests;
