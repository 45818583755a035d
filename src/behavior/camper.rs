//! Camper role: investigate noises, flee from the player, call a ranger.
use std::rc::Rc;

use glam::Vec3;
use log::warn;
use serde::{Deserialize, Serialize};

use super::investigate::{self, InvestigationConfig};
use super::patrol::PatrolCursor;
use super::{AgentCore, BehaviorState, Controller, Investigates, MotionConfig, Role, Tick};
use crate::alert::AlertState;
use crate::config::{ensure_non_negative, ConfigError};
use crate::directory::RangerDirectory;
use crate::flee::{plan_flee, FleeConfig};
use crate::layers::Layers;
use crate::percept::{Sighting, Sound};
use crate::spatial::SpatialQuery;

/// Behaviour states of a camper.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CamperState {
    /// Standing at home, or walking the waypoint loop.
    Idling,
    /// Turning towards a noise.
    HeardSomething,
    /// Walking to the noise.
    MovingToPointOfInterest,
    /// Looking around where the noise was.
    AtPointOfInterest,
    /// Walking back home after an investigation.
    ReturningToStart,
    /// Running from the player.
    Fleeing,
    /// Cowering at the flee destination.
    AtSafeSpace,
    /// Touched by the player.
    Dead,
}

impl BehaviorState for CamperState {
    const INITIAL: Self = Self::Idling;
    const DEAD: Self = Self::Dead;

    fn alert(self) -> AlertState {
        match self {
            Self::HeardSomething | Self::MovingToPointOfInterest => AlertState::Question,
            Self::Fleeing => AlertState::Exclamation,
            Self::Idling
            | Self::AtPointOfInterest
            | Self::ReturningToStart
            | Self::AtSafeSpace
            | Self::Dead => AlertState::None,
        }
    }

    fn holds_heading(self) -> bool {
        self == Self::AtSafeSpace
    }
}

impl Investigates for CamperState {
    const HEARD: Self = Self::HeardSomething;
    const MOVING: Self = Self::MovingToPointOfInterest;
    const AT_POINT: Self = Self::AtPointOfInterest;
}

/// Tunables of a camper.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CamperConfig {
    /// Speeds and steering.
    pub motion: MotionConfig,
    /// Noise investigation timing.
    pub investigation: InvestigationConfig,
    /// Flee destination policy.
    pub flee: FleeConfig,
    /// Only rangers closer than this to the camper are called; `None`
    /// calls the nearest ranger anywhere.
    pub help_radius: Option<f32>,
    /// Classification of colliders a flee destination must not sit in.
    pub obstacle_mask: Layers,
    /// Loop walked while idling. Empty for a camper that stays at home.
    pub waypoints: Vec<Vec3>,
}

impl Default for CamperConfig {
    fn default() -> Self {
        Self {
            motion: MotionConfig::default(),
            investigation: InvestigationConfig::default(),
            flee: FleeConfig::default(),
            help_radius: None,
            obstacle_mask: Layers::OBSTACLE,
            waypoints: Vec::new(),
        }
    }
}

impl CamperConfig {
    /// Checks every nested section.
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] for the first field out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.motion.validate()?;
        self.investigation.validate()?;
        self.flee.validate()?;
        if let Some(radius) = self.help_radius {
            ensure_non_negative("camper.help_radius", radius)?;
        }
        Ok(())
    }
}

/// Camper transition table.
pub struct Camper {
    config: CamperConfig,
    spatial: Rc<dyn SpatialQuery>,
    directory: Rc<RangerDirectory>,
    route: PatrolCursor,
    flee_destination: Option<Vec3>,
}

/// Controller driving one camper.
pub type CamperController = Controller<Camper>;

impl Camper {
    /// Creates the role. `spatial` is probed when planning an escape and
    /// `directory` is asked for help on every fresh sighting.
    #[must_use]
    pub fn new(
        config: CamperConfig,
        spatial: Rc<dyn SpatialQuery>,
        directory: Rc<RangerDirectory>,
    ) -> Self {
        Self {
            config,
            spatial,
            directory,
            route: PatrolCursor::new(),
            flee_destination: None,
        }
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &CamperConfig {
        &self.config
    }

    /// Destination chosen by the most recent flee.
    #[must_use]
    pub const fn flee_destination(&self) -> Option<Vec3> {
        self.flee_destination
    }

    /// Index of the waypoint currently targeted on the walking loop.
    #[must_use]
    pub const fn waypoint_index(&self) -> usize {
        self.route.index()
    }

    fn walks_a_route(&self) -> bool {
        !self.config.waypoints.is_empty()
    }

    fn resume_route(&self, core: &mut AgentCore<CamperState>, now: f32) {
        core.transition(CamperState::Idling, now);
        if self.walks_a_route() {
            self.route.head_out(&self.config.waypoints, core);
        }
    }

    /// Walking campers pick their loop back up; the others walk home.
    fn leave_point_of_interest(&self, core: &mut AgentCore<CamperState>, now: f32) {
        if self.walks_a_route() {
            self.resume_route(core, now);
            return;
        }
        let (home, speed) = (core.home(), core.motion().walk_speed);
        core.travel_to(home, speed);
        core.transition(CamperState::ReturningToStart, now);
    }
}

impl Role for Camper {
    type State = CamperState;

    fn motion(&self) -> MotionConfig {
        self.config.motion
    }

    fn start(&mut self, core: &mut AgentCore<CamperState>, now: f32) {
        self.resume_route(core, now);
    }

    fn on_sighting(&mut self, core: &mut AgentCore<CamperState>, sighting: &Sighting) {
        if core.state() == CamperState::Fleeing {
            return;
        }
        let now = sighting.at;
        core.transition(CamperState::Fleeing, now);
        core.point_of_interest = None;
        self.directory.call_nearest(
            core.id(),
            core.position(),
            self.config.help_radius,
            sighting.position,
            now,
        );
        let plan = plan_flee(
            core.position(),
            sighting.position,
            core.yaw(),
            &self.config.flee,
            self.spatial.as_ref(),
            self.config.obstacle_mask,
        );
        if plan.exhausted {
            warn!(
                "{}: no clear flee point after {} attempts; running straight back",
                core.id(),
                plan.attempts
            );
        }
        self.flee_destination = Some(plan.destination);
        let speed = core.motion().run_speed;
        core.travel_to(plan.destination, speed);
    }

    fn on_sound(&mut self, core: &mut AgentCore<CamperState>, sound: &Sound) {
        if core.state() == CamperState::Fleeing {
            return;
        }
        investigate::hear(core, sound);
    }

    fn on_tick(&mut self, core: &mut AgentCore<CamperState>, tick: Tick) {
        match core.state() {
            CamperState::HeardSomething
            | CamperState::MovingToPointOfInterest
            | CamperState::AtPointOfInterest => {
                if investigate::advance(core, &self.config.investigation, tick).is_some() {
                    self.leave_point_of_interest(core, tick.now);
                }
            }
            CamperState::ReturningToStart => {
                if core.arrived_at(core.home()) {
                    core.halt();
                    self.resume_route(core, tick.now);
                }
            }
            CamperState::Fleeing => {
                let arrived = self
                    .flee_destination
                    .map_or(true, |destination| core.arrived_at(destination));
                if arrived {
                    core.halt();
                    core.transition(CamperState::AtSafeSpace, tick.now);
                }
            }
            CamperState::Idling => self.route.advance(&self.config.waypoints, core),
            CamperState::AtSafeSpace | CamperState::Dead => {}
        }
    }
}
