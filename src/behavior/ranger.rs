//! Ranger role: patrol, investigate, answer calls, chase and capture.
use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::investigate::{self, InvestigationConfig};
use super::patrol::PatrolCursor;
use super::{AgentCore, BehaviorState, Controller, Investigates, MotionConfig, Role, Tick};
use crate::alert::AlertState;
use crate::config::{ensure_non_negative, ConfigError};
use crate::constants::{CAPTURE_DISTANCE, CAPTURE_SECONDS, SECONDS_TO_REMAIN_ALERTED};
use crate::directory::HelpResponder;
use crate::outcome::FailureReason;
use crate::percept::{Sighting, Sound};

/// Behaviour states of a ranger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RangerState {
    /// Walking the waypoint loop.
    Patrolling,
    /// Turning towards a noise.
    HeardSomething,
    /// Walking to a noise, or running to a camper's call.
    MovingToPointOfInterest,
    /// Looking around where the noise or call was.
    AtPointOfInterest,
    /// Running after the player.
    Chasing,
    /// Close enough to catch the player; the capture clock is running.
    Capturing,
    /// Touched by the player, or the capture succeeded.
    Dead,
}

impl BehaviorState for RangerState {
    const INITIAL: Self = Self::Patrolling;
    const DEAD: Self = Self::Dead;

    fn alert(self) -> AlertState {
        match self {
            Self::HeardSomething | Self::MovingToPointOfInterest => AlertState::Question,
            Self::Chasing | Self::Capturing => AlertState::Exclamation,
            Self::Patrolling | Self::AtPointOfInterest | Self::Dead => AlertState::None,
        }
    }
}

impl Investigates for RangerState {
    const HEARD: Self = Self::HeardSomething;
    const MOVING: Self = Self::MovingToPointOfInterest;
    const AT_POINT: Self = Self::AtPointOfInterest;
}

/// Tunables of a ranger.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RangerConfig {
    /// Speeds and steering.
    pub motion: MotionConfig,
    /// Noise investigation timing.
    pub investigation: InvestigationConfig,
    /// Patrol loop, visited in order and wrapped round.
    pub waypoints: Vec<Vec3>,
    /// Player distance below which the capture clock runs.
    pub capture_distance: f32,
    /// Seconds the player must stay in capture range.
    pub capture_seconds: f32,
    /// Seconds a chase survives without a fresh sighting.
    pub seconds_to_remain_alerted: f32,
}

impl Default for RangerConfig {
    fn default() -> Self {
        Self {
            motion: MotionConfig::default(),
            investigation: InvestigationConfig::default(),
            waypoints: Vec::new(),
            capture_distance: CAPTURE_DISTANCE,
            capture_seconds: CAPTURE_SECONDS,
            seconds_to_remain_alerted: SECONDS_TO_REMAIN_ALERTED,
        }
    }
}

impl RangerConfig {
    /// Checks every nested section.
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] for the first field out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.motion.validate()?;
        self.investigation.validate()?;
        ensure_non_negative("ranger.capture_distance", self.capture_distance)?;
        ensure_non_negative("ranger.capture_seconds", self.capture_seconds)?;
        ensure_non_negative(
            "ranger.seconds_to_remain_alerted",
            self.seconds_to_remain_alerted,
        )
    }
}

/// Ranger transition table.
pub struct Ranger {
    config: RangerConfig,
    route: PatrolCursor,
    last_spotted: Option<f32>,
    capture_started: Option<f32>,
}

/// Controller driving one ranger.
pub type RangerController = Controller<Ranger>;

impl Ranger {
    /// Creates the role with the patrol cursor on the first waypoint.
    #[must_use]
    pub const fn new(config: RangerConfig) -> Self {
        Self {
            config,
            route: PatrolCursor::new(),
            last_spotted: None,
            capture_started: None,
        }
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &RangerConfig {
        &self.config
    }

    /// Index of the waypoint currently targeted.
    #[must_use]
    pub const fn waypoint_index(&self) -> usize {
        self.route.index()
    }

    /// Time the capture clock started, while capturing.
    #[must_use]
    pub const fn capture_started(&self) -> Option<f32> {
        self.capture_started
    }

    fn resume_patrol(&mut self, core: &mut AgentCore<RangerState>, now: f32) {
        self.capture_started = None;
        self.last_spotted = None;
        core.point_of_interest = None;
        core.transition(RangerState::Patrolling, now);
        self.route.head_out(&self.config.waypoints, core);
    }

    fn alert_expired(&self, now: f32) -> bool {
        self.last_spotted
            .map_or(true, |spotted| now - spotted > self.config.seconds_to_remain_alerted)
    }

    fn capture_expired(&self, now: f32) -> bool {
        self.capture_started
            .is_some_and(|started| now - started > self.config.capture_seconds)
    }

    /// Reacts to a camper's call: answered from patrol or investigation,
    /// ignored while hearing, chasing or capturing.
    pub fn call_for_help(&mut self, core: &mut AgentCore<RangerState>, at: Vec3, now: f32) {
        if !matches!(
            core.state(),
            RangerState::Patrolling
                | RangerState::MovingToPointOfInterest
                | RangerState::AtPointOfInterest
        ) {
            return;
        }
        investigate::respond(core, at, now);
    }
}

impl Role for Ranger {
    type State = RangerState;

    fn motion(&self) -> MotionConfig {
        self.config.motion
    }

    fn start(&mut self, core: &mut AgentCore<RangerState>, _now: f32) {
        self.route.head_out(&self.config.waypoints, core);
    }

    fn on_sighting(&mut self, core: &mut AgentCore<RangerState>, sighting: &Sighting) {
        let now = sighting.at;
        self.last_spotted = Some(now);
        core.point_of_interest = None;
        let within_reach = core.position().distance(sighting.position) < self.config.capture_distance;
        if within_reach {
            if core.state() == RangerState::Capturing && self.capture_expired(now) {
                core.fail(FailureReason::Captured, now);
                return;
            }
            if core.state() != RangerState::Capturing {
                self.capture_started = Some(now);
                core.transition(RangerState::Capturing, now);
            }
        } else {
            self.capture_started = None;
            core.transition(RangerState::Chasing, now);
        }
        let speed = core.motion().run_speed;
        core.travel_to(sighting.position, speed);
    }

    fn on_sound(&mut self, core: &mut AgentCore<RangerState>, sound: &Sound) {
        if matches!(core.state(), RangerState::Chasing | RangerState::Capturing) {
            return;
        }
        investigate::hear(core, sound);
    }

    fn on_tick(&mut self, core: &mut AgentCore<RangerState>, tick: Tick) {
        match core.state() {
            RangerState::Patrolling => self.route.advance(&self.config.waypoints, core),
            RangerState::HeardSomething
            | RangerState::MovingToPointOfInterest
            | RangerState::AtPointOfInterest => {
                if investigate::advance(core, &self.config.investigation, tick).is_some() {
                    self.resume_patrol(core, tick.now);
                }
            }
            RangerState::Chasing => {
                if self.alert_expired(tick.now) {
                    self.resume_patrol(core, tick.now);
                }
            }
            // Capture only completes on a sighting; a tick can only lose
            // the target.
            RangerState::Capturing => {
                if self.alert_expired(tick.now) {
                    self.capture_started = None;
                    core.transition(RangerState::Chasing, tick.now);
                }
            }
            RangerState::Dead => {}
        }
    }
}

impl HelpResponder for RangerController {
    fn position(&self) -> Vec3 {
        self.core().position()
    }

    fn is_alive(&self) -> bool {
        !self.is_dead()
    }

    fn call_for_help(&mut self, at: Vec3, now: f32) {
        if self.is_dead() {
            return;
        }
        let (core, role) = self.parts_mut();
        role.call_for_help(core, at, now);
    }
}
