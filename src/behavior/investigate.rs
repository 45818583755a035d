//! Heard something, walk over, look around, give up.
use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::{AgentCore, Investigates, Tick};
use crate::config::{ensure_non_negative, ConfigError};
use crate::constants::{FACING_TOLERANCE_DEGREES, LINGER_SECONDS, SOUND_MEMORY_SECONDS};
use crate::percept::Sound;

/// Timing of the investigation sub-machine.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvestigationConfig {
    /// Heading error below which the agent sets off, in degrees.
    pub facing_tolerance: f32,
    /// Seconds a heard sound is remembered without a repeat.
    pub sound_memory_seconds: f32,
    /// Seconds spent at the point of interest before leaving.
    pub linger_seconds: f32,
}

impl Default for InvestigationConfig {
    fn default() -> Self {
        Self {
            facing_tolerance: FACING_TOLERANCE_DEGREES,
            sound_memory_seconds: SOUND_MEMORY_SECONDS,
            linger_seconds: LINGER_SECONDS,
        }
    }
}

impl InvestigationConfig {
    /// Checks the documented ranges of every field.
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] for the first field out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.facing_tolerance > 0.0 && self.facing_tolerance <= 180.0) {
            return Err(ConfigError::invalid(
                "investigation.facing_tolerance",
                "must lie in (0, 180] degrees",
            ));
        }
        ensure_non_negative("investigation.sound_memory_seconds", self.sound_memory_seconds)?;
        ensure_non_negative("investigation.linger_seconds", self.linger_seconds)
    }
}

/// How a point of interest came to the agent's attention.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Lead {
    /// The agent heard it.
    Heard,
    /// A camper called for help there.
    Called,
}

/// Remembered location worth a look.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointOfInterest {
    /// Where to look.
    pub position: Vec3,
    /// When it was last refreshed.
    pub noticed_at: f32,
    /// What put it there.
    pub lead: Lead,
}

/// Why the investigation ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Exit {
    Forgot,
    Done,
}

/// Enters or refreshes the heard state. Entering halts the agent so it can
/// turn on the spot.
pub(crate) fn hear<S: Investigates>(core: &mut AgentCore<S>, sound: &Sound) {
    core.point_of_interest = Some(PointOfInterest {
        position: sound.position,
        noticed_at: sound.at,
        lead: Lead::Heard,
    });
    if core.state() != S::HEARD {
        core.halt();
        core.transition(S::HEARD, sound.at);
    }
}

/// Heads straight for `at` at run speed, skipping the turn-to-face step.
pub(crate) fn respond<S: Investigates>(core: &mut AgentCore<S>, at: Vec3, now: f32) {
    core.point_of_interest = Some(PointOfInterest {
        position: at,
        noticed_at: now,
        lead: Lead::Called,
    });
    let speed = core.motion().run_speed;
    core.travel_to(at, speed);
    core.transition(S::MOVING, now);
}

/// Advances the sub-machine. Returns `Some` when the role should take over
/// again.
pub(crate) fn advance<S: Investigates>(
    core: &mut AgentCore<S>,
    config: &InvestigationConfig,
    tick: Tick,
) -> Option<Exit> {
    let Some(poi) = core.point_of_interest else {
        return Some(Exit::Forgot);
    };
    let state = core.state();
    if state == S::HEARD {
        if tick.now - poi.noticed_at > config.sound_memory_seconds {
            core.point_of_interest = None;
            return Some(Exit::Forgot);
        }
        if core.turn_towards(poi.position, tick.dt) < config.facing_tolerance {
            let speed = core.motion().walk_speed;
            core.travel_to(poi.position, speed);
            core.transition(S::MOVING, tick.now);
        }
    } else if state == S::MOVING {
        if core.arrived_at(poi.position) {
            core.halt();
            core.transition(S::AT_POINT, tick.now);
        }
    } else if state == S::AT_POINT && tick.now - core.entered_at() > config.linger_seconds {
        core.point_of_interest = None;
        return Some(Exit::Done);
    }
    None
}
