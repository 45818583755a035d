//! Passive noise sources such as snapping branches and rattling cans.
use glam::Vec3;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::constants::EMITTER_RADIUS;
use crate::sensor::Sensor;
use crate::spatial::SpatialQuery;

/// A prop that makes noise when disturbed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoundEmitter {
    /// Location of the prop.
    pub position: Vec3,
    /// Sensors whose agent stands strictly closer than this hear the noise.
    pub radius: f32,
    /// Category reported in the resulting sounds.
    pub tag: String,
}

impl Default for SoundEmitter {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            radius: EMITTER_RADIUS,
            tag: "Prop".to_owned(),
        }
    }
}

impl SoundEmitter {
    /// Creates an emitter at `position`.
    #[must_use]
    pub fn new(position: Vec3, radius: f32, tag: impl Into<String>) -> Self {
        Self {
            position,
            radius,
            tag: tag.into(),
        }
    }

    /// Returns `true` when `sensor`'s agent is inside the emitter's reach.
    #[must_use]
    pub fn reaches(&self, sensor: &Sensor) -> bool {
        sensor.position().distance(self.position) < self.radius
    }

    /// Sends a noise heard at `at` to every sensor in reach and returns how
    /// many heard it.
    ///
    /// Reach is measured from the emitter, while the sound itself comes from
    /// `at`: a prop kicked by the player reports the player's position.
    pub fn emit<'a>(
        &self,
        now: f32,
        at: Vec3,
        sensors: impl IntoIterator<Item = &'a mut Sensor>,
        spatial: &dyn SpatialQuery,
    ) -> usize {
        let mut reached = 0;
        for sensor in sensors {
            if !self.reaches(sensor) {
                continue;
            }
            sensor.on_environmental_sound(now, at, &self.tag, spatial);
            reached += 1;
        }
        debug!("{} noise at {at} reached {reached} sensor(s)", self.tag);
        reached
    }
}
