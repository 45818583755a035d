//! Tunables for a single sensor.
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::config::{ensure_non_negative, ensure_positive, ConfigError};
use crate::constants::{AUDIBLE_RADIUS, SENSOR_POLL_INTERVAL, VIEW_ANGLE, VIEW_RADIUS};
use crate::layers::Layers;

/// Height of the default eye point above the agent's root.
const DEFAULT_EYE_HEIGHT: f32 = 1.6;

/// Vision and hearing parameters of a sensor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    /// Maximum sighting distance from the eye point.
    pub view_radius: f32,
    /// Full width of the vision cone in degrees, symmetric about the heading.
    pub view_angle: f32,
    /// Maximum hearing distance.
    pub audible_radius: f32,
    /// Classification of things worth noticing.
    pub target_mask: Layers,
    /// Classification of things that block line of sight.
    pub obstacle_mask: Layers,
    /// Eye point relative to the root, in the body's local frame.
    ///
    /// `None` models an agent spawned without an eye: sighting is disabled
    /// and hearing falls back to the root position.
    pub eye_offset: Option<Vec3>,
    /// Seconds between detection passes.
    pub poll_interval: f32,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            view_radius: VIEW_RADIUS,
            view_angle: VIEW_ANGLE,
            audible_radius: AUDIBLE_RADIUS,
            target_mask: Layers::PLAYER,
            obstacle_mask: Layers::OBSTACLE,
            eye_offset: Some(Vec3::new(0.0, DEFAULT_EYE_HEIGHT, 0.0)),
            poll_interval: SENSOR_POLL_INTERVAL,
        }
    }
}

impl SensorConfig {
    /// Checks the documented ranges of every field.
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] for the first field out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_non_negative("sensor.view_radius", self.view_radius)?;
        ensure_non_negative("sensor.audible_radius", self.audible_radius)?;
        if !(0.0..=360.0).contains(&self.view_angle) {
            return Err(ConfigError::invalid(
                "sensor.view_angle",
                "must lie between 0 and 360 degrees",
            ));
        }
        ensure_positive("sensor.poll_interval", self.poll_interval)
    }
}
