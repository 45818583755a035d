//! Ranger flashlight sized to match what the ranger can do.
use crate::constants::FLASHLIGHT_SPREAD;
use crate::sensor::SensorConfig;

/// Spotlight parameters for a renderer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Flashlight {
    /// Reach of the beam; equals the capture distance.
    pub range: f32,
    /// Full-brightness cone in degrees; equals the view angle.
    pub inner_spot_angle: f32,
    /// Outer falloff cone in degrees.
    pub spot_angle: f32,
}

impl Flashlight {
    /// Derives the beam from a sensor's view cone and a capture distance.
    #[must_use]
    pub fn new(sensor: &SensorConfig, capture_distance: f32) -> Self {
        Self {
            range: capture_distance,
            inner_spot_angle: sensor.view_angle,
            spot_angle: sensor.view_angle * FLASHLIGHT_SPREAD,
        }
    }
}
