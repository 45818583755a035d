//! Thrown items that draw the nearest ranger to where they land.
use glam::Vec3;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::agent::AgentId;
use crate::config::{ensure_non_negative, ConfigError};
use crate::constants::DISTRACTION_RADIUS;
use crate::directory::RangerDirectory;

/// An item the player can throw to lure a ranger away.
///
/// Campers never hear it. On landing it summons the one ranger nearest the
/// landing point, exactly as a camper's call would.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Distraction {
    /// Only rangers strictly closer than this to the landing point respond.
    pub radius: f32,
    /// Name of the item in the log.
    pub tag: String,
}

impl Default for Distraction {
    fn default() -> Self {
        Self {
            radius: DISTRACTION_RADIUS,
            tag: "Item".to_owned(),
        }
    }
}

impl Distraction {
    /// Creates an item heard up to `radius` away.
    #[must_use]
    pub fn new(radius: f32, tag: impl Into<String>) -> Self {
        Self {
            radius,
            tag: tag.into(),
        }
    }

    /// Checks the radius.
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] when the radius is negative.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_non_negative("distraction.radius", self.radius)
    }

    /// Lands the item at `landing` and calls the nearest ranger in reach
    /// over to it. Returns the ranger that answered.
    #[must_use]
    pub fn land(&self, landing: Vec3, now: f32, directory: &RangerDirectory) -> Option<AgentId> {
        debug!("{} landed at {landing}", self.tag);
        directory.call_nearest(&self.tag, landing, Some(self.radius), landing, now)
    }
}
