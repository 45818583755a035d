//! Flee destination planner.
//!
//! A frightened camper runs straight away from the threat. When the point
//! it would run to sits inside an obstacle, the escape direction is swung
//! round in fixed steps until a free point turns up or the attempt budget is
//! spent, at which point the straight-back point is used anyway.
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::config::{ensure_non_negative, ensure_positive, ConfigError};
use crate::constants::{FLEE_DISTANCE, FLEE_MAX_ATTEMPTS, FLEE_RETRY_STEP_DEGREES};
use crate::layers::Layers;
use crate::spatial::SpatialQuery;
use crate::vector_math::{direction_from_yaw, planar, rotate_yaw};

/// How a camper picks where to run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FleeConfig {
    /// Distance of the computed escape point from the camper.
    pub flee_distance: f32,
    /// Run at the threat instead of away from it.
    pub aggressive: bool,
    /// Fixed refuge used instead of the computed point.
    pub safe_spot: Option<Vec3>,
    /// Rotation applied between blocked attempts, in degrees.
    pub retry_step_degrees: f32,
    /// Number of directions tried before falling back.
    pub max_attempts: u32,
}

impl Default for FleeConfig {
    fn default() -> Self {
        Self {
            flee_distance: FLEE_DISTANCE,
            aggressive: false,
            safe_spot: None,
            retry_step_degrees: FLEE_RETRY_STEP_DEGREES,
            max_attempts: FLEE_MAX_ATTEMPTS,
        }
    }
}

impl FleeConfig {
    /// Checks the documented ranges of every field.
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] for the first field out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_non_negative("flee.flee_distance", self.flee_distance)?;
        ensure_positive("flee.retry_step_degrees", self.retry_step_degrees)?;
        if self.max_attempts == 0 {
            return Err(ConfigError::invalid(
                "flee.max_attempts",
                "at least one attempt is required",
            ));
        }
        Ok(())
    }
}

/// Result of [`plan_flee`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FleePlan {
    /// Where to run.
    pub destination: Vec3,
    /// Directions probed; zero when no search was needed.
    pub attempts: u32,
    /// `true` when every probe was blocked and the straight-back point was
    /// used.
    pub exhausted: bool,
}

impl FleePlan {
    const fn direct(destination: Vec3) -> Self {
        Self {
            destination,
            attempts: 0,
            exhausted: false,
        }
    }
}

/// Chooses a flee destination for an agent at `from` facing `heading_yaw`.
///
/// Priority is aggressive, then the configured safe spot, then the computed
/// escape point. The escape direction is planar; when the threat stands on
/// the agent the direction opposite its heading is used.
#[must_use]
pub fn plan_flee(
    from: Vec3,
    threat: Vec3,
    heading_yaw: f32,
    config: &FleeConfig,
    spatial: &dyn SpatialQuery,
    obstacle_mask: Layers,
) -> FleePlan {
    if config.aggressive {
        return FleePlan::direct(threat);
    }
    if let Some(spot) = config.safe_spot {
        return FleePlan::direct(spot);
    }

    let away = planar(from - threat)
        .try_normalize()
        .unwrap_or_else(|| -direction_from_yaw(heading_yaw));

    let mut swing = 0.0;
    for attempt in 1..=config.max_attempts {
        let candidate = from + rotate_yaw(away, swing) * config.flee_distance;
        if !spatial.occupied(candidate, obstacle_mask) {
            return FleePlan {
                destination: candidate,
                attempts: attempt,
                exhausted: false,
            };
        }
        swing += config.retry_step_degrees;
    }

    FleePlan {
        destination: from + away * config.flee_distance,
        attempts: config.max_attempts,
        exhausted: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sandbox::SandboxWorld;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn plan(world: &SandboxWorld, config: &FleeConfig, threat: Vec3) -> FleePlan {
        plan_flee(Vec3::ZERO, threat, 0.0, config, world, Layers::OBSTACLE)
    }

    fn five_units() -> FleeConfig {
        FleeConfig {
            flee_distance: 5.0,
            ..FleeConfig::default()
        }
    }

    #[test]
    fn runs_directly_away_in_open_ground() {
        let world = SandboxWorld::new();
        let result = plan(&world, &five_units(), Vec3::new(10.0, 0.0, 0.0));
        assert_relative_eq!(result.destination.x, -5.0, epsilon = 1e-5);
        assert_relative_eq!(result.destination.z, 0.0, epsilon = 1e-5);
        assert_eq!(result.attempts, 1);
        assert!(!result.exhausted);
    }

    #[test]
    fn swings_round_a_blocking_obstacle() {
        let world = SandboxWorld::new();
        world.add_sphere(Vec3::new(-5.0, 0.0, 0.0), 1.0, Layers::OBSTACLE, "Boulder");
        let result = plan(&world, &five_units(), Vec3::new(10.0, 0.0, 0.0));
        assert_eq!(result.attempts, 3);
        assert!(!world.occupied(result.destination, Layers::OBSTACLE));
        assert_relative_eq!(result.destination.length(), 5.0, epsilon = 1e-4);
    }

    #[test]
    fn falls_back_when_surrounded() {
        let world = SandboxWorld::new();
        world.add_sphere(Vec3::ZERO, 20.0, Layers::OBSTACLE, "Cave");
        let result = plan(&world, &five_units(), Vec3::new(10.0, 0.0, 0.0));
        assert!(result.exhausted);
        assert_eq!(result.attempts, FLEE_MAX_ATTEMPTS);
        assert_relative_eq!(result.destination.x, -5.0, epsilon = 1e-5);
    }

    #[rstest]
    #[case::aggressive(FleeConfig { aggressive: true, safe_spot: Some(Vec3::ONE), ..FleeConfig::default() }, Vec3::new(10.0, 0.0, 0.0))]
    #[case::safe_spot(FleeConfig { safe_spot: Some(Vec3::ONE), ..FleeConfig::default() }, Vec3::ONE)]
    fn configured_destinations_take_priority(#[case] config: FleeConfig, #[case] expected: Vec3) {
        let world = SandboxWorld::new();
        let result = plan(&world, &config, Vec3::new(10.0, 0.0, 0.0));
        assert_eq!(result.destination, expected);
        assert_eq!(result.attempts, 0);
    }

    #[test]
    fn threat_on_top_of_agent_flees_backwards() {
        let world = SandboxWorld::new();
        let result = plan(&world, &five_units(), Vec3::ZERO);
        assert_relative_eq!(result.destination.z, -5.0, epsilon = 1e-5);
        assert_relative_eq!(result.destination.x, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn vertical_offset_is_ignored() {
        let world = SandboxWorld::new();
        let result = plan(&world, &five_units(), Vec3::new(0.0, 8.0, 3.0));
        assert_relative_eq!(result.destination.y, 0.0, epsilon = 1e-5);
        assert_relative_eq!(result.destination.z, -5.0, epsilon = 1e-5);
    }

    #[test]
    fn zero_attempts_is_rejected() {
        let config = FleeConfig {
            max_attempts: 0,
            ..FleeConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "flee.max_attempts", .. })
        ));
    }
}
