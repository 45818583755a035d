//! Utility helpers for tests.
//!
//! Builders for sandbox levels and tolerant comparisons that report through
//! `anyhow` so rspec and rstest cases can share them.
use anyhow::{ensure, Result};
use glam::Vec3;
use squatch::sandbox::{CamperSpawn, Level, LevelConfig, PlayerConfig, RangerSpawn};
use squatch::{AgentId, RangerConfig, SensorConfig};

/// Shorthand for a point on the ground plane.
#[must_use]
pub const fn ground(x: f32, z: f32) -> Vec3 {
    Vec3::new(x, 0.0, z)
}

/// Sensor whose eye sits at the agent's feet, so flat test worlds line up.
#[must_use]
pub fn ground_sensor() -> SensorConfig {
    SensorConfig {
        eye_offset: Some(Vec3::ZERO),
        ..SensorConfig::default()
    }
}

/// Sensor that neither sees nor hears; contact still reaches it.
#[must_use]
pub fn numb_sensor() -> SensorConfig {
    SensorConfig {
        view_radius: 0.0,
        audible_radius: 0.0,
        ..ground_sensor()
    }
}

/// Player that starts at `start` and walks `route` at `speed`.
#[must_use]
pub fn player_walking(start: Vec3, route: &[Vec3], speed: f32) -> PlayerConfig {
    PlayerConfig {
        start,
        route: route.to_vec(),
        speed,
        ..PlayerConfig::default()
    }
}

/// Camper at `position` facing `yaw` with a ground-level sensor.
#[must_use]
pub fn camper_at(position: Vec3, yaw: f32) -> CamperSpawn {
    CamperSpawn {
        position,
        yaw,
        sensor: ground_sensor(),
        ..CamperSpawn::default()
    }
}

/// Ranger walking `waypoints`, spawned on the first one.
#[must_use]
pub fn ranger_patrolling(waypoints: &[Vec3]) -> RangerSpawn {
    RangerSpawn {
        position: waypoints.first().copied().unwrap_or(Vec3::ZERO),
        sensor: ground_sensor(),
        behavior: RangerConfig {
            waypoints: waypoints.to_vec(),
            ..RangerConfig::default()
        },
        ..RangerSpawn::default()
    }
}

/// Builds a level and steps it until `until` holds or `seconds` pass.
///
/// Returns the level and whether the condition was met.
///
/// # Errors
/// Fails when the level does not build.
pub fn run_until(
    config: &LevelConfig,
    seconds: f32,
    dt: f32,
    until: impl Fn(&Level) -> bool,
) -> Result<(Level, bool)> {
    let mut level = Level::new(config)?;
    while level.now() < seconds {
        level.step(dt);
        if until(&level) {
            return Ok((level, true));
        }
    }
    Ok((level, false))
}

/// Debug label of `id`'s state.
///
/// # Errors
/// Fails when no NPC has that id.
pub fn state_of(level: &Level, id: AgentId) -> Result<String> {
    let npc = level.npc(id);
    ensure!(npc.is_some(), "no npc with id {id}");
    Ok(npc.map(squatch::Npc::state_label).unwrap_or_default())
}

/// Fails unless `actual` lies within `tolerance` of `expected`.
///
/// # Errors
/// Describes both points and the gap when they are too far apart.
pub fn ensure_near(actual: Vec3, expected: Vec3, tolerance: f32) -> Result<()> {
    let gap = actual.distance(expected);
    ensure!(
        gap <= tolerance,
        "expected {expected}, found {actual} ({gap:.3} apart)"
    );
    Ok(())
}
