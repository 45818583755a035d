//! Headless stand-ins for the engine.
//!
//! The perception core only talks to capability traits. This module supplies
//! simple concrete versions of them (a world made of spheres and agents that
//! walk in straight lines) plus a level runner that wires everything
//! together from a JSON description. The demo binary and the integration
//! tests both run on it.

mod kinematics;
mod level;
mod world;

pub use kinematics::KinematicAgent;
pub use level::{
    CamperSpawn, EmitterSpawn, Level, LevelConfig, ObstacleSpawn, PlayerConfig, RangerSpawn,
    RunReport, Scoreboard, ThrowSpawn,
};
pub use world::{SandboxWorld, SphereCollider};
