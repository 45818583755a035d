#![cfg_attr(docsrs, feature(doc_cfg))]
//! Perception and behaviour core for the NPCs of a stealth-horror forest
//! game.
//!
//! Each NPC owns a [`Sensor`] that turns the world into percepts (sightings,
//! sounds and contacts) and hands them to a behaviour [`Controller`]. Campers
//! flee and call the nearest ranger; rangers patrol, chase and capture. The
//! game engine is reached only through capability traits
//! ([`SpatialQuery`], [`PathAgent`], [`OutcomeSink`], [`AlertDisplay`]),
//! and [`sandbox`] provides headless versions of all of them.
pub mod agent;
pub mod alert;
pub mod behavior;
pub mod config;
pub mod constants;
pub mod directory;
pub mod distraction;
pub mod emitter;
pub mod flashlight;
pub mod flee;
pub mod layers;
pub mod logging;
pub mod navigation;
pub mod npc;
pub mod outcome;
pub mod percept;
pub mod sandbox;
pub mod sensor;
pub mod spatial;
#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod testing;
pub mod vector_math;

pub use agent::{AgentId, Body, BodyHandle};
pub use alert::{AlertDisplay, AlertIndicator, AlertState, Marker};
pub use behavior::{
    AgentWiring, Camper, CamperConfig, CamperController, CamperState, Controller, Ranger,
    RangerConfig, RangerController, RangerState,
};
pub use config::ConfigError;
pub use directory::{HelpResponder, RangerDirectory, ResponderHandle};
pub use distraction::Distraction;
pub use emitter::SoundEmitter;
pub use flashlight::Flashlight;
pub use layers::Layers;
pub use logging::init as init_logging;
pub use navigation::PathAgent;
pub use npc::Npc;
pub use outcome::{FailureCause, FailureReason, OutcomeSink};
pub use percept::{Contact, Percept, PerceptListener, Sighting, Sound};
pub use sensor::{Sensor, SensorConfig};
pub use spatial::{Collider, ColliderId, RayHit, SpatialQuery};

pub mod prelude {
    //! The handful of types needed to wire an NPC into a host engine.
    //!
    //! ```rust,no_run
    //! use squatch::prelude::*;
    //! ```

    pub use crate::{
        AgentId, AgentWiring, AlertDisplay, Body, BodyHandle, Camper, CamperConfig, Layers, Npc,
        OutcomeSink, PathAgent, Ranger, RangerConfig, RangerDirectory, SensorConfig,
        SpatialQuery,
    };
    pub use glam::Vec3;
}
