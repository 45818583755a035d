//! Collision classification masks.
//!
//! Every collider the spatial provider knows about carries a set of
//! [`Layers`]. Sensors filter candidates with a target mask and test line of
//! sight against an obstacle mask.
use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Classification bits attached to colliders and used as query masks.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct Layers: u32 {
        /// The player-controlled creature.
        const PLAYER = 1 << 0;
        /// Camper NPCs.
        const CAMPER = 1 << 1;
        /// Ranger NPCs.
        const RANGER = 1 << 2;
        /// Static geometry that blocks sight and movement.
        const OBSTACLE = 1 << 3;
        /// Ground surfaces.
        const TERRAIN = 1 << 4;
        /// Loose props that make noise when disturbed.
        const PROP = 1 << 5;
    }
}
