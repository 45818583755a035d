//! Agent identity and pose.
//!
//! The engine owns each agent's transform. The core only reads the position
//! and writes the heading, so the pose lives in a small shared cell that the
//! sensor, the controller and the engine-side integration all hold.
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::vector_math::direction_from_yaw;

/// Stable identifier of an agent within a level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(pub u32);

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "agent#{}", self.0)
    }
}

impl From<u32> for AgentId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// Position and heading of an agent's root transform.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Body {
    /// World-space position of the root.
    pub position: Vec3,
    /// Heading in degrees about the vertical axis; `0` faces `+Z`.
    pub yaw: f32,
}

impl Body {
    /// Creates a body at `position` facing `yaw` degrees.
    #[must_use]
    pub const fn new(position: Vec3, yaw: f32) -> Self {
        Self { position, yaw }
    }

    /// Unit vector the body is facing.
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        direction_from_yaw(self.yaw)
    }
}

/// Shared, single-threaded handle to an agent's [`Body`].
///
/// Cloning the handle shares the same pose.
#[derive(Clone, Debug, Default)]
pub struct BodyHandle(Rc<Cell<Body>>);

impl BodyHandle {
    /// Wraps a body in a new shared cell.
    #[must_use]
    pub fn new(body: Body) -> Self {
        Self(Rc::new(Cell::new(body)))
    }

    /// Copies the current pose out of the cell.
    #[must_use]
    pub fn get(&self) -> Body {
        self.0.get()
    }

    /// Current root position.
    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.0.get().position
    }

    /// Current heading in degrees.
    #[must_use]
    pub fn yaw(&self) -> f32 {
        self.0.get().yaw
    }

    /// Moves the root; called by whatever integrates movement.
    pub fn set_position(&self, position: Vec3) {
        let mut body = self.0.get();
        body.position = position;
        self.0.set(body);
    }

    /// Turns the body to face `yaw` degrees.
    pub fn set_yaw(&self, yaw: f32) {
        let mut body = self.0.get();
        body.yaw = yaw;
        self.0.set(body);
    }
}
