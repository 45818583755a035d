//! Straight-line path agent.
use std::cell::Cell;
use std::rc::Rc;

use glam::Vec3;

use crate::agent::BodyHandle;
use crate::navigation::PathAgent;

#[derive(Debug, Default)]
struct Motion {
    destination: Cell<Option<Vec3>>,
    speed: Cell<f32>,
    velocity: Cell<Vec3>,
    pending_steps: Cell<u32>,
}

/// [`PathAgent`] that walks straight at its destination with no obstacle
/// avoidance.
///
/// Clones share motion state: the controller owns one clone and the level
/// runner keeps another to [`KinematicAgent::step`] it.
#[derive(Clone, Debug)]
pub struct KinematicAgent {
    body: BodyHandle,
    motion: Rc<Motion>,
    stopping_distance: f32,
    path_latency: u32,
}

impl KinematicAgent {
    /// Creates an agent that moves `body`.
    #[must_use]
    pub fn new(body: BodyHandle, stopping_distance: f32) -> Self {
        Self {
            body,
            motion: Rc::default(),
            stopping_distance,
            path_latency: 0,
        }
    }

    /// Number of steps a new destination stays pending before movement
    /// starts.
    #[must_use]
    pub const fn with_path_latency(mut self, steps: u32) -> Self {
        self.path_latency = steps;
        self
    }

    /// Destination currently being followed.
    #[must_use]
    pub fn destination(&self) -> Option<Vec3> {
        self.motion.destination.get()
    }

    /// Current top speed.
    #[must_use]
    pub fn speed(&self) -> f32 {
        self.motion.speed.get()
    }

    /// Integrates `dt` seconds of movement into the body.
    pub fn step(&self, dt: f32) {
        let motion = &self.motion;
        let pending = motion.pending_steps.get();
        if pending > 0 {
            motion.pending_steps.set(pending - 1);
            motion.velocity.set(Vec3::ZERO);
            return;
        }
        let Some(destination) = motion.destination.get() else {
            motion.velocity.set(Vec3::ZERO);
            return;
        };
        let position = self.body.position();
        let offset = destination - position;
        let remaining = offset.length() - self.stopping_distance;
        if remaining <= 0.0 || dt <= 0.0 {
            motion.velocity.set(Vec3::ZERO);
            return;
        }
        let travel = (motion.speed.get() * dt).min(remaining);
        let delta = offset.normalize_or_zero() * travel;
        self.body.set_position(position + delta);
        motion.velocity.set(delta / dt);
    }
}

impl PathAgent for KinematicAgent {
    fn set_destination(&mut self, point: Vec3) {
        self.motion.destination.set(Some(point));
        self.motion.pending_steps.set(self.path_latency);
    }

    fn set_speed(&mut self, speed: f32) {
        self.motion.speed.set(speed);
    }

    fn halt(&mut self) {
        self.motion.destination.set(None);
        self.motion.pending_steps.set(0);
        self.motion.velocity.set(Vec3::ZERO);
    }

    fn velocity(&self) -> Vec3 {
        self.motion.velocity.get()
    }

    fn has_pending_path(&self) -> bool {
        self.motion.pending_steps.get() > 0
    }

    fn stopping_distance(&self) -> f32 {
        self.stopping_distance
    }
}
