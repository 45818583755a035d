//! Path agent capability.
//!
//! Pathfinding and steering belong to the engine. Controllers only choose a
//! destination and a speed, then watch velocity and path status to decide when
//! they have arrived.
use glam::Vec3;

/// Movement capability backing a single agent.
pub trait PathAgent {
    /// Starts moving towards `point` over the following simulation steps.
    fn set_destination(&mut self, point: Vec3);

    /// Sets the top speed used while following the current path.
    fn set_speed(&mut self, speed: f32);

    /// Stops following the current path.
    fn halt(&mut self);

    /// Current velocity of the agent.
    fn velocity(&self) -> Vec3;

    /// Returns `true` while a requested path is still being computed.
    fn has_pending_path(&self) -> bool;

    /// Distance from the destination at which the agent stops moving.
    fn stopping_distance(&self) -> f32;
}
