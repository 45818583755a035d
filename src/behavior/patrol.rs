//! Looping waypoint cursor for roles that walk a route.
use glam::Vec3;

use super::{AgentCore, BehaviorState};

/// Position along a waypoint loop. The route itself lives in the role's
/// configuration and is passed in on every call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct PatrolCursor {
    index: usize,
}

impl PatrolCursor {
    pub(crate) const fn new() -> Self {
        Self { index: 0 }
    }

    pub(crate) const fn index(self) -> usize {
        self.index
    }

    pub(crate) fn current(self, route: &[Vec3]) -> Option<Vec3> {
        route.get(self.index).copied()
    }

    /// Walks towards the current waypoint, or stops when the route is empty.
    pub(crate) fn head_out<S: BehaviorState>(self, route: &[Vec3], core: &mut AgentCore<S>) {
        match self.current(route) {
            Some(waypoint) => {
                let speed = core.motion().walk_speed;
                core.travel_to(waypoint, speed);
            }
            None => core.halt(),
        }
    }

    /// Moves on to the next waypoint once the current one is reached,
    /// wrapping at the end of the route.
    pub(crate) fn advance<S: BehaviorState>(&mut self, route: &[Vec3], core: &mut AgentCore<S>) {
        let Some(waypoint) = self.current(route) else {
            return;
        };
        if !core.arrived_at(waypoint) {
            return;
        }
        let next = (self.index + 1) % route.len();
        if next != self.index {
            self.index = next;
            self.head_out(route, core);
        }
    }
}
