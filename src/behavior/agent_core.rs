//! Agent-wide data shared by every role.
use std::rc::Rc;

use glam::Vec3;
use log::{debug, info};

use super::investigate::PointOfInterest;
use super::{BehaviorState, MotionConfig};
use crate::agent::{AgentId, BodyHandle};
use crate::alert::{AlertIndicator, AlertState};
use crate::constants::STILL_SPEED_SQ;
use crate::navigation::PathAgent;
use crate::outcome::{FailureCause, FailureReason, OutcomeSink};
use crate::vector_math::{wrap_degrees, yaw_delta, yaw_of};

/// State, pose and collaborators of one agent, handed to its [`super::Role`].
pub struct AgentCore<S> {
    id: AgentId,
    body: BodyHandle,
    path: Box<dyn PathAgent>,
    alert: AlertIndicator,
    outcome: Rc<dyn OutcomeSink>,
    motion: MotionConfig,
    state: S,
    entered_at: f32,
    home: Vec3,
    last_tick: Option<f32>,
    pub(crate) point_of_interest: Option<PointOfInterest>,
}

impl<S: BehaviorState> AgentCore<S> {
    pub(crate) fn new(
        id: AgentId,
        body: BodyHandle,
        path: Box<dyn PathAgent>,
        alert: AlertIndicator,
        outcome: Rc<dyn OutcomeSink>,
        motion: MotionConfig,
        now: f32,
    ) -> Self {
        let home = body.position();
        let mut core = Self {
            id,
            body,
            path,
            alert,
            outcome,
            motion,
            state: S::INITIAL,
            entered_at: now,
            home,
            last_tick: None,
            point_of_interest: None,
        };
        core.alert.set_state(S::INITIAL.alert());
        core
    }

    /// Identity of the agent.
    #[must_use]
    pub const fn id(&self) -> AgentId {
        self.id
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> S {
        self.state
    }

    /// Time the current state was entered.
    #[must_use]
    pub const fn entered_at(&self) -> f32 {
        self.entered_at
    }

    /// Alert level currently shown.
    #[must_use]
    pub const fn alert(&self) -> AlertState {
        self.alert.state()
    }

    /// Returns `true` in the terminal state.
    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.state == S::DEAD
    }

    /// Spawn position.
    #[must_use]
    pub const fn home(&self) -> Vec3 {
        self.home
    }

    /// Current root position.
    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.body.position()
    }

    /// Current heading in degrees.
    #[must_use]
    pub fn yaw(&self) -> f32 {
        self.body.yaw()
    }

    /// Movement tunables.
    #[must_use]
    pub const fn motion(&self) -> &MotionConfig {
        &self.motion
    }

    /// Remembered point of interest, if any.
    #[must_use]
    pub const fn point_of_interest(&self) -> Option<PointOfInterest> {
        self.point_of_interest
    }

    /// Enters `next`, updating the alert indicator. Re-entering the current
    /// state does nothing.
    pub fn transition(&mut self, next: S, now: f32) {
        if next == self.state {
            return;
        }
        debug!("{}: {:?} -> {:?}", self.id, self.state, next);
        self.state = next;
        self.entered_at = now;
        self.alert.set_state(next.alert());
    }

    /// Commands the path agent towards `destination` at `speed`.
    pub fn travel_to(&mut self, destination: Vec3, speed: f32) {
        self.path.set_speed(speed);
        self.path.set_destination(destination);
    }

    /// Stops the path agent.
    pub fn halt(&mut self) {
        self.path.halt();
    }

    /// Returns `true` once the agent is within tolerance of `destination`
    /// and no path request is outstanding.
    #[must_use]
    pub fn arrived_at(&self, destination: Vec3) -> bool {
        let gap = self.position().distance(destination) - self.path.stopping_distance();
        gap < self.motion.arrival_tolerance && !self.path.has_pending_path()
    }

    /// Turns the body part of the way towards `point` and returns the
    /// heading error left afterwards, in degrees.
    pub fn turn_towards(&mut self, point: Vec3, dt: f32) -> f32 {
        let Some(target) = yaw_of(point - self.position()) else {
            return 0.0;
        };
        let error = yaw_delta(self.yaw(), target);
        let fraction = (self.motion.turn_rate * dt).clamp(0.0, 1.0);
        self.body.set_yaw(wrap_degrees(self.yaw() + error * fraction));
        (error * (1.0 - fraction)).abs()
    }

    /// Kills the agent and reports `reason`. Returns `false` if it was
    /// already dead.
    pub fn fail(&mut self, reason: FailureReason, now: f32) -> bool {
        if self.is_dead() {
            return false;
        }
        self.transition(S::DEAD, now);
        self.halt();
        self.point_of_interest = None;
        info!("{}: player failed ({reason})", self.id);
        self.outcome.notify_failure(FailureCause {
            agent: self.id,
            reason,
        });
        true
    }

    pub(super) fn advance_clock(&mut self, now: f32) -> f32 {
        let dt = self.last_tick.map_or(0.0, |last| (now - last).max(0.0));
        self.last_tick = Some(now);
        dt
    }

    pub(super) fn face_velocity(&self) {
        if self.state.holds_heading() {
            return;
        }
        let velocity = self.path.velocity();
        if velocity.length_squared() <= STILL_SPEED_SQ {
            return;
        }
        if let Some(yaw) = yaw_of(velocity) {
            self.body.set_yaw(yaw);
        }
    }
}
