//! Recording fakes for the capability traits.
//!
//! Every fake is a cheap handle: clone it, hand one clone to the code under
//! test and inspect the other.
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use glam::Vec3;

use crate::alert::{AlertDisplay, Marker};
use crate::navigation::PathAgent;
use crate::outcome::{FailureCause, OutcomeSink};

/// Everything a [`RecordingPath`] has been told, plus the status it reports.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PathLog {
    /// Destinations in the order they were set.
    pub destinations: Vec<Vec3>,
    /// Speeds in the order they were set.
    pub speeds: Vec<f32>,
    /// Number of `halt` calls.
    pub halts: usize,
    /// Destination currently being followed.
    pub destination: Option<Vec3>,
    /// Velocity reported to the controller.
    pub velocity: Vec3,
    /// Pending-path flag reported to the controller.
    pub pending: bool,
    /// Stopping distance reported to the controller.
    pub stopping_distance: f32,
}

/// [`PathAgent`] that records commands and never moves anything.
#[derive(Clone, Debug, Default)]
pub struct RecordingPath(Rc<RefCell<PathLog>>);

impl RecordingPath {
    /// Snapshot of the log.
    #[must_use]
    pub fn log(&self) -> PathLog {
        self.0.borrow().clone()
    }

    /// Destination currently being followed.
    #[must_use]
    pub fn destination(&self) -> Option<Vec3> {
        self.0.borrow().destination
    }

    /// Most recently requested speed.
    #[must_use]
    pub fn last_speed(&self) -> Option<f32> {
        self.0.borrow().speeds.last().copied()
    }

    /// Number of `halt` calls so far.
    #[must_use]
    pub fn halts(&self) -> usize {
        self.0.borrow().halts
    }

    /// Sets the velocity reported to the controller.
    pub fn set_velocity(&self, velocity: Vec3) {
        self.0.borrow_mut().velocity = velocity;
    }

    /// Sets the pending-path flag reported to the controller.
    pub fn set_pending(&self, pending: bool) {
        self.0.borrow_mut().pending = pending;
    }
}

impl PathAgent for RecordingPath {
    fn set_destination(&mut self, point: Vec3) {
        let mut log = self.0.borrow_mut();
        log.destinations.push(point);
        log.destination = Some(point);
    }

    fn set_speed(&mut self, speed: f32) {
        self.0.borrow_mut().speeds.push(speed);
    }

    fn halt(&mut self) {
        let mut log = self.0.borrow_mut();
        log.halts += 1;
        log.destination = None;
        log.velocity = Vec3::ZERO;
    }

    fn velocity(&self) -> Vec3 {
        self.0.borrow().velocity
    }

    fn has_pending_path(&self) -> bool {
        self.0.borrow().pending
    }

    fn stopping_distance(&self) -> f32 {
        self.0.borrow().stopping_distance
    }
}

/// [`OutcomeSink`] that keeps every failure it receives.
#[derive(Clone, Debug, Default)]
pub struct RecordingOutcome(Rc<RefCell<Vec<FailureCause>>>);

impl RecordingOutcome {
    /// Failures received so far, oldest first.
    #[must_use]
    pub fn failures(&self) -> Vec<FailureCause> {
        self.0.borrow().clone()
    }
}

impl OutcomeSink for RecordingOutcome {
    fn notify_failure(&self, cause: FailureCause) {
        self.0.borrow_mut().push(cause);
    }
}

/// [`AlertDisplay`] that remembers which markers are lit.
#[derive(Clone, Debug, Default)]
pub struct RecordingDisplay {
    exclamation: Rc<Cell<bool>>,
    question: Rc<Cell<bool>>,
    calls: Rc<Cell<usize>>,
}

impl RecordingDisplay {
    /// Whether `marker` is currently lit.
    #[must_use]
    pub fn visible(&self, marker: Marker) -> bool {
        match marker {
            Marker::Exclamation => self.exclamation.get(),
            Marker::Question => self.question.get(),
        }
    }

    /// Number of `show` calls so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl AlertDisplay for RecordingDisplay {
    fn show(&mut self, marker: Marker, visible: bool) {
        self.calls.set(self.calls.get() + 1);
        match marker {
            Marker::Exclamation => self.exclamation.set(visible),
            Marker::Question => self.question.set(visible),
        }
    }
}
