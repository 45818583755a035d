//! Nearest-ranger lookup used by campers to escalate sightings.
//!
//! The directory holds weak handles so a ranger that has been dropped simply
//! stops being found. Rangers that are still alive in memory but dead in
//! behaviour are skipped too, and [`crate::npc::Npc`] deregisters them on the
//! tick they die.
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use glam::Vec3;
use log::{info, warn};
use ordered_float::OrderedFloat;

use crate::agent::AgentId;

/// An agent that can be summoned by a camper.
pub trait HelpResponder {
    /// Current position of the responder.
    fn position(&self) -> Vec3;

    /// Returns `false` once the responder can no longer act.
    fn is_alive(&self) -> bool;

    /// Asks the responder to investigate `at`.
    fn call_for_help(&mut self, at: Vec3, now: f32);
}

/// Shared handle to a registered responder.
pub type ResponderHandle = Rc<RefCell<dyn HelpResponder>>;

type Entry = (AgentId, Weak<RefCell<dyn HelpResponder>>);

/// Registry of live rangers, injected into every camper controller.
#[derive(Default)]
pub struct RangerDirectory {
    entries: RefCell<Vec<Entry>>,
}

impl RangerDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a responder. Registering an id twice replaces the earlier handle
    /// but keeps its position in the scan order.
    pub fn register(&self, id: AgentId, responder: &ResponderHandle) {
        let weak = Rc::downgrade(responder);
        let mut entries = self.entries.borrow_mut();
        if let Some(entry) = entries.iter_mut().find(|(known, _)| *known == id) {
            entry.1 = weak;
        } else {
            entries.push((id, weak));
        }
    }

    /// Removes a responder. Returns `false` if `id` was not registered.
    pub fn deregister(&self, id: AgentId) -> bool {
        let mut entries = self.entries.borrow_mut();
        let before = entries.len();
        entries.retain(|(known, _)| *known != id);
        entries.len() != before
    }

    /// Number of registered entries, including ones whose handle has been
    /// dropped but not yet pruned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Returns `true` when nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Finds the live responder closest to `point`.
    ///
    /// With `max_distance` set, only responders strictly closer than it are
    /// considered. Equal distances resolve to the earliest registration.
    /// Responders that are mid-update (already borrowed) are skipped.
    #[must_use]
    pub fn nearest(&self, point: Vec3, max_distance: Option<f32>) -> Option<(AgentId, ResponderHandle)> {
        let limit = max_distance.unwrap_or(f32::INFINITY);
        self.entries.borrow_mut().retain(|(_, weak)| weak.strong_count() > 0);
        let entries = self.entries.borrow();
        entries
            .iter()
            .filter_map(|(id, weak)| {
                let handle = weak.upgrade()?;
                let (alive, position) = {
                    let responder = handle.try_borrow().ok()?;
                    (responder.is_alive(), responder.position())
                };
                let distance = position.distance(point);
                (alive && distance < limit).then_some((OrderedFloat(distance), *id, handle))
            })
            .min_by_key(|(distance, _, _)| *distance)
            .map(|(_, id, handle)| (id, handle))
    }

    /// Summons the responder nearest to `origin` to investigate `help_at`.
    /// `caller` names whoever raised the alarm in the log: a camper's id, or
    /// the tag of a thrown item.
    ///
    /// Returns the id of the responder that was called, or `None` when no
    /// live responder is in range.
    pub fn call_nearest(
        &self,
        caller: impl fmt::Display,
        origin: Vec3,
        radius: Option<f32>,
        help_at: Vec3,
        now: f32,
    ) -> Option<AgentId> {
        let Some((id, handle)) = self.nearest(origin, radius) else {
            warn!("{caller} raised the alarm but no ranger is in range");
            return None;
        };
        let Ok(mut responder) = handle.try_borrow_mut() else {
            warn!("{caller} could not reach {id}: busy");
            return None;
        };
        info!("{caller} called {id} for help at {help_at}");
        responder.call_for_help(help_at, now);
        Some(id)
    }
}
