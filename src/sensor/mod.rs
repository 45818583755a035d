//! Per-agent perception.
//!
//! A [`Sensor`] polls the spatial provider on its own timer, independent of
//! the behaviour tick, and fans each detection out to the listeners that were
//! subscribed when the agent spawned. Physical contact and environmental
//! sounds bypass the timer and are dispatched immediately.
//!
//! Each detection pass reports at most one sighting and one sound: the
//! candidate nearest to the eye point wins, with ties resolved by the
//! provider's enumeration order.

mod config;
mod timer;

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec3;
use log::{error, warn};
use ordered_float::OrderedFloat;

use crate::agent::{AgentId, BodyHandle};
use crate::layers::Layers;
use crate::percept::{Contact, Percept, PerceptListener, Sighting, Sound};
use crate::spatial::SpatialQuery;
use crate::vector_math::{off_axis_degrees, rotate_yaw};

pub use config::SensorConfig;
pub use timer::PollTimer;

/// Shared handle to a subscribed listener.
pub type ListenerHandle = Rc<RefCell<dyn PerceptListener>>;

/// Vision cone, hearing radius and trigger volume of one agent.
pub struct Sensor {
    owner: AgentId,
    config: SensorConfig,
    body: BodyHandle,
    timer: PollTimer,
    listeners: Vec<ListenerHandle>,
}

impl Sensor {
    /// Creates a sensor for `owner` reading its pose from `body`.
    ///
    /// A missing eye offset is logged once and disables sighting for the
    /// lifetime of the sensor.
    #[must_use]
    pub fn new(owner: AgentId, config: SensorConfig, body: BodyHandle) -> Self {
        if config.eye_offset.is_none() {
            error!("{owner} has no eye position; sighting disabled");
        }
        let timer = PollTimer::new(config.poll_interval);
        Self {
            owner,
            config,
            body,
            timer,
            listeners: Vec::new(),
        }
    }

    /// Adds a listener that receives every subsequent percept.
    pub fn subscribe(&mut self, listener: ListenerHandle) {
        self.listeners.push(listener);
    }

    /// Number of subscribed listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Agent this sensor belongs to.
    #[must_use]
    pub const fn owner(&self) -> AgentId {
        self.owner
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &SensorConfig {
        &self.config
    }

    /// Root position of the owning agent.
    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.body.position()
    }

    /// World-space eye point, or `None` when the agent has no eye.
    #[must_use]
    pub fn eye_position(&self) -> Option<Vec3> {
        let body = self.body.get();
        self.config
            .eye_offset
            .map(|offset| body.position + rotate_yaw(offset, body.yaw))
    }

    fn hearing_origin(&self) -> Vec3 {
        self.eye_position().unwrap_or_else(|| self.body.position())
    }

    /// Advances the poll timer and runs a detection pass when one is due.
    ///
    /// Returns `true` when a pass ran.
    pub fn update(&mut self, now: f32, spatial: &dyn SpatialQuery) -> bool {
        if !self.timer.due(now) {
            return false;
        }
        self.poll(now, spatial);
        true
    }

    /// Runs one detection pass and dispatches its results.
    pub fn poll(&mut self, now: f32, spatial: &dyn SpatialQuery) {
        if let Some(sighting) = self.find_visible(now, spatial) {
            self.dispatch(&Percept::Sighting(sighting));
        }
        if let Some(sound) = self.find_audible(now, spatial) {
            self.dispatch(&Percept::Sound(sound));
        }
    }

    /// Returns the nearest target inside the vision cone with a clear line of
    /// sight, without dispatching it.
    #[must_use]
    pub fn find_visible(&self, now: f32, spatial: &dyn SpatialQuery) -> Option<Sighting> {
        let eye = self.eye_position()?;
        let yaw = self.body.yaw();
        let radius = self.config.view_radius;
        let half_angle = self.config.view_angle * 0.5;
        let ray_mask = self.config.target_mask | self.config.obstacle_mask;

        spatial
            .overlap(eye, radius, self.config.target_mask)
            .into_iter()
            .filter_map(|candidate| {
                let offset = candidate.position - eye;
                let distance = offset.length();
                if distance > radius || off_axis_degrees(yaw, offset) > half_angle {
                    return None;
                }
                let direction = offset.try_normalize()?;
                let hit = spatial.raycast_first(eye, direction, radius, ray_mask)?;
                (hit.collider == candidate.id).then_some((OrderedFloat(distance), candidate.position))
            })
            .min_by_key(|(distance, _)| *distance)
            .map(|(_, position)| Sighting { position, at: now })
    }

    /// Returns the nearest target within hearing range, without dispatching
    /// it.
    #[must_use]
    pub fn find_audible(&self, now: f32, spatial: &dyn SpatialQuery) -> Option<Sound> {
        let origin = self.hearing_origin();
        let nearest = spatial
            .overlap(origin, self.config.audible_radius, self.config.target_mask)
            .into_iter()
            .min_by_key(|candidate| OrderedFloat(candidate.position.distance(origin)))?;
        Some(Sound {
            position: nearest.position,
            muted: spatial.occluded(origin, nearest.position, self.config.obstacle_mask),
            environmental: false,
            tag: nearest.tag,
            at: now,
        })
    }

    /// Trigger-volume entry reported by the engine.
    ///
    /// Anything outside the target mask is ignored.
    pub fn on_physical_contact(&mut self, now: f32, position: Vec3, layers: Layers) {
        if !self.config.target_mask.intersects(layers) {
            return;
        }
        self.dispatch(&Percept::Contact(Contact { position, at: now }));
    }

    /// Passive noise reported by a nearby sound emitter.
    pub fn on_environmental_sound(
        &mut self,
        now: f32,
        position: Vec3,
        tag: &str,
        spatial: &dyn SpatialQuery,
    ) {
        let origin = self.hearing_origin();
        let sound = Sound {
            position,
            muted: spatial.occluded(origin, position, self.config.obstacle_mask),
            environmental: true,
            tag: tag.to_owned(),
            at: now,
        };
        self.dispatch(&Percept::Sound(sound));
    }

    fn dispatch(&self, percept: &Percept) {
        for listener in &self.listeners {
            match listener.try_borrow_mut() {
                Ok(mut guard) => percept.deliver(&mut *guard),
                Err(_) => warn!(
                    "{}: listener busy, dropped percept at t={:.2}",
                    self.owner,
                    percept.at()
                ),
            }
        }
    }
}
