//! Spatial query capability consumed by sensors and the flee planner.
//!
//! The engine's physics world implements [`SpatialQuery`]; the core never
//! owns geometry. Queries are read-only so one provider can be shared by every
//! agent in a level.
use glam::Vec3;

use crate::layers::Layers;

/// Identifier of a collider inside a spatial provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ColliderId(pub u32);

/// A collider returned by an overlap query.
#[derive(Clone, Debug, PartialEq)]
pub struct Collider {
    /// Provider-local identity, used to recognise the collider in ray hits.
    pub id: ColliderId,
    /// Centre of the collider's bounds.
    pub position: Vec3,
    /// Classification of the collider.
    pub layers: Layers,
    /// Free-form category string, e.g. `"Player"` or `"Branch"`.
    pub tag: String,
}

/// First hit reported by a raycast.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    /// Collider the ray struck first.
    pub collider: ColliderId,
    /// World-space point of impact.
    pub point: Vec3,
    /// Distance from the ray origin to the impact.
    pub distance: f32,
    /// Classification of the struck collider.
    pub layers: Layers,
}

/// Physics queries the perception core needs from the engine.
pub trait SpatialQuery {
    /// Returns every collider classified by `mask` that intersects the
    /// sphere of `radius` around `center`.
    ///
    /// Enumeration order is provider-defined but must be stable for a given
    /// world state.
    fn overlap(&self, center: Vec3, radius: f32, mask: Layers) -> Vec<Collider>;

    /// Casts a ray from `origin` along the unit vector `direction` and
    /// returns the closest collider classified by `mask` within
    /// `max_distance`.
    fn raycast_first(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: Layers,
    ) -> Option<RayHit>;

    /// Returns `true` when a collider in `mask` blocks the segment `from → to`.
    fn occluded(&self, from: Vec3, to: Vec3, mask: Layers) -> bool {
        let offset = to - from;
        let distance = offset.length();
        match offset.try_normalize() {
            Some(direction) => self.raycast_first(from, direction, distance, mask).is_some(),
            None => self.occupied(from, mask),
        }
    }

    /// Returns `true` when `point` lies inside a collider in `mask`.
    ///
    /// This is the zero-length probe used to reject destinations that sit
    /// inside obstacles.
    fn occupied(&self, point: Vec3, mask: Layers) -> bool {
        !self.overlap(point, 0.0, mask).is_empty()
    }
}
