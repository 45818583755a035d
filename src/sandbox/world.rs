//! Sphere-only spatial world.
use std::cell::{Cell, RefCell};

use glam::Vec3;

use crate::layers::Layers;
use crate::spatial::{Collider, ColliderId, RayHit, SpatialQuery};

/// A spherical collider stored in a [`SandboxWorld`].
#[derive(Clone, Debug, PartialEq)]
pub struct SphereCollider {
    /// Identity reported in overlaps and ray hits.
    pub id: ColliderId,
    /// Centre of the sphere.
    pub center: Vec3,
    /// Radius of the sphere.
    pub radius: f32,
    /// Classification bits.
    pub layers: Layers,
    /// Category string forwarded in sounds.
    pub tag: String,
}

impl SphereCollider {
    fn ray_distance(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<f32> {
        let from_center = origin - self.center;
        let along = from_center.dot(direction);
        let outside = from_center.length_squared() - self.radius * self.radius;
        if outside > 0.0 && along > 0.0 {
            return None;
        }
        let discriminant = along * along - outside;
        if discriminant < 0.0 {
            return None;
        }
        let entry = (-along - discriminant.sqrt()).max(0.0);
        (entry <= max_distance).then_some(entry)
    }
}

/// In-memory [`SpatialQuery`] provider made of spheres.
///
/// Colliders enumerate in insertion order. Interior mutability lets the
/// world be shared behind an `Rc` while the level runner moves the player.
#[derive(Debug, Default)]
pub struct SandboxWorld {
    colliders: RefCell<Vec<SphereCollider>>,
    next_id: Cell<u32>,
}

impl SandboxWorld {
    /// Creates an empty world.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a sphere and returns its identity.
    pub fn add_sphere(&self, center: Vec3, radius: f32, layers: Layers, tag: &str) -> ColliderId {
        let id = ColliderId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.colliders.borrow_mut().push(SphereCollider {
            id,
            center,
            radius,
            layers,
            tag: tag.to_owned(),
        });
        id
    }

    /// Moves a collider; returns `false` when the id is unknown.
    pub fn move_collider(&self, id: ColliderId, center: Vec3) -> bool {
        let mut colliders = self.colliders.borrow_mut();
        match colliders.iter_mut().find(|collider| collider.id == id) {
            Some(collider) => {
                collider.center = center;
                true
            }
            None => false,
        }
    }

    /// Removes a collider; returns `false` when the id is unknown.
    pub fn remove(&self, id: ColliderId) -> bool {
        let mut colliders = self.colliders.borrow_mut();
        let before = colliders.len();
        colliders.retain(|collider| collider.id != id);
        colliders.len() != before
    }

    /// Copy of a collider's current state.
    #[must_use]
    pub fn collider(&self, id: ColliderId) -> Option<SphereCollider> {
        self.colliders
            .borrow()
            .iter()
            .find(|collider| collider.id == id)
            .cloned()
    }

    /// Number of colliders in the world.
    #[must_use]
    pub fn len(&self) -> usize {
        self.colliders.borrow().len()
    }

    /// Returns `true` when the world holds no colliders.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colliders.borrow().is_empty()
    }
}

impl SpatialQuery for SandboxWorld {
    fn overlap(&self, center: Vec3, radius: f32, mask: Layers) -> Vec<Collider> {
        self.colliders
            .borrow()
            .iter()
            .filter(|sphere| sphere.layers.intersects(mask))
            .filter(|sphere| sphere.center.distance(center) <= radius + sphere.radius)
            .map(|sphere| Collider {
                id: sphere.id,
                position: sphere.center,
                layers: sphere.layers,
                tag: sphere.tag.clone(),
            })
            .collect()
    }

    fn raycast_first(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: Layers,
    ) -> Option<RayHit> {
        let mut nearest: Option<RayHit> = None;
        for sphere in self.colliders.borrow().iter() {
            if !sphere.layers.intersects(mask) {
                continue;
            }
            let Some(distance) = sphere.ray_distance(origin, direction, max_distance) else {
                continue;
            };
            if nearest.map_or(true, |hit| distance < hit.distance) {
                nearest = Some(RayHit {
                    collider: sphere.id,
                    point: origin + direction * distance,
                    distance,
                    layers: sphere.layers,
                });
            }
        }
        nearest
    }
}
