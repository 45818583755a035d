//! Planar heading helpers.
//!
//! Agents turn about the vertical axis only. Headings are yaw angles in
//! degrees measured from `+Z` towards `+X`, so a yaw of `90.0` faces `+X`.
use glam::{Quat, Vec3};

/// Drops the vertical component of a vector.
///
/// # Examples
/// ```
/// use glam::Vec3;
/// use squatch::vector_math::planar;
/// assert_eq!(planar(Vec3::new(1.0, 5.0, 2.0)), Vec3::new(1.0, 0.0, 2.0));
/// ```
#[must_use]
pub const fn planar(vector: Vec3) -> Vec3 {
    Vec3::new(vector.x, 0.0, vector.z)
}

/// Returns the unit vector pointing along the given yaw.
///
/// # Examples
/// ```
/// use squatch::vector_math::direction_from_yaw;
/// let east = direction_from_yaw(90.0);
/// assert!((east.x - 1.0).abs() < 1e-6);
/// assert!(east.z.abs() < 1e-6);
/// ```
#[must_use]
pub fn direction_from_yaw(yaw_degrees: f32) -> Vec3 {
    let radians = yaw_degrees.to_radians();
    Vec3::new(radians.sin(), 0.0, radians.cos())
}

/// Returns the yaw of a direction, or `None` when it has no planar extent.
///
/// Non-finite input is treated like the zero vector.
#[must_use]
pub fn yaw_of(direction: Vec3) -> Option<f32> {
    let flat = planar(direction);
    if !flat.is_finite() || flat.length_squared() <= f32::EPSILON {
        return None;
    }
    Some(flat.x.atan2(flat.z).to_degrees())
}

/// Wraps an angle into the half-open range `(-180, 180]`.
///
/// # Examples
/// ```
/// use squatch::vector_math::wrap_degrees;
/// assert_eq!(wrap_degrees(270.0), -90.0);
/// assert_eq!(wrap_degrees(-180.0), 180.0);
/// ```
#[must_use]
pub fn wrap_degrees(angle: f32) -> f32 {
    let wrapped = (angle + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped <= -180.0 {
        wrapped + 360.0
    } else {
        wrapped
    }
}

/// Signed rotation in degrees that turns `from` onto `to` the short way.
#[must_use]
pub fn yaw_delta(from: f32, to: f32) -> f32 {
    wrap_degrees(to - from)
}

/// Rotates a vector about the vertical axis by the given yaw.
///
/// Positive angles turn `+Z` towards `+X`, matching [`direction_from_yaw`].
#[must_use]
pub fn rotate_yaw(vector: Vec3, degrees: f32) -> Vec3 {
    Quat::from_rotation_y(degrees.to_radians()) * vector
}

/// Unsigned planar angle between a heading and a direction.
///
/// A direction with no planar extent (straight up or down, or zero) is
/// reported as dead ahead.
#[must_use]
pub fn off_axis_degrees(yaw_degrees: f32, direction: Vec3) -> f32 {
    yaw_of(direction).map_or(0.0, |yaw| yaw_delta(yaw_degrees, yaw).abs())
}
