//! Direction and frame helpers shared by steering and collision response.
//!
//! Every function here is total: zero-length or cancelling inputs resolve to a
//! documented fallback instead of producing NaN directions.

use bevy::prelude::*;

/// Direction used when nothing better is available (Bevy forward, -Z).
pub const FORWARD: Vec3 = Vec3::NEG_Z;

/// Squared length under which a blended direction is treated as cancelled.
const BLEND_EPSILON: f32 = 1e-8;

/// Returns `v` normalized if it has any length, else `default`.
///
/// # Example
/// ```
/// use bevy::prelude::*;
/// use bevy_bullet_ops::math::normalize_or_default;
///
/// assert_eq!(normalize_or_default(Vec3::ZERO, Vec3::Y), Vec3::Y);
/// assert_eq!(normalize_or_default(Vec3::X * 4.0, Vec3::Y), Vec3::X);
/// ```
pub fn normalize_or_default(v: Vec3, default: Vec3) -> Vec3 {
    if v.length_squared() > 0.0 {
        v.normalize()
    } else {
        default
    }
}

/// Blend two directions by `t` in [0, 1].
///
/// `t` is clamped. The endpoints return the respective normalized input
/// (or [`FORWARD`] for a zero input). In between, the normalized inputs are
/// lerped and renormalized; if they nearly cancel (antiparallel at the
/// midpoint), `desired` is returned instead of a zero vector.
pub fn blend_directions(current: Vec3, desired: Vec3, t: f32) -> Vec3 {
    let t = t.clamp(0.0, 1.0);
    let a = normalize_or_default(current, FORWARD);
    let b = normalize_or_default(desired, FORWARD);
    if t <= 0.0 {
        return a;
    }
    if t >= 1.0 {
        return b;
    }

    let mix = a * (1.0 - t) + b * t;
    if mix.length_squared() < BLEND_EPSILON {
        return b;
    }
    mix.normalize()
}

/// Rotate a world-space normal into the local frame of `frame`.
pub fn to_local_normal(frame: &Transform, world_normal: Vec3) -> Vec3 {
    normalize_or_default(frame.rotation.inverse() * world_normal, world_normal)
}

/// Rotate a local-space normal back out to world space.
pub fn to_world_normal(frame: &Transform, local_normal: Vec3) -> Vec3 {
    normalize_or_default(frame.rotation * local_normal, local_normal)
}

/// Express a world-space point in the local frame of `frame`.
///
/// Zero scale axes are treated as unit scale so the result stays finite.
pub fn to_local_point(frame: &Transform, world_point: Vec3) -> Vec3 {
    let scale = Vec3::select(frame.scale.cmpeq(Vec3::ZERO), Vec3::ONE, frame.scale);
    (frame.rotation.inverse() * (world_point - frame.translation)) / scale
}

/// Map a point from the local frame of `frame` back to world space.
pub fn to_world_point(frame: &Transform, local_point: Vec3) -> Vec3 {
    frame.transform_point(local_point)
}

/// Reflect `v` about the plane with unit normal `n`.
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}
