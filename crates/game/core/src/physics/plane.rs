//! Vector helpers shared by the integrator, locomotion and abilities.
//!
//! Normals are assumed unit length. Degenerate inputs are not corrected; they
//! propagate as NaN like every other contract violation in the tick.

use glam::Vec3;

/// Removes the component of `v` along `normal`.
#[inline]
pub fn project_on_plane(v: Vec3, normal: Vec3) -> Vec3 {
    v - normal * v.dot(normal)
}

/// Shortens `v` by `amount`, stopping at zero without reversing direction.
#[inline]
pub fn decelerate(v: Vec3, amount: f32) -> Vec3 {
    let speed = v.length();
    if speed <= amount || speed == 0.0 {
        Vec3::ZERO
    } else {
        v * ((speed - amount) / speed)
    }
}

/// Moves `value` toward `target` by at most `step`.
#[inline]
pub fn move_towards(value: f32, target: f32, step: f32) -> f32 {
    if (target - value).abs() <= step {
        target
    } else {
        value + (target - value).signum() * step
    }
}

/// Unsigned angle between two directions, degrees.
#[inline]
pub fn angle_deg(a: Vec3, b: Vec3) -> f32 {
    a.angle_between(b).to_degrees()
}

/// Angle from `from` to `to` measured around `axis`, radians in [-π, π].
pub fn signed_angle(from: Vec3, to: Vec3, axis: Vec3) -> f32 {
    let from = project_on_plane(from, axis);
    let to = project_on_plane(to, axis);
    let sin = axis.dot(from.cross(to));
    let cos = from.dot(to);
    sin.atan2(cos)
}
