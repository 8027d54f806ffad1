//! Various unsorted geometrical and logical operators.

use crate::math::{Point, Real, Rotation, Vector};

/// 2D pseudo-cross-product of two vectors projected on the XY plane,
/// evaluated in `f64` to keep the side classification stable near zero.
#[inline]
pub fn cross2d_xy(lhs: &Vector, rhs: &Vector) -> f64 {
    lhs.x as f64 * rhs.y as f64 - rhs.x as f64 * lhs.y as f64
}

/// 2D pseudo-cross-product projected on the XZ plane. Crease quads stand
/// roughly upright, so their winding is decided in this plane.
#[inline]
pub fn cross2d_xz(lhs: &Vector, rhs: &Vector) -> f64 {
    lhs.x as f64 * rhs.z as f64 - rhs.x as f64 * lhs.z as f64
}

/// Dot product of the XY components only.
#[inline]
pub fn dot2d(lhs: &Vector, rhs: &Vector) -> Real {
    lhs.x * rhs.x + lhs.y * rhs.y
}

/// Squared magnitude of the XY components only.
#[inline]
pub fn sqr_magnitude_xy(v: &Vector) -> Real {
    v.x * v.x + v.y * v.y
}

/// Linear interpolation between two points, with `t` left unclamped.
#[inline]
pub fn lerp(start: &Point, end: &Point, t: Real) -> Point {
    start + (end - start) * t
}

/// Normalizes `v`, returning the zero vector when `v` is (nearly) zero.
#[inline]
pub fn normalize_or_zero(v: &Vector) -> Vector {
    v.try_normalize(1.0e-12).unwrap_or_else(Vector::zeros)
}

/// Rotation about the X axis by `rad`.
#[inline]
pub fn x_rotation(rad: Real) -> Rotation {
    Rotation::from_axis_angle(&Vector::x_axis(), rad)
}

/// Rotation about the Z axis by `rad`.
#[inline]
pub fn z_rotation(rad: Real) -> Rotation {
    Rotation::from_axis_angle(&Vector::z_axis(), rad)
}

/// Rotates `point` about `pivot` by the X-axis rotation `rot_x`, conjugated
/// by the Z-alignment rotation `rot_z` that maps the fold line onto the X
/// axis. This is the fundamental fold transform: every rotation about the
/// fold line is expressed as `rot_z · rot_x · rot_z⁻¹`.
#[inline]
pub fn rotated_about(point: &Point, pivot: &Point, rot_x: &Rotation, rot_z: &Rotation) -> Point {
    let v = point - pivot;
    let v = rot_z.inverse() * v;
    let v = rot_x * v;
    let v = rot_z * v;
    pivot + v
}

/// Interpolates `origin` toward `target` (flattened to the origin's Z) by
/// `t`, then rotates the result about `pivot`, both shifted by `offset`.
#[inline]
pub fn rotated_lerped(
    origin: &Point,
    target: &Point,
    pivot: &Point,
    offset: &Vector,
    t: Real,
    rot_x: &Rotation,
    rot_z: &Rotation,
) -> Point {
    let mut flat_target = *target;
    flat_target.z = origin.z;
    let lerped = lerp(origin, &flat_target, t);
    rotated_about(&(lerped + offset), &(pivot + offset), rot_x, rot_z)
}
