use crate::math::{Point, Vector};
use crate::utils;

/// Perpendicular foot of `point` on the line through `origin` with
/// direction `dir`, computed in the XY plane. The returned point keeps the
/// Z interpolated along `dir`, and degenerates to `origin` when `dir` has
/// no XY extent.
pub fn perpendicular_foot(origin: &Point, dir: &Vector, point: &Point) -> Point {
    let sqr_mag = utils::sqr_magnitude_xy(dir);
    if sqr_mag <= 0.0 {
        return *origin;
    }
    let t = utils::dot2d(dir, &(point - origin)) / sqr_mag;
    origin + dir * t
}
