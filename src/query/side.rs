use crate::math::{Point, Vector, TOLERANCE};
use crate::utils;

/// Which side of an oriented line a point lies on, as seen in the XY plane.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SideSign {
    /// Strictly on the positive (counter-clockwise) side.
    Positive,
    /// On the line, within tolerance.
    OnLine,
    /// Strictly on the negative (clockwise) side.
    Negative,
}

impl SideSign {
    /// Classifies a raw side value produced by [`side`].
    #[inline]
    pub fn of(res: f64) -> Self {
        if res > 0.0 {
            SideSign::Positive
        } else if res < 0.0 {
            SideSign::Negative
        } else {
            SideSign::OnLine
        }
    }
}

/// Signed side of `point` relative to the oriented line through `origin`
/// with unit direction `dir_norm`, projected on the XY plane.
///
/// The offset vector is normalized before the cross product, so the result
/// is a pure orientation measure independent of the point's distance to the
/// line. Values within [`TOLERANCE`] of zero are snapped to exactly zero,
/// and a point coincident with `origin` reports zero as well.
pub fn side(origin: &Point, dir_norm: &Vector, point: &Point) -> f64 {
    let offset = utils::normalize_or_zero(&(point - origin));
    let res = utils::cross2d_xy(dir_norm, &offset);
    if res.abs() <= TOLERANCE {
        0.0
    } else {
        res
    }
}

/// Side values of all three vertices of a triangle, in slot order.
#[inline]
pub fn sides_of_triangle(origin: &Point, dir_norm: &Vector, vertices: &[Point; 3]) -> [f64; 3] {
    [
        side(origin, dir_norm, &vertices[0]),
        side(origin, dir_norm, &vertices[1]),
        side(origin, dir_norm, &vertices[2]),
    ]
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::math::{Point, Vector};

    #[test]
    fn side_signs_match_orientation() {
        let origin = Point::origin();
        let dir = Vector::x();
        assert!(side(&origin, &dir, &Point::new(1.0, 1.0, 0.0)) > 0.0);
        assert!(side(&origin, &dir, &Point::new(1.0, -1.0, 0.0)) < 0.0);
        assert_eq!(side(&origin, &dir, &Point::new(5.0, 0.0, 0.0)), 0.0);
    }

    #[test]
    fn side_ignores_distance_to_the_line() {
        let origin = Point::origin();
        let dir = Vector::x();
        let near = side(&origin, &dir, &Point::new(1.0, 0.5, 0.0));
        let far = side(&origin, &dir, &Point::new(1000.0, 500.0, 0.0));
        assert!((near - far).abs() < 1.0e-6);
    }

    #[test]
    fn coincident_point_is_on_the_line() {
        let origin = Point::new(1.0, 2.0, 0.0);
        assert_eq!(side(&origin, &Vector::y(), &origin), 0.0);
        assert_eq!(SideSign::of(0.0), SideSign::OnLine);
    }

    #[test]
    fn near_zero_results_snap_to_zero() {
        let origin = Point::origin();
        let dir = Vector::x();
        // A point almost exactly on the line yields a normalized cross
        // product far below the snapping threshold.
        assert_eq!(side(&origin, &dir, &Point::new(1000.0, 1.0e-3, 0.0)), 0.0);
    }
}
