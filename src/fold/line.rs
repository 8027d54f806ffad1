use crate::fold::FoldError;
use crate::math::{Point, Real, Rotation, Vector, CREASE_WIDTH, TOLERANCE, TWO_PI};
use crate::utils;

/// An oriented fold line with the derived quantities the whole pipeline
/// shares: the segment direction, its normalization, the crease-width
/// perpendicular, and the rotation aligning the line with the X axis.
///
/// The paper to the left of `start -> end` is the side that folds.
#[derive(Clone, Debug, PartialEq)]
pub struct FoldLine {
    /// First endpoint.
    pub start: Point,
    /// Second endpoint.
    pub end: Point,
    /// `end - start`.
    pub dir: Vector,
    /// Unit direction.
    pub dir_norm: Vector,
    /// Perpendicular to the line, scaled to the crease width.
    pub perp: Vector,
    /// Z rotation mapping the X axis onto the line direction.
    pub rot_z: Rotation,
}

impl FoldLine {
    /// Builds the fold line through `start` and `end`, or fails when the
    /// endpoints coincide.
    pub fn new(start: Point, end: Point) -> Result<Self, FoldError> {
        let dir = end - start;
        let dir_norm = dir
            .try_normalize(1.0e-12)
            .ok_or(FoldError::DegenerateFoldLine)?;

        // The folded side must land to the right of the line, so the
        // perpendicular points left; near-axis components are zeroed to
        // keep the crease offset off the line.
        let abs_x = dir_norm.x.abs() as f64;
        let abs_y = dir_norm.y.abs() as f64;
        let mut perp = Vector::zeros();
        if abs_x >= TOLERANCE && abs_y >= TOLERANCE {
            perp.x = -dir_norm.y;
            perp.y = dir_norm.x;
        } else if abs_x < TOLERANCE {
            perp.x = -dir_norm.y;
        } else {
            perp.y = dir_norm.x;
        }
        perp *= CREASE_WIDTH;

        let mut rad = dir.y.atan2(dir.x);
        if rad < 0.0 {
            rad += TWO_PI;
        }

        Ok(FoldLine {
            start,
            end,
            dir,
            dir_norm,
            perp,
            rot_z: utils::z_rotation(rad),
        })
    }

    /// Start points shifted by the crease-width perpendicular, one per
    /// layer the fold spans. Entry 0 is the unshifted start.
    pub(crate) fn start_points(&self, count: usize) -> Vec<Point> {
        (0..count)
            .map(|i| self.start + self.perp * i as Real)
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::math::Point;
    use approx::relative_eq;

    #[test]
    fn coincident_endpoints_are_rejected() {
        let p = Point::new(1.0, 1.0, 0.0);
        assert_eq!(FoldLine::new(p, p), Err(FoldError::DegenerateFoldLine));
    }

    #[test]
    fn perpendicular_points_left_of_the_direction() {
        let line = FoldLine::new(Point::origin(), Point::new(1.0, 1.0, 0.0)).unwrap();
        // dir_norm = (√2/2, √2/2): the perpendicular turns it a quarter
        // left before scaling down to the crease width.
        assert!(relative_eq!(
            line.perp,
            Vector::new(-CREASE_WIDTH * 0.70710677, CREASE_WIDTH * 0.70710677, 0.0),
            epsilon = 1.0e-6
        ));
    }

    #[test]
    fn axis_aligned_lines_zero_one_component() {
        let vertical = FoldLine::new(Point::origin(), Point::new(0.0, 2.0, 0.0)).unwrap();
        assert!(relative_eq!(
            vertical.perp,
            Vector::new(-CREASE_WIDTH, 0.0, 0.0),
            epsilon = 1.0e-6
        ));
        let horizontal = FoldLine::new(Point::origin(), Point::new(2.0, 0.0, 0.0)).unwrap();
        assert!(relative_eq!(
            horizontal.perp,
            Vector::new(0.0, CREASE_WIDTH, 0.0),
            epsilon = 1.0e-6
        ));
    }

    #[test]
    fn start_points_step_by_the_perpendicular() {
        let line = FoldLine::new(Point::origin(), Point::new(2.0, 0.0, 0.0)).unwrap();
        let pts = line.start_points(3);
        assert_eq!(pts.len(), 3);
        assert!(relative_eq!(pts[0], Point::origin()));
        assert!(relative_eq!(pts[2], Point::new(0.0, 2.0 * CREASE_WIDTH, 0.0)));
    }
}
