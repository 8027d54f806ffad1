use crate::math::{Point, Real, Vector, TOLERANCE};

/// Intersection of two 2D segments given in point + direction form, where
/// each direction spans the full segment. Returns `None` when the segments
/// are parallel or the intersection falls outside either segment.
///
/// The solve runs in the XY plane only; the caller supplies the Z value of
/// the returned point since each paper layer carries its own height.
pub fn segment_intersection(
    point1: &Point,
    dir1: &Vector,
    point2: &Point,
    dir2: &Vector,
    z: Real,
) -> Option<Point> {
    let p1x = point1.x as f64;
    let p1y = point1.y as f64;
    let p2x = point2.x as f64;
    let p2y = point2.y as f64;
    let d1x = dir1.x as f64;
    let d1y = dir1.y as f64;
    let d2x = dir2.x as f64;
    let d2y = dir2.y as f64;

    let vertical1 = d1x.abs() < TOLERANCE;
    let vertical2 = d2x.abs() < TOLERANCE;

    let (x, y) = if vertical1 && vertical2 {
        return None;
    } else if vertical1 {
        let slope2 = d2y / d2x;
        let x = p1x;
        (x, slope2 * (x - p2x) + p2y)
    } else if vertical2 {
        let slope1 = d1y / d1x;
        let x = p2x;
        (x, slope1 * (x - p1x) + p1y)
    } else {
        let slope1 = d1y / d1x;
        let slope2 = d2y / d2x;
        if (slope1 - slope2).abs() < TOLERANCE {
            return None;
        }
        let x = (slope1 * p1x - slope2 * p2x + p2y - p1y) / (slope1 - slope2);
        (x, slope1 * (x - p1x) + p1y)
    };

    // The hit must lie on both segments.
    if !on_segment(x, y, p1x, p1y, d1x, d1y) || !on_segment(x, y, p2x, p2y, d2x, d2y) {
        return None;
    }

    Some(Point::new(x as Real, y as Real, z))
}

fn on_segment(x: f64, y: f64, px: f64, py: f64, dx: f64, dy: f64) -> bool {
    let t = if dx.abs() >= TOLERANCE {
        (x - px) / dx
    } else if dy.abs() >= TOLERANCE {
        (y - py) / dy
    } else {
        return false;
    };
    (0.0..=1.0).contains(&t)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::math::{Point, Vector};
    use approx::relative_eq;

    #[test]
    fn crossing_segments_intersect() {
        let hit = segment_intersection(
            &Point::new(0.0, 0.0, 0.0),
            &Vector::new(2.0, 2.0, 0.0),
            &Point::new(0.0, 2.0, 0.0),
            &Vector::new(2.0, -2.0, 0.0),
            0.5,
        )
        .unwrap();
        assert!(relative_eq!(hit, Point::new(1.0, 1.0, 0.5), epsilon = 1.0e-5));
    }

    #[test]
    fn disjoint_segments_do_not_intersect() {
        // The supporting lines cross at (1, 1) but the second segment stops
        // before reaching it.
        let hit = segment_intersection(
            &Point::new(0.0, 0.0, 0.0),
            &Vector::new(2.0, 2.0, 0.0),
            &Point::new(0.0, 2.0, 0.0),
            &Vector::new(0.5, -0.5, 0.0),
            0.0,
        );
        assert!(hit.is_none());
    }

    #[test]
    fn parallel_segments_do_not_intersect() {
        let hit = segment_intersection(
            &Point::new(0.0, 0.0, 0.0),
            &Vector::new(1.0, 1.0, 0.0),
            &Point::new(0.0, 1.0, 0.0),
            &Vector::new(1.0, 1.0, 0.0),
            0.0,
        );
        assert!(hit.is_none());
        let vertical = segment_intersection(
            &Point::new(0.0, 0.0, 0.0),
            &Vector::new(0.0, 1.0, 0.0),
            &Point::new(1.0, 0.0, 0.0),
            &Vector::new(0.0, 1.0, 0.0),
            0.0,
        );
        assert!(vertical.is_none());
    }

    #[test]
    fn vertical_segment_against_sloped_segment() {
        let hit = segment_intersection(
            &Point::new(1.0, -1.0, 0.0),
            &Vector::new(0.0, 2.0, 0.0),
            &Point::new(0.0, 0.0, 0.0),
            &Vector::new(2.0, 0.0, 0.0),
            0.0,
        )
        .unwrap();
        assert!(relative_eq!(hit, Point::new(1.0, 0.0, 0.0), epsilon = 1.0e-5));
    }

    #[test]
    fn carries_the_caller_supplied_z() {
        let hit = segment_intersection(
            &Point::new(-1.0, 0.0, 7.0),
            &Vector::new(2.0, 0.0, 0.0),
            &Point::new(0.0, -1.0, 9.0),
            &Vector::new(0.0, 2.0, 0.0),
            3.0,
        )
        .unwrap();
        assert_eq!(hit.z, 3.0);
    }
}
