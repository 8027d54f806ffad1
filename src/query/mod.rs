//! Geometric predicates used by the fold pipeline: side classification
//! against a crease line, constrained segment intersection, and
//! perpendicular projection onto a line.

pub use self::intersection::segment_intersection;
pub use self::projection::perpendicular_foot;
pub use self::side::{side, sides_of_triangle, SideSign};

mod intersection;
mod projection;
mod side;
