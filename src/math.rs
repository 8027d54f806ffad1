//! Compilation-flag independent aliases for mathematical types.

pub use na::{Point3, Rotation3, Vector3};

/// The scalar type used throughout this crate.
pub type Real = f32;

/// The point type.
pub type Point = Point3<Real>;

/// The vector type.
pub type Vector = Vector3<Real>;

/// The rotation type used for the fold transforms.
pub type Rotation = Rotation3<Real>;

/// High-precision tolerance used by the side predicates; side results whose
/// magnitude falls below this value are snapped to exactly zero.
pub const TOLERANCE: f64 = 1.0e-5;

/// Low-precision tolerance used for distance tie-breaks.
pub const TOLERANCE_LOW: f64 = 1.0e-4;

/// Width of the thin quads standing in for the paper's edge thickness.
pub const CREASE_WIDTH: Real = 0.003;

/// Phase shift between the fold angles of two adjacent layers, in radians.
/// Deeper layers start rotating this much later, which prevents stacked
/// layers from self-intersecting at the fold line.
pub const LAYER_ANGLE_OFFSET: Real = core::f32::consts::PI / 180.0;

/// π, the angle at which a fold lies flat again.
pub const PI: Real = core::f32::consts::PI;

/// 2π.
pub const TWO_PI: Real = core::f32::consts::TAU;

/// π/2, the halfway angle at which the fold interpolation switches from the
/// lerp-then-rotate stage to rotating the 90° reference points.
pub const HALF_PI: Real = core::f32::consts::FRAC_PI_2;
