//! The folding pipeline: fold line setup, panel partitioning, layer
//! bookkeeping, precomputed fold kinematics, crease gap-fill, and the
//! angle-stepped driver tying them together.

pub use self::engine::{FoldEngine, FoldOutcome};
pub use self::error::FoldError;
pub use self::line::FoldLine;

pub(crate) mod gap_fill;
pub(crate) mod layering;
pub(crate) mod partition;
pub(crate) mod results;

mod engine;
mod error;
mod line;

use crate::math::{Real, Rotation, HALF_PI, TWO_PI};
use crate::utils;

/// Direction of a fold relative to the viewer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FoldType {
    /// The folded part rises toward the viewer; it lands below the
    /// stationary layers in layer order.
    Mountain,
    /// The folded part dips away from the viewer; it lands above the
    /// stationary layers.
    Valley,
}

impl FoldType {
    /// Quarter-turn rotation about the X axis in this fold's direction.
    pub(crate) fn quarter_rotation(self) -> Rotation {
        match self {
            FoldType::Mountain => utils::x_rotation(HALF_PI),
            FoldType::Valley => utils::x_rotation(3.0 * HALF_PI),
        }
    }

    /// Maps a driver angle onto the common monotonically increasing
    /// progress scale. Valley folds count down from a full turn.
    #[inline]
    pub(crate) fn convert_radians(self, rad: Real) -> Real {
        match self {
            FoldType::Mountain => rad,
            FoldType::Valley => TWO_PI - rad,
        }
    }
}

/// Where the engine is in the fold lifecycle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FoldPhase {
    /// No fold prepared.
    Idle,
    /// A fold has been initialized; panels are partitioned and at rest.
    Partitioned,
    /// The fold is animating.
    Folding,
    /// The fold has been committed; the sheet is flat again.
    Finalized,
}
