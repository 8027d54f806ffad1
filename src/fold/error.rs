use thiserror::Error;

/// Errors raised while preparing a fold.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum FoldError {
    /// The two fold line endpoints coincide, so no line can be drawn.
    #[error("fold line endpoints coincide")]
    DegenerateFoldLine,
    /// A split record was requested across panels on different layers.
    #[error("panels on layers {left} and {right} cannot share a split vertex")]
    LayerMismatch {
        /// Layer of the stationary panel.
        left: i32,
        /// Layer of the folding panel.
        right: i32,
    },
    /// Two panels expected to share a vertex on the fold line do not.
    #[error("panels {nonfold} and {fold} do not share a vertex on the fold line")]
    SharedVertexMismatch {
        /// Index of the stationary panel.
        nonfold: usize,
        /// Index of the folding panel.
        fold: usize,
    },
}
