//! Layer arithmetic. A fold mirrors the stacking order of everything it
//! carries across the innermost folded layer, so the new layer values fall
//! out of small closed-form expressions.

use crate::fold::{FoldLine, FoldType};
use crate::math::TOLERANCE;
use crate::query;
use crate::shape::Sheet;

/// Layer a panel lands on after the fold, given the innermost layer of
/// the folded stack before the fold.
#[inline]
pub(crate) fn updated_layer(layer: i32, inner: i32, fold_type: FoldType) -> i32 {
    match fold_type {
        FoldType::Mountain => inner + (inner - layer) - 1,
        FoldType::Valley => inner + (inner - layer) + 1,
    }
}

/// Layer value of the outermost folded layer after the fold.
#[inline]
pub(crate) fn updated_outer_layer(inner: i32, outer: i32, fold_type: FoldType) -> i32 {
    match fold_type {
        FoldType::Mountain => inner - 1 + (inner - outer),
        FoldType::Valley => inner + 1 + (inner - outer),
    }
}

/// Absolute distance between two layers.
#[inline]
pub(crate) fn layer_distance(a: i32, b: i32) -> usize {
    (a - b).unsigned_abs() as usize
}

/// Layer span of the fold before anything moves.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct PreFoldInfo {
    /// Closest affected layer as seen from the folding side.
    pub inner: i32,
    /// Furthest affected layer as seen from the folding side.
    pub outer: i32,
}

/// `true` when a set of side values marks a panel as affected by the
/// fold: either entirely on the folding side, or straddling the line.
#[inline]
pub(crate) fn is_fold_candidate(res: &[f64; 3]) -> bool {
    let fold_side = res.iter().all(|&r| -TOLERANCE <= r);
    let straddling = !res.iter().all(|&r| r < TOLERANCE);
    fold_side || straddling
}

/// Scans the sheet for the layer span the fold will touch. Panels are
/// visited outermost first as seen from the folding side: decreasing
/// layer for a mountain fold, increasing for a valley fold. Returns
/// `None` when nothing lies on the folding side.
pub(crate) fn prefold_info(
    sheet: &Sheet,
    line: &FoldLine,
    fold_type: FoldType,
) -> Option<PreFoldInfo> {
    let mut ordered: Vec<usize> = (0..sheet.panels().len()).collect();
    match fold_type {
        FoldType::Mountain => ordered.sort_by_key(|&i| core::cmp::Reverse(sheet.panels()[i].layer())),
        FoldType::Valley => ordered.sort_by_key(|&i| sheet.panels()[i].layer()),
    }

    let mut outer = None;
    for &i in &ordered {
        let panel = &sheet.panels()[i];
        let res = query::sides_of_triangle(&line.start, &line.dir_norm, panel.vertices());
        if is_fold_candidate(&res) {
            outer = Some(panel.layer());
            break;
        }
    }
    let outer = outer?;

    let mut inner = outer;
    for &i in &ordered {
        let panel = &sheet.panels()[i];
        if panel.layer() == outer || panel.layer() == inner {
            continue;
        }
        let res = query::sides_of_triangle(&line.start, &line.dir_norm, panel.vertices());
        if is_fold_candidate(&res) {
            inner = panel.layer();
        }
    }

    Some(PreFoldInfo { inner, outer })
}
