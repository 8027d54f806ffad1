//! The fold driver. One `initialize_fold` call partitions the sheet and
//! precomputes every moving vertex, `advance` poses the sheet for an
//! angle, and `finalize` commits the fold and flattens the sheet again.

use crate::fold::{gap_fill, layering, partition, FoldError, FoldLine, FoldPhase, FoldType};
use crate::math::{Point, Real, Rotation, HALF_PI, LAYER_ANGLE_OFFSET, PI, TOLERANCE, TWO_PI};
use crate::query;
use crate::shape::{Crease, Panel, Sheet};
use crate::utils;

use crate::fold::partition::Partition;
use crate::fold::results::{AdjustResults, CreaseFoldResults, PanelFoldResults};

/// What `initialize_fold` found to do.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FoldOutcome {
    /// Nothing lies on the folding side of the line; the sheet is
    /// untouched and no fold is in flight.
    NoFoldTarget,
    /// The sheet is partitioned and ready to be driven by `advance`.
    Folding,
}

/// Drives folds on a [`Sheet`].
///
/// A fold runs as one [`FoldEngine::initialize_fold`] call, any number of
/// [`FoldEngine::advance`] calls with increasing angles in `(0, π]`, and
/// one [`FoldEngine::finalize`]. Initializing again before finalizing
/// discards the in-flight fold's precomputation; creases it generated
/// stay in the sheet.
#[derive(Clone, Debug)]
pub struct FoldEngine {
    sheet: Sheet,
    phase: FoldPhase,
    fold_type: FoldType,
    rot_z: Rotation,
    /// Innermost layer of the folded stack, moved one past the fold's
    /// inner layer once a fold is initialized.
    inner_layer: i32,

    fold_group: Vec<usize>,
    nonfold_group: Vec<usize>,
    fold_results: Vec<PanelFoldResults>,
    fold_adjust: Vec<AdjustResults>,
    nonfold_adjust: Vec<AdjustResults>,

    crease_fold_group: Vec<usize>,
    crease_results: Vec<CreaseFoldResults>,
    generated_creases: Vec<usize>,
}

impl Default for FoldEngine {
    fn default() -> Self {
        FoldEngine::new()
    }
}

impl FoldEngine {
    /// An engine over an empty sheet.
    pub fn new() -> Self {
        FoldEngine::with_sheet(Sheet::new())
    }

    /// An engine over an existing sheet.
    pub fn with_sheet(sheet: Sheet) -> Self {
        FoldEngine {
            sheet,
            phase: FoldPhase::Idle,
            fold_type: FoldType::Mountain,
            rot_z: Rotation::identity(),
            inner_layer: 0,
            fold_group: Vec::new(),
            nonfold_group: Vec::new(),
            fold_results: Vec::new(),
            fold_adjust: Vec::new(),
            nonfold_adjust: Vec::new(),
            crease_fold_group: Vec::new(),
            crease_results: Vec::new(),
            generated_creases: Vec::new(),
        }
    }

    /// The sheet being folded.
    #[inline]
    pub fn sheet(&self) -> &Sheet {
        &self.sheet
    }

    /// Where the engine is in the fold lifecycle.
    #[inline]
    pub fn phase(&self) -> FoldPhase {
        self.phase
    }

    /// Indices of the creases generated by the current fold.
    #[inline]
    pub fn generated_creases(&self) -> &[usize] {
        &self.generated_creases
    }

    /// Bulk-appends external geometry, used for initial sheet
    /// construction.
    pub fn add_geometry(
        &mut self,
        panels: impl IntoIterator<Item = Panel>,
        creases: impl IntoIterator<Item = Crease>,
    ) {
        self.sheet.panels.extend(panels);
        self.sheet.creases.extend(creases);
    }

    /// Appends a panel to the sheet and returns its index.
    pub fn push_panel(&mut self, panel: Panel) -> usize {
        self.sheet.push_panel(panel)
    }

    /// Appends a crease to the sheet and returns its index.
    pub fn push_crease(&mut self, crease: Crease) -> usize {
        self.sheet.push_crease(crease)
    }

    /// Prepares a fold along the line from `p1` to `p2`. The paper to the
    /// left of the line folds over to the right.
    ///
    /// Partitions every straddling panel and crease, reassigns layers to
    /// the folding half, precomputes the fold kinematics, and bridges the
    /// new boundary with generated creases. The sheet does not move until
    /// [`FoldEngine::advance`] is called.
    pub fn initialize_fold(
        &mut self,
        p1: Point,
        p2: Point,
        fold_type: FoldType,
    ) -> Result<FoldOutcome, FoldError> {
        self.clear_transient();

        let line = FoldLine::new(p1, p2)?;

        let span = match layering::prefold_info(&self.sheet, &line, fold_type) {
            Some(span) => span,
            None => {
                log::info!("no panels on the folding side; nothing to fold");
                return Ok(FoldOutcome::NoFoldTarget);
            }
        };
        let (inner, outer) = (span.inner, span.outer);

        let start_points = line.start_points(layering::layer_distance(inner, outer) + 1);
        let mut partition =
            partition::partition_panels(&mut self.sheet, &line, &start_points, inner, outer)?;

        // The shifted-line intersections are consumed as post-fold
        // targets, so mirror them across the line now.
        let half_turn = utils::x_rotation(PI);
        for entry in &mut partition.furthest_altered {
            let foot = query::perpendicular_foot(&line.start, &line.dir, &entry.point);
            entry.point = utils::rotated_about(&entry.point, &foot, &half_turn, &line.rot_z);
        }

        let furthest_idx = if partition.furthest_on_line[0].layer == outer {
            0
        } else {
            partition.furthest_on_line.len() - 1
        };
        let furthest_point = partition.furthest_on_line[furthest_idx].point;
        let splits_on_end_points =
            partition::split_creases(&mut self.sheet, &line, &furthest_point);

        self.set_fold_groups(&line, fold_type, inner);
        self.set_crease_fold_group(&line, fold_type, inner);

        for &idx in &self.fold_group {
            self.fold_results.push(PanelFoldResults::new(
                &self.sheet.panels[idx],
                &line,
                fold_type,
                inner,
            ));
        }
        for &idx in &self.crease_fold_group {
            self.crease_results.push(CreaseFoldResults::new(
                &self.sheet.creases[idx],
                &line,
                fold_type,
                inner,
            ));
        }

        self.set_adjustments(&partition, fold_type, inner, outer, splits_on_end_points);

        self.generated_creases =
            gap_fill::generate_squashed_creases(&mut self.sheet, &partition.split_infos, &line);

        self.sheet.sync_crease_anchors();

        self.inner_layer = match fold_type {
            FoldType::Mountain => inner - 1,
            FoldType::Valley => inner + 1,
        };
        self.rot_z = line.rot_z;
        self.fold_type = fold_type;
        self.phase = FoldPhase::Partitioned;
        Ok(FoldOutcome::Folding)
    }

    /// Poses the sheet for the fold angle `rad`, in `(0, π]`. Deeper
    /// layers trail the angle by a fixed per-layer phase shift, so a layer
    /// may not move yet for small angles.
    pub fn advance(&mut self, rad: Real) {
        if self.phase != FoldPhase::Partitioned && self.phase != FoldPhase::Folding {
            log::warn!("advance called with no fold in flight");
            return;
        }

        let old_inner = match self.fold_type {
            FoldType::Mountain => self.inner_layer + 1,
            FoldType::Valley => self.inner_layer - 1,
        };

        for (i, &idx) in self.fold_group.iter().enumerate() {
            let dif =
                layering::layer_distance(self.sheet.panels[idx].layer(), self.inner_layer) as Real;
            let layer_rad = match self.fold_type {
                FoldType::Mountain => {
                    let r = rad - dif * LAYER_ANGLE_OFFSET;
                    if r <= 0.0 {
                        continue;
                    }
                    r
                }
                FoldType::Valley => {
                    let r = (TWO_PI - rad) + dif * LAYER_ANGLE_OFFSET;
                    if r >= TWO_PI {
                        continue;
                    }
                    r
                }
            };
            self.fold_results[i].apply(
                &mut self.sheet.panels[idx],
                &self.fold_adjust[i],
                layer_rad,
                &self.rot_z,
            );
        }

        for (i, &idx) in self.nonfold_group.iter().enumerate() {
            let dif = layering::layer_distance(self.sheet.panels[idx].layer(), old_inner) as Real;
            match self.fold_type {
                FoldType::Mountain => {
                    if rad - dif * LAYER_ANGLE_OFFSET <= 0.0 {
                        continue;
                    }
                }
                FoldType::Valley => {
                    if (TWO_PI - rad) + dif * LAYER_ANGLE_OFFSET >= TWO_PI {
                        continue;
                    }
                }
            }
            let target = self.nonfold_adjust[i].target_rad;
            self.nonfold_adjust[i].apply(&mut self.sheet.panels[idx], target);
        }

        for (k, &idx) in self.crease_fold_group.iter().enumerate() {
            let bottom_dif =
                layering::layer_distance(self.sheet.creases[idx].bottom_layer(), self.inner_layer)
                    as Real;
            let top_dif =
                layering::layer_distance(self.sheet.creases[idx].top_layer(), self.inner_layer)
                    as Real;
            let (bottom_rad, top_rad) = match self.fold_type {
                FoldType::Mountain => (
                    (rad - bottom_dif * LAYER_ANGLE_OFFSET).max(0.0),
                    (rad - top_dif * LAYER_ANGLE_OFFSET).max(0.0),
                ),
                FoldType::Valley => {
                    let temp = TWO_PI - rad;
                    (
                        (temp + bottom_dif * LAYER_ANGLE_OFFSET).min(TWO_PI),
                        (temp + top_dif * LAYER_ANGLE_OFFSET).min(TWO_PI),
                    )
                }
            };
            self.crease_results[k].apply(
                &mut self.sheet.creases[idx],
                bottom_rad,
                top_rad,
                &self.rot_z,
            );
        }

        self.sheet.sync_crease_anchors();
        self.phase = FoldPhase::Folding;
    }

    /// Snaps everything to the completed fold pose and commits the fold:
    /// caught creases flip bottom for top, and the sheet lies flat again.
    /// Calling it again without a new fold is a no-op.
    pub fn finalize(&mut self) {
        if self.phase == FoldPhase::Idle || self.phase == FoldPhase::Finalized {
            return;
        }

        for (i, &idx) in self.fold_group.iter().enumerate() {
            let target = self.fold_results[i].target_rad;
            self.fold_results[i].apply(
                &mut self.sheet.panels[idx],
                &self.fold_adjust[i],
                target,
                &self.rot_z,
            );
        }

        for (i, &idx) in self.nonfold_group.iter().enumerate() {
            let target = self.nonfold_adjust[i].target_rad;
            self.nonfold_adjust[i].apply(&mut self.sheet.panels[idx], target);
        }

        for (k, &idx) in self.crease_fold_group.iter().enumerate() {
            let target = self.crease_results[k].target_rad;
            self.crease_results[k].apply(&mut self.sheet.creases[idx], target, target, &self.rot_z);
        }

        self.sheet.sync_crease_anchors();

        for &idx in &self.crease_fold_group {
            self.sheet.creases[idx].commit_fold();
        }

        self.phase = FoldPhase::Finalized;
    }

    fn clear_transient(&mut self) {
        self.fold_group.clear();
        self.nonfold_group.clear();
        self.fold_results.clear();
        self.fold_adjust.clear();
        self.nonfold_adjust.clear();
        self.crease_fold_group.clear();
        self.crease_results.clear();
        // Creases generated by the previous fold already live in the
        // sheet; they only lose their per-fold marking.
        self.generated_creases.clear();
    }

    /// Sorts every panel into the folding or stationary group and flips
    /// the folding ones onto their mirrored layers.
    fn set_fold_groups(&mut self, line: &FoldLine, fold_type: FoldType, inner: i32) {
        for idx in 0..self.sheet.panels.len() {
            let res = query::sides_of_triangle(
                &line.start,
                &line.dir_norm,
                self.sheet.panels[idx].vertices(),
            );
            if res.iter().all(|&r| r >= -TOLERANCE) {
                self.fold_group.push(idx);
            } else {
                self.nonfold_group.push(idx);
            }
        }

        for &idx in &self.fold_group {
            let layer = self.sheet.panels[idx].layer();
            self.sheet.panels[idx].fold_onto_layer(layering::updated_layer(layer, inner, fold_type));
        }
    }

    /// Creases with their bottom edge on the folding side ride along:
    /// both their layers mirror and their facing flips.
    fn set_crease_fold_group(&mut self, line: &FoldLine, fold_type: FoldType, inner: i32) {
        for idx in 0..self.sheet.creases.len() {
            let crease = &self.sheet.creases[idx];
            let res0 = query::side(&line.start, &line.dir_norm, &crease.corner(0).point);
            let res1 = query::side(&line.start, &line.dir_norm, &crease.corner(1).point);
            if res0 >= -TOLERANCE && res1 >= -TOLERANCE {
                self.crease_fold_group.push(idx);
            }
        }

        for &idx in &self.crease_fold_group {
            let crease = &mut self.sheet.creases[idx];
            let bottom = layering::updated_layer(crease.bottom_layer(), inner, fold_type);
            let top = layering::updated_layer(crease.top_layer(), inner, fold_type);
            let facing = !crease.facing_up();
            crease.update_info(bottom, top, facing);
        }
    }

    /// Builds the per-panel adjustment targets keeping on-crease vertices
    /// glued to the fold line while differently-shifted layers rotate.
    fn set_adjustments(
        &mut self,
        partition: &Partition,
        fold_type: FoldType,
        inner: i32,
        outer: i32,
        splits_on_end_points: bool,
    ) {
        let mut on_line = partition.furthest_on_line.clone();
        let mut altered = partition.furthest_altered.clone();
        match fold_type {
            FoldType::Mountain => {
                on_line.sort_by_key(|v| v.layer);
                altered.sort_by_key(|v| v.layer);
            }
            FoldType::Valley => {
                on_line.sort_by_key(|v| std::cmp::Reverse(v.layer));
                altered.sort_by_key(|v| std::cmp::Reverse(v.layer));
            }
        }

        let closest = partition.closest;
        let dirs: Vec<_> = altered.iter().map(|v| v.point - closest).collect();
        let mags: Vec<Real> = on_line
            .iter()
            .map(|v| (v.point - closest).magnitude())
            .collect();

        let new_outer = layering::updated_outer_layer(inner, outer, fold_type);

        for (i, &idx) in self.fold_group.iter().enumerate() {
            let panel = &self.sheet.panels[idx];
            let slot = layering::layer_distance(panel.layer(), new_outer);
            let needs = panel.crease_flags().iter().any(|&f| f);
            let adjust = if !needs || slot == 0 || slot >= mags.len() {
                AdjustResults::empty()
            } else {
                AdjustResults::with_fold_heights(
                    panel,
                    HALF_PI,
                    &self.fold_results[i],
                    &closest,
                    &dirs[slot],
                    mags[slot],
                )
            };
            self.fold_adjust.push(adjust);
        }

        let mut gap_parents = 0usize;
        for &idx in &self.nonfold_group {
            let panel = &self.sheet.panels[idx];
            let slot = layering::layer_distance(panel.layer(), inner);
            // A flagged panel whose layer lies outside the folded span sits
            // against the line without taking part in the fold; it keeps no
            // adjustment target.
            let flagged = panel.crease_flags().iter().filter(|&&f| f).count();
            let adjust = if flagged == 0 || slot == 0 || slot >= mags.len() {
                AdjustResults::empty()
            } else {
                if splits_on_end_points && flagged == 1 {
                    gap_parents += 1;
                }
                AdjustResults::new(panel, HALF_PI, &closest, &dirs[slot], mags[slot])
            };
            self.nonfold_adjust.push(adjust);
        }
        if gap_parents > 0 {
            log::debug!(
                "{} stationary panels touch the crease only at its end point",
                gap_parents
            );
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::math::Point;
    use crate::shape::Panel;

    fn square_engine() -> FoldEngine {
        let mut engine = FoldEngine::new();
        engine.push_panel(Panel::new(
            Point::new(0.0, 0.0, 0.0),
            Point::new(2.0, 0.0, 0.0),
            Point::new(2.0, 2.0, 0.0),
        ));
        engine.push_panel(Panel::new(
            Point::new(0.0, 0.0, 0.0),
            Point::new(2.0, 2.0, 0.0),
            Point::new(0.0, 2.0, 0.0),
        ));
        engine
    }

    #[test]
    fn degenerate_line_is_rejected() {
        let mut engine = square_engine();
        let p = Point::new(1.0, 1.0, 0.0);
        assert_eq!(
            engine.initialize_fold(p, p, FoldType::Mountain),
            Err(FoldError::DegenerateFoldLine)
        );
        assert_eq!(engine.phase(), FoldPhase::Idle);
    }

    #[test]
    fn fold_with_nothing_on_the_left_is_a_no_op() {
        let mut engine = square_engine();
        // Upward line left of the square: the folding side is its left,
        // which holds no paper.
        let outcome = engine
            .initialize_fold(
                Point::new(-1.0, 0.0, 0.0),
                Point::new(-1.0, 2.0, 0.0),
                FoldType::Mountain,
            )
            .unwrap();
        assert_eq!(outcome, FoldOutcome::NoFoldTarget);
        assert_eq!(engine.phase(), FoldPhase::Idle);
        assert_eq!(engine.sheet().panels().len(), 2);
    }

    #[test]
    fn lifecycle_phases_progress() {
        let mut engine = square_engine();
        let outcome = engine
            .initialize_fold(
                Point::new(1.0, -1.0, 0.0),
                Point::new(1.0, 3.0, 0.0),
                FoldType::Mountain,
            )
            .unwrap();
        assert_eq!(outcome, FoldOutcome::Folding);
        assert_eq!(engine.phase(), FoldPhase::Partitioned);

        engine.advance(HALF_PI);
        assert_eq!(engine.phase(), FoldPhase::Folding);

        engine.finalize();
        assert_eq!(engine.phase(), FoldPhase::Finalized);

        // A second finalize changes nothing.
        let snapshot: Vec<_> = engine.sheet().panels().iter().map(|p| *p.vertices()).collect();
        engine.finalize();
        let after: Vec<_> = engine.sheet().panels().iter().map(|p| *p.vertices()).collect();
        assert_eq!(snapshot, after);
    }

    #[test]
    fn fold_spanning_one_layer_ignores_a_rim_on_the_line_below_it() {
        // The layer-1 panel straddles the line; the layer-0 panel's edge
        // lies on it with its body on the stationary side, one layer below
        // the folded span.
        let mut engine = FoldEngine::new();
        engine.push_panel(Panel::with_state(
            Point::new(0.0, 0.0, 0.0),
            Point::new(2.0, 0.0, 0.0),
            Point::new(2.0, 2.0, 0.0),
            1,
            true,
        ));
        engine.push_panel(Panel::new(
            Point::new(1.0, 0.0, 0.0),
            Point::new(1.0, 2.0, 0.0),
            Point::new(2.0, 1.0, 0.0),
        ));

        let outcome = engine
            .initialize_fold(
                Point::new(1.0, -1.0, 0.0),
                Point::new(1.0, 3.0, 0.0),
                FoldType::Mountain,
            )
            .unwrap();
        assert_eq!(outcome, FoldOutcome::Folding);
        assert_eq!(engine.sheet().panels().len(), 4);

        engine.advance(HALF_PI);
        engine.finalize();

        for panel in engine.sheet().panels() {
            for v in panel.vertices() {
                assert!(v.x.is_finite() && v.y.is_finite() && v.z.is_finite());
            }
        }
        // The rim panel never moved.
        let rim = &engine.sheet().panels()[1];
        assert!(rim
            .vertices()
            .iter()
            .any(|v| (v - Point::new(2.0, 1.0, 0.0)).norm() < 1.0e-5));
        assert!(rim.vertices().iter().all(|v| v.z == 0.0));
        // The folded half landed on the other side of the line.
        let folded: Vec<_> = engine
            .sheet()
            .panels()
            .iter()
            .filter(|p| !p.facing_up())
            .collect();
        assert_eq!(folded.len(), 1);
        assert!(folded[0].vertices().iter().all(|v| v.x >= 1.0 - 1.0e-3));
    }

    #[test]
    fn advance_without_a_fold_does_nothing() {
        let mut engine = square_engine();
        let before: Vec<_> = engine.sheet().panels().iter().map(|p| *p.vertices()).collect();
        engine.advance(1.0);
        let after: Vec<_> = engine.sheet().panels().iter().map(|p| *p.vertices()).collect();
        assert_eq!(before, after);
        assert_eq!(engine.phase(), FoldPhase::Idle);
    }
}
