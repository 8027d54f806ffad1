//! Precomputed kinematics. When a fold is initialized, the final and
//! halfway positions of every moving vertex are computed once; the driver
//! then only interpolates between them.

use crate::fold::{FoldLine, FoldType};
use crate::math::{Point, Real, Rotation, Vector, HALF_PI, PI, TOLERANCE};
use crate::query;
use crate::shape::{Crease, Panel};
use crate::utils;

/// Which half of the fold arc an angle falls in.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum FoldStage {
    /// Up to the quarter turn: vertices swing up from their rest pose.
    BeforeHalfway,
    /// Past the quarter turn: vertices swing down from the halfway pose.
    PastHalfway,
}

/// Fold kinematics of a single vertex: its rest position, the foot of its
/// perpendicular on the fold line, and both rebased by the rotated crease
/// offset for the second half of the fold arc.
#[derive(Copy, Clone, Debug)]
pub(crate) struct VertexFoldResult {
    pub origin: Point,
    pub mid0: Point,
    pub origin90: Point,
    pub mid90: Point,
    pub connected: bool,
}

impl VertexFoldResult {
    /// Kinematics for `origin` with an explicit on-crease flag.
    pub(crate) fn new(
        origin: Point,
        foot: Point,
        offset: &Vector,
        rot_x: &Rotation,
        rot_z: &Rotation,
        connected: bool,
    ) -> Self {
        // The foot comes from a 2D projection; its height belongs to the
        // vertex's own layer.
        let mut mid0 = foot;
        mid0.z = origin.z;

        let mid90 = utils::rotated_about(&(mid0 + offset), &mid0, rot_x, rot_z);
        let origin90 = if connected {
            mid90
        } else {
            utils::rotated_about(&(origin + offset), &origin, rot_x, rot_z)
        };

        VertexFoldResult {
            origin,
            mid0,
            origin90,
            mid90,
            connected,
        }
    }

    /// Kinematics for a crease corner, where lying on the fold line is
    /// detected by distance instead of a stored flag.
    pub(crate) fn from_distance(
        origin: Point,
        foot: Point,
        offset: &Vector,
        rot_x: &Rotation,
        rot_z: &Rotation,
    ) -> Self {
        let connected = utils::sqr_magnitude_xy(&(origin - foot)).sqrt() as f64 <= TOLERANCE;
        VertexFoldResult::new(origin, foot, offset, rot_x, rot_z, connected)
    }
}

/// Per-panel fold kinematics, one [`VertexFoldResult`] per slot.
#[derive(Clone, Debug)]
pub(crate) struct PanelFoldResults {
    pub points: [VertexFoldResult; 3],
    pub crease_offset: Vector,
    fold_type: FoldType,
    halfway_rad: Real,
    pub target_rad: Real,
}

impl PanelFoldResults {
    /// Precomputes the kinematics of `panel`, already re-layered for the
    /// fold. `inner` is the innermost folded layer before the fold.
    pub(crate) fn new(panel: &Panel, line: &FoldLine, fold_type: FoldType, inner: i32) -> Self {
        let rot_x = fold_type.quarter_rotation();

        let dif = (panel.layer() - inner).abs() as Real;
        let crease_offset = line.perp * (dif * 2.0 - 1.0);

        let point_at = |slot: usize| {
            let origin = panel.vertex(slot);
            let foot = query::perpendicular_foot(&line.start, &line.dir, &origin);
            VertexFoldResult::new(
                origin,
                foot,
                &crease_offset,
                &rot_x,
                &line.rot_z,
                panel.crease_flags()[slot],
            )
        };

        let points = [point_at(0), point_at(1), point_at(2)];

        PanelFoldResults {
            points,
            crease_offset,
            fold_type,
            halfway_rad: HALF_PI,
            target_rad: PI,
        }
    }

    /// Whether the angle still drives this panel.
    pub(crate) fn continue_folding(&self, rad: Real) -> bool {
        match self.fold_type {
            FoldType::Mountain => rad <= self.target_rad,
            FoldType::Valley => rad >= self.target_rad,
        }
    }

    /// Stage and interpolation parameter for an angle.
    pub(crate) fn offset_data(&self, rad: Real) -> (FoldStage, Real) {
        let radians = self.fold_type.convert_radians(rad);
        if radians <= self.halfway_rad {
            (FoldStage::BeforeHalfway, radians / self.halfway_rad)
        } else {
            (FoldStage::PastHalfway, 1.0)
        }
    }

    /// Moves the panel's vertices to the pose for `rad`.
    pub(crate) fn apply(&self, panel: &mut Panel, adjust: &AdjustResults, rad: Real, rot_z: &Rotation) {
        if !self.continue_folding(rad) {
            return;
        }

        let rot_x = utils::x_rotation(rad);
        let (stage, t) = self.offset_data(rad);

        let mut folded = [Point::origin(); 3];
        match stage {
            FoldStage::BeforeHalfway => {
                let offset = utils::rotated_about(
                    &Point::from(self.crease_offset),
                    &Point::origin(),
                    &rot_x,
                    rot_z,
                )
                .coords
                    * t;
                for (slot, out) in folded.iter_mut().enumerate() {
                    let res = &self.points[slot];
                    if res.connected {
                        let mut v = if adjust.needs_adjustment {
                            let mut v = utils::lerp(&res.origin, &adjust.results[slot], t);
                            v.z = res.origin.z;
                            v
                        } else {
                            res.origin
                        };
                        v += offset;
                        *out = v;
                    } else {
                        *out = utils::rotated_lerped(
                            &res.origin,
                            &res.origin90,
                            &res.mid0,
                            &offset,
                            t,
                            &rot_x,
                            rot_z,
                        );
                    }
                }
            }
            FoldStage::PastHalfway => {
                for (slot, out) in folded.iter_mut().enumerate() {
                    let res = &self.points[slot];
                    if res.connected {
                        *out = if adjust.needs_adjustment {
                            let mut v = adjust.results[slot];
                            v.z = res.origin90.z;
                            v
                        } else {
                            res.origin90
                        };
                    } else {
                        *out = utils::rotated_about(&res.origin90, &res.mid90, &rot_x, rot_z);
                    }
                }
            }
        }

        panel.set_positions(folded);
    }
}

/// Interpolation targets nudging on-crease vertices along the fold line so
/// stacked layers do not land exactly on top of each other.
#[derive(Clone, Debug)]
pub(crate) struct AdjustResults {
    pub needs_adjustment: bool,
    pub target_rad: Real,
    pub results: [Point; 3],
}

impl AdjustResults {
    /// A placeholder for panels that need no adjustment.
    pub(crate) fn empty() -> Self {
        AdjustResults {
            needs_adjustment: false,
            target_rad: 0.0,
            results: [Point::origin(); 3],
        }
    }

    /// Targets for every on-crease vertex of `panel`: the vertex slides
    /// along the layer's shifted direction in proportion to its distance
    /// from the closest intersection.
    pub(crate) fn new(
        panel: &Panel,
        target_rad: Real,
        closest: &Point,
        dir: &Vector,
        base_magnitude: Real,
    ) -> Self {
        let mut results = [Point::origin(); 3];
        for (slot, out) in results.iter_mut().enumerate() {
            if panel.crease_flags()[slot] {
                let origin = panel.vertex(slot);
                let t = (origin - closest).magnitude() / base_magnitude;
                let mut v = closest + dir * t;
                v.z = origin.z;
                *out = v;
            }
        }
        AdjustResults {
            needs_adjustment: true,
            target_rad,
            results,
        }
    }

    /// Like [`AdjustResults::new`], but the adjusted heights come from the
    /// halfway pose since the panel is itself folding.
    pub(crate) fn with_fold_heights(
        panel: &Panel,
        target_rad: Real,
        fold: &PanelFoldResults,
        closest: &Point,
        dir: &Vector,
        base_magnitude: Real,
    ) -> Self {
        let mut adjust = AdjustResults::new(panel, target_rad, closest, dir, base_magnitude);
        for slot in 0..3 {
            if panel.crease_flags()[slot] {
                adjust.results[slot].z = fold.points[slot].origin90.z;
            }
        }
        adjust
    }

    /// Eases the panel's on-crease vertices toward their targets.
    pub(crate) fn apply(&self, panel: &mut Panel, rad: Real) {
        if !self.needs_adjustment {
            return;
        }

        let t = (rad / self.target_rad).min(1.0);

        let mut moved = *panel.vertices();
        for (slot, v) in moved.iter_mut().enumerate() {
            if panel.crease_flags()[slot] {
                *v = utils::lerp(v, &self.results[slot], t);
            }
        }
        panel.set_positions(moved);
    }
}

/// Fold kinematics of an existing crease quad caught by the fold. The
/// bottom and top edges carry separate crease offsets since they sit on
/// different layers.
#[derive(Clone, Debug)]
pub(crate) struct CreaseFoldResults {
    pub corners: [VertexFoldResult; 4],
    pub bottom_offset: Vector,
    pub top_offset: Vector,
    fold_type: FoldType,
    halfway_rad: Real,
    pub target_rad: Real,
}

impl CreaseFoldResults {
    pub(crate) fn new(crease: &Crease, line: &FoldLine, fold_type: FoldType, inner: i32) -> Self {
        let rot_x = fold_type.quarter_rotation();

        let offset_for = |layer: i32| {
            let dif = (layer - inner).abs() as Real;
            line.perp * (dif * 2.0 - 1.0)
        };
        let bottom_offset = offset_for(crease.bottom_layer());
        let top_offset = offset_for(crease.top_layer());

        let corner_at = |slot: usize, offset: &Vector| {
            let origin = crease.corner(slot).point;
            let foot = query::perpendicular_foot(&line.start, &line.dir, &origin);
            VertexFoldResult::from_distance(origin, foot, offset, &rot_x, &line.rot_z)
        };

        let corners = [
            corner_at(0, &bottom_offset),
            corner_at(1, &bottom_offset),
            corner_at(2, &top_offset),
            corner_at(3, &top_offset),
        ];

        CreaseFoldResults {
            corners,
            bottom_offset,
            top_offset,
            fold_type,
            halfway_rad: HALF_PI,
            target_rad: PI,
        }
    }

    fn continue_folding(&self, rad: Real) -> bool {
        match self.fold_type {
            FoldType::Mountain => rad <= self.target_rad,
            FoldType::Valley => self.fold_type.convert_radians(rad) <= self.target_rad,
        }
    }

    fn offset_data(&self, rad: Real) -> (FoldStage, Real) {
        let radians = self.fold_type.convert_radians(rad);
        if radians <= self.halfway_rad {
            (FoldStage::BeforeHalfway, radians / self.halfway_rad)
        } else {
            (FoldStage::PastHalfway, 1.0)
        }
    }

    fn corner_pose(
        &self,
        slot: usize,
        offset_vec: &Vector,
        rad: Real,
        rot_z: &Rotation,
    ) -> Point {
        let res = &self.corners[slot];
        let rot_x = utils::x_rotation(rad);
        let (stage, t) = self.offset_data(rad);
        match stage {
            FoldStage::BeforeHalfway => {
                let offset = utils::rotated_about(
                    &Point::from(*offset_vec),
                    &Point::origin(),
                    &rot_x,
                    rot_z,
                )
                .coords
                    * t;
                utils::rotated_lerped(&res.origin, &res.origin90, &res.mid0, &offset, t, &rot_x, rot_z)
            }
            FoldStage::PastHalfway => {
                utils::rotated_about(&res.origin90, &res.mid90, &rot_x, rot_z)
            }
        }
    }

    /// Moves the crease corners, with the bottom and top edges driven by
    /// their own layer-staggered angles.
    pub(crate) fn apply(&self, crease: &mut Crease, bottom_rad: Real, top_rad: Real, rot_z: &Rotation) {
        if self.continue_folding(bottom_rad) {
            crease.set_corner_point(0, self.corner_pose(0, &self.bottom_offset, bottom_rad, rot_z));
            crease.set_corner_point(1, self.corner_pose(1, &self.bottom_offset, bottom_rad, rot_z));
        }
        if self.continue_folding(top_rad) {
            crease.set_corner_point(2, self.corner_pose(2, &self.top_offset, top_rad, rot_z));
            crease.set_corner_point(3, self.corner_pose(3, &self.top_offset, top_rad, rot_z));
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::math::Point;
    use crate::shape::PanelVertex;
    use approx::relative_eq;

    fn unit_panel_on_crease() -> (Panel, FoldLine) {
        // Right triangle left of the vertical fold line through x = 1,
        // with its hypotenuse endpoints on the line.
        let panel = Panel::from_split(
            PanelVertex::free(Point::new(0.0, 0.0, 0.0)),
            PanelVertex::on_crease(Point::new(1.0, 0.0, 0.0)),
            PanelVertex::on_crease(Point::new(1.0, 1.0, 0.0)),
            0,
            true,
        );
        let line = FoldLine::new(Point::new(1.0, 0.0, 0.0), Point::new(1.0, 2.0, 0.0)).unwrap();
        (panel, line)
    }

    #[test]
    fn rebased_points_rise_by_the_rotated_crease_offset() {
        let (mut panel, line) = unit_panel_on_crease();
        panel.fold_onto_layer(-1);
        let results = PanelFoldResults::new(&panel, &line, FoldType::Mountain, 0);

        // The crease offset is a quarter turn about the fold line away
        // from pointing straight up, so the rebased points sit one crease
        // width above their rest counterparts.
        let free = results.points.iter().find(|p| !p.connected).unwrap();
        assert!(relative_eq!(free.origin, Point::new(0.0, 0.0, 0.0)));
        assert!((free.origin90.x - free.origin.x).abs() < 1.0e-4);
        assert!((free.origin90.y - free.origin.y).abs() < 1.0e-4);
        assert!((free.origin90.z - crate::math::CREASE_WIDTH).abs() < 1.0e-4);
        assert!((free.mid90.z - crate::math::CREASE_WIDTH).abs() < 1.0e-4);
    }

    #[test]
    fn target_pose_mirrors_free_vertices_across_the_line() {
        let (mut panel, line) = unit_panel_on_crease();
        panel.fold_onto_layer(-1);
        let results = PanelFoldResults::new(&panel, &line, FoldType::Mountain, 0);

        let mut folded = panel.clone();
        results.apply(&mut folded, &AdjustResults::empty(), PI, &line.rot_z);

        // (0, 0) reflects to x = 2 (plus the crease-width offset).
        let mirrored = folded
            .vertices()
            .iter()
            .find(|v| v.x > 1.5)
            .copied()
            .unwrap();
        assert!((mirrored.x - 2.0).abs() < 1.0e-2);
        assert!(mirrored.z.abs() < 1.0e-2);
    }

    #[test]
    fn angles_past_the_target_leave_the_panel_alone() {
        let (mut panel, line) = unit_panel_on_crease();
        panel.fold_onto_layer(-1);
        let results = PanelFoldResults::new(&panel, &line, FoldType::Mountain, 0);
        let before = *panel.vertices();
        results.apply(&mut panel, &AdjustResults::empty(), PI + 0.5, &line.rot_z);
        assert_eq!(*panel.vertices(), before);
    }

    #[test]
    fn adjustment_slides_on_crease_vertices_only() {
        let (panel, _line) = unit_panel_on_crease();
        let closest = Point::new(1.0, 0.0, 0.0);
        let dir = Vector::new(0.0, 2.0, 0.0);
        let adjust = AdjustResults::new(&panel, HALF_PI, &closest, &dir, 2.0);

        let mut moved = panel.clone();
        adjust.apply(&mut moved, HALF_PI);

        for slot in 0..3 {
            if panel.crease_flags()[slot] {
                assert!(relative_eq!(
                    moved.vertex(slot),
                    adjust.results[slot],
                    epsilon = 1.0e-5
                ));
            } else {
                assert_eq!(moved.vertex(slot), panel.vertex(slot));
            }
        }
    }
}
