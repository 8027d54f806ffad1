use crate::math::Point;
use crate::utils;

/// A triangle vertex together with its crease-boundary flag, used while
/// (re)building panels during partitioning.
#[derive(Copy, Clone, Debug)]
pub struct PanelVertex {
    /// Position of the vertex.
    pub point: Point,
    /// `true` when the vertex lies on the crease line of the current fold.
    pub on_crease: bool,
}

impl PanelVertex {
    /// A vertex flagged as lying on the crease line.
    #[inline]
    pub fn on_crease(point: Point) -> Self {
        PanelVertex { point, on_crease: true }
    }

    /// A vertex away from the crease line.
    #[inline]
    pub fn free(point: Point) -> Self {
        PanelVertex { point, on_crease: false }
    }
}

/// Reorders three vertices into clockwise winding as seen from +Z, keeping
/// the first vertex in place.
pub fn sorted_clockwise(v1: PanelVertex, v2: PanelVertex, v3: PanelVertex) -> [PanelVertex; 3] {
    let cross = utils::cross2d_xy(&(v2.point - v1.point), &(v3.point - v1.point));
    if cross > 0.0 {
        [v1, v3, v2]
    } else {
        [v1, v2, v3]
    }
}

/// A triangular facet of the sheet. Panels never bend: folding only ever
/// moves whole panels, so any fold line crossing a panel first splits it.
#[derive(Clone, Debug)]
pub struct Panel {
    vertices: [Point; 3],
    on_crease: [bool; 3],
    layer: i32,
    facing_up: bool,
}

impl Panel {
    /// Builds a panel at layer 0, facing up, from three vertices in any
    /// winding. The vertices are stored clockwise with the first in place.
    pub fn new(v1: Point, v2: Point, v3: Point) -> Self {
        Panel::with_state(v1, v2, v3, 0, true)
    }

    /// Builds a panel with an explicit layer and facing.
    pub fn with_state(v1: Point, v2: Point, v3: Point, layer: i32, facing_up: bool) -> Self {
        let sorted = sorted_clockwise(
            PanelVertex::free(v1),
            PanelVertex::free(v2),
            PanelVertex::free(v3),
        );
        Panel {
            vertices: [sorted[0].point, sorted[1].point, sorted[2].point],
            on_crease: [false; 3],
            layer,
            facing_up,
        }
    }

    /// Builds a panel from split-product vertices carrying crease flags,
    /// inheriting `layer` and `facing_up` from the panel that was split.
    pub(crate) fn from_split(
        v1: PanelVertex,
        v2: PanelVertex,
        v3: PanelVertex,
        layer: i32,
        facing_up: bool,
    ) -> Self {
        let sorted = sorted_clockwise(v1, v2, v3);
        Panel {
            vertices: [sorted[0].point, sorted[1].point, sorted[2].point],
            on_crease: [sorted[0].on_crease, sorted[1].on_crease, sorted[2].on_crease],
            layer,
            facing_up,
        }
    }

    /// Vertex positions in clockwise slot order.
    #[inline]
    pub fn vertices(&self) -> &[Point; 3] {
        &self.vertices
    }

    /// Position of the vertex in `slot`.
    #[inline]
    pub fn vertex(&self, slot: usize) -> Point {
        self.vertices[slot]
    }

    /// Crease-boundary flags, parallel to [`Panel::vertices`].
    #[inline]
    pub fn crease_flags(&self) -> &[bool; 3] {
        &self.on_crease
    }

    /// Stacking layer of this panel. Lower values are further down.
    #[inline]
    pub fn layer(&self) -> i32 {
        self.layer
    }

    /// Whether the panel's front face currently points up.
    #[inline]
    pub fn facing_up(&self) -> bool {
        self.facing_up
    }

    /// Centroid of the triangle.
    #[inline]
    pub fn centroid(&self) -> Point {
        let sum = self.vertices[0].coords + self.vertices[1].coords + self.vertices[2].coords;
        Point::from(sum / 3.0)
    }

    /// Twice the signed area of the XY projection; clockwise panels report
    /// a negative value.
    #[inline]
    pub fn double_signed_area_xy(&self) -> f64 {
        utils::cross2d_xy(
            &(self.vertices[1] - self.vertices[0]),
            &(self.vertices[2] - self.vertices[0]),
        )
    }

    /// Replaces the vertices (and flags) after re-sorting them clockwise.
    pub(crate) fn set_vertices_sorted(&mut self, v1: PanelVertex, v2: PanelVertex, v3: PanelVertex) {
        let sorted = sorted_clockwise(v1, v2, v3);
        self.vertices = [sorted[0].point, sorted[1].point, sorted[2].point];
        self.on_crease = [sorted[0].on_crease, sorted[1].on_crease, sorted[2].on_crease];
    }

    /// Moves the vertices without touching winding or flags. Used while a
    /// fold animates, where positions change but connectivity does not.
    #[inline]
    pub(crate) fn set_positions(&mut self, positions: [Point; 3]) {
        self.vertices = positions;
    }

    #[inline]
    pub(crate) fn clear_crease_flags(&mut self) {
        self.on_crease = [false; 3];
    }

    /// Re-layers the panel and flips its facing, as happens to every panel
    /// carried over the crease by a fold.
    #[inline]
    pub(crate) fn fold_onto_layer(&mut self, layer: i32) {
        self.layer = layer;
        self.facing_up = !self.facing_up;
    }
}
