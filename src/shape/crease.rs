use crate::math::Point;
use crate::shape::Panel;
use crate::utils;

/// Binds a crease corner to a panel vertex so the corner follows the panel
/// while a fold animates.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CornerAnchor {
    /// Index of the panel in the owning sheet.
    pub panel: usize,
    /// Vertex slot of that panel.
    pub slot: usize,
}

/// One corner of a crease quad.
#[derive(Copy, Clone, Debug)]
pub struct CreaseCorner {
    /// Position of the corner.
    pub point: Point,
    /// Layer of the paper face this corner sits on.
    pub layer: i32,
    /// Panel vertex this corner tracks, if any.
    pub anchor: Option<CornerAnchor>,
}

impl CreaseCorner {
    /// An unanchored corner.
    #[inline]
    pub fn new(point: Point, layer: i32) -> Self {
        CreaseCorner { point, layer, anchor: None }
    }

    /// A corner tracking the vertex `slot` of `panel`.
    #[inline]
    pub fn anchored(point: Point, layer: i32, panel: usize, slot: usize) -> Self {
        CreaseCorner {
            point,
            layer,
            anchor: Some(CornerAnchor { panel, slot }),
        }
    }
}

/// A thin quad filling the gap a fold opens between two paper faces.
///
/// Corners are stored clockwise as seen from the crease's facing side:
/// slots 0 and 1 span the bottom face, slots 2 and 3 the top face, with
/// slot 3 above slot 0 and slot 2 above slot 1.
#[derive(Clone, Debug)]
pub struct Crease {
    corners: [CreaseCorner; 4],
    facing_up: bool,
}

impl Crease {
    /// Builds a crease from four corners already in slot order.
    pub fn new(corners: [CreaseCorner; 4], facing_up: bool) -> Self {
        Crease { corners, facing_up }
    }

    /// The four corners in slot order.
    #[inline]
    pub fn corners(&self) -> &[CreaseCorner; 4] {
        &self.corners
    }

    /// A single corner.
    #[inline]
    pub fn corner(&self, slot: usize) -> &CreaseCorner {
        &self.corners[slot]
    }

    /// Layer of the bottom edge.
    #[inline]
    pub fn bottom_layer(&self) -> i32 {
        self.corners[0].layer
    }

    /// Layer of the top edge.
    #[inline]
    pub fn top_layer(&self) -> i32 {
        self.corners[2].layer
    }

    /// Whether the crease faces the same way as the panels it joins.
    #[inline]
    pub fn facing_up(&self) -> bool {
        self.facing_up
    }

    #[inline]
    pub(crate) fn set_corner_point(&mut self, slot: usize, point: Point) {
        self.corners[slot].point = point;
    }

    #[inline]
    pub(crate) fn set_corners(&mut self, corners: [CreaseCorner; 4]) {
        self.corners = corners;
    }

    /// Reassigns the slot layers: slots 0 and 1 take `bottom`, 2 and 3
    /// take `top`.
    pub(crate) fn set_layers(&mut self, bottom: i32, top: i32) {
        self.corners[0].layer = bottom;
        self.corners[1].layer = bottom;
        self.corners[2].layer = top;
        self.corners[3].layer = top;
    }

    pub(crate) fn update_info(&mut self, bottom: i32, top: i32, facing_up: bool) {
        self.set_layers(bottom, top);
        self.facing_up = facing_up;
    }

    /// Pulls every anchored corner onto the current position of the panel
    /// vertex it tracks.
    pub(crate) fn sync_anchors(&mut self, panels: &[Panel]) {
        for corner in &mut self.corners {
            if let Some(anchor) = corner.anchor {
                if let Some(panel) = panels.get(anchor.panel) {
                    corner.point = panel.vertex(anchor.slot);
                }
            }
        }
    }

    /// Once a fold completes the crease is upside down relative to its
    /// stored order: bottom and top swap, along with the corner pairs.
    pub(crate) fn commit_fold(&mut self) {
        self.corners.swap(0, 3);
        self.corners.swap(1, 2);
    }

    /// Reorders four corners into the slot convention, keeping each
    /// corner's layer and anchor with its position.
    ///
    /// The first two corners are brought onto the same layer by swapping,
    /// then the remaining three are placed around the first by orientation
    /// in the XZ plane and by angular proximity when two fall on the same
    /// side.
    pub(crate) fn ordered(mut corners: [CreaseCorner; 4]) -> [CreaseCorner; 4] {
        if corners[0].layer != corners[1].layer {
            if corners[0].layer == corners[2].layer {
                corners.swap(1, 2);
            } else {
                corners.swap(1, 3);
            }
        }

        let v21 = utils::normalize_or_zero(&(corners[1].point - corners[0].point));
        let v31 = utils::normalize_or_zero(&(corners[2].point - corners[0].point));
        let v41 = utils::normalize_or_zero(&(corners[3].point - corners[0].point));

        let cross1 = utils::cross2d_xz(&v21, &v31);
        let cross2 = utils::cross2d_xz(&v21, &v41);

        let [c1, c2, c3, c4] = corners;

        if cross1 > 0.0 && cross2 > 0.0 {
            if v21.dot(&v31) > v21.dot(&v41) {
                [c2, c1, c4, c3]
            } else {
                [c2, c1, c3, c4]
            }
        } else if cross1 > 0.0 {
            [c1, c3, c2, c4]
        } else if cross2 > 0.0 {
            [c1, c4, c2, c3]
        } else if v21.dot(&v31) > v21.dot(&v41) {
            [c1, c2, c3, c4]
        } else {
            [c1, c2, c4, c3]
        }
    }
}
