//! Crease generation along the fold boundary. Folding opens a gap the
//! paper's thickness wide between the folded and stationary halves; this
//! pass bridges it per layer with a thin anchored quad spanning the two
//! outermost split vertices.

use crate::fold::partition::SplitInfo;
use crate::fold::FoldLine;
use crate::math::{Point, TOLERANCE_LOW};
use crate::shape::{Crease, CreaseCorner, Sheet};
use crate::utils;

/// Builds one crease per split layer group, anchored to the panel vertices
/// recorded during partitioning, and appends them to the sheet. Returns
/// the indices of the new creases.
///
/// Folding panels must already carry their post-fold layers: the crease
/// corners read the current layer of the panel they anchor to.
pub(crate) fn generate_squashed_creases(
    sheet: &mut Sheet,
    split_infos: &[SplitInfo],
    line: &FoldLine,
) -> Vec<usize> {
    if split_infos.is_empty() {
        log::error!("no split records to generate creases from");
        return Vec::new();
    }

    let mut infos = split_infos.to_vec();
    infos.sort_by_key(|info| sheet.panels()[info.nonfold_panel].layer());

    let start_layer = sheet.panels()[infos[0].nonfold_panel].layer();
    let end_layer = sheet.panels()[infos[infos.len() - 1].nonfold_panel].layer() + 1;

    let mut generated = Vec::new();
    let mut idx = 0;

    for layer in start_layer..end_layer {
        if idx >= infos.len() {
            break;
        }
        // Groups are contiguous after the sort; a missing layer simply has
        // no intersections.
        if sheet.panels()[infos[idx].nonfold_panel].layer() != layer {
            continue;
        }

        let mut closest = idx;
        let mut furthest = idx;
        while idx < infos.len() && sheet.panels()[infos[idx].nonfold_panel].layer() == layer {
            let dis = utils::sqr_magnitude_xy(&(infos[idx].point - line.start));
            let closest_dis = utils::sqr_magnitude_xy(&(infos[closest].point - line.start));
            if dis < closest_dis {
                closest = idx;
            }

            let furthest_dis = utils::sqr_magnitude_xy(&(infos[furthest].point - line.start));
            if ((dis - furthest_dis).abs() as f64) <= TOLERANCE_LOW {
                // Equidistant candidates: prefer the one whose stationary
                // panel extends along the fold direction.
                if centroid_alignment(sheet, &infos[idx], &infos[furthest].point, line)
                    > centroid_alignment(sheet, &infos[furthest], &infos[furthest].point, line)
                {
                    furthest = idx;
                }
            } else if dis > furthest_dis {
                furthest = idx;
            }
            idx += 1;
        }

        let closest = infos[closest];
        let furthest = infos[furthest];

        // Corners run folded-closest, folded-furthest, stationary-furthest,
        // stationary-closest so the quad's normal matches the panels'.
        let corner = |point: Point, panel: usize, slot: usize| {
            CreaseCorner::anchored(point, sheet.panels()[panel].layer(), panel, slot)
        };
        let corners = [
            corner(closest.point, closest.fold_panel, closest.fold_slot),
            corner(furthest.point, furthest.fold_panel, furthest.fold_slot),
            corner(furthest.point, furthest.nonfold_panel, furthest.nonfold_slot),
            corner(closest.point, closest.nonfold_panel, closest.nonfold_slot),
        ];

        let facing_up = sheet.panels()[closest.nonfold_panel].facing_up();
        generated.push(sheet.push_crease(Crease::new(corners, facing_up)));
    }

    generated
}

/// How well the direction from `from` toward the stationary panel's
/// centroid lines up with the fold line.
fn centroid_alignment(sheet: &Sheet, info: &SplitInfo, from: &Point, line: &FoldLine) -> f32 {
    let centroid = sheet.panels()[info.nonfold_panel].centroid();
    let mut dir = centroid - from;
    dir.z = 0.0;
    utils::dot2d(&line.dir_norm, &utils::normalize_or_zero(&dir))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::fold::partition::SplitInfo;
    use crate::fold::FoldLine;
    use crate::math::Point;
    use crate::shape::Panel;

    fn info(point: Point, nonfold: usize, fold: usize) -> SplitInfo {
        SplitInfo {
            point,
            nonfold_panel: nonfold,
            nonfold_slot: 0,
            fold_panel: fold,
            fold_slot: 0,
        }
    }

    #[test]
    fn crease_bridges_the_extreme_split_vertices() {
        let mut sheet = Sheet::new();
        // Stationary half right of the line, folding half already
        // re-layered onto -1.
        let nonfold = sheet.push_panel(Panel::new(
            Point::new(1.0, 0.0, 0.0),
            Point::new(1.0, 2.0, 0.0),
            Point::new(2.0, 1.0, 0.0),
        ));
        let fold = sheet.push_panel(Panel::with_state(
            Point::new(1.0, 0.0, 0.0),
            Point::new(1.0, 2.0, 0.0),
            Point::new(0.0, 1.0, 0.0),
            -1,
            false,
        ));

        let line = FoldLine::new(Point::new(1.0, -1.0, 0.0), Point::new(1.0, 3.0, 0.0)).unwrap();
        let infos = [
            info(Point::new(1.0, 2.0, 0.0), nonfold, fold),
            info(Point::new(1.0, 0.0, 0.0), nonfold, fold),
        ];

        let generated = generate_squashed_creases(&mut sheet, &infos, &line);
        assert_eq!(generated, vec![0]);
        assert_eq!(sheet.creases().len(), 1);

        let crease = &sheet.creases()[0];
        // Bottom pair tracks the folded panel, top pair the stationary one.
        assert_eq!(crease.bottom_layer(), -1);
        assert_eq!(crease.top_layer(), 0);
        assert!(crease.facing_up());
        // Closest to the line start is (1, 0); it lands in the first and
        // last slots.
        assert_eq!(crease.corner(0).point, Point::new(1.0, 0.0, 0.0));
        assert_eq!(crease.corner(1).point, Point::new(1.0, 2.0, 0.0));
        assert_eq!(crease.corner(2).point, Point::new(1.0, 2.0, 0.0));
        assert_eq!(crease.corner(3).point, Point::new(1.0, 0.0, 0.0));
        for slot in 0..4 {
            let anchor = crease.corner(slot).anchor.unwrap();
            let expected = if slot < 2 { fold } else { nonfold };
            assert_eq!(anchor.panel, expected);
        }
    }

    #[test]
    fn equidistant_tie_breaks_toward_the_fold_direction() {
        let mut sheet = Sheet::new();
        // Two stationary panels at the same distance from the start, one
        // extending along the fold direction and one against it.
        let behind = sheet.push_panel(Panel::new(
            Point::new(1.0, 0.0, 0.0),
            Point::new(0.0, 0.0, 0.0),
            Point::new(1.0, -1.0, 0.0),
        ));
        let ahead = sheet.push_panel(Panel::new(
            Point::new(1.0, 2.0, 0.0),
            Point::new(0.0, 2.0, 0.0),
            Point::new(1.0, 3.0, 0.0),
        ));
        let fold = sheet.push_panel(Panel::with_state(
            Point::new(1.0, 0.0, 0.0),
            Point::new(1.0, 2.0, 0.0),
            Point::new(2.0, 1.0, 0.0),
            0,
            true,
        ));

        // Both split vertices are one unit from the start at (1, 1).
        let line = FoldLine::new(Point::new(1.0, 1.0, 0.0), Point::new(1.0, 5.0, 0.0)).unwrap();
        let infos = [
            info(Point::new(1.0, 0.0, 0.0), behind, fold),
            info(Point::new(1.0, 2.0, 0.0), ahead, fold),
        ];

        generate_squashed_creases(&mut sheet, &infos, &line);
        let crease = &sheet.creases()[0];
        // The furthest slot pair carries the vertex whose panel points the
        // same way as the line.
        assert_eq!(crease.corner(1).point, Point::new(1.0, 2.0, 0.0));
        assert_eq!(crease.corner(3).point, Point::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn empty_split_list_generates_nothing() {
        let mut sheet = Sheet::new();
        let line = FoldLine::new(Point::origin(), Point::new(1.0, 0.0, 0.0)).unwrap();
        assert!(generate_squashed_creases(&mut sheet, &[], &line).is_empty());
        assert!(sheet.creases().is_empty());
    }
}
