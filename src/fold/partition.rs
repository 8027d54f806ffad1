//! Re-triangulation of panels straddling the fold line. Every panel the
//! line crosses is split so the fold boundary is exactly represented, and
//! the panel pairs sharing a new boundary edge are recorded for the
//! gap-fill pass.

use smallvec::SmallVec;

use crate::fold::{layering, FoldError, FoldLine};
use crate::math::{Point, TOLERANCE};
use crate::query::{self, segment_intersection, SideSign};
use crate::shape::{Crease, CreaseCorner, Panel, PanelVertex, Sheet};
use crate::utils;

/// Adjacency record for two panels that share a vertex on the fold line,
/// one on each side of it.
#[derive(Copy, Clone, Debug)]
pub(crate) struct SplitInfo {
    /// Position of the shared vertex.
    pub point: Point,
    /// Index of the stationary panel.
    pub nonfold_panel: usize,
    /// Vertex slot of the shared vertex in the stationary panel.
    pub nonfold_slot: usize,
    /// Index of the folding panel.
    pub fold_panel: usize,
    /// Vertex slot of the shared vertex in the folding panel.
    pub fold_slot: usize,
}

/// An intersection vertex kept per spanned layer, remembering whether the
/// panel edge that produced it was already glued to a crease.
#[derive(Copy, Clone, Debug)]
pub(crate) struct BoundaryVertex {
    /// Position of the vertex.
    pub point: Point,
    /// Layer the vertex belongs to.
    pub layer: i32,
    /// Whether the producing edge touched a crease before this fold.
    pub connected: bool,
}

/// Everything the rest of the fold setup needs from the partitioning pass.
#[derive(Clone, Debug)]
pub(crate) struct Partition {
    /// Intersection closest to the fold line's start.
    pub closest: Point,
    /// Furthest intersection on the unshifted fold line, one per layer.
    /// Entry `i` belongs to the layer `i` steps in from the outer layer.
    pub furthest_on_line: Vec<BoundaryVertex>,
    /// Furthest intersection on the per-layer shifted lines, parallel to
    /// [`Partition::furthest_on_line`].
    pub furthest_altered: Vec<BoundaryVertex>,
    /// Adjacency records feeding the gap-fill pass.
    pub split_infos: Vec<SplitInfo>,
}

/// Splits every panel the fold line crosses, in place on the sheet.
///
/// `start_points` holds the per-layer shifted line origins; its length
/// covers the whole layer span of the fold. Panels entirely on one side
/// only get their crease flags reset. A panel with an edge on the line is
/// not split; it is flagged and paired with its opposite-side neighbors
/// afterwards, since the line alone cannot tell whether the edge is a
/// shared boundary or the paper's rim.
pub(crate) fn partition_panels(
    sheet: &mut Sheet,
    line: &FoldLine,
    start_points: &[Point],
    inner: i32,
    outer: i32,
) -> Result<Partition, FoldError> {
    let original_len = sheet.panels.len();
    let inc: i32 = if inner > outer { 1 } else { -1 };

    let mut closest = line.start + line.dir;
    let mut furthest_on_line = Vec::with_capacity(start_points.len());
    let mut furthest_altered = Vec::with_capacity(start_points.len());
    for i in 0..start_points.len() {
        let entry = BoundaryVertex {
            point: line.start,
            layer: outer + inc * i as i32,
            connected: true,
        };
        furthest_on_line.push(entry);
        furthest_altered.push(entry);
    }

    let mut split_infos = Vec::new();
    // Panels with an edge on the line, with the side value of the lone
    // off-line vertex. Matching pairs are searched once all panels are
    // classified.
    let mut edge_on_line: Vec<(f64, usize)> = Vec::new();

    for idx in 0..original_len {
        let vertices = *sheet.panels[idx].vertices();
        let flags = *sheet.panels[idx].crease_flags();
        let layer = sheet.panels[idx].layer();
        let facing_up = sheet.panels[idx].facing_up();

        let res = query::sides_of_triangle(&line.start, &line.dir_norm, &vertices);

        let mut zeros: SmallVec<[usize; 3]> = SmallVec::new();
        let mut nonzeros: SmallVec<[usize; 3]> = SmallVec::new();
        for (i, &r) in res.iter().enumerate() {
            match SideSign::of(r) {
                SideSign::OnLine => zeros.push(i),
                _ => nonzeros.push(i),
            }
        }

        // Strictly one side of the line: nothing to split.
        if zeros.is_empty() && (res.iter().all(|&r| r > 0.0) || res.iter().all(|&r| r < 0.0)) {
            sheet.panels[idx].clear_crease_flags();
            continue;
        }

        match zeros.len() {
            0 => {
                // The line crosses the interior: a 3-way split.
                let mut majority: SmallVec<[usize; 3]> = SmallVec::new();
                let mut minority: SmallVec<[usize; 3]> = SmallVec::new();
                for i in 0..3 {
                    if res[i] > 0.0 {
                        majority.push(i);
                    } else {
                        minority.push(i);
                    }
                }
                if majority.len() < minority.len() {
                    core::mem::swap(&mut majority, &mut minority);
                }
                let min_idx = minority[0];
                let min_point = vertices[min_idx];

                let dif = layering::layer_distance(layer, outer);

                let mut mids = [Point::origin(); 2];
                let mut intersected = true;
                for (i, &maj) in majority.iter().enumerate() {
                    let edge = vertices[maj] - min_point;
                    match segment_intersection(&line.start, &line.dir, &min_point, &edge, min_point.z)
                    {
                        Some(mid) => mids[i] = mid,
                        None => {
                            intersected = false;
                            break;
                        }
                    }
                }
                if !intersected {
                    log::error!(
                        "panel {} straddles the fold line but an edge intersection is missing",
                        idx
                    );
                    continue;
                }

                for (i, &maj) in majority.iter().enumerate() {
                    set_closest_and_furthest(
                        &line.start,
                        &mids[i],
                        &mut closest,
                        &mut furthest_on_line[dif],
                    );
                    let connected = flags[maj] & flags[min_idx];
                    if dif == 0 {
                        update_if_further(&line.start, &mids[i], &mut furthest_altered[0], connected);
                    } else if let Some(point) = segment_intersection(
                        &start_points[dif],
                        &line.dir,
                        &min_point,
                        &(vertices[maj] - min_point),
                        0.0,
                    ) {
                        update_if_further(&line.start, &point, &mut furthest_altered[dif], connected);
                    }
                }

                let mid0 = PanelVertex::on_crease(mids[0]);
                let mid1 = PanelVertex::on_crease(mids[1]);
                let maj0 = PanelVertex::free(vertices[majority[0]]);
                let maj1 = PanelVertex::free(vertices[majority[1]]);

                let quad_half = Panel::from_split(mid0, maj0, mid1, layer, facing_up);
                let quad_half_idx = sheet.panels.len();
                sheet.panels.push(quad_half);

                // The quad left between the two intersections and the two
                // majority vertices is split along whichever diagonal
                // yields the more acute triangle.
                let base = maj1.point - maj0.point;
                let base_mag = utils::sqr_magnitude_xy(&base).sqrt();
                let to_mid0 = mid0.point - maj0.point;
                let cos0 = utils::dot2d(&base, &to_mid0)
                    / (base_mag * utils::sqr_magnitude_xy(&to_mid0).sqrt());
                let to_mid1 = mid1.point - maj0.point;
                let cos1 = utils::dot2d(&base, &to_mid1)
                    / (base_mag * utils::sqr_magnitude_xy(&to_mid1).sqrt());
                let diagonal = if cos0 > cos1 { mid0 } else { mid1 };
                sheet
                    .panels
                    .push(Panel::from_split(diagonal, maj0, maj1, layer, facing_up));

                sheet.panels[idx].set_vertices_sorted(mid0, PanelVertex::free(min_point), mid1);

                let (fold, nonfold) = if res[min_idx] > -TOLERANCE {
                    (idx, quad_half_idx)
                } else {
                    (quad_half_idx, idx)
                };
                split_infos.push(split_info(&sheet.panels, nonfold, 0, fold, 0)?);
                let (lslot, rslot) = crease_slots(&sheet.panels, nonfold, fold);
                split_infos.push(split_info(&sheet.panels, nonfold, lslot, fold, rslot)?);
            }
            1 => {
                let (nz0, nz1) = (nonzeros[0], nonzeros[1]);
                // Both off-line vertices on the same side: the line only
                // touches a corner, so there is nothing to split.
                if res[nz0] > 0.0 && res[nz1] > 0.0 || res[nz0] < 0.0 && res[nz1] < 0.0 {
                    sheet.panels[idx].clear_crease_flags();
                    continue;
                }

                let edge = vertices[nz0] - vertices[nz1];
                let mid = match segment_intersection(
                    &line.start,
                    &line.dir,
                    &vertices[nz1],
                    &edge,
                    vertices[nz1].z,
                ) {
                    Some(mid) => mid,
                    None => {
                        log::error!(
                            "panel {} straddles the fold line but the edge intersection is missing",
                            idx
                        );
                        continue;
                    }
                };

                let dif = layering::layer_distance(layer, outer);

                // The on-line vertex is itself an intersection.
                set_closest_and_furthest(
                    &line.start,
                    &vertices[zeros[0]],
                    &mut closest,
                    &mut furthest_on_line[dif],
                );

                let connected = flags[nz0] & flags[nz1];
                if dif == 0 {
                    update_if_further(&line.start, &mid, &mut furthest_altered[0], connected);
                } else if let Some(point) =
                    segment_intersection(&start_points[dif], &line.dir, &vertices[nz1], &edge, 0.0)
                {
                    update_if_further(&line.start, &point, &mut furthest_altered[dif], connected);
                }

                let vx1 = PanelVertex::on_crease(vertices[zeros[0]]);
                let mid = PanelVertex::on_crease(mid);

                let new_idx = sheet.panels.len();
                sheet.panels.push(Panel::from_split(
                    vx1,
                    mid,
                    PanelVertex::free(vertices[nz0]),
                    layer,
                    facing_up,
                ));
                sheet.panels[idx].set_vertices_sorted(vx1, mid, PanelVertex::free(vertices[nz1]));

                // Both halves keep the on-line vertex in slot 0, since the
                // clockwise sort leaves the first vertex in place.
                let (fold, nonfold) = if res[nz0] > -TOLERANCE {
                    (new_idx, idx)
                } else {
                    (idx, new_idx)
                };
                split_infos.push(split_info(&sheet.panels, nonfold, 0, fold, 0)?);
                let (lslot, rslot) = crease_slots(&sheet.panels, nonfold, fold);
                split_infos.push(split_info(&sheet.panels, nonfold, lslot, fold, rslot)?);

                set_closest_and_furthest(
                    &line.start,
                    &mid.point,
                    &mut closest,
                    &mut furthest_on_line[dif],
                );
            }
            2 => {
                // A whole edge lies on the line. No split is needed, but
                // the endpoints are flagged and the panel is paired with
                // its opposite-side neighbors once the loop is done.
                let (z0, z1) = (zeros[0], zeros[1]);

                // A panel whose free vertex stays on the stationary side is
                // not a fold candidate, so its layer can lie outside the
                // folded span; it contributes no boundary extremes.
                let dif = layering::layer_distance(layer, outer);
                if dif < furthest_on_line.len() {
                    for &z in &[z0, z1] {
                        set_closest_and_furthest(
                            &line.start,
                            &vertices[z],
                            &mut closest,
                            &mut furthest_on_line[dif],
                        );
                    }
                    let connected = flags[z0] & flags[z1];
                    update_if_further(&line.start, &vertices[z0], &mut furthest_altered[dif], connected);
                    update_if_further(&line.start, &vertices[z1], &mut furthest_altered[dif], connected);
                }

                sheet.panels[idx].set_vertices_sorted(
                    PanelVertex::on_crease(vertices[z0]),
                    PanelVertex::on_crease(vertices[z1]),
                    PanelVertex::free(vertices[nonzeros[0]]),
                );

                edge_on_line.push((res[nonzeros[0]], idx));
            }
            _ => {
                log::error!("panel {} has all three vertices on the fold line", idx);
                continue;
            }
        }
    }

    // Pair up the edge-on-line panels across the line. Pairs entirely on
    // the folding side share the crease itself, not a split boundary.
    if edge_on_line.len() >= 2 {
        for i in 0..edge_on_line.len() - 1 {
            for k in i + 1..edge_on_line.len() {
                if edge_on_line[i].0 > 0.0 && edge_on_line[k].0 > 0.0 {
                    continue;
                }
                // The folding-side panel goes in the fold seat.
                let (nonfold, fold) = if edge_on_line[i].0 > 0.0 {
                    (edge_on_line[k].1, edge_on_line[i].1)
                } else {
                    (edge_on_line[i].1, edge_on_line[k].1)
                };
                split_infos.extend(shared_split_infos(&sheet.panels, nonfold, fold));
            }
        }
    }

    Ok(Partition {
        closest,
        furthest_on_line,
        furthest_altered,
        split_infos,
    })
}

/// Splits every crease the fold line crosses, appending the new halves to
/// the sheet. Returns `true` when a split lands on the furthest
/// intersection found by the panel pass, which marks the fold line as
/// ending on existing creases.
pub(crate) fn split_creases(sheet: &mut Sheet, line: &FoldLine, furthest: &Point) -> bool {
    let mut splits_on_furthest = false;
    let mut new_creases = Vec::new();

    for crease in &mut sheet.creases {
        let bottom_layer = crease.bottom_layer();
        let top_layer = crease.top_layer();

        // A crease quad stands upright, so its two bottom corners decide
        // which sides it touches. The raw side values are used here; a
        // corner exactly on the line means no split.
        let offset = utils::normalize_or_zero(&(crease.corner(0).point - line.start));
        let res1 = utils::cross2d_xy(&line.dir_norm, &offset);
        let offset = utils::normalize_or_zero(&(crease.corner(2).point - line.start));
        let res2 = utils::cross2d_xy(&line.dir_norm, &offset);

        if (0.0 <= res1 && 0.0 <= res2) || (0.0 >= res1 && 0.0 >= res2) {
            continue;
        }

        let bottom0 = *crease.corner(0);
        let bottom_edge = crease.corner(1).point - bottom0.point;
        let mid1 = match segment_intersection(
            &line.start,
            &line.dir,
            &bottom0.point,
            &bottom_edge,
            bottom0.point.z,
        ) {
            Some(mid) => mid,
            None => continue,
        };
        let mid2 = Point::new(mid1.x, mid1.y, crease.corner(2).point.z);

        let split = Crease::ordered([
            CreaseCorner::new(mid1, bottom_layer),
            *crease.corner(1),
            *crease.corner(2),
            CreaseCorner::new(mid2, top_layer),
        ]);
        new_creases.push(Crease::new(split, crease.facing_up()));

        let kept = Crease::ordered([
            bottom0,
            CreaseCorner::new(mid1, bottom_layer),
            CreaseCorner::new(mid2, top_layer),
            *crease.corner(3),
        ]);
        crease.set_corners(kept);
        crease.set_layers(bottom_layer, top_layer);

        let gap = mid1 - furthest;
        if ((gap.x * gap.x + gap.y * gap.y) as f64) < TOLERANCE {
            splits_on_furthest = true;
        }
    }

    for crease in new_creases {
        sheet.creases.push(crease);
    }
    splits_on_furthest
}

/// Builds the adjacency record for a known slot pair, verifying the two
/// panels agree on layer and vertex position.
fn split_info(
    panels: &[Panel],
    nonfold: usize,
    nonfold_slot: usize,
    fold: usize,
    fold_slot: usize,
) -> Result<SplitInfo, FoldError> {
    let left = &panels[nonfold];
    let right = &panels[fold];
    if left.layer() != right.layer() {
        return Err(FoldError::LayerMismatch {
            left: left.layer(),
            right: right.layer(),
        });
    }
    let a = left.vertex(nonfold_slot);
    let b = right.vertex(fold_slot);
    if (((a - b).norm_squared()) as f64) < TOLERANCE {
        Ok(SplitInfo {
            point: a,
            nonfold_panel: nonfold,
            nonfold_slot,
            fold_panel: fold,
            fold_slot,
        })
    } else {
        Err(FoldError::SharedVertexMismatch { nonfold, fold })
    }
}

/// Searches two panels for every vertex they share, used when neither slot
/// is known up front. Panels on different layers share nothing.
fn shared_split_infos(panels: &[Panel], nonfold: usize, fold: usize) -> Vec<SplitInfo> {
    let mut infos = Vec::new();
    if panels[nonfold].layer() != panels[fold].layer() {
        return infos;
    }
    for i in 0..3 {
        for k in 0..3 {
            let a = panels[nonfold].vertex(i);
            let b = panels[fold].vertex(k);
            if (((a - b).norm_squared()) as f64) < TOLERANCE {
                infos.push(SplitInfo {
                    point: a,
                    nonfold_panel: nonfold,
                    nonfold_slot: i,
                    fold_panel: fold,
                    fold_slot: k,
                });
            }
        }
    }
    infos
}

/// Slot of the second shared vertex in each half of a split pair. The
/// first shared vertex sits in slot 0 of both halves, and the second is
/// whichever of the remaining slots carries the crease flag.
fn crease_slots(panels: &[Panel], nonfold: usize, fold: usize) -> (usize, usize) {
    let l = if panels[nonfold].crease_flags()[1] { 1 } else { 2 };
    let r = if panels[fold].crease_flags()[1] { 1 } else { 2 };
    (l, r)
}

fn set_closest_and_furthest(
    start: &Point,
    vertex: &Point,
    closest: &mut Point,
    furthest: &mut BoundaryVertex,
) {
    let v_sqr = utils::sqr_magnitude_xy(&(vertex - start));
    if v_sqr < utils::sqr_magnitude_xy(&(*closest - start)) {
        *closest = *vertex;
    }
    if v_sqr > utils::sqr_magnitude_xy(&(furthest.point - start)) {
        furthest.point = *vertex;
    }
}

fn update_if_further(start: &Point, candidate: &Point, entry: &mut BoundaryVertex, connected: bool) {
    let current = utils::sqr_magnitude_xy(&(entry.point - start));
    let offered = utils::sqr_magnitude_xy(&(candidate - start));
    if offered > current {
        entry.point = *candidate;
        entry.connected = connected;
    }
}
