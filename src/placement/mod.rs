//! Neighbour detection and drilling-feature placement.
//!
//! Two boards are in contact when an edge face of one descends (via the
//! clip lineage) from the cap linked opposite a face of the other. Each
//! contact selects a fitting set from the joint table and anchors it on
//! the contact segment, drilling the edge board's band face and the flat
//! board's machined face.

mod templates;

use tracing::{debug, warn};

use crate::error::{OperationError, Result};
use crate::math::Point3;
use crate::topology::{Alesage, DrillTarget, FaceId, FaceStore, FunctionalBlock, Zone};

/// Contact segments longer than this get fittings near both ends rather
/// than one in the middle.
const DOUBLE_FITTING_SPAN: f64 = 200.0;
/// An edge face joins a flat face only when near-perpendicular to the
/// edge board's machined plane.
const EDGE_ALIGNMENT_LIMIT: f64 = 0.05;
const BEVEL_DETECTION_LIMIT: f64 = 0.01;

/// Resolves every board-to-board contact and drills the fittings.
///
/// Placeholder zones and sliding rails take no hardware and are ignored.
/// A contact whose anchor segment cannot be resolved is logged and
/// skipped; everything else is drilled in place.
///
/// # Errors
///
/// Returns an error if a lineage face has been removed from the store.
pub fn place_features(store: &mut FaceStore, boards: &mut [Zone]) -> Result<()> {
    let active: Vec<usize> = boards
        .iter()
        .enumerate()
        .filter(|(_, b)| b.is_board && b.block != Some(FunctionalBlock::SlideRail))
        .map(|(i, _)| i)
        .collect();

    mark_bevels(store, boards, &active)?;

    let mut planned: Vec<(FaceId, Alesage)> = Vec::new();
    for &flat_idx in &active {
        for &edge_idx in &active {
            if flat_idx == edge_idx {
                continue;
            }
            plan_contacts(store, &boards[flat_idx], &boards[edge_idx], &mut planned)?;
        }
    }
    debug!(fittings = planned.len(), "placement");
    for (face, hole) in planned {
        store.face_mut(face)?.alesages.push(hole);
    }
    Ok(())
}

/// Flags boards whose cut bands are not perpendicular to the board plane
/// (sloped-top carcasses) with the band's tilt in degrees.
fn mark_bevels(store: &FaceStore, boards: &mut [Zone], active: &[usize]) -> Result<()> {
    for &i in active {
        let board = &mut boards[i];
        let Some(mid) = board.mid_plane else { continue };
        for &id in &board.faces {
            let face = store.face(id)?;
            if !face.is_edge {
                continue;
            }
            let cos = mid.normal.dot(&face.plane.normal);
            if cos.abs() > BEVEL_DETECTION_LIMIT {
                board.bevel_angle = (cos.acos().to_degrees() - 90.0).abs();
            }
        }
    }
    Ok(())
}

/// Finds the contacts where `edge`'s bands touch `flat`'s faces and
/// queues the fitting drills for both sides.
fn plan_contacts(
    store: &FaceStore,
    flat: &Zone,
    edge: &Zone,
    planned: &mut Vec<(FaceId, Alesage)>,
) -> Result<()> {
    let (Some(machined), Some(mid)) = (edge.machined_face, edge.mid_plane) else {
        return Ok(());
    };
    let u = store.face(machined)?.plane.normal;

    for &flat_id in &flat.faces {
        let flat_face = store.face(flat_id)?;
        if flat_face.is_edge {
            continue;
        }
        let flat_root = store.root(flat_id);
        for &edge_id in &edge.faces {
            let edge_face = store.face(edge_id)?;
            if !edge_face.is_edge {
                continue;
            }
            let edge_root = store.root(edge_id);
            if store.face(edge_root)?.opposite != Some(flat_root) {
                continue;
            }
            let n = edge_face.plane.normal;
            if n.dot(&u).abs() >= EDGE_ALIGNMENT_LIMIT {
                continue;
            }
            let set = templates::templates_for(flat, edge);
            if set.is_empty() {
                continue;
            }

            // Contact anchors: midpoints of the band's contour segments
            // crossing the edge board's mid-plane.
            let mut midpoints: Vec<Point3> = Vec::new();
            let contour = &edge_face.contour;
            for k in 0..contour.len() {
                let a = edge.points[contour[k]];
                let b = edge.points[contour[(k + 1) % contour.len()]];
                if mid.eval(&a) * mid.eval(&b) < 0.0 {
                    midpoints.push(Point3::from((a.coords + b.coords) / 2.0));
                }
            }
            if midpoints.len() < 2 {
                warn!(error = %OperationError::UnresolvedContact, "fittings skipped");
                continue;
            }
            let (p0, p1) = (midpoints[0], midpoints[1]);
            let span = (p0 - p1).norm();
            let s = n.cross(&u);

            for hole in &set {
                let anchors = if span > DOUBLE_FITTING_SPAN {
                    let toward = (p0 - p1) / span;
                    vec![
                        p0 - toward * hole.corner_clearance,
                        p1 + toward * hole.corner_clearance,
                    ]
                } else {
                    vec![Point3::from((p0.coords + p1.coords) / 2.0)]
                };
                let target = match hole.target {
                    DrillTarget::Edge => edge_id,
                    DrillTarget::Flat => flat_id,
                };
                for anchor in anchors {
                    let world = anchor + s * hole.local.x + n * hole.local.y + u * hole.local.z;
                    planned.push((target, hole.placed_at(world)));
                }
            }
        }
    }
    Ok(())
}
