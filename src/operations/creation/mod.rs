//! Operators that create the initial furniture volume.
//!
//! Every decomposition run starts from exactly one of these. The created
//! zone owns its corner points; its faces are registered in the run's
//! [`FaceStore`] and carry outward-pointing plane normals.

pub mod make_box;
pub mod make_corner_box;
pub mod make_stair_box;

pub use make_box::{MakeAtticBox, MakeBox, MakeSlantBox};
pub use make_corner_box::MakeCornerBox;
pub use make_stair_box::MakeStairBox;

use crate::error::Result;
use crate::math::{Plane, Point3};
use crate::topology::{Face, FaceLabel, FaceStore, Frame, Zone};

/// Builds a zone from explicit corner points and labeled contours, then
/// derives the reference frame from the bottom and front faces.
///
/// Contours must be wound so that [`Plane::from_points`] over their first
/// three points yields the outward normal.
pub(crate) fn build_zone(
    store: &mut FaceStore,
    points: Vec<Point3>,
    contours: &[(FaceLabel, Vec<usize>)],
) -> Result<Zone> {
    let mut faces = Vec::with_capacity(contours.len());
    let mut bottom_normal = None;
    let mut front_normal = None;
    for (label, contour) in contours {
        let plane = Plane::from_points(
            &points[contour[0]],
            &points[contour[1]],
            &points[contour[2]],
        )?;
        match label {
            FaceLabel::Bottom => bottom_normal = Some(plane.normal),
            FaceLabel::Front => front_normal = Some(plane.normal),
            _ => {}
        }
        faces.push(store.add_face(Face::new(*label, plane, contour.clone())));
    }

    let horizontal = bottom_normal
        .ok_or_else(|| crate::error::GeometryError::Degenerate("zone has no bottom face".into()))?;
    let frontal = -front_normal
        .ok_or_else(|| crate::error::GeometryError::Degenerate("zone has no front face".into()))?;
    let vertical = frontal.cross(&horizontal);
    let norm = vertical.norm();
    if norm < crate::math::TOLERANCE {
        return Err(crate::error::GeometryError::ZeroVector.into());
    }

    let frame = Frame {
        horizontal,
        vertical: vertical / norm,
        frontal,
    };
    Ok(Zone::new(points, faces, frame))
}

/// Eight corner posts of a box whose four top corners may sit at
/// different heights. `heights` are the y coordinates of the posts above
/// corners (width, 0), (0, 0), (width, depth), (0, depth).
pub(crate) fn corner_post_box(
    store: &mut FaceStore,
    width: f64,
    depth: f64,
    heights: [f64; 4],
) -> Result<Zone> {
    let [back_right, back_left, front_right, front_left] = heights;
    let points = vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(width, 0.0, 0.0),
        Point3::new(width, 0.0, depth),
        Point3::new(0.0, 0.0, depth),
        Point3::new(width, back_right, 0.0),
        Point3::new(0.0, back_left, 0.0),
        Point3::new(width, front_right, depth),
        Point3::new(0.0, front_left, depth),
    ];
    let contours = [
        (FaceLabel::Bottom, vec![0, 1, 2, 3]),
        (FaceLabel::Right, vec![1, 4, 6, 2]),
        (FaceLabel::Left, vec![0, 3, 7, 5]),
        (FaceLabel::Back, vec![0, 5, 4, 1]),
        (FaceLabel::Front, vec![3, 2, 6, 7]),
        (FaceLabel::Top, vec![4, 5, 7, 6]),
    ];
    build_zone(store, points, &contours)
}
