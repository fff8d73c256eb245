use std::collections::BTreeMap;

use crate::catalog::Material;
use crate::error::Result;
use crate::math::{Plane, Point3, Vector3};

use super::{FaceId, FaceLabel, FaceStore};

/// One of the three furniture reference axes a cut plane can follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Normal to the vertical mid-plane (points across the width).
    Vertical,
    /// Normal to the horizontal plane (points through the height).
    Horizontal,
    /// Normal to the facade plane (points through the depth).
    Frontal,
}

impl Axis {
    /// The frame vector normal to this axis' family of cut planes.
    #[must_use]
    pub fn normal(self, frame: &Frame) -> Vector3 {
        match self {
            Self::Vertical => frame.vertical,
            Self::Horizontal => frame.horizontal,
            Self::Frontal => frame.frontal,
        }
    }
}

/// The furniture's fixed orthonormal reference frame, copied by value
/// into every derived zone and never recomputed.
#[derive(Debug, Clone, Copy)]
pub struct Frame {
    /// Unit normal of the horizontal plane.
    pub horizontal: Vector3,
    /// Unit normal of the vertical plane.
    pub vertical: Vector3,
    /// Unit normal of the facade plane.
    pub frontal: Vector3,
}

/// Structural role of a zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneKind {
    /// An empty room (or a placeholder entry, see [`FunctionalBlock`]).
    Space,
    /// A board peeled off the named boundary face.
    Envelope(FaceLabel),
    /// A separator board inserted by a partition along the axis.
    Partition(Axis),
}

/// Functional block a board belongs to; `None` on the carcass itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionalBlock {
    Plinth,
    Drawer,
    DrawerPush,
    DoorLeft,
    DoorRight,
    SlidingDoor,
    /// Sliding-door top rail; excluded from costing.
    SlideRail,
    Mirror,
    GlassShelf,
    Pegboard,
    CableHole,
    HangingRod,
}

/// A volume (or a thin board) bounded by a closed set of planar faces.
///
/// Zones are value types: every operator consumes its input and returns
/// fresh zones, which keeps lineage faces correct without any sharing.
#[derive(Debug, Clone)]
pub struct Zone {
    /// Point list the face contours index into.
    pub points: Vec<Point3>,
    /// Boundary faces, owned by the run's [`FaceStore`].
    pub faces: Vec<FaceId>,
    pub frame: Frame,
    pub kind: ZoneKind,
    /// Does this zone represent a physical board rather than a room?
    pub is_board: bool,
    /// Mid-plane of the board, set when the board is carved out.
    pub mid_plane: Option<Plane>,
    pub thickness: Option<f64>,
    /// The one face that receives CNC features.
    pub machined_face: Option<FaceId>,
    pub block: Option<FunctionalBlock>,
    /// Wood grain direction, in the board plane.
    pub grain: Option<Vector3>,
    pub material: Option<Material>,
    /// Non-zero when an edge face is not perpendicular to the board
    /// plane, in degrees.
    pub bevel_angle: f64,
    /// Handle style read from a trailing opcode digit.
    pub handle_type: Option<u8>,
    pub name: String,
}

impl Zone {
    /// Creates a plain room zone.
    #[must_use]
    pub fn new(points: Vec<Point3>, faces: Vec<FaceId>, frame: Frame) -> Self {
        Self {
            points,
            faces,
            frame,
            kind: ZoneKind::Space,
            is_board: false,
            mid_plane: None,
            thickness: None,
            machined_face: None,
            block: None,
            grain: None,
            material: None,
            bevel_angle: 0.0,
            handle_type: None,
            name: String::from("meuble"),
        }
    }

    /// First face carrying the given label, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if a referenced face is missing from the store.
    pub fn find_face(&self, store: &FaceStore, label: FaceLabel) -> Result<Option<FaceId>> {
        for &id in &self.faces {
            if store.face(id)?.label == label {
                return Ok(Some(id));
            }
        }
        Ok(None)
    }

    /// All faces carrying the given label, in face order.
    ///
    /// # Errors
    ///
    /// Returns an error if a referenced face is missing from the store.
    pub fn faces_with_label(&self, store: &FaceStore, label: FaceLabel) -> Result<Vec<FaceId>> {
        let mut out = Vec::new();
        for &id in &self.faces {
            if store.face(id)?.label == label {
                out.push(id);
            }
        }
        Ok(out)
    }

    /// Point indices referenced by at least one contour, ascending.
    ///
    /// # Errors
    ///
    /// Returns an error if a referenced face is missing from the store.
    pub fn used_point_indices(&self, store: &FaceStore) -> Result<Vec<usize>> {
        let mut used: Vec<usize> = Vec::new();
        for &id in &self.faces {
            used.extend(store.face(id)?.contour.iter().copied());
        }
        used.sort_unstable();
        used.dedup();
        Ok(used)
    }

    /// Drops points no contour references and renumbers every contour
    /// atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if a referenced face is missing from the store.
    pub fn compact(&mut self, store: &mut FaceStore) -> Result<()> {
        let used = self.used_point_indices(store)?;
        let remap: BTreeMap<usize, usize> =
            used.iter().enumerate().map(|(new, &old)| (old, new)).collect();

        for &id in &self.faces {
            let face = store.face_mut(id)?;
            for index in &mut face.contour {
                if let Some(&new) = remap.get(index) {
                    *index = new;
                }
            }
        }
        self.points = used.iter().map(|&i| self.points[i]).collect();
        Ok(())
    }

    /// Minimum and maximum scalar product of the contour points with
    /// `direction` — the zone's extent along that direction.
    ///
    /// # Errors
    ///
    /// Returns an error if the zone has no faces or a face is missing.
    pub fn extent_along(&self, store: &FaceStore, direction: &Vector3) -> Result<(f64, f64)> {
        let used = self.used_point_indices(store)?;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for &i in &used {
            let s = self.points[i].coords.dot(direction);
            min = min.min(s);
            max = max.max(s);
        }
        if min > max {
            return Err(crate::error::OperationError::EmptyZone.into());
        }
        Ok((min, max))
    }

    /// Volume of the zone by the signed-tetrahedron method.
    ///
    /// Each face contour is fan-triangulated; the face's outward normal
    /// corrects the contribution sign, making the sum robust to mixed
    /// contour windings.
    ///
    /// # Errors
    ///
    /// Returns an error if a referenced face is missing from the store.
    pub fn volume(&self, store: &FaceStore) -> Result<f64> {
        let mut signed = 0.0;
        for &id in &self.faces {
            let face = store.face(id)?;
            let contour = &face.contour;
            if contour.len() < 3 {
                continue;
            }
            let p0 = self.points[contour[0]];
            for w in contour[1..].windows(2) {
                let p1 = self.points[w[0]];
                let p2 = self.points[w[1]];
                let cross = (p1 - p0).cross(&(p2 - p0));
                let det = p0.coords.dot(&p1.coords.cross(&p2.coords));
                if face.plane.normal.dot(&cross) >= 0.0 {
                    signed += det;
                } else {
                    signed -= det;
                }
            }
        }
        Ok(signed.abs() / 6.0)
    }

    /// Perimeter of the given face's contour.
    ///
    /// # Errors
    ///
    /// Returns an error if the face is missing from the store.
    pub fn face_perimeter(&self, store: &FaceStore, face: FaceId) -> Result<f64> {
        let contour = &store.face(face)?.contour;
        let n = contour.len();
        let mut length = 0.0;
        for i in 0..n {
            let a = self.points[contour[i]];
            let b = self.points[contour[(i + 1) % n]];
            length += (b - a).norm();
        }
        Ok(length)
    }

    /// Remaps the four side labels a quarter turn so the same opcode
    /// sequence can drive a zone in a different orientation.
    ///
    /// # Errors
    ///
    /// Returns an error if a referenced face is missing from the store.
    pub fn rotate_labels(&self, store: &mut FaceStore) -> Result<()> {
        for &id in &self.faces {
            let face = store.face_mut(id)?;
            face.label = face.label.quarter_turn();
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::operations::creation::MakeBox;
    use approx::assert_relative_eq;

    #[test]
    fn box_volume_and_extents() {
        let mut store = FaceStore::new();
        let zone = MakeBox::new(1000.0, 400.0, 2000.0).execute(&mut store).unwrap();

        let volume = zone.volume(&store).unwrap();
        assert_relative_eq!(volume, 1000.0 * 400.0 * 2000.0, max_relative = 1e-9);

        let vertical = zone.frame.vertical;
        let (min, max) = zone.extent_along(&store, &vertical).unwrap();
        assert_relative_eq!(max - min, 1000.0, epsilon = 1e-9);
    }

    #[test]
    fn rotate_labels_four_times_is_identity() {
        let mut store = FaceStore::new();
        let zone = MakeBox::new(600.0, 400.0, 700.0).execute(&mut store).unwrap();

        let before: Vec<FaceLabel> = zone
            .faces
            .iter()
            .map(|&id| store.face(id).unwrap().label)
            .collect();
        for _ in 0..4 {
            zone.rotate_labels(&mut store).unwrap();
        }
        let after: Vec<FaceLabel> = zone
            .faces
            .iter()
            .map(|&id| store.face(id).unwrap().label)
            .collect();
        assert_eq!(before, after);
    }

    #[test]
    fn compact_drops_unreferenced_points() {
        let mut store = FaceStore::new();
        let mut zone = MakeBox::new(100.0, 100.0, 100.0).execute(&mut store).unwrap();

        zone.points.push(Point3::new(999.0, 999.0, 999.0));
        zone.compact(&mut store).unwrap();
        assert_eq!(zone.points.len(), 8);
        let volume = zone.volume(&store).unwrap();
        assert_relative_eq!(volume, 1_000_000.0, max_relative = 1e-9);
    }
}
