use crate::error::Result;
use crate::math::Point3;
use crate::topology::{FaceLabel, FaceStore, Zone};

use super::build_zone;

/// Creates a triangular corner wedge: right side against one wall, left
/// side against the other, the facade running diagonally between them.
/// The wedge has five faces and no back.
#[derive(Debug, Clone, Copy)]
pub struct MakeCornerBox {
    width: f64,
    depth: f64,
    height: f64,
}

impl MakeCornerBox {
    #[must_use]
    pub fn new(width: f64, depth: f64, height: f64) -> Self {
        Self {
            width,
            depth,
            height,
        }
    }

    /// Executes the operation.
    ///
    /// # Errors
    ///
    /// Returns an error if a boundary face degenerates.
    pub fn execute(&self, store: &mut FaceStore) -> Result<Zone> {
        let (w, d, h) = (self.width, self.depth, self.height);
        let points = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(w, 0.0, 0.0),
            Point3::new(0.0, 0.0, d),
            Point3::new(0.0, h, 0.0),
            Point3::new(w, h, 0.0),
            Point3::new(0.0, h, d),
        ];
        let contours = [
            (FaceLabel::Bottom, vec![0, 1, 2]),
            (FaceLabel::Right, vec![0, 3, 4, 1]),
            (FaceLabel::Left, vec![0, 2, 5, 3]),
            (FaceLabel::Front, vec![1, 4, 5, 2]),
            (FaceLabel::Top, vec![4, 3, 5]),
        ];
        build_zone(store, points, &contours)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn corner_wedge_has_five_faces_and_half_volume() {
        let mut store = FaceStore::new();
        let zone = MakeCornerBox::new(800.0, 800.0, 2000.0)
            .execute(&mut store)
            .unwrap();
        assert_eq!(zone.faces.len(), 5);
        let volume = zone.volume(&store).unwrap();
        assert_relative_eq!(volume, 800.0 * 800.0 * 2000.0 / 2.0, max_relative = 1e-9);
    }

    #[test]
    fn frontal_axis_points_away_from_the_diagonal_facade() {
        let mut store = FaceStore::new();
        let zone = MakeCornerBox::new(800.0, 800.0, 2000.0)
            .execute(&mut store)
            .unwrap();
        let front = zone.find_face(&store, FaceLabel::Front).unwrap().unwrap();
        let normal = store.face(front).unwrap().plane.normal;
        assert_relative_eq!(zone.frame.frontal.dot(&normal), -1.0, epsilon = 1e-12);
    }
}
