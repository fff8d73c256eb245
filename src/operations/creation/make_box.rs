use crate::error::Result;
use crate::topology::{FaceStore, Zone};

use super::corner_post_box;

/// Creates a rectangular furniture volume.
///
/// Width runs across the facade, depth from facade to back, height
/// upward. Dimensions are in millimetres, like every length in the crate.
#[derive(Debug, Clone, Copy)]
pub struct MakeBox {
    width: f64,
    depth: f64,
    height: f64,
}

impl MakeBox {
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
    /// Returns an error if a dimension is zero or negative enough to
    /// degenerate a boundary face.
    pub fn execute(&self, store: &mut FaceStore) -> Result<Zone> {
        MakeAtticBox::new(self.width, self.depth, self.height, self.height).execute(store)
    }
}

/// Creates a volume whose top slopes from the back down (or up) to the
/// front, for fitting under a pitched roof.
#[derive(Debug, Clone, Copy)]
pub struct MakeAtticBox {
    width: f64,
    depth: f64,
    back_height: f64,
    front_height: f64,
}

impl MakeAtticBox {
    #[must_use]
    pub fn new(width: f64, depth: f64, back_height: f64, front_height: f64) -> Self {
        Self {
            width,
            depth,
            back_height,
            front_height,
        }
    }

    /// Executes the operation.
    ///
    /// # Errors
    ///
    /// Returns an error if a boundary face degenerates.
    pub fn execute(&self, store: &mut FaceStore) -> Result<Zone> {
        corner_post_box(
            store,
            self.width,
            self.depth,
            [
                self.back_height,
                self.back_height,
                self.front_height,
                self.front_height,
            ],
        )
    }
}

/// Creates a volume whose top slopes from one side down to the other,
/// for fitting under a stair stringer or a side roof pitch.
#[derive(Debug, Clone, Copy)]
pub struct MakeSlantBox {
    width: f64,
    depth: f64,
    right_height: f64,
    left_height: f64,
}

impl MakeSlantBox {
    #[must_use]
    pub fn new(width: f64, depth: f64, right_height: f64, left_height: f64) -> Self {
        Self {
            width,
            depth,
            right_height,
            left_height,
        }
    }

    /// Executes the operation.
    ///
    /// # Errors
    ///
    /// Returns an error if a boundary face degenerates.
    pub fn execute(&self, store: &mut FaceStore) -> Result<Zone> {
        corner_post_box(
            store,
            self.width,
            self.depth,
            [
                self.right_height,
                self.left_height,
                self.right_height,
                self.left_height,
            ],
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::topology::FaceLabel;
    use approx::assert_relative_eq;

    #[test]
    fn box_has_six_outward_faces() {
        let mut store = FaceStore::new();
        let zone = MakeBox::new(1000.0, 400.0, 2000.0).execute(&mut store).unwrap();
        assert_eq!(zone.faces.len(), 6);
        assert_eq!(zone.points.len(), 8);

        // Outward normals: every other corner point sits on the non-positive
        // side of every face plane.
        for &id in &zone.faces {
            let plane = store.face(id).unwrap().plane;
            for p in &zone.points {
                assert!(plane.eval(p) <= 1e-9);
            }
        }
    }

    #[test]
    fn frame_is_orthonormal() {
        let mut store = FaceStore::new();
        let zone = MakeBox::new(600.0, 400.0, 700.0).execute(&mut store).unwrap();
        let f = zone.frame;
        assert_relative_eq!(f.horizontal.norm(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(f.vertical.norm(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(f.frontal.norm(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(f.horizontal.dot(&f.vertical), 0.0, epsilon = 1e-12);
        assert_relative_eq!(f.horizontal.dot(&f.frontal), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn attic_box_volume_is_prism_average() {
        let mut store = FaceStore::new();
        let zone = MakeAtticBox::new(1000.0, 500.0, 2000.0, 1000.0)
            .execute(&mut store)
            .unwrap();
        let volume = zone.volume(&store).unwrap();
        assert_relative_eq!(volume, 1000.0 * 500.0 * 1500.0, max_relative = 1e-9);
    }

    #[test]
    fn slant_box_top_slopes_sideways() {
        let mut store = FaceStore::new();
        let zone = MakeSlantBox::new(1000.0, 500.0, 2000.0, 1000.0)
            .execute(&mut store)
            .unwrap();
        assert_relative_eq!(
            zone.volume(&store).unwrap(),
            1000.0 * 500.0 * 1500.0,
            max_relative = 1e-9
        );
        // The top face normal leans toward the short (left) side.
        let top = zone.find_face(&store, FaceLabel::Top).unwrap().unwrap();
        let normal = store.face(top).unwrap().plane.normal;
        assert!(normal.y > 0.0);
        assert!(normal.x < 0.0);
    }
}
