use crate::error::Result;
use crate::math::Point3;
use crate::topology::{FaceLabel, FaceStore, Zone};

use super::build_zone;

/// Creates a volume whose left side is shallower than its right side,
/// with the back face running at an angle between them. Fits the dead
/// space along a staircase wall.
#[derive(Debug, Clone, Copy)]
pub struct MakeStairBox {
    width: f64,
    left_depth: f64,
    right_depth: f64,
    height: f64,
}

impl MakeStairBox {
    #[must_use]
    pub fn new(width: f64, left_depth: f64, right_depth: f64, height: f64) -> Self {
        Self {
            width,
            left_depth,
            right_depth,
            height,
        }
    }

    /// Executes the operation.
    ///
    /// # Errors
    ///
    /// Returns an error if a boundary face degenerates.
    pub fn execute(&self, store: &mut FaceStore) -> Result<Zone> {
        let (w, h) = (self.width, self.height);
        let back_left = self.right_depth - self.left_depth;
        let front = self.right_depth;
        let points = vec![
            Point3::new(0.0, 0.0, back_left),
            Point3::new(w, 0.0, 0.0),
            Point3::new(w, 0.0, front),
            Point3::new(0.0, 0.0, front),
            Point3::new(w, h, 0.0),
            Point3::new(0.0, h, back_left),
            Point3::new(w, h, front),
            Point3::new(0.0, h, front),
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
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn stair_box_volume_is_trapezoid_prism() {
        let mut store = FaceStore::new();
        let zone = MakeStairBox::new(1000.0, 200.0, 600.0, 800.0)
            .execute(&mut store)
            .unwrap();
        let volume = zone.volume(&store).unwrap();
        let plan_area = 1000.0 * (200.0 + 600.0) / 2.0;
        assert_relative_eq!(volume, plan_area * 800.0, max_relative = 1e-9);
    }
}
