use tracing::debug;

use crate::catalog::Material;
use crate::error::Result;
use crate::math::Plane;
use crate::topology::{Axis, FaceLabel, FaceStore, Zone, ZoneKind};

use super::clip::{CapSeed, Clip};
use super::grain_direction;
use super::split::SplitWeights;

/// Cuts a zone into bands along an axis and inserts a separator board of
/// the given thickness at each internal cut.
///
/// The board thickness is taken out of the shared extent before the
/// weights are applied, so the usable space is what gets divided. Both
/// clips bounding a separator are linked, so each sub-zone's cap knows
/// the board face it touches.
#[derive(Debug, Clone)]
pub struct Partition {
    axis: Axis,
    weights: SplitWeights,
    thickness: f64,
    material: Option<Material>,
}

impl Partition {
    #[must_use]
    pub fn new(
        axis: Axis,
        weights: SplitWeights,
        thickness: f64,
        material: Option<Material>,
    ) -> Self {
        Self {
            axis,
            weights,
            thickness,
            material,
        }
    }

    /// The label of the face a separator board is machined on: the one
    /// looking back down the positive axis direction.
    fn machining_label(axis: Axis) -> FaceLabel {
        match axis {
            Axis::Vertical => FaceLabel::Left,
            Axis::Horizontal => FaceLabel::Bottom,
            Axis::Frontal => FaceLabel::Front,
        }
    }

    /// Executes the operation, returning `(sub_zones, separator_boards)`.
    ///
    /// # Errors
    ///
    /// Returns an error when the weights overconstrain the extent or a
    /// cut fails geometrically.
    pub fn execute(&self, store: &mut FaceStore, zone: Zone) -> Result<(Vec<Zone>, Vec<Zone>)> {
        let normal = self.axis.normal(&zone.frame);
        let (min, max) = zone.extent_along(store, &normal)?;
        let fractions = self.weights.fractions(max - min)?;
        let n = fractions.len();
        debug!(axis = ?self.axis, bands = n, thickness = self.thickness, "partition");

        #[allow(clippy::cast_precision_loss)]
        let usable = (max - min) - self.thickness * (n as f64 - 1.0);

        // Cumulative end position of each band, separators included.
        let mut positions = Vec::with_capacity(n);
        let mut cursor = 0.0;
        for (i, fraction) in fractions.iter().enumerate() {
            cursor += fraction * usable;
            if i < n - 1 {
                cursor += self.thickness;
            }
            positions.push(cursor);
        }

        let mut rest = zone;
        let mut zones = Vec::with_capacity(n);
        let mut boards = Vec::with_capacity(n - 1);
        for position in &positions[..n - 1] {
            let d_high = min + position;
            let d_low = d_high - self.thickness;

            let lower_cut = Plane::from_normal_offset(normal, d_low);
            let (remaining, band) =
                Clip::new(lower_cut, CapSeed::Axis(self.axis), true).execute(store, &rest)?;
            zones.push(band);

            let upper_cut = Plane::from_normal_offset(normal, d_high);
            let (remaining, mut board) =
                Clip::new(upper_cut, CapSeed::Axis(self.axis), true).execute(store, &remaining)?;
            rest = remaining;

            board.is_board = true;
            board.kind = ZoneKind::Partition(self.axis);
            board.thickness = Some(self.thickness);
            board.mid_plane = Some(Plane::from_normal_offset(
                normal,
                (d_low + d_high) / 2.0,
            ));
            board.grain = Some(grain_direction(&normal, &board.frame, 0.99)?);
            board.machined_face = board
                .find_face(store, Self::machining_label(self.axis))?
                .or_else(|| board.faces.first().copied());
            board.material.clone_from(&self.material);
            boards.push(board);
        }
        zones.push(rest);
        Ok((zones, boards))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::operations::creation::MakeBox;
    use approx::assert_relative_eq;

    #[test]
    fn two_way_partition_inserts_one_separator() {
        let mut store = FaceStore::new();
        let zone = MakeBox::new(619.0, 400.0, 2000.0).execute(&mut store).unwrap();
        let (zones, boards) = Partition::new(Axis::Vertical, SplitWeights::equal(2), 19.0, None)
            .execute(&mut store, zone)
            .unwrap();

        assert_eq!(zones.len(), 2);
        assert_eq!(boards.len(), 1);
        // Usable space 600 split in two bands of 300.
        for z in &zones {
            assert_relative_eq!(
                z.volume(&store).unwrap(),
                300.0 * 400.0 * 2000.0,
                max_relative = 1e-9
            );
        }
        let board = &boards[0];
        assert!(board.is_board);
        assert_eq!(board.kind, ZoneKind::Partition(Axis::Vertical));
        assert_relative_eq!(
            board.volume(&store).unwrap(),
            19.0 * 400.0 * 2000.0,
            max_relative = 1e-9
        );
    }

    #[test]
    fn separator_mid_plane_bisects_the_board() {
        let mut store = FaceStore::new();
        let zone = MakeBox::new(619.0, 400.0, 2000.0).execute(&mut store).unwrap();
        let (_, boards) = Partition::new(Axis::Vertical, SplitWeights::equal(2), 19.0, None)
            .execute(&mut store, zone)
            .unwrap();

        let board = &boards[0];
        let mid = board.mid_plane.unwrap();
        let normal = Axis::Vertical.normal(&board.frame);
        let (min, max) = board.extent_along(&store, &normal).unwrap();
        let centre = (min + max) / 2.0;
        // The mid-plane passes at the centre scalar along the axis.
        assert_relative_eq!(-mid.d, centre, epsilon = 1e-9);
    }

    #[test]
    fn three_way_horizontal_partition_keeps_the_extent() {
        let mut store = FaceStore::new();
        let zone = MakeBox::new(600.0, 400.0, 2038.0).execute(&mut store).unwrap();
        let (zones, boards) =
            Partition::new(Axis::Horizontal, SplitWeights::equal(3), 19.0, None)
                .execute(&mut store, zone)
                .unwrap();

        assert_eq!(zones.len(), 3);
        assert_eq!(boards.len(), 2);
        let total: f64 = zones
            .iter()
            .chain(boards.iter())
            .map(|z| z.volume(&store).unwrap())
            .sum();
        assert_relative_eq!(total, 600.0 * 400.0 * 2038.0, max_relative = 1e-9);
        // Usable 2000 split in three equal bands.
        assert_relative_eq!(
            zones[0].volume(&store).unwrap(),
            600.0 * 400.0 * (2000.0 / 3.0),
            max_relative = 1e-9
        );
    }

    #[test]
    fn separator_is_machined_on_its_axis_facing_side() {
        let mut store = FaceStore::new();
        let zone = MakeBox::new(600.0, 400.0, 2019.0).execute(&mut store).unwrap();
        let (_, boards) =
            Partition::new(Axis::Horizontal, SplitWeights::equal(2), 19.0, None)
                .execute(&mut store, zone)
                .unwrap();

        let machined = boards[0].machined_face.unwrap();
        assert_eq!(store.face(machined).unwrap().label, FaceLabel::Bottom);
    }
}
