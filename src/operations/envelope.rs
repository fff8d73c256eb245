use tracing::debug;

use crate::catalog::Material;
use crate::error::Result;
use crate::topology::{FaceLabel, FaceStore, Zone, ZoneKind};

use super::clip::{CapSeed, Clip};
use super::grain_direction;

/// Peels a board of the given thickness off every boundary face carrying
/// a label, shrinking the zone accordingly.
///
/// Each board keeps the full lineage of the clip that created it: its cap
/// and the remaining zone's cap reference each other as `opposite`, which
/// is what contact detection later walks. The board's machined face is
/// its cap (the face toward the zone interior).
#[derive(Debug, Clone)]
pub struct Envelope {
    label: FaceLabel,
    thickness: f64,
    material: Option<Material>,
}

impl Envelope {
    #[must_use]
    pub fn new(label: FaceLabel, thickness: f64, material: Option<Material>) -> Self {
        Self {
            label,
            thickness,
            material,
        }
    }

    /// Executes the operation, returning `(boards, remaining_zone)`.
    ///
    /// A zone can expose several faces with the same label after earlier
    /// cuts; one board is peeled per face, left to right in face order.
    ///
    /// # Errors
    ///
    /// Returns an error if a clip fails or a referenced face is missing.
    pub fn execute(&self, store: &mut FaceStore, zone: Zone) -> Result<(Vec<Zone>, Zone)> {
        let targets = zone.faces_with_label(store, self.label)?;
        debug!(label = ?self.label, thickness = self.thickness, count = targets.len(), "envelope");

        let mut rest = zone;
        let mut boards = Vec::new();
        for id in targets {
            let face_plane = store.face(id)?.plane;
            let cut = face_plane.offset(self.thickness);
            let (mut board, remaining) =
                Clip::new(cut, CapSeed::Label(self.label), true).execute(store, &rest)?;
            rest = remaining;

            board.is_board = true;
            board.kind = ZoneKind::Envelope(self.label);
            board.thickness = Some(self.thickness);
            board.mid_plane = Some(face_plane.offset(self.thickness / 2.0));
            board.machined_face = board.faces.last().copied();
            board.grain = Some(grain_direction(
                &face_plane.normal,
                &board.frame,
                1.0 - 1e-6,
            )?);
            board.material.clone_from(&self.material);
            boards.push(board);
        }
        Ok((boards, rest))
    }
}
