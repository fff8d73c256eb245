use crate::math::Plane;

use super::alesage::Alesage;

slotmap::new_key_type! {
    /// Unique identifier for a face in the face store.
    pub struct FaceId;
}

/// Positional tag of a boundary face in the furniture's fixed frame.
///
/// Operators select the boundary to act on purely by label. Labels are
/// reassigned when a zone is rotated a quarter turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaceLabel {
    Top,
    Bottom,
    Left,
    Right,
    Front,
    Back,
}

impl FaceLabel {
    /// The label on the opposite side of the zone.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            Self::Front => Self::Back,
            Self::Back => Self::Front,
        }
    }

    /// Quarter-turn remap of the four side labels:
    /// front → right → back → left → front. Top and bottom are unchanged.
    #[must_use]
    pub fn quarter_turn(self) -> Self {
        match self {
            Self::Front => Self::Right,
            Self::Right => Self::Back,
            Self::Back => Self::Left,
            Self::Left => Self::Front,
            other => other,
        }
    }
}

/// One planar boundary polygon of a zone.
///
/// `contour` indexes into the owning zone's point list; indices are stable
/// until the zone is compacted. The plane normal points outward.
#[derive(Debug, Clone)]
pub struct Face {
    pub label: FaceLabel,
    pub plane: Plane,
    pub contour: Vec<usize>,
    /// True for a thin machined edge-band face created by clipping,
    /// false for an original flat face.
    pub is_edge: bool,
    /// Face this one was derived from by a previous clip (lineage chain).
    pub parent: Option<FaceId>,
    /// Face on the other side of a board interface (weak, lookup-only).
    pub opposite: Option<FaceId>,
    /// Machining features living on this face.
    pub alesages: Vec<Alesage>,
}

impl Face {
    /// Creates a face with no lineage and no features.
    #[must_use]
    pub fn new(label: FaceLabel, plane: Plane, contour: Vec<usize>) -> Self {
        Self {
            label,
            plane,
            contour,
            is_edge: false,
            parent: None,
            opposite: None,
            alesages: Vec::new(),
        }
    }

    /// The undirected edges implied by the cyclic contour.
    #[must_use]
    pub fn segments(&self) -> Vec<[usize; 2]> {
        let n = self.contour.len();
        (0..n)
            .map(|i| [self.contour[i], self.contour[(i + 1) % n]])
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quarter_turn_cycles_in_four() {
        for label in [
            FaceLabel::Top,
            FaceLabel::Bottom,
            FaceLabel::Left,
            FaceLabel::Right,
            FaceLabel::Front,
            FaceLabel::Back,
        ] {
            let rotated = label
                .quarter_turn()
                .quarter_turn()
                .quarter_turn()
                .quarter_turn();
            assert_eq!(rotated, label);
        }
    }

    #[test]
    fn segments_close_the_cycle() {
        use crate::math::{Plane, Vector3};
        let face = Face::new(
            FaceLabel::Top,
            Plane::from_normal_offset(Vector3::z(), 0.0),
            vec![4, 5, 7, 6],
        );
        assert_eq!(face.segments(), vec![[4, 5], [5, 7], [7, 6], [6, 4]]);
    }
}
