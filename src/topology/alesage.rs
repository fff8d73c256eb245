use crate::math::{Point3, Vector3};

/// Which physical surface of a board a feature is machined into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrillTarget {
    /// A thin machined edge-band face (chant).
    Edge,
    /// The board's flat face (plat).
    Flat,
}

/// The hardware a drilling serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlesageKind {
    /// Wooden dowel hole.
    Dowel,
    /// Cam-lock housing (excentrique).
    CamHousing,
    /// Cam-lock pin pilot hole.
    CamPilot,
    /// Corner-bracket screw hole.
    Bracket,
    /// Concealed hinge cup.
    HingeCup,
    /// Hinge screw pilot hole.
    HingePilot,
    /// Cable pass-through.
    Cable,
}

/// A machining feature (hole) on one face of a board.
///
/// `local` is expressed in the contact-relative frame `(s, n, u)`:
/// `s` along the contact edge, `n` along the edge face's normal, `u`
/// along the machined flat face's normal. `world` is filled in by feature
/// placement, in the same coordinate space as the board's points.
#[derive(Debug, Clone)]
pub struct Alesage {
    pub kind: AlesageKind,
    pub local: Vector3,
    pub world: Option<Point3>,
    pub radius: f64,
    pub depth: f64,
    /// Distance from the contact-segment end to the anchor point, along
    /// the edge (corner-relief positioning).
    pub corner_clearance: f64,
    pub target: DrillTarget,
}

impl Alesage {
    /// Creates an unplaced feature template.
    #[must_use]
    pub fn template(
        kind: AlesageKind,
        local: Vector3,
        radius: f64,
        depth: f64,
        corner_clearance: f64,
        target: DrillTarget,
    ) -> Self {
        Self {
            kind,
            local,
            world: None,
            radius,
            depth,
            corner_clearance,
            target,
        }
    }

    /// Copy of the template anchored at a world position.
    #[must_use]
    pub fn placed_at(&self, world: Point3) -> Self {
        let mut placed = self.clone();
        placed.world = Some(world);
        placed
    }
}
