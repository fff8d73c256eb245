//! Fitting templates and the joint-selection table.
//!
//! A template's `local` offset is in the contact frame `(s, n, u)`: along
//! the contact edge, along the edge face's normal (into the flat board),
//! and along the machined flat face's normal (into the edge board).

use crate::math::Vector3;
use crate::topology::{
    Alesage, AlesageKind, Axis, DrillTarget, FaceLabel, FunctionalBlock, Zone, ZoneKind,
};

fn dowel() -> Alesage {
    Alesage::template(
        AlesageKind::Dowel,
        Vector3::new(0.0, 0.0, 0.0),
        3.0,
        15.0,
        60.0,
        DrillTarget::Flat,
    )
}

fn dowel_left() -> Alesage {
    Alesage::template(
        AlesageKind::Dowel,
        Vector3::new(-32.0, 0.0, 0.0),
        4.0,
        15.0,
        60.0,
        DrillTarget::Flat,
    )
}

fn dowel_right() -> Alesage {
    Alesage::template(
        AlesageKind::Dowel,
        Vector3::new(32.0, 0.0, 0.0),
        4.0,
        15.0,
        60.0,
        DrillTarget::Flat,
    )
}

fn bracket_flat() -> Alesage {
    Alesage::template(
        AlesageKind::Bracket,
        Vector3::new(0.0, 0.0, 17.5),
        2.5,
        10.0,
        50.0,
        DrillTarget::Flat,
    )
}

fn bracket_edge() -> Alesage {
    Alesage::template(
        AlesageKind::Bracket,
        Vector3::new(0.0, -10.0, 0.0),
        2.5,
        10.0,
        50.0,
        DrillTarget::Edge,
    )
}

fn cam_housing() -> Alesage {
    Alesage::template(
        AlesageKind::CamHousing,
        Vector3::new(0.0, -34.0, 0.0),
        7.5,
        15.0,
        60.0,
        DrillTarget::Edge,
    )
}

fn cam_pilot() -> Alesage {
    Alesage::template(
        AlesageKind::CamPilot,
        Vector3::new(0.0, 0.0, 0.0),
        2.5,
        10.0,
        60.0,
        DrillTarget::Flat,
    )
}

fn hinge_cup() -> Alesage {
    Alesage::template(
        AlesageKind::HingeCup,
        Vector3::new(0.0, 0.0, 15.0),
        17.5,
        12.8,
        100.0,
        DrillTarget::Flat,
    )
}

fn hinge_pilots() -> [Alesage; 2] {
    [
        Alesage::template(
            AlesageKind::HingePilot,
            Vector3::new(16.0, -37.0, 0.0),
            1.5,
            5.0,
            100.0,
            DrillTarget::Edge,
        ),
        Alesage::template(
            AlesageKind::HingePilot,
            Vector3::new(-16.0, -37.0, 0.0),
            1.5,
            5.0,
            100.0,
            DrillTarget::Edge,
        ),
    ]
}

/// Cam-lock assembly: pin pilot and housing on the joint axis, a dowel
/// 32mm to each side.
fn cam_set() -> Vec<Alesage> {
    vec![cam_pilot(), cam_housing(), dowel_right(), dowel_left()]
}

/// Concealed hinge: cup in the leaf, two screw pilots in the side panel.
fn hinge_set() -> Vec<Alesage> {
    let [p1, p2] = hinge_pilots();
    vec![hinge_cup(), p1, p2]
}

/// Selects the fittings for a contact where `flat` receives the flat
/// drills and `edge` the edge drills. An empty set means the boards
/// touch but get no hardware (shared separator already fixed elsewhere,
/// or an unsupported combination).
pub(super) fn templates_for(flat: &Zone, edge: &Zone) -> Vec<Alesage> {
    use FunctionalBlock as B;
    use ZoneKind as K;
    match (flat.block, edge.block) {
        (None, None) => match (flat.kind, edge.kind) {
            (K::Envelope(f), K::Envelope(e))
                if f != FaceLabel::Front && e != FaceLabel::Front =>
            {
                cam_set()
            }
            (K::Partition(_), K::Envelope(e)) if e != FaceLabel::Front => Vec::new(),
            (K::Envelope(f), K::Partition(Axis::Vertical)) if f != FaceLabel::Front => cam_set(),
            (K::Partition(Axis::Horizontal), K::Partition(Axis::Vertical)) => cam_set(),
            (_, K::Partition(Axis::Frontal | Axis::Horizontal)) => {
                vec![bracket_flat(), bracket_edge()]
            }
            _ => Vec::new(),
        },
        (None, Some(B::Plinth)) if edge.kind == K::Partition(Axis::Horizontal) => cam_set(),
        (Some(B::DoorLeft), _) if edge.kind == K::Envelope(FaceLabel::Left) => hinge_set(),
        (Some(B::DoorRight), _) if edge.kind == K::Envelope(FaceLabel::Right) => hinge_set(),
        (Some(B::Drawer), _) => match (flat.kind, edge.kind) {
            (K::Envelope(_), K::Envelope(e)) if e != FaceLabel::Top => cam_set(),
            (K::Partition(_), K::Envelope(e)) if e != FaceLabel::Top => vec![dowel()],
            (K::Envelope(f), K::Partition(Axis::Vertical)) if f != FaceLabel::Front => cam_set(),
            (_, K::Partition(Axis::Frontal | Axis::Horizontal)) => vec![dowel()],
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}
