//! Composite opcode recipes: doors, drawers, plinths and fittings.
//!
//! Each recipe is a fixed sequence of envelope and split operations with
//! the clearances used by the workshop. All lengths are millimetres.

use tracing::debug;

use crate::catalog::{Material, Palette};
use crate::error::{OperationError, Result};
use crate::math::{Point3, Vector3};
use crate::operations::{Envelope, Partition, Split, SplitWeights};
use crate::topology::{
    Alesage, AlesageKind, Axis, DrillTarget, FaceLabel, FaceStore, FunctionalBlock, Zone,
    ZoneKind,
};

/// Gap left around a door leaf so it can swing free of the carcass.
const DOOR_SIDE_GAP: f64 = 3.0;
const DOOR_BOTTOM_GAP: f64 = 7.0;
/// Front skin shaved off a leaf so it sits just proud of the carcass.
const DOOR_FACE_RELIEF: f64 = 1.0;
/// Depth reserved in front of the carcass by a sliding-door assembly.
const SLIDING_ASSEMBLY_DEPTH: f64 = 62.0;
/// Height of the sliding rail band.
const SLIDING_RAIL_HEIGHT: f64 = 43.0;
const PLINTH_HEIGHT: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum DoorVariant {
    Left,
    Right,
    Double,
    Mirror,
    /// Push-to-open left leaf, no handle.
    Push,
    Sliding,
    Plain,
}

/// Peels one board off the labelled side and collects it.
pub(super) fn panel(
    store: &mut FaceStore,
    zone: Zone,
    label: FaceLabel,
    material: &Material,
    boards: &mut Vec<Zone>,
) -> Result<Zone> {
    let (planks, rest) =
        Envelope::new(label, material.thickness, Some(material.clone())).execute(store, zone)?;
    boards.extend(planks);
    Ok(rest)
}

/// Shaves `thickness` off the labelled side and discards the shaving.
fn strip(store: &mut FaceStore, zone: Zone, label: FaceLabel, thickness: f64) -> Result<Zone> {
    let (_, rest) = Envelope::new(label, thickness, None).execute(store, zone)?;
    Ok(rest)
}

/// Peels one board and returns it alongside the remaining zone.
fn peel_first(
    store: &mut FaceStore,
    zone: Zone,
    label: FaceLabel,
    thickness: f64,
    material: &Material,
) -> Result<(Zone, Zone)> {
    let (mut planks, rest) =
        Envelope::new(label, thickness, Some(material.clone())).execute(store, zone)?;
    if planks.is_empty() {
        return Err(OperationError::EmptyZone.into());
    }
    let board = planks.remove(0);
    Ok((board, rest))
}

/// Cuts a leaf blank out of the zone's front: the full facade minus the
/// swing gaps.
fn door_blank(
    store: &mut FaceStore,
    zone: Zone,
    material: &Material,
    thickness: f64,
) -> Result<(Zone, Zone)> {
    let (blank, rest) = peel_first(store, zone, FaceLabel::Front, thickness, material)?;
    let blank = strip(store, blank, FaceLabel::Left, DOOR_SIDE_GAP)?;
    let blank = strip(store, blank, FaceLabel::Right, DOOR_SIDE_GAP)?;
    let blank = strip(store, blank, FaceLabel::Top, DOOR_SIDE_GAP)?;
    let blank = strip(store, blank, FaceLabel::Bottom, DOOR_BOTTOM_GAP)?;
    Ok((blank, rest))
}

/// Final leaf dressing: face relief, block, handle, and the machined
/// face reset to the leaf's carcass-facing side.
fn finish_leaf(
    store: &mut FaceStore,
    leaf: Zone,
    block: FunctionalBlock,
    handle: Option<u8>,
) -> Result<Zone> {
    let mut leaf = strip(store, leaf, FaceLabel::Front, DOOR_FACE_RELIEF)?;
    leaf.block = Some(block);
    leaf.handle_type = handle;
    if let Some(back) = leaf.find_face(store, FaceLabel::Back)? {
        leaf.machined_face = Some(back);
    }
    Ok(leaf)
}

pub(super) fn door(
    store: &mut FaceStore,
    zone: Zone,
    palette: &Palette,
    boards: &mut Vec<Zone>,
    variant: DoorVariant,
    handle: Option<u8>,
) -> Result<Zone> {
    debug!(?variant, ?handle, "door");
    if variant == DoorVariant::Sliding {
        return sliding_door(store, zone, palette, boards);
    }
    let thickness = match variant {
        // The stock leaf is always cut from 19mm panel regardless of the
        // palette's door material thickness.
        DoorVariant::Plain => 19.1,
        _ => palette.door.thickness + 0.1,
    };
    let (blank, rest) = door_blank(store, zone, &palette.door, thickness)?;
    if variant == DoorVariant::Double {
        let (mut leaves, _) = Partition::new(
            Axis::Vertical,
            SplitWeights::equal(2),
            3.0,
            Some(palette.door.clone()),
        )
        .execute(store, blank)?;
        if leaves.len() < 2 {
            return Err(OperationError::EmptyZone.into());
        }
        let right_half = leaves.remove(1);
        let left_half = leaves.remove(0);
        let left = finish_leaf(store, left_half, FunctionalBlock::DoorLeft, handle)?;
        let right = finish_leaf(store, right_half, FunctionalBlock::DoorRight, handle)?;
        boards.push(left);
        boards.push(right);
    } else {
        let (block, handle) = match variant {
            DoorVariant::Right => (FunctionalBlock::DoorRight, handle),
            DoorVariant::Mirror => (FunctionalBlock::Mirror, handle),
            DoorVariant::Push => (FunctionalBlock::DoorLeft, None),
            _ => (FunctionalBlock::DoorLeft, handle),
        };
        boards.push(finish_leaf(store, blank, block, handle)?);
    }
    Ok(rest)
}

/// Two sliding leaves running in a rail band, overlapping at the centre.
fn sliding_door(
    store: &mut FaceStore,
    zone: Zone,
    palette: &Palette,
    boards: &mut Vec<Zone>,
) -> Result<Zone> {
    let (blank, rest) = peel_first(
        store,
        zone,
        FaceLabel::Front,
        SLIDING_ASSEMBLY_DEPTH,
        &palette.door,
    )?;

    let height = {
        let back = blank
            .find_face(store, FaceLabel::Back)?
            .ok_or(OperationError::EmptyZone)?;
        let (min, max) = {
            let contour = store.face(back)?.contour.clone();
            let normal = blank.frame.horizontal;
            let mut min = f64::INFINITY;
            let mut max = f64::NEG_INFINITY;
            for idx in contour {
                let s = blank.points[idx].coords.dot(&normal);
                min = min.min(s);
                max = max.max(s);
            }
            (min, max)
        };
        max - min
    };

    let mut bands = Split::new(
        Axis::Horizontal,
        SplitWeights::Lengths(vec![height - SLIDING_RAIL_HEIGHT]),
    )
    .execute(store, blank)?;
    if bands.len() < 2 {
        return Err(OperationError::EmptyZone.into());
    }
    let mut rail = bands.remove(1);
    let leaf_zone = bands.remove(0);
    rail.block = Some(FunctionalBlock::SlideRail);
    rail.material = Some(palette.interior.clone());
    boards.push(rail);

    let leaf_zone = strip(store, leaf_zone, FaceLabel::Left, 1.0)?;
    let leaf_zone = strip(store, leaf_zone, FaceLabel::Right, 1.0)?;
    let mut leaf_zone = strip(store, leaf_zone, FaceLabel::Bottom, DOOR_BOTTOM_GAP)?;
    leaf_zone.block = Some(FunctionalBlock::SlidingDoor);

    let mut halves =
        Split::new(Axis::Vertical, SplitWeights::equal(2)).execute(store, leaf_zone)?;
    if halves.len() < 2 {
        return Err(OperationError::EmptyZone.into());
    }
    let left_half = halves.remove(1);
    let right_half = halves.remove(0);

    // The right leaf runs in the front track, the left leaf in the back
    // track; each is a 19mm skin at its track depth.
    let right_half = strip(store, right_half, FaceLabel::Front, 10.0)?;
    let (right_leaf, _) = peel_first(store, right_half, FaceLabel::Front, 19.0, &palette.door)?;
    let left_half = strip(store, left_half, FaceLabel::Back, 10.0)?;
    let (left_leaf, _) = peel_first(store, left_half, FaceLabel::Back, 19.0, &palette.door)?;
    boards.push(right_leaf);
    boards.push(left_leaf);
    Ok(rest)
}

pub(super) fn drawer(
    store: &mut FaceStore,
    zone: Zone,
    palette: &Palette,
    boards: &mut Vec<Zone>,
    push: bool,
    handle: Option<u8>,
) -> Result<Zone> {
    debug!(push, ?handle, "drawer");
    // Runner and swing clearances around the box.
    let zone = strip(store, zone, FaceLabel::Left, 3.0)?;
    let zone = strip(store, zone, FaceLabel::Right, 3.0)?;
    let zone = strip(store, zone, FaceLabel::Top, 3.0)?;
    let zone = strip(store, zone, FaceLabel::Bottom, 3.0)?;
    let zone = strip(store, zone, FaceLabel::Back, 19.0)?;

    let (mut front, zone) = peel_first(
        store,
        zone,
        FaceLabel::Front,
        palette.drawer.thickness,
        &palette.drawer,
    )?;
    front.block = Some(if push {
        FunctionalBlock::DrawerPush
    } else {
        FunctionalBlock::Drawer
    });
    front.handle_type = handle;
    boards.push(front);

    // Slide hardware clearances, kept as unpriced filler boards so the
    // neighbour search still sees closed volumes.
    let mut zone = zone;
    for (label, thickness) in [
        (FaceLabel::Top, 30.0),
        (FaceLabel::Bottom, 2.0),
        (FaceLabel::Left, 13.0),
        (FaceLabel::Right, 13.0),
    ] {
        let (planks, rest) = Envelope::new(label, thickness, None).execute(store, zone)?;
        boards.extend(planks);
        zone = rest;
    }

    // The box itself.
    for label in [
        FaceLabel::Left,
        FaceLabel::Right,
        FaceLabel::Back,
        FaceLabel::Bottom,
    ] {
        let (mut planks, rest) = Envelope::new(
            label,
            palette.interior.thickness,
            Some(palette.interior.clone()),
        )
        .execute(store, zone)?;
        zone = rest;
        if let Some(mut board) = planks.drain(..).next() {
            board.block = Some(FunctionalBlock::Drawer);
            boards.push(board);
        };
    }
    Ok(zone)
}

/// Recessed base: a shelf closing the plinth band plus a setback facade.
pub(super) fn plinth(
    store: &mut FaceStore,
    zone: Zone,
    palette: &Palette,
    boards: &mut Vec<Zone>,
    closed_back: bool,
) -> Result<Zone> {
    let (mut zones, mut separators) = Partition::new(
        Axis::Horizontal,
        SplitWeights::Lengths(vec![PLINTH_HEIGHT]),
        palette.interior.thickness,
        Some(palette.interior.clone()),
    )
    .execute(store, zone)?;
    if zones.len() < 2 {
        return Err(OperationError::EmptyZone.into());
    }
    if let Some(shelf) = separators.first_mut() {
        shelf.block = Some(FunctionalBlock::Plinth);
    }
    boards.append(&mut separators);

    let rest = zones.remove(1);
    let base = zones.remove(0);
    let (mut facade, base) = peel_first(
        store,
        base,
        FaceLabel::Front,
        palette.interior.thickness,
        &palette.interior,
    )?;
    facade.block = Some(FunctionalBlock::Plinth);
    boards.push(facade);
    if closed_back {
        let (mut back, _) = peel_first(
            store,
            base,
            FaceLabel::Back,
            palette.interior.thickness,
            &palette.interior,
        )?;
        back.block = Some(FunctionalBlock::Plinth);
        boards.push(back);
    }
    Ok(rest)
}

/// Gives back the zone behind a 19mm front setback.
pub(super) fn recess(store: &mut FaceStore, zone: Zone) -> Result<Zone> {
    strip(store, zone, FaceLabel::Front, 19.0)
}

/// Shrinks the zone by a 10mm fitting margin on sides, back and top.
pub(super) fn margin(store: &mut FaceStore, zone: Zone) -> Result<Zone> {
    let zone = strip(store, zone, FaceLabel::Right, 10.0)?;
    let zone = strip(store, zone, FaceLabel::Left, 10.0)?;
    let zone = strip(store, zone, FaceLabel::Back, 10.0)?;
    strip(store, zone, FaceLabel::Top, 10.0)
}

/// A 6mm glass shelf at mid-height; composition continues below it.
pub(super) fn glass_shelf(
    store: &mut FaceStore,
    zone: Zone,
    palette: &Palette,
    boards: &mut Vec<Zone>,
) -> Result<Zone> {
    let (mut zones, mut separators) = Partition::new(
        Axis::Horizontal,
        SplitWeights::equal(2),
        6.0,
        Some(palette.interior.clone()),
    )
    .execute(store, zone)?;
    if zones.len() < 2 {
        return Err(OperationError::EmptyZone.into());
    }
    for shelf in &mut separators {
        shelf.block = Some(FunctionalBlock::GlassShelf);
    }
    boards.append(&mut separators);
    Ok(zones.remove(1))
}

/// A tool-board panel against the back wall.
pub(super) fn pegboard(
    store: &mut FaceStore,
    zone: Zone,
    palette: &Palette,
    boards: &mut Vec<Zone>,
) -> Result<Zone> {
    let (mut panel, rest) = peel_first(
        store,
        zone,
        FaceLabel::Back,
        palette.interior.thickness,
        &palette.interior,
    )?;
    panel.block = Some(FunctionalBlock::Pegboard);
    boards.push(panel);
    Ok(rest)
}

/// Scalar range of the zone's used points along a direction.
fn span(zone: &Zone, store: &FaceStore, direction: &Vector3) -> Result<(f64, f64)> {
    zone.extent_along(store, direction)
}

/// Drills a 60mm cable grommet hole through every back panel produced so
/// far and records a placeholder marker for rendering.
pub(super) fn cable_hole(
    store: &mut FaceStore,
    zone: &Zone,
    boards: &mut Vec<Zone>,
) -> Result<()> {
    let frame = zone.frame;
    let (min_v, max_v) = span(zone, store, &frame.vertical)?;
    let (min_h, _) = span(zone, store, &frame.horizontal)?;
    let (min_a, _) = span(zone, store, &frame.frontal)?;
    let centre = Point3::from(
        (min_v + max_v) / 2.0 * frame.vertical
            + (min_h + 50.0) * frame.horizontal
            + min_a * frame.frontal,
    );

    for board in boards.iter_mut() {
        if board.kind != ZoneKind::Envelope(FaceLabel::Back) {
            continue;
        }
        let (Some(face_id), Some(grain)) = (board.machined_face, board.grain) else {
            continue;
        };
        let (normal, origin) = {
            let face = store.face(face_id)?;
            (face.plane.normal, board.points[face.contour[0]])
        };
        let across = normal.cross(&grain);
        let rel = centre - origin;
        let local = Vector3::new(rel.dot(&grain), rel.dot(&across), 0.0);
        let depth = board.thickness.unwrap_or(19.0) + 5.0;
        let hole = Alesage::template(AlesageKind::Cable, local, 30.0, depth, 50.0, DrillTarget::Flat)
            .placed_at(centre);
        store.face_mut(face_id)?.alesages.push(hole);
    }

    let mut marker = Zone::new(vec![centre], Vec::new(), frame);
    marker.block = Some(FunctionalBlock::CableHole);
    marker.name.clone_from(&zone.name);
    boards.push(marker);
    Ok(())
}

/// Records a hanging-rod placeholder spanning the zone width, 70mm under
/// its ceiling.
pub(super) fn hanging_rod(
    store: &mut FaceStore,
    zone: &Zone,
    boards: &mut Vec<Zone>,
) -> Result<()> {
    let frame = zone.frame;
    let (min_v, max_v) = span(zone, store, &frame.vertical)?;
    let (min_h, _) = span(zone, store, &frame.horizontal)?;
    let (min_a, max_a) = span(zone, store, &frame.frontal)?;
    let centre = Point3::from(
        (min_v + max_v) / 2.0 * frame.vertical
            + (min_h + 70.0) * frame.horizontal
            + (min_a + max_a) / 2.0 * frame.frontal,
    );
    let mut marker = Zone::new(vec![centre], Vec::new(), frame);
    marker.block = Some(FunctionalBlock::HangingRod);
    marker.name.clone_from(&zone.name);
    boards.push(marker);
    Ok(())
}
