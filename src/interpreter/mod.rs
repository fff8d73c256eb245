//! Textual command interpreter.
//!
//! A furniture description is a flat character string: one opcode per
//! character, with `(...)` groups holding comma-separated sub-programs
//! and `[...]` groups holding integer weight lists. The interpreter is a
//! cursor-based recursive scanner; each opcode consumes exactly the
//! characters it read. Geometry-degenerate input aborts the run, every
//! other failure logs a warning, skips the opcode and keeps going so a
//! best-effort board list is still produced.

mod recipes;

use tracing::{debug, warn};

use crate::catalog::{MaterialCatalog, Palette};
use crate::error::{GeometryError, LaminaError, OperationError, Result};
use crate::operations::creation::{
    corner_post_box, MakeAtticBox, MakeBox, MakeCornerBox, MakeSlantBox, MakeStairBox,
};
use crate::operations::{Partition, Split, SplitWeights};
use crate::topology::{Axis, FaceLabel, FaceStore, Zone};

use recipes::DoorVariant;

/// Runs a command string against a fresh zone and returns the produced
/// boards (plus placeholder entries for rods and cable holes) in
/// interpretation order.
///
/// # Errors
///
/// Returns an error on malformed grammar (unterminated groups, unparsable
/// numbers) or degenerate geometry. Recoverable opcode failures are
/// logged and skipped.
pub fn interpret(
    store: &mut FaceStore,
    command: &str,
    catalog: &MaterialCatalog,
) -> Result<Vec<Zone>> {
    let palette = catalog.default_palette()?;
    let mut boards = Vec::new();
    let chars: Vec<char> = command.chars().collect();
    run(store, catalog, &mut boards, &chars, None, palette)?;
    Ok(boards)
}

/// An error the interpreter must not swallow.
fn fatal(error: &LaminaError) -> bool {
    matches!(
        error,
        LaminaError::Geometry(GeometryError::Degenerate(_))
            | LaminaError::Operation(OperationError::InvalidInput(_))
    )
}

/// Scans one (sub-)program. The current zone starts empty at top level;
/// a trailing run of blanks pads the input so trailing opcodes can peek
/// ahead safely.
fn run(
    store: &mut FaceStore,
    catalog: &MaterialCatalog,
    boards: &mut Vec<Zone>,
    program: &[char],
    mut zone: Option<Zone>,
    mut palette: Palette,
) -> Result<()> {
    let chars: Vec<char> = program.iter().copied().chain([' ', ' ', ' ']).collect();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        let consumed = match c {
            'M' => initializer(store, &chars, i, &mut zone)?,
            'V' => axis_family(store, catalog, boards, &chars, i, &zone, &palette, Axis::Vertical)?,
            'H' => {
                axis_family(store, catalog, boards, &chars, i, &zone, &palette, Axis::Horizontal)?
            }
            'A' => axis_family(store, catalog, boards, &chars, i, &zone, &palette, Axis::Frontal)?,
            'E' => {
                apply(store, boards, &palette, &mut zone, c, |s, z, p, b| {
                    let z = recipes::panel(s, z, FaceLabel::Right, &p.exterior, b)?;
                    let z = recipes::panel(s, z, FaceLabel::Left, &p.exterior, b)?;
                    recipes::panel(s, z, FaceLabel::Top, &p.exterior, b)
                })?;
                1
            }
            'F' => {
                apply(store, boards, &palette, &mut zone, c, |s, z, p, b| {
                    recipes::panel(s, z, FaceLabel::Back, &p.exterior, b)
                })?;
                1
            }
            'h' | 'b' | 'g' | 'd' => {
                let label = match c {
                    'h' => FaceLabel::Top,
                    'b' => FaceLabel::Bottom,
                    'g' => FaceLabel::Left,
                    _ => FaceLabel::Right,
                };
                apply(store, boards, &palette, &mut zone, c, |s, z, p, b| {
                    recipes::panel(s, z, label, &p.exterior, b)
                })?;
                1
            }
            'a' => {
                apply(store, boards, &palette, &mut zone, c, |s, z, p, b| {
                    recipes::panel(s, z, FaceLabel::Front, &p.door, b)
                })?;
                1
            }
            'P' => door(store, boards, &chars, i, &mut zone, &palette)?,
            'T' => drawer(store, boards, &chars, i, &mut zone, &palette)?,
            'S' => {
                let closed_back = chars.get(i + 1) == Some(&'2');
                apply(store, boards, &palette, &mut zone, c, |s, z, p, b| {
                    recipes::plinth(s, z, p, b, closed_back)
                })?;
                if closed_back {
                    2
                } else {
                    1
                }
            }
            'R' => {
                apply(store, boards, &palette, &mut zone, c, |s, z, _, _| {
                    recipes::recess(s, z)
                })?;
                1
            }
            'r' => {
                if let Some(current) = &zone {
                    current.rotate_labels(store)?;
                } else {
                    warn!(opcode = %c, "no active zone, opcode skipped");
                }
                1
            }
            'v' => {
                apply(store, boards, &palette, &mut zone, c, |s, z, p, b| {
                    recipes::glass_shelf(s, z, p, b)
                })?;
                1
            }
            'p' => {
                apply(store, boards, &palette, &mut zone, c, |s, z, p, b| {
                    recipes::pegboard(s, z, p, b)
                })?;
                1
            }
            'm' => {
                apply(store, boards, &palette, &mut zone, c, |s, z, _, _| {
                    recipes::margin(s, z)
                })?;
                1
            }
            'c' => {
                if let Some(current) = &zone {
                    if let Err(e) = recipes::cable_hole(store, current, boards) {
                        if fatal(&e) {
                            return Err(e);
                        }
                        warn!(opcode = %c, error = %e, "opcode failed, skipped");
                    }
                } else {
                    warn!(opcode = %c, "no active zone, opcode skipped");
                }
                1
            }
            'D' => {
                if let Some(current) = &zone {
                    if let Err(e) = recipes::hanging_rod(store, current, boards) {
                        if fatal(&e) {
                            return Err(e);
                        }
                        warn!(opcode = %c, error = %e, "opcode failed, skipped");
                    }
                } else {
                    warn!(opcode = %c, "no active zone, opcode skipped");
                }
                1
            }
            'C' => {
                if chars.get(i + 1) == Some(&'(') {
                    let (names, used) = group(&chars, i + 1)?;
                    if names.len() == 4 {
                        let names: Vec<String> =
                            names.iter().map(|n| n.iter().collect()).collect();
                        match catalog.palette(&names[0], &names[1], &names[2], &names[3]) {
                            Ok(next) => palette = next,
                            Err(e) => {
                                warn!(error = %e, "palette change skipped");
                            }
                        }
                    } else {
                        warn!(count = names.len(), "palette change needs four materials");
                    }
                    1 + used
                } else {
                    1
                }
            }
            'N' => {
                if chars.get(i + 1) == Some(&'(') {
                    let (items, used) = group(&chars, i + 1)?;
                    if let (Some(current), Some(name)) = (&mut zone, items.first()) {
                        current.name = name.iter().collect();
                    }
                    1 + used
                } else {
                    1
                }
            }
            c if c.is_whitespace() => 1,
            other => {
                warn!(opcode = %other, "unknown opcode skipped");
                1
            }
        };
        i += consumed.max(1);
    }
    Ok(())
}

/// Runs one zone-consuming recipe, replacing the current zone on success
/// and keeping it on a recoverable failure.
fn apply(
    store: &mut FaceStore,
    boards: &mut Vec<Zone>,
    palette: &Palette,
    zone: &mut Option<Zone>,
    opcode: char,
    recipe: impl FnOnce(&mut FaceStore, Zone, &Palette, &mut Vec<Zone>) -> Result<Zone>,
) -> Result<()> {
    let Some(current) = zone.clone() else {
        warn!(opcode = %opcode, "no active zone, opcode skipped");
        return Ok(());
    };
    match recipe(store, current, palette, boards) {
        Ok(next) => {
            *zone = Some(next);
            Ok(())
        }
        Err(e) if fatal(&e) => Err(e),
        Err(e) => {
            warn!(opcode = %opcode, error = %e, "opcode failed, zone left unchanged");
            Ok(())
        }
    }
}

/// `M` + digit + parenthesized dimensions: creates the root zone.
fn initializer(
    store: &mut FaceStore,
    chars: &[char],
    i: usize,
    zone: &mut Option<Zone>,
) -> Result<usize> {
    let digit = *chars.get(i + 1).unwrap_or(&' ');
    if !digit.is_ascii_digit() {
        warn!(variant = %digit, "unknown initializer variant skipped");
        return Ok(1);
    }
    let (items, used) = group(chars, i + 2)?;
    let dims: Vec<f64> = items
        .iter()
        .map(|item| number(item))
        .collect::<Result<_>>()?;
    let arity_error = || {
        LaminaError::from(OperationError::InvalidInput(format!(
            "initializer M{digit} got {} dimensions",
            dims.len()
        )))
    };
    debug!(variant = %digit, ?dims, "initializer");
    let created = match (digit, dims.as_slice()) {
        ('0', &[a, b, c, d, e, f]) => corner_post_box(store, a, b, [c, e, d, f])?,
        ('1', &[w, d, h]) => MakeBox::new(w, d, h).execute(store)?,
        ('2', &[w, d, back, front]) => MakeAtticBox::new(w, d, back, front).execute(store)?,
        ('3', &[w, d, right, left]) => MakeSlantBox::new(w, d, right, left).execute(store)?,
        ('4', &[w, ld, rd, h]) => MakeStairBox::new(w, ld, rd, h).execute(store)?,
        ('5', &[w, d, h]) => MakeCornerBox::new(w, d, h).execute(store)?,
        ('0'..='5', _) => return Err(arity_error()),
        _ => {
            warn!(variant = %digit, "unknown initializer variant skipped");
            return Ok(2 + used);
        }
    };
    *zone = Some(created);
    Ok(2 + used)
}

/// The `V`/`H`/`A` family: optional `I` (board-less), optional `L`
/// (length mode), then a digit, a `[...]` weight list or a direct `(`,
/// optionally followed by `(...)` sub-programs applied to the sub-zones
/// in axis order. The current zone itself is left untouched.
#[allow(clippy::too_many_arguments)]
fn axis_family(
    store: &mut FaceStore,
    catalog: &MaterialCatalog,
    boards: &mut Vec<Zone>,
    chars: &[char],
    i: usize,
    zone: &Option<Zone>,
    palette: &Palette,
    axis: Axis,
) -> Result<usize> {
    let mut j = i + 1;
    let boardless = chars.get(j) == Some(&'I');
    if boardless {
        j += 1;
    }
    let length_mode = chars.get(j) == Some(&'L');
    if length_mode {
        j += 1;
    }

    let weights = match *chars.get(j).unwrap_or(&' ') {
        '(' => SplitWeights::equal(2),
        '[' => {
            let (items, used) = group(chars, j)?;
            j += used;
            let values: Vec<f64> = items
                .iter()
                .map(|item| integer(item))
                .collect::<Result<_>>()?;
            if length_mode {
                SplitWeights::Lengths(values)
            } else {
                SplitWeights::Proportions(values)
            }
        }
        d if d.is_ascii_digit() => {
            j += 1;
            SplitWeights::equal(d.to_digit(10).unwrap_or(1) as usize)
        }
        other => {
            warn!(axis = ?axis, next = %other, "malformed axis split skipped");
            return Ok(j - i);
        }
    };

    let zones = match zone {
        Some(current) => {
            let outcome = if boardless {
                Split::new(axis, weights)
                    .execute(store, current.clone())
                    .map(|zones| (zones, Vec::new()))
            } else {
                Partition::new(
                    axis,
                    weights,
                    palette.interior.thickness,
                    Some(palette.interior.clone()),
                )
                .execute(store, current.clone())
            };
            match outcome {
                Ok((zones, separators)) => {
                    if !boardless && palette.interior.thickness > 1.0 {
                        boards.extend(separators);
                    }
                    zones
                }
                Err(e) if fatal(&e) => return Err(e),
                Err(e) => {
                    warn!(axis = ?axis, error = %e, "axis split failed, skipped");
                    Vec::new()
                }
            }
        }
        None => {
            warn!(axis = ?axis, "no active zone, axis split skipped");
            Vec::new()
        }
    };

    if chars.get(j) == Some(&'(') {
        let (subs, used) = group(chars, j)?;
        j += used;
        for (sub, sub_zone) in subs.iter().zip(zones.into_iter()) {
            run(store, catalog, boards, sub, Some(sub_zone), palette.clone())?;
        }
    }
    Ok(j - i)
}

/// `P` + variant letter/digit: door recipes.
fn door(
    store: &mut FaceStore,
    boards: &mut Vec<Zone>,
    chars: &[char],
    i: usize,
    zone: &mut Option<Zone>,
    palette: &Palette,
) -> Result<usize> {
    let (variant, mut consumed) = match chars.get(i + 1) {
        Some('g') => (DoorVariant::Left, 2),
        Some('d') => (DoorVariant::Right, 2),
        Some('2') => (DoorVariant::Double, 2),
        Some('m') => (DoorVariant::Mirror, 2),
        Some('o') => (DoorVariant::Push, 2),
        Some('c') => (DoorVariant::Sliding, 2),
        _ => (DoorVariant::Plain, 1),
    };
    let mut handle = None;
    if matches!(
        variant,
        DoorVariant::Left | DoorVariant::Right | DoorVariant::Double | DoorVariant::Mirror
    ) {
        if let Some(d) = chars.get(i + consumed).and_then(|c| c.to_digit(10)) {
            handle = u8::try_from(d).ok();
            consumed += 1;
        }
    }
    apply(store, boards, palette, zone, 'P', |s, z, p, b| {
        recipes::door(s, z, p, b, variant, handle)
    })?;
    Ok(consumed)
}

/// `T` [+`o`] [+ handle digit]: drawer recipe.
fn drawer(
    store: &mut FaceStore,
    boards: &mut Vec<Zone>,
    chars: &[char],
    i: usize,
    zone: &mut Option<Zone>,
    palette: &Palette,
) -> Result<usize> {
    let push = chars.get(i + 1) == Some(&'o');
    let mut consumed = if push { 2 } else { 1 };
    let mut handle = None;
    if let Some(d) = chars.get(i + consumed).and_then(|c| c.to_digit(10)) {
        handle = u8::try_from(d).ok();
        consumed += 1;
    }
    apply(store, boards, palette, zone, 'T', |s, z, p, b| {
        recipes::drawer(s, z, p, b, push, handle)
    })?;
    Ok(consumed)
}

/// Splits the bracket group starting at `chars[start]` into its depth-one
/// comma-separated items. Returns the items (bracket and comma characters
/// stripped at depth one only) and the total characters consumed,
/// closing bracket included.
fn group(chars: &[char], start: usize) -> Result<(Vec<Vec<char>>, usize)> {
    if !matches!(chars.get(start), Some('(' | '[')) {
        return Err(
            OperationError::InvalidInput("expected an opening bracket".into()).into(),
        );
    }
    let mut depth = 0usize;
    let mut items = Vec::new();
    let mut current = Vec::new();
    for (offset, &c) in chars[start..].iter().enumerate() {
        match c {
            '(' | '[' => {
                depth += 1;
                if depth > 1 {
                    current.push(c);
                }
            }
            ')' | ']' => {
                depth -= 1;
                if depth == 0 {
                    items.push(current);
                    return Ok((items, offset + 1));
                }
                current.push(c);
            }
            ',' if depth == 1 => items.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    Err(OperationError::InvalidInput("unterminated group".into()).into())
}

fn number(item: &[char]) -> Result<f64> {
    let text: String = item.iter().collect();
    text.trim()
        .parse()
        .map_err(|_| OperationError::InvalidInput(format!("not a number: {text:?}")).into())
}

fn integer(item: &[char]) -> Result<f64> {
    let text: String = item.iter().collect();
    let value: i64 = text
        .trim()
        .parse()
        .map_err(|_| LaminaError::from(OperationError::InvalidInput(format!(
            "not an integer weight: {text:?}"
        ))))?;
    #[allow(clippy::cast_precision_loss)]
    Ok(value as f64)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::topology::{FunctionalBlock, ZoneKind};
    use approx::assert_relative_eq;

    fn boards_for(command: &str) -> (FaceStore, Vec<Zone>) {
        let mut store = FaceStore::new();
        let catalog = MaterialCatalog::builtin();
        let boards = interpret(&mut store, command, &catalog).unwrap();
        (store, boards)
    }

    #[test]
    fn group_splits_at_depth_one_only() {
        let chars: Vec<char> = "(ab,c(d,e)f,[1,2])x".chars().collect();
        let (items, used) = group(&chars, 0).unwrap();
        assert_eq!(used, 18);
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].iter().collect::<String>(), "ab");
        assert_eq!(items[1].iter().collect::<String>(), "c(d,e)f");
        assert_eq!(items[2].iter().collect::<String>(), "[1,2]");
    }

    #[test]
    fn shell_and_plinth_produce_five_boards() {
        let (store, boards) = boards_for("M1(1000,400,2000)ES");
        // Right, left, top panels, then the plinth shelf and its facade.
        assert_eq!(boards.len(), 5);
        assert_eq!(boards[0].kind, ZoneKind::Envelope(FaceLabel::Right));
        assert_eq!(boards[1].kind, ZoneKind::Envelope(FaceLabel::Left));
        assert_eq!(boards[2].kind, ZoneKind::Envelope(FaceLabel::Top));
        assert_eq!(boards[3].block, Some(FunctionalBlock::Plinth));
        assert_eq!(boards[4].block, Some(FunctionalBlock::Plinth));
        for board in &boards {
            assert_eq!(board.thickness, Some(19.0));
        }
        assert_relative_eq!(
            boards[0].volume(&store).unwrap(),
            19.0 * 400.0 * 2000.0,
            max_relative = 1e-9
        );
    }

    #[test]
    fn boardless_split_recurses_into_both_zones() {
        // Two equal compartments, a back panel in each.
        let (store, boards) = boards_for("M1(600,400,2000)VI2(F,F)");
        assert_eq!(boards.len(), 2);
        for board in &boards {
            assert_eq!(board.kind, ZoneKind::Envelope(FaceLabel::Back));
            assert_relative_eq!(
                board.volume(&store).unwrap(),
                300.0 * 19.0 * 2000.0,
                max_relative = 1e-9
            );
        }
    }

    #[test]
    fn board_split_inserts_a_separator() {
        let (store, boards) = boards_for("M1(619,400,2000)V2");
        assert_eq!(boards.len(), 1);
        assert_eq!(boards[0].kind, ZoneKind::Partition(Axis::Vertical));
        assert_relative_eq!(
            boards[0].volume(&store).unwrap(),
            19.0 * 400.0 * 2000.0,
            max_relative = 1e-9
        );
    }

    #[test]
    fn unknown_opcodes_are_skipped() {
        let (_, boards) = boards_for("M1(600,400,2000)XqF");
        assert_eq!(boards.len(), 1);
        assert_eq!(boards[0].kind, ZoneKind::Envelope(FaceLabel::Back));
    }

    #[test]
    fn length_mode_split_uses_absolute_millimetres() {
        let (store, boards) = boards_for("M1(600,400,2000)HIL[400](T,)");
        // One drawer in the first 400mm compartment: front panel, four
        // clearance boards, four box boards.
        assert_eq!(boards.len(), 9);
        assert_eq!(boards[0].block, Some(FunctionalBlock::Drawer));
        let front = &boards[0];
        let (min, max) = front
            .extent_along(&store, &front.frame.horizontal)
            .unwrap();
        assert!(max - min <= 400.0);
    }

    #[test]
    fn overconstrained_lengths_degrade_gracefully() {
        let (_, boards) = boards_for("M1(600,400,2000)HL[1500,900]F");
        // The split is skipped, the back panel still lands.
        assert_eq!(boards.len(), 1);
    }

    #[test]
    fn left_door_carries_handle_and_block() {
        let (_, boards) = boards_for("M1(600,400,2000)Pg2");
        assert_eq!(boards.len(), 1);
        let leaf = &boards[0];
        assert_eq!(leaf.block, Some(FunctionalBlock::DoorLeft));
        assert_eq!(leaf.handle_type, Some(2));
        assert_eq!(leaf.material.as_ref().unwrap().name, "Chêne Brun");
    }

    #[test]
    fn double_door_produces_two_leaves() {
        let (_, boards) = boards_for("M1(800,400,2000)P2");
        assert_eq!(boards.len(), 2);
        assert_eq!(boards[0].block, Some(FunctionalBlock::DoorLeft));
        assert_eq!(boards[1].block, Some(FunctionalBlock::DoorRight));
    }

    #[test]
    fn sliding_door_emits_rail_and_two_leaves() {
        let (_, boards) = boards_for("M1(1200,600,2000)Pc");
        assert_eq!(boards.len(), 3);
        assert_eq!(boards[0].block, Some(FunctionalBlock::SlideRail));
        assert_eq!(boards[1].block, Some(FunctionalBlock::SlidingDoor));
        assert_eq!(boards[2].block, Some(FunctionalBlock::SlidingDoor));
    }

    #[test]
    fn palette_change_applies_to_later_boards() {
        let (_, boards) =
            boards_for("M1(600,400,2000)FC(Noir Mat,Noir Mat,Noir Mat,Noir Mat)F");
        assert_eq!(boards.len(), 2);
        assert_eq!(boards[0].material.as_ref().unwrap().name, "Blanc Premium");
        assert_eq!(boards[1].material.as_ref().unwrap().name, "Noir Mat");
    }

    #[test]
    fn named_zone_is_propagated_to_its_boards() {
        let (_, boards) = boards_for("M1(600,400,2000)N(dressing)F");
        assert_eq!(boards[0].name, "dressing");
    }

    #[test]
    fn glass_shelf_continues_in_the_upper_zone() {
        let (_, boards) = boards_for("M1(600,400,2000)vF");
        assert_eq!(boards.len(), 2);
        assert_eq!(boards[0].block, Some(FunctionalBlock::GlassShelf));
        assert_eq!(boards[0].thickness, Some(6.0));
        assert_eq!(boards[1].kind, ZoneKind::Envelope(FaceLabel::Back));
    }

    #[test]
    fn hanging_rod_adds_a_placeholder() {
        let (_, boards) = boards_for("M1(600,400,2000)D");
        assert_eq!(boards.len(), 1);
        assert!(!boards[0].is_board);
        assert_eq!(boards[0].block, Some(FunctionalBlock::HangingRod));
        assert_eq!(boards[0].points.len(), 1);
    }

    #[test]
    fn cable_hole_drills_the_back_panel() {
        let (store, boards) = boards_for("M1(600,400,2000)Fc");
        assert_eq!(boards.len(), 2);
        let back = &boards[0];
        let machined = back.machined_face.unwrap();
        let drills = &store.face(machined).unwrap().alesages;
        assert_eq!(drills.len(), 1);
        assert_relative_eq!(drills[0].radius, 30.0);
        assert!(drills[0].world.is_some());
    }
}
