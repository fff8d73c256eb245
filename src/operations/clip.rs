use std::collections::{BTreeMap, BTreeSet};

use crate::error::{GeometryError, Result};
use crate::math::contour::reconstruct_contour;
use crate::math::Plane;
use crate::topology::{Axis, Face, FaceId, FaceLabel, FaceStore, Zone};

/// Decides the labels of the two cap faces a clip creates.
#[derive(Debug, Clone, Copy)]
pub enum CapSeed {
    /// Cut across a furniture axis: the positive cap takes the label on
    /// the positive side of the axis normal (vertical: right, horizontal:
    /// top, frontal: front) and the negative cap its opposite.
    Axis(Axis),
    /// Cut parallel to a labeled boundary face: the negative cap keeps
    /// that label, the positive cap takes its opposite. This is the
    /// envelope case, where the negative zone is the board.
    Label(FaceLabel),
}

impl CapSeed {
    fn labels(self) -> (FaceLabel, FaceLabel) {
        match self {
            Self::Axis(Axis::Vertical) => (FaceLabel::Right, FaceLabel::Left),
            Self::Axis(Axis::Horizontal) => (FaceLabel::Top, FaceLabel::Bottom),
            Self::Axis(Axis::Frontal) => (FaceLabel::Front, FaceLabel::Back),
            Self::Label(label) => (label.opposite(), label),
        }
    }
}

/// Splits a zone in two along a plane.
///
/// Every face wholly on one side is cloned into that side's zone with the
/// original as lineage parent. A face crossed by the plane yields one
/// derived edge face per side, rebuilt from its surviving half-segments.
/// Both zones are closed by a cap face on the cut plane; the positive
/// cap's plane is the cut plane flipped so both caps point outward.
///
/// With `link` set, the two caps reference each other as `opposite`,
/// which is how board-to-board contacts are later recovered. A plain
/// space split passes `link = false`.
#[derive(Debug, Clone, Copy)]
pub struct Clip {
    plane: Plane,
    seed: CapSeed,
    link: bool,
}

impl Clip {
    #[must_use]
    pub fn new(plane: Plane, seed: CapSeed, link: bool) -> Self {
        Self { plane, seed, link }
    }

    /// Executes the operation, returning `(positive, negative)` zones.
    ///
    /// If the plane misses the zone entirely, one returned zone is the
    /// unchanged input (re-derived) and the other has no faces; callers
    /// must check for an empty face list before continuing to cut.
    ///
    /// # Errors
    ///
    /// Returns an error if a crossed face cannot be rebuilt into two
    /// closed contours, or if a referenced face is missing.
    pub fn execute(&self, store: &mut FaceStore, zone: &Zone) -> Result<(Zone, Zone)> {
        let mut points = zone.points.clone();
        let above = self.plane.classify(&points);

        // Undirected unique segments over the whole boundary, so a shared
        // edge is intersected once and both adjacent faces reuse the
        // same new point.
        let mut segments: BTreeSet<[usize; 2]> = BTreeSet::new();
        for &id in &zone.faces {
            for mut seg in store.face(id)?.segments() {
                seg.sort_unstable();
                segments.insert(seg);
            }
        }

        type Halves = (Option<[usize; 2]>, Option<[usize; 2]>);
        let mut halves: BTreeMap<[usize; 2], Halves> = BTreeMap::new();
        for &seg in &segments {
            let [a, b] = seg;
            let entry = if above[a] && above[b] {
                (Some(seg), None)
            } else if !above[a] && !above[b] {
                (None, Some(seg))
            } else {
                let hit = self
                    .plane
                    .line_intersection(&points[a], &points[b])
                    .ok_or_else(|| {
                        GeometryError::Degenerate(
                            "straddling segment parallel to the cut plane".into(),
                        )
                    })?;
                points.push(hit);
                let new = points.len() - 1;
                if above[a] {
                    (Some([a, new]), Some([b, new]))
                } else {
                    (Some([b, new]), Some([a, new]))
                }
            };
            halves.insert(seg, entry);
        }

        let mut plus_faces: Vec<FaceId> = Vec::new();
        let mut minus_faces: Vec<FaceId> = Vec::new();
        for &id in &zone.faces {
            let source = store.face(id)?;
            let (label, plane, contour) = (source.label, source.plane, source.contour.clone());

            if contour.iter().all(|&i| above[i]) {
                let mut derived = Face::new(label, plane, contour);
                derived.parent = Some(id);
                plus_faces.push(store.add_face(derived));
            } else if contour.iter().all(|&i| !above[i]) {
                let mut derived = Face::new(label, plane, contour);
                derived.parent = Some(id);
                minus_faces.push(store.add_face(derived));
            } else {
                let mut plus_half = Vec::new();
                let mut minus_half = Vec::new();
                let n = contour.len();
                for i in 0..n {
                    let mut seg = [contour[i], contour[(i + 1) % n]];
                    seg.sort_unstable();
                    if let Some(&(p, m)) = halves.get(&seg) {
                        if let Some(s) = p {
                            plus_half.push(s);
                        }
                        if let Some(s) = m {
                            minus_half.push(s);
                        }
                    }
                }

                let mut derived = Face::new(label, plane, reconstruct_contour(&plus_half)?);
                derived.is_edge = true;
                derived.parent = Some(id);
                plus_faces.push(store.add_face(derived));

                let mut derived = Face::new(label, plane, reconstruct_contour(&minus_half)?);
                derived.is_edge = true;
                derived.parent = Some(id);
                minus_faces.push(store.add_face(derived));
            }
        }

        // Plane misses the zone: hand everything to one side, no caps.
        if plus_faces.is_empty() || minus_faces.is_empty() {
            let mut plus = zone.clone();
            plus.points = points.clone();
            plus.faces = plus_faces;
            plus.compact(store)?;
            let mut minus = zone.clone();
            minus.points = points;
            minus.faces = minus_faces;
            minus.compact(store)?;
            return Ok((plus, minus));
        }

        // The cut-plane rim is the set of segments used by exactly one
        // positive face.
        let mut counts: BTreeMap<[usize; 2], usize> = BTreeMap::new();
        for &id in &plus_faces {
            for mut seg in store.face(id)?.segments() {
                seg.sort_unstable();
                *counts.entry(seg).or_insert(0) += 1;
            }
        }
        let rim: Vec<[usize; 2]> = counts
            .into_iter()
            .filter(|&(_, count)| count == 1)
            .map(|(seg, _)| seg)
            .collect();
        let cap_contour = reconstruct_contour(&rim)?;

        let (label_plus, label_minus) = self.seed.labels();
        let cap_plus = store.add_face(Face::new(
            label_plus,
            self.plane.flipped(),
            cap_contour.clone(),
        ));
        let cap_minus = store.add_face(Face::new(label_minus, self.plane, cap_contour));
        if self.link {
            store.face_mut(cap_plus)?.opposite = Some(cap_minus);
            store.face_mut(cap_minus)?.opposite = Some(cap_plus);
        }
        plus_faces.push(cap_plus);
        minus_faces.push(cap_minus);

        let mut plus = zone.clone();
        plus.points = points.clone();
        plus.faces = plus_faces;
        plus.compact(store)?;

        let mut minus = zone.clone();
        minus.points = points;
        minus.faces = minus_faces;
        minus.compact(store)?;

        Ok((plus, minus))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Vector3;
    use crate::operations::creation::MakeBox;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn segment_counts(store: &FaceStore, zone: &Zone) -> BTreeMap<[usize; 2], usize> {
        let mut counts = BTreeMap::new();
        for &id in &zone.faces {
            for mut seg in store.face(id).unwrap().segments() {
                seg.sort_unstable();
                *counts.entry(seg).or_insert(0) += 1;
            }
        }
        counts
    }

    fn assert_watertight(store: &FaceStore, zone: &Zone) {
        for (seg, count) in segment_counts(store, zone) {
            assert_eq!(count, 2, "segment {seg:?} is used {count} times");
        }
    }

    #[test]
    fn axis_cut_splits_volume_and_labels_caps() {
        let mut store = FaceStore::new();
        let zone = MakeBox::new(1000.0, 400.0, 2000.0).execute(&mut store).unwrap();

        // The vertical axis normal points toward negative x, so the
        // positive side of the cut is the left part of the furniture.
        let normal = zone.frame.vertical;
        let plane = Plane::from_normal_offset(normal, -400.0);
        let (plus, minus) = Clip::new(plane, CapSeed::Axis(Axis::Vertical), false)
            .execute(&mut store, &zone)
            .unwrap();

        assert_relative_eq!(
            plus.volume(&store).unwrap(),
            400.0 * 400.0 * 2000.0,
            max_relative = 1e-9
        );
        assert_relative_eq!(
            minus.volume(&store).unwrap(),
            600.0 * 400.0 * 2000.0,
            max_relative = 1e-9
        );
        assert_watertight(&store, &plus);
        assert_watertight(&store, &minus);

        let cap_plus = *plus.faces.last().unwrap();
        let cap_minus = *minus.faces.last().unwrap();
        assert_eq!(store.face(cap_plus).unwrap().label, FaceLabel::Right);
        assert_eq!(store.face(cap_minus).unwrap().label, FaceLabel::Left);
        // Unlinked cut: no opposite relation.
        assert!(store.face(cap_plus).unwrap().opposite.is_none());
    }

    #[test]
    fn caps_point_outward_from_their_zone() {
        let mut store = FaceStore::new();
        let zone = MakeBox::new(600.0, 400.0, 700.0).execute(&mut store).unwrap();
        let plane = Plane::from_normal_offset(Vector3::new(0.0, 1.0, 0.0), 350.0);
        let (plus, minus) = Clip::new(plane, CapSeed::Axis(Axis::Horizontal), false)
            .execute(&mut store, &zone)
            .unwrap();

        for z in [&plus, &minus] {
            for &id in &z.faces {
                let plane = store.face(id).unwrap().plane;
                for p in &z.points {
                    assert!(plane.eval(p) <= 1e-9);
                }
            }
        }
    }

    #[test]
    fn label_seed_links_the_caps_and_marks_derived_edges() {
        let mut store = FaceStore::new();
        let zone = MakeBox::new(600.0, 400.0, 700.0).execute(&mut store).unwrap();

        let left = zone.find_face(&store, FaceLabel::Left).unwrap().unwrap();
        let cut = store.face(left).unwrap().plane.offset(19.0);
        let (plus, minus) = Clip::new(cut, CapSeed::Label(FaceLabel::Left), true)
            .execute(&mut store, &zone)
            .unwrap();

        // The board (positive side) gets the opposite label on its cap.
        let cap_plus = *plus.faces.last().unwrap();
        let cap_minus = *minus.faces.last().unwrap();
        assert_eq!(store.face(cap_plus).unwrap().label, FaceLabel::Right);
        assert_eq!(store.face(cap_minus).unwrap().label, FaceLabel::Left);
        assert_eq!(store.face(cap_plus).unwrap().opposite, Some(cap_minus));
        assert_eq!(store.face(cap_minus).unwrap().opposite, Some(cap_plus));

        // Crossed faces became edge faces with lineage, kept faces did not.
        for z in [&plus, &minus] {
            for &id in &z.faces {
                let face = store.face(id).unwrap();
                if face.is_edge {
                    assert!(face.parent.is_some());
                }
            }
        }
        assert_relative_eq!(
            plus.volume(&store).unwrap(),
            19.0 * 400.0 * 700.0,
            max_relative = 1e-9
        );
    }

    #[test]
    fn missed_plane_leaves_one_side_empty() {
        let mut store = FaceStore::new();
        let zone = MakeBox::new(600.0, 400.0, 700.0).execute(&mut store).unwrap();
        let plane = Plane::from_normal_offset(Vector3::new(0.0, 1.0, 0.0), 5000.0);
        let (plus, minus) = Clip::new(plane, CapSeed::Axis(Axis::Horizontal), false)
            .execute(&mut store, &zone)
            .unwrap();

        assert!(plus.faces.is_empty());
        assert_eq!(minus.faces.len(), 6);
        assert_relative_eq!(
            minus.volume(&store).unwrap(),
            600.0 * 400.0 * 700.0,
            max_relative = 1e-9
        );
    }

    proptest! {
        #[test]
        fn any_interior_cut_conserves_volume(fraction in 0.05f64..0.95) {
            let mut store = FaceStore::new();
            let zone = MakeBox::new(1000.0, 400.0, 2000.0).execute(&mut store).unwrap();
            let plane = Plane::from_normal_offset(Vector3::new(0.0, 1.0, 0.0), fraction * 2000.0);
            let (plus, minus) = Clip::new(plane, CapSeed::Axis(Axis::Horizontal), false)
                .execute(&mut store, &zone)
                .unwrap();

            let total = plus.volume(&store).unwrap() + minus.volume(&store).unwrap();
            prop_assert!((total - 1000.0 * 400.0 * 2000.0).abs() < 1e-6);
            assert_watertight(&store, &plus);
            assert_watertight(&store, &minus);
        }
    }
}
