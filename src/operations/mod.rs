//! Solid-decomposition operators.
//!
//! Every operator is a small struct built with `new(...)` and run with
//! `execute(...)` against the run's face store. Operators consume zones
//! by value and hand back fresh ones; face lineage lives in the store.

pub mod clip;
pub mod creation;
pub mod envelope;
pub mod partition;
pub mod split;

pub use clip::{CapSeed, Clip};
pub use envelope::Envelope;
pub use partition::Partition;
pub use split::{Split, SplitWeights};

use crate::error::{GeometryError, Result};
use crate::math::{Vector3, TOLERANCE};
use crate::topology::Frame;

/// Wood grain direction for a board with the given face normal.
///
/// The grain runs in the board plane, perpendicular to the frontal axis
/// when possible; for facade-parallel boards (normal within
/// `parallel_limit` of the frontal axis) the vertical axis is used as
/// reference instead.
pub(crate) fn grain_direction(
    normal: &Vector3,
    frame: &Frame,
    parallel_limit: f64,
) -> Result<Vector3> {
    let reference = if normal.dot(&frame.frontal).abs() < parallel_limit {
        frame.frontal
    } else {
        frame.vertical
    };
    let grain = normal.cross(&reference);
    let len = grain.norm();
    if len < TOLERANCE {
        return Err(GeometryError::ZeroVector.into());
    }
    Ok(grain / len)
}
