use tracing::debug;

use crate::error::{OperationError, Result};
use crate::math::Plane;
use crate::topology::{Axis, FaceStore, Zone};

use super::clip::{CapSeed, Clip};

/// How a zone's extent is shared between the sub-zones of a split.
#[derive(Debug, Clone)]
pub enum SplitWeights {
    /// Relative weights; normalized over the full extent.
    Proportions(Vec<f64>),
    /// Absolute lengths in millimetres. The remainder of the extent is
    /// appended as a final implicit band.
    Lengths(Vec<f64>),
}

impl SplitWeights {
    /// `n` equal bands.
    #[must_use]
    pub fn equal(n: usize) -> Self {
        Self::Proportions(vec![1.0; n])
    }

    /// Normalized per-band fractions over `total`.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::OverconstrainedPartition`] when absolute
    /// lengths exceed the available extent.
    pub(crate) fn fractions(&self, total: f64) -> Result<Vec<f64>> {
        let weights = match self {
            Self::Proportions(weights) => weights.clone(),
            Self::Lengths(lengths) => {
                let requested: f64 = lengths.iter().sum();
                let remainder = total - requested;
                if remainder < 0.0 {
                    return Err(OperationError::OverconstrainedPartition {
                        available: total,
                        requested,
                        overflow: -remainder,
                    }
                    .into());
                }
                let mut weights = lengths.clone();
                weights.push(remainder);
                weights
            }
        };
        let sum: f64 = weights.iter().sum();
        if sum <= 0.0 {
            return Err(OperationError::InvalidInput("split weights sum to zero".into()).into());
        }
        Ok(weights.into_iter().map(|w| w / sum).collect())
    }
}

/// Cuts a zone into bands along one of the furniture axes without
/// introducing any material.
///
/// Bands are returned ordered along the positive axis direction; in
/// length mode the listed lengths are consumed from the start of that
/// direction and the remainder forms the last band.
#[derive(Debug, Clone)]
pub struct Split {
    axis: Axis,
    weights: SplitWeights,
}

impl Split {
    #[must_use]
    pub fn new(axis: Axis, weights: SplitWeights) -> Self {
        Self { axis, weights }
    }

    /// Executes the operation.
    ///
    /// # Errors
    ///
    /// Returns an error when the lengths overconstrain the extent or a
    /// cut fails geometrically.
    pub fn execute(&self, store: &mut FaceStore, zone: Zone) -> Result<Vec<Zone>> {
        let normal = self.axis.normal(&zone.frame);
        let (min, max) = zone.extent_along(store, &normal)?;
        let fractions = self.weights.fractions(max - min)?;
        debug!(axis = ?self.axis, bands = fractions.len(), "split");

        let mut cumulative = 0.0;
        let mut rest = zone;
        let mut zones = Vec::with_capacity(fractions.len());
        for fraction in &fractions[..fractions.len() - 1] {
            cumulative += fraction;
            let d = min * (1.0 - cumulative) + max * cumulative;
            let plane = Plane::from_normal_offset(normal, d);
            let (plus, minus) =
                Clip::new(plane, CapSeed::Axis(self.axis), false).execute(store, &rest)?;
            zones.push(minus);
            rest = plus;
        }
        zones.push(rest);
        Ok(zones)
    }
}
