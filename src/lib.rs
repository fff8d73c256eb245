//! Parametric furniture decomposition kernel.
//!
//! A cabinet is described by a compact opcode string. Interpreting it
//! recursively carves a boxy volume into rooms and boards by plane
//! clipping, then neighbour detection drills the assembly hardware and
//! the costing pass prices the resulting board set.

pub mod catalog;
pub mod costing;
pub mod error;
pub mod interpreter;
pub mod math;
pub mod operations;
pub mod placement;
pub mod topology;

pub use error::{LaminaError, Result};

use catalog::MaterialCatalog;
use costing::{Quote, Rates};
use topology::{FaceStore, Zone};

/// Runs the full pipeline: interpretation, feature placement, pricing.
///
/// Returns the drilled board set and its quote.
///
/// # Errors
///
/// Returns an error on malformed commands or degenerate geometry;
/// recoverable issues are logged and skipped.
pub fn produce(
    command: &str,
    catalog: &MaterialCatalog,
    rates: &Rates,
) -> Result<(Vec<Zone>, Quote)> {
    let mut store = FaceStore::new();
    let mut boards = interpreter::interpret(&mut store, command, catalog)?;
    placement::place_features(&mut store, &mut boards)?;
    let palette = catalog.default_palette()?;
    let quote = costing::estimate(&store, &boards, &palette.exterior, command, rates)?;
    Ok((boards, quote))
}
