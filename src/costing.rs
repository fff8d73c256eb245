//! Board-set pricing and the customer quote.
//!
//! Machining is priced off each board's machined face: its perimeter is
//! edge-banded and cut, its drillings counted. Material is priced by
//! panel area, hardware by functional block. Fixed fees (palletizing,
//! transport, design) and the installation share are added on top, then
//! the whole estimate carries the commercial markup.

use serde::Serialize;
use tracing::debug;

use crate::catalog::Material;
use crate::error::Result;
use crate::topology::{FaceStore, FunctionalBlock, Zone};

/// Workshop and commercial rates. Money is in euros, lengths in
/// millimetres.
#[derive(Debug, Clone)]
pub struct Rates {
    /// Per drilled hole.
    pub drilling: f64,
    /// Per metre of machined-face perimeter.
    pub edge_banding: f64,
    /// Per metre of cut.
    pub cutting: f64,
    /// Per order.
    pub palletizing: f64,
    pub transport: f64,
    pub design: f64,
    /// Per drawer-box board (slide set share).
    pub drawer_hardware: f64,
    /// Per hinged leaf (hinge pair and mounting).
    pub door_hardware: f64,
    /// Installation share of machining plus material.
    pub installation_factor: f64,
    pub markup: f64,
    pub vat: f64,
}

impl Default for Rates {
    fn default() -> Self {
        Self {
            drilling: 0.52,
            edge_banding: 2.15,
            cutting: 1.15,
            palletizing: 55.0,
            transport: 150.0,
            design: 100.0,
            drawer_hardware: 15.0,
            door_hardware: 50.0,
            installation_factor: 0.5,
            markup: 2.0,
            vat: 1.2,
        }
    }
}

/// One category of the quote breakdown.
#[derive(Debug, Clone, Serialize)]
pub struct QuoteLine {
    pub category: String,
    pub total: f64,
    pub total_with_tax: f64,
}

/// The customer-facing estimate. The category lines sum to the pre-tax
/// total.
#[derive(Debug, Clone, Serialize)]
pub struct Quote {
    pub description: String,
    /// The command string the furniture was built from.
    pub command: String,
    pub total: f64,
    pub total_with_tax: f64,
    pub lines: Vec<QuoteLine>,
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Prices a produced board set.
///
/// Placeholder entries and sliding rails are not priced. A board with no
/// assigned material falls back to `default_material`.
///
/// # Errors
///
/// Returns an error if a board references a face missing from the store.
pub fn estimate(
    store: &FaceStore,
    boards: &[Zone],
    default_material: &Material,
    command: &str,
    rates: &Rates,
) -> Result<Quote> {
    let mut machining = 0.0;
    let mut material_cost = 0.0;
    let mut hardware = 0.0;

    for board in boards
        .iter()
        .filter(|b| b.is_board && b.block != Some(FunctionalBlock::SlideRail))
    {
        if let Some(face) = board.machined_face {
            machining += board.face_perimeter(store, face)? / 1000.0
                * (rates.edge_banding + rates.cutting);
            #[allow(clippy::cast_precision_loss)]
            let holes = store.face(face)?.alesages.len() as f64;
            machining += holes * rates.drilling;
        }
        let material = board.material.as_ref().unwrap_or(default_material);
        material_cost += board.volume(store)? / material.thickness / 1e6 * material.price_m2;
        match board.block {
            Some(FunctionalBlock::Drawer) => hardware += rates.drawer_hardware,
            Some(FunctionalBlock::DoorLeft | FunctionalBlock::DoorRight) => {
                hardware += rates.door_hardware;
            }
            _ => {}
        }
    }
    machining += rates.palletizing;

    let installation = rates.installation_factor * (machining + material_cost);
    let cost =
        machining + rates.transport + material_cost + hardware + installation + rates.design;
    let total = cost * rates.markup;
    debug!(machining, material_cost, hardware, total, "estimate");

    let lines = [
        ("Design", rates.design),
        ("Materials", material_cost),
        ("Hardware", hardware),
        ("Machining", machining),
        ("Transport", rates.transport),
        ("Installation", installation),
    ]
    .into_iter()
    .map(|(category, amount)| QuoteLine {
        category: category.into(),
        total: amount * rates.markup,
        total_with_tax: round2(amount * rates.markup * rates.vat),
    })
    .collect();

    Ok(Quote {
        description: "custom furniture".into(),
        command: command.into(),
        total,
        total_with_tax: round2(total * rates.vat),
        lines,
    })
}
