//! Panel materials and the four-slot palette the interpreter draws from.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{OperationError, Result};

/// A panel material from the supplier catalog. Prices are pre-tax.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub name: String,
    pub reference: String,
    /// Panel thickness in millimetres.
    pub thickness: f64,
    /// Stock panel length in millimetres.
    pub length: f64,
    /// Stock panel width in millimetres.
    pub width: f64,
    pub price_m2: f64,
    pub panel_area_m2: f64,
    pub panel_price: f64,
}

/// The material slots a command sequence assigns boards from. The `C`
/// opcode swaps the whole palette mid-sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Palette {
    pub exterior: Material,
    pub interior: Material,
    pub door: Material,
    pub drawer: Material,
}

/// Name-indexed material catalog, loadable from a JSON panel list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialCatalog {
    materials: BTreeMap<String, Material>,
}

#[derive(Deserialize)]
struct PanelFile {
    panneaux: Vec<Material>,
}

impl MaterialCatalog {
    /// The built-in catalog used when no panel file is supplied.
    #[must_use]
    pub fn builtin() -> Self {
        let materials = [
            Material {
                name: "Blanc Premium".into(),
                reference: "PAN-BP-19".into(),
                thickness: 19.0,
                length: 2800.0,
                width: 2070.0,
                price_m2: 28.5,
                panel_area_m2: 5.796,
                panel_price: 165.2,
            },
            Material {
                name: "Chêne Brun".into(),
                reference: "PAN-CB-19".into(),
                thickness: 19.0,
                length: 2800.0,
                width: 2070.0,
                price_m2: 42.0,
                panel_area_m2: 5.796,
                panel_price: 243.4,
            },
            Material {
                name: "Noir Mat".into(),
                reference: "PAN-NM-19".into(),
                thickness: 19.0,
                length: 2800.0,
                width: 2070.0,
                price_m2: 36.0,
                panel_area_m2: 5.796,
                panel_price: 208.7,
            },
        ];
        Self {
            materials: materials
                .into_iter()
                .map(|m| (m.name.clone(), m))
                .collect(),
        }
    }

    /// Parses a supplier panel file (`{"panneaux": [...]}`).
    ///
    /// # Errors
    ///
    /// Returns an error on malformed JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let file: PanelFile = serde_json::from_str(json)
            .map_err(|e| OperationError::InvalidInput(format!("panel catalog: {e}")))?;
        Ok(Self {
            materials: file
                .panneaux
                .into_iter()
                .map(|m| (m.name.clone(), m))
                .collect(),
        })
    }

    /// Looks up a material by catalog name.
    ///
    /// # Errors
    ///
    /// Returns an error when the name is not in the catalog.
    pub fn get(&self, name: &str) -> Result<&Material> {
        self.materials
            .get(name)
            .ok_or_else(|| OperationError::InvalidInput(format!("unknown material {name:?}")).into())
    }

    /// The default palette: white carcass, oak fronts.
    ///
    /// # Errors
    ///
    /// Returns an error if a default material is missing from the catalog.
    pub fn default_palette(&self) -> Result<Palette> {
        Ok(Palette {
            exterior: self.get("Blanc Premium")?.clone(),
            interior: self.get("Blanc Premium")?.clone(),
            door: self.get("Chêne Brun")?.clone(),
            drawer: self.get("Chêne Brun")?.clone(),
        })
    }

    /// Builds a palette from four material names (the `C` opcode).
    ///
    /// # Errors
    ///
    /// Returns an error when any name is not in the catalog.
    pub fn palette(
        &self,
        exterior: &str,
        interior: &str,
        door: &str,
        drawer: &str,
    ) -> Result<Palette> {
        Ok(Palette {
            exterior: self.get(exterior)?.clone(),
            interior: self.get(interior)?.clone(),
            door: self.get(door)?.clone(),
            drawer: self.get(drawer)?.clone(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_resolves_the_default_palette() {
        let catalog = MaterialCatalog::builtin();
        let palette = catalog.default_palette().unwrap();
        assert_eq!(palette.exterior.thickness, 19.0);
        assert_eq!(palette.door.name, "Chêne Brun");
    }

    #[test]
    fn unknown_material_is_an_error() {
        let catalog = MaterialCatalog::builtin();
        assert!(catalog.get("Marbre Rose").is_err());
    }

    #[test]
    fn catalog_round_trips_through_json() {
        let json = r#"{"panneaux":[{"name":"Gris Perle","reference":"PAN-GP-19",
            "thickness":19.0,"length":2800.0,"width":2070.0,"price_m2":31.0,
            "panel_area_m2":5.796,"panel_price":179.7}]}"#;
        let catalog = MaterialCatalog::from_json(json).unwrap();
        assert_eq!(catalog.get("Gris Perle").unwrap().price_m2, 31.0);
    }
}
