//! Crop definition models

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{PlanningError, PlanningResult};
use crate::types::is_valid_month;

/// Agronomic constants for one crop in the catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CropDefinition {
    pub id: String,
    pub display_name: String,
    /// Display glyph, opaque to the calculators
    pub icon: String,
    pub category: CropCategory,
    /// Calories per kilogram of harvested yield
    pub kcal_per_kg: Decimal,
    /// Expected harvest mass per planted unit
    pub yield_per_plant_kg: Decimal,
    /// Months (1-12) when sowing or planting is recommended
    pub sow_months: BTreeSet<u32>,
    /// Months (1-12) when harvesting is recommended
    pub harvest_months: BTreeSet<u32>,
    /// Registered at runtime rather than shipped with the built-in table
    #[serde(default)]
    pub custom: bool,
}

impl CropDefinition {
    /// Name key used for collision checks: trimmed and lowercased
    pub fn name_key(&self) -> String {
        normalize_name(&self.display_name)
    }

    pub fn sows_in(&self, month: u32) -> bool {
        self.sow_months.contains(&month)
    }

    pub fn harvests_in(&self, month: u32) -> bool {
        self.harvest_months.contains(&month)
    }

    /// Check the definition before it enters a catalog
    pub fn validate(&self) -> PlanningResult<()> {
        if self.id.trim().is_empty() {
            return Err(PlanningError::InvalidCrop("Crop id cannot be empty"));
        }
        if self.display_name.trim().is_empty() {
            return Err(PlanningError::InvalidCrop("Crop name cannot be empty"));
        }
        if self.kcal_per_kg < Decimal::ZERO {
            return Err(PlanningError::InvalidCrop("Calories per kg cannot be negative"));
        }
        if self.yield_per_plant_kg < Decimal::ZERO {
            return Err(PlanningError::InvalidCrop("Yield per plant cannot be negative"));
        }
        if !self
            .sow_months
            .iter()
            .chain(self.harvest_months.iter())
            .all(|m| is_valid_month(*m))
        {
            return Err(PlanningError::InvalidCrop("Months must be between 1 and 12"));
        }
        Ok(())
    }
}

/// Informational crop classification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CropCategory {
    Vegetable,
    Root,
    Legume,
    Fruit,
    Berry,
    Herb,
    Grain,
    #[serde(other)]
    Other,
}

impl std::fmt::Display for CropCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CropCategory::Vegetable => write!(f, "Vegetable"),
            CropCategory::Root => write!(f, "Root"),
            CropCategory::Legume => write!(f, "Legume"),
            CropCategory::Fruit => write!(f, "Fruit"),
            CropCategory::Berry => write!(f, "Berry"),
            CropCategory::Herb => write!(f, "Herb"),
            CropCategory::Grain => write!(f, "Grain"),
            CropCategory::Other => write!(f, "Other"),
        }
    }
}

/// Trim and lowercase a crop name or id for case-insensitive comparison
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Turn a crop name into an id fragment: lowercase ascii words joined by `-`
pub fn slugify(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn carrot() -> CropDefinition {
        CropDefinition {
            id: "carrot".to_string(),
            display_name: "Carrot".to_string(),
            icon: "🥕".to_string(),
            category: CropCategory::Root,
            kcal_per_kg: Decimal::from(410),
            yield_per_plant_kg: Decimal::new(8, 2),
            sow_months: BTreeSet::from([4, 5, 6]),
            harvest_months: BTreeSet::from([8, 9, 10]),
            custom: false,
        }
    }

    #[test]
    fn test_validate_ok() {
        assert!(carrot().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_month() {
        let mut crop = carrot();
        crop.harvest_months.insert(13);
        assert!(crop.validate().is_err());

        let mut crop = carrot();
        crop.sow_months.insert(0);
        assert!(crop.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_negative_constants() {
        let mut crop = carrot();
        crop.kcal_per_kg = Decimal::from(-1);
        assert!(crop.validate().is_err());

        let mut crop = carrot();
        crop.yield_per_plant_kg = Decimal::new(-1, 1);
        assert!(crop.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_blank_name() {
        let mut crop = carrot();
        crop.display_name = "   ".to_string();
        assert_eq!(
            crop.validate(),
            Err(PlanningError::InvalidCrop("Crop name cannot be empty"))
        );
    }

    #[test]
    fn test_name_key_and_slug() {
        let mut crop = carrot();
        crop.display_name = "  Purple Carrot ".to_string();
        assert_eq!(crop.name_key(), "purple carrot");
        assert_eq!(slugify("  Purple  Carrot (heirloom) "), "purple-carrot-heirloom");
    }

    #[test]
    fn test_unknown_category_deserializes_as_other() {
        let category: CropCategory = serde_json::from_str("\"mushroom\"").unwrap();
        assert_eq!(category, CropCategory::Other);
        let category: CropCategory = serde_json::from_str("\"berry\"").unwrap();
        assert_eq!(category, CropCategory::Berry);
    }

    #[test]
    fn test_sows_and_harvests_in() {
        let crop = carrot();
        assert!(crop.sows_in(5));
        assert!(!crop.sows_in(8));
        assert!(crop.harvests_in(8));
    }
}
