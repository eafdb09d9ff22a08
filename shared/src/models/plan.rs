//! Cultivation plan models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::CropCatalog;
use crate::error::{PlanningError, PlanningResult};
use crate::planning::estimate_yield;

/// One crop line in a plan
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanCropEntry {
    pub crop_id: String,
    /// Count of planted units
    pub quantity: Decimal,
    /// Yield captured when the entry was added or edited. Stored so that
    /// later catalog changes do not silently rewrite historical plans.
    pub estimated_yield_kg: Decimal,
}

impl PlanCropEntry {
    /// Build an entry with its yield estimated from the catalog
    pub fn estimated(
        catalog: &CropCatalog,
        crop_id: &str,
        quantity: Decimal,
    ) -> PlanningResult<Self> {
        let crop = catalog.get(crop_id)?;
        let estimated_yield_kg = estimate_yield(catalog, &crop.id, quantity)?;
        Ok(Self {
            crop_id: crop.id.clone(),
            quantity,
            estimated_yield_kg,
        })
    }
}

/// A named, owned collection of crop entries for one season or bed
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CultivationPlan {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    /// Insertion order is display order
    pub crops: Vec<PlanCropEntry>,
    pub is_primary: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CultivationPlan {
    /// Create an empty plan
    pub fn new(owner_id: Uuid, new_plan: NewPlan, is_primary: bool) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner_id,
            name: new_plan.name.trim().to_string(),
            description: new_plan.description,
            crops: Vec::new(),
            is_primary,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn crop_ids(&self) -> Vec<String> {
        self.crops.iter().map(|entry| entry.crop_id.clone()).collect()
    }

    pub fn contains_crop(&self, crop_id: &str) -> bool {
        self.crops.iter().any(|entry| entry.crop_id == crop_id)
    }

    /// Append a crop, estimating its yield. A crop may appear only once.
    pub fn add_crop(
        &mut self,
        catalog: &CropCatalog,
        crop_id: &str,
        quantity: Decimal,
    ) -> PlanningResult<&PlanCropEntry> {
        let entry = PlanCropEntry::estimated(catalog, crop_id, quantity)?;
        if self.contains_crop(&entry.crop_id) {
            return Err(PlanningError::DuplicateCrop(entry.crop_id));
        }
        self.crops.push(entry);
        self.touch();
        Ok(&self.crops[self.crops.len() - 1])
    }

    /// Position of the entry `crop_id` refers to. Names and aliases resolve
    /// through the catalog; ids no longer in the catalog match verbatim.
    fn position_of(&self, catalog: &CropCatalog, crop_id: &str) -> PlanningResult<usize> {
        let canonical = catalog.get(crop_id).map(|crop| crop.id.as_str()).unwrap_or(crop_id);
        self.crops
            .iter()
            .position(|entry| entry.crop_id == canonical)
            .ok_or_else(|| PlanningError::CropNotInPlan(crop_id.to_string()))
    }

    /// Change the quantity of an existing entry and re-estimate its yield
    pub fn update_crop(
        &mut self,
        catalog: &CropCatalog,
        crop_id: &str,
        quantity: Decimal,
    ) -> PlanningResult<&PlanCropEntry> {
        let position = self.position_of(catalog, crop_id)?;
        let estimated_yield_kg =
            estimate_yield(catalog, &self.crops[position].crop_id, quantity)?;
        let entry = &mut self.crops[position];
        entry.quantity = quantity;
        entry.estimated_yield_kg = estimated_yield_kg;
        self.updated_at = Utc::now();
        Ok(&self.crops[position])
    }

    /// Remove an entry. Returns the removed entry.
    pub fn remove_crop(
        &mut self,
        catalog: &CropCatalog,
        crop_id: &str,
    ) -> PlanningResult<PlanCropEntry> {
        let position = self.position_of(catalog, crop_id)?;
        let removed = self.crops.remove(position);
        self.touch();
        Ok(removed)
    }

    /// Merge a partial update. Absent fields are left unchanged.
    pub fn apply(&mut self, update: PlanUpdate) {
        if let Some(name) = update.name {
            self.name = name.trim().to_string();
        }
        if let Some(description) = update.description {
            self.description = Some(description);
        }
        if let Some(crops) = update.crops {
            self.crops = crops;
        }
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Input for creating a plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPlan {
    pub name: String,
    pub description: Option<String>,
}

/// Partial plan update
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub crops: Option<Vec<PlanCropEntry>>,
}

impl PlanUpdate {
    pub fn crops(crops: Vec<PlanCropEntry>) -> Self {
        Self {
            crops: Some(crops),
            ..Self::default()
        }
    }
}
