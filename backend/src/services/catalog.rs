//! Crop catalog service: lookups, yield estimates and custom crops

use std::collections::HashSet;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::{CropCatalog, CropDefinition};
use tokio::sync::RwLock;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::external::CropLookupClient;
use crate::repository::CustomCropStore;

/// Catalog shared by all requests. Registration takes the write lock.
pub type SharedCatalog = Arc<RwLock<CropCatalog>>;

/// Build the catalog from the built-in table and persisted custom crops
pub async fn load_catalog(store: &dyn CustomCropStore) -> AppResult<CropCatalog> {
    let custom = store.load_custom_crops().await?;
    let count = custom.len();
    let catalog = CropCatalog::with_custom(custom)?;
    tracing::info!(
        crops = catalog.len(),
        custom = count,
        "crop catalog loaded"
    );
    Ok(catalog)
}

/// Catalog service
#[derive(Clone)]
pub struct CatalogService {
    catalog: SharedCatalog,
    store: Arc<dyn CustomCropStore>,
    lookup: Option<CropLookupClient>,
}

/// Input for a custom crop lookup
#[derive(Debug, Deserialize, Validate)]
pub struct LookupCropInput {
    #[validate(custom = "validate_crop_name")]
    pub name: String,
}

fn validate_crop_name(name: &str) -> Result<(), validator::ValidationError> {
    shared::validate_crop_name(name).map_err(|message| {
        let mut error = validator::ValidationError::new("crop_name");
        error.message = Some(message.into());
        error
    })
}

/// Input for a yield estimate
#[derive(Debug, Deserialize)]
pub struct EstimateYieldInput {
    pub crop_id: String,
    pub quantity: Decimal,
}

/// Yield estimate response
#[derive(Debug, Serialize)]
pub struct YieldEstimate {
    pub crop_id: String,
    pub quantity: Decimal,
    pub estimated_yield_kg: Decimal,
}

/// Result of a custom crop lookup
#[derive(Debug, Serialize)]
pub struct LookupOutcome {
    pub crop: CropDefinition,
    /// False when the name resolved to an entry already in the catalog
    pub created: bool,
}

impl CatalogService {
    /// Create a new CatalogService instance
    pub fn new(
        catalog: SharedCatalog,
        store: Arc<dyn CustomCropStore>,
        lookup: Option<CropLookupClient>,
    ) -> Self {
        Self {
            catalog,
            store,
            lookup,
        }
    }

    /// Get a crop by id or name
    pub async fn get_crop(&self, crop_id: &str) -> AppResult<CropDefinition> {
        let catalog = self.catalog.read().await;
        Ok(catalog.get(crop_id)?.clone())
    }

    /// Crops not in `excluding`, in catalog order
    pub async fn list_available(&self, excluding: &HashSet<String>) -> Vec<CropDefinition> {
        let catalog = self.catalog.read().await;
        catalog
            .list_available(excluding)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Estimate the harvest of `quantity` plants
    pub async fn estimate_yield(&self, input: EstimateYieldInput) -> AppResult<YieldEstimate> {
        let catalog = self.catalog.read().await;
        let crop = catalog.get(&input.crop_id)?;
        let estimated_yield_kg = shared::estimate_yield(&catalog, &crop.id, input.quantity)?;
        Ok(YieldEstimate {
            crop_id: crop.id.clone(),
            quantity: input.quantity,
            estimated_yield_kg,
        })
    }

    /// Resolve a crop by name, asking the AI service only when the catalog
    /// has no entry with that name.
    pub async fn lookup_or_register(&self, input: LookupCropInput) -> AppResult<LookupOutcome> {
        input.validate()?;

        if let Some(existing) = self.catalog.read().await.find_by_name(&input.name) {
            return Ok(LookupOutcome {
                crop: existing.clone(),
                created: false,
            });
        }

        let client = self.lookup.as_ref().ok_or(AppError::CropLookupUnavailable)?;
        let definition = client.lookup(&input.name).await?.into_definition()?;

        let (canonical, created) = {
            let mut catalog = self.catalog.write().await;
            let id = catalog.register(definition.clone())?;
            let created = id == definition.id;
            (catalog.get(&id)?.clone(), created)
        };

        if created {
            self.store.save_custom_crop(&canonical).await?;
            tracing::info!(crop_id = %canonical.id, "registered custom crop");
        } else {
            tracing::debug!(
                requested = %input.name,
                crop_id = %canonical.id,
                "lookup resolved to an existing crop"
            );
        }

        Ok(LookupOutcome {
            crop: canonical,
            created,
        })
    }
}
