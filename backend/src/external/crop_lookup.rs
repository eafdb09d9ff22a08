//! AI Crop Lookup Client
//!
//! Client for the AI service that supplies agronomic constants for crops
//! missing from the built-in catalog.

use std::collections::BTreeSet;
use std::time::Duration;

use reqwest::Client;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::{slugify, CropCategory, CropDefinition};

use crate::config::CropLookupConfig;
use crate::error::{AppError, AppResult};

/// Client for the crop lookup microservice
#[derive(Clone)]
pub struct CropLookupClient {
    api_endpoint: String,
    api_key: String,
    http_client: Client,
}

/// Request to look up a crop by name
#[derive(Debug, Serialize)]
pub struct LookupCropRequest<'a> {
    pub name: &'a str,
    /// Constants are requested per planted unit
    pub unit: &'static str,
}

/// Agronomic constants returned by the lookup service
#[derive(Debug, Deserialize)]
pub struct LookupCropResponse {
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub category: Option<CropCategory>,
    pub kcal_per_kg: Decimal,
    pub yield_per_plant_kg: Decimal,
    #[serde(default)]
    pub sow_months: Vec<u32>,
    #[serde(default)]
    pub harvest_months: Vec<u32>,
}

impl LookupCropResponse {
    /// Convert into a custom catalog entry with id `custom-<slug>`.
    /// Out of range months are dropped rather than rejecting the whole crop.
    /// A name without any letters or digits, or negative constants, count as
    /// a bad answer from the service.
    pub fn into_definition(self) -> AppResult<CropDefinition> {
        let slug = slugify(&self.name);
        if slug.is_empty() {
            return Err(AppError::CropLookupError(format!(
                "Service returned an unusable crop name: {:?}",
                self.name.chars().take(50).collect::<String>()
            )));
        }

        let keep = |months: Vec<u32>| -> BTreeSet<u32> {
            months.into_iter().filter(|m| shared::is_valid_month(*m)).collect()
        };
        let definition = CropDefinition {
            id: format!("custom-{slug}"),
            display_name: self.name.trim().to_string(),
            icon: self.icon.unwrap_or_else(|| "🌱".to_string()),
            category: self.category.unwrap_or(CropCategory::Other),
            kcal_per_kg: self.kcal_per_kg,
            yield_per_plant_kg: self.yield_per_plant_kg,
            sow_months: keep(self.sow_months),
            harvest_months: keep(self.harvest_months),
            custom: true,
        };
        definition
            .validate()
            .map_err(|e| AppError::CropLookupError(format!("Service returned an invalid crop: {e}")))?;
        Ok(definition)
    }
}

impl CropLookupClient {
    /// Create a new crop lookup client
    pub fn new(api_endpoint: String, api_key: String, timeout: Duration) -> AppResult<Self> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_endpoint,
            api_key,
            http_client,
        })
    }

    /// Create a client from the `crop_lookup` config section
    pub fn from_config(config: &CropLookupConfig) -> AppResult<Self> {
        Self::new(
            config.api_endpoint.clone(),
            config.api_key.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// Ask the service for a crop's constants
    pub async fn lookup(&self, name: &str) -> AppResult<LookupCropResponse> {
        let request = LookupCropRequest {
            name: name.trim(),
            unit: "plant",
        };

        let response = self
            .http_client
            .post(&self.api_endpoint)
            .header("x-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::CropLookupError(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::warn!(%status, "crop lookup service returned an error");
            return Err(AppError::CropLookupError(format!(
                "API returned {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        let result: LookupCropResponse = response
            .json()
            .await
            .map_err(|e| AppError::CropLookupError(format!("Failed to parse response: {}", e)))?;

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_into_definition() {
        let response: LookupCropResponse = serde_json::from_str(
            r#"{
                "name": " Jerusalem Artichoke ",
                "category": "root",
                "kcal_per_kg": 730,
                "yield_per_plant_kg": "1.2",
                "sow_months": [4, 5, 13],
                "harvest_months": [10, 11]
            }"#,
        )
        .unwrap();

        let crop = response.into_definition().unwrap();
        assert_eq!(crop.id, "custom-jerusalem-artichoke");
        assert_eq!(crop.display_name, "Jerusalem Artichoke");
        assert_eq!(crop.category, CropCategory::Root);
        assert_eq!(crop.kcal_per_kg, Decimal::from(730));
        assert_eq!(crop.yield_per_plant_kg, Decimal::new(12, 1));
        assert_eq!(crop.sow_months, BTreeSet::from([4, 5]));
        assert_eq!(crop.icon, "🌱");
        assert!(crop.custom);
        assert!(crop.validate().is_ok());
    }

    #[test]
    fn test_unknown_category_falls_back() {
        let response: LookupCropResponse = serde_json::from_str(
            r#"{"name": "Shiitake", "category": "fungus", "kcal_per_kg": 340, "yield_per_plant_kg": 0.5}"#,
        )
        .unwrap();
        let crop = response.into_definition().unwrap();
        assert_eq!(crop.category, CropCategory::Other);
        assert!(crop.sow_months.is_empty());
    }

    #[test]
    fn test_unusable_names_are_lookup_errors() {
        for name in ["", "   ", "!!!", "🌱 ++"] {
            let response = LookupCropResponse {
                name: name.to_string(),
                icon: None,
                category: None,
                kcal_per_kg: Decimal::from(100),
                yield_per_plant_kg: Decimal::ONE,
                sow_months: vec![4],
                harvest_months: vec![9],
            };
            assert!(
                matches!(response.into_definition(), Err(AppError::CropLookupError(_))),
                "{name:?} was accepted"
            );
        }
    }

    #[test]
    fn test_negative_constants_are_lookup_errors() {
        let response: LookupCropResponse = serde_json::from_str(
            r#"{"name": "Okra", "kcal_per_kg": -330, "yield_per_plant_kg": 0.4}"#,
        )
        .unwrap();
        assert!(matches!(
            response.into_definition(),
            Err(AppError::CropLookupError(_))
        ));
    }
}
