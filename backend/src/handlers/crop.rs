//! Crop catalog HTTP handlers

use std::collections::HashSet;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use crate::services::catalog::{CatalogService, EstimateYieldInput, LookupCropInput};
use crate::AppState;

fn catalog_service(state: &AppState) -> CatalogService {
    CatalogService::new(
        state.catalog.clone(),
        state.custom_crops.clone(),
        state.crop_lookup.clone(),
    )
}

/// Query for listing crops
#[derive(Debug, Default, Deserialize)]
pub struct ListCropsQuery {
    /// Comma separated crop ids to leave out, usually those already planned
    pub exclude: Option<String>,
}

impl ListCropsQuery {
    fn excluded(&self) -> HashSet<String> {
        self.exclude
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// List catalog crops
pub async fn list_crops(
    State(state): State<AppState>,
    Query(query): Query<ListCropsQuery>,
) -> impl IntoResponse {
    let service = catalog_service(&state);
    let crops = service.list_available(&query.excluded()).await;
    (StatusCode::OK, Json(serde_json::json!({ "crops": crops }))).into_response()
}

/// Get one crop by id or name
pub async fn get_crop(
    State(state): State<AppState>,
    Path(crop_id): Path<String>,
) -> impl IntoResponse {
    let service = catalog_service(&state);

    match service.get_crop(&crop_id).await {
        Ok(crop) => (StatusCode::OK, Json(crop)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Resolve a crop by name, registering it through the AI lookup if needed
pub async fn lookup_crop(
    State(state): State<AppState>,
    Json(input): Json<LookupCropInput>,
) -> impl IntoResponse {
    let service = catalog_service(&state);

    match service.lookup_or_register(input).await {
        Ok(outcome) => {
            let status = if outcome.created {
                StatusCode::CREATED
            } else {
                StatusCode::OK
            };
            (status, Json(outcome)).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// Estimate the harvest of a number of plants
pub async fn estimate_yield(
    State(state): State<AppState>,
    Json(input): Json<EstimateYieldInput>,
) -> impl IntoResponse {
    let service = catalog_service(&state);

    match service.estimate_yield(input).await {
        Ok(estimate) => (StatusCode::OK, Json(estimate)).into_response(),
        Err(e) => e.into_response(),
    }
}
