//! WebAssembly module for the Cultivation Planner
//!
//! Lets the browser recompute plan projections offline:
//! - Yield estimates
//! - Nutrition summaries
//! - Sowing and harvest calendars
//! - Plan name validation
//!
//! Every function works on the built-in crop table, extended by custom
//! crops the caller passes as a JSON array of crop definitions.

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::Serialize;
use shared::{CropCatalog, CropDefinition, PlanCropEntry};
use wasm_bindgen::prelude::*;

fn js_error(message: String) -> JsValue {
    js_sys::Error::new(&message).into()
}

fn planning_error(error: shared::PlanningError) -> String {
    format!("{}: {}", error.code(), error)
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Failed to serialize result: {}", e))
}

fn build_catalog(custom_crops_json: Option<&str>) -> Result<CropCatalog, String> {
    match custom_crops_json.map(str::trim).filter(|json| !json.is_empty()) {
        None => Ok(CropCatalog::builtin()),
        Some(json) => {
            let custom: Vec<CropDefinition> = serde_json::from_str(json)
                .map_err(|e| format!("Invalid custom crops JSON: {}", e))?;
            CropCatalog::with_custom(custom).map_err(planning_error)
        }
    }
}

fn parse_entries(crops_json: &str) -> Result<Vec<PlanCropEntry>, String> {
    serde_json::from_str(crops_json).map_err(|e| format!("Invalid crops JSON: {}", e))
}

fn estimate(crop_id: &str, quantity: f64, custom: Option<&str>) -> Result<String, String> {
    let catalog = build_catalog(custom)?;
    let quantity =
        Decimal::try_from(quantity).map_err(|_| format!("Invalid quantity: {}", quantity))?;
    let kg = shared::estimate_yield(&catalog, crop_id, quantity).map_err(planning_error)?;
    Ok(kg.normalize().to_string())
}

fn nutrition(
    crops_json: &str,
    household_size: i32,
    period_days: i32,
    custom: Option<&str>,
) -> Result<String, String> {
    let catalog = build_catalog(custom)?;
    let entries = parse_entries(crops_json)?;
    let summary = shared::summarize_nutrition(&catalog, &entries, household_size, period_days)
        .map_err(planning_error)?;
    to_json(&summary)
}

fn activities(crops_json: &str, custom: Option<&str>) -> Result<String, String> {
    let catalog = build_catalog(custom)?;
    let entries = parse_entries(crops_json)?;
    to_json(&shared::generate_monthly_activities(&catalog, &entries))
}

fn available(exclude_json: Option<&str>, custom: Option<&str>) -> Result<String, String> {
    let catalog = build_catalog(custom)?;
    let excluding: HashSet<String> = match exclude_json {
        Some(json) if !json.trim().is_empty() => serde_json::from_str(json)
            .map_err(|e| format!("Invalid exclude JSON: {}", e))?,
        _ => HashSet::new(),
    };
    to_json(&catalog.list_available(&excluding))
}

/// Expected harvest in kg for `quantity` plants, as a decimal string
#[wasm_bindgen]
pub fn estimate_crop_yield(
    crop_id: &str,
    quantity: f64,
    custom_crops_json: Option<String>,
) -> Result<String, JsValue> {
    estimate(crop_id, quantity, custom_crops_json.as_deref()).map_err(js_error)
}

/// Nutrition summary of plan entries as JSON
#[wasm_bindgen]
pub fn summarize_plan_nutrition(
    crops_json: &str,
    household_size: i32,
    period_days: i32,
    custom_crops_json: Option<String>,
) -> Result<String, JsValue> {
    nutrition(
        crops_json,
        household_size,
        period_days,
        custom_crops_json.as_deref(),
    )
    .map_err(js_error)
}

/// Twelve month sowing and harvest calendar as JSON
#[wasm_bindgen]
pub fn generate_plan_activities(
    crops_json: &str,
    custom_crops_json: Option<String>,
) -> Result<String, JsValue> {
    activities(crops_json, custom_crops_json.as_deref()).map_err(js_error)
}

/// Catalog crops not listed in `exclude_json` (a JSON array of ids)
#[wasm_bindgen]
pub fn list_available_crops(
    exclude_json: Option<String>,
    custom_crops_json: Option<String>,
) -> Result<String, JsValue> {
    available(exclude_json.as_deref(), custom_crops_json.as_deref()).map_err(js_error)
}

/// Returns the problem with a plan name, or nothing when it is acceptable
#[wasm_bindgen]
pub fn validate_plan_name(name: &str) -> Option<String> {
    shared::validate_plan_name(name)
        .err()
        .map(str::to_string)
}
