//! Cultivation plan HTTP handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use shared::Household;
use uuid::Uuid;

use crate::config::PlanningConfig;
use crate::middleware::CurrentUser;
use crate::services::plan::{
    CreatePlanInput, CropQuantityInput, PlanService, UpdateCropInput, UpdatePlanInput,
};
use crate::AppState;

fn plan_service(state: &AppState) -> PlanService {
    PlanService::new(state.plans.clone(), state.catalog.clone())
}

/// Household parameters for the nutrition view
#[derive(Debug, Default, Deserialize)]
pub struct HouseholdQuery {
    pub household_size: Option<i32>,
    pub period_days: Option<i32>,
}

impl HouseholdQuery {
    /// Fill absent parameters from configuration
    fn resolve(&self, defaults: &PlanningConfig) -> Household {
        Household {
            size: self.household_size.unwrap_or(defaults.default_household_size),
            period_days: self.period_days.unwrap_or(defaults.default_period_days),
        }
    }
}

/// Calendar options
#[derive(Debug, Default, Deserialize)]
pub struct ActivitiesQuery {
    /// Hide months with nothing to sow or harvest
    #[serde(default)]
    pub active_only: bool,
}

/// List the current user's plans
pub async fn list_plans(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> impl IntoResponse {
    let service = plan_service(&state);

    match service.list_plans(current_user.owner_id()).await {
        Ok(plans) => (StatusCode::OK, Json(serde_json::json!({ "plans": plans }))).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Get a plan
pub async fn get_plan(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(plan_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = plan_service(&state);

    match service.get_plan(current_user.owner_id(), plan_id).await {
        Ok(plan) => (StatusCode::OK, Json(plan)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Create a plan
pub async fn create_plan(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreatePlanInput>,
) -> impl IntoResponse {
    let service = plan_service(&state);

    match service.create_plan(current_user.owner_id(), input).await {
        Ok(plan) => (StatusCode::CREATED, Json(plan)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Update a plan
pub async fn update_plan(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(plan_id): Path<Uuid>,
    Json(input): Json<UpdatePlanInput>,
) -> impl IntoResponse {
    let service = plan_service(&state);

    match service.update_plan(current_user.owner_id(), plan_id, input).await {
        Ok(plan) => (StatusCode::OK, Json(plan)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Delete a plan
pub async fn delete_plan(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(plan_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = plan_service(&state);

    match service.delete_plan(current_user.owner_id(), plan_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => e.into_response(),
    }
}

/// Make a plan the primary plan
pub async fn set_primary_plan(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(plan_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = plan_service(&state);

    match service.set_primary(current_user.owner_id(), plan_id).await {
        Ok(plan) => (StatusCode::OK, Json(plan)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Add a crop to a plan
pub async fn add_plan_crop(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(plan_id): Path<Uuid>,
    Json(input): Json<CropQuantityInput>,
) -> impl IntoResponse {
    let service = plan_service(&state);

    match service.add_crop(current_user.owner_id(), plan_id, input).await {
        Ok(plan) => (StatusCode::CREATED, Json(plan)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Change the quantity of a planned crop
pub async fn update_plan_crop(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path((plan_id, crop_id)): Path<(Uuid, String)>,
    Json(input): Json<UpdateCropInput>,
) -> impl IntoResponse {
    let service = plan_service(&state);

    match service
        .update_crop(current_user.owner_id(), plan_id, &crop_id, input)
        .await
    {
        Ok(plan) => (StatusCode::OK, Json(plan)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Remove a crop from a plan
pub async fn remove_plan_crop(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path((plan_id, crop_id)): Path<(Uuid, String)>,
) -> impl IntoResponse {
    let service = plan_service(&state);

    match service
        .remove_crop(current_user.owner_id(), plan_id, &crop_id)
        .await
    {
        Ok(plan) => (StatusCode::OK, Json(plan)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Nutrition summary for a household
pub async fn get_plan_nutrition(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(plan_id): Path<Uuid>,
    Query(query): Query<HouseholdQuery>,
) -> impl IntoResponse {
    let service = plan_service(&state);
    let household = query.resolve(&state.config.planning);

    match service
        .nutrition(current_user.owner_id(), plan_id, household)
        .await
    {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Sowing and harvest calendar
pub async fn get_plan_activities(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(plan_id): Path<Uuid>,
    Query(query): Query<ActivitiesQuery>,
) -> impl IntoResponse {
    let service = plan_service(&state);

    match service.activities(current_user.owner_id(), plan_id).await {
        Ok(activities) => {
            let activities: Vec<shared::MonthlyActivity> = if query.active_only {
                shared::active_months(&activities).into_iter().cloned().collect()
            } else {
                activities
            };
            (
                StatusCode::OK,
                Json(serde_json::json!({ "activities": activities })),
            )
                .into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// Plan, nutrition and calendar together
pub async fn get_plan_projections(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(plan_id): Path<Uuid>,
    Query(query): Query<HouseholdQuery>,
) -> impl IntoResponse {
    let service = plan_service(&state);
    let household = query.resolve(&state.config.planning);

    match service
        .projections(current_user.owner_id(), plan_id, household)
        .await
    {
        Ok(projections) => (StatusCode::OK, Json(projections)).into_response(),
        Err(e) => e.into_response(),
    }
}
