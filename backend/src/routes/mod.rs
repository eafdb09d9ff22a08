//! Route definitions for the Cultivation Planner

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Protected routes - crop catalog
        .nest("/crops", crop_routes(state.clone()))
        // Protected routes - yield estimates
        .nest("/yield", yield_routes(state.clone()))
        // Protected routes - plan management
        .nest("/plans", plan_routes(state))
}

/// Crop catalog routes (protected)
fn crop_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_crops))
        .route("/lookup", post(handlers::lookup_crop))
        .route("/:crop_id", get(handlers::get_crop))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Yield estimate routes (protected)
fn yield_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/estimate", post(handlers::estimate_yield))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Plan routes (protected)
fn plan_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_plans).post(handlers::create_plan))
        .route(
            "/:plan_id",
            get(handlers::get_plan)
                .put(handlers::update_plan)
                .delete(handlers::delete_plan),
        )
        .route("/:plan_id/primary", post(handlers::set_primary_plan))
        .route("/:plan_id/crops", post(handlers::add_plan_crop))
        .route(
            "/:plan_id/crops/:crop_id",
            put(handlers::update_plan_crop).delete(handlers::remove_plan_crop),
        )
        .route("/:plan_id/nutrition", get(handlers::get_plan_nutrition))
        .route("/:plan_id/activities", get(handlers::get_plan_activities))
        .route("/:plan_id/projections", get(handlers::get_plan_projections))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
