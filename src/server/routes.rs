// src/server/routes.rs
//! Axum router configuration
//!
//! Recipe routes are registered with and without a trailing slash so both
//! `/v1/recipes` and `/v1/recipes/` resolve.

use crate::server::SharedState;
use crate::server::handlers::recipes;
use axum::{
    Router,
    http::HeaderValue,
    routing::{MethodRouter, get},
};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

/// Create the main application router
pub fn create_router(state: SharedState) -> Router {
    let cors = cors_layer(&state.config.cors_allowed_origins);

    Router::new()
        .route("/health", get(health_check))
        .nest("/v1", build_v1_router())
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state)
}

/// Build the v1 API router
fn build_v1_router() -> Router<SharedState> {
    let collection: MethodRouter<SharedState> =
        get(recipes::list_recipes).post(recipes::create_recipe);
    let member: MethodRouter<SharedState> = get(recipes::get_recipe)
        .patch(recipes::partial_update_recipe)
        .put(recipes::full_update_recipe)
        .delete(recipes::delete_recipe);

    Router::new()
        .route("/recipes", collection.clone())
        .route("/recipes/", collection)
        .route("/recipes/:id", member.clone())
        .route("/recipes/:id/", member)
}

/// Configured origins, or any origin when none are listed
fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(allowed))
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
