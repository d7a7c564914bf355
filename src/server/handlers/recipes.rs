// src/server/handlers/recipes.rs
//! Recipe resource handlers
//!
//! Each handler is a thin adapter: extract, hand the work to the catalog on
//! a blocking task, map the outcome to a status code.

use super::{ApiResult, with_db};
use crate::catalog::{self, RecipePayload, RecipeRepr, UpdateMode};
use crate::server::SharedState;
use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::{StatusCode, header},
};
use serde::Deserialize;
use tracing::{debug, info};

/// List query parameters
#[derive(Debug, Default, Deserialize)]
pub struct RecipeListQuery {
    /// Case-insensitive substring of the recipe name
    pub name: Option<String>,
}

fn recipe_uri(id: i64) -> String {
    format!("/v1/recipes/{}", id)
}

/// List recipes
///
/// GET /v1/recipes?name=<substring>
pub async fn list_recipes(
    State(state): State<SharedState>,
    Query(params): Query<RecipeListQuery>,
) -> ApiResult<Json<Vec<RecipeRepr>>> {
    debug!("List recipes (name filter: {:?})", params.name);

    let recipes = with_db(&state, move |conn| {
        catalog::list_recipes(conn, params.name.as_deref())
    })
    .await?;

    Ok(Json(recipes))
}

/// Retrieve one recipe
///
/// GET /v1/recipes/:id
pub async fn get_recipe(
    State(state): State<SharedState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<RecipeRepr>> {
    let Path(id) = id?;

    let recipe = with_db(&state, move |conn| catalog::retrieve_recipe(conn, id))
        .await
        .map_err(|e| e.with_instance(recipe_uri(id)))?;

    Ok(Json(recipe))
}

/// Create a recipe, optionally with ingredients
///
/// POST /v1/recipes
///
/// Returns 201 with the created representation and a Location header.
pub async fn create_recipe(
    State(state): State<SharedState>,
    payload: Result<Json<RecipePayload>, JsonRejection>,
) -> ApiResult<(StatusCode, [(header::HeaderName, String); 1], Json<RecipeRepr>)> {
    let Json(payload) = payload?;

    let created = with_db(&state, move |conn| catalog::create_recipe(conn, payload)).await?;
    info!("Recipe {} created via API", created.id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, recipe_uri(created.id))],
        Json(created),
    ))
}

/// Merge supplied fields onto a recipe
///
/// PATCH /v1/recipes/:id
pub async fn partial_update_recipe(
    State(state): State<SharedState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<RecipePayload>, JsonRejection>,
) -> ApiResult<Json<RecipeRepr>> {
    update(state, id, payload, UpdateMode::Partial).await
}

/// Replace a recipe's fields and ingredient set
///
/// PUT /v1/recipes/:id
pub async fn full_update_recipe(
    State(state): State<SharedState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<RecipePayload>, JsonRejection>,
) -> ApiResult<Json<RecipeRepr>> {
    update(state, id, payload, UpdateMode::Full).await
}

async fn update(
    state: SharedState,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<RecipePayload>, JsonRejection>,
    mode: UpdateMode,
) -> ApiResult<Json<RecipeRepr>> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    let missing = state.config.missing_ingredients;

    let updated = with_db(&state, move |conn| {
        catalog::update_recipe(conn, id, payload, mode, missing)
    })
    .await
    .map_err(|e| e.with_instance(recipe_uri(id)))?;

    Ok(Json(updated))
}

/// Delete a recipe and its ingredients
///
/// DELETE /v1/recipes/:id
pub async fn delete_recipe(
    State(state): State<SharedState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<StatusCode> {
    let Path(id) = id?;

    with_db(&state, move |conn| catalog::delete_recipe(conn, id))
        .await
        .map_err(|e| e.with_instance(recipe_uri(id)))?;

    Ok(StatusCode::NO_CONTENT)
}
