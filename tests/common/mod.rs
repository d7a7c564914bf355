// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

#![allow(dead_code)]

use recipebook::db;
use recipebook::db::models::{Ingredient, Recipe};
use tempfile::TempDir;

/// Create an initialized, empty recipe database.
///
/// Returns (TempDir, db_path) - keep the TempDir alive to prevent cleanup.
pub fn setup_test_db() -> (TempDir, String) {
    let temp_dir = tempfile::tempdir().unwrap();
    let db_path = temp_dir
        .path()
        .join("test.db")
        .to_str()
        .unwrap()
        .to_string();

    db::init(&db_path).unwrap();
    (temp_dir, db_path)
}

/// Insert a recipe named `name` with description "Test description".
pub fn sample_recipe(db_path: &str, name: &str) -> i64 {
    let conn = db::open(db_path).unwrap();
    let mut recipe = Recipe::new(name.to_string(), "Test description".to_string());
    recipe.insert(&conn).unwrap()
}

/// Insert an ingredient into an existing recipe.
pub fn sample_ingredient(db_path: &str, recipe_id: i64, name: &str) -> i64 {
    let conn = db::open(db_path).unwrap();
    let mut ingredient = Ingredient::new(name.to_string(), recipe_id);
    ingredient.insert(&conn).unwrap()
}

#[cfg(feature = "server")]
pub mod http {
    use axum::Router;
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use recipebook::MissingIngredients;
    use recipebook::server::{ServerConfig, ServerState, create_router};
    use serde_json::Value;
    use std::path::PathBuf;
    use std::sync::Arc;
    use tower::ServiceExt;

    /// Build a router over an existing database file.
    pub fn app(db_path: &str, missing_ingredients: MissingIngredients) -> Router {
        let config = ServerConfig {
            db_path: PathBuf::from(db_path),
            missing_ingredients,
            ..ServerConfig::default()
        };
        create_router(Arc::new(ServerState::new(config)))
    }

    /// Send one request, returning the status and the JSON body (Null if empty).
    pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }
}
