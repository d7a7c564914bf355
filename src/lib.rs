// src/lib.rs

//! Recipebook
//!
//! A small recipe catalog: recipes with owned ingredient lists, stored in
//! SQLite and exposed over a JSON REST API.
//!
//! # Architecture
//!
//! - `db`: schema migrations and row models; cascade delete lives in the schema
//! - `catalog`: validation, wire serialization and the transactional operations
//! - `server`: axum routes that dispatch HTTP verbs to catalog operations

pub mod catalog;
pub mod db;
mod error;

#[cfg(feature = "server")]
pub mod server;

pub use catalog::{
    IngredientRepr, IngredientsUpdate, MissingIngredients, RecipePayload, RecipeRepr, UpdateMode,
    ValidationErrors, filter_recipes,
};
pub use error::{Error, Result};
