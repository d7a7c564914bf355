// src/db/models/mod.rs

//! Data models for recipe catalog tables
//!
//! Each struct mirrors one table and carries the insert/find/update/delete
//! methods for it. Methods take a `&Connection`, so they run unchanged
//! inside a `db::transaction`.

mod ingredient;
mod recipe;

pub use ingredient::Ingredient;
pub use recipe::Recipe;
