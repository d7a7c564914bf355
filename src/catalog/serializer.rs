// src/catalog/serializer.rs

//! Mapping between storage rows and the wire representation
//!
//! Read direction: `Recipe` + its `Ingredient` rows become a `RecipeRepr`
//! `{id, name, description, ingredients: [{id, name}]}`.
//!
//! Write direction: validated input is written to storage. The functions
//! here take a plain `&Connection`; callers run them inside
//! `db::transaction` so each write is atomic.

use super::validation::{IngredientsUpdate, NewIngredient, NewRecipe, RecipeChanges};
use crate::db::models::{Ingredient, Recipe};
use crate::error::{Error, Result};
use rusqlite::Connection;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

/// Wire representation of an ingredient
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientRepr {
    pub id: i64,
    pub name: String,
}

/// Wire representation of a recipe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeRepr {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub ingredients: Vec<IngredientRepr>,
}

/// Incoming recipe body for create and update
///
/// Each field distinguishes "absent" (`None`) from an explicit `null`
/// (`Some(None)`). Client-supplied `id` fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecipePayload {
    #[serde(default, deserialize_with = "present")]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub ingredients: Option<Option<Vec<IngredientPayload>>>,
}

/// Incoming ingredient entry
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IngredientPayload {
    #[serde(default, deserialize_with = "present")]
    pub name: Option<Option<String>>,
}

/// Marks a field as present whenever its key appears, even with `null`
fn present<'de, T, D>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl IngredientRepr {
    fn from_record(ingredient: &Ingredient) -> Result<Self> {
        let id = ingredient.id.ok_or_else(|| {
            Error::NotInserted(format!("Ingredient '{}'", ingredient.name))
        })?;
        Ok(Self {
            id,
            name: ingredient.name.clone(),
        })
    }
}

impl RecipeRepr {
    /// Build the representation from a recipe and its ingredient rows
    pub fn from_records(recipe: &Recipe, ingredients: &[Ingredient]) -> Result<Self> {
        let id = recipe.id.ok_or_else(|| {
            Error::NotInserted(format!("Recipe '{}'", recipe.name))
        })?;

        Ok(Self {
            id,
            name: recipe.name.clone(),
            description: recipe.description.clone(),
            ingredients: ingredients
                .iter()
                .map(IngredientRepr::from_record)
                .collect::<Result<Vec<_>>>()?,
        })
    }
}

/// Serialize a stored recipe, loading its ingredients
pub fn to_representation(conn: &Connection, recipe: &Recipe) -> Result<RecipeRepr> {
    let ingredients = recipe.ingredients(conn)?;
    RecipeRepr::from_records(recipe, &ingredients)
}

/// Create the recipe row, then one ingredient row per entry
pub fn create(conn: &Connection, input: NewRecipe) -> Result<RecipeRepr> {
    let mut recipe = Recipe::new(input.name, input.description);
    let recipe_id = recipe.insert(conn)?;

    let ingredients = insert_ingredients(conn, recipe_id, input.ingredients)?;
    debug!(
        "Created recipe {} with {} ingredients",
        recipe_id,
        ingredients.len()
    );

    RecipeRepr::from_records(&recipe, &ingredients)
}

/// Apply validated changes to an existing recipe
///
/// A supplied ingredient list replaces the whole set before the scalar
/// fields are written; `IngredientsUpdate::Unset` leaves ingredients alone.
pub fn update(conn: &Connection, mut instance: Recipe, changes: RecipeChanges) -> Result<RecipeRepr> {
    let recipe_id = instance.id.ok_or_else(|| {
        Error::NotInserted(format!("Recipe '{}'", instance.name))
    })?;

    if let IngredientsUpdate::Replace(replacement) = changes.ingredients {
        let removed = Ingredient::delete_by_recipe(conn, recipe_id)?;
        insert_ingredients(conn, recipe_id, replacement)?;
        debug!("Replaced {} ingredients of recipe {}", removed, recipe_id);
    }

    if let Some(name) = changes.name {
        instance.name = name;
    }
    if let Some(description) = changes.description {
        instance.description = description;
    }
    instance.update(conn)?;

    to_representation(conn, &instance)
}

fn insert_ingredients(
    conn: &Connection,
    recipe_id: i64,
    entries: Vec<NewIngredient>,
) -> Result<Vec<Ingredient>> {
    entries
        .into_iter()
        .map(|entry| -> Result<Ingredient> {
            let mut ingredient = Ingredient::new(entry.name, recipe_id);
            ingredient.insert(conn)?;
            Ok(ingredient)
        })
        .collect()
}
