// src/catalog/mod.rs

//! Recipe catalog operations
//!
//! These are the operations behind the REST resource: list (with optional
//! name filter), retrieve, create, partial/full update and delete. Reads run
//! in a read transaction so a recipe and its ingredients come from one
//! snapshot; writes run in a single `db::transaction`.

mod filter;
mod serializer;
mod validation;

pub use filter::filter_recipes;
pub use serializer::{IngredientPayload, IngredientRepr, RecipePayload, RecipeRepr};
pub use validation::{
    IngredientsUpdate, MAX_NAME_LENGTH, NewIngredient, NewRecipe, RecipeChanges, ValidationErrors,
    validate_create, validate_update,
};

use crate::db;
use crate::db::models::Recipe;
use crate::error::{Error, Result};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Whether an update merges onto the recipe or replaces it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateMode {
    /// PATCH: only supplied fields change
    Partial,
    /// PUT: all scalar fields are replaced
    Full,
}

/// What a full update does when the body has no `ingredients` key
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingIngredients {
    /// Existing ingredients stay as they are
    #[default]
    Preserve,
    /// Existing ingredients are removed
    Clear,
}

impl MissingIngredients {
    pub fn as_str(&self) -> &'static str {
        match self {
            MissingIngredients::Preserve => "preserve",
            MissingIngredients::Clear => "clear",
        }
    }
}

impl std::str::FromStr for MissingIngredients {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "preserve" => Ok(MissingIngredients::Preserve),
            "clear" => Ok(MissingIngredients::Clear),
            _ => Err(format!(
                "Invalid missing-ingredients policy: {} (expected 'preserve' or 'clear')",
                s
            )),
        }
    }
}

/// List recipes, optionally keeping only names containing `name`
pub fn list_recipes(conn: &Connection, name: Option<&str>) -> Result<Vec<RecipeRepr>> {
    let tx = conn.unchecked_transaction()?;

    let recipes = Recipe::list_all(&tx)?
        .iter()
        .map(|recipe| serializer::to_representation(&tx, recipe))
        .collect::<Result<Vec<_>>>()?;
    debug!("Loaded {} recipes", recipes.len());

    Ok(filter_recipes(recipes, name))
}

/// Fetch one recipe
pub fn retrieve_recipe(conn: &Connection, id: i64) -> Result<RecipeRepr> {
    let tx = conn.unchecked_transaction()?;
    let recipe = find_recipe(&tx, id)?;
    serializer::to_representation(&tx, &recipe)
}

/// Validate and create a recipe with its ingredients
pub fn create_recipe(conn: &mut Connection, payload: RecipePayload) -> Result<RecipeRepr> {
    let input = validate_create(payload)?;

    let created = db::transaction(conn, |tx| serializer::create(tx, input))?;
    info!(
        "Created recipe {} '{}' with {} ingredients",
        created.id,
        created.name,
        created.ingredients.len()
    );
    Ok(created)
}

/// Validate and apply an update to an existing recipe
///
/// An unknown `id` is reported before the payload is validated.
pub fn update_recipe(
    conn: &mut Connection,
    id: i64,
    payload: RecipePayload,
    mode: UpdateMode,
    missing: MissingIngredients,
) -> Result<RecipeRepr> {
    let updated = db::transaction(conn, |tx| {
        let instance = find_recipe(tx, id)?;
        let changes = validate_update(payload, mode, missing)?;
        serializer::update(tx, instance, changes)
    })?;

    info!("Updated recipe {} ({:?})", id, mode);
    Ok(updated)
}

/// Delete a recipe and, through the cascade, its ingredients
pub fn delete_recipe(conn: &mut Connection, id: i64) -> Result<()> {
    let removed = db::transaction(conn, |tx| Recipe::delete(tx, id))?;
    if !removed {
        return Err(not_found(id));
    }

    info!("Deleted recipe {}", id);
    Ok(())
}

fn find_recipe(conn: &Connection, id: i64) -> Result<Recipe> {
    Recipe::find_by_id(conn, id)?.ok_or_else(|| not_found(id))
}

fn not_found(id: i64) -> Error {
    Error::NotFound(format!("Recipe {}", id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::Ingredient;
    use serde_json::json;

    fn payload(value: serde_json::Value) -> RecipePayload {
        serde_json::from_value(value).unwrap()
    }

    fn sample(conn: &mut Connection, name: &str, ingredients: &[&str]) -> RecipeRepr {
        let ingredients: Vec<_> = ingredients.iter().map(|n| json!({"name": n})).collect();
        create_recipe(
            conn,
            payload(json!({
                "name": name,
                "description": "Test description",
                "ingredients": ingredients
            })),
        )
        .unwrap()
    }

    #[test]
    fn test_create_then_retrieve_round_trip() {
        let mut conn = db::open_in_memory().unwrap();
        let created = sample(&mut conn, "Chicken over rice", &["chicken", "rice", "salt"]);

        assert_eq!(created.ingredients.len(), 3);
        assert_eq!(retrieve_recipe(&conn, created.id).unwrap(), created);
    }

    #[test]
    fn test_create_without_ingredients() {
        let mut conn = db::open_in_memory().unwrap();
        let created = create_recipe(
            &mut conn,
            payload(json!({"name": "Scrambled eggs", "description": "Delicious and easy"})),
        )
        .unwrap();

        assert!(created.ingredients.is_empty());
        assert_eq!(Ingredient::count(&conn).unwrap(), 0);
    }

    #[test]
    fn test_invalid_create_persists_nothing() {
        let mut conn = db::open_in_memory().unwrap();
        let result = create_recipe(
            &mut conn,
            payload(json!({"name": "", "ingredients": [{"name": "salt"}]})),
        );

        assert!(matches!(result, Err(Error::ValidationError(_))));
        assert_eq!(Recipe::count(&conn).unwrap(), 0);
        assert_eq!(Ingredient::count(&conn).unwrap(), 0);
    }

    #[test]
    fn test_list_with_filter() {
        let mut conn = db::open_in_memory().unwrap();
        let one = sample(&mut conn, "Recipe one", &[]);
        let two = sample(&mut conn, "Number two recipe", &["x"]);
        let three = sample(&mut conn, "Another one", &[]);

        let all = list_recipes(&conn, None).unwrap();
        assert_eq!(all.len(), 3);

        let matched = list_recipes(&conn, Some("rec")).unwrap();
        assert!(matched.contains(&one));
        assert!(matched.contains(&two));
        assert!(!matched.contains(&three));
    }

    #[test]
    fn test_partial_update_leaves_other_fields() {
        let mut conn = db::open_in_memory().unwrap();
        let created = sample(&mut conn, "Test name", &["flour", "egg"]);

        let updated = update_recipe(
            &mut conn,
            created.id,
            payload(json!({"name": "Best recipe in the world"})),
            UpdateMode::Partial,
            MissingIngredients::Preserve,
        )
        .unwrap();

        assert_eq!(updated.name, "Best recipe in the world");
        assert_eq!(updated.description, created.description);
        assert_eq!(updated.ingredients, created.ingredients);
    }

    #[test]
    fn test_partial_update_with_ingredients_replaces_them() {
        let mut conn = db::open_in_memory().unwrap();
        let created = sample(&mut conn, "Bread", &["flour"]);

        let updated = update_recipe(
            &mut conn,
            created.id,
            payload(json!({"ingredients": [{"name": "rye"}]})),
            UpdateMode::Partial,
            MissingIngredients::Preserve,
        )
        .unwrap();

        assert_eq!(updated.name, "Bread");
        assert_eq!(updated.description, created.description);
        assert_eq!(updated.ingredients.len(), 1);
        assert_eq!(updated.ingredients[0].name, "rye");
        assert_ne!(updated.ingredients[0].id, created.ingredients[0].id);
        assert_eq!(Ingredient::count(&conn).unwrap(), 1);
    }

    #[test]
    fn test_full_update_replaces_ingredients() {
        let mut conn = db::open_in_memory().unwrap();
        let created = sample(&mut conn, "Test name", &["Test ingredient"]);

        let updated = update_recipe(
            &mut conn,
            created.id,
            payload(json!({
                "name": "New recipe",
                "description": "New description",
                "ingredients": [{"name": "new ingredient"}]
            })),
            UpdateMode::Full,
            MissingIngredients::Preserve,
        )
        .unwrap();

        assert_eq!(updated.name, "New recipe");
        assert_eq!(updated.description, "New description");
        assert_eq!(updated.ingredients.len(), 1);
        assert_eq!(updated.ingredients[0].name, "new ingredient");
        assert_ne!(updated.ingredients[0].id, created.ingredients[0].id);
        assert_eq!(Ingredient::count(&conn).unwrap(), 1);
    }

    #[test]
    fn test_full_update_explicit_empty_list_clears() {
        let mut conn = db::open_in_memory().unwrap();
        let created = sample(&mut conn, "Test name", &["a", "b"]);

        let updated = update_recipe(
            &mut conn,
            created.id,
            payload(json!({"name": "New recipe", "ingredients": []})),
            UpdateMode::Full,
            MissingIngredients::Preserve,
        )
        .unwrap();

        assert!(updated.ingredients.is_empty());
        assert_eq!(Ingredient::count_by_recipe(&conn, created.id).unwrap(), 0);
    }

    #[test]
    fn test_full_update_missing_ingredients_policy() {
        let mut conn = db::open_in_memory().unwrap();
        let created = sample(&mut conn, "Test name", &["kept"]);
        let body = json!({"name": "New recipe", "description": "New description"});

        let preserved = update_recipe(
            &mut conn,
            created.id,
            payload(body.clone()),
            UpdateMode::Full,
            MissingIngredients::Preserve,
        )
        .unwrap();
        assert_eq!(preserved.ingredients, created.ingredients);

        let cleared = update_recipe(
            &mut conn,
            created.id,
            payload(body),
            UpdateMode::Full,
            MissingIngredients::Clear,
        )
        .unwrap();
        assert!(cleared.ingredients.is_empty());
    }

    #[test]
    fn test_invalid_update_changes_nothing() {
        let mut conn = db::open_in_memory().unwrap();
        let created = sample(&mut conn, "Test name", &["salt"]);

        let result = update_recipe(
            &mut conn,
            created.id,
            payload(json!({"name": "", "ingredients": []})),
            UpdateMode::Full,
            MissingIngredients::Preserve,
        );

        assert!(matches!(result, Err(Error::ValidationError(_))));
        assert_eq!(retrieve_recipe(&conn, created.id).unwrap(), created);
    }

    #[test]
    fn test_unknown_recipe_is_not_found() {
        let mut conn = db::open_in_memory().unwrap();

        assert!(matches!(retrieve_recipe(&conn, 1), Err(Error::NotFound(_))));
        assert!(matches!(
            update_recipe(
                &mut conn,
                1,
                payload(json!({"name": ""})),
                UpdateMode::Partial,
                MissingIngredients::Preserve,
            ),
            Err(Error::NotFound(_))
        ));
        assert!(matches!(delete_recipe(&mut conn, 1), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_delete_cascades() {
        let mut conn = db::open_in_memory().unwrap();
        let created = sample(&mut conn, "Test name", &["a", "b"]);

        delete_recipe(&mut conn, created.id).unwrap();

        assert_eq!(Recipe::count(&conn).unwrap(), 0);
        assert_eq!(Ingredient::count(&conn).unwrap(), 0);
    }

    #[test]
    fn test_missing_ingredients_parse() {
        assert_eq!("clear".parse::<MissingIngredients>().unwrap(), MissingIngredients::Clear);
        assert_eq!(MissingIngredients::default().as_str(), "preserve");
        assert!("drop".parse::<MissingIngredients>().is_err());
    }
}
