// src/catalog/validation.rs

//! Input validation for recipe writes
//!
//! Validation is pure: it turns a wire payload into typed input or a set of
//! per-field messages, and never touches storage. Field keys for nested
//! ingredients are `ingredients[<index>].name`.

use super::serializer::{IngredientPayload, RecipePayload};
use super::{MissingIngredients, UpdateMode};
use serde::Serialize;
use std::collections::BTreeMap;

/// Longest accepted recipe or ingredient name, in characters
pub const MAX_NAME_LENGTH: usize = 255;

const REQUIRED: &str = "This field is required.";
const BLANK: &str = "This field may not be blank.";
const NULL: &str = "This field may not be null.";

/// Field-level validation messages, keyed by field path
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message against a field
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages recorded for one field (empty if none)
    pub fn messages(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn fields(&self) -> &BTreeMap<String, Vec<String>> {
        &self.0
    }

    /// `Ok(value)` when nothing was recorded, otherwise `Err(self)`
    pub fn into_result<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    write!(f, "; ")?;
                }
                write!(f, "{}: {}", field, message)?;
                first = false;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// A validated ingredient to be inserted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIngredient {
    pub name: String,
}

/// A validated recipe to be inserted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecipe {
    pub name: String,
    pub description: String,
    pub ingredients: Vec<NewIngredient>,
}

/// What an update does to a recipe's ingredient set
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngredientsUpdate {
    /// Leave existing ingredients alone
    Unset,
    /// Delete every existing ingredient, then insert these (possibly none)
    Replace(Vec<NewIngredient>),
}

/// Validated changes to an existing recipe; `None` scalars stay as they are
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub ingredients: IngredientsUpdate,
}

/// Validate a create payload
pub fn validate_create(payload: RecipePayload) -> Result<NewRecipe, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let name = required_name("name", payload.name, &mut errors);
    let description = match payload.description {
        None => String::new(),
        Some(None) => {
            errors.add("description", NULL);
            String::new()
        }
        Some(Some(description)) => description,
    };
    let ingredients = match payload.ingredients {
        None => Vec::new(),
        Some(None) => {
            errors.add("ingredients", NULL);
            Vec::new()
        }
        Some(Some(items)) => ingredient_list(items, &mut errors),
    };

    errors.into_result(NewRecipe {
        name: name.unwrap_or_default(),
        description,
        ingredients,
    })
}

/// Validate an update payload
///
/// A partial update only validates what was sent. A full update requires
/// `name`, resets an omitted `description` to empty, and handles an omitted
/// `ingredients` key according to `missing`.
pub fn validate_update(
    payload: RecipePayload,
    mode: UpdateMode,
    missing: MissingIngredients,
) -> Result<RecipeChanges, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let name = match (mode, payload.name) {
        (UpdateMode::Full, name) => required_name("name", name, &mut errors),
        (UpdateMode::Partial, None) => None,
        (UpdateMode::Partial, name) => required_name("name", name, &mut errors),
    };

    let description = match (mode, payload.description) {
        (UpdateMode::Full, None) => Some(String::new()),
        (UpdateMode::Partial, None) => None,
        (_, Some(None)) => {
            errors.add("description", NULL);
            None
        }
        (_, Some(Some(description))) => Some(description),
    };

    let ingredients = match (mode, payload.ingredients) {
        (UpdateMode::Full, None) => match missing {
            MissingIngredients::Preserve => IngredientsUpdate::Unset,
            MissingIngredients::Clear => IngredientsUpdate::Replace(Vec::new()),
        },
        (UpdateMode::Partial, None) => IngredientsUpdate::Unset,
        (_, Some(None)) => {
            errors.add("ingredients", NULL);
            IngredientsUpdate::Unset
        }
        (_, Some(Some(items))) => IngredientsUpdate::Replace(ingredient_list(items, &mut errors)),
    };

    errors.into_result(RecipeChanges {
        name,
        description,
        ingredients,
    })
}

/// Recipe names must be present, non-null, non-blank and not too long.
/// Surrounding whitespace is stripped before any check.
fn required_name(
    field: &str,
    value: Option<Option<String>>,
    errors: &mut ValidationErrors,
) -> Option<String> {
    match value {
        None => {
            errors.add(field, REQUIRED);
            None
        }
        Some(None) => {
            errors.add(field, NULL);
            None
        }
        Some(Some(name)) => {
            let name = name.trim();
            if name.is_empty() {
                errors.add(field, BLANK);
                return None;
            }
            check_length(field, name.to_string(), errors)
        }
    }
}

fn check_length(field: &str, value: String, errors: &mut ValidationErrors) -> Option<String> {
    if value.chars().count() > MAX_NAME_LENGTH {
        errors.add(
            field,
            format!("Ensure this field has no more than {} characters.", MAX_NAME_LENGTH),
        );
        return None;
    }
    Some(value)
}

/// Ingredient names may be empty but must be present; they are trimmed like recipe names
fn ingredient_list(items: Vec<IngredientPayload>, errors: &mut ValidationErrors) -> Vec<NewIngredient> {
    let mut ingredients = Vec::with_capacity(items.len());

    for (index, item) in items.into_iter().enumerate() {
        let field = format!("ingredients[{}].name", index);
        match item.name {
            None => errors.add(field, REQUIRED),
            Some(None) => errors.add(field, NULL),
            Some(Some(name)) => {
                let name = name.trim().to_string();
                if let Some(name) = check_length(&field, name, errors) {
                    ingredients.push(NewIngredient { name });
                }
            }
        }
    }

    ingredients
}
