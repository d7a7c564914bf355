// src/catalog/filter.rs

use super::serializer::RecipeRepr;

/// Keep recipes whose name contains `name` as a case-insensitive substring
///
/// `None` or an empty filter keeps everything. Order is preserved.
pub fn filter_recipes(recipes: Vec<RecipeRepr>, name: Option<&str>) -> Vec<RecipeRepr> {
    let needle = match name {
        Some(n) if !n.is_empty() => n.to_lowercase(),
        _ => return recipes,
    };

    recipes
        .into_iter()
        .filter(|recipe| recipe.name.to_lowercase().contains(&needle))
        .collect()
}
