// src/db/models/recipe.rs

//! Recipe model - the owning side of the recipe/ingredient relationship

use super::Ingredient;
use crate::error::{Error, Result};
use rusqlite::{Connection, OptionalExtension, Row, params};

/// A recipe row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    pub id: Option<i64>,
    pub name: String,
    pub description: String,
}

impl Recipe {
    /// Create a new, not yet persisted recipe
    pub fn new(name: String, description: String) -> Self {
        Self {
            id: None,
            name,
            description,
        }
    }

    /// Insert this recipe into the database
    pub fn insert(&mut self, conn: &Connection) -> Result<i64> {
        conn.execute(
            "INSERT INTO recipes (name, description) VALUES (?1, ?2)",
            params![&self.name, &self.description],
        )?;

        let id = conn.last_insert_rowid();
        self.id = Some(id);
        Ok(id)
    }

    /// Find a recipe by ID
    pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<Self>> {
        let mut stmt =
            conn.prepare("SELECT id, name, description FROM recipes WHERE id = ?1")?;

        let recipe = stmt.query_row([id], Self::from_row).optional()?;
        Ok(recipe)
    }

    /// List all recipes in creation order
    pub fn list_all(conn: &Connection) -> Result<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT id, name, description FROM recipes ORDER BY id")?;

        let recipes = stmt
            .query_map([], Self::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(recipes)
    }

    /// Write name and description back to the database
    pub fn update(&self, conn: &Connection) -> Result<()> {
        let id = self.require_id()?;

        conn.execute(
            "UPDATE recipes SET name = ?1, description = ?2 WHERE id = ?3",
            params![&self.name, &self.description, id],
        )?;

        Ok(())
    }

    /// Delete a recipe; its ingredients go with it via `ON DELETE CASCADE`
    ///
    /// Returns `false` when no recipe had this ID.
    pub fn delete(conn: &Connection, id: i64) -> Result<bool> {
        let removed = conn.execute("DELETE FROM recipes WHERE id = ?1", [id])?;
        Ok(removed > 0)
    }

    /// Count all recipes
    pub fn count(conn: &Connection) -> Result<i64> {
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM recipes", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Ingredients owned by this recipe, in insertion order
    pub fn ingredients(&self, conn: &Connection) -> Result<Vec<Ingredient>> {
        Ingredient::find_by_recipe(conn, self.require_id()?)
    }

    fn require_id(&self) -> Result<i64> {
        self.id.ok_or_else(|| {
            Error::NotInserted(format!("Recipe '{}'", self.name))
        })
    }

    /// Convert a database row to a Recipe
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: Some(row.get(0)?),
            name: row.get(1)?,
            description: row.get(2)?,
        })
    }
}

impl std::fmt::Display for Recipe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
