// src/db/models/ingredient.rs

use crate::error::Result;
use rusqlite::{Connection, OptionalExtension, Row, params};

/// An ingredient row, owned by exactly one recipe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ingredient {
    pub id: Option<i64>,
    pub name: String,
    pub recipe_id: i64,
}

impl Ingredient {
    pub fn new(name: String, recipe_id: i64) -> Self {
        Self {
            id: None,
            name,
            recipe_id,
        }
    }

    /// Insert this ingredient into the database
    pub fn insert(&mut self, conn: &Connection) -> Result<i64> {
        conn.execute(
            "INSERT INTO ingredients (name, recipe_id) VALUES (?1, ?2)",
            params![&self.name, &self.recipe_id],
        )?;

        let id = conn.last_insert_rowid();
        self.id = Some(id);
        Ok(id)
    }

    pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<Self>> {
        let mut stmt =
            conn.prepare("SELECT id, name, recipe_id FROM ingredients WHERE id = ?1")?;

        let ingredient = stmt.query_row([id], Self::from_row).optional()?;
        Ok(ingredient)
    }

    /// All ingredients of a recipe, in insertion order
    pub fn find_by_recipe(conn: &Connection, recipe_id: i64) -> Result<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT id, name, recipe_id FROM ingredients WHERE recipe_id = ?1 ORDER BY id",
        )?;

        let ingredients = stmt
            .query_map([recipe_id], Self::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(ingredients)
    }

    /// Remove every ingredient of a recipe, returning how many were removed
    pub fn delete_by_recipe(conn: &Connection, recipe_id: i64) -> Result<usize> {
        let removed = conn.execute("DELETE FROM ingredients WHERE recipe_id = ?1", [recipe_id])?;
        Ok(removed)
    }

    pub fn count_by_recipe(conn: &Connection, recipe_id: i64) -> Result<i64> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM ingredients WHERE recipe_id = ?1",
            [recipe_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    pub fn count(conn: &Connection) -> Result<i64> {
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM ingredients", [], |row| row.get(0))?;
        Ok(count)
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: Some(row.get(0)?),
            name: row.get(1)?,
            recipe_id: row.get(2)?,
        })
    }
}

impl std::fmt::Display for Ingredient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::Recipe;
    use crate::error::Error;
    use tempfile::NamedTempFile;

    fn create_test_db() -> (NamedTempFile, Connection) {
        let temp_file = NamedTempFile::new().unwrap();
        let conn = crate::db::open(temp_file.path()).unwrap();
        crate::db::schema::migrate(&conn).unwrap();
        (temp_file, conn)
    }

    fn sample_recipe(conn: &Connection) -> i64 {
        Recipe::new("Test name".to_string(), "Test description".to_string())
            .insert(conn)
            .unwrap()
    }

    #[test]
    fn test_ingredient_crud() {
        let (_temp, conn) = create_test_db();
        let recipe_id = sample_recipe(&conn);

        let mut ingredient = Ingredient::new("Test Ingredient".to_string(), recipe_id);
        let id = ingredient.insert(&conn).unwrap();

        let found = Ingredient::find_by_id(&conn, id).unwrap().unwrap();
        assert_eq!(found.name, "Test Ingredient");
        assert_eq!(found.recipe_id, recipe_id);

        assert_eq!(Ingredient::delete_by_recipe(&conn, recipe_id).unwrap(), 1);
        assert!(Ingredient::find_by_id(&conn, id).unwrap().is_none());
    }

    #[test]
    fn test_duplicate_names_allowed() {
        let (_temp, conn) = create_test_db();
        let recipe_id = sample_recipe(&conn);

        Ingredient::new("salt".to_string(), recipe_id).insert(&conn).unwrap();
        Ingredient::new("salt".to_string(), recipe_id).insert(&conn).unwrap();

        assert_eq!(Ingredient::count_by_recipe(&conn, recipe_id).unwrap(), 2);
    }

    #[test]
    fn test_orphan_ingredient_is_integrity_error() {
        let (_temp, conn) = create_test_db();

        let result = Ingredient::new("ghost".to_string(), 404).insert(&conn);
        assert!(matches!(result, Err(Error::IntegrityError(_))));
    }

    #[test]
    fn test_ingredient_display_is_name() {
        let ingredient = Ingredient::new("Test Ingredient".to_string(), 1);
        assert_eq!(ingredient.to_string(), ingredient.name);
    }
}
