// src/db/mod.rs

//! SQLite storage for the recipe catalog
//!
//! Every connection handed out by this module has foreign keys enabled, so
//! the `ON DELETE CASCADE` rule on `ingredients.recipe_id` holds no matter
//! which layer issues a delete.

pub mod models;
pub mod schema;

use crate::error::{Error, Result};
use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// Default database location
pub const DEFAULT_DB_PATH: &str = "/var/lib/recipebook/recipebook.db";

/// Default time a connection waits on a locked database before failing
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Create the database file (and parent directories) and apply migrations
pub fn init<P: AsRef<Path>>(db_path: P) -> Result<()> {
    let db_path = db_path.as_ref();
    info!("Initializing database at {}", db_path.display());

    let parent = db_path.parent().filter(|p| !p.as_os_str().is_empty());
    if let Some(parent) = parent {
        std::fs::create_dir_all(parent).map_err(|e| {
            Error::InitError(format!(
                "Failed to create database directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    let conn = open(db_path)?;
    schema::migrate(&conn)?;
    Ok(())
}

/// Open a connection with the default busy timeout
pub fn open<P: AsRef<Path>>(db_path: P) -> Result<Connection> {
    open_with_timeout(db_path, DEFAULT_BUSY_TIMEOUT)
}

/// Open a connection, enable foreign keys and set the busy timeout
pub fn open_with_timeout<P: AsRef<Path>>(db_path: P, busy_timeout: Duration) -> Result<Connection> {
    let db_path = db_path.as_ref();
    let conn = Connection::open(db_path).map_err(|e| {
        Error::IoError(format!(
            "Failed to open database {}: {}",
            db_path.display(),
            e
        ))
    })?;
    configure(&conn, busy_timeout)?;
    debug!("Opened database {}", db_path.display());
    Ok(conn)
}

/// Open a migrated in-memory database
pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    configure(&conn, DEFAULT_BUSY_TIMEOUT)?;
    schema::migrate(&conn)?;
    Ok(conn)
}

fn configure(conn: &Connection, busy_timeout: Duration) -> Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(busy_timeout)?;
    Ok(())
}

/// Run `f` inside a single transaction
///
/// The transaction takes the write lock up front (IMMEDIATE) so a
/// delete-then-recreate sequence is never interleaved with another writer.
/// Commits when `f` returns `Ok`, rolls back otherwise.
pub fn transaction<T, F>(conn: &mut Connection, f: F) -> Result<T>
where
    F: FnOnce(&Transaction) -> Result<T>,
{
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let value = f(&tx)?;
    tx.commit()?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("nested/dir/recipes.db");

        init(&db_path).unwrap();
        assert!(db_path.exists());

        let conn = open(&db_path).unwrap();
        assert_eq!(schema::get_schema_version(&conn).unwrap(), schema::SCHEMA_VERSION);
    }

    #[test]
    fn test_open_enables_foreign_keys() {
        let conn = open_in_memory().unwrap();
        let enabled: i64 = conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(enabled, 1);
    }

    #[test]
    fn test_transaction_rolls_back_on_error() {
        let mut conn = open_in_memory().unwrap();

        let result: Result<()> = transaction(&mut conn, |tx| {
            tx.execute(
                "INSERT INTO recipes (name, description) VALUES ('Soup', '')",
                [],
            )?;
            Err(Error::NotFound("recipe 42".to_string()))
        });
        assert!(result.is_err());

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM recipes", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_transaction_commits_on_success() {
        let mut conn = open_in_memory().unwrap();

        let id = transaction(&mut conn, |tx| {
            tx.execute(
                "INSERT INTO recipes (name, description) VALUES ('Soup', '')",
                [],
            )?;
            Ok(tx.last_insert_rowid())
        })
        .unwrap();

        let name: String = conn
            .query_row("SELECT name FROM recipes WHERE id = ?1", [id], |row| row.get(0))
            .unwrap();
        assert_eq!(name, "Soup");
    }
}
