use rusqlite::{Connection, OptionalExtension};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info};

use crate::models::{now_timestamp, Collection};

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    SqliteError(#[from] rusqlite::Error),
    #[error("Failed to create database directory: {0}")]
    DirectoryError(String),
    #[error("Collection not found: {0}")]
    CollectionNotFound(String),
}

pub struct Database {
    conn: Connection,
}

impl Database {
    /// Create a new database connection and initialize the schema
    pub fn new(path: &str) -> Result<Self, DatabaseError> {
        let db_path = PathBuf::from(path);

        // Create parent directory if it doesn't exist
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| DatabaseError::DirectoryError(e.to_string()))?;
            }
        }

        let conn = Connection::open(&db_path)?;
        info!(path = %db_path.display(), "opened tag database");

        let db = Database { conn };
        db.initialize_schema()?;

        Ok(db)
    }

    /// Open a throwaway database that lives only as long as the value
    pub fn open_in_memory() -> Result<Self, DatabaseError> {
        let db = Database { conn: Connection::open_in_memory()? };
        db.initialize_schema()?;
        Ok(db)
    }

    /// Initialize the database schema (tables and indexes)
    fn initialize_schema(&self) -> Result<(), DatabaseError> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS collections (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                name            TEXT NOT NULL UNIQUE,
                created_at      TEXT NOT NULL,
                updated_at      TEXT NOT NULL
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS collection_tags (
                collection_id   INTEGER NOT NULL REFERENCES collections(id) ON DELETE CASCADE,
                position        INTEGER NOT NULL,
                tag             TEXT NOT NULL,
                PRIMARY KEY (collection_id, position)
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_collection_tags_tag ON collection_tags(tag)",
            [],
        )?;

        Ok(())
    }

    fn load_tags(&self, collection_id: i64) -> Result<Vec<String>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT tag FROM collection_tags WHERE collection_id = ?1 ORDER BY position ASC"
        )?;
        let tags = stmt.query_map(rusqlite::params![collection_id], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(tags)
    }

    /// Helper function to map a row to a Collection (without tags)
    fn row_to_collection(row: &rusqlite::Row) -> Result<Collection, rusqlite::Error> {
        Ok(Collection {
            id: Some(row.get(0)?),
            name: row.get(1)?,
            tags: Vec::new(),
            created_at: row.get(2)?,
            updated_at: row.get(3)?,
        })
    }

    /// Get a collection and its tags by name
    pub fn get_collection(&self, name: &str) -> Result<Option<Collection>, DatabaseError> {
        let collection = self.conn.query_row(
            "SELECT id, name, created_at, updated_at FROM collections WHERE name = ?1",
            rusqlite::params![name],
            Self::row_to_collection,
        ).optional()?;

        match collection {
            Some(mut collection) => {
                if let Some(id) = collection.id {
                    collection.tags = self.load_tags(id)?;
                }
                Ok(Some(collection))
            }
            None => Ok(None),
        }
    }

    /// Get a collection by name, inserting an empty one if it doesn't exist yet
    pub fn get_or_create_collection(&self, name: &str) -> Result<Collection, DatabaseError> {
        if let Some(collection) = self.get_collection(name)? {
            return Ok(collection);
        }

        let mut collection = Collection::new(name.to_string());
        self.conn.execute(
            "INSERT INTO collections (name, created_at, updated_at) VALUES (?1, ?2, ?3)",
            rusqlite::params![collection.name, collection.created_at, collection.updated_at],
        )?;
        collection.id = Some(self.conn.last_insert_rowid());
        info!(collection = name, "created collection");
        Ok(collection)
    }

    /// Replace the ordered tags of a collection, creating it if needed
    pub fn save_tags(&mut self, name: &str, tags: &[String]) -> Result<(), DatabaseError> {
        let collection = self.get_or_create_collection(name)?;
        let id = collection.id
            .ok_or_else(|| DatabaseError::CollectionNotFound(name.to_string()))?;

        let tx = self.conn.transaction()?;
        tx.execute(
            "DELETE FROM collection_tags WHERE collection_id = ?1",
            rusqlite::params![id],
        )?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO collection_tags (collection_id, position, tag) VALUES (?1, ?2, ?3)"
            )?;
            for (position, tag) in tags.iter().enumerate() {
                stmt.execute(rusqlite::params![id, position as i64, tag])?;
            }
        }
        tx.execute(
            "UPDATE collections SET updated_at = ?1 WHERE id = ?2",
            rusqlite::params![now_timestamp(), id],
        )?;
        tx.commit()?;

        info!(collection = name, count = tags.len(), "saved tags");
        Ok(())
    }

    /// Get all collections (with tags) ordered by name
    pub fn list_collections(&self) -> Result<Vec<Collection>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, created_at, updated_at FROM collections ORDER BY name ASC"
        )?;
        let mut collections = stmt.query_map([], Self::row_to_collection)?
            .collect::<Result<Vec<_>, _>>()?;

        for collection in collections.iter_mut() {
            if let Some(id) = collection.id {
                collection.tags = self.load_tags(id)?;
            }
        }

        Ok(collections)
    }

    /// Delete a collection and its tags in one transaction
    pub fn delete_collection(&mut self, name: &str) -> Result<(), DatabaseError> {
        let id = self.get_collection(name)?
            .and_then(|c| c.id)
            .ok_or_else(|| DatabaseError::CollectionNotFound(name.to_string()))?;

        let tx = self.conn.transaction()?;
        tx.execute(
            "DELETE FROM collection_tags WHERE collection_id = ?1",
            rusqlite::params![id],
        )?;
        tx.execute(
            "DELETE FROM collections WHERE id = ?1",
            rusqlite::params![id],
        )?;
        tx.commit()?;

        info!(collection = name, "deleted collection");
        Ok(())
    }

    /// Every distinct tag across all collections, sorted
    pub fn all_tags(&self) -> Result<Vec<String>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT tag FROM collection_tags ORDER BY tag ASC"
        )?;
        let tags = stmt.query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        debug!(count = tags.len(), "loaded known tags");
        Ok(tags)
    }

    /// Collections carrying `tag` (case-insensitive), ordered by name
    pub fn collections_with_tag(&self, tag: &str) -> Result<Vec<Collection>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT c.id, c.name, c.created_at, c.updated_at
             FROM collections c
             JOIN collection_tags t ON t.collection_id = c.id
             WHERE lower(t.tag) = lower(?1)
             ORDER BY c.name ASC"
        )?;
        let mut collections = stmt.query_map(rusqlite::params![tag.trim()], Self::row_to_collection)?
            .collect::<Result<Vec<_>, _>>()?;

        for collection in collections.iter_mut() {
            if let Some(id) = collection.id {
                collection.tags = self.load_tags(id)?;
            }
        }

        Ok(collections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn save_and_reload_preserves_order() {
        let mut db = Database::open_in_memory().unwrap();
        db.save_tags("course", &strings(&["rust", "async", "cli"])).unwrap();

        let collection = db.get_collection("course").unwrap().unwrap();
        assert_eq!(collection.tags, strings(&["rust", "async", "cli"]));
    }

    #[test]
    fn save_replaces_previous_tags() {
        let mut db = Database::open_in_memory().unwrap();
        db.save_tags("course", &strings(&["a", "b", "c"])).unwrap();
        db.save_tags("course", &strings(&["c", "a"])).unwrap();

        let collection = db.get_collection("course").unwrap().unwrap();
        assert_eq!(collection.tags, strings(&["c", "a"]));
    }

    #[test]
    fn missing_collection_is_none_until_created() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.get_collection("nope").unwrap().is_none());

        let created = db.get_or_create_collection("nope").unwrap();
        assert!(created.id.is_some());
        assert!(created.tags.is_empty());
        assert_eq!(db.get_or_create_collection("nope").unwrap().id, created.id);
    }

    #[test]
    fn all_tags_are_distinct_and_sorted() {
        let mut db = Database::open_in_memory().unwrap();
        db.save_tags("one", &strings(&["vue", "react"])).unwrap();
        db.save_tags("two", &strings(&["react", "angular"])).unwrap();

        assert_eq!(db.all_tags().unwrap(), strings(&["angular", "react", "vue"]));
    }

    #[test]
    fn collections_with_tag_ignores_case() {
        let mut db = Database::open_in_memory().unwrap();
        db.save_tags("beta", &strings(&["rust"])).unwrap();
        db.save_tags("alpha", &strings(&["go", "rust"])).unwrap();
        db.save_tags("gamma", &strings(&["go"])).unwrap();

        let names: Vec<String> = db.collections_with_tag(" RUST ").unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, strings(&["alpha", "beta"]));
    }

    #[test]
    fn delete_removes_collection_and_tags() {
        let mut db = Database::open_in_memory().unwrap();
        db.save_tags("gone", &strings(&["x"])).unwrap();
        db.delete_collection("gone").unwrap();

        assert!(db.get_collection("gone").unwrap().is_none());
        assert!(db.all_tags().unwrap().is_empty());
        assert!(matches!(db.delete_collection("gone"), Err(DatabaseError::CollectionNotFound(_))));
    }

    #[test]
    fn delete_leaves_other_collections_alone() {
        let mut db = Database::open_in_memory().unwrap();
        db.save_tags("gone", &strings(&["shared", "only-here"])).unwrap();
        db.save_tags("kept", &strings(&["shared"])).unwrap();
        db.delete_collection("gone").unwrap();

        assert_eq!(db.all_tags().unwrap(), strings(&["shared"]));
        assert_eq!(db.get_collection("kept").unwrap().unwrap().tags, strings(&["shared"]));
        let names: Vec<String> = db.list_collections().unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(names, strings(&["kept"]));
    }

    #[test]
    fn creates_parent_directory_on_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("tags.db");
        {
            let mut db = Database::new(path.to_str().unwrap()).unwrap();
            db.save_tags("kept", &strings(&["persisted"])).unwrap();
        }

        let db = Database::new(path.to_str().unwrap()).unwrap();
        let names: Vec<String> = db.list_collections().unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(names, strings(&["kept"]));
    }
}
