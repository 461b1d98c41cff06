//! SQLite backing: one table, title as PRIMARY KEY.
//!
//! Uniqueness is enforced by the key constraint up front, so the
//! affected-row count of an UPDATE is an unambiguous found/not-found
//! signal. Concurrent updates are serialized by SQLite's own locking.

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;

use super::{check_field_values, Record, RecordStore, StoreError};

const SELECT_FIELDS: &str = "title, location, \"use\", category";

pub struct SqliteStore {
    pool: Pool<SqliteConnectionManager>,
}

impl SqliteStore {
    pub fn new(database_url: &str) -> Result<Self, StoreError> {
        if let Some(parent) = std::path::Path::new(database_url).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let manager = SqliteConnectionManager::file(database_url);
        let pool = Pool::new(manager)?;
        let store = Self { pool };
        store.init_schema()?;
        Ok(store)
    }

    #[cfg(test)]
    pub fn new_in_memory() -> Result<Self, StoreError> {
        // Single connection so every pooled checkout sees the same db
        let manager = SqliteConnectionManager::memory();
        let pool = Pool::builder().max_size(1).build(manager)?;
        let store = Self { pool };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<(), StoreError> {
        let conn = self.pool.get()?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS qr_details (
                title TEXT PRIMARY KEY,
                location TEXT NOT NULL,
                \"use\" TEXT NOT NULL,
                category TEXT NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    /// Out-of-band seeding helper; inserting is not part of the store
    /// contract, records normally arrive via an external import.
    pub fn insert(&self, record: &Record) -> Result<(), StoreError> {
        check_field_values(&[
            ("location", record.location.as_str()),
            ("use", record.use_.as_str()),
            ("category", record.category.as_str()),
        ])?;
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT INTO qr_details (title, location, \"use\", category) VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![
                &record.title,
                &record.location,
                &record.use_,
                &record.category
            ],
        )?;
        Ok(())
    }

    fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<Record> {
        Ok(Record {
            title: row.get(0)?,
            location: row.get(1)?,
            use_: row.get(2)?,
            category: row.get(3)?,
        })
    }
}

impl RecordStore for SqliteStore {
    fn get(&self, title: &str) -> Result<Option<Record>, StoreError> {
        let conn = self.pool.get()?;
        let record = conn
            .query_row(
                &format!("SELECT {SELECT_FIELDS} FROM qr_details WHERE title = ?1"),
                [title],
                Self::row_to_record,
            )
            .map(Some)
            .or_else(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Ok(None),
                e => Err(e),
            })?;
        Ok(record)
    }

    fn get_by_code(&self, code: &str) -> Result<Option<Record>, StoreError> {
        let conn = self.pool.get()?;
        let record = conn
            .query_row(
                &format!("SELECT {SELECT_FIELDS} FROM qr_details WHERE upper(title) = ?1"),
                [code.to_uppercase()],
                Self::row_to_record,
            )
            .map(Some)
            .or_else(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Ok(None),
                e => Err(e),
            })?;
        Ok(record)
    }

    fn update(
        &self,
        title: &str,
        location: &str,
        use_: &str,
        category: &str,
    ) -> Result<bool, StoreError> {
        check_field_values(&[
            ("location", location),
            ("use", use_),
            ("category", category),
        ])?;
        let conn = self.pool.get()?;
        let rows_affected = conn.execute(
            "UPDATE qr_details SET location = ?2, \"use\" = ?3, category = ?4 WHERE title = ?1",
            rusqlite::params![title, location, use_, category],
        )?;
        Ok(rows_affected > 0)
    }
}
