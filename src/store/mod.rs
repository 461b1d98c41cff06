//! Keyed record store: one contract, two backings (flat file / SQLite).

pub mod flat_file;
pub mod sqlite;

pub use flat_file::FlatFileStore;
pub use sqlite::SqliteStore;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The delimiter of the pipe-separated flat file. Field values may never
/// contain it (or a newline) on either backing, so records stay
/// round-trippable and the two backings reject the same payloads.
pub const FIELD_DELIMITER: char = '|';

/// A four-field metadata record keyed by title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub title: String,
    pub location: String,
    #[serde(rename = "use")]
    pub use_: String,
    pub category: String,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("connection pool error: {0}")]
    Pool(#[from] r2d2::Error),
    #[error("invalid field value: {0}")]
    InvalidField(String),
}

/// Read/update contract both backings satisfy identically.
///
/// Titles match by exact, case-sensitive string equality; `get_by_code`
/// is the one case-folded path, used by the QR detail page where codes
/// arrive from scanned URLs in arbitrary case.
pub trait RecordStore: Send + Sync {
    /// Point lookup by exact title. No side effects.
    fn get(&self, title: &str) -> Result<Option<Record>, StoreError>;

    /// Lookup with both sides upper-cased.
    fn get_by_code(&self, code: &str) -> Result<Option<Record>, StoreError>;

    /// Replace location/use/category of the record with this exact title.
    /// Returns `Ok(false)` if no such record exists; the store is then
    /// unchanged. The title itself is never modified.
    fn update(
        &self,
        title: &str,
        location: &str,
        use_: &str,
        category: &str,
    ) -> Result<bool, StoreError>;
}

/// Reject replacement values that would corrupt the pipe-separated
/// representation. Applied by both backings so the contract is uniform.
pub(crate) fn check_field_values(fields: &[(&str, &str)]) -> Result<(), StoreError> {
    for (name, value) in fields {
        if value.contains(FIELD_DELIMITER) || value.contains('\n') || value.contains('\r') {
            return Err(StoreError::InvalidField(format!(
                "{} must not contain '{}' or line breaks",
                name, FIELD_DELIMITER
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod contract {
    //! Shared contract assertions, run against every backing.
    //!
    //! Callers seed the store with LAMP/DRILL before handing it over:
    //!   ("LAMP",  "Shelf A",  "Reading",  "Furniture")
    //!   ("DRILL", "Garage",   "DIY",      "Tools")

    use super::*;

    pub fn seed_records() -> Vec<Record> {
        vec![
            Record {
                title: "LAMP".into(),
                location: "Shelf A".into(),
                use_: "Reading".into(),
                category: "Furniture".into(),
            },
            Record {
                title: "DRILL".into(),
                location: "Garage".into(),
                use_: "DIY".into(),
                category: "Tools".into(),
            },
        ]
    }

    pub fn assert_store_contract(store: &dyn RecordStore) {
        // Exact lookup returns the seeded fields byte-for-byte
        let lamp = store.get("LAMP").unwrap().expect("LAMP must be present");
        assert_eq!(lamp.location, "Shelf A");
        assert_eq!(lamp.use_, "Reading");
        assert_eq!(lamp.category, "Furniture");

        // Exact match is case-sensitive; the code path is not
        assert!(store.get("lamp").unwrap().is_none());
        let by_code = store.get_by_code("lamp").unwrap().expect("code lookup");
        assert_eq!(by_code.title, "LAMP");

        // Same-value update is a no-op
        assert!(store.update("LAMP", "Shelf A", "Reading", "Furniture").unwrap());
        let lamp = store.get("LAMP").unwrap().unwrap();
        assert_eq!(
            (lamp.location.as_str(), lamp.use_.as_str(), lamp.category.as_str()),
            ("Shelf A", "Reading", "Furniture")
        );

        // Real update mutates exactly one record and never the title
        assert!(store.update("LAMP", "Shelf B", "Reading", "Furniture").unwrap());
        let lamp = store.get("LAMP").unwrap().unwrap();
        assert_eq!(lamp.title, "LAMP");
        assert_eq!(lamp.location, "Shelf B");
        let drill = store.get("DRILL").unwrap().unwrap();
        assert_eq!(drill.location, "Garage");

        // Absent title: not found, nothing changed
        assert!(!store.update("MISSING", "x", "y", "z").unwrap());
        assert!(store.get("MISSING").unwrap().is_none());
        assert_eq!(store.get("DRILL").unwrap().unwrap().location, "Garage");

        // Empty strings are legal values and round-trip intact
        assert!(store.update("DRILL", "", "", "").unwrap());
        let drill = store.get("DRILL").unwrap().unwrap();
        assert_eq!(
            (drill.location.as_str(), drill.use_.as_str(), drill.category.as_str()),
            ("", "", "")
        );

        // Delimiter-contaminated values are rejected, store untouched
        let err = store.update("LAMP", "Shelf|B", "Reading", "Furniture");
        assert!(matches!(err, Err(StoreError::InvalidField(_))));
        let err = store.update("LAMP", "Shelf B", "Read\ning", "Furniture");
        assert!(matches!(err, Err(StoreError::InvalidField(_))));
        assert_eq!(store.get("LAMP").unwrap().unwrap().location, "Shelf B");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_field_values() {
        assert!(check_field_values(&[("location", "Shelf A"), ("use", "")]).is_ok());
        assert!(check_field_values(&[("location", "a|b")]).is_err());
        assert!(check_field_values(&[("category", "a\nb")]).is_err());
        assert!(check_field_values(&[("category", "a\rb")]).is_err());
    }
}
