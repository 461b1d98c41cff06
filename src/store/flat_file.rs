//! Flat-file backing: a pipe-separated UTF-8 text file.
//!
//! Layout: first line is a header (preserved but never parsed), each
//! following line is `title|location|use|category`. Lines that do not
//! split into exactly four fields are skipped during lookup with a
//! warning and carried through verbatim on rewrite; the store never
//! crashes on them and never silently drops them from the file.
//!
//! A process-wide mutex serializes every read and update, so the
//! read-modify-write cycle cannot race within this process. Writers in
//! other processes remain last-writer-wins; the SQLite backing is the
//! one to pick when that matters.

use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use super::{check_field_values, Record, RecordStore, StoreError, FIELD_DELIMITER};

pub struct FlatFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FlatFileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn read_lines(&self) -> Result<Vec<String>, StoreError> {
        let content = fs::read_to_string(&self.path)?;
        Ok(content.lines().map(str::to_string).collect())
    }

    fn parse_line<'a>(&self, line: &'a str) -> Option<[&'a str; 4]> {
        let fields: Vec<&str> = line.split(FIELD_DELIMITER).collect();
        match <[&str; 4]>::try_from(fields) {
            Ok(fields) => Some(fields),
            Err(_) => {
                log::warn!(
                    "Skipping corrupt line in {} (expected 4 fields): {:?}",
                    self.path.display(),
                    line
                );
                None
            }
        }
    }

    fn find(&self, matches: impl Fn(&str) -> bool) -> Result<Option<Record>, StoreError> {
        let _guard = self.lock.lock();
        for line in self.read_lines()?.iter().skip(1) {
            if let Some([title, location, use_, category]) = self.parse_line(line) {
                if matches(title) {
                    return Ok(Some(Record {
                        title: title.to_string(),
                        location: location.to_string(),
                        use_: use_.to_string(),
                        category: category.to_string(),
                    }));
                }
            }
        }
        Ok(None)
    }

    /// Whole-file rewrite through a sibling temp file + rename, so a
    /// crash mid-write never leaves a truncated data file behind.
    fn write_lines(&self, lines: &[String]) -> Result<(), StoreError> {
        let mut content = lines.join("\n");
        content.push('\n');
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, content)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl RecordStore for FlatFileStore {
    fn get(&self, title: &str) -> Result<Option<Record>, StoreError> {
        self.find(|t| t == title)
    }

    fn get_by_code(&self, code: &str) -> Result<Option<Record>, StoreError> {
        let code = code.to_uppercase();
        self.find(|t| t.to_uppercase() == code)
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

        let _guard = self.lock.lock();
        let lines = self.read_lines()?;
        if lines.is_empty() {
            return Ok(false);
        }

        let mut updated = false;
        let mut new_lines = Vec::with_capacity(lines.len());
        new_lines.push(lines[0].clone());
        for line in &lines[1..] {
            match self.parse_line(line) {
                Some([t, _, _, _]) if !updated && t == title => {
                    new_lines.push(format!("{t}|{location}|{use_}|{category}"));
                    updated = true;
                }
                // Corrupt lines pass through untouched
                _ => new_lines.push(line.clone()),
            }
        }

        if !updated {
            return Ok(false);
        }
        self.write_lines(&new_lines)?;
        Ok(true)
    }
}
