//! Flat-file persistence for the catalog.
//!
//! Two JSON files, one holding the book records and one the user records.
//! Every save rewrites both files completely; there is no append log and no
//! versioning. Writes go through a temp file followed by an atomic rename so
//! a crash mid-save never leaves a truncated store behind.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::{
    error::{AppError, AppResult},
    models::{Book, User},
};

/// Persistence adapter for one pair of store files.
#[derive(Debug, Clone)]
pub struct JsonStore {
    books_path: PathBuf,
    users_path: PathBuf,
}

impl JsonStore {
    pub fn new(books_path: impl Into<PathBuf>, users_path: impl Into<PathBuf>) -> Self {
        Self {
            books_path: books_path.into(),
            users_path: users_path.into(),
        }
    }

    /// Load both collections. A missing file is an empty collection, not an
    /// error; malformed JSON is fatal and names the offending file.
    pub fn load(&self) -> AppResult<(Vec<Book>, Vec<User>)> {
        let books = Self::load_file(&self.books_path)?;
        let users = Self::load_file(&self.users_path)?;
        Ok((books, users))
    }

    /// Persist both collections, overwriting the previous store contents.
    pub fn save<'a, B, U>(&self, books: B, users: U) -> AppResult<()>
    where
        B: IntoIterator<Item = &'a Book>,
        U: IntoIterator<Item = &'a User>,
    {
        let books: Vec<&Book> = books.into_iter().collect();
        let users: Vec<&User> = users.into_iter().collect();
        Self::save_file(&self.books_path, &books)?;
        Self::save_file(&self.users_path, &users)?;
        tracing::debug!(
            books = books.len(),
            users = users.len(),
            "catalog saved to disk"
        );
        Ok(())
    }

    fn load_file<T: serde::de::DeserializeOwned>(path: &Path) -> AppResult<Vec<T>> {
        let data = match fs::read_to_string(path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "store file missing, starting empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&data).map_err(|source| AppError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn save_file<T: serde::Serialize>(path: &Path, records: &[T]) -> AppResult<()> {
        let json = serde_json::to_string_pretty(records).map_err(|source| AppError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let tmp_path = path.with_extension("tmp");
        {
            let mut tmp = fs::File::create(&tmp_path)?;
            tmp.write_all(json.as_bytes())?;
            tmp.sync_all()?;
        }
        fs::rename(&tmp_path, path)?;
        Ok(())
    }
}
