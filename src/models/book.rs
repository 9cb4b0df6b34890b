//! Book (catalog entry) model.
//!
//! The `borrowed` flag is a plain typed field: it is restored directly by
//! serde on load and otherwise only changes through the [`Book::borrow`] and
//! [`Book::return_book`] transitions.

use serde::{Deserialize, Serialize};

/// A single catalog entry, keyed by its ISBN.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    title: String,
    author: String,
    isbn: String,
    #[serde(default)]
    borrowed: bool,
}

impl Book {
    /// Create a new, available book.
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        isbn: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            isbn: isbn.into(),
            borrowed: false,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn isbn(&self) -> &str {
        &self.isbn
    }

    pub fn is_borrowed(&self) -> bool {
        self.borrowed
    }

    /// Available -> Borrowed. Returns false (no state change) when the book
    /// is already out.
    pub fn borrow(&mut self) -> bool {
        if self.borrowed {
            return false;
        }
        self.borrowed = true;
        true
    }

    /// Borrowed -> Available. Returns false (no state change) when the book
    /// is not out.
    pub fn return_book(&mut self) -> bool {
        if !self.borrowed {
            return false;
        }
        self.borrowed = false;
        true
    }
}

impl std::fmt::Display for Book {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = if self.borrowed { "Borrowed" } else { "Available" };
        write!(
            f,
            "Title: {}, Author: {}, ISBN: {}, Status: {}",
            self.title, self.author, self.isbn, status
        )
    }
}
