//! User (library member) model.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// A registered library user, keyed by its user id.
///
/// The borrowed set holds the ISBNs of the books the user currently has out.
/// It is kept in insertion order and never contains duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    name: String,
    user_id: String,
    #[serde(rename = "borrowed", default)]
    borrowed_isbns: IndexSet<String>,
}

impl User {
    /// Create a new user with no borrows.
    pub fn new(name: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            user_id: user_id.into(),
            borrowed_isbns: IndexSet::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Snapshot of the borrowed ISBNs, in insertion order. A value copy:
    /// mutating the returned vector cannot touch internal state.
    pub fn borrowed_isbns(&self) -> Vec<String> {
        self.borrowed_isbns.iter().cloned().collect()
    }

    pub fn has_borrowed(&self, isbn: &str) -> bool {
        self.borrowed_isbns.contains(isbn)
    }

    pub fn borrow_count(&self) -> usize {
        self.borrowed_isbns.len()
    }

    /// Idempotent insert.
    pub fn add_borrowed_isbn(&mut self, isbn: impl Into<String>) {
        self.borrowed_isbns.insert(isbn.into());
    }

    /// Idempotent removal.
    pub fn remove_borrowed_isbn(&mut self, isbn: &str) {
        self.borrowed_isbns.shift_remove(isbn);
    }
}

impl std::fmt::Display for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "User: {} (ID: {}), Borrowed Books: {}",
            self.name,
            self.user_id,
            self.borrowed_isbns.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_borrowed_is_idempotent() {
        let mut user = User::new("Alice", "u1");
        user.add_borrowed_isbn("111");
        user.add_borrowed_isbn("111");
        assert_eq!(user.borrowed_isbns(), vec!["111".to_string()]);
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut user = User::new("Alice", "u1");
        user.add_borrowed_isbn("111");
        user.remove_borrowed_isbn("222");
        assert!(user.has_borrowed("111"));
        user.remove_borrowed_isbn("111");
        assert_eq!(user.borrow_count(), 0);
    }

    #[test]
    fn test_borrowed_isbns_is_a_copy() {
        let mut user = User::new("Alice", "u1");
        user.add_borrowed_isbn("111");
        let mut snapshot = user.borrowed_isbns();
        snapshot.clear();
        assert!(user.has_borrowed("111"));
    }

    #[test]
    fn test_serialized_shape() {
        let mut user = User::new("Alice", "u1");
        user.add_borrowed_isbn("111");
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"name": "Alice", "user_id": "u1", "borrowed": ["111"]})
        );
    }
}
