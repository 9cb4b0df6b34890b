//! The `Library` aggregate.
//!
//! Owns the catalog maps (ISBN -> [`Book`], user id -> [`User`]), enforces
//! the borrowing invariants, and persists the full catalog through a
//! [`JsonStore`] after every successful mutation.
//!
//! Save-failure policy: every mutating operation applies its in-memory
//! change, saves, and on a save failure rolls the change back before
//! returning the error. Memory and disk never diverge past an operation
//! boundary.

use indexmap::IndexMap;

use crate::{
    error::{AppError, AppResult},
    models::{Book, User},
    store::JsonStore,
};

#[derive(Debug)]
pub struct Library {
    books: IndexMap<String, Book>,
    users: IndexMap<String, User>,
    store: JsonStore,
}

impl Library {
    /// Load the catalog from the store and verify its consistency.
    ///
    /// A missing store yields an empty catalog. A store whose user sets
    /// reference unknown or un-borrowed books, or that holds duplicate keys,
    /// is rejected as corrupt.
    pub fn open(store: JsonStore) -> AppResult<Self> {
        let (book_records, user_records) = store.load()?;

        let mut books = IndexMap::with_capacity(book_records.len());
        for book in book_records {
            let isbn = book.isbn().to_string();
            if books.insert(isbn.clone(), book).is_some() {
                return Err(AppError::CorruptStore(format!(
                    "duplicate ISBN {} in book store",
                    isbn
                )));
            }
        }

        let mut users = IndexMap::with_capacity(user_records.len());
        for user in user_records {
            let user_id = user.user_id().to_string();
            if users.insert(user_id.clone(), user).is_some() {
                return Err(AppError::CorruptStore(format!(
                    "duplicate user id {} in user store",
                    user_id
                )));
            }
        }

        let library = Self { books, users, store };
        library.check_consistency()?;
        tracing::info!(
            books = library.books.len(),
            users = library.users.len(),
            "catalog loaded"
        );
        Ok(library)
    }

    /// Cross-entity invariants: every ISBN in a user's borrowed set names an
    /// existing book marked borrowed, and every borrowed book is held by
    /// exactly one user.
    fn check_consistency(&self) -> AppResult<()> {
        let mut holders: IndexMap<&str, &str> = IndexMap::new();
        for user in self.users.values() {
            for isbn in user.borrowed_isbns() {
                let book = self.books.get(&isbn).ok_or_else(|| {
                    AppError::CorruptStore(format!(
                        "user {} holds unknown ISBN {}",
                        user.user_id(),
                        isbn
                    ))
                })?;
                if !book.is_borrowed() {
                    return Err(AppError::CorruptStore(format!(
                        "user {} holds ISBN {} but the book is not marked borrowed",
                        user.user_id(),
                        isbn
                    )));
                }
                if let Some(other) = holders.insert(book.isbn(), user.user_id()) {
                    return Err(AppError::CorruptStore(format!(
                        "ISBN {} held by both {} and {}",
                        book.isbn(),
                        other,
                        user.user_id()
                    )));
                }
            }
        }
        for book in self.books.values() {
            if book.is_borrowed() && !holders.contains_key(book.isbn()) {
                return Err(AppError::CorruptStore(format!(
                    "ISBN {} marked borrowed but no user holds it",
                    book.isbn()
                )));
            }
        }
        Ok(())
    }

    fn persist(&self) -> AppResult<()> {
        self.store.save(self.books.values(), self.users.values())
    }

    /// Add a book to the catalog. Fails on a duplicate ISBN.
    pub fn add_book(&mut self, book: Book) -> AppResult<()> {
        let isbn = book.isbn().to_string();
        if self.books.contains_key(&isbn) {
            return Err(AppError::Conflict(format!(
                "book with ISBN {} already registered",
                isbn
            )));
        }
        self.books.insert(isbn.clone(), book);
        if let Err(e) = self.persist() {
            tracing::error!(isbn = %isbn, error = %e, "save failed, rolling back add_book");
            self.books.shift_remove(&isbn);
            return Err(e);
        }
        tracing::debug!(isbn = %isbn, "book added");
        Ok(())
    }

    /// Remove a book. Fails when the ISBN is unknown or the book is out.
    pub fn remove_book(&mut self, isbn: &str) -> AppResult<()> {
        let book = self
            .books
            .get(isbn)
            .ok_or_else(|| AppError::NotFound(format!("no book with ISBN {}", isbn)))?;
        if book.is_borrowed() {
            return Err(AppError::BusinessRule(format!(
                "book {} is currently borrowed",
                isbn
            )));
        }
        // Index is needed to restore the catalog position on rollback.
        let (index, key, book) = self
            .books
            .shift_remove_full(isbn)
            .ok_or_else(|| AppError::NotFound(format!("no book with ISBN {}", isbn)))?;
        if let Err(e) = self.persist() {
            tracing::error!(isbn = %isbn, error = %e, "save failed, rolling back remove_book");
            self.books.shift_insert(index, key, book);
            return Err(e);
        }
        tracing::debug!(isbn = %isbn, "book removed");
        Ok(())
    }

    /// Register a user. Fails on a duplicate user id.
    pub fn register_user(&mut self, user: User) -> AppResult<()> {
        let user_id = user.user_id().to_string();
        if self.users.contains_key(&user_id) {
            return Err(AppError::Conflict(format!(
                "user id {} already registered",
                user_id
            )));
        }
        self.users.insert(user_id.clone(), user);
        if let Err(e) = self.persist() {
            tracing::error!(user_id = %user_id, error = %e, "save failed, rolling back register_user");
            self.users.shift_remove(&user_id);
            return Err(e);
        }
        tracing::debug!(user_id = %user_id, "user registered");
        Ok(())
    }

    /// Remove a user. Fails when the id is unknown or borrows are outstanding.
    pub fn remove_user(&mut self, user_id: &str) -> AppResult<()> {
        let user = self
            .users
            .get(user_id)
            .ok_or_else(|| AppError::NotFound(format!("no user with id {}", user_id)))?;
        if user.borrow_count() > 0 {
            return Err(AppError::BusinessRule(format!(
                "user {} still has {} borrowed book(s)",
                user_id,
                user.borrow_count()
            )));
        }
        let (index, key, user) = self
            .users
            .shift_remove_full(user_id)
            .ok_or_else(|| AppError::NotFound(format!("no user with id {}", user_id)))?;
        if let Err(e) = self.persist() {
            tracing::error!(user_id = %user_id, error = %e, "save failed, rolling back remove_user");
            self.users.shift_insert(index, key, user);
            return Err(e);
        }
        tracing::debug!(user_id = %user_id, "user removed");
        Ok(())
    }

    /// Borrow a book for a user. Both sides of the link are updated and
    /// persisted together, or neither is.
    pub fn borrow_book(&mut self, isbn: &str, user_id: &str) -> AppResult<()> {
        if !self.users.contains_key(user_id) {
            return Err(AppError::NotFound(format!("no user with id {}", user_id)));
        }
        let book = self
            .books
            .get_mut(isbn)
            .ok_or_else(|| AppError::NotFound(format!("no book with ISBN {}", isbn)))?;
        if !book.borrow() {
            return Err(AppError::BusinessRule(format!(
                "book {} is already borrowed",
                isbn
            )));
        }
        if let Some(user) = self.users.get_mut(user_id) {
            user.add_borrowed_isbn(isbn);
        }

        if let Err(e) = self.persist() {
            tracing::error!(isbn = %isbn, user_id = %user_id, error = %e, "save failed, rolling back borrow_book");
            if let Some(user) = self.users.get_mut(user_id) {
                user.remove_borrowed_isbn(isbn);
            }
            if let Some(book) = self.books.get_mut(isbn) {
                book.return_book();
            }
            return Err(e);
        }
        tracing::info!(isbn = %isbn, user_id = %user_id, "book borrowed");
        Ok(())
    }

    /// Return a book held by a user. Exact inverse of [`Self::borrow_book`];
    /// fails when the ISBN is not in that user's borrowed set.
    pub fn return_book(&mut self, isbn: &str, user_id: &str) -> AppResult<()> {
        let user = self
            .users
            .get(user_id)
            .ok_or_else(|| AppError::NotFound(format!("no user with id {}", user_id)))?;
        let book = self
            .books
            .get_mut(isbn)
            .ok_or_else(|| AppError::NotFound(format!("no book with ISBN {}", isbn)))?;
        if !user.has_borrowed(isbn) {
            return Err(AppError::BusinessRule(format!(
                "user {} does not hold ISBN {}",
                user_id, isbn
            )));
        }
        if !book.return_book() {
            // Unreachable while the load-time consistency check holds.
            return Err(AppError::BusinessRule(format!(
                "book {} is not marked borrowed",
                isbn
            )));
        }
        if let Some(user) = self.users.get_mut(user_id) {
            user.remove_borrowed_isbn(isbn);
        }

        if let Err(e) = self.persist() {
            tracing::error!(isbn = %isbn, user_id = %user_id, error = %e, "save failed, rolling back return_book");
            if let Some(book) = self.books.get_mut(isbn) {
                book.borrow();
            }
            if let Some(user) = self.users.get_mut(user_id) {
                user.add_borrowed_isbn(isbn);
            }
            return Err(e);
        }
        tracing::info!(isbn = %isbn, user_id = %user_id, "book returned");
        Ok(())
    }

    /// Case-insensitive substring search over title and author, plus
    /// exact-case substring match on the ISBN. Results follow catalog
    /// insertion order.
    pub fn search_books(&self, query: &str) -> Vec<&Book> {
        let needle = query.to_lowercase();
        self.books
            .values()
            .filter(|book| {
                book.title().to_lowercase().contains(&needle)
                    || book.author().to_lowercase().contains(&needle)
                    || book.isbn().contains(query)
            })
            .collect()
    }

    /// All books in insertion order, optionally only the available ones.
    /// The iterator is restartable; call again for a fresh pass.
    pub fn list_books(&self, available_only: bool) -> impl Iterator<Item = &Book> {
        self.books
            .values()
            .filter(move |book| !available_only || !book.is_borrowed())
    }

    /// All users in registration order.
    pub fn list_users(&self) -> impl Iterator<Item = &User> {
        self.users.values()
    }

    /// The books a user currently holds, in borrowed-set order.
    pub fn borrowed_books_of(&self, user_id: &str) -> AppResult<Vec<&Book>> {
        let user = self
            .users
            .get(user_id)
            .ok_or_else(|| AppError::NotFound(format!("no user with id {}", user_id)))?;
        Ok(user
            .borrowed_isbns()
            .iter()
            .filter_map(|isbn| self.books.get(isbn))
            .collect())
    }

    pub fn get_book(&self, isbn: &str) -> Option<&Book> {
        self.books.get(isbn)
    }

    pub fn get_user(&self, user_id: &str) -> Option<&User> {
        self.users.get(user_id)
    }

    pub fn book_count(&self) -> usize {
        self.books.len()
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }
}
