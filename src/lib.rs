//! Libris Library Catalog Manager
//!
//! A small flat-file library catalog: books, users, and borrow/return
//! transactions persisted to JSON stores. The [`library::Library`] aggregate
//! owns the catalog and enforces the borrowing invariants.

pub mod cli;
pub mod config;
pub mod error;
pub mod library;
pub mod models;
pub mod store;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use library::Library;
