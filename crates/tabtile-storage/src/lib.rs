//! Tabtile Storage Layer
//!
//! SQLite persistence for user settings (`window:*` keys and friends).
//! Tab and block objects are owned by the object store, not by this crate.

mod database;
mod error;
mod migrations;

pub use database::Database;
pub use error::StorageError;

pub type Result<T> = std::result::Result<T, StorageError>;
