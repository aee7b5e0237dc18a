//! Object store error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WosError {
    #[error("Invalid object reference: {0}")]
    InvalidORef(String),

    #[error("Object {oref} is not a {expected}")]
    TypeMismatch { oref: String, expected: &'static str },

    #[error("Storage error: {0}")]
    Storage(#[from] tabtile_storage::StorageError),
}
