//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Storage error: {0}")]
    Storage(#[from] tabtile_storage::StorageError),

    #[error("Object store error: {0}")]
    Store(#[from] tabtile_wos::WosError),

    #[error("Service error: {0}")]
    Service(#[from] tabtile_service::ServiceError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Tab id must not be empty")]
    EmptyTabId,

    #[error("Object store closed")]
    StoreClosed,
}
