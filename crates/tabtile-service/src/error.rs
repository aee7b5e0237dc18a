//! Service error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Tab not found: {0}")]
    TabNotFound(String),

    #[error("Block {block_id} has an invalid parent: {parent}")]
    InvalidParent { block_id: String, parent: String },

    #[error("Object store error: {0}")]
    Store(#[from] tabtile_wos::WosError),

    #[error("Service unavailable: {0}")]
    Unavailable(String),
}
