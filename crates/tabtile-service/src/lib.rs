//! Tabtile Object Service
//!
//! The only write path into the object store: blocks are created and deleted
//! here, and the store cells update as a side effect.

mod error;
mod local;
mod service;
mod task;

pub use error::ServiceError;
pub use local::LocalObjectService;
pub use service::ObjectService;
pub use task::fire_and_forget;

pub type Result<T> = std::result::Result<T, ServiceError>;
