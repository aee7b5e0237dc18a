//! Tabtile Object Store
//!
//! Reactive access to persisted workspace objects (tabs, blocks) and to user
//! settings. Every value is held in a [`Cell`]: reads are synchronous
//! snapshots, and subscribers are woken whenever the value changes.

mod cell;
mod error;
mod object;
mod oref;
pub mod settings;
mod store;

pub use cell::{Cell, ObjectCell};
pub use error::WosError;
pub use object::{Block, BlockDef, MetaMap, Tab, WaveObj, WaveObject, META_VIEW};
pub use oref::{make_oref, ORef};
pub use settings::{SettingsSnapshot, SettingsStore};
pub use store::ObjectStore;

pub type Result<T> = std::result::Result<T, WosError>;
