//! Core of the daybook personal calendar.
//!
//! This crate owns everything below the presentation layer:
//! - `date_key` for day keys, week and month bounds and the 42-cell grid
//! - `store` for the event and category store and its snapshot persistence
//! - `recurrence` for expanding a recurring event into concrete instances
//! - `view` for materializing month, week, day and agenda views
//! - `reminder` for the pending/notified reminder scan and its async loop

pub mod config;
pub mod date_key;
pub mod error;
pub mod event;
pub mod ids;
pub mod recurrence;
pub mod reminder;
pub mod storage;
pub mod store;
pub mod transfer;
pub mod view;

pub use config::DaybookConfig;
pub use error::{DaybookError, DaybookResult};
pub use event::*;
pub use storage::{FileStorage, MemoryStorage, SnapshotStorage, StorageKey};
pub use store::{Created, EventStore};
