//! Synchronization between the local store and the word API.

pub mod changes;
pub mod engine;

pub use engine::{SyncEngine, SyncOptions, SyncStatus};
