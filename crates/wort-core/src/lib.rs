//! wort-core - Core library for Wort
//!
//! This crate contains the shared models, local word store, word API client,
//! identity provider, and sync engine used by all Wort interfaces.

pub mod api;
pub mod auth;
pub mod db;
pub mod error;
pub mod export;
pub mod models;
pub mod services;
pub mod sync;
pub mod util;

pub use error::{Error, Result};
pub use models::{Word, WordId};
