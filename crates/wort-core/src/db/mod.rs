//! Database layer for Wort

mod connection;
mod migrations;
mod repository;
mod settings_repository;

pub use connection::Database;
pub use repository::{
    ReviewRepository, SqliteReviewRepository, SqliteWordRepository, WordRepository,
};
pub use settings_repository::{SettingsRepository, SqliteSettingsRepository};
