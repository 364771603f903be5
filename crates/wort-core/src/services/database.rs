//! Shared database service wrapper used across clients.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::db::{
    Database, ReviewRepository, SettingsRepository, SqliteReviewRepository,
    SqliteSettingsRepository, SqliteWordRepository, WordRepository,
};
use crate::models::{ReviewData, UserSettings, Word};
use crate::{Result, WordId};

/// Thread-safe service for DB and repository operations.
#[derive(Clone)]
pub struct DatabaseService {
    db: Arc<Mutex<Database>>,
}

impl DatabaseService {
    /// Open a database service at the given filesystem path.
    pub fn open_path(db_path: impl Into<PathBuf>) -> Result<Self> {
        let db_path = db_path.into();
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = Database::open(db_path)?;
        Ok(Self {
            db: Arc::new(Mutex::new(db)),
        })
    }

    /// Open an in-memory database service (primarily for tests).
    pub fn open_in_memory() -> Result<Self> {
        let db = Database::open_in_memory()?;
        Ok(Self {
            db: Arc::new(Mutex::new(db)),
        })
    }

    /// Create a new word.
    pub async fn create_word(&self, word: &Word) -> Result<()> {
        let db = self.db.lock().await;
        let repo = SqliteWordRepository::new(db.connection());
        repo.create(word)
    }

    /// Fetch a word by id.
    pub async fn get_word(&self, id: &WordId) -> Result<Option<Word>> {
        let db = self.db.lock().await;
        let repo = SqliteWordRepository::new(db.connection());
        repo.get(id)
    }

    /// Insert or wholesale-replace a word (server-change application).
    pub async fn upsert_word(&self, word: &Word) -> Result<()> {
        let db = self.db.lock().await;
        let repo = SqliteWordRepository::new(db.connection());
        repo.upsert(word)
    }

    /// Update an existing word.
    pub async fn update_word(&self, word: &Word) -> Result<()> {
        let db = self.db.lock().await;
        let repo = SqliteWordRepository::new(db.connection());
        repo.update(word)
    }

    /// Hard-delete a word; returns whether a row existed.
    pub async fn delete_word(&self, id: &WordId) -> Result<bool> {
        let db = self.db.lock().await;
        let repo = SqliteWordRepository::new(db.connection());
        repo.delete(id)
    }

    /// List words newest-first.
    pub async fn list_words(&self, limit: usize, offset: usize) -> Result<Vec<Word>> {
        let db = self.db.lock().await;
        let repo = SqliteWordRepository::new(db.connection());
        repo.list(limit, offset)
    }

    /// Every word in the store, newest-first.
    pub async fn all_words(&self) -> Result<Vec<Word>> {
        let db = self.db.lock().await;
        let repo = SqliteWordRepository::new(db.connection());
        repo.all()
    }

    /// Search words by query.
    pub async fn search_words(&self, query: &str, limit: usize) -> Result<Vec<Word>> {
        let db = self.db.lock().await;
        let repo = SqliteWordRepository::new(db.connection());
        repo.search(query, limit)
    }

    /// Number of words in the store.
    pub async fn count_words(&self) -> Result<usize> {
        let db = self.db.lock().await;
        let repo = SqliteWordRepository::new(db.connection());
        repo.count()
    }

    /// Remove every word (full-refresh repopulation path).
    pub async fn clear_words(&self) -> Result<()> {
        let db = self.db.lock().await;
        let repo = SqliteWordRepository::new(db.connection());
        repo.clear()
    }

    /// Word ids matching an id prefix, newest-first.
    pub async fn word_ids_by_prefix(&self, prefix: &str, limit: usize) -> Result<Vec<String>> {
        let db = self.db.lock().await;
        let repo = SqliteWordRepository::new(db.connection());
        repo.ids_by_prefix(prefix, limit)
    }

    /// Fetch the review schedule for a word.
    pub async fn get_review(&self, word_id: &WordId) -> Result<Option<ReviewData>> {
        let db = self.db.lock().await;
        let repo = SqliteReviewRepository::new(db.connection());
        repo.get(word_id)
    }

    /// Insert or replace a review schedule.
    pub async fn upsert_review(&self, review: &ReviewData) -> Result<()> {
        let db = self.db.lock().await;
        let repo = SqliteReviewRepository::new(db.connection());
        repo.upsert(review)
    }

    /// Remove the review schedule for a word.
    pub async fn delete_review(&self, word_id: &WordId) -> Result<()> {
        let db = self.db.lock().await;
        let repo = SqliteReviewRepository::new(db.connection());
        repo.delete(word_id)
    }

    /// Load user settings.
    pub async fn load_settings(&self) -> Result<UserSettings> {
        let db = self.db.lock().await;
        let repo = SqliteSettingsRepository::new(db.connection());
        repo.load()
    }

    /// Save user settings.
    pub async fn save_settings(&self, settings: &UserSettings) -> Result<()> {
        let db = self.db.lock().await;
        let repo = SqliteSettingsRepository::new(db.connection());
        repo.save(settings)
    }

    /// Read the persisted sync cursor.
    pub async fn last_synced_at(&self) -> Result<Option<DateTime<Utc>>> {
        let db = self.db.lock().await;
        let repo = SqliteSettingsRepository::new(db.connection());
        repo.last_synced_at()
    }

    /// Persist the sync cursor.
    pub async fn set_last_synced_at(&self, at: DateTime<Utc>) -> Result<()> {
        let db = self.db.lock().await;
        let repo = SqliteSettingsRepository::new(db.connection());
        repo.set_last_synced_at(at)
    }
}
