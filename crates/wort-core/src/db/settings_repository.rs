//! Settings repository implementation

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use crate::error::Result;
use crate::models::UserSettings;
use crate::util::{format_timestamp, parse_timestamp};

/// Fixed key holding the sync cursor; survives process restarts
const LAST_SYNCED_AT_KEY: &str = "last_synced_at";

/// Trait for settings storage operations
pub trait SettingsRepository {
    /// Load user settings from the database
    fn load(&self) -> Result<UserSettings>;

    /// Save user settings to the database
    fn save(&self, settings: &UserSettings) -> Result<()>;

    /// Read the persisted sync cursor
    fn last_synced_at(&self) -> Result<Option<DateTime<Utc>>>;

    /// Persist the sync cursor
    fn set_last_synced_at(&self, at: DateTime<Utc>) -> Result<()>;
}

/// `SQLite` implementation of `SettingsRepository`
pub struct SqliteSettingsRepository<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteSettingsRepository<'a> {
    /// Create a new repository with the given connection
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn get_setting(&self, key: &str) -> Result<Option<String>> {
        let result = self.conn.query_row(
            "SELECT value FROM settings WHERE key = ?",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO settings (key, value) VALUES (?, ?)",
            params![key, value],
        )?;
        Ok(())
    }
}

impl SettingsRepository for SqliteSettingsRepository<'_> {
    fn load(&self) -> Result<UserSettings> {
        let mut settings = UserSettings::default();

        if let Some(value) = self.get_setting("preferred_languages")? {
            if let Ok(languages) = serde_json::from_str(&value) {
                settings.preferred_languages = languages;
            }
        }

        if let Some(value) = self.get_setting("review_direction")? {
            settings.review_direction =
                serde_json::from_str(&format!("\"{value}\"")).unwrap_or_default();
        }

        if let Some(value) = self.get_setting("daily_review_goal")? {
            if let Ok(goal) = value.parse() {
                settings.daily_review_goal = goal;
            }
        }

        if let Some(value) = self.get_setting("theme")? {
            settings.theme = serde_json::from_str(&format!("\"{value}\"")).unwrap_or_default();
        }

        Ok(settings)
    }

    fn save(&self, settings: &UserSettings) -> Result<()> {
        self.set_setting(
            "preferred_languages",
            &serde_json::to_string(&settings.preferred_languages)?,
        )?;
        let direction = serde_json::to_string(&settings.review_direction)?
            .trim_matches('"')
            .to_string();
        self.set_setting("review_direction", &direction)?;
        self.set_setting(
            "daily_review_goal",
            &settings.daily_review_goal.to_string(),
        )?;
        let theme = serde_json::to_string(&settings.theme)?
            .trim_matches('"')
            .to_string();
        self.set_setting("theme", &theme)?;
        Ok(())
    }

    fn last_synced_at(&self) -> Result<Option<DateTime<Utc>>> {
        Ok(self
            .get_setting(LAST_SYNCED_AT_KEY)?
            .as_deref()
            .and_then(parse_timestamp))
    }

    fn set_last_synced_at(&self, at: DateTime<Utc>) -> Result<()> {
        self.set_setting(LAST_SYNCED_AT_KEY, &format_timestamp(at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::models::{ReviewDirection, ThemeMode, TranslationLanguage};
    use crate::util::now_millis;
    use pretty_assertions::assert_eq;

    fn setup() -> Database {
        Database::open_in_memory().unwrap()
    }

    #[test]
    fn test_load_default_settings() {
        let db = setup();
        let repo = SqliteSettingsRepository::new(db.connection());

        let settings = repo.load().unwrap();
        assert_eq!(settings, UserSettings::default());
    }

    #[test]
    fn test_save_and_load_settings() {
        let db = setup();
        let repo = SqliteSettingsRepository::new(db.connection());

        let settings = UserSettings {
            preferred_languages: vec![TranslationLanguage::Russian, TranslationLanguage::English],
            review_direction: ReviewDirection::Both,
            daily_review_goal: 35,
            theme: ThemeMode::Dark,
        };

        repo.save(&settings).unwrap();

        let loaded = repo.load().unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_last_synced_at_round_trip() {
        let db = setup();
        let repo = SqliteSettingsRepository::new(db.connection());

        assert_eq!(repo.last_synced_at().unwrap(), None);

        let now = now_millis();
        repo.set_last_synced_at(now).unwrap();
        assert_eq!(repo.last_synced_at().unwrap(), Some(now));
    }
}
