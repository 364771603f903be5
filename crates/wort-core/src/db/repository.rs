//! Word and review repository implementations

#![allow(clippy::cast_possible_wrap)] // SQLite uses i64 for LIMIT/OFFSET

use rusqlite::{params, Connection, Row};

use crate::error::{Error, Result};
use crate::models::{ReviewData, Word, WordId};
use crate::util::{format_timestamp, parse_timestamp};

const WORD_COLUMNS: &str = "id, german, word_type, gender, frequency_level, translations, \
     examples, synonyms, antonyms, collocations, notes, image_url, audio_url, \
     created_at, updated_at";

/// Trait for word storage operations
pub trait WordRepository {
    /// Insert a new word
    fn create(&self, word: &Word) -> Result<()>;

    /// Get a word by ID
    fn get(&self, id: &WordId) -> Result<Option<Word>>;

    /// Insert or wholesale-replace a word (server-change application)
    fn upsert(&self, word: &Word) -> Result<()>;

    /// Update an existing word; errors when the word is missing
    fn update(&self, word: &Word) -> Result<()>;

    /// Hard-delete a word; review rows go with it. Returns whether a row existed.
    fn delete(&self, id: &WordId) -> Result<bool>;

    /// List words, most recently updated first
    fn list(&self, limit: usize, offset: usize) -> Result<Vec<Word>>;

    /// Every word in the store, most recently updated first
    fn all(&self) -> Result<Vec<Word>>;

    /// Case-insensitive substring search over headword, translations,
    /// examples, synonyms, and notes
    fn search(&self, query: &str, limit: usize) -> Result<Vec<Word>>;

    /// Number of words in the store
    fn count(&self) -> Result<usize>;

    /// Remove every word (full-refresh repopulation path)
    fn clear(&self) -> Result<()>;

    /// Ids starting with the given prefix, most recently updated first
    fn ids_by_prefix(&self, prefix: &str, limit: usize) -> Result<Vec<String>>;
}

/// Trait for review schedule storage operations
pub trait ReviewRepository {
    /// Get the review schedule for a word
    fn get(&self, word_id: &WordId) -> Result<Option<ReviewData>>;

    /// Insert or replace a review schedule
    fn upsert(&self, review: &ReviewData) -> Result<()>;

    /// Remove the review schedule for a word
    fn delete(&self, word_id: &WordId) -> Result<()>;
}

/// `SQLite` implementation of `WordRepository`
pub struct SqliteWordRepository<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteWordRepository<'a> {
    /// Create a new repository with the given connection
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Parse a word from a database row
    fn parse_word(row: &Row<'_>) -> rusqlite::Result<Word> {
        let id: String = row.get(0)?;
        let word_type: String = row.get(2)?;
        let gender: Option<String> = row.get(3)?;
        let frequency_level: Option<String> = row.get(4)?;
        let translations: String = row.get(5)?;

        Ok(Word {
            id: id.parse().unwrap_or_default(),
            german: row.get(1)?,
            word_type: word_type.parse().unwrap_or_default(),
            gender: gender.and_then(|raw| raw.parse().ok()),
            frequency_level: frequency_level.and_then(|raw| raw.parse().ok()),
            translations: serde_json::from_str(&translations).unwrap_or_default(),
            examples: parse_json_list(row.get(6)?),
            synonyms: parse_json_list(row.get(7)?),
            antonyms: parse_json_list(row.get(8)?),
            collocations: parse_json_list(row.get(9)?),
            notes: row.get(10)?,
            image_url: row.get(11)?,
            audio_url: row.get(12)?,
            created_at: parse_timestamp_column(row, 13)?,
            updated_at: parse_timestamp_column(row, 14)?,
        })
    }
}

fn parse_json_list<T: serde::de::DeserializeOwned>(raw: Option<String>) -> Option<Vec<T>> {
    raw.and_then(|raw| serde_json::from_str(&raw).ok())
        .filter(|list: &Vec<T>| !list.is_empty())
}

fn parse_timestamp_column(row: &Row<'_>, index: usize) -> rusqlite::Result<chrono::DateTime<chrono::Utc>> {
    let raw: String = row.get(index)?;
    parse_timestamp(&raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            index,
            rusqlite::types::Type::Text,
            format!("invalid timestamp: {raw}").into(),
        )
    })
}

fn json_opt<T: serde::Serialize>(value: Option<&Vec<T>>) -> Result<Option<String>> {
    value
        .map(|list| serde_json::to_string(list))
        .transpose()
        .map_err(Into::into)
}

impl WordRepository for SqliteWordRepository<'_> {
    fn create(&self, word: &Word) -> Result<()> {
        self.conn.execute(
            &format!(
                "INSERT INTO words ({WORD_COLUMNS})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)"
            ),
            params![
                word.id.as_str(),
                word.german,
                word.word_type.as_str(),
                word.gender.map(crate::models::Gender::as_str),
                word.frequency_level.map(crate::models::FrequencyLevel::as_str),
                serde_json::to_string(&word.translations)?,
                json_opt(word.examples.as_ref())?,
                json_opt(word.synonyms.as_ref())?,
                json_opt(word.antonyms.as_ref())?,
                json_opt(word.collocations.as_ref())?,
                word.notes,
                word.image_url,
                word.audio_url,
                format_timestamp(word.created_at),
                format_timestamp(word.updated_at),
            ],
        )?;
        Ok(())
    }

    fn get(&self, id: &WordId) -> Result<Option<Word>> {
        let result = self.conn.query_row(
            &format!("SELECT {WORD_COLUMNS} FROM words WHERE id = ?"),
            params![id.as_str()],
            Self::parse_word,
        );

        match result {
            Ok(word) => Ok(Some(word)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn upsert(&self, word: &Word) -> Result<()> {
        // ON CONFLICT rather than INSERT OR REPLACE: REPLACE deletes the old
        // row first, which would cascade away the word's review schedule.
        self.conn.execute(
            &format!(
                "INSERT INTO words ({WORD_COLUMNS})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)
                 ON CONFLICT(id) DO UPDATE SET
                     german = excluded.german,
                     word_type = excluded.word_type,
                     gender = excluded.gender,
                     frequency_level = excluded.frequency_level,
                     translations = excluded.translations,
                     examples = excluded.examples,
                     synonyms = excluded.synonyms,
                     antonyms = excluded.antonyms,
                     collocations = excluded.collocations,
                     notes = excluded.notes,
                     image_url = excluded.image_url,
                     audio_url = excluded.audio_url,
                     created_at = excluded.created_at,
                     updated_at = excluded.updated_at"
            ),
            params![
                word.id.as_str(),
                word.german,
                word.word_type.as_str(),
                word.gender.map(crate::models::Gender::as_str),
                word.frequency_level.map(crate::models::FrequencyLevel::as_str),
                serde_json::to_string(&word.translations)?,
                json_opt(word.examples.as_ref())?,
                json_opt(word.synonyms.as_ref())?,
                json_opt(word.antonyms.as_ref())?,
                json_opt(word.collocations.as_ref())?,
                word.notes,
                word.image_url,
                word.audio_url,
                format_timestamp(word.created_at),
                format_timestamp(word.updated_at),
            ],
        )?;
        Ok(())
    }

    fn update(&self, word: &Word) -> Result<()> {
        let rows = self.conn.execute(
            "UPDATE words SET
                 german = ?1, word_type = ?2, gender = ?3, frequency_level = ?4,
                 translations = ?5, examples = ?6, synonyms = ?7, antonyms = ?8,
                 collocations = ?9, notes = ?10, image_url = ?11, audio_url = ?12,
                 updated_at = ?13
             WHERE id = ?14",
            params![
                word.german,
                word.word_type.as_str(),
                word.gender.map(crate::models::Gender::as_str),
                word.frequency_level.map(crate::models::FrequencyLevel::as_str),
                serde_json::to_string(&word.translations)?,
                json_opt(word.examples.as_ref())?,
                json_opt(word.synonyms.as_ref())?,
                json_opt(word.antonyms.as_ref())?,
                json_opt(word.collocations.as_ref())?,
                word.notes,
                word.image_url,
                word.audio_url,
                format_timestamp(word.updated_at),
                word.id.as_str(),
            ],
        )?;

        if rows == 0 {
            return Err(Error::NotFound(word.id.to_string()));
        }

        Ok(())
    }

    fn delete(&self, id: &WordId) -> Result<bool> {
        let rows = self
            .conn
            .execute("DELETE FROM words WHERE id = ?", params![id.as_str()])?;
        Ok(rows > 0)
    }

    fn list(&self, limit: usize, offset: usize) -> Result<Vec<Word>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {WORD_COLUMNS} FROM words
             ORDER BY updated_at DESC
             LIMIT ? OFFSET ?"
        ))?;

        let words = stmt
            .query_map(params![limit as i64, offset as i64], Self::parse_word)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(words)
    }

    fn all(&self) -> Result<Vec<Word>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {WORD_COLUMNS} FROM words ORDER BY updated_at DESC"
        ))?;

        let words = stmt
            .query_map([], Self::parse_word)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(words)
    }

    fn search(&self, query: &str, limit: usize) -> Result<Vec<Word>> {
        if query.trim().is_empty() {
            return self.list(limit, 0);
        }

        let pattern = format!("%{}%", query.trim());
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {WORD_COLUMNS} FROM words
             WHERE german LIKE ?1
                OR translations LIKE ?1
                OR examples LIKE ?1
                OR synonyms LIKE ?1
                OR notes LIKE ?1
             ORDER BY updated_at DESC
             LIMIT ?2"
        ))?;

        let words = stmt
            .query_map(params![pattern, limit as i64], Self::parse_word)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(words)
    }

    fn count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM words", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    fn clear(&self) -> Result<()> {
        self.conn.execute("DELETE FROM words", [])?;
        Ok(())
    }

    fn ids_by_prefix(&self, prefix: &str, limit: usize) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT id FROM words
             WHERE id LIKE ?
             ORDER BY updated_at DESC
             LIMIT ?",
        )?;

        let ids = stmt
            .query_map(params![format!("{prefix}%"), limit as i64], |row| {
                row.get::<_, String>(0)
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(ids)
    }
}

/// `SQLite` implementation of `ReviewRepository`
pub struct SqliteReviewRepository<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteReviewRepository<'a> {
    /// Create a new repository with the given connection
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn parse_review(row: &Row<'_>) -> rusqlite::Result<ReviewData> {
        let word_id: String = row.get(0)?;
        let language: String = row.get(6)?;
        let last_review: Option<String> = row.get(5)?;

        Ok(ReviewData {
            word_id: word_id.parse().unwrap_or_default(),
            ease_factor: row.get(1)?,
            interval_days: row.get(2)?,
            repetitions: row.get(3)?,
            next_review_date: parse_timestamp_column(row, 4)?,
            last_review_date: last_review.as_deref().and_then(parse_timestamp),
            review_language: language
                .parse()
                .unwrap_or(crate::models::TranslationLanguage::English),
        })
    }
}

impl ReviewRepository for SqliteReviewRepository<'_> {
    fn get(&self, word_id: &WordId) -> Result<Option<ReviewData>> {
        let result = self.conn.query_row(
            "SELECT word_id, ease_factor, interval_days, repetitions,
                    next_review_date, last_review_date, review_language
             FROM reviews WHERE word_id = ?",
            params![word_id.as_str()],
            Self::parse_review,
        );

        match result {
            Ok(review) => Ok(Some(review)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn upsert(&self, review: &ReviewData) -> Result<()> {
        self.conn.execute(
            "INSERT INTO reviews (word_id, ease_factor, interval_days, repetitions,
                                  next_review_date, last_review_date, review_language)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT(word_id) DO UPDATE SET
                 ease_factor = excluded.ease_factor,
                 interval_days = excluded.interval_days,
                 repetitions = excluded.repetitions,
                 next_review_date = excluded.next_review_date,
                 last_review_date = excluded.last_review_date,
                 review_language = excluded.review_language",
            params![
                review.word_id.as_str(),
                review.ease_factor,
                review.interval_days,
                review.repetitions,
                format_timestamp(review.next_review_date),
                review.last_review_date.map(format_timestamp),
                review.review_language.to_string(),
            ],
        )?;
        Ok(())
    }

    fn delete(&self, word_id: &WordId) -> Result<()> {
        self.conn.execute(
            "DELETE FROM reviews WHERE word_id = ?",
            params![word_id.as_str()],
        )?;
        Ok(())
    }
}
