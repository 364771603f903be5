//! Spaced-repetition review schedule model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{TranslationLanguage, WordId};
use crate::util::now_millis;

/// Review schedule row dependent on a word.
///
/// Removed together with its word; the scheduling algorithm itself lives with
/// the review flow, this is just the persisted state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewData {
    pub word_id: WordId,
    /// SM-2 ease factor, starts at 2.5
    pub ease_factor: f64,
    /// Days until the next review
    pub interval_days: i64,
    pub repetitions: i64,
    pub next_review_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_review_date: Option<DateTime<Utc>>,
    pub review_language: TranslationLanguage,
}

impl ReviewData {
    /// Fresh schedule for a word: due immediately, default ease
    #[must_use]
    pub fn new(word_id: WordId, review_language: TranslationLanguage) -> Self {
        Self {
            word_id,
            ease_factor: 2.5,
            interval_days: 0,
            repetitions: 0,
            next_review_date: now_millis(),
            last_review_date: None,
            review_language,
        }
    }
}
