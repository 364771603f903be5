//! Word model

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::util::now_millis;

/// A unique identifier for a word, using UUID v7 (time-sortable)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WordId(Uuid);

impl WordId {
    /// Create a new unique word ID using UUID v7
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Get the string representation of this ID
    #[must_use]
    pub fn as_str(&self) -> String {
        self.0.to_string()
    }
}

impl Default for WordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for WordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for WordId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Grammatical category of a word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WordType {
    Noun,
    Verb,
    Adjective,
    Adverb,
    Phrase,
    Preposition,
    Conjunction,
    Pronoun,
    Article,
    #[default]
    Other,
}

impl WordType {
    /// Wire/storage representation of this word type
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Noun => "noun",
            Self::Verb => "verb",
            Self::Adjective => "adjective",
            Self::Adverb => "adverb",
            Self::Phrase => "phrase",
            Self::Preposition => "preposition",
            Self::Conjunction => "conjunction",
            Self::Pronoun => "pronoun",
            Self::Article => "article",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for WordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WordType {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "noun" => Ok(Self::Noun),
            "verb" => Ok(Self::Verb),
            "adjective" => Ok(Self::Adjective),
            "adverb" => Ok(Self::Adverb),
            "phrase" => Ok(Self::Phrase),
            "preposition" => Ok(Self::Preposition),
            "conjunction" => Ok(Self::Conjunction),
            "pronoun" => Ok(Self::Pronoun),
            "article" => Ok(Self::Article),
            "other" => Ok(Self::Other),
            other => Err(crate::Error::InvalidInput(format!(
                "Unknown word type: {other}"
            ))),
        }
    }
}

/// Grammatical gender (the definite article) for nouns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Der,
    Die,
    Das,
}

impl Gender {
    /// Wire/storage representation of this gender
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Der => "der",
            Self::Die => "die",
            Self::Das => "das",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "der" => Ok(Self::Der),
            "die" => Ok(Self::Die),
            "das" => Ok(Self::Das),
            other => Err(crate::Error::InvalidInput(format!(
                "Unknown gender: {other} (expected der/die/das)"
            ))),
        }
    }
}

/// CEFR frequency/difficulty level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FrequencyLevel {
    A1,
    A2,
    B1,
    B2,
    C1,
    C2,
}

impl FrequencyLevel {
    /// Wire/storage representation of this level
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A1 => "A1",
            Self::A2 => "A2",
            Self::B1 => "B1",
            Self::B2 => "B2",
            Self::C1 => "C1",
            Self::C2 => "C2",
        }
    }
}

impl fmt::Display for FrequencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FrequencyLevel {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A1" => Ok(Self::A1),
            "A2" => Ok(Self::A2),
            "B1" => Ok(Self::B1),
            "B2" => Ok(Self::B2),
            "C1" => Ok(Self::C1),
            "C2" => Ok(Self::C2),
            other => Err(crate::Error::InvalidInput(format!(
                "Unknown frequency level: {other} (expected A1..C2)"
            ))),
        }
    }
}

/// Translation target language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranslationLanguage {
    English,
    Russian,
    Ukrainian,
}

impl TranslationLanguage {
    /// All supported languages in display order
    pub const ALL: [Self; 3] = [Self::English, Self::Russian, Self::Ukrainian];

    /// Two-letter wire code for this language
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Russian => "ru",
            Self::Ukrainian => "uk",
        }
    }

    /// Resolve a two-letter wire code back into a language
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "en" => Some(Self::English),
            "ru" => Some(Self::Russian),
            "uk" => Some(Self::Ukrainian),
            _ => None,
        }
    }
}

impl fmt::Display for TranslationLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::English => "english",
            Self::Russian => "russian",
            Self::Ukrainian => "ukrainian",
        };
        f.write_str(name)
    }
}

impl FromStr for TranslationLanguage {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "english" | "en" => Ok(Self::English),
            "russian" | "ru" => Ok(Self::Russian),
            "ukrainian" | "uk" => Ok(Self::Ukrainian),
            other => Err(crate::Error::InvalidInput(format!(
                "Unknown language: {other}"
            ))),
        }
    }
}

/// A translation of the German headword into one target language.
///
/// At most one entry per language is meaningful; comma-separated alternatives
/// live inside `text`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translation {
    pub language: TranslationLanguage,
    pub text: String,
}

/// A usage example sentence with optional translation and source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Example {
    pub german: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// A vocabulary entry in the local store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    /// Unique identifier, shared with the remote counterpart once synced
    pub id: WordId,
    /// German headword
    pub german: String,
    /// Translations, at most one meaningful entry per language
    #[serde(default)]
    pub translations: Vec<Translation>,
    pub word_type: WordType,
    /// Only meaningful for nouns
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency_level: Option<FrequencyLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub examples: Option<Vec<Example>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synonyms: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub antonyms: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collocations: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp; the conflict-resolution authority
    pub updated_at: DateTime<Utc>,
}

impl Word {
    /// Create a new word with the given headword and type
    #[must_use]
    pub fn new(german: impl Into<String>, word_type: WordType) -> Self {
        let now = now_millis();
        Self {
            id: WordId::new(),
            german: german.into(),
            translations: Vec::new(),
            word_type,
            gender: None,
            frequency_level: None,
            examples: None,
            synonyms: None,
            antonyms: None,
            collocations: None,
            notes: None,
            image_url: None,
            audio_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Bump `updated_at` for a local mutation.
    ///
    /// Guaranteed to strictly increase even when the clock has not advanced
    /// past the previous value (same-millisecond edits).
    pub fn touch(&mut self) {
        let now = now_millis();
        self.updated_at = if now > self.updated_at {
            now
        } else {
            self.updated_at + Duration::milliseconds(1)
        };
    }

    /// Get the translation text for a language, if present
    #[must_use]
    pub fn translation_for(&self, language: TranslationLanguage) -> Option<&str> {
        // Last write wins when a language is duplicated
        self.translations
            .iter()
            .rev()
            .find(|translation| translation.language == language)
            .map(|translation| translation.text.as_str())
    }

    /// Set or clear the translation for a language.
    ///
    /// Replaces any existing entry for the language; empty text clears it.
    pub fn set_translation(&mut self, language: TranslationLanguage, text: Option<String>) {
        self.translations
            .retain(|translation| translation.language != language);
        if let Some(text) = crate::util::normalize_text_option(text) {
            self.translations.push(Translation { language, text });
        }
    }

    /// Whether this word is a noun (gender is only meaningful for nouns)
    #[must_use]
    pub fn is_noun(&self) -> bool {
        self.word_type == WordType::Noun
    }
}

/// Trim entries and drop empties; an empty result normalizes to `None`.
#[must_use]
pub fn normalize_string_list(values: Vec<String>) -> Option<Vec<String>> {
    let cleaned: Vec<String> = values
        .into_iter()
        .filter_map(|value| crate::util::normalize_text_option(Some(value)))
        .collect();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_id_unique() {
        let id1 = WordId::new();
        let id2 = WordId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_word_id_parse() {
        let id = WordId::new();
        let parsed: WordId = id.as_str().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_word_new() {
        let word = Word::new("Haus", WordType::Noun);
        assert_eq!(word.german, "Haus");
        assert!(word.is_noun());
        assert_eq!(word.created_at, word.updated_at);
    }

    #[test]
    fn test_touch_strictly_increases() {
        let mut word = Word::new("gehen", WordType::Verb);
        let before = word.updated_at;
        word.touch();
        assert!(word.updated_at > before);
        let again = word.updated_at;
        word.touch();
        assert!(word.updated_at > again);
        assert!(word.updated_at >= word.created_at);
    }

    #[test]
    fn test_set_translation_replaces_per_language() {
        let mut word = Word::new("Haus", WordType::Noun);
        word.set_translation(TranslationLanguage::English, Some("house".to_string()));
        word.set_translation(TranslationLanguage::Russian, Some("дом".to_string()));
        word.set_translation(TranslationLanguage::English, Some("home, house".to_string()));

        assert_eq!(word.translations.len(), 2);
        assert_eq!(
            word.translation_for(TranslationLanguage::English),
            Some("home, house")
        );
        assert_eq!(word.translation_for(TranslationLanguage::Russian), Some("дом"));
    }

    #[test]
    fn test_set_translation_clears_on_empty() {
        let mut word = Word::new("Haus", WordType::Noun);
        word.set_translation(TranslationLanguage::English, Some("house".to_string()));
        word.set_translation(TranslationLanguage::English, Some("  ".to_string()));
        assert_eq!(word.translation_for(TranslationLanguage::English), None);
    }

    #[test]
    fn test_word_type_round_trip() {
        for word_type in [
            WordType::Noun,
            WordType::Verb,
            WordType::Adjective,
            WordType::Phrase,
            WordType::Other,
        ] {
            assert_eq!(word_type.as_str().parse::<WordType>().unwrap(), word_type);
        }
    }

    #[test]
    fn test_language_codes_round_trip() {
        for language in TranslationLanguage::ALL {
            assert_eq!(
                TranslationLanguage::from_code(language.code()),
                Some(language)
            );
        }
        assert_eq!(TranslationLanguage::from_code("de"), None);
    }

    #[test]
    fn test_normalize_string_list() {
        assert_eq!(normalize_string_list(vec![]), None);
        assert_eq!(
            normalize_string_list(vec!["  ".to_string(), String::new()]),
            None
        );
        assert_eq!(
            normalize_string_list(vec![" Gebäude ".to_string(), String::new()]),
            Some(vec!["Gebäude".to_string()])
        );
    }
}
