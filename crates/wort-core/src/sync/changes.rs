//! Pure converters between the local word shape and the wire change shape.
//!
//! Translations are a single display string locally and a set of alternatives
//! on the wire; the ", " join convention is lossy for texts with embedded
//! commas but deterministic in both directions.

use chrono::{DateTime, Utc};

use crate::api::{ApiExample, ApiWord, SyncChange, TranslationMap};
use crate::error::{Error, Result};
use crate::models::{Example, Translation, TranslationLanguage, Word, WordId};
use crate::util::normalize_text_option;

/// Split a display string into trimmed, non-empty alternatives.
#[must_use]
pub fn split_alternatives(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Rejoin wire alternatives into the local display string.
#[must_use]
pub fn join_alternatives(parts: &[String]) -> String {
    parts.join(", ")
}

/// Build the wire change for the full current state of a word.
#[must_use]
pub fn word_to_sync_change(word: &Word) -> SyncChange {
    let mut translations = TranslationMap::default();
    for language in TranslationLanguage::ALL {
        if let Some(text) = word.translation_for(language) {
            translations.set(language.code(), split_alternatives(text));
        }
    }

    let examples = word.examples.as_ref().and_then(|examples| {
        let mapped: Vec<ApiExample> = examples
            .iter()
            .filter(|example| !example.german.trim().is_empty())
            .map(|example| ApiExample {
                german: example.german.trim().to_string(),
                translation: example.translation.clone().unwrap_or_default(),
            })
            .collect();
        if mapped.is_empty() {
            None
        } else {
            Some(mapped)
        }
    });

    SyncChange {
        id: word.id.as_str(),
        german: word.german.clone(),
        article: word.gender.map(|gender| gender.as_str().to_string()),
        word_type: word.word_type.as_str().to_string(),
        translations,
        level: word.frequency_level.map(|level| level.as_str().to_string()),
        examples,
        synonyms: nonempty(word.synonyms.as_ref()),
        antonyms: nonempty(word.antonyms.as_ref()),
        collocations: nonempty(word.collocations.as_ref()),
        notes: word.notes.clone(),
        image_url: word.image_url.clone(),
        audio_url: word.audio_url.clone(),
        client_updated_at: word.updated_at,
        is_deleted: false,
    }
}

/// Tombstone change: just the id, a fresh timestamp, and the deletion flag.
#[must_use]
pub fn deletion_change(id: WordId, at: DateTime<Utc>) -> SyncChange {
    SyncChange {
        id: id.as_str(),
        german: String::new(),
        article: None,
        word_type: String::new(),
        translations: TranslationMap::default(),
        level: None,
        examples: None,
        synonyms: None,
        antonyms: None,
        collocations: None,
        notes: None,
        image_url: None,
        audio_url: None,
        client_updated_at: at,
        is_deleted: true,
    }
}

/// Map a server word payload back into the local store shape.
pub fn api_word_to_local(api_word: &ApiWord) -> Result<Word> {
    let id: WordId = api_word
        .id
        .parse()
        .map_err(|_| Error::InvalidInput(format!("invalid word id from server: {}", api_word.id)))?;

    let mut translations = Vec::new();
    for language in TranslationLanguage::ALL {
        if let Some(alternatives) = api_word.translations.get(language.code()) {
            if !alternatives.is_empty() {
                translations.push(Translation {
                    language,
                    text: join_alternatives(alternatives),
                });
            }
        }
    }

    let examples: Vec<Example> = api_word
        .examples
        .iter()
        .map(|example| Example {
            german: example.german.clone(),
            translation: normalize_text_option(Some(example.translation.clone())),
            source: None,
        })
        .collect();

    Ok(Word {
        id,
        german: api_word.german.clone(),
        translations,
        word_type: api_word.word_type.parse().unwrap_or_default(),
        gender: api_word.article.as_deref().and_then(|raw| raw.parse().ok()),
        frequency_level: api_word.level.as_deref().and_then(|raw| raw.parse().ok()),
        examples: if examples.is_empty() {
            None
        } else {
            Some(examples)
        },
        synonyms: nonempty(Some(&api_word.synonyms)),
        antonyms: nonempty(Some(&api_word.antonyms)),
        collocations: nonempty(Some(&api_word.collocations)),
        notes: normalize_text_option(api_word.notes.clone()),
        image_url: normalize_text_option(api_word.image_url.clone()),
        audio_url: normalize_text_option(api_word.audio_url.clone()),
        created_at: api_word.created_at,
        updated_at: api_word.updated_at,
    })
}

fn nonempty(list: Option<&Vec<String>>) -> Option<Vec<String>> {
    list.filter(|list| !list.is_empty()).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Gender, WordType};
    use pretty_assertions::assert_eq;

    fn sample_word() -> Word {
        let mut word = Word::new("Haus", WordType::Noun);
        word.gender = Some(Gender::Das);
        word.frequency_level = Some(crate::models::FrequencyLevel::A1);
        word.set_translation(TranslationLanguage::English, Some("house".to_string()));
        word.set_translation(TranslationLanguage::Russian, Some("дом".to_string()));
        word.synonyms = Some(vec!["Gebäude".to_string()]);
        word.examples = Some(vec![Example {
            german: "Das Haus ist groß.".to_string(),
            translation: Some("The house is big.".to_string()),
            source: Some("Duden".to_string()),
        }]);
        word
    }

    fn echo_as_api_word(word: &Word) -> ApiWord {
        let change = word_to_sync_change(word);
        ApiWord {
            id: change.id,
            user_id: None,
            german: change.german,
            article: change.article,
            word_type: change.word_type,
            translations: change.translations,
            level: change.level,
            examples: change.examples.unwrap_or_default(),
            synonyms: change.synonyms.unwrap_or_default(),
            antonyms: change.antonyms.unwrap_or_default(),
            collocations: change.collocations.unwrap_or_default(),
            notes: change.notes,
            image_url: change.image_url,
            audio_url: change.audio_url,
            created_at: word.created_at,
            updated_at: change.client_updated_at,
        }
    }

    #[test]
    fn split_alternatives_trims_and_drops_empties() {
        assert_eq!(
            split_alternatives("house, home , ,building"),
            vec!["house", "home", "building"]
        );
        assert!(split_alternatives("  ").is_empty());
    }

    #[test]
    fn change_splits_translations_per_language_code() {
        let mut word = sample_word();
        word.set_translation(
            TranslationLanguage::English,
            Some("house, home".to_string()),
        );

        let change = word_to_sync_change(&word);
        assert_eq!(
            change.translations.get("en"),
            Some(&vec!["house".to_string(), "home".to_string()])
        );
        assert_eq!(change.translations.get("ru"), Some(&vec!["дом".to_string()]));
        // No Ukrainian translation: the key is omitted, not sent empty
        assert_eq!(change.translations.get("uk"), None);
        assert_eq!(change.article.as_deref(), Some("das"));
        assert_eq!(change.word_type, "noun");
        assert_eq!(change.level.as_deref(), Some("A1"));
        assert_eq!(change.client_updated_at, word.updated_at);
        assert!(!change.is_deleted);
    }

    #[test]
    fn change_normalizes_empty_lists_to_absent() {
        let mut word = Word::new("laufen", WordType::Verb);
        word.synonyms = Some(Vec::new());
        word.examples = Some(vec![Example {
            german: "   ".to_string(),
            translation: None,
            source: None,
        }]);

        let change = word_to_sync_change(&word);
        assert_eq!(change.synonyms, None);
        assert_eq!(change.examples, None);
        assert_eq!(change.article, None);
    }

    #[test]
    fn deletion_change_is_a_bare_tombstone() {
        let id = WordId::new();
        let at = crate::util::now_millis();
        let change = deletion_change(id, at);

        assert!(change.is_deleted);
        assert_eq!(change.id, id.as_str());
        assert_eq!(change.german, "");
        assert!(change.translations.is_empty());
        assert_eq!(change.client_updated_at, at);
    }

    #[test]
    fn round_trips_words_without_embedded_commas() {
        let word = sample_word();
        let round_tripped = api_word_to_local(&echo_as_api_word(&word)).unwrap();

        assert_eq!(round_tripped.id, word.id);
        assert_eq!(round_tripped.german, word.german);
        assert_eq!(round_tripped.translations, word.translations);
        assert_eq!(round_tripped.word_type, word.word_type);
        assert_eq!(round_tripped.gender, word.gender);
        assert_eq!(round_tripped.frequency_level, word.frequency_level);
        assert_eq!(round_tripped.synonyms, word.synonyms);
        assert_eq!(round_tripped.created_at, word.created_at);
        assert_eq!(round_tripped.updated_at, word.updated_at);
        // The example source never crosses the wire
        assert_eq!(
            round_tripped.examples.as_ref().unwrap()[0].german,
            word.examples.as_ref().unwrap()[0].german
        );
        assert_eq!(round_tripped.examples.as_ref().unwrap()[0].source, None);
    }

    #[test]
    fn comma_spacing_normalizes_on_round_trip() {
        // "a,b" comes back as "a, b": lossy for embedded commas, by convention
        let mut word = Word::new("Haus", WordType::Noun);
        word.set_translation(TranslationLanguage::English, Some("house,home".to_string()));

        let round_tripped = api_word_to_local(&echo_as_api_word(&word)).unwrap();
        assert_eq!(
            round_tripped.translation_for(TranslationLanguage::English),
            Some("house, home")
        );
    }

    #[test]
    fn api_word_with_unknown_metadata_degrades_gracefully() {
        let mut api_word = echo_as_api_word(&sample_word());
        api_word.word_type = "interjection".to_string();
        api_word.article = Some("los".to_string());
        api_word.level = Some("Z9".to_string());

        let word = api_word_to_local(&api_word).unwrap();
        assert_eq!(word.word_type, WordType::Other);
        assert_eq!(word.gender, None);
        assert_eq!(word.frequency_level, None);
    }

    #[test]
    fn api_word_with_invalid_id_is_rejected() {
        let mut api_word = echo_as_api_word(&sample_word());
        api_word.id = "not-a-uuid".to_string();
        assert!(api_word_to_local(&api_word).is_err());
    }
}
