use std::env;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;
use wort_core::api::WordApiClient;
use wort_core::auth::StaticIdentity;
use wort_core::models::{normalize_string_list, Example, TranslationLanguage, Word};
use wort_core::services::DatabaseService;
use wort_core::sync::{SyncEngine, SyncOptions};
use wort_core::util::{format_timestamp, normalize_text_option};
use wort_core::WordId;

use crate::auth::load_stored_principal;
use crate::cli::WordFieldArgs;
use crate::config_profiles::CliProfilesConfig;
use crate::error::CliError;

/// Engine wired the way the CLI runs it: real API client, stored principal.
pub type CliSyncEngine = SyncEngine<WordApiClient, StaticIdentity>;

#[derive(Debug, Serialize)]
pub struct WordListItem {
    pub id: String,
    pub german: String,
    pub translation: Option<String>,
    pub word_type: String,
    pub gender: Option<String>,
    pub level: Option<String>,
    pub relative_time: String,
    pub updated_at: String,
}

pub fn resolve_db_path(cli_db_path: Option<PathBuf>) -> PathBuf {
    cli_db_path
        .or_else(|| env::var_os("WORT_DB_PATH").map(PathBuf::from))
        .unwrap_or_else(default_db_path)
}

pub fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| panic!("Failed to resolve CLI data directory"))
        .join("wort")
        .join("wort.db")
}

pub fn open_database(path: &Path) -> Result<DatabaseService, CliError> {
    Ok(DatabaseService::open_path(path)?)
}

/// Build the sync engine for the active profile, or `None` when the profile
/// carries no API endpoint (local-only mode).
pub fn build_engine(
    db: &DatabaseService,
    profile_override: Option<&str>,
) -> Result<Option<CliSyncEngine>, CliError> {
    let config = CliProfilesConfig::load().map_err(CliError::Config)?;
    let profile_name = config.resolve_profile_name(profile_override);
    let Some(profile) = config.profile(&profile_name) else {
        return Ok(None);
    };
    let Some(api_base_url) = profile.api_base_url() else {
        return Ok(None);
    };

    let principal =
        load_stored_principal(&profile_name).map_err(|error| CliError::Auth(error.to_string()))?;
    let client = WordApiClient::new(api_base_url)
        .and_then(|client| client.with_principal(principal.clone()))
        .map_err(|error| CliError::Api(error.to_string()))?;
    let identity = StaticIdentity::new(principal);

    Ok(Some(SyncEngine::new(
        db.clone(),
        client,
        identity,
        SyncOptions::default(),
    )))
}

/// Best-effort push after a local CRUD change; failures are deferred to the
/// next explicit sync rather than surfaced.
pub async fn push_word_change(engine: Option<&CliSyncEngine>, id: &WordId) {
    let Some(engine) = engine else {
        return;
    };
    if !engine.sync_word(id).await {
        let reason = engine
            .status()
            .sync_error
            .unwrap_or_else(|| "sync attempt was rejected".to_string());
        tracing::warn!("Deferred sync for {id}: {reason}");
    }
}

pub async fn resolve_word(word_query: &str, db: &DatabaseService) -> Result<Word, CliError> {
    if let Ok(word_id) = word_query.parse::<WordId>() {
        if let Some(word) = db.get_word(&word_id).await? {
            return Ok(word);
        }
    }

    let matching_ids = db.word_ids_by_prefix(word_query, 3).await?;

    match matching_ids.len() {
        0 => Err(CliError::WordNotFound(word_query.to_string())),
        1 => {
            let resolved_id = matching_ids[0]
                .parse::<WordId>()
                .map_err(|_| CliError::WordNotFound(word_query.to_string()))?;
            db.get_word(&resolved_id)
                .await?
                .ok_or_else(|| CliError::WordNotFound(word_query.to_string()))
        }
        _ => {
            let options = matching_ids
                .iter()
                .take(3)
                .map(|id| id.chars().take(13).collect::<String>())
                .collect::<Vec<_>>()
                .join(", ");

            Err(CliError::AmbiguousWordId(format!(
                "ID prefix '{word_query}' is ambiguous; matches: {options}"
            )))
        }
    }
}

/// Apply CLI field flags onto a word; only provided flags change anything.
pub fn apply_word_fields(word: &mut Word, fields: &WordFieldArgs) {
    if let Some(text) = &fields.english {
        word.set_translation(TranslationLanguage::English, Some(text.clone()));
    }
    if let Some(text) = &fields.russian {
        word.set_translation(TranslationLanguage::Russian, Some(text.clone()));
    }
    if let Some(text) = &fields.ukrainian {
        word.set_translation(TranslationLanguage::Ukrainian, Some(text.clone()));
    }
    if let Some(word_type) = fields.word_type {
        word.word_type = word_type;
    }
    if let Some(gender) = fields.gender {
        word.gender = Some(gender);
    }
    if let Some(level) = fields.level {
        word.frequency_level = Some(level);
    }
    if !fields.examples.is_empty() {
        let examples: Vec<Example> = fields
            .examples
            .iter()
            .filter_map(|raw| parse_example_arg(raw))
            .collect();
        word.examples = if examples.is_empty() {
            None
        } else {
            Some(examples)
        };
    }
    if !fields.synonyms.is_empty() {
        word.synonyms = normalize_string_list(fields.synonyms.clone());
    }
    if !fields.antonyms.is_empty() {
        word.antonyms = normalize_string_list(fields.antonyms.clone());
    }
    if !fields.collocations.is_empty() {
        word.collocations = normalize_string_list(fields.collocations.clone());
    }
    if let Some(notes) = &fields.notes {
        word.notes = normalize_text_option(Some(notes.clone()));
    }
    if let Some(url) = &fields.image_url {
        word.image_url = normalize_text_option(Some(url.clone()));
    }
    if let Some(url) = &fields.audio_url {
        word.audio_url = normalize_text_option(Some(url.clone()));
    }

    // Gender is only meaningful for nouns
    if !word.is_noun() {
        word.gender = None;
    }
}

/// Parse an `--example` argument: `"Satz"` or `"Satz=translation"`.
pub fn parse_example_arg(raw: &str) -> Option<Example> {
    let (german, translation) = match raw.split_once('=') {
        Some((german, translation)) => (german, Some(translation.to_string())),
        None => (raw, None),
    };
    let german = german.trim();
    if german.is_empty() {
        return None;
    }
    Some(Example {
        german: german.to_string(),
        translation: normalize_text_option(translation),
        source: None,
    })
}

/// Headword with its article, e.g. `das Haus`.
pub fn display_headword(word: &Word) -> String {
    word.gender.map_or_else(
        || word.german.clone(),
        |gender| format!("{} {}", gender.as_str(), word.german),
    )
}

pub fn format_word_lines(words: &[Word], language: TranslationLanguage) -> Vec<String> {
    let now_ms = Utc::now().timestamp_millis();
    words
        .iter()
        .map(|word| {
            let id = word.id.to_string();
            let short_id = id.chars().take(13).collect::<String>();
            let headword = display_headword(word);
            let translation = word.translation_for(language).unwrap_or("-");
            let relative_time = format_relative_time(word.updated_at.timestamp_millis(), now_ms);

            format!(
                "{short_id:<13}  {headword:<24}  {translation:<28}  {:<11}  {relative_time}",
                word.word_type.as_str()
            )
        })
        .collect()
}

pub fn word_to_list_item(word: &Word, language: TranslationLanguage) -> WordListItem {
    let now_ms = Utc::now().timestamp_millis();

    WordListItem {
        id: word.id.to_string(),
        german: word.german.clone(),
        translation: word
            .translation_for(language)
            .map(ToString::to_string),
        word_type: word.word_type.as_str().to_string(),
        gender: word.gender.map(|gender| gender.as_str().to_string()),
        level: word.frequency_level.map(|level| level.as_str().to_string()),
        relative_time: format_relative_time(word.updated_at.timestamp_millis(), now_ms),
        updated_at: format_timestamp(word.updated_at),
    }
}

/// Full multi-line rendering for `wort show`.
pub fn render_word_details(word: &Word) -> Vec<String> {
    let mut lines = vec![
        format!("Id:       {}", word.id),
        format!("German:   {}", display_headword(word)),
        format!("Type:     {}", word.word_type.as_str()),
    ];
    if let Some(level) = word.frequency_level {
        lines.push(format!("Level:    {}", level.as_str()));
    }
    for language in TranslationLanguage::ALL {
        if let Some(text) = word.translation_for(language) {
            lines.push(format!("{language:<9} {text}"));
        }
    }
    if let Some(examples) = &word.examples {
        lines.push("Examples:".to_string());
        for example in examples {
            match &example.translation {
                Some(translation) => {
                    lines.push(format!("  {} — {}", example.german, translation));
                }
                None => lines.push(format!("  {}", example.german)),
            }
        }
    }
    if let Some(synonyms) = &word.synonyms {
        lines.push(format!("Synonyms: {}", synonyms.join(", ")));
    }
    if let Some(antonyms) = &word.antonyms {
        lines.push(format!("Antonyms: {}", antonyms.join(", ")));
    }
    if let Some(collocations) = &word.collocations {
        lines.push(format!("Usage:    {}", collocations.join(", ")));
    }
    if let Some(notes) = &word.notes {
        lines.push(format!("Notes:    {notes}"));
    }
    lines.push(format!("Created:  {}", format_timestamp(word.created_at)));
    lines.push(format!("Updated:  {}", format_timestamp(word.updated_at)));
    lines
}

pub fn normalize_word_identifier(id: &str) -> Result<String, CliError> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        Err(CliError::EmptyWordId)
    } else {
        Ok(trimmed.to_string())
    }
}

pub fn normalize_search_query(query: &str) -> Result<String, CliError> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        Err(CliError::EmptySearchQuery)
    } else {
        Ok(trimmed.to_string())
    }
}

pub fn format_relative_time(timestamp_ms: i64, now_ms: i64) -> String {
    let diff = now_ms.saturating_sub(timestamp_ms);
    let minute = 60_000;
    let hour = 60 * minute;
    let day = 24 * hour;
    let week = 7 * day;
    let month = 30 * day;
    let year = 365 * day;

    if diff < minute {
        "just now".to_string()
    } else if diff < hour {
        format!("{}m ago", diff / minute)
    } else if diff < day {
        format!("{}h ago", diff / hour)
    } else if diff < week {
        format!("{}d ago", diff / day)
    } else if diff < month {
        format!("{}w ago", diff / week)
    } else if diff < year {
        format!("{}mo ago", diff / month)
    } else {
        format!("{}y ago", diff / year)
    }
}
