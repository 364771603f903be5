//! Word export helpers shared by client surfaces.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::models::{TranslationLanguage, Word};
use crate::util::format_timestamp;

/// Export output format shared by all clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportFormat {
    Json,
    Markdown,
}

impl ExportFormat {
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Markdown => "md",
        }
    }
}

/// Serializable word representation used in JSON and Markdown exports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportWord {
    pub id: String,
    pub german: String,
    pub word_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    /// `language -> display text` pairs in the fixed language order
    pub translations: Vec<(String, String)>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Convert a word into an export record with stable language ordering.
#[must_use]
pub fn word_to_export_item(word: &Word) -> ExportWord {
    let translations = TranslationLanguage::ALL
        .iter()
        .filter_map(|language| {
            word.translation_for(*language)
                .map(|text| (language.to_string(), text.to_string()))
        })
        .collect();

    let examples = word
        .examples
        .iter()
        .flatten()
        .map(|example| match &example.translation {
            Some(translation) => format!("{} — {}", example.german, translation),
            None => example.german.clone(),
        })
        .collect();

    ExportWord {
        id: word.id.to_string(),
        german: word.german.clone(),
        word_type: word.word_type.as_str().to_string(),
        gender: word.gender.map(|gender| gender.as_str().to_string()),
        level: word.frequency_level.map(|level| level.as_str().to_string()),
        translations,
        examples,
        notes: word.notes.clone(),
        created_at: format_timestamp(word.created_at),
        updated_at: format_timestamp(word.updated_at),
    }
}

/// Render words as pretty-printed JSON.
pub fn render_json_export(words: &[Word]) -> serde_json::Result<String> {
    let items = words
        .iter()
        .map(word_to_export_item)
        .collect::<Vec<ExportWord>>();
    serde_json::to_string_pretty(&items)
}

/// Render words in Markdown with frontmatter blocks.
#[must_use]
pub fn render_markdown_export(words: &[Word]) -> String {
    let mut output = String::new();

    for (index, word) in words.iter().enumerate() {
        if index > 0 {
            output.push('\n');
        }

        let item = word_to_export_item(word);
        let _ = writeln!(output, "---");
        let _ = writeln!(output, "id: {}", item.id);
        let _ = writeln!(output, "word_type: {}", item.word_type);
        if let Some(gender) = &item.gender {
            let _ = writeln!(output, "gender: {gender}");
        }
        if let Some(level) = &item.level {
            let _ = writeln!(output, "level: {level}");
        }
        let _ = writeln!(output, "created_at: {}", item.created_at);
        let _ = writeln!(output, "updated_at: {}", item.updated_at);
        let _ = writeln!(output, "---");
        let _ = writeln!(output);
        let _ = writeln!(output, "# {}", item.german);
        for (language, text) in &item.translations {
            let _ = writeln!(output, "- {language}: {text}");
        }
        if !item.examples.is_empty() {
            let _ = writeln!(output);
            for example in &item.examples {
                let _ = writeln!(output, "> {example}");
            }
        }
        if let Some(notes) = &item.notes {
            let _ = writeln!(output);
            output.push_str(notes);
            output.push('\n');
        }
    }

    output
}

/// Render words based on selected export format.
pub fn render_words_export(words: &[Word], format: ExportFormat) -> serde_json::Result<String> {
    match format {
        ExportFormat::Json => render_json_export(words),
        ExportFormat::Markdown => Ok(render_markdown_export(words)),
    }
}

/// Build a deterministic default file name for export flows.
#[must_use]
pub fn suggested_export_file_name(format: ExportFormat, timestamp_ms: i64) -> String {
    format!("wort-export-{timestamp_ms}.{}", format.extension())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Example, Gender, WordType};

    fn sample_word() -> Word {
        let mut word = Word::new("Haus", WordType::Noun);
        word.gender = Some(Gender::Das);
        word.set_translation(TranslationLanguage::Ukrainian, Some("дім".to_string()));
        word.set_translation(TranslationLanguage::English, Some("house".to_string()));
        word.examples = Some(vec![Example {
            german: "Das Haus ist alt.".to_string(),
            translation: Some("The house is old.".to_string()),
            source: None,
        }]);
        word
    }

    #[test]
    fn word_to_export_item_orders_languages() {
        let item = word_to_export_item(&sample_word());
        assert_eq!(
            item.translations,
            vec![
                ("english".to_string(), "house".to_string()),
                ("ukrainian".to_string(), "дім".to_string()),
            ]
        );
    }

    #[test]
    fn render_markdown_export_includes_frontmatter_and_content() {
        let word = sample_word();
        let rendered = render_markdown_export(&[word.clone()]);

        assert!(rendered.contains(&format!("id: {}", word.id)));
        assert!(rendered.contains("word_type: noun"));
        assert!(rendered.contains("gender: das"));
        assert!(rendered.contains("# Haus"));
        assert!(rendered.contains("- english: house"));
        assert!(rendered.contains("> Das Haus ist alt. — The house is old."));
    }

    #[test]
    fn render_json_export_includes_translations() {
        let rendered = render_json_export(&[sample_word()]).unwrap();
        assert!(rendered.contains("\"german\": \"Haus\""));
        assert!(rendered.contains("\"house\""));
    }

    #[test]
    fn suggested_export_file_name_uses_format_extension() {
        assert_eq!(
            suggested_export_file_name(ExportFormat::Json, 123),
            "wort-export-123.json"
        );
        assert_eq!(
            suggested_export_file_name(ExportFormat::Markdown, 456),
            "wort-export-456.md"
        );
    }
}
