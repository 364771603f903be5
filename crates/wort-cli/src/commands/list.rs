use std::path::Path;

use wort_core::models::WordType;

use crate::commands::common::{format_word_lines, open_database, word_to_list_item, WordListItem};
use crate::error::CliError;

pub async fn run_list(
    limit: usize,
    word_type: Option<WordType>,
    as_json: bool,
    db_path: &Path,
) -> Result<(), CliError> {
    let db = open_database(db_path)?;
    let language = db.load_settings().await?.primary_language();

    let mut words = db.list_words(limit, 0).await?;
    if let Some(word_type) = word_type {
        words.retain(|word| word.word_type == word_type);
    }

    if as_json {
        let json_items = words
            .iter()
            .map(|word| word_to_list_item(word, language))
            .collect::<Vec<WordListItem>>();
        println!("{}", serde_json::to_string_pretty(&json_items)?);
    } else {
        for line in format_word_lines(&words, language) {
            println!("{line}");
        }
    }

    Ok(())
}
