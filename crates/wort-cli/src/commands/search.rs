use std::path::Path;

use crate::commands::common::{
    format_word_lines, normalize_search_query, open_database, word_to_list_item, WordListItem,
};
use crate::error::CliError;

pub async fn run_search(
    query: &str,
    limit: usize,
    as_json: bool,
    db_path: &Path,
) -> Result<(), CliError> {
    let normalized_query = normalize_search_query(query)?;

    let db = open_database(db_path)?;
    let language = db.load_settings().await?.primary_language();
    let words = db.search_words(&normalized_query, limit).await?;

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
