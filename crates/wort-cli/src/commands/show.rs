use std::path::Path;

use crate::commands::common::{
    normalize_word_identifier, open_database, render_word_details, resolve_word,
};
use crate::error::CliError;

pub async fn run_show(id: &str, as_json: bool, db_path: &Path) -> Result<(), CliError> {
    let normalized_id = normalize_word_identifier(id)?;
    let db = open_database(db_path)?;
    let word = resolve_word(&normalized_id, &db).await?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&word)?);
    } else {
        for line in render_word_details(&word) {
            println!("{line}");
        }
    }

    Ok(())
}
