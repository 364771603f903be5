use std::path::Path;

use wort_core::models::Word;
use wort_core::util::normalize_text_option;

use crate::cli::WordFieldArgs;
use crate::commands::common::{apply_word_fields, build_engine, open_database, push_word_change};
use crate::error::CliError;

pub async fn run_add(
    german: &str,
    fields: &WordFieldArgs,
    db_path: &Path,
    profile: Option<&str>,
) -> Result<(), CliError> {
    let german = normalize_text_option(Some(german.to_string())).ok_or(CliError::EmptyGerman)?;

    let db = open_database(db_path)?;
    let mut word = Word::new(german, fields.word_type.unwrap_or_default());
    apply_word_fields(&mut word, fields);
    db.create_word(&word).await?;

    let engine = build_engine(&db, profile)?;
    push_word_change(engine.as_ref(), &word.id).await;

    println!("{}", word.id);
    Ok(())
}
