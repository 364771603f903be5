use std::path::Path;

use crate::cli::WordFieldArgs;
use crate::commands::common::{
    apply_word_fields, build_engine, normalize_word_identifier, open_database, push_word_change,
    resolve_word,
};
use crate::error::CliError;

pub async fn run_edit(
    id: &str,
    fields: &WordFieldArgs,
    db_path: &Path,
    profile: Option<&str>,
) -> Result<(), CliError> {
    let normalized_id = normalize_word_identifier(id)?;
    let db = open_database(db_path)?;

    let mut word = resolve_word(&normalized_id, &db).await?;
    apply_word_fields(&mut word, fields);
    word.touch();
    db.update_word(&word).await?;

    let engine = build_engine(&db, profile)?;
    push_word_change(engine.as_ref(), &word.id).await;

    println!("{}", word.id);
    Ok(())
}
