use std::path::Path;

use crate::commands::common::{
    build_engine, normalize_word_identifier, open_database, push_word_change, resolve_word,
};
use crate::error::CliError;

pub async fn run_delete(id: &str, db_path: &Path, profile: Option<&str>) -> Result<(), CliError> {
    let normalized_id = normalize_word_identifier(id)?;
    let db = open_database(db_path)?;
    let word = resolve_word(&normalized_id, &db).await?;

    db.delete_word(&word.id).await?;

    // The record is gone locally, so the push turns into a tombstone
    let engine = build_engine(&db, profile)?;
    push_word_change(engine.as_ref(), &word.id).await;

    println!("{}", word.id);
    Ok(())
}
