use std::path::Path;

use wort_core::export::{render_words_export, ExportFormat as CoreExportFormat};

use crate::cli::ExportFormat;
use crate::commands::common::open_database;
use crate::error::CliError;

pub async fn run_export(
    format: ExportFormat,
    output_path: Option<&Path>,
    db_path: &Path,
) -> Result<(), CliError> {
    let db = open_database(db_path)?;
    let words = db.all_words().await?;

    let core_format = match format {
        ExportFormat::Json => CoreExportFormat::Json,
        ExportFormat::Markdown => CoreExportFormat::Markdown,
    };
    let rendered = render_words_export(&words, core_format)?;

    if let Some(path) = output_path {
        std::fs::write(path, rendered)?;
        println!("{}", path.display());
    } else {
        println!("{rendered}");
    }

    Ok(())
}
