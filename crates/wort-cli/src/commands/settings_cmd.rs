use std::path::Path;

use wort_core::models::TranslationLanguage;

use crate::cli::SettingsCommands;
use crate::commands::common::open_database;
use crate::error::CliError;

pub async fn run_settings(command: SettingsCommands, db_path: &Path) -> Result<(), CliError> {
    let db = open_database(db_path)?;

    match command {
        SettingsCommands::Show => {
            let settings = db.load_settings().await?;
            let languages = settings
                .preferred_languages
                .iter()
                .map(|language| language.code())
                .collect::<Vec<_>>()
                .join(",");
            println!("languages:        {languages}");
            println!(
                "review_direction: {}",
                enum_label(&settings.review_direction)?
            );
            println!("daily_goal:       {}", settings.daily_review_goal);
            println!("theme:            {}", enum_label(&settings.theme)?);
            Ok(())
        }
        SettingsCommands::Set {
            languages,
            review_direction,
            daily_goal,
            theme,
        } => {
            let mut settings = db.load_settings().await?;

            if let Some(languages) = languages {
                settings.preferred_languages = parse_languages(&languages)?;
            }
            if let Some(direction) = review_direction {
                settings.review_direction = parse_enum(&direction).ok_or_else(|| {
                    CliError::Config(format!("Unknown review direction: {direction}"))
                })?;
            }
            if let Some(goal) = daily_goal {
                settings.daily_review_goal = goal;
            }
            if let Some(theme) = theme {
                settings.theme = parse_enum(&theme)
                    .ok_or_else(|| CliError::Config(format!("Unknown theme: {theme}")))?;
            }

            db.save_settings(&settings).await?;
            println!("Settings updated");
            Ok(())
        }
    }
}

fn parse_languages(raw: &str) -> Result<Vec<TranslationLanguage>, CliError> {
    let languages = raw
        .split(',')
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(|code| {
            code.parse::<TranslationLanguage>()
                .map_err(|_| CliError::Config(format!("Unknown language code: {code}")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    if languages.is_empty() {
        return Err(CliError::Config(
            "At least one language code is required".to_string(),
        ));
    }
    Ok(languages)
}

fn parse_enum<T: serde::de::DeserializeOwned>(raw: &str) -> Option<T> {
    serde_json::from_str(&format!("\"{}\"", raw.trim())).ok()
}

fn enum_label<T: serde::Serialize>(value: &T) -> Result<String, CliError> {
    Ok(serde_json::to_string(value)?.trim_matches('"').to_string())
}
