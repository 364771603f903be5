//! Wort CLI - Manage a personal German vocabulary from the terminal
//!
//! Quick capture, search, and offline-first sync against the word API.

mod auth;
mod cli;
mod commands;
mod config_profiles;
mod error;

use clap::{CommandFactory, Parser};

use crate::cli::{Cli, Commands, WordFieldArgs};
use crate::commands::common::resolve_db_path;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("wort=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let db_path = resolve_db_path(cli.db_path);
    let profile = cli.profile.as_deref();

    match cli.command {
        Some(Commands::Add { german, fields }) => {
            commands::add::run_add(&german, &fields, &db_path, profile).await?;
        }
        Some(Commands::List {
            limit,
            word_type,
            json,
        }) => {
            commands::list::run_list(limit, word_type, json, &db_path).await?;
        }
        Some(Commands::Search { query, limit, json }) => {
            commands::search::run_search(&query, limit, json, &db_path).await?;
        }
        Some(Commands::Show { id, json }) => {
            commands::show::run_show(&id, json, &db_path).await?;
        }
        Some(Commands::Edit { id, fields }) => {
            commands::edit::run_edit(&id, &fields, &db_path, profile).await?;
        }
        Some(Commands::Delete { id }) => {
            commands::delete::run_delete(&id, &db_path, profile).await?;
        }
        Some(Commands::Export { format, output }) => {
            commands::export::run_export(format, output.as_deref(), &db_path).await?;
        }
        Some(Commands::Completions { shell, output }) => {
            commands::completions::run_completions(shell, output.as_deref())?;
        }
        Some(Commands::Sync { command }) => {
            commands::sync::run_sync(command, &db_path, profile).await?;
        }
        Some(Commands::Settings { command }) => {
            commands::settings_cmd::run_settings(command, &db_path).await?;
        }
        Some(Commands::Config { command }) => {
            commands::config::run_config(command, profile)?;
        }
        Some(Commands::Auth { command }) => {
            commands::auth_cmd::run_auth(command, profile).await?;
        }
        None => {
            // Quick capture mode: wort "Fernweh"
            if cli.word.is_empty() {
                Cli::command().print_help().map_err(CliError::Io)?;
                println!();
            } else {
                let german = cli.word.join(" ");
                commands::add::run_add(&german, &WordFieldArgs::default(), &db_path, profile)
                    .await?;
            }
        }
    }

    Ok(())
}
