use std::path::Path;

use wort_core::api::WordApiClient;
use wort_core::util::format_timestamp;

use crate::auth::load_stored_principal;
use crate::cli::SyncCommands;
use crate::commands::common::{build_engine, open_database, CliSyncEngine};
use crate::config_profiles::{CliProfile, CliProfilesConfig};
use crate::error::CliError;

pub async fn run_sync(
    command: Option<SyncCommands>,
    db_path: &Path,
    profile: Option<&str>,
) -> Result<(), CliError> {
    match command.unwrap_or(SyncCommands::Push) {
        SyncCommands::Push => run_sync_push(db_path, profile).await,
        SyncCommands::Pull => run_sync_pull(db_path, profile).await,
        SyncCommands::Status => run_sync_status(db_path, profile).await,
    }
}

async fn run_sync_push(db_path: &Path, profile: Option<&str>) -> Result<(), CliError> {
    let db = open_database(db_path)?;
    let engine = build_engine(&db, profile)?.ok_or(CliError::SyncNotConfigured)?;

    if !engine.initialize().await {
        return Err(sync_failure(&engine));
    }
    if !engine.sync_all_words().await {
        return Err(sync_failure(&engine));
    }

    println!("Sync completed ({} words)", db.count_words().await?);
    Ok(())
}

async fn run_sync_pull(db_path: &Path, profile: Option<&str>) -> Result<(), CliError> {
    let db = open_database(db_path)?;
    let engine = build_engine(&db, profile)?.ok_or(CliError::SyncNotConfigured)?;

    if !engine.fetch_from_server().await {
        return Err(sync_failure(&engine));
    }

    println!(
        "Fetched {} words from server",
        db.count_words().await?
    );
    Ok(())
}

async fn run_sync_status(db_path: &Path, profile: Option<&str>) -> Result<(), CliError> {
    let config = CliProfilesConfig::load().map_err(CliError::Config)?;
    let profile_name = config.resolve_profile_name(profile);

    let Some(api_base_url) = config.profile(&profile_name).and_then(CliProfile::api_base_url)
    else {
        println!("Profile '{profile_name}' has no API endpoint; sync is disabled.");
        return Ok(());
    };

    let principal =
        load_stored_principal(&profile_name).map_err(|error| CliError::Auth(error.to_string()))?;
    let client = WordApiClient::new(api_base_url)
        .and_then(|client| client.with_principal(principal.clone()))
        .map_err(|error| CliError::Api(error.to_string()))?;

    match client.health().await {
        Ok(health) if health.is_healthy() => {
            println!("API: healthy (database {})", health.database);
        }
        Ok(health) => println!("API: {} (database {})", health.status, health.database),
        Err(error) => println!("API: unreachable ({error})"),
    }

    if let Some(principal) = &principal {
        println!(
            "Signed in as {} via {}",
            principal.user_details, principal.identity_provider
        );
        match client.me().await {
            Ok(user) => {
                let label = user
                    .display_name
                    .or(user.email)
                    .unwrap_or_else(|| user.id.clone());
                println!("Server profile: {label}");
            }
            Err(error) => println!("Server profile lookup failed: {error}"),
        }
    } else {
        println!("Not signed in; run `wort auth login`.");
    }

    let db = open_database(db_path)?;
    match db.last_synced_at().await? {
        Some(at) => println!("Last synced: {}", format_timestamp(at)),
        None => println!("Never synced"),
    }

    Ok(())
}

fn sync_failure(engine: &CliSyncEngine) -> CliError {
    CliError::SyncFailed(
        engine
            .status()
            .sync_error
            .unwrap_or_else(|| "sync attempt was rejected".to_string()),
    )
}
