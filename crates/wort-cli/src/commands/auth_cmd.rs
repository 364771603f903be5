use wort_core::api::WordApiClient;
use wort_core::auth::{decode_principal_header, ClientPrincipal};

use crate::auth::{clear_stored_principal, load_stored_principal, save_stored_principal};
use crate::cli::AuthCommands;
use crate::config_profiles::{normalize_text_option, CliProfile, CliProfilesConfig};
use crate::error::CliError;

pub async fn run_auth(command: AuthCommands, global_profile: Option<&str>) -> Result<(), CliError> {
    match command {
        AuthCommands::Login {
            profile,
            user_id,
            name,
            provider,
            principal,
        } => {
            let config = CliProfilesConfig::load().map_err(CliError::Config)?;
            let profile_name = config.resolve_profile_name(profile.as_deref().or(global_profile));

            let principal = if let Some(blob) = principal {
                decode_principal_header(&blob)
                    .map_err(|error| CliError::Auth(error.to_string()))?
                    .ok_or_else(|| {
                        CliError::Auth("principal blob contained no clientPrincipal".to_string())
                    })?
            } else {
                let user_id = normalize_text_option(user_id).ok_or_else(|| {
                    CliError::Config("--user-id is required without --principal".to_string())
                })?;
                let user_details = normalize_text_option(name).ok_or_else(|| {
                    CliError::Config("--name is required without --principal".to_string())
                })?;
                ClientPrincipal {
                    identity_provider: provider,
                    user_id,
                    user_details,
                    user_roles: vec!["anonymous".to_string(), "authenticated".to_string()],
                }
            };

            save_stored_principal(&profile_name, &principal)
                .map_err(|error| CliError::Auth(error.to_string()))?;
            println!(
                "Signed in profile '{}' as {}",
                profile_name, principal.user_details
            );
            Ok(())
        }
        AuthCommands::Status { profile } => {
            let config = CliProfilesConfig::load().map_err(CliError::Config)?;
            let profile_name = config.resolve_profile_name(profile.as_deref().or(global_profile));

            let Some(principal) = load_stored_principal(&profile_name)
                .map_err(|error| CliError::Auth(error.to_string()))?
            else {
                println!("Profile '{profile_name}' is not signed in.");
                return Ok(());
            };

            println!(
                "Profile '{}' is signed in as {} via {}",
                profile_name, principal.user_details, principal.identity_provider
            );

            // When the profile can reach the API, confirm the server's view
            if let Some(api_base_url) = config
                .profile(&profile_name)
                .and_then(CliProfile::api_base_url)
            {
                let client = WordApiClient::new(api_base_url)
                    .and_then(|client| client.with_principal(Some(principal)))
                    .map_err(|error| CliError::Api(error.to_string()))?;
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
            }

            Ok(())
        }
        AuthCommands::Logout { profile } => {
            let config = CliProfilesConfig::load().map_err(CliError::Config)?;
            let profile_name = config.resolve_profile_name(profile.as_deref().or(global_profile));

            clear_stored_principal(&profile_name)
                .map_err(|error| CliError::Auth(error.to_string()))?;
            println!("Signed out profile '{profile_name}'");
            Ok(())
        }
    }
}
