use std::env;

use crate::cli::ConfigCommands;
use crate::config_profiles::{is_http_url, normalize_text_option, CliProfile, CliProfilesConfig};
use crate::error::CliError;

pub fn run_config(command: ConfigCommands, global_profile: Option<&str>) -> Result<(), CliError> {
    match command {
        ConfigCommands::Init {
            profile,
            api_base_url,
            auth_site_url,
            no_activate,
        } => run_config_init(
            profile.as_deref().or(global_profile),
            api_base_url,
            auth_site_url,
            no_activate,
        ),
    }
}

pub fn run_config_init(
    profile_name: Option<&str>,
    api_base_url: Option<String>,
    auth_site_url: Option<String>,
    no_activate: bool,
) -> Result<(), CliError> {
    let mut config = CliProfilesConfig::load().map_err(CliError::Config)?;
    let profile_name = config.resolve_profile_name(profile_name);
    let existing_profile = config.profile(&profile_name).cloned().unwrap_or_default();

    let merged_api_base_url = normalize_text_option(api_base_url)
        .or_else(|| normalize_text_option(env::var("WORT_API_BASE_URL").ok()))
        .or_else(|| existing_profile.api_base_url());
    let merged_auth_site_url = normalize_text_option(auth_site_url)
        .or_else(|| normalize_text_option(env::var("WORT_AUTH_SITE_URL").ok()))
        .or_else(|| existing_profile.auth_site_url());

    let profile = config.profile_mut_or_default(&profile_name);
    if let Some(value) = merged_api_base_url {
        profile.api_base_url = Some(value);
    }
    if let Some(value) = merged_auth_site_url {
        profile.auth_site_url = Some(value);
    }

    validate_profile_urls(profile)?;

    if !no_activate {
        config.active_profile = Some(profile_name.clone());
    }

    let path = config.save().map_err(CliError::Config)?;
    println!(
        "Profile '{}' initialized at {}",
        profile_name,
        path.display()
    );

    let profile = config
        .profiles
        .get(&profile_name)
        .ok_or_else(|| CliError::Config("Failed to persist profile".to_string()))?;
    if profile.api_base_url().is_some() {
        println!("Sync profile '{profile_name}' is ready. Run `wort auth login` to sign in.");
    } else {
        println!("Profile '{profile_name}' is missing: api_base_url");
    }

    Ok(())
}

fn validate_profile_urls(profile: &CliProfile) -> Result<(), CliError> {
    if let Some(url) = profile.api_base_url() {
        if !is_http_url(&url) {
            return Err(CliError::Config(
                "api_base_url must include http:// or https://".to_string(),
            ));
        }
    }
    if let Some(url) = profile.auth_site_url() {
        if !is_http_url(&url) {
            return Err(CliError::Config(
                "auth_site_url must include http:// or https://".to_string(),
            ));
        }
    }
    Ok(())
}
