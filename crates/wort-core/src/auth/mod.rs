//! Identity provider clients and principal propagation helpers.
//!
//! The hosting platform authenticates the user out of band; clients only ever
//! observe a resolved principal (or none) and forward it on API requests.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::util::{is_http_url, normalize_text_option};

/// Authenticated principal resolved by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientPrincipal {
    pub identity_provider: String,
    pub user_id: String,
    /// Display name (email for most providers)
    pub user_details: String,
    #[serde(default)]
    pub user_roles: Vec<String>,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid auth configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Auth HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Failed to parse principal payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Principal storage error: {0}")]
    Storage(String),
}

pub type AuthResult<T> = Result<T, AuthError>;

/// Source of the authenticated principal.
///
/// Injected into the sync engine so tests can substitute a fixed provider;
/// no provider state is ever ambient.
#[allow(async_fn_in_trait)]
pub trait IdentityProvider {
    /// Resolve the current principal, or `None` when signed out.
    async fn resolve(&self) -> AuthResult<Option<ClientPrincipal>>;
}

/// Identity client for statically-hosted deployments: asks the platform's
/// `/.auth/me` endpoint who the current user is, cookies included.
///
/// Always fetches fresh; sign-in/sign-out between calls is picked up
/// immediately.
#[derive(Clone)]
pub struct SwaIdentityClient {
    endpoint: String,
    client: reqwest::Client,
}

impl SwaIdentityClient {
    pub fn new(site_url: impl AsRef<str>) -> AuthResult<Self> {
        let site_url = normalize_site_url(site_url.as_ref())?;
        Ok(Self {
            endpoint: format!("{site_url}/.auth/me"),
            client: reqwest::Client::builder().cookie_store(true).build()?,
        })
    }
}

impl IdentityProvider for SwaIdentityClient {
    async fn resolve(&self) -> AuthResult<Option<ClientPrincipal>> {
        let response = match self.client.get(&self.endpoint).send().await {
            Ok(response) => response,
            Err(error) => {
                tracing::debug!("Identity endpoint unreachable: {error}");
                return Ok(None);
            }
        };

        if !response.status().is_success() {
            tracing::debug!("Identity endpoint returned {}", response.status());
            return Ok(None);
        }

        match response.json::<AuthMeResponse>().await {
            Ok(payload) => Ok(payload.client_principal),
            Err(error) => {
                tracing::debug!("Invalid identity payload: {error}");
                Ok(None)
            }
        }
    }
}

/// Fixed principal provider; used by the CLI (principal restored from
/// storage) and by tests.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity {
    principal: Option<ClientPrincipal>,
}

impl StaticIdentity {
    #[must_use]
    pub const fn new(principal: Option<ClientPrincipal>) -> Self {
        Self { principal }
    }

    /// Provider that always resolves to no principal.
    #[must_use]
    pub const fn none() -> Self {
        Self { principal: None }
    }
}

impl IdentityProvider for StaticIdentity {
    async fn resolve(&self) -> AuthResult<Option<ClientPrincipal>> {
        Ok(self.principal.clone())
    }
}

/// Encode a principal into the header blob the API expects: base64 of
/// `{"clientPrincipal": {...}}`, mirroring what the hosting proxy injects.
pub fn encode_principal_header(principal: &ClientPrincipal) -> AuthResult<String> {
    let payload = serde_json::to_string(&AuthMeResponse {
        client_principal: Some(principal.clone()),
    })?;
    Ok(BASE64.encode(payload))
}

/// Decode a principal header blob back into a principal.
pub fn decode_principal_header(encoded: &str) -> AuthResult<Option<ClientPrincipal>> {
    let raw = BASE64
        .decode(encoded.trim())
        .map_err(|error| AuthError::InvalidConfiguration(format!("invalid base64: {error}")))?;
    let payload: AuthMeResponse = serde_json::from_slice(&raw)?;
    Ok(payload.client_principal)
}

fn normalize_site_url(url: &str) -> AuthResult<String> {
    let url = normalize_text_option(Some(url.to_string())).ok_or_else(|| {
        AuthError::InvalidConfiguration("site URL must not be empty".to_string())
    })?;
    if is_http_url(&url) {
        Ok(url.trim_end_matches('/').to_string())
    } else {
        Err(AuthError::InvalidConfiguration(
            "site URL must include http:// or https://".to_string(),
        ))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthMeResponse {
    client_principal: Option<ClientPrincipal>,
}
