//! Typed HTTP client for the word API.
//!
//! Speaks the JSON contract of the companion word service: CRUD, paged
//! listing, health/profile probes, and the timestamped change-set sync
//! endpoint the sync engine drives.

use chrono::{DateTime, Utc};
use reqwest::{RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::auth::{encode_principal_header, ClientPrincipal};
use crate::util::{is_http_url, normalize_text_option};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid API configuration: {0}")]
    InvalidConfiguration(String),
    #[error("API HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Word API error: {0}")]
    Api(String),
    #[error("Invalid API payload: {0}")]
    InvalidPayload(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Translations keyed by two-letter language code.
///
/// A missing translation omits its key entirely; empty lists never go on the
/// wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationMap {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub en: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ru: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uk: Option<Vec<String>>,
}

impl TranslationMap {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.en.is_none() && self.ru.is_none() && self.uk.is_none()
    }

    #[must_use]
    pub fn get(&self, code: &str) -> Option<&Vec<String>> {
        match code {
            "en" => self.en.as_ref(),
            "ru" => self.ru.as_ref(),
            "uk" => self.uk.as_ref(),
            _ => None,
        }
    }

    /// Set the alternatives for a language code; empty lists clear the key.
    pub fn set(&mut self, code: &str, alternatives: Vec<String>) {
        let value = if alternatives.is_empty() {
            None
        } else {
            Some(alternatives)
        };
        match code {
            "en" => self.en = value,
            "ru" => self.ru = value,
            "uk" => self.uk = value,
            _ => {}
        }
    }
}

/// Example sentence as exchanged with the API (source stays local-only).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiExample {
    pub german: String,
    #[serde(default)]
    pub translation: String,
}

/// Word record as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiWord {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub german: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub article: Option<String>,
    pub word_type: String,
    #[serde(default)]
    pub translations: TranslationMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<ApiExample>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub synonyms: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub antonyms: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub collocations: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One client-side mutation in a sync request; `is_deleted` marks a tombstone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncChange {
    pub id: String,
    pub german: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub article: Option<String>,
    pub word_type: String,
    #[serde(default)]
    pub translations: TranslationMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub examples: Option<Vec<ApiExample>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synonyms: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub antonyms: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collocations: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    /// Echo of the local `updated_at`; the server's LWW input
    pub client_updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_deleted: bool,
}

const fn is_false(value: &bool) -> bool {
    !*value
}

/// Body for `POST /words` and `PUT /words/{id}` (id and timestamps are
/// server-assigned on this path).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordPayload {
    pub german: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub article: Option<String>,
    pub word_type: String,
    #[serde(default)]
    pub translations: TranslationMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub examples: Option<Vec<ApiExample>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synonyms: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub antonyms: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collocations: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncRequest {
    /// Cursor: "give me everything that changed after this point"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_sync_at: Option<DateTime<Utc>>,
    pub changes: Vec<SyncChange>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResponse {
    pub server_changes: Vec<ApiWord>,
    pub deleted_ids: Vec<String>,
    pub synced_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordListResponse {
    pub words: Vec<ApiWord>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiUser {
    pub id: String,
    pub provider_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity_provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub database: String,
}

impl HealthStatus {
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// Listing parameters for `GET /words`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordListQuery {
    pub search: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

/// The sync engine's view of the remote side; implemented by
/// [`WordApiClient`] and by test fakes.
#[allow(async_fn_in_trait)]
pub trait WordsApi {
    /// Fetch a page of the remote word list.
    async fn list_words(&self, query: &WordListQuery) -> ApiResult<WordListResponse>;

    /// Exchange a change set for the server's changes since the cursor.
    async fn sync_words(&self, request: &SyncRequest) -> ApiResult<SyncResponse>;
}

/// HTTP client for the word API.
#[derive(Clone)]
pub struct WordApiClient {
    base_url: String,
    client: reqwest::Client,
    principal: Option<ClientPrincipal>,
    principal_header: Option<String>,
}

impl WordApiClient {
    pub fn new(base_url: impl Into<String>) -> ApiResult<Self> {
        let base_url = normalize_base_url(base_url.into())?;
        Ok(Self {
            base_url,
            client: reqwest::Client::builder().build()?,
            principal: None,
            principal_header: None,
        })
    }

    /// Attach a resolved principal; its headers go on every request.
    pub fn with_principal(mut self, principal: Option<ClientPrincipal>) -> ApiResult<Self> {
        self.principal_header = principal
            .as_ref()
            .map(encode_principal_header)
            .transpose()
            .map_err(|error| ApiError::InvalidPayload(error.to_string()))?;
        self.principal = principal;
        Ok(self)
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub const fn principal(&self) -> Option<&ClientPrincipal> {
        self.principal.as_ref()
    }

    pub async fn health(&self) -> ApiResult<HealthStatus> {
        let response = self
            .send(self.client.get(format!("{}/health", self.base_url)))
            .await?;
        Ok(response.json().await?)
    }

    pub async fn me(&self) -> ApiResult<ApiUser> {
        let response = self
            .send(self.client.get(format!("{}/me", self.base_url)))
            .await?;
        Ok(response.json().await?)
    }

    pub async fn get_word(&self, id: &str) -> ApiResult<ApiWord> {
        let response = self
            .send(self.client.get(format!("{}/words/{id}", self.base_url)))
            .await?;
        Ok(response.json().await?)
    }

    pub async fn create_word(&self, payload: &WordPayload) -> ApiResult<ApiWord> {
        let response = self
            .send(
                self.client
                    .post(format!("{}/words", self.base_url))
                    .json(payload),
            )
            .await?;
        Ok(response.json().await?)
    }

    pub async fn update_word(&self, id: &str, payload: &WordPayload) -> ApiResult<ApiWord> {
        let response = self
            .send(
                self.client
                    .put(format!("{}/words/{id}", self.base_url))
                    .json(payload),
            )
            .await?;
        Ok(response.json().await?)
    }

    pub async fn delete_word(&self, id: &str) -> ApiResult<()> {
        self.send(self.client.delete(format!("{}/words/{id}", self.base_url)))
            .await?;
        Ok(())
    }

    fn apply_identity(&self, request: RequestBuilder) -> RequestBuilder {
        match (&self.principal, &self.principal_header) {
            (Some(principal), Some(header)) => request
                .header("X-Ms-Client-Principal", header)
                .header("X-Ms-Client-Principal-Id", &principal.user_id)
                .header("X-Ms-Client-Principal-Name", &principal.user_details)
                .header("X-Ms-Client-Principal-Idp", &principal.identity_provider),
            _ => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> ApiResult<reqwest::Response> {
        let response = self.apply_identity(request).send().await?;

        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::Api(parse_api_error(status, &body)))
        }
    }
}

impl WordsApi for WordApiClient {
    async fn list_words(&self, query: &WordListQuery) -> ApiResult<WordListResponse> {
        let mut params: Vec<(&str, String)> = Vec::new();
        if let Some(search) = &query.search {
            params.push(("search", search.clone()));
        }
        if let Some(limit) = query.limit {
            params.push(("limit", limit.to_string()));
        }
        if let Some(offset) = query.offset {
            params.push(("offset", offset.to_string()));
        }

        let response = self
            .send(
                self.client
                    .get(format!("{}/words", self.base_url))
                    .query(&params),
            )
            .await?;
        Ok(response.json().await?)
    }

    async fn sync_words(&self, request: &SyncRequest) -> ApiResult<SyncResponse> {
        let response = self
            .send(
                self.client
                    .post(format!("{}/words/sync", self.base_url))
                    .json(request),
            )
            .await?;
        Ok(response.json().await?)
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: Option<String>,
    message: Option<String>,
}

fn parse_api_error(status: StatusCode, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<ApiErrorBody>(body) {
        if let Some(message) = payload.message.or(payload.error) {
            return format!("{} ({})", message.trim(), status.as_u16());
        }
    }

    let trimmed = crate::util::compact_text(body);
    if trimmed.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        format!("{} ({})", trimmed, status.as_u16())
    }
}

fn normalize_base_url(raw: String) -> ApiResult<String> {
    let url = normalize_text_option(Some(raw)).ok_or_else(|| {
        ApiError::InvalidConfiguration("API base URL must not be empty".to_string())
    })?;
    if is_http_url(&url) {
        Ok(url.trim_end_matches('/').to_string())
    } else {
        Err(ApiError::InvalidConfiguration(
            "API base URL must include http:// or https://".to_string(),
        ))
    }
}
