//! Reconciliation engine between the local store and the word API.
//!
//! Push sends full current records (client-side last-write-wins); the server
//! arbitrates conflicts and its changes are applied wholesale. At most one
//! sync attempt runs at a time; a second caller is rejected, never queued.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};

use super::changes::{api_word_to_local, deletion_change, word_to_sync_change};
use crate::api::{SyncChange, SyncRequest, SyncResponse, WordListQuery, WordsApi};
use crate::auth::{ClientPrincipal, IdentityProvider};
use crate::models::WordId;
use crate::services::DatabaseService;
use crate::util::now_millis;

/// Page bound for the full-refresh path.
const FULL_FETCH_LIMIT: usize = 1000;

const MSG_OFFLINE: &str = "Sync is disabled or you are offline";
const MSG_UNAUTHENTICATED: &str = "Please sign in to sync";

/// Engine configuration supplied by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncOptions {
    pub enabled: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Snapshot of the engine state for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncStatus {
    pub is_syncing: bool,
    pub is_online: bool,
    pub is_authenticated: bool,
    pub last_synced_at: Option<DateTime<Utc>>,
    pub sync_error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SyncPhase {
    Idle,
    Syncing,
}

#[derive(Debug)]
struct EngineState {
    phase: SyncPhase,
    online: bool,
    initialized: bool,
    principal: Option<ClientPrincipal>,
    last_synced_at: Option<DateTime<Utc>>,
    sync_error: Option<String>,
}

/// RAII attempt token; dropping it returns the engine to `Idle` even on an
/// early failure return.
struct SyncAttempt {
    state: Arc<Mutex<EngineState>>,
}

impl Drop for SyncAttempt {
    fn drop(&mut self) {
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        state.phase = SyncPhase::Idle;
    }
}

/// Sync engine over an injected store, API client, and identity provider.
pub struct SyncEngine<A, P> {
    db: DatabaseService,
    api: A,
    identity: P,
    options: SyncOptions,
    state: Arc<Mutex<EngineState>>,
}

impl<A: WordsApi, P: IdentityProvider> SyncEngine<A, P> {
    #[must_use]
    pub fn new(db: DatabaseService, api: A, identity: P, options: SyncOptions) -> Self {
        Self {
            db,
            api,
            identity,
            options,
            state: Arc::new(Mutex::new(EngineState {
                phase: SyncPhase::Idle,
                online: true,
                initialized: false,
                principal: None,
                last_synced_at: None,
                sync_error: None,
            })),
        }
    }

    /// Host-observed connectivity; offline engines reject attempts without
    /// touching the network.
    pub fn set_online(&self, online: bool) {
        self.state().online = online;
    }

    /// Current engine state snapshot.
    pub fn status(&self) -> SyncStatus {
        let state = self.state();
        SyncStatus {
            is_syncing: state.phase == SyncPhase::Syncing,
            is_online: state.online,
            is_authenticated: state.principal.is_some(),
            last_synced_at: state.last_synced_at,
            sync_error: state.sync_error.clone(),
        }
    }

    /// One-time activation: resolve identity and, for an empty store, seed it
    /// from the server. Without a principal the engine stays dormant.
    pub async fn initialize(&self) -> bool {
        {
            let mut state = self.state();
            if state.initialized {
                return true;
            }
            state.initialized = true;
            if !self.options.enabled || !state.online {
                return true;
            }
        }

        let principal = self.resolve_principal().await;
        let cursor = self.db.last_synced_at().await.ok().flatten();
        {
            let mut state = self.state();
            state.principal.clone_from(&principal);
            state.last_synced_at = cursor;
        }

        if principal.is_none() {
            tracing::debug!("Sync engine dormant: no principal");
            return true;
        }

        match self.db.count_words().await {
            Ok(0) => self.fetch_from_server().await,
            Ok(_) => true,
            Err(error) => self.record_failure(error.to_string()),
        }
    }

    /// Push a single word (or its tombstone, when the record is gone) and
    /// apply whatever the server returns.
    pub async fn sync_word(&self, id: &WordId) -> bool {
        let Some(_attempt) = self.begin_attempt() else {
            return false;
        };
        if !self.authenticate().await {
            return self.record_failure(MSG_UNAUTHENTICATED);
        }

        let change = match self.db.get_word(id).await {
            Ok(Some(word)) => word_to_sync_change(&word),
            // Record vanished between schedule and execution: propagate a
            // deletion instead of failing.
            Ok(None) => deletion_change(*id, now_millis()),
            Err(error) => return self.record_failure(error.to_string()),
        };

        self.push_changes(vec![change]).await
    }

    /// Push every stored word in one change list.
    pub async fn sync_all_words(&self) -> bool {
        let Some(_attempt) = self.begin_attempt() else {
            return false;
        };
        if !self.authenticate().await {
            return self.record_failure(MSG_UNAUTHENTICATED);
        }

        let words = match self.db.all_words().await {
            Ok(words) => words,
            Err(error) => return self.record_failure(error.to_string()),
        };
        if words.is_empty() {
            return true;
        }

        let changes: Vec<SyncChange> = words.iter().map(word_to_sync_change).collect();
        self.push_changes(changes).await
    }

    /// Full refresh: replace the local store with the remote list, bypassing
    /// the change-set protocol. The cursor is stamped with the local clock
    /// since this path exchanges none.
    pub async fn fetch_from_server(&self) -> bool {
        let Some(_attempt) = self.begin_attempt() else {
            return false;
        };
        if !self.authenticate().await {
            return self.record_failure(MSG_UNAUTHENTICATED);
        }

        let query = WordListQuery {
            limit: Some(FULL_FETCH_LIMIT),
            ..WordListQuery::default()
        };
        let response = match self.api.list_words(&query).await {
            Ok(response) => response,
            Err(error) => return self.record_failure(error.to_string()),
        };

        if let Err(error) = self.db.clear_words().await {
            return self.record_failure(error.to_string());
        }
        for api_word in &response.words {
            let word = match api_word_to_local(api_word) {
                Ok(word) => word,
                Err(error) => return self.record_failure(error.to_string()),
            };
            if let Err(error) = self.db.upsert_word(&word).await {
                return self.record_failure(error.to_string());
            }
        }

        let now = now_millis();
        if let Err(error) = self.db.set_last_synced_at(now).await {
            return self.record_failure(error.to_string());
        }
        self.state().last_synced_at = Some(now);
        tracing::info!("Fetched {} words from server", response.words.len());
        true
    }

    /// Enter the `Syncing` phase, or reject when offline, disabled, or
    /// already in flight.
    fn begin_attempt(&self) -> Option<SyncAttempt> {
        let mut state = self.state();
        if !self.options.enabled || !state.online {
            tracing::debug!("Sync skipped: offline or disabled");
            state.sync_error = Some(MSG_OFFLINE.to_string());
            return None;
        }
        if state.phase == SyncPhase::Syncing {
            // Rejected, not queued; the in-flight attempt owns sync_error.
            tracing::debug!("Sync skipped: another attempt is in flight");
            return None;
        }

        state.phase = SyncPhase::Syncing;
        state.sync_error = None;
        Some(SyncAttempt {
            state: Arc::clone(&self.state),
        })
    }

    /// Resolve the principal fresh for this attempt (sign-in state may have
    /// changed since the last one).
    async fn authenticate(&self) -> bool {
        let principal = self.resolve_principal().await;
        let authenticated = principal.is_some();
        self.state().principal = principal;
        authenticated
    }

    async fn resolve_principal(&self) -> Option<ClientPrincipal> {
        match self.identity.resolve().await {
            Ok(principal) => principal,
            Err(error) => {
                tracing::warn!("Identity resolution failed: {error}");
                None
            }
        }
    }

    async fn push_changes(&self, changes: Vec<SyncChange>) -> bool {
        let last_sync_at = match self.db.last_synced_at().await {
            Ok(cursor) => cursor,
            Err(error) => return self.record_failure(error.to_string()),
        };
        self.state().last_synced_at = last_sync_at;

        let request = SyncRequest {
            last_sync_at,
            changes,
        };
        match self.api.sync_words(&request).await {
            Ok(response) => self.apply_sync_response(response).await,
            Err(error) => self.record_failure(error.to_string()),
        }
    }

    /// Commit the server's side of the exchange: upsert its changes, drop its
    /// tombstones, then advance the cursor. A failed attempt leaves the
    /// cursor untouched so the next one retries the same window.
    async fn apply_sync_response(&self, response: SyncResponse) -> bool {
        for api_word in &response.server_changes {
            let word = match api_word_to_local(api_word) {
                Ok(word) => word,
                Err(error) => return self.record_failure(error.to_string()),
            };
            if let Err(error) = self.db.upsert_word(&word).await {
                return self.record_failure(error.to_string());
            }
        }

        for raw_id in &response.deleted_ids {
            let Ok(id) = raw_id.parse::<WordId>() else {
                tracing::warn!("Ignoring malformed deleted id: {raw_id}");
                continue;
            };
            // Review rows go with the word via the FK cascade
            if let Err(error) = self.db.delete_word(&id).await {
                return self.record_failure(error.to_string());
            }
        }

        if let Err(error) = self.db.set_last_synced_at(response.synced_at).await {
            return self.record_failure(error.to_string());
        }
        self.state().last_synced_at = Some(response.synced_at);
        true
    }

    fn record_failure(&self, message: impl Into<String>) -> bool {
        let message = message.into();
        tracing::warn!("Sync failed: {message}");
        self.state().sync_error = Some(message);
        false
    }

    fn state(&self) -> MutexGuard<'_, EngineState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex as StdMutex;

    use tokio::sync::Notify;

    use super::*;
    use crate::api::{ApiError, ApiResult, ApiWord, WordListResponse};
    use crate::auth::StaticIdentity;
    use crate::models::{Gender, ReviewData, TranslationLanguage, Word, WordType};
    use pretty_assertions::assert_eq;

    struct FakeApi {
        sync_response: SyncResponse,
        list_response: WordListResponse,
        fail: bool,
        sync_requests: StdMutex<Vec<SyncRequest>>,
        list_calls: AtomicUsize,
        started: Option<Arc<Notify>>,
        release: Option<Arc<Notify>>,
    }

    impl FakeApi {
        fn new(synced_at: DateTime<Utc>) -> Self {
            Self {
                sync_response: SyncResponse {
                    server_changes: Vec::new(),
                    deleted_ids: Vec::new(),
                    synced_at,
                },
                list_response: WordListResponse {
                    words: Vec::new(),
                    total: 0,
                    page: 1,
                    page_size: 1000,
                    total_pages: 0,
                },
                fail: false,
                sync_requests: StdMutex::new(Vec::new()),
                list_calls: AtomicUsize::new(0),
                started: None,
                release: None,
            }
        }

        fn with_gate(mut self, started: Arc<Notify>, release: Arc<Notify>) -> Self {
            self.started = Some(started);
            self.release = Some(release);
            self
        }

        fn sync_request_count(&self) -> usize {
            self.sync_requests.lock().unwrap().len()
        }

        fn last_request(&self) -> SyncRequest {
            self.sync_requests.lock().unwrap().last().cloned().unwrap()
        }
    }

    impl WordsApi for FakeApi {
        async fn list_words(&self, _query: &WordListQuery) -> ApiResult<WordListResponse> {
            if self.fail {
                return Err(ApiError::Api("server exploded (500)".to_string()));
            }
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.list_response.clone())
        }

        async fn sync_words(&self, request: &SyncRequest) -> ApiResult<SyncResponse> {
            if self.fail {
                return Err(ApiError::Api("server exploded (500)".to_string()));
            }
            self.sync_requests.lock().unwrap().push(request.clone());
            if let Some(started) = &self.started {
                started.notify_one();
            }
            if let Some(release) = &self.release {
                release.notified().await;
            }
            Ok(self.sync_response.clone())
        }
    }

    fn principal() -> ClientPrincipal {
        ClientPrincipal {
            identity_provider: "github".to_string(),
            user_id: "user-1".to_string(),
            user_details: "user@example.com".to_string(),
            user_roles: vec!["authenticated".to_string()],
        }
    }

    fn haus() -> Word {
        let mut word = Word::new("Haus", WordType::Noun);
        word.gender = Some(Gender::Das);
        word.set_translation(TranslationLanguage::English, Some("house".to_string()));
        word
    }

    fn synced_at() -> DateTime<Utc> {
        "2024-03-02T12:00:00Z".parse().unwrap()
    }

    fn engine(
        db: DatabaseService,
        api: FakeApi,
        identity: StaticIdentity,
    ) -> SyncEngine<FakeApi, StaticIdentity> {
        SyncEngine::new(db, api, identity, SyncOptions::default())
    }

    fn echo_as_api_word(word: &Word) -> ApiWord {
        let change = word_to_sync_change(word);
        ApiWord {
            id: change.id,
            user_id: None,
            german: change.german,
            article: change.article,
            word_type: change.word_type,
            translations: change.translations,
            level: change.level,
            examples: change.examples.unwrap_or_default(),
            synonyms: change.synonyms.unwrap_or_default(),
            antonyms: change.antonyms.unwrap_or_default(),
            collocations: change.collocations.unwrap_or_default(),
            notes: change.notes,
            image_url: change.image_url,
            audio_url: change.audio_url,
            created_at: word.created_at,
            updated_at: change.client_updated_at,
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn first_sync_pushes_single_change_and_advances_cursor() {
        let db = DatabaseService::open_in_memory().unwrap();
        let word = haus();
        db.create_word(&word).await.unwrap();

        let engine = engine(
            db.clone(),
            FakeApi::new(synced_at()),
            StaticIdentity::new(Some(principal())),
        );

        assert!(engine.sync_word(&word.id).await);

        assert_eq!(engine.api.sync_request_count(), 1);
        let request = engine.api.last_request();
        assert_eq!(request.last_sync_at, None);
        assert_eq!(request.changes.len(), 1);
        let change = &request.changes[0];
        assert_eq!(
            change.translations.get("en"),
            Some(&vec!["house".to_string()])
        );
        assert_eq!(change.article.as_deref(), Some("das"));
        assert!(!change.is_deleted);

        // Cursor advanced to the server time; store otherwise untouched
        assert_eq!(db.last_synced_at().await.unwrap(), Some(synced_at()));
        assert_eq!(db.get_word(&word.id).await.unwrap(), Some(word));
        let status = engine.status();
        assert_eq!(status.last_synced_at, Some(synced_at()));
        assert_eq!(status.sync_error, None);
        assert!(status.is_authenticated);
        assert!(!status.is_syncing);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn unauthenticated_sync_makes_zero_network_calls() {
        let db = DatabaseService::open_in_memory().unwrap();
        db.create_word(&haus()).await.unwrap();

        let engine = engine(db.clone(), FakeApi::new(synced_at()), StaticIdentity::none());

        assert!(!engine.sync_all_words().await);
        assert!(!engine.fetch_from_server().await);

        assert_eq!(engine.api.sync_request_count(), 0);
        assert_eq!(engine.api.list_calls.load(Ordering::SeqCst), 0);
        assert_eq!(
            engine.status().sync_error.as_deref(),
            Some(MSG_UNAUTHENTICATED)
        );
        assert_eq!(db.last_synced_at().await.unwrap(), None);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn offline_sync_is_rejected_before_the_network() {
        let db = DatabaseService::open_in_memory().unwrap();
        db.create_word(&haus()).await.unwrap();

        let engine = engine(
            db,
            FakeApi::new(synced_at()),
            StaticIdentity::new(Some(principal())),
        );
        engine.set_online(false);

        assert!(!engine.sync_all_words().await);
        assert_eq!(engine.api.sync_request_count(), 0);
        assert_eq!(engine.status().sync_error.as_deref(), Some(MSG_OFFLINE));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn disabled_sync_is_rejected_before_the_network() {
        let db = DatabaseService::open_in_memory().unwrap();
        let word = haus();
        db.create_word(&word).await.unwrap();

        let engine = SyncEngine::new(
            db,
            FakeApi::new(synced_at()),
            StaticIdentity::new(Some(principal())),
            SyncOptions { enabled: false },
        );

        assert!(!engine.sync_word(&word.id).await);
        assert_eq!(engine.api.sync_request_count(), 0);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn reentrant_sync_is_rejected_without_a_network_call() {
        let db = DatabaseService::open_in_memory().unwrap();
        let word = haus();
        db.create_word(&word).await.unwrap();

        let started = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        let api = FakeApi::new(synced_at()).with_gate(Arc::clone(&started), Arc::clone(&release));
        let engine = Arc::new(engine(db, api, StaticIdentity::new(Some(principal()))));

        let background = {
            let engine = Arc::clone(&engine);
            tokio::spawn(async move { engine.sync_all_words().await })
        };
        started.notified().await;

        // A second attempt while the first is unresolved: rejected, not queued
        assert!(engine.status().is_syncing);
        assert!(!engine.sync_word(&word.id).await);
        assert_eq!(engine.api.sync_request_count(), 1);

        release.notify_one();
        assert!(background.await.unwrap());
        assert!(!engine.status().is_syncing);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn deleting_a_word_pushes_a_tombstone() {
        let db = DatabaseService::open_in_memory().unwrap();
        let word = haus();
        db.create_word(&word).await.unwrap();
        assert!(db.delete_word(&word.id).await.unwrap());

        let engine = engine(
            db,
            FakeApi::new(synced_at()),
            StaticIdentity::new(Some(principal())),
        );

        assert!(engine.sync_word(&word.id).await);
        let request = engine.api.last_request();
        assert_eq!(request.changes.len(), 1);
        assert!(request.changes[0].is_deleted);
        assert_eq!(request.changes[0].id, word.id.as_str());
        assert_eq!(request.changes[0].german, "");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn server_tombstones_remove_word_and_review_row() {
        let db = DatabaseService::open_in_memory().unwrap();
        let word = haus();
        db.create_word(&word).await.unwrap();
        db.upsert_review(&ReviewData::new(word.id, TranslationLanguage::English))
            .await
            .unwrap();

        let mut api = FakeApi::new(synced_at());
        api.sync_response.deleted_ids = vec![word.id.as_str()];
        let engine = engine(db.clone(), api, StaticIdentity::new(Some(principal())));

        assert!(engine.sync_all_words().await);
        assert_eq!(db.get_word(&word.id).await.unwrap(), None);
        assert_eq!(db.get_review(&word.id).await.unwrap(), None);
        assert_eq!(db.last_synced_at().await.unwrap(), Some(synced_at()));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn server_changes_overwrite_local_records_wholesale() {
        let db = DatabaseService::open_in_memory().unwrap();
        let word = haus();
        db.create_word(&word).await.unwrap();

        let mut newer = word.clone();
        newer.set_translation(TranslationLanguage::English, Some("house, home".to_string()));
        newer.touch();

        let mut api = FakeApi::new(synced_at());
        api.sync_response.server_changes = vec![echo_as_api_word(&newer)];
        let engine = engine(db.clone(), api, StaticIdentity::new(Some(principal())));

        assert!(engine.sync_word(&word.id).await);
        let stored = db.get_word(&word.id).await.unwrap().unwrap();
        assert_eq!(
            stored.translation_for(TranslationLanguage::English),
            Some("house, home")
        );
        assert_eq!(stored.updated_at, newer.updated_at);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn double_sync_is_idempotent() {
        let db = DatabaseService::open_in_memory().unwrap();
        db.create_word(&haus()).await.unwrap();

        let engine = engine(
            db.clone(),
            FakeApi::new(synced_at()),
            StaticIdentity::new(Some(principal())),
        );

        assert!(engine.sync_all_words().await);
        assert!(engine.sync_all_words().await);

        assert_eq!(engine.api.sync_request_count(), 2);
        assert_eq!(db.count_words().await.unwrap(), 1);
        assert_eq!(db.last_synced_at().await.unwrap(), Some(synced_at()));
        // The second attempt resumes from the first one's cursor
        assert_eq!(engine.api.last_request().last_sync_at, Some(synced_at()));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn empty_store_sync_all_is_a_successful_no_op() {
        let db = DatabaseService::open_in_memory().unwrap();
        let engine = engine(
            db,
            FakeApi::new(synced_at()),
            StaticIdentity::new(Some(principal())),
        );

        assert!(engine.sync_all_words().await);
        assert_eq!(engine.api.sync_request_count(), 0);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn failed_push_records_error_and_keeps_cursor() {
        let db = DatabaseService::open_in_memory().unwrap();
        let word = haus();
        db.create_word(&word).await.unwrap();

        let mut api = FakeApi::new(synced_at());
        api.fail = true;
        let engine = engine(db.clone(), api, StaticIdentity::new(Some(principal())));

        assert!(!engine.sync_word(&word.id).await);
        let status = engine.status();
        assert_eq!(
            status.sync_error.as_deref(),
            Some("Word API error: server exploded (500)")
        );
        assert!(!status.is_syncing);
        assert_eq!(db.last_synced_at().await.unwrap(), None);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn fetch_from_server_repopulates_the_store() {
        let db = DatabaseService::open_in_memory().unwrap();
        db.create_word(&Word::new("stale", WordType::Other))
            .await
            .unwrap();

        let mut api = FakeApi::new(synced_at());
        api.list_response.words = vec![echo_as_api_word(&haus()), {
            let mut verb = Word::new("laufen", WordType::Verb);
            verb.set_translation(TranslationLanguage::English, Some("to run".to_string()));
            echo_as_api_word(&verb)
        }];
        api.list_response.total = 2;
        let engine = engine(db.clone(), api, StaticIdentity::new(Some(principal())));

        assert!(engine.fetch_from_server().await);
        assert_eq!(db.count_words().await.unwrap(), 2);
        assert!(db.last_synced_at().await.unwrap().is_some());
        let words = db.all_words().await.unwrap();
        assert!(words.iter().all(|word| word.german != "stale"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn initialize_without_principal_stays_dormant() {
        let db = DatabaseService::open_in_memory().unwrap();
        let engine = engine(db, FakeApi::new(synced_at()), StaticIdentity::none());

        assert!(engine.initialize().await);
        assert_eq!(engine.api.list_calls.load(Ordering::SeqCst), 0);
        assert_eq!(engine.api.sync_request_count(), 0);
        assert!(!engine.status().is_authenticated);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn initialize_seeds_an_empty_store_exactly_once() {
        let db = DatabaseService::open_in_memory().unwrap();

        let mut api = FakeApi::new(synced_at());
        api.list_response.words = vec![echo_as_api_word(&haus())];
        api.list_response.total = 1;
        let engine = engine(db.clone(), api, StaticIdentity::new(Some(principal())));

        assert!(engine.initialize().await);
        assert_eq!(db.count_words().await.unwrap(), 1);
        assert_eq!(engine.api.list_calls.load(Ordering::SeqCst), 1);

        // Runs at most once per process lifetime
        assert!(engine.initialize().await);
        assert_eq!(engine.api.list_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn initialize_with_populated_store_skips_the_fetch() {
        let db = DatabaseService::open_in_memory().unwrap();
        db.create_word(&haus()).await.unwrap();

        let engine = engine(
            db,
            FakeApi::new(synced_at()),
            StaticIdentity::new(Some(principal())),
        );

        assert!(engine.initialize().await);
        assert_eq!(engine.api.list_calls.load(Ordering::SeqCst), 0);
        assert!(engine.status().is_authenticated);
    }
}
