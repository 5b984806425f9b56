use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;

use crate::{
    config::Config,
    db::HistoryStore,
    error::ClientResult,
    models::{Language, Movie, RecommendRequest},
    services::{
        backend::{HttpBackend, RecommenderBackend},
        debounce::Debouncer,
    },
};

pub mod state;

use state::ControllerInner;
pub use state::{ViewState, NO_RECOMMENDATIONS, NO_SUGGESTIONS, RECOMMENDATION_FAILED};

/// Owns the view state and mediates every backend call
///
/// Cheap to clone; clones share state. Suggestions, trending and
/// recommendations are independent flows that may be in flight at the same
/// time without coordinating with each other.
#[derive(Clone)]
pub struct ViewController {
    backend: Arc<dyn RecommenderBackend>,
    store: HistoryStore,
    inner: Arc<RwLock<ControllerInner>>,
    debouncer: Arc<Debouncer>,
    suggestion_seq: Arc<AtomicU64>,
    trending_seq: Arc<AtomicU64>,
}

impl ViewController {
    /// Creates a controller, loading the stored history
    pub fn new(
        backend: Arc<dyn RecommenderBackend>,
        store: HistoryStore,
        language: Language,
        suggest_debounce: Duration,
    ) -> Self {
        let history = store.load();

        Self {
            backend,
            store,
            inner: Arc::new(RwLock::new(ControllerInner::new(ViewState::new(
                language, history,
            )))),
            debouncer: Arc::new(Debouncer::new(suggest_debounce)),
            suggestion_seq: Arc::new(AtomicU64::new(0)),
            trending_seq: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Creates a controller talking to the HTTP backend described by `config`
    pub fn from_config(config: &Config) -> ClientResult<Self> {
        let backend = HttpBackend::with_timeout(config.api_base_url.clone(), config.request_timeout())?;

        Ok(Self::new(
            Arc::new(backend),
            HistoryStore::new(config.history_path.clone()),
            config.default_language,
            config.suggest_debounce(),
        ))
    }

    /// Initial load: trending for the starting language
    pub async fn start(&self) {
        let language = self.inner.read().await.view.language;
        self.fetch_trending(language).await;
    }

    /// A copy of the current view state
    pub async fn snapshot(&self) -> ViewState {
        self.inner.read().await.view.clone()
    }

    /// Updates the query and restarts the suggestion timer
    pub async fn on_input(&self, text: &str) {
        self.inner.write().await.view.query = text.to_string();

        let controller = self.clone();
        let text = text.to_string();
        self.debouncer.schedule(async move {
            controller.fetch_suggestions(&text).await;
        });
    }

    /// Waits until the pending suggestion lookup, if any, has been applied
    pub async fn wait_for_suggestions(&self) {
        self.debouncer.settle().await;
    }

    /// Looks up suggestions for `text`
    ///
    /// Empty text clears the list without a request. An empty answer or any
    /// failure leaves the single [`NO_SUGGESTIONS`] entry. Responses that
    /// arrive after a newer lookup was applied are dropped.
    pub async fn fetch_suggestions(&self, text: &str) {
        let seq = self.suggestion_seq.fetch_add(1, Ordering::SeqCst) + 1;

        let suggestions = if text.is_empty() {
            Vec::new()
        } else {
            match self.backend.suggest(text).await {
                Ok(titles) if titles.is_empty() => vec![NO_SUGGESTIONS.to_string()],
                Ok(titles) => titles,
                Err(e) => {
                    tracing::warn!(error = %e, query = %text, "Suggestion lookup failed");
                    vec![NO_SUGGESTIONS.to_string()]
                }
            }
        };

        let applied = self.inner.write().await.apply_suggestions(seq, suggestions);
        if !applied {
            tracing::debug!(query = %text, seq, "Discarded stale suggestion response");
        }
    }

    /// Switches language and refreshes trending for it
    pub async fn select_language(&self, language: Language) {
        self.inner.write().await.view.language = language;
        self.fetch_trending(language).await;
    }

    /// Refreshes the trending list; failures leave it empty and are only logged
    ///
    /// A response is dropped if its language is no longer selected or a
    /// later trending request was already applied.
    pub async fn fetch_trending(&self, language: Language) {
        let seq = self.trending_seq.fetch_add(1, Ordering::SeqCst) + 1;

        let trending = match self.backend.trending(language).await {
            Ok(movies) => movies,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    language = %language,
                    backend = self.backend.name(),
                    "Trending fetch failed"
                );
                Vec::new()
            }
        };

        let applied = self
            .inner
            .write()
            .await
            .apply_trending(seq, language, trending);
        if !applied {
            tracing::debug!(language = %language, seq, "Discarded stale trending response");
        }
    }

    /// Requests recommendations for the current query
    ///
    /// Does nothing for a blank query. Otherwise the result list is either
    /// the backend's recommendations or empty with an error message set.
    pub async fn get_recommendations(&self) {
        let request = {
            let mut inner = self.inner.write().await;
            if !inner.view.has_query() {
                return;
            }

            inner.view.loading = true;
            inner.view.error = None;
            inner.view.results.clear();

            RecommendRequest {
                title: inner.view.query.clone(),
                language: inner.view.language,
                history: inner.view.history.entries().to_vec(),
            }
        };

        let outcome = self.backend.recommend(&request).await;

        let mut inner = self.inner.write().await;
        match outcome {
            Ok(response) => match response.recommendations {
                Some(movies) if !movies.is_empty() => {
                    tracing::info!(
                        title = %request.title,
                        results = movies.len(),
                        "Recommendations received"
                    );
                    inner.view.results = movies;
                }
                _ => {
                    let message = response
                        .error
                        .filter(|error| !error.is_empty())
                        .unwrap_or_else(|| NO_RECOMMENDATIONS.to_string());
                    tracing::info!(title = %request.title, error = %message, "No recommendations");
                    inner.view.error = Some(message);
                }
            },
            Err(e) => {
                tracing::error!(
                    error = %e,
                    title = %request.title,
                    backend = self.backend.name(),
                    "Recommendation request failed"
                );
                inner.view.error = Some(RECOMMENDATION_FAILED.to_string());
            }
        }
        inner.view.loading = false;
    }

    /// Records a click in the history and persists it
    ///
    /// Returns false, changing nothing, for a movie without an ID. A failed
    /// write is logged; the in-memory history is updated regardless.
    pub async fn record_click(&self, movie: Movie) -> bool {
        let mut inner = self.inner.write().await;
        if !inner.view.history.record(movie) {
            return false;
        }

        if let Err(e) = self.store.save(&inner.view.history) {
            tracing::error!(
                error = %e,
                path = %self.store.path().display(),
                "Failed to persist viewing history"
            );
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MAX_HISTORY_ENTRIES;
    use crate::error::ClientError;
    use crate::models::{MovieId, RecommendResponse};
    use crate::services::backend::MockRecommenderBackend;
    use mockall::predicate::eq;
    use parking_lot::Mutex;
    use std::collections::VecDeque;
    use tempfile::TempDir;

    const DEBOUNCE: Duration = Duration::from_millis(500);

    fn controller_with(backend: MockRecommenderBackend) -> (ViewController, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("history.json"));
        let mut backend = backend;
        backend.expect_name().return_const("mock");
        let controller = ViewController::new(Arc::new(backend), store, Language::English, DEBOUNCE);
        (controller, dir)
    }

    fn movies(ids: &[u64]) -> Vec<Movie> {
        ids.iter().map(|id| Movie::new(*id, format!("Movie {}", id))).collect()
    }

    #[tokio::test]
    async fn test_blank_query_never_calls_backend() {
        let mut backend = MockRecommenderBackend::new();
        backend.expect_recommend().times(0);
        let (controller, _dir) = controller_with(backend);

        for query in ["", "   ", "\t\n"] {
            controller.inner.write().await.view.query = query.to_string();
            controller.get_recommendations().await;
        }

        let view = controller.snapshot().await;
        assert!(!view.loading);
        assert_eq!(view.error, None);
    }

    #[tokio::test]
    async fn test_recommendations_populate_results() {
        let mut backend = MockRecommenderBackend::new();
        backend
            .expect_recommend()
            .withf(|request| request.title == "Inception" && request.language == Language::English)
            .times(1)
            .returning(|_| {
                Ok(RecommendResponse {
                    recommendations: Some(movies(&[1, 2, 3])),
                    error: None,
                })
            });
        let (controller, _dir) = controller_with(backend);

        controller.inner.write().await.view.error = Some("stale".to_string());
        controller.inner.write().await.view.query = "Inception".to_string();
        controller.get_recommendations().await;

        let view = controller.snapshot().await;
        assert_eq!(view.results, movies(&[1, 2, 3]));
        assert_eq!(view.error, None);
        assert!(!view.loading);
    }

    #[tokio::test]
    async fn test_empty_recommendations_show_backend_error() {
        let mut backend = MockRecommenderBackend::new();
        backend.expect_recommend().returning(|_| {
            Ok(RecommendResponse {
                recommendations: Some(vec![]),
                error: Some("Movie not found".to_string()),
            })
        });
        let (controller, _dir) = controller_with(backend);

        controller.inner.write().await.view.query = "Nonexistent".to_string();
        controller.get_recommendations().await;

        let view = controller.snapshot().await;
        assert!(view.results.is_empty());
        assert_eq!(view.error.as_deref(), Some("Movie not found"));
        assert!(!view.loading);
    }

    #[tokio::test]
    async fn test_missing_recommendations_show_fallback() {
        let mut backend = MockRecommenderBackend::new();
        backend
            .expect_recommend()
            .returning(|_| Ok(RecommendResponse::default()));
        let (controller, _dir) = controller_with(backend);

        controller.inner.write().await.view.query = "Inception".to_string();
        controller.inner.write().await.view.results = movies(&[9]);
        controller.get_recommendations().await;

        let view = controller.snapshot().await;
        assert!(view.results.is_empty());
        assert_eq!(view.error.as_deref(), Some(NO_RECOMMENDATIONS));
    }

    #[tokio::test]
    async fn test_failed_request_shows_generic_error() {
        let mut backend = MockRecommenderBackend::new();
        backend.expect_recommend().returning(|_| {
            Err(ClientError::Status {
                status: 502,
                body: "Bad Gateway".to_string(),
            })
        });
        let (controller, _dir) = controller_with(backend);

        controller.inner.write().await.view.query = "Inception".to_string();
        controller.get_recommendations().await;

        let view = controller.snapshot().await;
        assert!(view.results.is_empty());
        assert_eq!(view.error.as_deref(), Some(RECOMMENDATION_FAILED));
        assert!(!view.loading);
    }

    #[tokio::test]
    async fn test_recommend_request_carries_history() {
        let mut backend = MockRecommenderBackend::new();
        backend
            .expect_recommend()
            .withf(|request| {
                request.history.len() == 2
                    && request.history[0].id == Some(MovieId::Numeric(2))
                    && request.language == Language::Hindi
            })
            .times(1)
            .returning(|_| {
                Ok(RecommendResponse {
                    recommendations: Some(movies(&[3])),
                    error: None,
                })
            });
        backend.expect_trending().returning(|_| Ok(vec![]));
        let (controller, _dir) = controller_with(backend);

        controller.record_click(Movie::new(1, "One")).await;
        controller.record_click(Movie::new(2, "Two")).await;
        controller.select_language(Language::Hindi).await;
        controller.inner.write().await.view.query = "Dangal".to_string();
        controller.get_recommendations().await;

        assert_eq!(controller.snapshot().await.results, movies(&[3]));
    }

    /// Mock backend that records every suggestion query it receives
    fn recording_suggest_backend() -> (MockRecommenderBackend, Arc<Mutex<Vec<String>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let recorded = calls.clone();

        let mut backend = MockRecommenderBackend::new();
        backend.expect_suggest().returning(move |query| {
            recorded.lock().push(query.to_string());
            Ok(vec![format!("{} result", query)])
        });
        (backend, calls)
    }

    #[tokio::test(start_paused = true)]
    async fn test_typing_within_debounce_issues_one_lookup() {
        let (backend, calls) = recording_suggest_backend();
        let (controller, _dir) = controller_with(backend);

        controller.on_input("Inc").await;
        tokio::time::sleep(Duration::from_millis(300)).await;
        controller.on_input("Incep").await;
        controller.wait_for_suggestions().await;
        tokio::time::sleep(Duration::from_secs(2)).await;

        assert_eq!(*calls.lock(), vec!["Incep".to_string()]);

        let view = controller.snapshot().await;
        assert_eq!(view.query, "Incep");
        assert_eq!(view.suggestions, vec!["Incep result".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_waiting_clone_does_not_keep_older_timer_alive() {
        let (backend, calls) = recording_suggest_backend();
        let (controller, _dir) = controller_with(backend);

        controller.on_input("Inc").await;
        let waiter = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.wait_for_suggestions().await })
        };
        tokio::time::sleep(Duration::from_millis(100)).await;
        controller.on_input("Incep").await;

        waiter.await.unwrap();
        tokio::time::sleep(Duration::from_secs(2)).await;

        assert_eq!(*calls.lock(), vec!["Incep".to_string()]);
        assert_eq!(
            controller.snapshot().await.suggestions,
            vec!["Incep result".to_string()]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_lookups_spaced_beyond_debounce_all_run() {
        let (backend, calls) = recording_suggest_backend();
        let (controller, _dir) = controller_with(backend);

        controller.on_input("Inc").await;
        tokio::time::sleep(Duration::from_millis(600)).await;
        controller.on_input("Incep").await;
        controller.wait_for_suggestions().await;

        assert_eq!(*calls.lock(), vec!["Inc".to_string(), "Incep".to_string()]);
    }

    /// Shorter queries answer later, like a prefix search on a cold index
    struct SlowSuggestBackend;

    #[async_trait::async_trait]
    impl RecommenderBackend for SlowSuggestBackend {
        async fn suggest(&self, query: &str) -> ClientResult<Vec<String>> {
            let delay = 1000 / query.len() as u64;
            tokio::time::sleep(Duration::from_millis(delay)).await;
            Ok(vec![format!("{} result", query)])
        }

        async fn trending(&self, _language: Language) -> ClientResult<Vec<Movie>> {
            Ok(vec![])
        }

        async fn recommend(&self, _request: &RecommendRequest) -> ClientResult<RecommendResponse> {
            Ok(RecommendResponse::default())
        }

        fn name(&self) -> &'static str {
            "slow"
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_suggestion_response_is_discarded() {
        let dir = tempfile::tempdir().unwrap();
        let controller = ViewController::new(
            Arc::new(SlowSuggestBackend),
            HistoryStore::new(dir.path().join("history.json")),
            Language::English,
            DEBOUNCE,
        );

        let older = controller.clone();
        let first = tokio::spawn(async move { older.fetch_suggestions("In").await });
        tokio::task::yield_now().await;
        controller.fetch_suggestions("Inception").await;
        first.await.unwrap();

        assert_eq!(
            controller.snapshot().await.suggestions,
            vec!["Inception result".to_string()]
        );
    }

    /// Answers trending requests in call order from a script of
    /// (delay, movie IDs) entries
    struct ScriptedTrendingBackend {
        script: Mutex<VecDeque<(Duration, Vec<u64>)>>,
    }

    impl ScriptedTrendingBackend {
        fn new(script: Vec<(u64, Vec<u64>)>) -> Self {
            Self {
                script: Mutex::new(
                    script
                        .into_iter()
                        .map(|(delay_ms, ids)| (Duration::from_millis(delay_ms), ids))
                        .collect(),
                ),
            }
        }
    }

    #[async_trait::async_trait]
    impl RecommenderBackend for ScriptedTrendingBackend {
        async fn suggest(&self, _query: &str) -> ClientResult<Vec<String>> {
            Ok(vec![])
        }

        async fn trending(&self, _language: Language) -> ClientResult<Vec<Movie>> {
            let (delay, ids) = self.script.lock().pop_front().unwrap_or_default();
            tokio::time::sleep(delay).await;
            Ok(movies(&ids))
        }

        async fn recommend(&self, _request: &RecommendRequest) -> ClientResult<RecommendResponse> {
            Ok(RecommendResponse::default())
        }

        fn name(&self) -> &'static str {
            "scripted"
        }
    }

    fn scripted_controller(script: Vec<(u64, Vec<u64>)>) -> (ViewController, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let controller = ViewController::new(
            Arc::new(ScriptedTrendingBackend::new(script)),
            HistoryStore::new(dir.path().join("history.json")),
            Language::English,
            DEBOUNCE,
        );
        (controller, dir)
    }

    #[tokio::test(start_paused = true)]
    async fn test_trending_for_deselected_language_is_discarded() {
        let (controller, _dir) = scripted_controller(vec![(2000, vec![1]), (10, vec![2])]);

        let slow = controller.clone();
        let first = tokio::spawn(async move { slow.select_language(Language::Tamil).await });
        tokio::task::yield_now().await;
        controller.select_language(Language::Hindi).await;
        first.await.unwrap();

        let view = controller.snapshot().await;
        assert_eq!(view.language, Language::Hindi);
        assert_eq!(view.trending, movies(&[2]));
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_trending_for_reselected_language_is_discarded() {
        let (controller, _dir) =
            scripted_controller(vec![(2000, vec![1]), (10, vec![2]), (10, vec![3])]);

        let slow = controller.clone();
        let first = tokio::spawn(async move { slow.select_language(Language::Tamil).await });
        tokio::task::yield_now().await;
        controller.select_language(Language::Hindi).await;
        controller.select_language(Language::Tamil).await;
        first.await.unwrap();

        let view = controller.snapshot().await;
        assert_eq!(view.language, Language::Tamil);
        assert_eq!(view.trending, movies(&[3]));
    }

    #[tokio::test]
    async fn test_empty_suggestions_store_sentinel() {
        let mut backend = MockRecommenderBackend::new();
        backend.expect_suggest().returning(|_| Ok(vec![]));
        let (controller, _dir) = controller_with(backend);

        controller.fetch_suggestions("zzzz").await;

        assert!(controller.snapshot().await.has_no_suggestions());
    }

    #[tokio::test]
    async fn test_failed_suggestions_store_sentinel() {
        let mut backend = MockRecommenderBackend::new();
        backend
            .expect_suggest()
            .returning(|_| Err(ClientError::Backend("index offline".to_string())));
        let (controller, _dir) = controller_with(backend);

        controller.fetch_suggestions("Inc").await;

        assert_eq!(
            controller.snapshot().await.suggestions,
            vec![NO_SUGGESTIONS.to_string()]
        );
    }

    #[tokio::test]
    async fn test_empty_text_clears_without_request() {
        let mut backend = MockRecommenderBackend::new();
        backend
            .expect_suggest()
            .times(1)
            .returning(|_| Ok(vec!["Inception".to_string()]));
        let (controller, _dir) = controller_with(backend);

        controller.fetch_suggestions("Inc").await;
        controller.fetch_suggestions("").await;

        assert!(controller.snapshot().await.suggestions.is_empty());
    }

    #[tokio::test]
    async fn test_select_language_refreshes_trending() {
        let mut backend = MockRecommenderBackend::new();
        backend
            .expect_trending()
            .with(eq(Language::Tamil))
            .times(1)
            .returning(|_| Ok(movies(&[10, 11])));
        let (controller, _dir) = controller_with(backend);

        controller.select_language(Language::Tamil).await;

        let view = controller.snapshot().await;
        assert_eq!(view.language, Language::Tamil);
        assert_eq!(view.trending, movies(&[10, 11]));
    }

    #[tokio::test]
    async fn test_trending_failure_defaults_to_empty() {
        let mut backend = MockRecommenderBackend::new();
        backend
            .expect_trending()
            .returning(|_| Err(ClientError::Backend("down".to_string())));
        let (controller, _dir) = controller_with(backend);

        controller.inner.write().await.view.trending = movies(&[1]);
        controller.start().await;

        let view = controller.snapshot().await;
        assert!(view.trending.is_empty());
        assert_eq!(view.error, None);
    }

    #[tokio::test]
    async fn test_record_click_persists_capped_history() {
        let (controller, dir) = controller_with(MockRecommenderBackend::new());

        for id in 1..=15 {
            assert!(controller.record_click(Movie::new(id, "Movie")).await);
        }
        assert!(controller.record_click(Movie::new(12, "Again")).await);

        let view = controller.snapshot().await;
        assert_eq!(view.history.len(), MAX_HISTORY_ENTRIES);
        assert_eq!(view.history.entries()[0].title.as_deref(), Some("Again"));

        let reloaded = HistoryStore::new(dir.path().join("history.json")).load();
        assert_eq!(reloaded, view.history);
    }

    #[tokio::test]
    async fn test_record_click_without_id_is_noop() {
        let (controller, dir) = controller_with(MockRecommenderBackend::new());

        assert!(!controller.record_click(Movie::default()).await);
        assert!(controller.snapshot().await.history.is_empty());
        assert!(!dir.path().join("history.json").exists());
    }

    #[tokio::test]
    async fn test_history_loaded_at_startup() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("history.json"));
        let mut history = crate::db::History::new();
        history.record(Movie::new(42, "Stored"));
        store.save(&history).unwrap();

        let controller = ViewController::new(
            Arc::new(MockRecommenderBackend::new()),
            store,
            Language::English,
            DEBOUNCE,
        );

        assert_eq!(controller.snapshot().await.history, history);
    }
}
