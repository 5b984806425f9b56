/// Recommendation backend abstraction
///
/// The client never computes anything itself. Suggestions, trending lists and
/// recommendations all come from a remote service; this trait is the seam
/// between that service and the view controller.
use crate::{
    error::ClientResult,
    models::{Language, Movie, RecommendRequest, RecommendResponse},
};

pub mod http;

pub use http::HttpBackend;

/// Trait for recommendation backends
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RecommenderBackend: Send + Sync {
    /// Title suggestions for a partial query (`GET /suggest`)
    ///
    /// A backend-reported error object is returned as `ClientError::Backend`.
    async fn suggest(&self, query: &str) -> ClientResult<Vec<String>>;

    /// Currently popular movies for a language (`GET /trending`)
    async fn trending(&self, language: Language) -> ClientResult<Vec<Movie>>;

    /// Recommendations for a title (`POST /recommend`)
    ///
    /// Returns the decoded body even when it only carries an `error` field;
    /// deciding what to show is left to the caller.
    async fn recommend(&self, request: &RecommendRequest) -> ClientResult<RecommendResponse>;

    /// Backend name for logging and debugging
    fn name(&self) -> &'static str;
}
