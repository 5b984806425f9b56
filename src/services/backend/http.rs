/// HTTP backend speaking the recommender service's JSON API
///
/// Endpoints:
/// 1. `GET  /suggest?query=<text>`      → `string[]` or `{error}`
/// 2. `GET  /trending?language=<code>`  → `Movie[]`
/// 3. `POST /recommend`                 → `{recommendations}` or `{error}`
use std::time::Duration;

use reqwest::{Client as HttpClient, Response};

use crate::{
    error::{ClientError, ClientResult},
    models::{Language, Movie, RecommendRequest, RecommendResponse, SuggestResponse},
    services::backend::RecommenderBackend,
};

#[derive(Clone)]
pub struct HttpBackend {
    http_client: HttpClient,
    api_url: String,
}

impl HttpBackend {
    pub fn new(api_url: impl Into<String>) -> ClientResult<Self> {
        Self::with_timeout(api_url, None)
    }

    /// Creates a backend whose requests give up after `timeout`
    pub fn with_timeout(api_url: impl Into<String>, timeout: Option<Duration>) -> ClientResult<Self> {
        let mut builder = HttpClient::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http_client: builder.build()?,
            api_url: api_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path)
    }

    /// Turns a non-success status into `ClientError::Status`
    async fn ensure_success(response: Response) -> ClientResult<Response> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(ClientError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait::async_trait]
impl RecommenderBackend for HttpBackend {
    async fn suggest(&self, query: &str) -> ClientResult<Vec<String>> {
        let response = self
            .http_client
            .get(self.endpoint("suggest"))
            .query(&[("query", query)])
            .send()
            .await?;
        let response = Self::ensure_success(response).await?;

        let body = response.text().await?;
        match serde_json::from_str::<SuggestResponse>(&body)? {
            SuggestResponse::Titles(titles) => {
                tracing::debug!(query = %query, results = titles.len(), "Suggestions fetched");
                Ok(titles)
            }
            SuggestResponse::Error { error } => Err(ClientError::Backend(error)),
        }
    }

    async fn trending(&self, language: Language) -> ClientResult<Vec<Movie>> {
        let response = self
            .http_client
            .get(self.endpoint("trending"))
            .query(&[("language", language.code())])
            .send()
            .await?;
        let response = Self::ensure_success(response).await?;

        let body = response.text().await?;
        let movies: Vec<Movie> = serde_json::from_str(&body)?;

        tracing::info!(
            language = %language,
            results = movies.len(),
            backend = self.name(),
            "Trending fetched"
        );

        Ok(movies)
    }

    async fn recommend(&self, request: &RecommendRequest) -> ClientResult<RecommendResponse> {
        let response = self
            .http_client
            .post(self.endpoint("recommend"))
            .json(request)
            .send()
            .await?;

        // The backend reports "not found" and bad input as `{error}` with a
        // 4xx status, so the body is decoded regardless of status.
        let status = response.status();
        let body = response.text().await?;
        let decoded: RecommendResponse = match serde_json::from_str(&body) {
            Ok(decoded) => decoded,
            Err(_) if !status.is_success() => {
                return Err(ClientError::Status {
                    status: status.as_u16(),
                    body,
                })
            }
            Err(e) => return Err(e.into()),
        };

        tracing::info!(
            title = %request.title,
            language = %request.language,
            status = status.as_u16(),
            results = decoded.recommendations.as_ref().map_or(0, Vec::len),
            backend = self.name(),
            "Recommendations fetched"
        );

        Ok(decoded)
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
