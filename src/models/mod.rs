use serde::{Deserialize, Serialize};

pub mod language;
pub mod movie;

pub use language::Language;
pub use movie::{Genres, Movie, MovieId};

// ============================================================================
// Backend API Types
// ============================================================================

/// Body of `POST /recommend`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendRequest {
    pub title: String,
    pub language: Language,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub history: Vec<Movie>,
}

/// Response of `POST /recommend`, either `{recommendations}` or `{error}`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RecommendResponse {
    #[serde(default)]
    pub recommendations: Option<Vec<Movie>>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Response of `GET /suggest`, a list of titles or an error object
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum SuggestResponse {
    Titles(Vec<String>),
    Error { error: String },
}
