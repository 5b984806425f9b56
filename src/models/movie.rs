use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Identifier for a movie, which the backend sends as either a number or a string
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MovieId {
    /// Numeric ID (e.g., TMDb's 27205)
    Numeric(u64),
    /// Any other opaque ID
    Text(String),
}

impl Display for MovieId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MovieId::Numeric(id) => write!(f, "{}", id),
            MovieId::Text(id) => write!(f, "{}", id),
        }
    }
}

/// Genres arrive either as a list of names or as one comma-joined string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Genres {
    List(Vec<String>),
    Joined(String),
}

impl Genres {
    /// Genres as a single display string, `None` when there is nothing to show
    pub fn joined(&self) -> Option<String> {
        let joined = match self {
            Genres::List(names) => names
                .iter()
                .map(|name| name.trim())
                .filter(|name| !name.is_empty())
                .collect::<Vec<_>>()
                .join(", "),
            Genres::Joined(text) => text.trim().to_string(),
        };

        if joined.is_empty() {
            None
        } else {
            Some(joined)
        }
    }
}

/// A movie as returned by the recommendation backend
///
/// Every field is optional. The client never validates these records; it
/// renders placeholders for whatever is missing and echoes the record back
/// to the backend as part of the viewing history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<MovieId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genres: Option<Genres>,
    /// Rating on a 0–10 scale
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vote_average: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tmdb_link: Option<String>,
}

impl Movie {
    /// Creates a movie with only an ID and title set
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        Self {
            id: Some(MovieId::Numeric(id)),
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn with_rating(mut self, vote_average: f64) -> Self {
        self.vote_average = Some(vote_average);
        self
    }
}
