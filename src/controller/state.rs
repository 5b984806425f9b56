use crate::db::History;
use crate::models::{Language, Movie};

/// Suggestion shown when a lookup found nothing or failed
pub const NO_SUGGESTIONS: &str = "No results found";

/// Error shown when the backend answered without recommendations or an error
pub const NO_RECOMMENDATIONS: &str = "No recommendations found.";

/// Error shown when the recommendation request itself failed
pub const RECOMMENDATION_FAILED: &str = "Failed to fetch recommendations.";

/// Everything the view renders
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    pub query: String,
    pub language: Language,
    pub results: Vec<Movie>,
    pub loading: bool,
    pub error: Option<String>,
    pub suggestions: Vec<String>,
    pub trending: Vec<Movie>,
    pub history: History,
}

impl ViewState {
    pub fn new(language: Language, history: History) -> Self {
        Self {
            language,
            history,
            ..Self::default()
        }
    }

    /// True when the query is worth sending for recommendations
    pub fn has_query(&self) -> bool {
        !self.query.trim().is_empty()
    }

    /// True when the suggestion list is the "no results" sentinel
    pub fn has_no_suggestions(&self) -> bool {
        matches!(self.suggestions.as_slice(), [only] if only == NO_SUGGESTIONS)
    }
}

/// Controller state guarded by a single lock
pub(crate) struct ControllerInner {
    pub view: ViewState,
    /// Sequence number of the last suggestion response written to `view`
    pub applied_suggestion: u64,
    /// Sequence number of the last trending response written to `view`
    pub applied_trending: u64,
}

impl ControllerInner {
    pub fn new(view: ViewState) -> Self {
        Self {
            view,
            applied_suggestion: 0,
            applied_trending: 0,
        }
    }

    /// Stores a suggestion response unless a newer one was already stored
    pub fn apply_suggestions(&mut self, seq: u64, suggestions: Vec<String>) -> bool {
        if seq <= self.applied_suggestion {
            return false;
        }
        self.applied_suggestion = seq;
        self.view.suggestions = suggestions;
        true
    }

    /// Stores a trending response if it is for the selected language and no
    /// newer trending response was already stored
    pub fn apply_trending(&mut self, seq: u64, language: Language, trending: Vec<Movie>) -> bool {
        if seq <= self.applied_trending || self.view.language != language {
            return false;
        }
        self.applied_trending = seq;
        self.view.trending = trending;
        true
    }
}
