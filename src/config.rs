use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::models::Language;

/// Client configuration loaded from `MOVIE_REC_*` environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Recommendation backend base URL
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// File holding the recently viewed list
    #[serde(default = "default_history_path")]
    pub history_path: PathBuf,

    /// Language selected at startup
    #[serde(default)]
    pub default_language: Language,

    /// Quiet period before a suggestion lookup fires
    #[serde(default = "default_suggest_debounce_ms")]
    pub suggest_debounce_ms: u64,

    /// Per-request timeout. Requests never time out when unset.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

const ENV_PREFIX: &str = "MOVIE_REC_";

fn default_api_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_history_path() -> PathBuf {
    match dirs::data_dir() {
        Some(data_dir) => data_dir.join("movie-recommender").join("history.json"),
        None => PathBuf::from("movie_history.json"),
    }
}

fn default_suggest_debounce_ms() -> u64 {
    500
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Load configuration from an explicit set of variables
    pub fn from_vars<I>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::prefixed(ENV_PREFIX)
            .from_iter::<_, Config>(vars)
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn suggest_debounce(&self) -> Duration {
        Duration::from_millis(self.suggest_debounce_ms)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}
