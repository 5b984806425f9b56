//! Recently viewed movies, persisted as a JSON array in a single file.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::ClientResult;
use crate::models::Movie;

/// Maximum number of movies kept in the history
pub const MAX_HISTORY_ENTRIES: usize = 10;

/// Most-recent-first list of clicked movies
///
/// Holds at most [`MAX_HISTORY_ENTRIES`] movies and never the same ID twice.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct History {
    entries: Vec<Movie>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a history from stored entries, dropping ID-less entries,
    /// later duplicates and anything past the cap
    pub fn from_entries(entries: Vec<Movie>) -> Self {
        let mut normalized: Vec<Movie> = Vec::with_capacity(MAX_HISTORY_ENTRIES);

        for movie in entries {
            let Some(id) = movie.id.as_ref() else {
                continue;
            };
            if normalized.iter().any(|seen| seen.id.as_ref() == Some(id)) {
                continue;
            }
            normalized.push(movie);
            if normalized.len() == MAX_HISTORY_ENTRIES {
                break;
            }
        }

        Self {
            entries: normalized,
        }
    }

    /// Moves `movie` to the front. Returns false for movies without an ID,
    /// which are never recorded.
    pub fn record(&mut self, movie: Movie) -> bool {
        let Some(id) = movie.id.clone() else {
            return false;
        };

        self.entries.retain(|entry| entry.id.as_ref() != Some(&id));
        self.entries.insert(0, movie);
        self.entries.truncate(MAX_HISTORY_ENTRIES);
        true
    }

    pub fn entries(&self) -> &[Movie] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// File-backed storage for [`History`]
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the stored history
    ///
    /// A missing file is an empty history. So is an unreadable or corrupt
    /// one: the failure is logged and the next save overwrites the file.
    pub fn load(&self) -> History {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "No history file, starting empty");
            return History::new();
        }

        match self.read_entries() {
            Ok(entries) => {
                let history = History::from_entries(entries);
                tracing::info!(
                    path = %self.path.display(),
                    entries = history.len(),
                    "Loaded viewing history"
                );
                history
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    path = %self.path.display(),
                    "Failed to read viewing history, starting empty"
                );
                History::new()
            }
        }
    }

    fn read_entries(&self) -> ClientResult<Vec<Movie>> {
        let reader = BufReader::new(File::open(&self.path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    /// Overwrites the stored history
    pub fn save(&self, history: &History) -> ClientResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut writer = BufWriter::new(File::create(&self.path)?);
        serde_json::to_writer(&mut writer, history.entries())?;
        writer.flush()?;

        tracing::debug!(
            path = %self.path.display(),
            entries = history.len(),
            "Saved viewing history"
        );
        Ok(())
    }
}
