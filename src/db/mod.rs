pub mod history;

pub use history::History;
pub use history::HistoryStore;
pub use history::MAX_HISTORY_ENTRIES;
