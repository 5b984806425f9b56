pub mod backend;
pub mod debounce;

pub use backend::{HttpBackend, RecommenderBackend};
pub use debounce::Debouncer;
