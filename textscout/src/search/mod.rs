//! The search pipeline: enumerate candidate files, load their text,
//! match the pattern and aggregate everything into a report.
pub mod engine;
pub mod enumerator;
pub mod loader;
pub mod matcher;

pub use engine::{run, search, search_with_progress, RunSummary, SearchProgress};
pub use enumerator::FileEnumerator;
pub use loader::{ContentLoader, LoadResult};
pub use matcher::PatternMatcher;
