pub mod config;
pub mod errors;
pub mod filters;
pub mod report;
pub mod results;
pub mod search;

pub use config::{CliOverrides, SearchConfig};
pub use errors::{LoadError, SearchError, SearchResult};
pub use results::{ErrorRecord, FileMatches, SearchReport};
pub use search::{run, search, search_with_progress, RunSummary, SearchProgress};
