use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::enumerator::FileEnumerator;
use super::loader::ContentLoader;
use super::matcher::{compile_exclude, PatternMatcher};
use crate::config::SearchConfig;
use crate::errors::{SearchError, SearchResult};
use crate::report::write_report;
use crate::results::SearchReport;

/// Per-file progress, reported right after the file is processed
#[derive(Debug, Clone, Copy)]
pub enum SearchProgress<'a> {
    /// The file was decoded and searched
    Loaded { path: &'a Path, matches: usize },
    /// The file could not be loaded
    Failed { path: &'a Path, reason: &'a str },
}

impl SearchProgress<'_> {
    pub fn path(&self) -> &Path {
        match self {
            SearchProgress::Loaded { path, .. } | SearchProgress::Failed { path, .. } => path,
        }
    }
}

/// How a run ended
#[derive(Debug, Clone)]
pub enum RunSummary {
    /// Nothing matched and nothing failed; no report was written
    Empty,
    /// A report was written to `path`
    Written { path: PathBuf, report: SearchReport },
}

/// Searches the configured tree and returns the aggregated report
pub fn search(config: &SearchConfig) -> SearchResult<SearchReport> {
    search_with_progress(config, |_| {})
}

/// Searches the configured tree, reporting each processed file.
///
/// The root, both patterns and the encoding list are validated before the
/// walk starts; any of them being invalid aborts the run without touching
/// a single file. Failures to load individual files are recorded in the
/// report and never abort the run.
pub fn search_with_progress<F>(
    config: &SearchConfig,
    mut on_progress: F,
) -> SearchResult<SearchReport>
where
    F: FnMut(SearchProgress<'_>),
{
    info!("Starting search with pattern: {}", config.pattern);

    if !config.root_path.is_dir() {
        return Err(SearchError::not_a_directory(&config.root_path));
    }

    let matcher = PatternMatcher::new(&config.pattern)?;
    let exclude = config
        .exclude_pattern
        .as_deref()
        .map(compile_exclude)
        .transpose()?;
    let loader = ContentLoader::new(&config.encodings)?;
    debug!("Decoding with {:?}", loader.encoding_names());

    let mut report = SearchReport::new();
    let mut files_searched = 0usize;

    for path in FileEnumerator::new(&config.root_path, exclude) {
        files_searched += 1;
        match loader.load(&path) {
            Ok(content) => {
                let matches = matcher.find_all(&content);
                debug!("{} matches in {}", matches.len(), path.display());
                on_progress(SearchProgress::Loaded {
                    path: &path,
                    matches: matches.len(),
                });
                report.add_matches(&path, matches);
            }
            Err(err) => {
                let reason = err.to_string();
                warn!("Could not read {}: {}", path.display(), reason);
                on_progress(SearchProgress::Failed {
                    path: &path,
                    reason: &reason,
                });
                report.add_error(&path, reason);
            }
        }
    }

    info!(
        "Search completed: {} matches in {} of {} files, {} errors",
        report.total_matches(),
        report.files_with_matches(),
        files_searched,
        report.error_count()
    );

    Ok(report)
}

/// Searches and, unless the report is empty, writes it into the root
pub fn run<F>(config: &SearchConfig, on_progress: F) -> SearchResult<RunSummary>
where
    F: FnMut(SearchProgress<'_>),
{
    let report = search_with_progress(config, on_progress)?;
    if report.is_empty() {
        info!("No matches and no errors, skipping report");
        return Ok(RunSummary::Empty);
    }

    let path = write_report(&report, &config.root_path, &config.pattern)?;
    Ok(RunSummary::Written { path, report })
}
