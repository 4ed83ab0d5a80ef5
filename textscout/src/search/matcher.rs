use regex::{Regex, RegexBuilder};
use tracing::debug;

use crate::errors::{SearchError, SearchResult};

/// Compiled match pattern applied to whole-file contents.
///
/// The pattern runs in multi-line mode so `^` and `$` anchor at line
/// boundaries inside the file rather than only at its start and end.
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    regex: Regex,
}

impl PatternMatcher {
    /// Compiles the match pattern
    pub fn new(pattern: &str) -> SearchResult<Self> {
        debug!("Compiling match pattern: {}", pattern);
        let regex = RegexBuilder::new(pattern)
            .multi_line(true)
            .build()
            .map_err(|e| SearchError::invalid_pattern(e.to_string()))?;
        Ok(Self { regex })
    }

    /// The source text of the pattern
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Returns every non-overlapping match, left to right, top to bottom.
    ///
    /// Each entry is the text of the whole match. Capture groups in the
    /// pattern do not change that; `key=(\d+)` yields `"key=1"`, not `"1"`.
    pub fn find_all(&self, text: &str) -> Vec<String> {
        self.regex
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect()
    }
}

/// Compiles the file name exclusion pattern
pub fn compile_exclude(pattern: &str) -> SearchResult<Regex> {
    debug!("Compiling exclude pattern: {}", pattern);
    Regex::new(pattern).map_err(|e| SearchError::invalid_exclude_pattern(e.to_string()))
}
