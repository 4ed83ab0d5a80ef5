use serde::{Deserialize, Serialize};
use std::path::Path;

/// Matches found in one file, in the order they occur
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMatches {
    /// Absolute path of the file
    pub path: String,
    /// Matched substrings, left to right, top to bottom
    pub matches: Vec<String>,
}

/// A file that could not be loaded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub path: String,
    pub reason: String,
}

/// Aggregate of one search run.
///
/// Serialized as `{"results": {path: [match, ...]}, "errors": [...]}`.
/// The results mapping keeps the order in which files were discovered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchReport {
    #[serde(with = "ordered_results")]
    pub results: Vec<FileMatches>,
    pub errors: Vec<ErrorRecord>,
}

impl SearchReport {
    /// Creates a new empty report
    pub fn new() -> Self {
        Default::default()
    }

    /// Records the matches of a file; files without matches are not recorded
    pub fn add_matches(&mut self, path: &Path, matches: Vec<String>) {
        if matches.is_empty() {
            return;
        }
        self.results.push(FileMatches {
            path: path.to_string_lossy().into_owned(),
            matches,
        });
    }

    /// Records a file that failed to load
    pub fn add_error(&mut self, path: &Path, reason: impl Into<String>) {
        self.errors.push(ErrorRecord {
            path: path.to_string_lossy().into_owned(),
            reason: reason.into(),
        });
    }

    /// True when there is neither a match nor an error to report
    pub fn is_empty(&self) -> bool {
        self.results.is_empty() && self.errors.is_empty()
    }

    /// Number of files with at least one match
    pub fn files_with_matches(&self) -> usize {
        self.results.len()
    }

    /// Total number of matches across all files
    pub fn total_matches(&self) -> usize {
        self.results.iter().map(|r| r.matches.len()).sum()
    }

    /// Number of files that could not be loaded
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Looks up the matches recorded for a path
    pub fn matches_for(&self, path: &str) -> Option<&[String]> {
        self.results
            .iter()
            .find(|r| r.path == path)
            .map(|r| r.matches.as_slice())
    }
}

/// Serializes the results list as a JSON object keyed by path
mod ordered_results {
    use super::FileMatches;
    use serde::de::{MapAccess, Visitor};
    use serde::ser::SerializeMap;
    use serde::{Deserializer, Serializer};
    use std::fmt;

    pub fn serialize<S: Serializer>(
        results: &[FileMatches],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(results.len()))?;
        for entry in results {
            map.serialize_entry(&entry.path, &entry.matches)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<FileMatches>, D::Error> {
        struct ResultsVisitor;

        impl<'de> Visitor<'de> for ResultsVisitor {
            type Value = Vec<FileMatches>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of file paths to matched strings")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut results = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((path, matches)) = access.next_entry::<String, Vec<String>>()? {
                    results.push(FileMatches { path, matches });
                }
                Ok(results)
            }
        }

        deserializer.deserialize_map(ResultsVisitor)
    }
}
