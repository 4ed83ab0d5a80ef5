//! File name predicates used during enumeration.
//!
//! A file is a candidate when its name ends with one of
//! [`ALLOWED_EXTENSIONS`] and the optional exclusion regex finds no match
//! anywhere in the bare file name.
use regex::Regex;
use std::path::Path;

/// File name suffixes eligible for content search. Matching is case-sensitive.
pub const ALLOWED_EXTENSIONS: &[&str] = &[
    ".java",
    ".txt",
    ".sql",
    ".yaml",
    ".properties",
    ".md",
    ".gradle",
    ".py",
];

/// Checks if a file name ends with one of the allowed extensions
pub fn has_allowed_extension(file_name: &str) -> bool {
    ALLOWED_EXTENSIONS
        .iter()
        .any(|ext| file_name.ends_with(ext))
}

/// Checks if the exclusion pattern occurs anywhere in the file name
pub fn is_excluded(file_name: &str, exclude: Option<&Regex>) -> bool {
    exclude.is_some_and(|re| re.is_match(file_name))
}

/// Determines if a file should be loaded and searched
pub fn should_include_file(path: &Path, exclude: Option<&Regex>) -> bool {
    let Some(file_name) = path.file_name() else {
        return false;
    };
    let file_name = file_name.to_string_lossy();
    has_allowed_extension(&file_name) && !is_excluded(&file_name, exclude)
}
