//! Report naming and serialization.
//!
//! The report lands in the scanned root as
//! `<YYYYMMDD_HHMM>_result_<pattern>.json`, where `<pattern>` is the match
//! pattern reduced to a short file-name-safe fragment.
use chrono::{DateTime, Local, TimeZone};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::errors::{SearchError, SearchResult};
use crate::results::SearchReport;

const MAX_FRAGMENT_LEN: usize = 15;
const FALLBACK_FRAGMENT: &str = "search";
const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M";
const JSON_INDENT: &[u8] = b"    ";

static SEPARATORS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[ .\\/|*?<>:"\n\r\t]"#).expect("separator class is valid"));
static DISALLOWED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9_-]").expect("disallowed class is valid"));
static UNDERSCORE_RUNS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"_{2,}").expect("underscore run is valid"));

/// Reduces a raw pattern to a fragment safe for use in a file name.
///
/// The result is never empty, at most 15 characters long, contains only
/// `[A-Za-z0-9_-]` and neither starts nor ends with `_`.
pub fn sanitize_pattern(raw: &str) -> String {
    let mapped = SEPARATORS.replace_all(raw, "_");
    let kept = DISALLOWED.replace_all(&mapped, "");
    let collapsed = UNDERSCORE_RUNS.replace_all(&kept, "_");

    // Only ASCII survives, so byte and char lengths agree
    let trimmed = collapsed.trim_matches('_');
    let truncated = &trimmed[..trimmed.len().min(MAX_FRAGMENT_LEN)];
    let fragment = truncated.trim_end_matches('_');

    if fragment.is_empty() {
        FALLBACK_FRAGMENT.to_string()
    } else {
        fragment.to_string()
    }
}

/// Builds `<YYYYMMDD_HHMM>_result_<fragment>.json`
pub fn report_file_name<Tz: TimeZone>(pattern: &str, timestamp: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!(
        "{}_result_{}.json",
        timestamp.format(TIMESTAMP_FORMAT),
        sanitize_pattern(pattern)
    )
}

/// Renders the report as indented UTF-8 JSON, non-ASCII text left unescaped
pub fn to_json(report: &SearchReport) -> SearchResult<String> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(JSON_INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    report.serialize(&mut serializer)?;
    buf.push(b'\n');
    // serde_json only ever emits UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Parses a report previously produced by [`to_json`]
pub fn from_json(json: &str) -> SearchResult<SearchReport> {
    Ok(serde_json::from_str(json)?)
}

/// Writes the report into `root`, named after `pattern` and the current time
pub fn write_report(report: &SearchReport, root: &Path, pattern: &str) -> SearchResult<PathBuf> {
    let file_name = report_file_name(pattern, &Local::now());
    write_report_as(report, &root.join(file_name))
}

/// Writes the report to an exact path.
///
/// The content goes to a temporary file next to the target which is then
/// renamed over it, so a failed write never leaves a truncated report.
pub fn write_report_as(report: &SearchReport, path: &Path) -> SearchResult<PathBuf> {
    let json = to_json(report)?;
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    debug!("Writing {} bytes of report to {}", json.len(), path.display());

    let mut temp = NamedTempFile::new_in(dir).map_err(|e| SearchError::report_write(path, e))?;
    temp.write_all(json.as_bytes())
        .and_then(|_| temp.flush())
        .map_err(|e| SearchError::report_write(path, e))?;
    temp.persist(path)
        .map_err(|e| SearchError::report_write(path, e.error))?;

    info!("Report written to {}", path.display());
    Ok(path.to_path_buf())
}
