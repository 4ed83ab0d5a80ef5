use encoding_rs::{Encoding, WINDOWS_1251};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::trace;

use crate::errors::{LoadError, SearchError, SearchResult};

const BUFFER_CAPACITY: usize = 65536;

/// Bytes a code page leaves undefined even though the web tables map them
/// to C1 controls. A file containing one of them is not valid text in that
/// encoding.
fn unassigned_bytes(encoding: &'static Encoding) -> &'static [u8] {
    if encoding == WINDOWS_1251 {
        &[0x98]
    } else {
        &[]
    }
}

fn decode_strict(encoding: &'static Encoding, bytes: &[u8]) -> Option<String> {
    let unassigned = unassigned_bytes(encoding);
    if bytes.iter().any(|b| unassigned.contains(b)) {
        return None;
    }
    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(|text| text.into_owned())
}

/// Outcome of loading one file: its decoded text or the reason it failed
pub type LoadResult = Result<String, LoadError>;

/// Reads files as text, trying an ordered list of encodings.
///
/// The first encoding that decodes the whole file without a single
/// malformed sequence wins. Byte order marks are not interpreted.
#[derive(Debug, Clone)]
pub struct ContentLoader {
    encodings: Vec<&'static Encoding>,
}

impl ContentLoader {
    /// Resolves encoding labels such as `windows-1251`, `cp866` or `utf-8`
    pub fn new<S: AsRef<str>>(labels: &[S]) -> SearchResult<Self> {
        if labels.is_empty() {
            return Err(SearchError::config_error(
                "at least one encoding must be configured",
            ));
        }

        let encodings = labels
            .iter()
            .map(|label| {
                let label = label.as_ref();
                Encoding::for_label(label.trim().as_bytes())
                    .ok_or_else(|| SearchError::unknown_encoding(label))
            })
            .collect::<SearchResult<Vec<_>>>()?;

        Ok(Self { encodings })
    }

    /// Names of the encodings in the order they are attempted
    pub fn encoding_names(&self) -> Vec<&'static str> {
        self.encodings.iter().map(|e| e.name()).collect()
    }

    /// Loads a file's text content
    pub fn load(&self, path: &Path) -> LoadResult {
        let bytes = read_bytes(path)?;

        for encoding in &self.encodings {
            match decode_strict(encoding, &bytes) {
                Some(text) => {
                    trace!("Decoded {} as {}", path.display(), encoding.name());
                    return Ok(text);
                }
                None => trace!("{} is not valid {}", path.display(), encoding.name()),
            }
        }

        Err(LoadError::Undecodable)
    }
}

/// Reads the whole file; the handle is closed before returning
fn read_bytes(path: &Path) -> Result<Vec<u8>, LoadError> {
    let file = File::open(path)?;
    let mut reader = BufReader::with_capacity(BUFFER_CAPACITY, file);
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    Ok(bytes)
}
