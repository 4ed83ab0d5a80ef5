use ignore::{DirEntry, Walk, WalkBuilder};
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use crate::errors::unify_path;
use crate::filters::should_include_file;

/// Lazily walks a directory tree and yields candidate files.
///
/// The walk is a plain recursive descent: hidden files are visited, ignore
/// files are not consulted and symbolic links to directories are not
/// followed. A link that does not resolve to a directory, dangling ones
/// included, is yielded like a file so the loader can report it. Entries
/// that cannot be read, such as directories without permission, are
/// skipped. Paths are absolute and normalized.
pub struct FileEnumerator {
    walk: Walk,
    exclude: Option<Regex>,
}

impl FileEnumerator {
    /// Starts a walk at `root`, skipping file names matched by `exclude`
    pub fn new(root: &Path, exclude: Option<Regex>) -> Self {
        let root = unify_path(root);
        debug!("Scanning directory: {}", root.display());

        let walk = WalkBuilder::new(&root)
            .standard_filters(false)
            .follow_links(false)
            .build();

        Self { walk, exclude }
    }

    fn is_regular_file(entry: &DirEntry) -> bool {
        match entry.file_type() {
            Some(ft) if ft.is_file() => true,
            Some(ft) if ft.is_symlink() => !entry.path().is_dir(),
            _ => false,
        }
    }
}

impl Iterator for FileEnumerator {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        for entry in self.walk.by_ref() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    debug!("Skipping unreadable entry: {}", err);
                    continue;
                }
            };

            if !Self::is_regular_file(&entry) {
                continue;
            }

            if should_include_file(entry.path(), self.exclude.as_ref()) {
                trace!("Candidate file: {}", entry.path().display());
                return Some(entry.into_path());
            }
        }
        None
    }
}
