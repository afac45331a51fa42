//! Finding formula files on disk.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

/// Suffixes recognised as record files.
pub const RECORD_SUFFIXES: &[&str] = &[".rb", ".formula.toml", ".formula.json"];

/// Returns `true` if the file name looks like a formula record.
pub fn is_record_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|name| {
            !name.starts_with('.') && RECORD_SUFFIXES.iter().any(|s| name.ends_with(s))
        })
}

/// Recursively finds record files under `root`, sorted by path.
///
/// A file path is returned as-is if it is itself a record file. Hidden
/// directories are skipped. Unreadable entries are logged and skipped.
pub fn discover(root: &Path) -> Vec<PathBuf> {
    if root.is_file() {
        return if is_record_file(root) {
            vec![root.to_path_buf()]
        } else {
            Vec::new()
        };
    }

    let mut found: Vec<PathBuf> = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| {
            e.depth() == 0
                || !e.file_type().is_dir()
                || !e.file_name().to_string_lossy().starts_with('.')
        })
        .filter_map(|entry| match entry {
            Ok(e) => Some(e),
            Err(err) => {
                warn!(error = %err, "skipping unreadable entry");
                None
            }
        })
        .filter(|e| e.file_type().is_file() && is_record_file(e.path()))
        .map(|e| e.into_path())
        .collect();
    found.sort();
    debug!(root = %root.display(), count = found.len(), "discovered records");
    found
}

/// Runs [`discover`] over several roots and removes duplicates.
pub fn discover_all<P: AsRef<Path>>(roots: &[P]) -> Vec<PathBuf> {
    let mut all: Vec<PathBuf> = roots.iter().flat_map(|r| discover(r.as_ref())).collect();
    all.sort();
    all.dedup();
    all
}
