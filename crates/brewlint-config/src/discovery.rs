//! Locating `brewlint.yaml`.
//!
//! The config file is found by walking up the directory tree from the
//! working directory, so running brewlint anywhere inside a tap picks up the
//! tap's settings.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::{BrewlintConfig, ConfigError, Result, load_config};

/// File names checked in each directory, in priority order.
pub const CONFIG_FILE_NAMES: &[&str] = &["brewlint.yaml", ".brewlint.yaml"];

/// Walk up from `start` looking for a config file.
///
/// Returns `None` if the filesystem root is reached without finding one.
pub fn find_config(start: &Path) -> Option<PathBuf> {
    let start = start.canonicalize().ok()?;
    let mut current = start.as_path();
    loop {
        for name in CONFIG_FILE_NAMES {
            let candidate = current.join(name);
            if candidate.is_file() {
                return Some(candidate);
            }
        }
        match current.parent() {
            Some(parent) if parent != current => current = parent,
            _ => return None,
        }
    }
}

/// Resolve the effective configuration.
///
/// An explicit path must exist. Otherwise the nearest config above `cwd` is
/// used, falling back to defaults rooted at `cwd`.
pub fn resolve_config(explicit: Option<&Path>, cwd: &Path) -> Result<BrewlintConfig> {
    if let Some(path) = explicit {
        if !path.is_file() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        return load_config(path);
    }
    match find_config(cwd) {
        Some(path) => load_config(&path),
        None => {
            debug!(cwd = %cwd.display(), "no config file found, using defaults");
            Ok(BrewlintConfig {
                base_dir: Some(cwd.to_path_buf()),
                ..BrewlintConfig::default()
            })
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
