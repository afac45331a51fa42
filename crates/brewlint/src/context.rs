//! Runtime context for command execution.
//!
//! The [`RuntimeContext`] holds what every command handler needs: global
//! flags, the working directory, and the resolved configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use brewlint_config::config::BrewlintConfig;
use brewlint_config::discovery::resolve_config;
use brewlint_core::validation::ValidationRules;
use brewlint_manifest::discover_all;
use tracing::debug;

use crate::cli::GlobalArgs;

/// Runtime context passed to every command handler.
///
/// Constructed once in `main` after CLI parsing, before command dispatch.
#[derive(Debug)]
pub struct RuntimeContext {
    /// Whether to produce JSON output.
    pub json: bool,

    /// Quiet mode: suppress non-essential output.
    pub quiet: bool,

    pub cwd: PathBuf,

    pub config: BrewlintConfig,
}

impl RuntimeContext {
    /// Build a `RuntimeContext` from parsed global arguments, loading config.
    pub fn from_global_args(global: &GlobalArgs) -> Result<Self> {
        let cwd = std::env::current_dir().context("cannot determine working directory")?;
        let config = resolve_config(global.config.as_deref(), &cwd)
            .context("failed to load configuration")?;
        debug!(?config, "resolved configuration");

        brewlint_ui::terminal::set_color_override(config.color.force());

        Ok(Self {
            json: global.json,
            quiet: global.quiet,
            cwd,
            config,
        })
    }

    /// Validation rules with config overrides applied.
    pub fn rules(&self) -> ValidationRules {
        self.config.validation_rules()
    }

    /// `path` relative to the working directory when it lies beneath it.
    pub fn relative(&self, path: &Path) -> PathBuf {
        path.strip_prefix(&self.cwd)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.to_path_buf())
    }

    /// Record files under `paths`, or under the configured formula dirs when
    /// `paths` is empty.
    pub fn formula_files(&self, paths: &[PathBuf]) -> Vec<PathBuf> {
        let found = if paths.is_empty() {
            discover_all(&self.config.resolved_formula_dirs())
        } else {
            discover_all(paths)
        };
        found.iter().map(|p| self.relative(p)).collect()
    }
}
