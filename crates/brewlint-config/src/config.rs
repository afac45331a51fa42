//! Configuration types and loading.
//!
//! The main entry point is [`BrewlintConfig`], which represents the contents
//! of `brewlint.yaml`. Configuration is loaded with [`load_config`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use brewlint_core::checksum::DigestAlgorithm;
use brewlint_core::validation::{ValidationRules, default_toolchains};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// The configuration file contained invalid YAML.
    #[error("failed to parse config file: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// An explicitly requested config file does not exist.
    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    /// A configuration value was invalid.
    #[error("invalid configuration value for key '{key}': {reason}")]
    InvalidValue { key: String, reason: String },
}

/// A specialized `Result` type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

// ---------------------------------------------------------------------------
// Color mode
// ---------------------------------------------------------------------------

/// When to emit ANSI colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Color when stdout is a terminal and the environment allows it.
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    /// Explicit override, or `None` to let terminal detection decide.
    pub fn force(self) -> Option<bool> {
        match self {
            Self::Auto => None,
            Self::Always => Some(true),
            Self::Never => Some(false),
        }
    }
}

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Contents of `brewlint.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BrewlintConfig {
    /// Directories searched when no paths are given on the command line.
    /// Relative entries are resolved against the config file's directory.
    #[serde(default = "default_formula_dirs")]
    pub formula_dirs: Vec<PathBuf>,

    /// Extra or overriding toolchain mappings (build program -> dependency).
    /// Merged over the built-in map; an empty value removes a mapping.
    #[serde(default)]
    pub toolchains: BTreeMap<String, String>,

    /// Default algorithm for `brewlint digest`.
    #[serde(default)]
    pub digest: DigestAlgorithm,

    #[serde(default)]
    pub color: ColorMode,

    /// Directory the config was loaded from. Not serialized.
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

impl Default for BrewlintConfig {
    fn default() -> Self {
        Self {
            formula_dirs: default_formula_dirs(),
            toolchains: BTreeMap::new(),
            digest: DigestAlgorithm::default(),
            color: ColorMode::default(),
            base_dir: None,
        }
    }
}

fn default_formula_dirs() -> Vec<PathBuf> {
    vec![PathBuf::from("Formula")]
}

impl BrewlintConfig {
    /// Validation rules with this config's toolchain overrides applied.
    pub fn validation_rules(&self) -> ValidationRules {
        let mut toolchains = default_toolchains();
        for (program, dependency) in &self.toolchains {
            if dependency.trim().is_empty() {
                toolchains.remove(program);
            } else {
                toolchains.insert(program.clone(), dependency.clone());
            }
        }
        ValidationRules { toolchains }
    }

    /// Formula directories, resolved against the config's directory.
    pub fn resolved_formula_dirs(&self) -> Vec<PathBuf> {
        self.formula_dirs
            .iter()
            .map(|dir| match self.base_dir {
                Some(ref base) if dir.is_relative() => base.join(dir),
                _ => dir.clone(),
            })
            .collect()
    }

    fn check(&self) -> Result<()> {
        if self.formula_dirs.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "formula-dirs".into(),
                reason: "must list at least one directory".into(),
            });
        }
        if let Some(program) = self.toolchains.keys().find(|p| p.trim().is_empty()) {
            return Err(ConfigError::InvalidValue {
                key: "toolchains".into(),
                reason: format!("empty program name {:?}", program),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Parse config from YAML text. An empty document yields the defaults.
pub fn parse_config(content: &str) -> Result<BrewlintConfig> {
    if content.trim().is_empty() {
        return Ok(BrewlintConfig::default());
    }
    let config: BrewlintConfig = serde_yaml::from_str(content)?;
    config.check()?;
    Ok(config)
}

/// Load config from a file path.
///
/// A missing file yields the defaults, with `base_dir` still set to the
/// file's parent.
pub fn load_config(path: &Path) -> Result<BrewlintConfig> {
    let mut config = if path.exists() {
        let content = std::fs::read_to_string(path)?;
        parse_config(&content)?
    } else {
        BrewlintConfig::default()
    };
    config.base_dir = path.parent().map(Path::to_path_buf);
    debug!(path = %path.display(), "loaded config");
    Ok(config)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
