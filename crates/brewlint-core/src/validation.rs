//! Formula validation rules.
//!
//! [`validate_record`] checks one record in isolation and returns every
//! violation it finds. [`validate_batch`] runs it across a set of records and
//! additionally flags conflicting duplicates: two records for the same
//! package and version whose contents differ.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::record::{FormulaRecord, command_program};

/// Which command of a record a violation refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandKind {
    Build,
    Test,
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Build => f.write_str("build"),
            Self::Test => f.write_str("test"),
        }
    }
}

/// A violated invariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationError {
    #[error("checksum {value:?} is not a valid {algorithm} digest: {problem}")]
    ChecksumFormatInvalid {
        algorithm: String,
        value: String,
        problem: String,
    },

    #[error("source url {url} does not contain version {version:?}")]
    VersionMismatch { version: String, url: String },

    #[error("{which} command is empty")]
    EmptyCommand { which: CommandKind },

    #[error("build command runs `{program}` but `{dependency}` is not a declared build dependency")]
    MissingBuildDependency { program: String, dependency: String },

    #[error("description is empty")]
    EmptyDescription,

    #[error("{field} is not a valid URL: {url:?} ({reason})")]
    InvalidUrl {
        field: String,
        url: String,
        reason: String,
    },

    #[error(
        "conflicting records for {name} {version}: {other} differs in {}",
        .fields.join(", ")
    )]
    ConflictingDuplicate {
        name: String,
        version: String,
        other: String,
        fields: Vec<String>,
    },
}

impl ValidationError {
    /// Stable short code for machine-readable output.
    pub fn code(&self) -> &'static str {
        match self {
            Self::ChecksumFormatInvalid { .. } => "checksum_format_invalid",
            Self::VersionMismatch { .. } => "version_mismatch",
            Self::EmptyCommand { .. } => "empty_command",
            Self::MissingBuildDependency { .. } => "missing_build_dependency",
            Self::EmptyDescription => "empty_description",
            Self::InvalidUrl { .. } => "invalid_url",
            Self::ConflictingDuplicate { .. } => "conflicting_duplicate",
        }
    }
}

/// Tunable inputs to validation.
#[derive(Debug, Clone)]
pub struct ValidationRules {
    /// Build program -> dependency that must provide it (`cargo` -> `rust`).
    ///
    /// Programs missing from the map are not checked.
    pub toolchains: BTreeMap<String, String>,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            toolchains: default_toolchains(),
        }
    }
}

/// The built-in toolchain map.
pub fn default_toolchains() -> BTreeMap<String, String> {
    [
        ("go", "go"),
        ("cargo", "rust"),
        ("make", "make"),
        ("cmake", "cmake"),
        ("meson", "meson"),
        ("ninja", "ninja"),
        ("npm", "node"),
    ]
    .into_iter()
    .map(|(program, dep)| (program.to_string(), dep.to_string()))
    .collect()
}

/// Validates a record and returns every violation, empty if valid.
pub fn validate_record(record: &FormulaRecord, rules: &ValidationRules) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if record.description.trim().is_empty() {
        errors.push(ValidationError::EmptyDescription);
    }

    check_url(&mut errors, "homepage", &record.homepage);
    check_url(&mut errors, "url", &record.source_url);

    // Version must be embedded in the archive URL.
    if record.version.is_empty() || !record.source_url.contains(&record.version) {
        errors.push(ValidationError::VersionMismatch {
            version: record.version.clone(),
            url: record.source_url.clone(),
        });
    }

    if let Err(problem) = record.checksum.check_format() {
        errors.push(ValidationError::ChecksumFormatInvalid {
            algorithm: record.checksum.algorithm.to_string(),
            value: record.checksum.hex.clone(),
            problem: problem.to_string(),
        });
    }

    if record.build_command.is_empty() {
        errors.push(ValidationError::EmptyCommand {
            which: CommandKind::Build,
        });
    } else if let Some(program) = command_program(&record.build_command) {
        match rules.toolchains.get(program) {
            Some(dep) => {
                let declared = record
                    .build_dependencies
                    .iter()
                    .chain(&record.runtime_dependencies)
                    .any(|d| d == dep);
                if !declared {
                    errors.push(ValidationError::MissingBuildDependency {
                        program: program.to_string(),
                        dependency: dep.clone(),
                    });
                }
            }
            None => debug!(program, "no toolchain rule for build program"),
        }
    }

    if record.test_command.is_empty() {
        errors.push(ValidationError::EmptyCommand {
            which: CommandKind::Test,
        });
    }

    errors
}

fn check_url(errors: &mut Vec<ValidationError>, field: &str, raw: &str) {
    let reason = match url::Url::parse(raw) {
        Ok(parsed) if !matches!(parsed.scheme(), "http" | "https") => {
            format!("unsupported scheme {}", parsed.scheme())
        }
        Ok(parsed) if parsed.host_str().is_none_or(str::is_empty) => "missing host".to_string(),
        Ok(_) => return,
        Err(e) => e.to_string(),
    };
    errors.push(ValidationError::InvalidUrl {
        field: field.to_string(),
        url: raw.to_string(),
        reason,
    });
}

/// Names of the manifest fields in which two records differ.
pub fn differing_fields(a: &FormulaRecord, b: &FormulaRecord) -> Vec<String> {
    let mut fields = Vec::new();
    let mut diff = |name: &str, differs: bool| {
        if differs {
            fields.push(name.to_string());
        }
    };
    diff("desc", a.description != b.description);
    diff("homepage", a.homepage != b.homepage);
    diff("url", a.source_url != b.source_url);
    diff("checksum", a.checksum != b.checksum);
    diff("license", a.license != b.license);
    diff(
        "depends_on",
        a.build_dependencies != b.build_dependencies
            || a.runtime_dependencies != b.runtime_dependencies,
    );
    diff("install", a.build_command != b.build_command);
    diff("test", a.test_command != b.test_command);
    fields
}

/// Validation outcome for one record.
#[derive(Debug, Clone, Serialize)]
pub struct RecordReport {
    pub label: String,
    pub name: String,
    pub version: String,
    pub errors: Vec<ValidationError>,
}

/// Validation outcome for a batch of records.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub records: Vec<RecordReport>,
}

impl ValidationReport {
    /// Returns `true` if no record has any violation.
    pub fn is_clean(&self) -> bool {
        self.records.iter().all(|r| r.errors.is_empty())
    }

    /// Total violations across all records.
    pub fn violation_count(&self) -> usize {
        self.records.iter().map(|r| r.errors.len()).sum()
    }

    /// Reports for records that have at least one violation.
    pub fn failing(&self) -> impl Iterator<Item = &RecordReport> {
        self.records.iter().filter(|r| !r.errors.is_empty())
    }
}

/// Validates every record and cross-checks them for conflicting duplicates.
///
/// Never stops early: every record is checked and every violation reported.
/// A conflict is attached to the later record of the pair, naming the
/// earlier one.
pub fn validate_batch(records: &[FormulaRecord], rules: &ValidationRules) -> ValidationReport {
    let mut reports: Vec<RecordReport> = records
        .iter()
        .map(|r| RecordReport {
            label: r.label(),
            name: r.name.clone(),
            version: r.version.clone(),
            errors: validate_record(r, rules),
        })
        .collect();

    let mut seen: BTreeMap<(&str, &str), Vec<usize>> = BTreeMap::new();
    for (idx, record) in records.iter().enumerate() {
        let key = (record.name.as_str(), record.version.as_str());
        let earlier = seen.entry(key).or_default();
        for &prev in earlier.iter() {
            let fields = differing_fields(&records[prev], record);
            if !fields.is_empty() {
                reports[idx]
                    .errors
                    .push(ValidationError::ConflictingDuplicate {
                        name: record.name.clone(),
                        version: record.version.clone(),
                        other: records[prev].label(),
                        fields,
                    });
            }
        }
        earlier.push(idx);
    }

    ValidationReport { records: reports }
}
