//! Load formula records from disk (Ruby DSL, TOML, or JSON).

use std::path::Path;

use brewlint_core::record::FormulaRecord;
use tracing::debug;

use crate::dsl::parse_record;
use crate::error::{ParseError, Result};
use crate::render::check_renderable;

/// On-disk representation of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFormat {
    /// Ruby formula class (`*.rb`).
    Ruby,
    Toml,
    Json,
}

impl RecordFormat {
    /// Picks a format from the file extension. Unknown extensions are read as
    /// Ruby.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::Toml,
            Some("json") => Self::Json,
            _ => Self::Ruby,
        }
    }
}

/// Rejects records the formula DSL cannot express.
fn renderable(record: FormulaRecord, format: &'static str) -> Result<FormulaRecord> {
    check_renderable(&record).map_err(|message| ParseError::Format { format, message })?;
    Ok(record)
}

/// Parse a record from a TOML string.
///
/// The record must survive rendering as a formula class.
pub fn parse_toml(content: &str) -> Result<FormulaRecord> {
    let record = toml::from_str(content).map_err(|e| ParseError::Format {
        format: "TOML",
        message: e.to_string(),
    })?;
    renderable(record, "TOML")
}

/// Parse a record from a JSON string.
///
/// The record must survive rendering as a formula class.
pub fn parse_json(content: &str) -> Result<FormulaRecord> {
    let record = serde_json::from_str(content).map_err(|e| ParseError::Format {
        format: "JSON",
        message: e.to_string(),
    })?;
    renderable(record, "JSON")
}

/// Serialize a record as TOML.
pub fn to_toml(record: &FormulaRecord) -> Result<String> {
    toml::to_string_pretty(record).map_err(|e| ParseError::Format {
        format: "TOML",
        message: e.to_string(),
    })
}

/// Serialize a record as pretty-printed JSON.
pub fn to_json(record: &FormulaRecord) -> Result<String> {
    serde_json::to_string_pretty(record).map_err(|e| ParseError::Format {
        format: "JSON",
        message: e.to_string(),
    })
}

/// Parse `content` in the given format.
pub fn parse_str(content: &str, format: RecordFormat) -> Result<FormulaRecord> {
    match format {
        RecordFormat::Ruby => parse_record(content),
        RecordFormat::Toml => parse_toml(content),
        RecordFormat::Json => parse_json(content),
    }
}

/// Load a record from a file, choosing the parser by extension.
///
/// The returned record's `origin` is set to `path`.
pub fn load_record(path: &Path) -> Result<FormulaRecord> {
    let content = std::fs::read_to_string(path)?;
    let format = RecordFormat::from_path(path);
    debug!(path = %path.display(), ?format, "loading record");
    let mut record = parse_str(&content, format)?;
    record.origin = Some(path.to_path_buf());
    Ok(record)
}

/// A file that failed to load.
#[derive(Debug)]
pub struct LoadFailure {
    pub path: std::path::PathBuf,
    pub error: ParseError,
}

/// Loads every path, collecting failures instead of stopping at the first.
pub fn load_all<P: AsRef<Path>>(paths: &[P]) -> (Vec<FormulaRecord>, Vec<LoadFailure>) {
    let mut records = Vec::new();
    let mut failures = Vec::new();
    for path in paths {
        let path = path.as_ref();
        match load_record(path) {
            Ok(record) => records.push(record),
            Err(error) => failures.push(LoadFailure {
                path: path.to_path_buf(),
                error,
            }),
        }
    }
    (records, failures)
}

#[cfg(test)]
mod tests {
    use super::*;
    use brewlint_core::checksum::DigestAlgorithm;
    use brewlint_core::record::CommandArg;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    const FORMULA: &str = r##"class Morama < Formula
  desc "Morama CLI tool"
  homepage "https://github.com/kiku99/morama"
  url "https://github.com/kiku99/morama/archive/refs/tags/v1.0.0.tar.gz"
  sha256 "YOUR_TARBALL_SHA256"
  version "v1.0.0"
  license "MIT"

  depends_on "go" => :build

  def install
    system "go", "build", *std_go_args(ldflags: "-s -w"), "./cmd/morama"
  end

  test do
    system "#{bin}/morama", "--version"
  end
end
"##;

    #[test]
    fn parse_toml_record() {
        let toml_str = r##"
name = "morama"
description = "Morama CLI tool"
homepage = "https://github.com/kiku99/morama"
source_url = "https://github.com/kiku99/morama/archive/refs/tags/v1.0.0.tar.gz"
version = "v1.0.0"
build_dependencies = ["go"]
build_command = ["go", "build", { splat = "std_go_args" }, "."]
test_command = ["#{bin}/morama", "version"]

[checksum]
algorithm = "sha512"
hex = "abc"
"##;
        let r = parse_toml(toml_str).unwrap();
        assert_eq!(r.name, "morama");
        assert_eq!(r.checksum.algorithm, DigestAlgorithm::Sha512);
        assert_eq!(r.build_command[2], CommandArg::splat("std_go_args"));
        assert!(r.license.is_none());
    }

    #[test]
    fn parse_json_defaults_algorithm() {
        let json = r#"{
            "name": "morama",
            "homepage": "https://h",
            "source_url": "https://h/v1",
            "version": "v1",
            "checksum": {"hex": "00"}
        }"#;
        let r = parse_json(json).unwrap();
        assert_eq!(r.checksum.algorithm, DigestAlgorithm::Sha256);
        assert_eq!(r.description, "");
        assert!(r.build_command.is_empty());
    }

    #[test]
    fn malformed_json_is_a_format_error() {
        assert!(matches!(
            parse_json("{"),
            Err(ParseError::Format { format: "JSON", .. })
        ));
    }

    #[test]
    fn unrenderable_records_are_rejected_on_load() {
        let toml_str = r##"
name = "foo_bar"
description = "d"
homepage = "https://h"
source_url = "https://h/v1"
version = "v1"

[checksum]
hex = "00"
"##;
        match parse_toml(toml_str) {
            Err(ParseError::Format { format, message }) => {
                assert_eq!(format, "TOML");
                assert!(message.contains("foo_bar"), "{}", message);
            }
            other => panic!("expected a format error, got {:?}", other),
        }

        let json = r##"{
            "name": "morama",
            "description": "costs #{ money",
            "homepage": "https://h",
            "source_url": "https://h/v1",
            "version": "v1",
            "checksum": {"hex": "00"}
        }"##;
        assert!(matches!(
            parse_json(json),
            Err(ParseError::Format { format: "JSON", .. })
        ));

        let json = r#"{
            "name": "morama",
            "homepage": "https://h",
            "source_url": "https://h/v1",
            "version": "v1",
            "checksum": {"hex": "00"},
            "build_command": ["go", {"splat": "a, \"b\""}]
        }"#;
        assert!(matches!(
            parse_json(json),
            Err(ParseError::Format { format: "JSON", .. })
        ));
    }

    #[test]
    fn loaded_records_render_losslessly() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("morama.formula.toml");
        fs::write(&path, to_toml(&parse_record(FORMULA).unwrap()).unwrap()).unwrap();
        let record = load_record(&path).unwrap();
        let rendered = crate::render::render_record(&record);
        assert_eq!(rendered, FORMULA);
        assert_eq!(parse_record(&rendered).unwrap(), record);
    }

    #[test]
    fn serialized_forms_parse_back() {
        let record = parse_record(FORMULA).unwrap();
        assert_eq!(parse_toml(&to_toml(&record).unwrap()).unwrap(), record);
        assert_eq!(parse_json(&to_json(&record).unwrap()).unwrap(), record);
    }

    #[test]
    fn load_record_sets_origin_and_dispatches() {
        let dir = TempDir::new().unwrap();
        let rb = dir.path().join("morama.rb");
        fs::write(&rb, FORMULA).unwrap();
        let from_rb = load_record(&rb).unwrap();
        assert_eq!(from_rb.origin.as_deref(), Some(rb.as_path()));

        let json = dir.path().join("morama.formula.json");
        fs::write(&json, to_json(&from_rb).unwrap()).unwrap();
        let from_json = load_record(&json).unwrap();
        assert_eq!(from_json, from_rb);
        assert_eq!(from_json.origin.as_deref(), Some(json.as_path()));
    }

    #[test]
    fn load_all_keeps_going_after_failures() {
        let dir = TempDir::new().unwrap();
        let good = dir.path().join("good.rb");
        let bad = dir.path().join("bad.rb");
        let missing = dir.path().join("missing.rb");
        fs::write(&good, FORMULA).unwrap();
        fs::write(&bad, "class Bad < Formula\n  desc \"x\"\nend\n").unwrap();

        let (records, failures) = load_all(&[&bad, &good, &missing]);
        assert_eq!(records.len(), 1);
        assert_eq!(failures.len(), 2);
        assert!(matches!(failures[0].error, ParseError::MissingField("homepage")));
        assert!(matches!(failures[1].error, ParseError::Io(_)));
    }
}
