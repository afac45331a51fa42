//! The package-manager runtime that consumes records.
//!
//! Fetching archives and running processes belong to an external runtime.
//! Consumers implement [`PackageRuntime`] for it; [`install`] drives one
//! record through fetch, digest verification, build, and smoke test.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::checksum::{Checksum, compute_digest};
use crate::record::{CommandArg, FormulaRecord};
use crate::validation::CommandKind;

/// Errors surfaced by a runtime or by the install pipeline.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// The archive could not be retrieved.
    #[error("fetch failed for {url}: {reason}")]
    Fetch { url: String, reason: String },

    /// The archive bytes do not hash to the expected checksum.
    #[error("checksum mismatch: expected {expected}, got {actual}")]
    DigestMismatch { expected: String, actual: String },

    /// A process could not be started.
    #[error("could not run {program}: {reason}")]
    Spawn { program: String, reason: String },

    /// The build command exited non-zero.
    #[error("build command exited with status {code}")]
    BuildFailed { code: i32 },

    /// The record has no command of the given kind.
    #[error("{0} command is empty")]
    EmptyCommand(CommandKind),
}

/// A fetched and extracted source archive.
#[derive(Debug, Clone)]
pub struct FetchedArchive {
    /// Raw archive bytes, used for digest verification.
    pub bytes: Vec<u8>,
    /// Directory the archive was extracted into.
    pub source_root: PathBuf,
}

/// Operations the external package manager provides.
pub trait PackageRuntime {
    /// Downloads and extracts the archive at `url`.
    fn fetch(&mut self, url: &str) -> Result<FetchedArchive, RuntimeError>;

    /// Checks `bytes` against the expected checksum.
    fn verify_digest(&self, bytes: &[u8], expected: &Checksum) -> Result<(), RuntimeError> {
        if expected.matches(bytes) {
            return Ok(());
        }
        Err(RuntimeError::DigestMismatch {
            expected: expected.hex.clone(),
            actual: compute_digest(bytes, expected.algorithm),
        })
    }

    /// Runs a command in `cwd` and returns its exit code.
    fn run_process(&mut self, args: &[CommandArg], cwd: &Path) -> Result<i32, RuntimeError>;
}

/// Result of a completed install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    /// Built and the smoke test passed.
    Installed,
    /// Built, but the smoke test exited non-zero.
    Broken { exit_code: i32 },
}

/// Installs one record through `runtime`.
///
/// A checksum mismatch aborts before anything is built.
pub fn install<R: PackageRuntime + ?Sized>(
    record: &FormulaRecord,
    runtime: &mut R,
) -> Result<InstallOutcome, RuntimeError> {
    if record.build_command.is_empty() {
        return Err(RuntimeError::EmptyCommand(CommandKind::Build));
    }
    if record.test_command.is_empty() {
        return Err(RuntimeError::EmptyCommand(CommandKind::Test));
    }

    info!(name = %record.name, version = %record.version, "installing");
    let archive = runtime.fetch(&record.source_url)?;
    debug!(bytes = archive.bytes.len(), "fetched archive");

    runtime.verify_digest(&archive.bytes, &record.checksum)?;

    let code = runtime.run_process(&record.build_command, &archive.source_root)?;
    if code != 0 {
        return Err(RuntimeError::BuildFailed { code });
    }

    let code = runtime.run_process(&record.test_command, &archive.source_root)?;
    if code != 0 {
        warn!(name = %record.name, code, "smoke test failed");
        return Ok(InstallOutcome::Broken { exit_code: code });
    }

    Ok(InstallOutcome::Installed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checksum::DigestAlgorithm;
    use crate::record::FormulaRecordBuilder;

    /// In-memory runtime that serves one archive and scripted exit codes.
    struct FakeRuntime {
        archive: Vec<u8>,
        exit_codes: Vec<i32>,
        fetched: Vec<String>,
        ran: Vec<Vec<CommandArg>>,
    }

    impl FakeRuntime {
        fn new(archive: &[u8], exit_codes: &[i32]) -> Self {
            Self {
                archive: archive.to_vec(),
                exit_codes: exit_codes.to_vec(),
                fetched: Vec::new(),
                ran: Vec::new(),
            }
        }
    }

    impl PackageRuntime for FakeRuntime {
        fn fetch(&mut self, url: &str) -> Result<FetchedArchive, RuntimeError> {
            self.fetched.push(url.to_string());
            Ok(FetchedArchive {
                bytes: self.archive.clone(),
                source_root: PathBuf::from("/tmp/src"),
            })
        }

        fn run_process(&mut self, args: &[CommandArg], cwd: &Path) -> Result<i32, RuntimeError> {
            assert_eq!(cwd, Path::new("/tmp/src"));
            self.ran.push(args.to_vec());
            Ok(self.exit_codes.get(self.ran.len() - 1).copied().unwrap_or(0))
        }
    }

    fn record_for(archive: &[u8]) -> FormulaRecord {
        FormulaRecordBuilder::new("morama")
            .version("v1.0.0")
            .source_url("https://example.com/v1.0.0.tar.gz")
            .checksum(Checksum::sha256(compute_digest(
                archive,
                DigestAlgorithm::Sha256,
            )))
            .build_command(vec![CommandArg::literal("go"), CommandArg::literal("build")])
            .test_command(vec![
                CommandArg::literal("#{bin}/morama"),
                CommandArg::literal("version"),
            ])
            .build()
    }

    #[test]
    fn installs_when_everything_passes() {
        let record = record_for(b"tarball");
        let mut rt = FakeRuntime::new(b"tarball", &[0, 0]);
        assert_eq!(install(&record, &mut rt).unwrap(), InstallOutcome::Installed);
        assert_eq!(rt.fetched, vec!["https://example.com/v1.0.0.tar.gz"]);
        assert_eq!(rt.ran.len(), 2);
        assert_eq!(rt.ran[0], record.build_command);
        assert_eq!(rt.ran[1], record.test_command);
    }

    #[test]
    fn digest_mismatch_aborts_before_build() {
        let record = record_for(b"expected");
        let mut rt = FakeRuntime::new(b"tampered", &[]);
        let err = install(&record, &mut rt).unwrap_err();
        assert!(matches!(err, RuntimeError::DigestMismatch { .. }));
        assert!(rt.ran.is_empty());
    }

    #[test]
    fn failing_build_is_an_error() {
        let record = record_for(b"tarball");
        let mut rt = FakeRuntime::new(b"tarball", &[2]);
        assert!(matches!(
            install(&record, &mut rt),
            Err(RuntimeError::BuildFailed { code: 2 })
        ));
        assert_eq!(rt.ran.len(), 1);
    }

    #[test]
    fn failing_smoke_test_marks_install_broken() {
        let record = record_for(b"tarball");
        let mut rt = FakeRuntime::new(b"tarball", &[0, 1]);
        assert_eq!(
            install(&record, &mut rt).unwrap(),
            InstallOutcome::Broken { exit_code: 1 }
        );
    }

    #[test]
    fn empty_commands_never_reach_the_runtime() {
        let mut record = record_for(b"tarball");
        record.build_command.clear();
        let mut rt = FakeRuntime::new(b"tarball", &[]);
        assert!(matches!(
            install(&record, &mut rt),
            Err(RuntimeError::EmptyCommand(CommandKind::Build))
        ));
        assert!(rt.fetched.is_empty());
    }
}
