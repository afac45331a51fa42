//! `brewlint digest` -- hash a local archive.
//!
//! With `--against FORMULA`, the archive is hashed with the formula's
//! algorithm and compared to its declared checksum, the same check the
//! package manager performs after fetching.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result, bail};
use brewlint_core::checksum::{DigestAlgorithm, digest_reader};
use brewlint_manifest::load_record;
use brewlint_ui::styles::{render_fail_icon, render_pass_icon};
use serde::Serialize;

use crate::cli::{AlgorithmArg, DigestArgs};
use crate::context::RuntimeContext;
use crate::output::output_json;

impl From<AlgorithmArg> for DigestAlgorithm {
    fn from(arg: AlgorithmArg) -> Self {
        match arg {
            AlgorithmArg::Sha256 => DigestAlgorithm::Sha256,
            AlgorithmArg::Sha512 => DigestAlgorithm::Sha512,
        }
    }
}

/// Hash the file at `path`.
pub fn digest_file(path: &Path, algorithm: DigestAlgorithm) -> Result<String> {
    let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
    digest_reader(BufReader::new(file), algorithm)
        .with_context(|| format!("failed to read {}", path.display()))
}

#[derive(Serialize)]
struct DigestView {
    file: String,
    algorithm: DigestAlgorithm,
    digest: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    expected: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    matches: Option<bool>,
}

/// Execute the `brewlint digest` command.
pub fn run(ctx: &RuntimeContext, args: &DigestArgs) -> Result<()> {
    let expected = match args.against {
        Some(ref formula) => Some(
            load_record(formula)
                .with_context(|| format!("failed to load {}", formula.display()))?
                .checksum,
        ),
        None => None,
    };
    let algorithm = match (&expected, args.algorithm) {
        (Some(checksum), _) => checksum.algorithm,
        (None, Some(arg)) => arg.into(),
        (None, None) => ctx.config.digest,
    };

    let digest = digest_file(&args.file, algorithm)?;
    let matches = expected.as_ref().map(|c| c.hex == digest);

    if ctx.json {
        output_json(&DigestView {
            file: args.file.display().to_string(),
            algorithm,
            digest: digest.clone(),
            expected: expected.as_ref().map(|c| c.hex.clone()),
            matches,
        });
    } else {
        println!("{}  {}", digest, args.file.display());
        match (matches, &expected) {
            (Some(true), _) if !ctx.quiet => {
                println!("{} matches the declared {}", render_pass_icon(), algorithm);
            }
            (Some(false), Some(checksum)) => {
                println!(
                    "{} does not match the declared {} {}",
                    render_fail_icon(),
                    algorithm,
                    checksum.hex
                );
            }
            _ => {}
        }
    }

    if matches == Some(false) {
        bail!("checksum mismatch for {}", args.file.display());
    }
    Ok(())
}
