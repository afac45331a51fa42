//! `brewlint bump` -- write the successor record for a new release.
//!
//! Records are superseded, never edited: the new record is written to
//! stdout or to a new file, and the input is left untouched.

use std::path::Path;

use anyhow::{Context, Result, bail};
use brewlint_core::checksum::Checksum;
use brewlint_core::validation::validate_record;
use brewlint_manifest::{RecordFormat, load_record};
use brewlint_ui::styles::{render_violation, render_warn_icon};
use tracing::{info, warn};

use crate::cli::{BumpArgs, OutputFormat};
use crate::commands::digest::digest_file;
use crate::commands::render::format_record;
use crate::context::RuntimeContext;

fn output_format_for(path: &Path) -> OutputFormat {
    match RecordFormat::from_path(path) {
        RecordFormat::Ruby => OutputFormat::Rb,
        RecordFormat::Toml => OutputFormat::Toml,
        RecordFormat::Json => OutputFormat::Json,
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// Execute the `brewlint bump` command.
pub fn run(ctx: &RuntimeContext, args: &BumpArgs) -> Result<()> {
    let record = load_record(&args.path)
        .with_context(|| format!("failed to load {}", args.path.display()))?;

    if args.to == record.version {
        bail!("{} is already at version {}", record.name, record.version);
    }

    let checksum = match (&args.sha256, &args.archive) {
        (Some(hex), _) => Checksum::sha256(hex.trim().to_lowercase()),
        (None, Some(archive)) => {
            let algorithm = record.checksum.algorithm;
            Checksum::new(algorithm, digest_file(archive, algorithm)?)
        }
        (None, None) => bail!("either --sha256 or --archive is required"),
    };

    let next = record.superseded_by(args.to.as_str(), checksum);
    if next.source_url == record.source_url {
        warn!(url = %record.source_url, "source url does not contain the old version");
    }
    info!(name = %next.name, from = %record.version, to = %next.version, "bumping");

    let problems = validate_record(&next, &ctx.rules());
    if !ctx.quiet {
        for err in &problems {
            eprintln!("{} {}", render_warn_icon(), render_violation(err));
        }
    }

    let format = match args.output {
        Some(ref out) => output_format_for(out),
        None => output_format_for(&args.path),
    };
    let text = format_record(&next, format)?;

    match args.output {
        Some(ref out) => {
            if same_file(out, &args.path) {
                bail!("refusing to overwrite the record being superseded");
            }
            if out.exists() && !args.force {
                bail!("{} already exists (use --force to overwrite)", out.display());
            }
            if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("cannot create {}", parent.display()))?;
            }
            std::fs::write(out, text)
                .with_context(|| format!("cannot write {}", out.display()))?;
            if !ctx.quiet {
                println!(
                    "Wrote {} {} to {}",
                    next.name,
                    next.version,
                    out.display()
                );
            }
        }
        None => print!("{}", text),
    }

    Ok(())
}
