//! `brewlint latest` -- newest record of each package.

use anyhow::{Result, bail};
use brewlint_core::record::FormulaRecord;
use brewlint_core::resolve::{latest_by_name, resolve_latest};
use brewlint_manifest::load_all;
use brewlint_ui::styles::render_warn_icon;
use serde::Serialize;
use tracing::warn;

use crate::cli::LatestArgs;
use crate::context::RuntimeContext;
use crate::output::{output_json, output_table};

#[derive(Serialize)]
struct LatestView<'a> {
    name: &'a str,
    version: &'a str,
    source_url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    origin: Option<String>,
}

impl<'a> LatestView<'a> {
    fn new(record: &'a FormulaRecord) -> Self {
        Self {
            name: &record.name,
            version: &record.version,
            source_url: &record.source_url,
            origin: record.origin.as_ref().map(|p| p.display().to_string()),
        }
    }
}

/// Execute the `brewlint latest` command.
pub fn run(ctx: &RuntimeContext, args: &LatestArgs) -> Result<()> {
    let files = ctx.formula_files(&args.paths);
    let (records, failures) = load_all(&files);
    for failure in &failures {
        warn!(path = %failure.path.display(), error = %failure.error, "skipping unparseable file");
        if !ctx.quiet && !ctx.json {
            eprintln!(
                "{} skipping {}: {}",
                render_warn_icon(),
                failure.path.display(),
                failure.error
            );
        }
    }

    let line: Vec<FormulaRecord>;
    let winners: Vec<&FormulaRecord>;
    match args.name {
        Some(ref name) => {
            line = records.into_iter().filter(|r| &r.name == name).collect();
            if line.is_empty() {
                bail!("no records found for package '{}'", name);
            }
            winners = vec![resolve_latest(&line)?];
        }
        None => {
            line = records;
            winners = latest_by_name(&line).into_values().collect();
        }
    }

    if winners.is_empty() {
        bail!("no formula records found");
    }

    if ctx.json {
        let views: Vec<LatestView> = winners.iter().map(|r| LatestView::new(r)).collect();
        output_json(&views);
    } else {
        let rows: Vec<Vec<String>> = winners
            .iter()
            .map(|r| {
                vec![
                    r.name.clone(),
                    r.version.clone(),
                    r.origin
                        .as_ref()
                        .map(|p| p.display().to_string())
                        .unwrap_or_default(),
                ]
            })
            .collect();
        output_table(&["NAME", "VERSION", "SOURCE"], &rows);
    }
    Ok(())
}
