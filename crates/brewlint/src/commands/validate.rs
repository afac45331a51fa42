//! `brewlint validate` -- check formula files for problems.
//!
//! Every file is parsed and every record validated, including the
//! cross-record duplicate check. Nothing stops at the first failure; the
//! command exits non-zero if anything at all was reported.

use anyhow::{Result, bail};
use brewlint_core::validation::{RecordReport, validate_batch};
use brewlint_manifest::{LoadFailure, load_all};
use brewlint_ui::styles::{
    render_fail, render_fail_icon, render_name_version, render_pass,
    render_pass_icon, render_violation,
};
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;
use crate::context::RuntimeContext;
use crate::output::output_json;

#[derive(Serialize)]
struct ParseFailureView {
    path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    line: Option<usize>,
    message: String,
}

impl ParseFailureView {
    fn new(failure: &LoadFailure) -> Self {
        Self {
            path: failure.path.display().to_string(),
            line: failure.error.line(),
            message: failure.error.to_string(),
        }
    }
}

#[derive(Serialize)]
struct ValidateView<'a> {
    ok: bool,
    files: usize,
    parse_errors: Vec<ParseFailureView>,
    violations: usize,
    records: &'a [RecordReport],
}

/// Execute the `brewlint validate` command.
pub fn run(ctx: &RuntimeContext, args: &ValidateArgs) -> Result<()> {
    let files = ctx.formula_files(&args.paths);
    if files.is_empty() {
        bail!("no formula files found");
    }
    info!(count = files.len(), "validating formula files");

    let (records, failures) = load_all(&files);
    let report = validate_batch(&records, &ctx.rules());

    let problems = failures.len() + report.violation_count();

    if ctx.json {
        output_json(&ValidateView {
            ok: problems == 0,
            files: files.len(),
            parse_errors: failures
                .iter()
                .map(ParseFailureView::new)
                .collect(),
            violations: report.violation_count(),
            records: &report.records,
        });
    } else {
        for failure in &failures {
            println!("{} {}", render_fail_icon(), failure.path.display());
            println!("    {}: {}", render_fail("parse_error"), failure.error);
        }
        for r in &report.records {
            let title = format!("{} ({})", r.label, render_name_version(&r.name, &r.version));
            if r.errors.is_empty() {
                if !ctx.quiet {
                    println!("{} {}", render_pass_icon(), title);
                }
                continue;
            }
            println!("{} {}", render_fail_icon(), title);
            for err in &r.errors {
                println!("    {}", render_violation(err));
            }
        }

        if !ctx.quiet || problems > 0 {
            let summary = format!(
                "{} file(s) checked, {} parse error(s), {} violation(s)",
                files.len(),
                failures.len(),
                report.violation_count()
            );
            println!();
            if problems == 0 {
                println!("{}", render_pass(&summary));
            } else {
                println!("{}", render_fail(&summary));
            }
        }
    }

    if problems > 0 {
        bail!("validation failed: {} problem(s) found", problems);
    }
    Ok(())
}
