//! `brewlint render` -- re-emit a record in canonical form.

use anyhow::{Context, Result};
use brewlint_core::record::FormulaRecord;
use brewlint_manifest::parser::{to_json, to_toml};
use brewlint_manifest::{load_record, render_record};

use crate::cli::{OutputFormat, RenderArgs};
use crate::context::RuntimeContext;

/// Serialize `record` in the requested format.
pub fn format_record(record: &FormulaRecord, format: OutputFormat) -> Result<String> {
    let text = match format {
        OutputFormat::Rb => render_record(record),
        OutputFormat::Toml => to_toml(record)?,
        OutputFormat::Json => {
            let mut json = to_json(record)?;
            json.push('\n');
            json
        }
    };
    Ok(text)
}

/// Execute the `brewlint render` command.
pub fn run(_ctx: &RuntimeContext, args: &RenderArgs) -> Result<()> {
    let record = load_record(&args.path)
        .with_context(|| format!("failed to load {}", args.path.display()))?;
    print!("{}", format_record(&record, args.format)?);
    Ok(())
}
