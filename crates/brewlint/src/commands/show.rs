//! `brewlint show` -- print a parsed formula record.

use anyhow::{Context, Result};
use brewlint_manifest::load_record;

use crate::cli::ShowArgs;
use crate::context::RuntimeContext;
use crate::output::{format_record_detail, output_json};

/// Execute the `brewlint show` command.
pub fn run(ctx: &RuntimeContext, args: &ShowArgs) -> Result<()> {
    let record = load_record(&args.path)
        .with_context(|| format!("failed to load {}", args.path.display()))?;

    if ctx.json {
        output_json(&record);
    } else {
        println!("{}", format_record_detail(&record));
    }
    Ok(())
}
