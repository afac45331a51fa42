//! Output formatting helpers for the `brewlint` CLI.

use std::io::{self, Write};

use brewlint_core::record::{FormulaRecord, format_command};
use brewlint_ui::styles::{render_muted, render_name_version};
use serde::Serialize;

/// Print a value as pretty-printed JSON to stdout.
///
/// Terminates the process with exit code 1 if serialization fails.
pub fn output_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            // Ignore broken pipe errors (e.g., piped to `head`)
            let _ = writeln!(handle, "{}", json);
        }
        Err(e) => {
            eprintln!("Error: failed to serialize JSON: {}", e);
            std::process::exit(1);
        }
    }
}

/// Format rows as an aligned table with a header and dashed separator.
pub fn format_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    if rows.is_empty() {
        return String::new();
    }

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }
    }

    let line = |cells: &mut dyn Iterator<Item = String>| -> String {
        let mut out = String::new();
        for (i, cell) in cells.enumerate() {
            if i > 0 {
                out.push_str("  ");
            }
            match widths.get(i) {
                Some(&w) => out.push_str(&format!("{:<w$}", cell)),
                None => out.push_str(&cell),
            }
        }
        out.trim_end().to_string()
    };

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(line(&mut headers.iter().map(|h| h.to_string())));
    lines.push(line(&mut widths.iter().map(|w| "-".repeat(*w))));
    for row in rows {
        lines.push(line(&mut row.iter().cloned()));
    }
    lines.join("\n")
}

/// Print a simple table with headers and rows.
pub fn output_table(headers: &[&str], rows: &[Vec<String>]) {
    let table = format_table(headers, rows);
    if !table.is_empty() {
        let _ = writeln!(io::stdout().lock(), "{}", table);
    }
}

/// Format a record in detailed multi-line view.
pub fn format_record_detail(record: &FormulaRecord) -> String {
    let mut lines = vec![render_name_version(&record.name, &record.version)];
    let mut field = |label: &str, value: String| {
        lines.push(format!("  {} {}", render_muted(&format!("{:<9}", label)), value));
    };

    field("desc", record.description.clone());
    field("homepage", record.homepage.clone());
    field("url", record.source_url.clone());
    field(record.checksum.algorithm.as_str(), record.checksum.hex.clone());
    if let Some(ref license) = record.license {
        field("license", license.clone());
    }
    let deps: Vec<String> = record
        .build_dependencies
        .iter()
        .map(|d| format!("{} (build)", d))
        .chain(record.runtime_dependencies.iter().cloned())
        .collect();
    if !deps.is_empty() {
        field("depends", deps.join(", "));
    }
    field("install", format_command(&record.build_command));
    field("test", format_command(&record.test_command));
    if let Some(ref origin) = record.origin {
        field("origin", origin.display().to_string());
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use brewlint_core::checksum::Checksum;
    use brewlint_core::record::{CommandArg, FormulaRecordBuilder};
    use pretty_assertions::assert_eq;

    #[test]
    fn table_aligns_columns() {
        let rows = vec![
            vec!["morama".into(), "v1.1.0".into()],
            vec!["foo-bar-baz".into(), "2.0".into()],
        ];
        let table = format_table(&["NAME", "VERSION"], &rows);
        assert_eq!(
            table,
            "NAME         VERSION\n-----------  -------\nmorama       v1.1.0\nfoo-bar-baz  2.0"
        );
    }

    #[test]
    fn empty_table_prints_nothing() {
        assert_eq!(format_table(&["NAME"], &[]), "");
    }

    #[test]
    fn detail_lists_fields() {
        let record = FormulaRecordBuilder::new("morama")
            .description("Morama CLI tool")
            .version("v1.0.0")
            .checksum(Checksum::sha256("ab"))
            .build_dependency("go")
            .build_command(vec![
                CommandArg::literal("go"),
                CommandArg::literal("build"),
                CommandArg::splat("std_go_args"),
            ])
            .build();
        let detail = format_record_detail(&record);
        assert!(detail.contains("morama"));
        assert!(detail.contains("Morama CLI tool"));
        assert!(detail.contains("go (build)"));
        assert!(detail.contains("go build *std_go_args"));
        assert!(!detail.contains("license"));
    }
}
