//! Canonical DSL rendering.
//!
//! Output is stable: stanzas always appear in the same order with the same
//! spacing, so rendering a parsed file yields a record equal to the input.

use std::fmt::Write;

use brewlint_core::record::{CommandArg, FormulaRecord, name_for_class};

use crate::dsl::parse_record;
use crate::lexer::{parse_string_literal, quote_string, split_args};

const INDENT: &str = "  ";

fn render_args(args: &[CommandArg]) -> String {
    args.iter()
        .map(|arg| match arg {
            CommandArg::Literal(s) => quote_string(s),
            CommandArg::Splat(expr) => format!("*{}", expr),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Renders a record as a Ruby formula class.
///
/// Blocks with an empty command are left out entirely.
pub fn render_record(record: &FormulaRecord) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = write_record(&mut out, record);
    out
}

/// Checks that `record` survives rendering: the rendered text must parse
/// back into an equal record.
///
/// Records read from the DSL always pass. TOML and JSON records can hold
/// names, strings, and splats the DSL cannot express, and are rejected with
/// a message naming the offending field.
pub fn check_renderable(record: &FormulaRecord) -> Result<(), String> {
    let class = record.class_name();
    let back = name_for_class(&class);
    if record.name.is_empty() || back != record.name {
        return Err(format!(
            "name `{}` does not survive as a class name (`{}` reads back as `{}`)",
            record.name, class, back
        ));
    }

    let mut literals: Vec<(&str, &str)> = vec![
        ("description", record.description.as_str()),
        ("homepage", record.homepage.as_str()),
        ("source_url", record.source_url.as_str()),
        ("checksum", record.checksum.hex.as_str()),
        ("version", record.version.as_str()),
    ];
    if let Some(ref license) = record.license {
        if !license.starts_with(':') {
            literals.push(("license", license.as_str()));
        }
    }
    for dep in record.build_dependencies.iter().chain(&record.runtime_dependencies) {
        literals.push(("dependency", dep.as_str()));
    }

    let mut splats = Vec::new();
    for arg in record.build_command.iter().chain(&record.test_command) {
        match arg {
            CommandArg::Literal(s) => literals.push(("command argument", s.as_str())),
            CommandArg::Splat(expr) => splats.push(expr.as_str()),
        }
    }

    for (field, value) in literals {
        if parse_string_literal(&quote_string(value)).ok().as_deref() != Some(value) {
            return Err(format!("{} `{}` has an unbalanced `#{{` interpolation", field, value));
        }
    }
    for expr in splats {
        match split_args(expr) {
            Ok(parts) if parts == [expr] => {}
            _ => return Err(format!("splat `{}` is not a single expression", expr)),
        }
    }

    match parse_record(&render_record(record)) {
        Ok(parsed) if parsed == *record => Ok(()),
        Ok(_) => Err("record changes when rendered as a formula".to_string()),
        Err(e) => Err(format!("rendered formula does not parse: {}", e)),
    }
}

fn write_record(out: &mut String, r: &FormulaRecord) -> std::fmt::Result {
    writeln!(out, "class {} < Formula", r.class_name())?;
    writeln!(out, "{INDENT}desc {}", quote_string(&r.description))?;
    writeln!(out, "{INDENT}homepage {}", quote_string(&r.homepage))?;
    writeln!(out, "{INDENT}url {}", quote_string(&r.source_url))?;
    writeln!(
        out,
        "{INDENT}{} {}",
        r.checksum.algorithm.as_str(),
        quote_string(&r.checksum.hex)
    )?;
    writeln!(out, "{INDENT}version {}", quote_string(&r.version))?;
    if let Some(ref license) = r.license {
        if license.starts_with(':') {
            writeln!(out, "{INDENT}license {}", license)?;
        } else {
            writeln!(out, "{INDENT}license {}", quote_string(license))?;
        }
    }

    if !r.build_dependencies.is_empty() || !r.runtime_dependencies.is_empty() {
        writeln!(out)?;
        for dep in &r.build_dependencies {
            writeln!(out, "{INDENT}depends_on {} => :build", quote_string(dep))?;
        }
        for dep in &r.runtime_dependencies {
            writeln!(out, "{INDENT}depends_on {}", quote_string(dep))?;
        }
    }

    if !r.build_command.is_empty() {
        writeln!(out)?;
        writeln!(out, "{INDENT}def install")?;
        writeln!(out, "{INDENT}{INDENT}system {}", render_args(&r.build_command))?;
        writeln!(out, "{INDENT}end")?;
    }

    if !r.test_command.is_empty() {
        writeln!(out)?;
        writeln!(out, "{INDENT}test do")?;
        writeln!(out, "{INDENT}{INDENT}system {}", render_args(&r.test_command))?;
        writeln!(out, "{INDENT}end")?;
    }

    writeln!(out, "end")
}
