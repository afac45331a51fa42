//! Parser for the Ruby formula DSL.
//!
//! Accepts the subset of the Homebrew DSL that maps onto a
//! [`FormulaRecord`] without loss: the metadata stanzas, `depends_on`, and
//! `def install` / `test do` blocks holding a single `system` call each.
//! Anything else is rejected as unsupported rather than silently dropped.

use brewlint_core::checksum::{Checksum, DigestAlgorithm};
use brewlint_core::record::{CommandArg, FormulaRecord, name_for_class};
use tracing::trace;

use crate::error::{ParseError, Result};
use crate::lexer::{parse_string_literal, split_args, strip_comment};

/// One logical line: comment stripped, trimmed, continuation lines joined.
struct Statement {
    line: usize,
    text: String,
}

/// Splits source into statements. A line ending in `,` continues onto the next.
fn statements(src: &str) -> Result<Vec<Statement>> {
    let mut out: Vec<Statement> = Vec::new();
    let mut pending: Option<Statement> = None;

    for (idx, raw) in src.lines().enumerate() {
        let line = idx + 1;
        let code = strip_comment(raw)
            .map_err(|m| ParseError::syntax(line, m))?
            .trim();
        if code.is_empty() {
            continue;
        }
        let stmt = match pending.take() {
            Some(mut prev) => {
                prev.text.push(' ');
                prev.text.push_str(code);
                prev
            }
            None => Statement {
                line,
                text: code.to_string(),
            },
        };
        if stmt.text.ends_with(',') {
            pending = Some(stmt);
        } else {
            out.push(stmt);
        }
    }

    if let Some(stmt) = pending {
        return Err(ParseError::syntax(stmt.line, "statement ends with a trailing comma"));
    }
    Ok(out)
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Block {
    Install,
    Test,
}

impl Block {
    fn name(self) -> &'static str {
        match self {
            Self::Install => "def install",
            Self::Test => "test do",
        }
    }
}

/// Fields collected while walking the class body.
#[derive(Default)]
struct Fields {
    class: Option<String>,
    desc: Option<String>,
    homepage: Option<String>,
    url: Option<String>,
    checksum: Option<Checksum>,
    version: Option<String>,
    license: Option<String>,
    build_dependencies: Vec<String>,
    runtime_dependencies: Vec<String>,
    build_command: Option<Vec<CommandArg>>,
    test_command: Option<Vec<CommandArg>>,
    seen_install: bool,
    seen_test: bool,
}

/// Parses the DSL text of a formula into a record.
pub fn parse_record(src: &str) -> Result<FormulaRecord> {
    let mut fields = Fields::default();
    let mut block: Option<Block> = None;
    let mut closed = false;

    for stmt in statements(src)? {
        let line = stmt.line;
        let text = stmt.text.as_str();
        trace!(line, text, "statement");

        if closed {
            return Err(ParseError::unsupported(line, text));
        }

        if fields.class.is_none() {
            fields.class = Some(parse_class_line(line, text)?);
            continue;
        }

        if text == "end" {
            match block.take() {
                Some(_) => {}
                None => closed = true,
            }
            continue;
        }

        match block {
            Some(b) => parse_block_statement(&mut fields, b, line, text)?,
            None => {
                if let Some(b) = parse_top_level(&mut fields, line, text)? {
                    block = Some(b);
                }
            }
        }
    }

    if let Some(b) = block {
        return Err(ParseError::UnclosedBlock(b.name()));
    }
    let class = fields.class.ok_or(ParseError::MissingField("class"))?;
    if !closed {
        return Err(ParseError::UnclosedBlock("class"));
    }

    Ok(FormulaRecord {
        name: name_for_class(&class),
        description: fields.desc.ok_or(ParseError::MissingField("desc"))?,
        homepage: fields.homepage.ok_or(ParseError::MissingField("homepage"))?,
        source_url: fields.url.ok_or(ParseError::MissingField("url"))?,
        checksum: fields.checksum.ok_or(ParseError::MissingField("sha256"))?,
        version: fields.version.ok_or(ParseError::MissingField("version"))?,
        license: fields.license,
        build_dependencies: fields.build_dependencies,
        runtime_dependencies: fields.runtime_dependencies,
        build_command: fields.build_command.unwrap_or_default(),
        test_command: fields.test_command.unwrap_or_default(),
        origin: None,
    })
}

/// `class Morama < Formula` -> `Morama`.
fn parse_class_line(line: usize, text: &str) -> Result<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    match words.as_slice() {
        ["class", name, "<", "Formula"] if is_constant(name) => Ok(name.to_string()),
        ["class", ..] => Err(ParseError::syntax(
            line,
            format!("expected `class Name < Formula`, found `{}`", text),
        )),
        _ => Err(ParseError::syntax(
            line,
            format!("expected a formula class definition, found `{}`", text),
        )),
    }
}

fn is_constant(s: &str) -> bool {
    let mut chars = s.chars();
    chars.next().is_some_and(|c| c.is_ascii_uppercase())
        && chars.all(|c| c.is_ascii_alphanumeric())
}

/// Splits `keyword rest` at the first whitespace.
fn split_keyword(text: &str) -> (&str, &str) {
    match text.split_once(char::is_whitespace) {
        Some((kw, rest)) => (kw, rest.trim()),
        None => (text, ""),
    }
}

/// Reads the single string argument of a metadata stanza.
fn single_string(line: usize, keyword: &str, rest: &str) -> Result<String> {
    let args = split_args(rest).map_err(|m| ParseError::syntax(line, m))?;
    match args.as_slice() {
        [arg] => parse_string_literal(arg).map_err(|m| ParseError::syntax(line, m)),
        _ => Err(ParseError::syntax(
            line,
            format!("`{}` takes exactly one string argument", keyword),
        )),
    }
}

fn set_once<T>(slot: &mut Option<T>, value: T, line: usize, keyword: &str) -> Result<()> {
    if slot.is_some() {
        return Err(ParseError::Duplicate {
            line,
            keyword: keyword.to_string(),
        });
    }
    *slot = Some(value);
    Ok(())
}

/// Handles a statement directly inside the class body. Returns the block it
/// opens, if any.
fn parse_top_level(fields: &mut Fields, line: usize, text: &str) -> Result<Option<Block>> {
    if text == "def install" {
        if std::mem::replace(&mut fields.seen_install, true) {
            return Err(ParseError::Duplicate {
                line,
                keyword: "def install".into(),
            });
        }
        return Ok(Some(Block::Install));
    }
    if text == "test do" {
        if std::mem::replace(&mut fields.seen_test, true) {
            return Err(ParseError::Duplicate {
                line,
                keyword: "test do".into(),
            });
        }
        return Ok(Some(Block::Test));
    }

    let (keyword, rest) = split_keyword(text);
    match keyword {
        "desc" => set_once(&mut fields.desc, single_string(line, keyword, rest)?, line, keyword)?,
        "homepage" => set_once(
            &mut fields.homepage,
            single_string(line, keyword, rest)?,
            line,
            keyword,
        )?,
        "url" => set_once(&mut fields.url, single_string(line, keyword, rest)?, line, keyword)?,
        "version" => set_once(
            &mut fields.version,
            single_string(line, keyword, rest)?,
            line,
            keyword,
        )?,
        "sha256" | "sha512" => {
            let algorithm = DigestAlgorithm::from_keyword(keyword).unwrap_or_default();
            let hex = single_string(line, keyword, rest)?;
            set_once(
                &mut fields.checksum,
                Checksum::new(algorithm, hex),
                line,
                "sha256",
            )?;
        }
        "license" => {
            let value = if rest.starts_with(':') && !rest.contains(char::is_whitespace) {
                rest.to_string()
            } else {
                single_string(line, keyword, rest)?
            };
            set_once(&mut fields.license, value, line, keyword)?;
        }
        "depends_on" => parse_depends_on(fields, line, rest)?,
        _ => return Err(ParseError::unsupported(line, text)),
    }
    Ok(None)
}

/// `depends_on "go" => :build` or `depends_on "sqlite"`.
fn parse_depends_on(fields: &mut Fields, line: usize, rest: &str) -> Result<()> {
    let (name, kind) = match rest.split_once("=>") {
        Some((name, kind)) => (name.trim(), Some(kind.trim())),
        None => (rest, None),
    };
    let name = parse_string_literal(name).map_err(|m| ParseError::syntax(line, m))?;
    match kind {
        None => fields.runtime_dependencies.push(name),
        Some(":build") => fields.build_dependencies.push(name),
        Some(other) => {
            return Err(ParseError::unsupported(
                line,
                &format!("depends_on {:?} => {}", name, other),
            ));
        }
    }
    Ok(())
}

fn parse_block_statement(fields: &mut Fields, block: Block, line: usize, text: &str) -> Result<()> {
    let (keyword, rest) = split_keyword(text);
    if keyword != "system" {
        return Err(ParseError::unsupported(line, text));
    }
    let command = parse_command(line, rest)?;
    let slot = match block {
        Block::Install => &mut fields.build_command,
        Block::Test => &mut fields.test_command,
    };
    set_once(slot, command, line, "system")
}

/// Parses the argument list of a `system` call.
fn parse_command(line: usize, rest: &str) -> Result<Vec<CommandArg>> {
    let args = split_args(rest).map_err(|m| ParseError::syntax(line, m))?;
    if args.is_empty() {
        return Err(ParseError::syntax(line, "`system` needs at least one argument"));
    }
    args.into_iter()
        .map(|arg| match arg.strip_prefix('*') {
            Some(expr) if !expr.trim().is_empty() => Ok(CommandArg::splat(expr.trim())),
            Some(_) => Err(ParseError::syntax(line, "empty splat argument")),
            None => parse_string_literal(arg)
                .map(CommandArg::Literal)
                .map_err(|m| ParseError::syntax(line, m)),
        })
        .collect()
}
