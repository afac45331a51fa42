//! FormulaRecord -- one published version of a package manifest.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::checksum::Checksum;

/// One argument of a build or test command.
///
/// `Literal` is a quoted string, kept verbatim including any `#{...}`
/// interpolation. `Splat` is a splatted helper expression such as
/// `std_go_args(ldflags: "-s -w")`, stored without the leading `*`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawArg", into = "RawArg")]
pub enum CommandArg {
    Literal(String),
    Splat(String),
}

/// Serialized form: a bare string, or `{ splat = "..." }`.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawArg {
    Literal(String),
    Splat { splat: String },
}

impl From<RawArg> for CommandArg {
    fn from(raw: RawArg) -> Self {
        match raw {
            RawArg::Literal(s) => Self::Literal(s),
            RawArg::Splat { splat } => Self::Splat(splat),
        }
    }
}

impl From<CommandArg> for RawArg {
    fn from(arg: CommandArg) -> Self {
        match arg {
            CommandArg::Literal(s) => Self::Literal(s),
            CommandArg::Splat(splat) => Self::Splat { splat },
        }
    }
}

impl CommandArg {
    pub fn literal(s: impl Into<String>) -> Self {
        Self::Literal(s.into())
    }

    pub fn splat(expr: impl Into<String>) -> Self {
        Self::Splat(expr.into())
    }

    /// Returns the literal text, or `None` for a splat.
    pub fn as_literal(&self) -> Option<&str> {
        match self {
            Self::Literal(s) => Some(s),
            Self::Splat(_) => None,
        }
    }
}

impl fmt::Display for CommandArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(s) => f.write_str(s),
            Self::Splat(expr) => write!(f, "*{}", expr),
        }
    }
}

/// Formats a command as a single space-separated line for display.
pub fn format_command(args: &[CommandArg]) -> String {
    args.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Returns the program a command invokes, with any leading
/// `#{bin}/`-style interpolated directory stripped.
pub fn command_program(args: &[CommandArg]) -> Option<&str> {
    let first = args.first()?.as_literal()?;
    Some(first.rsplit('/').next().unwrap_or(first))
}

/// A versioned package manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormulaRecord {
    /// Package identifier, stable across versions (`morama`).
    pub name: String,

    /// One-line description.
    #[serde(default)]
    pub description: String,

    pub homepage: String,

    /// Archive URL, conventionally containing the version tag.
    pub source_url: String,

    pub checksum: Checksum,

    pub version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,

    /// Tools needed only while building.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub build_dependencies: Vec<String>,

    /// Packages needed by the installed binary.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub runtime_dependencies: Vec<String>,

    /// Run from the extracted source root.
    #[serde(default)]
    pub build_command: Vec<CommandArg>,

    /// Smoke test run after install; non-zero exit marks the install broken.
    #[serde(default)]
    pub test_command: Vec<CommandArg>,

    /// Where this record was loaded from (set by the loader).
    #[serde(skip)]
    pub origin: Option<PathBuf>,
}

/// Equality covers every manifest field; `origin` is bookkeeping.
impl PartialEq for FormulaRecord {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.description == other.description
            && self.homepage == other.homepage
            && self.source_url == other.source_url
            && self.checksum == other.checksum
            && self.version == other.version
            && self.license == other.license
            && self.build_dependencies == other.build_dependencies
            && self.runtime_dependencies == other.runtime_dependencies
            && self.build_command == other.build_command
            && self.test_command == other.test_command
    }
}

impl Eq for FormulaRecord {}

impl FormulaRecord {
    /// Ruby class name for this package (`foo-bar` -> `FooBar`).
    pub fn class_name(&self) -> String {
        class_name_for(&self.name)
    }

    /// Label used in diagnostics: the origin path if known, else `name@version`.
    pub fn label(&self) -> String {
        match self.origin {
            Some(ref path) => path.display().to_string(),
            None => format!("{}@{}", self.name, self.version),
        }
    }

    /// Builds the successor record for a new upstream release.
    ///
    /// Each occurrence of the old version that stands as its own token in the
    /// source URL is replaced by the new one (see [`replace_version`]). The
    /// record itself is left untouched.
    pub fn superseded_by(&self, version: impl Into<String>, checksum: Checksum) -> FormulaRecord {
        let version = version.into();
        let source_url = replace_version(&self.source_url, &self.version, &version);
        FormulaRecord {
            source_url,
            checksum,
            version,
            origin: None,
            ..self.clone()
        }
    }
}

/// Replaces `old` with `new` wherever `old` appears as a whole version in
/// `url`.
///
/// A match must not be glued to surrounding alphanumerics, so bumping `1`
/// leaves `py1` alone. A single `v` prefix is allowed (`v1.0.0`), and a match
/// followed by `.digit` is part of a longer version and is skipped.
pub fn replace_version(url: &str, old: &str, new: &str) -> String {
    if old.is_empty() {
        return url.to_string();
    }

    let mut out = String::with_capacity(url.len());
    let mut last = 0;
    for (i, _) in url.match_indices(old) {
        let end = i + old.len();
        if starts_token(&url[..i]) && ends_token(&url[end..]) {
            out.push_str(&url[last..i]);
            out.push_str(new);
            last = end;
        }
    }
    out.push_str(&url[last..]);
    out
}

fn starts_token(before: &str) -> bool {
    let mut rev = before.chars().rev();
    match rev.next() {
        None => true,
        Some('v' | 'V') => rev.next().is_none_or(|c| !c.is_alphanumeric()),
        Some(c) => !c.is_alphanumeric(),
    }
}

fn ends_token(after: &str) -> bool {
    let mut chars = after.chars();
    match chars.next() {
        None => true,
        Some('.') => !chars.next().is_some_and(|c| c.is_ascii_digit()),
        Some(c) => !c.is_alphanumeric(),
    }
}

/// Converts a package name to its Ruby class name.
///
/// `morama` -> `Morama`, `foo-bar` -> `FooBar`, `python@3` -> `PythonAT3`.
pub fn class_name_for(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = true;
    for ch in name.chars() {
        match ch {
            '-' | '_' | '.' => upper_next = true,
            '@' => {
                out.push_str("AT");
                upper_next = true;
            }
            '+' => out.push('x'),
            c if upper_next => {
                out.extend(c.to_uppercase());
                upper_next = false;
            }
            c => out.push(c),
        }
    }
    out
}

/// Converts a Ruby class name back to a package name.
///
/// `FooBar` -> `foo-bar`, `PythonAT3` -> `python@3`.
pub fn name_for_class(class: &str) -> String {
    let chars: Vec<char> = class.chars().collect();
    let mut out = String::with_capacity(class.len() + 4);
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        let at_marker = c == 'A'
            && i > 0
            && chars.get(i + 1) == Some(&'T')
            && chars.get(i + 2).is_some_and(|n| n.is_ascii_digit());
        if at_marker {
            out.push('@');
            i += 2;
            continue;
        }
        if c.is_uppercase() {
            let after_marker = out.ends_with('@');
            if i > 0 && !after_marker {
                out.push('-');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
        i += 1;
    }
    out
}

/// Builder for constructing a [`FormulaRecord`] with a fluent API.
pub struct FormulaRecordBuilder {
    record: FormulaRecord,
}

impl FormulaRecordBuilder {
    /// Starts a record with the given name; all other fields are empty.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            record: FormulaRecord {
                name: name.into(),
                description: String::new(),
                homepage: String::new(),
                source_url: String::new(),
                checksum: Checksum::sha256(""),
                version: String::new(),
                license: None,
                build_dependencies: Vec::new(),
                runtime_dependencies: Vec::new(),
                build_command: Vec::new(),
                test_command: Vec::new(),
                origin: None,
            },
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.record.description = description.into();
        self
    }

    pub fn homepage(mut self, homepage: impl Into<String>) -> Self {
        self.record.homepage = homepage.into();
        self
    }

    pub fn source_url(mut self, url: impl Into<String>) -> Self {
        self.record.source_url = url.into();
        self
    }

    pub fn checksum(mut self, checksum: Checksum) -> Self {
        self.record.checksum = checksum;
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.record.version = version.into();
        self
    }

    pub fn license(mut self, license: impl Into<String>) -> Self {
        self.record.license = Some(license.into());
        self
    }

    pub fn build_dependency(mut self, dep: impl Into<String>) -> Self {
        self.record.build_dependencies.push(dep.into());
        self
    }

    pub fn runtime_dependency(mut self, dep: impl Into<String>) -> Self {
        self.record.runtime_dependencies.push(dep.into());
        self
    }

    pub fn build_command(mut self, args: Vec<CommandArg>) -> Self {
        self.record.build_command = args;
        self
    }

    pub fn test_command(mut self, args: Vec<CommandArg>) -> Self {
        self.record.test_command = args;
        self
    }

    pub fn origin(mut self, origin: impl Into<PathBuf>) -> Self {
        self.record.origin = Some(origin.into());
        self
    }

    pub fn build(self) -> FormulaRecord {
        self.record
    }
}
