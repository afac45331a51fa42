//! Clap CLI definitions for the `brewlint` command.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

/// brewlint -- validate, render, and bump Homebrew formula files.
#[derive(Parser, Debug)]
#[command(
    name = "brewlint",
    about = "Validate, render, and bump Homebrew formula files",
    version,
    propagate_version = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Global flags available to all subcommands.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Output in JSON format.
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose/debug output.
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output (errors only).
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    /// Config file (default: nearest brewlint.yaml above the working directory).
    #[arg(long, global = true, env = "BREWLINT_CONFIG")]
    pub config: Option<PathBuf>,
}

/// All available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check formula files and report every problem found.
    #[command(alias = "lint")]
    Validate(ValidateArgs),

    /// Show a parsed formula record.
    Show(ShowArgs),

    /// Re-emit a formula record in canonical form.
    Render(RenderArgs),

    /// Show the newest record of each package.
    Latest(LatestArgs),

    /// Compute the digest of a local archive.
    Digest(DigestArgs),

    /// Write the successor record for a new release.
    Bump(BumpArgs),

    /// Print version information.
    Version,

    /// Generate shell completions.
    Completion(CompletionArgs),
}

// ---------------------------------------------------------------------------
// Validate / Latest
// ---------------------------------------------------------------------------

/// Arguments for `brewlint validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Files or directories to check (default: configured formula dirs).
    pub paths: Vec<PathBuf>,
}

/// Arguments for `brewlint latest`.
#[derive(Args, Debug)]
pub struct LatestArgs {
    /// Files or directories to search (default: configured formula dirs).
    pub paths: Vec<PathBuf>,

    /// Only resolve this package.
    #[arg(long)]
    pub name: Option<String>,
}

// ---------------------------------------------------------------------------
// Show / Render
// ---------------------------------------------------------------------------

/// Arguments for `brewlint show`.
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Formula file (.rb, .formula.toml, or .formula.json).
    pub path: PathBuf,
}

/// Record output formats.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Ruby formula DSL.
    Rb,
    Toml,
    Json,
}

/// Arguments for `brewlint render`.
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Formula file to render.
    pub path: PathBuf,

    /// Output format.
    #[arg(long, short = 'f', value_enum, default_value = "rb")]
    pub format: OutputFormat,
}

// ---------------------------------------------------------------------------
// Digest / Bump
// ---------------------------------------------------------------------------

/// Digest algorithms selectable on the command line.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlgorithmArg {
    Sha256,
    Sha512,
}

/// Arguments for `brewlint digest`.
#[derive(Args, Debug)]
pub struct DigestArgs {
    /// Archive to hash.
    pub file: PathBuf,

    /// Digest algorithm (default: `digest` from config, else sha256).
    #[arg(long, short = 'a', value_enum)]
    pub algorithm: Option<AlgorithmArg>,

    /// Compare against the checksum declared in this formula.
    #[arg(long, value_name = "FORMULA", conflicts_with = "algorithm")]
    pub against: Option<PathBuf>,
}

/// Arguments for `brewlint bump`.
#[derive(Args, Debug)]
#[command(group(
    clap::ArgGroup::new("checksum_source")
        .required(true)
        .args(["sha256", "archive"])
))]
pub struct BumpArgs {
    /// Formula to supersede.
    pub path: PathBuf,

    /// New version tag.
    #[arg(long, value_name = "VERSION")]
    pub to: String,

    /// Checksum of the new archive.
    #[arg(long, value_name = "HEX")]
    pub sha256: Option<String>,

    /// Local copy of the new archive to hash.
    #[arg(long, value_name = "FILE")]
    pub archive: Option<PathBuf>,

    /// Write the new record here instead of stdout.
    #[arg(long, short = 'o', value_name = "OUT")]
    pub output: Option<PathBuf>,

    /// Overwrite OUT if it already exists.
    #[arg(long)]
    pub force: bool,
}

// ---------------------------------------------------------------------------
// Completion
// ---------------------------------------------------------------------------

/// Arguments for `brewlint completion`.
#[derive(Args, Debug)]
pub struct CompletionArgs {
    /// Shell to generate completions for.
    #[arg(value_enum)]
    pub shell: Shell,
}
