//! `brewlint` -- validate, render, and bump Homebrew formula files.
//!
//! Parses CLI arguments with clap, resolves the runtime context, and
//! dispatches to command handlers.

mod cli;
mod commands;
mod context;
mod output;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands};
use context::RuntimeContext;

fn dispatch(cli: &Cli) -> Result<()> {
    let Some(ref command) = cli.command else {
        use clap::CommandFactory;
        Cli::command().print_help().ok();
        println!();
        return Ok(());
    };

    if let Commands::Completion(args) = command {
        return commands::completion::run(args);
    }

    let ctx = RuntimeContext::from_global_args(&cli.global)?;
    match command {
        Commands::Validate(args) => commands::validate::run(&ctx, args),
        Commands::Show(args) => commands::show::run(&ctx, args),
        Commands::Render(args) => commands::render::run(&ctx, args),
        Commands::Latest(args) => commands::latest::run(&ctx, args),
        Commands::Digest(args) => commands::digest::run(&ctx, args),
        Commands::Bump(args) => commands::bump::run(&ctx, args),
        Commands::Version => commands::version::run(&ctx),
        Commands::Completion(args) => commands::completion::run(args),
    }
}

fn main() {
    let cli = Cli::parse();

    if cli.global.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("brewlint=debug")
            .with_writer(std::io::stderr)
            .init();
    }

    if let Err(e) = dispatch(&cli) {
        if cli.global.json {
            let err_json = serde_json::json!({
                "error": format!("{:#}", e),
            });
            if let Ok(s) = serde_json::to_string_pretty(&err_json) {
                eprintln!("{}", s);
            }
        } else {
            eprintln!("Error: {:#}", e);
        }
        std::process::exit(1);
    }
}
