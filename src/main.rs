//! @dose
//! purpose: This is the CLI entry point for parse-comments. It parses command-line arguments
//!     using clap, sets up logging, determines the project root directory, and dispatches to
//!     the appropriate command handler (parse, type, or tokenize).
//!
//! when-editing:
//!     - !All command handlers are imported from the parse_comments crate
//!     - !The root directory defaults to current working directory if not specified
//!     - Error messages are printed to stderr and exit with code 1
//!
//! invariants:
//!     - One and only one subcommand is always executed per invocation
//!     - The process exits with 0 on success, 1 on any error
//!     - Logs go to stderr; stdout carries only command output
//!
//! do-not:
//!     - Never add business logic here - delegate to command modules
//!     - Never panic - always use proper error handling
//!
//! gotchas:
//!     - RUST_LOG overrides the default filter; --verbose raises this crate to debug

use anyhow::Context;
use clap::Parser;
use parse_comments::cli::{Cli, Commands};
use parse_comments::commands::{run_parse, run_tokenize, run_type};
use std::env;
use tracing_subscriber::EnvFilter;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("parse_comments={}", level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Determine root directory
    let root = match cli.root {
        Some(root) => root,
        None => env::current_dir().context("Failed to get current directory")?,
    };

    match cli.command {
        Commands::Parse(args) => run_parse(&args, &root, cli.verbose),
        Commands::Type(args) => run_type(&args),
        Commands::Tokenize(args) => run_tokenize(&args, &root),
    }
}
