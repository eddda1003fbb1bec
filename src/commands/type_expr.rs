//! The `type` command: parse one type expression and print it back.

use crate::cli::TypeArgs;
use crate::formatter::stringify_type;
use crate::parser::parse_type;
use anyhow::{Context, Result};

pub fn run_type(args: &TypeArgs) -> Result<()> {
    println!("{}", render_type(args)?);
    Ok(())
}

/// Canonical spelling, or the syntax tree as pretty JSON with `--json`.
pub fn render_type(args: &TypeArgs) -> Result<String> {
    let node = parse_type(&args.expression)
        .with_context(|| format!("Invalid type expression `{}`", args.expression))?;

    if args.json {
        Ok(serde_json::to_string_pretty(&node)?)
    } else {
        Ok(stringify_type(&node))
    }
}
