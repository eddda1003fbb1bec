//! The `tokenize` command: show the raw description/examples/tags split of one comment.

use crate::cli::TokenizeArgs;
use crate::parser::tokenize_comment;
use anyhow::{Context, Result};
use std::fs;
use std::io::{self, Read};
use std::path::Path;

pub fn run_tokenize(args: &TokenizeArgs, root: &Path) -> Result<()> {
    let text = match &args.input {
        Some(input) if input.to_string_lossy() != "-" => {
            let path = if input.is_absolute() {
                input.clone()
            } else {
                root.join(input)
            };
            fs::read_to_string(&path)
                .with_context(|| format!("Failed to read input file {}", path.display()))?
        }
        _ => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read from stdin")?;
            buffer
        }
    };

    println!("{}", render_tokens(&text)?);
    Ok(())
}

pub fn render_tokens(text: &str) -> Result<String> {
    let tokens = tokenize_comment(text);
    Ok(serde_json::to_string_pretty(&tokens)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_tokens() {
        let out = render_tokens("/**\n * Hello.\n * @param {A} a\n */").unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["description"], "Hello.");
        assert_eq!(value["tags"][0]["type"], "tag");
        assert_eq!(value["tags"][0]["key"], "param");
        assert_eq!(value["tags"][0]["val"], "{A} a");
        assert_eq!(value["tags"][0]["loc"]["start"]["line"], 2);
    }
}
