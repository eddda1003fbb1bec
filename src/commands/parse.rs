//! @dose
//! purpose: This module implements the parse command: find JS/TS sources, extract their
//!     `/** */` comments with tree-sitter and print each parsed comment as JSON.
//!
//! when-editing:
//!     - !Output is a JSON array of {file, comments: [{loc, context, comment | error}]}
//!     - Files are processed in parallel but reported in sorted path order
//!
//! invariants:
//!     - A failing comment never hides the others; it is reported in place with its error
//!     - The command fails (exit 1) after printing if any comment or file failed
//!
//! gotchas:
//!     - File paths in the output are relative to --root when possible
//!     - Explicit file arguments with an unsupported extension are an error, not skipped
//!     - Example locations are shifted from comment lines to file lines
//!
//! flows:
//!     - Collect: explicit paths or a walk of the root, filtered by exclusion config
//!     - Parse: extract_from_file -> parse_comment for each comment -> FileReport
//!     - Report: print JSON, log failures, bail if anything failed

use crate::cli::ParseArgs;
use crate::config::Config;
use crate::exclusion::{collect_source_files, ExclusionConfig};
use crate::extract::{extract_from_file, SourceLanguage};
use crate::parser::{parse_comment, ParseOptions};
use crate::types::{Comment, Location};
use anyhow::{bail, Context, Result};
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize)]
pub struct FileReport {
    pub file: String,
    pub comments: Vec<CommentReport>,
}

#[derive(Debug, Serialize)]
pub struct CommentReport {
    pub loc: Location,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(flatten)]
    pub outcome: Outcome,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Comment(Comment),
    Error(String),
}

impl FileReport {
    pub fn failures(&self) -> usize {
        self.comments
            .iter()
            .filter(|c| matches!(c.outcome, Outcome::Error(_)))
            .count()
    }
}

pub fn run_parse(args: &ParseArgs, root: &Path, verbose: bool) -> Result<()> {
    let config = Config::load(root);
    let options = args.parse_options(&config.parse);
    let exclusion = args.exclusion_config(&config.exclude);

    let files = collect_files(&args.paths, root, &exclusion)?;
    if verbose {
        eprintln!("Parsing doc comments in {} files...", files.len());
    }

    let results: Vec<(PathBuf, Result<FileReport>)> = files
        .par_iter()
        .map(|path| (path.clone(), parse_file(path, root, &options)))
        .collect();

    let mut reports = Vec::with_capacity(results.len());
    let mut failed_files = 0;
    for (path, result) in results {
        match result {
            Ok(report) => reports.push(report),
            Err(e) => {
                failed_files += 1;
                eprintln!("Error processing {}: {:#}", path.display(), e);
            }
        }
    }

    let json = if args.compact {
        serde_json::to_string(&reports)?
    } else {
        serde_json::to_string_pretty(&reports)?
    };
    println!("{}", json);

    let total: usize = reports.iter().map(|r| r.comments.len()).sum();
    let failed: usize = reports.iter().map(FileReport::failures).sum();
    for report in &reports {
        for comment in &report.comments {
            if let Outcome::Error(message) = &comment.outcome {
                eprintln!(
                    "ERROR [{}:{}]: {}",
                    report.file,
                    comment.loc.start.line + 1,
                    message
                );
            }
        }
    }

    if verbose {
        eprintln!(
            "Parsed {} comments in {} files ({} failed)",
            total - failed,
            reports.len(),
            failed
        );
    }

    if failed > 0 || failed_files > 0 {
        bail!(
            "{} of {} comments failed to parse, {} files could not be read",
            failed,
            total,
            failed_files
        );
    }
    Ok(())
}

/// Explicit paths (files or directories) or, when none are given, the whole root.
pub fn collect_files(
    paths: &[PathBuf],
    root: &Path,
    exclusion: &ExclusionConfig,
) -> Result<Vec<PathBuf>> {
    if paths.is_empty() {
        return Ok(collect_source_files(root, exclusion));
    }

    let mut files = Vec::new();
    for path in paths {
        let full_path = if path.is_absolute() {
            path.clone()
        } else {
            root.join(path)
        };

        if full_path.is_dir() {
            files.extend(collect_source_files(&full_path, exclusion));
        } else if full_path.is_file() {
            if SourceLanguage::from_path(&full_path).is_none() {
                bail!("Unsupported file type: {}", full_path.display());
            }
            files.push(full_path);
        } else {
            bail!("Path not found: {}", full_path.display());
        }
    }
    files.sort();
    files.dedup();
    Ok(files)
}

pub fn parse_file(path: &Path, root: &Path, options: &ParseOptions) -> Result<FileReport> {
    let doc_comments = extract_from_file(path)
        .with_context(|| format!("Failed to extract comments from {}", path.display()))?;

    let comments = doc_comments
        .into_iter()
        .map(|doc| {
            let outcome = match parse_comment(&doc.text, options) {
                Ok(mut comment) => {
                    for example in &mut comment.examples {
                        example.loc = example.loc.offset_by(doc.loc.start.line);
                    }
                    Outcome::Comment(comment)
                }
                Err(e) => Outcome::Error(e.to_string()),
            };
            CommentReport {
                loc: doc.loc,
                context: doc.context,
                outcome,
            }
        })
        .collect();

    let relative = path.strip_prefix(root).unwrap_or(path);
    Ok(FileReport {
        file: relative.to_string_lossy().into_owned(),
        comments,
    })
}
