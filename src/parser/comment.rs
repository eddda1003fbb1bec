//! Splits a comment body into description, examples, tags and footer.
//!
//! Line scanning happens in two phases. Before the first tag, code examples
//! (fenced, indented, or javadoc `@example`) are cut out of the prose. From
//! the first tag on, every line belongs to a tag until a footer paragraph.

use crate::types::{Example, ExampleKind, Location, Position, RawTag, TokenizedComment};
use once_cell::sync::Lazy;
use regex::Regex;

static TAG_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^@([^\s{]+)[ \t]*(.*)$").unwrap());

/// Indentation at which a line is treated as code, not prose.
const CODE_INDENT: usize = 4;

/// Tokenize a `/** ... */` comment (delimiters optional).
pub fn tokenize_comment(text: &str) -> TokenizedComment {
    tokenize(strip_delimiters(text), true)
}

/// Remove the surrounding `/**` and `*/`.
pub fn strip_delimiters(text: &str) -> &str {
    let text = text.trim();
    let text = text
        .strip_prefix("/**")
        .or_else(|| text.strip_prefix("/*"))
        .unwrap_or(text);
    text.strip_suffix("*/").unwrap_or(text)
}

/// Tokenize a comment body. With `unwrap`, one leading `*` marker is removed
/// from each line; otherwise stars are content.
pub(crate) fn tokenize(body: &str, unwrap: bool) -> TokenizedComment {
    let lines = prepare_lines(body, unwrap);
    let mut out = TokenizedComment::default();

    let mut paragraphs: Vec<String> = Vec::new();
    let mut segment: Vec<&str> = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i].as_str();
        let indent = indentation(line);

        let example = if indent < CODE_INDENT {
            match TAG_LINE.captures(line.trim()) {
                Some(caps) if &caps[1] == "example" => Some(javadoc_end(&lines, i)),
                Some(_) => break,
                None if is_fence_open(line) => Some(fence_end(&lines, i)),
                None => None,
            }
        } else if segment.last().map_or(true, |l| l.trim().is_empty()) {
            Some(indented_end(&lines, i))
        } else {
            None
        };

        let Some(end) = example else {
            segment.push(line);
            i += 1;
            continue;
        };

        let description =
            claim_description(&mut segment, &mut paragraphs, !out.examples.is_empty());
        let block: Vec<&str> = lines[i..end].iter().map(String::as_str).collect();
        out.examples.push(build_example(&block, i, description));
        i = end;
    }

    let rest = join_trimmed(&segment);
    if out.examples.is_empty() {
        if !rest.is_empty() {
            paragraphs.push(rest);
        }
    } else {
        out.footer = rest;
    }
    out.description = paragraphs.join("\n\n");

    let footer = collect_tags(&lines, i, &mut out.tags);
    if !footer.is_empty() {
        if out.footer.is_empty() {
            out.footer = footer;
        } else {
            out.footer = format!("{}\n\n{}", out.footer, footer);
        }
    }

    tracing::trace!(
        examples = out.examples.len(),
        tags = out.tags.len(),
        "tokenized comment"
    );
    out
}

/// Split into lines, drop `*` markers and the common indentation.
fn prepare_lines(body: &str, unwrap: bool) -> Vec<String> {
    let stripped: Vec<&str> = body
        .lines()
        .map(|line| if unwrap { strip_marker(line) } else { line })
        .collect();

    let baseline = stripped
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| indentation(l))
        .min()
        .unwrap_or(0);

    stripped
        .iter()
        .map(|l| {
            if l.trim().is_empty() {
                String::new()
            } else {
                dedent(l, baseline).trim_end().to_string()
            }
        })
        .collect()
}

fn strip_marker(line: &str) -> &str {
    let trimmed = line.trim_start();
    match trimmed.strip_prefix('*') {
        Some(rest) => rest.strip_prefix(' ').unwrap_or(rest),
        None => line,
    }
}

fn indentation(line: &str) -> usize {
    line.chars().take_while(|c| *c == ' ' || *c == '\t').count()
}

/// Remove up to `n` leading blanks.
fn dedent(line: &str, n: usize) -> &str {
    let strip = line
        .bytes()
        .take(n)
        .take_while(|b| *b == b' ' || *b == b'\t')
        .count();
    &line[strip..]
}

fn is_tag_line(line: &str) -> bool {
    indentation(line) < CODE_INDENT && TAG_LINE.is_match(line.trim())
}

fn is_fence_open(line: &str) -> bool {
    line.trim_start().starts_with("```")
}

fn is_fence_close(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.starts_with("```") && trimmed.trim_start_matches('`').trim().is_empty()
}

/// Drop trailing blank lines from `start..end`.
fn trim_blank_tail(lines: &[String], start: usize, mut end: usize) -> usize {
    while end > start + 1 && lines[end - 1].is_empty() {
        end -= 1;
    }
    end
}

/// The example runs to the next tag line.
fn javadoc_end(lines: &[String], start: usize) -> usize {
    let end = (start + 1..lines.len())
        .find(|&j| is_tag_line(&lines[j]))
        .unwrap_or(lines.len());
    trim_blank_tail(lines, start, end)
}

/// An unterminated fence runs to the end of the body.
fn fence_end(lines: &[String], start: usize) -> usize {
    match (start + 1..lines.len()).find(|&j| is_fence_close(&lines[j])) {
        Some(close) => close + 1,
        None => trim_blank_tail(lines, start, lines.len()),
    }
}

fn indented_end(lines: &[String], start: usize) -> usize {
    let end = (start..lines.len())
        .find(|&j| !lines[j].is_empty() && indentation(&lines[j]) < CODE_INDENT)
        .unwrap_or(lines.len());
    trim_blank_tail(lines, start, end)
}

/// Take the paragraph right before an example as its description.
///
/// The paragraph is claimed when at most one blank line separates it from the
/// example, and either an earlier example exists or other prose precedes it.
/// Unclaimed prose goes to the comment description.
fn claim_description(
    segment: &mut Vec<&str>,
    paragraphs: &mut Vec<String>,
    has_previous: bool,
) -> String {
    let lines = std::mem::take(segment);
    let content_end = lines
        .iter()
        .rposition(|l| !l.trim().is_empty())
        .map_or(0, |p| p + 1);
    let gap = lines.len() - content_end;
    let content = &lines[..content_end];

    let para_start = content
        .iter()
        .rposition(|l| l.trim().is_empty())
        .map_or(0, |p| p + 1);
    let has_earlier = content[..para_start].iter().any(|l| !l.trim().is_empty());
    let claim = !content.is_empty() && gap <= 1 && (has_previous || has_earlier);

    let (kept, claimed) = if claim {
        (&content[..para_start], join_trimmed(&content[para_start..]))
    } else {
        (content, String::new())
    };

    let kept = join_trimmed(kept);
    if !kept.is_empty() {
        paragraphs.push(kept);
    }
    claimed
}

fn join_trimmed(lines: &[&str]) -> String {
    lines.join("\n").trim().to_string()
}

fn build_example(block: &[&str], first_line: usize, description: String) -> Example {
    let last = block.len().saturating_sub(1);
    let end_column = block.get(last).map_or(0, |l| l.len());
    let loc = Location::lines(first_line, first_line + last, end_column);
    let first = block.first().copied().unwrap_or("");

    let (kind, language, raw, val) = if is_fence_open(first) && indentation(first) < CODE_INDENT {
        fenced(block)
    } else if indentation(first) >= CODE_INDENT {
        indented(block)
    } else {
        javadoc(block)
    };

    Example {
        kind,
        language,
        description,
        raw,
        val,
        caption: None,
        loc,
    }
}

fn fenced(block: &[&str]) -> (ExampleKind, String, String, String) {
    let fence_indent = indentation(block[0]);
    let body: Vec<&str> = block.iter().map(|l| dedent(l, fence_indent)).collect();
    let opening = body[0];
    let language = opening
        .trim_start_matches('`')
        .split_whitespace()
        .next()
        .unwrap_or("")
        .to_string();

    let raw = body.join("\n");
    let after_open = &raw[opening.len()..];
    let closed = body.len() > 1 && body.last().is_some_and(|l| is_fence_close(l));
    let val = match body.last() {
        Some(closing) if closed => &after_open[..after_open.len() - closing.len()],
        _ => after_open,
    }
    .to_string();

    (ExampleKind::Fenced, language, raw, val)
}

fn indented(block: &[&str]) -> (ExampleKind, String, String, String) {
    let raw = format!("{}\n", block.join("\n"));
    let body: Vec<&str> = block.iter().map(|l| dedent(l, CODE_INDENT)).collect();
    let val = format!("{}\n", body.join("\n"));
    (ExampleKind::Indented, String::new(), raw, val)
}

fn javadoc(block: &[&str]) -> (ExampleKind, String, String, String) {
    let raw = format!("{}\n", block.join("\n"));
    let head = block[0].trim().trim_start_matches("@example").trim();

    let body = &block[1..];
    let indent = body
        .iter()
        .filter(|l| !l.is_empty())
        .map(|l| indentation(l))
        .min()
        .unwrap_or(0);

    let mut val = String::new();
    if !head.is_empty() {
        val.push_str(head);
        val.push('\n');
    }
    for line in body {
        val.push_str(dedent(line, indent));
        val.push('\n');
    }

    (ExampleKind::Javadoc, String::new(), raw, val)
}

/// Collect tags from `start` on, returning any footer that follows them.
///
/// A footer starts at an unindented line after two or more blank lines.
fn collect_tags(lines: &[String], start: usize, tags: &mut Vec<RawTag>) -> String {
    let mut current: Option<TagBuilder> = None;
    let mut blank_run = 0;

    for (offset, line) in lines[start..].iter().enumerate() {
        let line_no = start + offset;

        if indentation(line) < CODE_INDENT {
            if let Some(caps) = TAG_LINE.captures(line.trim()) {
                if let Some(done) = current.take() {
                    tags.push(done.finish());
                }
                current = Some(TagBuilder::new(&caps[1], &caps[2], line, line_no));
                blank_run = 0;
                continue;
            }
        }

        if line.is_empty() {
            blank_run += 1;
        } else if blank_run >= 2 && indentation(line) == 0 {
            if let Some(done) = current.take() {
                tags.push(done.finish());
            }
            let rest: Vec<&str> = lines[line_no..].iter().map(String::as_str).collect();
            return join_trimmed(&rest);
        } else {
            blank_run = 0;
        }

        if let Some(builder) = current.as_mut() {
            builder.push(line, line_no);
        }
    }

    if let Some(done) = current.take() {
        tags.push(done.finish());
    }
    String::new()
}

struct TagBuilder {
    key: String,
    val: Vec<String>,
    raw: Vec<String>,
    start: Position,
    end: Position,
}

impl TagBuilder {
    fn new(key: &str, first_val: &str, line: &str, line_no: usize) -> Self {
        let column = indentation(line);
        Self {
            key: key.to_string(),
            val: vec![first_val.to_string()],
            raw: vec![line.trim().to_string()],
            start: Position::new(line_no, column),
            end: Position::new(line_no, line.len()),
        }
    }

    fn push(&mut self, line: &str, line_no: usize) {
        self.val.push(line.to_string());
        self.raw.push(line.to_string());
        if !line.is_empty() {
            self.end = Position::new(line_no, line.len());
        }
    }

    fn finish(self) -> RawTag {
        RawTag {
            raw: self.raw.join("\n").trim_end().to_string(),
            key: self.key,
            val: self.val.join("\n").trim().to_string(),
            loc: Location::new(self.start, self.end),
        }
    }
}
