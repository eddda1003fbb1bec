//! Line/column tracking for tokens found inside a comment body.

use serde::{Deserialize, Serialize};

/// A zero-based line/column pair, relative to the start of the comment body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Span covered by a token, `end` inclusive of its last line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub start: Position,
    pub end: Position,
}

impl Location {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Location spanning whole lines `first..=last`.
    pub fn lines(first: usize, last: usize, last_len: usize) -> Self {
        Self {
            start: Position::new(first, 0),
            end: Position::new(last, last_len),
        }
    }

    /// Shift the location down by `lines`, for comments that do not start at line 0 of a file.
    pub fn offset_by(self, lines: usize) -> Self {
        Self {
            start: Position::new(self.start.line + lines, self.start.column),
            end: Position::new(self.end.line + lines, self.end.column),
        }
    }
}
