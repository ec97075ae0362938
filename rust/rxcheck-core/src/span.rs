use serde::{Deserialize, Serialize};

/// Source location of a declaration, site, or annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    /// Byte offset of the start in the source
    #[serde(default)]
    pub start: usize,
    /// Byte offset of the end (exclusive) in the source
    #[serde(default)]
    pub end: usize,
    /// 1-based line number
    pub line: usize,
    /// 1-based column number
    #[serde(default)]
    pub col: usize,
}

impl Span {
    pub fn new(start: usize, end: usize, line: usize, col: usize) -> Self {
        Self { start, end, line, col }
    }

    /// A span that only knows its line. Used by hand-built declarations.
    pub fn line(line: usize) -> Self {
        Self { start: 0, end: 0, line, col: 1 }
    }

    pub fn dummy() -> Self {
        Self::default()
    }
}
