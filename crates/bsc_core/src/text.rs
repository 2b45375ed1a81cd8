//! Source position and range types.
//!
//! Tokens, syntax tree nodes and diagnostics all carry a [`Range`] expressed in
//! 0-based lines and characters, the way editors address a document.

use std::fmt;

/// A 0-based line/character location in source text.
#[derive(Copy, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    #[inline]
    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.character)
    }
}

/// A span of source text. `end` is exclusive.
#[derive(Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    /// Create a range from its four components.
    #[inline]
    pub fn new(start_line: u32, start_character: u32, end_line: u32, end_character: u32) -> Self {
        Self {
            start: Position::new(start_line, start_character),
            end: Position::new(end_line, end_character),
        }
    }

    #[inline]
    pub fn from_positions(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// An empty range at a position.
    #[inline]
    pub fn empty(pos: Position) -> Self {
        Self { start: pos, end: pos }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether `pos` lies inside this range.
    #[inline]
    pub fn contains(&self, pos: Position) -> bool {
        pos >= self.start && pos < self.end
    }

    /// Return a new range covering both this range and the other.
    pub fn union(&self, other: &Range) -> Range {
        Range {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// The range as `[startLine, startChar, endLine, endChar]`.
    pub fn to_array(&self) -> [u32; 4] {
        [self.start.line, self.start.character, self.end.line, self.end.character]
    }
}

impl fmt::Debug for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}-{:?}", self.start, self.end)
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 1-based, the way editors and terminals print locations
        write!(f, "{}:{}", self.start.line + 1, self.start.character + 1)
    }
}
