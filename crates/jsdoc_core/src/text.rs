//! Text span and range types for source location tracking.
//!
//! All positions are byte offsets into the caller's source buffer. Nodes,
//! tokens and diagnostics share this one offset space, so a diagnostic can be
//! related to the node it was reported against by comparing offsets.

use std::fmt;
use std::ops::Range;

/// A position in source text, measured as a byte offset from the start.
pub type TextPos = u32;

/// A span defined by a start position and a length.
///
/// Diagnostics carry spans; nodes carry [`TextRange`]s.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct TextSpan {
    /// The byte offset where this span starts.
    pub start: TextPos,
    /// The length of this span in bytes.
    pub length: TextPos,
}

impl TextSpan {
    #[inline]
    pub fn new(start: TextPos, length: TextPos) -> Self {
        Self { start, length }
    }

    /// Create a span from start and end positions.
    #[inline]
    pub fn from_bounds(start: TextPos, end: TextPos) -> Self {
        debug_assert!(end >= start);
        Self {
            start,
            length: end - start,
        }
    }

    /// Create an empty span at a position.
    #[inline]
    pub fn empty(pos: TextPos) -> Self {
        Self { start: pos, length: 0 }
    }

    /// The end position of this span (exclusive).
    #[inline]
    pub fn end(&self) -> TextPos {
        self.start + self.length
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }
}

impl fmt::Debug for TextSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end())
    }
}

impl fmt::Display for TextSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end())
    }
}

/// A range with start and end positions, as stamped on every AST node.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct TextRange {
    /// Start of the first consumed token (inclusive).
    pub pos: TextPos,
    /// End of the last consumed token (exclusive).
    pub end: TextPos,
}

impl TextRange {
    #[inline]
    pub fn new(pos: TextPos, end: TextPos) -> Self {
        debug_assert!(end >= pos, "inverted range {}..{}", pos, end);
        Self { pos, end }
    }

    /// The length of this range in bytes.
    #[inline]
    pub fn len(&self) -> TextPos {
        self.end - self.pos
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pos == self.end
    }

    #[inline]
    pub fn to_span(&self) -> TextSpan {
        TextSpan::from_bounds(self.pos, self.end)
    }

    #[inline]
    pub fn to_range(&self) -> Range<usize> {
        self.pos as usize..self.end as usize
    }

    /// The text this range covers in `source`, or `""` when out of bounds.
    pub fn slice<'s>(&self, source: &'s str) -> &'s str {
        source.get(self.to_range()).unwrap_or("")
    }
}

impl fmt::Debug for TextRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.pos, self.end)
    }
}

/// 0-based line and column, the column counted in characters.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct LineAndColumn {
    pub line: u32,
    pub character: u32,
}

impl LineAndColumn {
    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

impl fmt::Display for LineAndColumn {
    /// Formats as 1-based `line:column`, the way editors count.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.character + 1)
    }
}

/// Byte offsets of line starts, for turning offsets into line/column pairs.
///
/// The parsers never need this; it exists for tools that display results.
#[derive(Debug, Clone)]
pub struct LineMap<'s> {
    text: &'s str,
    line_starts: Vec<TextPos>,
}

impl<'s> LineMap<'s> {
    pub fn new(text: &'s str) -> Self {
        let mut line_starts = vec![0u32];
        let bytes = text.as_bytes();
        for (i, &byte) in bytes.iter().enumerate() {
            match byte {
                b'\n' => line_starts.push((i + 1) as u32),
                b'\r' if bytes.get(i + 1) != Some(&b'\n') => line_starts.push((i + 1) as u32),
                _ => {}
            }
        }
        Self { text, line_starts }
    }

    /// Get the line number (0-based) for a byte offset.
    pub fn line_of(&self, pos: TextPos) -> u32 {
        match self.line_starts.binary_search(&pos) {
            Ok(line) => line as u32,
            Err(line) => (line - 1) as u32,
        }
    }

    pub fn line_and_column_of(&self, pos: TextPos) -> LineAndColumn {
        let line = self.line_of(pos);
        let line_start = self.line_starts[line as usize] as usize;
        let end = (pos as usize).min(self.text.len());
        let character = self
            .text
            .get(line_start..end)
            .map_or(end - line_start, |prefix| prefix.chars().count());
        LineAndColumn::new(line, character as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_span() {
        let span = TextSpan::new(5, 10);
        assert_eq!(span.end(), 15);
        assert_eq!(TextSpan::from_bounds(5, 15), span);
    }

    #[test]
    fn test_text_range_slice() {
        let source = "{number}";
        let range = TextRange::new(1, 7);
        assert_eq!(range.slice(source), "number");
        assert_eq!(range.len(), 6);
        assert_eq!(TextRange::new(4, 40).slice(source), "");
    }

    #[test]
    fn test_line_map() {
        let text = "line1\nline2\r\nline3";
        let map = LineMap::new(text);
        assert_eq!(map.line_of(0), 0);
        assert_eq!(map.line_of(5), 0);
        assert_eq!(map.line_of(6), 1);
        assert_eq!(map.line_of(13), 2);

        let lc = map.line_and_column_of(8);
        assert_eq!(lc, LineAndColumn::new(1, 2));
        assert_eq!(lc.to_string(), "2:3");
    }

    #[test]
    fn test_line_map_counts_characters() {
        let text = "/** é @type */";
        let map = LineMap::new(text);
        // 'é' is two bytes, one character.
        assert_eq!(map.line_and_column_of(7).character, 6);
    }
}
