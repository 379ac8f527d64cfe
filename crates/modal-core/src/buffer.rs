//! Text buffer and coordinate primitives.
//!
//! The buffer is an ordered sequence of lines stored in a [`ropey::Rope`].
//! Newlines exist only *between* lines: no line ever contains `'\n'`, and at
//! least one line always exists (an empty buffer is a single empty line).
//!
//! Every mutating operation takes `&self` and returns a new [`Buffer`] value.
//! Cloning a rope is O(1) and shares storage structurally, so the previous
//! value stays alive cheaply — this is what makes whole-buffer history
//! snapshots affordable.
//!
//! All coordinates are `char`-indexed. Rendering concerns (grapheme clusters,
//! display cells) live outside the kernel.

use ropey::Rope;
use std::cmp::Ordering;

/// A logical position in the buffer (zero-based line and column).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Position {
    /// Zero-based line index.
    pub line: usize,
    /// Zero-based column in characters within the line.
    pub column: usize,
}

impl Position {
    /// Create a new position.
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        self.line
            .cmp(&other.line)
            .then_with(|| self.column.cmp(&other.column))
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// The cursor: a position plus the "desired column" hint used by vertical
/// motions.
///
/// When `j`/`k` land on a line shorter than the column the movement started
/// from, `desired_column` remembers the origin so later vertical motions can
/// restore it. Any non-vertical motion clears the hint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    /// Current position.
    pub position: Position,
    /// Column to restore on vertical movement, if the cursor previously
    /// passed through a shorter line.
    pub desired_column: Option<usize>,
}

impl Cursor {
    /// Create a cursor at the given position with no desired column.
    pub fn at(position: Position) -> Self {
        Self {
            position,
            desired_column: None,
        }
    }
}

/// An immutable-by-convention text buffer.
///
/// # Example
///
/// ```rust
/// use modal_core::{Buffer, Position};
///
/// let buffer = Buffer::from_text("hello\nworld");
/// assert_eq!(buffer.line_count(), 2);
/// assert_eq!(buffer.line(1), "world");
///
/// let edited = buffer.insert(Position::new(0, 5), ", there");
/// assert_eq!(edited.full_text(), "hello, there\nworld");
/// // The original value is untouched.
/// assert_eq!(buffer.full_text(), "hello\nworld");
/// ```
#[derive(Debug, Clone)]
pub struct Buffer {
    rope: Rope,
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Buffer {
    /// Create an empty buffer (a single empty line).
    pub fn new() -> Self {
        Self { rope: Rope::new() }
    }

    /// Build a buffer from LF-separated text.
    ///
    /// The caller is expected to have normalized line endings already; see
    /// [`crate::LineEnding`].
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
        }
    }

    /// Total number of lines. Always at least 1.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Index of the last line.
    pub fn last_line(&self) -> usize {
        self.line_count() - 1
    }

    /// Total number of characters, including the newlines between lines.
    pub fn total_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// Text of line `i` without its trailing newline. Returns `""` out of
    /// bounds.
    pub fn line(&self, i: usize) -> String {
        if i >= self.line_count() {
            return String::new();
        }
        let mut text = self.rope.line(i).to_string();
        if text.ends_with('\n') {
            text.pop();
        }
        text
    }

    /// Length of line `i` in characters, excluding the newline. Returns 0 out
    /// of bounds.
    pub fn line_length(&self, i: usize) -> usize {
        if i >= self.line_count() {
            return 0;
        }
        let slice = self.rope.line(i);
        let len = slice.len_chars();
        if len > 0 && slice.char(len - 1) == '\n' {
            len - 1
        } else {
            len
        }
    }

    /// The whole buffer as a single string with `'\n'` separators.
    pub fn full_text(&self) -> String {
        self.rope.to_string()
    }

    /// Clamp a position into the buffer: `line < line_count` and
    /// `column <= line_length(line)` (the insert-mode bound).
    pub fn clamp(&self, pos: Position) -> Position {
        let line = pos.line.min(self.last_line());
        let column = pos.column.min(self.line_length(line));
        Position::new(line, column)
    }

    /// Clamp a position to the normal-mode column bound
    /// `max(0, line_length - 1)`.
    pub fn clamp_normal(&self, pos: Position) -> Position {
        let line = pos.line.min(self.last_line());
        let max_col = self.line_length(line).saturating_sub(1);
        Position::new(line, pos.column.min(max_col))
    }

    /// Character at a position, or `None` if the position addresses the end
    /// of a line or is out of bounds. The newline between lines is not
    /// addressable through this accessor.
    pub fn char_at(&self, pos: Position) -> Option<char> {
        if pos.line >= self.line_count() || pos.column >= self.line_length(pos.line) {
            return None;
        }
        Some(self.rope.char(self.rope.line_to_char(pos.line) + pos.column))
    }

    /// Character at an absolute char offset (newlines included), or `None`
    /// past the end.
    pub fn char_at_offset(&self, offset: usize) -> Option<char> {
        if offset >= self.rope.len_chars() {
            return None;
        }
        Some(self.rope.char(offset))
    }

    /// Convert a (clamped) position to an absolute char offset.
    pub fn position_to_char(&self, pos: Position) -> usize {
        let pos = self.clamp(pos);
        self.rope.line_to_char(pos.line) + pos.column
    }

    /// Convert an absolute char offset back to a position. Offsets addressing
    /// a newline map to the end-of-line column of that line.
    pub fn char_to_position(&self, offset: usize) -> Position {
        let offset = offset.min(self.rope.len_chars());
        let line = self.rope.char_to_line(offset);
        Position::new(line, offset - self.rope.line_to_char(line))
    }

    /// Text between two positions, end-exclusive. The endpoints are
    /// normalized so that start <= end and clamped into the buffer.
    pub fn text_in_range(&self, start: Position, end: Position) -> String {
        let (start, end) = normalize(start, end);
        let start = self.position_to_char(start);
        let end = self.position_to_char(end);
        if start >= end {
            return String::new();
        }
        self.rope.slice(start..end).to_string()
    }

    /// Insert `text` at a position, returning the new buffer. `text` may
    /// contain newlines; a text with N newlines grows the buffer by N lines.
    /// Out-of-range positions are clamped first.
    pub fn insert(&self, pos: Position, text: &str) -> Buffer {
        let offset = self.position_to_char(pos);
        let mut rope = self.rope.clone();
        rope.insert(offset, text);
        Buffer { rope }
    }

    /// Remove the content between two positions (end-exclusive), returning
    /// the new buffer. The endpoints are normalized and clamped; the
    /// before-portion of the start line is joined with the after-portion of
    /// the end line.
    pub fn delete_range(&self, start: Position, end: Position) -> Buffer {
        let (start, end) = normalize(start, end);
        let start = self.position_to_char(start);
        let end = self.position_to_char(end);
        if start >= end {
            return self.clone();
        }
        let mut rope = self.rope.clone();
        rope.remove(start..end);
        Buffer { rope }
    }

    /// Delete the character before a position, as insert-mode backspace does.
    ///
    /// At column 0 of a non-first line the line joins with its predecessor and
    /// the returned position is the predecessor's former end. At the very
    /// start of the buffer this is a no-op.
    pub fn delete_char_before(&self, pos: Position) -> (Buffer, Position) {
        let pos = self.clamp(pos);
        if pos.column > 0 {
            let offset = self.position_to_char(pos);
            let mut rope = self.rope.clone();
            rope.remove(offset - 1..offset);
            (Buffer { rope }, Position::new(pos.line, pos.column - 1))
        } else if pos.line > 0 {
            let prev_len = self.line_length(pos.line - 1);
            let newline = self.rope.line_to_char(pos.line) - 1;
            let mut rope = self.rope.clone();
            rope.remove(newline..newline + 1);
            (Buffer { rope }, Position::new(pos.line - 1, prev_len))
        } else {
            (self.clone(), pos)
        }
    }

    /// Delete the character at a position. At the end of a non-last line the
    /// newline is removed (joining with the next line); at the very end of
    /// the buffer this is a no-op.
    pub fn delete_char_at(&self, pos: Position) -> Buffer {
        let pos = self.clamp(pos);
        if pos.column < self.line_length(pos.line) || pos.line < self.last_line() {
            let offset = self.position_to_char(pos);
            let mut rope = self.rope.clone();
            rope.remove(offset..offset + 1);
            Buffer { rope }
        } else {
            self.clone()
        }
    }

    /// Column of the first non-whitespace character on line `i` (0 if the
    /// line is empty or all whitespace).
    pub fn first_non_blank(&self, i: usize) -> usize {
        self.line(i)
            .chars()
            .position(|c| !c.is_whitespace())
            .unwrap_or(0)
    }

    /// Whether line `i` is empty or whitespace-only.
    pub fn is_blank_line(&self, i: usize) -> bool {
        self.line(i).chars().all(|c| c.is_whitespace())
    }
}

/// Order two positions so that the first is not after the second.
pub fn normalize(a: Position, b: Position) -> (Position, Position) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Compute the leading whitespace for the new line created by splitting
/// `line_text` at `col`.
///
/// The base indent is the leading whitespace of the reference line. If the
/// trimmed text before the split ends in an opening bracket, one indent unit
/// (`indent_width` spaces) is added; if the text at the split starts with a
/// closing bracket and the base indent has room, one unit is removed.
pub fn compute_smart_indent(line_text: &str, col: usize, indent_width: usize) -> String {
    let mut indent: String = line_text
        .chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .collect();

    let before: String = line_text.chars().take(col).collect();
    let after: String = line_text.chars().skip(col).collect();

    let opens = before
        .trim_end()
        .ends_with(|c| c == '{' || c == '(' || c == '[');
    if opens {
        indent.extend(std::iter::repeat(' ').take(indent_width));
    }

    let closes = after.starts_with(|c| c == '}' || c == ')' || c == ']');
    if closes && indent.chars().count() >= indent_width {
        let keep = indent.chars().count() - indent_width;
        indent = indent.chars().take(keep).collect();
    }

    indent
}
