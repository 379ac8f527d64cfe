//! Literal-substring search over the buffer.
//!
//! Queries are plain text: the input is escaped with [`regex::escape`] and
//! compiled into a case-insensitive regex, so regex metacharacters match
//! themselves. Matches are reported as buffer [`Position`]s in
//! line-then-column order; zero-width matches are skipped.
//!
//! `whole_word` matching (used by `*`/`#`) bounds a match with the word-char
//! predicate shared with the word motions.

use crate::buffer::{Buffer, Position};
use regex::RegexBuilder;

/// Word-character predicate shared by word motions, text objects and
/// whole-word search: `_` plus anything alphanumeric.
pub fn is_word_char(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

/// The word found under the cursor by [`word_under_cursor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordAtCursor {
    /// The word text.
    pub text: String,
    /// First column of the word.
    pub start_col: usize,
    /// One past the last column of the word.
    pub end_col: usize,
}

/// Byte/char offset translation for one search pass.
#[derive(Debug)]
struct CharIndex {
    char_to_byte: Vec<usize>,
    text_len: usize,
}

impl CharIndex {
    fn new(text: &str) -> Self {
        let mut char_to_byte: Vec<usize> = text.char_indices().map(|(b, _)| b).collect();
        char_to_byte.push(text.len());
        Self {
            char_to_byte,
            text_len: text.len(),
        }
    }

    fn char_count(&self) -> usize {
        self.char_to_byte.len().saturating_sub(1)
    }

    fn byte_to_char(&self, byte_offset: usize) -> usize {
        let clamped = byte_offset.min(self.text_len);
        match self.char_to_byte.binary_search(&clamped) {
            Ok(idx) => idx,
            Err(idx) => idx,
        }
    }

    fn char_at(&self, text: &str, char_offset: usize) -> Option<char> {
        if char_offset >= self.char_count() {
            return None;
        }
        let start = self.char_to_byte[char_offset];
        let end = self.char_to_byte[char_offset + 1];
        text.get(start..end)?.chars().next()
    }
}

fn is_whole_word(text: &str, index: &CharIndex, start: usize, end: usize) -> bool {
    let before = if start == 0 {
        None
    } else {
        index.char_at(text, start - 1)
    };
    let after = index.char_at(text, end);
    !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
}

/// Enumerate all matches of `pattern` in the buffer, in line-then-column
/// order. Matching is literal-substring and case-insensitive; an empty
/// pattern has no matches.
pub fn find_all(buffer: &Buffer, pattern: &str, whole_word: bool) -> Vec<Position> {
    if pattern.is_empty() {
        return Vec::new();
    }

    let re = match RegexBuilder::new(&regex::escape(pattern))
        .case_insensitive(true)
        .multi_line(true)
        .build()
    {
        Ok(re) => re,
        Err(_) => return Vec::new(),
    };

    let text = buffer.full_text();
    let index = CharIndex::new(&text);

    let mut matches = Vec::new();
    for m in re.find_iter(&text) {
        let start = index.byte_to_char(m.start());
        let end = index.byte_to_char(m.end());
        if start >= end {
            continue; // zero-width
        }
        if whole_word && !is_whole_word(&text, &index, start, end) {
            continue;
        }
        matches.push(buffer.char_to_position(start));
    }
    matches
}

/// The first match strictly after (forward) or strictly before (backward) the
/// cursor, wrapping around at the buffer edges. `None` when the list is
/// empty.
pub fn next_match(matches: &[Position], cursor: Position, forward: bool) -> Option<Position> {
    if forward {
        matches
            .iter()
            .copied()
            .find(|m| *m > cursor)
            .or_else(|| matches.first().copied())
    } else {
        matches
            .iter()
            .rev()
            .copied()
            .find(|m| *m < cursor)
            .or_else(|| matches.last().copied())
    }
}

/// Expand from the cursor across word characters. `None` when the cursor is
/// not on a word character.
pub fn word_under_cursor(buffer: &Buffer, cursor: Position) -> Option<WordAtCursor> {
    let pos = buffer.clamp_normal(cursor);
    let chars: Vec<char> = buffer.line(pos.line).chars().collect();
    if chars.is_empty() || pos.column >= chars.len() || !is_word_char(chars[pos.column]) {
        return None;
    }

    let mut start = pos.column;
    while start > 0 && is_word_char(chars[start - 1]) {
        start -= 1;
    }
    let mut end = pos.column + 1;
    while end < chars.len() && is_word_char(chars[end]) {
        end += 1;
    }

    Some(WordAtCursor {
        text: chars[start..end].iter().collect(),
        start_col: start,
        end_col: end,
    })
}
