//! Range-producing text objects.
//!
//! A text object selects the span of a surrounding syntactic construct —
//! word, bracket pair, or quote pair — for use as the operand of an operator
//! (`diw`, `ca(`, `yi"` ...). Resolution is a pure function of the buffer and
//! cursor; if no containing object exists, the composed operator is a no-op.
//!
//! Spans are inclusive on both ends. `inner` (`i`) excludes the delimiters,
//! `around` (`a`) includes them; for words, `around` extends over trailing
//! whitespace, falling back to leading whitespace.

use crate::buffer::{Buffer, Position};
use crate::motions::{scan_bracket_backward, scan_bracket_forward};
use crate::search::is_word_char;

/// A bracket family usable as a text object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BracketKind {
    /// `(` … `)` — also spelled `b`.
    Paren,
    /// `[` … `]`
    Square,
    /// `{` … `}` — also spelled `B`.
    Curly,
    /// `<` … `>`
    Angle,
}

impl BracketKind {
    fn open(self) -> char {
        match self {
            BracketKind::Paren => '(',
            BracketKind::Square => '[',
            BracketKind::Curly => '{',
            BracketKind::Angle => '<',
        }
    }

    fn close(self) -> char {
        match self {
            BracketKind::Paren => ')',
            BracketKind::Square => ']',
            BracketKind::Curly => '}',
            BracketKind::Angle => '>',
        }
    }
}

/// What a text object selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextObjectKind {
    /// `w` / `W`: the word (or WORD) containing the cursor.
    Word {
        /// WORD variant: any non-whitespace run.
        big: bool,
    },
    /// A bracket pair containing the cursor.
    Bracket(BracketKind),
    /// A quote pair on the current line (`"`, `'` or a backtick).
    Quote(char),
}

/// A text object: the construct kind plus the inner/around choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextObject {
    /// The selected construct.
    pub kind: TextObjectKind,
    /// `a` variant: include the delimiters / surrounding whitespace.
    pub around: bool,
}

/// An inclusive range produced by a text object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectSpan {
    /// First position of the span.
    pub start: Position,
    /// Last position of the span (inclusive).
    pub end: Position,
}

/// Map an object key (the character after `i`/`a`) to its kind.
pub fn object_for_char(c: char) -> Option<TextObjectKind> {
    match c {
        'w' => Some(TextObjectKind::Word { big: false }),
        'W' => Some(TextObjectKind::Word { big: true }),
        '(' | ')' | 'b' => Some(TextObjectKind::Bracket(BracketKind::Paren)),
        '[' | ']' => Some(TextObjectKind::Bracket(BracketKind::Square)),
        '{' | '}' | 'B' => Some(TextObjectKind::Bracket(BracketKind::Curly)),
        '<' | '>' => Some(TextObjectKind::Bracket(BracketKind::Angle)),
        '"' | '\'' | '`' => Some(TextObjectKind::Quote(c)),
        _ => None,
    }
}

impl TextObject {
    /// Resolve the object at the cursor, or `None` when no containing
    /// construct exists.
    pub fn resolve(&self, buffer: &Buffer, cursor: Position) -> Option<ObjectSpan> {
        let pos = buffer.clamp_normal(cursor);
        match self.kind {
            TextObjectKind::Word { big } => word_span(buffer, pos, big, self.around),
            TextObjectKind::Bracket(kind) => bracket_span(buffer, pos, kind, self.around),
            TextObjectKind::Quote(quote) => quote_span(buffer, pos, quote, self.around),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WordClass {
    Whitespace,
    Word,
    Punctuation,
}

fn word_class(c: char, big: bool) -> WordClass {
    if c.is_whitespace() {
        WordClass::Whitespace
    } else if big || is_word_char(c) {
        WordClass::Word
    } else {
        WordClass::Punctuation
    }
}

fn word_span(buffer: &Buffer, pos: Position, big: bool, around: bool) -> Option<ObjectSpan> {
    let chars: Vec<char> = buffer.line(pos.line).chars().collect();
    if chars.is_empty() {
        return None;
    }
    let col = pos.column.min(chars.len() - 1);
    let class = word_class(chars[col], big);

    let mut start = col;
    while start > 0 && word_class(chars[start - 1], big) == class {
        start -= 1;
    }
    let mut end = col;
    while end + 1 < chars.len() && word_class(chars[end + 1], big) == class {
        end += 1;
    }

    if around && class != WordClass::Whitespace {
        let trailing_end = {
            let mut e = end;
            while e + 1 < chars.len() && chars[e + 1].is_whitespace() {
                e += 1;
            }
            e
        };
        if trailing_end > end {
            end = trailing_end;
        } else {
            while start > 0 && chars[start - 1].is_whitespace() {
                start -= 1;
            }
        }
    }

    Some(ObjectSpan {
        start: Position::new(pos.line, start),
        end: Position::new(pos.line, end),
    })
}

fn bracket_span(
    buffer: &Buffer,
    pos: Position,
    kind: BracketKind,
    around: bool,
) -> Option<ObjectSpan> {
    let (open, close) = (kind.open(), kind.close());
    let offset = buffer.position_to_char(pos);

    let open_offset = match buffer.char_at(pos) {
        Some(c) if c == open => offset,
        Some(c) if c == close => scan_bracket_backward(buffer, offset, open, close)?,
        _ => scan_bracket_backward(buffer, offset, open, close)?,
    };
    let close_offset = scan_bracket_forward(buffer, open_offset, open, close)?;

    if around {
        Some(ObjectSpan {
            start: buffer.char_to_position(open_offset),
            end: buffer.char_to_position(close_offset),
        })
    } else {
        if open_offset + 1 > close_offset.checked_sub(1)? {
            return None; // nothing between the delimiters
        }
        Some(ObjectSpan {
            start: buffer.char_to_position(open_offset + 1),
            end: buffer.char_to_position(close_offset - 1),
        })
    }
}

fn quote_span(buffer: &Buffer, pos: Position, quote: char, around: bool) -> Option<ObjectSpan> {
    let chars: Vec<char> = buffer.line(pos.line).chars().collect();

    let mut marks: Vec<usize> = Vec::new();
    for (i, c) in chars.iter().enumerate() {
        if *c == quote && (i == 0 || chars[i - 1] != '\\') {
            marks.push(i);
        }
    }

    let (open, close) = marks
        .chunks_exact(2)
        .map(|pair| (pair[0], pair[1]))
        .find(|(open, close)| *open <= pos.column && pos.column <= *close)?;

    if around {
        Some(ObjectSpan {
            start: Position::new(pos.line, open),
            end: Position::new(pos.line, close),
        })
    } else {
        if open + 1 > close - 1 {
            return None; // empty string literal
        }
        Some(ObjectSpan {
            start: Position::new(pos.line, open + 1),
            end: Position::new(pos.line, close - 1),
        })
    }
}
