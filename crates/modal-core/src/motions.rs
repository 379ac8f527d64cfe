//! Cursor-targeting motions.
//!
//! Every motion is a pure function of `(buffer, cursor, count)` producing a
//! target [`Position`], plus two static properties consumed by the operator
//! machinery: whether the motion is *linewise* (operators extend to whole
//! lines) and whether it is *inclusive* (the target character itself belongs
//! to the operator range).
//!
//! At buffer boundaries motions return the boundary position rather than an
//! error; only the targeted searches (`f`/`t`/`%` and friends) can fail to
//! produce a target at all.

use crate::buffer::{Buffer, Cursor, Position};
use crate::search::is_word_char;

/// A remembered `f`/`F`/`t`/`T` request, replayable with `;` and `,`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FindCharSpec {
    /// The character to look for.
    pub ch: char,
    /// Search direction on the current line.
    pub forward: bool,
    /// `true` for `t`/`T`: stop one column short of the character.
    pub until: bool,
}

/// The motion catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    /// `h`
    Left,
    /// `l`
    Right,
    /// `j`
    Down,
    /// `k`
    Up,
    /// `w` / `W`
    WordForward {
        /// WORD variant: any non-whitespace run is one word.
        big: bool,
    },
    /// `b` / `B`
    WordBackward {
        /// WORD variant.
        big: bool,
    },
    /// `e` / `E`
    WordEnd {
        /// WORD variant.
        big: bool,
    },
    /// `0`
    LineStart,
    /// `^`
    FirstNonBlank,
    /// `$`
    LineEnd,
    /// `G` — last line, or line N with a count.
    GotoLast,
    /// `gg` — first line, or line N with a count.
    GotoFirst,
    /// `}`
    ParagraphForward,
    /// `{`
    ParagraphBackward,
    /// `%`
    MatchBracket,
    /// `f`/`F`/`t`/`T` with the character already captured.
    FindChar(FindCharSpec),
    /// `;` / `,` — replay the session's last find.
    RepeatFind {
        /// `,`: run the last find in the opposite direction.
        reversed: bool,
    },
}

impl Motion {
    /// Whether operators composed with this motion act on whole lines.
    pub fn linewise(&self) -> bool {
        matches!(
            self,
            Motion::Down
                | Motion::Up
                | Motion::GotoLast
                | Motion::GotoFirst
                | Motion::ParagraphForward
                | Motion::ParagraphBackward
        )
    }

    /// Whether the target character is part of an operator range.
    ///
    /// `;`/`,` take their answer from the replayed find: `f`-style finds are
    /// inclusive, `t`-style are not.
    pub fn inclusive(&self, last_find: Option<&FindCharSpec>) -> bool {
        match self {
            Motion::Right | Motion::LineEnd | Motion::WordEnd { .. } | Motion::MatchBracket => true,
            Motion::FindChar(spec) => !spec.until,
            Motion::RepeatFind { .. } => last_find.map(|spec| !spec.until).unwrap_or(false),
            _ => false,
        }
    }

    /// Whether this motion participates in desired-column tracking.
    pub fn is_vertical(&self) -> bool {
        matches!(self, Motion::Down | Motion::Up)
    }

    /// Compute the target position.
    ///
    /// `count` is `None` when no count was typed; motions that treat a bare
    /// invocation differently from `1<motion>` (only `G`) depend on that
    /// distinction. Returns `None` when a targeted search finds nothing, in
    /// which case the composed command is a no-op.
    pub fn resolve(
        &self,
        buffer: &Buffer,
        cursor: &Cursor,
        count: Option<usize>,
        last_find: Option<&FindCharSpec>,
    ) -> Option<Position> {
        let pos = buffer.clamp_normal(cursor.position);
        let n = count.unwrap_or(1).max(1);

        let target = match self {
            Motion::Left => Position::new(pos.line, pos.column.saturating_sub(n)),
            Motion::Right => {
                let max_col = buffer.line_length(pos.line).saturating_sub(1);
                Position::new(pos.line, (pos.column + n).min(max_col))
            }
            Motion::Down => vertical(buffer, cursor, pos, n as isize),
            Motion::Up => vertical(buffer, cursor, pos, -(n as isize)),
            Motion::WordForward { big } => repeat(pos, n, |p| word_forward(buffer, p, *big)),
            Motion::WordBackward { big } => repeat(pos, n, |p| word_backward(buffer, p, *big)),
            Motion::WordEnd { big } => repeat(pos, n, |p| word_end(buffer, p, *big)),
            Motion::LineStart => Position::new(pos.line, 0),
            Motion::FirstNonBlank => Position::new(pos.line, buffer.first_non_blank(pos.line)),
            Motion::LineEnd => {
                Position::new(pos.line, buffer.line_length(pos.line).saturating_sub(1))
            }
            Motion::GotoLast => {
                let line = match count {
                    Some(c) => c.saturating_sub(1).min(buffer.last_line()),
                    None => buffer.last_line(),
                };
                Position::new(line, buffer.first_non_blank(line))
            }
            Motion::GotoFirst => {
                let line = count
                    .map(|c| c.saturating_sub(1))
                    .unwrap_or(0)
                    .min(buffer.last_line());
                Position::new(line, buffer.first_non_blank(line))
            }
            Motion::ParagraphForward => {
                let line = repeat(pos.line, n, |l| paragraph(buffer, l, true));
                Position::new(line, 0)
            }
            Motion::ParagraphBackward => {
                let line = repeat(pos.line, n, |l| paragraph(buffer, l, false));
                Position::new(line, 0)
            }
            Motion::MatchBracket => return match_bracket(buffer, pos),
            Motion::FindChar(spec) => return find_char(buffer, pos, spec, n, false),
            Motion::RepeatFind { reversed } => {
                let mut spec = *last_find?;
                if *reversed {
                    spec.forward = !spec.forward;
                }
                return find_char(buffer, pos, &spec, n, true);
            }
        };

        Some(target)
    }
}

fn repeat<T: Copy>(start: T, n: usize, step: impl Fn(T) -> T) -> T {
    let mut value = start;
    for _ in 0..n {
        value = step(value);
    }
    value
}

fn vertical(buffer: &Buffer, cursor: &Cursor, pos: Position, delta: isize) -> Position {
    let line = if delta >= 0 {
        (pos.line + delta as usize).min(buffer.last_line())
    } else {
        pos.line.saturating_sub((-delta) as usize)
    };
    let wanted = cursor.desired_column.unwrap_or(pos.column);
    let column = wanted.min(buffer.line_length(line).saturating_sub(1));
    Position::new(line, column)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Whitespace,
    Word,
    Punctuation,
}

fn classify(c: char, big: bool) -> CharClass {
    if c.is_whitespace() {
        CharClass::Whitespace
    } else if big || is_word_char(c) {
        CharClass::Word
    } else {
        CharClass::Punctuation
    }
}

fn class_at(buffer: &Buffer, offset: usize, big: bool) -> Option<CharClass> {
    buffer.char_at_offset(offset).map(|c| classify(c, big))
}

/// `w`/`W`: start of the next word, crossing newlines. A punctuation run
/// counts as its own word (small variant only).
fn word_forward(buffer: &Buffer, from: Position, big: bool) -> Position {
    let total = buffer.total_chars();
    let mut idx = buffer.position_to_char(from);
    if idx >= total {
        return buffer.clamp_normal(from);
    }

    if let Some(start) = class_at(buffer, idx, big) {
        if start != CharClass::Whitespace {
            while class_at(buffer, idx, big) == Some(start) {
                idx += 1;
            }
        }
    }
    while class_at(buffer, idx, big) == Some(CharClass::Whitespace) {
        idx += 1;
    }

    if idx >= total {
        // The end-of-buffer boundary position. Cursor application clamps it
        // back to the normal bound; operators keep it so the final word is
        // covered in full.
        return buffer.char_to_position(total);
    }
    buffer.char_to_position(idx)
}

/// `b`/`B`: start of the previous word (mirror of `w`/`W`).
fn word_backward(buffer: &Buffer, from: Position, big: bool) -> Position {
    let mut idx = buffer.position_to_char(from);
    if idx == 0 {
        return Position::new(0, 0);
    }
    idx -= 1;

    while idx > 0 && class_at(buffer, idx, big) == Some(CharClass::Whitespace) {
        idx -= 1;
    }
    let cls = match class_at(buffer, idx, big) {
        Some(CharClass::Whitespace) | None => return Position::new(0, 0),
        Some(cls) => cls,
    };
    while idx > 0 && class_at(buffer, idx - 1, big) == Some(cls) {
        idx -= 1;
    }
    buffer.char_to_position(idx)
}

/// `e`/`E`: end of the current-or-next word.
fn word_end(buffer: &Buffer, from: Position, big: bool) -> Position {
    let total = buffer.total_chars();
    let mut idx = buffer.position_to_char(from);
    if idx + 1 >= total {
        return buffer.clamp_normal(from);
    }
    idx += 1;

    while idx < total && class_at(buffer, idx, big) == Some(CharClass::Whitespace) {
        idx += 1;
    }
    if idx >= total {
        return buffer.clamp_normal(buffer.char_to_position(total));
    }
    let cls = class_at(buffer, idx, big).expect("offset checked in bounds");
    while idx + 1 < total && class_at(buffer, idx + 1, big) == Some(cls) {
        idx += 1;
    }
    buffer.char_to_position(idx)
}

/// `{`/`}`: skip the run of lines in the cursor's class (blank or
/// non-blank), then the run of the other class.
fn paragraph(buffer: &Buffer, from_line: usize, forward: bool) -> usize {
    let limit = if forward { buffer.last_line() } else { 0 };
    let step = |l: usize| if forward { l + 1 } else { l - 1 };

    let mut line = from_line;
    let start = buffer.is_blank_line(line);
    while line != limit && buffer.is_blank_line(line) == start {
        line = step(line);
    }
    while line != limit && buffer.is_blank_line(line) != start {
        line = step(line);
    }
    line
}

fn bracket_pair(c: char) -> Option<(char, char, bool)> {
    match c {
        '(' => Some(('(', ')', true)),
        ')' => Some(('(', ')', false)),
        '[' => Some(('[', ']', true)),
        ']' => Some(('[', ']', false)),
        '{' => Some(('{', '}', true)),
        '}' => Some(('{', '}', false)),
        _ => None,
    }
}

/// `%`: match the bracket at the cursor, or the first bracket to the right of
/// the cursor on the current line.
fn match_bracket(buffer: &Buffer, pos: Position) -> Option<Position> {
    let line_text = buffer.line(pos.line);
    let (col, info) = line_text
        .chars()
        .enumerate()
        .skip(pos.column)
        .find_map(|(col, c)| bracket_pair(c).map(|info| (col, info)))?;

    let (open, close, is_open) = info;
    let at = buffer.position_to_char(Position::new(pos.line, col));
    let offset = if is_open {
        scan_bracket_forward(buffer, at, open, close)?
    } else {
        scan_bracket_backward(buffer, at, open, close)?
    };
    Some(buffer.char_to_position(offset))
}

pub(crate) fn scan_bracket_forward(
    buffer: &Buffer,
    from: usize,
    open: char,
    close: char,
) -> Option<usize> {
    let total = buffer.total_chars();
    let mut depth = 0usize;
    let mut idx = from + 1;
    while idx < total {
        let c = buffer.char_at_offset(idx)?;
        if c == open {
            depth += 1;
        } else if c == close {
            if depth == 0 {
                return Some(idx);
            }
            depth -= 1;
        }
        idx += 1;
    }
    None
}

pub(crate) fn scan_bracket_backward(
    buffer: &Buffer,
    from: usize,
    open: char,
    close: char,
) -> Option<usize> {
    let mut depth = 0usize;
    let mut idx = from;
    while idx > 0 {
        idx -= 1;
        let c = buffer.char_at_offset(idx)?;
        if c == close {
            depth += 1;
        } else if c == open {
            if depth == 0 {
                return Some(idx);
            }
            depth -= 1;
        }
    }
    None
}

/// `f`/`F`/`t`/`T` on the current line. `is_repeat` applies the progress
/// rule for `;`/`,`: an exclusive (`t`-style) repeat starts its scan one
/// column further so it cannot land where it already is.
fn find_char(
    buffer: &Buffer,
    pos: Position,
    spec: &FindCharSpec,
    count: usize,
    is_repeat: bool,
) -> Option<Position> {
    let chars: Vec<char> = buffer.line(pos.line).chars().collect();
    let mut remaining = count;

    if spec.forward {
        let mut from = pos.column + 1;
        if is_repeat && spec.until {
            from += 1;
        }
        for (i, c) in chars.iter().enumerate().skip(from) {
            if *c == spec.ch {
                remaining -= 1;
                if remaining == 0 {
                    let col = if spec.until { i - 1 } else { i };
                    return Some(Position::new(pos.line, col));
                }
            }
        }
        None
    } else {
        let mut upto = pos.column;
        if is_repeat && spec.until {
            upto = upto.saturating_sub(1);
        }
        let upto = upto.min(chars.len());
        for i in (0..upto).rev() {
            if chars[i] == spec.ch {
                remaining -= 1;
                if remaining == 0 {
                    let col = if spec.until { i + 1 } else { i };
                    return Some(Position::new(pos.line, col));
                }
            }
        }
        None
    }
}
