//! Command data model and keystroke grammar.
//!
//! The parser is a pure function over the accumulated pending input: it never
//! touches editor state. Each keystroke the host feeds in is appended to the
//! pending string and the whole string is re-parsed; the result is either a
//! complete [`Command`], a request for more input, or a rejection (after
//! which the caller discards the pending input).
//!
//! # Grammar
//!
//! ```text
//! [count] operator [count] (operator | i/a object | motion)   d2w, 3dd, ci(
//! [count] motion                                              5j, fx, gg, ;
//! [count] action                                              3x, p, r?, zz
//! ```
//!
//! Counts start with a non-zero digit (`0` alone is the line-start motion)
//! and compose multiplicatively across operator and motion — `3d2w` acts on
//! six words. The *absence* of a count is preserved so that motions which
//! treat a bare invocation specially (`G`) can tell `G` from `1G`.

use crate::motions::{FindCharSpec, Motion};
use crate::text_objects::{object_for_char, TextObject};

/// Control byte accepted for redo (`Ctrl-R`).
pub const CTRL_R: char = '\u{12}';

/// An operator: a command that consumes a range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// `d` — delete the range into the unnamed register.
    Delete,
    /// `c` — delete, then enter insert mode.
    Change,
    /// `y` — copy the range into the unnamed register.
    Yank,
    /// `>` — indent the covered lines.
    Indent,
    /// `<` — outdent the covered lines.
    Outdent,
}

impl Operator {
    fn from_char(c: char) -> Option<Self> {
        match c {
            'd' => Some(Operator::Delete),
            'c' => Some(Operator::Change),
            'y' => Some(Operator::Yank),
            '>' => Some(Operator::Indent),
            '<' => Some(Operator::Outdent),
            _ => None,
        }
    }

    fn key(self) -> char {
        match self {
            Operator::Delete => 'd',
            Operator::Change => 'c',
            Operator::Yank => 'y',
            Operator::Indent => '>',
            Operator::Outdent => '<',
        }
    }
}

/// What an operator acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorTarget {
    /// A motion operand (`dw`, `d$`, `dfx`).
    Motion(Motion),
    /// A text object operand (`diw`, `da(`).
    Object(TextObject),
    /// The doubled form (`dd`, `yy`): whole lines starting at the cursor.
    Lines,
    /// The active visual selection.
    Selection,
}

/// Viewport alignment requests (`zz`, `zt`, `zb`). The kernel owns no
/// scrolling state; these surface as hints to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollAlign {
    /// `zz` — center the cursor line.
    Center,
    /// `zt` — cursor line to the top.
    Top,
    /// `zb` — cursor line to the bottom.
    Bottom,
}

/// The fixed action set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// `i` — insert before the cursor.
    EnterInsert,
    /// `I` — insert at the first non-blank column.
    InsertLineStart,
    /// `a` — insert after the cursor.
    AppendAfter,
    /// `A` — insert at the end of the line.
    AppendLineEnd,
    /// `o` — open a line below.
    OpenBelow,
    /// `O` — open a line above.
    OpenAbove,
    /// `x` — delete characters at the cursor.
    DeleteChar,
    /// `X` — delete characters before the cursor.
    DeleteCharBefore,
    /// `s` — delete at the cursor, then insert.
    SubstituteChar,
    /// `S` — clear the line, then insert.
    SubstituteLine,
    /// `D` — delete to the end of the line.
    DeleteToLineEnd,
    /// `C` — change to the end of the line.
    ChangeToLineEnd,
    /// `J` — join the following line(s).
    JoinLines,
    /// `~` — toggle case (at the cursor, or over the visual selection).
    ToggleCase,
    /// `r<c>` — replace characters in place.
    ReplaceChar(char),
    /// `u` — undo.
    Undo,
    /// `Ctrl-R` — redo.
    Redo,
    /// `p` — paste after the cursor / below the line.
    PasteAfter,
    /// `P` — paste before the cursor / above the line.
    PasteBefore,
    /// `v` — begin (or leave) characterwise visual selection.
    VisualChar,
    /// `V` — begin (or leave) linewise visual selection.
    VisualLine,
    /// `n` — jump to the next search match in the stored direction.
    SearchNext,
    /// `N` — jump against the stored direction.
    SearchPrev,
    /// `*` — search for the word under the cursor, forward.
    SearchWordForward,
    /// `#` — search for the word under the cursor, backward.
    SearchWordBackward,
    /// `zz`/`zt`/`zb` — viewport positioning hint.
    Scroll(ScrollAlign),
}

/// A fully parsed command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// A bare motion: move the cursor.
    Motion {
        /// The motion to apply.
        motion: Motion,
        /// Typed count, if any.
        count: Option<usize>,
    },
    /// An operator applied to a target range.
    Operator {
        /// The operator.
        operator: Operator,
        /// The operand.
        target: OperatorTarget,
        /// Effective count (operator count × motion count when both given).
        count: Option<usize>,
    },
    /// A simple action.
    Action {
        /// The action.
        action: Action,
        /// Typed count, if any.
        count: Option<usize>,
    },
}

/// Context the parser needs from the caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParseOptions {
    /// A visual selection is active: a bare operator is complete and acts on
    /// the selection.
    pub visual: bool,
}

/// Result of parsing the pending input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parse {
    /// The input is a valid prefix; feed more keys.
    Pending,
    /// The input cannot extend into any command; discard it.
    Invalid,
    /// A complete command.
    Complete(Command),
}

struct Keys {
    chars: Vec<char>,
    index: usize,
}

impl Keys {
    fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            index: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.index).copied()
    }

    fn next(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.index += 1;
        Some(c)
    }

    fn exhausted(&self) -> bool {
        self.index >= self.chars.len()
    }

    /// A count is a non-zero digit followed by digits; a leading `0` is the
    /// line-start motion, not a count.
    fn count(&mut self) -> Option<usize> {
        let first = self.peek()?;
        if !first.is_ascii_digit() || first == '0' {
            return None;
        }
        let mut value = 0usize;
        while let Some(c) = self.peek() {
            if let Some(digit) = c.to_digit(10) {
                value = value.saturating_mul(10).saturating_add(digit as usize);
                self.index += 1;
            } else {
                break;
            }
        }
        Some(value)
    }
}

enum MotionParse {
    Motion(Motion),
    Pending,
    Invalid,
    NotAMotion,
}

fn parse_motion(first: char, keys: &mut Keys) -> MotionParse {
    let motion = match first {
        'h' => Motion::Left,
        'l' => Motion::Right,
        'j' => Motion::Down,
        'k' => Motion::Up,
        'w' => Motion::WordForward { big: false },
        'W' => Motion::WordForward { big: true },
        'b' => Motion::WordBackward { big: false },
        'B' => Motion::WordBackward { big: true },
        'e' => Motion::WordEnd { big: false },
        'E' => Motion::WordEnd { big: true },
        '0' => Motion::LineStart,
        '^' => Motion::FirstNonBlank,
        '$' => Motion::LineEnd,
        'G' => Motion::GotoLast,
        '{' => Motion::ParagraphBackward,
        '}' => Motion::ParagraphForward,
        '%' => Motion::MatchBracket,
        ';' => Motion::RepeatFind { reversed: false },
        ',' => Motion::RepeatFind { reversed: true },
        'g' => match keys.next() {
            None => return MotionParse::Pending,
            Some('g') => Motion::GotoFirst,
            Some(_) => return MotionParse::Invalid,
        },
        'f' | 'F' | 't' | 'T' => match keys.next() {
            None => return MotionParse::Pending,
            Some(ch) => Motion::FindChar(FindCharSpec {
                ch,
                forward: first == 'f' || first == 't',
                until: first == 't' || first == 'T',
            }),
        },
        _ => return MotionParse::NotAMotion,
    };
    MotionParse::Motion(motion)
}

fn action_for_char(c: char) -> Option<Action> {
    match c {
        'i' => Some(Action::EnterInsert),
        'I' => Some(Action::InsertLineStart),
        'a' => Some(Action::AppendAfter),
        'A' => Some(Action::AppendLineEnd),
        'o' => Some(Action::OpenBelow),
        'O' => Some(Action::OpenAbove),
        'x' => Some(Action::DeleteChar),
        'X' => Some(Action::DeleteCharBefore),
        's' => Some(Action::SubstituteChar),
        'S' => Some(Action::SubstituteLine),
        'D' => Some(Action::DeleteToLineEnd),
        'C' => Some(Action::ChangeToLineEnd),
        'J' => Some(Action::JoinLines),
        '~' => Some(Action::ToggleCase),
        'u' => Some(Action::Undo),
        CTRL_R => Some(Action::Redo),
        'p' => Some(Action::PasteAfter),
        'P' => Some(Action::PasteBefore),
        'v' => Some(Action::VisualChar),
        'V' => Some(Action::VisualLine),
        'n' => Some(Action::SearchNext),
        'N' => Some(Action::SearchPrev),
        '*' => Some(Action::SearchWordForward),
        '#' => Some(Action::SearchWordBackward),
        _ => None,
    }
}

/// Multiplicative count composition that preserves "no count typed".
fn combine_counts(a: Option<usize>, b: Option<usize>) -> Option<usize> {
    match (a, b) {
        (None, None) => None,
        (a, b) => Some(a.unwrap_or(1).saturating_mul(b.unwrap_or(1))),
    }
}

/// Parse the accumulated pending input into a command.
pub fn parse_input(input: &str, options: ParseOptions) -> Parse {
    let mut keys = Keys::new(input);
    let count = keys.count();

    let first = match keys.next() {
        None => return Parse::Pending, // only a count so far
        Some(c) => c,
    };

    let parse = if let Some(operator) = Operator::from_char(first) {
        parse_operator(operator, count, &mut keys, options)
    } else {
        parse_simple(first, count, &mut keys)
    };

    // A complete command must consume the whole pending string; the caller
    // clears it on completion, so trailing garbage means a bad sequence.
    match parse {
        Parse::Complete(_) if !keys.exhausted() => Parse::Invalid,
        parse => parse,
    }
}

fn parse_operator(
    operator: Operator,
    operator_count: Option<usize>,
    keys: &mut Keys,
    options: ParseOptions,
) -> Parse {
    if options.visual {
        return Parse::Complete(Command::Operator {
            operator,
            target: OperatorTarget::Selection,
            count: operator_count,
        });
    }

    let motion_count = keys.count();
    let next = match keys.next() {
        None => return Parse::Pending,
        Some(c) => c,
    };

    if next == operator.key() {
        return Parse::Complete(Command::Operator {
            operator,
            target: OperatorTarget::Lines,
            count: combine_counts(operator_count, motion_count),
        });
    }

    if next == 'i' || next == 'a' {
        return match keys.next() {
            None => Parse::Pending,
            Some(key) => match object_for_char(key) {
                Some(kind) => Parse::Complete(Command::Operator {
                    operator,
                    target: OperatorTarget::Object(TextObject {
                        kind,
                        around: next == 'a',
                    }),
                    count: combine_counts(operator_count, motion_count),
                }),
                None => Parse::Invalid,
            },
        };
    }

    match parse_motion(next, keys) {
        MotionParse::Motion(motion) => Parse::Complete(Command::Operator {
            operator,
            target: OperatorTarget::Motion(motion),
            count: combine_counts(operator_count, motion_count),
        }),
        MotionParse::Pending => Parse::Pending,
        MotionParse::Invalid | MotionParse::NotAMotion => Parse::Invalid,
    }
}

fn parse_simple(first: char, count: Option<usize>, keys: &mut Keys) -> Parse {
    match parse_motion(first, keys) {
        MotionParse::Motion(motion) => return Parse::Complete(Command::Motion { motion, count }),
        MotionParse::Pending => return Parse::Pending,
        MotionParse::Invalid => return Parse::Invalid,
        MotionParse::NotAMotion => {}
    }

    if first == 'z' {
        return match keys.next() {
            None => Parse::Pending,
            Some('z') => scroll(Action::Scroll(ScrollAlign::Center), count),
            Some('t') => scroll(Action::Scroll(ScrollAlign::Top), count),
            Some('b') => scroll(Action::Scroll(ScrollAlign::Bottom), count),
            Some(_) => Parse::Invalid,
        };
    }

    if first == 'r' {
        return match keys.next() {
            None => Parse::Pending,
            Some(ch) => Parse::Complete(Command::Action {
                action: Action::ReplaceChar(ch),
                count,
            }),
        };
    }

    match action_for_char(first) {
        Some(action) => Parse::Complete(Command::Action { action, count }),
        None => Parse::Invalid,
    }
}

fn scroll(action: Action, count: Option<usize>) -> Parse {
    Parse::Complete(Command::Action { action, count })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normal(input: &str) -> Parse {
        parse_input(input, ParseOptions::default())
    }

    fn complete(input: &str) -> Command {
        match normal(input) {
            Parse::Complete(command) => command,
            other => panic!("expected a complete command for {input:?}, got {other:?}"),
        }
    }

    #[test]
    fn test_bare_motion() {
        assert_eq!(
            complete("w"),
            Command::Motion {
                motion: Motion::WordForward { big: false },
                count: None
            }
        );
    }

    #[test]
    fn test_counted_motion() {
        assert_eq!(
            complete("12j"),
            Command::Motion {
                motion: Motion::Down,
                count: Some(12)
            }
        );
    }

    #[test]
    fn test_zero_is_a_motion_not_a_count() {
        assert_eq!(
            complete("0"),
            Command::Motion {
                motion: Motion::LineStart,
                count: None
            }
        );
        // ... but a zero after a non-zero digit is part of the count.
        assert_eq!(
            complete("10j"),
            Command::Motion {
                motion: Motion::Down,
                count: Some(10)
            }
        );
    }

    #[test]
    fn test_count_alone_is_pending() {
        assert_eq!(normal("3"), Parse::Pending);
        assert_eq!(normal("31"), Parse::Pending);
    }

    #[test]
    fn test_operator_pending_then_motion() {
        assert_eq!(normal("d"), Parse::Pending);
        assert_eq!(
            complete("dw"),
            Command::Operator {
                operator: Operator::Delete,
                target: OperatorTarget::Motion(Motion::WordForward { big: false }),
                count: None
            }
        );
    }

    #[test]
    fn test_doubled_operator_is_linewise() {
        assert_eq!(
            complete("dd"),
            Command::Operator {
                operator: Operator::Delete,
                target: OperatorTarget::Lines,
                count: None
            }
        );
        assert_eq!(
            complete("3yy"),
            Command::Operator {
                operator: Operator::Yank,
                target: OperatorTarget::Lines,
                count: Some(3)
            }
        );
        assert_eq!(
            complete(">>"),
            Command::Operator {
                operator: Operator::Indent,
                target: OperatorTarget::Lines,
                count: None
            }
        );
    }

    #[test]
    fn test_counts_compose_multiplicatively() {
        assert_eq!(
            complete("3d2w"),
            Command::Operator {
                operator: Operator::Delete,
                target: OperatorTarget::Motion(Motion::WordForward { big: false }),
                count: Some(6)
            }
        );
    }

    #[test]
    fn test_count_absence_is_preserved() {
        assert_eq!(
            complete("dG"),
            Command::Operator {
                operator: Operator::Delete,
                target: OperatorTarget::Motion(Motion::GotoLast),
                count: None
            }
        );
        assert_eq!(
            complete("d2G"),
            Command::Operator {
                operator: Operator::Delete,
                target: OperatorTarget::Motion(Motion::GotoLast),
                count: Some(2)
            }
        );
    }

    #[test]
    fn test_operator_on_text_object() {
        let command = complete("di(");
        match command {
            Command::Operator {
                operator: Operator::Delete,
                target: OperatorTarget::Object(object),
                count: None,
            } => assert!(!object.around),
            other => panic!("unexpected parse: {other:?}"),
        }
        assert_eq!(normal("di"), Parse::Pending);
        assert_eq!(normal("diq"), Parse::Invalid);
    }

    #[test]
    fn test_operator_on_find_motion() {
        assert_eq!(normal("df"), Parse::Pending);
        assert_eq!(
            complete("dfx"),
            Command::Operator {
                operator: Operator::Delete,
                target: OperatorTarget::Motion(Motion::FindChar(FindCharSpec {
                    ch: 'x',
                    forward: true,
                    until: false
                })),
                count: None
            }
        );
    }

    #[test]
    fn test_g_prefix() {
        assert_eq!(normal("g"), Parse::Pending);
        assert_eq!(
            complete("gg"),
            Command::Motion {
                motion: Motion::GotoFirst,
                count: None
            }
        );
        assert_eq!(normal("gx"), Parse::Invalid);
    }

    #[test]
    fn test_z_prefix() {
        assert_eq!(normal("z"), Parse::Pending);
        assert_eq!(
            complete("zz"),
            Command::Action {
                action: Action::Scroll(ScrollAlign::Center),
                count: None
            }
        );
        assert_eq!(normal("zq"), Parse::Invalid);
    }

    #[test]
    fn test_find_char_waits_for_operand() {
        assert_eq!(normal("f"), Parse::Pending);
        assert_eq!(
            complete("fx"),
            Command::Motion {
                motion: Motion::FindChar(FindCharSpec {
                    ch: 'x',
                    forward: true,
                    until: false
                }),
                count: None
            }
        );
        assert_eq!(
            complete("T,"),
            Command::Motion {
                motion: Motion::FindChar(FindCharSpec {
                    ch: ',',
                    forward: false,
                    until: true
                }),
                count: None
            }
        );
    }

    #[test]
    fn test_replace_waits_for_operand() {
        assert_eq!(normal("r"), Parse::Pending);
        assert_eq!(
            complete("rq"),
            Command::Action {
                action: Action::ReplaceChar('q'),
                count: None
            }
        );
    }

    #[test]
    fn test_ctrl_r_is_redo() {
        assert_eq!(
            complete("\u{12}"),
            Command::Action {
                action: Action::Redo,
                count: None
            }
        );
    }

    #[test]
    fn test_unknown_key_is_invalid() {
        assert_eq!(normal("q"), Parse::Invalid);
        assert_eq!(normal("d!"), Parse::Invalid);
    }

    #[test]
    fn test_visual_operator_completes_immediately() {
        let options = ParseOptions { visual: true };
        assert_eq!(
            parse_input("d", options),
            Parse::Complete(Command::Operator {
                operator: Operator::Delete,
                target: OperatorTarget::Selection,
                count: None
            })
        );
    }

    #[test]
    fn test_semicolon_and_comma() {
        assert_eq!(
            complete(";"),
            Command::Motion {
                motion: Motion::RepeatFind { reversed: false },
                count: None
            }
        );
        assert_eq!(
            complete(","),
            Command::Motion {
                motion: Motion::RepeatFind { reversed: true },
                count: None
            }
        );
    }
}
