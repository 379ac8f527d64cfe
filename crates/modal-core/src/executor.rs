//! Command execution.
//!
//! This module applies a parsed [`Command`] to the [`Editor`]: motions move
//! the cursor, operators resolve a range and act on it, actions cover the
//! fixed single-key command set. Every mutation that replaces the buffer
//! pushes a history snapshot first; no-ops (empty ranges, boundary motions,
//! empty registers) leave history untouched.
//!
//! The decomposition mirrors the command enum: one method per concern, all of
//! them total — failures are absorbed into the returned [`Applied`] record.

use crate::buffer::{normalize, Buffer, Position};
use crate::commands::{Action, Command, Operator, OperatorTarget, ScrollAlign};
use crate::motions::Motion;
use crate::search::{find_all, word_under_cursor};
use crate::state::{CoreEvent, Editor, ErrorKind, Mode, VisualKind, VisualSelection};

/// What applying one command did.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Applied {
    pub(crate) buffer_changed: bool,
    pub(crate) viewport: Option<ScrollAlign>,
    pub(crate) error: Option<ErrorKind>,
}

impl Applied {
    fn none() -> Self {
        Self::default()
    }

    fn changed() -> Self {
        Self {
            buffer_changed: true,
            ..Self::default()
        }
    }

    fn error(kind: ErrorKind) -> Self {
        Self {
            error: Some(kind),
            ..Self::default()
        }
    }

    fn viewport(align: ScrollAlign) -> Self {
        Self {
            viewport: Some(align),
            ..Self::default()
        }
    }
}

/// A resolved operator range.
#[derive(Debug, Clone, Copy)]
enum OpRange {
    /// Characterwise, end-exclusive.
    Chars { start: Position, end: Position },
    /// Whole lines, both ends inclusive.
    Lines { first: usize, last: usize },
}

impl Editor {
    /// Execute a complete command and translate the outcome into a
    /// [`CoreEvent`].
    pub(crate) fn run_command(&mut self, command: &Command) -> CoreEvent {
        let mode_before = self.mode;
        let applied = self.apply(command);

        if applied.buffer_changed {
            self.after_buffer_change();
        }
        if let Some(align) = applied.viewport {
            return CoreEvent::ViewportHint(align);
        }
        if let Some(kind) = applied.error {
            return CoreEvent::Error(kind);
        }
        self.executed(self.mode != mode_before, applied.buffer_changed)
    }

    fn apply(&mut self, command: &Command) -> Applied {
        match command {
            Command::Motion { motion, count } => self.apply_motion(motion, *count),
            Command::Operator {
                operator,
                target,
                count,
            } => self.apply_operator(*operator, target, *count),
            Command::Action { action, count } => self.apply_action(*action, *count),
        }
    }

    // --- Motions -----------------------------------------------------------

    fn apply_motion(&mut self, motion: &Motion, count: Option<usize>) -> Applied {
        if let Motion::FindChar(spec) = motion {
            self.session.last_find = Some(*spec);
        }

        let target = match motion.resolve(
            &self.buffer,
            &self.cursor,
            count,
            self.session.last_find.as_ref(),
        ) {
            Some(target) => self.buffer.clamp_normal(target),
            None => return Applied::none(), // nothing found: cursor stays
        };

        if motion.is_vertical() {
            let wanted = self
                .cursor
                .desired_column
                .unwrap_or(self.cursor.position.column);
            self.cursor.position = target;
            self.cursor.desired_column = if target.column < wanted {
                Some(wanted)
            } else {
                None
            };
        } else {
            self.cursor.position = target;
            self.cursor.desired_column = None;
        }
        Applied::none()
    }

    // --- Operators ---------------------------------------------------------

    fn apply_operator(
        &mut self,
        operator: Operator,
        target: &OperatorTarget,
        count: Option<usize>,
    ) -> Applied {
        self.cursor.desired_column = None;

        let from_selection = matches!(target, OperatorTarget::Selection);
        let selection_start = self
            .visual
            .map(|v| normalize(v.anchor, self.cursor.position).0);

        let range = self.resolve_operator_range(target, count);
        // Any operator ends the visual selection, found range or not.
        self.visual = None;

        let range = match range {
            Some(range) => range,
            None => return Applied::none(),
        };

        match operator {
            Operator::Delete => self.op_delete(range, false),
            Operator::Change => self.op_delete(range, true),
            Operator::Yank => self.op_yank(range, from_selection, selection_start),
            Operator::Indent => self.op_indent(range, false),
            Operator::Outdent => self.op_indent(range, true),
        }
    }

    fn resolve_operator_range(
        &mut self,
        target: &OperatorTarget,
        count: Option<usize>,
    ) -> Option<OpRange> {
        match target {
            OperatorTarget::Lines => {
                let first = self.cursor.position.line;
                let n = count.unwrap_or(1).max(1);
                let last = (first + n - 1).min(self.buffer.last_line());
                Some(OpRange::Lines { first, last })
            }
            OperatorTarget::Motion(motion) => {
                if let Motion::FindChar(spec) = motion {
                    self.session.last_find = Some(*spec);
                }
                let inclusive = motion.inclusive(self.session.last_find.as_ref());
                let target_pos = motion.resolve(
                    &self.buffer,
                    &self.cursor,
                    count,
                    self.session.last_find.as_ref(),
                )?;

                if motion.linewise() {
                    let a = self.cursor.position.line;
                    let b = target_pos.line.min(self.buffer.last_line());
                    Some(OpRange::Lines {
                        first: a.min(b),
                        last: a.max(b),
                    })
                } else {
                    let origin = self.buffer.clamp_normal(self.cursor.position);
                    // The target is clamped to the insert bound only: a
                    // motion that ran off the end of the buffer keeps its
                    // one-past-end column so the final character is covered.
                    let target_pos = self.buffer.clamp(target_pos);
                    let (start, mut end) = normalize(origin, target_pos);
                    if inclusive && start < end {
                        end = self.position_after(end);
                    }
                    Some(OpRange::Chars { start, end })
                }
            }
            OperatorTarget::Object(object) => {
                let span = object.resolve(&self.buffer, self.cursor.position)?;
                Some(OpRange::Chars {
                    start: span.start,
                    end: self.position_after(span.end),
                })
            }
            OperatorTarget::Selection => {
                let selection = self.visual?;
                let (start, end) = normalize(selection.anchor, self.cursor.position);
                match selection.kind {
                    VisualKind::Line => Some(OpRange::Lines {
                        first: start.line,
                        last: end.line.min(self.buffer.last_line()),
                    }),
                    VisualKind::Char => Some(OpRange::Chars {
                        start,
                        end: self.position_after(end),
                    }),
                }
            }
        }
    }

    /// The position one character past `pos` (used to turn inclusive ends
    /// into exclusive ones without column clamping artifacts).
    fn position_after(&self, pos: Position) -> Position {
        let offset = self.buffer.position_to_char(pos) + 1;
        self.buffer
            .char_to_position(offset.min(self.buffer.total_chars()))
    }

    fn lines_text(&self, first: usize, last: usize) -> String {
        (first..=last)
            .map(|i| self.buffer.line(i))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Char-offset range that removes lines `first..=last` entirely,
    /// including one bounding newline.
    fn line_block_offsets(&self, first: usize, last: usize) -> (usize, usize) {
        let total = self.buffer.total_chars();
        if last < self.buffer.last_line() {
            let start = self.buffer.position_to_char(Position::new(first, 0));
            let end = self.buffer.position_to_char(Position::new(last + 1, 0));
            (start, end)
        } else if first > 0 {
            let start = self.buffer.position_to_char(Position::new(first, 0)) - 1;
            (start, total)
        } else {
            (0, total)
        }
    }

    fn op_delete(&mut self, range: OpRange, change: bool) -> Applied {
        match range {
            OpRange::Lines { first, last } => {
                let text = self.lines_text(first, last);
                self.session.registers.set_unnamed(text, true);

                if change {
                    // Keep a single empty line at the original start line:
                    // remove the content and the interior newlines only.
                    let start = Position::new(first, 0);
                    let end = Position::new(last, self.buffer.line_length(last));
                    let changed = self.buffer.position_to_char(start)
                        < self.buffer.position_to_char(end);
                    if changed {
                        self.push_history();
                        self.buffer = self.buffer.delete_range(start, end);
                    }
                    self.cursor.position = Position::new(first, 0);
                    self.begin_insert(changed);
                    if changed {
                        Applied::changed()
                    } else {
                        Applied::none()
                    }
                } else {
                    let (start, end) = self.line_block_offsets(first, last);
                    let changed = start < end;
                    if changed {
                        self.push_history();
                        self.buffer = self
                            .buffer
                            .delete_range(self.buffer.char_to_position(start), self.buffer.char_to_position(end));
                    }
                    let line = first.min(self.buffer.last_line());
                    self.cursor.position =
                        Position::new(line, self.buffer.first_non_blank(line));
                    if changed {
                        Applied::changed()
                    } else {
                        Applied::none()
                    }
                }
            }
            OpRange::Chars { start, end } => {
                let text = self.buffer.text_in_range(start, end);
                if text.is_empty() {
                    if change {
                        // `c` with an empty range still enters insert mode.
                        self.begin_insert(false);
                    }
                    return Applied::none();
                }
                self.session.registers.set_unnamed(text, false);
                self.push_history();
                self.buffer = self.buffer.delete_range(start, end);
                if change {
                    self.cursor.position = self.buffer.clamp(start);
                    self.begin_insert(true);
                } else {
                    self.cursor.position = self.buffer.clamp_normal(start);
                }
                Applied::changed()
            }
        }
    }

    fn op_yank(
        &mut self,
        range: OpRange,
        from_selection: bool,
        selection_start: Option<Position>,
    ) -> Applied {
        match range {
            OpRange::Lines { first, last } => {
                let text = self.lines_text(first, last);
                self.session.registers.set_unnamed(text, true);
            }
            OpRange::Chars { start, end } => {
                let text = self.buffer.text_in_range(start, end);
                if text.is_empty() {
                    return Applied::none();
                }
                self.session.registers.set_unnamed(text, false);
            }
        }
        // Motion yanks leave the cursor alone; visual yanks snap to the
        // selection start.
        if from_selection {
            if let Some(start) = selection_start {
                self.cursor.position = self.buffer.clamp_normal(start);
            }
        }
        Applied::none()
    }

    fn op_indent(&mut self, range: OpRange, outdent: bool) -> Applied {
        let (first, last) = match range {
            OpRange::Lines { first, last } => (first, last),
            OpRange::Chars { start, end } => {
                let last = if end.line > start.line && end.column == 0 {
                    end.line - 1
                } else {
                    end.line
                };
                (start.line, last.min(self.buffer.last_line()))
            }
        };

        let indent: String = std::iter::repeat(' ').take(self.indent_width).collect();
        let mut updated = self.buffer.clone();
        let mut changed = false;

        for line in first..=last {
            if outdent {
                let leading = updated
                    .line(line)
                    .chars()
                    .take_while(|c| *c == ' ')
                    .count()
                    .min(self.indent_width);
                if leading > 0 {
                    updated = updated
                        .delete_range(Position::new(line, 0), Position::new(line, leading));
                    changed = true;
                }
            } else if updated.line_length(line) > 0 {
                updated = updated.insert(Position::new(line, 0), &indent);
                changed = true;
            }
        }

        if changed {
            self.push_history();
            self.buffer = updated;
        }
        self.cursor.position = Position::new(first, self.buffer.first_non_blank(first));
        if changed {
            Applied::changed()
        } else {
            Applied::none()
        }
    }

    // --- Actions -----------------------------------------------------------

    fn apply_action(&mut self, action: Action, count: Option<usize>) -> Applied {
        let n = count.unwrap_or(1).max(1);
        self.cursor.desired_column = None;

        match action {
            Action::EnterInsert => {
                self.begin_insert(false);
                Applied::none()
            }
            Action::InsertLineStart => {
                let line = self.cursor.position.line;
                self.cursor.position = Position::new(line, self.buffer.first_non_blank(line));
                self.begin_insert(false);
                Applied::none()
            }
            Action::AppendAfter => {
                let pos = self.cursor.position;
                let len = self.buffer.line_length(pos.line);
                self.cursor.position = Position::new(pos.line, (pos.column + 1).min(len));
                self.begin_insert(false);
                Applied::none()
            }
            Action::AppendLineEnd => {
                let line = self.cursor.position.line;
                self.cursor.position = Position::new(line, self.buffer.line_length(line));
                self.begin_insert(false);
                Applied::none()
            }
            Action::OpenBelow => {
                let line = self.cursor.position.line;
                self.push_history();
                self.buffer = self
                    .buffer
                    .insert(Position::new(line, self.buffer.line_length(line)), "\n");
                self.cursor.position = Position::new(line + 1, 0);
                self.begin_insert(true);
                Applied::changed()
            }
            Action::OpenAbove => {
                let line = self.cursor.position.line;
                self.push_history();
                self.buffer = self.buffer.insert(Position::new(line, 0), "\n");
                self.cursor.position = Position::new(line, 0);
                self.begin_insert(true);
                Applied::changed()
            }
            Action::DeleteChar => self.delete_at_cursor(n, false),
            Action::DeleteCharBefore => {
                let pos = self.cursor.position;
                let take = n.min(pos.column);
                if take == 0 {
                    return Applied::none();
                }
                let start = Position::new(pos.line, pos.column - take);
                let text = self.buffer.text_in_range(start, pos);
                self.session.registers.set_unnamed(text, false);
                self.push_history();
                self.buffer = self.buffer.delete_range(start, pos);
                self.cursor.position = self.buffer.clamp_normal(start);
                Applied::changed()
            }
            Action::SubstituteChar => self.delete_at_cursor(n, true),
            Action::SubstituteLine => {
                let line = self.cursor.position.line;
                let len = self.buffer.line_length(line);
                self.session
                    .registers
                    .set_unnamed(self.buffer.line(line), true);
                let changed = len > 0;
                if changed {
                    self.push_history();
                    self.buffer = self
                        .buffer
                        .delete_range(Position::new(line, 0), Position::new(line, len));
                }
                self.cursor.position = Position::new(line, 0);
                self.begin_insert(changed);
                if changed {
                    Applied::changed()
                } else {
                    Applied::none()
                }
            }
            Action::DeleteToLineEnd => self.delete_to_line_end(false),
            Action::ChangeToLineEnd => self.delete_to_line_end(true),
            Action::JoinLines => self.join_lines(n),
            Action::ToggleCase => self.toggle_case(n),
            Action::ReplaceChar(c) => self.replace_chars(c, n),
            Action::Undo => {
                match self
                    .history
                    .undo(self.buffer.clone(), self.cursor)
                {
                    Some(snapshot) => {
                        self.buffer = snapshot.buffer;
                        self.cursor = snapshot.cursor;
                        Applied::changed()
                    }
                    None => Applied::none(),
                }
            }
            Action::Redo => {
                match self
                    .history
                    .redo(self.buffer.clone(), self.cursor)
                {
                    Some(snapshot) => {
                        self.buffer = snapshot.buffer;
                        self.cursor = snapshot.cursor;
                        Applied::changed()
                    }
                    None => Applied::none(),
                }
            }
            Action::PasteAfter => self.paste(n, true),
            Action::PasteBefore => self.paste(n, false),
            Action::VisualChar => {
                self.toggle_visual(VisualKind::Char);
                Applied::none()
            }
            Action::VisualLine => {
                self.toggle_visual(VisualKind::Line);
                Applied::none()
            }
            Action::SearchNext => self.search_step(n, false),
            Action::SearchPrev => self.search_step(n, true),
            Action::SearchWordForward => self.search_word(true),
            Action::SearchWordBackward => self.search_word(false),
            Action::Scroll(align) => Applied::viewport(align),
        }
    }

    /// `i`-family entry into insert mode. `pushed` tells whether the entering
    /// command already recorded history; if not, the pre-insert state is
    /// armed and pushed lazily by the first mutation of the session.
    fn begin_insert(&mut self, pushed: bool) {
        self.pending_insert_snapshot = if pushed {
            None
        } else {
            Some((self.buffer.clone(), self.cursor))
        };
        self.visual = None;
        self.mode = Mode::Insert;
    }

    fn toggle_visual(&mut self, kind: VisualKind) {
        self.visual = match self.visual {
            Some(selection) if selection.kind == kind => None,
            Some(selection) => Some(VisualSelection {
                anchor: selection.anchor,
                kind,
            }),
            None => Some(VisualSelection {
                anchor: self.cursor.position,
                kind,
            }),
        };
    }

    /// `x` / `s`: delete up to `n` characters at the cursor, staying on the
    /// current line.
    fn delete_at_cursor(&mut self, n: usize, then_insert: bool) -> Applied {
        let pos = self.cursor.position;
        let len = self.buffer.line_length(pos.line);
        let take = n.min(len.saturating_sub(pos.column));
        if take == 0 {
            if then_insert {
                self.begin_insert(false);
            }
            return Applied::none();
        }

        let end = Position::new(pos.line, pos.column + take);
        let text = self.buffer.text_in_range(pos, end);
        self.session.registers.set_unnamed(text, false);
        self.push_history();
        self.buffer = self.buffer.delete_range(pos, end);
        if then_insert {
            self.cursor.position = self.buffer.clamp(pos);
            self.begin_insert(true);
        } else {
            self.cursor.position = self.buffer.clamp_normal(pos);
        }
        Applied::changed()
    }

    /// `D` / `C`: delete from the cursor to the end of the line.
    fn delete_to_line_end(&mut self, then_insert: bool) -> Applied {
        let pos = self.cursor.position;
        let end = Position::new(pos.line, self.buffer.line_length(pos.line));
        let text = self.buffer.text_in_range(pos, end);
        if text.is_empty() {
            if then_insert {
                self.begin_insert(false);
            }
            return Applied::none();
        }

        self.session.registers.set_unnamed(text, false);
        self.push_history();
        self.buffer = self.buffer.delete_range(pos, end);
        if then_insert {
            self.cursor.position = self.buffer.clamp(pos);
            self.begin_insert(true);
        } else {
            self.cursor.position = self.buffer.clamp_normal(pos);
        }
        Applied::changed()
    }

    /// `J`: join the next `n` lines onto the current one.
    fn join_lines(&mut self, n: usize) -> Applied {
        let line = self.cursor.position.line;
        if line >= self.buffer.last_line() {
            return Applied::none();
        }

        self.push_history();
        let mut join_col = self.cursor.position.column;
        for _ in 0..n {
            if line >= self.buffer.last_line() {
                break;
            }
            let len = self.buffer.line_length(line);
            let next_text = self.buffer.line(line + 1);
            let next_start = next_text
                .chars()
                .take_while(|c| c.is_whitespace())
                .count();
            let left_empty = len == 0;
            let right_empty = next_start == next_text.chars().count();

            self.buffer = self.buffer.delete_range(
                Position::new(line, len),
                Position::new(line + 1, next_start),
            );
            if !left_empty && !right_empty {
                self.buffer = self.buffer.insert(Position::new(line, len), " ");
            }
            join_col = len;
        }
        self.cursor.position = self.buffer.clamp_normal(Position::new(line, join_col));
        Applied::changed()
    }

    /// `~`: toggle case at the cursor (or over the visual selection).
    fn toggle_case(&mut self, n: usize) -> Applied {
        if self.visual.is_some() {
            let range = self.resolve_operator_range(&OperatorTarget::Selection, None);
            self.visual = None;
            let (start, end) = match range {
                Some(OpRange::Chars { start, end }) => (start, end),
                Some(OpRange::Lines { first, last }) => (
                    Position::new(first, 0),
                    Position::new(last, self.buffer.line_length(last)),
                ),
                None => return Applied::none(),
            };
            let text = self.buffer.text_in_range(start, end);
            let toggled = toggled_case(&text);
            if text.is_empty() || text == toggled {
                self.cursor.position = self.buffer.clamp_normal(start);
                return Applied::none();
            }
            self.push_history();
            self.buffer = replace_range(&self.buffer, start, end, &toggled);
            self.cursor.position = self.buffer.clamp_normal(start);
            return Applied::changed();
        }

        let pos = self.cursor.position;
        let len = self.buffer.line_length(pos.line);
        let take = n.min(len.saturating_sub(pos.column));
        if take == 0 {
            return Applied::none();
        }
        let end = Position::new(pos.line, pos.column + take);
        let text = self.buffer.text_in_range(pos, end);
        let toggled = toggled_case(&text);
        if text != toggled {
            self.push_history();
            self.buffer = replace_range(&self.buffer, pos, end, &toggled);
        }
        self.cursor.position = self
            .buffer
            .clamp_normal(Position::new(pos.line, pos.column + take));
        if text != toggled {
            Applied::changed()
        } else {
            Applied::none()
        }
    }

    /// `r<c>`: replace `n` characters in place; a no-op when fewer than `n`
    /// characters remain on the line.
    fn replace_chars(&mut self, replacement: char, n: usize) -> Applied {
        if replacement.is_control() {
            return Applied::none();
        }
        let pos = self.cursor.position;
        let len = self.buffer.line_length(pos.line);
        if pos.column + n > len {
            return Applied::none();
        }
        let end = Position::new(pos.line, pos.column + n);
        let text: String = std::iter::repeat(replacement).take(n).collect();
        self.push_history();
        self.buffer = replace_range(&self.buffer, pos, end, &text);
        self.cursor.position = Position::new(pos.line, pos.column + n - 1);
        Applied::changed()
    }

    /// `p` / `P`: paste the unnamed register `n` times.
    fn paste(&mut self, n: usize, after: bool) -> Applied {
        let register = self.session.registers.unnamed().clone();
        if register.text.is_empty() {
            return Applied::error(ErrorKind::EmptyRegister);
        }

        let pos = self.cursor.position;
        if register.linewise {
            let block = vec![register.text.as_str(); n].join("\n");
            self.push_history();
            if after {
                let at = Position::new(pos.line, self.buffer.line_length(pos.line));
                let mut text = String::with_capacity(block.len() + 1);
                text.push('\n');
                text.push_str(&block);
                self.buffer = self.buffer.insert(at, &text);
                let line = pos.line + 1;
                self.cursor.position = Position::new(line, self.buffer.first_non_blank(line));
            } else {
                let at = Position::new(pos.line, 0);
                let mut text = String::with_capacity(block.len() + 1);
                text.push_str(&block);
                text.push('\n');
                self.buffer = self.buffer.insert(at, &text);
                self.cursor.position =
                    Position::new(pos.line, self.buffer.first_non_blank(pos.line));
            }
        } else {
            let text = register.text.repeat(n);
            let at = if after {
                let len = self.buffer.line_length(pos.line);
                Position::new(pos.line, (pos.column + 1).min(len))
            } else {
                pos
            };
            self.push_history();
            let start_offset = self.buffer.position_to_char(at);
            self.buffer = self.buffer.insert(at, &text);
            let end_offset = start_offset + text.chars().count();
            self.cursor.position = self
                .buffer
                .clamp_normal(self.buffer.char_to_position(end_offset.saturating_sub(1)));
        }
        Applied::changed()
    }

    /// `n` / `N`: step through the stored match list, wrapping.
    fn search_step(&mut self, n: usize, against: bool) -> Applied {
        if self.session.search.pattern.is_none() || self.session.search.matches.is_empty() {
            return Applied::none();
        }
        let forward = self.session.search.forward != against;
        for _ in 0..n {
            self.jump_to_search_match(self.cursor.position, forward);
        }
        Applied::none()
    }

    /// `*` / `#`: seed the search state from the word under the cursor and
    /// jump to its nearest other occurrence.
    fn search_word(&mut self, forward: bool) -> Applied {
        let pos = self.cursor.position;
        let word = match word_under_cursor(&self.buffer, pos) {
            Some(word) => word,
            None => return Applied::none(),
        };

        let matches = find_all(&self.buffer, &word.text, true);
        self.session.search = crate::state::SearchState {
            pattern: Some(word.text),
            forward,
            whole_word: true,
            matches,
            current: None,
        };

        let from = if forward {
            // First match strictly after the current word's end.
            Position::new(pos.line, word.end_col.saturating_sub(1))
        } else {
            // First match strictly before the current word's start.
            Position::new(pos.line, word.start_col)
        };
        self.jump_to_search_match(from, forward);
        Applied::none()
    }

    fn push_history(&mut self) {
        self.history.push(self.buffer.clone(), self.cursor);
        self.pending_insert_snapshot = None;
    }
}

fn replace_range(buffer: &Buffer, start: Position, end: Position, text: &str) -> Buffer {
    buffer.delete_range(start, end).insert(start, text)
}

/// Swap the case of every cased character with a one-to-one mapping;
/// characters with multi-char case foldings are left alone so columns stay
/// stable.
fn toggled_case(text: &str) -> String {
    text.chars()
        .map(|c| {
            if c.is_lowercase() {
                single_char_mapping(c.to_uppercase()).unwrap_or(c)
            } else if c.is_uppercase() {
                single_char_mapping(c.to_lowercase()).unwrap_or(c)
            } else {
                c
            }
        })
        .collect()
}

fn single_char_mapping(mut mapping: impl Iterator<Item = char>) -> Option<char> {
    let first = mapping.next()?;
    if mapping.next().is_some() {
        None
    } else {
        Some(first)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggled_case() {
        assert_eq!(toggled_case("aB3_é"), "Ab3_É");
        // German sharp s uppercases to "SS"; it stays put to keep columns
        // stable.
        assert_eq!(toggled_case("ß"), "ß");
    }

    #[test]
    fn test_replace_range() {
        let buffer = Buffer::from_text("hello world");
        let replaced = replace_range(
            &buffer,
            Position::new(0, 0),
            Position::new(0, 5),
            "goodbye",
        );
        assert_eq!(replaced.full_text(), "goodbye world");
    }
}
