//! Editor state and the key-driven command surface.
//!
//! [`Editor`] owns everything a modal editing session needs: the buffer, the
//! cursor, the mode, the optional visual selection, the vim session state
//! (pending input, registers, last find, search), and the undo history. A
//! host drives it exclusively through [`Editor::feed_key`] and reads it back
//! through the query methods — there is no other mutation path, which keeps
//! the kernel renderable-from-outside and trivially testable.
//!
//! # Overview
//!
//! - Keys are plain `char`s; control bytes cover the non-printable inputs
//!   (Escape `\x1b`, Enter `\r`, Backspace `\x7f`/`\x08`, Ctrl-R `\x12`).
//! - Every call returns a [`CoreEvent`] describing what happened; invalid
//!   input is absorbed, never thrown.
//! - External collaborators attach at the edges: diagnostics are pushed in
//!   via [`Editor::set_diagnostics`], highlighting is consumed through a
//!   [`HighlightProvider`], and soft-wrap display motions arrive pre-resolved
//!   through [`Editor::display_line_motion`].
//!
//! # Example
//!
//! ```rust
//! use modal_core::{Editor, Position};
//!
//! let mut editor = Editor::from_text("hello world");
//! editor.feed_keys("dw");
//! assert_eq!(editor.snapshot_text(), "world");
//! assert_eq!(editor.cursor(), Position::new(0, 0));
//!
//! // Undo restores both text and cursor.
//! editor.feed_keys("u");
//! assert_eq!(editor.snapshot_text(), "hello world");
//! ```

use crate::buffer::{normalize, Buffer, Cursor, Position};
use crate::commands::{parse_input, Parse, ParseOptions, ScrollAlign};
use crate::diagnostics::Diagnostic;
use crate::history::History;
use crate::line_ending::{normalize_to_lf, LineEnding};
use crate::motions::FindCharSpec;
use crate::search::find_all;
use std::collections::HashMap;

/// Escape control byte.
pub const KEY_ESCAPE: char = '\u{1b}';
/// Enter control byte (`'\n'` is accepted as well).
pub const KEY_ENTER: char = '\r';
/// Backspace control byte (`'\u{8}'` is accepted as well).
pub const KEY_BACKSPACE: char = '\u{7f}';

/// Default indent unit: four spaces.
pub const DEFAULT_INDENT_WIDTH: usize = 4;

/// The editor mode. Visual selection is *not* a mode: it is tracked
/// separately so that insert mode and a live selection stay mutually
/// exclusive by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Command interpretation.
    #[default]
    Normal,
    /// Text entry.
    Insert,
}

/// The shape of a visual selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisualKind {
    /// Characterwise (`v`).
    Char,
    /// Linewise (`V`): both endpoints extend to full lines.
    Line,
}

/// An active visual selection: the fixed anchor plus the kind. The moving
/// end is the cursor itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisualSelection {
    /// The fixed end of the selection.
    pub anchor: Position,
    /// Characterwise or linewise.
    pub kind: VisualKind,
}

/// A resolved visual range, as reported to hosts: `start` inclusive, `end`
/// exclusive, with linewise selections already extended to whole lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisualRange {
    /// First covered position.
    pub start: Position,
    /// One past the last covered position.
    pub end: Position,
    /// The selection kind the range was derived from.
    pub kind: VisualKind,
}

/// Register content: text plus the linewise flag that governs paste
/// placement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Register {
    /// Stored text (no trailing newline for linewise content).
    pub text: String,
    /// Whether the content represents whole lines.
    pub linewise: bool,
}

/// The register file. The unnamed register `"` is the implicit source and
/// destination of every delete, yank and paste; the named map exists for
/// hosts that want to park content under other keys.
#[derive(Debug, Clone, Default)]
pub struct Registers {
    unnamed: Register,
    named: HashMap<char, Register>,
}

impl Registers {
    /// The unnamed register `"`.
    pub fn unnamed(&self) -> &Register {
        &self.unnamed
    }

    /// Read a register by name; `'"'` is the unnamed register.
    pub fn get(&self, name: char) -> Option<&Register> {
        if name == '"' {
            Some(&self.unnamed)
        } else {
            self.named.get(&name)
        }
    }

    /// Write a register by name; `'"'` is the unnamed register.
    pub fn set(&mut self, name: char, register: Register) {
        if name == '"' {
            self.unnamed = register;
        } else {
            self.named.insert(name, register);
        }
    }

    pub(crate) fn set_unnamed(&mut self, text: String, linewise: bool) {
        self.unnamed = Register { text, linewise };
    }
}

/// Search state carried across commands.
#[derive(Debug, Clone, Default)]
pub(crate) struct SearchState {
    pub(crate) pattern: Option<String>,
    pub(crate) forward: bool,
    pub(crate) whole_word: bool,
    pub(crate) matches: Vec<Position>,
    pub(crate) current: Option<usize>,
}

/// A snapshot of the search state for status displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchInfo {
    /// The active pattern, if any.
    pub pattern: Option<String>,
    /// The stored direction (`true` = forward).
    pub forward: bool,
    /// Index of the current match in the match list, when anchored.
    pub index: Option<usize>,
    /// Total number of matches.
    pub total: usize,
}

/// Per-editor vim session state.
#[derive(Debug, Clone, Default)]
pub(crate) struct VimSession {
    pub(crate) pending: String,
    pub(crate) last_find: Option<FindCharSpec>,
    pub(crate) search: SearchState,
    pub(crate) registers: Registers,
}

/// Failure kinds the kernel distinguishes. All of them are absorbed locally;
/// the kind is only reported so a host can ring a bell or flash a status
/// line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A motion or range referenced a nonexistent line or column (clamped).
    OutOfBuffer,
    /// An operator resolved to a zero-width range.
    EmptyRange,
    /// Paste from an empty register.
    EmptyRegister,
    /// The pending input cannot extend into any command (discarded).
    ParseInvalid,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::OutOfBuffer => write!(f, "position outside the buffer"),
            ErrorKind::EmptyRange => write!(f, "operator range is empty"),
            ErrorKind::EmptyRegister => write!(f, "register is empty"),
            ErrorKind::ParseInvalid => write!(f, "unrecognized key sequence"),
        }
    }
}

impl std::error::Error for ErrorKind {}

/// What a single [`Editor::feed_key`] call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreEvent {
    /// The key extended the pending input; feed more.
    Pending,
    /// A command executed (possibly as a harmless no-op).
    Executed {
        /// The document differs from the last loaded/saved state.
        modified: bool,
        /// This key changed the mode.
        mode_changed: bool,
        /// This key replaced the buffer.
        buffer_changed: bool,
    },
    /// The host should reposition its viewport around the cursor line.
    ViewportHint(ScrollAlign),
    /// The host should open a search prompt and submit the query through
    /// [`Editor::set_search_pattern`].
    SearchPrompt {
        /// `/` opens a forward prompt, `?` a backward one.
        forward: bool,
    },
    /// The key was absorbed after a recoverable failure.
    Error(ErrorKind),
}

/// Style identifier handed through from a highlight provider. Mapping ids to
/// colors is the host's concern.
pub type StyleId = u32;

/// One highlighted span on a line, in character columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightToken {
    /// First highlighted column.
    pub start_col: usize,
    /// One past the last highlighted column.
    pub end_col: usize,
    /// The style to apply.
    pub style_id: StyleId,
}

/// A read-only syntax highlighting collaborator (tree-sitter bridge, regex
/// rules, ...). The kernel never interprets the tokens; it only passes them
/// through to the host.
pub trait HighlightProvider {
    /// Tokens for line `line`, whose current text is `text`.
    fn highlight_tokens_for_line(&self, line: usize, text: &str) -> Vec<HighlightToken>;
}

/// A modal editor instance.
///
/// See the [module documentation](self) for the driving model.
pub struct Editor {
    pub(crate) buffer: Buffer,
    pub(crate) cursor: Cursor,
    pub(crate) mode: Mode,
    pub(crate) visual: Option<VisualSelection>,
    pub(crate) session: VimSession,
    pub(crate) history: History,
    pub(crate) indent_width: usize,
    pub(crate) line_ending: LineEnding,
    pub(crate) diagnostics: Vec<Diagnostic>,
    pub(crate) highlighter: Option<Box<dyn HighlightProvider>>,
    /// Pre-insert state armed by `i`/`I`/`a`/`A`, pushed to history by the
    /// first mutation of the insert session.
    pub(crate) pending_insert_snapshot: Option<(Buffer, Cursor)>,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

impl Editor {
    /// Create an empty editor (one empty line).
    pub fn new() -> Self {
        Self::from_text("")
    }

    /// Create an editor over the given text.
    pub fn from_text(text: &str) -> Self {
        let mut editor = Self {
            buffer: Buffer::new(),
            cursor: Cursor::default(),
            mode: Mode::Normal,
            visual: None,
            session: VimSession::default(),
            history: History::new(),
            indent_width: DEFAULT_INDENT_WIDTH,
            line_ending: LineEnding::Lf,
            diagnostics: Vec::new(),
            highlighter: None,
            pending_insert_snapshot: None,
        };
        editor.load(text);
        editor
    }

    /// Replace the document, clearing history, pending input, the visual
    /// selection and search state. Registers survive.
    pub fn load(&mut self, text: &str) {
        let (normalized, line_ending) = normalize_to_lf(text);
        self.line_ending = line_ending;
        self.buffer = Buffer::from_text(&normalized);
        self.cursor = Cursor::default();
        self.mode = Mode::Normal;
        self.visual = None;
        self.history.clear();
        self.session.pending.clear();
        self.session.last_find = None;
        self.session.search = SearchState::default();
        self.diagnostics.clear();
        self.pending_insert_snapshot = None;
    }

    /// The current document as a single string, with the preferred line
    /// ending restored. This is the exchange format for the external file-I/O
    /// collaborator.
    pub fn snapshot_text(&self) -> String {
        self.line_ending.restore(&self.buffer.full_text())
    }

    /// Mark the current state as saved for dirty tracking.
    pub fn mark_saved(&mut self) {
        self.history.mark_clean();
        // Edits later in the same insert session must dirty the document
        // again, so the session re-arms its pre-mutation snapshot.
        if self.mode == Mode::Insert {
            self.pending_insert_snapshot = Some((self.buffer.clone(), self.cursor));
        }
    }

    /// Whether the document differs from the last loaded/saved state.
    pub fn is_modified(&self) -> bool {
        !self.history.is_clean()
    }

    /// Feed one key (or control byte) into the editor. This is the only way
    /// external code drives the kernel.
    pub fn feed_key(&mut self, key: char) -> CoreEvent {
        match self.mode {
            Mode::Normal => self.feed_normal_key(key),
            Mode::Insert => self.feed_insert_key(key),
        }
    }

    /// Feed a whole key sequence, returning the last event. Convenience for
    /// hosts and tests.
    pub fn feed_keys(&mut self, keys: &str) -> CoreEvent {
        let mut last = CoreEvent::Pending;
        for key in keys.chars() {
            last = self.feed_key(key);
        }
        last
    }

    fn feed_normal_key(&mut self, key: char) -> CoreEvent {
        if key == KEY_ESCAPE {
            self.session.pending.clear();
            self.visual = None;
            return CoreEvent::Executed {
                modified: self.is_modified(),
                mode_changed: false,
                buffer_changed: false,
            };
        }

        if self.session.pending.is_empty() && (key == '/' || key == '?') {
            return CoreEvent::SearchPrompt {
                forward: key == '/',
            };
        }

        self.session.pending.push(key);
        let options = ParseOptions {
            visual: self.visual.is_some(),
        };
        match parse_input(&self.session.pending, options) {
            Parse::Pending => CoreEvent::Pending,
            Parse::Invalid => {
                self.session.pending.clear();
                CoreEvent::Error(ErrorKind::ParseInvalid)
            }
            Parse::Complete(command) => {
                self.session.pending.clear();
                self.run_command(&command)
            }
        }
    }

    fn feed_insert_key(&mut self, key: char) -> CoreEvent {
        match key {
            KEY_ESCAPE => {
                self.mode = Mode::Normal;
                self.cursor.position = self.buffer.clamp_normal(self.cursor.position);
                self.cursor.desired_column = None;
                self.pending_insert_snapshot = None;
                self.executed(true, false)
            }
            KEY_ENTER | '\n' => {
                self.commit_insert_snapshot();
                let pos = self.buffer.clamp(self.cursor.position);
                let indent = crate::buffer::compute_smart_indent(
                    &self.buffer.line(pos.line),
                    pos.column,
                    self.indent_width,
                );
                let mut text = String::with_capacity(indent.len() + 1);
                text.push('\n');
                text.push_str(&indent);
                self.buffer = self.buffer.insert(pos, &text);
                self.cursor.position = Position::new(pos.line + 1, indent.chars().count());
                self.cursor.desired_column = None;
                self.after_buffer_change();
                self.executed(false, true)
            }
            KEY_BACKSPACE | '\u{8}' => {
                let pos = self.buffer.clamp(self.cursor.position);
                if pos == Position::new(0, 0) {
                    return self.executed(false, false);
                }
                self.commit_insert_snapshot();
                let (buffer, new_pos) = self.buffer.delete_char_before(pos);
                self.buffer = buffer;
                self.cursor.position = new_pos;
                self.cursor.desired_column = None;
                self.after_buffer_change();
                self.executed(false, true)
            }
            c if c.is_control() => self.executed(false, false),
            c => {
                self.commit_insert_snapshot();
                let pos = self.buffer.clamp(self.cursor.position);
                self.buffer = self.buffer.insert(pos, &c.to_string());
                self.cursor.position = Position::new(pos.line, pos.column + 1);
                self.cursor.desired_column = None;
                self.after_buffer_change();
                self.executed(false, true)
            }
        }
    }

    pub(crate) fn executed(&self, mode_changed: bool, buffer_changed: bool) -> CoreEvent {
        CoreEvent::Executed {
            modified: self.is_modified(),
            mode_changed,
            buffer_changed,
        }
    }

    /// Push the armed pre-insert snapshot, if any. Called by the first
    /// mutation of an insert session so that one undo reverts the whole
    /// typing burst.
    pub(crate) fn commit_insert_snapshot(&mut self) {
        if let Some((buffer, cursor)) = self.pending_insert_snapshot.take() {
            self.history.push(buffer, cursor);
        }
    }

    /// Buffer-change bookkeeping: re-enumerate search matches so totals stay
    /// truthful (the current index is cleared until the next search jump) and
    /// keep a surviving visual anchor inside the new buffer.
    pub(crate) fn after_buffer_change(&mut self) {
        let search = &mut self.session.search;
        if let Some(pattern) = &search.pattern {
            search.matches = find_all(&self.buffer, pattern, search.whole_word);
            search.current = None;
        }
        if let Some(selection) = &mut self.visual {
            selection.anchor = self.buffer.clamp_normal(selection.anchor);
        }
    }

    /// Submit a search query (the completion of a [`CoreEvent::SearchPrompt`]
    /// round trip). Stores the pattern and direction, enumerates matches and
    /// jumps to the first one in the requested direction. Returns `true` when
    /// a match was found.
    pub fn set_search_pattern(&mut self, pattern: &str, forward: bool) -> bool {
        if pattern.is_empty() {
            self.session.search = SearchState::default();
            return false;
        }

        let matches = find_all(&self.buffer, pattern, false);
        self.session.search = SearchState {
            pattern: Some(pattern.to_string()),
            forward,
            whole_word: false,
            matches,
            current: None,
        };
        self.jump_to_search_match(self.cursor.position, forward)
    }

    /// Jump to the nearest match from `from` in `forward` direction, wrapping
    /// around. Anchors the current-match index.
    pub(crate) fn jump_to_search_match(&mut self, from: Position, forward: bool) -> bool {
        let search = &self.session.search;
        let target = match crate::search::next_match(&search.matches, from, forward) {
            Some(target) => target,
            None => return false,
        };
        self.session.search.current = self.session.search.matches.iter().position(|m| *m == target);
        self.cursor.position = self.buffer.clamp_normal(target);
        self.cursor.desired_column = None;
        true
    }

    // --- Queries -----------------------------------------------------------

    /// Current cursor position.
    pub fn cursor(&self) -> Position {
        self.cursor.position
    }

    /// Current mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The pending (not yet complete) command input, for a status strip.
    pub fn pending_input(&self) -> &str {
        &self.session.pending
    }

    /// Text of line `i` (`""` out of bounds).
    pub fn line(&self, i: usize) -> String {
        self.buffer.line(i)
    }

    /// Total line count.
    pub fn line_count(&self) -> usize {
        self.buffer.line_count()
    }

    /// The underlying buffer value.
    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    /// The register file.
    pub fn registers(&self) -> &Registers {
        &self.session.registers
    }

    /// Whether an undo entry is available.
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Whether a redo entry is available.
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// The configured indent unit, in spaces.
    pub fn indent_width(&self) -> usize {
        self.indent_width
    }

    /// Configure the indent unit (clamped to at least 1).
    pub fn set_indent_width(&mut self, width: usize) {
        self.indent_width = width.max(1);
    }

    /// The resolved visual selection, if one is active: `start` inclusive,
    /// `end` exclusive, linewise selections extended to whole lines.
    pub fn visual_range(&self) -> Option<VisualRange> {
        let selection = self.visual?;
        let (start, end) = normalize(selection.anchor, self.cursor.position);
        let range = match selection.kind {
            VisualKind::Char => {
                let end_offset = self.buffer.position_to_char(end) + 1;
                VisualRange {
                    start,
                    end: self.buffer.char_to_position(end_offset.min(self.buffer.total_chars())),
                    kind: VisualKind::Char,
                }
            }
            VisualKind::Line => VisualRange {
                start: Position::new(start.line, 0),
                end: Position::new(end.line, self.buffer.line_length(end.line)),
                kind: VisualKind::Line,
            },
        };
        Some(range)
    }

    /// Search status for the UI: pattern, direction, current index and total.
    pub fn search_info(&self) -> SearchInfo {
        let search = &self.session.search;
        SearchInfo {
            pattern: search.pattern.clone(),
            forward: search.forward,
            index: search.current,
            total: search.matches.len(),
        }
    }

    // --- External collaborators -------------------------------------------

    /// Apply a display-line (soft-wrap) motion resolved by the UI. The kernel
    /// never computes wrap geometry; it only accepts the resulting
    /// buffer-space position.
    pub fn display_line_motion(&mut self, target: Position) {
        self.cursor.position = match self.mode {
            Mode::Normal => self.buffer.clamp_normal(target),
            Mode::Insert => self.buffer.clamp(target),
        };
        self.cursor.desired_column = None;
    }

    /// Replace the diagnostics pushed in by the external provider.
    pub fn set_diagnostics(&mut self, diagnostics: Vec<Diagnostic>) {
        self.diagnostics = diagnostics;
    }

    /// Diagnostics whose range contains the given position.
    pub fn diagnostics_at(&self, line: usize, column: usize) -> Vec<&Diagnostic> {
        let pos = Position::new(line, column);
        self.diagnostics
            .iter()
            .filter(|d| d.range.contains(pos))
            .collect()
    }

    /// Attach (or replace) the highlight collaborator.
    pub fn set_highlight_provider(&mut self, provider: Box<dyn HighlightProvider>) {
        self.highlighter = Some(provider);
    }

    /// Detach the highlight collaborator.
    pub fn clear_highlight_provider(&mut self) {
        self.highlighter = None;
    }

    /// Highlight tokens for line `i`, from the attached collaborator (empty
    /// when none is attached).
    pub fn highlight_tokens_for_line(&self, i: usize) -> Vec<HighlightToken> {
        match &self.highlighter {
            Some(provider) => provider.highlight_tokens_for_line(i, &self.buffer.line(i)),
            None => Vec::new(),
        }
    }
}
