#![warn(missing_docs)]
//! Modal Core - Headless Modal Editor Kernel
//!
//! # Overview
//!
//! `modal-core` is the engine of a modal code editor: an in-memory text
//! buffer with cursor state, a vim-style command grammar (parser + executor)
//! over that buffer, a bounded branching undo/redo history, and a literal
//! search facility. It renders nothing and reads no files: hosts feed keys in
//! through [`Editor::feed_key`] and render from the query surface.
//!
//! # Core Features
//!
//! - **Immutable-by-convention buffer**: rope-backed line storage; every
//!   mutation yields a new buffer value, and history snapshots share storage
//!   structurally
//! - **Vim command grammar**: counts, operators (`d c y > <`), motions,
//!   text objects, registers, linewise vs characterwise semantics
//! - **Two orthogonal state machines**: the normal/insert mode and the
//!   visual selection are tracked separately, so insert mode and a live
//!   selection are mutually exclusive by construction
//! - **Branching undo/redo**: bounded snapshot stacks; a new edit discards
//!   the redo branch
//! - **Literal search**: case-insensitive, regex-escaped substring matching
//!   with wrap-around navigation and word-under-cursor seeding (`*`, `#`)
//! - **External collaborators at the edges**: diagnostics are pushed in,
//!   highlighting is consumed through a provider trait, soft-wrap display
//!   motions arrive pre-resolved
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Editor (feed_key, queries, CoreEvent)      │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  Parser (pending input → Command)           │  ← Key grammar
//! ├─────────────────────────────────────────────┤
//! │  Executor (Command → new editor state)      │  ← Semantics
//! ├─────────────────────────────────────────────┤
//! │  Motions / Text Objects / Search            │  ← Pure targeting
//! ├─────────────────────────────────────────────┤
//! │  History (snapshot stacks)                  │  ← Undo/redo
//! ├─────────────────────────────────────────────┤
//! │  Buffer (rope-backed line storage)          │  ← Text storage
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use modal_core::{CoreEvent, Editor, Mode, Position};
//!
//! let mut editor = Editor::from_text("fn main() {}\nfn other() {}");
//!
//! // Delete the first word, then undo it.
//! editor.feed_keys("dw");
//! assert_eq!(editor.line(0), "main() {}");
//! editor.feed_keys("u");
//! assert_eq!(editor.line(0), "fn main() {}");
//!
//! // Keys that need more input report as pending.
//! assert_eq!(editor.feed_key('2'), CoreEvent::Pending);
//! assert_eq!(editor.feed_key('d'), CoreEvent::Pending);
//! editor.feed_key('d');
//! assert_eq!(editor.snapshot_text(), "");
//!
//! // Insert mode is plain text entry until Escape.
//! editor.feed_keys("ihello\u{1b}");
//! assert_eq!(editor.mode(), Mode::Normal);
//! assert_eq!(editor.cursor(), Position::new(0, 4));
//! ```
//!
//! # Module Description
//!
//! - [`buffer`] - rope-backed buffer, positions, smart indent
//! - [`history`] - bounded branching undo/redo snapshots
//! - [`motions`] - the motion catalogue as pure targeting functions
//! - [`text_objects`] - inner/around word, bracket and quote ranges
//! - [`search`] - literal-substring match enumeration
//! - [`commands`] - command data model and the keystroke parser
//! - [`state`] - the [`Editor`] itself: feed_key, events, queries
//! - [`diagnostics`] - read-only diagnostics pushed in by a provider
//! - [`line_ending`] - CRLF normalization and restore
//!
//! # Concurrency Model
//!
//! The kernel is single-threaded and synchronous: every key executes to
//! completion before the next is accepted, and each [`Editor`] is an
//! independent state machine. There are no locks, timers or suspension
//! points anywhere in the crate.

pub mod buffer;
pub mod commands;
pub mod diagnostics;
mod executor;
pub mod history;
pub mod line_ending;
pub mod motions;
pub mod search;
pub mod state;
pub mod text_objects;

pub use buffer::{compute_smart_indent, Buffer, Cursor, Position};
pub use commands::{
    parse_input, Action, Command, Operator, OperatorTarget, Parse, ParseOptions, ScrollAlign,
};
pub use diagnostics::{Diagnostic, DiagnosticRange, DiagnosticSeverity};
pub use history::{History, Snapshot, DEFAULT_CAPACITY};
pub use line_ending::LineEnding;
pub use motions::{FindCharSpec, Motion};
pub use search::{find_all, next_match, word_under_cursor, WordAtCursor};
pub use state::{
    CoreEvent, Editor, ErrorKind, HighlightProvider, HighlightToken, Mode, Register, Registers,
    SearchInfo, StyleId, VisualKind, VisualRange, VisualSelection, DEFAULT_INDENT_WIDTH,
    KEY_BACKSPACE, KEY_ENTER, KEY_ESCAPE,
};
pub use text_objects::{object_for_char, BracketKind, ObjectSpan, TextObject, TextObjectKind};
