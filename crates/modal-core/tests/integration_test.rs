//! End-to-end scenarios driving the public `feed_key` surface, plus the
//! universal state invariants checked after every keystroke.

use modal_core::{Editor, Mode, Position, KEY_ESCAPE};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[test]
fn test_scenario_xxx() {
    let mut editor = Editor::from_text("hello");
    editor.feed_keys("xxx");
    assert_eq!(editor.snapshot_text(), "lo");
    assert_eq!(editor.cursor(), Position::new(0, 0));
}

#[test]
fn test_scenario_delete_word() {
    let mut editor = Editor::from_text("hello world");
    editor.feed_keys("dw");
    assert_eq!(editor.snapshot_text(), "world");
    assert_eq!(editor.cursor(), Position::new(0, 0));
    let register = editor.registers().unnamed();
    assert_eq!(register.text, "hello ");
    assert!(!register.linewise);
}

#[test]
fn test_scenario_delete_inner_paren() {
    let mut editor = Editor::from_text("foo(bar, baz)qux");
    editor.feed_keys("5l");
    assert_eq!(editor.cursor(), Position::new(0, 5));
    editor.feed_keys("di(");
    assert_eq!(editor.snapshot_text(), "foo()qux");
    assert_eq!(editor.cursor(), Position::new(0, 4));
}

#[test]
fn test_scenario_yank_paste_line() {
    let mut editor = Editor::from_text("hello");
    editor.feed_keys("yyp");
    assert_eq!(editor.snapshot_text(), "hello\nhello");
    assert_eq!(editor.cursor(), Position::new(1, 0));
}

#[test]
fn test_scenario_visual_line_delete() {
    let mut editor = Editor::from_text("hello\nworld");
    editor.feed_keys("j");
    assert_eq!(editor.cursor(), Position::new(1, 0));
    editor.feed_keys("Vd");
    assert_eq!(editor.snapshot_text(), "hello");
    assert_eq!(editor.cursor(), Position::new(0, 0));
}

#[test]
fn test_scenario_star_search() {
    let mut editor = Editor::from_text("hello world hello");
    editor.feed_keys("*");
    assert_eq!(editor.cursor(), Position::new(0, 12));
    let info = editor.search_info();
    assert!(info.pattern.as_deref().unwrap().contains("hello"));
    assert_eq!(info.total, 2);
    assert_eq!(info.index, Some(1));
}

#[test]
fn test_load_snapshot_round_trip() {
    for text in ["", "one line", "a\nb\nc", "trailing\n", "\n\n", "mixed  \n  ws"] {
        let mut editor = Editor::new();
        editor.load(text);
        assert_eq!(editor.snapshot_text(), text, "round trip of {text:?}");
    }
}

#[test]
fn test_edits_then_equal_undos_restore_everything() {
    let initial = "fn main() {\n    body();\n}\n";
    let mut editor = Editor::from_text(initial);

    let edits = ["x", "dd", "J", "otext\u{1b}", "3~"];
    let mut applied = 0;
    for edit in edits {
        editor.feed_keys(edit);
        applied += 1;
    }
    for _ in 0..applied {
        editor.feed_keys("u");
    }
    assert_eq!(editor.snapshot_text(), initial);
    assert_eq!(editor.cursor(), Position::new(0, 0));
}

#[test]
fn test_yy_p_duplicates_line_below() {
    let mut editor = Editor::from_text("alpha\nbeta");
    let lines_before = editor.line_count();
    editor.feed_keys("yyp");
    assert_eq!(editor.line_count(), lines_before + 1);
    assert_eq!(editor.line(0), "alpha");
    assert_eq!(editor.line(1), "alpha");
}

#[test]
fn test_dd_p_moves_line_down() {
    let mut editor = Editor::from_text("first\nsecond\nthird");
    editor.feed_keys("ddp");
    assert_eq!(editor.snapshot_text(), "second\nfirst\nthird");
}

#[test]
fn test_boundary_behaviour() {
    let mut editor = Editor::from_text("ab\ncd");

    editor.feed_keys("h");
    assert_eq!(editor.cursor(), Position::new(0, 0));

    editor.feed_keys("99l");
    assert_eq!(editor.cursor(), Position::new(0, 1));

    editor.feed_keys("k");
    assert_eq!(editor.cursor(), Position::new(0, 1));

    editor.feed_keys("99j");
    assert_eq!(editor.cursor(), Position::new(1, 1));
}

fn assert_invariants(editor: &Editor, context: &str) {
    // At least one line, and no line contains a newline.
    assert!(editor.line_count() >= 1, "{context}: line_count");
    for i in 0..editor.line_count() {
        assert!(
            !editor.line(i).contains('\n'),
            "{context}: line {i} contains a newline"
        );
    }

    // The cursor is clamped to its mode-specific bound.
    let pos = editor.cursor();
    assert!(pos.line < editor.line_count(), "{context}: cursor line");
    let len = editor.line(pos.line).chars().count();
    match editor.mode() {
        Mode::Normal => assert!(
            pos.column <= len.saturating_sub(1).max(0),
            "{context}: normal cursor column {} on line of length {len}",
            pos.column
        ),
        Mode::Insert => assert!(
            pos.column <= len,
            "{context}: insert cursor column {} on line of length {len}",
            pos.column
        ),
    }

    // An active selection has a valid anchor.
    if let Some(range) = editor.visual_range() {
        assert!(range.start.line < editor.line_count(), "{context}: visual");
        assert!(range.start <= range.end, "{context}: visual order");
    }
}

#[test]
fn test_invariants_hold_through_a_scripted_session() {
    let mut editor = Editor::from_text("fn demo() {\n    let x = \"quoted\";\n    call(a, b);\n}");
    let script = "jwwdwiab\u{1b}Vjd2Gyyp*nNu\u{12}ggdGp~3lrZJo new\u{1b}u";
    for key in script.chars() {
        editor.feed_key(key);
        assert_invariants(&editor, &format!("after {key:?}"));
    }
}

#[test]
fn test_invariants_hold_under_random_keystream() {
    // Printable commands plus control bytes; seeded so failures reproduce.
    let keys: Vec<char> = "hjklwWbBeE0^$Gg{}%fFtT;,dcy><iIaAoOxXsSDCJ~rupPvVnN*#z123456789\u{1b}\r\u{7f}\u{12}"
        .chars()
        .collect();
    let mut rng = StdRng::seed_from_u64(0xED17);

    let mut editor = Editor::from_text("fn main() {\n    println!(\"hello\");\n}\n\nstruct S;\n");
    for step in 0..5000 {
        let key = keys[rng.gen_range(0..keys.len())];
        editor.feed_key(key);
        assert_invariants(&editor, &format!("step {step}, key {key:?}"));
    }
}

#[test]
fn test_escape_never_mutates_in_normal_mode() {
    let mut editor = Editor::from_text("abc\ndef");
    editor.feed_keys("vld");
    let text = editor.snapshot_text();
    editor.feed_key(KEY_ESCAPE);
    editor.feed_key(KEY_ESCAPE);
    assert_eq!(editor.snapshot_text(), text);
}

#[test]
fn test_independent_editors_do_not_interact() {
    let mut left = Editor::from_text("left");
    let mut right = Editor::from_text("right");
    left.feed_keys("dw");
    assert_eq!(left.snapshot_text(), "");
    assert_eq!(right.snapshot_text(), "right");
    right.feed_keys("x");
    assert_eq!(right.snapshot_text(), "ight");
    assert_eq!(left.snapshot_text(), "");
}
