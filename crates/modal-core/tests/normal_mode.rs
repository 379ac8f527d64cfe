use modal_core::{CoreEvent, Editor, ErrorKind, Mode, Position, KEY_ESCAPE};

#[test]
fn test_x_deletes_at_cursor() {
    let mut editor = Editor::from_text("hello");
    editor.feed_keys("x");
    assert_eq!(editor.snapshot_text(), "ello");
    assert_eq!(editor.cursor(), Position::new(0, 0));
    assert_eq!(editor.registers().unnamed().text, "h");
    assert!(!editor.registers().unnamed().linewise);
}

#[test]
fn test_x_with_count_clamps_to_line_end() {
    let mut editor = Editor::from_text("hello");
    editor.feed_keys("3x");
    assert_eq!(editor.snapshot_text(), "lo");

    let mut editor = Editor::from_text("hi\nthere");
    editor.feed_keys("9x");
    // Stays on the line, never eats the newline.
    assert_eq!(editor.snapshot_text(), "\nthere");
}

#[test]
fn test_x_on_empty_line_is_noop() {
    let mut editor = Editor::from_text("");
    editor.feed_keys("x");
    assert_eq!(editor.snapshot_text(), "");
    assert!(!editor.can_undo());
}

#[test]
fn test_x_at_line_end_clamps_cursor() {
    let mut editor = Editor::from_text("ab");
    editor.feed_keys("lx");
    assert_eq!(editor.snapshot_text(), "a");
    assert_eq!(editor.cursor(), Position::new(0, 0));
}

#[test]
fn test_capital_x_deletes_before_cursor() {
    let mut editor = Editor::from_text("abcd");
    editor.feed_keys("3lX");
    assert_eq!(editor.snapshot_text(), "abd");
    assert_eq!(editor.cursor(), Position::new(0, 2));

    // At column 0 there is nothing to delete.
    let mut editor = Editor::from_text("abcd");
    editor.feed_keys("X");
    assert_eq!(editor.snapshot_text(), "abcd");
}

#[test]
fn test_s_substitutes_and_enters_insert() {
    let mut editor = Editor::from_text("cat");
    editor.feed_keys("sb");
    assert_eq!(editor.mode(), Mode::Insert);
    assert_eq!(editor.snapshot_text(), "bat");
}

#[test]
fn test_capital_s_clears_line() {
    let mut editor = Editor::from_text("  old text\nnext");
    editor.feed_keys("S");
    assert_eq!(editor.mode(), Mode::Insert);
    assert_eq!(editor.cursor(), Position::new(0, 0));
    assert_eq!(editor.snapshot_text(), "\nnext");
}

#[test]
fn test_capital_d_deletes_to_line_end() {
    let mut editor = Editor::from_text("hello world");
    editor.feed_keys("5lD");
    assert_eq!(editor.snapshot_text(), "hello");
    assert_eq!(editor.cursor(), Position::new(0, 4));
    assert_eq!(editor.registers().unnamed().text, " world");
}

#[test]
fn test_capital_c_changes_to_line_end() {
    let mut editor = Editor::from_text("hello world");
    editor.feed_keys("5lC");
    assert_eq!(editor.mode(), Mode::Insert);
    assert_eq!(editor.snapshot_text(), "hello");
    assert_eq!(editor.cursor(), Position::new(0, 5));
}

#[test]
fn test_join_lines_inserts_single_space() {
    let mut editor = Editor::from_text("foo\n   bar");
    editor.feed_keys("J");
    assert_eq!(editor.snapshot_text(), "foo bar");
    assert_eq!(editor.cursor(), Position::new(0, 3));
}

#[test]
fn test_join_lines_empty_sides_get_no_space() {
    let mut editor = Editor::from_text("\nbar");
    editor.feed_keys("J");
    assert_eq!(editor.snapshot_text(), "bar");

    let mut editor = Editor::from_text("foo\n   ");
    editor.feed_keys("J");
    assert_eq!(editor.snapshot_text(), "foo");
}

#[test]
fn test_join_lines_with_count() {
    let mut editor = Editor::from_text("a\nb\nc\nd");
    editor.feed_keys("2J");
    assert_eq!(editor.snapshot_text(), "a b c\nd");
}

#[test]
fn test_join_on_last_line_is_noop() {
    let mut editor = Editor::from_text("only");
    editor.feed_keys("J");
    assert_eq!(editor.snapshot_text(), "only");
    assert!(!editor.can_undo());
}

#[test]
fn test_tilde_toggles_case_and_advances() {
    let mut editor = Editor::from_text("aBc");
    editor.feed_keys("3~");
    assert_eq!(editor.snapshot_text(), "AbC");
    assert_eq!(editor.cursor(), Position::new(0, 2));
}

#[test]
fn test_replace_char() {
    let mut editor = Editor::from_text("hello");
    editor.feed_keys("rj");
    assert_eq!(editor.snapshot_text(), "jello");
    assert_eq!(editor.cursor(), Position::new(0, 0));

    let mut editor = Editor::from_text("hello");
    editor.feed_keys("3rx");
    assert_eq!(editor.snapshot_text(), "xxxlo");
    assert_eq!(editor.cursor(), Position::new(0, 2));
}

#[test]
fn test_replace_char_needs_enough_room() {
    let mut editor = Editor::from_text("ab");
    editor.feed_keys("3rx");
    assert_eq!(editor.snapshot_text(), "ab");
    assert!(!editor.can_undo());
}

#[test]
fn test_insert_entry_points() {
    let mut editor = Editor::from_text("  body");
    editor.feed_keys("I");
    assert_eq!(editor.mode(), Mode::Insert);
    assert_eq!(editor.cursor(), Position::new(0, 2));
    editor.feed_key(KEY_ESCAPE);

    editor.feed_keys("A");
    assert_eq!(editor.cursor(), Position::new(0, 6));
    editor.feed_key(KEY_ESCAPE);

    editor.feed_keys("4|"); // no-op: '|' is not a command
    editor.feed_keys("a");
    assert_eq!(editor.mode(), Mode::Insert);
    editor.feed_key(KEY_ESCAPE);
}

#[test]
fn test_append_after_on_empty_line() {
    let mut editor = Editor::from_text("");
    editor.feed_keys("ahi");
    assert_eq!(editor.snapshot_text(), "hi");
    assert_eq!(editor.cursor(), Position::new(0, 2));
}

#[test]
fn test_open_below_and_above() {
    let mut editor = Editor::from_text("one");
    editor.feed_keys("otwo");
    assert_eq!(editor.snapshot_text(), "one\ntwo");
    assert_eq!(editor.mode(), Mode::Insert);
    editor.feed_key(KEY_ESCAPE);

    editor.feed_keys("Ozero");
    assert_eq!(editor.snapshot_text(), "one\nzero\ntwo");
}

#[test]
fn test_open_below_opens_unindented_line() {
    let mut editor = Editor::from_text("    indented");
    editor.feed_keys("o");
    assert_eq!(editor.cursor(), Position::new(1, 0));
    assert_eq!(editor.line(1), "");
}

#[test]
fn test_paste_charwise_after() {
    let mut editor = Editor::from_text("hello world");
    editor.feed_keys("dw");
    assert_eq!(editor.registers().unnamed().text, "hello ");
    editor.feed_keys("$p");
    assert_eq!(editor.snapshot_text(), "worldhello ");
}

#[test]
fn test_paste_linewise_before() {
    let mut editor = Editor::from_text("aaa\nbbb");
    editor.feed_keys("yyjP");
    assert_eq!(editor.snapshot_text(), "aaa\naaa\nbbb");
    assert_eq!(editor.cursor(), Position::new(1, 0));
}

#[test]
fn test_paste_empty_register_reports() {
    let mut editor = Editor::from_text("abc");
    assert_eq!(
        editor.feed_keys("p"),
        CoreEvent::Error(ErrorKind::EmptyRegister)
    );
    assert_eq!(editor.snapshot_text(), "abc");
}

#[test]
fn test_paste_with_count_repeats() {
    let mut editor = Editor::from_text("ab");
    editor.feed_keys("x2p");
    assert_eq!(editor.snapshot_text(), "baa");
}

#[test]
fn test_boundary_motions_are_noops() {
    let mut editor = Editor::from_text("ab\ncd");
    editor.feed_keys("h");
    assert_eq!(editor.cursor(), Position::new(0, 0));
    editor.feed_keys("k");
    assert_eq!(editor.cursor(), Position::new(0, 0));
    editor.feed_keys("jj");
    assert_eq!(editor.cursor(), Position::new(1, 0));
    editor.feed_keys("9l");
    assert_eq!(editor.cursor(), Position::new(1, 1));
}

#[test]
fn test_desired_column_restored_across_short_line() {
    let mut editor = Editor::from_text("long line\nab\nanother long");
    editor.feed_keys("7l");
    assert_eq!(editor.cursor(), Position::new(0, 7));
    editor.feed_keys("j");
    assert_eq!(editor.cursor(), Position::new(1, 1));
    editor.feed_keys("j");
    assert_eq!(editor.cursor(), Position::new(2, 7));
    // A horizontal motion drops the remembered column.
    editor.feed_keys("kh");
    editor.feed_keys("j");
    assert_eq!(editor.cursor().line, 2);
    assert_eq!(editor.cursor().column, 0);
}

#[test]
fn test_scroll_hints_do_not_touch_state() {
    use modal_core::ScrollAlign;

    let mut editor = Editor::from_text("a\nb\nc");
    editor.feed_keys("j");
    assert_eq!(
        editor.feed_keys("zz"),
        CoreEvent::ViewportHint(ScrollAlign::Center)
    );
    assert_eq!(
        editor.feed_keys("zt"),
        CoreEvent::ViewportHint(ScrollAlign::Top)
    );
    assert_eq!(
        editor.feed_keys("zb"),
        CoreEvent::ViewportHint(ScrollAlign::Bottom)
    );
    assert_eq!(editor.cursor(), Position::new(1, 0));
    assert_eq!(editor.snapshot_text(), "a\nb\nc");
    assert!(!editor.can_undo());
}

#[test]
fn test_insert_mode_typing_and_escape_clamp() {
    let mut editor = Editor::from_text("");
    editor.feed_keys("iabc");
    assert_eq!(editor.cursor(), Position::new(0, 3)); // one past end is legal in insert
    editor.feed_key(KEY_ESCAPE);
    assert_eq!(editor.cursor(), Position::new(0, 2)); // clamped back in normal
    assert_eq!(editor.mode(), Mode::Normal);
}

#[test]
fn test_insert_mode_backspace_joins_lines() {
    let mut editor = Editor::from_text("ab\ncd");
    editor.feed_keys("ji");
    editor.feed_key('\u{7f}');
    assert_eq!(editor.snapshot_text(), "abcd");
    assert_eq!(editor.cursor(), Position::new(0, 2));
}

#[test]
fn test_insert_mode_enter_applies_smart_indent() {
    let mut editor = Editor::from_text("    if x {");
    editor.feed_keys("A");
    editor.feed_key('\r');
    assert_eq!(editor.line(1), "        ");
    assert_eq!(editor.cursor(), Position::new(1, 8));

    let mut editor = Editor::from_text("    body");
    editor.feed_keys("A");
    editor.feed_key('\r');
    assert_eq!(editor.line(1), "    ");
}

#[test]
fn test_find_char_and_repeat() {
    let mut editor = Editor::from_text("one two one two");
    editor.feed_keys("fo");
    assert_eq!(editor.cursor(), Position::new(0, 6));
    editor.feed_keys(";");
    assert_eq!(editor.cursor(), Position::new(0, 8));
    editor.feed_keys(",");
    assert_eq!(editor.cursor(), Position::new(0, 6));
}

#[test]
fn test_percent_jumps_between_brackets() {
    let mut editor = Editor::from_text("call(args) end");
    editor.feed_keys("%");
    assert_eq!(editor.cursor(), Position::new(0, 9));
    editor.feed_keys("%");
    assert_eq!(editor.cursor(), Position::new(0, 4));
}

#[test]
fn test_goto_line_with_count() {
    let mut editor = Editor::from_text("one\ntwo\nthree\nfour");
    editor.feed_keys("3G");
    assert_eq!(editor.cursor(), Position::new(2, 0));
    editor.feed_keys("G");
    assert_eq!(editor.cursor(), Position::new(3, 0));
    editor.feed_keys("gg");
    assert_eq!(editor.cursor(), Position::new(0, 0));
    editor.feed_keys("2gg");
    assert_eq!(editor.cursor(), Position::new(1, 0));
}
