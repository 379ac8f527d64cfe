//! Drive the editor kernel with a key sequence and print the result.
//!
//! ```bash
//! cargo run --example vim_keys
//! ```

use modal_core::{CoreEvent, Editor};

fn main() {
    let mut editor = Editor::from_text("fn main() {\n    println!(\"hello world\");\n}");

    // A small editing session: jump into the string, change it, duplicate the
    // line, then search for the word under the cursor.
    let session = "jfhci\"goodbye\u{1b}yyp";
    for key in session.chars() {
        match editor.feed_key(key) {
            CoreEvent::Pending => println!("pending: {:?}", editor.pending_input()),
            CoreEvent::Executed { buffer_changed, .. } => {
                println!("key {key:?} executed (buffer changed: {buffer_changed})");
            }
            event => println!("key {key:?} -> {event:?}"),
        }
    }

    println!("\n--- buffer ---");
    for i in 0..editor.line_count() {
        println!("{:>3} | {}", i + 1, editor.line(i));
    }

    editor.feed_key('*');
    let info = editor.search_info();
    println!(
        "\ncursor {:?}, search {:?} ({} matches)",
        editor.cursor(),
        info.pattern,
        info.total
    );
}
