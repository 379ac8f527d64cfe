use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use modal_core::{Editor, Position};

fn large_text(line_count: usize) -> String {
    let mut out = String::with_capacity(line_count * 64);
    for i in 0..line_count {
        out.push_str(&format!(
            "{i:06} the quick brown fox jumps over the lazy dog (modal-core benchmark line)\n"
        ));
    }
    // Remove the final '\n' to avoid creating an extra trailing empty line.
    out.pop();
    out
}

fn bench_large_file_open(c: &mut Criterion) {
    let text = large_text(50_000);
    c.bench_function("large_file_open/50k_lines", |b| {
        b.iter(|| {
            let editor = Editor::from_text(black_box(&text));
            black_box(editor.line_count());
        })
    });
}

fn bench_keystream(c: &mut Criterion) {
    let text = large_text(10_000);
    c.bench_function("keystream/motion_heavy", |b| {
        b.iter_batched(
            || Editor::from_text(&text),
            |mut editor| {
                for _ in 0..50 {
                    editor.feed_keys("wwbej$0");
                }
                black_box(editor.cursor());
            },
            BatchSize::LargeInput,
        )
    });
}

fn bench_edit_undo_cycle(c: &mut Criterion) {
    let text = large_text(10_000);
    c.bench_function("edit_undo/100_cycles", |b| {
        b.iter_batched(
            || {
                let mut editor = Editor::from_text(&text);
                editor.display_line_motion(Position::new(5_000, 0));
                editor
            },
            |mut editor| {
                for _ in 0..100 {
                    editor.feed_keys("ddu");
                }
                black_box(editor.line_count());
            },
            BatchSize::LargeInput,
        )
    });
}

fn bench_search_large_buffer(c: &mut Criterion) {
    let text = large_text(50_000);
    let mut editor = Editor::from_text(&text);

    c.bench_function("search/word_everywhere", |b| {
        b.iter(|| {
            black_box(editor.set_search_pattern(black_box("fox"), true));
            black_box(editor.search_info().total);
        })
    });
}

criterion_group!(
    benches,
    bench_large_file_open,
    bench_keystream,
    bench_edit_undo_cycle,
    bench_search_large_buffer
);
criterion_main!(benches);
