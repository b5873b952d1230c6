use criterion::{black_box, criterion_group, criterion_main, Criterion};
use folio_model::{locate, mutate, Block, ColumnLayout, Forest};

/// `sections` root layouts of three columns, each column holding `per_column` text blocks
fn wide_forest(sections: usize, per_column: usize) -> Forest {
    (0..sections)
        .map(|_| {
            let mut layout = Block::layout_with(ColumnLayout::ThreeColumns);
            if let Block::Layout(l) = &mut layout {
                for column in l.children.iter_mut() {
                    *column = (0..per_column).map(|_| Block::text()).collect();
                }
            }
            layout
        })
        .collect()
}

fn last_id(forest: &Forest) -> String {
    forest.ids().pop().unwrap()
}

fn locate_last_block(c: &mut Criterion) {
    let forest = wide_forest(100, 10);
    let target = last_id(&forest);

    c.bench_function("locate_last_of_3100", |b| {
        b.iter(|| locate(black_box(&forest), black_box(&target)))
    });
}

fn move_across_forest(c: &mut Criterion) {
    let forest = wide_forest(100, 10);
    let ids = forest.ids();
    let source = ids[2].clone();
    let target = ids[ids.len() - 1].clone();

    c.bench_function("move_first_to_last_of_3100", |b| {
        b.iter(|| mutate::move_before(black_box(&forest), &source, &target))
    });
}

fn update_deep_block(c: &mut Criterion) {
    let forest = wide_forest(100, 10);
    let target = last_id(&forest);
    let patch = folio_model::BlockPatch::content(folio_model::BlockKind::Text, "edited").unwrap();

    c.bench_function("update_last_of_3100", |b| {
        b.iter(|| mutate::update(black_box(&forest), &target, &patch))
    });
}

criterion_group!(benches, locate_last_block, move_across_forest, update_deep_block);
criterion_main!(benches);
