//! Benchmarks for path traversal and node lookup.

use arbor::FileTree;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

/// A tree with `fanout` files and `fanout` directories under each of the
/// first `depth` levels of a spine.
fn build_tree(depth: usize, fanout: usize) -> FileTree {
    let mut tree = FileTree::new();
    tree.init().unwrap();

    let mut spine = String::from("/root");
    for level in 0..depth {
        tree.insert_dir(&spine).unwrap();
        for i in 0..fanout {
            tree.insert_file(&format!("{spine}/f{i}.dat"), Some(vec![0u8; 32]))
                .unwrap();
            tree.insert_dir(&format!("{spine}/d{i}")).unwrap();
        }
        spine.push_str(&format!("/lvl{level}"));
    }
    tree.insert_dir(&spine).unwrap();
    tree
}

fn bench_lookup(c: &mut Criterion) {
    let tree = build_tree(8, 64);
    let deep = "/root/lvl0/lvl1/lvl2/lvl3/lvl4/lvl5/lvl6/lvl7";
    let wide = "/root/lvl0/lvl1/lvl2/f63.dat";

    c.bench_function("contains_dir_deep", |b| {
        b.iter(|| tree.contains_dir(black_box(deep)))
    });
    c.bench_function("contains_file_wide", |b| {
        b.iter(|| tree.contains_file(black_box(wide)))
    });
    c.bench_function("stat_file", |b| b.iter(|| tree.stat(black_box(wide))));
    c.bench_function("lookup_miss", |b| {
        b.iter(|| tree.contains_dir(black_box("/root/lvl0/absent/x")))
    });
}

fn bench_mutation(c: &mut Criterion) {
    c.bench_function("insert_and_remove_file", |b| {
        let mut tree = build_tree(4, 16);
        b.iter(|| {
            tree.insert_file("/root/scratch.dat", Some(vec![0u8; 64]))
                .unwrap();
            tree.remove_file("/root/scratch.dat").unwrap();
        });
    });
}

criterion_group!(benches, bench_lookup, bench_mutation);
criterion_main!(benches);
