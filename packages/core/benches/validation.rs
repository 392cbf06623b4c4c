//! Benchmarks for schema construction and label validation
//!
//! Run with: `cargo bench -p nluforge-core`

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use nluforge_core::{AppManifest, EntityDefinition, LabelValidator, LabeledSpan, SchemaBuilder};

/// A wide two-level schema: `fanout` children, each with `fanout` leaves
fn wide_definition(fanout: usize) -> EntityDefinition {
    EntityDefinition::with_children(
        "Root",
        (0..fanout)
            .map(|i| {
                EntityDefinition::with_children(
                    format!("Child{}", i),
                    (0..fanout)
                        .map(|j| EntityDefinition::leaf(format!("Leaf{}", j)))
                        .collect(),
                )
            })
            .collect(),
    )
}

/// Labels every node of `wide_definition(fanout)` with 4-char leaf spans
fn wide_labels(fanout: usize) -> (String, LabeledSpan) {
    let text = "x".repeat(fanout * fanout * 4);
    let children = (0..fanout)
        .map(|i| {
            let start = i * fanout * 4;
            LabeledSpan::new(format!("Child{}", i), start, start + fanout * 4).with_children(
                (0..fanout)
                    .map(|j| {
                        let leaf = start + j * 4;
                        LabeledSpan::new(format!("Leaf{}", j), leaf, leaf + 4)
                    })
                    .collect(),
            )
        })
        .collect();
    let len = text.len();
    (text, LabeledSpan::new("Root", 0, len).with_children(children))
}

fn bench_build(c: &mut Criterion) {
    let def = wide_definition(32);
    c.bench_function("build_wide_schema_32x32", |b| {
        b.iter(|| SchemaBuilder::new().build(black_box(&def)).unwrap())
    });
}

fn bench_validate(c: &mut Criterion) {
    let schema = SchemaBuilder::new().build(&wide_definition(32)).unwrap();
    let (text, labels) = wide_labels(32);
    c.bench_function("validate_wide_labels_32x32", |b| {
        b.iter(|| LabelValidator::validate(black_box(&schema), &text, black_box(&labels)).unwrap())
    });
}

fn bench_compile_sample(c: &mut Criterion) {
    let manifest = AppManifest::contoso_pizza();
    c.bench_function("compile_contoso_pizza", |b| {
        b.iter(|| black_box(&manifest).compile().unwrap())
    });
}

criterion_group!(benches, bench_build, bench_validate, bench_compile_sample);
criterion_main!(benches);
