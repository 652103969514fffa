// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tiller-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tiller and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use tiller::ax::{ElementHandle, ElementIdentifier, MemoryTree, NodeSpec, Role, TreeQuery};

fn env_usize(name: &str, default: usize) -> usize {
    std::env::var(name).ok().and_then(|raw| raw.trim().parse::<usize>().ok()).unwrap_or(default)
}

fn env_u64(name: &str, default: u64) -> u64 {
    std::env::var(name).ok().and_then(|raw| raw.trim().parse::<u64>().ok()).unwrap_or(default)
}

fn criterion() -> Criterion {
    let sample_size = env_usize("BENCH_SAMPLE_SIZE", 60).clamp(10, 200);
    let warmup_secs = env_u64("BENCH_WARMUP_SECS", 3).clamp(1, 60);
    let measurement_secs = env_u64("BENCH_MEASUREMENT_SECS", 5).clamp(1, 120);

    Criterion::default()
        .sample_size(sample_size)
        .warm_up_time(Duration::from_secs(warmup_secs))
        .measurement_time(Duration::from_secs(measurement_secs))
}

/// An outline of `rows` rows, each `row > cell > static text`, under a few wrapper groups.
fn outline(rows: usize) -> (MemoryTree, ElementHandle) {
    let tree = MemoryTree::new();
    let window = tree.insert(None, NodeSpec::new(Role::Window)).expect("window");
    let content = tree.insert(Some(&window), NodeSpec::new(Role::Group)).expect("content");
    let split = tree.insert(Some(&content), NodeSpec::new(Role::SplitGroup)).expect("split");
    let sidebar = tree.insert(Some(&split), NodeSpec::new(Role::Group)).expect("sidebar");
    let outline = tree.insert(Some(&sidebar), NodeSpec::new(Role::Outline)).expect("outline");

    for ix in 0..rows {
        let row = tree.insert(Some(&outline), NodeSpec::new(Role::Row)).expect("row");
        let cell = tree.insert(Some(&row), NodeSpec::new(Role::Cell)).expect("cell");
        tree.insert(
            Some(&cell),
            NodeSpec::new(Role::StaticText)
                .identifier(format!("pane.{ix}"))
                .description(format!("Pane {ix}")),
        )
        .expect("text");
    }
    (tree, window)
}

// Benchmark identity (keep stable):
// - Group names in this file: `ax.descendant`, `ax.descendant_with_lineage`
// - Case IDs are `<rows>_<position>`; keep them stable so results stay comparable.
fn benches_search(c: &mut Criterion) {
    for (group_name, with_lineage) in [("ax.descendant", false), ("ax.descendant_with_lineage", true)]
    {
        let mut group = c.benchmark_group(group_name);

        for rows in [32usize, 512] {
            let (tree, window) = outline(rows);
            for (position, target) in [("first", 0), ("last", rows - 1)] {
                let stable = ElementIdentifier::stable(format!("pane.{target}"));
                let labelled = ElementIdentifier::label(format!("Pane {target}"), Role::StaticText);
                group.throughput(Throughput::Elements(rows as u64 * 3));

                group.bench_function(format!("{rows}_{position}_stable"), |b| {
                    b.iter(|| {
                        if with_lineage {
                            let found = tree
                                .descendant_with_lineage(black_box(&window), &stable, None)
                                .expect("search");
                            black_box(found.map(|(_, lineage)| lineage.len()))
                        } else {
                            let found =
                                tree.descendant(black_box(&window), &stable, None).expect("search");
                            black_box(found.map(|found| found.id().get()))
                        }
                    })
                });

                group.bench_function(format!("{rows}_{position}_label"), |b| {
                    b.iter(|| {
                        let found =
                            tree.descendant(black_box(&window), &labelled, None).expect("search");
                        black_box(found.is_some())
                    })
                });
            }
        }

        group.finish();
    }
}

criterion_group! {
    name = benches;
    config = criterion();
    targets = benches_search
}
criterion_main!(benches);
