// Copyright 2025 the Overpull Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Benchmarks for the refresh kernel's per-event cost.

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use kurbo::{Point, Rect};
use overpull_boundary::{LocalNode, NodeId, NodeTree, ScrollTraits};
use overpull_kernel::{KernelProxy, RefreshConfig, RefreshKernel};

fn setup() -> (NodeTree, RefreshKernel<NodeId>) {
    let mut tree = NodeTree::new();
    let list = tree
        .insert(None, LocalNode {
            local_bounds: Rect::new(0.0, 0.0, 400.0, 800.0),
            scroll_traits: ScrollTraits::LIST,
            content_height: 4000.0,
            ..LocalNode::default()
        })
        .unwrap();
    let mut kernel = RefreshKernel::new(RefreshConfig::default());
    kernel.set_header_height(120.0);
    kernel.set_content(&tree, list);
    kernel.on_layout(400.0, 800.0);
    kernel.set_on_refresh_listener(|k: &KernelProxy| k.finish_refresh_with(200, true, false));
    (tree, kernel)
}

fn bench_kernel(c: &mut Criterion) {
    let mut group = c.benchmark_group("overpull_kernel");

    group.bench_function("drag_move", |b| {
        b.iter_batched(
            || {
                let (tree, mut kernel) = setup();
                kernel.on_gesture_down(&tree, Point::new(200.0, 0.0), 0);
                (tree, kernel)
            },
            |(mut tree, mut kernel)| {
                for step in 1..=120_u32 {
                    let y = f64::from(step) * 4.0;
                    kernel.on_gesture_move(&mut tree, Point::new(200.0, y), u64::from(step) * 8);
                }
                black_box(kernel.spinner())
            },
            BatchSize::SmallInput,
        );
    });

    group.bench_function("full_refresh_cycle", |b| {
        b.iter_batched(
            setup,
            |(mut tree, mut kernel)| {
                kernel.on_gesture_down(&tree, Point::new(200.0, 0.0), 0);
                for step in 1..=40_u32 {
                    let y = f64::from(step) * 12.0;
                    kernel.on_gesture_move(&mut tree, Point::new(200.0, y), u64::from(step) * 8);
                }
                kernel.on_gesture_up(320);
                let mut now = 320;
                while kernel.tick(&mut tree, now) {
                    now += 16;
                }
                black_box(kernel.state())
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

criterion_group!(benches, bench_kernel);
criterion_main!(benches);
