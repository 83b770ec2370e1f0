// Copyright 2025 the Overpull Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Benchmarks for scroll-boundary decisions over nested layouts.
//!
//! The synthetic layout is a stack of `depth` containers, each holding a
//! banner, `width - 1` scrolled siblings and the next container, so a point
//! near the bottom of the screen has to be mapped through every level.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use kurbo::{Affine, Point, Rect};
use overpull_boundary::{
    LocalNode, NodeId, NodeTree, ScrollTraits, can_start_load_more, can_start_refresh,
    find_scrollable_by_point, resolve_scrollable_descendant,
};

fn build(depth: usize, width: usize) -> (NodeTree, NodeId, Point) {
    let mut tree = NodeTree::new();
    let root = tree
        .insert(None, LocalNode {
            local_bounds: Rect::new(0.0, 0.0, 400.0, 800.0),
            ..LocalNode::default()
        })
        .unwrap();
    let mut parent = root;
    let mut height = 800.0;
    for _ in 0..depth {
        let _banner = tree
            .insert(Some(parent), LocalNode {
                local_bounds: Rect::new(0.0, 0.0, 400.0, 10.0),
                ..LocalNode::default()
            })
            .unwrap();
        for _ in 1..width {
            let side = tree
                .insert(Some(parent), LocalNode {
                    local_bounds: Rect::new(0.0, 0.0, 40.0, height - 10.0),
                    local_transform: Affine::translate((360.0, 10.0)),
                    scroll_traits: ScrollTraits::LIST,
                    content_height: 5000.0,
                    ..LocalNode::default()
                })
                .unwrap();
            tree.set_scroll_y(side, 100.0);
        }
        height -= 10.0;
        parent = tree
            .insert(Some(parent), LocalNode {
                local_bounds: Rect::new(0.0, 0.0, 360.0, height),
                local_transform: Affine::translate((0.0, 10.0)),
                ..LocalNode::default()
            })
            .unwrap();
    }
    let _list = tree
        .insert(Some(parent), LocalNode {
            local_bounds: Rect::new(0.0, 0.0, 360.0, height),
            scroll_traits: ScrollTraits::LIST,
            content_height: 5000.0,
            ..LocalNode::default()
        })
        .unwrap();
    (tree, root, Point::new(100.0, 790.0))
}

fn bench_boundary(c: &mut Criterion) {
    let mut group = c.benchmark_group("overpull_boundary");
    for &(depth, width) in &[(4_usize, 2_usize), (16, 4), (64, 8)] {
        let (tree, root, point) = build(depth, width);
        let id = format!("depth={depth},width={width}");

        group.bench_with_input(BenchmarkId::new("can_start_refresh", &id), &point, |b, p| {
            b.iter(|| black_box(can_start_refresh(&tree, root, Some(black_box(*p)))));
        });
        group.bench_with_input(BenchmarkId::new("can_start_load_more", &id), &point, |b, p| {
            b.iter(|| black_box(can_start_load_more(&tree, root, Some(black_box(*p)), true)));
        });
        group.bench_function(BenchmarkId::new("resolve_scrollable_descendant", &id), |b| {
            b.iter(|| black_box(resolve_scrollable_descendant(&tree, black_box(root))));
        });
        group.bench_with_input(BenchmarkId::new("find_scrollable_by_point", &id), &point, |b, p| {
            b.iter(|| black_box(find_scrollable_by_point(&tree, root, black_box(*p), root)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_boundary);
criterion_main!(benches);
