// Copyright 2025 the Overpull Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Boundary decisions over realistic nested layouts.
//!
//! Each test builds a small screen with [`NodeTree`] and checks the refresh and
//! load-more answers for pointers over different regions.

use kurbo::{Affine, Point, Rect};
use overpull_boundary::{
    ElementId, LocalNode, NodeFlags, NodeId, NodeTree, ScrollTraits, ScrollTree, ScrollTreeMut,
    can_start_load_more, can_start_refresh, find_scrollable_by_point,
    resolve_scrollable_descendant,
};

fn plain(x: f64, y: f64, w: f64, h: f64) -> LocalNode {
    LocalNode {
        local_bounds: Rect::new(0.0, 0.0, w, h),
        local_transform: Affine::translate((x, y)),
        ..LocalNode::default()
    }
}

fn scroller(x: f64, y: f64, w: f64, h: f64, content: f64) -> LocalNode {
    LocalNode {
        scroll_traits: ScrollTraits::SCROLL_VIEW,
        content_height: content,
        ..plain(x, y, w, h)
    }
}

/// A vertical scroll view whose content holds a banner and an inner list.
///
/// ```text
/// outer (0..600, content 1200)
///   ├ banner (0..200)
///   └ inner list (200..700 in outer content, content 3000)
/// ```
struct Nested {
    tree: NodeTree,
    outer: NodeId,
    inner: NodeId,
}

fn nested() -> Nested {
    let mut tree = NodeTree::new();
    let outer = tree.insert(None, scroller(0.0, 0.0, 360.0, 600.0, 1200.0)).unwrap();
    let _banner = tree.insert(Some(outer), plain(0.0, 0.0, 360.0, 200.0)).unwrap();
    let inner = tree
        .insert(
            Some(outer),
            LocalNode {
                scroll_traits: ScrollTraits::LIST,
                ..scroller(0.0, 200.0, 360.0, 500.0, 3000.0)
            },
        )
        .unwrap();
    Nested { tree, outer, inner }
}

#[test]
fn outer_scroll_position_shifts_the_hit() {
    let Nested { mut tree, outer, inner } = nested();
    tree.set_scroll_y(inner, 100.0);

    // At rest the pointer at y=100 is over the banner.
    let p = Some(Point::new(50.0, 100.0));
    assert!(can_start_refresh(&tree, outer, p));

    // Scrolling the outer view brings the inner list under the same pointer,
    // but the outer view itself now blocks first.
    tree.set_scroll_y(outer, 150.0);
    assert!(!can_start_refresh(&tree, outer, p));

    // Scrolled back to the top, the inner list still blocks where it is hit.
    tree.set_scroll_y(outer, 0.0);
    assert!(!can_start_refresh(&tree, outer, Some(Point::new(50.0, 400.0))));
}

#[test]
fn load_more_stops_at_the_first_scroller() {
    let Nested { mut tree, outer, inner } = nested();
    // Outer at its end, inner list far from its end.
    let max = tree.max_scroll_y(outer);
    tree.set_scroll_y(outer, max);
    assert_eq!(tree.scroll_traits(inner), ScrollTraits::LIST);

    // The outer view is scrollable, so load-more does not look inside it.
    assert!(can_start_load_more(&tree, outer, Some(Point::new(50.0, 500.0)), true));
}

#[test]
fn underfilled_footer_at_bottom_edge_is_allowed() {
    let mut tree = NodeTree::new();
    let root = tree.insert(None, plain(0.0, 0.0, 360.0, 600.0)).unwrap();
    // Content shorter than the viewport, already at its bottom edge.
    let list = tree
        .insert(
            Some(root),
            LocalNode {
                scroll_traits: ScrollTraits::LIST,
                ..scroller(0.0, 0.0, 360.0, 600.0, 200.0)
            },
        )
        .unwrap();

    let p = Some(Point::new(10.0, 10.0));
    assert!(can_start_load_more(&tree, root, p, false));
    assert!(can_start_load_more(&tree, list, None, false));
    // A short list with no scroll range cannot scroll up either, so only the
    // underfill rule lets it through.
    assert!(!can_start_load_more(&tree, list, None, true));
}

#[test]
fn sticky_header_over_scrolled_list_is_ignored_for_load_more() {
    let mut tree = NodeTree::new();
    let root = tree.insert(None, plain(0.0, 0.0, 360.0, 600.0)).unwrap();
    let list = tree
        .insert(
            Some(root),
            LocalNode {
                scroll_traits: ScrollTraits::LIST,
                ..scroller(0.0, 0.0, 360.0, 600.0, 2000.0)
            },
        )
        .unwrap();
    let sticky = tree.insert(Some(root), plain(0.0, 0.0, 360.0, 60.0)).unwrap();
    tree.set_flags(sticky, NodeFlags::VISIBLE | NodeFlags::PIN_TOP);

    let max = tree.max_scroll_y(list);
    tree.set_scroll_y(list, max);

    let over_sticky = Some(Point::new(10.0, 30.0));
    assert!(can_start_load_more(&tree, root, over_sticky, true));
    // Refresh does not skip a top-pinned child: the sticky header is a plain
    // node, so it allows the pull even though the list below is scrolled.
    assert!(can_start_refresh(&tree, root, over_sticky));
}

#[test]
fn transformed_containers_are_inverted() {
    let mut tree = NodeTree::new();
    let root = tree.insert(None, plain(0.0, 0.0, 400.0, 400.0)).unwrap();
    // A container scaled down by half and shifted right.
    let scaled = tree
        .insert(
            Some(root),
            LocalNode {
                local_bounds: Rect::new(0.0, 0.0, 400.0, 800.0),
                local_transform: Affine::translate((200.0, 0.0)) * Affine::scale(0.5),
                ..LocalNode::default()
            },
        )
        .unwrap();
    let list = tree
        .insert(Some(scaled), scroller(0.0, 400.0, 400.0, 400.0, 1000.0))
        .unwrap();
    tree.set_scroll_y(list, 10.0);

    // (300, 300) in root → (200, 600) in scaled → (200, 200) in list.
    assert!(!can_start_refresh(&tree, root, Some(Point::new(300.0, 300.0))));
    // (300, 100) in root → (200, 200) in scaled: above the list.
    assert!(can_start_refresh(&tree, root, Some(Point::new(300.0, 100.0))));
    // Left half of the root is outside the scaled container altogether.
    assert!(can_start_refresh(&tree, root, Some(Point::new(100.0, 300.0))));
}

#[test]
fn translation_moves_hit_region() {
    let Nested { mut tree, outer, inner } = nested();
    tree.set_scroll_y(inner, 50.0);
    let p = Some(Point::new(10.0, 150.0));
    assert!(can_start_refresh(&tree, outer, p));
    tree.set_translation_y(inner, -100.0);
    assert!(!can_start_refresh(&tree, outer, p));
}

#[test]
fn pager_resolution_follows_the_pointer() {
    let mut tree = NodeTree::new();
    let root = tree.insert(None, plain(0.0, 0.0, 720.0, 600.0)).unwrap();
    let pager = tree
        .insert(
            Some(root),
            LocalNode {
                scroll_traits: ScrollTraits::PAGER,
                ..plain(0.0, 0.0, 720.0, 600.0)
            },
        )
        .unwrap();
    let left = tree.insert(Some(pager), scroller(0.0, 0.0, 360.0, 600.0, 900.0)).unwrap();
    let right = tree.insert(Some(pager), scroller(360.0, 0.0, 360.0, 600.0, 900.0)).unwrap();

    // Breadth first stops at the pager itself.
    assert_eq!(resolve_scrollable_descendant(&tree, root), pager);
    assert_eq!(find_scrollable_by_point(&tree, root, Point::new(100.0, 10.0), pager), left);
    assert_eq!(find_scrollable_by_point(&tree, root, Point::new(500.0, 10.0), pager), right);

    tree.set_scroll_y(right, 20.0);
    assert!(can_start_refresh(&tree, root, Some(Point::new(100.0, 10.0))));
    assert!(!can_start_refresh(&tree, root, Some(Point::new(500.0, 10.0))));
}

#[test]
fn find_element_locates_pinned_children() {
    let mut tree = NodeTree::new();
    let root = tree.insert(None, plain(0.0, 0.0, 100.0, 100.0)).unwrap();
    let a = tree.insert(Some(root), plain(0.0, 0.0, 100.0, 10.0)).unwrap();
    let pinned = tree
        .insert(
            Some(a),
            LocalNode {
                element_id: Some(ElementId(42)),
                flags: NodeFlags::VISIBLE | NodeFlags::PIN_TOP,
                ..plain(0.0, 0.0, 100.0, 10.0)
            },
        )
        .unwrap();
    assert_eq!(tree.find_element(root, ElementId(42)), Some(pinned));
    assert_eq!(tree.find_element(a, ElementId(7)), None);
    assert_eq!(tree.parent(pinned), Some(a));
}

#[test]
fn deep_tree_without_scrollers_terminates() {
    let mut tree = NodeTree::new();
    let root = tree.insert(None, plain(0.0, 0.0, 100.0, 100.0)).unwrap();
    let mut parent = root;
    for _ in 0..200 {
        parent = tree.insert(Some(parent), plain(0.0, 0.0, 100.0, 100.0)).unwrap();
    }
    let p = Some(Point::new(50.0, 50.0));
    assert!(can_start_refresh(&tree, root, p));
    assert!(can_start_load_more(&tree, root, p, true));
    assert_eq!(resolve_scrollable_descendant(&tree, root), root);
}
