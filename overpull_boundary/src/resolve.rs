// Copyright 2025 the Overpull Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Boundary decisions and scrollable-view discovery.
//!
//! All functions here are pure: they read the tree, carry the pointer down the
//! recursion as a value, and return an answer. Recursion depth is bounded by
//! the depth of the tree, so any finite acyclic tree yields a definite result.

use alloc::collections::VecDeque;

use kurbo::Point;

use crate::tree::ScrollTree;
use crate::types::{NodeFlags, ScrollDirection};

/// Finds the topmost child of `parent` whose transformed bounds contain
/// `point`, and returns it with `point` expressed in the child's local space.
///
/// `point` is in `parent`'s local space. Invisible children and children whose
/// flags intersect `exclude` are skipped, letting lower siblings answer.
pub fn hit_child<T: ScrollTree + ?Sized>(
    tree: &T,
    parent: T::Node,
    point: Point,
    exclude: NodeFlags,
) -> Option<(T::Node, Point)> {
    let in_content = point + tree.content_offset(parent);
    for i in (0..tree.child_count(parent)).rev() {
        let Some(child) = tree.child_at(parent, i) else {
            continue;
        };
        let flags = tree.flags(child);
        if !flags.contains(NodeFlags::VISIBLE) || flags.intersects(exclude) {
            continue;
        }
        let local = tree.local_transform(child).inverse() * in_content;
        if tree.local_bounds(child).contains(local) {
            return Some((child, local));
        }
    }
    None
}

/// Descends from `root` through the topmost child under `point` until no
/// child contains it, returning the deepest node and the point in its space.
pub fn target_under_point<T: ScrollTree + ?Sized>(
    tree: &T,
    root: T::Node,
    point: Point,
    exclude: NodeFlags,
) -> (T::Node, Point) {
    match hit_child(tree, root, point, exclude) {
        Some((child, local)) => target_under_point(tree, child, local, exclude),
        None => (root, point),
    }
}

fn blocks<T: ScrollTree + ?Sized>(tree: &T, node: T::Node, direction: ScrollDirection) -> bool {
    tree.flags(node).contains(NodeFlags::VISIBLE) && tree.can_scroll_vertically(node, direction)
}

/// Decides whether a gesture may begin pulling the header out.
///
/// A visible node that can still scroll up rejects the gesture. Otherwise, when
/// a pointer (in `node`'s local space) is supplied, the decision is delegated
/// to the topmost child under it, skipping children pinned to the bottom edge.
/// Without a pointer only `node` itself is checked.
///
/// ```rust
/// use kurbo::{Point, Rect};
/// use overpull_boundary::{LocalNode, NodeTree, ScrollTraits, can_start_refresh};
///
/// let mut tree = NodeTree::new();
/// let list = tree
///     .insert(None, LocalNode {
///         local_bounds: Rect::new(0.0, 0.0, 100.0, 200.0),
///         scroll_traits: ScrollTraits::LIST,
///         content_height: 1000.0,
///         ..LocalNode::default()
///     })
///     .unwrap();
///
/// assert!(can_start_refresh(&tree, list, None));
/// tree.set_scroll_y(list, 40.0);
/// assert!(!can_start_refresh(&tree, list, Some(Point::new(10.0, 10.0))));
/// ```
pub fn can_start_refresh<T: ScrollTree + ?Sized>(
    tree: &T,
    node: T::Node,
    pointer: Option<Point>,
) -> bool {
    if blocks(tree, node, ScrollDirection::Up) {
        return false;
    }
    if let Some(point) = pointer
        && let Some((child, local)) = hit_child(tree, node, point, NodeFlags::PIN_BOTTOM)
    {
        return can_start_refresh(tree, child, Some(local));
    }
    true
}

/// Decides whether a gesture may begin pulling the footer out.
///
/// A visible node that can still scroll down rejects the gesture. Otherwise,
/// when a pointer is supplied and `node` is not itself scrollable, the decision
/// is delegated to the topmost child under it, skipping children pinned to the
/// top edge. Content that does not fill the viewport always accepts; a node
/// that cannot scroll at all never blocks.
pub fn can_start_load_more<T: ScrollTree + ?Sized>(
    tree: &T,
    node: T::Node,
    pointer: Option<Point>,
    content_fills_viewport: bool,
) -> bool {
    if blocks(tree, node, ScrollDirection::Down) {
        return false;
    }
    let traits = tree.scroll_traits(node);
    if let Some(point) = pointer
        && !traits.is_scrollable()
        && let Some((child, local)) = hit_child(tree, node, point, NodeFlags::PIN_TOP)
    {
        return can_start_load_more(tree, child, Some(local), content_fills_viewport);
    }
    !content_fills_viewport
        || !traits.is_scrollable()
        || tree.can_scroll_vertically(node, ScrollDirection::Up)
}

/// Breadth-first search for the node that actually scrolls inside `root`.
///
/// The first node recognized as content (scrollable, pager or nested-scroll
/// parent) wins. If that node only coordinates nested scrolling without
/// scrolling itself, the search is repeated beneath it. Falls back to `root`
/// when nothing qualifies.
pub fn resolve_scrollable_descendant<T: ScrollTree + ?Sized>(tree: &T, root: T::Node) -> T::Node {
    let found = breadth_first_content(tree, root, true);
    let traits = tree.scroll_traits(found);
    if traits.contains(crate::ScrollTraits::NESTED_PARENT)
        && !traits.contains(crate::ScrollTraits::NESTED_CHILD)
    {
        breadth_first_content(tree, found, false)
    } else {
        found
    }
}

fn breadth_first_content<T: ScrollTree + ?Sized>(
    tree: &T,
    root: T::Node,
    include_root: bool,
) -> T::Node {
    let mut queue = VecDeque::new();
    queue.push_back(root);
    while let Some(node) = queue.pop_front() {
        if (include_root || node != root) && tree.scroll_traits(node).is_content() {
            return node;
        }
        for i in 0..tree.child_count(node) {
            if let Some(child) = tree.child_at(node, i) {
                queue.push_back(child);
            }
        }
    }
    root
}

/// Re-resolves the scrollable view under `point` (in `content`'s local space).
///
/// Descends through pagers and non-content containers under the pointer and
/// returns the first content node found, or `fallback` if the pointer is not
/// over one.
pub fn find_scrollable_by_point<T: ScrollTree + ?Sized>(
    tree: &T,
    content: T::Node,
    point: Point,
    fallback: T::Node,
) -> T::Node {
    let Some((child, local)) = hit_child(tree, content, point, NodeFlags::empty()) else {
        return fallback;
    };
    let traits = tree.scroll_traits(child);
    if traits.contains(crate::ScrollTraits::PAGER) || !traits.is_content() {
        find_scrollable_by_point(tree, child, local, fallback)
    } else {
        child
    }
}

#[cfg(test)]
mod tests {
    use kurbo::{Affine, Point, Rect};

    use super::*;
    use crate::{LocalNode, NodeId, NodeTree, ScrollTraits};

    fn node(rect: Rect) -> LocalNode {
        LocalNode {
            local_bounds: Rect::from_origin_size(Point::ZERO, rect.size()),
            local_transform: Affine::translate(rect.origin().to_vec2()),
            ..LocalNode::default()
        }
    }

    fn list(rect: Rect, content_height: f64) -> LocalNode {
        LocalNode {
            scroll_traits: ScrollTraits::LIST,
            content_height,
            ..node(rect)
        }
    }

    /// root(0..400) ┬ image (0..100)
    ///              └ list  (100..400), content 1000 tall
    fn collapsing() -> (NodeTree, NodeId, NodeId, NodeId) {
        let mut tree = NodeTree::new();
        let root = tree
            .insert(None, node(Rect::new(0.0, 0.0, 300.0, 400.0)))
            .unwrap();
        let image = tree
            .insert(Some(root), node(Rect::new(0.0, 0.0, 300.0, 100.0)))
            .unwrap();
        let list = tree
            .insert(Some(root), list(Rect::new(0.0, 100.0, 300.0, 400.0), 1000.0))
            .unwrap();
        (tree, root, image, list)
    }

    #[test]
    fn hit_child_translates_into_local_space() {
        let (tree, root, _, list) = collapsing();
        let (hit, local) = hit_child(&tree, root, Point::new(10.0, 150.0), NodeFlags::empty()).unwrap();
        assert_eq!(hit, list);
        assert_eq!(local, Point::new(10.0, 50.0));
    }

    #[test]
    fn hit_child_prefers_topmost_sibling() {
        let mut tree = NodeTree::new();
        let root = tree.insert(None, node(Rect::new(0.0, 0.0, 100.0, 100.0))).unwrap();
        let _below = tree.insert(Some(root), node(Rect::new(0.0, 0.0, 100.0, 100.0))).unwrap();
        let above = tree.insert(Some(root), node(Rect::new(0.0, 0.0, 100.0, 100.0))).unwrap();
        let (hit, _) = hit_child(&tree, root, Point::new(5.0, 5.0), NodeFlags::empty()).unwrap();
        assert_eq!(hit, above);
    }

    #[test]
    fn hit_child_accounts_for_parent_scroll_and_scale() {
        let mut tree = NodeTree::new();
        let root = tree
            .insert(None, list(Rect::new(0.0, 0.0, 100.0, 100.0), 500.0))
            .unwrap();
        let item = tree
            .insert(
                Some(root),
                LocalNode {
                    local_bounds: Rect::new(0.0, 0.0, 50.0, 50.0),
                    local_transform: Affine::translate((0.0, 200.0)) * Affine::scale(2.0),
                    ..LocalNode::default()
                },
            )
            .unwrap();
        tree.set_scroll_y(root, 150.0);
        // Local y=60 + scroll 150 = content y=210 → item local (10-0)/2, (210-200)/2.
        let (hit, local) = hit_child(&tree, root, Point::new(20.0, 60.0), NodeFlags::empty()).unwrap();
        assert_eq!(hit, item);
        assert_eq!(local, Point::new(10.0, 5.0));
    }

    #[test]
    fn refresh_follows_pointer_into_nested_list() {
        let (mut tree, root, _, list) = collapsing();
        tree.set_scroll_y(list, 300.0);

        // Over the image: nothing scrolls there, refresh allowed.
        assert!(can_start_refresh(&tree, root, Some(Point::new(10.0, 50.0))));
        // Over the scrolled list: blocked.
        assert!(!can_start_refresh(&tree, root, Some(Point::new(10.0, 200.0))));
        // Without a pointer only the root is checked.
        assert!(can_start_refresh(&tree, root, None));
    }

    #[test]
    fn pinned_bottom_children_do_not_gate_refresh() {
        let (mut tree, root, _, list) = collapsing();
        tree.set_scroll_y(list, 300.0);
        let pinned = tree
            .insert(Some(root), node(Rect::new(0.0, 300.0, 300.0, 400.0)))
            .unwrap();
        tree.set_flags(pinned, NodeFlags::VISIBLE | NodeFlags::PIN_BOTTOM);
        // Falls through the pinned footer to the scrolled list underneath.
        assert!(!can_start_refresh(&tree, root, Some(Point::new(10.0, 350.0))));
    }

    #[test]
    fn invisible_scroller_does_not_block() {
        let (mut tree, root, _, list) = collapsing();
        tree.set_scroll_y(list, 300.0);
        tree.set_flags(list, NodeFlags::empty());
        assert!(can_start_refresh(&tree, root, Some(Point::new(10.0, 200.0))));
        assert!(can_start_refresh(&tree, list, None));
    }

    #[test]
    fn load_more_requires_bottom_edge() {
        let (mut tree, root, _, list) = collapsing();
        let at = Some(Point::new(10.0, 200.0));
        assert!(!can_start_load_more(&tree, root, at, true));

        let max = tree.max_scroll_y(list);
        tree.set_scroll_y(list, max);
        assert!(can_start_load_more(&tree, root, at, true));
        assert!(can_start_load_more(&tree, list, None, true));
    }

    #[test]
    fn load_more_accepts_underfilled_content() {
        let mut tree = NodeTree::new();
        let short = tree
            .insert(None, list(Rect::new(0.0, 0.0, 100.0, 400.0), 100.0))
            .unwrap();
        assert!(can_start_load_more(&tree, short, None, false));
    }

    #[test]
    fn tree_without_scrollables_never_blocks() {
        let mut tree = NodeTree::new();
        let root = tree.insert(None, node(Rect::new(0.0, 0.0, 100.0, 100.0))).unwrap();
        let child = tree.insert(Some(root), node(Rect::new(0.0, 0.0, 100.0, 50.0))).unwrap();
        let _leaf = tree.insert(Some(child), node(Rect::new(0.0, 0.0, 10.0, 10.0))).unwrap();
        for p in [None, Some(Point::new(5.0, 5.0)), Some(Point::new(50.0, 90.0))] {
            assert!(can_start_refresh(&tree, root, p));
            assert!(can_start_load_more(&tree, root, p, true));
            assert!(can_start_load_more(&tree, root, p, false));
        }
    }

    #[test]
    fn bfs_finds_shallowest_scrollable() {
        let (tree, root, _, list) = collapsing();
        assert_eq!(resolve_scrollable_descendant(&tree, root), list);
    }

    #[test]
    fn bfs_looks_past_nested_parent() {
        let mut tree = NodeTree::new();
        let root = tree.insert(None, node(Rect::new(0.0, 0.0, 100.0, 100.0))).unwrap();
        let coordinator = tree
            .insert(
                Some(root),
                LocalNode {
                    scroll_traits: ScrollTraits::NESTED_PARENT,
                    ..node(Rect::new(0.0, 0.0, 100.0, 100.0))
                },
            )
            .unwrap();
        let inner = tree
            .insert(Some(coordinator), list(Rect::new(0.0, 0.0, 100.0, 100.0), 300.0))
            .unwrap();
        assert_eq!(resolve_scrollable_descendant(&tree, root), inner);
    }

    #[test]
    fn bfs_falls_back_to_root() {
        let mut tree = NodeTree::new();
        let root = tree.insert(None, node(Rect::new(0.0, 0.0, 100.0, 100.0))).unwrap();
        let _plain = tree.insert(Some(root), node(Rect::new(0.0, 0.0, 10.0, 10.0))).unwrap();
        assert_eq!(resolve_scrollable_descendant(&tree, root), root);
    }

    #[test]
    fn scrollable_by_point_descends_through_pager() {
        let mut tree = NodeTree::new();
        let root = tree.insert(None, node(Rect::new(0.0, 0.0, 200.0, 100.0))).unwrap();
        let pager = tree
            .insert(
                Some(root),
                LocalNode {
                    scroll_traits: ScrollTraits::PAGER,
                    ..node(Rect::new(0.0, 0.0, 200.0, 100.0))
                },
            )
            .unwrap();
        let page_a = tree
            .insert(Some(pager), list(Rect::new(0.0, 0.0, 100.0, 100.0), 500.0))
            .unwrap();
        let page_b = tree
            .insert(Some(pager), list(Rect::new(100.0, 0.0, 200.0, 100.0), 500.0))
            .unwrap();

        assert_eq!(find_scrollable_by_point(&tree, root, Point::new(50.0, 50.0), root), page_a);
        assert_eq!(find_scrollable_by_point(&tree, root, Point::new(150.0, 50.0), root), page_b);
        assert_eq!(find_scrollable_by_point(&tree, root, Point::new(500.0, 50.0), root), root);
    }

    #[test]
    fn target_under_point_returns_deepest_hit() {
        let (tree, root, image, _) = collapsing();
        let (hit, local) = target_under_point(&tree, root, Point::new(20.0, 30.0), NodeFlags::empty());
        assert_eq!(hit, image);
        assert_eq!(local, Point::new(20.0, 30.0));
        let (miss, p) = target_under_point(&tree, root, Point::new(900.0, 30.0), NodeFlags::empty());
        assert_eq!(miss, root);
        assert_eq!(p, Point::new(900.0, 30.0));
    }
}
