// Copyright 2025 the Overpull Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The minimal view of a host's visual tree that boundary decisions need.

use alloc::vec::Vec;
use core::fmt::Debug;

use kurbo::{Affine, Rect, Vec2};

use crate::types::{ElementId, NodeFlags, ScrollDirection, ScrollTraits};

/// Read access to a host's visual tree.
///
/// Coordinates follow a simple convention:
///
/// - A node's [`local_bounds`](Self::local_bounds) are in its own local space.
/// - Its [`local_transform`](Self::local_transform) maps local space into the
///   parent's *content* space, and includes any translation applied through
///   [`ScrollTreeMut::set_translation_y`].
/// - A parent's [`content_offset`](Self::content_offset) is the scroll
///   position of its content; a point in the parent's local space maps to
///   content space by adding it.
///
/// Unknown nodes should answer with empty/neutral values (no children, zero
/// bounds, no flags); the resolver never panics on them.
pub trait ScrollTree {
    /// Node handle.
    type Node: Copy + Eq + Debug;

    /// Number of children of `node`.
    fn child_count(&self, node: Self::Node) -> usize;

    /// Child at `index`, in paint order (last is drawn on top).
    fn child_at(&self, node: Self::Node, index: usize) -> Option<Self::Node>;

    /// Local (untransformed) bounds of `node`.
    fn local_bounds(&self, node: Self::Node) -> Rect;

    /// Transform from `node`'s local space into its parent's content space.
    fn local_transform(&self, node: Self::Node) -> Affine;

    /// Scroll position of `node`'s own content.
    fn content_offset(&self, node: Self::Node) -> Vec2;

    /// Visibility and pin flags of `node`.
    fn flags(&self, node: Self::Node) -> NodeFlags;

    /// Scroll classification of `node`.
    fn scroll_traits(&self, node: Self::Node) -> ScrollTraits;

    /// Returns `true` if `node` can scroll its content further in `direction`.
    fn can_scroll_vertically(&self, node: Self::Node, direction: ScrollDirection) -> bool;

    /// Host-assigned element id of `node`, if any.
    fn element_id(&self, node: Self::Node) -> Option<ElementId>;

    /// Current vertical translation of `node`.
    fn translation_y(&self, node: Self::Node) -> f64;

    /// Finds the first node with element id `id` in the subtree rooted at
    /// `root` (depth first, `root` included).
    fn find_element(&self, root: Self::Node, id: ElementId) -> Option<Self::Node> {
        let mut stack: Vec<Self::Node> = Vec::new();
        stack.push(root);
        while let Some(node) = stack.pop() {
            if self.element_id(node) == Some(id) {
                return Some(node);
            }
            for i in (0..self.child_count(node)).rev() {
                if let Some(child) = self.child_at(node, i) {
                    stack.push(child);
                }
            }
        }
        None
    }
}

/// Mutations the content wrapper performs on a host's visual tree.
pub trait ScrollTreeMut: ScrollTree {
    /// Sets the vertical translation of `node`.
    fn set_translation_y(&mut self, node: Self::Node, translation: f64);

    /// Scrolls `node`'s content by `dy`, clamped to its scroll range.
    fn scroll_content_by(&mut self, node: Self::Node, dy: f64);
}
