// Copyright 2025 the Overpull Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The content being refreshed.

use kurbo::Point;
use overpull_boundary::{
    ElementId, ScrollDirection, ScrollTree, ScrollTreeMut, can_start_load_more,
    can_start_refresh, find_scrollable_by_point, resolve_scrollable_descendant,
};

/// Wraps the single content node of a refresh layout.
///
/// Keeps track of the scrollable descendant that decides boundaries, and of
/// the pointer for the current gesture. When the content has a scrollable
/// descendant distinct from itself, boundary decisions for a gesture follow
/// the pointer down the tree; otherwise a single check on the content is used.
#[derive(Clone, Debug, PartialEq)]
pub struct RefreshContent<N> {
    content: N,
    scrollable: N,
    pointer: Option<Point>,
}

impl<N: Copy + Eq + core::fmt::Debug> RefreshContent<N> {
    /// Wrap `content` and resolve its scrollable descendant.
    pub fn new<T: ScrollTree<Node = N> + ?Sized>(tree: &T, content: N) -> Self {
        Self {
            content,
            scrollable: resolve_scrollable_descendant(tree, content),
            pointer: None,
        }
    }

    /// The wrapped content node.
    pub fn content(&self) -> N {
        self.content
    }

    /// The scrollable view boundary decisions fall back to.
    pub fn scrollable(&self) -> N {
        self.scrollable
    }

    /// Pointer for the current gesture, in the content's local space, when
    /// pointer-following boundary decisions are enabled.
    pub fn gesture_pointer(&self) -> Option<Point> {
        self.pointer
    }

    /// Re-run the scrollable search, for example after the content changed.
    pub fn resolve_scrollable<T: ScrollTree<Node = N> + ?Sized>(&mut self, tree: &T) {
        self.scrollable = resolve_scrollable_descendant(tree, self.content);
    }

    /// Record the pointer at the start of a gesture.
    ///
    /// `pointer` is in the content's local space. If the scrollable view is
    /// not the content itself, the scrollable under the pointer is resolved
    /// and boundary decisions follow the pointer for this gesture.
    pub fn apply_gesture_start<T: ScrollTree<Node = N> + ?Sized>(&mut self, tree: &T, pointer: Point) {
        if self.scrollable == self.content {
            self.pointer = None;
            return;
        }
        self.scrollable = find_scrollable_by_point(tree, self.content, pointer, self.scrollable);
        self.pointer = Some(pointer);
    }

    /// Forget the gesture pointer.
    pub fn end_gesture(&mut self) {
        self.pointer = None;
    }

    /// Whether the header may be pulled out now.
    pub fn can_refresh<T: ScrollTree<Node = N> + ?Sized>(&self, tree: &T) -> bool {
        match self.pointer {
            Some(p) => can_start_refresh(tree, self.content, Some(p)),
            None => can_start_refresh(tree, self.scrollable, None),
        }
    }

    /// Whether the footer may be pulled out now.
    ///
    /// Content that does not fill its viewport is refused when
    /// `enable_when_not_full` is `false`.
    pub fn can_load_more<T: ScrollTree<Node = N> + ?Sized>(
        &self,
        tree: &T,
        enable_when_not_full: bool,
    ) -> bool {
        let fills = self.content_fills_viewport(tree);
        if !fills && !enable_when_not_full {
            return false;
        }
        match self.pointer {
            Some(p) => can_start_load_more(tree, self.content, Some(p), fills),
            None => can_start_load_more(tree, self.scrollable, None, fills),
        }
    }

    /// Whether the scrollable view has more content than fits, in either
    /// direction.
    pub fn content_fills_viewport<T: ScrollTree<Node = N> + ?Sized>(&self, tree: &T) -> bool {
        tree.can_scroll_vertically(self.scrollable, ScrollDirection::Up)
            || tree.can_scroll_vertically(self.scrollable, ScrollDirection::Down)
    }

    /// Move the content by `offset`.
    ///
    /// Pinned elements found inside the content are counter-translated so
    /// they stay put on screen while their edge is pulled out: the top
    /// element is held while the content moves down (`max(-offset, 0)`) and
    /// follows it when the content moves up; the bottom element mirrors that
    /// (`min(-offset, 0)`).
    pub fn translate_by<T: ScrollTreeMut<Node = N> + ?Sized>(
        &self,
        tree: &mut T,
        offset: f64,
        fixed_header: Option<ElementId>,
        fixed_footer: Option<ElementId>,
    ) {
        tree.set_translation_y(self.content, offset);
        if let Some(node) = fixed_header.and_then(|id| tree.find_element(self.content, id)) {
            tree.set_translation_y(node, (-offset).max(0.0));
        }
        if let Some(node) = fixed_footer.and_then(|id| tree.find_element(self.content, id)) {
            tree.set_translation_y(node, (-offset).min(0.0));
        }
    }

    /// Builds a handler that scrolls the content along with a finishing
    /// rebound from `offset`, if the scrollable view still has room to
    /// scroll in the collapsing direction.
    pub fn compensate_scroll_on_finish<T: ScrollTree<Node = N> + ?Sized>(
        &self,
        tree: &T,
        offset: f64,
    ) -> Option<ScrollCompensator<N>> {
        let direction = if offset < 0.0 {
            ScrollDirection::Down
        } else if offset > 0.0 {
            ScrollDirection::Up
        } else {
            return None;
        };
        tree.can_scroll_vertically(self.scrollable, direction)
            .then_some(ScrollCompensator {
                node: self.scrollable,
                last: offset,
            })
    }
}

/// Scrolls a view in lock-step with a rebound animation.
///
/// As the spinner moves from `last` to a new value, the view's content is
/// scrolled by the same amount so the visible content stays put.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollCompensator<N> {
    node: N,
    last: f64,
}

impl<N: Copy> ScrollCompensator<N> {
    /// The view being scrolled.
    pub fn node(&self) -> N {
        self.node
    }

    /// Advance to spinner `value`.
    pub fn on_tick<T: ScrollTreeMut<Node = N> + ?Sized>(&mut self, tree: &mut T, value: f64) {
        let dy = value - self.last;
        if dy != 0.0 {
            tree.scroll_content_by(self.node, dy);
        }
        self.last = value;
    }
}
