// Copyright 2025 the Overpull Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public vocabulary shared by scroll trees and the boundary resolver.

bitflags::bitflags! {
    /// Per-node flags consulted by boundary decisions.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u8 {
        /// Node is visible. Invisible nodes never block a gesture and are
        /// skipped by hit testing.
        const VISIBLE    = 0b0000_0001;
        /// Node is pinned to the top edge (a sticky header inside the content).
        ///
        /// Pinned nodes never gate load-more decisions.
        const PIN_TOP    = 0b0000_0010;
        /// Node is pinned to the bottom edge.
        ///
        /// Pinned nodes never gate refresh decisions.
        const PIN_BOTTOM = 0b0000_0100;
        /// Pinned to both edges; the plain "fixed" tag.
        const FIXED      = Self::PIN_TOP.bits() | Self::PIN_BOTTOM.bits();
    }
}

impl Default for NodeFlags {
    fn default() -> Self {
        Self::VISIBLE
    }
}

bitflags::bitflags! {
    /// What kind of scrolling a node takes part in.
    ///
    /// The first four bits mark a node as *scrollable*: it owns a vertical
    /// scroll position. `PAGER` and `NESTED_PARENT` mark containers that host
    /// scrollables and should be treated as content when searching.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ScrollTraits: u8 {
        /// An adapter-backed list.
        const LIST          = 0b0000_0001;
        /// A plain vertical scroll view.
        const SCROLL_VIEW   = 0b0000_0010;
        /// Web content.
        const WEB           = 0b0000_0100;
        /// Participates as a child in nested scrolling.
        const NESTED_CHILD  = 0b0000_1000;
        /// Horizontal paging container.
        const PAGER         = 0b0001_0000;
        /// Coordinates nested scrolling of its children (collapsing layouts).
        const NESTED_PARENT = 0b0010_0000;
    }
}

impl ScrollTraits {
    const SCROLLABLE: Self = Self::LIST
        .union(Self::SCROLL_VIEW)
        .union(Self::WEB)
        .union(Self::NESTED_CHILD);

    /// Returns `true` if the node owns a vertical scroll position.
    #[must_use]
    pub const fn is_scrollable(self) -> bool {
        self.intersects(Self::SCROLLABLE)
    }

    /// Returns `true` if the node can serve as the content's scrolling target.
    #[must_use]
    pub const fn is_content(self) -> bool {
        self.is_scrollable() || self.intersects(Self::PAGER.union(Self::NESTED_PARENT))
    }
}

/// Host-assigned identifier for an element inside the content, used to look
/// up pinned sub-elements.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u64);

/// Vertical scroll direction, relative to the content.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScrollDirection {
    /// Toward the top of the content (scroll position decreasing).
    Up,
    /// Toward the bottom of the content (scroll position increasing).
    Down,
}
