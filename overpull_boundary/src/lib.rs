// Copyright 2025 the Overpull Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Overpull Boundary: decides whether a pull may start at a scroll edge.
//!
//! A pull-to-refresh gesture may only begin when the content under the finger
//! is already at its top edge (for refresh) or its bottom edge (for load
//! more). Real layouts nest scrollers inside non-scrolling containers, inside
//! transformed or scrolled parents, next to pinned headers, so "the content"
//! is whatever scroller lies under the pointer.
//!
//! This crate answers that question over any visual tree that implements
//! [`ScrollTree`]:
//!
//! - [`can_start_refresh`] and [`can_start_load_more`] walk from the content
//!   node toward the pointer, mapping the point through each child's inverse
//!   transform and the parent's scroll offset.
//! - [`resolve_scrollable_descendant`] finds the scroller a content wrapper
//!   should treat as "the" scrollable view, and
//!   [`find_scrollable_by_point`] re-resolves it per gesture.
//! - [`hit_child`] and [`target_under_point`] are the underlying pure hit tests.
//!
//! [`NodeTree`] is a ready-made retained implementation of the traits.
//!
//! ## Example
//!
//! ```rust
//! use kurbo::{Affine, Point, Rect};
//! use overpull_boundary::{
//!     LocalNode, NodeTree, ScrollTraits, can_start_load_more, can_start_refresh,
//!     resolve_scrollable_descendant,
//! };
//!
//! let mut tree = NodeTree::new();
//! let root = tree
//!     .insert(None, LocalNode {
//!         local_bounds: Rect::new(0.0, 0.0, 320.0, 480.0),
//!         ..LocalNode::default()
//!     })
//!     .unwrap();
//! // A banner above a list that fills the rest of the screen.
//! let _banner = tree
//!     .insert(Some(root), LocalNode {
//!         local_bounds: Rect::new(0.0, 0.0, 320.0, 80.0),
//!         ..LocalNode::default()
//!     })
//!     .unwrap();
//! let list = tree
//!     .insert(Some(root), LocalNode {
//!         local_bounds: Rect::new(0.0, 0.0, 320.0, 400.0),
//!         local_transform: Affine::translate((0.0, 80.0)),
//!         scroll_traits: ScrollTraits::LIST,
//!         content_height: 2000.0,
//!         ..LocalNode::default()
//!     })
//!     .unwrap();
//!
//! assert_eq!(resolve_scrollable_descendant(&tree, root), list);
//!
//! tree.set_scroll_y(list, 120.0);
//! let over_list = Some(Point::new(100.0, 300.0));
//! let over_banner = Some(Point::new(100.0, 40.0));
//! assert!(!can_start_refresh(&tree, root, over_list));
//! assert!(can_start_refresh(&tree, root, over_banner));
//! assert!(!can_start_load_more(&tree, root, over_list, true));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod node_tree;
mod resolve;
mod tree;
mod types;

pub use node_tree::{LocalNode, NodeId, NodeTree, TreeError};
pub use resolve::{
    can_start_load_more, can_start_refresh, find_scrollable_by_point, hit_child,
    resolve_scrollable_descendant, target_under_point,
};
pub use tree::{ScrollTree, ScrollTreeMut};
pub use types::{ElementId, NodeFlags, ScrollDirection, ScrollTraits};
