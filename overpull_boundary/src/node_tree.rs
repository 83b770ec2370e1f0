// Copyright 2025 the Overpull Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A small retained tree implementing [`ScrollTree`] and [`ScrollTreeMut`].
//!
//! Hosts with their own view hierarchy implement the traits directly. This
//! tree is for hosts that only want to describe their layout once per frame,
//! and for tests.

use alloc::vec::Vec;
use core::fmt;

use hashbrown::HashMap;
use kurbo::{Affine, Rect, Vec2};
use smallvec::SmallVec;

use crate::tree::{ScrollTree, ScrollTreeMut};
use crate::types::{ElementId, NodeFlags, ScrollDirection, ScrollTraits};

/// Identifier for a node in a [`NodeTree`].
///
/// A slot index plus a generation. Slots freed by [`NodeTree::remove`] are
/// reused with the next generation, so a stale `NodeId` never names the node
/// that took its slot; it simply stops resolving.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32, u32);

impl NodeId {
    #[inline]
    fn idx(self) -> usize {
        self.0 as usize
    }

    /// Generation of the slot this id was issued for.
    #[must_use]
    pub fn generation(self) -> u32 {
        self.1
    }
}

/// Description of a node as supplied by the host.
#[derive(Clone, Debug, PartialEq)]
pub struct LocalNode {
    /// Bounds in the node's own space.
    pub local_bounds: Rect,
    /// Transform into the parent's content space.
    pub local_transform: Affine,
    /// Visibility and pin flags.
    pub flags: NodeFlags,
    /// Scroll classification.
    pub scroll_traits: ScrollTraits,
    /// Host-assigned element id.
    pub element_id: Option<ElementId>,
    /// Height of the node's scrollable content. Only meaningful for
    /// scrollable nodes; the scroll range is `content_height - height`.
    pub content_height: f64,
}

impl Default for LocalNode {
    fn default() -> Self {
        Self {
            local_bounds: Rect::ZERO,
            local_transform: Affine::IDENTITY,
            flags: NodeFlags::default(),
            scroll_traits: ScrollTraits::empty(),
            element_id: None,
            content_height: 0.0,
        }
    }
}

/// Errors from [`NodeTree::insert`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TreeError {
    /// The parent id does not name a node in this tree.
    UnknownNode(NodeId),
    /// Another node already carries this element id.
    DuplicateElement(ElementId),
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownNode(id) => write!(f, "unknown node {}v{}", id.0, id.1),
            Self::DuplicateElement(id) => write!(f, "duplicate element id {}", id.0),
        }
    }
}

impl core::error::Error for TreeError {}

#[derive(Clone, Debug)]
struct Entry {
    local: LocalNode,
    parent: Option<NodeId>,
    children: SmallVec<[NodeId; 4]>,
    scroll_y: f64,
    translation_y: f64,
}

#[derive(Clone, Debug)]
struct Slot {
    generation: u32,
    entry: Option<Entry>,
}

/// Retained tree of nodes.
#[derive(Clone, Debug, Default)]
pub struct NodeTree {
    slots: Vec<Slot>,
    free: Vec<u32>,
    elements: HashMap<ElementId, NodeId>,
}

impl NodeTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Returns `true` if the tree has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if `id` names a live node.
    #[must_use]
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.entry(id).is_some()
    }

    fn entry(&self, id: NodeId) -> Option<&Entry> {
        self.slots
            .get(id.idx())
            .filter(|slot| slot.generation == id.1)
            .and_then(|slot| slot.entry.as_ref())
    }

    fn entry_mut(&mut self, id: NodeId) -> Option<&mut Entry> {
        self.slots
            .get_mut(id.idx())
            .filter(|slot| slot.generation == id.1)
            .and_then(|slot| slot.entry.as_mut())
    }

    /// Insert a node as the topmost child of `parent` (or as a root).
    pub fn insert(&mut self, parent: Option<NodeId>, local: LocalNode) -> Result<NodeId, TreeError> {
        if let Some(p) = parent
            && !self.is_alive(p)
        {
            return Err(TreeError::UnknownNode(p));
        }
        if let Some(element) = local.element_id
            && self.elements.contains_key(&element)
        {
            return Err(TreeError::DuplicateElement(element));
        }
        let element = local.element_id;
        let entry = Entry {
            local,
            parent,
            children: SmallVec::new(),
            scroll_y: 0.0,
            translation_y: 0.0,
        };
        let id = if let Some(idx) = self.free.pop() {
            let slot = &mut self.slots[idx as usize];
            slot.generation = slot.generation.wrapping_add(1);
            slot.entry = Some(entry);
            NodeId(idx, slot.generation)
        } else {
            #[expect(clippy::cast_possible_truncation, reason = "trees stay far below u32::MAX nodes")]
            let idx = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 1,
                entry: Some(entry),
            });
            NodeId(idx, 1)
        };
        if let Some(element) = element {
            self.elements.insert(element, id);
        }
        if let Some(p) = parent
            && let Some(parent) = self.entry_mut(p)
        {
            parent.children.push(id);
        }
        Ok(id)
    }

    /// Remove `id` and its whole subtree.
    pub fn remove(&mut self, id: NodeId) -> Result<(), TreeError> {
        let parent = self.entry(id).ok_or(TreeError::UnknownNode(id))?.parent;
        if let Some(p) = parent
            && let Some(parent) = self.entry_mut(p)
        {
            parent.children.retain(|child| *child != id);
        }
        let mut pending: SmallVec<[NodeId; 8]> = SmallVec::new();
        pending.push(id);
        while let Some(node) = pending.pop() {
            let Some(entry) = self.slots[node.idx()].entry.take() else {
                continue;
            };
            if let Some(element) = entry.local.element_id {
                self.elements.remove(&element);
            }
            pending.extend(entry.children);
            self.free.push(node.0);
        }
        Ok(())
    }

    /// Parent of `id`, if any.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.entry(id).and_then(|s| s.parent)
    }

    /// Node carrying element id `element`, anywhere in the tree.
    #[must_use]
    pub fn by_element(&self, element: ElementId) -> Option<NodeId> {
        self.elements.get(&element).copied()
    }

    /// Host description of `id`.
    #[must_use]
    pub fn local(&self, id: NodeId) -> Option<&LocalNode> {
        self.entry(id).map(|s| &s.local)
    }

    /// Replace the flags of `id`.
    pub fn set_flags(&mut self, id: NodeId, flags: NodeFlags) {
        if let Some(slot) = self.entry_mut(id) {
            slot.local.flags = flags;
        }
    }

    /// Replace the local bounds of `id`. The scroll position is re-clamped.
    pub fn set_local_bounds(&mut self, id: NodeId, bounds: Rect) {
        if let Some(slot) = self.entry_mut(id) {
            slot.local.local_bounds = bounds;
        }
        self.set_scroll_y(id, self.scroll_y(id));
    }

    /// Replace the local transform of `id`.
    pub fn set_local_transform(&mut self, id: NodeId, transform: Affine) {
        if let Some(slot) = self.entry_mut(id) {
            slot.local.local_transform = transform;
        }
    }

    /// Replace the content height of `id`. The scroll position is re-clamped.
    pub fn set_content_height(&mut self, id: NodeId, height: f64) {
        if let Some(slot) = self.entry_mut(id) {
            slot.local.content_height = height;
        }
        self.set_scroll_y(id, self.scroll_y(id));
    }

    /// Current scroll position of `id`.
    #[must_use]
    pub fn scroll_y(&self, id: NodeId) -> f64 {
        self.entry(id).map_or(0.0, |s| s.scroll_y)
    }

    /// Largest scroll position `id` can reach.
    #[must_use]
    pub fn max_scroll_y(&self, id: NodeId) -> f64 {
        self.entry(id).map_or(0.0, |s| {
            if s.local.scroll_traits.is_scrollable() {
                (s.local.content_height - s.local.local_bounds.height()).max(0.0)
            } else {
                0.0
            }
        })
    }

    /// Set the scroll position of `id`, clamped to its range.
    pub fn set_scroll_y(&mut self, id: NodeId, y: f64) {
        let max = self.max_scroll_y(id);
        if let Some(slot) = self.entry_mut(id) {
            slot.scroll_y = if y.is_finite() { y.clamp(0.0, max) } else { 0.0 };
        }
    }
}

impl ScrollTree for NodeTree {
    type Node = NodeId;

    fn child_count(&self, node: NodeId) -> usize {
        self.entry(node).map_or(0, |s| s.children.len())
    }

    fn child_at(&self, node: NodeId, index: usize) -> Option<NodeId> {
        self.entry(node)
            .and_then(|s| s.children.get(index).copied())
    }

    fn local_bounds(&self, node: NodeId) -> Rect {
        self.entry(node)
            .map_or(Rect::ZERO, |s| s.local.local_bounds)
    }

    fn local_transform(&self, node: NodeId) -> Affine {
        self.entry(node).map_or(Affine::IDENTITY, |s| {
            Affine::translate((0.0, s.translation_y)) * s.local.local_transform
        })
    }

    fn content_offset(&self, node: NodeId) -> Vec2 {
        Vec2::new(0.0, self.scroll_y(node))
    }

    fn flags(&self, node: NodeId) -> NodeFlags {
        self.entry(node)
            .map_or(NodeFlags::empty(), |s| s.local.flags)
    }

    fn scroll_traits(&self, node: NodeId) -> ScrollTraits {
        self.entry(node)
            .map_or(ScrollTraits::empty(), |s| s.local.scroll_traits)
    }

    fn can_scroll_vertically(&self, node: NodeId, direction: ScrollDirection) -> bool {
        let y = self.scroll_y(node);
        match direction {
            ScrollDirection::Up => y > 0.0,
            ScrollDirection::Down => y < self.max_scroll_y(node),
        }
    }

    fn element_id(&self, node: NodeId) -> Option<ElementId> {
        self.entry(node).and_then(|s| s.local.element_id)
    }

    fn translation_y(&self, node: NodeId) -> f64 {
        self.entry(node).map_or(0.0, |s| s.translation_y)
    }
}

impl ScrollTreeMut for NodeTree {
    fn set_translation_y(&mut self, node: NodeId, translation: f64) {
        if let Some(slot) = self.entry_mut(node) {
            slot.translation_y = translation;
        }
    }

    fn scroll_content_by(&mut self, node: NodeId, dy: f64) {
        self.set_scroll_y(node, self.scroll_y(node) + dy);
    }
}
