// Copyright 2025 the Overpull Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Overpull Kernel: the gesture and animation engine of a pull-to-refresh layout.
//!
//! A refresh layout has three parts: a header revealed by pulling down at the
//! top of the content, a footer revealed by pulling up at its bottom, and the
//! content between them. [`RefreshKernel`] owns everything that happens
//! between a finger touching the screen and the spinner returning to rest:
//!
//! - classifying a gesture as a pull once it leaves the touch slop, asking the
//!   content (through [`overpull_boundary`]) whether it is at the right edge;
//! - damping finger travel into a spinner offset and deriving the
//!   [`RefreshState`] from it;
//! - releasing into refreshing/loading, rebounding and finishing, including
//!   programmatic opens and the optional second floor ("two-level");
//! - delivering heights, motion and state changes to [`RefreshComponent`]s
//!   and business listeners.
//!
//! The kernel never touches a clock or a platform: time arrives as
//! milliseconds on each entry point, the visual tree is borrowed through the
//! [`ScrollTree`](overpull_boundary::ScrollTree) traits, and callbacks talk
//! back through a [`KernelProxy`] whose requests are processed after the
//! callback returns.
//!
//! ## Example
//!
//! ```rust
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! use kurbo::{Point, Rect};
//! use overpull_boundary::{LocalNode, NodeTree, ScrollTraits};
//! use overpull_kernel::{KernelProxy, RefreshConfig, RefreshKernel, RefreshState};
//!
//! let mut tree = NodeTree::new();
//! let list = tree
//!     .insert(None, LocalNode {
//!         local_bounds: Rect::new(0.0, 0.0, 360.0, 640.0),
//!         scroll_traits: ScrollTraits::LIST,
//!         content_height: 3000.0,
//!         ..LocalNode::default()
//!     })
//!     .unwrap();
//!
//! let mut kernel = RefreshKernel::new(RefreshConfig::default());
//! kernel.set_content(&tree, list);
//! kernel.set_header_height(100.0);
//! kernel.on_layout(360.0, 640.0);
//!
//! let refreshed = Rc::new(Cell::new(false));
//! let flag = refreshed.clone();
//! kernel.set_on_refresh_listener(move |kernel: &KernelProxy| {
//!     flag.set(true);
//!     kernel.finish_refresh_with(1000, true, false);
//! });
//!
//! // Pull well past the header height and let go.
//! kernel.on_gesture_down(&tree, Point::new(180.0, 50.0), 0);
//! for step in 1..=30_u32 {
//!     let y = 50.0 + 20.0 * f64::from(step);
//!     kernel.on_gesture_move(&mut tree, Point::new(180.0, y), 16 * u64::from(step));
//! }
//! assert_eq!(kernel.state(), RefreshState::ReleaseToRefresh);
//! kernel.on_gesture_up(500);
//!
//! // Drive frames until the spinner has settled at the header height.
//! let mut now = 500;
//! while kernel.state() != RefreshState::Refreshing {
//!     now += 16;
//!     kernel.tick(&mut tree, now);
//! }
//! assert!(refreshed.get());
//! assert_eq!(kernel.spinner(), 100.0);
//!
//! // The listener asked for a delayed finish; run the rest of the cycle.
//! while kernel.tick(&mut tree, now) {
//!     now += 16;
//! }
//! assert_eq!(kernel.state(), RefreshState::None);
//! assert_eq!(kernel.spinner(), 0.0);
//! ```

mod component;
mod config;
mod content;
mod easing;
mod gesture;
mod kernel;
mod listener;
mod proxy;

pub use component::{
    ComponentAdapter, ComponentFactories, ComponentFactory, LayoutHeight, RefreshComponent,
};
pub use config::{Damping, MaxDrag, RefreshConfig};
pub use content::{RefreshContent, ScrollCompensator};
pub use easing::Easing;
pub use gesture::{Axis, GesturePhase, GestureState};
pub use kernel::RefreshKernel;
pub use listener::{
    MultiListener, OnLoadMoreListener, OnRefreshListener, OnStateChangedListener,
    OnTwoLevelListener,
};
pub use proxy::{KernelProxy, KernelRequest};

pub use overpull_state::{DimensionStatus, RefreshState, Role, SpinnerStyle};
