// Copyright 2025 the Overpull Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Listener traits for business callers.
//!
//! Each single-purpose trait is implemented for matching closures. Annotate
//! reference arguments so the closure is general over their lifetime:
//!
//! ```
//! use overpull_kernel::{KernelProxy, OnRefreshListener};
//!
//! fn takes(_: impl OnRefreshListener) {}
//! takes(|kernel: &KernelProxy| kernel.finish_refresh(true));
//! ```

use overpull_state::RefreshState;

use crate::proxy::KernelProxy;

/// Called when a refresh opens.
pub trait OnRefreshListener {
    /// Refresh work should start; call a finish method on `kernel` when done.
    fn on_refresh(&mut self, kernel: &KernelProxy);
}

impl<F: FnMut(&KernelProxy)> OnRefreshListener for F {
    fn on_refresh(&mut self, kernel: &KernelProxy) {
        self(kernel);
    }
}

/// Called when a load-more opens.
pub trait OnLoadMoreListener {
    /// Load-more work should start; call a finish method on `kernel` when done.
    fn on_load_more(&mut self, kernel: &KernelProxy);
}

impl<F: FnMut(&KernelProxy)> OnLoadMoreListener for F {
    fn on_load_more(&mut self, kernel: &KernelProxy) {
        self(kernel);
    }
}

/// Called on every state transition.
pub trait OnStateChangedListener {
    /// The kernel moved from `old` to `new`.
    fn on_state_changed(&mut self, old: RefreshState, new: RefreshState);
}

impl<F: FnMut(RefreshState, RefreshState)> OnStateChangedListener for F {
    fn on_state_changed(&mut self, old: RefreshState, new: RefreshState) {
        self(old, new);
    }
}

/// Consulted when the second floor is about to open.
pub trait OnTwoLevelListener {
    /// Return `false` to fall back to a normal refresh.
    fn on_two_level(&mut self, kernel: &KernelProxy) -> bool;
}

impl<F: FnMut(&KernelProxy) -> bool> OnTwoLevelListener for F {
    fn on_two_level(&mut self, kernel: &KernelProxy) -> bool {
        self(kernel)
    }
}

/// One listener for everything, including header and footer motion.
///
/// Only the refresh, load-more and state callbacks are required.
#[allow(unused_variables, reason = "default no-op implementations")]
pub trait MultiListener: OnRefreshListener + OnLoadMoreListener + OnStateChangedListener {
    /// The header moved. See `RefreshComponent::on_moving`.
    fn on_header_moving(
        &mut self,
        is_dragging: bool,
        percent: f64,
        offset: f64,
        height: f64,
        max_drag: f64,
    ) {
    }

    /// The header was released into an opening state.
    fn on_header_released(&mut self, height: f64, max_drag: f64) {}

    /// The header reached its opening state.
    fn on_header_start_animator(&mut self, height: f64, max_drag: f64) {}

    /// The refresh finished.
    fn on_header_finish(&mut self, success: bool) {}

    /// The footer moved.
    fn on_footer_moving(
        &mut self,
        is_dragging: bool,
        percent: f64,
        offset: f64,
        height: f64,
        max_drag: f64,
    ) {
    }

    /// The footer was released into an opening state.
    fn on_footer_released(&mut self, height: f64, max_drag: f64) {}

    /// The footer reached its opening state.
    fn on_footer_start_animator(&mut self, height: f64, max_drag: f64) {}

    /// The load-more finished.
    fn on_footer_finish(&mut self, success: bool) {}
}
