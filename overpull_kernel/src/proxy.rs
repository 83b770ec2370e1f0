// Copyright 2025 the Overpull Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deferred access to the kernel from components and listeners.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use overpull_state::Role;
use tracing::debug;

/// A request queued by a component or listener.
///
/// The kernel processes queued requests in order once the entry point that
/// triggered the callback has finished its own work.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum KernelRequest {
    /// Finish the running refresh.
    FinishRefresh {
        /// Wait before finishing.
        delay_ms: u64,
        /// Whether the work succeeded.
        success: bool,
        /// Whether the footer should switch to no-more-data.
        no_more_data: bool,
    },
    /// Finish the running load-more.
    FinishLoadMore {
        /// Wait before finishing.
        delay_ms: u64,
        /// Whether the work succeeded.
        success: bool,
        /// Whether the footer should switch to no-more-data.
        no_more_data: bool,
    },
    /// Close the second floor.
    FinishTwoLevel,
    /// Open the second floor programmatically.
    OpenTwoLevel {
        /// Open without consulting the two-level listener.
        animation_only: bool,
    },
    /// Start a refresh programmatically.
    AutoRefresh {
        /// Wait before starting.
        delay_ms: u64,
        /// Duration of the pull-out animation.
        duration_ms: u64,
        /// Target offset as a multiple of the header height.
        drag_rate: f64,
        /// Open without firing the refresh listener.
        animation_only: bool,
    },
    /// Start a load-more programmatically.
    AutoLoadMore {
        /// Wait before starting.
        delay_ms: u64,
        /// Duration of the pull-out animation.
        duration_ms: u64,
        /// Target offset as a multiple of the footer height.
        drag_rate: f64,
        /// Open without firing the load-more listener.
        animation_only: bool,
    },
    /// Move the spinner directly, as a drag would when `dragging` is set.
    MoveSpinner {
        /// Signed offset.
        offset: f64,
        /// Apply drag transitions.
        dragging: bool,
    },
    /// Animate the spinner to `offset` with the rebound curve.
    AnimateSpinner {
        /// Signed target offset.
        offset: f64,
    },
    /// Re-deliver the height of `role` on the next layout pass.
    RequestRemeasure(Role),
    /// Switch the footer in or out of no-more-data mode.
    SetNoMoreData(bool),
    /// Override whether the content follows the spinner for `role`.
    TranslateContent {
        /// Edge the override applies to.
        role: Role,
        /// Whether the content follows.
        translate: bool,
    },
    /// Change the two-level open/close duration.
    SetTwoLevelDuration(u64),
}

#[derive(Debug, Default)]
struct Shared {
    queue: RefCell<VecDeque<KernelRequest>>,
    detached: Cell<bool>,
}

/// Cloneable handle for queueing [`KernelRequest`]s.
///
/// Handed to components in `on_initialized` and to listeners on every call.
/// Requests made after the kernel has been detached are dropped.
#[derive(Clone, Debug, Default)]
pub struct KernelProxy {
    shared: Rc<Shared>,
}

impl KernelProxy {
    /// Queue a raw request.
    pub fn request(&self, request: KernelRequest) {
        if self.shared.detached.get() {
            debug!(?request, "request dropped after detach");
            return;
        }
        self.shared.queue.borrow_mut().push_back(request);
    }

    /// Finish the running refresh now.
    pub fn finish_refresh(&self, success: bool) {
        self.finish_refresh_with(0, success, false);
    }

    /// Finish the running refresh after `delay_ms`.
    pub fn finish_refresh_with(&self, delay_ms: u64, success: bool, no_more_data: bool) {
        self.request(KernelRequest::FinishRefresh {
            delay_ms,
            success,
            no_more_data,
        });
    }

    /// Finish the running load-more now.
    pub fn finish_load_more(&self, success: bool) {
        self.finish_load_more_with(0, success, false);
    }

    /// Finish the running load-more after `delay_ms`.
    pub fn finish_load_more_with(&self, delay_ms: u64, success: bool, no_more_data: bool) {
        self.request(KernelRequest::FinishLoadMore {
            delay_ms,
            success,
            no_more_data,
        });
    }

    /// Close the second floor.
    pub fn finish_two_level(&self) {
        self.request(KernelRequest::FinishTwoLevel);
    }

    /// Open the second floor.
    pub fn open_two_level(&self, animation_only: bool) {
        self.request(KernelRequest::OpenTwoLevel { animation_only });
    }

    /// Move the spinner directly.
    pub fn move_spinner(&self, offset: f64, dragging: bool) {
        self.request(KernelRequest::MoveSpinner { offset, dragging });
    }

    /// Animate the spinner to `offset`.
    pub fn animate_spinner(&self, offset: f64) {
        self.request(KernelRequest::AnimateSpinner { offset });
    }

    /// Re-deliver the height of `role` on the next layout pass.
    pub fn request_remeasure(&self, role: Role) {
        self.request(KernelRequest::RequestRemeasure(role));
    }

    /// Switch the footer in or out of no-more-data mode.
    pub fn set_no_more_data(&self, no_more_data: bool) {
        self.request(KernelRequest::SetNoMoreData(no_more_data));
    }

    /// Number of requests waiting to be processed.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.shared.queue.borrow().len()
    }

    /// Returns `true` once the owning kernel has been detached.
    #[must_use]
    pub fn is_detached(&self) -> bool {
        self.shared.detached.get()
    }

    pub(crate) fn pop(&self) -> Option<KernelRequest> {
        self.shared.queue.borrow_mut().pop_front()
    }

    pub(crate) fn detach(&self) {
        self.shared.detached.set(true);
        self.shared.queue.borrow_mut().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requests_are_fifo_across_clones() {
        let proxy = KernelProxy::default();
        let clone = proxy.clone();
        proxy.finish_refresh(true);
        clone.request_remeasure(Role::Footer);
        assert_eq!(proxy.pending(), 2);
        assert_eq!(
            proxy.pop(),
            Some(KernelRequest::FinishRefresh {
                delay_ms: 0,
                success: true,
                no_more_data: false
            })
        );
        assert_eq!(proxy.pop(), Some(KernelRequest::RequestRemeasure(Role::Footer)));
        assert_eq!(proxy.pop(), None);
    }

    #[test]
    fn detached_proxy_drops_requests() {
        let proxy = KernelProxy::default();
        let held = proxy.clone();
        proxy.set_no_more_data(true);
        proxy.detach();
        assert_eq!(held.pending(), 0);
        held.finish_load_more(true);
        assert_eq!(held.pending(), 0);
        assert!(held.is_detached());
    }
}
