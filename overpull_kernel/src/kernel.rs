// Copyright 2025 the Overpull Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The refresh kernel: state machine, spinner and animation driver.

use core::fmt;

use kurbo::{Point, Size};
use overpull_boundary::{ScrollTree, ScrollTreeMut};
use overpull_state::{DimensionStatus, HeightSlot, RefreshState, Role, SpinnerStyle};
use tracing::{debug, trace};

use crate::component::{ComponentAdapter, ComponentFactories, LayoutHeight, RefreshComponent};
use crate::config::RefreshConfig;
use crate::content::{RefreshContent, ScrollCompensator};
use crate::easing::Easing;
use crate::gesture::{Axis, GesturePhase, GestureState};
use crate::listener::{
    MultiListener, OnLoadMoreListener, OnRefreshListener, OnStateChangedListener,
    OnTwoLevelListener,
};
use crate::proxy::{KernelProxy, KernelRequest};

/// What to do when a spinner animation reaches its target.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Completion {
    Nothing,
    ResetToNone,
    Open { role: Role, notify: bool },
    OpenTwoLevel,
    AutoRelease { role: Role, notify: bool },
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Scheduled {
    Finish {
        role: Role,
        success: bool,
        no_more_data: bool,
    },
    Rebound(Role),
    Auto {
        role: Role,
        duration_ms: u64,
        drag_rate: f64,
        animation_only: bool,
    },
}

#[derive(Debug)]
struct SpinnerAnimation<N> {
    from: f64,
    to: f64,
    start_ms: u64,
    duration_ms: u64,
    easing: Easing,
    dragging: bool,
    completion: Completion,
    compensator: Option<ScrollCompensator<N>>,
}

#[derive(Debug)]
struct Edge<N> {
    component: Option<ComponentAdapter<N>>,
    height: HeightSlot,
    translates: bool,
}

/// Coordinates a header, a footer and a content node through refresh cycles.
///
/// The host forwards pointer events, layout passes and frame ticks; the kernel
/// owns the [`RefreshState`] and the spinner offset, asks the content whether
/// a pull may start, and notifies components and listeners. Time is supplied
/// by the host as milliseconds on every entry point that can observe it.
///
/// The spinner is positive while the header is pulled out and negative while
/// the footer is.
///
/// Callbacks never re-enter the kernel: components and listeners queue
/// requests through a [`KernelProxy`], which are processed in order at the end
/// of the current entry point.
pub struct RefreshKernel<N> {
    config: RefreshConfig,
    state: RefreshState,
    spinner: f64,
    header: Edge<N>,
    footer: Edge<N>,
    content: Option<RefreshContent<N>>,
    viewport: Size,
    gesture: GestureState,
    animation: Option<SpinnerAnimation<N>>,
    scheduled: Vec<(u64, Scheduled)>,
    now_ms: u64,
    no_more_data: bool,
    two_level_duration_ms: u64,
    translation_dirty: bool,
    laid_out: bool,
    factories: ComponentFactories<N>,
    refresh_listener: Option<Box<dyn OnRefreshListener>>,
    load_more_listener: Option<Box<dyn OnLoadMoreListener>>,
    state_listener: Option<Box<dyn OnStateChangedListener>>,
    two_level_listener: Option<Box<dyn OnTwoLevelListener>>,
    multi_listener: Option<Box<dyn MultiListener>>,
    proxy: KernelProxy,
}

impl<N: fmt::Debug> fmt::Debug for RefreshKernel<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshKernel")
            .field("state", &self.state)
            .field("spinner", &self.spinner)
            .field("header", &self.header)
            .field("footer", &self.footer)
            .field("content", &self.content)
            .field("viewport", &self.viewport)
            .field("gesture", &self.gesture)
            .field("animation", &self.animation)
            .field("scheduled", &self.scheduled)
            .field("now_ms", &self.now_ms)
            .field("no_more_data", &self.no_more_data)
            .finish_non_exhaustive()
    }
}

impl<N: Copy + Eq + fmt::Debug> RefreshKernel<N> {
    /// Create a kernel with `config`.
    pub fn new(config: RefreshConfig) -> Self {
        Self::with_factories(config, ComponentFactories::default())
    }

    /// Create a kernel that builds missing components from `factories` on
    /// the first layout pass.
    pub fn with_factories(config: RefreshConfig, factories: ComponentFactories<N>) -> Self {
        let config = config.sanitized();
        Self {
            state: RefreshState::None,
            spinner: 0.0,
            header: Edge {
                component: None,
                height: HeightSlot::new(config.default_header_height),
                translates: config.header_translates_content,
            },
            footer: Edge {
                component: None,
                height: HeightSlot::new(config.default_footer_height),
                translates: config.footer_translates_content,
            },
            content: None,
            viewport: Size::ZERO,
            gesture: GestureState::default(),
            animation: None,
            scheduled: Vec::new(),
            now_ms: 0,
            no_more_data: false,
            two_level_duration_ms: config.two_level_duration_ms,
            translation_dirty: false,
            laid_out: false,
            factories,
            refresh_listener: None,
            load_more_listener: None,
            state_listener: None,
            two_level_listener: None,
            multi_listener: None,
            proxy: KernelProxy::default(),
            config,
        }
    }

    // --- Accessors ---

    /// Current state.
    pub fn state(&self) -> RefreshState {
        self.state
    }

    /// Current spinner offset.
    pub fn spinner(&self) -> f64 {
        self.spinner
    }

    /// Spinner offset relative to the height of the edge it reveals.
    pub fn percent(&self) -> f64 {
        if self.spinner >= 0.0 {
            ratio(self.spinner, self.height(Role::Header))
        } else {
            ratio(-self.spinner, self.height(Role::Footer))
        }
    }

    /// Offset the content should be drawn at.
    ///
    /// Zero while the revealed component does not translate the content.
    pub fn content_translation(&self) -> f64 {
        if (self.spinner > 0.0 && self.translates(Role::Header))
            || (self.spinner < 0.0 && self.translates(Role::Footer))
        {
            self.spinner
        } else {
            0.0
        }
    }

    /// Configuration in effect (sanitized).
    pub fn config(&self) -> &RefreshConfig {
        &self.config
    }

    /// A handle for queueing requests from outside callbacks.
    pub fn proxy(&self) -> KernelProxy {
        self.proxy.clone()
    }

    /// Current header height.
    pub fn header_height(&self) -> f64 {
        self.height(Role::Header)
    }

    /// Current footer height.
    pub fn footer_height(&self) -> f64 {
        self.height(Role::Footer)
    }

    /// Header pull cap in pixels.
    pub fn header_max_drag(&self) -> f64 {
        self.max_drag(Role::Header)
    }

    /// Footer pull cap in pixels.
    pub fn footer_max_drag(&self) -> f64 {
        self.max_drag(Role::Footer)
    }

    /// The header component, if any.
    pub fn header(&self) -> Option<&ComponentAdapter<N>> {
        self.header.component.as_ref()
    }

    /// The footer component, if any.
    pub fn footer(&self) -> Option<&ComponentAdapter<N>> {
        self.footer.component.as_ref()
    }

    /// The content wrapper, if content was set.
    pub fn content(&self) -> Option<&RefreshContent<N>> {
        self.content.as_ref()
    }

    /// Last layout size.
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Latest time observed, in milliseconds.
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Whether the footer is in no-more-data mode.
    pub fn is_no_more_data(&self) -> bool {
        self.no_more_data
    }

    /// Whether a spinner animation is running.
    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Whether a delayed action is waiting for its time.
    pub fn has_scheduled_work(&self) -> bool {
        !self.scheduled.is_empty()
    }

    // --- Setup ---

    /// Replace the configuration. Content-translation overrides made by
    /// components are reset.
    pub fn set_config(&mut self, config: RefreshConfig) {
        self.config = config.sanitized();
        self.header.translates = self.config.header_translates_content;
        self.footer.translates = self.config.footer_translates_content;
        self.two_level_duration_ms = self.config.two_level_duration_ms;
    }

    /// Install the header. Its height is (re)delivered on the next layout pass.
    pub fn set_header(&mut self, header: ComponentAdapter<N>) {
        self.set_component(Role::Header, header);
    }

    /// Install the footer. Its height is (re)delivered on the next layout pass.
    pub fn set_footer(&mut self, footer: ComponentAdapter<N>) {
        self.set_component(Role::Footer, footer);
    }

    fn set_component(&mut self, role: Role, mut component: ComponentAdapter<N>) {
        if role == Role::Footer && self.no_more_data {
            component.set_no_more_data(true);
        }
        let edge = self.edge_mut(role);
        if let LayoutHeight::Exact(px) = component.layout_height() {
            edge.height.offer(px, DimensionStatus::XML_EXACT_UN_NOTIFY);
        }
        edge.height.invalidate();
        edge.component = Some(component);
    }

    /// Wrap `node` as the content and resolve its scrollable descendant.
    pub fn set_content<T: ScrollTree<Node = N> + ?Sized>(&mut self, tree: &T, node: N) {
        self.content = Some(RefreshContent::new(tree, node));
        self.translation_dirty = true;
    }

    /// Re-resolve the scrollable view after the content subtree changed.
    pub fn refresh_content<T: ScrollTree<Node = N> + ?Sized>(&mut self, tree: &T) {
        if let Some(content) = self.content.as_mut() {
            content.resolve_scrollable(tree);
        }
    }

    /// Set the refresh listener.
    pub fn set_on_refresh_listener(&mut self, listener: impl OnRefreshListener + 'static) {
        self.refresh_listener = Some(Box::new(listener));
    }

    /// Set the load-more listener.
    pub fn set_on_load_more_listener(&mut self, listener: impl OnLoadMoreListener + 'static) {
        self.load_more_listener = Some(Box::new(listener));
    }

    /// Set the state-change listener.
    pub fn set_on_state_changed_listener(
        &mut self,
        listener: impl OnStateChangedListener + 'static,
    ) {
        self.state_listener = Some(Box::new(listener));
    }

    /// Set the two-level listener.
    pub fn set_on_two_level_listener(&mut self, listener: impl OnTwoLevelListener + 'static) {
        self.two_level_listener = Some(Box::new(listener));
    }

    /// Set a listener receiving every callback. It is called in addition to
    /// the single-purpose listeners.
    pub fn set_multi_listener(&mut self, listener: impl MultiListener + 'static) {
        self.multi_listener = Some(Box::new(listener));
    }

    /// Forward theme colors to both components.
    pub fn set_primary_colors(&mut self, colors: &[u32]) {
        for edge in [&mut self.header, &mut self.footer] {
            if let Some(c) = edge.component.as_mut() {
                c.set_primary_colors(colors);
            }
        }
    }

    // --- Measurement ---

    /// Offer a header height learned from the source `status`.
    pub fn offer_header_height(&mut self, px: f64, status: DimensionStatus) -> bool {
        self.header.height.offer(px, status)
    }

    /// Offer a footer height learned from the source `status`.
    pub fn offer_footer_height(&mut self, px: f64, status: DimensionStatus) -> bool {
        self.footer.height.offer(px, status)
    }

    /// Set the header height from code; only dead-locked heights override it.
    pub fn set_header_height(&mut self, px: f64) -> bool {
        self.offer_header_height(px, DimensionStatus::CODE_EXACT)
    }

    /// Set the footer height from code; only dead-locked heights override it.
    pub fn set_footer_height(&mut self, px: f64) -> bool {
        self.offer_footer_height(px, DimensionStatus::CODE_EXACT)
    }

    /// Layout pass with the container size.
    ///
    /// Pending requests are processed first, so a remeasure request is
    /// answered by this pass. The first pass builds missing components from the factories. Every
    /// pass delivers heights that have not been delivered yet.
    pub fn on_layout(&mut self, width: f64, height: f64) {
        self.flush();
        self.viewport = Size::new(width.max(0.0), height.max(0.0));
        if !self.laid_out {
            self.laid_out = true;
            self.build_missing_components();
        }
        self.deliver_height(Role::Header);
        self.deliver_height(Role::Footer);
        self.flush();
    }

    fn build_missing_components(&mut self) {
        if self.header.component.is_none() && self.config.enable_refresh {
            if let Some(build) = &self.factories.header {
                let header = build();
                self.set_header(header);
            }
        }
        if self.footer.component.is_none() && self.config.enable_load_more {
            if let Some(build) = &self.factories.footer {
                let footer = build();
                self.set_footer(footer);
            }
        }
    }

    fn deliver_height(&mut self, role: Role) {
        let max = self.max_drag(role);
        let proxy = &self.proxy;
        let edge = match role {
            Role::Header => &mut self.header,
            Role::Footer => &mut self.footer,
        };
        if let Some(height) = edge.height.take_notification() {
            debug!(?role, height, "height delivered");
            if let Some(c) = edge.component.as_mut() {
                c.on_initialized(proxy, height, max);
            }
        }
    }

    // --- Gestures ---

    /// Pointer went down at `pos`, in the container's space.
    pub fn on_gesture_down<T: ScrollTree<Node = N> + ?Sized>(
        &mut self,
        tree: &T,
        pos: Point,
        now_ms: u64,
    ) {
        self.observe(now_ms);
        self.gesture.start(pos);
        match self.state {
            RefreshState::RefreshReleased
            | RefreshState::LoadReleased
            | RefreshState::TwoLevelReleased => {
                debug!(state = ?self.state, "gesture ignored while settling into an opening state");
                self.gesture.phase = GesturePhase::Ignored;
                return;
            }
            s if s.is_finishing() => {
                debug!(state = ?s, spinner = self.spinner, "finish interrupted by gesture");
                self.animation = None;
                self.scheduled
                    .retain(|(_, action)| !matches!(action, Scheduled::Rebound(_)));
                self.set_state(RefreshState::None);
            }
            RefreshState::PullDownCanceled | RefreshState::PullUpCanceled => {
                self.animation = None;
                if let Some(role) = self.state.role() {
                    self.set_state(RefreshState::pulling(role));
                }
            }
            _ => {
                if self.animation.take().is_some() {
                    debug!(spinner = self.spinner, "animation interrupted by gesture");
                }
            }
        }
        self.start_content_gesture(tree, pos);
        self.flush();
    }

    /// Pointer moved to `pos`, in the container's space.
    pub fn on_gesture_move<T: ScrollTreeMut<Node = N> + ?Sized>(
        &mut self,
        tree: &mut T,
        pos: Point,
        now_ms: u64,
    ) {
        self.observe(now_ms);
        if !self.gesture.is_active() {
            return;
        }
        self.gesture.update(pos);
        if self.gesture.phase == GesturePhase::Undecided {
            self.classify(&*tree, pos);
        }
        if matches!(self.gesture.phase, GesturePhase::Vertical { .. }) {
            self.drag_to(&mut *tree, pos);
        }
        self.apply_translation(&mut *tree);
        self.flush();
        self.apply_translation(tree);
    }

    /// Pointer went up (or the gesture was cancelled).
    pub fn on_gesture_up(&mut self, now_ms: u64) {
        self.observe(now_ms);
        if !self.gesture.is_active() {
            debug!("gesture end without a matching start ignored");
            return;
        }
        let phase = self.gesture.phase;
        self.gesture.end();
        if let Some(content) = self.content.as_mut() {
            content.end_gesture();
        }
        if phase == GesturePhase::Ignored {
            return;
        }
        let engaged = matches!(phase, GesturePhase::Vertical { .. })
            || self.spinner != 0.0
            || self.state.is_dragging();
        if engaged {
            self.release();
        }
        self.flush();
    }

    fn start_content_gesture<T: ScrollTree<Node = N> + ?Sized>(&mut self, tree: &T, pos: Point) {
        if let Some(content) = self.content.as_mut() {
            let local = tree.local_transform(content.content()).inverse() * pos;
            content.apply_gesture_start(tree, local);
        }
    }

    fn classify<T: ScrollTree<Node = N> + ?Sized>(&mut self, tree: &T, pos: Point) {
        let slop = self.config.touch_slop;
        let (Some(axis), Some(start)) = (self.gesture.classify(pos, slop), self.gesture.start_pos)
        else {
            return;
        };
        if axis == Axis::Horizontal {
            self.gesture.phase = GesturePhase::Horizontal;
            return;
        }
        let dy = pos.y - start.y;
        let role = if self.spinner > 0.0 {
            Some(Role::Header)
        } else if self.spinner < 0.0 {
            Some(Role::Footer)
        } else if dy > 0.0 {
            (self.config.enable_refresh && self.content.as_ref().is_none_or(|c| c.can_refresh(tree)))
                .then_some(Role::Header)
        } else {
            let when_not_full = self.config.enable_load_more_when_content_not_full;
            (self.config.enable_load_more
                && self
                    .content
                    .as_ref()
                    .is_none_or(|c| c.can_load_more(tree, when_not_full)))
            .then_some(Role::Footer)
        };
        let role = role.filter(|r| !self.state.is_opening() || self.state.role() == Some(*r));
        match role {
            Some(role) => {
                self.gesture.phase = GesturePhase::Vertical {
                    role,
                    origin_y: start.y + slop * dy.signum(),
                    raw_at_origin: self.undamp(role, self.spinner),
                };
            }
            None => {
                debug!(dy, state = ?self.state, "pull denied at the scroll boundary");
                self.gesture.phase = GesturePhase::Blocked;
            }
        }
    }

    fn drag_to<T: ScrollTreeMut<Node = N> + ?Sized>(&mut self, tree: &mut T, pos: Point) {
        let GesturePhase::Vertical {
            role,
            origin_y,
            raw_at_origin,
        } = self.gesture.phase
        else {
            return;
        };
        let raw = raw_at_origin + (pos.y - origin_y);
        let past_rest = match role {
            Role::Header => raw < 0.0,
            Role::Footer => raw > 0.0,
        };
        if matches!(
            self.state,
            RefreshState::RefreshReleased | RefreshState::LoadReleased | RefreshState::TwoLevelReleased
        ) {
            debug!(state = ?self.state, "drag ignored while settling into an opening state");
            self.gesture.phase = GesturePhase::Ignored;
            return;
        }
        // The finger owns the spinner; a programmatic pull started under it
        // stops here.
        self.animation = None;
        if past_rest && !self.state.is_opening() {
            // Pushed back through the resting position: end this pull and let
            // the next movement be classified afresh.
            if self.state.is_dragging() {
                let pulled = self.state.role().unwrap_or(role);
                self.set_state(RefreshState::canceled(pulled));
                self.move_spinner(0.0, false);
                self.set_state(RefreshState::None);
            } else {
                self.move_spinner(0.0, false);
            }
            self.gesture.rearm(pos);
            self.start_content_gesture(&*tree, pos);
            return;
        }
        let spinner = self.damp(role, raw);
        self.move_spinner(spinner, true);
        self.forward_horizontal(pos.x);
    }

    fn forward_horizontal(&mut self, x: f64) {
        let width = self.viewport.width;
        let role = if self.spinner > 0.0 {
            Role::Header
        } else if self.spinner < 0.0 {
            Role::Footer
        } else {
            return;
        };
        if let Some(c) = self.edge_mut(role).component.as_mut()
            && c.is_support_horizontal_drag()
        {
            c.on_horizontal_drag(ratio(x, width), x, width);
        }
    }

    fn release(&mut self) {
        let h = self.height(Role::Header);
        let fh = self.height(Role::Footer);
        let rebound = self.config.rebound_duration_ms;
        match self.state {
            RefreshState::TwoLevel => {
                let floor = self.two_level_height();
                if self.spinner > floor / 2.0 {
                    self.animate(floor, Easing::Decelerate, self.two_level_duration_ms, false, Completion::Nothing);
                } else {
                    self.finish_two_level_now();
                }
            }
            RefreshState::Refreshing => {
                if self.spinner > h {
                    self.animate(h, Easing::ViscousFluid, rebound, false, Completion::Nothing);
                } else if self.spinner < 0.0 {
                    self.animate(0.0, Easing::ViscousFluid, rebound, false, Completion::Nothing);
                }
            }
            RefreshState::Loading => {
                if self.spinner < -fh {
                    self.animate(-fh, Easing::ViscousFluid, rebound, false, Completion::Nothing);
                } else if self.spinner > 0.0 {
                    self.animate(0.0, Easing::ViscousFluid, rebound, false, Completion::Nothing);
                }
            }
            RefreshState::PullDownToRefresh | RefreshState::PullUpToLoad => {
                if let Some(role) = self.state.role() {
                    self.set_state(RefreshState::canceled(role));
                }
                self.animate(0.0, Easing::Decelerate, rebound, false, Completion::ResetToNone);
            }
            RefreshState::ReleaseToRefresh => self.open(Role::Header, true),
            RefreshState::ReleaseToLoad => self.open(Role::Footer, true),
            RefreshState::ReleaseToTwoLevel => self.release_two_level(true),
            _ if self.spinner != 0.0 => {
                self.animate(0.0, Easing::ViscousFluid, rebound, false, Completion::ResetToNone);
            }
            _ => {}
        }
    }

    // --- Spinner ---

    fn damp(&self, role: Role, raw: f64) -> f64 {
        let c = &self.config;
        let span = self.viewport.height;
        let h = self.height(role);
        let max = self.max_drag(role);
        let travel = match role {
            Role::Header => raw.max(0.0),
            Role::Footer => (-raw).max(0.0),
        };
        let opening_here = self.state.is_opening() && self.state.role() == Some(role);
        let offset = if self.state == RefreshState::TwoLevel {
            travel.min(self.two_level_height())
        } else if opening_here {
            if travel <= h {
                travel.min(max)
            } else {
                h + c.damping.apply(travel - h, (max - h).max(0.0), c.drag_rate, span)
            }
        } else {
            c.damping.apply(travel, max, c.drag_rate, span)
        };
        match role {
            Role::Header => offset,
            Role::Footer => -offset,
        }
    }

    fn undamp(&self, role: Role, spinner: f64) -> f64 {
        let c = &self.config;
        let span = self.viewport.height;
        let h = self.height(role);
        let max = self.max_drag(role);
        let offset = match role {
            Role::Header => spinner.max(0.0),
            Role::Footer => (-spinner).max(0.0),
        };
        let opening_here = self.state.is_opening() && self.state.role() == Some(role);
        let travel = if self.state == RefreshState::TwoLevel {
            offset
        } else if opening_here {
            if offset <= h {
                offset
            } else {
                h + c.damping.invert(offset - h, (max - h).max(0.0), c.drag_rate, span)
            }
        } else {
            c.damping.invert(offset, max, c.drag_rate, span)
        };
        match role {
            Role::Header => travel,
            Role::Footer => -travel,
        }
    }

    /// State a drag to `spinner` should be in, or `None` at rest.
    fn drag_state_for(&self, spinner: f64) -> Option<RefreshState> {
        let c = &self.config;
        if spinner > 0.0 {
            let h = self.height(Role::Header);
            Some(if c.enable_two_level && spinner >= h * c.two_level_floor_rate {
                RefreshState::ReleaseToTwoLevel
            } else if spinner >= h * c.header_trigger_rate {
                RefreshState::ReleaseToRefresh
            } else {
                RefreshState::PullDownToRefresh
            })
        } else if spinner < 0.0 {
            let fh = self.height(Role::Footer);
            Some(if !self.no_more_data && -spinner >= fh * c.footer_trigger_rate {
                RefreshState::ReleaseToLoad
            } else {
                RefreshState::PullUpToLoad
            })
        } else {
            None
        }
    }

    /// Move the spinner. With `dragging`, drag states follow the offset.
    ///
    /// State changes are delivered before the motion they cause.
    fn move_spinner(&mut self, spinner: f64, dragging: bool) {
        if dragging
            && (self.state == RefreshState::None || self.state.is_dragging())
            && let Some(next) = self.drag_state_for(spinner)
        {
            self.set_state(next);
        }
        let old = self.spinner;
        if old == spinner {
            return;
        }
        self.spinner = spinner;
        self.translation_dirty = true;
        trace!(spinner, dragging, "spinner moved");

        if spinner > 0.0 || old > 0.0 {
            let (h, max) = (self.height(Role::Header), self.max_drag(Role::Header));
            let offset = spinner.max(0.0);
            let percent = ratio(offset, h);
            if let Some(c) = self.header.component.as_mut() {
                c.on_moving(dragging, percent, offset, h, max);
            }
            if let Some(m) = self.multi_listener.as_mut() {
                m.on_header_moving(dragging, percent, offset, h, max);
            }
        }
        if spinner < 0.0 || old < 0.0 {
            let (h, max) = (self.height(Role::Footer), self.max_drag(Role::Footer));
            let offset = (-spinner).max(0.0);
            let percent = ratio(offset, h);
            if let Some(c) = self.footer.component.as_mut() {
                c.on_moving(dragging, percent, offset, h, max);
            }
            if let Some(m) = self.multi_listener.as_mut() {
                m.on_footer_moving(dragging, percent, offset, h, max);
            }
        }
    }

    fn set_state(&mut self, new: RefreshState) {
        let old = self.state;
        if old == new {
            return;
        }
        self.state = new;
        debug!(?old, ?new, "refresh state changed");
        if old.is_header() || new.is_header() {
            if let Some(c) = self.header.component.as_mut() {
                c.on_state_changed(old, new);
            }
        }
        if old.is_footer() || new.is_footer() {
            if let Some(c) = self.footer.component.as_mut() {
                c.on_state_changed(old, new);
            }
        }
        if let Some(l) = self.state_listener.as_mut() {
            l.on_state_changed(old, new);
        }
        if let Some(m) = self.multi_listener.as_mut() {
            m.on_state_changed(old, new);
        }
    }

    fn apply_translation<T: ScrollTreeMut<Node = N> + ?Sized>(&mut self, tree: &mut T) {
        if !self.translation_dirty {
            return;
        }
        self.translation_dirty = false;
        let offset = self.content_translation();
        if let Some(content) = &self.content {
            content.translate_by(
                tree,
                offset,
                self.config.fixed_header_element,
                self.config.fixed_footer_element,
            );
        }
    }

    // --- Animation and scheduling ---

    fn animate(
        &mut self,
        to: f64,
        easing: Easing,
        duration_ms: u64,
        dragging: bool,
        completion: Completion,
    ) {
        self.animation = None;
        if self.spinner == to || duration_ms == 0 {
            self.move_spinner(to, dragging);
            self.complete(completion);
            return;
        }
        trace!(from = self.spinner, to, duration_ms, "animation started");
        self.animation = Some(SpinnerAnimation {
            from: self.spinner,
            to,
            start_ms: self.now_ms,
            duration_ms,
            easing,
            dragging,
            completion,
            compensator: None,
        });
    }

    fn step_animation<T: ScrollTreeMut<Node = N> + ?Sized>(&mut self, tree: &mut T) {
        let Some(anim) = self.animation.as_mut() else {
            return;
        };
        let elapsed = self.now_ms.saturating_sub(anim.start_ms);
        let t = if anim.duration_ms == 0 {
            1.0
        } else {
            elapsed as f64 / anim.duration_ms as f64
        };
        let done = t >= 1.0;
        let value = if done {
            anim.to
        } else {
            anim.from + (anim.to - anim.from) * anim.easing.at(t)
        };
        let dragging = anim.dragging;
        let mut compensator = anim.compensator.take();
        self.move_spinner(value, dragging);
        if let Some(comp) = compensator.as_mut() {
            comp.on_tick(tree, value);
        }
        if done {
            if let Some(anim) = self.animation.take() {
                self.complete(anim.completion);
            }
        } else if let Some(anim) = self.animation.as_mut() {
            anim.compensator = compensator;
        }
    }

    fn complete(&mut self, completion: Completion) {
        match completion {
            Completion::Nothing => {}
            Completion::ResetToNone => {
                if !self.state.is_opening() && !self.state.is_dragging() {
                    self.set_state(RefreshState::None);
                }
            }
            Completion::Open { role, notify } => self.enter_opened(role, notify),
            Completion::OpenTwoLevel => self.set_state(RefreshState::TwoLevel),
            Completion::AutoRelease { role, notify } => {
                let ready = RefreshState::release_to_open(role);
                if self.state != ready {
                    self.set_state(ready);
                }
                self.open(role, notify);
            }
        }
    }

    fn schedule(&mut self, delay_ms: u64, action: Scheduled) {
        self.scheduled.push((self.now_ms.saturating_add(delay_ms), action));
    }

    fn run_due<T: ScrollTreeMut<Node = N> + ?Sized>(&mut self, tree: &mut T) {
        loop {
            let next = self
                .scheduled
                .iter()
                .enumerate()
                .filter(|(_, (due, _))| *due <= self.now_ms)
                .min_by_key(|(_, (due, _))| *due)
                .map(|(i, _)| i);
            let Some(index) = next else {
                break;
            };
            let (_, action) = self.scheduled.remove(index);
            match action {
                Scheduled::Finish {
                    role,
                    success,
                    no_more_data,
                } => self.fire_finish(role, success, no_more_data),
                Scheduled::Rebound(role) => self.rebound_after_finish(&*tree, role),
                Scheduled::Auto {
                    role,
                    duration_ms,
                    drag_rate,
                    animation_only,
                } => self.start_auto(role, duration_ms, drag_rate, animation_only),
            }
        }
    }

    /// Advance animations and delayed work to `now_ms`.
    ///
    /// Returns `true` while more ticks are needed.
    pub fn tick<T: ScrollTreeMut<Node = N> + ?Sized>(&mut self, tree: &mut T, now_ms: u64) -> bool {
        self.observe(now_ms);
        self.step_animation(&mut *tree);
        self.run_due(&mut *tree);
        self.apply_translation(&mut *tree);
        self.flush();
        self.apply_translation(tree);
        self.animation.is_some() || !self.scheduled.is_empty()
    }

    fn observe(&mut self, now_ms: u64) {
        self.now_ms = self.now_ms.max(now_ms);
    }

    // --- Opening ---

    fn open(&mut self, role: Role, notify: bool) {
        self.set_state(RefreshState::released(role));
        let (h, max) = (self.height(role), self.max_drag(role));
        if let Some(c) = self.edge_mut(role).component.as_mut() {
            c.on_released(h, max);
        }
        if let Some(m) = self.multi_listener.as_mut() {
            match role {
                Role::Header => m.on_header_released(h, max),
                Role::Footer => m.on_footer_released(h, max),
            }
        }
        let target = match role {
            Role::Header => h,
            Role::Footer => -h,
        };
        let rebound = self.config.rebound_duration_ms;
        self.animate(target, Easing::ViscousFluid, rebound, false, Completion::Open { role, notify });
    }

    fn enter_opened(&mut self, role: Role, notify: bool) {
        self.set_state(RefreshState::opened(role));
        let (h, max) = (self.height(role), self.max_drag(role));
        if let Some(c) = self.edge_mut(role).component.as_mut() {
            c.on_start_animator(h, max);
        }
        if let Some(m) = self.multi_listener.as_mut() {
            match role {
                Role::Header => m.on_header_start_animator(h, max),
                Role::Footer => m.on_footer_start_animator(h, max),
            }
        }
        if !notify {
            return;
        }
        match role {
            Role::Header => {
                if let Some(l) = self.refresh_listener.as_mut() {
                    l.on_refresh(&self.proxy);
                }
                if let Some(m) = self.multi_listener.as_mut() {
                    m.on_refresh(&self.proxy);
                }
            }
            Role::Footer => {
                if let Some(l) = self.load_more_listener.as_mut() {
                    l.on_load_more(&self.proxy);
                }
                if let Some(m) = self.multi_listener.as_mut() {
                    m.on_load_more(&self.proxy);
                }
            }
        }
    }

    fn release_two_level(&mut self, consult: bool) {
        self.set_state(RefreshState::TwoLevelReleased);
        let open = !consult
            || self
                .two_level_listener
                .as_mut()
                .is_none_or(|l| l.on_two_level(&self.proxy));
        if open {
            let floor = self.two_level_height();
            let duration = self.two_level_duration_ms;
            self.animate(floor, Easing::Decelerate, duration, false, Completion::OpenTwoLevel);
        } else {
            debug!("two-level declined, refreshing instead");
            self.open(Role::Header, true);
        }
    }

    fn two_level_height(&self) -> f64 {
        if self.viewport.height > 0.0 {
            self.viewport.height
        } else {
            self.max_drag(Role::Header)
        }
    }

    /// Start a refresh with the default animation.
    ///
    /// Only starts from [`RefreshState::None`] with refresh enabled, and not
    /// while a finger is pulling either edge.
    pub fn auto_refresh(&mut self) -> bool {
        let rate = self.default_auto_rate(Role::Header);
        self.auto_refresh_with(0, self.config.rebound_duration_ms, rate, false)
    }

    /// Start a refresh after `delay_ms`, pulling the header out to
    /// `drag_rate × height` over `duration_ms` and then releasing.
    ///
    /// With `animation_only` the refresh listener is not called. A header
    /// component's [`auto_open`](RefreshComponent::auto_open) is offered the
    /// chance to run the opening itself first.
    pub fn auto_refresh_with(
        &mut self,
        delay_ms: u64,
        duration_ms: u64,
        drag_rate: f64,
        animation_only: bool,
    ) -> bool {
        let started = self.request_auto(Role::Header, delay_ms, duration_ms, drag_rate, animation_only);
        self.flush();
        started
    }

    /// Start a load-more with the default animation.
    ///
    /// Only starts from [`RefreshState::None`] with load-more enabled and the
    /// footer not in no-more-data mode.
    pub fn auto_load_more(&mut self) -> bool {
        let rate = self.default_auto_rate(Role::Footer);
        self.auto_load_more_with(0, self.config.rebound_duration_ms, rate, false)
    }

    /// Footer mirror of [`auto_refresh_with`](Self::auto_refresh_with).
    pub fn auto_load_more_with(
        &mut self,
        delay_ms: u64,
        duration_ms: u64,
        drag_rate: f64,
        animation_only: bool,
    ) -> bool {
        let started = self.request_auto(Role::Footer, delay_ms, duration_ms, drag_rate, animation_only);
        self.flush();
        started
    }

    fn default_auto_rate(&self, role: Role) -> f64 {
        let h = self.height(role);
        let trigger = match role {
            Role::Header => self.config.header_trigger_rate,
            Role::Footer => self.config.footer_trigger_rate,
        };
        (ratio(self.max_drag(role), h) + trigger) / 2.0
    }

    fn edge_enabled(&self, role: Role) -> bool {
        match role {
            Role::Header => self.config.enable_refresh,
            Role::Footer => self.config.enable_load_more && !self.no_more_data,
        }
    }

    /// Programmatic opens start from rest, on an enabled edge, and never
    /// under a finger that is already pulling.
    fn can_auto_open(&self, role: Role) -> bool {
        self.state == RefreshState::None
            && self.edge_enabled(role)
            && !matches!(self.gesture.phase, GesturePhase::Vertical { .. })
    }

    fn request_auto(
        &mut self,
        role: Role,
        delay_ms: u64,
        duration_ms: u64,
        drag_rate: f64,
        animation_only: bool,
    ) -> bool {
        if !self.can_auto_open(role) {
            debug!(?role, state = ?self.state, "programmatic open refused");
            return false;
        }
        let drag_rate = if drag_rate.is_finite() && drag_rate > 0.0 {
            drag_rate
        } else {
            self.default_auto_rate(role)
        };
        if delay_ms == 0 {
            self.start_auto(role, duration_ms, drag_rate, animation_only);
        } else {
            self.schedule(
                delay_ms,
                Scheduled::Auto {
                    role,
                    duration_ms,
                    drag_rate,
                    animation_only,
                },
            );
        }
        true
    }

    fn start_auto(&mut self, role: Role, duration_ms: u64, drag_rate: f64, animation_only: bool) {
        if !self.can_auto_open(role) {
            debug!(?role, state = ?self.state, "delayed programmatic open dropped");
            return;
        }
        if self
            .edge_mut(role)
            .component
            .as_mut()
            .is_some_and(|c| c.auto_open(duration_ms, drag_rate, animation_only))
        {
            return;
        }
        self.set_state(RefreshState::pulling(role));
        let offset = (self.height(role) * drag_rate).min(self.max_drag(role));
        let target = match role {
            Role::Header => offset,
            Role::Footer => -offset,
        };
        self.animate(
            target,
            Easing::ViscousFluid,
            duration_ms,
            true,
            Completion::AutoRelease {
                role,
                notify: !animation_only,
            },
        );
    }

    /// Open the second floor programmatically.
    ///
    /// Only from [`RefreshState::None`] with two-level enabled. Unless
    /// `animation_only`, the two-level listener is consulted first.
    pub fn open_two_level(&mut self, animation_only: bool) -> bool {
        if self.state != RefreshState::None || !self.config.enable_two_level {
            debug!(state = ?self.state, "two-level open refused");
            return false;
        }
        self.release_two_level(!animation_only);
        self.flush();
        true
    }

    // --- Finishing ---

    /// Finish the running refresh now.
    pub fn finish_refresh(&mut self, success: bool) {
        self.finish_refresh_with(0, success, false);
    }

    /// Finish the running refresh after `delay_ms`.
    ///
    /// Whether the kernel is refreshing is checked when the delay elapses; if
    /// not, nothing happens. `no_more_data` sets the footer's mode; a refresh
    /// finished without it clears the mode.
    pub fn finish_refresh_with(&mut self, delay_ms: u64, success: bool, no_more_data: bool) {
        self.request_finish(Role::Header, delay_ms, success, no_more_data);
        self.flush();
    }

    /// Finish the running load-more now.
    pub fn finish_load_more(&mut self, success: bool) {
        self.finish_load_more_with(0, success, false);
    }

    /// Finish the running load-more after `delay_ms`.
    ///
    /// With `no_more_data` the footer switches to no-more-data mode.
    pub fn finish_load_more_with(&mut self, delay_ms: u64, success: bool, no_more_data: bool) {
        self.request_finish(Role::Footer, delay_ms, success, no_more_data);
        self.flush();
    }

    /// Close the second floor.
    pub fn finish_two_level(&mut self) {
        self.finish_two_level_now();
        self.flush();
    }

    fn request_finish(&mut self, role: Role, delay_ms: u64, success: bool, no_more_data: bool) {
        if delay_ms == 0 {
            self.fire_finish(role, success, no_more_data);
        } else {
            self.schedule(
                delay_ms,
                Scheduled::Finish {
                    role,
                    success,
                    no_more_data,
                },
            );
        }
    }

    fn fire_finish(&mut self, role: Role, success: bool, no_more_data: bool) {
        if role == Role::Header && self.state == RefreshState::TwoLevel {
            self.finish_two_level_now();
            return;
        }
        if self.state != RefreshState::opened(role) {
            debug!(?role, state = ?self.state, "finish ignored: not opening");
            return;
        }
        let delay = self
            .edge_mut(role)
            .component
            .as_mut()
            .map_or(0, |c| c.on_finish(success));
        if let Some(m) = self.multi_listener.as_mut() {
            match role {
                Role::Header => m.on_header_finish(success),
                Role::Footer => m.on_footer_finish(success),
            }
        }
        self.set_state(RefreshState::finished(role));
        self.end_drag();
        if role == Role::Header || no_more_data {
            self.apply_no_more_data(no_more_data);
        }
        self.schedule(delay, Scheduled::Rebound(role));
    }

    /// Stop the current touch from driving the spinner, whether it is already
    /// pulling or not yet classified. The finish rebound owns the spinner.
    fn end_drag(&mut self) {
        if self.gesture.is_active()
            && matches!(
                self.gesture.phase,
                GesturePhase::Vertical { .. } | GesturePhase::Undecided
            )
        {
            debug!(spinner = self.spinner, "drag ended by finish");
            self.gesture.phase = GesturePhase::Ignored;
        }
    }

    fn rebound_after_finish<T: ScrollTree<Node = N> + ?Sized>(&mut self, tree: &T, role: Role) {
        if self.state != RefreshState::finished(role) {
            return;
        }
        if self.spinner == 0.0 {
            self.set_state(RefreshState::None);
            return;
        }
        let compensator = if role == Role::Footer
            && self.config.enable_scroll_content_when_loaded
            && self.translates(Role::Footer)
        {
            self.content
                .as_ref()
                .and_then(|c| c.compensate_scroll_on_finish(tree, self.spinner))
        } else {
            None
        };
        let rebound = self.config.rebound_duration_ms;
        self.animate(0.0, Easing::ViscousFluid, rebound, false, Completion::ResetToNone);
        if let Some(anim) = self.animation.as_mut() {
            anim.compensator = compensator;
        }
    }

    fn finish_two_level_now(&mut self) {
        if self.state != RefreshState::TwoLevel {
            debug!(state = ?self.state, "two-level finish ignored: not open");
            return;
        }
        self.set_state(RefreshState::TwoLevelFinish);
        self.end_drag();
        let duration = self.two_level_duration_ms;
        self.animate(0.0, Easing::Decelerate, duration, false, Completion::ResetToNone);
    }

    /// Switch the footer in or out of no-more-data mode.
    ///
    /// In no-more-data mode footer drags never reach
    /// [`RefreshState::ReleaseToLoad`] and programmatic loads are refused.
    pub fn set_no_more_data(&mut self, no_more_data: bool) {
        self.apply_no_more_data(no_more_data);
        self.flush();
    }

    fn apply_no_more_data(&mut self, no_more_data: bool) {
        if self.no_more_data == no_more_data {
            return;
        }
        self.no_more_data = no_more_data;
        debug!(no_more_data, "footer mode changed");
        if let Some(c) = self.footer.component.as_mut() {
            c.set_no_more_data(no_more_data);
        }
    }

    // --- Requests and teardown ---

    fn flush(&mut self) {
        while let Some(request) = self.proxy.pop() {
            self.handle(request);
        }
    }

    fn handle(&mut self, request: KernelRequest) {
        trace!(?request, "processing request");
        match request {
            KernelRequest::FinishRefresh {
                delay_ms,
                success,
                no_more_data,
            } => self.request_finish(Role::Header, delay_ms, success, no_more_data),
            KernelRequest::FinishLoadMore {
                delay_ms,
                success,
                no_more_data,
            } => self.request_finish(Role::Footer, delay_ms, success, no_more_data),
            KernelRequest::FinishTwoLevel => self.finish_two_level_now(),
            KernelRequest::OpenTwoLevel { animation_only } => {
                if self.state == RefreshState::None && self.config.enable_two_level {
                    self.release_two_level(!animation_only);
                }
            }
            KernelRequest::AutoRefresh {
                delay_ms,
                duration_ms,
                drag_rate,
                animation_only,
            } => {
                self.request_auto(Role::Header, delay_ms, duration_ms, drag_rate, animation_only);
            }
            KernelRequest::AutoLoadMore {
                delay_ms,
                duration_ms,
                drag_rate,
                animation_only,
            } => {
                self.request_auto(Role::Footer, delay_ms, duration_ms, drag_rate, animation_only);
            }
            KernelRequest::MoveSpinner { offset, dragging } => {
                self.animation = None;
                self.move_spinner(offset, dragging);
            }
            KernelRequest::AnimateSpinner { offset } => {
                let rebound = self.config.rebound_duration_ms;
                self.animate(offset, Easing::ViscousFluid, rebound, false, Completion::Nothing);
            }
            KernelRequest::RequestRemeasure(role) => self.edge_mut(role).height.invalidate(),
            KernelRequest::SetNoMoreData(no_more_data) => self.apply_no_more_data(no_more_data),
            KernelRequest::TranslateContent { role, translate } => {
                self.edge_mut(role).translates = translate;
                self.translation_dirty = true;
            }
            KernelRequest::SetTwoLevelDuration(ms) => self.two_level_duration_ms = ms,
        }
    }

    /// Tear down: cancel animation and delayed work, drop listeners and
    /// pending requests. Requests made through existing proxies afterwards
    /// are dropped.
    pub fn detach(&mut self) {
        debug!(state = ?self.state, spinner = self.spinner, "kernel detached");
        self.animation = None;
        self.scheduled.clear();
        self.gesture.end();
        if let Some(content) = self.content.as_mut() {
            content.end_gesture();
        }
        self.refresh_listener = None;
        self.load_more_listener = None;
        self.state_listener = None;
        self.two_level_listener = None;
        self.multi_listener = None;
        self.proxy.detach();
    }

    // --- Helpers ---

    fn edge(&self, role: Role) -> &Edge<N> {
        match role {
            Role::Header => &self.header,
            Role::Footer => &self.footer,
        }
    }

    fn edge_mut(&mut self, role: Role) -> &mut Edge<N> {
        match role {
            Role::Header => &mut self.header,
            Role::Footer => &mut self.footer,
        }
    }

    fn height(&self, role: Role) -> f64 {
        self.edge(role).height.value()
    }

    /// Pull cap for `role`. Never below the component height, so an opened
    /// edge always sits within it.
    fn max_drag(&self, role: Role) -> f64 {
        let h = self.height(role);
        let cap = match role {
            Role::Header => self.config.header_max_drag.resolve(h),
            Role::Footer => self.config.footer_max_drag.resolve(h),
        };
        cap.max(h)
    }

    fn translates(&self, role: Role) -> bool {
        let edge = self.edge(role);
        edge.translates
            || edge
                .component
                .as_ref()
                .is_none_or(|c| c.spinner_style() == SpinnerStyle::FIXED_BEHIND)
    }
}

fn ratio(value: f64, of: f64) -> f64 {
    if of > 0.0 { value / of } else { 0.0 }
}
