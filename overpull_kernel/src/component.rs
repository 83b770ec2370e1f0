// Copyright 2025 the Overpull Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Header and footer components.
//!
//! A host node becomes a header or footer by being wrapped in a
//! [`ComponentAdapter`]. The adapter optionally holds a [`RefreshComponent`]
//! implementation and forwards every call to it, remapping states when the
//! implementation was written for the opposite edge. Without an
//! implementation it answers with defaults derived from the node's declared
//! layout height.

use core::fmt;

use overpull_state::{RefreshState, Role, SpinnerStyle};

use crate::proxy::KernelProxy;

/// Capabilities a header or footer implementation provides.
///
/// All methods except [`role`](Self::role) have no-op defaults.
#[allow(unused_variables, reason = "default no-op implementations")]
pub trait RefreshComponent {
    /// The edge this implementation was written for.
    fn role(&self) -> Role;

    /// How the component relates visually to the spinner offset.
    fn spinner_style(&self) -> SpinnerStyle {
        SpinnerStyle::TRANSLATE
    }

    /// Called once per authoritative height, on the layout pass after it is
    /// learned. `kernel` may be retained for later requests.
    fn on_initialized(&mut self, kernel: &KernelProxy, height: f64, max_drag: f64) {}

    /// The spinner moved.
    ///
    /// `percent` is `offset / height` and exceeds `1.0` while overscrolled.
    fn on_moving(&mut self, is_dragging: bool, percent: f64, offset: f64, height: f64, max_drag: f64) {}

    /// The pull was released into an opening state.
    fn on_released(&mut self, height: f64, max_drag: f64) {}

    /// The spinner settled and the opening state was entered.
    fn on_start_animator(&mut self, height: f64, max_drag: f64) {}

    /// The kernel moved between two states of this component's edge.
    fn on_state_changed(&mut self, old: RefreshState, new: RefreshState) {}

    /// Work finished. Returns how long to show the finished look before
    /// rebounding, in milliseconds.
    fn on_finish(&mut self, success: bool) -> u64 {
        0
    }

    /// Theme colors, as `0xAARRGGBB`.
    fn set_primary_colors(&mut self, colors: &[u32]) {}

    /// Whether [`on_horizontal_drag`](Self::on_horizontal_drag) should be called.
    fn is_support_horizontal_drag(&self) -> bool {
        false
    }

    /// The finger moved sideways while the component is pulled out.
    ///
    /// `percent_x` is `offset_x / width`.
    fn on_horizontal_drag(&mut self, percent_x: f64, offset_x: f64, width: f64) {}

    /// Offered the chance to run a programmatic open itself. Return `true` to
    /// take it over; the kernel then does nothing further.
    fn auto_open(&mut self, duration_ms: u64, drag_rate: f64, animation_only: bool) -> bool {
        false
    }

    /// Footer switched in or out of no-more-data mode. Returns `true` if the
    /// component supports the mode.
    fn set_no_more_data(&mut self, no_more_data: bool) -> bool {
        false
    }
}

/// Height a host node declared for itself.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum LayoutHeight {
    /// A fixed height in pixels.
    Exact(f64),
    /// Sized by its children.
    #[default]
    WrapContent,
    /// Fills the container.
    MatchParent,
}

/// Wraps a host node as a header or footer.
///
/// Two adapters are equal when they wrap the same node.
pub struct ComponentAdapter<N> {
    node: N,
    role: Role,
    layout_height: LayoutHeight,
    style: Option<SpinnerStyle>,
    inner: Option<Box<dyn RefreshComponent>>,
}

impl<N: fmt::Debug> fmt::Debug for ComponentAdapter<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentAdapter")
            .field("node", &self.node)
            .field("role", &self.role)
            .field("layout_height", &self.layout_height)
            .field("style", &self.style)
            .field("inner", &self.inner.as_ref().map(|c| c.role()))
            .finish()
    }
}

impl<N: PartialEq> PartialEq for ComponentAdapter<N> {
    fn eq(&self, other: &Self) -> bool {
        self.node == other.node
    }
}

impl<N> ComponentAdapter<N> {
    /// Wrap `node` as a plain component for `role`.
    pub fn new(node: N, role: Role, layout_height: LayoutHeight) -> Self {
        Self {
            node,
            role,
            layout_height,
            style: None,
            inner: None,
        }
    }

    /// Wrap `node` as a header.
    pub fn header(node: N, layout_height: LayoutHeight) -> Self {
        Self::new(node, Role::Header, layout_height)
    }

    /// Wrap `node` as a footer.
    pub fn footer(node: N, layout_height: LayoutHeight) -> Self {
        Self::new(node, Role::Footer, layout_height)
    }

    /// Delegate capability calls to `component`.
    #[must_use]
    pub fn with_component(mut self, component: impl RefreshComponent + 'static) -> Self {
        self.inner = Some(Box::new(component));
        self
    }

    /// Override the spinner style.
    #[must_use]
    pub fn with_spinner_style(mut self, style: SpinnerStyle) -> Self {
        self.style = Some(style);
        self
    }

    /// The wrapped host node.
    pub fn node(&self) -> &N {
        &self.node
    }

    /// Declared layout height.
    pub fn layout_height(&self) -> LayoutHeight {
        self.layout_height
    }

    /// Whether a capability implementation is attached.
    pub fn has_component(&self) -> bool {
        self.inner.is_some()
    }

    fn remap(&self, state: RefreshState) -> RefreshState {
        match &self.inner {
            Some(inner) if inner.role() != self.role => state.to_role(inner.role()),
            _ => state,
        }
    }
}

impl<N> RefreshComponent for ComponentAdapter<N> {
    fn role(&self) -> Role {
        self.role
    }

    fn spinner_style(&self) -> SpinnerStyle {
        if let Some(style) = self.style {
            return style;
        }
        if let Some(inner) = &self.inner {
            return inner.spinner_style();
        }
        match self.layout_height {
            LayoutHeight::MatchParent => SpinnerStyle::SCALE,
            LayoutHeight::Exact(h) if h == 0.0 => SpinnerStyle::SCALE,
            _ => SpinnerStyle::TRANSLATE,
        }
    }

    fn on_initialized(&mut self, kernel: &KernelProxy, height: f64, max_drag: f64) {
        if let Some(inner) = &mut self.inner {
            inner.on_initialized(kernel, height, max_drag);
        }
    }

    fn on_moving(&mut self, is_dragging: bool, percent: f64, offset: f64, height: f64, max_drag: f64) {
        if let Some(inner) = &mut self.inner {
            inner.on_moving(is_dragging, percent, offset, height, max_drag);
        }
    }

    fn on_released(&mut self, height: f64, max_drag: f64) {
        if let Some(inner) = &mut self.inner {
            inner.on_released(height, max_drag);
        }
    }

    fn on_start_animator(&mut self, height: f64, max_drag: f64) {
        if let Some(inner) = &mut self.inner {
            inner.on_start_animator(height, max_drag);
        }
    }

    fn on_state_changed(&mut self, old: RefreshState, new: RefreshState) {
        let (old, new) = (self.remap(old), self.remap(new));
        if let Some(inner) = &mut self.inner {
            inner.on_state_changed(old, new);
        }
    }

    fn on_finish(&mut self, success: bool) -> u64 {
        self.inner.as_mut().map_or(0, |inner| inner.on_finish(success))
    }

    fn set_primary_colors(&mut self, colors: &[u32]) {
        if let Some(inner) = &mut self.inner {
            inner.set_primary_colors(colors);
        }
    }

    fn is_support_horizontal_drag(&self) -> bool {
        self.inner
            .as_ref()
            .is_some_and(|inner| inner.is_support_horizontal_drag())
    }

    fn on_horizontal_drag(&mut self, percent_x: f64, offset_x: f64, width: f64) {
        if let Some(inner) = &mut self.inner {
            inner.on_horizontal_drag(percent_x, offset_x, width);
        }
    }

    fn auto_open(&mut self, duration_ms: u64, drag_rate: f64, animation_only: bool) -> bool {
        self.inner
            .as_mut()
            .is_some_and(|inner| inner.auto_open(duration_ms, drag_rate, animation_only))
    }

    fn set_no_more_data(&mut self, no_more_data: bool) -> bool {
        self.inner
            .as_mut()
            .is_some_and(|inner| inner.set_no_more_data(no_more_data))
    }
}

/// Builds a header or footer when the host did not supply one.
pub type ComponentFactory<N> = Box<dyn Fn() -> ComponentAdapter<N>>;

/// Default component factories, consulted on the first layout pass.
pub struct ComponentFactories<N> {
    /// Builds the header when none was set and refresh is enabled.
    pub header: Option<ComponentFactory<N>>,
    /// Builds the footer when none was set and load-more is enabled.
    pub footer: Option<ComponentFactory<N>>,
}

impl<N> Default for ComponentFactories<N> {
    fn default() -> Self {
        Self {
            header: None,
            footer: None,
        }
    }
}

impl<N> fmt::Debug for ComponentFactories<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentFactories")
            .field("header", &self.header.is_some())
            .field("footer", &self.footer.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    struct Recorder {
        role: Role,
        seen: Rc<RefCell<Vec<(RefreshState, RefreshState)>>>,
    }

    impl RefreshComponent for Recorder {
        fn role(&self) -> Role {
            self.role
        }

        fn spinner_style(&self) -> SpinnerStyle {
            SpinnerStyle::FIXED_FRONT
        }

        fn on_state_changed(&mut self, old: RefreshState, new: RefreshState) {
            self.seen.borrow_mut().push((old, new));
        }

        fn on_finish(&mut self, _success: bool) -> u64 {
            250
        }
    }

    #[test]
    fn footer_implementation_under_header_sees_footer_states() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut adapter = ComponentAdapter::header(1_u32, LayoutHeight::WrapContent).with_component(Recorder {
            role: Role::Footer,
            seen: seen.clone(),
        });
        adapter.on_state_changed(RefreshState::PullDownToRefresh, RefreshState::ReleaseToRefresh);
        adapter.on_state_changed(RefreshState::RefreshFinish, RefreshState::None);
        assert_eq!(
            *seen.borrow(),
            [
                (RefreshState::PullUpToLoad, RefreshState::ReleaseToLoad),
                (RefreshState::LoadFinish, RefreshState::None),
            ]
        );
    }

    #[test]
    fn matching_roles_pass_states_through() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut adapter = ComponentAdapter::footer(1_u32, LayoutHeight::WrapContent).with_component(Recorder {
            role: Role::Footer,
            seen: seen.clone(),
        });
        adapter.on_state_changed(RefreshState::None, RefreshState::PullUpToLoad);
        assert_eq!(*seen.borrow(), [(RefreshState::None, RefreshState::PullUpToLoad)]);
    }

    #[test]
    fn spinner_style_precedence() {
        let plain = ComponentAdapter::header(1_u32, LayoutHeight::Exact(80.0));
        assert_eq!(plain.spinner_style(), SpinnerStyle::TRANSLATE);
        let filling = ComponentAdapter::header(1_u32, LayoutHeight::MatchParent);
        assert_eq!(filling.spinner_style(), SpinnerStyle::SCALE);

        let seen = Rc::new(RefCell::new(Vec::new()));
        let wrapped = ComponentAdapter::header(1_u32, LayoutHeight::MatchParent).with_component(Recorder {
            role: Role::Header,
            seen,
        });
        assert_eq!(wrapped.spinner_style(), SpinnerStyle::FIXED_FRONT);
        let forced = wrapped.with_spinner_style(SpinnerStyle::FIXED_BEHIND);
        assert_eq!(forced.spinner_style(), SpinnerStyle::FIXED_BEHIND);
    }

    #[test]
    fn defaults_without_implementation() {
        let mut adapter = ComponentAdapter::footer(3_u32, LayoutHeight::WrapContent);
        assert!(!adapter.has_component());
        assert_eq!(adapter.on_finish(true), 0);
        assert!(!adapter.auto_open(300, 1.5, false));
        assert!(!adapter.set_no_more_data(true));
        assert!(!adapter.is_support_horizontal_drag());
    }

    #[test]
    fn equality_follows_the_node() {
        let a = ComponentAdapter::header(7_u32, LayoutHeight::WrapContent);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let b = ComponentAdapter::header(7_u32, LayoutHeight::Exact(50.0)).with_component(Recorder {
            role: Role::Header,
            seen,
        });
        let c = ComponentAdapter::header(8_u32, LayoutHeight::WrapContent);
        assert_eq!(a, b);
        assert_ne!(a, c);
        let mut b = b;
        assert_eq!(b.on_finish(false), 250);
    }
}
