// Copyright 2025 the Overpull Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Kernel configuration.

use overpull_boundary::ElementId;

/// Resistance applied to finger travel beyond the resting position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Damping {
    /// Offset follows the finger linearly (scaled by the drag rate) and is
    /// clamped at the maximum drag.
    None,
    /// Offset approaches the maximum drag asymptotically:
    /// `y = min(M * (1 - 100^(-x / H)), x)` where `x` is the rate-scaled
    /// travel and `H` the viewport height.
    #[default]
    Exponential,
}

impl Damping {
    /// Maps non-negative finger travel to a non-negative offset.
    #[must_use]
    pub fn apply(self, travel: f64, max: f64, rate: f64, span: f64) -> f64 {
        let x = (travel * rate).max(0.0);
        match self {
            Self::None => x.min(max.max(0.0)),
            Self::Exponential => {
                let span = if span > 0.0 { span } else { 1.0 };
                (max * (1.0 - 100_f64.powf(-x / span))).min(x).max(0.0)
            }
        }
    }

    /// Inverse of [`apply`](Self::apply): the finger travel that yields
    /// `offset`. Offsets at or beyond the asymptote map to a large but finite
    /// travel.
    #[must_use]
    pub fn invert(self, offset: f64, max: f64, rate: f64, span: f64) -> f64 {
        if rate <= 0.0 || offset <= 0.0 {
            return 0.0;
        }
        let x = match self {
            Self::None => offset,
            Self::Exponential => {
                let span = if span > 0.0 { span } else { 1.0 };
                if max <= 0.0 || max * (1.0 - 100_f64.powf(-offset / span)) >= offset {
                    offset
                } else {
                    let remaining = (1.0 - offset / max).max(1e-9);
                    -span * remaining.ln() / 100_f64.ln()
                }
            }
        };
        x / rate
    }
}

/// Upper bound on how far a header or footer can be pulled out.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MaxDrag {
    /// A multiple of the component height.
    Rate(f64),
    /// An absolute distance in pixels.
    Absolute(f64),
}

impl MaxDrag {
    /// Resolves the cap for a component of `height`.
    #[must_use]
    pub fn resolve(self, height: f64) -> f64 {
        match self {
            Self::Rate(rate) => (rate * height).max(0.0),
            Self::Absolute(px) => px.max(0.0),
        }
    }

    fn sanitized(self, fallback: Self) -> Self {
        match self {
            Self::Rate(r) if r.is_finite() => Self::Rate(r.max(0.0)),
            Self::Absolute(px) if px.is_finite() => Self::Absolute(px.max(0.0)),
            _ => fallback,
        }
    }
}

impl Default for MaxDrag {
    fn default() -> Self {
        Self::Rate(2.5)
    }
}

/// Behavior switches and tuning values for a [`RefreshKernel`].
///
/// Heights and distances are in pixels, durations in milliseconds.
///
/// [`RefreshKernel`]: crate::RefreshKernel
#[derive(Clone, Debug, PartialEq)]
pub struct RefreshConfig {
    /// Whether the header edge may open.
    pub enable_refresh: bool,
    /// Whether the footer edge may open.
    pub enable_load_more: bool,
    /// Whether the header may be pulled into the two-level state.
    pub enable_two_level: bool,
    /// Whether content shorter than its viewport may load more.
    pub enable_load_more_when_content_not_full: bool,
    /// Whether the footer rebound after loading scrolls the content along.
    pub enable_scroll_content_when_loaded: bool,
    /// Whether the content follows the spinner while the header shows.
    pub header_translates_content: bool,
    /// Whether the content follows the spinner while the footer shows.
    pub footer_translates_content: bool,
    /// Finger-to-spinner ratio.
    pub drag_rate: f64,
    /// Resistance curve.
    pub damping: Damping,
    /// Header pull cap. Caps below the header height are raised to it.
    pub header_max_drag: MaxDrag,
    /// Footer pull cap. Caps below the footer height are raised to it.
    pub footer_max_drag: MaxDrag,
    /// Header release threshold, as a fraction of its height.
    pub header_trigger_rate: f64,
    /// Footer release threshold, as a fraction of its height.
    pub footer_trigger_rate: f64,
    /// Two-level threshold, as a multiple of the header height.
    pub two_level_floor_rate: f64,
    /// Fixed duration of the two-level open and close animations.
    pub two_level_duration_ms: u64,
    /// Duration of rebound animations.
    pub rebound_duration_ms: u64,
    /// Finger travel before a gesture is classified.
    pub touch_slop: f64,
    /// Header height used until a measurement arrives.
    pub default_header_height: f64,
    /// Footer height used until a measurement arrives.
    pub default_footer_height: f64,
    /// Element inside the content pinned to the top edge while translating.
    pub fixed_header_element: Option<ElementId>,
    /// Element inside the content pinned to the bottom edge while translating.
    pub fixed_footer_element: Option<ElementId>,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            enable_refresh: true,
            enable_load_more: true,
            enable_two_level: false,
            enable_load_more_when_content_not_full: true,
            enable_scroll_content_when_loaded: true,
            header_translates_content: true,
            footer_translates_content: true,
            drag_rate: 0.5,
            damping: Damping::Exponential,
            header_max_drag: MaxDrag::default(),
            footer_max_drag: MaxDrag::default(),
            header_trigger_rate: 1.0,
            footer_trigger_rate: 1.0,
            two_level_floor_rate: 1.9,
            two_level_duration_ms: 1000,
            rebound_duration_ms: 300,
            touch_slop: 8.0,
            default_header_height: 100.0,
            default_footer_height: 60.0,
            fixed_header_element: None,
            fixed_footer_element: None,
        }
    }
}

impl RefreshConfig {
    /// Returns a copy with invalid values clamped.
    ///
    /// Non-finite numbers fall back to their defaults, negative rates and
    /// distances become zero, and the two-level threshold is raised to at
    /// least the header trigger.
    #[must_use]
    pub fn sanitized(&self) -> Self {
        let d = Self::default();
        let mut out = self.clone();
        out.drag_rate = non_negative(self.drag_rate, d.drag_rate);
        out.header_max_drag = self.header_max_drag.sanitized(d.header_max_drag);
        out.footer_max_drag = self.footer_max_drag.sanitized(d.footer_max_drag);
        out.header_trigger_rate = non_negative(self.header_trigger_rate, d.header_trigger_rate);
        out.footer_trigger_rate = non_negative(self.footer_trigger_rate, d.footer_trigger_rate);
        out.two_level_floor_rate = non_negative(self.two_level_floor_rate, d.two_level_floor_rate)
            .max(out.header_trigger_rate);
        out.touch_slop = non_negative(self.touch_slop, d.touch_slop);
        out.default_header_height = non_negative(self.default_header_height, d.default_header_height);
        out.default_footer_height = non_negative(self.default_footer_height, d.default_footer_height);
        out
    }
}

fn non_negative(value: f64, fallback: f64) -> f64 {
    if value.is_finite() { value.max(0.0) } else { fallback }
}
