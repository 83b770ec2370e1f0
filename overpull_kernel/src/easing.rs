// Copyright 2025 the Overpull Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Easing curves for spinner animations.
//!
//! Every curve maps normalized time `t ∈ [0, 1]` to progress with `f(0) = 0`
//! and `f(1) = 1` exactly. Inputs outside the range are clamped.

/// Curve used by a spinner animation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Easing {
    /// Damped settle for finger-driven rebounds.
    #[default]
    ViscousFluid,
    /// Quadratic ease-out for cancel rebounds and two-level transitions.
    Decelerate,
    /// Constant speed.
    Linear,
}

impl Easing {
    /// Progress at normalized time `t`.
    #[must_use]
    pub fn at(self, t: f64) -> f64 {
        match self {
            Self::ViscousFluid => viscous_fluid(t),
            Self::Decelerate => decelerate(t),
            Self::Linear => t.clamp(0.0, 1.0),
        }
    }
}

const VISCOUS_SCALE: f64 = 8.0;

fn viscous_raw(x: f64) -> f64 {
    let x = x * VISCOUS_SCALE;
    if x < 1.0 {
        x - (1.0 - (-x).exp())
    } else {
        // exp(-1), the value of the first branch at x = 1.
        let start = core::f64::consts::E.recip();
        start + (1.0 - (1.0 - x).exp()) * (1.0 - start)
    }
}

/// Viscous-fluid curve: a fast start that flattens out like a fluid settling.
#[must_use]
pub fn viscous_fluid(t: f64) -> f64 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }
    let normalize = viscous_raw(1.0).recip();
    (normalize * viscous_raw(t)).min(1.0)
}

/// Quadratic ease-out: `1 - (1 - t)^2`.
#[must_use]
pub fn decelerate(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}
