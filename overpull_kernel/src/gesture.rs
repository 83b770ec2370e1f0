// Copyright 2025 the Overpull Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer tracking for a single refresh gesture.
//!
//! ## Usage
//!
//! 1) Start a gesture with [`GestureState::start`] at the pointer-down position.
//! 2) On each move, [`GestureState::classify`] reports once the pointer has
//!    travelled past the touch slop, and along which axis.
//! 3) [`GestureState::update`] returns the movement delta since the last move.
//! 4) End the gesture with [`GestureState::end`].
//!
//! ```
//! use kurbo::Point;
//! use overpull_kernel::{Axis, GestureState};
//!
//! let mut gesture = GestureState::default();
//! gesture.start(Point::new(10.0, 20.0));
//! assert!(gesture.is_active());
//!
//! // Within the slop nothing is decided yet.
//! assert_eq!(gesture.classify(Point::new(12.0, 24.0), 8.0), None);
//! // Mostly vertical travel past the slop.
//! assert_eq!(gesture.classify(Point::new(12.0, 40.0), 8.0), Some(Axis::Vertical));
//! ```

use kurbo::{Point, Vec2};
use overpull_state::Role;

/// Axis a gesture was classified along.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    /// Mostly vertical travel.
    Vertical,
    /// Mostly horizontal travel.
    Horizontal,
}

/// What the kernel decided to do with the current gesture.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum GesturePhase {
    /// Travel has not exceeded the slop yet.
    #[default]
    Undecided,
    /// The gesture drives the spinner for `role`.
    ///
    /// The raw (undamped) travel at pointer position `y` is
    /// `raw_at_origin + (y - origin_y)`, signed positive toward the header.
    Vertical {
        /// Edge being pulled.
        role: Role,
        /// Pointer y where raw travel equals `raw_at_origin`.
        origin_y: f64,
        /// Raw travel corresponding to the spinner offset when the drag began.
        raw_at_origin: f64,
    },
    /// Mostly horizontal; left to the content.
    Horizontal,
    /// The boundary resolver denied the pull; left to the content.
    Blocked,
    /// Arrived while the kernel was settling into an opening state, or the
    /// drag was ended by a finish.
    Ignored,
}

/// Tracks pointer positions and the decision for one gesture.
#[derive(Clone, Copy, Debug, Default)]
pub struct GestureState {
    /// Position where the current classification window began.
    pub start_pos: Option<Point>,
    /// Last recorded pointer position.
    pub last_pos: Option<Point>,
    /// Decision for this gesture.
    pub phase: GesturePhase,
}

impl GestureState {
    /// Start tracking a new gesture from `pos`.
    pub fn start(&mut self, pos: Point) {
        self.start_pos = Some(pos);
        self.last_pos = Some(pos);
        self.phase = GesturePhase::Undecided;
    }

    /// Restart classification from `pos` without ending the gesture.
    pub fn rearm(&mut self, pos: Point) {
        if self.is_active() {
            self.start(pos);
        }
    }

    /// Record a new position, returning the delta since the last one.
    pub fn update(&mut self, pos: Point) -> Option<Vec2> {
        self.start_pos?;
        let delta = self.last_pos.map(|last| pos - last);
        self.last_pos = Some(pos);
        delta
    }

    /// Offset of `current_pos` from the start of the classification window.
    #[must_use]
    pub fn total_offset(&self, current_pos: Point) -> Option<Vec2> {
        self.start_pos.map(|start| current_pos - start)
    }

    /// Classifies travel to `pos` once it reaches `slop` along the dominant axis.
    #[must_use]
    pub fn classify(&self, pos: Point, slop: f64) -> Option<Axis> {
        let d = self.total_offset(pos)?;
        let (dx, dy) = (d.x.abs(), d.y.abs());
        if dy >= slop && dx < dy {
            Some(Axis::Vertical)
        } else if dx >= slop && dx > dy {
            Some(Axis::Horizontal)
        } else {
            None
        }
    }

    /// End the gesture and reset state.
    pub fn end(&mut self) {
        *self = Self::default();
    }

    /// Returns `true` between [`start`](Self::start) and [`end`](Self::end).
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.start_pos.is_some()
    }
}
