// Copyright 2025 the Overpull Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// How a header/footer visually relates to the drag offset.
///
/// Only [`front`](Self::front) and [`scale`](Self::scale) drive behavior; the
/// ordinal exists so hosts can persist a style and read it back.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SpinnerStyle {
    ordinal: u8,
    front: bool,
    scale: bool,
}

impl SpinnerStyle {
    /// Moves with the finger; height fixed.
    pub const TRANSLATE: Self = Self::new(0, true, false);
    /// Stretches with the finger.
    pub const SCALE: Self = Self::new(1, true, true);
    /// Stays put behind the content; the content slides over it.
    pub const FIXED_BEHIND: Self = Self::new(2, false, false);
    /// Stays put in front of the content.
    pub const FIXED_FRONT: Self = Self::new(3, true, false);
    /// Fills the available space.
    pub const MATCH_LAYOUT: Self = Self::new(4, true, true);

    /// Every style, by ordinal.
    pub const ALL: [Self; 5] = [
        Self::TRANSLATE,
        Self::SCALE,
        Self::FIXED_BEHIND,
        Self::FIXED_FRONT,
        Self::MATCH_LAYOUT,
    ];

    const fn new(ordinal: u8, front: bool, scale: bool) -> Self {
        Self {
            ordinal,
            front,
            scale,
        }
    }

    /// Persistence ordinal.
    #[must_use]
    pub const fn ordinal(self) -> u8 {
        self.ordinal
    }

    /// Whether the component draws in front of the content.
    #[must_use]
    pub const fn front(self) -> bool {
        self.front
    }

    /// Whether the component is resized with the drag offset.
    #[must_use]
    pub const fn scale(self) -> bool {
        self.scale
    }

    /// Looks a style up by its persistence ordinal.
    #[must_use]
    pub const fn from_ordinal(ordinal: u8) -> Option<Self> {
        if (ordinal as usize) < Self::ALL.len() {
            Some(Self::ALL[ordinal as usize])
        } else {
            None
        }
    }
}

impl Default for SpinnerStyle {
    fn default() -> Self {
        Self::TRANSLATE
    }
}
