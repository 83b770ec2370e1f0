// Copyright 2025 the Overpull Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Measurement priorities for header/footer heights.
//!
//! A height can be learned from several independent sources that fire in any
//! order: the framework default, inferred from children, explicit from markup,
//! explicit from the enclosing container, and explicit from code. Each source
//! has a level in [`DimensionStatus`]; a higher level always wins, and each
//! level exists in an "unnotified" and a "notified" flavor so the component is
//! told about an authoritative value at most once.

/// Priority level of a recorded height, and whether it has been delivered.
///
/// Levels from lowest to highest priority:
///
/// | Unnotified | Notified | Source |
/// |---|---|---|
/// | `DEFAULT_UN_NOTIFY` | `DEFAULT` | framework default |
/// | `XML_WRAP_UN_NOTIFY` | `XML_WRAP` | inferred from children |
/// | `XML_EXACT_UN_NOTIFY` | `XML_EXACT` | explicit in markup |
/// | `XML_LAYOUT_UN_NOTIFY` | `XML_LAYOUT` | explicit from the container |
/// | `CODE_EXACT_UN_NOTIFY` | `CODE_EXACT` | explicit from code |
/// | `DEAD_LOCK_UN_NOTIFY` | `DEAD_LOCK` | terminal |
///
/// Ordinals run `0..=10`; both dead-lock members share ordinal `10`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DimensionStatus {
    index: u8,
    ordinal: u8,
    notified: bool,
}

impl DimensionStatus {
    /// Framework default, not yet delivered.
    pub const DEFAULT_UN_NOTIFY: Self = Self::new(0, 0, false);
    /// Framework default.
    pub const DEFAULT: Self = Self::new(1, 1, true);
    /// Inferred from children, not yet delivered.
    pub const XML_WRAP_UN_NOTIFY: Self = Self::new(2, 2, false);
    /// Inferred from children.
    pub const XML_WRAP: Self = Self::new(3, 3, true);
    /// Explicit in markup, not yet delivered.
    pub const XML_EXACT_UN_NOTIFY: Self = Self::new(4, 4, false);
    /// Explicit in markup.
    pub const XML_EXACT: Self = Self::new(5, 5, true);
    /// Explicit from the enclosing container, not yet delivered.
    pub const XML_LAYOUT_UN_NOTIFY: Self = Self::new(6, 6, false);
    /// Explicit from the enclosing container.
    pub const XML_LAYOUT: Self = Self::new(7, 7, true);
    /// Explicit from code, not yet delivered.
    pub const CODE_EXACT_UN_NOTIFY: Self = Self::new(8, 8, false);
    /// Explicit from code.
    pub const CODE_EXACT: Self = Self::new(9, 9, true);
    /// Terminal, not yet delivered.
    pub const DEAD_LOCK_UN_NOTIFY: Self = Self::new(10, 10, false);
    /// Terminal; nothing displaces it.
    pub const DEAD_LOCK: Self = Self::new(11, 10, true);

    /// Every level, lowest priority first.
    pub const ALL: [Self; 12] = [
        Self::DEFAULT_UN_NOTIFY,
        Self::DEFAULT,
        Self::XML_WRAP_UN_NOTIFY,
        Self::XML_WRAP,
        Self::XML_EXACT_UN_NOTIFY,
        Self::XML_EXACT,
        Self::XML_LAYOUT_UN_NOTIFY,
        Self::XML_LAYOUT,
        Self::CODE_EXACT_UN_NOTIFY,
        Self::CODE_EXACT,
        Self::DEAD_LOCK_UN_NOTIFY,
        Self::DEAD_LOCK,
    ];

    const fn new(index: u8, ordinal: u8, notified: bool) -> Self {
        Self {
            index,
            ordinal,
            notified,
        }
    }

    /// Priority ordinal, `0..=10`.
    #[must_use]
    pub const fn ordinal(self) -> u8 {
        self.ordinal
    }

    /// Whether this value has been delivered to the component.
    #[must_use]
    pub const fn is_notified(self) -> bool {
        self.notified
    }

    /// The delivered flavor of this level.
    ///
    /// Already-notified values are returned unchanged. An unnotified value
    /// whose successor is not its notified twin falls back to [`Self::DEFAULT`].
    #[must_use]
    pub const fn notified(self) -> Self {
        if self.notified {
            return self;
        }
        let next = Self::ALL[self.index as usize + 1];
        if next.notified { next } else { Self::DEFAULT }
    }

    /// The undelivered flavor of this level.
    ///
    /// Already-unnotified values are returned unchanged. A notified value whose
    /// predecessor is not its unnotified twin falls back to
    /// [`Self::DEFAULT_UN_NOTIFY`].
    #[must_use]
    pub const fn un_notify(self) -> Self {
        if !self.notified {
            return self;
        }
        let prev = Self::ALL[self.index as usize - 1];
        if prev.notified {
            Self::DEFAULT_UN_NOTIFY
        } else {
            prev
        }
    }

    /// Returns `true` if a height recorded at `self` may be overwritten by one
    /// from `status`.
    ///
    /// Replacement happens when `status` has a higher ordinal, or the same
    /// ordinal while `self` is still undelivered. [`Self::CODE_EXACT`] may
    /// always be replaced by itself so code-set heights can be re-notified.
    #[must_use]
    pub fn can_replace_with(self, status: Self) -> bool {
        self.ordinal < status.ordinal
            || ((!self.notified || self == Self::CODE_EXACT) && self.ordinal == status.ordinal)
    }
}

impl Default for DimensionStatus {
    fn default() -> Self {
        Self::DEFAULT_UN_NOTIFY
    }
}

/// A height paired with the priority it was recorded at.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeightSlot {
    value: f64,
    status: DimensionStatus,
}

impl HeightSlot {
    /// A slot holding a framework-default height that has not been delivered.
    ///
    /// Negative or non-finite heights are clamped to zero.
    #[must_use]
    pub fn new(default: f64) -> Self {
        Self {
            value: sanitize(default),
            status: DimensionStatus::DEFAULT_UN_NOTIFY,
        }
    }

    /// Current height.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Current priority.
    #[must_use]
    pub fn status(&self) -> DimensionStatus {
        self.status
    }

    /// Offers a height learned from the source described by `status`.
    ///
    /// Either flavor of a level may be passed; the recorded status is always
    /// the unnotified flavor so the next [`take_notification`] delivers it.
    /// Returns `true` if the offer was accepted.
    ///
    /// [`take_notification`]: Self::take_notification
    pub fn offer(&mut self, value: f64, status: DimensionStatus) -> bool {
        if !self.status.can_replace_with(status.notified()) {
            return false;
        }
        self.value = sanitize(value);
        self.status = status.un_notify();
        true
    }

    /// Marks the slot as needing re-delivery without changing its value.
    pub fn invalidate(&mut self) {
        self.status = self.status.un_notify();
    }

    /// Returns the height if it has not been delivered yet, marking it delivered.
    pub fn take_notification(&mut self) -> Option<f64> {
        if self.status.is_notified() {
            return None;
        }
        self.status = self.status.notified();
        Some(self.value)
    }
}

fn sanitize(value: f64) -> f64 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}
