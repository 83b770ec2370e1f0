// Copyright 2025 the Overpull Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Overpull State: the pure data lattice behind a pull-to-refresh engine.
//!
//! This crate holds the small enumerated types that every other Overpull crate
//! agrees on. None of them carry behavior beyond comparison and mapping rules:
//!
//! - [`RefreshState`]: the header/footer state machine vocabulary, with all of
//!   its flags available as an explicit [`StateFlags`] record and the
//!   header ↔ footer mapping expressed as a lookup table.
//! - [`DimensionStatus`]: a priority lattice deciding whether a freshly
//!   measured header/footer height may overwrite the recorded one, and whether
//!   the component has been told about it yet. [`HeightSlot`] pairs a value
//!   with its status.
//! - [`SpinnerStyle`]: how a header/footer relates visually to the drag offset.
//!
//! ## Mapping states across roles
//!
//! ```rust
//! use overpull_state::{RefreshState, Role};
//!
//! let s = RefreshState::ReleaseToRefresh;
//! assert_eq!(s.role(), Some(Role::Header));
//! assert_eq!(s.to_footer(), RefreshState::ReleaseToLoad);
//! assert_eq!(s.to_footer().to_header(), s);
//!
//! // Two-level states have no footer equivalent.
//! assert_eq!(RefreshState::TwoLevel.to_footer(), RefreshState::TwoLevel);
//! ```
//!
//! ## Height priorities
//!
//! ```rust
//! use overpull_state::{DimensionStatus, HeightSlot};
//!
//! let mut slot = HeightSlot::new(100.0);
//! assert!(slot.offer(120.0, DimensionStatus::XML_LAYOUT_UN_NOTIFY));
//! // A lower priority source cannot displace it.
//! assert!(!slot.offer(80.0, DimensionStatus::XML_WRAP_UN_NOTIFY));
//! assert_eq!(slot.take_notification(), Some(120.0));
//! // Notified once per authoritative value.
//! assert_eq!(slot.take_notification(), None);
//! ```
//!
//! This crate is `no_std` and has no dependencies.

#![no_std]

mod dimension;
mod refresh_state;
mod spinner;

pub use dimension::{DimensionStatus, HeightSlot};
pub use refresh_state::{RefreshState, Role, StateFlags};
pub use spinner::SpinnerStyle;
