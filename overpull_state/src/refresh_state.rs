// Copyright 2025 the Overpull Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Refresh states and their structural flags.

/// Which edge a state (or a component) belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    /// The top edge: pull down to refresh.
    Header,
    /// The bottom edge: pull up to load more.
    Footer,
}

impl Role {
    /// The other edge.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Header => Self::Footer,
            Self::Footer => Self::Header,
        }
    }
}

/// Explicit record of the flags carried by a [`RefreshState`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StateFlags {
    /// Owning edge; `None` for the shared neutral state.
    pub role: Option<Role>,
    /// The finger is actively extending the pull.
    pub dragging: bool,
    /// Refresh, load or two-level work is executing.
    pub opening: bool,
    /// The finish/rebound sequence is running.
    pub finishing: bool,
    /// Part of the extended "second floor" overscroll.
    pub two_level: bool,
    /// Releasing now would open (rather than cancel).
    pub release_to_opening: bool,
}

impl StateFlags {
    const fn new(
        role: Option<Role>,
        dragging: bool,
        opening: bool,
        finishing: bool,
        two_level: bool,
        release_to_opening: bool,
    ) -> Self {
        Self {
            role,
            dragging,
            opening,
            finishing,
            two_level,
            release_to_opening,
        }
    }
}

const H: Option<Role> = Some(Role::Header);
const F: Option<Role> = Some(Role::Footer);

/// State of a refresh cycle.
///
/// Header states and their footer mirrors:
///
/// | Header | Footer |
/// |---|---|
/// | `PullDownToRefresh` | `PullUpToLoad` |
/// | `PullDownCanceled` | `PullUpCanceled` |
/// | `ReleaseToRefresh` | `ReleaseToLoad` |
/// | `RefreshReleased` | `LoadReleased` |
/// | `Refreshing` | `Loading` |
/// | `RefreshFinish` | `LoadFinish` |
///
/// `ReleaseToTwoLevel`, `TwoLevelReleased`, `TwoLevel` and `TwoLevelFinish`
/// are header-only. `None` is shared by both edges.
///
/// Values of this type are vocabulary only; the refresh kernel is the single
/// place that moves from one to another.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RefreshState {
    /// Resting; nothing is pulled out.
    #[default]
    None,
    /// Header is being pulled but has not reached its trigger height.
    PullDownToRefresh,
    /// Footer is being pulled but has not reached its trigger height.
    PullUpToLoad,
    /// Header pull was released short of the trigger and is rebounding.
    PullDownCanceled,
    /// Footer pull was released short of the trigger and is rebounding.
    PullUpCanceled,
    /// Header pulled past its trigger height; releasing refreshes.
    ReleaseToRefresh,
    /// Footer pulled past its trigger height; releasing loads.
    ReleaseToLoad,
    /// Header pulled past the two-level threshold; releasing opens the second floor.
    ReleaseToTwoLevel,
    /// Released into two-level; the panel is opening.
    TwoLevelReleased,
    /// Released into refresh; spinner is settling at the header height.
    RefreshReleased,
    /// Released into load; spinner is settling at the footer height.
    LoadReleased,
    /// Refresh work is running.
    Refreshing,
    /// Load-more work is running.
    Loading,
    /// The second floor is open.
    TwoLevel,
    /// Refresh work finished; finish delay and rebound are running.
    RefreshFinish,
    /// Load-more work finished; finish delay and rebound are running.
    LoadFinish,
    /// The second floor is closing.
    TwoLevelFinish,
}

impl RefreshState {
    /// Every state, in declaration order.
    pub const ALL: [Self; 17] = [
        Self::None,
        Self::PullDownToRefresh,
        Self::PullUpToLoad,
        Self::PullDownCanceled,
        Self::PullUpCanceled,
        Self::ReleaseToRefresh,
        Self::ReleaseToLoad,
        Self::ReleaseToTwoLevel,
        Self::TwoLevelReleased,
        Self::RefreshReleased,
        Self::LoadReleased,
        Self::Refreshing,
        Self::Loading,
        Self::TwoLevel,
        Self::RefreshFinish,
        Self::LoadFinish,
        Self::TwoLevelFinish,
    ];

    /// All flags of this state.
    #[must_use]
    pub const fn flags(self) -> StateFlags {
        //                                      drag   open   finish 2lvl   release
        match self {
            Self::None => StateFlags::new(None, false, false, false, false, false),
            Self::PullDownToRefresh => StateFlags::new(H, true, false, false, false, false),
            Self::PullUpToLoad => StateFlags::new(F, true, false, false, false, false),
            Self::PullDownCanceled => StateFlags::new(H, false, false, false, false, false),
            Self::PullUpCanceled => StateFlags::new(F, false, false, false, false, false),
            Self::ReleaseToRefresh => StateFlags::new(H, true, false, false, false, true),
            Self::ReleaseToLoad => StateFlags::new(F, true, false, false, false, true),
            Self::ReleaseToTwoLevel => StateFlags::new(H, true, false, false, true, true),
            Self::TwoLevelReleased => StateFlags::new(H, false, false, false, true, false),
            Self::RefreshReleased => StateFlags::new(H, false, false, false, false, false),
            Self::LoadReleased => StateFlags::new(F, false, false, false, false, false),
            Self::Refreshing => StateFlags::new(H, false, true, false, false, false),
            Self::Loading => StateFlags::new(F, false, true, false, false, false),
            Self::TwoLevel => StateFlags::new(H, false, true, false, true, false),
            Self::RefreshFinish => StateFlags::new(H, false, false, true, false, false),
            Self::LoadFinish => StateFlags::new(F, false, false, true, false, false),
            Self::TwoLevelFinish => StateFlags::new(H, false, false, true, true, false),
        }
    }

    /// Owning edge, or `None` for [`RefreshState::None`].
    #[must_use]
    pub const fn role(self) -> Option<Role> {
        self.flags().role
    }

    /// Returns `true` for header-side states (including two-level states).
    #[must_use]
    pub const fn is_header(self) -> bool {
        matches!(self.role(), Some(Role::Header))
    }

    /// Returns `true` for footer-side states.
    #[must_use]
    pub const fn is_footer(self) -> bool {
        matches!(self.role(), Some(Role::Footer))
    }

    /// See [`StateFlags::dragging`].
    #[must_use]
    pub const fn is_dragging(self) -> bool {
        self.flags().dragging
    }

    /// See [`StateFlags::opening`].
    #[must_use]
    pub const fn is_opening(self) -> bool {
        self.flags().opening
    }

    /// See [`StateFlags::finishing`].
    #[must_use]
    pub const fn is_finishing(self) -> bool {
        self.flags().finishing
    }

    /// See [`StateFlags::two_level`].
    #[must_use]
    pub const fn is_two_level(self) -> bool {
        self.flags().two_level
    }

    /// See [`StateFlags::release_to_opening`].
    #[must_use]
    pub const fn is_release_to_opening(self) -> bool {
        self.flags().release_to_opening
    }

    /// Maps a footer state to its header equivalent.
    ///
    /// Header states, two-level states and `None` are returned unchanged.
    #[must_use]
    pub const fn to_header(self) -> Self {
        match self {
            Self::PullUpToLoad => Self::PullDownToRefresh,
            Self::PullUpCanceled => Self::PullDownCanceled,
            Self::ReleaseToLoad => Self::ReleaseToRefresh,
            Self::LoadReleased => Self::RefreshReleased,
            Self::Loading => Self::Refreshing,
            Self::LoadFinish => Self::RefreshFinish,
            other => other,
        }
    }

    /// Maps a header state to its footer equivalent.
    ///
    /// Footer states, two-level states and `None` are returned unchanged.
    #[must_use]
    pub const fn to_footer(self) -> Self {
        match self {
            Self::PullDownToRefresh => Self::PullUpToLoad,
            Self::PullDownCanceled => Self::PullUpCanceled,
            Self::ReleaseToRefresh => Self::ReleaseToLoad,
            Self::RefreshReleased => Self::LoadReleased,
            Self::Refreshing => Self::Loading,
            Self::RefreshFinish => Self::LoadFinish,
            other => other,
        }
    }

    /// Maps this state into `role`, leaving states without an equivalent unchanged.
    #[must_use]
    pub const fn to_role(self, role: Role) -> Self {
        match role {
            Role::Header => self.to_header(),
            Role::Footer => self.to_footer(),
        }
    }

    /// The "pulling, not yet triggered" state for `role`.
    #[must_use]
    pub const fn pulling(role: Role) -> Self {
        match role {
            Role::Header => Self::PullDownToRefresh,
            Role::Footer => Self::PullUpToLoad,
        }
    }

    /// The "released short of the trigger" state for `role`.
    #[must_use]
    pub const fn canceled(role: Role) -> Self {
        match role {
            Role::Header => Self::PullDownCanceled,
            Role::Footer => Self::PullUpCanceled,
        }
    }

    /// The "release now opens" state for `role`.
    #[must_use]
    pub const fn release_to_open(role: Role) -> Self {
        match role {
            Role::Header => Self::ReleaseToRefresh,
            Role::Footer => Self::ReleaseToLoad,
        }
    }

    /// The "released, settling before opening" state for `role`.
    #[must_use]
    pub const fn released(role: Role) -> Self {
        match role {
            Role::Header => Self::RefreshReleased,
            Role::Footer => Self::LoadReleased,
        }
    }

    /// The "work running" state for `role`.
    #[must_use]
    pub const fn opened(role: Role) -> Self {
        match role {
            Role::Header => Self::Refreshing,
            Role::Footer => Self::Loading,
        }
    }

    /// The "work finished" state for `role`.
    #[must_use]
    pub const fn finished(role: Role) -> Self {
        match role {
            Role::Header => Self::RefreshFinish,
            Role::Footer => Self::LoadFinish,
        }
    }
}
