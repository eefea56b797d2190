// Copyright 2026 the Tableau Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Presence identity and lifecycle state.

use core::fmt;

/// Sentinel value indicating "no presence" in index fields.
pub const INVALID: u32 = u32::MAX;

/// A handle to a presence in a [`PresenceStore`](super::PresenceStore).
///
/// Contains both a slot index and a generation counter so that stale handles
/// can be detected after a presence is destroyed and the slot is reused.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PresenceId {
    pub(crate) idx: u32,
    pub(crate) generation: u32,
}

impl PresenceId {
    /// Returns the raw slot index (for diagnostics only).
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.idx
    }

    /// Returns the generation counter.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for PresenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PresenceId({}@gen{})", self.idx, self.generation)
    }
}

/// Where a child is in its enter/exit lifecycle.
///
/// ```text
///   Entering ──► Settled ──► Exiting ──► Detached
///      │                        ▲
///      └────────────────────────┘
/// ```
///
/// A child removed before its entry finishes goes straight to `Exiting`.
/// `Detached` is terminal: the presence is unlinked and destroyed on the
/// next flush.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PresenceState {
    /// Snapped to its entry pose, animating towards its layout position.
    Entering,
    /// At (or animating between) layout positions.
    Settled,
    /// Playing its exit transition. Still visible.
    Exiting,
    /// Exit finished. No longer visible.
    Detached,
}

impl PresenceState {
    /// Returns `true` for states that still occupy a layout slot.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Entering | Self::Settled)
    }

    /// Short lowercase name for diagnostics.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Entering => "entering",
            Self::Settled => "settled",
            Self::Exiting => "exiting",
            Self::Detached => "detached",
        }
    }
}
