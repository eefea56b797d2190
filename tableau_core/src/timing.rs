// Copyright 2026 the Tableau Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tick bookkeeping.
//!
//! - [`FrameTick`] — one animation-frame callback, numbered by the engine
//! - [`TickOutcome`] — whether the tick ran, and if so its [`TickReport`]
//!
//! # Data flow
//!
//! 1. The host calls [`Engine::tick`](crate::engine::Engine::tick) from its
//!    frame callback with the current time.
//! 2. The engine numbers the tick and, unless a drag is in progress, resolves
//!    deferred animations, flushes queued ops and re-lays dirty containers.
//! 3. The returned [`TickReport`] summarizes what the flush did, including
//!    any containers whose layout failed.

use crate::error::LayoutError;
use crate::id::NodeId;
use crate::time::HostTime;

/// One animation-frame opportunity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameTick {
    /// Host time of the callback.
    pub now: HostTime,
    /// Monotonically increasing tick counter. Deferred ticks are counted.
    pub frame_index: u64,
}

/// What one flush did.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickReport {
    /// Children that started entering.
    pub inserted: usize,
    /// Children that started exiting.
    pub removed: usize,
    /// Children whose exit completed and were unlinked.
    pub remove_finished: usize,
    /// Insert/remove pairs that cancelled out.
    pub cancelled: usize,
    /// Children that moved between containers.
    pub moved: usize,
    /// Containers laid out, in processing order.
    pub laid_out: Vec<NodeId>,
    /// Containers whose layout failed this tick.
    pub failures: Vec<(NodeId, LayoutError)>,
}

/// Result of [`Engine::tick`](crate::engine::Engine::tick).
#[derive(Clone, Debug, PartialEq)]
pub enum TickOutcome {
    /// A drag was in progress. Nothing ran and queued ops were kept.
    Deferred(FrameTick),
    /// The tick ran.
    Ran(FrameTick, TickReport),
}

impl TickOutcome {
    /// The tick this outcome belongs to.
    #[must_use]
    pub fn tick(&self) -> FrameTick {
        match self {
            Self::Deferred(tick) | Self::Ran(tick, _) => *tick,
        }
    }

    /// Returns the report if the tick ran.
    #[must_use]
    pub fn report(&self) -> Option<&TickReport> {
        match self {
            Self::Deferred(_) => None,
            Self::Ran(_, report) => Some(report),
        }
    }

    /// Returns `true` if the tick was deferred.
    #[must_use]
    pub fn is_deferred(&self) -> bool {
        matches!(self, Self::Deferred(_))
    }
}
