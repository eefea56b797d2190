// Copyright 2026 the Tableau Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-tracking channel constants.
//!
//! Containers are tracked by their slot index in a
//! [`DirtyTracker`](understory_dirty::DirtyTracker). Two channels are used:
//!
//! - **Local** — [`LAYOUT`] is marked with the default policy whenever a
//!   container has queued ops. Only the marked container drains.
//!
//! - **Propagating** — [`GEOMETRY`] uses
//!   [`EagerPolicy`](understory_dirty::EagerPolicy) and has dependency edges
//!   from each nested container to its parent container. Resizing a
//!   container marks every container nested inside it, because their sizes
//!   derive from the parent's layout.
//!
//! The [`Scheduler`](crate::scheduler::Scheduler) drains both channels on
//! every flush and reports the union as the set of containers to re-lay.

use understory_dirty::Channel;

/// Container has pending ops. No propagation.
pub const LAYOUT: Channel = Channel::new(0);

/// Container geometry changed. Propagates to nested containers.
pub const GEOMETRY: Channel = Channel::new(1);
