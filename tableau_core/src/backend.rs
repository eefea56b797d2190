// Copyright 2026 the Tableau Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host contract for presenting children.
//!
//! The engine never touches a rendering surface. A host provides:
//!
//! - **Tick source** — Calls [`Engine::tick`] from its animation-frame
//!   callback with the current [`HostTime`].
//!
//! - **Host messages** — Reports container lifecycle, size and prop changes
//!   as [`HostMessage`]s, and reports finished exit animations with
//!   [`HostMessage::TransitionEnded`].
//!
//! - **Presenter** — Implements the [`Presenter`] trait to move, fade and
//!   remove native child elements.
//!
//! [`Engine::tick`]: crate::engine::Engine::tick
//! [`HostMessage`]: crate::message::HostMessage
//! [`HostMessage::TransitionEnded`]: crate::message::HostMessage::TransitionEnded
//! [`HostTime`]: crate::time::HostTime

use crate::id::NodeId;
use crate::pose::PoseUpdate;

/// Applies child poses to a native presentation tree.
///
/// # Frame loop pseudocode
///
/// ```rust,ignore
/// fn on_frame(now: HostTime) {
///     for msg in host.drain_messages() {
///         engine.handle(msg);
///     }
///     engine.tick(&ctx, &mut presenter, now);
/// }
/// ```
pub trait Presenter {
    /// Moves `child` of `container` to `update.pose`, animating with the
    /// update's duration, delay and curve.
    fn apply(&mut self, container: &NodeId, child: &NodeId, update: &PoseUpdate);

    /// Removes `child`'s element from `container`.
    fn detach(&mut self, container: &NodeId, child: &NodeId);
}
