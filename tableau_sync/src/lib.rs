// Copyright 2026 the Tableau Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene tree synchronization for `tableau`.
//!
//! A [`CompositorProject`] owns the local scene tree of one layout and keeps
//! it in step with a [`RemoteLayerStore`]:
//!
//! ```text
//!   insert/update/remove/move/swap/reorder
//!       │
//!       ▼
//!   SceneTree (applied at once) ──► TreeChange queue ──► RenderHandle::sync
//!       │                                                    │ HostMessage
//!       ▼                                                    ▼
//!   RemoteLayerStore ◄── request + {connectionId, layoutId}  Engine::tick
//!       │
//!       ▼ LayerEvent
//!   apply_remote: own connection id → dropped, otherwise merged
//! ```
//!
//! **[`tree`]** — Flat node storage with structural edits and conversion to
//! and from the store's flat node list.
//!
//! **[`project`]** — Validated optimistic mutations, the
//! [`RejectionPolicy`](project::RejectionPolicy) and remote merging.
//!
//! **[`wire`]** — Serde types for the store's requests and events.
//!
//! **[`render`]** — [`render_project`] and the [`RenderHandle`] that feeds
//! tree changes to a `tableau_core` engine.
//!
//! **[`interaction`]** — [`RenderMethods`](interaction::RenderMethods) and
//! drag sessions.
//!
//! [`CompositorProject`]: project::CompositorProject
//! [`RemoteLayerStore`]: store::RemoteLayerStore
//! [`render_project`]: render::render_project
//! [`RenderHandle`]: render::RenderHandle

pub mod change;
pub mod error;
pub mod interaction;
pub mod node;
pub mod project;
pub mod render;
pub mod store;
pub mod tree;
pub mod wire;

pub use error::{RemoteError, SyncError};
pub use project::CompositorProject;
pub use render::{RenderHandle, render_project};
