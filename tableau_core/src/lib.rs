// Copyright 2026 the Tableau Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout algorithms, measurement and transition engine for live-stream
//! scene compositing.
//!
//! `tableau_core` arranges the children of layout containers into concrete
//! positions and animates them as they enter, move and leave. It never
//! touches a rendering surface: hosts report what happened on their surface
//! as messages and receive target poses through the [`Presenter`] trait.
//!
//! # Architecture
//!
//! The crate is organized around a per-frame tick that turns queued
//! mutations into animated pose updates:
//!
//! ```text
//!   Host surface
//!       │ HostMessage
//!       ▼
//!   Engine::handle ──► Scheduler (op queue + dirty containers)
//!                                   │
//!       ┌───────────────────────────┘ Engine::tick
//!       ▼
//!   layout::layout() ──► LayoutResult ──► MeasurementArena::resolve()
//!                                                │ ChildPositionIndex
//!       ┌────────────────────────────────────────┘
//!       ▼
//!   PresenceStore (Entering/Settled/Exiting/Detached) ──► Presenter::apply()
//! ```
//!
//! **[`props`]** — Typed container and child props decoded from JSON prop
//! bags, with per-layout defaults and validation.
//!
//! **[`layout`]** — Pure layout algorithms. `Free` and `Layered` compute
//! positions directly; `Row`, `Column`, `Grid` and `Presentation` emit a
//! flex [`Template`](layout::Template).
//!
//! **[`measure`]** — Resolves templates with `taffy` in an arena of reusable
//! per-container measurement handles.
//!
//! **[`scheduler`]** — Op queue with insert/remove cancellation and
//! container dirty tracking via `understory_dirty`.
//!
//! **[`presence`]** — Struct-of-arrays storage of every visible child with
//! generational handles and per-container sibling order.
//!
//! **[`engine`]** — Ties everything together: host messages, ticks, entry
//! and exit transitions, cross-container moves.
//!
//! **[`backend`]** — The [`Presenter`] trait hosts implement.
//!
//! **[`trace`]** — [`TraceSink`](trace::TraceSink) trait and event types for
//! tick instrumentation, with zero-overhead [`Tracer`](trace::Tracer)
//! wrapper.
//!
//! # Crate features
//!
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//!
//! [`Presenter`]: backend::Presenter

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod backend;
pub mod config;
pub mod container;
pub mod context;
pub mod dirty;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod id;
pub mod layout;
pub mod measure;
pub mod message;
pub mod op;
pub mod pose;
pub mod presence;
pub mod props;
pub mod scheduler;
pub mod time;
pub mod timing;
pub mod trace;
pub mod transition;

pub use error::{LayoutError, PropsError};
pub use id::NodeId;
