// Copyright 2026 the Tableau Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the tick loop.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! engine calls at each stage of a tick. All method bodies default to no-ops,
//! so implementing only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing. When **on**, each
//! method performs a single `Option` branch before dispatching.
//!
//! Events borrow ids from the engine; sinks that keep them must clone.
//!
//! # Crate features
//!
//! - `trace` — enables the `Tracer` method bodies (one branch per call).

use crate::error::LayoutError;
use crate::id::NodeId;
use crate::presence::PresenceState;
use crate::time::HostTime;
use crate::timing::{FrameTick, TickReport};

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when a tick starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickBeginEvent {
    /// Tick counter.
    pub frame_index: u64,
    /// Host time of the tick.
    pub now: HostTime,
    /// Whether the tick is deferred by a drag.
    pub deferred: bool,
}

impl From<&FrameTick> for TickBeginEvent {
    fn from(tick: &FrameTick) -> Self {
        Self {
            frame_index: tick.frame_index,
            now: tick.now,
            deferred: false,
        }
    }
}

/// Emitted once the queued ops of a tick have been applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FlushEvent {
    /// Tick counter.
    pub frame_index: u64,
    /// Children that started entering.
    pub inserted: usize,
    /// Children that started exiting.
    pub removed: usize,
    /// Children unlinked after their exit.
    pub remove_finished: usize,
    /// Insert/remove pairs that cancelled out.
    pub cancelled: usize,
    /// Children that moved between containers.
    pub moved: usize,
}

impl FlushEvent {
    /// Creates a `FlushEvent` from a (partial) tick report.
    #[must_use]
    pub fn new(frame_index: u64, report: &TickReport) -> Self {
        Self {
            frame_index,
            inserted: report.inserted,
            removed: report.removed,
            remove_finished: report.remove_finished,
            cancelled: report.cancelled,
            moved: report.moved,
        }
    }
}

/// Emitted after a container is laid out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContainerLayoutEvent<'a> {
    /// Tick counter.
    pub frame_index: u64,
    /// The container.
    pub container: &'a NodeId,
    /// Number of children positioned.
    pub children: usize,
    /// Whether the layout went through the measurement arena.
    pub measured: bool,
}

/// Emitted when a child changes lifecycle state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransitionEvent<'a> {
    /// Tick counter.
    pub frame_index: u64,
    /// Container the child is shown in.
    pub container: &'a NodeId,
    /// The child.
    pub child: &'a NodeId,
    /// Previous state, `None` for a new presence.
    pub from: Option<PresenceState>,
    /// New state.
    pub to: PresenceState,
}

/// Emitted when a container's layout fails.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContainerFailureEvent<'a> {
    /// Tick counter.
    pub frame_index: u64,
    /// The container.
    pub container: &'a NodeId,
    /// What went wrong.
    pub error: &'a LayoutError,
}

/// Emitted when a remote event is dropped as an echo of a local write.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EchoDroppedEvent<'a> {
    /// Layout the event was addressed to.
    pub layout_id: &'a str,
    /// Connection that issued the write.
    pub connection_id: &'a str,
    /// The event's sub-type name.
    pub sub_type: &'a str,
}

/// Emitted when a tick finishes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickEndEvent {
    /// Tick counter.
    pub frame_index: u64,
    /// Host time of the tick.
    pub now: HostTime,
    /// Containers laid out.
    pub laid_out: usize,
    /// Containers whose layout failed.
    pub failures: usize,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the engine.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when a tick starts.
    fn on_tick_begin(&mut self, e: &TickBeginEvent) {
        _ = e;
    }

    /// Called once queued ops have been applied.
    fn on_flush(&mut self, e: &FlushEvent) {
        _ = e;
    }

    /// Called after each container layout.
    fn on_container_layout(&mut self, e: &ContainerLayoutEvent<'_>) {
        _ = e;
    }

    /// Called when a child changes lifecycle state.
    fn on_transition(&mut self, e: &TransitionEvent<'_>) {
        _ = e;
    }

    /// Called when a container's layout fails.
    fn on_container_failure(&mut self, e: &ContainerFailureEvent<'_>) {
        _ = e;
    }

    /// Called when a remote echo is dropped.
    fn on_echo_dropped(&mut self, e: &EchoDroppedEvent<'_>) {
        _ = e;
    }

    /// Called when a tick finishes.
    fn on_tick_end(&mut self, e: &TickEndEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

macro_rules! dispatch {
    ($self:ident, $method:ident, $e:ident) => {{
        #[cfg(feature = "trace")]
        if let Some(s) = &mut $self.sink {
            s.$method($e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = $e;
        }
    }};
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`TickBeginEvent`].
    #[inline]
    pub fn tick_begin(&mut self, e: &TickBeginEvent) {
        dispatch!(self, on_tick_begin, e);
    }

    /// Emits a [`FlushEvent`].
    #[inline]
    pub fn flush(&mut self, e: &FlushEvent) {
        dispatch!(self, on_flush, e);
    }

    /// Emits a [`ContainerLayoutEvent`].
    #[inline]
    pub fn container_layout(&mut self, e: &ContainerLayoutEvent<'_>) {
        dispatch!(self, on_container_layout, e);
    }

    /// Emits a [`TransitionEvent`].
    #[inline]
    pub fn transition(&mut self, e: &TransitionEvent<'_>) {
        dispatch!(self, on_transition, e);
    }

    /// Emits a [`ContainerFailureEvent`].
    #[inline]
    pub fn container_failure(&mut self, e: &ContainerFailureEvent<'_>) {
        dispatch!(self, on_container_failure, e);
    }

    /// Emits an [`EchoDroppedEvent`].
    #[inline]
    pub fn echo_dropped(&mut self, e: &EchoDroppedEvent<'_>) {
        dispatch!(self, on_echo_dropped, e);
    }

    /// Emits a [`TickEndEvent`].
    #[inline]
    pub fn tick_end(&mut self, e: &TickEndEvent) {
        dispatch!(self, on_tick_end, e);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
