// Copyright 2026 the Tableau Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory event recording.
//!
//! [`RecorderSink`] implements [`TraceSink`] and keeps every event as an
//! owned [`RecordedEvent`]. Borrowed ids are cloned and layout errors are
//! kept as their message.

use tableau_core::NodeId;
use tableau_core::presence::PresenceState;
use tableau_core::trace::{
    ContainerFailureEvent, ContainerLayoutEvent, EchoDroppedEvent, FlushEvent, TickBeginEvent,
    TickEndEvent, TraceSink, TransitionEvent,
};

/// One recorded trace event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecordedEvent {
    /// A tick started.
    TickBegin(TickBeginEvent),
    /// Queued ops were applied.
    Flush(FlushEvent),
    /// A container was laid out.
    ContainerLayout {
        /// Tick counter.
        frame_index: u64,
        /// The container.
        container: NodeId,
        /// Number of children positioned.
        children: usize,
        /// Whether the measurement arena was used.
        measured: bool,
    },
    /// A child changed lifecycle state.
    Transition {
        /// Tick counter.
        frame_index: u64,
        /// Container the child is shown in.
        container: NodeId,
        /// The child.
        child: NodeId,
        /// Previous state.
        from: Option<PresenceState>,
        /// New state.
        to: PresenceState,
    },
    /// A container's layout failed.
    ContainerFailure {
        /// Tick counter.
        frame_index: u64,
        /// The container.
        container: NodeId,
        /// Error message.
        error: String,
    },
    /// A remote echo was dropped.
    EchoDropped {
        /// Target layout.
        layout_id: String,
        /// Issuing connection.
        connection_id: String,
        /// Event sub-type name.
        sub_type: String,
    },
    /// A tick finished.
    TickEnd(TickEndEvent),
}

/// A [`TraceSink`] that keeps every event in memory.
#[derive(Clone, Debug, Default)]
pub struct RecorderSink {
    events: Vec<RecordedEvent>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded events in arrival order.
    #[must_use]
    pub fn events(&self) -> &[RecordedEvent] {
        &self.events
    }

    /// Consumes the recorder and returns the events.
    #[must_use]
    pub fn into_events(self) -> Vec<RecordedEvent> {
        self.events
    }

    /// Number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns `true` if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Drops all recorded events.
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// The lifecycle states `child` went through, in order.
    #[must_use]
    pub fn states_of(&self, child: &NodeId) -> Vec<PresenceState> {
        self.events
            .iter()
            .filter_map(|e| match e {
                RecordedEvent::Transition { child: c, to, .. } if c == child => Some(*to),
                _ => None,
            })
            .collect()
    }
}

impl TraceSink for RecorderSink {
    fn on_tick_begin(&mut self, e: &TickBeginEvent) {
        self.events.push(RecordedEvent::TickBegin(*e));
    }

    fn on_flush(&mut self, e: &FlushEvent) {
        self.events.push(RecordedEvent::Flush(*e));
    }

    fn on_container_layout(&mut self, e: &ContainerLayoutEvent<'_>) {
        self.events.push(RecordedEvent::ContainerLayout {
            frame_index: e.frame_index,
            container: e.container.clone(),
            children: e.children,
            measured: e.measured,
        });
    }

    fn on_transition(&mut self, e: &TransitionEvent<'_>) {
        self.events.push(RecordedEvent::Transition {
            frame_index: e.frame_index,
            container: e.container.clone(),
            child: e.child.clone(),
            from: e.from,
            to: e.to,
        });
    }

    fn on_container_failure(&mut self, e: &ContainerFailureEvent<'_>) {
        self.events.push(RecordedEvent::ContainerFailure {
            frame_index: e.frame_index,
            container: e.container.clone(),
            error: e.error.to_string(),
        });
    }

    fn on_echo_dropped(&mut self, e: &EchoDroppedEvent<'_>) {
        self.events.push(RecordedEvent::EchoDropped {
            layout_id: e.layout_id.to_owned(),
            connection_id: e.connection_id.to_owned(),
            sub_type: e.sub_type.to_owned(),
        });
    }

    fn on_tick_end(&mut self, e: &TickEndEvent) {
        self.events.push(RecordedEvent::TickEnd(*e));
    }
}
