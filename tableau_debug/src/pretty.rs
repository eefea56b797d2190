// Copyright 2026 the Tableau Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Host times
//! are printed in milliseconds.

use std::io::Write;

use tableau_core::presence::PresenceState;
use tableau_core::time::HostTime;
use tableau_core::trace::{
    ContainerFailureEvent, ContainerLayoutEvent, EchoDroppedEvent, FlushEvent, TickBeginEvent,
    TickEndEvent, TraceSink, TransitionEvent,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    skip_deferred: bool,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("skip_deferred", &self.skip_deferred)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self::with_writer(Box::new(std::io::stderr()))
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self::with_writer(writer)
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self {
            writer,
            skip_deferred: false,
        }
    }

    /// Suppresses the lines of ticks deferred by a drag.
    #[must_use]
    pub fn skip_deferred(mut self, skip: bool) -> Self {
        self.skip_deferred = skip;
        self
    }

    /// Consumes the sink and returns the writer.
    pub fn into_writer(self) -> W {
        self.writer
    }
}

fn ms(t: HostTime) -> f64 {
    t.micros() as f64 / 1000.0
}

fn state_name(state: Option<PresenceState>) -> &'static str {
    state.map_or("new", PresenceState::name)
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_tick_begin(&mut self, e: &TickBeginEvent) {
        if e.deferred {
            if !self.skip_deferred {
                let _ = writeln!(
                    self.writer,
                    "[tick:deferred] frame={} now={:.1}ms",
                    e.frame_index,
                    ms(e.now),
                );
            }
            return;
        }
        let _ = writeln!(
            self.writer,
            "[tick] frame={} now={:.1}ms",
            e.frame_index,
            ms(e.now),
        );
    }

    fn on_flush(&mut self, e: &FlushEvent) {
        let _ = writeln!(
            self.writer,
            "[flush] frame={} inserted={} removed={} finished={} cancelled={} moved={}",
            e.frame_index, e.inserted, e.removed, e.remove_finished, e.cancelled, e.moved,
        );
    }

    fn on_container_layout(&mut self, e: &ContainerLayoutEvent<'_>) {
        let how = if e.measured { "measured" } else { "direct" };
        let _ = writeln!(
            self.writer,
            "[layout] frame={} container={} children={} {how}",
            e.frame_index, e.container, e.children,
        );
    }

    fn on_transition(&mut self, e: &TransitionEvent<'_>) {
        let _ = writeln!(
            self.writer,
            "[transition] frame={} {}/{} {} -> {}",
            e.frame_index,
            e.container,
            e.child,
            state_name(e.from),
            e.to.name(),
        );
    }

    fn on_container_failure(&mut self, e: &ContainerFailureEvent<'_>) {
        let _ = writeln!(
            self.writer,
            "[failure] frame={} container={} error={}",
            e.frame_index, e.container, e.error,
        );
    }

    fn on_echo_dropped(&mut self, e: &EchoDroppedEvent<'_>) {
        let _ = writeln!(
            self.writer,
            "[echo] layout={} connection={} {}",
            e.layout_id, e.connection_id, e.sub_type,
        );
    }

    fn on_tick_end(&mut self, e: &TickEndEvent) {
        let _ = writeln!(
            self.writer,
            "[tick:end] frame={} laid_out={} failures={}",
            e.frame_index, e.laid_out, e.failures,
        );
    }
}

#[cfg(test)]
mod tests {
    use tableau_core::NodeId;

    use super::*;

    fn lines(sink: PrettyPrintSink<Vec<u8>>) -> Vec<String> {
        String::from_utf8(sink.into_writer())
            .unwrap()
            .lines()
            .map(str::to_owned)
            .collect()
    }

    #[test]
    fn one_line_per_event() {
        let mut sink = PrettyPrintSink::with_writer(Vec::new());
        let stage = NodeId::from("stage");
        let cam = NodeId::from("cam");
        sink.on_tick_begin(&TickBeginEvent {
            frame_index: 2,
            now: HostTime::from_millis(32),
            deferred: false,
        });
        sink.on_container_layout(&ContainerLayoutEvent {
            frame_index: 2,
            container: &stage,
            children: 3,
            measured: true,
        });
        sink.on_transition(&TransitionEvent {
            frame_index: 2,
            container: &stage,
            child: &cam,
            from: None,
            to: PresenceState::Entering,
        });
        assert_eq!(
            lines(sink),
            [
                "[tick] frame=2 now=32.0ms",
                "[layout] frame=2 container=stage children=3 measured",
                "[transition] frame=2 stage/cam new -> entering",
            ]
        );
    }

    #[test]
    fn deferred_ticks_can_be_skipped() {
        let mut sink = PrettyPrintSink::with_writer(Vec::new()).skip_deferred(true);
        sink.on_tick_begin(&TickBeginEvent {
            frame_index: 9,
            now: HostTime::from_millis(5),
            deferred: true,
        });
        sink.on_echo_dropped(&EchoDroppedEvent {
            layout_id: "show",
            connection_id: "c1",
            sub_type: "EVENT_SUB_TYPE_BATCH",
        });
        assert_eq!(lines(sink), ["[echo] layout=show connection=c1 EVENT_SUB_TYPE_BATCH"]);
    }
}
