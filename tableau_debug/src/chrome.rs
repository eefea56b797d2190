// Copyright 2026 the Tableau Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads events recorded by a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][format] JSON to the given writer.
//!
//! [format]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use crate::recorder::RecordedEvent;

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
///
/// Each tick becomes a duration slice. Events inside a tick carry the tick's
/// host time; echo drops happen outside ticks and reuse the last one seen.
pub fn export(events: &[RecordedEvent], writer: &mut dyn Write) -> io::Result<()> {
    let mut out: Vec<Value> = Vec::new();
    let mut ts = 0_u64;

    for recorded in events {
        match recorded {
            RecordedEvent::TickBegin(e) => {
                ts = e.now.micros();
                let (ph, name) = if e.deferred {
                    ("i", "DeferredTick")
                } else {
                    ("B", "Tick")
                };
                out.push(json!({
                    "ph": ph,
                    "name": name,
                    "cat": "Scheduler",
                    "ts": ts,
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": {
                        "frame_index": e.frame_index,
                    }
                }));
            }
            RecordedEvent::Flush(e) => {
                out.push(json!({
                    "ph": "i",
                    "name": "Flush",
                    "cat": "Scheduler",
                    "ts": ts,
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "frame_index": e.frame_index,
                        "inserted": e.inserted,
                        "removed": e.removed,
                        "remove_finished": e.remove_finished,
                        "cancelled": e.cancelled,
                        "moved": e.moved,
                    }
                }));
            }
            RecordedEvent::ContainerLayout {
                frame_index,
                container,
                children,
                measured,
            } => {
                out.push(json!({
                    "ph": "i",
                    "name": format!("Layout {container}"),
                    "cat": "Layout",
                    "ts": ts,
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "frame_index": frame_index,
                        "children": children,
                        "measured": measured,
                    }
                }));
            }
            RecordedEvent::Transition {
                frame_index,
                container,
                child,
                from,
                to,
            } => {
                out.push(json!({
                    "ph": "i",
                    "name": to.name(),
                    "cat": "Transition",
                    "ts": ts,
                    "pid": 0,
                    "tid": 1,
                    "s": "t",
                    "args": {
                        "frame_index": frame_index,
                        "container": container.as_str(),
                        "child": child.as_str(),
                        "from": from.map(|s| s.name()),
                    }
                }));
            }
            RecordedEvent::ContainerFailure {
                frame_index,
                container,
                error,
            } => {
                out.push(json!({
                    "ph": "i",
                    "name": format!("Failure {container}"),
                    "cat": "Layout",
                    "ts": ts,
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "frame_index": frame_index,
                        "error": error,
                    }
                }));
            }
            RecordedEvent::EchoDropped {
                layout_id,
                connection_id,
                sub_type,
            } => {
                out.push(json!({
                    "ph": "i",
                    "name": "EchoDropped",
                    "cat": "Sync",
                    "ts": ts,
                    "pid": 0,
                    "tid": 2,
                    "s": "t",
                    "args": {
                        "layout_id": layout_id,
                        "connection_id": connection_id,
                        "sub_type": sub_type,
                    }
                }));
            }
            RecordedEvent::TickEnd(e) => {
                out.push(json!({
                    "ph": "E",
                    "name": "Tick",
                    "cat": "Scheduler",
                    "ts": e.now.micros(),
                    "pid": 0,
                    "tid": 0,
                    "args": {
                        "frame_index": e.frame_index,
                        "laid_out": e.laid_out,
                        "failures": e.failures,
                    }
                }));
            }
        }
    }

    serde_json::to_writer_pretty(writer, &out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use tableau_core::NodeId;
    use tableau_core::presence::PresenceState;
    use tableau_core::time::HostTime;
    use tableau_core::trace::{TickBeginEvent, TickEndEvent, TraceSink, TransitionEvent};

    use super::*;
    use crate::recorder::RecorderSink;

    #[test]
    fn export_produces_valid_json() {
        let mut rec = RecorderSink::new();
        let (stage, cam) = (NodeId::from("stage"), NodeId::from("cam"));
        rec.on_tick_begin(&TickBeginEvent {
            frame_index: 1,
            now: HostTime::from_millis(16),
            deferred: false,
        });
        rec.on_transition(&TransitionEvent {
            frame_index: 1,
            container: &stage,
            child: &cam,
            from: None,
            to: PresenceState::Entering,
        });
        rec.on_tick_end(&TickEndEvent {
            frame_index: 1,
            now: HostTime::from_millis(16),
            laid_out: 1,
            failures: 0,
        });

        let mut out = Vec::new();
        export(rec.events(), &mut out).unwrap();
        let parsed: Vec<Value> = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed.len(), 3);

        assert_eq!(parsed[0]["ph"], "B");
        assert_eq!(parsed[0]["ts"], 16_000);

        assert_eq!(parsed[1]["name"], "entering");
        assert_eq!(parsed[1]["ts"], 16_000, "inherits the tick's time");
        assert_eq!(parsed[1]["args"]["from"], Value::Null);

        assert_eq!(parsed[2]["ph"], "E");
        assert_eq!(parsed[2]["args"]["laid_out"], 1);
    }

    #[test]
    fn export_empty_recording() {
        let mut out = Vec::new();
        export(&[], &mut out).unwrap();
        let parsed: Vec<Value> = serde_json::from_slice(&out).unwrap();
        assert!(parsed.is_empty());
    }
}
