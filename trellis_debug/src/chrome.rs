// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][spec] JSON to the given writer.
//!
//! [spec]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use crate::recorder::{Record, RecordedEvent, decode};

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
/// Compute phases become duration slices; everything else becomes an
/// instant event.
pub fn export(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
    let events: Vec<Value> = decode(bytes).map(to_json).collect();
    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

fn to_json(Record { at_us, event }: Record) -> Value {
    match event {
        RecordedEvent::PhaseBegin(e) => json!({
            "ph": "B",
            "name": e.phase.name(),
            "cat": "Compute",
            "ts": at_us,
            "pid": 0,
            "tid": 0,
            "args": {
                "sequence": e.sequence,
            }
        }),
        RecordedEvent::PhaseEnd(e) => json!({
            "ph": "E",
            "name": e.phase.name(),
            "cat": "Compute",
            "ts": at_us,
            "pid": 0,
            "tid": 0,
            "args": {
                "sequence": e.sequence,
            }
        }),
        RecordedEvent::Submit(e) => json!({
            "ph": "i",
            "name": "Submit",
            "cat": "Compute",
            "ts": at_us,
            "pid": 0,
            "tid": 0,
            "s": "t",
            "args": {
                "sequence": e.sequence,
                "commands": e.commands,
                "parameters": e.parameters,
            }
        }),
        RecordedEvent::Complete(e) => json!({
            "ph": "i",
            "name": "Complete",
            "cat": "Compute",
            "ts": at_us,
            "pid": 0,
            "tid": 0,
            "s": "t",
            "args": {
                "sequence": e.sequence,
                "instances": e.instances,
                "failed": e.failed,
            }
        }),
        RecordedEvent::Rejected(e) => json!({
            "ph": "i",
            "name": "Rejected",
            "cat": "Compute",
            "ts": at_us,
            "pid": 0,
            "tid": 0,
            "s": "t",
            "args": {
                "outstanding": e.outstanding,
                "queued": e.queued,
            }
        }),
        RecordedEvent::Command(e) => json!({
            "ph": "i",
            "name": e.kind.name(),
            "cat": "Rich",
            "ts": at_us,
            "pid": 0,
            "tid": 0,
            "s": "p",
            "args": {
                "sequence": e.sequence,
                "index": e.index,
                "subject": e.subject.map(|id| id.to_raw()),
            }
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::RecorderSink;
    use trellis_core::command::CommandKind;
    use trellis_core::trace::{
        CommandEvent, CompleteEvent, PhaseBeginEvent, PhaseEndEvent, PhaseKind, SubmitEvent,
        TraceSink,
    };

    fn exported(rec: &RecorderSink) -> Vec<Value> {
        let mut out = Vec::new();
        export(rec.as_bytes(), &mut out).unwrap();
        serde_json::from_slice(&out).unwrap()
    }

    #[test]
    fn export_produces_valid_json() {
        let mut rec = RecorderSink::new();
        rec.on_phase_begin(&PhaseBeginEvent {
            sequence: 1,
            phase: PhaseKind::Submit,
        });
        rec.on_submit(&SubmitEvent {
            sequence: 1,
            commands: 4,
            parameters: 0,
        });
        rec.on_phase_end(&PhaseEndEvent {
            sequence: 1,
            phase: PhaseKind::Submit,
        });

        let parsed = exported(&rec);
        assert_eq!(parsed.len(), 3);

        assert_eq!(parsed[0]["ph"], "B");
        assert_eq!(parsed[0]["name"], "submit");

        assert_eq!(parsed[1]["ph"], "i");
        assert_eq!(parsed[1]["name"], "Submit");
        assert_eq!(parsed[1]["args"]["commands"], 4);

        assert_eq!(parsed[2]["ph"], "E");
        assert_eq!(parsed[2]["name"], "submit");
        assert!(parsed[0]["ts"].as_u64() <= parsed[2]["ts"].as_u64());
    }

    #[test]
    fn failed_completion_and_commands_carry_args() {
        let mut rec = RecorderSink::new();
        rec.on_command(&CommandEvent {
            sequence: 2,
            index: 0,
            kind: CommandKind::SetComputeParameter,
            subject: None,
        });
        rec.on_complete(&CompleteEvent {
            sequence: 2,
            instances: 0,
            failed: true,
        });

        let parsed = exported(&rec);
        assert_eq!(parsed[0]["name"], "set_compute_parameter");
        assert_eq!(parsed[0]["cat"], "Rich");
        assert!(parsed[0]["args"]["subject"].is_null());
        assert_eq!(parsed[1]["args"]["failed"], true);
    }

    #[test]
    fn export_empty_recording() {
        let mut out = Vec::new();
        export(&[], &mut out).unwrap();
        let parsed: Vec<Value> = serde_json::from_slice(&out).unwrap();
        assert!(parsed.is_empty());
    }
}
