// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bridge from engine trace events to the `tracing` ecosystem.
//!
//! [`TracingSink`] turns every event into a structured `tracing` record
//! under the `trellis` target, so engine activity lands in whatever
//! subscriber the application installed. Phases and commands log at
//! `TRACE`, transaction lifecycle at `DEBUG`, and rejections and failed
//! transactions at `WARN`.

use trellis_core::trace::{
    CommandEvent, CompleteEvent, PhaseBeginEvent, PhaseEndEvent, RejectedEvent, SubmitEvent,
    TraceSink,
};

/// A [`TraceSink`] that forwards events to `tracing`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl TraceSink for TracingSink {
    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        tracing::trace!(target: "trellis", sequence = e.sequence, phase = e.phase.name(), "phase begin");
    }

    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        tracing::trace!(target: "trellis", sequence = e.sequence, phase = e.phase.name(), "phase end");
    }

    fn on_submit(&mut self, e: &SubmitEvent) {
        tracing::debug!(
            target: "trellis",
            sequence = e.sequence,
            commands = e.commands,
            parameters = e.parameters,
            "transaction submitted"
        );
    }

    fn on_complete(&mut self, e: &CompleteEvent) {
        if e.failed {
            tracing::warn!(target: "trellis", sequence = e.sequence, "transaction failed");
        } else {
            tracing::debug!(
                target: "trellis",
                sequence = e.sequence,
                instances = e.instances,
                "transaction complete"
            );
        }
    }

    fn on_rejected(&mut self, e: &RejectedEvent) {
        tracing::warn!(
            target: "trellis",
            outstanding = e.outstanding,
            queued = e.queued,
            "compute rejected while a transaction is in flight"
        );
    }

    fn on_command(&mut self, e: &CommandEvent) {
        tracing::trace!(
            target: "trellis",
            sequence = e.sequence,
            index = e.index,
            kind = e.kind.name(),
            subject = ?e.subject,
            "command"
        );
    }
}

#[cfg(test)]
mod tests {
    use std::io::{self, Write};
    use std::sync::{Arc, Mutex};

    use super::*;

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn captured(level: tracing::Level, f: impl FnOnce(&mut TracingSink)) -> String {
        let capture = Capture::default();
        let writer = capture.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(level)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, || f(&mut TracingSink));
        let bytes = capture.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn submit_logs_structured_fields() {
        let output = captured(tracing::Level::DEBUG, |s| {
            s.on_submit(&SubmitEvent {
                sequence: 8,
                commands: 3,
                parameters: 1,
            });
        });
        assert!(output.contains("transaction submitted"), "got: {output}");
        assert!(output.contains("sequence=8"), "got: {output}");
        assert!(output.contains("commands=3"), "got: {output}");
    }

    #[test]
    fn failures_log_at_warn() {
        let output = captured(tracing::Level::WARN, |s| {
            s.on_complete(&CompleteEvent {
                sequence: 2,
                instances: 5,
                failed: false,
            });
            s.on_complete(&CompleteEvent {
                sequence: 3,
                instances: 0,
                failed: true,
            });
        });
        assert!(!output.contains("sequence=2"), "got: {output}");
        assert!(output.contains("transaction failed"), "got: {output}");
        assert!(output.contains("WARN"), "got: {output}");
    }
}
