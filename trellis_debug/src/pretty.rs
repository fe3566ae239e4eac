// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Each line
//! starts with the microseconds elapsed since the sink was created.

use std::io::Write;
use std::time::Instant;

use trellis_core::trace::{
    CommandEvent, CompleteEvent, PhaseBeginEvent, PhaseEndEvent, RejectedEvent, SubmitEvent,
    TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write + Send>> {
    writer: W,
    origin: Instant,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("origin", &self.origin)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(Box::new(std::io::stderr()))
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self::with_writer(writer)
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self {
            writer,
            origin: Instant::now(),
        }
    }

    /// Consumes the sink and returns its writer.
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn elapsed_us(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1_000_000.0
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        let at = self.elapsed_us();
        let _ = writeln!(
            self.writer,
            "{at:>10.1}µs [phase:begin] seq={} {}",
            e.sequence,
            e.phase.name(),
        );
    }

    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        let at = self.elapsed_us();
        let _ = writeln!(
            self.writer,
            "{at:>10.1}µs [phase:end] seq={} {}",
            e.sequence,
            e.phase.name(),
        );
    }

    fn on_submit(&mut self, e: &SubmitEvent) {
        let at = self.elapsed_us();
        let _ = writeln!(
            self.writer,
            "{at:>10.1}µs [submit] seq={} commands={} parameters={}",
            e.sequence, e.commands, e.parameters,
        );
    }

    fn on_complete(&mut self, e: &CompleteEvent) {
        let at = self.elapsed_us();
        let status = if e.failed { " FAILED" } else { "" };
        let _ = writeln!(
            self.writer,
            "{at:>10.1}µs [complete] seq={} instances={}{status}",
            e.sequence, e.instances,
        );
    }

    fn on_rejected(&mut self, e: &RejectedEvent) {
        let at = self.elapsed_us();
        let _ = writeln!(
            self.writer,
            "{at:>10.1}µs [rejected] outstanding={} queued={}",
            e.outstanding, e.queued,
        );
    }

    fn on_command(&mut self, e: &CommandEvent) {
        let at = self.elapsed_us();
        let _ = match e.subject {
            Some(id) => writeln!(
                self.writer,
                "{at:>10.1}µs [command] seq={} #{} {} {id:?}",
                e.sequence,
                e.index,
                e.kind.name(),
            ),
            None => writeln!(
                self.writer,
                "{at:>10.1}µs [command] seq={} #{} {}",
                e.sequence,
                e.index,
                e.kind.name(),
            ),
        };
    }
}
