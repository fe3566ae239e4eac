// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the compute lifecycle.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! [`Engine`](crate::engine::Engine) calls as transactions are drained,
//! submitted, and harvested. All method bodies default to no-ops, so
//! implementing only the events you care about is fine.
//!
//! The engine never calls a sink directly; it goes through [`Tracer`], which
//! holds an optional `&mut dyn TraceSink`. Without the `trace` feature the
//! `Tracer` methods have empty bodies and the call sites optimize away.
//! With it, each call costs one `Option` check.
//!
//! Events carry no timestamps; `trellis_core` has no clock. Sinks that need
//! time stamp events on arrival.
//!
//! # Crate features
//!
//! - `trace`: enables the `Tracer` method bodies (one branch per call).
//! - `trace-rich` (implies `trace`): gates per-command [`CommandEvent`]s
//!   plus the corresponding `TraceSink` method.

#[cfg(feature = "trace-rich")]
use crate::command::CommandKind;
#[cfg(feature = "trace-rich")]
use crate::node::NodeId;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which phase of the compute lifecycle is being measured.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PhaseKind {
    /// Draining the queue into a transaction.
    Drain,
    /// Handing the transaction to the device.
    Submit,
    /// Blocking on the device fence.
    Wait,
}

impl PhaseKind {
    /// Short lowercase name for logs and traces.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Drain => "drain",
            Self::Submit => "submit",
            Self::Wait => "wait",
        }
    }
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Marks the beginning of a lifecycle phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhaseBeginEvent {
    /// Transaction the phase belongs to.
    pub sequence: u64,
    /// Which phase is starting.
    pub phase: PhaseKind,
}

/// Marks the end of a lifecycle phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhaseEndEvent {
    /// Transaction the phase belongs to.
    pub sequence: u64,
    /// Which phase is ending.
    pub phase: PhaseKind,
}

/// Emitted when a transaction has been accepted by the device.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubmitEvent {
    /// Transaction sequence number.
    pub sequence: u64,
    /// Number of commands, parameter commands included.
    pub commands: usize,
    /// Number of parameter commands.
    pub parameters: usize,
}

/// Emitted when a transaction's fence has been harvested.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompleteEvent {
    /// Transaction sequence number.
    pub sequence: u64,
    /// Number of matrices produced (0 on failure).
    pub instances: usize,
    /// Whether the device reported an error.
    pub failed: bool,
}

/// Emitted when a compute request is refused because an earlier transaction
/// is still running.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RejectedEvent {
    /// Sequence number of the outstanding transaction.
    pub outstanding: u64,
    /// Commands left queued for a later request.
    pub queued: usize,
}

/// One command of a submitted transaction.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CommandEvent {
    /// Transaction sequence number.
    pub sequence: u64,
    /// Position within the transaction.
    pub index: usize,
    /// Command discriminant.
    pub kind: CommandKind,
    /// The node the command is about, if any.
    pub subject: Option<NodeId>,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the compute lifecycle.
///
/// Every method defaults to a no-op.
pub trait TraceSink {
    /// Called at the beginning of a lifecycle phase.
    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        _ = e;
    }

    /// Called at the end of a lifecycle phase.
    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        _ = e;
    }

    /// Called when a transaction is submitted.
    fn on_submit(&mut self, e: &SubmitEvent) {
        _ = e;
    }

    /// Called when a transaction completes.
    fn on_complete(&mut self, e: &CompleteEvent) {
        _ = e;
    }

    /// Called when a compute request is refused.
    fn on_rejected(&mut self, e: &RejectedEvent) {
        _ = e;
    }

    /// Called once per submitted command (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    fn on_command(&mut self, e: &CommandEvent) {
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

/// Dispatches events to a sink, if there is one.
///
/// Built without the `trace` feature, a `Tracer` holds no sink at all and
/// every method is empty.
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

    /// Emits a [`PhaseBeginEvent`].
    #[inline]
    pub fn phase_begin(&mut self, sequence: u64, phase: PhaseKind) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_phase_begin(&PhaseBeginEvent { sequence, phase });
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = (sequence, phase);
        }
    }

    /// Emits a [`PhaseEndEvent`].
    #[inline]
    pub fn phase_end(&mut self, sequence: u64, phase: PhaseKind) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_phase_end(&PhaseEndEvent { sequence, phase });
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = (sequence, phase);
        }
    }

    /// Emits a [`SubmitEvent`].
    #[inline]
    pub fn submit(&mut self, e: &SubmitEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_submit(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`CompleteEvent`].
    #[inline]
    pub fn complete(&mut self, e: &CompleteEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_complete(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`RejectedEvent`].
    #[inline]
    pub fn rejected(&mut self, e: &RejectedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_rejected(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`CommandEvent`] (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn command(&mut self, e: &CommandEvent) {
        if let Some(s) = &mut self.sink {
            s.on_command(e);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
