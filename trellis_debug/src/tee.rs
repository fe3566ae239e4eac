// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sink combinators.
//!
//! An engine holds a single boxed sink. [`Tee`] fans events out to two
//! sinks, and [`SharedRecorder`] keeps a handle to a recording after the
//! sink has been handed to the engine.

use std::sync::Arc;

use parking_lot::Mutex;
use trellis_core::trace::{
    CommandEvent, CompleteEvent, PhaseBeginEvent, PhaseEndEvent, RejectedEvent, SubmitEvent,
    TraceSink,
};

use crate::recorder::RecorderSink;

/// Forwards every event to `A`, then to `B`.
#[derive(Clone, Debug, Default)]
pub struct Tee<A, B>(pub A, pub B);

impl<A: TraceSink, B: TraceSink> TraceSink for Tee<A, B> {
    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        self.0.on_phase_begin(e);
        self.1.on_phase_begin(e);
    }

    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        self.0.on_phase_end(e);
        self.1.on_phase_end(e);
    }

    fn on_submit(&mut self, e: &SubmitEvent) {
        self.0.on_submit(e);
        self.1.on_submit(e);
    }

    fn on_complete(&mut self, e: &CompleteEvent) {
        self.0.on_complete(e);
        self.1.on_complete(e);
    }

    fn on_rejected(&mut self, e: &RejectedEvent) {
        self.0.on_rejected(e);
        self.1.on_rejected(e);
    }

    fn on_command(&mut self, e: &CommandEvent) {
        self.0.on_command(e);
        self.1.on_command(e);
    }
}

/// A cloneable handle to one [`RecorderSink`].
///
/// Give one clone to the engine and keep another to read the bytes.
#[derive(Clone, Debug, Default)]
pub struct SharedRecorder(Arc<Mutex<RecorderSink>>);

impl SharedRecorder {
    /// Creates a handle to a fresh recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies out everything recorded so far.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        self.0.lock().as_bytes().to_vec()
    }
}

impl TraceSink for SharedRecorder {
    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        self.0.lock().on_phase_begin(e);
    }

    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        self.0.lock().on_phase_end(e);
    }

    fn on_submit(&mut self, e: &SubmitEvent) {
        self.0.lock().on_submit(e);
    }

    fn on_complete(&mut self, e: &CompleteEvent) {
        self.0.lock().on_complete(e);
    }

    fn on_rejected(&mut self, e: &RejectedEvent) {
        self.0.lock().on_rejected(e);
    }

    fn on_command(&mut self, e: &CommandEvent) {
        self.0.lock().on_command(e);
    }
}
