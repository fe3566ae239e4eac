// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording, pretty-printing, and Chrome trace export for trellis
//! diagnostics.
//!
//! This crate provides [`TraceSink`](trellis_core::trace::TraceSink)
//! implementations for development and post-mortem analysis:
//!
//! - [`pretty::PrettyPrintSink`]: human-readable one-line-per-event output.
//! - [`recorder::RecorderSink`]: compact binary recording with
//!   [`recorder::decode`] for playback.
//! - [`chrome::export`]: writes Chrome Trace Event Format JSON from recorded
//!   bytes.
//! - [`tracing_sink::TracingSink`]: forwards events to the `tracing` crate.
//! - [`tee::Tee`] and [`tee::SharedRecorder`]: fan-out and a recording
//!   handle that outlives the engine's ownership of its sink.
//!
//! `trellis_core` events carry no time. Every sink here stamps events with
//! the microseconds elapsed since the sink was created.

pub mod chrome;
pub mod pretty;
pub mod recorder;
pub mod tee;
pub mod tracing_sink;
