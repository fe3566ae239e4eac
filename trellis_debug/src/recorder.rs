// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as little-endian records, each prefixed by a tag byte and the
//! microseconds elapsed since the recorder was created. [`decode`] reads
//! them back as an iterator of [`Record`].

use std::time::Instant;

use trellis_core::command::CommandKind;
use trellis_core::node::NodeId;
use trellis_core::trace::{
    CommandEvent, CompleteEvent, PhaseBeginEvent, PhaseEndEvent, PhaseKind, RejectedEvent,
    SubmitEvent, TraceSink,
};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_PHASE_BEGIN: u8 = 1;
const TAG_PHASE_END: u8 = 2;
const TAG_SUBMIT: u8 = 3;
const TAG_COMPLETE: u8 = 4;
const TAG_REJECTED: u8 = 5;
const TAG_COMMAND: u8 = 6;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug)]
pub struct RecorderSink {
    buf: Vec<u8>,
    origin: Instant,
}

impl Default for RecorderSink {
    fn default() -> Self {
        Self::new()
    }
}

impl RecorderSink {
    /// Creates an empty recorder. Timestamps count from now.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::new(),
            origin: Instant::now(),
        }
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn begin(&mut self, tag: u8) {
        let at_us = u64::try_from(self.origin.elapsed().as_micros()).unwrap_or(u64::MAX);
        self.write_u8(tag);
        self.write_u64(at_us);
    }

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_count(&mut self, v: usize) {
        self.write_u64(u64::try_from(v).unwrap_or(u64::MAX));
    }

    fn write_option_node(&mut self, v: Option<NodeId>) {
        match v {
            Some(id) => {
                self.write_u8(1);
                self.write_u32(id.to_raw());
            }
            None => {
                self.write_u8(0);
                self.write_u32(0);
            }
        }
    }

    fn write_phase(&mut self, p: PhaseKind) {
        self.write_u8(match p {
            PhaseKind::Drain => 0,
            PhaseKind::Submit => 1,
            PhaseKind::Wait => 2,
        });
    }

    fn write_command_kind(&mut self, k: CommandKind) {
        self.write_u8(match k {
            CommandKind::CreateNode => 0,
            CommandKind::DeleteNode => 1,
            CommandKind::AppendChild => 2,
            CommandKind::PrependChild => 3,
            CommandKind::RemoveChildAt => 4,
            CommandKind::InsertChildAt => 5,
            CommandKind::UpdateNodeData => 6,
            CommandKind::SetComputeParameter => 7,
        });
    }
}

impl TraceSink for RecorderSink {
    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        self.begin(TAG_PHASE_BEGIN);
        self.write_u64(e.sequence);
        self.write_phase(e.phase);
    }

    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        self.begin(TAG_PHASE_END);
        self.write_u64(e.sequence);
        self.write_phase(e.phase);
    }

    fn on_submit(&mut self, e: &SubmitEvent) {
        self.begin(TAG_SUBMIT);
        self.write_u64(e.sequence);
        self.write_count(e.commands);
        self.write_count(e.parameters);
    }

    fn on_complete(&mut self, e: &CompleteEvent) {
        self.begin(TAG_COMPLETE);
        self.write_u64(e.sequence);
        self.write_count(e.instances);
        self.write_u8(u8::from(e.failed));
    }

    fn on_rejected(&mut self, e: &RejectedEvent) {
        self.begin(TAG_REJECTED);
        self.write_u64(e.outstanding);
        self.write_count(e.queued);
    }

    fn on_command(&mut self, e: &CommandEvent) {
        self.begin(TAG_COMMAND);
        self.write_u64(e.sequence);
        self.write_count(e.index);
        self.write_command_kind(e.kind);
        self.write_option_node(e.subject);
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordedEvent {
    /// A [`PhaseBeginEvent`].
    PhaseBegin(PhaseBeginEvent),
    /// A [`PhaseEndEvent`].
    PhaseEnd(PhaseEndEvent),
    /// A [`SubmitEvent`].
    Submit(SubmitEvent),
    /// A [`CompleteEvent`].
    Complete(CompleteEvent),
    /// A [`RejectedEvent`].
    Rejected(RejectedEvent),
    /// A [`CommandEvent`].
    Command(CommandEvent),
}

/// A decoded event and when it was recorded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Record {
    /// Microseconds since the recorder was created.
    pub at_us: u64,
    /// The event.
    pub event: RecordedEvent,
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`Record`].
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded records.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn read_u8(&mut self) -> Option<u8> {
        if self.remaining() < 1 {
            return None;
        }
        let v = self.data[self.pos];
        self.pos += 1;
        Some(v)
    }

    fn read_u32(&mut self) -> Option<u32> {
        if self.remaining() < 4 {
            return None;
        }
        let v = u32::from_le_bytes(self.data[self.pos..self.pos + 4].try_into().ok()?);
        self.pos += 4;
        Some(v)
    }

    fn read_u64(&mut self) -> Option<u64> {
        if self.remaining() < 8 {
            return None;
        }
        let v = u64::from_le_bytes(self.data[self.pos..self.pos + 8].try_into().ok()?);
        self.pos += 8;
        Some(v)
    }

    fn read_count(&mut self) -> Option<usize> {
        Some(usize::try_from(self.read_u64()?).unwrap_or(usize::MAX))
    }

    fn read_option_node(&mut self) -> Option<Option<NodeId>> {
        let present = self.read_u8()?;
        let raw = self.read_u32()?;
        Some((present != 0).then(|| NodeId::from_raw(raw)))
    }

    fn read_phase(&mut self) -> Option<PhaseKind> {
        Some(match self.read_u8()? {
            0 => PhaseKind::Drain,
            1 => PhaseKind::Submit,
            _ => PhaseKind::Wait,
        })
    }

    fn read_command_kind(&mut self) -> Option<CommandKind> {
        Some(match self.read_u8()? {
            0 => CommandKind::CreateNode,
            1 => CommandKind::DeleteNode,
            2 => CommandKind::AppendChild,
            3 => CommandKind::PrependChild,
            4 => CommandKind::RemoveChildAt,
            5 => CommandKind::InsertChildAt,
            6 => CommandKind::UpdateNodeData,
            7 => CommandKind::SetComputeParameter,
            _ => return None,
        })
    }

    fn decode_phase_begin(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::PhaseBegin(PhaseBeginEvent {
            sequence: self.read_u64()?,
            phase: self.read_phase()?,
        }))
    }

    fn decode_phase_end(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::PhaseEnd(PhaseEndEvent {
            sequence: self.read_u64()?,
            phase: self.read_phase()?,
        }))
    }

    fn decode_submit(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Submit(SubmitEvent {
            sequence: self.read_u64()?,
            commands: self.read_count()?,
            parameters: self.read_count()?,
        }))
    }

    fn decode_complete(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Complete(CompleteEvent {
            sequence: self.read_u64()?,
            instances: self.read_count()?,
            failed: self.read_u8()? != 0,
        }))
    }

    fn decode_rejected(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Rejected(RejectedEvent {
            outstanding: self.read_u64()?,
            queued: self.read_count()?,
        }))
    }

    fn decode_command(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Command(CommandEvent {
            sequence: self.read_u64()?,
            index: self.read_count()?,
            kind: self.read_command_kind()?,
            subject: self.read_option_node()?,
        }))
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = Record;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        let at_us = self.read_u64()?;
        let event = match tag {
            TAG_PHASE_BEGIN => self.decode_phase_begin(),
            TAG_PHASE_END => self.decode_phase_end(),
            TAG_SUBMIT => self.decode_submit(),
            TAG_COMPLETE => self.decode_complete(),
            TAG_REJECTED => self.decode_rejected(),
            TAG_COMMAND => self.decode_command(),
            _ => None, // unknown tag → stop iteration
        }?;
        Some(Record { at_us, event })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
