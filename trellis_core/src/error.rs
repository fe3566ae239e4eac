// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error taxonomy for graph edits, compute lifecycle, and device failures.

use alloc::string::String;

use crate::config::Feature;
use crate::node::NodeId;
use crate::output::OutputAttributeKind;

/// Convenience result type used across `trellis_core`.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Caller-visible failures.
///
/// Every variant is reported synchronously by the call that triggered it. A
/// failed graph edit records no command and leaves the host mirror unchanged.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The id is unknown, was deleted, or is the master root in a position
    /// where a real node is required.
    #[error("invalid node {0:?}")]
    InvalidNode(NodeId),

    /// An index was past the end of a child or parent list.
    #[error("index {index} out of range (len {len})")]
    OutOfRange {
        /// The requested index.
        index: usize,
        /// The current list length.
        len: usize,
    },

    /// An attribute or parameter needs a feature that was not enabled when
    /// the engine was constructed.
    #[error("feature {0:?} is not enabled")]
    FeatureNotEnabled(Feature),

    /// A compute was requested while an earlier transaction is still running.
    #[error("transaction {sequence} is still in flight")]
    ComputeInProgress {
        /// Sequence number of the outstanding transaction.
        sequence: u64,
    },

    /// The requested output attribute was not produced by this transaction.
    #[error("output attribute {0:?} was not produced")]
    UnknownOutputType(OutputAttributeKind),

    /// Adding the edge would make the graph cyclic.
    #[error("edge {target:?} -> {child:?} would create a cycle")]
    CycleDetected {
        /// The node that would become a child.
        child: NodeId,
        /// The node that would become its parent.
        target: NodeId,
    },

    /// The device failed the outstanding transaction.
    #[error(transparent)]
    Device(#[from] DeviceError),
}

/// Failures reported by a [`Device`](crate::backend::Device).
///
/// A device error is fatal to the transaction it belongs to only; the engine
/// returns to idle and the previous output stays readable.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DeviceError {
    /// The device (or its worker) is gone.
    #[error("device lost")]
    Lost,

    /// The device could not replay a command.
    #[error("transaction {sequence}: command {index} rejected: {reason}")]
    InvalidCommand {
        /// Sequence number of the failing transaction.
        sequence: u64,
        /// Position of the command within the transaction.
        index: usize,
        /// Human-readable reason.
        reason: String,
    },

    /// Any other backend failure.
    #[error("device failure: {0}")]
    Other(String),
}

impl DeviceError {
    /// Build a [`DeviceError::Other`] value.
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}
