// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Device contract for compute backends.
//!
//! Trellis splits device-specific work into *backend* crates. Each backend
//! provides the following pieces:
//!
//! - **Device**: Implements [`Device`]. It keeps its own copy of the graph,
//!   replays each [`Transaction`] into it in order, and evaluates the
//!   outputs the transaction's features ask for.
//!
//! - **Fence**: Implements [`Fence`]. One fence is handed out per
//!   transaction and yields that transaction's [`OutputData`].
//!
//! - **Buffers**: Implements [`BufferResource`] for its memory and wraps it
//!   in [`Buffer`] handles.
//!
//! # Crate boundaries
//!
//! `trellis_core` owns the data model, the command queue, the engine, and
//! this contract module. Backend crates depend on `trellis_core` and provide
//! the evaluation. Application code depends on both and wires them together
//! through [`Engine`].
//!
//! [`Buffer`]: crate::buffer::Buffer
//! [`BufferResource`]: crate::buffer::BufferResource
//! [`Engine`]: crate::engine::Engine

use crate::command::Transaction;
use crate::error::DeviceError;
use crate::output::OutputData;

/// Executes transactions against a device-side copy of the graph.
///
/// Transactions arrive in sequence order and must be applied in that order.
/// Parameter state set by one transaction persists into the next.
///
/// # Compute loop pseudocode
///
/// A typical application frame drives an engine like this:
///
/// ```rust,ignore
/// fn on_frame(engine: &mut Engine<impl Device>, t: f32) {
///     // Edit: every call is recorded and visible immediately.
///     engine.update_node_data(planet, NodeData::output(orbit(t)))?;
///     engine.set_compute_parameter(ComputeParameter::CpuCamera(camera))?;
///
///     // Submit: one transaction crosses to the device.
///     engine.compute(false)?;
///
///     // ... other work ...
///
///     // Harvest: block until the device signals, then read.
///     engine.finish()?;
///     let matrices = engine.output()?.unwrap().matrices()?;
/// }
/// ```
pub trait Device {
    /// Completion handle returned by [`submit`](Self::submit).
    type Fence: Fence;

    /// Hands a transaction to the device.
    ///
    /// Errors returned here mean the transaction was not accepted, and its
    /// commands are gone with it. Failures discovered while executing are
    /// reported by [`Fence::wait`].
    fn submit(&mut self, transaction: Transaction) -> Result<Self::Fence, DeviceError>;
}

/// Completion handle for one submitted transaction.
pub trait Fence {
    /// Returns whether the transaction completed (successfully or not).
    ///
    /// Never blocks.
    fn is_signaled(&self) -> bool;

    /// Blocks until the transaction completes and returns its outputs.
    fn wait(self) -> Result<OutputData, DeviceError>;
}
