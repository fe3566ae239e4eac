// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reference CPU device for `trellis_core`.
//!
//! [`CpuDevice`] implements [`Device`](trellis_core::backend::Device) by
//! replaying every transaction into its own
//! [`NodeStore`](trellis_core::node::NodeStore) and evaluating outputs on the
//! CPU:
//!
//! - **Matrices**: one world matrix per output instance, in depth-first
//!   pre-order from the master root.
//! - **Culling** (with `FrustumCulling`): instances whose bounding box lies
//!   outside the camera's clip volume are dropped. The GPU camera parameter
//!   wins over the CPU camera. Culling never prunes descendants.
//! - **User ids** (with `UserIds`): matrices are grouped by ascending tag,
//!   untagged instances last, with matching offset and tag buffers.
//!
//! All buffers it produces are host-visible, so
//! [`Buffer::read_matrices`](trellis_core::buffer::Buffer::read_matrices)
//! and friends work on them directly.
//!
//! Worker lifecycle and per-transaction statistics are logged through
//! `tracing`.

mod device;
mod frustum;
mod kernel;

pub use device::{CpuDevice, CpuFence};
pub use kernel::{DeviceState, ExecStats};
