// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node graph, command batching, and device contract for batched
//! scene-graph transforms.
//!
//! `trellis_core` manages a directed acyclic graph of transform nodes on the
//! host and hands its evaluation to a device. It is `no_std` compatible
//! (with `alloc`) and stores nodes in struct-of-arrays layout indexed by id.
//!
//! # Architecture
//!
//! Every edit is applied to a host copy of the graph immediately and recorded
//! as a command. One `compute` call moves all recorded commands to the
//! device in a single transaction:
//!
//! ```text
//!   Engine::append_child(..) ──► NodeStore (host)    ──► reads
//!            │
//!            └────────────────► CommandQueue
//!                                    │ compute()
//!                                    ▼
//!                               Transaction ──► Device::submit() ──► Fence
//!                                                                      │
//!   Engine::output() ◄── OutputData ◄── Fence::wait() ◄── finish() ◄───┘
//! ```
//!
//! **[`node`]**: Node identity, attributes, and the struct-of-arrays
//! [`NodeStore`](node::NodeStore) with ordered parent and child lists.
//! Nodes may have several parents; traversal visits one *instance* per path
//! from the master root.
//!
//! **[`command`]**: The recorded edit log and the transactions it is
//! drained into.
//!
//! **[`engine`]**: The [`Engine`](engine::Engine) façade and the compute
//! lifecycle (`compute`, `is_finished`, `finish`).
//!
//! **[`backend`]**: The [`Device`](backend::Device) and
//! [`Fence`](backend::Fence) traits that compute backends implement.
//!
//! **[`buffer`]**: Shared handles to device memory.
//!
//! **[`parameter`]** / **[`output`]**: Per-pass inputs (cameras) and
//! per-transaction results (matrices, user-id groups).
//!
//! **[`config`]**: Feature gating and overlap policy, fixed at construction.
//!
//! **[`transform`]**: Column-major 4×4 matrix type.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! lifecycle instrumentation, with zero-overhead [`Tracer`](trace::Tracer)
//! wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Gates per-command
//!   events.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub mod backend;
pub mod buffer;
pub mod command;
pub mod config;
pub mod engine;
pub mod error;
pub mod node;
pub mod output;
pub mod parameter;
pub mod trace;
pub mod transform;

pub use error::{DeviceError, Error, Result};
