// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared handles to device memory.
//!
//! A [`Buffer`] is a reference-counted handle to a [`BufferResource`] that a
//! device allocated. Output attributes, compute parameters, and the device's
//! own bookkeeping may all hold the same buffer; the resource is released when
//! the last handle is dropped.
//!
//! Resources that live in host memory expose their bytes through
//! [`BufferResource::host_bytes`], which enables the typed readers on
//! [`Buffer`]. Device-only resources return `None` and must be read back
//! through their backend.

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;
use core::mem::size_of;

use bytemuck::{AnyBitPattern, NoUninit};

use crate::transform::Matrix4;

/// Backend-owned memory behind a [`Buffer`].
///
/// Implementations release their device allocation in `Drop`.
pub trait BufferResource: fmt::Debug + Send + Sync {
    /// Size of the allocation in bytes.
    fn byte_len(&self) -> usize;

    /// The contents, if the resource is host-visible.
    fn host_bytes(&self) -> Option<&[u8]> {
        None
    }
}

/// A shared handle to device memory.
#[derive(Clone)]
pub struct Buffer {
    resource: Arc<dyn BufferResource>,
}

impl Buffer {
    /// Wraps a resource in a new handle.
    #[must_use]
    pub fn new<R: BufferResource + 'static>(resource: R) -> Self {
        Self {
            resource: Arc::new(resource),
        }
    }

    /// Wraps an already shared resource.
    #[must_use]
    pub fn from_arc(resource: Arc<dyn BufferResource>) -> Self {
        Self { resource }
    }

    /// Copies plain-old-data into a new host-visible buffer.
    #[must_use]
    pub fn from_pod<T: NoUninit>(data: &[T]) -> Self {
        Self::new(HostBuffer::from_pod(data))
    }

    /// Size of the allocation in bytes.
    #[must_use]
    pub fn byte_len(&self) -> usize {
        self.resource.byte_len()
    }

    /// The contents, if the resource is host-visible.
    #[must_use]
    pub fn host_bytes(&self) -> Option<&[u8]> {
        self.resource.host_bytes()
    }

    /// The underlying resource.
    #[must_use]
    pub fn resource(&self) -> &dyn BufferResource {
        &*self.resource
    }

    /// Number of live handles sharing the resource.
    #[must_use]
    pub fn holder_count(&self) -> usize {
        Arc::strong_count(&self.resource)
    }

    /// Returns whether both handles share one resource.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.resource, &other.resource)
    }

    /// Reads the contents as a sequence of `T`.
    ///
    /// Returns `None` if the resource is not host-visible or its length is not
    /// a multiple of `size_of::<T>()`.
    #[must_use]
    pub fn read_pod<T: AnyBitPattern>(&self) -> Option<Vec<T>> {
        let bytes = self.host_bytes()?;
        let stride = size_of::<T>();
        if stride == 0 || bytes.len() % stride != 0 {
            return None;
        }
        Some(
            bytes
                .chunks_exact(stride)
                .map(bytemuck::pod_read_unaligned)
                .collect(),
        )
    }

    /// Reads the contents as column-major matrices.
    #[must_use]
    pub fn read_matrices(&self) -> Option<Vec<Matrix4>> {
        self.read_pod()
    }

    /// Reads the contents as `u32` words.
    #[must_use]
    pub fn read_u32s(&self) -> Option<Vec<u32>> {
        self.read_pod()
    }
}

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("byte_len", &self.byte_len())
            .field("holders", &self.holder_count())
            .field("host_visible", &self.host_bytes().is_some())
            .finish()
    }
}

/// A host-memory [`BufferResource`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HostBuffer {
    bytes: Vec<u8>,
}

impl HostBuffer {
    /// Takes ownership of raw bytes.
    #[must_use]
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Copies plain-old-data into a new buffer.
    #[must_use]
    pub fn from_pod<T: NoUninit>(data: &[T]) -> Self {
        Self {
            bytes: bytemuck::cast_slice(data).to_vec(),
        }
    }
}

impl BufferResource for HostBuffer {
    fn byte_len(&self) -> usize {
        self.bytes.len()
    }

    fn host_bytes(&self) -> Option<&[u8]> {
        Some(&self.bytes)
    }
}
