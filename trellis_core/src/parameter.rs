// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Global inputs to a compute pass.

use alloc::collections::BTreeMap;

use crate::buffer::Buffer;
use crate::config::Feature;
use crate::transform::Matrix4;

/// Discriminant of a [`ComputeParameter`].
///
/// The declaration order is the order in which staged parameters are
/// appended to a transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ComputeParameterKind {
    /// A camera matrix supplied from host memory.
    CpuCamera,
    /// A camera matrix already resident in a device buffer.
    GpuCamera,
}

impl ComputeParameterKind {
    /// The feature an engine must enable to accept this parameter.
    #[must_use]
    pub const fn required_feature(self) -> Option<Feature> {
        match self {
            Self::CpuCamera | Self::GpuCamera => Some(Feature::FrustumCulling),
        }
    }
}

/// A value that applies to a whole compute pass rather than to one node.
#[derive(Clone, Debug)]
pub enum ComputeParameter {
    /// Camera (view-projection) matrix used for frustum culling.
    CpuCamera(Matrix4),
    /// Buffer holding one column-major camera matrix.
    ///
    /// A device keeps one camera: applying either camera kind replaces the
    /// other.
    GpuCamera(Buffer),
}

impl ComputeParameter {
    /// Returns the discriminant.
    #[must_use]
    pub const fn kind(&self) -> ComputeParameterKind {
        match self {
            Self::CpuCamera(_) => ComputeParameterKind::CpuCamera,
            Self::GpuCamera(_) => ComputeParameterKind::GpuCamera,
        }
    }
}

impl PartialEq for ComputeParameter {
    /// Buffers compare by identity, not contents.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::CpuCamera(a), Self::CpuCamera(b)) => a == b,
            (Self::GpuCamera(a), Self::GpuCamera(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

/// At most one [`ComputeParameter`] per kind, ordered by kind.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParameterSet {
    values: BTreeMap<ComputeParameterKind, ComputeParameter>,
}

impl ParameterSet {
    /// Creates an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }

    /// Stores `param`, returning the value of the same kind it replaced.
    pub fn set(&mut self, param: ComputeParameter) -> Option<ComputeParameter> {
        self.values.insert(param.kind(), param)
    }

    /// The value of the given kind.
    #[must_use]
    pub fn get(&self, kind: ComputeParameterKind) -> Option<&ComputeParameter> {
        self.values.get(&kind)
    }

    /// Removes and returns the value of the given kind.
    pub fn remove(&mut self, kind: ComputeParameterKind) -> Option<ComputeParameter> {
        self.values.remove(&kind)
    }

    /// Number of kinds with a value.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns whether no value is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Empties the set, yielding its values in kind order.
    pub fn drain(&mut self) -> impl Iterator<Item = ComputeParameter> + use<> {
        core::mem::take(&mut self.values).into_values()
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;

    #[test]
    fn later_values_overwrite_earlier() {
        let mut set = ParameterSet::new();
        let first = Matrix4::from_scale(2.0, 2.0, 2.0);
        assert!(set.set(ComputeParameter::CpuCamera(first)).is_none());
        let replaced = set.set(ComputeParameter::CpuCamera(Matrix4::IDENTITY));
        assert_eq!(replaced, Some(ComputeParameter::CpuCamera(first)));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn drain_yields_kind_order() {
        let mut set = ParameterSet::new();
        set.set(ComputeParameter::GpuCamera(Buffer::from_pod(&[Matrix4::IDENTITY])));
        set.set(ComputeParameter::CpuCamera(Matrix4::IDENTITY));
        let kinds: Vec<_> = set.drain().map(|p| p.kind()).collect();
        assert_eq!(
            kinds,
            [ComputeParameterKind::CpuCamera, ComputeParameterKind::GpuCamera]
        );
        assert!(set.is_empty());
    }

    #[test]
    fn remove_takes_only_the_named_kind() {
        let mut set = ParameterSet::new();
        set.set(ComputeParameter::CpuCamera(Matrix4::IDENTITY));
        set.set(ComputeParameter::GpuCamera(Buffer::from_pod(&[
            Matrix4::IDENTITY,
        ])));
        assert!(matches!(
            set.remove(ComputeParameterKind::GpuCamera),
            Some(ComputeParameter::GpuCamera(_))
        ));
        assert!(set.remove(ComputeParameterKind::GpuCamera).is_none());
        assert_eq!(set.len(), 1);
        assert!(set.get(ComputeParameterKind::CpuCamera).is_some());
    }

    #[test]
    fn gpu_cameras_compare_by_buffer_identity() {
        let a = Buffer::from_pod(&[Matrix4::IDENTITY]);
        let b = Buffer::from_pod(&[Matrix4::IDENTITY]);
        assert_eq!(
            ComputeParameter::GpuCamera(a.clone()),
            ComputeParameter::GpuCamera(a)
        );
        assert_ne!(
            ComputeParameter::GpuCamera(b),
            ComputeParameter::GpuCamera(Buffer::from_pod(&[Matrix4::IDENTITY]))
        );
    }
}
