// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-node attribute payloads.

use alloc::vec::Vec;

use bytemuck::{Pod, Zeroable};

use crate::config::Feature;
use crate::transform::Matrix4;

/// An application-defined tag used to group output instances.
pub type UserId = u32;

/// An axis-aligned bounding box in the node's local space.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct Aabb {
    /// Coordinates of the smallest corner.
    pub corner: [f32; 3],
    /// Extent along each axis.
    pub size: [f32; 3],
}

impl Default for Aabb {
    /// The unit cube at the origin.
    fn default() -> Self {
        Self {
            corner: [0.0; 3],
            size: [1.0; 3],
        }
    }
}

impl Aabb {
    /// Creates a box from its smallest corner and size.
    #[must_use]
    pub const fn new(corner: [f32; 3], size: [f32; 3]) -> Self {
        Self { corner, size }
    }

    /// Creates a box spanning `min..=max`.
    #[must_use]
    pub fn from_min_max(min: [f32; 3], max: [f32; 3]) -> Self {
        Self {
            corner: min,
            size: [max[0] - min[0], max[1] - min[1], max[2] - min[2]],
        }
    }

    /// The largest corner.
    #[must_use]
    pub fn max(&self) -> [f32; 3] {
        [
            self.corner[0] + self.size[0],
            self.corner[1] + self.size[1],
            self.corner[2] + self.size[2],
        ]
    }

    /// All eight corners.
    #[must_use]
    pub fn corners(&self) -> [[f32; 3]; 8] {
        let [x0, y0, z0] = self.corner;
        let [x1, y1, z1] = self.max();
        [
            [x0, y0, z0],
            [x1, y0, z0],
            [x0, y1, z0],
            [x1, y1, z0],
            [x0, y0, z1],
            [x1, y0, z1],
            [x0, y1, z1],
            [x1, y1, z1],
        ]
    }
}

/// Discriminant of a [`NodeAttribute`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NodeAttributeKind {
    /// Local transform.
    Matrix,
    /// Bounding box for culling.
    Aabb,
    /// User tags.
    UserIds,
}

impl NodeAttributeKind {
    /// The feature an engine must enable to accept this attribute.
    #[must_use]
    pub const fn required_feature(self) -> Option<Feature> {
        match self {
            Self::Matrix => None,
            Self::Aabb => Some(Feature::FrustumCulling),
            Self::UserIds => Some(Feature::UserIds),
        }
    }
}

/// A payload attached to a node.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeAttribute {
    /// Local transform, composed as `parent_world * matrix`.
    Matrix(Matrix4),
    /// Local-space bounds tested against the camera frustum.
    Aabb(Aabb),
    /// Tags that place the node's instances into user-id groups.
    UserIds(Vec<UserId>),
}

impl NodeAttribute {
    /// Returns the discriminant.
    #[must_use]
    pub const fn kind(&self) -> NodeAttributeKind {
        match self {
            Self::Matrix(_) => NodeAttributeKind::Matrix,
            Self::Aabb(_) => NodeAttributeKind::Aabb,
            Self::UserIds(_) => NodeAttributeKind::UserIds,
        }
    }
}
