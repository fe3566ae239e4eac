// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The data carried by a node.

use alloc::vec::Vec;

use super::attribute::{Aabb, NodeAttribute, NodeAttributeKind, UserId};
use crate::config::FeatureSet;
use crate::transform::Matrix4;

/// A node's attribute set and output flag.
///
/// The set holds at most one attribute of each [`NodeAttributeKind`];
/// inserting a second one of the same kind replaces the first. A node without
/// a [`Matrix`](NodeAttribute::Matrix) attribute behaves as the identity.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeData {
    /// Sorted by kind, one entry per kind.
    attributes: Vec<NodeAttribute>,
    /// Whether the node's resolved transforms are kept after compute.
    pub is_output: bool,
}

impl NodeData {
    /// Creates data with the given local transform that is not an output.
    #[must_use]
    pub fn new(matrix: Matrix4) -> Self {
        Self::default().with_attribute(NodeAttribute::Matrix(matrix))
    }

    /// Creates data with the given local transform that is an output.
    #[must_use]
    pub fn output(matrix: Matrix4) -> Self {
        Self::new(matrix).with_output(true)
    }

    /// Returns the data with the output flag set to `is_output`.
    #[must_use]
    pub fn with_output(mut self, is_output: bool) -> Self {
        self.is_output = is_output;
        self
    }

    /// Returns the data with `attribute` inserted.
    #[must_use]
    pub fn with_attribute(mut self, attribute: NodeAttribute) -> Self {
        self.set_attribute(attribute);
        self
    }

    /// Returns the data with a bounding box attached.
    #[must_use]
    pub fn with_aabb(self, aabb: Aabb) -> Self {
        self.with_attribute(NodeAttribute::Aabb(aabb))
    }

    /// Returns the data with user tags attached.
    #[must_use]
    pub fn with_user_ids(self, ids: impl IntoIterator<Item = UserId>) -> Self {
        self.with_attribute(NodeAttribute::UserIds(ids.into_iter().collect()))
    }

    /// Inserts `attribute`, returning the one of the same kind it replaced.
    pub fn set_attribute(&mut self, attribute: NodeAttribute) -> Option<NodeAttribute> {
        match self
            .attributes
            .binary_search_by_key(&attribute.kind(), NodeAttribute::kind)
        {
            Ok(pos) => Some(core::mem::replace(&mut self.attributes[pos], attribute)),
            Err(pos) => {
                self.attributes.insert(pos, attribute);
                None
            }
        }
    }

    /// Removes and returns the attribute of the given kind.
    pub fn remove_attribute(&mut self, kind: NodeAttributeKind) -> Option<NodeAttribute> {
        let pos = self
            .attributes
            .binary_search_by_key(&kind, NodeAttribute::kind)
            .ok()?;
        Some(self.attributes.remove(pos))
    }

    /// Returns the attribute of the given kind.
    #[must_use]
    pub fn attribute(&self, kind: NodeAttributeKind) -> Option<&NodeAttribute> {
        let pos = self
            .attributes
            .binary_search_by_key(&kind, NodeAttribute::kind)
            .ok()?;
        Some(&self.attributes[pos])
    }

    /// All attributes, ordered by kind.
    #[must_use]
    pub fn attributes(&self) -> &[NodeAttribute] {
        &self.attributes
    }

    /// Replaces the local transform.
    pub fn set_matrix(&mut self, matrix: Matrix4) {
        self.set_attribute(NodeAttribute::Matrix(matrix));
    }

    /// The local transform, or the identity when none is attached.
    #[must_use]
    pub fn matrix(&self) -> Matrix4 {
        match self.attribute(NodeAttributeKind::Matrix) {
            Some(NodeAttribute::Matrix(m)) => *m,
            _ => Matrix4::IDENTITY,
        }
    }

    /// The bounding box, if any.
    #[must_use]
    pub fn aabb(&self) -> Option<&Aabb> {
        match self.attribute(NodeAttributeKind::Aabb) {
            Some(NodeAttribute::Aabb(b)) => Some(b),
            _ => None,
        }
    }

    /// The user tags (empty when none are attached).
    #[must_use]
    pub fn user_ids(&self) -> &[UserId] {
        match self.attribute(NodeAttributeKind::UserIds) {
            Some(NodeAttribute::UserIds(ids)) => ids,
            _ => &[],
        }
    }

    /// The features an engine needs to accept this data.
    #[must_use]
    pub fn required_features(&self) -> FeatureSet {
        self.attributes
            .iter()
            .filter_map(|a| a.kind().required_feature())
            .collect()
    }
}
