// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Results of a completed transaction.
//!
//! A device hands back one [`OutputData`] per transaction. It maps each
//! produced [`OutputAttributeKind`] to an [`OutputAttribute`] whose payload
//! lives in [`Buffer`]s.
//!
//! # Layout
//!
//! - **Matrices**: tightly packed column-major `[f32; 16]` world matrices,
//!   one per instance of an output node.
//! - **UserIds**: `offsets` holds `count + 1` `u32` words, `ids` holds
//!   `count` distinct tags in ascending order, and `count` holds one `u32`.
//!   Matrices `offsets[k]..offsets[k + 1]` belong to `ids[k]`; matrices from
//!   `offsets[count]` on carry no tag.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use core::mem::size_of;
use core::ops::Range;

use crate::buffer::Buffer;
use crate::error::{Error, Result};
use crate::node::UserId;
use crate::transform::Matrix4;

/// Discriminant of an [`OutputAttribute`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OutputAttributeKind {
    /// World matrices of output instances.
    Matrices,
    /// Tag grouping of the matrices.
    UserIds,
}

/// The three buffers describing user-id groups.
#[derive(Clone, Debug)]
pub struct UserIdsOutput {
    /// `count + 1` group start offsets into the matrices buffer.
    pub offsets: Buffer,
    /// `count` distinct tags, ascending.
    pub ids: Buffer,
    /// A single `u32`: the number of tags.
    pub count: Buffer,
}

/// Host-side view of a [`UserIdsOutput`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UserIdGroups {
    /// Group start offsets; one more entry than `ids`.
    pub offsets: Vec<u32>,
    /// Distinct tags, ascending.
    pub ids: Vec<UserId>,
}

impl UserIdsOutput {
    /// Reads all three buffers back, if they are host-visible and well
    /// formed.
    #[must_use]
    pub fn read(&self) -> Option<UserIdGroups> {
        let count = *self.count.read_u32s()?.first()?;
        let offsets = self.offsets.read_u32s()?;
        let ids = self.ids.read_u32s()?;
        let count = usize::try_from(count).ok()?;
        (ids.len() == count && offsets.len() == count + 1).then_some(UserIdGroups { offsets, ids })
    }
}

impl UserIdGroups {
    /// Number of tags.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns whether no instance carried a tag.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// The matrix range of the group for `id`.
    #[must_use]
    pub fn range_of(&self, id: UserId) -> Option<Range<usize>> {
        let k = self.ids.binary_search(&id).ok()?;
        Some(self.range_at(k))
    }

    /// Where untagged instances begin.
    #[must_use]
    pub fn untagged_start(&self) -> usize {
        self.offsets.last().map_or(0, |&o| o as usize)
    }

    fn range_at(&self, k: usize) -> Range<usize> {
        self.offsets[k] as usize..self.offsets[k + 1] as usize
    }

    /// Iterates `(tag, matrix range)` pairs in ascending tag order.
    pub fn iter(&self) -> impl Iterator<Item = (UserId, Range<usize>)> + '_ {
        self.ids
            .iter()
            .enumerate()
            .map(|(k, &id)| (id, self.range_at(k)))
    }
}

/// A payload attached to an output slot.
#[derive(Clone, Debug)]
pub enum OutputAttribute {
    /// World matrices of output instances.
    Matrices(Buffer),
    /// Tag grouping of the matrices.
    UserIds(UserIdsOutput),
}

impl OutputAttribute {
    /// Returns the discriminant.
    #[must_use]
    pub const fn kind(&self) -> OutputAttributeKind {
        match self {
            Self::Matrices(_) => OutputAttributeKind::Matrices,
            Self::UserIds(_) => OutputAttributeKind::UserIds,
        }
    }
}

/// Outputs of one completed transaction.
#[derive(Clone, Debug, Default)]
pub struct OutputData {
    sequence: u64,
    attributes: BTreeMap<OutputAttributeKind, OutputAttribute>,
}

impl OutputData {
    /// Creates an empty result for transaction `sequence`.
    #[must_use]
    pub fn new(sequence: u64) -> Self {
        Self {
            sequence,
            attributes: BTreeMap::new(),
        }
    }

    /// Sequence number of the transaction that produced this data.
    #[must_use]
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Attaches an attribute, replacing any of the same kind.
    pub fn insert(&mut self, attribute: OutputAttribute) -> Option<OutputAttribute> {
        self.attributes.insert(attribute.kind(), attribute)
    }

    /// Returns whether `kind` was produced.
    #[must_use]
    pub fn contains(&self, kind: OutputAttributeKind) -> bool {
        self.attributes.contains_key(&kind)
    }

    /// The attribute of the given kind.
    pub fn attribute(&self, kind: OutputAttributeKind) -> Result<&OutputAttribute> {
        self.attributes
            .get(&kind)
            .ok_or(Error::UnknownOutputType(kind))
    }

    /// Iterates produced attributes in kind order.
    pub fn attributes(&self) -> impl Iterator<Item = &OutputAttribute> {
        self.attributes.values()
    }

    /// The matrices buffer.
    pub fn matrices(&self) -> Result<&Buffer> {
        match self.attribute(OutputAttributeKind::Matrices)? {
            OutputAttribute::Matrices(buffer) => Ok(buffer),
            OutputAttribute::UserIds(_) => Err(Error::UnknownOutputType(OutputAttributeKind::Matrices)),
        }
    }

    /// The user-id buffers.
    pub fn user_ids(&self) -> Result<&UserIdsOutput> {
        match self.attribute(OutputAttributeKind::UserIds)? {
            OutputAttribute::UserIds(groups) => Ok(groups),
            OutputAttribute::Matrices(_) => Err(Error::UnknownOutputType(OutputAttributeKind::UserIds)),
        }
    }

    /// Number of matrices produced (0 when none were).
    #[must_use]
    pub fn instance_count(&self) -> usize {
        self.matrices()
            .map_or(0, |b| b.byte_len() / size_of::<Matrix4>())
    }
}
