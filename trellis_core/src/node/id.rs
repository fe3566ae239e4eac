// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node identity types.

use core::fmt;

/// Position within an ordered child or parent list.
pub type NodeIndex = usize;

/// A handle to a node in a [`NodeStore`](super::NodeStore).
///
/// Ids are handed out in increasing order and never reused, so a command that
/// references an id always means the node it was issued for.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// The sentinel at the top of every hierarchy.
    ///
    /// It is never created or deleted, carries no data, and cannot be an
    /// output. Its children are the traversal entry points.
    pub const MASTER_ROOT: Self = Self(0);

    /// Rebuilds an id from its raw value (for diagnostics and replay).
    ///
    /// Ids that no store issued are rejected as
    /// [`InvalidNode`](crate::Error::InvalidNode).
    #[inline]
    #[must_use]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw value.
    #[inline]
    #[must_use]
    pub const fn to_raw(self) -> u32 {
        self.0
    }

    /// Returns whether this is [`NodeId::MASTER_ROOT`].
    #[inline]
    #[must_use]
    pub const fn is_master_root(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub(crate) const fn slot(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_master_root() {
            f.write_str("NodeId(root)")
        } else {
            write!(f, "NodeId({})", self.0)
        }
    }
}
