// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deferred graph edits and the batches they travel in.
//!
//! Every successful edit on the engine appends one or more [`Command`]s to a
//! [`CommandQueue`]. At compute time the queue is drained into a
//! [`Transaction`] that the device replays in order against its own copy of
//! the graph.

use alloc::vec::Vec;

use crate::config::FeatureSet;
use crate::node::{NodeData, NodeId, NodeIndex};
use crate::parameter::{ComputeParameter, ParameterSet};

/// One recorded edit.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// A node was created under `id`.
    CreateNode {
        /// The id the host assigned.
        id: NodeId,
        /// Initial data.
        data: NodeData,
    },
    /// A node with no remaining edges was deleted.
    DeleteNode {
        /// The deleted node.
        id: NodeId,
    },
    /// `child` was added at the end of `target`'s children.
    AppendChild {
        /// The new child.
        child: NodeId,
        /// The parent.
        target: NodeId,
    },
    /// `child` was added at the front of `target`'s children.
    PrependChild {
        /// The new child.
        child: NodeId,
        /// The parent.
        target: NodeId,
    },
    /// The edge at `index` of `target`'s children was removed.
    RemoveChildAt {
        /// Position in the child list.
        index: NodeIndex,
        /// The parent.
        target: NodeId,
    },
    /// `child` was inserted at `index` of `target`'s children.
    InsertChildAt {
        /// Position in the child list.
        index: NodeIndex,
        /// The new child.
        child: NodeId,
        /// The parent.
        target: NodeId,
    },
    /// A node's data was replaced.
    UpdateNodeData {
        /// The node.
        id: NodeId,
        /// Replacement data.
        data: NodeData,
    },
    /// A compute parameter applies from this transaction on.
    SetComputeParameter(ComputeParameter),
}

/// Discriminant of a [`Command`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CommandKind {
    /// [`Command::CreateNode`].
    CreateNode,
    /// [`Command::DeleteNode`].
    DeleteNode,
    /// [`Command::AppendChild`].
    AppendChild,
    /// [`Command::PrependChild`].
    PrependChild,
    /// [`Command::RemoveChildAt`].
    RemoveChildAt,
    /// [`Command::InsertChildAt`].
    InsertChildAt,
    /// [`Command::UpdateNodeData`].
    UpdateNodeData,
    /// [`Command::SetComputeParameter`].
    SetComputeParameter,
}

impl CommandKind {
    /// Short lowercase name for logs and traces.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::CreateNode => "create_node",
            Self::DeleteNode => "delete_node",
            Self::AppendChild => "append_child",
            Self::PrependChild => "prepend_child",
            Self::RemoveChildAt => "remove_child_at",
            Self::InsertChildAt => "insert_child_at",
            Self::UpdateNodeData => "update_node_data",
            Self::SetComputeParameter => "set_compute_parameter",
        }
    }
}

impl Command {
    /// Returns the discriminant.
    #[must_use]
    pub const fn kind(&self) -> CommandKind {
        match self {
            Self::CreateNode { .. } => CommandKind::CreateNode,
            Self::DeleteNode { .. } => CommandKind::DeleteNode,
            Self::AppendChild { .. } => CommandKind::AppendChild,
            Self::PrependChild { .. } => CommandKind::PrependChild,
            Self::RemoveChildAt { .. } => CommandKind::RemoveChildAt,
            Self::InsertChildAt { .. } => CommandKind::InsertChildAt,
            Self::UpdateNodeData { .. } => CommandKind::UpdateNodeData,
            Self::SetComputeParameter(_) => CommandKind::SetComputeParameter,
        }
    }

    /// The node the command is about: the created, deleted, or updated node,
    /// or the parent for edge commands.
    #[must_use]
    pub const fn subject(&self) -> Option<NodeId> {
        match self {
            Self::CreateNode { id, .. }
            | Self::DeleteNode { id }
            | Self::UpdateNodeData { id, .. } => Some(*id),
            Self::AppendChild { target, .. }
            | Self::PrependChild { target, .. }
            | Self::RemoveChildAt { target, .. }
            | Self::InsertChildAt { target, .. } => Some(*target),
            Self::SetComputeParameter(_) => None,
        }
    }
}

/// Edits recorded since the last drain, plus staged parameters.
#[derive(Debug, Default)]
pub struct CommandQueue {
    commands: Vec<Command>,
    parameters: ParameterSet,
}

impl CommandQueue {
    /// Creates an empty queue.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            commands: Vec::new(),
            parameters: ParameterSet::new(),
        }
    }

    /// Records a graph command.
    pub fn push(&mut self, command: Command) {
        self.commands.push(command);
    }

    /// Stages a parameter for the next drain, replacing any staged value of
    /// the same kind.
    pub fn stage_parameter(&mut self, param: ComputeParameter) -> Option<ComputeParameter> {
        self.parameters.set(param)
    }

    /// Number of recorded graph commands (staged parameters excluded).
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Returns whether nothing is recorded or staged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty() && self.parameters.is_empty()
    }

    /// The staged parameters.
    #[must_use]
    pub fn parameters(&self) -> &ParameterSet {
        &self.parameters
    }

    /// Takes everything out of the queue: graph commands in issuance order,
    /// then one parameter command per staged kind in kind order.
    pub fn drain(&mut self) -> Vec<Command> {
        let mut out = core::mem::take(&mut self.commands);
        out.extend(self.parameters.drain().map(Command::SetComputeParameter));
        out
    }
}

/// One batch handed to a device.
#[derive(Clone, Debug, PartialEq)]
pub struct Transaction {
    /// Monotonic sequence number, starting at 1.
    pub sequence: u64,
    /// Features the engine was constructed with.
    pub features: FeatureSet,
    /// Commands in application order.
    pub commands: Vec<Command>,
}

impl Transaction {
    /// Returns whether the transaction carries no commands.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
