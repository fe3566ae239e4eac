// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays node storage with ordered parent and child lists.

use alloc::vec;
use alloc::vec::Vec;

use super::data::NodeData;
use super::id::{NodeId, NodeIndex};
use crate::command::Command;
use crate::error::{Error, Result};

/// Struct-of-arrays storage for all nodes.
///
/// Nodes are addressed by [`NodeId`]. Slot 0 belongs to
/// [`NodeId::MASTER_ROOT`], which only ever has children. Ids are never
/// reused: a deleted node leaves an empty slot behind.
///
/// Every edge appears twice, once in the parent's child list and once in the
/// child's parent list. The same pair may be connected by several edges; each
/// counts separately in both lists.
#[derive(Debug)]
pub struct NodeStore {
    // -- Topology --
    pub(crate) children: Vec<Vec<NodeId>>,
    pub(crate) parents: Vec<Vec<NodeId>>,

    // -- Node data (`None` for the master root and deleted nodes) --
    pub(crate) data: Vec<Option<NodeData>>,

    // -- Allocation --
    pub(crate) live: usize,
}

impl Default for NodeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeStore {
    /// Creates a store that holds only the master root.
    #[must_use]
    pub fn new() -> Self {
        Self {
            children: vec![Vec::new()],
            parents: vec![Vec::new()],
            data: vec![None],
            live: 0,
        }
    }

    // -- Allocation API --

    /// The id the next [`create_node`](Self::create_node) will return.
    #[must_use]
    pub fn next_id(&self) -> NodeId {
        let raw = u32::try_from(self.data.len()).unwrap_or(u32::MAX);
        NodeId(raw)
    }

    /// Creates a node with no edges and returns its id.
    ///
    /// # Panics
    ///
    /// Panics if the `u32` id space is exhausted.
    pub fn create_node(&mut self, data: NodeData) -> NodeId {
        let id = self.next_id();
        assert!(id.0 != u32::MAX, "node id space exhausted");
        self.children.push(Vec::new());
        self.parents.push(Vec::new());
        self.data.push(Some(data));
        self.live += 1;
        id
    }

    /// Creates a node under an id chosen elsewhere (command replay).
    ///
    /// `id` must equal [`next_id`](Self::next_id), which holds whenever
    /// commands are replayed in issuance order.
    pub fn insert_node(&mut self, id: NodeId, data: NodeData) -> Result<()> {
        if id != self.next_id() || id.is_master_root() {
            return Err(Error::InvalidNode(id));
        }
        self.create_node(data);
        Ok(())
    }

    /// Deletes a node, severing any edges it still has.
    pub fn delete_node(&mut self, id: NodeId) -> Result<NodeData> {
        let slot = self.live_slot(id)?;
        for (target, index) in self.severing_edges(id)? {
            self.remove_child(index, target)?;
        }
        debug_assert!(
            self.children[slot].is_empty() && self.parents[slot].is_empty(),
            "{id:?} kept edges after severing"
        );
        self.live -= 1;
        self.data[slot].take().ok_or(Error::InvalidNode(id))
    }

    /// Returns whether `id` is a live node (the master root is not).
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.live_slot(id).is_ok()
    }

    /// Number of live nodes, excluding the master root.
    #[must_use]
    pub fn len(&self) -> usize {
        self.live
    }

    /// Returns whether no node has been created (or all were deleted).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Iterates live node ids in creation order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.data
            .iter()
            .enumerate()
            .filter(|(_, d)| d.is_some())
            .filter_map(|(slot, _)| u32::try_from(slot).ok().map(NodeId))
    }

    /// Returns whether any live node is flagged as an output.
    #[must_use]
    pub fn has_outputs(&self) -> bool {
        self.data.iter().flatten().any(|d| d.is_output)
    }

    // -- Topology reads --

    /// The ordered children of `target`.
    pub fn children(&self, target: NodeId) -> Result<&[NodeId]> {
        let slot = self.target_slot(target)?;
        Ok(&self.children[slot])
    }

    /// The ordered parents of `target`.
    pub fn parents(&self, target: NodeId) -> Result<&[NodeId]> {
        let slot = self.live_slot(target)?;
        Ok(&self.parents[slot])
    }

    /// Number of children of `target`.
    pub fn child_count(&self, target: NodeId) -> Result<NodeIndex> {
        self.children(target).map(<[NodeId]>::len)
    }

    /// The child at `index` of `target`.
    pub fn child(&self, index: NodeIndex, target: NodeId) -> Result<NodeId> {
        let children = self.children(target)?;
        children.get(index).copied().ok_or(Error::OutOfRange {
            index,
            len: children.len(),
        })
    }

    /// Number of parents of `target`.
    pub fn parent_count(&self, target: NodeId) -> Result<NodeIndex> {
        self.parents(target).map(<[NodeId]>::len)
    }

    /// The parent at `index` of `target`.
    pub fn parent(&self, index: NodeIndex, target: NodeId) -> Result<NodeId> {
        let parents = self.parents(target)?;
        parents.get(index).copied().ok_or(Error::OutOfRange {
            index,
            len: parents.len(),
        })
    }

    // -- Topology mutation --

    /// Adds `child` at the end of `target`'s children.
    pub fn append_child(&mut self, child: NodeId, target: NodeId) -> Result<()> {
        let len = self.child_count(target)?;
        self.insert_child(len, child, target)
    }

    /// Adds `child` at the front of `target`'s children.
    pub fn prepend_child(&mut self, child: NodeId, target: NodeId) -> Result<()> {
        self.insert_child(0, child, target)
    }

    /// Inserts `child` at `index` of `target`'s children, shifting later
    /// children up. `index == len` appends.
    ///
    /// `target` is appended to `child`'s parent list regardless of `index`.
    pub fn insert_child(&mut self, index: NodeIndex, child: NodeId, target: NodeId) -> Result<()> {
        let t = self.target_slot(target)?;
        let c = self.live_slot(child)?;
        let len = self.children[t].len();
        if index > len {
            return Err(Error::OutOfRange { index, len });
        }
        if self.reaches(child, target) {
            return Err(Error::CycleDetected { child, target });
        }
        self.children[t].insert(index, child);
        self.parents[c].push(target);
        Ok(())
    }

    /// Removes the edge at `index` of `target`'s children and returns the
    /// child it pointed to. The child node itself survives.
    ///
    /// Exactly one occurrence of `target` (the last) leaves the child's parent
    /// list.
    pub fn remove_child(&mut self, index: NodeIndex, target: NodeId) -> Result<NodeId> {
        let t = self.target_slot(target)?;
        let len = self.children[t].len();
        if index >= len {
            return Err(Error::OutOfRange { index, len });
        }
        let child = self.children[t].remove(index);
        let parents = &mut self.parents[child.slot()];
        let pos = parents.iter().rposition(|&p| p == target);
        debug_assert!(pos.is_some(), "parent list of {child:?} lost {target:?}");
        if let Some(pos) = pos {
            parents.remove(pos);
        }
        Ok(child)
    }

    /// The `(target, index)` pairs that, removed in order with
    /// [`remove_child`](Self::remove_child), disconnect `id` from every
    /// parent and child.
    ///
    /// Positions are listed back to front per list so each stays valid after
    /// the removals before it.
    pub fn severing_edges(&self, id: NodeId) -> Result<Vec<(NodeId, NodeIndex)>> {
        let slot = self.live_slot(id)?;
        let mut edges = Vec::new();

        let mut seen: Vec<NodeId> = Vec::new();
        for &parent in &self.parents[slot] {
            if seen.contains(&parent) {
                continue;
            }
            seen.push(parent);
            let siblings = &self.children[parent.slot()];
            edges.extend(
                (0..siblings.len())
                    .rev()
                    .filter(|&i| siblings[i] == id)
                    .map(|i| (parent, i)),
            );
        }

        edges.extend((0..self.children[slot].len()).rev().map(|i| (id, i)));
        Ok(edges)
    }

    // -- Data API --

    /// The data of a live node.
    pub fn node_data(&self, id: NodeId) -> Result<&NodeData> {
        let slot = self.live_slot(id)?;
        self.data[slot].as_ref().ok_or(Error::InvalidNode(id))
    }

    /// Replaces the data of a live node and returns the previous data.
    pub fn set_node_data(&mut self, id: NodeId, data: NodeData) -> Result<NodeData> {
        let slot = self.live_slot(id)?;
        let current = self.data[slot].as_mut().ok_or(Error::InvalidNode(id))?;
        Ok(core::mem::replace(current, data))
    }

    // -- Replay --

    /// Applies one recorded command.
    ///
    /// Parameter commands carry no graph effect and are accepted as no-ops;
    /// devices handle them separately.
    pub fn apply(&mut self, command: &Command) -> Result<()> {
        match command {
            Command::CreateNode { id, data } => self.insert_node(*id, data.clone()),
            Command::DeleteNode { id } => self.delete_node(*id).map(drop),
            Command::AppendChild { child, target } => self.append_child(*child, *target),
            Command::PrependChild { child, target } => self.prepend_child(*child, *target),
            Command::RemoveChildAt { index, target } => self.remove_child(*index, *target).map(drop),
            Command::InsertChildAt {
                index,
                child,
                target,
            } => self.insert_child(*index, *child, *target),
            Command::UpdateNodeData { id, data } => self.set_node_data(*id, data.clone()).map(drop),
            Command::SetComputeParameter(_) => Ok(()),
        }
    }

    // -- Internal helpers --

    /// Slot of a live, non-root node.
    fn live_slot(&self, id: NodeId) -> Result<usize> {
        let slot = id.slot();
        match self.data.get(slot) {
            Some(Some(_)) => Ok(slot),
            _ => Err(Error::InvalidNode(id)),
        }
    }

    /// Slot of a node that may own children: a live node or the master root.
    fn target_slot(&self, id: NodeId) -> Result<usize> {
        if id.is_master_root() {
            Ok(0)
        } else {
            self.live_slot(id)
        }
    }

    /// Returns whether `to` is `from` or one of its descendants.
    fn reaches(&self, from: NodeId, to: NodeId) -> bool {
        if to.is_master_root() {
            return false;
        }
        let mut visited = vec![false; self.data.len()];
        let mut stack = vec![from];
        while let Some(node) = stack.pop() {
            if node == to {
                return true;
            }
            let slot = node.slot();
            if core::mem::replace(&mut visited[slot], true) {
                continue;
            }
            stack.extend_from_slice(&self.children[slot]);
        }
        false
    }

    /// Checks that every edge is mirrored in both lists (test support).
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        use alloc::collections::BTreeMap;

        let mut down: BTreeMap<(NodeId, NodeId), usize> = BTreeMap::new();
        let mut up: BTreeMap<(NodeId, NodeId), usize> = BTreeMap::new();
        for (slot, kids) in self.children.iter().enumerate() {
            let parent = NodeId(u32::try_from(slot).unwrap());
            for &kid in kids {
                assert!(self.contains(kid), "{parent:?} lists dead child {kid:?}");
                *down.entry((parent, kid)).or_default() += 1;
            }
        }
        for (slot, ps) in self.parents.iter().enumerate() {
            let child = NodeId(u32::try_from(slot).unwrap());
            for &p in ps {
                *up.entry((p, child)).or_default() += 1;
            }
        }
        assert_eq!(down, up, "child and parent lists disagree");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::Matrix4;

    fn node(store: &mut NodeStore) -> NodeId {
        store.create_node(NodeData::new(Matrix4::IDENTITY))
    }

    #[test]
    fn ids_start_after_master_root_and_are_not_reused() {
        let mut store = NodeStore::new();
        let a = node(&mut store);
        assert_eq!(a.to_raw(), 1);
        store.delete_node(a).unwrap();
        let b = node(&mut store);
        assert_eq!(b.to_raw(), 2);
        assert!(!store.contains(a));
        assert!(store.contains(b));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn append_and_query() {
        let mut store = NodeStore::new();
        let parent = node(&mut store);
        let a = node(&mut store);
        let b = node(&mut store);

        store.append_child(a, parent).unwrap();
        store.append_child(b, parent).unwrap();

        assert_eq!(store.children(parent).unwrap(), &[a, b]);
        assert_eq!(store.parent(0, a).unwrap(), parent);
        assert_eq!(store.child(1, parent).unwrap(), b);
        assert_eq!(
            store.child(2, parent),
            Err(Error::OutOfRange { index: 2, len: 2 })
        );
        store.assert_consistent();
    }

    #[test]
    fn prepend_and_insert_positions() {
        let mut store = NodeStore::new();
        let a = node(&mut store);
        let b = node(&mut store);
        let c = node(&mut store);
        let d = node(&mut store);
        let root = NodeId::MASTER_ROOT;

        store.append_child(b, root).unwrap();
        store.prepend_child(a, root).unwrap();
        store.insert_child(2, d, root).unwrap();
        store.insert_child(2, c, root).unwrap();

        assert_eq!(store.children(root).unwrap(), &[a, b, c, d]);
        assert_eq!(
            store.insert_child(9, a, root),
            Err(Error::OutOfRange { index: 9, len: 4 })
        );
        store.assert_consistent();
    }

    #[test]
    fn remove_shifts_later_children_down() {
        let mut store = NodeStore::new();
        let p = node(&mut store);
        let kids: Vec<_> = (0..4).map(|_| node(&mut store)).collect();
        for &k in &kids {
            store.append_child(k, p).unwrap();
        }

        assert_eq!(store.remove_child(1, p).unwrap(), kids[1]);
        assert_eq!(store.children(p).unwrap(), &[kids[0], kids[2], kids[3]]);
        assert!(store.contains(kids[1]));
        assert_eq!(store.parent_count(kids[1]).unwrap(), 0);
        store.assert_consistent();
    }

    #[test]
    fn duplicate_edges_are_independent() {
        let mut store = NodeStore::new();
        let p = node(&mut store);
        let c = node(&mut store);
        store.append_child(c, p).unwrap();
        store.append_child(c, p).unwrap();
        assert_eq!(store.parents(c).unwrap(), &[p, p]);

        store.remove_child(0, p).unwrap();
        assert_eq!(store.children(p).unwrap(), &[c]);
        assert_eq!(store.parents(c).unwrap(), &[p]);
        store.assert_consistent();
    }

    #[test]
    fn multiple_parents() {
        let mut store = NodeStore::new();
        let p1 = node(&mut store);
        let p2 = node(&mut store);
        let c = node(&mut store);
        store.append_child(c, p1).unwrap();
        store.append_child(c, p2).unwrap();
        store.append_child(c, NodeId::MASTER_ROOT).unwrap();
        assert_eq!(store.parents(c).unwrap(), &[p1, p2, NodeId::MASTER_ROOT]);

        store.remove_child(0, p2).unwrap();
        assert_eq!(store.parents(c).unwrap(), &[p1, NodeId::MASTER_ROOT]);
        store.assert_consistent();
    }

    #[test]
    fn delete_severs_every_edge() {
        let mut store = NodeStore::new();
        let p = node(&mut store);
        let mid = node(&mut store);
        let other = node(&mut store);
        let kid = node(&mut store);
        store.append_child(other, p).unwrap();
        store.append_child(mid, p).unwrap();
        store.append_child(mid, p).unwrap();
        store.append_child(mid, NodeId::MASTER_ROOT).unwrap();
        store.append_child(kid, mid).unwrap();

        store.delete_node(mid).unwrap();

        assert_eq!(store.children(p).unwrap(), &[other]);
        assert!(store.children(NodeId::MASTER_ROOT).unwrap().is_empty());
        assert_eq!(store.parent_count(kid).unwrap(), 0);
        assert_eq!(store.children(mid), Err(Error::InvalidNode(mid)));
        store.assert_consistent();
    }

    #[test]
    fn severing_edges_lists_positions_back_to_front() {
        let mut store = NodeStore::new();
        let p = node(&mut store);
        let x = node(&mut store);
        let n = node(&mut store);
        let k1 = node(&mut store);
        let k2 = node(&mut store);
        store.append_child(n, p).unwrap();
        store.append_child(x, p).unwrap();
        store.append_child(n, p).unwrap();
        store.append_child(k1, n).unwrap();
        store.append_child(k2, n).unwrap();

        let edges = store.severing_edges(n).unwrap();
        assert_eq!(edges, vec![(p, 2), (p, 0), (n, 1), (n, 0)]);
    }

    #[test]
    fn master_root_is_not_a_node() {
        let mut store = NodeStore::new();
        let a = node(&mut store);
        let root = NodeId::MASTER_ROOT;
        assert_eq!(store.node_data(root), Err(Error::InvalidNode(root)));
        assert_eq!(store.delete_node(root), Err(Error::InvalidNode(root)));
        assert_eq!(store.parents(root), Err(Error::InvalidNode(root)));
        assert_eq!(store.append_child(root, a), Err(Error::InvalidNode(root)));
        assert_eq!(store.child_count(root), Ok(0));
    }

    #[test]
    fn unknown_ids_are_rejected() {
        let mut store = NodeStore::new();
        let ghost = NodeId::from_raw(42);
        assert_eq!(store.child_count(ghost), Err(Error::InvalidNode(ghost)));
        assert_eq!(
            store.append_child(ghost, NodeId::MASTER_ROOT),
            Err(Error::InvalidNode(ghost))
        );
    }

    #[test]
    fn cycles_are_rejected() {
        let mut store = NodeStore::new();
        let a = node(&mut store);
        let b = node(&mut store);
        let c = node(&mut store);
        store.append_child(b, a).unwrap();
        store.append_child(c, b).unwrap();

        assert_eq!(
            store.append_child(a, c),
            Err(Error::CycleDetected { child: a, target: c })
        );
        assert_eq!(
            store.prepend_child(a, a),
            Err(Error::CycleDetected { child: a, target: a })
        );
        // Diamonds are fine.
        store.append_child(c, a).unwrap();
        store.assert_consistent();
    }

    #[test]
    fn set_node_data_returns_previous() {
        let mut store = NodeStore::new();
        let a = node(&mut store);
        let next = NodeData::output(Matrix4::from_translation(1.0, 0.0, 0.0));
        let old = store.set_node_data(a, next.clone()).unwrap();
        assert_eq!(old, NodeData::new(Matrix4::IDENTITY));
        assert_eq!(store.node_data(a).unwrap(), &next);
        assert!(store.has_outputs());
    }

    #[test]
    fn replay_reproduces_the_graph() {
        let mut host = NodeStore::new();
        let mut log = Vec::new();

        let a = host.create_node(NodeData::new(Matrix4::IDENTITY));
        log.push(Command::CreateNode {
            id: a,
            data: NodeData::new(Matrix4::IDENTITY),
        });
        let b = host.create_node(NodeData::output(Matrix4::IDENTITY));
        log.push(Command::CreateNode {
            id: b,
            data: NodeData::output(Matrix4::IDENTITY),
        });
        host.append_child(a, NodeId::MASTER_ROOT).unwrap();
        log.push(Command::AppendChild {
            child: a,
            target: NodeId::MASTER_ROOT,
        });
        host.prepend_child(b, a).unwrap();
        log.push(Command::PrependChild { child: b, target: a });

        let mut device = NodeStore::new();
        for command in &log {
            device.apply(command).unwrap();
        }
        assert_eq!(device.children(NodeId::MASTER_ROOT).unwrap(), &[a]);
        assert_eq!(device.children(a).unwrap(), &[b]);
        assert_eq!(device.ids().collect::<Vec<_>>(), vec![a, b]);
        device.assert_consistent();
    }

    #[test]
    fn replay_rejects_out_of_order_creation() {
        let mut device = NodeStore::new();
        let skipped = NodeId::from_raw(2);
        assert_eq!(
            device.apply(&Command::CreateNode {
                id: skipped,
                data: NodeData::default(),
            }),
            Err(Error::InvalidNode(skipped))
        );
    }
}
