// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Graph traversal utilities.

use alloc::vec::Vec;

use super::data::NodeData;
use super::id::NodeId;
use super::store::NodeStore;
use crate::transform::Matrix4;

/// One visit of a node along a single path from the master root.
#[derive(Clone, Copy, Debug)]
pub struct Instance<'a> {
    /// The visited node.
    pub node: NodeId,
    /// Its data.
    pub data: &'a NodeData,
    /// `parent_world * local` along this path.
    pub world: Matrix4,
}

/// A depth-first pre-order walk over every root path.
///
/// A node reachable through several paths (multiple parents, or duplicate
/// edges) is yielded once per path. Nodes not reachable from the master root
/// are never visited.
///
/// The path count multiplies down the graph: a chain of `d` levels where each
/// level holds `k` edges to the next node yields `k^d` instances of the last
/// node. Repeated edges stacked over a deep chain therefore grow the walk, and
/// the output, exponentially.
///
/// Created by [`NodeStore::instances`].
#[derive(Debug)]
pub struct Instances<'a> {
    store: &'a NodeStore,
    stack: Vec<(NodeId, Matrix4)>,
}

impl<'a> Instances<'a> {
    fn new(store: &'a NodeStore) -> Self {
        let mut walk = Self {
            store,
            stack: Vec::new(),
        };
        walk.push_children(NodeId::MASTER_ROOT, Matrix4::IDENTITY);
        walk
    }

    fn push_children(&mut self, parent: NodeId, world: Matrix4) {
        // Reversed so the first child is popped first.
        let kids = &self.store.children[parent.slot()];
        self.stack.extend(kids.iter().rev().map(|&c| (c, world)));
    }
}

impl<'a> Iterator for Instances<'a> {
    type Item = Instance<'a>;

    fn next(&mut self) -> Option<Instance<'a>> {
        loop {
            let (node, parent_world) = self.stack.pop()?;
            let Some(data) = self.store.data.get(node.slot()).and_then(Option::as_ref) else {
                debug_assert!(false, "edge to dead node {node:?}");
                continue;
            };
            let world = parent_world * data.matrix();
            self.push_children(node, world);
            return Some(Instance { node, data, world });
        }
    }
}

impl NodeStore {
    /// Walks every root path in depth-first pre-order, resolving world
    /// transforms on the way down.
    #[must_use]
    pub fn instances(&self) -> Instances<'_> {
        Instances::new(self)
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    fn walk(store: &NodeStore) -> Vec<NodeId> {
        store.instances().map(|i| i.node).collect()
    }

    #[test]
    fn empty_graph_yields_nothing() {
        assert_eq!(NodeStore::new().instances().count(), 0);
    }

    #[test]
    fn pre_order_follows_child_order() {
        let mut s = NodeStore::new();
        let a = s.create_node(NodeData::default());
        let b = s.create_node(NodeData::default());
        let a1 = s.create_node(NodeData::default());
        let a2 = s.create_node(NodeData::default());
        s.append_child(a, NodeId::MASTER_ROOT).unwrap();
        s.append_child(b, NodeId::MASTER_ROOT).unwrap();
        s.append_child(a1, a).unwrap();
        s.append_child(a2, a).unwrap();

        assert_eq!(walk(&s), vec![a, a1, a2, b]);
    }

    #[test]
    fn shared_node_is_visited_once_per_path() {
        let mut s = NodeStore::new();
        let p = s.create_node(NodeData::new(Matrix4::from_translation(1.0, 0.0, 0.0)));
        let q = s.create_node(NodeData::new(Matrix4::from_translation(0.0, 1.0, 0.0)));
        let shared = s.create_node(NodeData::default());
        s.append_child(p, NodeId::MASTER_ROOT).unwrap();
        s.append_child(q, NodeId::MASTER_ROOT).unwrap();
        s.append_child(shared, p).unwrap();
        s.append_child(shared, q).unwrap();

        let worlds: Vec<_> = s
            .instances()
            .filter(|i| i.node == shared)
            .map(|i| i.world)
            .collect();
        assert_eq!(
            worlds,
            vec![
                Matrix4::from_translation(1.0, 0.0, 0.0),
                Matrix4::from_translation(0.0, 1.0, 0.0),
            ]
        );
    }

    #[test]
    fn stacked_duplicate_edges_multiply_paths() {
        let mut s = NodeStore::new();
        let mut parent = NodeId::MASTER_ROOT;
        let mut chain = Vec::new();
        for _ in 0..3 {
            let node = s.create_node(NodeData::default());
            s.append_child(node, parent).unwrap();
            s.append_child(node, parent).unwrap();
            chain.push(node);
            parent = node;
        }

        let nodes = walk(&s);
        let count = |n: NodeId| nodes.iter().filter(|&&v| v == n).count();
        assert_eq!(count(chain[0]), 2);
        assert_eq!(count(chain[1]), 4);
        assert_eq!(count(chain[2]), 8);
        assert_eq!(nodes.len(), 14);
    }

    #[test]
    fn world_is_parent_times_local() {
        let m1 = Matrix4::from_translation(1.0, 2.0, 3.0);
        let m2 = Matrix4::from_scale(2.0, 2.0, 2.0);
        let mut s = NodeStore::new();
        let a = s.create_node(NodeData::new(m1));
        let b = s.create_node(NodeData::new(m2));
        s.append_child(a, NodeId::MASTER_ROOT).unwrap();
        s.append_child(b, a).unwrap();

        let last = s.instances().last().unwrap();
        assert_eq!(last.node, b);
        assert_eq!(last.world, m1 * m2);
    }

    #[test]
    fn detached_nodes_are_skipped() {
        let mut s = NodeStore::new();
        let orphan = s.create_node(NodeData::output(Matrix4::IDENTITY));
        let kid = s.create_node(NodeData::output(Matrix4::IDENTITY));
        s.append_child(kid, orphan).unwrap();
        assert!(walk(&s).is_empty());
    }
}
