// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node graph data model.
//!
//! A *node* is a vertex in a directed acyclic graph of transforms. Each node
//! has:
//!
//! - An identity ([`NodeId`]) that is never reused once issued.
//! - Topology: an ordered child list and an ordered parent list. A node may
//!   have several parents, and the same parent may link to it more than once;
//!   every edge counts on its own.
//! - **Attributes** ([`NodeData`]): at most one of each
//!   [`NodeAttributeKind`], plus an `is_output` flag that keeps the node's
//!   resolved world transforms after compute.
//!
//! The master root ([`NodeId::MASTER_ROOT`]) sits above every hierarchy. It
//! has children but no data, and traversal starts from its child list.
//!
//! Nodes are stored in struct-of-arrays layout indexed by id; see
//! [`NodeStore`].

mod attribute;
mod data;
mod id;
mod store;
mod traverse;

pub use attribute::{Aabb, NodeAttribute, NodeAttributeKind, UserId};
pub use data::NodeData;
pub use id::{NodeId, NodeIndex};
pub use store::NodeStore;
pub use traverse::{Instance, Instances};
