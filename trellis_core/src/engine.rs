// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The graph transform engine.
//!
//! [`Engine`] is the façade applications talk to. It owns the host copy of
//! the graph, records every edit as a [`Command`], and coordinates one
//! [`Device`] through the compute lifecycle:
//!
//! ```text
//!   edit ──► host NodeStore (read-your-writes)
//!     │
//!     └────► CommandQueue ──► compute() ──► Transaction ──► Device::submit
//!                                                               │
//!   output() ◄── OutputData ◄── Fence::wait ◄── finish() ◄──────┘
//! ```
//!
//! # Lifecycle
//!
//! The engine is *idle* when no transaction is outstanding and *in flight*
//! between a `compute` and the harvest of its fence. Edits are accepted in
//! both states; while a transaction is in flight they go to the next one.
//!
//! The [`OverlapPolicy`] in [`EngineConfig`] decides what `compute` does
//! when the previous transaction has not signalled yet.
//!
//! # Errors
//!
//! Graph edits are checked against the host copy before they are recorded,
//! so a failed edit leaves no trace. A device failure ends the transaction it
//! belongs to: the engine returns to idle, the error surfaces from the call
//! that harvested the fence, and the previous [`OutputData`] stays readable.

use alloc::boxed::Box;
use core::fmt;

use crate::backend::{Device, Fence};
use crate::command::{Command, CommandQueue, Transaction};
use crate::config::{EngineConfig, FeatureSet, OverlapPolicy};
use crate::error::{Error, Result};
use crate::node::{NodeData, NodeId, NodeIndex, NodeStore};
use crate::output::OutputData;
use crate::parameter::ComputeParameter;
#[cfg(feature = "trace-rich")]
use crate::trace::CommandEvent;
use crate::trace::{CompleteEvent, PhaseKind, RejectedEvent, SubmitEvent, TraceSink, Tracer};

enum Cycle<F> {
    Idle,
    InFlight { sequence: u64, fence: F },
}

/// Host-side scene-graph transform engine.
///
/// See the [module docs](self) for the lifecycle.
pub struct Engine<D: Device> {
    config: EngineConfig,
    device: D,
    graph: NodeStore,
    queue: CommandQueue,
    cycle: Cycle<D::Fence>,
    output: Option<OutputData>,
    next_sequence: u64,
    sink: Option<Box<dyn TraceSink + Send>>,
}

impl<D: Device> Engine<D> {
    /// Creates an engine driving `device`.
    pub fn new(device: D, config: EngineConfig) -> Self {
        Self {
            config,
            device,
            graph: NodeStore::new(),
            queue: CommandQueue::new(),
            cycle: Cycle::Idle,
            output: None,
            next_sequence: 1,
            sink: None,
        }
    }

    /// The configuration fixed at construction.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The enabled features.
    #[must_use]
    pub fn features(&self) -> FeatureSet {
        self.config.features
    }

    /// The device.
    #[must_use]
    pub fn device(&self) -> &D {
        &self.device
    }

    /// The host copy of the graph, with every recorded edit applied.
    #[must_use]
    pub fn graph(&self) -> &NodeStore {
        &self.graph
    }

    /// Installs a sink for lifecycle events, replacing any previous one.
    ///
    /// Events are only emitted when `trellis_core` is built with the `trace`
    /// feature.
    pub fn set_trace_sink(&mut self, sink: Option<Box<dyn TraceSink + Send>>) {
        self.sink = sink;
    }

    /// Takes the installed sink back out.
    pub fn take_trace_sink(&mut self) -> Option<Box<dyn TraceSink + Send>> {
        self.sink.take()
    }

    // -- Node API --

    /// Creates a node with no edges.
    pub fn create_node(&mut self, data: NodeData) -> Result<NodeId> {
        self.require(data.required_features())?;
        let id = self.graph.create_node(data.clone());
        self.queue.push(Command::CreateNode { id, data });
        Ok(id)
    }

    /// Deletes a node, severing every edge to its parents and children.
    ///
    /// Each severed edge is recorded as its own
    /// [`RemoveChildAt`](Command::RemoveChildAt) ahead of the
    /// [`DeleteNode`](Command::DeleteNode).
    pub fn delete_node(&mut self, id: NodeId) -> Result<()> {
        for (target, index) in self.graph.severing_edges(id)? {
            self.graph.remove_child(index, target)?;
            self.queue.push(Command::RemoveChildAt { index, target });
        }
        self.graph.delete_node(id)?;
        self.queue.push(Command::DeleteNode { id });
        Ok(())
    }

    /// Returns whether `id` is a live node.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.graph.contains(id)
    }

    /// Number of live nodes, excluding the master root.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.len()
    }

    /// The current data of a node.
    pub fn node_data(&self, id: NodeId) -> Result<&NodeData> {
        self.graph.node_data(id)
    }

    /// Replaces a node's attributes and output flag.
    pub fn update_node_data(&mut self, id: NodeId, data: NodeData) -> Result<()> {
        self.require(data.required_features())?;
        self.graph.set_node_data(id, data.clone())?;
        self.queue.push(Command::UpdateNodeData { id, data });
        Ok(())
    }

    // -- Topology API --

    /// Number of children of `target`.
    pub fn child_count(&self, target: NodeId) -> Result<NodeIndex> {
        self.graph.child_count(target)
    }

    /// The child at `index` of `target`.
    pub fn child(&self, index: NodeIndex, target: NodeId) -> Result<NodeId> {
        self.graph.child(index, target)
    }

    /// The ordered children of `target`.
    pub fn children(&self, target: NodeId) -> Result<&[NodeId]> {
        self.graph.children(target)
    }

    /// Number of parents of `target`.
    pub fn parent_count(&self, target: NodeId) -> Result<NodeIndex> {
        self.graph.parent_count(target)
    }

    /// The parent at `index` of `target`.
    pub fn parent(&self, index: NodeIndex, target: NodeId) -> Result<NodeId> {
        self.graph.parent(index, target)
    }

    /// The ordered parents of `target`.
    pub fn parents(&self, target: NodeId) -> Result<&[NodeId]> {
        self.graph.parents(target)
    }

    /// Adds `child` at the end of `target`'s children.
    pub fn append_child(&mut self, child: NodeId, target: NodeId) -> Result<()> {
        self.graph.append_child(child, target)?;
        self.queue.push(Command::AppendChild { child, target });
        Ok(())
    }

    /// Adds `child` at the front of `target`'s children.
    pub fn prepend_child(&mut self, child: NodeId, target: NodeId) -> Result<()> {
        self.graph.prepend_child(child, target)?;
        self.queue.push(Command::PrependChild { child, target });
        Ok(())
    }

    /// Inserts `child` at `index` of `target`'s children.
    pub fn insert_child(&mut self, index: NodeIndex, child: NodeId, target: NodeId) -> Result<()> {
        self.graph.insert_child(index, child, target)?;
        self.queue.push(Command::InsertChildAt {
            index,
            child,
            target,
        });
        Ok(())
    }

    /// Removes the edge at `index` of `target`'s children. The child node
    /// survives.
    pub fn remove_child(&mut self, index: NodeIndex, target: NodeId) -> Result<()> {
        self.graph.remove_child(index, target)?;
        self.queue.push(Command::RemoveChildAt { index, target });
        Ok(())
    }

    // -- Compute API --

    /// Stages a parameter for the next transaction. A later value of the same
    /// kind replaces an earlier one.
    pub fn set_compute_parameter(&mut self, param: ComputeParameter) -> Result<()> {
        if let Some(feature) = param.kind().required_feature() {
            self.require(FeatureSet::EMPTY.with(feature))?;
        }
        self.queue.stage_parameter(param);
        Ok(())
    }

    /// Number of graph commands waiting for the next transaction.
    #[must_use]
    pub fn pending_commands(&self) -> usize {
        self.queue.len()
    }

    /// Drains the queue into a transaction and submits it, returning its
    /// sequence number.
    ///
    /// An empty queue still produces a transaction. With `blocking`, waits
    /// for it to complete before returning.
    ///
    /// # Errors
    ///
    /// - [`Error::ComputeInProgress`] under [`OverlapPolicy::Reject`] when
    ///   the previous transaction has not signalled. The queue is kept.
    /// - [`Error::Device`] when harvesting the previous transaction fails
    ///   (the queue is kept), or when this transaction fails to submit or,
    ///   with `blocking`, to complete.
    pub fn compute(&mut self, blocking: bool) -> Result<u64> {
        self.poll()?;
        if let Cycle::InFlight { sequence, .. } = self.cycle {
            match self.config.overlap {
                OverlapPolicy::Reject => {
                    let event = RejectedEvent {
                        outstanding: sequence,
                        queued: self.queue.len(),
                    };
                    self.trace(|t| t.rejected(&event));
                    return Err(Error::ComputeInProgress { sequence });
                }
                OverlapPolicy::Serialize => self.finish()?,
            }
        }

        let sequence = self.next_sequence;
        self.next_sequence += 1;

        self.trace(|t| t.phase_begin(sequence, PhaseKind::Drain));
        let parameters = self.queue.parameters().len();
        let transaction = Transaction {
            sequence,
            features: self.config.features,
            commands: self.queue.drain(),
        };
        self.trace(|t| t.phase_end(sequence, PhaseKind::Drain));

        #[cfg(feature = "trace-rich")]
        if self.sink.is_some() {
            for (index, command) in transaction.commands.iter().enumerate() {
                let event = CommandEvent {
                    sequence,
                    index,
                    kind: command.kind(),
                    subject: command.subject(),
                };
                self.trace(|t| t.command(&event));
            }
        }

        let event = SubmitEvent {
            sequence,
            commands: transaction.commands.len(),
            parameters,
        };
        self.trace(|t| t.phase_begin(sequence, PhaseKind::Submit));
        let submitted = self.device.submit(transaction);
        self.trace(|t| t.phase_end(sequence, PhaseKind::Submit));
        let fence = submitted?;
        self.trace(|t| t.submit(&event));

        self.cycle = Cycle::InFlight { sequence, fence };
        if blocking {
            self.finish()?;
        }
        Ok(sequence)
    }

    /// Returns whether the most recent transaction has completed. True when
    /// nothing is outstanding. Never blocks.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        match &self.cycle {
            Cycle::Idle => true,
            Cycle::InFlight { fence, .. } => fence.is_signaled(),
        }
    }

    /// Sequence number of the outstanding transaction, if any.
    #[must_use]
    pub fn in_flight(&self) -> Option<u64> {
        match &self.cycle {
            Cycle::Idle => None,
            Cycle::InFlight { sequence, .. } => Some(*sequence),
        }
    }

    /// Blocks until the outstanding transaction completes and stores its
    /// outputs. Returns immediately when idle.
    pub fn finish(&mut self) -> Result<()> {
        match core::mem::replace(&mut self.cycle, Cycle::Idle) {
            Cycle::Idle => Ok(()),
            Cycle::InFlight { sequence, fence } => self.harvest(sequence, fence),
        }
    }

    /// Harvests the outstanding transaction if it has signalled. Returns
    /// whether the engine is idle afterwards.
    pub fn poll(&mut self) -> Result<bool> {
        if !self.is_finished() {
            return Ok(false);
        }
        self.finish()?;
        Ok(true)
    }

    /// Outputs of the most recent completed transaction, harvesting a
    /// signalled one first.
    ///
    /// While a transaction is in flight this is the previous transaction's
    /// data. `None` until a transaction has completed.
    pub fn output(&mut self) -> Result<Option<&OutputData>> {
        self.poll()?;
        Ok(self.output.as_ref())
    }

    /// Outputs of the most recently harvested transaction, without polling.
    #[must_use]
    pub fn last_output(&self) -> Option<&OutputData> {
        self.output.as_ref()
    }

    // -- Internal helpers --

    fn harvest(&mut self, sequence: u64, fence: D::Fence) -> Result<()> {
        self.trace(|t| t.phase_begin(sequence, PhaseKind::Wait));
        let result = fence.wait();
        self.trace(|t| t.phase_end(sequence, PhaseKind::Wait));
        match result {
            Ok(output) => {
                debug_assert_eq!(
                    output.sequence(),
                    sequence,
                    "fence returned output of another transaction"
                );
                let event = CompleteEvent {
                    sequence,
                    instances: output.instance_count(),
                    failed: false,
                };
                self.trace(|t| t.complete(&event));
                self.output = Some(output);
                Ok(())
            }
            Err(err) => {
                let event = CompleteEvent {
                    sequence,
                    instances: 0,
                    failed: true,
                };
                self.trace(|t| t.complete(&event));
                Err(err.into())
            }
        }
    }

    fn require(&self, features: FeatureSet) -> Result<()> {
        match features.iter().find(|f| !self.config.features.contains(*f)) {
            Some(missing) => Err(Error::FeatureNotEnabled(missing)),
            None => Ok(()),
        }
    }

    #[inline]
    fn trace(&mut self, f: impl FnOnce(&mut Tracer<'_>)) {
        match self.sink.as_deref_mut() {
            Some(sink) => f(&mut Tracer::new(sink)),
            None => f(&mut Tracer::none()),
        }
    }
}

impl<D: Device + fmt::Debug> fmt::Debug for Engine<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .field("device", &self.device)
            .field("nodes", &self.graph.len())
            .field("pending", &self.queue.len())
            .field("in_flight", &self.in_flight())
            .field("output", &self.output.as_ref().map(OutputData::sequence))
            .field("next_sequence", &self.next_sequence)
            .field("traced", &self.sink.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::cell::Cell;

    use super::*;
    use crate::buffer::Buffer;
    use crate::command::CommandKind;
    use crate::config::Feature;
    use crate::error::DeviceError;
    use crate::node::Aabb;
    use crate::output::OutputAttribute;
    use crate::transform::Matrix4;

    /// Records transactions; fences signal when the device's gate is open.
    #[derive(Debug, Default)]
    struct ScriptDevice {
        log: Vec<Transaction>,
        gate: Rc<Cell<bool>>,
        fail_next: Option<DeviceError>,
    }

    impl ScriptDevice {
        fn open() -> Self {
            let device = Self::default();
            device.gate.set(true);
            device
        }
    }

    #[derive(Debug)]
    struct ScriptFence {
        gate: Rc<Cell<bool>>,
        result: core::result::Result<OutputData, DeviceError>,
    }

    impl Device for ScriptDevice {
        type Fence = ScriptFence;

        fn submit(&mut self, transaction: Transaction) -> core::result::Result<ScriptFence, DeviceError> {
            let result = match self.fail_next.take() {
                Some(err) => Err(err),
                None => {
                    let mut out = OutputData::new(transaction.sequence);
                    let n = transaction.commands.len();
                    out.insert(OutputAttribute::Matrices(Buffer::from_pod(&vec![
                        Matrix4::IDENTITY;
                        n
                    ])));
                    Ok(out)
                }
            };
            self.log.push(transaction);
            Ok(ScriptFence {
                gate: self.gate.clone(),
                result,
            })
        }
    }

    impl Fence for ScriptFence {
        fn is_signaled(&self) -> bool {
            self.gate.get()
        }

        fn wait(self) -> core::result::Result<OutputData, DeviceError> {
            self.gate.set(true);
            self.result
        }
    }

    fn engine(config: EngineConfig) -> Engine<ScriptDevice> {
        Engine::new(ScriptDevice::open(), config)
    }

    fn kinds(tx: &Transaction) -> Vec<CommandKind> {
        tx.commands.iter().map(Command::kind).collect()
    }

    #[test]
    fn edits_are_visible_before_compute() {
        let mut e = engine(EngineConfig::minimal());
        let a = e.create_node(NodeData::default()).unwrap();
        let b = e.create_node(NodeData::default()).unwrap();
        e.append_child(a, NodeId::MASTER_ROOT).unwrap();
        e.append_child(b, NodeId::MASTER_ROOT).unwrap();

        let last = e.child_count(NodeId::MASTER_ROOT).unwrap() - 1;
        assert_eq!(e.child(last, NodeId::MASTER_ROOT).unwrap(), b);
        assert_eq!(e.parent(0, a).unwrap(), NodeId::MASTER_ROOT);
        assert_eq!(e.pending_commands(), 4);
        assert!(e.device().log.is_empty());
    }

    #[test]
    fn failed_edits_record_nothing() {
        let mut e = engine(EngineConfig::minimal());
        let a = e.create_node(NodeData::default()).unwrap();
        assert_eq!(
            e.insert_child(3, a, NodeId::MASTER_ROOT),
            Err(Error::OutOfRange { index: 3, len: 0 })
        );
        assert_eq!(
            e.remove_child(0, a),
            Err(Error::OutOfRange { index: 0, len: 0 })
        );
        assert_eq!(
            e.append_child(a, a),
            Err(Error::CycleDetected { child: a, target: a })
        );
        assert_eq!(e.pending_commands(), 1);
    }

    #[test]
    fn optional_attributes_need_their_feature() {
        let mut e = engine(EngineConfig::minimal());
        let boxed = NodeData::output(Matrix4::IDENTITY).with_aabb(Aabb::default());
        assert_eq!(
            e.create_node(boxed.clone()),
            Err(Error::FeatureNotEnabled(Feature::FrustumCulling))
        );
        let a = e.create_node(NodeData::default()).unwrap();
        assert_eq!(
            e.update_node_data(a, NodeData::default().with_user_ids([1])),
            Err(Error::FeatureNotEnabled(Feature::UserIds))
        );
        assert_eq!(
            e.set_compute_parameter(ComputeParameter::CpuCamera(Matrix4::IDENTITY)),
            Err(Error::FeatureNotEnabled(Feature::FrustumCulling))
        );
        assert_eq!(e.pending_commands(), 1);

        let mut full = engine(EngineConfig::full());
        assert!(full.create_node(boxed).is_ok());
        assert!(
            full.set_compute_parameter(ComputeParameter::CpuCamera(Matrix4::IDENTITY))
                .is_ok()
        );
    }

    #[test]
    fn delete_records_each_severed_edge_first() {
        let mut e = engine(EngineConfig::minimal());
        let p = e.create_node(NodeData::default()).unwrap();
        let n = e.create_node(NodeData::default()).unwrap();
        let k = e.create_node(NodeData::default()).unwrap();
        e.append_child(p, NodeId::MASTER_ROOT).unwrap();
        e.append_child(n, p).unwrap();
        e.append_child(k, n).unwrap();
        e.compute(true).unwrap();

        e.delete_node(n).unwrap();
        assert!(!e.contains(n));
        assert_eq!(e.child_count(p).unwrap(), 0);
        assert_eq!(e.parent_count(k).unwrap(), 0);
        assert_eq!(e.node_data(n), Err(Error::InvalidNode(n)));

        e.compute(true).unwrap();
        let tx = &e.device().log[1];
        assert_eq!(
            tx.commands,
            vec![
                Command::RemoveChildAt {
                    index: 0,
                    target: p
                },
                Command::RemoveChildAt {
                    index: 0,
                    target: n
                },
                Command::DeleteNode { id: n },
            ]
        );
    }

    #[test]
    fn compute_drains_into_numbered_transactions() {
        let mut e = engine(EngineConfig::full());
        let a = e.create_node(NodeData::output(Matrix4::IDENTITY)).unwrap();
        e.append_child(a, NodeId::MASTER_ROOT).unwrap();
        e.set_compute_parameter(ComputeParameter::CpuCamera(Matrix4::IDENTITY))
            .unwrap();

        assert_eq!(e.compute(true), Ok(1));
        assert_eq!(e.pending_commands(), 0);
        assert_eq!(e.compute(true), Ok(2));

        let log = &e.device().log;
        assert_eq!(log[0].sequence, 1);
        assert_eq!(log[0].features, EngineConfig::full().features);
        assert_eq!(
            kinds(&log[0]),
            [
                CommandKind::CreateNode,
                CommandKind::AppendChild,
                CommandKind::SetComputeParameter
            ]
        );
        assert!(log[1].is_empty());
        assert_eq!(e.output().unwrap().map(OutputData::sequence), Some(2));
    }

    #[test]
    fn empty_compute_completes() {
        let mut e = engine(EngineConfig::minimal());
        e.compute(false).unwrap();
        e.finish().unwrap();
        assert!(e.is_finished());
        assert_eq!(e.last_output().map(OutputData::instance_count), Some(0));
    }

    #[test]
    fn finished_stays_finished_until_next_compute() {
        let mut e = Engine::new(ScriptDevice::default(), EngineConfig::minimal());
        assert!(e.is_finished());
        e.compute(false).unwrap();
        assert!(!e.is_finished());
        e.finish().unwrap();
        assert!(e.is_finished());
        assert!(e.is_finished());
        e.compute(false).unwrap();
        assert!(e.is_finished(), "gate was left open by the first wait");
    }

    #[test]
    fn overlap_is_rejected_and_keeps_the_queue() {
        let mut e = Engine::new(ScriptDevice::default(), EngineConfig::minimal());
        e.compute(false).unwrap();
        let a = e.create_node(NodeData::default()).unwrap();

        assert_eq!(e.compute(false), Err(Error::ComputeInProgress { sequence: 1 }));
        assert_eq!(e.pending_commands(), 1);
        assert_eq!(e.in_flight(), Some(1));

        e.device().gate.set(true);
        assert_eq!(e.compute(false), Ok(2));
        assert_eq!(
            e.device().log[1].commands,
            vec![Command::CreateNode {
                id: a,
                data: NodeData::default()
            }]
        );
    }

    #[test]
    fn overlap_is_serialized_when_configured() {
        let config = EngineConfig::minimal().with_overlap(OverlapPolicy::Serialize);
        let mut e = Engine::new(ScriptDevice::default(), config);
        e.compute(false).unwrap();
        e.create_node(NodeData::default()).unwrap();

        assert_eq!(e.compute(false), Ok(2));
        assert_eq!(e.last_output().map(OutputData::sequence), Some(1));
        e.finish().unwrap();
        assert_eq!(e.last_output().map(OutputData::sequence), Some(2));
    }

    #[test]
    fn device_failure_keeps_previous_output() {
        let mut e = engine(EngineConfig::minimal());
        e.compute(true).unwrap();

        let mut failing = ScriptDevice::open();
        failing.fail_next = Some(DeviceError::Lost);
        e.device = failing;
        let err = e.compute(true).unwrap_err();
        assert_eq!(err, Error::Device(DeviceError::Lost));
        assert!(e.is_finished());
        assert_eq!(e.last_output().map(OutputData::sequence), Some(1));

        assert_eq!(e.compute(true), Ok(3));
    }

    #[test]
    fn output_harvests_signalled_transactions() {
        let mut e = Engine::new(ScriptDevice::default(), EngineConfig::minimal());
        e.compute(false).unwrap();
        assert_eq!(e.output().unwrap().map(OutputData::sequence), None);
        e.device().gate.set(true);
        assert_eq!(e.output().unwrap().map(OutputData::sequence), Some(1));
        assert_eq!(e.in_flight(), None);
    }

    #[cfg(feature = "trace")]
    #[test]
    fn lifecycle_events_reach_the_sink() {
        use alloc::sync::Arc;
        use core::sync::atomic::{AtomicUsize, Ordering};

        #[derive(Default)]
        struct Counts {
            submits: AtomicUsize,
            completes: AtomicUsize,
            rejects: AtomicUsize,
        }
        struct CountingSink(Arc<Counts>);
        impl TraceSink for CountingSink {
            fn on_submit(&mut self, _: &SubmitEvent) {
                self.0.submits.fetch_add(1, Ordering::Relaxed);
            }
            fn on_complete(&mut self, _: &CompleteEvent) {
                self.0.completes.fetch_add(1, Ordering::Relaxed);
            }
            fn on_rejected(&mut self, _: &RejectedEvent) {
                self.0.rejects.fetch_add(1, Ordering::Relaxed);
            }
        }

        let counts = Arc::new(Counts::default());
        let mut e = Engine::new(ScriptDevice::default(), EngineConfig::minimal());
        e.set_trace_sink(Some(Box::new(CountingSink(counts.clone()))));
        e.compute(false).unwrap();
        assert!(e.compute(false).is_err());
        e.finish().unwrap();

        assert_eq!(counts.submits.load(Ordering::Relaxed), 1);
        assert_eq!(counts.completes.load(Ordering::Relaxed), 1);
        assert_eq!(counts.rejects.load(Ordering::Relaxed), 1);
    }
}
