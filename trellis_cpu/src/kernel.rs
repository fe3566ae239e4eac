// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Device-side graph state and transaction execution.

use std::collections::BTreeMap;

use trellis_core::buffer::Buffer;
use trellis_core::command::{Command, Transaction};
use trellis_core::config::Feature;
use trellis_core::node::{NodeStore, UserId};
use trellis_core::output::{OutputAttribute, OutputData, UserIdsOutput};
use trellis_core::parameter::{ComputeParameter, ComputeParameterKind, ParameterSet};
use trellis_core::transform::Matrix4;
use trellis_core::DeviceError;

use crate::frustum;

/// Counters gathered while executing one transaction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExecStats {
    /// Commands replayed.
    pub commands: usize,
    /// Matrices written.
    pub instances: usize,
    /// Output instances dropped by culling.
    pub culled: usize,
    /// Distinct user tags.
    pub groups: usize,
}

/// The device's copy of the graph plus the parameters applied so far.
#[derive(Debug, Default)]
pub struct DeviceState {
    graph: NodeStore,
    parameters: ParameterSet,
}

impl DeviceState {
    /// Creates an empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The replayed graph.
    #[must_use]
    pub fn graph(&self) -> &NodeStore {
        &self.graph
    }

    /// Parameters in effect.
    #[must_use]
    pub fn parameters(&self) -> &ParameterSet {
        &self.parameters
    }

    /// Replays `tx` and evaluates its outputs.
    ///
    /// Commands are applied in order; the first one that does not apply
    /// fails the whole transaction with
    /// [`DeviceError::InvalidCommand`], leaving the commands before it
    /// applied.
    pub fn execute(&mut self, tx: &Transaction) -> Result<(OutputData, ExecStats), DeviceError> {
        let mut stats = ExecStats {
            commands: tx.commands.len(),
            ..ExecStats::default()
        };
        self.replay(tx)?;

        let mut output = OutputData::new(tx.sequence);
        if !self.graph.has_outputs() {
            return Ok((output, stats));
        }

        let camera = if tx.features.contains(Feature::FrustumCulling) {
            self.camera()?
        } else {
            None
        };

        let mut visible: Vec<(Matrix4, &[UserId])> = Vec::new();
        for instance in self.graph.instances() {
            if !instance.data.is_output {
                continue;
            }
            if let (Some(camera), Some(aabb)) = (camera, instance.data.aabb()) {
                if frustum::is_outside(&(camera * instance.world), aabb) {
                    stats.culled += 1;
                    continue;
                }
            }
            visible.push((instance.world, instance.data.user_ids()));
        }

        if tx.features.contains(Feature::UserIds) {
            let (matrices, offsets, ids) = group_by_user_id(&visible)?;
            stats.instances = matrices.len();
            stats.groups = ids.len();
            let count = to_u32(ids.len())?;
            output.insert(OutputAttribute::Matrices(Buffer::from_pod(&matrices)));
            output.insert(OutputAttribute::UserIds(UserIdsOutput {
                offsets: Buffer::from_pod(&offsets),
                ids: Buffer::from_pod(&ids),
                count: Buffer::from_pod(&[count]),
            }));
        } else {
            let matrices: Vec<Matrix4> = visible.iter().map(|(m, _)| *m).collect();
            stats.instances = matrices.len();
            output.insert(OutputAttribute::Matrices(Buffer::from_pod(&matrices)));
        }
        Ok((output, stats))
    }

    fn replay(&mut self, tx: &Transaction) -> Result<(), DeviceError> {
        for (index, command) in tx.commands.iter().enumerate() {
            if let Command::SetComputeParameter(param) = command {
                self.apply_parameter(param.clone());
                continue;
            }
            self.graph
                .apply(command)
                .map_err(|err| DeviceError::InvalidCommand {
                    sequence: tx.sequence,
                    index,
                    reason: err.to_string(),
                })?;
        }
        Ok(())
    }

    /// Stores `param`; a camera replaces whichever camera was applied before.
    fn apply_parameter(&mut self, param: ComputeParameter) {
        let replaced = match param.kind() {
            ComputeParameterKind::CpuCamera => ComputeParameterKind::GpuCamera,
            ComputeParameterKind::GpuCamera => ComputeParameterKind::CpuCamera,
        };
        self.parameters.remove(replaced);
        self.parameters.set(param);
    }

    /// The camera in effect.
    ///
    /// A GPU camera whose buffer cannot be read fails the current
    /// transaction and is discarded, so later transactions run unculled
    /// until another camera is applied.
    fn camera(&mut self) -> Result<Option<Matrix4>, DeviceError> {
        if let Some(ComputeParameter::CpuCamera(m)) =
            self.parameters.get(ComputeParameterKind::CpuCamera)
        {
            return Ok(Some(*m));
        }
        let first = match self.parameters.get(ComputeParameterKind::GpuCamera) {
            Some(ComputeParameter::GpuCamera(buffer)) => {
                buffer.read_matrices().map(|m| m.first().copied())
            }
            _ => return Ok(None),
        };
        match first {
            Some(Some(camera)) => Ok(Some(camera)),
            unusable => {
                self.parameters.remove(ComputeParameterKind::GpuCamera);
                let reason = if unusable.is_none() {
                    "camera buffer is not host-visible"
                } else {
                    "camera buffer is empty"
                };
                Err(DeviceError::other(reason))
            }
        }
    }
}

/// Lays out matrices by ascending tag, then untagged, with the group offsets
/// and tag list. A tag repeated on one node counts once.
fn group_by_user_id(
    visible: &[(Matrix4, &[UserId])],
) -> Result<(Vec<Matrix4>, Vec<u32>, Vec<UserId>), DeviceError> {
    let mut groups: BTreeMap<UserId, Vec<usize>> = BTreeMap::new();
    let mut untagged = Vec::new();
    for (i, (_, tags)) in visible.iter().enumerate() {
        if tags.is_empty() {
            untagged.push(i);
            continue;
        }
        for &tag in *tags {
            let members = groups.entry(tag).or_default();
            if members.last() != Some(&i) {
                members.push(i);
            }
        }
    }

    let mut matrices = Vec::with_capacity(visible.len());
    let mut offsets = Vec::with_capacity(groups.len() + 1);
    for members in groups.values() {
        offsets.push(to_u32(matrices.len())?);
        matrices.extend(members.iter().map(|&i| visible[i].0));
    }
    offsets.push(to_u32(matrices.len())?);
    matrices.extend(untagged.iter().map(|&i| visible[i].0));

    Ok((matrices, offsets, groups.into_keys().collect()))
}

fn to_u32(n: usize) -> Result<u32, DeviceError> {
    u32::try_from(n).map_err(|_| DeviceError::other(format!("{n} exceeds the u32 output range")))
}
