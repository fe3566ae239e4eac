// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Animated orbit that exercises the engine, the CPU device, and the
//! diagnostics pipeline.
//!
//! A sun carries an orbiting planet, the planet carries a moon, and a beacon
//! hangs under both the sun and the planet so it is instanced twice. Each
//! frame rotates the planet, submits without blocking, and polls until the
//! worker is done. Culling and user-id grouping are on, so the planet drops
//! out of view for part of its orbit and instances come back grouped by tag.
//!
//! Events go to a [`PrettyPrintSink`] on stderr and to a recording that is
//! exported as Chrome trace JSON at the end (path from the first argument,
//! default `orbit_trace.json`).

use std::error::Error;
use std::f32::consts::TAU;
use std::fs::File;
use std::io::BufWriter;

use trellis_core::config::EngineConfig;
use trellis_core::engine::Engine;
use trellis_core::node::{Aabb, NodeData, NodeId, UserId};
use trellis_core::parameter::ComputeParameter;
use trellis_core::transform::Matrix4;
use trellis_cpu::CpuDevice;
use trellis_debug::pretty::PrettyPrintSink;
use trellis_debug::tee::{SharedRecorder, Tee};

const FRAME_COUNT: u16 = 24;

const SUN: UserId = 1;
const PLANET: UserId = 2;
const MOON: UserId = 3;
const BEACON: UserId = 9;

const UNIT_BOX: Aabb = Aabb::new([-0.5; 3], [1.0; 3]);

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "orbit_trace.json".to_owned());

    // -- engine ------------------------------------------------------------
    let device = CpuDevice::spawn()?;
    let mut engine = Engine::new(device, EngineConfig::full());
    let recorder = SharedRecorder::new();
    engine.set_trace_sink(Some(Box::new(Tee(
        PrettyPrintSink::stderr(),
        recorder.clone(),
    ))));

    // -- scene -------------------------------------------------------------
    let sun = engine.create_node(
        NodeData::output(Matrix4::from_scale(2.0, 2.0, 2.0))
            .with_aabb(UNIT_BOX)
            .with_user_ids([SUN]),
    )?;
    engine.append_child(sun, NodeId::MASTER_ROOT)?;

    let planet = engine.create_node(planet_data(0.0))?;
    engine.append_child(planet, sun)?;

    let moon = engine.create_node(
        NodeData::output(Matrix4::from_translation(1.5, 0.0, 0.0))
            .with_aabb(UNIT_BOX)
            .with_user_ids([MOON]),
    )?;
    engine.append_child(moon, planet)?;

    let beacon = engine.create_node(
        NodeData::output(Matrix4::from_translation(0.0, 1.0, 0.0)).with_user_ids([BEACON]),
    )?;
    engine.append_child(beacon, sun)?;
    engine.append_child(beacon, planet)?;

    let camera = Matrix4::perspective_gl(TAU / 12.0, 16.0 / 9.0, 0.1, 100.0)
        * Matrix4::from_translation(0.0, 0.0, -12.0);
    engine.set_compute_parameter(ComputeParameter::CpuCamera(camera))?;

    tracing::info!(nodes = engine.node_count(), "scene built");

    // -- frames ------------------------------------------------------------
    for frame in 0..FRAME_COUNT {
        let angle = TAU * f32::from(frame) / f32::from(FRAME_COUNT);
        engine.update_node_data(planet, planet_data(angle))?;

        let sequence = engine.compute(false)?;
        let mut spins = 0_u32;
        while !engine.poll()? {
            spins += 1;
            std::thread::yield_now();
        }

        if let Some(output) = engine.output()? {
            report(frame, sequence, spins, output)?;
        }
    }

    // -- teardown ----------------------------------------------------------
    engine.delete_node(moon)?;
    engine.compute(true)?;
    if let Some(output) = engine.last_output() {
        tracing::info!(
            sequence = output.sequence(),
            instances = output.instance_count(),
            "moon removed"
        );
    }

    let file = File::create(&path)?;
    let mut writer = BufWriter::new(file);
    trellis_debug::chrome::export(&recorder.to_bytes(), &mut writer)?;
    println!("Wrote {path} ({FRAME_COUNT} frames)");
    Ok(())
}

/// The planet at `angle` radians around the sun.
fn planet_data(angle: f32) -> NodeData {
    NodeData::output(Matrix4::from_rotation_y(angle) * Matrix4::from_translation(4.0, 0.0, 0.0))
        .with_aabb(UNIT_BOX)
        .with_user_ids([PLANET])
}

fn report(
    frame: u16,
    sequence: u64,
    spins: u32,
    output: &trellis_core::output::OutputData,
) -> Result<(), Box<dyn Error>> {
    let groups = output
        .user_ids()?
        .read()
        .ok_or("user id buffers are not host-visible")?;
    let tags: Vec<String> = groups
        .iter()
        .map(|(tag, range)| format!("{tag}x{}", range.len()))
        .collect();
    println!(
        "frame {frame:>2} seq={sequence} instances={} groups=[{}] polls={spins}",
        output.instance_count(),
        tags.join(" "),
    );
    Ok(())
}
