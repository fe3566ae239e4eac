// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The CPU [`Device`] and its fences.
//!
//! [`CpuDevice::spawn`] starts a worker thread that executes transactions
//! from a FIFO channel, so they complete in submission order.
//! [`CpuDevice::inline`] executes on the submitting thread instead, which
//! keeps tests deterministic.

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::thread::{self, JoinHandle};

use parking_lot::{Condvar, Mutex};
use trellis_core::DeviceError;
use trellis_core::backend::{Device, Fence};
use trellis_core::command::Transaction;
use trellis_core::output::OutputData;

use crate::kernel::DeviceState;

type Outcome = Result<OutputData, DeviceError>;

/// Completion state shared by a fence and the code that fulfils it.
#[derive(Debug, Default)]
struct FenceSlot {
    outcome: Mutex<Option<Outcome>>,
    ready: Condvar,
    signaled: AtomicBool,
}

impl FenceSlot {
    fn fulfil(&self, outcome: Outcome) {
        let mut guard = self.outcome.lock();
        if self.signaled.load(Ordering::Relaxed) {
            return;
        }
        *guard = Some(outcome);
        self.signaled.store(true, Ordering::Release);
        self.ready.notify_all();
    }
}

/// Fulfils its slot with [`DeviceError::Lost`] if dropped before
/// [`complete`](Self::complete), e.g. when the worker panics or exits with
/// jobs still queued.
#[derive(Debug)]
struct Completion(Arc<FenceSlot>);

impl Completion {
    fn complete(self, outcome: Outcome) {
        self.0.fulfil(outcome);
    }
}

impl Drop for Completion {
    fn drop(&mut self) {
        self.0.fulfil(Err(DeviceError::Lost));
    }
}

/// Completion handle for a [`CpuDevice`] transaction.
#[derive(Debug)]
pub struct CpuFence {
    slot: Arc<FenceSlot>,
}

impl CpuFence {
    fn pending() -> (Self, Completion) {
        let slot = Arc::new(FenceSlot::default());
        (Self { slot: slot.clone() }, Completion(slot))
    }
}

impl Fence for CpuFence {
    fn is_signaled(&self) -> bool {
        self.slot.signaled.load(Ordering::Acquire)
    }

    fn wait(self) -> Outcome {
        let mut guard = self.slot.outcome.lock();
        loop {
            if let Some(outcome) = guard.take() {
                return outcome;
            }
            self.slot.ready.wait(&mut guard);
        }
    }
}

/// Blocks the worker between transactions while closed.
#[derive(Debug, Default)]
struct Gate {
    held: Mutex<bool>,
    opened: Condvar,
}

impl Gate {
    fn set_held(&self, held: bool) {
        *self.held.lock() = held;
        if !held {
            self.opened.notify_all();
        }
    }

    fn pass(&self) {
        let mut held = self.held.lock();
        while *held {
            self.opened.wait(&mut held);
        }
    }
}

struct Job {
    transaction: Transaction,
    completion: Completion,
}

#[derive(Debug)]
enum Mode {
    Inline(DeviceState),
    Worker {
        jobs: Option<mpsc::Sender<Job>>,
        handle: Option<JoinHandle<()>>,
        gate: Arc<Gate>,
    },
}

/// Reference device that evaluates transactions on the CPU.
#[derive(Debug)]
pub struct CpuDevice {
    mode: Mode,
    submitted: u64,
}

impl CpuDevice {
    /// Starts a device backed by a dedicated worker thread.
    pub fn spawn() -> io::Result<Self> {
        let (tx, rx) = mpsc::channel::<Job>();
        let gate = Arc::new(Gate::default());
        let worker_gate = gate.clone();
        let handle = thread::Builder::new()
            .name("trellis-cpu".into())
            .spawn(move || run_worker(&rx, &worker_gate))?;
        tracing::debug!("cpu device worker started");
        Ok(Self {
            mode: Mode::Worker {
                jobs: Some(tx),
                handle: Some(handle),
                gate,
            },
            submitted: 0,
        })
    }

    /// Creates a device that executes each transaction inside
    /// [`submit`](Device::submit). Fences are signalled on return.
    #[must_use]
    pub fn inline() -> Self {
        Self {
            mode: Mode::Inline(DeviceState::new()),
            submitted: 0,
        }
    }

    /// Number of transactions accepted so far.
    #[must_use]
    pub fn submitted(&self) -> u64 {
        self.submitted
    }

    /// Holds the worker before its next transaction until
    /// [`release`](Self::release). Has no effect on inline devices.
    ///
    /// Useful for stepping through overlapping submissions.
    pub fn hold(&self) {
        if let Mode::Worker { gate, .. } = &self.mode {
            gate.set_held(true);
        }
    }

    /// Lets a held worker continue.
    pub fn release(&self) {
        if let Mode::Worker { gate, .. } = &self.mode {
            gate.set_held(false);
        }
    }
}

impl Device for CpuDevice {
    type Fence = CpuFence;

    fn submit(&mut self, transaction: Transaction) -> Result<CpuFence, DeviceError> {
        let (fence, completion) = CpuFence::pending();
        match &mut self.mode {
            Mode::Inline(state) => completion.complete(execute(state, &transaction)),
            Mode::Worker { jobs, .. } => {
                let sender = jobs.as_ref().ok_or(DeviceError::Lost)?;
                sender
                    .send(Job {
                        transaction,
                        completion,
                    })
                    .map_err(|_| DeviceError::Lost)?;
            }
        }
        self.submitted += 1;
        Ok(fence)
    }
}

impl Drop for CpuDevice {
    fn drop(&mut self) {
        if let Mode::Worker { jobs, handle, gate } = &mut self.mode {
            // Closing the channel ends the worker loop once queued jobs ran.
            jobs.take();
            gate.set_held(false);
            if let Some(handle) = handle.take() {
                if handle.join().is_err() {
                    tracing::warn!("cpu device worker panicked");
                }
            }
            tracing::debug!(submitted = self.submitted, "cpu device worker stopped");
        }
    }
}

fn run_worker(jobs: &mpsc::Receiver<Job>, gate: &Gate) {
    let mut state = DeviceState::new();
    while let Ok(job) = jobs.recv() {
        gate.pass();
        let outcome = execute(&mut state, &job.transaction);
        job.completion.complete(outcome);
    }
}

#[tracing::instrument(level = "trace", skip_all, fields(sequence = transaction.sequence))]
fn execute(state: &mut DeviceState, transaction: &Transaction) -> Outcome {
    match state.execute(transaction) {
        Ok((output, stats)) => {
            tracing::debug!(
                sequence = transaction.sequence,
                commands = stats.commands,
                instances = stats.instances,
                culled = stats.culled,
                groups = stats.groups,
                "transaction executed"
            );
            Ok(output)
        }
        Err(err) => {
            tracing::warn!(sequence = transaction.sequence, %err, "transaction failed");
            Err(err)
        }
    }
}
