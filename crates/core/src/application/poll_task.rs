//! Cancellable poll scheduling
//!
//! A listing job alternates between waiting for its next poll and waiting
//! for a poll response. Cancelling while waiting dequeues the timer at once;
//! cancelling while a request is in flight only raises the flag, and the job
//! observes it when the response arrives. There is no mid-flight abort.

use super::cancellation::CancelToken;
use std::future::Future;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;

/// What a listing job is doing right now
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PollPhase {
    /// Processing a snapshot, or not started yet
    Idle = 0,
    /// A poll timer is scheduled
    Pending = 1,
    /// A request is awaiting its response
    InFlight = 2,
    /// Termination has run
    Terminated = 3,
}

impl PollPhase {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => PollPhase::Pending,
            2 => PollPhase::InFlight,
            3 => PollPhase::Terminated,
            _ => PollPhase::Idle,
        }
    }
}

/// Phase shared between the job and whoever may cancel it
#[derive(Debug)]
pub struct PhaseCell(AtomicU8);

impl Default for PhaseCell {
    fn default() -> Self {
        Self(AtomicU8::new(PollPhase::Idle as u8))
    }
}

impl PhaseCell {
    pub fn get(&self) -> PollPhase {
        PollPhase::from_u8(self.0.load(Ordering::Acquire))
    }

    fn set(&self, phase: PollPhase) {
        self.0.store(phase as u8, Ordering::Release);
    }
}

/// How a scheduled wait ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wake {
    Fired,
    Cancelled,
}

/// Scheduled-task abstraction driving one job's polls
pub struct PollTask {
    token: CancelToken,
    phase: Arc<PhaseCell>,
}

impl PollTask {
    pub fn new(token: CancelToken) -> Self {
        Self {
            token,
            phase: Arc::new(PhaseCell::default()),
        }
    }

    pub fn phase_handle(&self) -> Arc<PhaseCell> {
        Arc::clone(&self.phase)
    }

    pub fn phase(&self) -> PollPhase {
        self.phase.get()
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Wait `delay` before the next poll, unless cancelled first
    pub async fn wait(&mut self, delay: Duration) -> Wake {
        if self.token.is_cancelled() {
            return Wake::Cancelled;
        }

        self.phase.set(PollPhase::Pending);
        let wake = tokio::select! {
            biased;
            _ = self.token.cancelled() => Wake::Cancelled,
            _ = sleep(delay) => Wake::Fired,
        };
        self.phase.set(PollPhase::Idle);

        if wake == Wake::Cancelled {
            debug!(delay_ms = delay.as_millis() as u64, "Pending poll dequeued by cancellation");
        }
        wake
    }

    /// Run one request to completion; cancellation does not interrupt it
    pub async fn run<F>(&mut self, request: F) -> F::Output
    where
        F: Future,
    {
        self.phase.set(PollPhase::InFlight);
        let output = request.await;
        self.phase.set(PollPhase::Idle);
        output
    }

    /// Mark the job as terminated; later cancels are no-ops
    pub fn finish(&mut self) {
        self.phase.set(PollPhase::Terminated);
    }
}
