//! Listing controller - drives one listing job from creation to release
//!
//! Flow: create → poll with backoff until finished or cancelled → release the
//! job on the server → reconcile a single [`JobOutcome`].
//!
//! The controller runs at most one job at a time. Per-job state (last
//! snapshot, cancellation token, poll task) lives in a `ListingJob` built by
//! `start` and dropped once the job terminates, so nothing leaks between jobs.

use super::backoff::{PollBackoff, PollConfig};
use super::cancellation::{cancellation_channel, CancelSignal};
use super::outcome::{reconcile, JobOutcome, ListingFailure};
use super::poll_task::{PhaseCell, PollPhase, PollTask, Wake};
use crate::domain::{JobTarget, ListingRequest, ListingSnapshot};
use crate::error::{ListingError, Result};
use crate::port::{ListingTransport, Notice, RenderSink};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// What a call to [`ListingController::cancel`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelEffect {
    /// No active job, or cancellation was already requested
    NoOp,
    /// A scheduled poll was dequeued; termination runs immediately
    Dequeued,
    /// No timer was pending; the job terminates at its next step
    ///
    /// Either a request is in flight and its response routes to termination,
    /// or a snapshot is being processed and the next poll is never scheduled.
    Flagged,
}

/// Handle on the active job, reachable from `cancel()`
struct JobControl {
    signal: CancelSignal,
    phase: Arc<PhaseCell>,
}

impl JobControl {
    fn cancel(&self) -> CancelEffect {
        if self.phase.get() == PollPhase::Terminated || !self.signal.cancel() {
            return CancelEffect::NoOp;
        }
        match self.phase.get() {
            PollPhase::Pending => CancelEffect::Dequeued,
            _ => CancelEffect::Flagged,
        }
    }
}

/// Clears the active slot when `start` returns or is dropped
struct ActiveGuard<'a> {
    slot: &'a Mutex<Option<JobControl>>,
}

impl Drop for ActiveGuard<'_> {
    fn drop(&mut self) {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }
}

/// Server-side deletions still in flight
#[derive(Default)]
struct Releases {
    handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Releases {
    fn track(&self, handle: JoinHandle<()>) {
        let mut handles = self.handles.lock().unwrap_or_else(PoisonError::into_inner);
        handles.retain(|h| !h.is_finished());
        handles.push(handle);
    }

    fn drain(&self) -> Vec<JoinHandle<()>> {
        std::mem::take(&mut *self.handles.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

/// Listing controller
pub struct ListingController {
    transport: Arc<dyn ListingTransport>,
    sink: Arc<dyn RenderSink>,
    config: PollConfig,
    active: Mutex<Option<JobControl>>,
    releases: Arc<Releases>,
}

impl ListingController {
    /// Create a controller with the default poll pacing (1s doubling to 4s)
    pub fn new(transport: Arc<dyn ListingTransport>, sink: Arc<dyn RenderSink>) -> Self {
        Self {
            transport,
            sink,
            config: PollConfig::default(),
            active: Mutex::new(None),
            releases: Arc::new(Releases::default()),
        }
    }

    /// Create a controller with custom poll pacing
    ///
    /// # Errors
    /// `ListingError::Config` if the delays are zero or inverted
    pub fn with_config(
        transport: Arc<dyn ListingTransport>,
        sink: Arc<dyn RenderSink>,
        config: PollConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::new(transport, sink)
        })
    }

    pub fn is_active(&self) -> bool {
        self.slot().is_some()
    }

    /// Run one listing job to completion
    ///
    /// Resolves exactly once per call with the job's outcome. The server-side
    /// job is released on every exit path after it was created.
    ///
    /// # Errors
    /// `ListingError::JobAlreadyActive` if another job is still running on
    /// this controller; no request is sent in that case.
    pub async fn start(&self, target: &JobTarget, request: ListingRequest) -> Result<JobOutcome> {
        let (signal, token) = cancellation_channel();
        let poll = PollTask::new(token);
        let _active = self.activate(JobControl {
            signal,
            phase: poll.phase_handle(),
        })?;

        let job = ListingJob {
            target: target.clone(),
            request,
            transport: Arc::clone(&self.transport),
            sink: Arc::clone(&self.sink),
            releases: Arc::clone(&self.releases),
            poll,
            backoff: self.config.backoff(),
            last: None,
            terminated: false,
        };
        Ok(job.run().await)
    }

    /// [`start`](Self::start) with a free-form sort key
    ///
    /// # Errors
    /// `ListingError::Domain` for an unknown sort key, before any request.
    pub async fn start_sorted(
        &self,
        target: &JobTarget,
        sort_key: &str,
        sort_ascending: bool,
    ) -> Result<JobOutcome> {
        let request = ListingRequest::parse(sort_key, sort_ascending)?;
        self.start(target, request).await
    }

    /// Cancel the active job, if any
    ///
    /// Idempotent: repeated calls, or calls after the job finished, do nothing.
    pub fn cancel(&self) -> CancelEffect {
        let effect = self
            .slot()
            .as_ref()
            .map_or(CancelEffect::NoOp, JobControl::cancel);
        info!(effect = ?effect, "Listing cancellation requested");
        effect
    }

    /// Wait until every server-side deletion issued so far has completed
    ///
    /// `start` never waits for the deletion itself; call this before the
    /// runtime shuts down so the last job is not left behind on the server.
    pub async fn wait_for_releases(&self) {
        for handle in self.releases.drain() {
            if let Err(e) = handle.await {
                warn!(error = %e, "Listing release task did not complete");
            }
        }
    }

    fn activate(&self, control: JobControl) -> Result<ActiveGuard<'_>> {
        let mut slot = self.slot();
        if slot.is_some() {
            warn!("Refusing to start a listing while another is active");
            return Err(ListingError::JobAlreadyActive);
        }
        *slot = Some(control);
        Ok(ActiveGuard { slot: &self.active })
    }

    fn slot(&self) -> MutexGuard<'_, Option<JobControl>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// State of one running job
struct ListingJob {
    target: JobTarget,
    request: ListingRequest,
    transport: Arc<dyn ListingTransport>,
    sink: Arc<dyn RenderSink>,
    releases: Arc<Releases>,
    poll: PollTask,
    backoff: PollBackoff,
    last: Option<ListingSnapshot>,
    terminated: bool,
}

impl ListingJob {
    async fn run(mut self) -> JobOutcome {
        info!(
            connection = %self.target,
            sort_column = %self.request.sort_column,
            sort_direction = %self.request.sort_direction,
            "Submitting listing request"
        );

        let created = self
            .poll
            .run(self.transport.create(&self.target, &self.request))
            .await;
        let mut snapshot = match created {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(connection = %self.target, error = %e, "Listing request creation failed");
                return self.terminate(Some(ListingFailure::Create(e)));
            }
        };
        self.sink.progress(0, &snapshot.state);

        loop {
            let percent = snapshot.percent_complete();
            self.sink.progress(percent, &snapshot.state);
            debug!(
                job_uri = %snapshot.uri,
                percent = percent,
                state = %snapshot.state,
                finished = snapshot.finished,
                "Listing progress"
            );

            let finished = snapshot.finished;
            let uri = snapshot.uri.clone();
            self.last = Some(snapshot);

            if finished || self.poll.is_cancelled() {
                return self.terminate(None);
            }

            let delay = self.backoff.next_delay();
            debug!(job_uri = %uri, delay_secs = delay.as_secs(), "Scheduling next poll");
            if self.poll.wait(delay).await == Wake::Cancelled {
                return self.terminate(None);
            }

            snapshot = match self.poll.run(self.transport.get(&uri)).await {
                Ok(next) => next,
                Err(e) => {
                    warn!(job_uri = %uri, error = %e, "Listing poll failed");
                    return self.terminate(Some(ListingFailure::Poll(e)));
                }
            };
        }
    }

    /// Single convergence point for every exit path
    fn terminate(&mut self, failure: Option<ListingFailure>) -> JobOutcome {
        self.terminated = true;
        self.poll.finish();
        let cancelled = self.poll.is_cancelled();

        if let Some(snapshot) = &self.last {
            release(&self.transport, &self.releases, snapshot.uri.clone());
        }

        let outcome = reconcile(self.last.take(), cancelled, failure);
        match &outcome {
            JobOutcome::Success(result) => self.sink.replace_items(result),
            JobOutcome::EmptyResult => self.sink.notify(Notice::NoItems),
            JobOutcome::Failed(failure) => self.sink.notify(Notice::Failed(failure.to_string())),
            JobOutcome::Cancelled => {}
        }

        info!(connection = %self.target, outcome = outcome.label(), "Listing request completed");
        outcome
    }
}

impl Drop for ListingJob {
    fn drop(&mut self) {
        if self.terminated {
            return;
        }
        if let Some(snapshot) = self.last.take() {
            warn!(job_uri = %snapshot.uri, "Listing abandoned before termination");
            release(&self.transport, &self.releases, snapshot.uri);
        }
    }
}

/// Fire-and-forget deletion of the server-side job
fn release(transport: &Arc<dyn ListingTransport>, releases: &Releases, uri: String) {
    let Ok(handle) = tokio::runtime::Handle::try_current() else {
        warn!(job_uri = %uri, "No runtime available to release listing request");
        return;
    };
    let transport = Arc::clone(transport);
    releases.track(handle.spawn(async move {
        match transport.delete(&uri).await {
            Ok(()) => debug!(job_uri = %uri, "Listing request released"),
            Err(e) => warn!(job_uri = %uri, error = %e, "Failed to release listing request"),
        }
    }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::render_sink::mocks::RecordingSink;
    use crate::port::transport::mocks::ScriptedTransport;
    use std::sync::{OnceLock, Weak};

    fn pending() -> ListingSnapshot {
        ListingSnapshot::pending("http://host/listing-requests/1")
    }

    async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_cancel_without_job_is_noop() {
        let controller = ListingController::new(
            Arc::new(ScriptedTransport::created(pending())),
            Arc::new(RecordingSink::new()),
        );
        assert_eq!(controller.cancel(), CancelEffect::NoOp);
        assert!(!controller.is_active());
    }

    #[test]
    fn test_with_config_rejects_invalid_pacing() {
        let result = ListingController::with_config(
            Arc::new(ScriptedTransport::created(pending())),
            Arc::new(RecordingSink::new()),
            PollConfig {
                initial_delay_secs: 0,
                max_delay_secs: 4,
            },
        );
        assert!(matches!(result, Err(ListingError::Config(_))));
    }

    #[tokio::test]
    async fn test_unknown_sort_key_sends_nothing() {
        let transport = Arc::new(ScriptedTransport::created(pending()));
        let controller = ListingController::new(transport.clone(), Arc::new(RecordingSink::new()));

        let result = controller
            .start_sorted(&JobTarget::new("http://host/c/1"), "NOPE", true)
            .await;
        assert!(matches!(result, Err(ListingError::Domain(_))));
        assert!(transport.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_start_while_active_is_rejected() {
        let (transport, gate) = ScriptedTransport::created(pending())
            .then_poll(Ok(pending()))
            .gated();
        let transport = Arc::new(transport);
        let controller = Arc::new(ListingController::new(
            transport.clone(),
            Arc::new(RecordingSink::new()),
        ));
        let target = JobTarget::new("http://host/c/1");

        let first = {
            let controller = controller.clone();
            let target = target.clone();
            tokio::spawn(async move { controller.start(&target, ListingRequest::default()).await })
        };
        gate.entered().await;
        assert!(controller.is_active());

        let second = controller.start(&target, ListingRequest::default()).await;
        assert!(matches!(second, Err(ListingError::JobAlreadyActive)));
        assert_eq!(transport.create_count(), 1);

        assert_eq!(controller.cancel(), CancelEffect::Flagged);
        gate.release();
        let outcome = first.await.unwrap().unwrap();
        assert_eq!(outcome, JobOutcome::Cancelled);
        assert!(!controller.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_start_still_releases_job() {
        let (transport, gate) = ScriptedTransport::created(pending()).gated();
        let transport = Arc::new(transport);
        let controller = Arc::new(ListingController::new(
            transport.clone(),
            Arc::new(RecordingSink::new()),
        ));

        let running = {
            let controller = controller.clone();
            tokio::spawn(async move {
                controller
                    .start(&JobTarget::new("http://host/c/1"), ListingRequest::default())
                    .await
            })
        };
        gate.entered().await;
        running.abort();
        let _ = running.await;
        settle().await;

        assert_eq!(transport.delete_count(), 1);
        assert!(!controller.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_after_finish_is_noop() {
        let mut done = pending();
        done.finished = true;
        let controller = ListingController::new(
            Arc::new(ScriptedTransport::created(done)),
            Arc::new(RecordingSink::new()),
        );

        let outcome = controller
            .start(&JobTarget::new("http://host/c/1"), ListingRequest::default())
            .await
            .unwrap();
        assert_eq!(outcome, JobOutcome::EmptyResult);
        assert_eq!(controller.cancel(), CancelEffect::NoOp);
    }

    #[tokio::test]
    async fn test_wait_for_releases_awaits_pending_delete() {
        let mut done = pending();
        done.finished = true;
        let transport = Arc::new(ScriptedTransport::created(done));
        let controller = ListingController::new(transport.clone(), Arc::new(RecordingSink::new()));

        controller
            .start(&JobTarget::new("http://host/c/1"), ListingRequest::default())
            .await
            .unwrap();
        controller.wait_for_releases().await;

        assert_eq!(transport.delete_count(), 1);
        assert_eq!(transport.deleted_uris(), vec!["http://host/listing-requests/1".to_string()]);
    }

    /// Cancels from inside the progress callback, between a response and the next wait
    #[derive(Default)]
    struct CancellingSink {
        controller: OnceLock<Weak<ListingController>>,
        effects: Mutex<Vec<CancelEffect>>,
    }

    impl RenderSink for CancellingSink {
        fn progress(&self, percent: u8, _state_label: &str) {
            if percent < 50 {
                return;
            }
            if let Some(controller) = self.controller.get().and_then(Weak::upgrade) {
                self.effects.lock().unwrap().push(controller.cancel());
            }
        }
        fn replace_items(&self, _result: &crate::domain::ListingResult) {}
        fn notify(&self, _notice: Notice) {}
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_while_processing_snapshot_skips_next_poll() {
        let mut halfway = pending();
        halfway.percent_completed = 50;
        let transport = Arc::new(
            ScriptedTransport::created(pending())
                .then_poll(Ok(halfway))
                .then_poll(Ok(pending())),
        );
        let sink = Arc::new(CancellingSink::default());
        let controller = Arc::new(ListingController::new(transport.clone(), sink.clone()));
        sink.controller.set(Arc::downgrade(&controller)).ok();

        let outcome = controller
            .start(&JobTarget::new("http://host/c/1"), ListingRequest::default())
            .await
            .unwrap();
        controller.wait_for_releases().await;

        assert_eq!(outcome, JobOutcome::Cancelled);
        assert_eq!(*sink.effects.lock().unwrap(), vec![CancelEffect::Flagged]);
        assert_eq!(transport.get_count(), 1);
        assert_eq!(transport.delete_count(), 1);
    }
}
