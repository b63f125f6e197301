// Terminal outcome of a listing job

use crate::domain::{ListingResult, ListingSnapshot, ListingState};
use crate::port::TransportError;
use thiserror::Error;

/// Why a listing job failed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ListingFailure {
    #[error("Failed to create listing request: {0}")]
    Create(TransportError),

    #[error("Failed to poll listing request: {0}")]
    Poll(TransportError),

    #[error("Listing request failed: {0}")]
    Server(String),
}

/// Single terminal result of one `start()` invocation
#[derive(Debug, Clone, PartialEq)]
pub enum JobOutcome {
    Success(ListingResult),
    EmptyResult,
    Cancelled,
    Failed(ListingFailure),
}

impl JobOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            JobOutcome::Success(_) => "success",
            JobOutcome::EmptyResult => "empty",
            JobOutcome::Cancelled => "cancelled",
            JobOutcome::Failed(_) => "failed",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, JobOutcome::Success(_))
    }
}

/// Pick the outcome from the last known snapshot
///
/// Precedence: no snapshot, cancellation, transport failure, server-reported
/// failure, empty result, success.
pub fn reconcile(
    last: Option<ListingSnapshot>,
    cancelled: bool,
    failure: Option<ListingFailure>,
) -> JobOutcome {
    let Some(snapshot) = last else {
        return JobOutcome::Failed(failure.unwrap_or_else(|| {
            ListingFailure::Server("no listing request was created".to_string())
        }));
    };

    if cancelled {
        return JobOutcome::Cancelled;
    }
    if let Some(failure) = failure {
        return JobOutcome::Failed(failure);
    }
    if snapshot.listing_state() == ListingState::Failed {
        return JobOutcome::Failed(ListingFailure::Server(snapshot.failure_message()));
    }
    if !snapshot.has_results() {
        return JobOutcome::EmptyResult;
    }
    JobOutcome::Success(ListingResult::from_snapshot(snapshot))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FlowFileSummary, QueueSize};

    fn finished(items: usize) -> ListingSnapshot {
        let mut snapshot = ListingSnapshot::pending("http://host/listing-requests/1");
        snapshot.finished = true;
        snapshot.percent_completed = 100;
        snapshot.state = "Completed successfully".to_string();
        snapshot.flow_file_summaries = Some(
            (0..items)
                .map(|i| FlowFileSummary::new(format!("ff-{}", i)))
                .collect(),
        );
        snapshot.queue_size = QueueSize {
            object_count: items as u64,
            byte_count: items as u64 * 100,
        };
        snapshot
    }

    #[test]
    fn test_no_snapshot_is_failed() {
        let failure = ListingFailure::Create(TransportError::Network("refused".into()));
        assert_eq!(
            reconcile(None, false, Some(failure.clone())),
            JobOutcome::Failed(failure)
        );
        assert!(matches!(
            reconcile(None, true, None),
            JobOutcome::Failed(ListingFailure::Server(_))
        ));
    }

    #[test]
    fn test_cancelled_wins_over_empty_and_results() {
        assert_eq!(reconcile(Some(finished(0)), true, None), JobOutcome::Cancelled);
        assert_eq!(reconcile(Some(finished(2)), true, None), JobOutcome::Cancelled);
    }

    #[test]
    fn test_cancelled_wins_over_poll_failure() {
        let failure = ListingFailure::Poll(TransportError::Network("reset".into()));
        assert_eq!(
            reconcile(Some(ListingSnapshot::pending("u")), true, Some(failure)),
            JobOutcome::Cancelled
        );
    }

    #[test]
    fn test_poll_failure_is_failed() {
        let failure = ListingFailure::Poll(TransportError::Status {
            status: 500,
            body: "boom".into(),
        });
        assert_eq!(
            reconcile(Some(ListingSnapshot::pending("u")), false, Some(failure.clone())),
            JobOutcome::Failed(failure)
        );
    }

    #[test]
    fn test_server_failure_state_is_failed() {
        let mut snapshot = finished(0);
        snapshot.state = "Failed".to_string();
        snapshot.failure_reason = Some("Unable to obtain lock".to_string());
        assert_eq!(
            reconcile(Some(snapshot), false, None),
            JobOutcome::Failed(ListingFailure::Server("Unable to obtain lock".into()))
        );
    }

    #[test]
    fn test_empty_result() {
        assert_eq!(reconcile(Some(finished(0)), false, None), JobOutcome::EmptyResult);
        let mut absent = finished(0);
        absent.flow_file_summaries = None;
        assert_eq!(reconcile(Some(absent), false, None), JobOutcome::EmptyResult);
    }

    #[test]
    fn test_success_carries_items_and_totals() {
        match reconcile(Some(finished(3)), false, None) {
            JobOutcome::Success(result) => {
                assert_eq!(result.items.len(), 3);
                assert_eq!(result.total_count, 3);
                assert_eq!(result.total_bytes, 300);
            }
            other => panic!("expected success, got {:?}", other),
        }
    }
}
