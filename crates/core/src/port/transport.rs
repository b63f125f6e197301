// Listing Transport Port
// Abstraction over the remote listing-request resource (create / poll / delete)

use crate::domain::{JobTarget, ListingRequest, ListingSnapshot};
use async_trait::async_trait;
use thiserror::Error;

/// Transport errors
///
/// Cloneable so a failure can be carried inside a terminal outcome.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Invalid URI: {0}")]
    InvalidUri(String),
}

/// Listing Transport trait
///
/// Implementations:
/// - HttpTransport (client crate): REST calls against the server
/// - ScriptedTransport (below): canned responses for tests
///
/// Retries, if any, belong to the implementation; the controller never
/// repeats a failed call.
#[async_trait]
pub trait ListingTransport: Send + Sync {
    /// Submit a new listing job beneath `target`
    ///
    /// # Errors
    /// Any transport or server failure; the controller turns it into a
    /// failed outcome without polling or deleting.
    async fn create(
        &self,
        target: &JobTarget,
        request: &ListingRequest,
    ) -> Result<ListingSnapshot, TransportError>;

    /// Fetch the current snapshot of the job at `uri`
    async fn get(&self, uri: &str) -> Result<ListingSnapshot, TransportError>;

    /// Release the job at `uri` on the server
    async fn delete(&self, uri: &str) -> Result<(), TransportError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};
    use tokio::sync::{Notify, Semaphore};
    use tokio::time::Instant;

    /// One recorded transport call
    #[derive(Debug, Clone, PartialEq)]
    pub enum TransportCall {
        Create {
            uri: String,
            request: ListingRequest,
        },
        Get {
            uri: String,
            at: Instant,
        },
        Delete {
            uri: String,
        },
    }

    /// Holds requests open until the test releases them
    #[derive(Clone)]
    pub struct PollGate {
        entered: Arc<Notify>,
        release: Arc<Semaphore>,
    }

    impl PollGate {
        fn new() -> Self {
            Self {
                entered: Arc::new(Notify::new()),
                release: Arc::new(Semaphore::new(0)),
            }
        }

        /// Wait until a gated request is in flight
        pub async fn entered(&self) {
            self.entered.notified().await;
        }

        /// Let one in-flight request return
        pub fn release(&self) {
            self.release.add_permits(1);
        }

        async fn hold(&self) {
            self.entered.notify_one();
            self.release.acquire().await.unwrap().forget();
        }
    }

    /// Mock transport replaying scripted responses
    pub struct ScriptedTransport {
        create_response: Mutex<Option<Result<ListingSnapshot, TransportError>>>,
        poll_responses: Mutex<VecDeque<Result<ListingSnapshot, TransportError>>>,
        delete_response: Mutex<Result<(), TransportError>>,
        calls: Mutex<Vec<TransportCall>>,
        gate: Option<PollGate>,
        create_gate: Option<PollGate>,
    }

    impl ScriptedTransport {
        pub fn new(create_response: Result<ListingSnapshot, TransportError>) -> Self {
            Self {
                create_response: Mutex::new(Some(create_response)),
                poll_responses: Mutex::new(VecDeque::new()),
                delete_response: Mutex::new(Ok(())),
                calls: Mutex::new(Vec::new()),
                gate: None,
                create_gate: None,
            }
        }
        pub fn created(snapshot: ListingSnapshot) -> Self {
            Self::new(Ok(snapshot))
        }
        pub fn failing_create(error: TransportError) -> Self {
            Self::new(Err(error))
        }
        /// Queue the next poll response
        pub fn then_poll(self, response: Result<ListingSnapshot, TransportError>) -> Self {
            self.poll_responses.lock().unwrap().push_back(response);
            self
        }
        pub fn failing_delete(self, error: TransportError) -> Self {
            *self.delete_response.lock().unwrap() = Err(error);
            self
        }
        /// Gate every poll; returns the handle the test drives
        pub fn gated(mut self) -> (Self, PollGate) {
            let gate = PollGate::new();
            self.gate = Some(gate.clone());
            (self, gate)
        }
        /// Gate the create request instead of the polls
        pub fn gated_create(mut self) -> (Self, PollGate) {
            let gate = PollGate::new();
            self.create_gate = Some(gate.clone());
            (self, gate)
        }
        pub fn calls(&self) -> Vec<TransportCall> {
            self.calls.lock().unwrap().clone()
        }
        pub fn create_count(&self) -> usize {
            self.count(|call| matches!(call, TransportCall::Create { .. }))
        }
        pub fn get_count(&self) -> usize {
            self.count(|call| matches!(call, TransportCall::Get { .. }))
        }
        pub fn delete_count(&self) -> usize {
            self.count(|call| matches!(call, TransportCall::Delete { .. }))
        }
        /// Instants at which each poll was issued
        pub fn poll_instants(&self) -> Vec<Instant> {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .filter_map(|call| match call {
                    TransportCall::Get { at, .. } => Some(*at),
                    _ => None,
                })
                .collect()
        }
        pub fn deleted_uris(&self) -> Vec<String> {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .filter_map(|call| match call {
                    TransportCall::Delete { uri } => Some(uri.clone()),
                    _ => None,
                })
                .collect()
        }
        fn count(&self, predicate: impl Fn(&TransportCall) -> bool) -> usize {
            self.calls.lock().unwrap().iter().filter(|c| predicate(c)).count()
        }
        fn record(&self, call: TransportCall) {
            self.calls.lock().unwrap().push(call);
        }
    }

    #[async_trait]
    impl ListingTransport for ScriptedTransport {
        async fn create(
            &self,
            target: &JobTarget,
            request: &ListingRequest,
        ) -> Result<ListingSnapshot, TransportError> {
            self.record(TransportCall::Create {
                uri: target.listing_requests_uri(),
                request: *request,
            });
            if let Some(gate) = &self.create_gate {
                gate.hold().await;
            }
            self.create_response
                .lock()
                .unwrap()
                .take()
                .unwrap_or_else(|| Err(TransportError::Network("no scripted create".into())))
        }
        async fn get(&self, uri: &str) -> Result<ListingSnapshot, TransportError> {
            self.record(TransportCall::Get {
                uri: uri.to_string(),
                at: Instant::now(),
            });
            if let Some(gate) = &self.gate {
                gate.hold().await;
            }
            self.poll_responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(TransportError::Network("no scripted poll".into())))
        }
        async fn delete(&self, uri: &str) -> Result<(), TransportError> {
            self.record(TransportCall::Delete {
                uri: uri.to_string(),
            });
            self.delete_response.lock().unwrap().clone()
        }
    }
}
