// Render Sink Port
// Whatever displays the listing: progress, the final item set, user notices

use crate::domain::ListingResult;

/// Message shown for an empty queue
pub const NO_ITEMS_MESSAGE: &str = "The queue has no FlowFiles.";

/// User-facing notices raised by the controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// The job finished without any items
    NoItems,
    /// The job could not be completed
    Failed(String),
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Notice::NoItems => f.write_str(NO_ITEMS_MESSAGE),
            Notice::Failed(reason) => write!(f, "Unable to list the queue: {}", reason),
        }
    }
}

/// Render sink trait
///
/// Calls are synchronous and made from the controller's task; keep them cheap.
pub trait RenderSink: Send + Sync {
    /// Progress of the running job (`percent` in 0..=100)
    fn progress(&self, percent: u8, state_label: &str);

    /// Replace the displayed collection with `result` (replace-all)
    fn replace_items(&self, result: &ListingResult);

    /// Show a notice to the user
    fn notify(&self, notice: Notice);
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::Mutex;
    use tokio::sync::mpsc;

    /// One recorded sink call
    #[derive(Debug, Clone, PartialEq)]
    pub enum SinkEvent {
        Progress { percent: u8, state: String },
        Replace(ListingResult),
        Notice(Notice),
    }

    /// Mock sink recording every call
    #[derive(Default)]
    pub struct RecordingSink {
        events: Mutex<Vec<SinkEvent>>,
        progress_tx: Option<mpsc::UnboundedSender<u8>>,
    }

    impl RecordingSink {
        pub fn new() -> Self {
            Self::default()
        }
        /// Sink that also forwards each progress percent to a channel
        pub fn with_progress_channel() -> (Self, mpsc::UnboundedReceiver<u8>) {
            let (tx, rx) = mpsc::unbounded_channel();
            (
                Self {
                    events: Mutex::new(Vec::new()),
                    progress_tx: Some(tx),
                },
                rx,
            )
        }
        pub fn events(&self) -> Vec<SinkEvent> {
            self.events.lock().unwrap().clone()
        }
        pub fn progress_values(&self) -> Vec<u8> {
            self.events()
                .into_iter()
                .filter_map(|event| match event {
                    SinkEvent::Progress { percent, .. } => Some(percent),
                    _ => None,
                })
                .collect()
        }
        pub fn notices(&self) -> Vec<Notice> {
            self.events()
                .into_iter()
                .filter_map(|event| match event {
                    SinkEvent::Notice(notice) => Some(notice),
                    _ => None,
                })
                .collect()
        }
        pub fn replacements(&self) -> Vec<ListingResult> {
            self.events()
                .into_iter()
                .filter_map(|event| match event {
                    SinkEvent::Replace(result) => Some(result),
                    _ => None,
                })
                .collect()
        }
    }

    impl RenderSink for RecordingSink {
        fn progress(&self, percent: u8, state_label: &str) {
            self.events.lock().unwrap().push(SinkEvent::Progress {
                percent,
                state: state_label.to_string(),
            });
            if let Some(tx) = &self.progress_tx {
                let _ = tx.send(percent);
            }
        }
        fn replace_items(&self, result: &ListingResult) {
            self.events
                .lock()
                .unwrap()
                .push(SinkEvent::Replace(result.clone()));
        }
        fn notify(&self, notice: Notice) {
            self.events.lock().unwrap().push(SinkEvent::Notice(notice));
        }
    }
}
