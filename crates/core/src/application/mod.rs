// Application Layer - Listing job lifecycle

pub mod backoff;
pub mod cancellation;
pub mod constants;
pub mod controller;
pub mod outcome;
pub mod poll_task;
pub mod result_set;

// Re-exports
pub use backoff::{PollBackoff, PollConfig};
pub use cancellation::{cancellation_channel, CancelSignal, CancelToken};
pub use controller::{CancelEffect, ListingController};
pub use outcome::{JobOutcome, ListingFailure};
pub use poll_task::{PollPhase, PollTask, Wake};
pub use result_set::ResultSet;
