// Domain Layer - Listing requests, snapshots and flow-unit summaries

pub mod error;
pub mod flowfile;
pub mod listing;
pub mod queue;

// Re-exports
pub use error::DomainError;
pub use flowfile::{FlowFileDetails, FlowFileSummary};
pub use listing::{
    ListingRequest, ListingResult, ListingSnapshot, ListingState, SortColumn, SortDirection,
};
pub use queue::{JobTarget, QueueSize};
