// Central Error Type for the Listing Lifecycle

use thiserror::Error;

/// Application-level error type
///
/// These are precondition and setup failures. Anything that happens once a
/// job is running is reported through [`crate::JobOutcome`] instead.
#[derive(Error, Debug)]
pub enum ListingError {
    #[error("Domain error: {0}")]
    Domain(#[from] crate::domain::DomainError),

    #[error("A listing job is already active on this controller")]
    JobAlreadyActive,

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias using ListingError
pub type Result<T> = std::result::Result<T, ListingError>;
