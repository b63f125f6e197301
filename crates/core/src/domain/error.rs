// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Unknown sort column: {0}")]
    InvalidSortColumn(String),

    #[error("Unknown sort direction: {0} (expected asc or desc)")]
    InvalidSortDirection(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;
