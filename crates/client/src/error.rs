//! Client Error Types

use queue_listing_core::port::TransportError;
use thiserror::Error;

/// Client Result type
pub type Result<T> = std::result::Result<T, ClientError>;

/// Client Error
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("HTTP error ({status}): {body}")]
    Status { status: u16, body: String },

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Transport error: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if let Some(status) = e.status() {
            ClientError::Status {
                status: status.as_u16(),
                body: e.to_string(),
            }
        } else if e.is_decode() {
            ClientError::Decode(e.to_string())
        } else if e.is_builder() {
            ClientError::InvalidUrl(e.to_string())
        } else if e.is_connect() || e.is_timeout() {
            ClientError::Connection(e.to_string())
        } else {
            ClientError::Transport(e.to_string())
        }
    }
}

impl From<ClientError> for TransportError {
    fn from(e: ClientError) -> Self {
        match e {
            ClientError::Status { status, body } => TransportError::Status { status, body },
            ClientError::Decode(msg) => TransportError::Decode(msg),
            ClientError::InvalidUrl(msg) => TransportError::InvalidUri(msg),
            ClientError::Connection(msg) | ClientError::Transport(msg) => {
                TransportError::Network(msg)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_maps_to_transport_status() {
        let err: TransportError = ClientError::Status {
            status: 409,
            body: "busy".to_string(),
        }
        .into();
        assert_eq!(
            err,
            TransportError::Status {
                status: 409,
                body: "busy".to_string()
            }
        );
    }

    #[test]
    fn test_connection_maps_to_network() {
        let err: TransportError = ClientError::Connection("refused".to_string()).into();
        assert!(matches!(err, TransportError::Network(_)));
    }
}
