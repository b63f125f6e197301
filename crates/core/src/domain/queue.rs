// Queue Domain Model

use serde::{Deserialize, Serialize};

/// The connection whose queue is being listed
///
/// Only the resource URI is interpreted; listing jobs are created beneath it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobTarget {
    uri: String,
}

impl JobTarget {
    pub fn new(uri: impl Into<String>) -> Self {
        Self { uri: uri.into() }
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Collection endpoint that accepts new listing requests
    pub fn listing_requests_uri(&self) -> String {
        format!("{}/listing-requests", self.uri.trim_end_matches('/'))
    }
}

impl std::fmt::Display for JobTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.uri)
    }
}

/// Aggregate size of a queue at the time it was listed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueSize {
    #[serde(default)]
    pub object_count: u64,
    #[serde(default)]
    pub byte_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_requests_uri_strips_trailing_slash() {
        let target = JobTarget::new("http://localhost:8080/nifi-api/connections/abc/");
        assert_eq!(
            target.listing_requests_uri(),
            "http://localhost:8080/nifi-api/connections/abc/listing-requests"
        );
    }

    #[test]
    fn test_queue_size_defaults_missing_fields() {
        let size: QueueSize = serde_json::from_str(r#"{"objectCount": 7}"#).unwrap();
        assert_eq!(size.object_count, 7);
        assert_eq!(size.byte_count, 0);
    }
}
