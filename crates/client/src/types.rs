//! Response envelopes
//!
//! The server wraps every resource in a single-field entity object.

use queue_listing_core::domain::{FlowFileDetails, ListingSnapshot};
use serde::Deserialize;

/// `{ "listingRequest": {...} }`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingRequestEntity {
    pub listing_request: ListingSnapshot,
}

/// `{ "flowFile": {...} }`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowFileEntity {
    pub flow_file: FlowFileDetails,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_listing_entity_with_summaries() {
        let entity: ListingRequestEntity = serde_json::from_value(json!({
            "revision": {"clientId": "c"},
            "listingRequest": {
                "id": "req-1",
                "uri": "http://host/nifi-api/connections/c1/listing-requests/req-1",
                "state": "Completed successfully",
                "percentCompleted": 100,
                "finished": true,
                "queueSize": {"objectCount": 2, "byteCount": 600},
                "flowFileSummaries": [
                    {"uuid": "a", "position": 1, "size": 300},
                    {"uuid": "b", "position": 2, "size": 300}
                ]
            }
        }))
        .unwrap();

        let snapshot = entity.listing_request;
        assert!(snapshot.finished);
        assert_eq!(snapshot.summaries().len(), 2);
        assert_eq!(snapshot.queue_size.byte_count, 600);
    }

    #[test]
    fn test_flowfile_entity() {
        let entity: FlowFileEntity = serde_json::from_value(json!({
            "flowFile": {
                "uuid": "a",
                "filename": "data.csv",
                "penalized": true,
                "attributes": {"path": "./"}
            }
        }))
        .unwrap();
        assert_eq!(entity.flow_file.filename.as_deref(), Some("data.csv"));
        assert_eq!(entity.flow_file.penalized, Some(true));
    }
}
