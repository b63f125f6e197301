// Flow-unit summaries and details
//
// The controller only relies on `uuid`; everything else is carried through
// for the render sink. Unknown summary fields survive a decode/encode cycle.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One queued flow unit as reported in a listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowFileSummary {
    pub uuid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<i64>,
    /// Milliseconds spent in this queue
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queued_duration: Option<i64>,
    /// Milliseconds since the lineage started
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lineage_duration: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub penalized: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_node_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_node_address: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl FlowFileSummary {
    /// Bare summary carrying only its key
    pub fn new(uuid: impl Into<String>) -> Self {
        Self {
            uuid: uuid.into(),
            filename: None,
            position: None,
            size: None,
            queued_duration: None,
            lineage_duration: None,
            penalized: None,
            uri: None,
            cluster_node_id: None,
            cluster_node_address: None,
            extra: serde_json::Map::new(),
        }
    }

    /// Unique key used for result-set identity
    pub fn key(&self) -> &str {
        &self.uuid
    }

    pub fn is_penalized(&self) -> bool {
        self.penalized.unwrap_or(false)
    }
}

/// Full record for one flow unit, fetched from a summary's `uri`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowFileDetails {
    pub uuid: String,
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub position: Option<i64>,
    #[serde(default)]
    pub size: Option<i64>,
    #[serde(default)]
    pub queued_duration: Option<i64>,
    #[serde(default)]
    pub lineage_duration: Option<i64>,
    #[serde(default)]
    pub penalized: Option<bool>,
    #[serde(default)]
    pub cluster_node_id: Option<String>,
    #[serde(default)]
    pub cluster_node_address: Option<String>,
    #[serde(default)]
    pub content_claim_container: Option<String>,
    #[serde(default)]
    pub content_claim_section: Option<String>,
    #[serde(default)]
    pub content_claim_identifier: Option<String>,
    #[serde(default)]
    pub content_claim_offset: Option<i64>,
    /// Pre-formatted size label, e.g. "1.5 KB"
    #[serde(default)]
    pub content_claim_file_size: Option<String>,
    #[serde(default)]
    pub content_claim_file_size_bytes: Option<i64>,
    #[serde(default)]
    pub attributes: BTreeMap<String, Option<String>>,
}

impl FlowFileDetails {
    pub fn has_content_claim(&self) -> bool {
        self.content_claim_container.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_summary_preserves_unknown_fields() {
        let raw = json!({
            "uuid": "ff-1",
            "filename": "a.txt",
            "position": 1,
            "size": 300,
            "penalized": false,
            "customField": {"nested": true}
        });

        let summary: FlowFileSummary = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(summary.key(), "ff-1");
        assert_eq!(summary.extra.get("customField"), Some(&json!({"nested": true})));
        assert_eq!(serde_json::to_value(&summary).unwrap(), raw);
    }

    #[test]
    fn test_details_decode_attributes_with_null_values() {
        let details: FlowFileDetails = serde_json::from_value(json!({
            "uuid": "ff-2",
            "attributes": {"filename": "b.txt", "mime.type": null},
            "contentClaimContainer": "default",
            "contentClaimFileSizeBytes": 1024
        }))
        .unwrap();

        assert!(details.has_content_claim());
        assert_eq!(details.attributes.len(), 2);
        assert_eq!(details.attributes["mime.type"], None);
        assert_eq!(details.content_claim_file_size_bytes, Some(1024));
    }
}
