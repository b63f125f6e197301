// Listing Request Domain Model

use super::error::{DomainError, Result};
use super::flowfile::FlowFileSummary;
use super::queue::QueueSize;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Column the server sorts the listing by
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortColumn {
    #[default]
    QueuePosition,
    FlowfileUuid,
    Filename,
    FlowfileSize,
    QueuedDuration,
    FlowfileAge,
    Penalization,
}

impl SortColumn {
    pub const ALL: [SortColumn; 7] = [
        SortColumn::QueuePosition,
        SortColumn::FlowfileUuid,
        SortColumn::Filename,
        SortColumn::FlowfileSize,
        SortColumn::QueuedDuration,
        SortColumn::FlowfileAge,
        SortColumn::Penalization,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortColumn::QueuePosition => "QUEUE_POSITION",
            SortColumn::FlowfileUuid => "FLOWFILE_UUID",
            SortColumn::Filename => "FILENAME",
            SortColumn::FlowfileSize => "FLOWFILE_SIZE",
            SortColumn::QueuedDuration => "QUEUED_DURATION",
            SortColumn::FlowfileAge => "FLOWFILE_AGE",
            SortColumn::Penalization => "PENALIZATION",
        }
    }
}

impl std::fmt::Display for SortColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortColumn {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        SortColumn::ALL
            .into_iter()
            .find(|column| column.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| DomainError::InvalidSortColumn(s.to_string()))
    }
}

/// Sort order (wire values `asc` / `desc`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    #[serde(rename = "asc")]
    Ascending,
    #[serde(rename = "desc")]
    Descending,
}

impl SortDirection {
    pub fn from_ascending(ascending: bool) -> Self {
        if ascending {
            SortDirection::Ascending
        } else {
            SortDirection::Descending
        }
    }

    pub fn is_ascending(&self) -> bool {
        matches!(self, SortDirection::Ascending)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        }
    }
}

impl std::fmt::Display for SortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Ascending),
            "desc" | "descending" => Ok(SortDirection::Descending),
            _ => Err(DomainError::InvalidSortDirection(s.to_string())),
        }
    }
}

/// Parameters of a listing job, immutable once submitted
///
/// Serializes to the creation payload `{sortColumn, sortOrder}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingRequest {
    #[serde(rename = "sortColumn")]
    pub sort_column: SortColumn,
    #[serde(rename = "sortOrder")]
    pub sort_direction: SortDirection,
}

impl ListingRequest {
    pub fn new(sort_column: SortColumn, ascending: bool) -> Self {
        Self {
            sort_column,
            sort_direction: SortDirection::from_ascending(ascending),
        }
    }

    /// Parse a request from a free-form sort key, rejecting unknown columns
    pub fn parse(sort_key: &str, ascending: bool) -> Result<Self> {
        Ok(Self::new(sort_key.parse()?, ascending))
    }
}

/// Well-known states a listing job reports
///
/// The server sends a human readable label; this classifies it. Use the
/// snapshot's `state` string for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingState {
    WaitingForLock,
    CalculatingList,
    Failed,
    Complete,
    Canceled,
    Other,
}

impl ListingState {
    pub fn classify(label: &str) -> Self {
        match label.trim() {
            "Waiting for other queue requests to complete" | "WAITING_FOR_LOCK" => {
                ListingState::WaitingForLock
            }
            "Calculating list..." | "CALCULATING_LIST" => ListingState::CalculatingList,
            "Failed" | "FAILURE" => ListingState::Failed,
            "Completed successfully" | "COMPLETE" => ListingState::Complete,
            "Canceled by user" | "CANCELED" => ListingState::Canceled,
            _ => ListingState::Other,
        }
    }
}

/// Latest server snapshot of a listing job
///
/// Replaced wholesale on every poll; never patched field by field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submission_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub percent_completed: i32,
    #[serde(default)]
    pub finished: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_column: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_direction: Option<String>,
    #[serde(default)]
    pub queue_size: QueueSize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow_file_summaries: Option<Vec<FlowFileSummary>>,
}

impl ListingSnapshot {
    /// Minimal in-progress snapshot (used by tests and mocks)
    pub fn pending(uri: impl Into<String>) -> Self {
        Self {
            id: None,
            uri: uri.into(),
            submission_time: None,
            last_updated: None,
            state: "Waiting for other queue requests to complete".to_string(),
            percent_completed: 0,
            finished: false,
            failure_reason: None,
            sort_column: None,
            sort_direction: None,
            queue_size: QueueSize::default(),
            flow_file_summaries: None,
        }
    }

    /// Percent complete clamped to 0..=100
    pub fn percent_complete(&self) -> u8 {
        self.percent_completed.clamp(0, 100) as u8
    }

    pub fn listing_state(&self) -> ListingState {
        ListingState::classify(&self.state)
    }

    pub fn summaries(&self) -> &[FlowFileSummary] {
        self.flow_file_summaries.as_deref().unwrap_or(&[])
    }

    pub fn has_results(&self) -> bool {
        !self.summaries().is_empty()
    }

    /// Reason to surface when the server reports the job as failed
    pub fn failure_message(&self) -> String {
        match &self.failure_reason {
            Some(reason) if !reason.trim().is_empty() => reason.clone(),
            _ => self.state.clone(),
        }
    }
}

/// Items and totals of a successful listing
#[derive(Debug, Clone, PartialEq)]
pub struct ListingResult {
    pub items: Vec<FlowFileSummary>,
    pub total_count: u64,
    pub total_bytes: u64,
}

impl ListingResult {
    pub fn from_snapshot(snapshot: ListingSnapshot) -> Self {
        Self {
            total_count: snapshot.queue_size.object_count,
            total_bytes: snapshot.queue_size.byte_count,
            items: snapshot.flow_file_summaries.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sort_column_parse_is_case_insensitive() {
        assert_eq!(
            "queue_position".parse::<SortColumn>().unwrap(),
            SortColumn::QueuePosition
        );
        assert_eq!(
            "FLOWFILE_AGE".parse::<SortColumn>().unwrap(),
            SortColumn::FlowfileAge
        );
    }

    #[test]
    fn test_sort_column_parse_rejects_unknown() {
        let err = "SIZE".parse::<SortColumn>().unwrap_err();
        assert_eq!(err, DomainError::InvalidSortColumn("SIZE".to_string()));
    }

    #[test]
    fn test_sort_column_serde_matches_display() {
        for column in SortColumn::ALL {
            let encoded = serde_json::to_value(column).unwrap();
            assert_eq!(encoded, json!(column.as_str()));
        }
    }

    #[test]
    fn test_request_payload_wire_format() {
        let request = ListingRequest::new(SortColumn::FlowfileSize, false);
        let encoded = serde_json::to_value(request).unwrap();
        assert_eq!(
            encoded,
            json!({"sortColumn": "FLOWFILE_SIZE", "sortOrder": "desc"})
        );
    }

    #[test]
    fn test_request_parse_validates_sort_key() {
        assert!(ListingRequest::parse("QUEUE_POSITION", true).is_ok());
        assert!(ListingRequest::parse("", true).is_err());
    }

    #[test]
    fn test_sort_direction_parse() {
        assert_eq!(
            "DESC".parse::<SortDirection>().unwrap(),
            SortDirection::Descending
        );
        assert!("up".parse::<SortDirection>().is_err());
    }

    #[test]
    fn test_snapshot_decodes_in_progress_payload() {
        let snapshot: ListingSnapshot = serde_json::from_value(json!({
            "id": "abc",
            "uri": "http://localhost/nifi-api/connections/c1/listing-requests/abc",
            "state": "Calculating list...",
            "percentCompleted": 40,
            "finished": false,
            "queueSize": {"objectCount": 3, "byteCount": 900}
        }))
        .unwrap();

        assert_eq!(snapshot.percent_complete(), 40);
        assert_eq!(snapshot.listing_state(), ListingState::CalculatingList);
        assert!(snapshot.flow_file_summaries.is_none());
        assert!(!snapshot.has_results());
    }

    #[test]
    fn test_snapshot_percent_is_clamped() {
        let mut snapshot = ListingSnapshot::pending("u");
        snapshot.percent_completed = 250;
        assert_eq!(snapshot.percent_complete(), 100);
        snapshot.percent_completed = -5;
        assert_eq!(snapshot.percent_complete(), 0);
    }

    #[test]
    fn test_failure_message_falls_back_to_state() {
        let mut snapshot = ListingSnapshot::pending("u");
        snapshot.state = "Failed".to_string();
        assert_eq!(snapshot.failure_message(), "Failed");

        snapshot.failure_reason = Some("Queue was purged".to_string());
        assert_eq!(snapshot.failure_message(), "Queue was purged");
    }

    #[test]
    fn test_unknown_state_label_is_other() {
        assert_eq!(ListingState::classify("Thinking"), ListingState::Other);
        assert_eq!(
            ListingState::classify("Canceled by user"),
            ListingState::Canceled
        );
    }
}
