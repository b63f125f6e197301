// Keyed result set with replace-all semantics

use crate::domain::{FlowFileSummary, ListingResult};
use std::collections::HashMap;

/// Displayed flow units, keyed by uuid
///
/// Every successful listing replaces the whole collection. A key seen twice
/// in one listing keeps its first position and its latest value.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    items: Vec<FlowFileSummary>,
    index: HashMap<String, usize>,
    total_count: u64,
    total_bytes: u64,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace_all(&mut self, result: &ListingResult) {
        self.clear();
        for item in &result.items {
            let existing = self.index.get(item.key()).copied();
            match existing {
                Some(position) => self.items[position] = item.clone(),
                None => {
                    self.index.insert(item.key().to_string(), self.items.len());
                    self.items.push(item.clone());
                }
            }
        }
        self.total_count = result.total_count;
        self.total_bytes = result.total_bytes;
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.index.clear();
        self.total_count = 0;
        self.total_bytes = 0;
    }

    pub fn get(&self, key: &str) -> Option<&FlowFileSummary> {
        self.index.get(key).map(|&position| &self.items[position])
    }

    pub fn iter(&self) -> impl Iterator<Item = &FlowFileSummary> {
        self.items.iter()
    }

    /// Number of displayed items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether any item came from a cluster node
    pub fn is_clustered(&self) -> bool {
        self.items.iter().any(|item| item.cluster_node_address.is_some())
    }

    /// Queue size reported by the server (may exceed `len()`)
    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    pub fn total_bytes(&self) -> u64 {
        self.total_bytes
    }
}
