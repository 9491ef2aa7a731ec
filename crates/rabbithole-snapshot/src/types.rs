//! Snapshot document types.

use std::collections::HashMap;

use rabbithole_core::TextItem;
use serde::{Deserialize, Serialize};

/// One item in a snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnapshotNode {
    pub title: String,
    /// Ids of related items, in the order the backend ranked them.
    #[serde(default)]
    pub related: Vec<String>,
    #[serde(default)]
    pub comments: Vec<TextItem>,
}

/// Whole snapshot document: `{"nodes": {"<id>": {...}}}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnapshotDocument {
    pub nodes: HashMap<String, SnapshotNode>,
}

/// Port calls served so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SnapshotUsage {
    #[serde(rename = "titleCalls")]
    pub title_calls: usize,
    #[serde(rename = "textPageCalls")]
    pub text_page_calls: usize,
    #[serde(rename = "neighborCalls")]
    pub neighbor_calls: usize,
}

impl SnapshotUsage {
    pub fn total(&self) -> usize {
        self.title_calls + self.text_page_calls + self.neighbor_calls
    }
}
