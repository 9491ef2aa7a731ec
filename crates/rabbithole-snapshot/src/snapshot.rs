//! JSON-backed implementation of the fetch ports.

use std::path::Path;

use async_trait::async_trait;
use parking_lot::Mutex;
use rabbithole_core::{
    MetadataPort, Neighbor, NeighborPort, PortError, Result, TextPage, TextPort,
};
use tracing::{debug, info};

use crate::types::*;

/// Item graph held in memory.
pub struct GraphSnapshot {
    document: SnapshotDocument,
    usage: Mutex<SnapshotUsage>,
}

impl GraphSnapshot {
    pub fn new(document: SnapshotDocument) -> Self {
        Self {
            document,
            usage: Mutex::new(SnapshotUsage::default()),
        }
    }

    /// Load a snapshot file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let snapshot = Self::from_json(&raw)?;
        info!(
            "Loaded graph snapshot from {} ({} nodes)",
            path.display(),
            snapshot.len()
        );
        Ok(snapshot)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let document: SnapshotDocument = serde_json::from_str(raw)?;
        Ok(Self::new(document))
    }

    pub fn len(&self) -> usize {
        self.document.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.document.nodes.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.document.nodes.contains_key(id)
    }

    pub fn usage(&self) -> SnapshotUsage {
        *self.usage.lock()
    }
}

#[async_trait]
impl MetadataPort for GraphSnapshot {
    async fn fetch_title(&self, node_id: &str) -> std::result::Result<String, PortError> {
        self.usage.lock().title_calls += 1;
        self.document
            .nodes
            .get(node_id)
            .map(|n| n.title.clone())
            .ok_or_else(|| PortError::Malformed(format!("item {} is not in the snapshot", node_id)))
    }
}

#[async_trait]
impl TextPort for GraphSnapshot {
    async fn fetch_text_page(
        &self,
        node_id: &str,
        token: Option<&str>,
        page_size: usize,
    ) -> std::result::Result<TextPage, PortError> {
        self.usage.lock().text_page_calls += 1;
        let Some(node) = self.document.nodes.get(node_id) else {
            return Ok(TextPage::default());
        };

        let start = match token {
            None => 0,
            Some(t) => t
                .parse::<usize>()
                .map_err(|_| PortError::Malformed(format!("bad page token {:?}", t)))?,
        };
        let total = node.comments.len();
        let start = start.min(total);
        let end = start.saturating_add(page_size).min(total);

        Ok(TextPage {
            items: node.comments[start..end].to_vec(),
            next_token: (end < total).then(|| end.to_string()),
        })
    }
}

#[async_trait]
impl NeighborPort for GraphSnapshot {
    async fn fetch_neighbors(
        &self,
        node_id: &str,
        max_count: usize,
    ) -> std::result::Result<Vec<Neighbor>, PortError> {
        self.usage.lock().neighbor_calls += 1;
        let Some(node) = self.document.nodes.get(node_id) else {
            return Ok(Vec::new());
        };

        let neighbors = node
            .related
            .iter()
            .filter_map(|id| match self.document.nodes.get(id) {
                Some(related) => Some(Neighbor::new(id.clone(), related.title.clone())),
                None => {
                    debug!("{} links to {} which is not in the snapshot", node_id, id);
                    None
                }
            })
            .take(max_count)
            .collect();
        Ok(neighbors)
    }
}
