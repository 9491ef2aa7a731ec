//! Abstract fetch operations the traversal depends on.
//!
//! Implementations talk to whatever backend serves the item graph; the core
//! only sees these three calls and their classified [`PortError`]s.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::PortError;
use crate::types::{Neighbor, TextPage};

/// Resolves an item's display title. Called once, for the seed.
#[async_trait]
pub trait MetadataPort: Send + Sync {
    async fn fetch_title(&self, node_id: &str) -> Result<String, PortError>;
}

/// Pages through the discussion attached to an item.
#[async_trait]
pub trait TextPort: Send + Sync {
    /// `token` is `None` for the first page. A returned page with
    /// `next_token == None` is the last one.
    async fn fetch_text_page(
        &self,
        node_id: &str,
        token: Option<&str>,
        page_size: usize,
    ) -> Result<TextPage, PortError>;
}

/// Lists the items related to an item.
#[async_trait]
pub trait NeighborPort: Send + Sync {
    async fn fetch_neighbors(
        &self,
        node_id: &str,
        max_count: usize,
    ) -> Result<Vec<Neighbor>, PortError>;
}

/// The three ports a traversal needs, possibly served by different backends.
#[derive(Clone)]
pub struct Ports {
    pub metadata: Arc<dyn MetadataPort>,
    pub text: Arc<dyn TextPort>,
    pub neighbors: Arc<dyn NeighborPort>,
}

impl Ports {
    /// Use one backend for all three ports.
    pub fn from_backend<B>(backend: Arc<B>) -> Self
    where
        B: MetadataPort + TextPort + NeighborPort + 'static,
    {
        Self {
            metadata: backend.clone(),
            text: backend.clone(),
            neighbors: backend,
        }
    }
}
