//! Traversal outcome and progress types.

use std::fmt;

use rabbithole_core::{MatchReason, Node, PortError, Result};
use serde::Serialize;

use crate::path::reconstruct;
use crate::visited::VisitedIndex;

/// Why a run stopped early.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbortCause {
    /// A port call failed with an error the retry policy could not absorb.
    Port(PortError),
    Cancelled,
}

impl AbortCause {
    pub fn class(&self) -> &'static str {
        match self {
            Self::Port(err) => err.class(),
            Self::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for AbortCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Port(err) => write!(f, "{}", err),
            Self::Cancelled => write!(f, "search cancelled"),
        }
    }
}

/// Terminal state of a traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchStatus {
    Found,
    /// Every reachable node (within the depth limit) was classified.
    Exhausted,
    Aborted(AbortCause),
}

/// Counters collected over one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    #[serde(rename = "nodesClassified")]
    pub nodes_classified: usize,
    /// Nodes added to the visited index, seed included.
    #[serde(rename = "nodesDiscovered")]
    pub nodes_discovered: usize,
    /// Nodes whose text or neighbor response was malformed.
    #[serde(rename = "nodesSkipped")]
    pub nodes_skipped: usize,
    #[serde(rename = "pagesFetched")]
    pub pages_fetched: usize,
    #[serde(rename = "maxDepthReached")]
    pub max_depth_reached: usize,
    #[serde(rename = "durationMs")]
    pub duration_ms: u64,
}

/// Result of [`TraversalEngine::run`](crate::TraversalEngine::run).
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub status: SearchStatus,
    /// The target when found; the node being examined when aborted; the last
    /// node classified when exhausted.
    pub node: Option<Node>,
    pub reason: Option<MatchReason>,
    pub visited: VisitedIndex,
    pub stats: SearchStats,
}

impl SearchOutcome {
    pub fn is_found(&self) -> bool {
        self.status == SearchStatus::Found
    }

    /// Number of related-item hops from the seed to the reported node.
    pub fn clicks(&self) -> Option<usize> {
        self.node.as_ref().map(|n| n.depth)
    }

    /// Seed-to-node path for the reported node, if there is one.
    pub fn path(&self) -> Result<Option<Vec<Node>>> {
        self.node
            .as_ref()
            .map(|node| reconstruct(node, &self.visited))
            .transpose()
    }
}

/// Progress notifications emitted while a run is in flight.
#[derive(Debug, Clone, Copy)]
pub enum SearchEvent<'a> {
    LevelStarted { depth: usize, size: usize },
    NodeExamined(&'a Node),
    NodeSkipped { node: &'a Node, error: &'a PortError },
    Matched { node: &'a Node, reason: &'a MatchReason },
}
