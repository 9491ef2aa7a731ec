//! Insert-only record of every node discovered during a run.

use std::collections::HashMap;

use rabbithole_core::Node;
use serde::Serialize;

/// Maps node id to the node record from its first discovery.
///
/// Records are never replaced or removed, so a node reachable through
/// several parents keeps the shallowest one BFS saw first.
#[derive(Debug, Clone, Default, Serialize)]
pub struct VisitedIndex {
    nodes: HashMap<String, Node>,
    /// Ids in discovery order.
    order: Vec<String>,
}

impl VisitedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `node` unless its id is already known. Returns whether the
    /// node was inserted.
    pub fn insert(&mut self, node: Node) -> bool {
        if self.nodes.contains_key(&node.id) {
            return false;
        }
        debug_assert!(
            match &node.parent_id {
                None => node.depth == 0,
                Some(pid) => self
                    .nodes
                    .get(pid)
                    .is_some_and(|parent| parent.depth + 1 == node.depth),
            },
            "node {} inserted without a recorded parent one level up",
            node.id
        );
        self.order.push(node.id.clone());
        self.nodes.insert(node.id.clone(), node);
        true
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in the order they were discovered.
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.order.iter().filter_map(|id| self.nodes.get(id))
    }
}
