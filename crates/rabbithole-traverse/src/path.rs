//! Seed-to-node path reconstruction and rendering.

use rabbithole_core::{Error, Node, Result};

use crate::visited::VisitedIndex;

const ARROW: &str = " -> ";

/// Follow parent links from `node` back to the seed. The returned path runs
/// seed first, `node` last, and has `node.depth + 1` entries.
pub fn reconstruct(node: &Node, visited: &VisitedIndex) -> Result<Vec<Node>> {
    let mut chain = vec![node.clone()];
    let mut current = node;

    while let Some(parent_id) = current.parent_id.as_deref() {
        // A well-formed chain never revisits an id, so it is at most as long
        // as the index.
        if chain.len() > visited.len() {
            return Err(Error::BrokenPath(format!(
                "parent chain from {} does not reach a seed",
                node.id
            )));
        }
        let parent = visited.get(parent_id).ok_or_else(|| {
            Error::BrokenPath(format!(
                "{} names parent {} which was never visited",
                current.id, parent_id
            ))
        })?;
        chain.push(parent.clone());
        current = parent;
    }

    chain.reverse();
    Ok(chain)
}

/// Render a path as a numbered list, one node per line, each line except the
/// last ending in an arrow.
pub fn render_path<F>(path: &[Node], item_url: F) -> String
where
    F: Fn(&str) -> String,
{
    path.iter()
        .enumerate()
        .map(|(i, node)| format!("{}. {} ({})", i + 1, node.title, item_url(&node.id)))
        .collect::<Vec<_>>()
        .join(&format!("{}\n", ARROW))
}
