//! Breadth-first search for the nearest target node.
//!
//! [`TraversalEngine`] drives the search over a [`VisitedIndex`] and a
//! [`Frontier`], classifying each dequeued node through a
//! [`ClassificationPipeline`](rabbithole_classify::ClassificationPipeline)
//! and expanding non-targets through the neighbor port. Once a run ends,
//! [`path`] turns the parent links back into a seed-to-target report.

pub mod cancel;
pub mod engine;
pub mod frontier;
pub mod path;
pub mod types;
pub mod visited;

pub use cancel::CancellationToken;
pub use engine::{TraversalEngine, TraversalOptions};
pub use frontier::Frontier;
pub use path::{reconstruct, render_path};
pub use types::*;
pub use visited::VisitedIndex;
