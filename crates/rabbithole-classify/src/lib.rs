//! Content classification: decides whether a node's discussion marks it as
//! a target.
//!
//! The [`Classifier`] tests single texts against a ruleset; the
//! [`ClassificationPipeline`] pages a node's text items through a
//! [`TextPort`](rabbithole_core::TextPort) and stops at the first match.

pub mod classifier;
pub mod pipeline;

pub use classifier::{Classifier, ClassifierMatch};
pub use pipeline::{Classification, ClassificationPipeline};
