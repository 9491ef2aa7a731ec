//! Offline item graph loaded from a JSON snapshot.
//!
//! Serves all three fetch ports from memory so a search can run without any
//! network backend, and counts calls per operation so callers can see how
//! much quota a run would have spent.

pub mod snapshot;
pub mod types;

pub use snapshot::GraphSnapshot;
pub use types::*;
