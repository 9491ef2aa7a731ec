//! Rabbithole core: data model, error taxonomy, fetch ports, retry policy,
//! configuration.

pub mod config;
pub mod error;
pub mod ports;
pub mod retry;
pub mod types;

pub use config::{PagingLimits, SearchConfig};
pub use error::{Error, PortError, Result};
pub use ports::{MetadataPort, NeighborPort, Ports, TextPort};
pub use retry::RetryPolicy;
pub use types::*;
