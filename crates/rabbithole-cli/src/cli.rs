//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;
use rabbithole_core::SearchConfig;

#[derive(Parser, Debug)]
#[command(name = "rabbithole")]
#[command(about = "Find the nearest related item whose discussion says you have gone too far", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Id of the item to start from
    pub seed: String,

    /// Graph snapshot to search
    #[arg(long, env = "RABBITHOLE_GRAPH", default_value = "graph.json")]
    pub graph: PathBuf,

    /// Search config file (JSON); missing file means defaults
    #[arg(long, env = "RABBITHOLE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Trace every item as it is checked
    #[arg(short, long)]
    pub verbose: bool,

    /// Print the comment that marked the target
    #[arg(long)]
    pub show_reason: bool,

    /// Do not expand items this many clicks from the seed
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Related items requested per item
    #[arg(long)]
    pub max_neighbors: Option<usize>,

    /// Items classified concurrently within one depth level
    #[arg(long)]
    pub concurrency: Option<usize>,
}

impl Cli {
    /// Flags win over file and environment settings.
    pub fn apply(&self, config: &mut SearchConfig) {
        if let Some(depth) = self.max_depth {
            config.max_depth = Some(depth);
        }
        if let Some(n) = self.max_neighbors {
            config.max_neighbors = n;
        }
        if let Some(n) = self.concurrency {
            config.classify_concurrency = n;
        }
    }
}
