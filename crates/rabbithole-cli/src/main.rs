//! Rabbithole: breadth-first search through related items for the nearest
//! one whose discussion matches the configured rules.

use std::io::Write;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use rabbithole_core::{Ports, SearchConfig};
use rabbithole_snapshot::GraphSnapshot;
use rabbithole_traverse::{SearchStatus, TraversalEngine};

mod cli;
mod narrate;

use cli::Cli;
use narrate::{render_report, Narrator, BANNER};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Cli::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = SearchConfig::load(args.config.as_deref()).context("loading search config")?;
    args.apply(&mut config);
    config.validate()?;
    debug!("Arguments: {:?}", args);

    let snapshot = GraphSnapshot::load(&args.graph)
        .with_context(|| format!("loading graph snapshot {}", args.graph.display()))?;
    let snapshot = Arc::new(snapshot);

    let narrator = Arc::new(Narrator::new(args.verbose, args.show_reason, config.clone()));
    let observer = narrator.clone();
    let engine = TraversalEngine::from_config(Ports::from_backend(snapshot.clone()), &config)
        .with_observer(move |event| observer.observe(event, &mut std::io::stdout().lock()));

    let cancel = engine.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });

    println!("{}", BANNER);
    let outcome = engine.run(&args.seed).await;

    let report = render_report(&outcome, |id| config.item_url(id));
    let mut stdout = std::io::stdout().lock();
    write!(stdout, "{}", report)?;
    stdout.flush()?;

    let usage = snapshot.usage();
    info!(
        "Search finished: classified={}, discovered={}, skipped={}, pages={}, port_calls={}, duration={}ms",
        outcome.stats.nodes_classified,
        outcome.stats.nodes_discovered,
        outcome.stats.nodes_skipped,
        outcome.stats.pages_fetched,
        usage.total(),
        outcome.stats.duration_ms
    );

    Ok(match outcome.status {
        SearchStatus::Found => ExitCode::SUCCESS,
        SearchStatus::Exhausted => ExitCode::from(1),
        SearchStatus::Aborted(_) => ExitCode::from(2),
    })
}
