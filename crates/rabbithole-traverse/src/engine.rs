//! Breadth-first traversal engine.
//!
//! A run moves through `INIT -> RUNNING -> {FOUND, EXHAUSTED, ABORTED}`:
//!
//! - INIT resolves the seed title, records the seed at depth 0 and queues it.
//! - RUNNING takes the frontier one depth level at a time. Each node is
//!   classified; a target ends the run immediately, a non-target has its
//!   neighbors fetched and every unseen neighbor is recorded one level deeper
//!   and queued.
//! - An empty frontier is EXHAUSTED. A fatal port error or cancellation is
//!   ABORTED, keeping the node under examination for best-effort reporting.
//!
//! Because children are always queued one level below their parent and the
//! frontier is FIFO, the first target dequeued is at the minimum depth of
//! any reachable target. Siblings queued behind it are never classified.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use futures::stream::{self, StreamExt};
use rabbithole_classify::{Classification, ClassificationPipeline};
use rabbithole_core::{Node, PortError, Ports, RetryPolicy, SearchConfig};
use tracing::{debug, info, warn};

use crate::cancel::CancellationToken;
use crate::frontier::Frontier;
use crate::types::*;
use crate::visited::VisitedIndex;

/// Expansion limits for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraversalOptions {
    pub max_neighbors: usize,
    pub max_depth: Option<usize>,
    /// Classifications in flight within one level. Results are still
    /// consumed in queue order, so any value yields the same outcome.
    pub classify_concurrency: usize,
}

impl Default for TraversalOptions {
    fn default() -> Self {
        Self {
            max_neighbors: rabbithole_core::config::DEFAULT_MAX_NEIGHBORS,
            max_depth: None,
            classify_concurrency: 1,
        }
    }
}

impl TraversalOptions {
    pub fn from_config(config: &SearchConfig) -> Self {
        Self {
            max_neighbors: config.max_neighbors,
            max_depth: config.max_depth,
            classify_concurrency: config.classify_concurrency.max(1),
        }
    }
}

type Observer = Arc<dyn Fn(&SearchEvent<'_>) + Send + Sync>;

/// Per-run bookkeeping. Built fresh by every [`TraversalEngine::run`].
#[derive(Default)]
struct SearchState {
    visited: VisitedIndex,
    frontier: Frontier,
    stats: SearchStats,
}

impl SearchState {
    fn discover(&mut self, node: Node) -> bool {
        let id = node.id.clone();
        let depth = node.depth;
        if !self.visited.insert(node) {
            return false;
        }
        self.frontier.push(id);
        self.stats.nodes_discovered += 1;
        self.stats.max_depth_reached = self.stats.max_depth_reached.max(depth);
        true
    }

    /// Dequeue every node at the depth of the frontier head.
    fn next_level(&mut self) -> Vec<Node> {
        let mut level: Vec<Node> = Vec::new();
        while let Some(id) = self.frontier.peek() {
            let Some(node) = self.visited.get(id) else {
                warn!("Queued id {} has no visited record, dropping it", id);
                self.frontier.pop();
                continue;
            };
            if level.first().is_some_and(|first| first.depth != node.depth) {
                break;
            }
            level.push(node.clone());
            self.frontier.pop();
        }
        level
    }

    fn finish(
        mut self,
        status: SearchStatus,
        node: Option<Node>,
        classification: Option<Classification>,
        started: Instant,
    ) -> SearchOutcome {
        self.stats.duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        SearchOutcome {
            status,
            node,
            reason: classification.and_then(|c| c.reason),
            visited: self.visited,
            stats: self.stats,
        }
    }
}

/// Runs breadth-first searches from a seed to the nearest target node.
pub struct TraversalEngine {
    ports: Ports,
    pipeline: ClassificationPipeline,
    retry: RetryPolicy,
    options: TraversalOptions,
    cancel: CancellationToken,
    observer: Option<Observer>,
}

impl TraversalEngine {
    pub fn new(
        ports: Ports,
        pipeline: ClassificationPipeline,
        retry: RetryPolicy,
        options: TraversalOptions,
    ) -> Self {
        Self {
            ports,
            pipeline,
            retry,
            options,
            cancel: CancellationToken::new(),
            observer: None,
        }
    }

    /// Build an engine with pipeline, retry and limits taken from `config`.
    pub fn from_config(ports: Ports, config: &SearchConfig) -> Self {
        let pipeline =
            ClassificationPipeline::new(config.ruleset.clone(), config.paging(), config.retry.clone());
        Self::new(
            ports,
            pipeline,
            config.retry.clone(),
            TraversalOptions::from_config(config),
        )
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn with_observer<F>(mut self, observer: F) -> Self
    where
        F: Fn(&SearchEvent<'_>) + Send + Sync + 'static,
    {
        self.observer = Some(Arc::new(observer));
        self
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn options(&self) -> TraversalOptions {
        self.options
    }

    /// Search outward from `seed_id` until a target is found, the graph is
    /// exhausted, or the run is aborted.
    pub async fn run(&self, seed_id: &str) -> SearchOutcome {
        let started = Instant::now();
        let mut state = SearchState::default();

        // INIT
        let metadata = self.ports.metadata.clone();
        let title = match self
            .guarded(self.retry.run("fetch_title", || metadata.fetch_title(seed_id)))
            .await
        {
            Ok(title) => title,
            Err(AbortCause::Port(PortError::Malformed(msg))) => {
                warn!("Unreadable title for seed {}: {}", seed_id, msg);
                seed_id.to_string()
            }
            Err(cause) => {
                warn!("Could not resolve seed {}: {}", seed_id, cause);
                return state.finish(SearchStatus::Aborted(cause), None, None, started);
            }
        };
        let seed = Node::seed(seed_id, title);
        info!("Starting search from {} ({})", seed.title, seed.id);
        state.discover(seed.clone());
        let mut last_examined = seed;

        // RUNNING
        loop {
            let level = state.next_level();
            let Some(depth) = level.first().map(|n| n.depth) else {
                info!(
                    "Frontier exhausted after {} nodes, no target found",
                    state.stats.nodes_classified
                );
                return state.finish(
                    SearchStatus::Exhausted,
                    Some(last_examined),
                    None,
                    started,
                );
            };
            info!("Checking {} node(s) at depth {}", level.len(), depth);
            self.emit(&SearchEvent::LevelStarted {
                depth,
                size: level.len(),
            });

            // Classifications run ahead up to the concurrency limit but are
            // consumed in queue order. Dropping the stream on a match cancels
            // whatever is still in flight.
            let text = self.ports.text.as_ref();
            let pipeline = &self.pipeline;
            let mut verdicts = stream::iter(level.iter())
                .map(|node| pipeline.classify(text, &node.id))
                .buffered(self.options.classify_concurrency);

            for node in &level {
                last_examined = node.clone();
                debug!("Trying {} ({}) at depth {}", node.title, node.id, node.depth);
                self.emit(&SearchEvent::NodeExamined(node));

                let verdict = tokio::select! {
                    biased;
                    _ = self.cancel.cancelled() => {
                        info!("Search cancelled while examining {}", node.id);
                        return state.finish(
                            SearchStatus::Aborted(AbortCause::Cancelled),
                            Some(last_examined),
                            None,
                            started,
                        );
                    }
                    v = verdicts.next() => v,
                };
                let Some(verdict) = verdict else {
                    break;
                };
                state.stats.nodes_classified += 1;

                match verdict {
                    Ok(classification) if classification.is_target => {
                        state.stats.pages_fetched += classification.pages_fetched;
                        if let Some(reason) = &classification.reason {
                            self.emit(&SearchEvent::Matched { node, reason });
                        }
                        info!(
                            "Target found: {} ({}) at depth {}",
                            node.title, node.id, node.depth
                        );
                        return state.finish(
                            SearchStatus::Found,
                            Some(last_examined),
                            Some(classification),
                            started,
                        );
                    }
                    Ok(classification) => {
                        state.stats.pages_fetched += classification.pages_fetched;
                    }
                    Err(err) if !err.is_fatal() => {
                        warn!("Treating {} as non-target: {}", node.id, err);
                        state.stats.nodes_skipped += 1;
                        self.emit(&SearchEvent::NodeSkipped { node, error: &err });
                    }
                    Err(err) => {
                        warn!("Aborting search at {}: {}", node.id, err);
                        return state.finish(
                            SearchStatus::Aborted(AbortCause::Port(err)),
                            Some(last_examined),
                            None,
                            started,
                        );
                    }
                }

                if let Err(cause) = self.expand(node, &mut state).await {
                    warn!("Aborting search at {}: {}", node.id, cause);
                    return state.finish(
                        SearchStatus::Aborted(cause),
                        Some(last_examined),
                        None,
                        started,
                    );
                }
            }
        }
    }

    /// Record and queue every unseen neighbor of `node`.
    async fn expand(&self, node: &Node, state: &mut SearchState) -> Result<(), AbortCause> {
        if self.options.max_depth.is_some_and(|max| node.depth >= max) {
            debug!("Not expanding {}: depth limit reached", node.id);
            return Ok(());
        }

        let ports = self.ports.neighbors.clone();
        let limit = self.options.max_neighbors;
        let neighbors = match self
            .guarded(
                self.retry
                    .run("fetch_neighbors", || ports.fetch_neighbors(&node.id, limit)),
            )
            .await
        {
            Ok(neighbors) => neighbors,
            Err(AbortCause::Port(err)) if !err.is_fatal() => {
                warn!("Ignoring neighbors of {}: {}", node.id, err);
                state.stats.nodes_skipped += 1;
                self.emit(&SearchEvent::NodeSkipped { node, error: &err });
                return Ok(());
            }
            Err(cause) => return Err(cause),
        };

        let mut added = 0;
        for neighbor in neighbors.into_iter().take(limit) {
            if state.visited.contains(&neighbor.id) {
                continue;
            }
            if state.discover(Node::child_of(node, neighbor.id, neighbor.title)) {
                added += 1;
            }
        }
        debug!("Queued {} new neighbor(s) of {}", added, node.id);
        Ok(())
    }

    /// Await a port call unless the run is cancelled first.
    async fn guarded<T, Fut>(&self, call: Fut) -> Result<T, AbortCause>
    where
        Fut: Future<Output = Result<T, PortError>>,
    {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(AbortCause::Cancelled),
            result = call => result.map_err(AbortCause::Port),
        }
    }

    fn emit(&self, event: &SearchEvent<'_>) {
        if let Some(observer) = &self.observer {
            observer(event);
        }
    }
}
