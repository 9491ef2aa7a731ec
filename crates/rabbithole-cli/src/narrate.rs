//! Human-readable progress narration and the final report.

use std::io::Write;

use parking_lot::Mutex;
use rabbithole_core::SearchConfig;
use rabbithole_traverse::{render_path, SearchEvent, SearchOutcome, SearchStatus};

pub const BANNER: &str = "================\nBEGINNING SEARCH\n================";

/// Turns traversal events into console narration.
pub struct Narrator {
    verbose: bool,
    show_reason: bool,
    config: SearchConfig,
    /// Deepest level announced so far.
    deepest: Mutex<usize>,
}

impl Narrator {
    pub fn new(verbose: bool, show_reason: bool, config: SearchConfig) -> Self {
        Self {
            verbose,
            show_reason,
            config,
            deepest: Mutex::new(0),
        }
    }

    /// Write the narration for one event. Output errors are ignored; the
    /// search should not fail because stdout went away.
    pub fn observe<W: Write>(&self, event: &SearchEvent<'_>, out: &mut W) {
        match event {
            SearchEvent::LevelStarted { depth: 0, .. } => {
                let _ = write!(out, "Checking initial item...");
            }
            SearchEvent::LevelStarted { depth, .. } => {
                let mut deepest = self.deepest.lock();
                if *depth > *deepest {
                    *deepest = *depth;
                    let _ = write!(out, "\nChecking items {} click(s) away...", depth);
                }
            }
            SearchEvent::NodeExamined(node) => {
                if self.verbose {
                    let _ = write!(
                        out,
                        "\nDEBUG: Trying {} ({}) {} click(s) away.",
                        node.title,
                        self.config.item_url(&node.id),
                        node.depth
                    );
                } else if node.depth > 0 {
                    let _ = write!(out, ".");
                }
            }
            SearchEvent::NodeSkipped { node, error } => {
                if self.verbose {
                    let _ = write!(out, "\nDEBUG: Skipped {} ({})", node.title, error);
                }
            }
            SearchEvent::Matched { reason, .. } => {
                if self.show_reason {
                    let _ = write!(out, "\nREASON: {}", reason);
                }
            }
        }
        let _ = out.flush();
    }
}

/// Results and path sections printed once the search ends.
pub fn render_report<F>(outcome: &SearchOutcome, item_url: F) -> String
where
    F: Fn(&str) -> String,
{
    let mut report = String::from("\n\n=======\nRESULTS\n=======\n");

    let node = outcome.node.as_ref();
    let title = node.map(|n| n.title.as_str()).unwrap_or("<none>");
    let clicks = outcome.clicks().unwrap_or(0);
    match &outcome.status {
        SearchStatus::Found => {
            report.push_str(&format!(
                "Reached target {} in {} click(s).\n",
                title, clicks
            ));
        }
        SearchStatus::Exhausted => {
            report.push_str(&format!(
                "No target reachable; checked {} item(s). Last checked: {} ({} click(s) away).\n",
                outcome.stats.nodes_classified, title, clicks
            ));
        }
        SearchStatus::Aborted(cause) => {
            report.push_str(&format!("Search aborted ({}): {}", cause.class(), cause));
            if let Some(n) = node {
                report.push_str(&format!(" while checking {} ({} click(s) away)", n.title, n.depth));
            }
            report.push_str(".\n");
        }
    }

    match outcome.path() {
        Ok(Some(path)) => {
            report.push_str("\n====\nPATH\n====\n");
            report.push_str(&render_path(&path, item_url));
            report.push('\n');
        }
        Ok(None) => {}
        Err(e) => {
            report.push_str(&format!("\nPath unavailable: {}\n", e));
        }
    }

    report
}
