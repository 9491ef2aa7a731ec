//! Paginated classification of a node's discussion.

use rabbithole_core::{
    ClassificationRuleset, MatchReason, PagingLimits, PortError, RetryPolicy, TextPort,
};
use serde::Serialize;
use tracing::{debug, trace};

use crate::classifier::Classifier;

/// Verdict for one node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Classification {
    #[serde(rename = "isTarget")]
    pub is_target: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<MatchReason>,
    #[serde(rename = "pagesFetched")]
    pub pages_fetched: usize,
    #[serde(rename = "itemsScanned")]
    pub items_scanned: usize,
}

/// Pages text items through a [`TextPort`] and classifies each one until a
/// match is found or the paging budget runs out.
///
/// A node whose matching text lies beyond `max_pages * page_size` items is
/// never detected.
#[derive(Debug, Clone)]
pub struct ClassificationPipeline {
    ruleset: ClassificationRuleset,
    limits: PagingLimits,
    retry: RetryPolicy,
}

impl ClassificationPipeline {
    pub fn new(ruleset: ClassificationRuleset, limits: PagingLimits, retry: RetryPolicy) -> Self {
        Self {
            ruleset,
            limits,
            retry,
        }
    }

    pub fn ruleset(&self) -> &ClassificationRuleset {
        &self.ruleset
    }

    pub fn limits(&self) -> PagingLimits {
        self.limits
    }

    /// Classify `node_id`. Retryable port failures are retried here; any
    /// error that survives the retry policy is returned to the caller.
    pub async fn classify(
        &self,
        port: &dyn TextPort,
        node_id: &str,
    ) -> Result<Classification, PortError> {
        let mut verdict = Classification::default();
        let mut token: Option<String> = None;

        for _ in 0..self.limits.max_pages {
            let page = self
                .retry
                .run("fetch_text_page", || {
                    port.fetch_text_page(node_id, token.as_deref(), self.limits.page_size)
                })
                .await?;
            verdict.pages_fetched += 1;

            // An empty first page means no discussion. Later empty pages
            // are followed while the port still hands out a token.
            if page.items.is_empty() && verdict.pages_fetched == 1 {
                break;
            }

            for item in page.items.into_iter().take(self.limits.page_size) {
                verdict.items_scanned += 1;
                trace!("{}: {}: {}", node_id, item.author, item.text);
                let m = Classifier::matches(&item.text, &self.ruleset);
                if let Some(group) = m.matched_group {
                    debug!("{} matched {} on page {}", node_id, group, verdict.pages_fetched);
                    verdict.is_target = true;
                    verdict.reason = Some(MatchReason {
                        author: item.author,
                        text: item.text,
                        matched_group: group.clone(),
                    });
                    return Ok(verdict);
                }
            }

            match page.next_token {
                Some(next) => token = Some(next),
                None => break,
            }
        }

        Ok(verdict)
    }
}
