//! Search configuration: defaults, optional JSON file, environment overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::retry::RetryPolicy;
use crate::types::ClassificationRuleset;

pub const DEFAULT_MAX_NEIGHBORS: usize = 10;
pub const DEFAULT_PAGE_SIZE: usize = 100;
pub const DEFAULT_MAX_PAGES: usize = 10;
pub const DEFAULT_ITEM_URL_TEMPLATE: &str = "http://www.youtube.com/watch?v={id}";

/// Phrases that suggest a viewer has wandered somewhere strange.
pub const DEFAULT_PATTERN_GROUPS: &[&[&str]] = &[
    &["weird", "part", "of"],
    &["wierd", "part", "of"],
    &["that's enough internet"],
    &["enough for today"],
    &["how", "did i get here"],
    &["what", "did", "i just watch"],
    &["the fuck did i", "watch"],
    &["i'm in hell"],
    &["im in hell"],
    &["why", "what", "am i watching"],
];

/// Per-node cap on discussion scanned by the classification pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagingLimits {
    pub max_pages: usize,
    pub page_size: usize,
}

impl Default for PagingLimits {
    fn default() -> Self {
        Self {
            max_pages: DEFAULT_MAX_PAGES,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Top-level search configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Related items requested per expanded node.
    #[serde(default = "default_max_neighbors")]
    pub max_neighbors: usize,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,
    /// Nodes at this depth are classified but not expanded.
    #[serde(default)]
    pub max_depth: Option<usize>,
    /// Classifications allowed in flight within one depth level.
    #[serde(default = "default_concurrency")]
    pub classify_concurrency: usize,
    /// `{id}` is replaced with the node id.
    #[serde(default = "default_item_url_template")]
    pub item_url_template: String,
    #[serde(default)]
    pub retry: RetryPolicy,
    #[serde(default = "default_ruleset")]
    pub ruleset: ClassificationRuleset,
}

fn default_max_neighbors() -> usize {
    DEFAULT_MAX_NEIGHBORS
}
fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}
fn default_max_pages() -> usize {
    DEFAULT_MAX_PAGES
}
fn default_concurrency() -> usize {
    1
}
fn default_item_url_template() -> String {
    DEFAULT_ITEM_URL_TEMPLATE.into()
}

/// The built-in ruleset from [`DEFAULT_PATTERN_GROUPS`].
pub fn default_ruleset() -> ClassificationRuleset {
    ClassificationRuleset::from_tokens(DEFAULT_PATTERN_GROUPS.iter().map(|g| g.iter()))
        .unwrap_or_default()
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_neighbors: DEFAULT_MAX_NEIGHBORS,
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: DEFAULT_MAX_PAGES,
            max_depth: None,
            classify_concurrency: 1,
            item_url_template: DEFAULT_ITEM_URL_TEMPLATE.into(),
            retry: RetryPolicy::default(),
            ruleset: default_ruleset(),
        }
    }
}

impl SearchConfig {
    /// Load from `path` if it exists, then apply environment overrides and
    /// validate.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) if p.exists() => {
                let raw = std::fs::read_to_string(p)?;
                let config: SearchConfig = serde_json::from_str(&raw)?;
                info!("Loaded search config from {}", p.display());
                config
            }
            Some(p) => {
                debug!("No config at {}, using defaults", p.display());
                Self::default()
            }
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `RABBITHOLE_*` overrides using `lookup` to read variables.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("RABBITHOLE_MAX_NEIGHBORS") {
            self.max_neighbors = parse_var("RABBITHOLE_MAX_NEIGHBORS", &v)?;
        }
        if let Some(v) = lookup("RABBITHOLE_PAGE_SIZE") {
            self.page_size = parse_var("RABBITHOLE_PAGE_SIZE", &v)?;
        }
        if let Some(v) = lookup("RABBITHOLE_MAX_PAGES") {
            self.max_pages = parse_var("RABBITHOLE_MAX_PAGES", &v)?;
        }
        if let Some(v) = lookup("RABBITHOLE_MAX_DEPTH") {
            self.max_depth = Some(parse_var("RABBITHOLE_MAX_DEPTH", &v)?);
        }
        if let Some(v) = lookup("RABBITHOLE_CONCURRENCY") {
            self.classify_concurrency = parse_var("RABBITHOLE_CONCURRENCY", &v)?;
        }
        if let Some(v) = lookup("RABBITHOLE_ITEM_URL") {
            self.item_url_template = v;
        }
        if let Some(v) = lookup("RABBITHOLE_MAX_ATTEMPTS") {
            self.retry.max_attempts = parse_var("RABBITHOLE_MAX_ATTEMPTS", &v)?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(Error::Config("page_size must be at least 1".into()));
        }
        if self.classify_concurrency == 0 {
            return Err(Error::Config(
                "classify_concurrency must be at least 1".into(),
            ));
        }
        if self.retry.max_attempts == 0 {
            return Err(Error::Config("retry.max_attempts must be at least 1".into()));
        }
        if self.ruleset.is_empty() {
            return Err(Error::InvalidRuleset("ruleset has no pattern groups".into()));
        }
        Ok(())
    }

    pub fn paging(&self) -> PagingLimits {
        PagingLimits {
            max_pages: self.max_pages,
            page_size: self.page_size,
        }
    }

    /// Canonical URL for an item.
    pub fn item_url(&self, id: &str) -> String {
        self.item_url_template.replace("{id}", id)
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::Config(format!("{} has invalid value {:?}", key, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = SearchConfig::default();
        assert_eq!(config.max_neighbors, 10);
        assert_eq!(config.page_size, 100);
        assert_eq!(config.max_pages, 10);
        assert_eq!(config.ruleset.len(), DEFAULT_PATTERN_GROUPS.len());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builtin_pattern_groups_are_valid() {
        let rules =
            ClassificationRuleset::from_tokens(DEFAULT_PATTERN_GROUPS.iter().map(|g| g.iter()))
                .unwrap();
        assert_eq!(rules, default_ruleset());
        assert_eq!(rules.groups()[0].tokens(), &["weird", "part", "of"]);
    }

    #[test]
    fn test_item_url() {
        let config = SearchConfig::default();
        assert_eq!(config.item_url("abc"), "http://www.youtube.com/watch?v=abc");
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = SearchConfig::load(Some(&dir.path().join("absent.json"))).unwrap();
        assert_eq!(config.max_pages, DEFAULT_MAX_PAGES);
    }

    #[test]
    fn test_load_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("search.json");
        std::fs::write(
            &path,
            r#"{"max_pages": 2, "page_size": 2, "ruleset": [["enough", "for", "today"]]}"#,
        )
        .unwrap();

        let config = SearchConfig::load(Some(&path)).unwrap();
        assert_eq!(config.paging(), PagingLimits { max_pages: 2, page_size: 2 });
        assert_eq!(config.max_neighbors, DEFAULT_MAX_NEIGHBORS);
        assert_eq!(config.ruleset.len(), 1);
    }

    #[test]
    fn test_load_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("search.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(SearchConfig::load(Some(&path)), Err(Error::Json(_))));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("RABBITHOLE_MAX_NEIGHBORS", "3"),
            ("RABBITHOLE_MAX_DEPTH", "4"),
            ("RABBITHOLE_ITEM_URL", "https://example.test/{id}"),
        ]
        .into_iter()
        .collect();
        let mut config = SearchConfig::default();
        config
            .apply_overrides(|k| vars.get(k).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.max_neighbors, 3);
        assert_eq!(config.max_depth, Some(4));
        assert_eq!(config.item_url("x"), "https://example.test/x");
    }

    #[test]
    fn test_env_override_rejects_garbage() {
        let mut config = SearchConfig::default();
        let result = config.apply_overrides(|k| {
            (k == "RABBITHOLE_PAGE_SIZE").then(|| "lots".to_string())
        });
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_validate_rejects_zero_page_size() {
        let config = SearchConfig {
            page_size: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_validate_rejects_empty_ruleset() {
        let config = SearchConfig {
            ruleset: ClassificationRuleset::default(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidRuleset(_))));
    }
}
