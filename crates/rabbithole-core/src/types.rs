//! Data model shared by every Rabbithole crate.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A content item discovered during traversal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub title: String,
    /// `None` only for the seed.
    #[serde(rename = "parentId")]
    pub parent_id: Option<String>,
    /// Number of related-item hops ("clicks") from the seed.
    pub depth: usize,
}

impl Node {
    /// The root of a traversal: depth 0, no parent.
    pub fn seed(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            parent_id: None,
            depth: 0,
        }
    }

    /// A node discovered through one of `parent`'s related-item links.
    pub fn child_of(parent: &Node, id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            parent_id: Some(parent.id.clone()),
            depth: parent.depth + 1,
        }
    }

    pub fn is_seed(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// One unit of discussion attached to a node (e.g. a comment).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextItem {
    pub author: String,
    pub text: String,
}

impl TextItem {
    pub fn new(author: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            text: text.into(),
        }
    }
}

/// A page of text items plus the token for the page after it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextPage {
    pub items: Vec<TextItem>,
    #[serde(rename = "nextToken", skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

/// A related item as reported by the neighbor port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Neighbor {
    pub id: String,
    pub title: String,
}

impl Neighbor {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }
}

/// A set of substrings that must all occur in a text, in any order.
///
/// Tokens are stored lower-cased so matching only has to fold the text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct PatternGroup {
    tokens: Vec<String>,
}

impl PatternGroup {
    pub fn new<I, S>(tokens: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tokens: Vec<String> = tokens
            .into_iter()
            .map(|t| t.as_ref().to_lowercase())
            .collect();
        if tokens.is_empty() {
            return Err(Error::InvalidRuleset("pattern group has no tokens".into()));
        }
        if tokens.iter().any(|t| t.is_empty()) {
            return Err(Error::InvalidRuleset(
                "pattern group contains an empty token".into(),
            ));
        }
        Ok(Self { tokens })
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// `lowercase_text` must already be lower-cased.
    pub fn is_contained_in(&self, lowercase_text: &str) -> bool {
        self.tokens.iter().all(|t| lowercase_text.contains(t.as_str()))
    }
}

impl TryFrom<Vec<String>> for PatternGroup {
    type Error = Error;

    fn try_from(tokens: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(tokens)
    }
}

impl From<PatternGroup> for Vec<String> {
    fn from(group: PatternGroup) -> Self {
        group.tokens
    }
}

impl fmt::Display for PatternGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let quoted: Vec<String> = self.tokens.iter().map(|t| format!("{:?}", t)).collect();
        write!(f, "{}", quoted.join(", "))
    }
}

/// Ordered list of pattern groups. A node is a target when any group
/// matches any of its text items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassificationRuleset {
    groups: Vec<PatternGroup>,
}

impl ClassificationRuleset {
    pub fn new(groups: Vec<PatternGroup>) -> Self {
        Self { groups }
    }

    /// Build a ruleset from nested token lists.
    pub fn from_tokens<G, I, S>(groups: G) -> Result<Self, Error>
    where
        G: IntoIterator<Item = I>,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let groups = groups
            .into_iter()
            .map(PatternGroup::new)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { groups })
    }

    pub fn groups(&self) -> &[PatternGroup] {
        &self.groups
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }
}

/// The text item that made a node a target, and the group it matched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchReason {
    pub author: String,
    pub text: String,
    #[serde(rename = "matchedGroup")]
    pub matched_group: PatternGroup,
}

impl fmt::Display for MatchReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: \"{}\" had a derivation of {}",
            self.author, self.text, self.matched_group
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_depth_and_parent() {
        let seed = Node::seed("A", "Seed");
        let child = Node::child_of(&seed, "B", "Child");
        assert!(seed.is_seed());
        assert_eq!(child.parent_id.as_deref(), Some("A"));
        assert_eq!(child.depth, 1);
        let grandchild = Node::child_of(&child, "C", "Grandchild");
        assert_eq!(grandchild.depth, 2);
    }

    #[test]
    fn test_pattern_group_lowercases_tokens() {
        let group = PatternGroup::new(["How", "Did I Get Here"]).unwrap();
        assert_eq!(group.tokens(), &["how".to_string(), "did i get here".to_string()]);
    }

    #[test]
    fn test_pattern_group_rejects_empty() {
        assert!(PatternGroup::new(Vec::<String>::new()).is_err());
        assert!(PatternGroup::new(["weird", ""]).is_err());
    }

    #[test]
    fn test_ruleset_json_shape() {
        let ruleset: ClassificationRuleset =
            serde_json::from_str(r#"[["weird", "part", "of"], ["im in hell"]]"#).unwrap();
        assert_eq!(ruleset.len(), 2);
        assert_eq!(ruleset.groups()[1].tokens(), &["im in hell".to_string()]);

        let json = serde_json::to_value(&ruleset).unwrap();
        assert_eq!(json, serde_json::json!([["weird", "part", "of"], ["im in hell"]]));
    }

    #[test]
    fn test_ruleset_json_rejects_empty_group() {
        let parsed: Result<ClassificationRuleset, _> = serde_json::from_str(r#"[[]]"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_match_reason_display() {
        let reason = MatchReason {
            author: "sam".into(),
            text: "Enough for today".into(),
            matched_group: PatternGroup::new(["enough for today"]).unwrap(),
        };
        assert_eq!(
            reason.to_string(),
            r#"sam: "Enough for today" had a derivation of "enough for today""#
        );
    }
}
