//! Case-insensitive multi-token matching.

use rabbithole_core::{ClassificationRuleset, PatternGroup};

/// Outcome of testing one text against a ruleset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifierMatch<'r> {
    pub is_match: bool,
    pub matched_group: Option<&'r PatternGroup>,
}

pub struct Classifier;

impl Classifier {
    /// Test `text` against each group in ruleset order; the first group whose
    /// tokens all occur in the text wins.
    pub fn matches<'r>(text: &str, ruleset: &'r ClassificationRuleset) -> ClassifierMatch<'r> {
        let lowered = text.to_lowercase();
        ruleset
            .groups()
            .iter()
            .find(|group| group.is_contained_in(&lowered))
            .map(|group| ClassifierMatch {
                is_match: true,
                matched_group: Some(group),
            })
            .unwrap_or(ClassifierMatch {
                is_match: false,
                matched_group: None,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ruleset(groups: &[&[&str]]) -> ClassificationRuleset {
        ClassificationRuleset::from_tokens(groups.iter().map(|g| g.iter())).unwrap()
    }

    #[test]
    fn test_case_insensitive_containment() {
        let rules = ruleset(&[&["weird", "part", "of"]]);
        let m = Classifier::matches("that was the WEIRD part of my day", &rules);
        assert!(m.is_match);
        assert_eq!(m.matched_group, Some(&rules.groups()[0]));
    }

    #[test]
    fn test_missing_token_does_not_match() {
        let rules = ruleset(&[&["weird", "part", "of"]]);
        let m = Classifier::matches("weird part", &rules);
        assert!(!m.is_match);
        assert!(m.matched_group.is_none());
    }

    #[test]
    fn test_token_order_is_irrelevant() {
        let rules = ruleset(&[&["why", "what", "am i watching"]]);
        assert!(Classifier::matches("Am I Watching this? what... why", &rules).is_match);
    }

    #[test]
    fn test_first_matching_group_wins() {
        let rules = ruleset(&[&["im in hell"], &["hell"], &["in"]]);
        let m = Classifier::matches("welcome to hell", &rules);
        assert_eq!(m.matched_group, Some(&rules.groups()[1]));
    }

    #[test]
    fn test_substrings_match_inside_words() {
        let rules = ruleset(&[&["part"]]);
        assert!(Classifier::matches("departure", &rules).is_match);
    }

    #[test]
    fn test_empty_ruleset_never_matches() {
        let rules = ClassificationRuleset::default();
        assert!(!Classifier::matches("anything at all", &rules).is_match);
    }

    #[test]
    fn test_uppercase_patterns_match_lowercase_text() {
        let rules = ruleset(&[&["Enough For Today"]]);
        assert!(Classifier::matches("ok that's enough for today", &rules).is_match);
    }
}
