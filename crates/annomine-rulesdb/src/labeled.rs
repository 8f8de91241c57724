//! Persisted rule record.
//!
//! ```json
//! { "id": -4123, "antecedent": ["..."], "consequent": ["..."],
//!   "label": "part. correct", "sameAs": -1 }
//! ```

use std::collections::BTreeSet;

use annomine_miner::{rule_content_id, AssociationRule, RuleLabel};
use serde::{Deserialize, Serialize};

/// `sameAs` value of a rule that is its own canonical representative.
pub const SAME_AS_CANONICAL: i64 = -1;
/// `sameAs` value written by tools that default the field to zero.
pub const SAME_AS_UNREVIEWED: i64 = 0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledRule {
    /// Content hash of (antecedent, consequent).
    pub id: i64,
    pub antecedent: BTreeSet<String>,
    pub consequent: BTreeSet<String>,
    #[serde(default)]
    pub label: RuleLabel,
    #[serde(rename = "sameAs", default, skip_serializing_if = "Option::is_none")]
    pub same_as: Option<i64>,
}

/// Outcome of the manual duplicate review.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameAs {
    Unreviewed,
    Canonical,
    DuplicateOf(i64),
}

impl LabeledRule {
    pub fn new(antecedent: BTreeSet<String>, consequent: BTreeSet<String>, label: RuleLabel) -> Self {
        Self {
            id: rule_content_id(&antecedent, &consequent),
            antecedent,
            consequent,
            label,
            same_as: None,
        }
    }

    pub fn from_rule(rule: &AssociationRule) -> Self {
        Self {
            id: rule.content_id(),
            antecedent: rule.antecedent().clone(),
            consequent: BTreeSet::from([rule.consequent().to_string()]),
            label: rule.label(),
            same_as: None,
        }
    }

    /// `antecedent ∪ consequent`.
    pub fn items(&self) -> BTreeSet<&String> {
        self.antecedent.iter().chain(&self.consequent).collect()
    }

    pub fn same_as(&self) -> SameAs {
        match self.same_as {
            None | Some(SAME_AS_UNREVIEWED) => SameAs::Unreviewed,
            Some(SAME_AS_CANONICAL) => SameAs::Canonical,
            Some(id) => SameAs::DuplicateOf(id),
        }
    }

    pub fn is_exactly(&self, other: &LabeledRule) -> bool {
        self.antecedent == other.antecedent && self.consequent == other.consequent
    }

    /// Every item of `other` also appears in this rule, on either side.
    pub fn covers(&self, other: &LabeledRule) -> bool {
        let items = self.items();
        other.items().iter().all(|item| items.contains(item))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn id_matches_the_mined_rule() {
        let rule = AssociationRule::new(set(&["a", "b"]), "c", 0.8).unwrap();
        let from_rule = LabeledRule::from_rule(&rule);
        let direct = LabeledRule::new(set(&["b", "a"]), set(&["c"]), RuleLabel::Correct);
        assert_eq!(from_rule.id, direct.id);
    }

    #[test]
    fn parses_legacy_records() {
        let json = r#"{"id": 42, "antecedent": ["a"], "consequent": ["b"], "label": "correct", "sameAs": 0}"#;
        let rule: LabeledRule = serde_json::from_str(json).unwrap();
        assert_eq!(rule.label, RuleLabel::Correct);
        assert_eq!(rule.same_as(), SameAs::Unreviewed);

        let json = r#"{"id": 43, "antecedent": ["a"], "consequent": ["b"], "label": "part. correct", "sameAs": 42}"#;
        let rule: LabeledRule = serde_json::from_str(json).unwrap();
        assert_eq!(rule.same_as(), SameAs::DuplicateOf(42));
    }

    #[test]
    fn unknown_label_strings_are_rejected() {
        let json = r#"{"id": 1, "antecedent": ["a"], "consequent": ["b"], "label": "maybe"}"#;
        assert!(serde_json::from_str::<LabeledRule>(json).is_err());
    }

    #[test]
    fn covers_ignores_sides() {
        let big = LabeledRule::new(set(&["a", "b"]), set(&["c"]), RuleLabel::Unknown);
        let small = LabeledRule::new(set(&["c"]), set(&["a"]), RuleLabel::Correct);
        assert!(big.covers(&small));
        assert!(!small.covers(&big));
        assert!(!big.is_exactly(&small));
    }
}
