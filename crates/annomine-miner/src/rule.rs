//! Directed `antecedent => consequent` rules.
//!
//! The consequent is always a single item and never part of the antecedent.
//! Fields are private so the disjointness invariant can only be changed
//! through [`AssociationRule::move_to_consequent`].

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::digest::rule_content_id;
use crate::error::RuleError;
use crate::label::RuleLabel;

/// Confidence of a rule built by the heuristics instead of counted.
pub const SYNTHESIZED_CONFIDENCE: f64 = -1.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssociationRule {
    antecedent: BTreeSet<String>,
    consequent: String,
    confidence: f64,
    version: String,
    label: RuleLabel,
}

impl AssociationRule {
    pub fn new(
        antecedent: BTreeSet<String>,
        consequent: impl Into<String>,
        confidence: f64,
    ) -> Result<Self, RuleError> {
        let consequent = consequent.into();
        if antecedent.is_empty() {
            return Err(RuleError::EmptyAntecedent);
        }
        if antecedent.contains(&consequent) {
            return Err(RuleError::ConsequentInAntecedent(consequent));
        }
        if confidence != SYNTHESIZED_CONFIDENCE && !(0.0..=1.0).contains(&confidence) {
            return Err(RuleError::ConfidenceOutOfRange(confidence));
        }
        Ok(Self {
            antecedent,
            consequent,
            confidence,
            version: String::new(),
            label: RuleLabel::Unknown,
        })
    }

    pub fn antecedent(&self) -> &BTreeSet<String> {
        &self.antecedent
    }

    pub fn consequent(&self) -> &str {
        &self.consequent
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn is_synthesized(&self) -> bool {
        self.confidence == SYNTHESIZED_CONFIDENCE
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn set_version(&mut self, version: impl Into<String>) {
        self.version = version.into();
    }

    pub fn label(&self) -> RuleLabel {
        self.label
    }

    pub fn set_label(&mut self, label: RuleLabel) {
        self.label = label;
    }

    /// Swap `item` out of the antecedent into the consequent slot; the old
    /// consequent joins the antecedent.
    pub fn move_to_consequent(&mut self, item: &str) -> Result<(), RuleError> {
        if self.consequent == item {
            return Err(RuleError::AlreadyConsequent(item.to_string()));
        }
        if !self.antecedent.remove(item) {
            return Err(RuleError::NotInAntecedent(item.to_string()));
        }
        let previous = std::mem::replace(&mut self.consequent, item.to_string());
        self.antecedent.insert(previous);
        Ok(())
    }

    /// `antecedent ∪ {consequent}`.
    pub fn all_items(&self) -> BTreeSet<String> {
        let mut items = self.antecedent.clone();
        items.insert(self.consequent.clone());
        items
    }

    pub fn len(&self) -> usize {
        self.antecedent.len() + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn content_id(&self) -> i64 {
        rule_content_id(&self.antecedent, std::iter::once(&self.consequent))
    }
}

impl fmt::Display for AssociationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let antecedent: Vec<&str> = self.antecedent.iter().map(String::as_str).collect();
        write!(
            f,
            "[{}] => [{}] (confidence {:.3})",
            antecedent.join(", "),
            self.consequent,
            self.confidence
        )
    }
}
