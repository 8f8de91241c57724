//! Duplicate review of correct rules via `sameAs`.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use tracing::warn;

use crate::error::RulesDbError;
use crate::labeled::{LabeledRule, SameAs};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RedundancyReport {
    pub correct_or_partial: usize,
    /// Ids of rules marked as their own canonical representative.
    pub unique: BTreeSet<i64>,
    /// Canonical id -> number of rules marked as its duplicate.
    pub redundant_by_canonical: BTreeMap<i64, usize>,
    /// Correct rules nobody has reviewed for duplicates yet.
    pub unreviewed: Vec<i64>,
}

impl RedundancyReport {
    pub fn compute(rules: &[LabeledRule]) -> Self {
        let mut report = Self::default();
        for rule in rules.iter().filter(|r| r.label.is_correct_or_partial()) {
            report.correct_or_partial += 1;
            match rule.same_as() {
                SameAs::Unreviewed => report.unreviewed.push(rule.id),
                SameAs::Canonical => {
                    report.unique.insert(rule.id);
                }
                SameAs::DuplicateOf(canonical) => {
                    *report.redundant_by_canonical.entry(canonical).or_insert(0) += 1;
                }
            }
        }
        if !report.unreviewed.is_empty() {
            warn!(
                count = report.unreviewed.len(),
                "correct rules without a sameAs review"
            );
        }
        report
    }

    /// Duplicates, not counting the canonical rules themselves.
    pub fn redundant_total(&self) -> usize {
        self.redundant_by_canonical.values().sum()
    }
}

/// Every rule labeled, every correct rule reviewed for duplicates.
pub fn check_complete(rules: &[LabeledRule]) -> Result<(), RulesDbError> {
    for rule in rules {
        if rule.label.is_unknown() {
            return Err(RulesDbError::IncompleteReview {
                id: rule.id,
                reason: "label is still unknown",
            });
        }
        if rule.label.is_correct_or_partial() && rule.same_as() == SameAs::Unreviewed {
            return Err(RulesDbError::IncompleteReview {
                id: rule.id,
                reason: "no sameAs decision",
            });
        }
    }
    Ok(())
}
