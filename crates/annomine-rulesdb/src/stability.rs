//! Stability of mined rules across tool versions.
//!
//! ```text
//!   history ──► StabilityBaseline ──► StabilityReport
//!               current (labeled)     per prior version: hits / misses / new
//!               prior versions        overall (vs union of prior ids)
//!                                     label counts, precision, recall?
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use annomine_miner::RuleLabel;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::RulesDbError;
use crate::history::RuleHistory;
use crate::labeled::LabeledRule;

// =============================================================================
// Baseline
// =============================================================================

/// The fully labeled current version plus every other version on disk.
#[derive(Debug, Clone)]
pub struct StabilityBaseline {
    current_version: String,
    current: Vec<LabeledRule>,
    /// Oldest first; never contains `current_version`.
    prior: Vec<(String, Vec<LabeledRule>)>,
}

impl StabilityBaseline {
    pub fn load(dir: &Path, current_version: &str) -> Result<Self, RulesDbError> {
        Self::from_history(RuleHistory::load(dir)?, current_version)
    }

    pub fn from_history(history: RuleHistory, current_version: &str) -> Result<Self, RulesDbError> {
        let order: Vec<String> = history.versions().into_iter().map(str::to_string).collect();
        let mut versions = history.into_versions();

        let current = versions.remove(current_version).ok_or_else(|| {
            RulesDbError::MissingCurrentVersion {
                version: current_version.to_string(),
            }
        })?;

        let unlabeled = current.iter().filter(|r| r.label.is_unknown()).count();
        if unlabeled > 0 {
            return Err(RulesDbError::UnlabeledBaseline {
                version: current_version.to_string(),
                count: unlabeled,
            });
        }

        let prior = order
            .into_iter()
            .filter_map(|version| versions.remove(&version).map(|rules| (version, rules)))
            .collect();

        Ok(Self {
            current_version: current_version.to_string(),
            current,
            prior,
        })
    }

    pub fn current_version(&self) -> &str {
        &self.current_version
    }

    pub fn current(&self) -> &[LabeledRule] {
        &self.current
    }

    pub fn prior_versions(&self) -> impl Iterator<Item = &str> {
        self.prior.iter().map(|(v, _)| v.as_str())
    }
}

// =============================================================================
// Deltas
// =============================================================================

/// Partition of rule ids between the current run and one earlier set.
///
/// `hits ∪ new` is exactly the set of current ids, and the two are disjoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VersionDelta {
    pub hits: BTreeSet<i64>,
    pub misses: BTreeSet<i64>,
    pub new: BTreeSet<i64>,
    /// Misses grouped by the label they had in the earlier set.
    pub misses_by_label: BTreeMap<RuleLabel, usize>,
}

impl VersionDelta {
    pub fn compute(current: &[LabeledRule], prior: &[LabeledRule]) -> Self {
        let current_ids: BTreeSet<i64> = current.iter().map(|r| r.id).collect();
        let prior_ids: BTreeSet<i64> = prior.iter().map(|r| r.id).collect();

        let mut misses_by_label = BTreeMap::new();
        let mut counted = BTreeSet::new();
        for rule in prior {
            if !current_ids.contains(&rule.id) && counted.insert(rule.id) {
                *misses_by_label.entry(rule.label).or_insert(0) += 1;
            }
        }

        Self {
            hits: current_ids.intersection(&prior_ids).copied().collect(),
            misses: prior_ids.difference(&current_ids).copied().collect(),
            new: current_ids.difference(&prior_ids).copied().collect(),
            misses_by_label,
        }
    }
}

// =============================================================================
// Recall / precision
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RecallBreakdown {
    /// Benchmark rules found with identical antecedent and consequent.
    pub exact: usize,
    /// Benchmark rules not found exactly but covered by a current rule.
    pub partial: usize,
    pub benchmark: usize,
}

impl RecallBreakdown {
    pub fn recall(&self) -> f64 {
        ratio(self.exact + self.partial, self.benchmark)
    }
}

pub fn recall(benchmark: &[LabeledRule], current: &[LabeledRule]) -> RecallBreakdown {
    let mut breakdown = RecallBreakdown {
        benchmark: benchmark.len(),
        ..RecallBreakdown::default()
    };
    for expected in benchmark {
        if current.iter().any(|rule| rule.is_exactly(expected)) {
            breakdown.exact += 1;
        } else if current.iter().any(|rule| rule.covers(expected)) {
            breakdown.partial += 1;
        }
    }
    breakdown
}

/// Share of rules labeled correct or partially correct; 0 for no rules.
pub fn precision(current: &[LabeledRule]) -> f64 {
    let good = current.iter().filter(|r| r.label.is_correct_or_partial()).count();
    ratio(good, current.len())
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

// =============================================================================
// Report
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct StabilityReport {
    pub current_version: String,
    pub total_rules: usize,
    pub per_version: Vec<(String, VersionDelta)>,
    /// Current run against the union of every prior version.
    pub overall: VersionDelta,
    pub label_counts: BTreeMap<RuleLabel, usize>,
    pub precision: f64,
    pub recall: Option<RecallBreakdown>,
}

impl StabilityReport {
    pub fn compute(baseline: &StabilityBaseline, benchmark: Option<&[LabeledRule]>) -> Self {
        let current = baseline.current();

        let per_version: Vec<(String, VersionDelta)> = baseline
            .prior
            .iter()
            .map(|(version, rules)| (version.clone(), VersionDelta::compute(current, rules)))
            .collect();

        // Newest occurrence wins so misses carry the latest prior label.
        let mut union: BTreeMap<i64, &LabeledRule> = BTreeMap::new();
        for (_, rules) in &baseline.prior {
            for rule in rules {
                union.insert(rule.id, rule);
            }
        }
        let union: Vec<LabeledRule> = union.into_values().cloned().collect();
        let overall = VersionDelta::compute(current, &union);

        let mut label_counts = BTreeMap::new();
        for rule in current {
            *label_counts.entry(rule.label).or_insert(0) += 1;
        }

        let total_rules = current.iter().map(|r| r.id).collect::<BTreeSet<_>>().len();
        if total_rules != current.len() {
            warn!(
                version = %baseline.current_version,
                duplicates = current.len() - total_rules,
                "current rule file repeats rule ids"
            );
        }

        let report = Self {
            current_version: baseline.current_version.clone(),
            total_rules,
            per_version,
            overall,
            label_counts,
            precision: precision(current),
            recall: benchmark.map(|b| recall(b, current)),
        };
        info!(
            version = %report.current_version,
            rules = report.total_rules,
            hits = report.overall.hits.len(),
            new = report.overall.new.len(),
            misses = report.overall.misses.len(),
            precision = report.precision,
            "computed stability report"
        );
        report
    }
}
