//! End-to-end mining run.
//!
//! ```text
//!   project -> [Itemset]
//!        │ prepare_transactions
//!        ▼
//!   [TransactionBatch] ──rayon──► per bucket: FP-Growth, rules, sub-API filter
//!        │ merge
//!        ▼
//!   target prefix ► semantics ► required params (+ recount) ► size >= 2
//!        ► maximal ► one rule per itemset ► version stamp
//! ```
//!
//! Buckets share nothing but the read-only config, so they are mined in
//! parallel; everything after the merge is sequential and deterministic.

use std::collections::BTreeMap;

use annomine_aug::Itemset;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::annotations::RequiredParamIndex;
use crate::config::MinerConfig;
use crate::error::{MinerError, RuleError};
use crate::fpgrowth::FpGrowth;
use crate::frequent::FrequentItemset;
use crate::heuristics::{
    contains_target_prefix, is_itemset_semantically_ok, maximal_itemsets, mentions_sub_api,
    one_rule_per_itemset, strip_required_params,
};
use crate::rule::AssociationRule;
use crate::rulegen::generate_rules;
use crate::tidlist::TransactionIndex;
use crate::transactions::{prepare_transactions, PreparationStats, SubApiRouter, TransactionBatch};

/// Stage counters of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MiningSummary {
    pub projects_given: usize,
    pub projects_used: usize,
    pub projects_skipped: usize,
    pub total_usages: usize,
    pub unique_usages: usize,
    pub buckets_mined: usize,
    pub frequent_raw: usize,
    pub frequent_in_sub_api: usize,
    pub after_target_prefix: usize,
    pub after_semantics: usize,
    pub after_required_params: usize,
    pub after_size_floor: usize,
    pub maximal: usize,
    pub candidate_rules: usize,
    pub final_rules: usize,
    pub synthesized_rules: usize,
}

impl MiningSummary {
    pub fn log(&self) {
        info!(
            projects_used = self.projects_used,
            projects_given = self.projects_given,
            unique_usages = self.unique_usages,
            buckets = self.buckets_mined,
            "mining input"
        );
        info!(
            raw = self.frequent_raw,
            in_sub_api = self.frequent_in_sub_api,
            target_prefix = self.after_target_prefix,
            semantics = self.after_semantics,
            required_params = self.after_required_params,
            size_floor = self.after_size_floor,
            maximal = self.maximal,
            "frequent itemsets per stage"
        );
        info!(
            candidates = self.candidate_rules,
            rules = self.final_rules,
            synthesized = self.synthesized_rules,
            "association rules"
        );
    }
}

#[derive(Debug, Clone)]
pub struct MiningOutcome {
    /// The maximal itemsets, one per rule, in the same order as `rules`.
    pub itemsets: Vec<FrequentItemset>,
    pub rules: Vec<AssociationRule>,
    pub preparation: PreparationStats,
    pub summary: MiningSummary,
}

struct BucketResult {
    sub_api: String,
    raw: usize,
    frequent: Vec<FrequentItemset>,
    rules: Vec<AssociationRule>,
    index: TransactionIndex,
}

pub struct Miner {
    config: MinerConfig,
    required: RequiredParamIndex,
    router: SubApiRouter,
}

impl Miner {
    pub fn new(config: MinerConfig, required: RequiredParamIndex) -> Result<Self, MinerError> {
        config.validate()?;
        let router = SubApiRouter::from_config(&config)?;
        Ok(Self {
            config,
            required,
            router,
        })
    }

    pub fn config(&self) -> &MinerConfig {
        &self.config
    }

    pub fn run(&self, usages: &BTreeMap<String, Vec<Itemset>>) -> Result<MiningOutcome, MinerError> {
        let prepared = prepare_transactions(usages, &self.config, &self.router);

        let buckets: Vec<BucketResult> = prepared
            .batches
            .par_iter()
            .map(|batch| self.mine_bucket(batch))
            .collect::<Result<_, RuleError>>()?;

        let mut summary = MiningSummary {
            projects_given: prepared.stats.projects_given,
            projects_used: prepared.stats.projects_used,
            projects_skipped: prepared.stats.projects_skipped + prepared.stats.projects_excluded,
            total_usages: prepared.stats.total_usages,
            unique_usages: prepared.stats.unique_usages,
            buckets_mined: buckets.len(),
            ..MiningSummary::default()
        };

        let mut candidates: Vec<(FrequentItemset, usize)> = Vec::new();
        let mut all_rules: Vec<AssociationRule> = Vec::new();
        for (idx, bucket) in buckets.iter().enumerate() {
            debug!(sub_api = %bucket.sub_api, relevant = bucket.frequent.len(), "merging bucket");
            summary.frequent_raw += bucket.raw;
            candidates.extend(bucket.frequent.iter().cloned().map(|f| (f, idx)));
            all_rules.extend(bucket.rules.iter().cloned());
        }
        summary.frequent_in_sub_api = candidates.len();
        summary.candidate_rules = all_rules.len();

        candidates.retain(|(f, _)| contains_target_prefix(f, &self.config.target_prefixes));
        summary.after_target_prefix = candidates.len();

        candidates.retain(|(f, _)| is_itemset_semantically_ok(&f.items));
        summary.after_semantics = candidates.len();

        let mut pruned = Vec::with_capacity(candidates.len());
        for (mut itemset, idx) in candidates {
            if strip_required_params(&mut itemset.items, &self.required) > 0 {
                if itemset.is_empty() {
                    continue;
                }
                itemset.frequency = buckets[idx].index.support(&itemset.items);
            }
            pruned.push(itemset);
        }
        summary.after_required_params = pruned.len();

        pruned.retain(|f| f.len() >= 2);
        summary.after_size_floor = pruned.len();

        let mut itemsets = maximal_itemsets(pruned);
        summary.maximal = itemsets.len();

        let mut rules = one_rule_per_itemset(&itemsets, &all_rules)?;
        for rule in &mut rules {
            rule.set_version(self.config.version.clone());
        }
        for itemset in &mut itemsets {
            itemset.version = self.config.version.clone();
        }
        summary.final_rules = rules.len();
        summary.synthesized_rules = rules.iter().filter(|r| r.is_synthesized()).count();

        Ok(MiningOutcome {
            itemsets,
            rules,
            preparation: prepared.stats,
            summary,
        })
    }

    fn mine_bucket(&self, batch: &TransactionBatch) -> Result<BucketResult, RuleError> {
        let frequent = FpGrowth::new(self.config.min_support).mine(batch.item_sets());
        let rules = generate_rules(&frequent, self.config.min_confidence)?;
        let raw = frequent.len();

        let frequent: Vec<FrequentItemset> = frequent
            .into_iter()
            .filter(|f| mentions_sub_api(f, &batch.sub_api))
            .collect();

        debug!(
            sub_api = %batch.sub_api,
            transactions = batch.len(),
            frequent = raw,
            relevant = frequent.len(),
            rules = rules.len(),
            "mined bucket"
        );

        Ok(BucketResult {
            sub_api: batch.sub_api.clone(),
            raw,
            frequent,
            rules,
            index: TransactionIndex::build(batch.item_sets()),
        })
    }
}
