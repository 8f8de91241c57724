//! Project usages -> per-sub-API transaction batches.
//!
//! ```text
//!   project -> [Itemset]
//!      │  toy-project keywords, minimum usages
//!      ▼
//!   unique itemsets per project (a convention repeated 50x in one project
//!      │                         counts once)
//!      ▼  sub-API regex over library items
//!   bucket "org.eclipse.microprofile.health" -> [Itemset], ...
//!      │  size gate, configured-prefix gate
//!      ▼
//!   [TransactionBatch]
//! ```

use std::collections::{BTreeMap, BTreeSet};

use ahash::AHashSet;
use annomine_aug::Itemset;
use regex::Regex;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::MinerConfig;
use crate::error::ConfigError;

/// Extracts sub-API keys (e.g. `org.eclipse.microprofile.health`) from items.
#[derive(Debug, Clone)]
pub struct SubApiRouter {
    pattern: Regex,
    library_prefix: String,
}

impl SubApiRouter {
    pub fn new(pattern: Regex, library_prefix: impl Into<String>) -> Self {
        Self {
            pattern,
            library_prefix: library_prefix.into(),
        }
    }

    pub fn from_config(config: &MinerConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(config.sub_api_regex()?, config.library_prefix.clone()))
    }

    /// Every sub-API key mentioned by an item of the target library.
    pub fn keys(&self, items: &BTreeSet<String>) -> BTreeSet<String> {
        items
            .iter()
            .filter(|item| item.contains(self.library_prefix.as_str()))
            .flat_map(|item| self.pattern.find_iter(item).map(|m| m.as_str().to_string()))
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct TransactionBatch {
    pub sub_api: String,
    pub transactions: Vec<Itemset>,
}

impl TransactionBatch {
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn item_sets(&self) -> impl Iterator<Item = &BTreeSet<String>> {
        self.transactions.iter().map(Itemset::items)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PreparationStats {
    pub projects_given: usize,
    /// Name matched a toy-project keyword.
    pub projects_excluded: usize,
    /// Fewer usages than `min_usages_per_project`.
    pub projects_skipped: usize,
    pub projects_used: usize,
    pub total_usages: usize,
    pub unique_usages: usize,
    /// Configured sub-API prefix -> number of used projects mentioning it.
    pub sub_api_project_frequency: BTreeMap<String, usize>,
    pub buckets_kept: usize,
    pub buckets_dropped: usize,
}

#[derive(Debug, Clone, Default)]
pub struct PreparedTransactions {
    /// Sorted by sub-API key.
    pub batches: Vec<TransactionBatch>,
    pub stats: PreparationStats,
}

pub fn prepare_transactions(
    usages: &BTreeMap<String, Vec<Itemset>>,
    config: &MinerConfig,
    router: &SubApiRouter,
) -> PreparedTransactions {
    let mut stats = PreparationStats {
        projects_given: usages.len(),
        ..PreparationStats::default()
    };

    let mut per_project: Vec<(&str, Vec<&Itemset>)> = Vec::new();
    for (project, itemsets) in usages {
        if config.is_excluded_project(project) {
            debug!(project = %project, "skipping toy project");
            stats.projects_excluded += 1;
            continue;
        }
        if itemsets.len() < config.min_usages_per_project {
            stats.projects_skipped += 1;
            continue;
        }

        let mut seen: AHashSet<&BTreeSet<String>> = AHashSet::new();
        let mut unique: Vec<&Itemset> = Vec::new();
        for itemset in itemsets {
            if seen.insert(itemset.items()) {
                unique.push(itemset);
            }
        }

        stats.total_usages += itemsets.len();
        stats.unique_usages += unique.len();
        per_project.push((project.as_str(), unique));
    }
    stats.projects_used = per_project.len();

    for prefix in &config.sub_api_prefixes {
        let projects = per_project
            .iter()
            .filter(|(_, itemsets)| itemsets.iter().any(|i| i.matches_any(prefix)))
            .count();
        stats
            .sub_api_project_frequency
            .insert(prefix.clone(), projects);
    }

    let mut buckets: BTreeMap<String, Vec<Itemset>> = BTreeMap::new();
    for itemset in per_project.iter().flat_map(|(_, itemsets)| itemsets.iter()) {
        for key in router.keys(itemset.items()) {
            buckets.entry(key).or_default().push((*itemset).clone());
        }
    }

    let mut batches = Vec::new();
    for (sub_api, transactions) in buckets {
        let configured = config
            .sub_api_prefixes
            .iter()
            .any(|prefix| sub_api.contains(prefix.as_str()));
        if transactions.len() < config.min_bucket_transactions || !configured {
            debug!(
                sub_api = %sub_api,
                transactions = transactions.len(),
                configured,
                "dropping sub-API bucket"
            );
            stats.buckets_dropped += 1;
            continue;
        }
        batches.push(TransactionBatch {
            sub_api,
            transactions,
        });
    }
    stats.buckets_kept = batches.len();

    info!(
        projects_used = stats.projects_used,
        projects_excluded = stats.projects_excluded,
        projects_skipped = stats.projects_skipped,
        unique_usages = stats.unique_usages,
        buckets = stats.buckets_kept,
        "prepared transactions"
    );

    PreparedTransactions { batches, stats }
}

#[cfg(test)]
mod tests {
    use super::*;
    use annomine_aug::Location;

    const HEALTH: &str = "Class --(annotatedWith)--> Annotation_org.eclipse.microprofile.health.Liveness";
    const METRIC: &str = "Method --(annotatedWith)--> Annotation_org.eclipse.microprofile.metrics.annotation.Counted";
    const INJECT: &str = "Field --(annotatedWith)--> Annotation_javax.inject.Inject";

    fn itemset(project: &str, items: &[&str]) -> Itemset {
        Itemset::from_items(items.iter().copied(), Location::new(project, "A.java", "A")).unwrap()
    }

    fn config(min_bucket: usize) -> MinerConfig {
        MinerConfig {
            min_bucket_transactions: min_bucket,
            ..MinerConfig::default()
        }
    }

    #[test]
    fn router_only_scans_library_items() {
        let config = MinerConfig::default();
        let router = SubApiRouter::from_config(&config).unwrap();
        let items: BTreeSet<String> = [HEALTH, METRIC, INJECT].iter().map(|s| s.to_string()).collect();

        let keys = router.keys(&items);
        let expected: BTreeSet<String> = [
            "org.eclipse.microprofile.health",
            "org.eclipse.microprofile.metrics",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        assert_eq!(keys, expected);
    }

    #[test]
    fn duplicates_within_a_project_count_once() {
        let config = config(1);
        let router = SubApiRouter::from_config(&config).unwrap();
        let mut usages = BTreeMap::new();
        usages.insert(
            "acme/orders".to_string(),
            vec![itemset("acme/orders", &[HEALTH]); 50],
        );
        usages.insert("acme/billing".to_string(), vec![itemset("acme/billing", &[HEALTH])]);

        let prepared = prepare_transactions(&usages, &config, &router);
        assert_eq!(prepared.stats.total_usages, 51);
        assert_eq!(prepared.stats.unique_usages, 2);
        assert_eq!(prepared.batches.len(), 1);
        assert_eq!(prepared.batches[0].len(), 2);
    }

    #[test]
    fn transactions_are_routed_to_every_matching_bucket() {
        let config = config(1);
        let router = SubApiRouter::from_config(&config).unwrap();
        let mut usages = BTreeMap::new();
        usages.insert(
            "acme/svc".to_string(),
            vec![itemset("acme/svc", &[HEALTH, METRIC])],
        );

        let prepared = prepare_transactions(&usages, &config, &router);
        let keys: Vec<&str> = prepared.batches.iter().map(|b| b.sub_api.as_str()).collect();
        assert_eq!(
            keys,
            vec!["org.eclipse.microprofile.health", "org.eclipse.microprofile.metrics"]
        );
        assert_eq!(
            prepared.stats.sub_api_project_frequency["org.eclipse.microprofile.health"],
            1
        );
        assert_eq!(
            prepared.stats.sub_api_project_frequency["org.eclipse.microprofile.jwt"],
            0
        );
    }

    #[test]
    fn small_and_unconfigured_buckets_are_dropped() {
        let config = MinerConfig {
            sub_api_prefixes: vec!["org.eclipse.microprofile.health".to_string()],
            ..config(3)
        };
        let router = SubApiRouter::from_config(&config).unwrap();
        let mut usages = BTreeMap::new();
        for p in 0..3 {
            let name = format!("acme/p{p}");
            usages.insert(name.clone(), vec![itemset(&name, &[HEALTH, METRIC])]);
        }
        usages.insert("acme/p9".to_string(), vec![itemset("acme/p9", &[INJECT, METRIC])]);

        let prepared = prepare_transactions(&usages, &config, &router);
        // metrics has 4 transactions but is not configured.
        assert_eq!(prepared.batches.len(), 1);
        assert_eq!(prepared.batches[0].sub_api, "org.eclipse.microprofile.health");
        assert_eq!(prepared.stats.buckets_dropped, 1);
    }

    #[test]
    fn toy_and_tiny_projects_are_skipped() {
        let config = MinerConfig {
            min_usages_per_project: 2,
            ..config(1)
        };
        let router = SubApiRouter::from_config(&config).unwrap();
        let mut usages = BTreeMap::new();
        usages.insert(
            "someone/microprofile-demo".to_string(),
            vec![itemset("d", &[HEALTH]), itemset("d", &[METRIC])],
        );
        usages.insert("acme/tiny".to_string(), vec![itemset("t", &[HEALTH])]);
        usages.insert(
            "acme/real".to_string(),
            vec![itemset("r", &[HEALTH]), itemset("r", &[METRIC])],
        );

        let prepared = prepare_transactions(&usages, &config, &router);
        assert_eq!(prepared.stats.projects_excluded, 1);
        assert_eq!(prepared.stats.projects_skipped, 1);
        assert_eq!(prepared.stats.projects_used, 1);
        assert_eq!(prepared.stats.unique_usages, 2);
    }
}
