use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::label::RuleLabel;

/// An item set with its absolute support count.
///
/// Mined itemsets aggregate many transactions, so there is no single source
/// location to carry; only the items and the count survive mining.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequentItemset {
    pub items: BTreeSet<String>,
    pub frequency: u64,
    #[serde(default)]
    pub label: RuleLabel,
    #[serde(default)]
    pub version: String,
}

impl FrequentItemset {
    pub fn new(items: BTreeSet<String>, frequency: u64) -> Self {
        Self {
            items,
            frequency,
            label: RuleLabel::Unknown,
            version: String::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_subset_of(&self, other: &FrequentItemset) -> bool {
        self.items.is_subset(&other.items)
    }

    pub fn matches_any(&self, needle: &str) -> bool {
        self.items.iter().any(|item| item.contains(needle))
    }
}
