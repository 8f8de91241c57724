//! Exact frequent-itemset mining (FP-Growth).
//!
//! ```text
//!   transactions ──count──► item ranks (support desc, label asc)
//!        │
//!        └──insert ranked paths──► FP-tree ──per header item──► conditional
//!                                     │                         pattern base
//!                                     └── rayon: one task per top-level item
//! ```
//!
//! Items are interned to `u32` ranks before the tree is built so the tree and
//! its conditional copies never clone strings. Every itemset whose absolute
//! support reaches `min_support` is reported exactly once with its exact
//! count; nothing is sampled.

use std::collections::{BTreeMap, BTreeSet};

use ahash::AHashMap;
use rayon::prelude::*;

use crate::frequent::FrequentItemset;

const ROOT: usize = 0;

#[derive(Debug, Clone, Copy)]
pub struct FpGrowth {
    min_support: u64,
}

impl FpGrowth {
    /// A zero threshold would report every subset of every transaction as
    /// "frequent" with support 0; it is clamped to 1.
    pub fn new(min_support: u64) -> Self {
        Self {
            min_support: min_support.max(1),
        }
    }

    pub fn min_support(&self) -> u64 {
        self.min_support
    }

    pub fn mine<'a, I>(&self, transactions: I) -> Vec<FrequentItemset>
    where
        I: IntoIterator<Item = &'a BTreeSet<String>>,
    {
        let transactions: Vec<&BTreeSet<String>> = transactions.into_iter().collect();

        let mut counts: AHashMap<&str, u64> = AHashMap::new();
        for transaction in &transactions {
            for item in transaction.iter() {
                *counts.entry(item.as_str()).or_insert(0) += 1;
            }
        }

        let mut ranked: Vec<(&str, u64)> = counts
            .into_iter()
            .filter(|(_, count)| *count >= self.min_support)
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

        let labels: Vec<&str> = ranked.iter().map(|(label, _)| *label).collect();
        let rank: AHashMap<&str, u32> = labels
            .iter()
            .enumerate()
            .map(|(idx, label)| (*label, idx as u32))
            .collect();

        let paths: Vec<(Vec<u32>, u64)> = transactions
            .iter()
            .filter_map(|transaction| {
                let mut ids: Vec<u32> = transaction
                    .iter()
                    .filter_map(|item| rank.get(item.as_str()).copied())
                    .collect();
                if ids.is_empty() {
                    return None;
                }
                ids.sort_unstable();
                Some((ids, 1))
            })
            .collect();

        let tree = FpTree::build(&paths, self.min_support);
        let top_level: Vec<u32> = tree.header.keys().copied().collect();

        let patterns: Vec<(Vec<u32>, u64)> = top_level
            .par_iter()
            .flat_map_iter(|&item| {
                let mut out = Vec::new();
                tree.mine_item(item, &[], self.min_support, &mut out);
                out
            })
            .collect();

        let mut result: Vec<FrequentItemset> = patterns
            .into_iter()
            .map(|(ids, support)| {
                let items = ids
                    .iter()
                    .map(|id| labels[*id as usize].to_string())
                    .collect();
                FrequentItemset::new(items, support)
            })
            .collect();
        result.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.items.cmp(&b.items)));
        result
    }
}

// =============================================================================
// FP-tree
// =============================================================================

#[derive(Debug)]
struct FpNode {
    item: u32,
    count: u64,
    parent: usize,
    children: Vec<(u32, usize)>,
}

#[derive(Debug, Default)]
struct HeaderEntry {
    support: u64,
    nodes: Vec<usize>,
}

#[derive(Debug)]
struct FpTree {
    nodes: Vec<FpNode>,
    header: BTreeMap<u32, HeaderEntry>,
}

impl FpTree {
    /// Build from weighted paths whose ids are already in ascending rank order.
    /// Items below `min_support` within these paths are dropped.
    fn build(paths: &[(Vec<u32>, u64)], min_support: u64) -> Self {
        let mut support: AHashMap<u32, u64> = AHashMap::new();
        for (path, weight) in paths {
            for item in path {
                *support.entry(*item).or_insert(0) += weight;
            }
        }

        let mut tree = FpTree {
            nodes: vec![FpNode {
                item: u32::MAX,
                count: 0,
                parent: ROOT,
                children: Vec::new(),
            }],
            header: BTreeMap::new(),
        };

        for (path, weight) in paths {
            let mut current = ROOT;
            for item in path {
                if support.get(item).copied().unwrap_or(0) < min_support {
                    continue;
                }
                current = tree.child_or_insert(current, *item);
                tree.nodes[current].count += weight;
                if let Some(entry) = tree.header.get_mut(item) {
                    entry.support += weight;
                }
            }
        }
        tree
    }

    fn child_or_insert(&mut self, parent: usize, item: u32) -> usize {
        if let Some(&(_, idx)) = self.nodes[parent]
            .children
            .iter()
            .find(|(child, _)| *child == item)
        {
            return idx;
        }
        let idx = self.nodes.len();
        self.nodes.push(FpNode {
            item,
            count: 0,
            parent,
            children: Vec::new(),
        });
        self.nodes[parent].children.push((item, idx));
        self.header.entry(item).or_default().nodes.push(idx);
        idx
    }

    fn prefix_path(&self, node: usize) -> Vec<u32> {
        let mut path = Vec::new();
        let mut current = self.nodes[node].parent;
        while current != ROOT {
            path.push(self.nodes[current].item);
            current = self.nodes[current].parent;
        }
        path.reverse();
        path
    }

    fn mine_item(&self, item: u32, suffix: &[u32], min_support: u64, out: &mut Vec<(Vec<u32>, u64)>) {
        let Some(entry) = self.header.get(&item) else {
            return;
        };
        if entry.support < min_support {
            return;
        }

        let mut pattern = Vec::with_capacity(suffix.len() + 1);
        pattern.push(item);
        pattern.extend_from_slice(suffix);
        out.push((pattern.clone(), entry.support));

        let base: Vec<(Vec<u32>, u64)> = entry
            .nodes
            .iter()
            .filter_map(|&node| {
                let path = self.prefix_path(node);
                (!path.is_empty()).then(|| (path, self.nodes[node].count))
            })
            .collect();
        if base.is_empty() {
            return;
        }

        let conditional = FpTree::build(&base, min_support);
        for next in conditional.header.keys() {
            conditional.mine_item(*next, &pattern, min_support, out);
        }
    }
}
