//! Vertical transaction index: item -> bitmap of transaction ids.
//!
//! Used to recount the exact support of an itemset that a heuristic has
//! rewritten after mining, without re-running FP-Growth on the bucket.

use std::collections::BTreeSet;

use ahash::AHashMap;
use roaring::RoaringBitmap;

#[derive(Debug, Clone, Default)]
pub struct TransactionIndex {
    tids: AHashMap<String, RoaringBitmap>,
    transactions: u32,
}

impl TransactionIndex {
    pub fn build<'a, I>(transactions: I) -> Self
    where
        I: IntoIterator<Item = &'a BTreeSet<String>>,
    {
        let mut index = TransactionIndex::default();
        for (tid, transaction) in transactions.into_iter().enumerate() {
            for item in transaction {
                index
                    .tids
                    .entry(item.clone())
                    .or_default()
                    .insert(tid as u32);
            }
            index.transactions = tid as u32 + 1;
        }
        index
    }

    pub fn transaction_count(&self) -> u64 {
        u64::from(self.transactions)
    }

    /// Number of indexed transactions containing every item. The empty set is
    /// contained in every transaction.
    pub fn support<'a, I>(&self, items: I) -> u64
    where
        I: IntoIterator<Item = &'a String>,
    {
        let mut acc: Option<RoaringBitmap> = None;
        for item in items {
            let Some(bitmap) = self.tids.get(item.as_str()) else {
                return 0;
            };
            let next = match acc {
                None => bitmap.clone(),
                Some(mut current) => {
                    current &= bitmap;
                    current
                }
            };
            if next.is_empty() {
                return 0;
            }
            acc = Some(next);
        }
        acc.map_or(self.transaction_count(), |bitmap| bitmap.len())
    }
}
