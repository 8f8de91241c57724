//! Content identity of a rule.
//!
//! - algorithm: **FNV-1a 64-bit**
//! - input: sorted antecedent items, a separator, then the consequent items
//! - output: the hash reinterpreted as `i64` (the persisted `id` field)
//!
//! Confidence, label and version are not part of the input: the same
//! relationship found in two runs must get the same id.

use std::collections::BTreeSet;

const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x00000100000001b3;

/// Byte between items of one side.
const ITEM_SEP: u8 = 0x1f;
/// Byte between antecedent and consequent.
const SIDE_SEP: u8 = 0x1e;

pub fn rule_content_id<'a, A, C>(antecedent: A, consequent: C) -> i64
where
    A: IntoIterator<Item = &'a String>,
    C: IntoIterator<Item = &'a String>,
{
    // Sort through BTreeSet so iteration order of the caller never matters.
    let antecedent: BTreeSet<&String> = antecedent.into_iter().collect();
    let consequent: BTreeSet<&String> = consequent.into_iter().collect();

    let mut hash = FNV_OFFSET_BASIS;
    let mut add = |bytes: &[u8]| {
        for b in bytes {
            hash ^= *b as u64;
            hash = hash.wrapping_mul(FNV_PRIME);
        }
    };

    for item in antecedent {
        add(item.as_bytes());
        add(&[ITEM_SEP]);
    }
    add(&[SIDE_SEP]);
    for item in consequent {
        add(item.as_bytes());
        add(&[ITEM_SEP]);
    }

    hash as i64
}
