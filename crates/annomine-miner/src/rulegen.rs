//! Single-consequent association rules from frequent itemsets.

use std::collections::BTreeSet;

use ahash::AHashMap;
use tracing::debug;

use crate::error::RuleError;
use crate::frequent::FrequentItemset;
use crate::rule::AssociationRule;

/// Every `I \ {c} => c` with `support(I) / support(I \ {c}) >= min_confidence`.
///
/// Antecedent supports are looked up among `frequent` itself; with a complete
/// frequent-itemset list every antecedent is present by monotonicity.
pub fn generate_rules(
    frequent: &[FrequentItemset],
    min_confidence: f64,
) -> Result<Vec<AssociationRule>, RuleError> {
    let support: AHashMap<&BTreeSet<String>, u64> = frequent
        .iter()
        .map(|itemset| (&itemset.items, itemset.frequency))
        .collect();

    let mut rules = Vec::new();
    for itemset in frequent.iter().filter(|f| f.len() >= 2) {
        for consequent in &itemset.items {
            let mut antecedent = itemset.items.clone();
            antecedent.remove(consequent);

            let Some(&antecedent_support) = support.get(&antecedent) else {
                debug!(
                    itemset = ?itemset.items,
                    "antecedent missing from frequent itemsets; skipping rule"
                );
                continue;
            };
            if antecedent_support == 0 {
                continue;
            }

            let confidence = itemset.frequency as f64 / antecedent_support as f64;
            if confidence >= min_confidence {
                rules.push(AssociationRule::new(
                    antecedent,
                    consequent.clone(),
                    confidence.min(1.0),
                )?);
            }
        }
    }
    Ok(rules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fpgrowth::FpGrowth;
    use approx::assert_relative_eq;

    fn tx(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn confidence_is_support_ratio() {
        let mut transactions = vec![tx(&["a", "b"]); 8];
        transactions.extend(vec![tx(&["a"]); 2]);
        let frequent = FpGrowth::new(1).mine(&transactions);

        let rules = generate_rules(&frequent, 0.0).unwrap();
        assert_eq!(rules.len(), 2);

        let a_to_b = rules.iter().find(|r| r.consequent() == "b").unwrap();
        assert_relative_eq!(a_to_b.confidence(), 0.8);
        let b_to_a = rules.iter().find(|r| r.consequent() == "a").unwrap();
        assert_relative_eq!(b_to_a.confidence(), 1.0);
    }

    #[test]
    fn min_confidence_filters() {
        let mut transactions = vec![tx(&["a", "b"]); 8];
        transactions.extend(vec![tx(&["a"]); 2]);
        let frequent = FpGrowth::new(1).mine(&transactions);

        let rules = generate_rules(&frequent, 0.9).unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].consequent(), "a");
        assert!(rules.iter().all(|r| !r.antecedent().contains(r.consequent())));
    }
}
