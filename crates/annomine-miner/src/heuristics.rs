//! Post-processing that turns raw statistical output into convention
//! candidates.
//!
//! The pipeline applies these in a fixed order:
//!
//! 1. target-prefix filter ([`contains_target_prefix`])
//! 2. semantic validity ([`is_itemset_semantically_ok`], and
//!    [`is_rule_semantically_ok`] for rules)
//! 3. required-parameter pruning ([`strip_required_params`])
//! 4. size floor
//! 5. maximal-itemset reduction ([`maximal_itemsets`])
//! 6. one rule per itemset ([`one_rule_per_itemset`])
//!
//! Everything here works on the rendered item strings, so the relation names
//! and node prefixes come from `annomine_aug::label`.

use std::collections::BTreeSet;

use ahash::AHashMap;
use annomine_aug::label::{
    relation_marker, ANNOTATION_PREFIX, CLASS_LABEL, CONSTRUCTOR_LABEL, FIELD_LABEL,
    INTERFACE_LABEL, METHOD_LABEL, PARAM_PREFIX, REL_ANNOTATED_WITH, REL_DECLARED_IN_BEANS,
    REL_DEFINED_IN, REL_EXTENDS, REL_HAS_PARAM, REL_HAS_RETURN_TYPE, REL_HAS_TYPE,
    REL_IMPLEMENTS,
};

use crate::annotations::RequiredParamIndex;
use crate::error::RuleError;
use crate::frequent::FrequentItemset;
use crate::rule::{AssociationRule, SYNTHESIZED_CONFIDENCE};

/// Consequent preference for synthesized rules, highest first.
const PRIORITY_CONSEQUENT_RELATIONS: [&str; 3] =
    [REL_HAS_PARAM, REL_DEFINED_IN, REL_DECLARED_IN_BEANS];

const CLASS_LEVEL_RELATIONS: [&str; 4] =
    [REL_HAS_TYPE, REL_HAS_RETURN_TYPE, REL_EXTENDS, REL_IMPLEMENTS];

fn has_relation(item: &str, relation: &str) -> bool {
    item.contains(&relation_marker(relation))
}

// =============================================================================
// Relevance
// =============================================================================

pub fn contains_target_prefix(itemset: &FrequentItemset, prefixes: &[String]) -> bool {
    prefixes.iter().any(|prefix| itemset.matches_any(prefix))
}

pub fn mentions_sub_api(itemset: &FrequentItemset, sub_api: &str) -> bool {
    itemset.matches_any(sub_api)
}

// =============================================================================
// Semantic validity
// =============================================================================

/// For `Annotation_X --(hasParam)--> ...` returns `Annotation_X`.
fn parameterized_annotation(item: &str) -> Option<&str> {
    if !item.starts_with(ANNOTATION_PREFIX) || !has_relation(item, REL_HAS_PARAM) {
        return None;
    }
    item.split_once(' ').map(|(annotation, _)| annotation)
}

fn declares_annotation<'a>(
    mut items: impl Iterator<Item = &'a String>,
    annotation_label: &str,
) -> bool {
    let suffix = format!("{} {annotation_label}", relation_marker(REL_ANNOTATED_WITH));
    items.any(|item| item.ends_with(&suffix))
}

/// A parameter of annotation X is only meaningful next to an
/// `annotatedWith X` fact in the same set.
pub fn is_itemset_semantically_ok(items: &BTreeSet<String>) -> bool {
    items.iter().all(|item| match parameterized_annotation(item) {
        Some(annotation) => declares_annotation(items.iter(), annotation),
        None => true,
    })
}

/// The itemset check restricted to the antecedent. Config and beans
/// relations hold by construction and must never be on the if-side.
pub fn is_rule_semantically_ok(rule: &AssociationRule) -> bool {
    let antecedent = rule.antecedent();
    antecedent.iter().all(|item| {
        if has_relation(item, REL_DEFINED_IN) || has_relation(item, REL_DECLARED_IN_BEANS) {
            return false;
        }
        match parameterized_annotation(item) {
            Some(annotation) => declares_annotation(antecedent.iter(), annotation),
            None => true,
        }
    })
}

// =============================================================================
// Required parameters
// =============================================================================

/// `Annotation_<fqn> --(hasParam)--> Param_<name>:<type>` -> `(fqn, name)`.
fn annotation_param(item: &str) -> Option<(&str, &str)> {
    let rest = item.strip_prefix(ANNOTATION_PREFIX)?;
    let (annotation, relation) = rest.split_once(' ')?;
    let target = relation
        .strip_prefix(relation_marker(REL_HAS_PARAM).as_str())?
        .trim_start();
    let param = target.strip_prefix(PARAM_PREFIX)?;
    let name = param.split_once(':').map_or(param, |(name, _)| name);
    Some((annotation, name))
}

/// Removes `hasParam` items that name a mandatory parameter. Returns how many
/// items were removed; the caller drops the set if it became empty.
pub fn strip_required_params(items: &mut BTreeSet<String>, required: &RequiredParamIndex) -> usize {
    let before = items.len();
    items.retain(|item| match annotation_param(item) {
        Some((annotation, param)) => !required.is_required(annotation, param),
        None => true,
    });
    before - items.len()
}

// =============================================================================
// Maximal itemsets
// =============================================================================

/// Keeps only itemsets that are not a subset of another one.
///
/// Candidates are visited largest first, so any strict superset has already
/// been kept when a subset is examined. Equal item sets collapse to the one
/// with the highest frequency. Applying this twice is the same as once.
pub fn maximal_itemsets(mut itemsets: Vec<FrequentItemset>) -> Vec<FrequentItemset> {
    itemsets.sort_by(|a, b| {
        b.len()
            .cmp(&a.len())
            .then_with(|| b.frequency.cmp(&a.frequency))
            .then_with(|| a.items.cmp(&b.items))
    });

    let mut kept: Vec<FrequentItemset> = Vec::with_capacity(itemsets.len());
    for candidate in itemsets {
        if !kept.iter().any(|k| candidate.is_subset_of(k)) {
            kept.push(candidate);
        }
    }
    kept
}

// =============================================================================
// One rule per itemset
// =============================================================================

/// Consequent for a synthesized rule:
///
/// 1. the first `hasParam`, else `definedIn`, else `declaredInBeans` item,
/// 2. the first item with a type-level relation (`hasType`, `hasReturnType`,
///    `extends`, `implements`),
/// 3. a class-level `annotatedWith` when a member-level one is also present,
/// 4. the first item.
pub fn choose_consequent(items: &BTreeSet<String>) -> Option<&String> {
    for relation in PRIORITY_CONSEQUENT_RELATIONS {
        if let Some(item) = items.iter().find(|item| has_relation(item, relation)) {
            return Some(item);
        }
    }

    if let Some(item) = items
        .iter()
        .find(|item| CLASS_LEVEL_RELATIONS.iter().any(|rel| has_relation(item, rel)))
    {
        return Some(item);
    }

    let annotated = |item: &&String| has_relation(item, REL_ANNOTATED_WITH);
    let class_level = items
        .iter()
        .filter(annotated)
        .find(|item| item.starts_with(CLASS_LABEL) || item.starts_with(INTERFACE_LABEL));
    let member_level = items.iter().filter(annotated).any(|item| {
        [FIELD_LABEL, METHOD_LABEL, CONSTRUCTOR_LABEL, PARAM_PREFIX]
            .iter()
            .any(|prefix| item.starts_with(prefix))
    });
    if let (Some(item), true) = (class_level, member_level) {
        return Some(item);
    }

    items.iter().next()
}

/// Build a rule for `items` with the consequent from [`choose_consequent`].
pub fn synthesize_rule(items: &BTreeSet<String>) -> Result<AssociationRule, RuleError> {
    let mut antecedent = items.clone();
    let Some(placeholder) = antecedent.pop_last() else {
        return Err(RuleError::EmptyAntecedent);
    };
    let mut rule = AssociationRule::new(antecedent, placeholder, SYNTHESIZED_CONFIDENCE)?;

    if let Some(chosen) = choose_consequent(items) {
        if chosen != rule.consequent() {
            rule.move_to_consequent(chosen)?;
        }
    }
    Ok(rule)
}

/// Exactly one rule for each itemset: the most confident semantically valid
/// mined rule over the same items, else a synthesized one.
pub fn one_rule_per_itemset(
    itemsets: &[FrequentItemset],
    rules: &[AssociationRule],
) -> Result<Vec<AssociationRule>, RuleError> {
    let mut best: AHashMap<BTreeSet<String>, &AssociationRule> = AHashMap::new();
    for rule in rules.iter().filter(|r| is_rule_semantically_ok(r)) {
        let slot = best.entry(rule.all_items()).or_insert(rule);
        if rule.confidence() > slot.confidence() {
            *slot = rule;
        }
    }

    itemsets
        .iter()
        .map(|itemset| {
            let rule = match best.get(&itemset.items) {
                Some(rule) => (*rule).clone(),
                None => synthesize_rule(&itemset.items)?,
            };
            if rule.antecedent().len() + 1 != itemset.len() {
                return Err(RuleError::SizeMismatch {
                    itemset: itemset.len(),
                    antecedent: rule.antecedent().len(),
                });
            }
            Ok(rule)
        })
        .collect()
}
