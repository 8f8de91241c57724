use std::collections::{BTreeMap, BTreeSet};

use annomine_aug::{Itemset, Location};
use annomine_miner::{AnnotationDecl, Miner, MinerConfig, RequiredParam, RequiredParamIndex};
use approx::assert_relative_eq;

const CONFIG_PROPERTY: &str =
    "Field --(annotatedWith)--> Annotation_org.eclipse.microprofile.config.inject.ConfigProperty";
const INJECT: &str = "Field --(annotatedWith)--> Annotation_javax.inject.Inject";
const STRING_TYPE: &str = "Field --(hasType)--> java.lang.String";

const FALLBACK_VALUE: &str =
    "Annotation_org.eclipse.microprofile.faulttolerance.Fallback --(hasParam)--> Param_value:java.lang.Class";
const FALLBACK: &str =
    "Method --(annotatedWith)--> Annotation_org.eclipse.microprofile.faulttolerance.Fallback";
const RETURNS_RESPONSE: &str = "Method --(hasReturnType)--> javax.ws.rs.core.Response";

const LIVENESS: &str = "Class --(annotatedWith)--> Annotation_org.eclipse.microprofile.health.Liveness";
const HEALTH_CHECK: &str =
    "Class --(implements)--> Interface_org.eclipse.microprofile.health.HealthCheck";

fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// One project per usage so per-project dedup keeps every transaction.
fn corpus(groups: &[(&[&str], usize)]) -> BTreeMap<String, Vec<Itemset>> {
    let mut usages = BTreeMap::new();
    let mut n = 0;
    for (items, count) in groups {
        for _ in 0..*count {
            let project = format!("acme/service-{n}");
            let itemset = Itemset::from_items(
                items.iter().copied(),
                Location::new(&project, "Resource.java", "Resource"),
            )
            .unwrap();
            usages.insert(project, vec![itemset]);
            n += 1;
        }
    }
    usages
}

fn miner(config: MinerConfig) -> Miner {
    Miner::new(config, RequiredParamIndex::empty()).unwrap()
}

#[test]
fn nested_transactions_reduce_to_the_largest_pattern() {
    let usages = corpus(&[
        (&[CONFIG_PROPERTY, INJECT, STRING_TYPE], 12),
        (&[CONFIG_PROPERTY, INJECT], 5),
    ]);

    let outcome = miner(MinerConfig::default()).run(&usages).unwrap();

    // {A},{B},{C},{A,B},{A,C},{B,C},{A,B,C}
    assert_eq!(outcome.summary.frequent_raw, 7);
    // Only itemsets mentioning the config sub-API survive the bucket filter.
    assert_eq!(outcome.summary.frequent_in_sub_api, 4);
    assert_eq!(outcome.summary.after_size_floor, 3);

    assert_eq!(outcome.itemsets.len(), 1);
    assert_eq!(outcome.itemsets[0].items, set(&[CONFIG_PROPERTY, INJECT, STRING_TYPE]));
    assert_eq!(outcome.itemsets[0].frequency, 12);
    assert_eq!(outcome.itemsets[0].version, "v0.0.10");

    assert_eq!(outcome.rules.len(), 1);
    let rule = &outcome.rules[0];
    assert!(!rule.is_synthesized());
    assert_relative_eq!(rule.confidence(), 1.0);
    assert_eq!(rule.all_items(), outcome.itemsets[0].items);
    assert_eq!(rule.version(), "v0.0.10");
}

#[test]
fn required_parameters_are_pruned_and_recounted() {
    let usages = corpus(&[
        (&[FALLBACK_VALUE, FALLBACK, RETURNS_RESPONSE], 12),
        (&[FALLBACK, RETURNS_RESPONSE], 3),
    ]);
    let required = RequiredParamIndex::from_decls([AnnotationDecl {
        name: "org.eclipse.microprofile.faulttolerance.Fallback".to_string(),
        is_qualifier: false,
        target: vec!["METHOD".to_string()],
        required_params: vec![RequiredParam {
            name: "value".to_string(),
            type_name: "java.lang.Class".to_string(),
        }],
    }]);

    let outcome = Miner::new(MinerConfig::default(), required)
        .unwrap()
        .run(&usages)
        .unwrap();

    assert_eq!(outcome.itemsets.len(), 1);
    assert_eq!(outcome.itemsets[0].items, set(&[FALLBACK, RETURNS_RESPONSE]));
    // Recounted against the whole bucket, not the stale 12.
    assert_eq!(outcome.itemsets[0].frequency, 15);
    assert!(outcome
        .rules
        .iter()
        .all(|r| !r.all_items().contains(FALLBACK_VALUE)));
}

#[test]
fn without_metadata_parameter_facts_are_kept() {
    let usages = corpus(&[(&[FALLBACK_VALUE, FALLBACK, RETURNS_RESPONSE], 12)]);
    let outcome = miner(MinerConfig::default()).run(&usages).unwrap();

    assert_eq!(outcome.itemsets.len(), 1);
    assert_eq!(outcome.itemsets[0].len(), 3);
    // {P,R} => M has a dangling parameter in its antecedent; {M,R} => P is
    // the first valid rule at full confidence.
    assert_eq!(outcome.rules[0].consequent(), FALLBACK_VALUE);
}

#[test]
fn low_confidence_itemsets_get_a_synthesized_rule() {
    let usages = corpus(&[
        (&[LIVENESS, HEALTH_CHECK], 10),
        (&[LIVENESS], 3),
        (&[HEALTH_CHECK], 3),
    ]);
    let config = MinerConfig {
        min_confidence: 0.95,
        ..MinerConfig::default()
    };

    let outcome = miner(config).run(&usages).unwrap();

    assert_eq!(outcome.summary.candidate_rules, 0);
    assert_eq!(outcome.rules.len(), 1);
    let rule = &outcome.rules[0];
    assert!(rule.is_synthesized());
    assert_eq!(rule.consequent(), HEALTH_CHECK);
    assert_eq!(rule.antecedent(), &set(&[LIVENESS]));
    assert_eq!(outcome.summary.synthesized_rules, 1);
}

#[test]
fn small_buckets_and_toy_projects_yield_nothing() {
    let mut usages = corpus(&[(&[LIVENESS, HEALTH_CHECK], 9)]);
    usages.insert(
        "someone/health-demo".to_string(),
        vec![Itemset::from_items([LIVENESS, HEALTH_CHECK], Location::default()).unwrap()],
    );

    let outcome = miner(MinerConfig::default()).run(&usages).unwrap();

    assert_eq!(outcome.preparation.projects_excluded, 1);
    assert_eq!(outcome.preparation.buckets_dropped, 1);
    assert_eq!(outcome.summary.buckets_mined, 0);
    assert!(outcome.rules.is_empty());
}

#[test]
fn invalid_config_is_rejected_up_front() {
    let config = MinerConfig {
        min_confidence: -0.1,
        ..MinerConfig::default()
    };
    assert!(Miner::new(config, RequiredParamIndex::empty()).is_err());
}
