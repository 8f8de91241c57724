//! Post-mining auto-labeler.
//!
//! A mined rule that still carries `unknown`, has more than two items and
//! contains every item of a known correct two-item convention is a larger
//! variant of that convention, so it gets `part. correct`.

use std::collections::BTreeSet;

use annomine_miner::RuleLabel;
use tracing::info;

use crate::labeled::LabeledRule;

const KNOWN_CORRECT_PAIRS: [[&str; 2]; 18] = [
    [
        "Method --(annotatedWith)--> Annotation_org.eclipse.microprofile.openapi.annotations.Operation",
        "Method --(hasReturnType)--> javax.ws.rs.core.Response",
    ],
    [
        "Method --(annotatedWith)--> Annotation_org.eclipse.microprofile.openapi.annotations.Operation",
        "Class --(annotatedWith)--> Annotation_javax.ws.rs.Path",
    ],
    [
        "Field --(hasType)--> org.eclipse.microprofile.jwt.JsonWebToken",
        "Field --(annotatedWith)--> Annotation_javax.inject.Inject",
    ],
    [
        "Field --(annotatedWith)--> Annotation_org.eclipse.microprofile.jwt.Claim",
        "Field --(annotatedWith)--> Annotation_javax.inject.Inject",
    ],
    [
        "Method --(annotatedWith)--> Annotation_javax.ws.rs.Path",
        "Method --(annotatedWith)--> Annotation_javax.ws.rs.Consumes",
    ],
    [
        "Field --(annotatedWith)--> Annotation_org.eclipse.microprofile.config.inject.ConfigProperty",
        "Field --(annotatedWith)--> Annotation_javax.inject.Inject",
    ],
    [
        "Class --(annotatedWith)--> Annotation_org.eclipse.microprofile.graphql.GraphQLApi",
        "Method --(annotatedWith)--> Annotation_org.eclipse.microprofile.graphql.Query",
    ],
    [
        "Class --(annotatedWith)--> Annotation_org.eclipse.microprofile.faulttolerance.Asynchronous",
        "Method --(hasReturnType)--> java.util.concurrent.CompletionStage",
    ],
    [
        "Method --(annotatedWith)--> Annotation_org.eclipse.microprofile.faulttolerance.Fallback",
        "Annotation_org.eclipse.microprofile.faulttolerance.Fallback --(hasParam)--> Param_fallbackMethod:java.lang.String",
    ],
    [
        "Method --(annotatedWith)--> Annotation_org.eclipse.microprofile.reactive.messaging.Incoming",
        "Class --(annotatedWith)--> Annotation_javax.enterprise.context.ApplicationScoped",
    ],
    [
        "Method --(annotatedWith)--> Annotation_org.eclipse.microprofile.reactive.messaging.Outgoing",
        "Class --(annotatedWith)--> Annotation_javax.enterprise.context.ApplicationScoped",
    ],
    [
        "Class --(annotatedWith)--> Annotation_org.eclipse.microprofile.rest.client.inject.RegisterRestClient",
        "Class --(annotatedWith)--> Annotation_javax.ws.rs.Path",
    ],
    [
        "Class --(annotatedWith)--> Annotation_org.eclipse.microprofile.health.Liveness",
        "Class --(implements)--> Interface_org.eclipse.microprofile.health.HealthCheck",
    ],
    [
        "Class --(annotatedWith)--> Annotation_org.eclipse.microprofile.health.Readiness",
        "Class --(implements)--> Interface_org.eclipse.microprofile.health.HealthCheck",
    ],
    [
        "Class --(annotatedWith)--> Annotation_org.eclipse.microprofile.health.Health",
        "Class --(implements)--> Interface_org.eclipse.microprofile.health.HealthCheck",
    ],
    [
        "Annotation_org.eclipse.microprofile.faulttolerance.Fallback --(hasParam)--> Param_value:java.lang.Class",
        "Method --(annotatedWith)--> Annotation_org.eclipse.microprofile.faulttolerance.Fallback",
    ],
    [
        "Field --(annotatedWith)--> Annotation_org.eclipse.microprofile.rest.client.inject.RestClient",
        "Field --(annotatedWith)--> Annotation_javax.inject.Inject",
    ],
    [
        "Class --(annotatedWith)--> Annotation_org.eclipse.microprofile.openapi.annotations.tags.Tag",
        "Class --(annotatedWith)--> Annotation_javax.ws.rs.Path",
    ],
];

/// Item sets of the reviewed MicroProfile conventions.
pub fn known_correct_patterns() -> Vec<BTreeSet<String>> {
    KNOWN_CORRECT_PAIRS
        .iter()
        .map(|pair| pair.iter().map(|s| s.to_string()).collect())
        .collect()
}

/// Labels matching `unknown` rules as partially correct; returns how many
/// changed. Already labeled rules are never touched.
pub fn auto_label_partially_correct(
    rules: &mut [LabeledRule],
    patterns: &[BTreeSet<String>],
) -> usize {
    let mut labeled = 0;
    for rule in rules.iter_mut().filter(|r| r.label.is_unknown()) {
        let items = rule.items();
        if items.len() <= 2 {
            continue;
        }
        let matches = patterns
            .iter()
            .any(|pattern| pattern.iter().all(|item| items.contains(item)));
        if matches {
            rule.label = RuleLabel::PartiallyCorrect;
            labeled += 1;
        }
    }
    info!(labeled, patterns = patterns.len(), "auto-labeled partially correct rules");
    labeled
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    const CONFIG: &str =
        "Field --(annotatedWith)--> Annotation_org.eclipse.microprofile.config.inject.ConfigProperty";
    const INJECT: &str = "Field --(annotatedWith)--> Annotation_javax.inject.Inject";
    const STRING: &str = "Field --(hasType)--> java.lang.String";

    #[test]
    fn eighteen_distinct_patterns() {
        let patterns = known_correct_patterns();
        assert_eq!(patterns.len(), 18);
        assert!(patterns.iter().all(|p| p.len() == 2));
        assert_eq!(patterns.iter().collect::<BTreeSet<_>>().len(), 18);
    }

    #[test]
    fn labels_only_larger_unknown_rules() {
        let mut rules = vec![
            LabeledRule::new(set(&[CONFIG, STRING]), set(&[INJECT]), RuleLabel::Unknown),
            // Exactly the pattern: left for manual review.
            LabeledRule::new(set(&[CONFIG]), set(&[INJECT]), RuleLabel::Unknown),
            LabeledRule::new(set(&[CONFIG, STRING]), set(&[INJECT]), RuleLabel::NotARule),
            LabeledRule::new(set(&[STRING, "x"]), set(&[INJECT]), RuleLabel::Unknown),
        ];

        let changed = auto_label_partially_correct(&mut rules, &known_correct_patterns());

        assert_eq!(changed, 1);
        assert_eq!(rules[0].label, RuleLabel::PartiallyCorrect);
        assert_eq!(rules[1].label, RuleLabel::Unknown);
        assert_eq!(rules[2].label, RuleLabel::NotARule);
        assert_eq!(rules[3].label, RuleLabel::Unknown);
    }
}
