//! Human-readable terminal output.

use annomine_miner::{MiningSummary, PreparationStats, RuleLabel};
use annomine_rulesdb::{LabeledRule, RedundancyReport, StabilityReport};
use colored::Colorize;

fn percent(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}

pub fn print_mining(summary: &MiningSummary, preparation: &PreparationStats, rules: &[LabeledRule]) {
    println!(
        "  Projects: {} used / {} given ({} excluded, {} skipped)",
        summary.projects_used.to_string().cyan(),
        summary.projects_given,
        preparation.projects_excluded,
        preparation.projects_skipped
    );
    println!(
        "  Usages: {} unique / {} total",
        summary.unique_usages, summary.total_usages
    );
    for (sub_api, projects) in &preparation.sub_api_project_frequency {
        println!("    {}: {} project(s)", sub_api.yellow(), projects);
    }
    println!(
        "  Buckets: {} mined, {} dropped",
        summary.buckets_mined, preparation.buckets_dropped
    );
    println!(
        "  Frequent itemsets: {} raw → {} maximal",
        summary.frequent_raw, summary.maximal
    );
    println!(
        "  Rules: {} ({} synthesized)",
        summary.final_rules.to_string().cyan(),
        summary.synthesized_rules
    );

    let known = rules.iter().filter(|r| !r.label.is_unknown()).count();
    if known > 0 {
        println!(
            "  {} {} rule(s) already labeled in earlier versions",
            "→".yellow(),
            known
        );
    }
}

pub fn print_stability(report: &StabilityReport) {
    println!(
        "{} {} ({} rules)",
        "Stability of".green().bold(),
        report.current_version.cyan(),
        report.total_rules
    );

    for (version, delta) in &report.per_version {
        println!(
            "  vs {}: {} hits, {} misses, {} new",
            version.yellow(),
            delta.hits.len().to_string().green(),
            delta.misses.len().to_string().red(),
            delta.new.len()
        );
        for (label, count) in &delta.misses_by_label {
            println!("      missed {}: {}", label, count);
        }
    }

    println!(
        "  Overall: {} hits, {} misses, {} new",
        report.overall.hits.len().to_string().green(),
        report.overall.misses.len().to_string().red(),
        report.overall.new.len()
    );

    println!("  Labels:");
    for label in RuleLabel::ALL {
        let count = report.label_counts.get(&label).copied().unwrap_or(0);
        if count > 0 {
            println!("    {}: {}", label, count);
        }
    }

    println!("  Precision: {}", percent(report.precision).bold());
    match &report.recall {
        Some(recall) => println!(
            "  Recall: {} ({} exact, {} partial of {})",
            percent(recall.recall()).bold(),
            recall.exact,
            recall.partial,
            recall.benchmark
        ),
        None => println!("  Recall: {}", "no benchmark given".dimmed()),
    }
}

pub fn print_redundancy(report: &RedundancyReport, rules: &[LabeledRule]) {
    println!(
        "{} {} correct or part. correct rule(s)",
        "Reviewed".green().bold(),
        report.correct_or_partial
    );
    println!("  Unique: {}", report.unique.len().to_string().cyan());
    println!(
        "  Redundant (excluding canonical rules): {}",
        report.redundant_total()
    );
    if !report.unreviewed.is_empty() {
        println!(
            "  {} {} rule(s) without a sameAs decision",
            "warning:".yellow().bold(),
            report.unreviewed.len()
        );
    }

    for rule in rules.iter().filter(|r| report.unique.contains(&r.id)) {
        println!("{{");
        println!("\tIf:");
        for item in &rule.antecedent {
            println!("\t{item},");
        }
        println!("\tThen:");
        for item in &rule.consequent {
            println!("\t{item}");
        }
        println!("}}");
    }
}
