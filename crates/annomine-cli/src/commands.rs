use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use annomine_aug::Itemset;
use annomine_miner::{Miner, MinerConfig, MiningSummary, PreparationStats, RequiredParamIndex};
use annomine_rulesdb::{
    auto_label_partially_correct, check_complete, known_correct_patterns, load_benchmark,
    read_rules_file, rules_file_name, write_rules, LabeledRule, RedundancyReport, RuleHistory,
    StabilityBaseline, StabilityReport,
};
use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::Serialize;
use tracing::info;

use crate::report;
use crate::{MineArgs, RedundancyArgs, StatsArgs, VersionArgs};

// =============================================================================
// Shared helpers
// =============================================================================

fn load_config(path: Option<&PathBuf>) -> Result<MinerConfig> {
    match path {
        Some(path) => Ok(MinerConfig::load(path)?),
        None => Ok(MinerConfig::default()),
    }
}

impl VersionArgs {
    fn resolve_version(&self, config: &MinerConfig) -> String {
        self.tag.clone().unwrap_or_else(|| config.version.clone())
    }

    fn rules_file(&self, version: &str) -> Result<PathBuf> {
        Ok(self.rules_dir.join(rules_file_name(version)?))
    }
}

fn read_usages(path: &Path) -> Result<BTreeMap<String, Vec<Itemset>>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read usages from {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("failed to parse usages in {}", path.display()))
}

// =============================================================================
// mine
// =============================================================================

#[derive(Debug, Serialize)]
struct RunRecord<'a> {
    generated_at: DateTime<Utc>,
    version: &'a str,
    rules_file: &'a Path,
    preparation: &'a PreparationStats,
    summary: &'a MiningSummary,
    auto_labeled: usize,
}

pub fn cmd_mine(args: &MineArgs) -> Result<()> {
    let mut config = load_config(args.target.config.as_ref())?;
    config.version = args.target.resolve_version(&config);

    println!("{} {}", "Mining".green().bold(), args.input.display());

    let required = match &args.annotations {
        Some(path) => RequiredParamIndex::load(path)?,
        None => RequiredParamIndex::empty(),
    };
    let usages = read_usages(&args.input)?;
    let miner = Miner::new(config, required)?;
    let mut outcome = miner.run(&usages)?;
    outcome.summary.log();

    let version = miner.config().version.as_str();
    fs::create_dir_all(&args.target.rules_dir).with_context(|| {
        format!("failed to create {}", args.target.rules_dir.display())
    })?;
    let history = RuleHistory::load(&args.target.rules_dir)?;
    history.annotate(&mut outcome.rules, version);

    let mut labeled: Vec<LabeledRule> = outcome.rules.iter().map(LabeledRule::from_rule).collect();
    let auto_labeled = if args.auto_label {
        auto_label_partially_correct(&mut labeled, &known_correct_patterns())
    } else {
        0
    };
    let rules_file = write_rules(&args.target.rules_dir, version, &labeled)?;

    report::print_mining(&outcome.summary, &outcome.preparation, &labeled);
    eprintln!(
        "{} {}",
        "wrote".green().bold(),
        rules_file.display().to_string().bold()
    );

    if let Some(out) = &args.summary_out {
        let record = RunRecord {
            generated_at: Utc::now(),
            version,
            rules_file: &rules_file,
            preparation: &outcome.preparation,
            summary: &outcome.summary,
            auto_labeled,
        };
        fs::write(out, serde_json::to_string_pretty(&record)?)
            .with_context(|| format!("failed to write {}", out.display()))?;
        info!(path = %out.display(), "wrote run summary");
    }
    Ok(())
}

// =============================================================================
// stats
// =============================================================================

pub fn cmd_stats(args: &StatsArgs) -> Result<()> {
    let config = load_config(args.target.config.as_ref())?;
    let version = args.target.resolve_version(&config);

    let baseline = StabilityBaseline::load(&args.target.rules_dir, &version)?;
    let benchmark = args.benchmark.as_deref().map(load_benchmark).transpose()?;
    let stability = StabilityReport::compute(&baseline, benchmark.as_deref());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&stability)?);
    } else {
        report::print_stability(&stability);
    }
    Ok(())
}

// =============================================================================
// label
// =============================================================================

pub fn cmd_label(args: &VersionArgs) -> Result<()> {
    let config = load_config(args.config.as_ref())?;
    let version = args.resolve_version(&config);
    let path = args.rules_file(&version)?;
    if !path.exists() {
        return Err(anyhow!("no rule file at {}; run `annomine mine` first", path.display()));
    }

    let mut rules = read_rules_file(&path)?;
    let changed = auto_label_partially_correct(&mut rules, &known_correct_patterns());
    write_rules(&args.rules_dir, &version, &rules)?;

    let remaining = rules.iter().filter(|r| r.label.is_unknown()).count();
    println!(
        "{} {} rule(s) as {}",
        "Labeled".green().bold(),
        changed,
        "part. correct".cyan()
    );
    println!("  {} {} rule(s) still unknown", "→".yellow(), remaining);
    Ok(())
}

// =============================================================================
// redundancy
// =============================================================================

pub fn cmd_redundancy(args: &RedundancyArgs) -> Result<()> {
    let config = load_config(args.target.config.as_ref())?;
    let version = args.target.resolve_version(&config);
    let rules = read_rules_file(&args.target.rules_file(&version)?)?;

    if args.strict {
        check_complete(&rules)?;
    }
    let redundancy = RedundancyReport::compute(&rules);
    report::print_redundancy(&redundancy, &rules);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use annomine_aug::Location;
    use annomine_miner::RuleLabel;

    const CONFIG: &str =
        "Field --(annotatedWith)--> Annotation_org.eclipse.microprofile.config.inject.ConfigProperty";
    const INJECT: &str = "Field --(annotatedWith)--> Annotation_javax.inject.Inject";
    const STRING: &str = "Field --(hasType)--> java.lang.String";

    fn target(dir: &Path) -> VersionArgs {
        VersionArgs {
            rules_dir: dir.to_path_buf(),
            tag: Some("v0.1.0".to_string()),
            config: None,
        }
    }

    #[test]
    fn mine_then_label_updates_the_rule_file() {
        let dir = tempfile::tempdir().unwrap();
        let usages: BTreeMap<String, Vec<Itemset>> = (0..12)
            .map(|n| {
                let project = format!("acme/orders-{n}");
                let itemset = Itemset::from_items(
                    [CONFIG, INJECT, STRING],
                    Location::new(&project, "Settings.java", "Settings.url"),
                )
                .unwrap();
                (project, vec![itemset])
            })
            .collect();
        let input = dir.path().join("usages.json");
        fs::write(&input, serde_json::to_string(&usages).unwrap()).unwrap();

        let summary_out = dir.path().join("summary.json");
        cmd_mine(&MineArgs {
            input,
            annotations: None,
            auto_label: false,
            summary_out: Some(summary_out.clone()),
            target: target(dir.path()),
        })
        .unwrap();

        let rules_path = dir.path().join("rules_v0.1.0.json");
        let mined = read_rules_file(&rules_path).unwrap();
        assert_eq!(mined.len(), 1);
        assert_eq!(mined[0].label, RuleLabel::Unknown);

        let record: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&summary_out).unwrap()).unwrap();
        assert_eq!(record["version"], "v0.1.0");
        assert_eq!(record["summary"]["final_rules"], 1);

        cmd_label(&target(dir.path())).unwrap();
        let labeled = read_rules_file(&rules_path).unwrap();
        assert_eq!(labeled[0].label, RuleLabel::PartiallyCorrect);
    }

    #[test]
    fn label_without_a_rule_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(cmd_label(&target(dir.path())).is_err());
    }
}
