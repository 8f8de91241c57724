//! One JSON file per tool version: `rules_<version>.json`.
//!
//! Version tags start with `v` (`rules_v0.0.9.json`), which keeps the
//! benchmark file (`rules_benchmark.json`) out of the version history.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::RulesDbError;
use crate::labeled::LabeledRule;

pub const RULES_FILE_PREFIX: &str = "rules_";
pub const RULES_FILE_EXTENSION: &str = ".json";
pub const BENCHMARK_FILE_NAME: &str = "rules_benchmark.json";

pub fn rules_file_name(version: &str) -> Result<String, RulesDbError> {
    if !version.starts_with('v') {
        return Err(RulesDbError::BadVersionTag(version.to_string()));
    }
    Ok(format!("{RULES_FILE_PREFIX}{version}{RULES_FILE_EXTENSION}"))
}

/// `rules_v0.0.9.json` -> `v0.0.9`; `None` for anything that is not a
/// versioned rule file.
pub fn version_from_file_name(name: &str) -> Option<&str> {
    let version = name
        .strip_prefix(RULES_FILE_PREFIX)?
        .strip_suffix(RULES_FILE_EXTENSION)?;
    (version.len() > 1 && version.starts_with('v')).then_some(version)
}

/// An empty file (or a literal `null`) reads as no rules.
pub fn read_rules_file(path: &Path) -> Result<Vec<LabeledRule>, RulesDbError> {
    let text = fs::read_to_string(path).map_err(|source| RulesDbError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if text.trim().is_empty() {
        warn!(path = %path.display(), "rule file is empty");
        return Ok(Vec::new());
    }
    let rules: Option<Vec<LabeledRule>> =
        serde_json::from_str(&text).map_err(|source| RulesDbError::Json {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(rules.unwrap_or_else(|| {
        warn!(path = %path.display(), "rule file is empty");
        Vec::new()
    }))
}

pub fn write_rules(
    dir: &Path,
    version: &str,
    rules: &[LabeledRule],
) -> Result<PathBuf, RulesDbError> {
    let path = dir.join(rules_file_name(version)?);
    let json = serde_json::to_string_pretty(rules).map_err(|source| RulesDbError::Json {
        path: path.clone(),
        source,
    })?;
    fs::write(&path, json).map_err(|source| RulesDbError::Io {
        path: path.clone(),
        source,
    })?;
    info!(path = %path.display(), rules = rules.len(), "wrote rule file");
    Ok(path)
}

pub fn load_benchmark(path: &Path) -> Result<Vec<LabeledRule>, RulesDbError> {
    let rules = read_rules_file(path)?;
    if rules.is_empty() {
        warn!(path = %path.display(), "benchmark contains no rules; recall is undefined");
    }
    Ok(rules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use annomine_miner::RuleLabel;
    use std::collections::BTreeSet;

    #[test]
    fn file_names_round_trip_versions() {
        assert_eq!(rules_file_name("v0.0.9").unwrap(), "rules_v0.0.9.json");
        assert!(matches!(
            rules_file_name("0.0.9"),
            Err(RulesDbError::BadVersionTag(_))
        ));
        assert_eq!(version_from_file_name("rules_v0.0.9.json"), Some("v0.0.9"));
        assert_eq!(version_from_file_name(BENCHMARK_FILE_NAME), None);
        assert_eq!(version_from_file_name("rules_v.json"), None);
        assert_eq!(version_from_file_name("notes.txt"), None);
    }

    #[test]
    fn writes_and_reads_pretty_json() {
        let dir = tempfile::tempdir().unwrap();
        let rule = LabeledRule::new(
            BTreeSet::from(["a".to_string()]),
            BTreeSet::from(["b".to_string()]),
            RuleLabel::BestPractice,
        );

        let path = write_rules(dir.path(), "v1", std::slice::from_ref(&rule)).unwrap();
        assert!(path.ends_with("rules_v1.json"));
        assert_eq!(read_rules_file(&path).unwrap(), vec![rule]);
    }

    #[test]
    fn empty_and_null_files_read_as_no_rules() {
        let dir = tempfile::tempdir().unwrap();
        let empty = dir.path().join("rules_v1.json");
        fs::write(&empty, "").unwrap();
        assert!(read_rules_file(&empty).unwrap().is_empty());

        let null = dir.path().join("rules_v2.json");
        fs::write(&null, "null").unwrap();
        assert!(read_rules_file(&null).unwrap().is_empty());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_rules_file(&dir.path().join("rules_v9.json")).unwrap_err();
        assert!(matches!(err, RulesDbError::Io { .. }));
    }
}
