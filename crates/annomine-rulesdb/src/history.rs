//! Rules of every previous mining run, keyed by version.
//!
//! Loaded once from the rules directory and passed by reference to whatever
//! needs prior labels; there is no process-wide rule state.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use ahash::AHashMap;
use annomine_miner::{AssociationRule, RuleLabel};
use tracing::{debug, info};

use crate::error::RulesDbError;
use crate::labeled::LabeledRule;
use crate::store::{read_rules_file, version_from_file_name};

/// Numeric ordering for tags like `v0.0.10` (so it sorts after `v0.0.9`).
/// Non-numeric components compare as zero.
pub fn version_sort_key(version: &str) -> Vec<u64> {
    version
        .trim_start_matches('v')
        .split('.')
        .map(|part| part.parse().unwrap_or(0))
        .collect()
}

#[derive(Debug, Clone, Copy)]
struct Sighting<'a> {
    version: &'a str,
    label: RuleLabel,
}

#[derive(Debug, Clone, Default)]
pub struct RuleHistory {
    versions: BTreeMap<String, Vec<LabeledRule>>,
}

impl RuleHistory {
    pub fn from_versions(versions: BTreeMap<String, Vec<LabeledRule>>) -> Self {
        Self { versions }
    }

    /// Reads every `rules_v*.json` in `dir`. A missing directory is an error;
    /// an existing directory without rule files is an empty history.
    pub fn load(dir: &Path) -> Result<Self, RulesDbError> {
        let entries = fs::read_dir(dir).map_err(|source| RulesDbError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut versions = BTreeMap::new();
        for entry in entries {
            let entry = entry.map_err(|source| RulesDbError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
            let file_name = entry.file_name();
            let Some(version) = file_name.to_str().and_then(version_from_file_name) else {
                continue;
            };
            let rules = read_rules_file(&entry.path())?;
            debug!(version, rules = rules.len(), "loaded rule file");
            versions.insert(version.to_string(), rules);
        }

        info!(
            dir = %dir.display(),
            versions = versions.len(),
            "loaded rule history"
        );
        Ok(Self { versions })
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    /// Version tags, oldest first.
    pub fn versions(&self) -> Vec<&str> {
        let mut versions: Vec<&str> = self.versions.keys().map(String::as_str).collect();
        versions.sort_by(|a, b| version_sort_key(a).cmp(&version_sort_key(b)).then(a.cmp(b)));
        versions
    }

    pub fn rules_for(&self, version: &str) -> Option<&[LabeledRule]> {
        self.versions.get(version).map(Vec::as_slice)
    }

    pub fn into_versions(self) -> BTreeMap<String, Vec<LabeledRule>> {
        self.versions
    }

    fn sightings(&self, id: i64) -> Vec<Sighting<'_>> {
        self.versions()
            .into_iter()
            .filter_map(|version| {
                self.versions[version]
                    .iter()
                    .find(|rule| rule.id == id)
                    .map(|rule| Sighting {
                        version,
                        label: rule.label,
                    })
            })
            .collect()
    }

    /// The most recent non-`unknown` label given to this rule, else `unknown`.
    pub fn label_of(&self, id: i64) -> RuleLabel {
        self.sightings(id)
            .iter()
            .rev()
            .map(|s| s.label)
            .find(|label| !label.is_unknown())
            .unwrap_or_default()
    }

    /// The oldest version containing this rule, else `current`.
    pub fn first_version_of<'a>(&'a self, id: i64, current: &'a str) -> &'a str {
        self.sightings(id)
            .first()
            .map_or(current, |s| s.version)
    }

    /// Carry labels and first-seen versions over to freshly mined rules.
    pub fn annotate(&self, rules: &mut [AssociationRule], current_version: &str) {
        let mut index: AHashMap<i64, Vec<Sighting<'_>>> = AHashMap::new();
        for rule in rules.iter() {
            let id = rule.content_id();
            index.entry(id).or_insert_with(|| self.sightings(id));
        }

        let mut known = 0usize;
        for rule in rules.iter_mut() {
            let sightings = index.get(&rule.content_id()).map(Vec::as_slice).unwrap_or(&[]);
            let label = sightings
                .iter()
                .rev()
                .map(|s| s.label)
                .find(|label| !label.is_unknown())
                .unwrap_or_default();
            let version = sightings.first().map_or(current_version, |s| s.version);
            if !sightings.is_empty() {
                known += 1;
            }
            rule.set_label(label);
            rule.set_version(version);
        }
        info!(rules = rules.len(), previously_mined = known, "annotated rules from history");
    }
}
