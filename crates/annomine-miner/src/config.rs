//! Run configuration.
//!
//! Read once at startup and shared read-only across every bucket worker.

use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, MinerError};

/// Thresholds below which the miner still runs but logs a warning.
pub const RECOMMENDED_MIN_SUPPORT: u64 = 10;
pub const RECOMMENDED_MIN_CONFIDENCE: f64 = 0.3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinerConfig {
    /// Absolute transaction count, never a ratio.
    pub min_support: u64,
    pub min_confidence: f64,
    pub target_prefixes: Vec<String>,
    /// Only items containing this prefix are scanned for sub-API keys.
    pub library_prefix: String,
    pub sub_api_pattern: String,
    pub sub_api_prefixes: Vec<String>,
    pub min_usages_per_project: usize,
    pub min_bucket_transactions: usize,
    pub excluded_project_keywords: Vec<String>,
    pub version: String,
}

impl Default for MinerConfig {
    fn default() -> Self {
        let strings = |xs: &[&str]| xs.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        Self {
            min_support: 10,
            min_confidence: 0.5,
            target_prefixes: strings(&["javax", "org.eclipse.microprofile"]),
            library_prefix: "org.eclipse.microprofile".to_string(),
            sub_api_pattern: r"org\.eclipse\.microprofile\.\w+".to_string(),
            sub_api_prefixes: strings(&[
                "org.eclipse.microprofile.config",
                "org.eclipse.microprofile.faulttolerance",
                "org.eclipse.microprofile.graphql",
                "org.eclipse.microprofile.health",
                "org.eclipse.microprofile.jwt",
                "org.eclipse.microprofile.metrics",
                "org.eclipse.microprofile.openapi",
                "org.eclipse.microprofile.opentracing",
                "org.eclipse.microprofile.reactive",
                "org.eclipse.microprofile.rest",
            ]),
            min_usages_per_project: 1,
            min_bucket_transactions: 10,
            excluded_project_keywords: strings(&[
                "demo",
                "workshop",
                "guide",
                "guides",
                "example",
                "playground",
                "getting-started",
                "sample",
                "samples",
                "starter",
                "quickstart",
                "quick-start",
                "examples",
                "tutorial",
            ]),
            version: "v0.0.10".to_string(),
        }
    }
}

impl MinerConfig {
    /// Load a JSON config file; missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self, MinerError> {
        let text = std::fs::read_to_string(path).map_err(|source| MinerError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: MinerConfig =
            serde_json::from_str(&text).map_err(|source| MinerError::Json {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_support == 0 {
            return Err(ConfigError::ZeroSupport);
        }
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(ConfigError::ConfidenceOutOfRange(self.min_confidence));
        }
        if self.target_prefixes.is_empty() {
            return Err(ConfigError::NoTargetPrefixes);
        }
        self.sub_api_regex()?;
        if !self.version.starts_with('v') {
            return Err(ConfigError::BadVersionTag(self.version.clone()));
        }

        if self.min_support < RECOMMENDED_MIN_SUPPORT {
            warn!(
                min_support = self.min_support,
                recommended = RECOMMENDED_MIN_SUPPORT,
                "min_support is below the recommended floor"
            );
        }
        if self.min_confidence < RECOMMENDED_MIN_CONFIDENCE {
            warn!(
                min_confidence = self.min_confidence,
                recommended = RECOMMENDED_MIN_CONFIDENCE,
                "min_confidence is below the recommended floor"
            );
        }
        Ok(())
    }

    pub fn sub_api_regex(&self) -> Result<Regex, ConfigError> {
        Regex::new(&self.sub_api_pattern).map_err(|source| ConfigError::BadSubApiPattern {
            pattern: self.sub_api_pattern.clone(),
            source,
        })
    }

    pub fn is_excluded_project(&self, project: &str) -> bool {
        let lower = project.to_lowercase();
        self.excluded_project_keywords
            .iter()
            .any(|keyword| lower.contains(keyword.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_validate() {
        MinerConfig::default().validate().unwrap();
    }

    #[test]
    fn rejects_bad_values() {
        let mut config = MinerConfig {
            min_support: 0,
            ..MinerConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::ZeroSupport)));

        config.min_support = 10;
        config.min_confidence = 1.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ConfidenceOutOfRange(_))
        ));

        config.min_confidence = 0.5;
        config.sub_api_pattern = "(".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::BadSubApiPattern { .. })
        ));

        config.sub_api_pattern = MinerConfig::default().sub_api_pattern;
        config.version = "0.0.10".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::BadVersionTag(_))));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"min_support": 25, "version": "v1.2"}}"#).unwrap();

        let config = MinerConfig::load(file.path()).unwrap();
        assert_eq!(config.min_support, 25);
        assert_eq!(config.version, "v1.2");
        assert_eq!(config.min_bucket_transactions, 10);
        assert_eq!(config.sub_api_prefixes.len(), 10);
    }

    #[test]
    fn toy_projects_are_excluded_case_insensitively() {
        let config = MinerConfig::default();
        assert!(config.is_excluded_project("acme/MicroProfile-Demo"));
        assert!(config.is_excluded_project("quick-start-jwt"));
        assert!(!config.is_excluded_project("acme/billing-service"));
    }
}
