use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuleError {
    #[error("consequent `{0}` is also in the antecedent")]
    ConsequentInAntecedent(String),

    #[error("a rule needs a non-empty antecedent")]
    EmptyAntecedent,

    #[error("confidence {0} is neither in [0, 1] nor the synthesized sentinel")]
    ConfidenceOutOfRange(f64),

    #[error("`{0}` is already the consequent")]
    AlreadyConsequent(String),

    #[error("`{0}` is not in the antecedent")]
    NotInAntecedent(String),

    #[error("rule for itemset of {itemset} items has {antecedent} antecedent items")]
    SizeMismatch { itemset: usize, antecedent: usize },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("min_support must be at least 1")]
    ZeroSupport,

    #[error("min_confidence {0} is outside [0, 1]")]
    ConfidenceOutOfRange(f64),

    #[error("at least one target prefix is required")]
    NoTargetPrefixes,

    #[error("invalid sub-API pattern `{pattern}`: {source}")]
    BadSubApiPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("version tag `{0}` must start with 'v'")]
    BadVersionTag(String),
}

#[derive(Debug, Error)]
pub enum MinerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Rule(#[from] RuleError),

    #[error(transparent)]
    Aug(#[from] annomine_aug::AugError),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
