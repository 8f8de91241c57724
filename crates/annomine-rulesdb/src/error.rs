use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RulesDbError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid rule file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("no rule file for the current version {version}; mine rules first")]
    MissingCurrentVersion { version: String },

    #[error("{count} rule(s) of version {version} are still labeled unknown; label them first")]
    UnlabeledBaseline { version: String, count: usize },

    #[error("version tag `{0}` must start with 'v'")]
    BadVersionTag(String),

    #[error("rule {id} is not fully reviewed: {reason}")]
    IncompleteReview { id: i64, reason: &'static str },
}
