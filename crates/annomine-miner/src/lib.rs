//! Annotation convention miner.
//!
//! Treats every usage fact-set as a market-basket transaction, finds the
//! frequent co-occurrences per sub-API, derives single-consequent rules and
//! reduces them to one plausible rule per maximal pattern.
//!
//! ```text
//!   transactions ─► fpgrowth ─► rulegen ─► heuristics ─► [AssociationRule]
//!        ▲                                     ▲
//!   transactions.rs                     annotations.rs (required params)
//! ```
//!
//! [`pipeline::Miner`] wires the stages together; the stages are public so
//! they can be tested and reused on their own.

pub mod annotations;
pub mod config;
pub mod digest;
pub mod error;
pub mod fpgrowth;
pub mod frequent;
pub mod heuristics;
pub mod label;
pub mod pipeline;
pub mod rule;
pub mod rulegen;
pub mod tidlist;
pub mod transactions;

pub use annotations::{AnnotationDecl, RequiredParam, RequiredParamIndex};
pub use config::MinerConfig;
pub use digest::rule_content_id;
pub use error::{ConfigError, MinerError, RuleError};
pub use fpgrowth::FpGrowth;
pub use frequent::FrequentItemset;
pub use label::RuleLabel;
pub use pipeline::{Miner, MiningOutcome, MiningSummary};
pub use rule::{AssociationRule, SYNTHESIZED_CONFIDENCE};
pub use rulegen::generate_rules;
pub use tidlist::TransactionIndex;
pub use transactions::{
    prepare_transactions, PreparationStats, PreparedTransactions, SubApiRouter, TransactionBatch,
};
