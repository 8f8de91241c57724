//! Versioned rule database.
//!
//! Every mining run persists its rules as `rules_<version>.json`. Rules are
//! identified by a content hash of (antecedent, consequent), so the same
//! convention found by two runs at different confidences is one rule and
//! keeps its manual label.
//!
//! ```text
//!   rules dir ─► RuleHistory ─► annotate(new rules)     label / first version
//!                    │
//!                    └─► StabilityBaseline ─► StabilityReport
//!                                              hits, misses, new, precision,
//!                                              recall (benchmark)
//! ```

pub mod error;
pub mod history;
pub mod labeled;
pub mod labeler;
pub mod redundancy;
pub mod stability;
pub mod store;

pub use error::RulesDbError;
pub use history::{version_sort_key, RuleHistory};
pub use labeled::{LabeledRule, SameAs, SAME_AS_CANONICAL, SAME_AS_UNREVIEWED};
pub use labeler::{auto_label_partially_correct, known_correct_patterns};
pub use redundancy::{check_complete, RedundancyReport};
pub use stability::{
    precision, recall, RecallBreakdown, StabilityBaseline, StabilityReport, VersionDelta,
};
pub use store::{
    load_benchmark, read_rules_file, rules_file_name, version_from_file_name, write_rules,
    BENCHMARK_FILE_NAME,
};
