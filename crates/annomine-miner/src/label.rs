use std::fmt;

use serde::{Deserialize, Serialize};

/// Manual review verdict attached to a mined itemset or rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RuleLabel {
    #[default]
    #[serde(rename = "unknown")]
    Unknown,
    #[serde(rename = "correct")]
    Correct,
    #[serde(rename = "part. correct", alias = "partially correct")]
    PartiallyCorrect,
    #[serde(rename = "best practice")]
    BestPractice,
    #[serde(rename = "not a rule", alias = "not a usage")]
    NotARule,
}

impl RuleLabel {
    pub const ALL: [RuleLabel; 5] = [
        RuleLabel::Unknown,
        RuleLabel::Correct,
        RuleLabel::PartiallyCorrect,
        RuleLabel::BestPractice,
        RuleLabel::NotARule,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RuleLabel::Unknown => "unknown",
            RuleLabel::Correct => "correct",
            RuleLabel::PartiallyCorrect => "part. correct",
            RuleLabel::BestPractice => "best practice",
            RuleLabel::NotARule => "not a rule",
        }
    }

    /// Counts towards precision.
    pub fn is_correct_or_partial(self) -> bool {
        matches!(self, RuleLabel::Correct | RuleLabel::PartiallyCorrect)
    }

    pub fn is_unknown(self) -> bool {
        self == RuleLabel::Unknown
    }
}

impl fmt::Display for RuleLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
