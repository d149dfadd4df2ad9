use crate::aggregate::SentimentAggregate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Overall audience mood derived from the positive ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Favorable,
    Mixed,
    Critical,
}

impl Verdict {
    /// Above 60 is favorable, 40 through 60 inclusive is mixed, below 40 is critical.
    pub fn from_ratio(positive_ratio: f64) -> Self {
        if positive_ratio > 60.0 {
            Verdict::Favorable
        } else if positive_ratio >= 40.0 {
            Verdict::Mixed
        } else {
            Verdict::Critical
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Favorable => "favorable",
            Verdict::Mixed => "mixed",
            Verdict::Critical => "critical",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Verdict::Favorable => "👍",
            Verdict::Mixed => "😐",
            Verdict::Critical => "👎",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoodSummary {
    pub positive_pct: f64,
    pub negative_pct: f64,
    pub verdict: Verdict,
}

impl MoodSummary {
    /// `None` when the aggregate holds no comments.
    pub fn from_aggregate(aggregate: &SentimentAggregate) -> Option<Self> {
        let positive_pct = aggregate.positive_ratio()?;
        let negative_pct = aggregate.negative_ratio()?;
        Some(Self {
            positive_pct,
            negative_pct,
            verdict: Verdict::from_ratio(positive_pct),
        })
    }

    pub fn render(&self) -> String {
        format!(
            "Audience Mood Summary:\n\
             - Positive comments: {:.2}%\n\
             - Negative comments: {:.2}%\n\
             - The overall audience sentiment is {}.\n\
             \n\
             Frequent keywords indicate main discussion themes.",
            self.positive_pct, self.negative_pct, self.verdict
        )
    }
}

impl fmt::Display for MoodSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
