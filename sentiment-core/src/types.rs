use serde::{Deserialize, Serialize};
use std::fmt;

/// One raw comment as scraped, in platform order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub text: String,
}

impl Comment {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SentimentLabel {
    Positive,
    Negative,
}

impl SentimentLabel {
    /// Maps a classifier's native label ("POSITIVE", "NEGATIVE") onto the binary vocabulary.
    pub fn from_model_label(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "POSITIVE" | "POS" => Some(SentimentLabel::Positive),
            "NEGATIVE" | "NEG" => Some(SentimentLabel::Negative),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "Positive",
            SentimentLabel::Negative => "Negative",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifier output for a single comment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub label: SentimentLabel,
    pub score: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabeledComment {
    pub text: String,
    pub label: SentimentLabel,
    pub score: f32,
}

impl LabeledComment {
    pub fn new(comment: Comment, classification: Classification) -> Self {
        Self {
            text: comment.text,
            label: classification.label,
            score: classification.score,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// The platform's "Top comments" ordering.
    #[default]
    Top,
    Newest,
}

impl SortOrder {
    /// Position of this ordering in the watch page's sort menu.
    pub fn menu_index(&self) -> usize {
        match self {
            SortOrder::Top => 0,
            SortOrder::Newest => 1,
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Top => f.write_str("top"),
            SortOrder::Newest => f.write_str("newest"),
        }
    }
}
