use sentiment_core::{LabeledComment, SentimentLabel};

/// Counts, text pools and samples derived from one run's labeled comments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SentimentAggregate {
    pub total_count: usize,
    pub positive_count: usize,
    pub negative_count: usize,
    pub pooled_text_all: String,
    pub pooled_text_positive: String,
    pub pooled_text_negative: String,
    /// First comments of each partition in scrape order.
    pub sample_positive: Vec<String>,
    pub sample_negative: Vec<String>,
}

impl SentimentAggregate {
    /// Percentage of positive comments rounded to two decimals, `None` for an empty run.
    pub fn positive_ratio(&self) -> Option<f64> {
        if self.total_count == 0 {
            return None;
        }
        let ratio = self.positive_count as f64 / self.total_count as f64 * 100.0;
        Some((ratio * 100.0).round() / 100.0)
    }

    /// Complement of [`Self::positive_ratio`].
    pub fn negative_ratio(&self) -> Option<f64> {
        self.positive_ratio().map(|positive| 100.0 - positive)
    }

    pub fn count(&self, label: SentimentLabel) -> usize {
        match label {
            SentimentLabel::Positive => self.positive_count,
            SentimentLabel::Negative => self.negative_count,
        }
    }
}

/// Single pass over `comments`: every comment lands in exactly one partition.
pub fn aggregate(comments: &[LabeledComment], sample_size: usize) -> SentimentAggregate {
    let mut result = SentimentAggregate {
        total_count: comments.len(),
        ..Default::default()
    };

    for comment in comments {
        push_pooled(&mut result.pooled_text_all, &comment.text);

        let (count, pool, sample) = match comment.label {
            SentimentLabel::Positive => (
                &mut result.positive_count,
                &mut result.pooled_text_positive,
                &mut result.sample_positive,
            ),
            SentimentLabel::Negative => (
                &mut result.negative_count,
                &mut result.pooled_text_negative,
                &mut result.sample_negative,
            ),
        };

        *count += 1;
        push_pooled(pool, &comment.text);
        if sample.len() < sample_size {
            sample.push(comment.text.clone());
        }
    }

    result
}

fn push_pooled(pool: &mut String, text: &str) {
    if !pool.is_empty() {
        pool.push(' ');
    }
    pool.push_str(text);
}
