use crate::aggregate::{aggregate, SentimentAggregate};
use crate::export;
use crate::keywords::{KeywordExtractor, RankedKeyword};
use crate::stopwords::StopWords;
use crate::summary::MoodSummary;
use crate::wordcloud::{WordCloud, MAX_CLOUD_WORDS};
use chrono::{DateTime, Utc};
use sentiment_core::{
    AppConfig, ClassifierError, Comment, CoreError, ExportError, LabeledComment, SortOrder,
};
use sentiment_engine::SentimentClassifier;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;
use youtube_client::{CommentSource, FetchRequest, VideoId};

/// User input for one analysis run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
    /// Watch URL, short link or bare video ID.
    pub video: String,
    /// Requested comment count, clamped to the allowed range before fetching.
    pub comment_count: u32,
}

#[derive(Debug, Clone)]
pub struct RunContext {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub fetch: FetchRequest,
    pub model: String,
}

impl RunContext {
    pub fn new(fetch: FetchRequest, model: impl Into<String>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            fetch,
            model: model.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub sort: SortOrder,
    pub sample_size: usize,
    pub keyword_count: usize,
    pub max_cloud_words: usize,
    pub extra_stopwords: Vec<String>,
}

impl From<&AppConfig> for PipelineSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            sort: config.sort_order,
            sample_size: config.sample_size,
            keyword_count: config.keyword_count,
            max_cloud_words: MAX_CLOUD_WORDS,
            extra_stopwords: config.extra_stopwords.clone(),
        }
    }
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

#[derive(Debug, Clone, Default)]
pub struct WordClouds {
    pub all: WordCloud,
    pub positive: WordCloud,
    pub negative: WordCloud,
}

/// Everything a completed run produced, kept for display and export.
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub context: RunContext,
    pub comments: Vec<LabeledComment>,
    pub aggregate: SentimentAggregate,
    pub summary: MoodSummary,
    pub keywords: Vec<RankedKeyword>,
    pub clouds: WordClouds,
    pub finished_at: DateTime<Utc>,
}

impl AnalysisReport {
    /// Wall-clock time from run start to the finished report.
    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at - self.context.started_at
    }

    pub fn export_csv(&self, dir: &Path) -> Result<PathBuf, CoreError> {
        export::export_to_dir(&self.comments, dir)
    }
}

#[derive(Debug, Clone)]
pub enum AnalysisOutcome {
    Completed(Box<AnalysisReport>),
    /// The video has no retrievable comments. Not an error.
    NoComments { context: RunContext },
}

impl AnalysisOutcome {
    pub fn context(&self) -> &RunContext {
        match self {
            AnalysisOutcome::Completed(report) => &report.context,
            AnalysisOutcome::NoComments { context } => context,
        }
    }

    pub fn report(&self) -> Option<&AnalysisReport> {
        match self {
            AnalysisOutcome::Completed(report) => Some(report.as_ref()),
            AnalysisOutcome::NoComments { .. } => None,
        }
    }
}

/// Exports the latest completed report, or fails when there is none.
pub fn export_report(report: Option<&AnalysisReport>, dir: &Path) -> Result<PathBuf, CoreError> {
    report.ok_or(ExportError::NothingToExport)?.export_csv(dir)
}

/// Fetch, classify, aggregate and summarize one video's comments.
pub struct AnalysisPipeline {
    source: Arc<dyn CommentSource>,
    classifier: Arc<dyn SentimentClassifier>,
    settings: PipelineSettings,
    keywords: KeywordExtractor,
    cloud_stopwords: StopWords,
}

impl AnalysisPipeline {
    pub fn new(
        source: Arc<dyn CommentSource>,
        classifier: Arc<dyn SentimentClassifier>,
        settings: PipelineSettings,
    ) -> Self {
        let keywords = KeywordExtractor::new(
            settings.keyword_count,
            StopWords::english().with_words(&settings.extra_stopwords),
        );
        let cloud_stopwords = StopWords::for_word_clouds().with_words(&settings.extra_stopwords);

        Self {
            source,
            classifier,
            settings,
            keywords,
            cloud_stopwords,
        }
    }

    pub async fn run(&self, request: RunRequest) -> Result<AnalysisOutcome, CoreError> {
        let video_id = VideoId::parse(&request.video)?;
        let context = RunContext::new(
            FetchRequest::new(video_id, request.comment_count, self.settings.sort),
            self.classifier.model_name(),
        );

        let span = info_span!(
            "analysis",
            run_id = %context.run_id,
            video_id = %context.fetch.video_id
        );
        self.execute(context).instrument(span).await
    }

    async fn execute(&self, context: RunContext) -> Result<AnalysisOutcome, CoreError> {
        info!(
            "Fetching up to {} comments sorted by {}",
            context.fetch.limit, context.fetch.sort
        );
        let comments = self.source.fetch_comments(&context.fetch).await?;

        if comments.is_empty() {
            warn!("No comments found");
            return Ok(AnalysisOutcome::NoComments { context });
        }

        info!("Classifying {} comments with {}", comments.len(), context.model);
        let labeled = self.classify(comments).await?;
        let report = self.build_report(context, labeled)?;

        info!(
            positive = report.aggregate.positive_count,
            negative = report.aggregate.negative_count,
            verdict = %report.summary.verdict,
            "Analysis complete"
        );
        Ok(AnalysisOutcome::Completed(Box::new(report)))
    }

    async fn classify(&self, comments: Vec<Comment>) -> Result<Vec<LabeledComment>, CoreError> {
        let classifier = Arc::clone(&self.classifier);
        let texts: Vec<String> = comments.iter().map(|c| c.text.clone()).collect();
        let started = Instant::now();

        let results = tokio::task::spawn_blocking(move || classifier.classify_batch(&texts))
            .await
            .map_err(|e| CoreError::Internal {
                message: format!("Classification task failed: {e}"),
            })??;

        if results.len() != comments.len() {
            return Err(ClassifierError::OutputMismatch {
                expected: comments.len(),
                actual: results.len(),
            }
            .into());
        }
        debug!("Classified {} comments in {:?}", results.len(), started.elapsed());

        Ok(comments
            .into_iter()
            .zip(results)
            .map(|(comment, result)| LabeledComment::new(comment, result))
            .collect())
    }

    fn build_report(
        &self,
        context: RunContext,
        comments: Vec<LabeledComment>,
    ) -> Result<AnalysisReport, CoreError> {
        let aggregate = aggregate(&comments, self.settings.sample_size);
        let summary = MoodSummary::from_aggregate(&aggregate).ok_or_else(|| CoreError::Internal {
            message: "aggregate of a non-empty run has no ratio".to_string(),
        })?;

        let keywords = self.keywords.extract(&aggregate.pooled_text_all);
        let clouds = WordClouds {
            all: self.cloud(&aggregate.pooled_text_all),
            positive: self.cloud(&aggregate.pooled_text_positive),
            negative: self.cloud(&aggregate.pooled_text_negative),
        };

        Ok(AnalysisReport {
            context,
            comments,
            aggregate,
            summary,
            keywords,
            clouds,
            finished_at: Utc::now(),
        })
    }

    fn cloud(&self, text: &str) -> WordCloud {
        WordCloud::generate(text, &self.cloud_stopwords, self.settings.max_cloud_words)
    }
}
