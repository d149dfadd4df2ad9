pub mod aggregate;
pub mod export;
pub mod keywords;
pub mod pipeline;
pub mod stopwords;
pub mod summary;
pub mod wordcloud;

pub use aggregate::{aggregate, SentimentAggregate};
pub use export::{export_to_dir, write_csv, ExportRow, EXPORT_FILE_NAME};
pub use keywords::{KeywordExtractor, RankedKeyword};
pub use pipeline::{
    export_report, AnalysisOutcome, AnalysisPipeline, AnalysisReport, PipelineSettings,
    RunContext, RunRequest, WordClouds,
};
pub use stopwords::StopWords;
pub use summary::{MoodSummary, Verdict};
pub use wordcloud::{WeightedWord, WordCloud};
