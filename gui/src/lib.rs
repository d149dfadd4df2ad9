pub mod charts;

use charts::{NEGATIVE_COLOR, POSITIVE_COLOR};
use iced::widget::{button, column, container, row, scrollable, slider, text, text_input, Column};
use iced::{theme, Alignment, Color, Command, Element, Length, Theme};
use insight_engine::{export_report, AnalysisOutcome, AnalysisPipeline, AnalysisReport, RunRequest};
use sentiment_core::{
    clamp_comment_count, CoreError, ErrorExt, ErrorReporter, MAX_COMMENT_COUNT, MIN_COMMENT_COUNT,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

pub const APP_TITLE: &str = "YouTube Comment Sentiment Analyzer";

/// What the binary hands to the application at startup.
pub struct LaunchFlags {
    pub pipeline: Arc<AnalysisPipeline>,
    pub export_dir: PathBuf,
    pub default_comment_count: u32,
    /// Shown once when configuration fell back to defaults.
    pub startup_warning: Option<String>,
}

/// A failed run, reduced to what the user sees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunFailure {
    pub code: String,
    pub message: String,
}

impl From<&CoreError> for RunFailure {
    fn from(error: &CoreError) -> Self {
        Self {
            code: error.error_code(),
            message: error.user_friendly_message(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    VideoInputChanged(String),
    CommentCountChanged(u32),
    AnalyzePressed,
    AnalysisFinished(Result<Arc<AnalysisOutcome>, RunFailure>),
    ExportPressed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    Working(String),
    Success(String),
    Warning(String),
    Error(String),
}

impl Status {
    fn color(&self) -> Option<Color> {
        match self {
            Status::Working(_) => None,
            Status::Success(_) => Some(POSITIVE_COLOR),
            Status::Warning(_) => Some(Color::from_rgb(0.85, 0.6, 0.1)),
            Status::Error(_) => Some(NEGATIVE_COLOR),
        }
    }

    fn message(&self) -> &str {
        match self {
            Status::Working(m) | Status::Success(m) | Status::Warning(m) | Status::Error(m) => m,
        }
    }
}

pub struct App {
    pipeline: Arc<AnalysisPipeline>,
    export_dir: PathBuf,
    reporter: ErrorReporter,
    video_input: String,
    comment_count: u32,
    running: bool,
    outcome: Option<Arc<AnalysisOutcome>>,
    status: Option<Status>,
}

impl App {
    pub fn new(flags: LaunchFlags) -> Self {
        Self {
            pipeline: flags.pipeline,
            export_dir: flags.export_dir,
            reporter: ErrorReporter::new(),
            video_input: String::new(),
            comment_count: clamp_comment_count(flags.default_comment_count),
            running: false,
            outcome: None,
            status: flags.startup_warning.map(Status::Warning),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn comment_count(&self) -> u32 {
        self.comment_count
    }

    pub fn status(&self) -> Option<&Status> {
        self.status.as_ref()
    }

    /// The report on screen, if the latest run completed.
    pub fn report(&self) -> Option<&AnalysisReport> {
        self.outcome.as_deref().and_then(AnalysisOutcome::report)
    }

    pub fn update(&mut self, message: Message) -> Command<Message> {
        match message {
            Message::VideoInputChanged(value) => {
                self.video_input = value;
                Command::none()
            }
            Message::CommentCountChanged(count) => {
                self.comment_count = clamp_comment_count(count);
                Command::none()
            }
            Message::AnalyzePressed => self.start_run(),
            Message::AnalysisFinished(result) => {
                self.finish_run(result);
                Command::none()
            }
            Message::ExportPressed => {
                self.export();
                Command::none()
            }
        }
    }

    fn start_run(&mut self) -> Command<Message> {
        if self.running {
            return Command::none();
        }

        self.running = true;
        self.outcome = None;
        self.status = Some(Status::Working(
            "Scraping and analyzing comments...".to_string(),
        ));

        let pipeline = Arc::clone(&self.pipeline);
        let reporter = self.reporter.clone();
        let request = RunRequest {
            video: self.video_input.trim().to_string(),
            comment_count: self.comment_count,
        };
        info!("Run requested for {:?} ({} comments)", request.video, request.comment_count);

        Command::perform(
            async move {
                pipeline.run(request).await.map(Arc::new).map_err(|e| {
                    reporter.report_error(&e);
                    RunFailure::from(&e)
                })
            },
            Message::AnalysisFinished,
        )
    }

    fn finish_run(&mut self, result: Result<Arc<AnalysisOutcome>, RunFailure>) {
        self.running = false;
        match result {
            Ok(outcome) => {
                self.status = Some(match outcome.as_ref() {
                    AnalysisOutcome::Completed(report) => Status::Success(format!(
                        "Analyzed {} comments in {:.1}s",
                        report.aggregate.total_count,
                        report.elapsed().num_milliseconds() as f64 / 1000.0
                    )),
                    AnalysisOutcome::NoComments { .. } => {
                        Status::Warning("No comments found for this video.".to_string())
                    }
                });
                self.outcome = Some(outcome);
            }
            Err(failure) => {
                self.status = Some(Status::Error(format!(
                    "{} [{}]",
                    failure.message, failure.code
                )));
            }
        }
    }

    fn export(&mut self) {
        self.status = Some(match export_report(self.report(), &self.export_dir) {
            Ok(path) => Status::Success(format!("Saved {}", path.display())),
            Err(e) => {
                warn!("Export failed: {}", e);
                Status::Error(format!("{} [{}]", e.user_friendly_message(), e.error_code()))
            }
        });
    }

    pub fn view(&self) -> Element<Message, Theme> {
        let title: Element<Message, Theme> = text(APP_TITLE).size(28).into();
        let subtitle: Element<Message, Theme> =
            text("Analyze audience sentiment from YouTube comments").size(14).into();

        let analyze = button(text("Run Analysis"))
            .padding([8, 16])
            .style(theme::Button::Primary)
            .on_press_maybe((!self.running).then_some(Message::AnalyzePressed));

        let controls = column![
            text_input("Enter YouTube Video URL", &self.video_input)
                .on_input(Message::VideoInputChanged)
                .padding(10),
            row![
                text(format!("Number of comments: {}", self.comment_count))
                    .width(Length::Fixed(220.0)),
                slider(
                    MIN_COMMENT_COUNT..=MAX_COMMENT_COUNT,
                    self.comment_count,
                    Message::CommentCountChanged
                ),
            ]
            .spacing(10)
            .align_items(Alignment::Center),
            analyze,
        ]
        .spacing(12);

        let mut content = Column::new()
            .spacing(20)
            .push(column![title, subtitle].spacing(4))
            .push(controls);

        if let Some(status) = &self.status {
            let line = text(status.message()).size(16);
            content = content.push(match status.color() {
                Some(color) => line.style(color),
                None => line,
            });
        }

        if let Some(report) = self.report() {
            content = content.push(report_view(report));
        }

        container(scrollable(content.padding(20)).height(Length::Fill))
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }
}

fn report_view(report: &AnalysisReport) -> Element<'_, Message, Theme> {
    let clouds = row![
        charts::word_cloud("All Comments", &report.clouds.all, None),
        charts::word_cloud("Positive Comments", &report.clouds.positive, Some(POSITIVE_COLOR)),
        charts::word_cloud("Negative Comments", &report.clouds.negative, Some(NEGATIVE_COLOR)),
    ]
    .spacing(10);

    let samples = row![
        charts::samples(
            "Top Positive Comments",
            &report.aggregate.sample_positive,
            POSITIVE_COLOR
        ),
        charts::samples(
            "Top Negative Comments",
            &report.aggregate.sample_negative,
            NEGATIVE_COLOR
        ),
    ]
    .spacing(10);

    let summary = &report.summary;

    column![
        charts::section_title("Sentiment Distribution"),
        charts::distribution(&report.aggregate),
        charts::section_title("Word Clouds"),
        clouds,
        charts::section_title("Top Keywords (YAKE)"),
        charts::keyword_bars(&report.keywords),
        charts::section_title("Sample Comments"),
        samples,
        charts::section_title("Summary"),
        text(summary.render()).size(15),
        text(format!("{} Overall: {}", summary.verdict.emoji(), summary.verdict)).size(18),
        button(text("Download Results as CSV"))
            .padding([8, 16])
            .on_press(Message::ExportPressed),
    ]
    .spacing(16)
    .into()
}
