use gui::{App, LaunchFlags, APP_TITLE};
use iced::{Application, Settings};
use insight_engine::{AnalysisPipeline, PipelineSettings};
use sentiment_core::{AppConfig, CoreError, ErrorExt, ErrorReporter};
use sentiment_engine::{ClassifierSettings, LazyClassifier};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use youtube_client::YoutubeCommentClient;

const DEFAULT_LOG_FILTER: &str =
    "yt_sentiment=debug,gui=debug,insight_engine=debug,youtube_client=info,sentiment_engine=info";

fn main() -> Result<(), CoreError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    tracing::info!("Starting {}", APP_TITLE);

    let reporter = ErrorReporter::new();
    let (config, startup_warning) = match AppConfig::load() {
        Ok(config) => (config, None),
        Err(e) => {
            reporter.report_warning(&e);
            let warning = format!("{} Using default settings.", e.user_friendly_message());
            (AppConfig::default(), Some(warning))
        }
    };

    let source = YoutubeCommentClient::new(
        config.user_agent.clone(),
        Duration::from_secs(config.request_timeout_secs),
    )?;
    let classifier = LazyClassifier::new(ClassifierSettings::from(&config));
    let pipeline = AnalysisPipeline::new(
        Arc::new(source),
        Arc::new(classifier),
        PipelineSettings::from(&config),
    );

    let flags = LaunchFlags {
        pipeline: Arc::new(pipeline),
        export_dir: config.export_dir.clone(),
        default_comment_count: config.default_comment_count,
        startup_warning,
    };

    let settings = Settings {
        window: iced::window::Settings {
            size: iced::Size::new(1200.0, 800.0),
            min_size: Some(iced::Size::new(800.0, 600.0)),
            ..Default::default()
        },
        ..Settings::with_flags(flags)
    };

    SentimentApp::run(settings).map_err(|e| {
        tracing::error!("Application error: {}", e);
        CoreError::Internal {
            message: format!("GUI error: {e}"),
        }
    })
}

struct SentimentApp {
    app: App,
}

impl Application for SentimentApp {
    type Message = gui::Message;
    type Theme = iced::Theme;
    type Executor = iced::executor::Default;
    type Flags = LaunchFlags;

    fn new(flags: Self::Flags) -> (Self, iced::Command<Self::Message>) {
        tracing::info!("Initializing application");
        (
            Self {
                app: App::new(flags),
            },
            iced::Command::none(),
        )
    }

    fn title(&self) -> String {
        APP_TITLE.to_string()
    }

    fn update(&mut self, message: Self::Message) -> iced::Command<Self::Message> {
        self.app.update(message)
    }

    fn view(&self) -> iced::Element<Self::Message> {
        self.app.view()
    }
}
