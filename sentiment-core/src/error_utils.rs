use crate::error::*;
use tracing::{error, info, warn};

pub trait ErrorExt {
    fn log_error(&self) -> &Self;
    fn log_warn(&self) -> &Self;
    fn user_friendly_message(&self) -> String;
    fn error_code(&self) -> String;
}

impl ErrorExt for CoreError {
    fn log_error(&self) -> &Self {
        error!("CoreError: {}", self);
        match self {
            CoreError::Youtube(e) => {
                error!("YouTube error details: {:?}", e);
            }
            CoreError::Classifier(e) => {
                error!("Classifier error details: {:?}", e);
            }
            CoreError::Config(e) => {
                error!("Configuration error details: {:?}", e);
            }
            CoreError::Export(e) => {
                error!("Export error details: {:?}", e);
            }
            _ => {}
        }
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("CoreError (warning): {}", self);
        self
    }

    fn user_friendly_message(&self) -> String {
        match self {
            CoreError::Youtube(e) => e.user_friendly_message(),
            CoreError::Classifier(e) => e.user_friendly_message(),
            CoreError::Config(e) => e.user_friendly_message(),
            CoreError::Export(e) => e.user_friendly_message(),
            CoreError::Network(_) => {
                "Network connection error. Please check your internet connection.".to_string()
            }
            CoreError::InvalidInput { message } => {
                format!("Invalid input: {}. Please check your input and try again.", message)
            }
            CoreError::Io(e) => format!("File system error: {}", e),
            _ => "An unexpected error occurred. Please try again later.".to_string(),
        }
    }

    fn error_code(&self) -> String {
        match self {
            CoreError::Youtube(_) => "YOUTUBE".to_string(),
            CoreError::Classifier(_) => "CLASSIFIER".to_string(),
            CoreError::Config(_) => "CONFIG".to_string(),
            CoreError::Export(_) => "EXPORT".to_string(),
            CoreError::Io(_) => "IO".to_string(),
            CoreError::Serialization(_) => "SERIALIZATION".to_string(),
            CoreError::Network(_) => "NETWORK".to_string(),
            CoreError::InvalidInput { .. } => "INVALID_INPUT".to_string(),
            CoreError::Internal { .. } => "INTERNAL".to_string(),
        }
    }
}

impl ErrorExt for YoutubeError {
    fn log_error(&self) -> &Self {
        error!("YoutubeError: {}", self);
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("YoutubeError (warning): {}", self);
        self
    }

    fn user_friendly_message(&self) -> String {
        match self {
            YoutubeError::InvalidVideoUrl { input } => format!(
                "'{}' is not a YouTube video link or ID. Paste a full watch URL or an 11-character video ID.",
                input
            ),
            YoutubeError::VideoNotFound { video_id } => {
                format!("Video '{}' could not be found or is private.", video_id)
            }
            YoutubeError::SortUnavailable { requested } => format!(
                "YouTube does not offer '{}' sorting for this video.",
                requested
            ),
            YoutubeError::Platform { message } => {
                format!("YouTube refused the request: {}", message)
            }
            YoutubeError::RateLimited => {
                "YouTube is rate limiting requests. Please wait a moment and run again.".to_string()
            }
            YoutubeError::RequestTimeout => {
                "Request to YouTube timed out. Please try again.".to_string()
            }
            _ => "Error scraping comments from YouTube. Please try again later.".to_string(),
        }
    }

    fn error_code(&self) -> String {
        match self {
            YoutubeError::InvalidVideoUrl { .. } => "YOUTUBE_INVALID_URL".to_string(),
            YoutubeError::VideoNotFound { .. } => "YOUTUBE_VIDEO_NOT_FOUND".to_string(),
            YoutubeError::PageParseFailed { .. } => "YOUTUBE_PAGE_PARSE_FAILED".to_string(),
            YoutubeError::SortUnavailable { .. } => "YOUTUBE_SORT_UNAVAILABLE".to_string(),
            YoutubeError::Platform { .. } => "YOUTUBE_PLATFORM_ERROR".to_string(),
            YoutubeError::RateLimited => "YOUTUBE_RATE_LIMIT".to_string(),
            YoutubeError::RequestTimeout => "YOUTUBE_TIMEOUT".to_string(),
            YoutubeError::InvalidResponse { .. } => "YOUTUBE_INVALID_RESPONSE".to_string(),
            YoutubeError::ServerError { .. } => "YOUTUBE_SERVER_ERROR".to_string(),
        }
    }
}

impl ErrorExt for ClassifierError {
    fn log_error(&self) -> &Self {
        error!("ClassifierError: {}", self);
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("ClassifierError (warning): {}", self);
        self
    }

    fn user_friendly_message(&self) -> String {
        match self {
            ClassifierError::ModelLoadingFailed { model, .. } => format!(
                "Failed to load sentiment model '{}'. Please try again.",
                model
            ),
            ClassifierError::DownloadFailed { repo, .. } => format!(
                "Failed to download sentiment model '{}'. Please check your connection.",
                repo
            ),
            ClassifierError::TokenizationFailed { .. } => {
                "A comment could not be tokenized for sentiment analysis.".to_string()
            }
            ClassifierError::UnknownLabel { label } => format!(
                "The sentiment model returned an unsupported label '{}'.",
                label
            ),
            _ => "Sentiment analysis failed. Please try again.".to_string(),
        }
    }

    fn error_code(&self) -> String {
        match self {
            ClassifierError::ModelLoadingFailed { .. } => "CLASSIFIER_MODEL_LOAD_FAILED".to_string(),
            ClassifierError::DownloadFailed { .. } => "CLASSIFIER_DOWNLOAD_FAILED".to_string(),
            ClassifierError::TokenizationFailed { .. } => {
                "CLASSIFIER_TOKENIZATION_FAILED".to_string()
            }
            ClassifierError::InferenceFailed { .. } => "CLASSIFIER_INFERENCE_FAILED".to_string(),
            ClassifierError::UnknownLabel { .. } => "CLASSIFIER_UNKNOWN_LABEL".to_string(),
            ClassifierError::OutputMismatch { .. } => "CLASSIFIER_OUTPUT_MISMATCH".to_string(),
        }
    }
}

impl ErrorExt for ConfigError {
    fn log_error(&self) -> &Self {
        error!("ConfigError: {}", self);
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("ConfigError (warning): {}", self);
        self
    }

    fn user_friendly_message(&self) -> String {
        match self {
            ConfigError::FileNotFound { path } => {
                format!("Configuration file '{}' not found.", path)
            }
            ConfigError::InvalidValue { field, .. } => {
                format!("Invalid value for configuration field '{}'.", field)
            }
            ConfigError::Parse(_) => {
                "Configuration file format is invalid. Please check the settings.".to_string()
            }
        }
    }

    fn error_code(&self) -> String {
        match self {
            ConfigError::FileNotFound { .. } => "CONFIG_FILE_NOT_FOUND".to_string(),
            ConfigError::InvalidValue { .. } => "CONFIG_INVALID_VALUE".to_string(),
            ConfigError::Parse(_) => "CONFIG_PARSE_ERROR".to_string(),
        }
    }
}

impl ErrorExt for ExportError {
    fn log_error(&self) -> &Self {
        error!("ExportError: {}", self);
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("ExportError (warning): {}", self);
        self
    }

    fn user_friendly_message(&self) -> String {
        match self {
            ExportError::NothingToExport => {
                "Run an analysis before downloading the results.".to_string()
            }
            ExportError::WriteFailed { path, .. } => {
                format!("Could not write '{}'. Please check folder permissions.", path)
            }
            ExportError::Serialization { .. } => {
                "Could not convert the results to CSV.".to_string()
            }
        }
    }

    fn error_code(&self) -> String {
        match self {
            ExportError::NothingToExport => "EXPORT_NOTHING_TO_EXPORT".to_string(),
            ExportError::WriteFailed { .. } => "EXPORT_WRITE_FAILED".to_string(),
            ExportError::Serialization { .. } => "EXPORT_SERIALIZATION".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ErrorReporter {
    report_errors: bool,
    report_warnings: bool,
}

impl ErrorReporter {
    pub fn new() -> Self {
        Self {
            report_errors: true,
            report_warnings: true,
        }
    }

    pub fn with_error_reporting(mut self, enabled: bool) -> Self {
        self.report_errors = enabled;
        self
    }

    pub fn with_warning_reporting(mut self, enabled: bool) -> Self {
        self.report_warnings = enabled;
        self
    }

    pub fn report_error(&self, error: &CoreError) {
        if self.report_errors {
            error.log_error();
            info!("Error code: {}", error.error_code());
            info!("User message: {}", error.user_friendly_message());
        }
    }

    pub fn report_warning(&self, error: &CoreError) {
        if self.report_warnings {
            error.log_warn();
        }
    }
}

impl Default for ErrorReporter {
    fn default() -> Self {
        Self::new()
    }
}
