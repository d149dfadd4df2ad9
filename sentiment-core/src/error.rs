use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("YouTube error: {0}")]
    Youtube(#[from] YoutubeError),

    #[error("Classifier error: {0}")]
    Classifier(#[from] ClassifierError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

#[derive(Error, Debug, Clone)]
pub enum YoutubeError {
    #[error("Not a recognizable video URL or ID: {input}")]
    InvalidVideoUrl { input: String },

    #[error("Video not found: {video_id}")]
    VideoNotFound { video_id: String },

    #[error("Could not parse watch page: {details}")]
    PageParseFailed { details: String },

    #[error("Sort order '{requested}' is not offered for this video")]
    SortUnavailable { requested: String },

    #[error("Platform reported an error: {message}")]
    Platform { message: String },

    #[error("Rate limit exceeded")]
    RateLimited,

    #[error("Request timeout")]
    RequestTimeout,

    #[error("Invalid API response: {details}")]
    InvalidResponse { details: String },

    #[error("Server error: {status_code}")]
    ServerError { status_code: u16 },
}

#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("Model loading failed for {model}: {reason}")]
    ModelLoadingFailed { model: String, reason: String },

    #[error("Model download failed: {repo}/{file}")]
    DownloadFailed { repo: String, file: String },

    #[error("Tokenization failed: {text_length} characters")]
    TokenizationFailed { text_length: usize },

    #[error("Model inference failed: {reason}")]
    InferenceFailed { reason: String },

    #[error("Model produced a label outside the binary vocabulary: {label}")]
    UnknownLabel { label: String },

    #[error("Classifier returned {actual} results for {expected} inputs")]
    OutputMismatch { expected: usize, actual: usize },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    #[error("Configuration parsing error: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Nothing to export: no completed analysis")]
    NothingToExport,

    #[error("Failed to write {path}: {reason}")]
    WriteFailed { path: String, reason: String },

    #[error("CSV serialization failed: {reason}")]
    Serialization { reason: String },
}
