use sentiment_core::{
    ClassifierError, ConfigError, CoreError, ErrorExt, ErrorReporter, ExportError, YoutubeError,
};

#[test]
fn test_error_codes() {
    let youtube_error = CoreError::Youtube(YoutubeError::RequestTimeout);
    assert_eq!(youtube_error.error_code(), "YOUTUBE");

    let classifier_error = CoreError::Classifier(ClassifierError::OutputMismatch {
        expected: 3,
        actual: 2,
    });
    assert_eq!(classifier_error.error_code(), "CLASSIFIER");

    let config_error = CoreError::Config(ConfigError::InvalidValue {
        field: "sample_size".to_string(),
        value: "0".to_string(),
    });
    assert_eq!(config_error.error_code(), "CONFIG");

    let export_error = CoreError::Export(ExportError::NothingToExport);
    assert_eq!(export_error.error_code(), "EXPORT");
}

#[test]
fn test_nested_error_codes() {
    assert_eq!(
        YoutubeError::InvalidVideoUrl {
            input: "nope".to_string()
        }
        .error_code(),
        "YOUTUBE_INVALID_URL"
    );
    assert_eq!(
        ClassifierError::UnknownLabel {
            label: "NEUTRAL".to_string()
        }
        .error_code(),
        "CLASSIFIER_UNKNOWN_LABEL"
    );
}

#[test]
fn test_user_friendly_messages() {
    let youtube_error = CoreError::Youtube(YoutubeError::InvalidVideoUrl {
        input: "https://example.com".to_string(),
    });
    let message = youtube_error.user_friendly_message();
    assert!(message.contains("https://example.com"));
    assert!(message.contains("11-character video ID"));

    let config_error = CoreError::Config(ConfigError::InvalidValue {
        field: "keyword_count".to_string(),
        value: "0".to_string(),
    });
    assert!(config_error.user_friendly_message().contains("keyword_count"));

    let classifier_error = CoreError::Classifier(ClassifierError::DownloadFailed {
        repo: "distilbert".to_string(),
        file: "model.safetensors".to_string(),
    });
    assert!(classifier_error
        .user_friendly_message()
        .contains("check your connection"));
}

#[test]
fn test_from_conversions() {
    let err: CoreError = YoutubeError::RateLimited.into();
    assert!(matches!(err, CoreError::Youtube(YoutubeError::RateLimited)));

    let err: CoreError = std::io::Error::new(std::io::ErrorKind::Other, "disk").into();
    assert_eq!(err.error_code(), "IO");
}

#[test]
fn test_error_reporter() {
    let reporter = ErrorReporter::new()
        .with_error_reporting(true)
        .with_warning_reporting(true);
    let error = CoreError::Youtube(YoutubeError::Platform {
        message: "comments are turned off".to_string(),
    });

    // This test just ensures the methods don't panic
    reporter.report_error(&error);
    reporter.report_warning(&error);
}
