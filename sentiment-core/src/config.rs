use crate::error::{ConfigError, CoreError};
use crate::types::SortOrder;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const MIN_COMMENT_COUNT: u32 = 50;
pub const MAX_COMMENT_COUNT: u32 = 500;
pub const DEFAULT_COMMENT_COUNT: u32 = 150;

pub const CONFIG_ENV_VAR: &str = "YT_SENTIMENT_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "yt-sentiment.toml";

const DEFAULT_MODEL_REPO: &str = "distilbert-base-uncased-finetuned-sst-2-english";
const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Clamps a requested comment count into the range the trigger surface allows.
pub fn clamp_comment_count(requested: u32) -> u32 {
    requested.clamp(MIN_COMMENT_COUNT, MAX_COMMENT_COUNT)
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Hugging Face repository of the sentiment classifier.
    pub model_repo: String,
    pub default_comment_count: u32,
    pub sort_order: SortOrder,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Directory the CSV export is written into.
    pub export_dir: PathBuf,
    pub sample_size: usize,
    pub keyword_count: usize,
    pub max_input_tokens: usize,
    /// Additional noise words dropped from word clouds and keywords.
    pub extra_stopwords: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model_repo: DEFAULT_MODEL_REPO.to_string(),
            default_comment_count: DEFAULT_COMMENT_COUNT,
            sort_order: SortOrder::Top,
            request_timeout_secs: 30,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            export_dir: PathBuf::from("."),
            sample_size: 5,
            keyword_count: 15,
            max_input_tokens: 512,
            extra_stopwords: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Resolves the configuration: `$YT_SENTIMENT_CONFIG`, then `./yt-sentiment.toml`,
    /// then built-in defaults.
    pub fn load() -> Result<Self, CoreError> {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            info!("Loading configuration from ${} = {}", CONFIG_ENV_VAR, path);
            return Self::from_file(Path::new(&path));
        }

        let local = Path::new(DEFAULT_CONFIG_FILE);
        if local.exists() {
            info!("Loading configuration from {}", local.display());
            return Self::from_file(local);
        }

        debug!("No configuration file found, using defaults");
        Ok(Self::default())
    }

    pub fn from_file(path: &Path) -> Result<Self, CoreError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
            }
            .into());
        }

        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, CoreError> {
        let config: AppConfig = toml::from_str(raw).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.model_repo.trim().is_empty() {
            return Err(invalid("model_repo", &self.model_repo));
        }
        if !(MIN_COMMENT_COUNT..=MAX_COMMENT_COUNT).contains(&self.default_comment_count) {
            return Err(invalid(
                "default_comment_count",
                &self.default_comment_count.to_string(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(invalid("request_timeout_secs", "0"));
        }
        if self.user_agent.trim().is_empty() {
            return Err(invalid("user_agent", &self.user_agent));
        }
        if self.sample_size == 0 {
            return Err(invalid("sample_size", "0"));
        }
        if self.keyword_count == 0 {
            return Err(invalid("keyword_count", "0"));
        }
        if self.max_input_tokens < 8 {
            return Err(invalid(
                "max_input_tokens",
                &self.max_input_tokens.to_string(),
            ));
        }
        Ok(())
    }
}

fn invalid(field: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.default_comment_count, 150);
        assert_eq!(config.sample_size, 5);
        assert_eq!(config.keyword_count, 15);
        assert_eq!(config.sort_order, SortOrder::Top);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            default_comment_count = 300
            sort_order = "newest"
            extra_stopwords = ["lol", "bro"]
            "#,
        )
        .unwrap();

        assert_eq!(config.default_comment_count, 300);
        assert_eq!(config.sort_order, SortOrder::Newest);
        assert_eq!(config.extra_stopwords, vec!["lol", "bro"]);
        assert_eq!(config.model_repo, DEFAULT_MODEL_REPO);
    }

    #[test]
    fn test_out_of_range_comment_count_rejected() {
        let err = AppConfig::from_toml_str("default_comment_count = 10").unwrap_err();
        assert!(matches!(
            err,
            CoreError::Config(ConfigError::InvalidValue { ref field, .. }) if field == "default_comment_count"
        ));
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let err = AppConfig::from_toml_str("sort_order = ").unwrap_err();
        assert!(matches!(err, CoreError::Config(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_file() {
        let err = AppConfig::from_file(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Config(ConfigError::FileNotFound { .. })
        ));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "export_dir = \"/tmp/exports\"").unwrap();
        writeln!(file, "request_timeout_secs = 5").unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.export_dir, PathBuf::from("/tmp/exports"));
        assert_eq!(config.request_timeout_secs, 5);
    }

    #[test]
    fn test_clamp_comment_count() {
        assert_eq!(clamp_comment_count(0), 50);
        assert_eq!(clamp_comment_count(150), 150);
        assert_eq!(clamp_comment_count(10_000), 500);
    }
}
