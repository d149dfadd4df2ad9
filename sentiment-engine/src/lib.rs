pub mod distilbert;
pub mod loader;

pub use distilbert::DistilBertClassifier;

use once_cell::sync::OnceCell;
use sentiment_core::{AppConfig, Classification, CoreError};
use tracing::info;

/// Capability to label a batch of comments.
///
/// Returns exactly one classification per input, in input order. Calls block
/// for the duration of inference.
pub trait SentimentClassifier: Send + Sync {
    fn model_name(&self) -> &str;

    fn classify_batch(&self, texts: &[String]) -> Result<Vec<Classification>, CoreError>;
}

#[derive(Debug, Clone)]
pub struct ClassifierSettings {
    pub model_repo: String,
    pub max_input_tokens: usize,
}

impl From<&AppConfig> for ClassifierSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            model_repo: config.model_repo.clone(),
            max_input_tokens: config.max_input_tokens,
        }
    }
}

/// Defers downloading and loading the model until the first batch, then reuses it.
pub struct LazyClassifier {
    settings: ClassifierSettings,
    model: OnceCell<DistilBertClassifier>,
}

impl LazyClassifier {
    pub fn new(settings: ClassifierSettings) -> Self {
        Self {
            settings,
            model: OnceCell::new(),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.model.get().is_some()
    }

    fn model(&self) -> Result<&DistilBertClassifier, CoreError> {
        let model = self.model.get_or_try_init(|| {
            info!("Loading sentiment model {}", self.settings.model_repo);
            DistilBertClassifier::load(&self.settings)
        })?;
        Ok(model)
    }
}

impl SentimentClassifier for LazyClassifier {
    fn model_name(&self) -> &str {
        &self.settings.model_repo
    }

    fn classify_batch(&self, texts: &[String]) -> Result<Vec<Classification>, CoreError> {
        self.model()?.classify_batch(texts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_from_config() {
        let config = AppConfig::default();
        let settings = ClassifierSettings::from(&config);
        assert_eq!(
            settings.model_repo,
            "distilbert-base-uncased-finetuned-sst-2-english"
        );
        assert_eq!(settings.max_input_tokens, 512);
    }

    #[test]
    fn test_lazy_classifier_does_not_load_eagerly() {
        let classifier = LazyClassifier::new(ClassifierSettings::from(&AppConfig::default()));
        assert!(!classifier.is_loaded());
        assert_eq!(
            classifier.model_name(),
            "distilbert-base-uncased-finetuned-sst-2-english"
        );
    }
}
