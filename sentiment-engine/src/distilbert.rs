use crate::loader::{self, HeadConfig};
use crate::{ClassifierSettings, SentimentClassifier};
use anyhow::Result as AnyhowResult;
use candle_core::{DType, Device, Tensor, D};
use candle_nn::{ops::softmax, Linear, Module, VarBuilder};
use candle_transformers::models::distilbert::{Config, DistilBertModel};
use sentiment_core::{Classification, ClassifierError, CoreError, SentimentLabel};
use std::collections::HashMap;
use tokenizers::Tokenizer;
use tracing::{debug, info};

/// DistilBERT fine-tuned for binary sentence sentiment (SST-2 style head).
pub struct DistilBertClassifier {
    model: DistilBertModel,
    pre_classifier: Linear,
    classifier: Linear,
    tokenizer: Tokenizer,
    id2label: HashMap<String, String>,
    device: Device,
    model_repo: String,
}

impl DistilBertClassifier {
    pub fn load(settings: &ClassifierSettings) -> Result<Self, ClassifierError> {
        let repo = settings.model_repo.as_str();
        let files = loader::fetch_model_files(repo)?;

        Self::from_files(&files, settings).map_err(|e| ClassifierError::ModelLoadingFailed {
            model: repo.to_string(),
            reason: e.to_string(),
        })
    }

    fn from_files(files: &loader::ModelFiles, settings: &ClassifierSettings) -> AnyhowResult<Self> {
        let device = Device::Cpu;
        let raw_config = std::fs::read_to_string(&files.config)?;
        let config: Config = serde_json::from_str(&raw_config)?;
        let head: HeadConfig = loader::read_head_config(&raw_config)?;

        let vb = if files
            .weights
            .extension()
            .is_some_and(|e| e == "safetensors")
        {
            unsafe { VarBuilder::from_mmaped_safetensors(&[&files.weights], DType::F32, &device)? }
        } else {
            VarBuilder::from_pth(&files.weights, DType::F32, &device)?
        };

        let model = DistilBertModel::load(vb.pp("distilbert"), &config)?;
        let pre_classifier = candle_nn::linear(head.dim, head.dim, vb.pp("pre_classifier"))?;
        let classifier = candle_nn::linear(head.dim, head.id2label.len(), vb.pp("classifier"))?;
        let tokenizer = loader::load_tokenizer(&files.tokenizer, settings.max_input_tokens)?;

        info!(
            "Loaded {} with labels {:?}",
            settings.model_repo, head.id2label
        );

        Ok(Self {
            model,
            pre_classifier,
            classifier,
            tokenizer,
            id2label: head.id2label,
            device,
            model_repo: settings.model_repo.clone(),
        })
    }

    pub fn classify(&self, text: &str) -> Result<Classification, ClassifierError> {
        let encoding = self.tokenizer.encode(text, true).map_err(|e| {
            debug!("Tokenization error: {}", e);
            ClassifierError::TokenizationFailed {
                text_length: text.chars().count(),
            }
        })?;

        let probs = self
            .probabilities(encoding.get_ids())
            .map_err(|e| ClassifierError::InferenceFailed {
                reason: e.to_string(),
            })?;

        select_label(&probs, &self.id2label)
    }

    fn probabilities(&self, ids: &[u32]) -> candle_core::Result<Vec<f32>> {
        let seq_len = ids.len();
        let input_ids = Tensor::new(ids, &self.device)?.unsqueeze(0)?;
        // Single unpadded sequence: nothing is masked.
        let mask = Tensor::zeros((seq_len, seq_len), DType::U8, &self.device)?;

        let hidden = self.model.forward(&input_ids, &mask)?;
        let cls = hidden.narrow(1, 0, 1)?.squeeze(1)?;
        let pooled = self.pre_classifier.forward(&cls)?.relu()?;
        let logits = self.classifier.forward(&pooled)?;

        softmax(&logits, D::Minus1)?.squeeze(0)?.to_vec1::<f32>()
    }
}

impl SentimentClassifier for DistilBertClassifier {
    fn model_name(&self) -> &str {
        &self.model_repo
    }

    fn classify_batch(&self, texts: &[String]) -> Result<Vec<Classification>, CoreError> {
        let mut results = Vec::with_capacity(texts.len());
        for (index, text) in texts.iter().enumerate() {
            results.push(self.classify(text)?);
            if (index + 1) % 50 == 0 {
                debug!("Classified {}/{} comments", index + 1, texts.len());
            }
        }
        Ok(results)
    }
}

/// Picks the most probable class and maps it onto the binary label vocabulary.
pub fn select_label(
    probs: &[f32],
    id2label: &HashMap<String, String>,
) -> Result<Classification, ClassifierError> {
    let (best, score) = probs
        .iter()
        .copied()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .ok_or_else(|| ClassifierError::InferenceFailed {
            reason: "model returned no class probabilities".to_string(),
        })?;

    let raw = id2label
        .get(&best.to_string())
        .ok_or_else(|| ClassifierError::UnknownLabel {
            label: format!("id {best}"),
        })?;
    let label =
        SentimentLabel::from_model_label(raw).ok_or_else(|| ClassifierError::UnknownLabel {
            label: raw.clone(),
        })?;

    Ok(Classification { label, score })
}
