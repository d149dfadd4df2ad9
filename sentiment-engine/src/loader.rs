//! Downloading and assembling the classifier's files from the Hugging Face Hub.

use anyhow::{anyhow, Result as AnyhowResult};
use hf_hub::api::sync::Api;
use hf_hub::{Repo, RepoType};
use sentiment_core::ClassifierError;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokenizers::models::wordpiece::WordPiece;
use tokenizers::normalizers::BertNormalizer;
use tokenizers::pre_tokenizers::bert::BertPreTokenizer;
use tokenizers::processors::bert::BertProcessing;
use tokenizers::{Tokenizer, TruncationParams};
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub enum TokenizerSource {
    Json(PathBuf),
    /// Plain WordPiece vocabulary; the uncased BERT pipeline is rebuilt around it.
    Vocab(PathBuf),
}

#[derive(Debug, Clone)]
pub struct ModelFiles {
    pub config: PathBuf,
    pub weights: PathBuf,
    pub tokenizer: TokenizerSource,
}

/// The parts of `config.json` the classification head needs.
#[derive(Debug, Clone, Deserialize)]
pub struct HeadConfig {
    pub dim: usize,
    #[serde(default)]
    pub id2label: HashMap<String, String>,
}

pub fn fetch_model_files(repo_id: &str) -> Result<ModelFiles, ClassifierError> {
    info!("Resolving model files for {}", repo_id);
    let api = Api::new().map_err(|e| ClassifierError::ModelLoadingFailed {
        model: repo_id.to_string(),
        reason: format!("Hugging Face API unavailable: {e}"),
    })?;
    let repo = api.repo(Repo::new(repo_id.to_string(), RepoType::Model));

    let download_failed = |file: &str| ClassifierError::DownloadFailed {
        repo: repo_id.to_string(),
        file: file.to_string(),
    };

    let config = repo
        .get("config.json")
        .map_err(|_| download_failed("config.json"))?;
    let weights = repo
        .get("model.safetensors")
        .or_else(|_| repo.get("pytorch_model.bin"))
        .map_err(|_| download_failed("model.safetensors"))?;
    let tokenizer = match repo.get("tokenizer.json") {
        Ok(path) => TokenizerSource::Json(path),
        Err(_) => {
            debug!("{} has no tokenizer.json, falling back to vocab.txt", repo_id);
            TokenizerSource::Vocab(repo.get("vocab.txt").map_err(|_| download_failed("vocab.txt"))?)
        }
    };

    Ok(ModelFiles {
        config,
        weights,
        tokenizer,
    })
}

pub fn load_tokenizer(source: &TokenizerSource, max_input_tokens: usize) -> AnyhowResult<Tokenizer> {
    let mut tokenizer = match source {
        TokenizerSource::Json(path) => Tokenizer::from_file(path)
            .map_err(|e| anyhow!("Failed to load tokenizer: {e}"))?,
        TokenizerSource::Vocab(path) => wordpiece_tokenizer(path)?,
    };

    tokenizer
        .with_truncation(Some(TruncationParams {
            max_length: max_input_tokens,
            ..Default::default()
        }))
        .map_err(|e| anyhow!("Failed to configure truncation: {e}"))?;
    tokenizer.with_padding(None);

    Ok(tokenizer)
}

fn wordpiece_tokenizer(vocab: &Path) -> AnyhowResult<Tokenizer> {
    let vocab_path = vocab
        .to_str()
        .ok_or_else(|| anyhow!("vocab path is not valid UTF-8: {}", vocab.display()))?;
    let wordpiece = WordPiece::from_file(vocab_path)
        .unk_token("[UNK]".to_string())
        .build()
        .map_err(|e| anyhow!("Failed to read vocab: {e}"))?;

    let mut tokenizer = Tokenizer::new(wordpiece);
    tokenizer.with_normalizer(BertNormalizer::new(true, true, None, true));
    tokenizer.with_pre_tokenizer(BertPreTokenizer);

    let cls = tokenizer
        .token_to_id("[CLS]")
        .ok_or_else(|| anyhow!("vocab has no [CLS] token"))?;
    let sep = tokenizer
        .token_to_id("[SEP]")
        .ok_or_else(|| anyhow!("vocab has no [SEP] token"))?;
    tokenizer.with_post_processor(BertProcessing::new(
        ("[SEP]".to_string(), sep),
        ("[CLS]".to_string(), cls),
    ));

    Ok(tokenizer)
}

pub fn read_head_config(raw: &str) -> AnyhowResult<HeadConfig> {
    let head: HeadConfig = serde_json::from_str(raw)?;
    if head.id2label.is_empty() {
        return Err(anyhow!("config.json has no id2label mapping"));
    }
    Ok(head)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_head_config() {
        let raw = r#"{
            "activation": "gelu",
            "dim": 768,
            "id2label": {"0": "NEGATIVE", "1": "POSITIVE"},
            "model_type": "distilbert"
        }"#;
        let head = read_head_config(raw).unwrap();
        assert_eq!(head.dim, 768);
        assert_eq!(head.id2label.get("1").map(String::as_str), Some("POSITIVE"));
    }

    #[test]
    fn test_head_config_without_labels_rejected() {
        assert!(read_head_config(r#"{"dim": 768}"#).is_err());
    }
}
