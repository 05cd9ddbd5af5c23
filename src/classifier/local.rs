//! Tract-based local classifier.
//!
//! Pure-Rust path: loads an ONNX sequence-classification model with
//! tract-onnx and tokenizes with the tokenizers crate. Model files come from
//! `classifier.model_dir` or are downloaded once from the Hugging Face hub
//! into `~/.cache/docsift/models/<model>`.

use anyhow::{bail, Result};
use std::path::{Path, PathBuf};
use tract_onnx::prelude::*;

use super::{ClassProbabilities, Classifier, ClassifierError};
use crate::config::ClassifierConfig;

const ONNX_FILE: &str = "onnx/model.onnx";
const TOKENIZER_FILE: &str = "tokenizer.json";

type Runner = Box<dyn Fn(TVec<TValue>) -> TractResult<TVec<TValue>> + Send + Sync>;

pub struct LocalClassifier {
    model_name: String,
    tokenizer: tokenizers::Tokenizer,
    run: Runner,
    ai_class_index: usize,
}

fn cache_dir() -> Result<PathBuf> {
    let base = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    let dir = PathBuf::from(base)
        .join(".cache")
        .join("docsift")
        .join("models");
    std::fs::create_dir_all(&dir).map_err(|e| anyhow::anyhow!("Create cache dir: {}", e))?;
    Ok(dir)
}

fn download_to_cache(repo: &str, path: &str, cache_path: &Path) -> Result<()> {
    if cache_path.exists() {
        return Ok(());
    }
    let url = format!("https://huggingface.co/{}/resolve/main/{}", repo, path);
    tracing::info!(%url, "downloading classifier model file");
    let resp = reqwest::blocking::get(&url)
        .map_err(|e| anyhow::anyhow!("Download {}: {}", url, e))?
        .error_for_status()
        .map_err(|e| anyhow::anyhow!("Download {}: {}", url, e))?;
    let bytes = resp
        .bytes()
        .map_err(|e| anyhow::anyhow!("Read body: {}", e))?;
    if let Some(parent) = cache_path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| anyhow::anyhow!("Create cache parent: {}", e))?;
    }
    std::fs::write(cache_path, &bytes).map_err(|e| anyhow::anyhow!("Write cache: {}", e))?;
    Ok(())
}

/// Resolve (onnx path, tokenizer path), downloading into the cache if needed.
fn resolve_model_files(config: &ClassifierConfig, model: &str) -> Result<(PathBuf, PathBuf)> {
    if let Some(dir) = &config.model_dir {
        let onnx = [dir.join("model.onnx"), dir.join(ONNX_FILE)]
            .into_iter()
            .find(|p| p.exists())
            .ok_or_else(|| anyhow::anyhow!("model.onnx not found in {}", dir.display()))?;
        let tokenizer = dir.join(TOKENIZER_FILE);
        if !tokenizer.exists() {
            bail!("{} not found in {}", TOKENIZER_FILE, dir.display());
        }
        return Ok((onnx, tokenizer));
    }

    let model_dir = cache_dir()?.join(model.replace('/', "--"));
    let onnx_path = model_dir.join(ONNX_FILE);
    let tokenizer_path = model_dir.join(TOKENIZER_FILE);
    download_to_cache(model, ONNX_FILE, &onnx_path)?;
    download_to_cache(model, TOKENIZER_FILE, &tokenizer_path)?;
    Ok((onnx_path, tokenizer_path))
}

impl LocalClassifier {
    pub fn new(config: &ClassifierConfig) -> Result<Self> {
        let model_name = config
            .model
            .clone()
            .ok_or_else(|| anyhow::anyhow!("classifier.model required for local provider"))?;
        let (onnx_path, tokenizer_path) = resolve_model_files(config, &model_name)?;

        let tokenizer = tokenizers::Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow::anyhow!("Load tokenizer: {}", e))?;

        let model = tract_onnx::onnx()
            .model_for_path(&onnx_path)
            .map_err(|e| anyhow::anyhow!("Load ONNX: {}", e))?
            .into_optimized()
            .map_err(|e| anyhow::anyhow!("Optimize: {}", e))?
            .into_runnable()
            .map_err(|e| anyhow::anyhow!("Build tract runnable: {}", e))?;

        tracing::info!(model = %model_name, path = %onnx_path.display(), "local classifier loaded");

        Ok(Self {
            model_name,
            tokenizer,
            run: Box::new(move |inputs| model.run(inputs)),
            ai_class_index: config.ai_class_index,
        })
    }

    /// Token ids bounded to `max_tokens`, keeping the trailing special token.
    fn encode(&self, text: &str, max_tokens: usize) -> Result<Vec<i64>, ClassifierError> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| ClassifierError::Inference(format!("Tokenize: {}", e)))?;
        let ids = encoding.get_ids();
        let mut out: Vec<i64> = ids.iter().map(|&id| id as i64).collect();
        if out.len() > max_tokens {
            let last = out[out.len() - 1];
            out.truncate(max_tokens.saturating_sub(1));
            out.push(last);
        }
        Ok(out)
    }
}

impl Classifier for LocalClassifier {
    fn name(&self) -> &str {
        &self.model_name
    }

    fn classify(&self, text: &str, max_tokens: usize) -> Result<ClassProbabilities, ClassifierError> {
        let ids = self.encode(text, max_tokens)?;
        let len = ids.len();
        let mask = vec![1i64; len];

        let input_ids = ndarray::Array2::from_shape_vec((1, len), ids)
            .map_err(|e| ClassifierError::Inference(format!("Input ids shape: {}", e)))?;
        let attention_mask = ndarray::Array2::from_shape_vec((1, len), mask)
            .map_err(|e| ClassifierError::Inference(format!("Attention mask shape: {}", e)))?;

        let input_ids_t: Tensor = input_ids.into();
        let attention_mask_t: Tensor = attention_mask.into();
        let result = (self.run)(tvec!(input_ids_t.into(), attention_mask_t.into()))
            .map_err(|e| ClassifierError::Inference(e.to_string()))?;

        let output = result
            .into_iter()
            .next()
            .ok_or_else(|| ClassifierError::Inference("No output tensor".to_string()))?;
        let view = output
            .to_array_view::<f32>()
            .map_err(|e| ClassifierError::Inference(format!("Output to array: {}", e)))?;

        // Logits are [1, 2].
        let logits: Vec<f64> = view.iter().map(|&v| v as f64).collect();
        if logits.len() != 2 {
            return Err(ClassifierError::Inference(format!(
                "Unexpected output shape: {:?}",
                view.shape()
            )));
        }
        Ok(ClassProbabilities::from_logits(
            [logits[0], logits[1]],
            self.ai_class_index,
        ))
    }
}
