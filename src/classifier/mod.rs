//! Binary text classifier abstraction and implementations.
//!
//! Defines the [`Classifier`] trait and concrete implementations:
//! - **[`DisabledClassifier`]**: always unavailable; every document scores 0.
//! - **[`HttpClassifier`]**: calls a hosted text-classification endpoint
//!   (Hugging Face inference API shape) with retry and backoff.
//! - **`LocalClassifier`**: runs an ONNX sequence-classification model
//!   in-process via tract (feature `local-classifier`).
//!
//! A classifier is constructed once per process with [`create_classifier`]
//! and shared read-only across batches.
//!
//! ```rust
//! use docsift::classifier::create_classifier;
//! use docsift::config::ClassifierConfig;
//!
//! let classifier = create_classifier(&ClassifierConfig::default()).unwrap();
//! assert_eq!(classifier.name(), "disabled");
//! assert!(classifier.classify("some text", 512).is_err());
//! ```
//!
//! # Retry Strategy
//!
//! The HTTP provider uses exponential backoff for transient errors:
//! - HTTP 429 (rate limited), 503 (model loading) and other 5xx → retry
//! - HTTP 4xx (client error, not 429) → fail immediately
//! - Network errors → retry
//! - Backoff: 1s, 2s, 4s, 8s, 16s, 32s (capped at 2^5)

#[cfg(feature = "local-classifier")]
mod local;

#[cfg(feature = "local-classifier")]
pub use local::LocalClassifier;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

use crate::config::ClassifierConfig;

const DEFAULT_INFERENCE_URL: &str = "https://api-inference.huggingface.co/models/{model}";

/// Errors from a classifier capability. Never surfaced per document; the
/// scorer downgrades them to an unscored result.
#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error("classifier unavailable: {0}")]
    Unavailable(String),
    #[error("classifier inference failed: {0}")]
    Inference(String),
    #[error("classifier HTTP error: {0}")]
    Http(String),
}

/// Two-class probability distribution over {human, AI-generated}.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassProbabilities {
    pub human: f64,
    pub ai: f64,
}

impl ClassProbabilities {
    /// Build from a distribution in model output order, reading the AI
    /// class at `ai_class_index`.
    pub fn from_distribution(dist: [f64; 2], ai_class_index: usize) -> Self {
        let ai = dist[ai_class_index.min(1)];
        let human = dist[1 - ai_class_index.min(1)];
        Self { human, ai }
    }

    /// Softmax over two raw logits.
    pub fn from_logits(logits: [f64; 2], ai_class_index: usize) -> Self {
        let max = logits[0].max(logits[1]);
        let e0 = (logits[0] - max).exp();
        let e1 = (logits[1] - max).exp();
        let sum = e0 + e1;
        Self::from_distribution([e0 / sum, e1 / sum], ai_class_index)
    }
}

/// A text classification capability: given text, the probability that it
/// was AI-generated.
///
/// Implementations must be safe to call concurrently; `classify` takes
/// `&self` and must not mutate shared state.
pub trait Classifier: Send + Sync {
    /// Provider/model identifier for logs.
    fn name(&self) -> &str;

    /// Classify `text`, bounded to at most `max_tokens` model tokens.
    fn classify(&self, text: &str, max_tokens: usize)
        -> Result<ClassProbabilities, ClassifierError>;
}

/// Instantiate the classifier selected by `config.provider`.
///
/// Loading failures of an enabled provider are returned as errors; callers
/// that want best-effort scoring can fall back to [`DisabledClassifier`].
pub fn create_classifier(config: &ClassifierConfig) -> Result<Arc<dyn Classifier>> {
    match config.provider.as_str() {
        "disabled" => Ok(Arc::new(DisabledClassifier)),
        "http" => Ok(Arc::new(HttpClassifier::new(config)?)),
        #[cfg(feature = "local-classifier")]
        "local" => Ok(Arc::new(LocalClassifier::new(config)?)),
        #[cfg(not(feature = "local-classifier"))]
        "local" => anyhow::bail!("Local classifier requires --features local-classifier"),
        other => anyhow::bail!("Unknown classifier provider: {}", other),
    }
}

// ============ Disabled ============

/// Classifier used when none is configured. Always unavailable.
pub struct DisabledClassifier;

impl Classifier for DisabledClassifier {
    fn name(&self) -> &str {
        "disabled"
    }

    fn classify(&self, _text: &str, _max_tokens: usize) -> Result<ClassProbabilities, ClassifierError> {
        Err(ClassifierError::Unavailable(
            "no classifier configured".to_string(),
        ))
    }
}

// ============ HTTP ============

/// Classifier backed by a hosted text-classification endpoint.
///
/// Sends `{"inputs": text, "parameters": {"truncation": true, "max_length": N}}`
/// and accepts `[[{"label", "score"}, ...]]` or `[{"label", "score"}, ...]`.
/// If `HF_API_TOKEN` is set it is sent as a bearer token.
pub struct HttpClassifier {
    model: String,
    url: String,
    labels: Vec<String>,
    ai_class_index: usize,
    max_retries: u32,
    token: Option<String>,
    client: reqwest::blocking::Client,
}

impl HttpClassifier {
    pub fn new(config: &ClassifierConfig) -> Result<Self> {
        let model = config
            .model
            .clone()
            .ok_or_else(|| anyhow::anyhow!("classifier.model required for http provider"))?;
        let url = config
            .url
            .as_deref()
            .unwrap_or(DEFAULT_INFERENCE_URL)
            .replace("{model}", &model);

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            model,
            url,
            labels: config.labels.clone(),
            ai_class_index: config.ai_class_index,
            max_retries: config.max_retries,
            token: std::env::var("HF_API_TOKEN").ok(),
            client,
        })
    }

    fn post(&self, body: &serde_json::Value) -> Result<serde_json::Value, ClassifierError> {
        let mut last_err = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = Duration::from_secs(1 << (attempt - 1).min(5));
                std::thread::sleep(delay);
            }

            let mut request = self.client.post(&self.url).json(body);
            if let Some(token) = &self.token {
                request = request.bearer_auth(token);
            }

            match request.send() {
                Ok(response) => {
                    let status = response.status();

                    if status.is_success() {
                        return response
                            .json()
                            .map_err(|e| ClassifierError::Http(e.to_string()));
                    }

                    let body_text = response.text().unwrap_or_default();
                    if status.as_u16() == 429 || status.is_server_error() {
                        last_err = Some(ClassifierError::Http(format!("{}: {}", status, body_text)));
                        continue;
                    }

                    return Err(ClassifierError::Http(format!("{}: {}", status, body_text)));
                }
                Err(e) => {
                    last_err = Some(ClassifierError::Http(e.to_string()));
                    continue;
                }
            }
        }

        Err(last_err.unwrap_or_else(|| {
            ClassifierError::Http("classification failed after retries".to_string())
        }))
    }
}

impl Classifier for HttpClassifier {
    fn name(&self) -> &str {
        &self.model
    }

    fn classify(&self, text: &str, max_tokens: usize) -> Result<ClassProbabilities, ClassifierError> {
        let body = serde_json::json!({
            "inputs": text,
            "parameters": { "truncation": true, "max_length": max_tokens },
        });
        let json = self.post(&body)?;
        let dist = parse_label_scores(&json, &self.labels)?;
        Ok(ClassProbabilities::from_distribution(dist, self.ai_class_index))
    }
}

/// Parse a text-classification response into a distribution in model
/// output order.
fn parse_label_scores(
    json: &serde_json::Value,
    labels: &[String],
) -> Result<[f64; 2], ClassifierError> {
    let mut entries = json
        .as_array()
        .ok_or_else(|| ClassifierError::Inference("response is not an array".to_string()))?;
    // Batched shape: [[{label, score}, ...]]
    if let Some(inner) = entries.first().and_then(|e| e.as_array()) {
        entries = inner;
    }

    let mut dist = [f64::NAN; 2];
    for entry in entries {
        let label = entry
            .get("label")
            .and_then(|l| l.as_str())
            .ok_or_else(|| ClassifierError::Inference("missing label".to_string()))?;
        let score = entry
            .get("score")
            .and_then(|s| s.as_f64())
            .ok_or_else(|| ClassifierError::Inference("missing score".to_string()))?;
        let idx = label_index(label, labels).ok_or_else(|| {
            ClassifierError::Inference(format!("unexpected label '{}'", label))
        })?;
        dist[idx] = score;
    }

    if dist.iter().any(|p| !p.is_finite()) {
        return Err(ClassifierError::Inference(
            "response did not contain both classes".to_string(),
        ));
    }
    Ok(dist)
}

/// `LABEL_<k>` maps to `k`; otherwise the position in `labels`, case-insensitively.
fn label_index(label: &str, labels: &[String]) -> Option<usize> {
    if let Some(k) = label.strip_prefix("LABEL_") {
        return k.parse::<usize>().ok().filter(|k| *k < 2);
    }
    labels.iter().position(|l| l.eq_ignore_ascii_case(label))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels() -> Vec<String> {
        vec!["Fake".to_string(), "Real".to_string()]
    }

    #[test]
    fn disabled_is_unavailable() {
        let err = DisabledClassifier.classify("text", 512).unwrap_err();
        assert!(matches!(err, ClassifierError::Unavailable(_)));
    }

    #[test]
    fn from_distribution_respects_index() {
        let p = ClassProbabilities::from_distribution([0.2, 0.8], 1);
        assert_eq!(p.ai, 0.8);
        assert_eq!(p.human, 0.2);
        let p = ClassProbabilities::from_distribution([0.2, 0.8], 0);
        assert_eq!(p.ai, 0.2);
    }

    #[test]
    fn softmax_sums_to_one() {
        let p = ClassProbabilities::from_logits([1.0, 3.0], 1);
        assert!((p.ai + p.human - 1.0).abs() < 1e-12);
        assert!(p.ai > p.human);
        let p = ClassProbabilities::from_logits([1000.0, 1000.0], 1);
        assert!((p.ai - 0.5).abs() < 1e-12);
    }

    #[test]
    fn parses_nested_named_labels() {
        let json = serde_json::json!([[
            { "label": "Real", "score": 0.9 },
            { "label": "Fake", "score": 0.1 }
        ]]);
        assert_eq!(parse_label_scores(&json, &labels()).unwrap(), [0.1, 0.9]);
    }

    #[test]
    fn default_config_reads_fake_as_ai() {
        let config = ClassifierConfig::default();
        let json = serde_json::json!([
            { "label": "Fake", "score": 0.8 },
            { "label": "Real", "score": 0.2 }
        ]);
        let dist = parse_label_scores(&json, &config.labels).unwrap();
        let p = ClassProbabilities::from_distribution(dist, config.ai_class_index);
        assert_eq!(p.ai, 0.8);
        assert_eq!(p.human, 0.2);
    }

    #[test]
    fn parses_flat_generic_labels() {
        let json = serde_json::json!([
            { "label": "LABEL_1", "score": 0.75 },
            { "label": "LABEL_0", "score": 0.25 }
        ]);
        assert_eq!(parse_label_scores(&json, &labels()).unwrap(), [0.25, 0.75]);
    }

    #[test]
    fn rejects_incomplete_response() {
        let json = serde_json::json!([{ "label": "Real", "score": 0.9 }]);
        assert!(parse_label_scores(&json, &labels()).is_err());
        let json = serde_json::json!({ "error": "Model is loading" });
        assert!(parse_label_scores(&json, &labels()).is_err());
    }

    #[test]
    fn unknown_provider_fails() {
        let config = ClassifierConfig {
            provider: "magic".to_string(),
            ..ClassifierConfig::default()
        };
        assert!(create_classifier(&config).is_err());
    }
}
