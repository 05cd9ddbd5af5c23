//! AI-likelihood scoring.
//!
//! Normalizes the text, hands it to the injected [`Classifier`], and
//! rescales the AI-class probability to 0–100. Classifier failures are
//! logged and yield [`AiScore::Unscored`]; scoring never fails a document.

use std::sync::Arc;

use crate::classifier::Classifier;
use crate::config::ScoringConfig;
use crate::models::AiScore;
use crate::normalize::Normalizer;

pub struct Scorer {
    classifier: Arc<dyn Classifier>,
    normalizer: Normalizer,
    max_tokens: usize,
}

impl Scorer {
    pub fn new(classifier: Arc<dyn Classifier>, config: &ScoringConfig) -> Self {
        Self {
            classifier,
            normalizer: Normalizer::new(),
            max_tokens: config.max_tokens,
        }
    }

    pub fn classifier_name(&self) -> &str {
        self.classifier.name()
    }

    /// Score raw extracted text.
    pub fn score(&self, text: &str) -> AiScore {
        let normalized = self.normalizer.normalize(text);
        match self.classifier.classify(&normalized, self.max_tokens) {
            Ok(probs) if probs.ai.is_finite() => AiScore::Scored((probs.ai * 100.0).clamp(0.0, 100.0)),
            Ok(probs) => {
                tracing::warn!(
                    classifier = self.classifier.name(),
                    ai = probs.ai,
                    "classifier returned a non-finite probability"
                );
                AiScore::Unscored
            }
            Err(e) => {
                tracing::warn!(classifier = self.classifier.name(), error = %e, "scoring skipped");
                AiScore::Unscored
            }
        }
    }
}
