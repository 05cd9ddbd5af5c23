//! Core data models used throughout docsift.
//!
//! These types represent the documents and reports that flow through the
//! batch analysis pipeline. [`BatchReport`] serializes to the JSON shape
//! consumed by presentation layers:
//!
//! ```json
//! {
//!   "files": [{ "name": "a.pdf", "ai_score": 12.5, "text_preview": "..." },
//!             { "name": "b.pdf", "ai_score": 0.0, "error": "Error reading PDF: ..." }],
//!   "similarity_matrix": [[100.0, 0.0], [0.0, 100.0]],
//!   "average_ai_score": 12.5
//! }
//! ```

use serde::{Serialize, Serializer};

/// AI-likelihood score on a 0–100 scale.
///
/// `Unscored` means the classifier was unavailable or failed for this
/// document. On the wire it is indistinguishable from a real `0.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AiScore {
    Scored(f64),
    Unscored,
}

impl AiScore {
    pub fn value(&self) -> f64 {
        match self {
            AiScore::Scored(v) => *v,
            AiScore::Unscored => 0.0,
        }
    }

    pub fn is_scored(&self) -> bool {
        matches!(self, AiScore::Scored(_))
    }
}

impl Serialize for AiScore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.value())
    }
}

/// Result of processing one input file.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentOutcome {
    Analyzed { score: AiScore, preview: String },
    Failed { error: String },
}

/// One document of a batch. Lives only for the duration of the batch.
#[derive(Debug, Clone)]
pub struct Document {
    /// Sanitized original filename. Not unique.
    pub name: String,
    /// Raw extracted text; empty for failed documents.
    pub text: String,
    pub outcome: DocumentOutcome,
}

impl Document {
    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, DocumentOutcome::Failed { .. })
    }

    pub fn to_file_report(&self) -> FileReport {
        match &self.outcome {
            DocumentOutcome::Analyzed { score, preview } => FileReport {
                name: self.name.clone(),
                ai_score: *score,
                text_preview: Some(preview.clone()),
                error: None,
            },
            DocumentOutcome::Failed { error } => FileReport {
                name: self.name.clone(),
                ai_score: AiScore::Unscored,
                text_preview: None,
                error: Some(error.clone()),
            },
        }
    }
}

/// Per-file entry of the report.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FileReport {
    pub name: String,
    pub ai_score: AiScore,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_preview: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Symmetric N×N similarity percentages; row/column `i` is `files[i]`.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(transparent)]
pub struct SimilarityMatrix(pub Vec<Vec<f64>>);

impl SimilarityMatrix {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.0[i][j]
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.0
    }
}

/// Aggregate output of one batch.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub files: Vec<FileReport>,
    /// Present only when the batch has at least two documents.
    pub similarity_matrix: Option<SimilarityMatrix>,
    /// Mean score over documents that did not fail; 0 when none succeeded.
    pub average_ai_score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_document_omits_preview() {
        let doc = Document {
            name: "b.pdf".to_string(),
            text: String::new(),
            outcome: DocumentOutcome::Failed {
                error: "bad".to_string(),
            },
        };
        let json = serde_json::to_value(doc.to_file_report()).unwrap();
        assert_eq!(json["ai_score"], 0.0);
        assert_eq!(json["error"], "bad");
        assert!(json.get("text_preview").is_none());
    }

    #[test]
    fn report_serializes_null_matrix() {
        let report = BatchReport {
            files: vec![FileReport {
                name: "a.pdf".to_string(),
                ai_score: AiScore::Scored(42.5),
                text_preview: Some("hello".to_string()),
                error: None,
            }],
            similarity_matrix: None,
            average_ai_score: 42.5,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert!(json["similarity_matrix"].is_null());
        assert_eq!(json["files"][0]["ai_score"], 42.5);
        assert!(json["files"][0].get("error").is_none());
        assert_eq!(json["average_ai_score"], 42.5);
    }

    #[test]
    fn unscored_serializes_as_zero() {
        assert_eq!(serde_json::to_string(&AiScore::Unscored).unwrap(), "0.0");
        assert!(!AiScore::Unscored.is_scored());
    }
}
