//! Batch orchestration.
//!
//! Drives every document of a batch through scoring in input order, folds
//! per-document failures into the report, and builds the all-pairs
//! similarity matrix. A batch always yields a complete [`BatchReport`]:
//! one failing document never stops the rest.
//!
//! # Flow
//!
//! ```text
//! InputFile ──extract_inputs──▶ SourceText ──analyze_batch──▶ BatchReport
//!                                   │                              ▲
//!                                   ├── Scorer (normalized text) ──┤
//!                                   └── shingles (raw text) ───────┘
//! ```
//!
//! Scoring and shingling read independent representations of the same raw
//! text; failed documents keep their slot and contribute an empty shingle
//! set so row/column `i` of the matrix is always `files[i]`.

use crate::config::Config;
use crate::extract::{extract_pdf_text, ExtractError};
use crate::intake::InputFile;
use crate::models::{BatchReport, Document, DocumentOutcome, SimilarityMatrix};
use crate::progress::{BatchProgressEvent, ProgressReporter};
use crate::score::Scorer;
use crate::shingle::{shingles, ShingleSet, DEFAULT_SHINGLE_SIZE};
use crate::similarity::similarity_matrix;

/// Extracted text for one named input, or the reason it is missing.
#[derive(Debug, Clone)]
pub struct SourceText {
    pub name: String,
    pub text: Result<String, ExtractError>,
}

impl SourceText {
    pub fn ok(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: Ok(text.into()),
        }
    }

    pub fn failed(name: impl Into<String>, error: ExtractError) -> Self {
        Self {
            name: name.into(),
            text: Err(error),
        }
    }
}

/// Knobs for one batch run.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisOptions {
    pub shingle_size: usize,
    pub preview_chars: usize,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            shingle_size: DEFAULT_SHINGLE_SIZE,
            preview_chars: 200,
        }
    }
}

impl AnalysisOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            shingle_size: config.shingling.n,
            preview_chars: config.report.preview_chars,
        }
    }
}

/// Run PDF extraction over every input, preserving order. Inputs that
/// already failed at intake pass their error through untouched.
pub fn extract_inputs(inputs: Vec<InputFile>) -> Vec<SourceText> {
    inputs
        .into_iter()
        .map(|input| {
            let text = input.content.and_then(|bytes| extract_pdf_text(&bytes));
            if let Err(e) = &text {
                tracing::warn!(name = %input.name, error = %e, "text extraction failed");
            }
            SourceText {
                name: input.name,
                text,
            }
        })
        .collect()
}

/// Analyze a batch: score each document, then compare all pairs.
pub fn analyze_batch(
    sources: Vec<SourceText>,
    scorer: &Scorer,
    options: &AnalysisOptions,
    progress: &dyn ProgressReporter,
) -> BatchReport {
    let total = sources.len() as u64;
    progress.report(BatchProgressEvent::Started { total });

    let mut documents = Vec::with_capacity(sources.len());
    for (i, source) in sources.into_iter().enumerate() {
        progress.report(BatchProgressEvent::Document {
            index: i as u64 + 1,
            total,
            name: source.name.clone(),
        });

        let document = match source.text {
            Err(e) => Document {
                name: source.name,
                text: String::new(),
                outcome: DocumentOutcome::Failed {
                    error: e.to_string(),
                },
            },
            Ok(text) => {
                let score = scorer.score(&text);
                tracing::debug!(name = %source.name, score = score.value(), scored = score.is_scored(), "document scored");
                let preview = preview(&text, options.preview_chars);
                Document {
                    name: source.name,
                    text,
                    outcome: DocumentOutcome::Analyzed { score, preview },
                }
            }
        };
        documents.push(document);
    }

    let matrix = if documents.len() >= 2 {
        let n = documents.len() as u64;
        progress.report(BatchProgressEvent::Similarity {
            pairs: n * (n - 1) / 2,
        });
        let sets: Vec<ShingleSet> = documents
            .iter()
            .map(|d| shingles(&d.text, options.shingle_size))
            .collect();
        Some(similarity_matrix(&sets))
    } else {
        None
    };

    let average_ai_score = average_score(&documents);
    let failed = documents.iter().filter(|d| d.is_failed()).count() as u64;
    progress.report(BatchProgressEvent::Finished { failed, total });
    tracing::info!(total, failed, average_ai_score, "batch analyzed");

    BatchReport {
        files: documents.iter().map(Document::to_file_report).collect(),
        similarity_matrix: matrix,
        average_ai_score,
    }
}

/// Similarity only: shingle every source (failures as empty sets) and
/// compare all pairs. No classifier is involved.
pub fn compare_sources(sources: &[SourceText], shingle_size: usize) -> SimilarityMatrix {
    let sets: Vec<ShingleSet> = sources
        .iter()
        .map(|s| match &s.text {
            Ok(text) => shingles(text, shingle_size),
            Err(_) => ShingleSet::new(),
        })
        .collect();
    similarity_matrix(&sets)
}

/// Mean over non-failed documents. Unscored documents count as 0.
fn average_score(documents: &[Document]) -> f64 {
    let scores: Vec<f64> = documents
        .iter()
        .filter_map(|d| match &d.outcome {
            DocumentOutcome::Analyzed { score, .. } => Some(score.value()),
            DocumentOutcome::Failed { .. } => None,
        })
        .collect();
    if scores.is_empty() {
        0.0
    } else {
        scores.iter().sum::<f64>() / scores.len() as f64
    }
}

/// First `max_chars` characters of `text`, with `...` when truncated.
pub fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// Whether any document of the report received a real score.
pub fn any_scored(report: &BatchReport) -> bool {
    report
        .files
        .iter()
        .any(|f| f.error.is_none() && f.ai_score.is_scored())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{ClassProbabilities, Classifier, ClassifierError, DisabledClassifier};
    use crate::config::ScoringConfig;
    use crate::models::AiScore;
    use crate::progress::SilentProgress;
    use std::sync::{Arc, Mutex};

    /// Answers with the fraction of normalized words equal to "robot".
    struct RobotCounter;

    impl Classifier for RobotCounter {
        fn name(&self) -> &str {
            "robot-counter"
        }

        fn classify(&self, text: &str, _max_tokens: usize) -> Result<ClassProbabilities, ClassifierError> {
            let words: Vec<&str> = text.split_whitespace().collect();
            if words.is_empty() {
                return Err(ClassifierError::Inference("empty input".to_string()));
            }
            let ai = words.iter().filter(|w| **w == "robot").count() as f64 / words.len() as f64;
            Ok(ClassProbabilities { human: 1.0 - ai, ai })
        }
    }

    struct Collect(Mutex<Vec<BatchProgressEvent>>);

    impl ProgressReporter for Collect {
        fn report(&self, event: BatchProgressEvent) {
            self.0.lock().unwrap().push(event);
        }
    }

    fn scorer() -> Scorer {
        Scorer::new(Arc::new(RobotCounter), &ScoringConfig::default())
    }

    fn pdf_error() -> ExtractError {
        ExtractError::Pdf("bad xref".to_string())
    }

    #[test]
    fn mean_excludes_failed_documents() {
        let sources = vec![
            SourceText::ok("a.pdf", "robot robot"),
            SourceText::failed("b.pdf", pdf_error()),
            SourceText::ok("c.pdf", "robot human"),
        ];
        let report = analyze_batch(sources, &scorer(), &AnalysisOptions::default(), &SilentProgress);

        assert_eq!(report.files[0].ai_score, AiScore::Scored(100.0));
        assert_eq!(report.files[2].ai_score, AiScore::Scored(50.0));
        assert_eq!(report.average_ai_score, 75.0);
    }

    #[test]
    fn failed_document_keeps_its_matrix_slot() {
        let sources = vec![
            SourceText::ok("a.pdf", "the cat sat on the mat"),
            SourceText::failed("b.pdf", pdf_error()),
            SourceText::ok("c.pdf", "the cat sat on the rug"),
        ];
        let report = analyze_batch(sources, &scorer(), &AnalysisOptions::default(), &SilentProgress);

        let matrix = report.similarity_matrix.unwrap();
        assert_eq!(matrix.len(), 3);
        assert_eq!(matrix.get(0, 2), 60.0);
        assert_eq!(matrix.get(2, 0), 60.0);
        assert_eq!(matrix.get(1, 0), 0.0);
        assert_eq!(matrix.get(1, 1), 100.0);

        let b = &report.files[1];
        assert_eq!(b.name, "b.pdf");
        assert_eq!(b.error.as_deref(), Some("Error reading PDF: bad xref"));
        assert!(b.text_preview.is_none());
        assert_eq!(b.ai_score.value(), 0.0);
    }

    #[test]
    fn single_document_has_no_matrix() {
        let report = analyze_batch(
            vec![SourceText::ok("only.pdf", "robot essay")],
            &scorer(),
            &AnalysisOptions::default(),
            &SilentProgress,
        );
        assert!(report.similarity_matrix.is_none());
        assert_eq!(report.average_ai_score, 50.0);
        let json = serde_json::to_value(&report).unwrap();
        assert!(json["similarity_matrix"].is_null());
    }

    #[test]
    fn all_failed_batch() {
        let sources = vec![
            SourceText::failed("a.pdf", pdf_error()),
            SourceText::failed("b.pdf", ExtractError::TooLarge { size: 9, limit: 1 }),
        ];
        let report = analyze_batch(sources, &scorer(), &AnalysisOptions::default(), &SilentProgress);
        assert_eq!(report.average_ai_score, 0.0);
        assert!(report.files.iter().all(|f| f.error.is_some()));
        let matrix = report.similarity_matrix.as_ref().unwrap();
        assert_eq!(matrix.rows(), &[vec![100.0, 0.0], vec![0.0, 100.0]]);
        assert!(!any_scored(&report));
    }

    #[test]
    fn empty_batch() {
        let report = analyze_batch(Vec::new(), &scorer(), &AnalysisOptions::default(), &SilentProgress);
        assert!(report.files.is_empty());
        assert!(report.similarity_matrix.is_none());
        assert_eq!(report.average_ai_score, 0.0);
    }

    #[test]
    fn unscored_documents_count_toward_mean_as_zero() {
        let scorer = Scorer::new(Arc::new(DisabledClassifier), &ScoringConfig::default());
        let sources = vec![SourceText::ok("a.pdf", "text"), SourceText::ok("b.pdf", "more text")];
        let report = analyze_batch(sources, &scorer, &AnalysisOptions::default(), &SilentProgress);
        assert_eq!(report.average_ai_score, 0.0);
        assert!(report.files.iter().all(|f| f.error.is_none()));
        assert!(!any_scored(&report));
    }

    #[test]
    fn preview_truncates_on_char_boundary() {
        assert_eq!(preview("short", 200), "short");
        assert_eq!(preview("abcdef", 3), "abc...");
        assert_eq!(preview("héllo wörld", 4), "héll...");
        assert_eq!(preview("exact", 5), "exact");
    }

    #[test]
    fn custom_shingle_size() {
        let sources = vec![SourceText::ok("a.pdf", "one two"), SourceText::ok("b.pdf", "one two")];
        let options = AnalysisOptions {
            shingle_size: 2,
            preview_chars: 10,
        };
        let report = analyze_batch(sources.clone(), &scorer(), &options, &SilentProgress);
        assert_eq!(report.similarity_matrix.unwrap().get(0, 1), 100.0);
        // Two tokens cannot form a trigram.
        assert_eq!(compare_sources(&sources, 3).get(0, 1), 0.0);
    }

    #[test]
    fn reports_progress_in_order() {
        let collect = Collect(Mutex::new(Vec::new()));
        let sources = vec![
            SourceText::ok("a.pdf", "robot"),
            SourceText::failed("b.pdf", pdf_error()),
            SourceText::ok("c.pdf", "human"),
        ];
        analyze_batch(sources, &scorer(), &AnalysisOptions::default(), &collect);
        let events = collect.0.into_inner().unwrap();
        assert_eq!(events.first(), Some(&BatchProgressEvent::Started { total: 3 }));
        assert!(events.contains(&BatchProgressEvent::Document {
            index: 2,
            total: 3,
            name: "b.pdf".to_string()
        }));
        assert!(events.contains(&BatchProgressEvent::Similarity { pairs: 3 }));
        assert_eq!(
            events.last(),
            Some(&BatchProgressEvent::Finished { failed: 1, total: 3 })
        );
    }

    #[test]
    fn extract_passes_intake_errors_through() {
        let inputs = vec![
            InputFile {
                name: "big.pdf".to_string(),
                content: Err(ExtractError::TooLarge { size: 2, limit: 1 }),
            },
            InputFile {
                name: "junk.pdf".to_string(),
                content: Ok(b"not a pdf".to_vec()),
            },
        ];
        let sources = extract_inputs(inputs);
        assert_eq!(sources.len(), 2);
        assert!(matches!(sources[0].text, Err(ExtractError::TooLarge { .. })));
        assert!(matches!(sources[1].text, Err(ExtractError::Pdf(_))));
    }
}
