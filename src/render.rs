//! Report rendering for the CLI.
//!
//! `json` is the wire shape of [`BatchReport`], pretty-printed. `text` is a
//! terminal summary: one row per file, the batch average, and the
//! similarity matrix labelled by file index.

use std::fmt::Write;

use anyhow::Result;

use crate::models::{BatchReport, FileReport, SimilarityMatrix};

/// Output format for `docsift analyze`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => anyhow::bail!("Unknown format '{}'. Use text or json.", other),
        }
    }
}

pub fn render(report: &BatchReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => render_json(report),
        OutputFormat::Text => Ok(render_text(report)),
    }
}

pub fn render_json(report: &BatchReport) -> Result<String> {
    let mut out = serde_json::to_string_pretty(report)?;
    out.push('\n');
    Ok(out)
}

pub fn render_text(report: &BatchReport) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "docsift: batch report");
    let _ = writeln!(out, "=====================");
    let _ = writeln!(out);
    let _ = writeln!(out, "  {:>3}  {:<32} {:>8}   {}", "#", "FILE", "AI SCORE", "STATUS");
    let _ = writeln!(out, "  {}", "-".repeat(72));
    for (i, file) in report.files.iter().enumerate() {
        let _ = writeln!(
            out,
            "  {:>3}  {:<32} {:>8}   {}",
            i,
            truncate_name(&file.name, 32),
            score_cell(file),
            file.error.as_deref().unwrap_or("ok")
        );
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "  Average AI score: {:.2}", report.average_ai_score);

    match &report.similarity_matrix {
        Some(matrix) => {
            let _ = writeln!(out);
            let _ = writeln!(out, "  Similarity (% shared n-gram shingles):");
            out.push_str(&render_matrix(matrix));
        }
        None => {
            let _ = writeln!(out);
            let _ = writeln!(out, "  Similarity: n/a (fewer than two documents)");
        }
    }

    out
}

/// The matrix alone, rows and columns labelled by file index.
pub fn render_matrix(matrix: &SimilarityMatrix) -> String {
    let mut out = String::new();
    let _ = write!(out, "  {:>5}", "");
    for j in 0..matrix.len() {
        let _ = write!(out, " {:>7}", j);
    }
    let _ = writeln!(out);
    for (i, row) in matrix.rows().iter().enumerate() {
        let _ = write!(out, "  {:>5}", i);
        for value in row {
            let _ = write!(out, " {:>7.2}", value);
        }
        let _ = writeln!(out);
    }
    out
}

fn score_cell(file: &FileReport) -> String {
    if file.error.is_some() || !file.ai_score.is_scored() {
        "n/a".to_string()
    } else {
        format!("{:.2}", file.ai_score.value())
    }
}

fn truncate_name(name: &str, width: usize) -> String {
    if name.chars().count() <= width {
        name.to_string()
    } else {
        let keep: String = name.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", keep)
    }
}
