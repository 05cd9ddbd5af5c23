//! # docsift CLI
//!
//! The `docsift` binary analyzes batches of PDF documents. Every command
//! accepts a `--config` flag pointing to a TOML configuration file; when the
//! file does not exist, built-in defaults are used.
//!
//! ## Usage
//!
//! ```bash
//! docsift --config ./config/docsift.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `docsift analyze <PATH>...` | Score every document and compare all pairs |
//! | `docsift similarity <PATH>...` | Pairwise n-gram similarity only |
//! | `docsift normalize [FILE]` | Print the classifier-facing normalized text |
//! | `docsift classifiers` | Show the configured classifier and whether it loads |
//!
//! ## Examples
//!
//! ```bash
//! # Analyze a folder of submissions, human-readable
//! docsift analyze ./submissions
//!
//! # Analyze a zip bundle and write the JSON report to a file
//! docsift analyze batch.zip --format json --output report.json
//!
//! # Compare documents with 4-word shingles
//! docsift similarity a.pdf b.pdf c.pdf --n 4
//! ```

use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use docsift::classifier::{create_classifier, Classifier, DisabledClassifier};
use docsift::config::{self, ClassifierConfig, Config};
use docsift::extract::extract_pdf_text;
use docsift::intake::collect_inputs;
use docsift::normalize::Normalizer;
use docsift::pipeline::{self, AnalysisOptions};
use docsift::progress::{ProgressMode, ProgressReporter, SilentProgress};
use docsift::render::{self, OutputFormat};
use docsift::score::Scorer;

/// docsift: AI-authorship scoring and pairwise similarity for PDF batches.
#[derive(Parser)]
#[command(
    name = "docsift",
    about = "Batch PDF analysis: AI-authorship scoring and pairwise n-gram similarity",
    version,
    long_about = "docsift extracts text from a batch of PDF documents (loose files, \
    directories, or zip bundles), scores each document for likely AI authorship with a \
    pluggable classifier, and reports the Jaccard overlap of word n-grams between every pair."
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/docsift.toml`. Built-in defaults apply when the
    /// file does not exist.
    #[arg(long, global = true, default_value = "./config/docsift.toml")]
    config: PathBuf,

    /// Log at info level instead of warn. `RUST_LOG` overrides both.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a batch of documents.
    ///
    /// Collects PDFs from the given files, directories, and zip archives,
    /// extracts their text, scores each one, and compares all pairs.
    /// Documents that cannot be read are reported with an error and do not
    /// stop the batch.
    Analyze {
        /// PDF files, zip archives, or directories to scan.
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Output format: `text` or `json`.
        #[arg(long, default_value = "text")]
        format: String,

        /// Write the report to this file instead of stdout.
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Progress on stderr: `off`, `human`, or `json`.
        /// Defaults to `human` when stderr is a terminal.
        #[arg(long)]
        progress: Option<String>,

        /// Suppress progress output.
        #[arg(long, short)]
        quiet: bool,
    },

    /// Compute pairwise similarity only; no classifier is loaded.
    Similarity {
        /// PDF files, zip archives, or directories to scan.
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Shingle width in words. Overrides `[shingling].n`.
        #[arg(long)]
        n: Option<usize>,

        /// Output format: `text` or `json`.
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Print the normalized text the classifier would see.
    ///
    /// Reads a PDF or plain-text file, or stdin when no file is given.
    Normalize {
        file: Option<PathBuf>,
    },

    /// Show the configured classifier and whether it loads.
    Classifiers,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "docsift=info"
    } else {
        "docsift=warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cfg = config::load_or_default(&cli.config)?;

    match cli.command {
        Commands::Analyze {
            paths,
            format,
            output,
            progress,
            quiet,
        } => {
            let format = OutputFormat::parse(&format)?;
            let reporter: Box<dyn ProgressReporter> = if quiet {
                Box::new(SilentProgress)
            } else {
                match progress {
                    Some(mode) => ProgressMode::parse(&mode)?.reporter(),
                    None => ProgressMode::default_for_tty().reporter(),
                }
            };
            let rendered = tokio::task::spawn_blocking(move || {
                run_analyze(&cfg, &paths, reporter.as_ref(), format)
            })
            .await??;
            write_output(&rendered, output.as_deref())?;
        }
        Commands::Similarity { paths, n, format } => {
            let format = OutputFormat::parse(&format)?;
            let rendered =
                tokio::task::spawn_blocking(move || run_similarity(&cfg, &paths, n, format))
                    .await??;
            print!("{}", rendered);
        }
        Commands::Normalize { file } => {
            let text = read_text_input(file.as_deref())?;
            println!("{}", Normalizer::new().normalize(&text));
        }
        Commands::Classifiers => {
            let classifier_cfg = cfg.classifier.clone();
            tokio::task::spawn_blocking(move || list_classifiers(&classifier_cfg)).await?;
        }
    }

    Ok(())
}

fn run_analyze(
    cfg: &Config,
    paths: &[PathBuf],
    progress: &dyn ProgressReporter,
    format: OutputFormat,
) -> Result<String> {
    let inputs = collect_inputs(paths, &cfg.intake)?;
    let sources = pipeline::extract_inputs(inputs);

    let classifier = load_classifier(&cfg.classifier);
    let scorer = Scorer::new(classifier, &cfg.scoring);
    let report = pipeline::analyze_batch(
        sources,
        &scorer,
        &AnalysisOptions::from_config(cfg),
        progress,
    );
    if !pipeline::any_scored(&report) && !report.files.is_empty() {
        tracing::warn!(
            classifier = scorer.classifier_name(),
            "no document was scored; AI scores are reported as 0"
        );
    }
    render::render(&report, format)
}

fn run_similarity(
    cfg: &Config,
    paths: &[PathBuf],
    n: Option<usize>,
    format: OutputFormat,
) -> Result<String> {
    let shingle_size = n.unwrap_or(cfg.shingling.n);
    if shingle_size == 0 {
        anyhow::bail!("--n must be >= 1");
    }
    let inputs = collect_inputs(paths, &cfg.intake)?;
    let sources = pipeline::extract_inputs(inputs);
    let matrix = pipeline::compare_sources(&sources, shingle_size);

    match format {
        OutputFormat::Json => {
            let names: Vec<&str> = sources.iter().map(|s| s.name.as_str()).collect();
            let mut out = serde_json::to_string_pretty(&serde_json::json!({
                "files": names,
                "similarity_matrix": matrix,
            }))?;
            out.push('\n');
            Ok(out)
        }
        OutputFormat::Text => {
            let mut out = String::new();
            for (i, source) in sources.iter().enumerate() {
                match &source.text {
                    Ok(_) => out.push_str(&format!("  {:>5}  {}\n", i, source.name)),
                    Err(e) => out.push_str(&format!("  {:>5}  {}  ({})\n", i, source.name, e)),
                }
            }
            out.push('\n');
            out.push_str(&render::render_matrix(&matrix));
            Ok(out)
        }
    }
}

/// Build the configured classifier. Scoring is best-effort, so a provider
/// that fails to load degrades to [`DisabledClassifier`].
fn load_classifier(config: &ClassifierConfig) -> Arc<dyn Classifier> {
    match create_classifier(config) {
        Ok(classifier) => {
            tracing::info!(classifier = classifier.name(), "classifier ready");
            classifier
        }
        Err(e) => {
            tracing::warn!(provider = %config.provider, error = %e, "classifier failed to load; documents will be unscored");
            Arc::new(DisabledClassifier)
        }
    }
}

fn list_classifiers(config: &ClassifierConfig) {
    println!("{:<12} {:<40} STATUS", "PROVIDER", "MODEL");
    let model = config.model.as_deref().unwrap_or("-");
    let status = match create_classifier(config) {
        Ok(_) if !config.is_enabled() => "OK (every document unscored)".to_string(),
        Ok(_) => "OK".to_string(),
        Err(e) => format!("FAILED: {}", e),
    };
    println!("{:<12} {:<40} {}", config.provider, model, status);
    println!();
    println!(
        "  AI class index: {} ({})",
        config.ai_class_index,
        config
            .labels
            .get(config.ai_class_index)
            .map(String::as_str)
            .unwrap_or("?")
    );
}

fn read_text_input(file: Option<&Path>) -> Result<String> {
    match file {
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            Ok(text)
        }
        Some(path) => {
            let bytes = std::fs::read(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let is_pdf = path
                .extension()
                .map(|e| e.eq_ignore_ascii_case("pdf"))
                .unwrap_or(false);
            if is_pdf {
                Ok(extract_pdf_text(&bytes)?)
            } else {
                Ok(String::from_utf8_lossy(&bytes).into_owned())
            }
        }
    }
}

fn write_output(rendered: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Report written to {}", path.display());
        }
        None => print!("{}", rendered),
    }
    Ok(())
}
