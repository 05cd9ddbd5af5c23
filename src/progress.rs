//! Batch progress reporting.
//!
//! Reports observable progress while a batch is analyzed so users see which
//! document is being scored and how many are left. Progress is emitted on
//! **stderr** so stdout remains parseable for scripts.

use std::io::Write;

/// A single progress event for a batch.
#[derive(Clone, Debug, PartialEq)]
pub enum BatchProgressEvent {
    /// Batch accepted; `total` documents will be processed.
    Started { total: u64 },
    /// Document `index` (1-based) of `total` is being processed.
    Document { index: u64, total: u64, name: String },
    /// All-pairs similarity over `pairs` distinct document pairs.
    Similarity { pairs: u64 },
    /// Batch finished.
    Finished { failed: u64, total: u64 },
}

/// Reports batch progress. Implementations write to stderr (human or JSON).
pub trait ProgressReporter: Send + Sync {
    /// Emit a progress event. Called from the batch pipeline.
    fn report(&self, event: BatchProgressEvent);
}

/// Human-friendly progress on stderr: "analyze  scoring  3 / 12  report.pdf".
pub struct StderrProgress;

impl ProgressReporter for StderrProgress {
    fn report(&self, event: BatchProgressEvent) {
        let line = match &event {
            BatchProgressEvent::Started { total } => {
                format!("analyze  {} documents\n", format_number(*total))
            }
            BatchProgressEvent::Document { index, total, name } => format!(
                "analyze  scoring  {} / {}  {}\n",
                format_number(*index),
                format_number(*total),
                name
            ),
            BatchProgressEvent::Similarity { pairs } => {
                format!("analyze  comparing  {} pairs\n", format_number(*pairs))
            }
            BatchProgressEvent::Finished { failed, total } => {
                format!(
                    "analyze  done  {} ok, {} failed\n",
                    format_number(total.saturating_sub(*failed)),
                    format_number(*failed)
                )
            }
        };
        let _ = std::io::stderr().lock().write_all(line.as_bytes());
        let _ = std::io::stderr().lock().flush();
    }
}

/// Machine-readable progress: one JSON object per line on stderr.
pub struct JsonProgress;

impl ProgressReporter for JsonProgress {
    fn report(&self, event: BatchProgressEvent) {
        let obj = match &event {
            BatchProgressEvent::Started { total } => serde_json::json!({
                "event": "progress",
                "phase": "started",
                "total": total
            }),
            BatchProgressEvent::Document { index, total, name } => serde_json::json!({
                "event": "progress",
                "phase": "scoring",
                "index": index,
                "total": total,
                "name": name
            }),
            BatchProgressEvent::Similarity { pairs } => serde_json::json!({
                "event": "progress",
                "phase": "comparing",
                "pairs": pairs
            }),
            BatchProgressEvent::Finished { failed, total } => serde_json::json!({
                "event": "progress",
                "phase": "finished",
                "failed": failed,
                "total": total
            }),
        };
        if let Ok(line) = serde_json::to_string(&obj) {
            let _ = writeln!(std::io::stderr().lock(), "{}", line);
            let _ = std::io::stderr().lock().flush();
        }
    }
}

/// No-op reporter when progress is disabled.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn report(&self, _event: BatchProgressEvent) {}
}

fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + (s.len() - 1) / 3);
    let chars: Vec<char> = s.chars().rev().collect();
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(*c);
    }
    result.chars().rev().collect()
}

/// Progress mode for the CLI: off, human (stderr), or JSON (stderr).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ProgressMode {
    Off,
    Human,
    Json,
}

impl ProgressMode {
    /// Default: human progress when stderr is a TTY, otherwise off.
    pub fn default_for_tty() -> Self {
        if atty::is(atty::Stream::Stderr) {
            ProgressMode::Human
        } else {
            ProgressMode::Off
        }
    }

    pub fn parse(s: &str) -> anyhow::Result<Self> {
        match s {
            "off" => Ok(ProgressMode::Off),
            "human" => Ok(ProgressMode::Human),
            "json" => Ok(ProgressMode::Json),
            other => anyhow::bail!("Unknown progress mode '{}'. Use off, human, or json.", other),
        }
    }

    /// Build a reporter for this mode.
    pub fn reporter(&self) -> Box<dyn ProgressReporter> {
        match self {
            ProgressMode::Off => Box::new(SilentProgress),
            ProgressMode::Human => Box::new(StderrProgress),
            ProgressMode::Json => Box::new(JsonProgress),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_number_comma() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1_234_567), "1,234,567");
    }

    #[test]
    fn parse_modes() {
        assert_eq!(ProgressMode::parse("json").unwrap(), ProgressMode::Json);
        assert_eq!(ProgressMode::parse("off").unwrap(), ProgressMode::Off);
        assert!(ProgressMode::parse("loud").is_err());
    }
}
