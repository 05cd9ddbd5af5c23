use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub shingling: ShinglingConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub intake: IntakeConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ShinglingConfig {
    #[serde(default = "default_shingle_size")]
    pub n: usize,
}

impl Default for ShinglingConfig {
    fn default() -> Self {
        Self {
            n: default_shingle_size(),
        }
    }
}

fn default_shingle_size() -> usize {
    3
}

#[derive(Debug, Deserialize, Clone)]
pub struct ScoringConfig {
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            max_tokens: default_max_tokens(),
        }
    }
}

fn default_max_tokens() -> usize {
    512
}

#[derive(Debug, Deserialize, Clone)]
pub struct ClassifierConfig {
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default)]
    pub model: Option<String>,
    /// Endpoint for the `http` provider. `{model}` is substituted.
    #[serde(default)]
    pub url: Option<String>,
    /// Directory holding `model.onnx` and `tokenizer.json` for the `local` provider.
    #[serde(default)]
    pub model_dir: Option<PathBuf>,
    /// Which of the model's two output classes means "AI-generated".
    #[serde(default = "default_ai_class_index")]
    pub ai_class_index: usize,
    /// Class names in model output order, used to map labels returned by
    /// the `http` provider back to class indices.
    #[serde(default = "default_labels")]
    pub labels: Vec<String>,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: None,
            url: None,
            model_dir: None,
            ai_class_index: default_ai_class_index(),
            labels: default_labels(),
            max_retries: default_max_retries(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_provider() -> String {
    "disabled".to_string()
}
fn default_ai_class_index() -> usize {
    0
}
fn default_labels() -> Vec<String> {
    vec!["Fake".to_string(), "Real".to_string()]
}
fn default_max_retries() -> u32 {
    3
}
fn default_timeout_secs() -> u64 {
    30
}

impl ClassifierConfig {
    pub fn is_enabled(&self) -> bool {
        self.provider != "disabled"
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReportConfig {
    #[serde(default = "default_preview_chars")]
    pub preview_chars: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            preview_chars: default_preview_chars(),
        }
    }
}

fn default_preview_chars() -> usize {
    200
}

#[derive(Debug, Deserialize, Clone)]
pub struct IntakeConfig {
    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: Vec<String>,
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: u64,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            allowed_extensions: default_allowed_extensions(),
            max_file_bytes: default_max_file_bytes(),
        }
    }
}

fn default_allowed_extensions() -> Vec<String> {
    vec!["pdf".to_string(), "zip".to_string()]
}
fn default_max_file_bytes() -> u64 {
    50 * 1024 * 1024
}

impl Config {
    /// All-defaults configuration, used when no config file exists.
    pub fn minimal() -> Self {
        Self::default()
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    validate(&config)?;
    Ok(config)
}

/// Load `path` if it exists, otherwise fall back to [`Config::minimal`].
pub fn load_or_default(path: &Path) -> Result<Config> {
    if path.exists() {
        load_config(path)
    } else {
        tracing::debug!(path = %path.display(), "config file not found, using defaults");
        Ok(Config::minimal())
    }
}

pub fn validate(config: &Config) -> Result<()> {
    if config.shingling.n == 0 {
        anyhow::bail!("shingling.n must be >= 1");
    }

    if config.scoring.max_tokens == 0 {
        anyhow::bail!("scoring.max_tokens must be > 0");
    }

    if config.report.preview_chars == 0 {
        anyhow::bail!("report.preview_chars must be > 0");
    }

    if config.intake.allowed_extensions.is_empty() {
        anyhow::bail!("intake.allowed_extensions must not be empty");
    }

    if config.classifier.ai_class_index > 1 {
        anyhow::bail!("classifier.ai_class_index must be 0 or 1");
    }
    if config.classifier.labels.len() != 2 {
        anyhow::bail!("classifier.labels must name exactly two classes");
    }

    if config.classifier.is_enabled() && config.classifier.model.is_none() {
        anyhow::bail!(
            "classifier.model must be specified when provider is '{}'",
            config.classifier.provider
        );
    }

    match config.classifier.provider.as_str() {
        "disabled" | "http" | "local" => {}
        other => anyhow::bail!(
            "Unknown classifier provider: '{}'. Must be disabled, http, or local.",
            other
        ),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        validate(&config).unwrap();
        assert_eq!(config.shingling.n, 3);
        assert_eq!(config.scoring.max_tokens, 512);
        assert_eq!(config.classifier.ai_class_index, 0);
        assert_eq!(
            config.classifier.labels[config.classifier.ai_class_index],
            "Fake"
        );
        assert_eq!(config.report.preview_chars, 200);
        assert_eq!(config.intake.allowed_extensions, vec!["pdf", "zip"]);
        assert!(!config.classifier.is_enabled());
    }

    #[test]
    fn enabled_provider_requires_model() {
        let config: Config = toml::from_str("[classifier]\nprovider = \"http\"\n").unwrap();
        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("classifier.model"));
    }

    #[test]
    fn unknown_provider_rejected() {
        let config: Config =
            toml::from_str("[classifier]\nprovider = \"magic\"\nmodel = \"x\"\n").unwrap();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn zero_shingle_size_rejected() {
        let config: Config = toml::from_str("[shingling]\nn = 0\n").unwrap();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn missing_file_falls_back_to_minimal() {
        let config = load_or_default(Path::new("/nonexistent/docsift.toml")).unwrap();
        assert_eq!(config.shingling.n, 3);
    }
}
