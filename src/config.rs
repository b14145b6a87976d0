use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{ContentError, Result};
use crate::models::{DEFAULT_KEYWORD_COUNT, SummaryLanguage};

// Config file layout; every section falls back to defaults
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub analysis: AnalysisConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Gemini,
    OpenRouter,
}

impl ProviderKind {
    pub fn default_model(self) -> &'static str {
        match self {
            ProviderKind::Gemini => "gemini-2.5-flash",
            ProviderKind::OpenRouter => "google/gemini-2.5-flash",
        }
    }

    pub fn default_base_url(self) -> &'static str {
        match self {
            ProviderKind::Gemini => "https://generativelanguage.googleapis.com/v1beta",
            ProviderKind::OpenRouter => "https://openrouter.ai/api/v1",
        }
    }

    pub fn api_key_env(self) -> &'static str {
        match self {
            ProviderKind::Gemini => "GEMINI_API_KEY",
            ProviderKind::OpenRouter => "OPENROUTER_API_KEY",
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct ApiConfig {
    pub provider: ProviderKind,
    pub model: Option<String>,
    pub base_url: Option<String>,
    // None keeps the HTTP client's own default
    pub request_timeout_seconds: Option<u64>,
}

impl ApiConfig {
    pub fn model(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.provider.default_model())
    }

    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.provider.default_base_url())
            .trim_end_matches('/')
    }
}

/// What to do when the provider returns more keywords than were requested.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum KeywordPolicy {
    #[default]
    Tolerate,
    Truncate,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AnalysisConfig {
    pub keyword_count: u32,
    pub language: SummaryLanguage,
    pub keyword_policy: KeywordPolicy,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            keyword_count: DEFAULT_KEYWORD_COUNT,
            language: SummaryLanguage::English,
            keyword_policy: KeywordPolicy::Tolerate,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct OutputConfig {
    pub directory: PathBuf,
    pub summary_csv: String,
    pub keywords_csv: String,
    pub excel_file: String,
    pub csv_bom: bool,
    pub include_chart: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            directory: PathBuf::from("."),
            summary_csv: "summary_analysis.csv".to_string(),
            keywords_csv: "keyword_frequency.csv".to_string(),
            excel_file: "content_analysis_report.xlsx".to_string(),
            csv_bom: true,
            include_chart: true,
        }
    }
}

impl OutputConfig {
    pub fn summary_csv_path(&self) -> PathBuf {
        self.directory.join(&self.summary_csv)
    }

    pub fn keywords_csv_path(&self) -> PathBuf {
        self.directory.join(&self.keywords_csv)
    }

    pub fn excel_path(&self) -> PathBuf {
        self.directory.join(&self.excel_file)
    }
}

impl Config {
    pub fn from_toml(content: &str) -> Result<Config> {
        toml::from_str(content).map_err(|e| ContentError::Config(format!("failed to parse config file: {e}")))
    }

    /// Loads `path`; a missing file means the default configuration.
    pub fn load(path: &Path) -> Result<Config> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config = Config::from_toml(&content)?;
        tracing::debug!(path = %path.display(), provider = ?config.api.provider, "loaded config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.api.provider, ProviderKind::Gemini);
        assert_eq!(config.api.model(), "gemini-2.5-flash");
        assert_eq!(config.analysis.keyword_count, 10);
        assert_eq!(config.analysis.keyword_policy, KeywordPolicy::Tolerate);
        assert!(config.output.csv_bom);
        assert!(config.api.request_timeout_seconds.is_none());
    }

    #[test]
    fn test_partial_config() {
        let config = Config::from_toml(
            r#"
            [api]
            provider = "openrouter"
            base_url = "http://localhost:9999/"

            [analysis]
            language = "thai"
            keyword_policy = "truncate"
            keyword_count = 25
            "#,
        )
        .unwrap();

        assert_eq!(config.api.provider, ProviderKind::OpenRouter);
        assert_eq!(config.api.model(), "google/gemini-2.5-flash");
        assert_eq!(config.api.base_url(), "http://localhost:9999");
        assert_eq!(config.analysis.language, SummaryLanguage::Thai);
        assert_eq!(config.analysis.keyword_policy, KeywordPolicy::Truncate);
        assert_eq!(config.analysis.keyword_count, 25);
        assert_eq!(config.output.excel_file, "content_analysis_report.xlsx");
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let err = Config::from_toml("[api]\nprovider = \"carrier-pigeon\"").unwrap_err();
        assert!(matches!(err, ContentError::Config(_)));
    }

    #[test]
    fn test_missing_file_means_defaults() {
        let config = Config::load(Path::new("/definitely/not/here/config.toml")).unwrap();
        assert_eq!(config.output.keywords_csv, "keyword_frequency.csv");
    }
}
