//! Configuration management for faqdesk.
//!
//! Configuration is merged from multiple sources, later ones winning:
//! - Built-in defaults
//! - Config file (`.faqdesk/config.yaml`)
//! - Environment variables
//! - Command-line flags
//!
//! The configuration is workspace-centric: the record source, snapshot cache,
//! and persona all live under `.faqdesk/` unless overridden.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{AppError, AppResult};

/// Ranker tunables.
///
/// The thresholds were calibrated empirically against one embedding model and
/// one language; they are exposed as configuration but the defaults must be
/// preserved for behavioral compatibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Minimum total lexical score for an entry to survive phase 1.
    #[serde(rename = "relevanceThreshold")]
    pub relevance_threshold: f32,

    /// Maximum squared-L2 distance accepted by the vector fallback.
    #[serde(rename = "vectorDistanceThreshold")]
    pub vector_distance_threshold: f32,

    /// Number of results returned (and neighbors requested in fallback).
    #[serde(rename = "topK")]
    pub top_k: usize,

    /// Answers longer than this many characters are truncated in results.
    #[serde(rename = "answerPreviewChars")]
    pub answer_preview_chars: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            relevance_threshold: 0.5,
            vector_distance_threshold: 0.1,
            top_k: 3,
            answer_preview_chars: 1000,
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the workspace root (contains .faqdesk/)
    pub workspace: PathBuf,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Embedding provider (e.g., "trigram", "ollama")
    pub provider: String,

    /// Embedding model identifier
    pub model: String,

    /// Embedding endpoint for HTTP providers
    pub endpoint: Option<String>,

    /// Embedding dimensionality
    pub dimensions: usize,

    /// Path to the record source file (the local source of truth)
    pub records_path: Option<PathBuf>,

    /// Ranker tunables
    pub search: SearchConfig,

    /// Background staleness-check interval, in seconds
    pub refresh_interval_secs: u64,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,
}

/// Full configuration file structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ConfigFile {
    source: Option<SourceSection>,
    embedding: Option<EmbeddingSection>,
    search: Option<SearchConfig>,
    refresh: Option<RefreshSection>,
    logging: Option<LoggingSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SourceSection {
    records: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct EmbeddingSection {
    provider: Option<String>,
    model: Option<String>,
    dimensions: Option<usize>,
    endpoint: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RefreshSection {
    #[serde(rename = "intervalSecs")]
    interval_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingSection {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workspace: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            config_file: None,
            provider: "trigram".to_string(), // Local-first default
            model: "trigram-v1".to_string(),
            endpoint: None,
            dimensions: 384,
            records_path: None,
            search: SearchConfig::default(),
            refresh_interval_secs: 300,
            log_level: None,
            verbose: false,
            no_color: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables and defaults.
    ///
    /// Environment variables:
    /// - `FAQDESK_WORKSPACE`: Override workspace path
    /// - `FAQDESK_CONFIG`: Path to config file
    /// - `FAQDESK_PROVIDER`: Embedding provider
    /// - `FAQDESK_MODEL`: Embedding model identifier
    /// - `FAQDESK_RECORDS`: Record source file
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    pub fn load() -> AppResult<Self> {
        let mut config = Self::default();

        if let Ok(workspace) = std::env::var("FAQDESK_WORKSPACE") {
            config.workspace = PathBuf::from(workspace);
        }

        if let Ok(config_file) = std::env::var("FAQDESK_CONFIG") {
            config.config_file = Some(PathBuf::from(config_file));
        }

        if !config.workspace.exists() {
            return Err(AppError::Config(format!(
                "Workspace directory does not exist: {:?}",
                config.workspace
            )));
        }

        let config_path = if let Some(ref cf) = config.config_file {
            cf.clone()
        } else {
            config.workspace.join(".faqdesk/config.yaml")
        };

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        }

        // Environment variables override the YAML config
        if let Ok(provider) = std::env::var("FAQDESK_PROVIDER") {
            config.provider = provider;
        }

        if let Ok(model) = std::env::var("FAQDESK_MODEL") {
            config.model = model;
        }

        if let Ok(records) = std::env::var("FAQDESK_RECORDS") {
            config.records_path = Some(PathBuf::from(records));
        }

        config.log_level = std::env::var("RUST_LOG").ok();

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge a YAML configuration file into this config.
    fn merge_yaml(&mut self, path: &PathBuf) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        let mut result = self.clone();

        if let Some(source) = config_file.source {
            if let Some(records) = source.records {
                result.records_path = Some(PathBuf::from(records));
            }
        }

        if let Some(embedding) = config_file.embedding {
            if let Some(provider) = embedding.provider {
                result.provider = provider;
            }
            if let Some(model) = embedding.model {
                result.model = model;
            }
            if let Some(dimensions) = embedding.dimensions {
                result.dimensions = dimensions;
            }
            if let Some(endpoint) = embedding.endpoint {
                result.endpoint = Some(endpoint);
            }
        }

        if let Some(search) = config_file.search {
            result.search = search;
        }

        if let Some(refresh) = config_file.refresh {
            if let Some(interval) = refresh.interval_secs {
                result.refresh_interval_secs = interval;
            }
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// Command-line flags take precedence over environment variables and the
    /// config file.
    #[allow(clippy::too_many_arguments)]
    pub fn with_overrides(
        mut self,
        workspace: Option<PathBuf>,
        config_file: Option<PathBuf>,
        provider: Option<String>,
        model: Option<String>,
        records: Option<PathBuf>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(workspace) = workspace {
            self.workspace = workspace;
        }

        if let Some(config_file) = config_file {
            self.config_file = Some(config_file);
        }

        if let Some(provider) = provider {
            self.provider = provider;
        }

        if let Some(model) = model {
            self.model = model;
        }

        if let Some(records) = records {
            self.records_path = Some(records);
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Get the path to the .faqdesk directory.
    pub fn faqdesk_dir(&self) -> PathBuf {
        self.workspace.join(".faqdesk")
    }

    /// Get the snapshot cache directory.
    pub fn cache_dir(&self) -> PathBuf {
        self.faqdesk_dir().join("cache")
    }

    /// Resolve the record source path (default: `.faqdesk/records.json`).
    pub fn records_file(&self) -> PathBuf {
        self.records_path
            .clone()
            .unwrap_or_else(|| self.faqdesk_dir().join("records.json"))
    }

    /// Ensure the .faqdesk directory exists.
    pub fn ensure_faqdesk_dir(&self) -> AppResult<()> {
        let dir = self.faqdesk_dir();
        if !dir.exists() {
            std::fs::create_dir_all(&dir).map_err(|e| {
                AppError::Config(format!("Failed to create .faqdesk directory: {}", e))
            })?;
        }
        Ok(())
    }

    /// Validate configuration for the active embedding provider.
    pub fn validate(&self) -> AppResult<()> {
        let known_providers = ["trigram", "ollama"];

        if !known_providers.contains(&self.provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown provider: {}. Supported: {}",
                self.provider,
                known_providers.join(", ")
            )));
        }

        if self.dimensions == 0 {
            return Err(AppError::Config(
                "Embedding dimensions must be non-zero".to_string(),
            ));
        }

        Ok(())
    }
}
