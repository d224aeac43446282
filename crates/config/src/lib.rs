//! Configuration loading, validation, and management for DocuForge.
//!
//! Loads configuration from `~/.docuforge/config.toml` (or an explicit path)
//! with environment variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.docuforge/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Service name reported by `/health` and startup logs
    #[serde(default = "default_project_name")]
    pub project_name: String,

    /// Prefix for the versioned HTTP API
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,

    /// Deployment environment (controls default log verbosity)
    #[serde(default)]
    pub environment: Environment,

    /// API key (can be overridden per-provider)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Generation provider
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Generation model
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature; kept low for factual consistency
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Max tokens per generation response
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Per-request HTTP timeout for provider calls
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Ordered provider names tried after `provider` fails
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fallback: Vec<String>,

    /// Provider-specific configurations
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,

    #[serde(default)]
    pub embedding: EmbeddingConfig,

    #[serde(default)]
    pub vector_store: VectorStoreConfig,

    #[serde(default)]
    pub ingestion: IngestionConfig,

    #[serde(default)]
    pub retrieval: RetrievalConfig,

    #[serde(default)]
    pub workflow: WorkflowConfig,

    #[serde(default)]
    pub gateway: GatewayConfig,
}

fn default_project_name() -> String {
    "DocuForge".into()
}
fn default_api_prefix() -> String {
    "/api/v1".into()
}
fn default_provider() -> String {
    "openai".into()
}
fn default_model() -> String {
    "gpt-4-turbo-preview".into()
}
fn default_temperature() -> f32 {
    0.2
}
fn default_max_tokens() -> u32 {
    4096
}
fn default_request_timeout() -> u64 {
    120
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("project_name", &self.project_name)
            .field("api_prefix", &self.api_prefix)
            .field("environment", &self.environment)
            .field("api_key", &redact(&self.api_key))
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("fallback", &self.fallback)
            .field("providers", &self.providers)
            .field("embedding", &self.embedding)
            .field("vector_store", &self.vector_store)
            .field("ingestion", &self.ingestion)
            .field("retrieval", &self.retrieval)
            .field("workflow", &self.workflow)
            .field("gateway", &self.gateway)
            .finish()
    }
}

/// Deployment environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Dev,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Dev => "dev",
            Environment::Production => "production",
        }
    }

    /// Default tracing filter directive for this environment.
    pub fn default_log_level(&self) -> &'static str {
        match self {
            Environment::Dev => "debug",
            Environment::Production => "info",
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dev" | "development" => Ok(Environment::Dev),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(ConfigError::ValidationError(format!(
                "unknown environment '{other}' (expected 'dev' or 'production')"
            ))),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    #[serde(default = "default_embedding_model")]
    pub model: String,

    /// Vector size; must match the embedding model's output
    #[serde(default = "default_dimensions")]
    pub dimensions: usize,
}

fn default_embedding_model() -> String {
    "text-embedding-3-small".into()
}
fn default_dimensions() -> usize {
    1536
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: default_embedding_model(),
            dimensions: default_dimensions(),
        }
    }
}

/// Which vector store backend to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VectorBackend {
    #[default]
    Qdrant,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorStoreConfig {
    #[serde(default)]
    pub backend: VectorBackend,

    #[serde(default = "default_qdrant_host")]
    pub host: String,

    #[serde(default = "default_qdrant_port")]
    pub port: u16,

    #[serde(default = "default_collection")]
    pub collection: String,
}

fn default_qdrant_host() -> String {
    "qdrant".into()
}
fn default_qdrant_port() -> u16 {
    6333
}
fn default_collection() -> String {
    "vaisala_docs".into()
}

impl VectorStoreConfig {
    /// Base URL of the Qdrant REST API.
    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

impl Default for VectorStoreConfig {
    fn default() -> Self {
        Self {
            backend: VectorBackend::default(),
            host: default_qdrant_host(),
            port: default_qdrant_port(),
            collection: default_collection(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestionConfig {
    /// Target chunk length in characters
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Characters shared between consecutive chunks
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,
}

fn default_chunk_size() -> usize {
    1000
}
fn default_chunk_overlap() -> usize {
    200
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Context chunks fetched for each generation request
    #[serde(default = "default_retrieval_limit")]
    pub limit: usize,
}

fn default_retrieval_limit() -> usize {
    3
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            limit: default_retrieval_limit(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowConfig {
    /// Safety bound on draft revisions per run
    #[serde(default = "default_max_revisions")]
    pub max_revisions: u32,
}

fn default_max_revisions() -> u32 {
    3
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            max_revisions: default_max_revisions(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,
}

fn default_port() -> u16 {
    8000
}
fn default_host() -> String {
    "0.0.0.0".into()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.docuforge/config.toml).
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_file(&Self::config_dir().join("config.toml"))
    }

    /// Load configuration from `path`, then apply environment overrides.
    ///
    /// Environment variables checked:
    /// - `DOCUFORGE_API_KEY`, then `OPENAI_API_KEY`
    /// - `DOCUFORGE_MODEL`, then `OPENAI_MODEL_ID`
    /// - `DOCUFORGE_ENVIRONMENT`, then `ENVIRONMENT`
    /// - `QDRANT_HOST`, `QDRANT_PORT`
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load_from(path)?;
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path, without env overrides.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides using `lookup` to read variables.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if self.api_key.is_none() {
            self.api_key = lookup("DOCUFORGE_API_KEY").or_else(|| lookup("OPENAI_API_KEY"));
        }

        if let Some(model) = lookup("DOCUFORGE_MODEL").or_else(|| lookup("OPENAI_MODEL_ID")) {
            self.model = model;
        }

        if let Some(env) = lookup("DOCUFORGE_ENVIRONMENT").or_else(|| lookup("ENVIRONMENT")) {
            self.environment = env.parse()?;
        }

        if let Some(host) = lookup("QDRANT_HOST") {
            self.vector_store.host = host;
        }

        if let Some(port) = lookup("QDRANT_PORT") {
            self.vector_store.port = port.parse().map_err(|_| {
                ConfigError::ValidationError(format!("QDRANT_PORT must be a port number, got '{port}'"))
            })?;
        }

        Ok(())
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".docuforge")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::ValidationError(
                "temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.ingestion.chunk_size == 0 {
            return Err(ConfigError::ValidationError(
                "ingestion.chunk_size must be > 0".into(),
            ));
        }

        if self.ingestion.chunk_overlap >= self.ingestion.chunk_size {
            return Err(ConfigError::ValidationError(
                "ingestion.chunk_overlap must be smaller than ingestion.chunk_size".into(),
            ));
        }

        if self.workflow.max_revisions == 0 {
            return Err(ConfigError::ValidationError(
                "workflow.max_revisions must be at least 1".into(),
            ));
        }

        if self.retrieval.limit == 0 {
            return Err(ConfigError::ValidationError(
                "retrieval.limit must be at least 1".into(),
            ));
        }

        if self.embedding.dimensions == 0 {
            return Err(ConfigError::ValidationError(
                "embedding.dimensions must be > 0".into(),
            ));
        }

        let prefix = self.api_prefix.as_str();
        if !prefix.starts_with('/') || prefix.ends_with('/') || prefix.contains(['{', '}', '*']) {
            return Err(ConfigError::ValidationError(format!(
                "api_prefix must start with '/', must not end with '/' or be the root, got '{prefix}'"
            )));
        }

        Ok(())
    }

    /// Resolve the API key for a named provider (provider entry first,
    /// then the global key).
    pub fn api_key_for(&self, provider: &str) -> Option<String> {
        self.providers
            .get(provider)
            .and_then(|p| p.api_key.clone())
            .or_else(|| self.api_key.clone())
    }

    /// Check if an API key is available (from config or environment).
    pub fn has_api_key(&self) -> bool {
        self.api_key_for(&self.provider).is_some()
    }

    /// Generate a default config TOML string (for the `init` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            project_name: default_project_name(),
            api_prefix: default_api_prefix(),
            environment: Environment::default(),
            api_key: None,
            provider: default_provider(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            request_timeout_secs: default_request_timeout(),
            fallback: vec![],
            providers: HashMap::new(),
            embedding: EmbeddingConfig::default(),
            vector_store: VectorStoreConfig::default(),
            ingestion: IngestionConfig::default(),
            retrieval: RetrievalConfig::default(),
            workflow: WorkflowConfig::default(),
            gateway: GatewayConfig::default(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.project_name, "DocuForge");
        assert_eq!(config.vector_store.port, 6333);
        assert_eq!(config.vector_store.collection, "vaisala_docs");
        assert_eq!(config.workflow.max_revisions, 3);
        assert_eq!(config.retrieval.limit, 3);
        assert_eq!(config.environment, Environment::Dev);
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.model, config.model);
        assert_eq!(parsed.ingestion.chunk_size, config.ingestion.chunk_size);
        assert_eq!(parsed.vector_store.backend, VectorBackend::Qdrant);
    }

    #[test]
    fn invalid_temperature_rejected() {
        let config = AppConfig {
            temperature: 5.0,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn overlap_must_be_smaller_than_chunk() {
        let mut config = AppConfig::default();
        config.ingestion.chunk_overlap = config.ingestion.chunk_size;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("chunk_overlap"));
    }

    #[test]
    fn zero_revisions_rejected() {
        let mut config = AppConfig::default();
        config.workflow.max_revisions = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn api_prefix_must_be_a_nested_path() {
        for prefix in ["/", "", "api/v1", "/api/v1/", "/api/{version}"] {
            let config = AppConfig {
                api_prefix: prefix.into(),
                ..AppConfig::default()
            };
            let err = config.validate().unwrap_err();
            assert!(err.to_string().contains("api_prefix"), "{prefix:?}");
        }

        let config = AppConfig {
            api_prefix: "/docs/api".into(),
            ..AppConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let config = AppConfig::load_from(Path::new("/nonexistent/config.toml")).unwrap();
        assert_eq!(config.provider, "openai");
    }

    #[test]
    fn load_from_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
environment = "production"
model = "gpt-4o"

[vector_store]
backend = "memory"

[workflow]
max_revisions = 5
"#
        )
        .unwrap();

        let config = AppConfig::load_from(file.path()).unwrap();
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.vector_store.backend, VectorBackend::Memory);
        assert_eq!(config.vector_store.host, "qdrant");
        assert_eq!(config.workflow.max_revisions, 5);
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "temperature = \"hot\"").unwrap();
        let err = AppConfig::load_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn env_overrides_apply() {
        let mut config = AppConfig::default();
        config
            .apply_env(env_from(&[
                ("OPENAI_API_KEY", "sk-fake-key"),
                ("OPENAI_MODEL_ID", "gpt-4o-mini"),
                ("ENVIRONMENT", "production"),
                ("QDRANT_HOST", "localhost"),
                ("QDRANT_PORT", "6334"),
            ]))
            .unwrap();

        assert_eq!(config.api_key.as_deref(), Some("sk-fake-key"));
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.vector_store.url(), "http://localhost:6334");
    }

    #[test]
    fn docuforge_vars_take_priority() {
        let mut config = AppConfig::default();
        config
            .apply_env(env_from(&[
                ("DOCUFORGE_API_KEY", "sk-primary"),
                ("OPENAI_API_KEY", "sk-secondary"),
            ]))
            .unwrap();
        assert_eq!(config.api_key.as_deref(), Some("sk-primary"));
    }

    #[test]
    fn bad_port_env_rejected() {
        let mut config = AppConfig::default();
        let err = config
            .apply_env(env_from(&[("QDRANT_PORT", "not-a-port")]))
            .unwrap_err();
        assert!(err.to_string().contains("QDRANT_PORT"));
    }

    #[test]
    fn unknown_environment_rejected() {
        assert!("staging".parse::<Environment>().is_err());
        assert_eq!("PROD".parse::<Environment>().unwrap(), Environment::Production);
    }

    #[test]
    fn provider_key_falls_back_to_global() {
        let mut config = AppConfig {
            api_key: Some("sk-global".into()),
            ..AppConfig::default()
        };
        config.providers.insert(
            "local".into(),
            ProviderConfig {
                api_key: Some("sk-local".into()),
                api_url: Some("http://localhost:11434/v1".into()),
                model: None,
            },
        );
        assert_eq!(config.api_key_for("local").as_deref(), Some("sk-local"));
        assert_eq!(config.api_key_for("openai").as_deref(), Some("sk-global"));
        assert!(config.has_api_key());
    }

    #[test]
    fn debug_output_redacts_keys() {
        let config = AppConfig {
            api_key: Some("sk-secret-value".into()),
            ..AppConfig::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-secret-value"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn default_toml_generation() {
        let toml_str = AppConfig::default_toml();
        assert!(toml_str.contains("gpt-4-turbo-preview"));
        assert!(toml_str.contains("6333"));
    }
}
