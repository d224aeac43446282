//! Subcommand implementations.

pub mod doctor;
pub mod generate;
pub mod ingest;
pub mod init;
pub mod search;
pub mod serve;

use docuforge_config::AppConfig;
use docuforge_knowledge::IngestionService;
use std::path::Path;
use std::sync::Arc;

/// Load config from `path`, or the default location when none is given.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, Box<dyn std::error::Error>> {
    let config = match path {
        Some(path) => AppConfig::load_file(path),
        None => AppConfig::load(),
    }
    .map_err(|e| format!("Failed to load config: {e}"))?;
    Ok(config)
}

/// Build the provider and ingestion service, creating the collection if needed.
pub async fn knowledge_base(
    config: &AppConfig,
) -> Result<(Arc<dyn docuforge_core::Provider>, Arc<IngestionService>), Box<dyn std::error::Error>> {
    if !config.has_api_key() {
        tracing::warn!(provider = %config.provider, "No API key configured; requests may be rejected");
    }

    let provider = docuforge_providers::build_from_config(config)?;
    let ingestion = docuforge_knowledge::build_ingestion_from_config(config, provider.clone())?;
    ingestion.init().await?;
    Ok((provider, Arc::new(ingestion)))
}
