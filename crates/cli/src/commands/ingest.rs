//! `docuforge ingest` — Add a text document to the knowledge base.

use docuforge_config::AppConfig;
use std::path::PathBuf;

pub async fn run(
    config: AppConfig,
    path: PathBuf,
    source: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(&path)
        .map_err(|e| format!("Failed to read {}: {e}", path.display()))?;

    let source = source.unwrap_or_else(|| {
        path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string())
    });

    let (_, ingestion) = super::knowledge_base(&config).await?;
    let result = ingestion
        .process_document(&text, &source, serde_json::Map::new())
        .await?;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
