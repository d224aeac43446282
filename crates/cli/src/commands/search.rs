//! `docuforge search` — Query the knowledge base.

use docuforge_config::AppConfig;

pub async fn run(config: AppConfig, query: String, limit: usize) -> Result<(), Box<dyn std::error::Error>> {
    let (_, ingestion) = super::knowledge_base(&config).await?;
    let matches = ingestion.search_knowledge_base(&query, limit).await?;

    if matches.is_empty() {
        println!("No matches.");
        return Ok(());
    }

    for (i, m) in matches.iter().enumerate() {
        println!("{}. [{:.3}] {}", i + 1, m.score, m.source);
        println!("   {}", m.content.replace('\n', "\n   "));
    }
    Ok(())
}
