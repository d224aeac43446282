//! `docuforge doctor` — Check that the configured collaborators answer.

use docuforge_config::AppConfig;
use docuforge_core::Provider;
use docuforge_core::store::VectorStore;

/// Outcome of one diagnostic check.
#[derive(Debug, PartialEq)]
pub enum Check {
    Pass(String),
    Warn(String),
    Fail(String),
}

impl Check {
    fn is_issue(&self) -> bool {
        !matches!(self, Check::Pass(_))
    }
}

/// Ask the generation service and the vector store whether they are reachable.
pub async fn diagnose(config: &AppConfig, provider: &dyn Provider, store: &dyn VectorStore) -> Vec<Check> {
    let mut checks = Vec::new();

    if config.has_api_key() {
        checks.push(Check::Pass(format!("API key configured for '{}'", config.provider)));
    } else {
        checks.push(Check::Warn(format!("No API key configured for '{}'", config.provider)));
    }

    checks.push(match provider.health_check().await {
        Ok(true) => Check::Pass(format!("Provider '{}' reachable", provider.name())),
        Ok(false) => Check::Fail(format!("Provider '{}' rejected the health check", provider.name())),
        Err(e) => Check::Fail(format!("Provider '{}' unreachable: {e}", provider.name())),
    });

    checks.push(match store.count().await {
        Ok(points) => Check::Pass(format!(
            "{} collection '{}' holds {points} chunk(s)",
            store.name(),
            store.collection()
        )),
        Err(e) => Check::Fail(format!("{} collection '{}': {e}", store.name(), store.collection())),
    });

    checks
}

pub async fn run(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    println!("DocuForge Doctor");
    println!("================\n");

    let provider = docuforge_providers::build_from_config(&config)?;
    let store = docuforge_knowledge::build_store_from_config(&config)?;

    let checks = diagnose(&config, provider.as_ref(), store.as_ref()).await;
    for check in &checks {
        match check {
            Check::Pass(message) => println!("  ok    {message}"),
            Check::Warn(message) => println!("  warn  {message}"),
            Check::Fail(message) => println!("  FAIL  {message}"),
        }
    }

    let issues = checks.iter().filter(|c| c.is_issue()).count();
    println!();
    if issues == 0 {
        println!("All checks passed.");
        Ok(())
    } else {
        Err(format!("{issues} issue(s) found").into())
    }
}
