//! `docuforge init` — Write a default configuration file.

use docuforge_config::AppConfig;
use std::path::PathBuf;

pub async fn run(path: Option<PathBuf>, force: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config_path = path.unwrap_or_else(|| AppConfig::config_dir().join("config.toml"));

    if config_path.exists() && !force {
        println!("Config already exists: {}", config_path.display());
        println!("Use --force to overwrite.");
        return Ok(());
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&config_path, AppConfig::default_toml())?;

    println!("✅ Wrote {}", config_path.display());
    println!("   Set an API key with `api_key = \"...\"` or the OPENAI_API_KEY variable.");
    Ok(())
}
