//! `docuforge serve` — Start the HTTP API server.

use docuforge_config::AppConfig;

pub async fn run(mut config: AppConfig, port_override: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(port) = port_override {
        config.gateway.port = port;
    }

    println!("📄 {}", config.project_name);
    println!("   Listening: {}:{}", config.gateway.host, config.gateway.port);
    println!("   API prefix: {}", config.api_prefix);

    docuforge_gateway::start(config).await?;

    Ok(())
}
