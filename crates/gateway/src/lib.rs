//! HTTP API gateway for DocuForge.
//!
//! Exposes a health check plus the versioned API for ingestion, search,
//! and reviewed document generation.
//!
//! Built on Axum for high performance async HTTP.

pub mod api_v1;

use axum::extract::DefaultBodyLimit;
use axum::{Router, extract::State, response::Json, routing::get};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use docuforge_agent::DocumentWorkflow;
use docuforge_config::AppConfig;
use docuforge_core::retrieval::Retriever;

pub use api_v1::{ApiV1State, SharedApiState};

/// Maximum request body (ingested documents can be large).
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Build the full router: `/health` plus the v1 API under `api_prefix`.
pub fn build_router(state: SharedApiState) -> Router {
    let prefix = state.config.api_prefix.clone();

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
        .allow_headers([axum::http::header::CONTENT_TYPE])
        .max_age(std::time::Duration::from_secs(3600));

    Router::new()
        .route("/health", get(health_handler))
        .with_state(state.clone())
        .nest(&prefix, api_v1::v1_router(state))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors)
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

/// Build every collaborator once from `config`.
///
/// `config` is validated first, so [`build_router`] can nest under its prefix.
pub async fn build_state(config: AppConfig) -> Result<SharedApiState, Box<dyn std::error::Error>> {
    config.validate()?;
    let provider = docuforge_providers::build_from_config(&config)?;

    let ingestion = Arc::new(docuforge_knowledge::build_ingestion_from_config(&config, provider.clone())?);
    ingestion.init().await?;

    let retriever: Arc<dyn Retriever> = ingestion.clone();
    let workflow = Arc::new(DocumentWorkflow::from_config(provider, retriever, &config));

    Ok(Arc::new(ApiV1State {
        config,
        ingestion,
        workflow,
    }))
}

/// Start the gateway HTTP server and run until Ctrl-C.
pub async fn start(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);
    let project = config.project_name.clone();

    info!(
        project = %project,
        environment = config.environment.as_str(),
        "Starting service"
    );
    info!(
        backend = ?config.vector_store.backend,
        target = %config.vector_store.url(),
        collection = %config.vector_store.collection,
        "Configuration loaded"
    );

    let app = build_router(build_state(config).await?);

    info!(addr = %addr, "Gateway listening");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    info!(project = %project, "Shutting down");
    Ok(())
}

// --- Handlers ---

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub environment: String,
    pub service: String,
}

async fn health_handler(State(state): State<SharedApiState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "active".into(),
        environment: state.config.environment.as_str().into(),
        service: "DocuForge API".into(),
    })
}
