//! HTTP API v1 — ingestion, search, and document generation.
//!
//! Endpoints (nested under the configured prefix, default `/api/v1`):
//!
//! - `POST /ingest`    — Split, embed, and store a text document
//! - `POST /search`    — Semantic search over the knowledge base
//! - `POST /generate`  — Run the draft/critique workflow for a topic

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::post,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

use docuforge_agent::{DocumentWorkflow, WorkflowOutcome};
use docuforge_config::AppConfig;
use docuforge_core::error::{Error, RetrievalError};
use docuforge_core::retrieval::RetrievedChunk;
use docuforge_knowledge::{IngestResult, IngestionService};

// ── State ─────────────────────────────────────────────────────────────────

/// Shared state for the v1 API. Collaborators are built once at startup.
pub struct ApiV1State {
    pub config: AppConfig,
    pub ingestion: Arc<IngestionService>,
    pub workflow: Arc<DocumentWorkflow>,
}

pub type SharedApiState = Arc<ApiV1State>;

// ── Router ────────────────────────────────────────────────────────────────

/// Build the v1 API router. Nest this under the API prefix in the main router.
pub fn v1_router(state: SharedApiState) -> Router {
    Router::new()
        .route("/ingest", post(ingest_handler))
        .route("/search", post(search_handler))
        .route("/generate", post(generate_handler))
        .with_state(state)
}

// ── Errors ────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Error returned by v1 handlers.
///
/// Collaborator failures and cancellations become `503 Service Unavailable`;
/// anything else is a `500`.
#[derive(Debug)]
pub struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        Self(e)
    }
}

impl From<RetrievalError> for ApiError {
    fn from(e: RetrievalError) -> Self {
        Self(Error::Retrieval(e))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            e if e.is_collaborator_failure() => StatusCode::SERVICE_UNAVAILABLE,
            Error::Cancelled { .. } => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        error!(status = status.as_u16(), error = %self.0, "Request failed");

        (
            status,
            Json(ErrorResponse {
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

// ── Ingest ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct IngestRequest {
    /// Raw document text
    pub text: String,
    /// Filename or origin of the document
    pub source_name: String,
    #[serde(default)]
    pub metadata: Option<serde_json::Map<String, serde_json::Value>>,
}

async fn ingest_handler(
    State(state): State<SharedApiState>,
    Json(req): Json<IngestRequest>,
) -> Result<Json<IngestResult>, ApiError> {
    let result = state
        .ingestion
        .process_document(&req.text, &req.source_name, req.metadata.unwrap_or_default())
        .await?;
    Ok(Json(result))
}

// ── Search ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    /// Clamped to `1..=MAX_SEARCH_LIMIT` by the ingestion service
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    3
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub matches: Vec<RetrievedChunk>,
}

async fn search_handler(
    State(state): State<SharedApiState>,
    Json(req): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
    let matches = state
        .ingestion
        .search_knowledge_base(&req.query, req.limit)
        .await?;
    Ok(Json(SearchResponse { matches }))
}

// ── Generate ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    /// The subject to write about
    pub topic: String,
    /// Requested tone; recorded but the house style always applies
    #[serde(default = "default_tone")]
    pub tone: String,
}

fn default_tone() -> String {
    "technical".into()
}

async fn generate_handler(
    State(state): State<SharedApiState>,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<WorkflowOutcome>, ApiError> {
    info!(topic = %req.topic, tone = %req.tone, "Generate request");
    let outcome = state.workflow.generate(&req.topic).await?;
    Ok(Json(outcome))
}
