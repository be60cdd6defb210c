//! Gateway server wiring the ingress to the investigation graph

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use triage_agent::{GraphConfig, InvestigationGraph};
use triage_core::{Error, GatewayConfig, IncidentSignal};
use triage_llm::{OllamaConfig, OllamaProvider};
use triage_tools::{create_default_registry, KubeClient};

struct AppState {
    graph: InvestigationGraph,
    model: String,
}

/// Build the investigation graph from environment configuration.
///
/// Fails fast when the Kubernetes client cannot be set up; a triage service
/// that cannot reach its cluster has nothing to offer. Also returns the
/// reasoning model name for health reporting.
pub fn build_graph() -> triage_core::Result<(InvestigationGraph, String)> {
    let kube = Arc::new(KubeClient::from_env()?);
    let registry = Arc::new(create_default_registry(kube));
    info!("Registered tools: {:?}", registry.list());

    let ollama = OllamaConfig::from_env();
    let model = ollama.model.clone();
    info!(
        "Reasoning backend: ollama model={} at {}",
        ollama.model, ollama.base_url
    );
    let provider = Arc::new(OllamaProvider::new(ollama));

    let graph = InvestigationGraph::new(provider, registry, GraphConfig::from_env());
    Ok((graph, model))
}

pub async fn start_gateway(config: GatewayConfig) -> anyhow::Result<()> {
    let (graph, model) = build_graph()?;
    let state = Arc::new(AppState { graph, model });

    let app = Router::new()
        .route("/", get(root_handler))
        .route("/events", post(events_handler))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any))
        .with_state(state);

    let bind_addr: SocketAddr = format!("{}:{}", config.bind.to_addr(), config.port).parse()?;

    info!("Triage Gateway v{} starting", env!("CARGO_PKG_VERSION"));
    info!("  Listening on: {}", bind_addr);
    info!("  Ingress:      http://{}/events", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn root_handler() -> impl IntoResponse {
    Json(serde_json::json!({ "message": "Welcome to the triage agent service" }))
}

async fn events_handler(
    State(state): State<Arc<AppState>>,
    Json(signal): Json<IncidentSignal>,
) -> impl IntoResponse {
    info!(
        event_type = %signal.event_type,
        severity = %signal.severity,
        resource = %signal.resource,
        source = %signal.source,
        "event received"
    );

    match state.graph.run(signal.into()).await {
        Ok(outcome) => {
            let decision = outcome.decision().map(|d| d.as_str()).unwrap_or("none");
            info!("Agent decision: {}", decision);
            info!("Root cause: {}", outcome.root_cause().unwrap_or("unknown"));

            (
                StatusCode::OK,
                Json(serde_json::json!({
                    "message": "Event received",
                    "decision": decision,
                    "root_cause": outcome.root_cause(),
                })),
            )
        }
        Err(e) => {
            error!("Investigation failed: {}", e);
            let status = match e {
                Error::Reasoning { .. } => StatusCode::BAD_GATEWAY,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (
                status,
                Json(serde_json::json!({
                    "message": "Investigation failed",
                    "error": e.to_string(),
                })),
            )
        }
    }
}

async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "model": state.model,
        "tools": state.graph.tools().list().len(),
    }))
}
