use axum::{
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, sync::Arc};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::error::AppError;
use crate::search::{SearchEngine, SearchRequest, SearchResponse};

#[derive(Clone)]
struct AppState {
    search_engine: Arc<SearchEngine>,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    s: String,
    #[serde(default = "default_filter")]
    filter: String,
    template: Option<String>,
    #[serde(rename = "liveCount")]
    live_count: Option<usize>,
    #[serde(rename = "liveSearch")]
    live_search: Option<String>,
}

fn default_filter() -> String {
    "*".to_string()
}

impl From<SearchQuery> for SearchRequest {
    fn from(params: SearchQuery) -> Self {
        let live = params.live_search.is_some_and(|flag| !flag.is_empty());
        SearchRequest {
            query: params.s,
            filter: params.filter,
            template: params.template,
            live_limit: params.live_count,
            live,
            case_sensitive: false,
        }
    }
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

pub fn router(search_engine: SearchEngine) -> Router {
    let state = AppState {
        search_engine: Arc::new(search_engine),
    };

    Router::new()
        .route("/api/health", get(health_handler))
        .route("/api/search", get(search_handler))
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, search_engine: SearchEngine) -> anyhow::Result<()> {
    let root = search_engine.settings().root.clone();
    let app = router(search_engine);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("🚀 Server listening on http://{}", addr);
    tracing::info!("📁 Searching pages under {}/", root.display());
    tracing::info!("🔍 Search API available at http://{}/api/search?s=<term>", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<SearchResponse>, AppError> {
    let start = std::time::Instant::now();
    let request = SearchRequest::from(params);

    let engine = Arc::clone(&state.search_engine);
    let response = tokio::task::spawn_blocking(move || engine.search(&request))
        .await
        .map_err(|e| {
            tracing::error!("Search task failed: {}", e);
            AppError::Internal(e.to_string())
        })?
        .map_err(|e| {
            tracing::warn!("Search rejected: {}", e);
            AppError::from(e)
        })?;

    tracing::info!(
        "Search query='{}' matched {} pages ({} matches) in {}ms",
        response.query,
        response.results_count,
        response.total_matches,
        start.elapsed().as_millis()
    );

    Ok(Json(response))
}
