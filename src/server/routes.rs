//! HTTP route handlers for the embedding store API.

use crate::error::EmbeddingDbError;
use crate::server::AppState;
use crate::store::{Query, SearchOptions};
use crate::vector::Vector;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

const DEFAULT_K: usize = 10;

// --- Request/Response types ---

#[derive(Deserialize)]
pub struct InsertRequest {
    pub label: String,
    pub vector: Vec<f64>,
}

#[derive(Deserialize)]
pub struct SearchRequest {
    pub label: Option<String>,
    pub vector: Option<Vec<f64>>,
    pub k: Option<usize>,
    #[serde(default)]
    pub exclude_self: bool,
}

#[derive(Serialize)]
pub struct SearchResultResponse {
    pub label: String,
    pub score: f64,
}

#[derive(Serialize)]
pub struct VectorResponse {
    pub label: String,
    pub vector: Vector,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub vector_count: usize,
    pub dimension: usize,
}

#[derive(Serialize)]
pub struct MetricsResponse {
    pub total_queries: u64,
    pub total_inserts: u64,
    pub total_rejected: u64,
    pub avg_query_latency_us: f64,
    pub p50_query_latency_us: f64,
    pub p95_query_latency_us: f64,
    pub p99_query_latency_us: f64,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

fn lock_poisoned() -> ApiError {
    api_error(StatusCode::INTERNAL_SERVER_ERROR, "Lock poisoned")
}

fn status_for(err: &EmbeddingDbError) -> StatusCode {
    match err {
        EmbeddingDbError::NotFound { .. } => StatusCode::NOT_FOUND,
        EmbeddingDbError::ZeroVector => StatusCode::UNPROCESSABLE_ENTITY,
        EmbeddingDbError::DimensionMismatch { .. }
        | EmbeddingDbError::InvalidVector { .. }
        | EmbeddingDbError::InvalidDimension { .. } => StatusCode::BAD_REQUEST,
        EmbeddingDbError::Embedding(_) => StatusCode::BAD_GATEWAY,
        EmbeddingDbError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn rejected(state: &AppState, err: EmbeddingDbError) -> ApiError {
    if let Ok(mut metrics) = state.metrics.write() {
        metrics.record_rejected();
    }
    api_error(status_for(&err), err.to_string())
}

// --- Router ---

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/vectors", post(insert_vector).get(list_vectors))
        .route("/vectors/{label}", get(get_vector))
        .route("/search", post(search_vectors))
        .route("/health", get(health))
        .route("/metrics", get(get_metrics))
        .with_state(state)
}

// --- Handlers ---

async fn insert_vector(
    State(state): State<Arc<AppState>>,
    Json(req): Json<InsertRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let vector = Vector::new(req.vector);

    let inserted = {
        let mut store = state.store.write().map_err(|_| lock_poisoned())?;
        store.insert(req.label.clone(), vector)
    };
    inserted.map_err(|e| rejected(&state, e))?;

    if let Ok(mut metrics) = state.metrics.write() {
        metrics.record_insert();
    }
    debug!(label = %req.label, "vector inserted");

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({"label": req.label, "status": "inserted"})),
    ))
}

async fn get_vector(
    State(state): State<Arc<AppState>>,
    Path(label): Path<String>,
) -> Result<Json<VectorResponse>, ApiError> {
    let store = state.store.read().map_err(|_| lock_poisoned())?;

    match store.get(&label) {
        Ok(vector) => Ok(Json(VectorResponse {
            vector: vector.clone(),
            label,
        })),
        Err(e) => Err(api_error(status_for(&e), e.to_string())),
    }
}

async fn search_vectors(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SearchRequest>,
) -> Result<Json<Vec<SearchResultResponse>>, ApiError> {
    let k = req.k.unwrap_or(DEFAULT_K);
    let options = SearchOptions {
        exclude_self: req.exclude_self,
    };
    let raw = req.vector.map(Vector::new);

    let query = match (req.label.as_deref(), raw.as_ref()) {
        (Some(label), None) => Query::Label(label),
        (None, Some(vector)) => Query::Vector(vector),
        _ => {
            return Err(api_error(
                StatusCode::BAD_REQUEST,
                "Exactly one of 'label' or 'vector' is required",
            ))
        }
    };

    let start = Instant::now();

    let results = {
        let store = state.store.read().map_err(|_| lock_poisoned())?;
        store.search(query, k, options)
    };
    let results = results.map_err(|e| rejected(&state, e))?;

    let elapsed = start.elapsed();

    if let Ok(mut metrics) = state.metrics.write() {
        metrics.record_query(elapsed);
    }

    let response: Vec<SearchResultResponse> = results
        .into_iter()
        .map(|r| SearchResultResponse {
            label: r.label,
            score: r.score,
        })
        .collect();

    Ok(Json(response))
}

async fn list_vectors(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<String>>, ApiError> {
    let store = state.store.read().map_err(|_| lock_poisoned())?;

    let mut labels = store.labels();
    labels.sort();
    Ok(Json(labels))
}

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let (count, dimension) = state
        .store
        .read()
        .map(|s| (s.len(), s.dimension()))
        .unwrap_or((0, 0));

    Json(HealthResponse {
        status: "ok".to_string(),
        vector_count: count,
        dimension,
    })
}

async fn get_metrics(
    State(state): State<Arc<AppState>>,
) -> Result<Json<MetricsResponse>, ApiError> {
    let metrics = state.metrics.read().map_err(|_| lock_poisoned())?;
    let latency = metrics.latency_summary();

    Ok(Json(MetricsResponse {
        total_queries: metrics.total_queries(),
        total_inserts: metrics.total_inserts(),
        total_rejected: metrics.total_rejected(),
        avg_query_latency_us: latency.avg_us,
        p50_query_latency_us: latency.p50_us,
        p95_query_latency_us: latency.p95_us,
        p99_query_latency_us: latency.p99_us,
    }))
}
