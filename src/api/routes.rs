use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tracing::{error, warn};

use crate::api::health::{HealthSnapshot, HealthState};
use crate::api::latency::LatencyStats;
use crate::error::AppError;
use crate::pipeline::BenchmarkPipeline;
use crate::types::{BenchmarkReport, BenchmarkRequest};

#[derive(Clone)]
pub struct ApiState {
    pub pipeline: Arc<BenchmarkPipeline>,
    pub health: Arc<HealthState>,
    pub latency: Arc<LatencyStats>,
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/api/benchmarking", post(post_benchmark))
        .route("/health", get(get_health))
        .route("/stats/latency", get(get_stats_latency))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct LatencyResponse {
    pub samples: u64,
    pub p50_ms: Option<f64>,
    pub p95_ms: Option<f64>,
    pub p99_ms: Option<f64>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn post_benchmark(
    State(state): State<ApiState>,
    body: Result<Json<BenchmarkRequest>, JsonRejection>,
) -> Result<Json<BenchmarkReport>, AppError> {
    let started = Instant::now();

    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) => {
            state.health.record_failure();
            warn!(
                status = rejection.status().as_u16(),
                "[BENCHMARK] rejected request body: {}",
                rejection.body_text()
            );
            return Err(rejection.into());
        }
    };

    match state.pipeline.run(&request).await {
        Ok(report) => {
            state.latency.record(started.elapsed());
            state.health.record_success(&report.sources);
            Ok(Json(report))
        }
        Err(e) => {
            state.health.record_failure();
            error!(
                identifier = request.asin.as_deref().unwrap_or(""),
                status = e.status().as_u16(),
                "[BENCHMARK] request failed: {e}"
            );
            Err(e)
        }
    }
}

async fn get_health(State(state): State<ApiState>) -> Json<HealthSnapshot> {
    Json(state.health.snapshot())
}

async fn get_stats_latency(State(state): State<ApiState>) -> Json<LatencyResponse> {
    let (p50_ms, p95_ms, p99_ms) = state.latency.percentiles_ms();
    Json(LatencyResponse {
        samples: state.latency.len(),
        p50_ms,
        p95_ms,
        p99_ms,
    })
}
