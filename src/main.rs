mod analysis;
mod api;
mod config;
mod error;
mod extract;
mod fallback;
mod pipeline;
mod resolver;
mod types;

#[cfg(test)]
mod test_support;

use std::sync::Arc;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::api::health::HealthState;
use crate::api::latency::LatencyStats;
use crate::api::routes::{router, ApiState};
use crate::config::Config;
use crate::error::Result;
use crate::pipeline::BenchmarkPipeline;

#[tokio::main]
async fn main() {
    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {e}");
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cfg.log_level))
        .init();

    if let Err(e) = run(cfg).await {
        error!("Fatal error: {e}");
        std::process::exit(1);
    }
}

async fn run(cfg: Config) -> Result<()> {
    // --- Fallback tables: built once, before the first request ---
    let tables = cfg.catalog.fallback;
    info!(
        "Fallback tables ready: {} products, {} competitor categories (+ default bucket)",
        tables.product_count(),
        tables.category_count(),
    );

    // --- Upstream notices ---
    if cfg.catalog.credentials.is_none() {
        warn!("AMAZON_CLIENT_ID / AMAZON_CLIENT_SECRET / AMAZON_REFRESH_TOKEN not set; product and competitor lookups will use fallback tables.");
    } else {
        info!("Live catalog configured at {}", cfg.catalog.base_url);
    }
    if cfg.insights.api_key.is_none() {
        warn!("DEEPSEEK_API_KEY not set; insights will use the built-in template.");
    } else {
        info!("Narrative service configured at {} (model {})", cfg.insights.base_url, cfg.insights.model);
    }

    // --- Shared HTTP client for every upstream call ---
    let client = reqwest::Client::builder()
        .timeout(cfg.http_timeout)
        .build()?;

    let pipeline = BenchmarkPipeline::new(client, cfg.catalog.clone(), cfg.insights.clone());

    // --- HTTP API server ---
    let api_state = ApiState {
        pipeline: Arc::new(pipeline),
        health: Arc::new(HealthState::new()),
        latency: Arc::new(LatencyStats::new()),
    };
    let app = router(api_state);
    let bind_addr = format!("0.0.0.0:{}", cfg.api_port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("HTTP API listening on {bind_addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
