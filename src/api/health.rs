//! Shared service counters for the /health endpoint.
//! Updated by the benchmark handler after every request.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use crate::types::{DataSource, SourceReport, StageSource};

/// Live vs fallback counts for one pipeline stage.
#[derive(Default)]
pub struct StageCounters {
    live: AtomicU64,
    fallback: AtomicU64,
}

impl StageCounters {
    fn record(&self, source: &StageSource) {
        let counter = match source.source {
            DataSource::Live => &self.live,
            DataSource::Fallback => &self.fallback,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self) -> StageSnapshot {
        StageSnapshot {
            live: self.live.load(Ordering::Relaxed),
            fallback: self.fallback.load(Ordering::Relaxed),
        }
    }
}

/// Shared health metrics. Never read by the pipeline itself.
#[derive(Default)]
pub struct HealthState {
    requests: AtomicU64,
    failures: AtomicU64,
    product: StageCounters,
    competitors: StageCounters,
    insights: StageCounters,
}

impl HealthState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_success(&self, sources: &SourceReport) {
        self.requests.fetch_add(1, Ordering::Relaxed);
        self.product.record(&sources.product);
        self.competitors.record(&sources.competitors);
        self.insights.record(&sources.insights);
    }

    pub fn record_failure(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> HealthSnapshot {
        HealthSnapshot {
            status: "ok",
            requests: self.requests.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            product: self.product.snapshot(),
            competitors: self.competitors.snapshot(),
            insights: self.insights.snapshot(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StageSnapshot {
    pub live: u64,
    pub fallback: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthSnapshot {
    pub status: &'static str,
    pub requests: u64,
    pub failures: u64,
    pub product: StageSnapshot,
    pub competitors: StageSnapshot,
    pub insights: StageSnapshot,
}
