use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::AppError;

// ---------------------------------------------------------------------------
// Product records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

/// A catalog listing as seen by the benchmark. Used for both the target product
/// and its competitors; `estimated_sales` and `market_share` are independent
/// per-record estimates and are not normalized across a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    #[serde(rename = "asin")]
    pub identifier: String,
    pub title: String,
    pub price: f64,
    /// 0.0–5.0
    pub rating: f64,
    #[serde(rename = "reviews")]
    pub review_count: u32,
    pub estimated_sales: u64,
    /// Percentage, 0–100.
    pub market_share: f64,
    pub category_id: String,
    pub category_name: String,
    /// At most `MAX_KEYWORDS` entries.
    pub keywords: Vec<String>,
    pub price_history: PriceRange,
    #[serde(rename = "rankingInfo")]
    pub rankings: BTreeMap<String, u32>,
}

pub type CompetitorRecord = ProductRecord;

// ---------------------------------------------------------------------------
// Market summary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketInsights {
    pub total_market_size: u64,
    pub average_price: f64,
    pub average_rating: f64,
    pub price_range: PriceRange,
    pub top_keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketSummary {
    pub category: String,
    pub target_product: ProductRecord,
    pub competitors: Vec<CompetitorRecord>,
    pub market_insights: MarketInsights,
}

// ---------------------------------------------------------------------------
// Stage provenance
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Product,
    Competitors,
    Insights,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Stage::Product => "product",
            Stage::Competitors => "competitors",
            Stage::Insights => "insights",
        };
        write!(f, "{s}")
    }
}

/// Why a stage served fallback data instead of a live response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    MissingCredentials,
    UpstreamUnavailable(String),
    /// The live call succeeded but nothing usable was left after filtering.
    EmptyLiveResult,
}

impl FallbackReason {
    /// Collapse a live-call failure into the reason recorded on the fallback.
    pub fn from_error(err: &AppError) -> Self {
        match err {
            AppError::MissingCredentials(_) => FallbackReason::MissingCredentials,
            AppError::UpstreamUnavailable { detail, .. } => {
                FallbackReason::UpstreamUnavailable(detail.clone())
            }
            other => FallbackReason::UpstreamUnavailable(other.to_string()),
        }
    }
}

impl std::fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FallbackReason::MissingCredentials => write!(f, "missing_credentials"),
            FallbackReason::UpstreamUnavailable(detail) => {
                write!(f, "upstream_unavailable: {detail}")
            }
            FallbackReason::EmptyLiveResult => write!(f, "empty_live_result"),
        }
    }
}

/// Outcome of a live-then-fallback stage.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved<T> {
    Live(T),
    Fallback { data: T, reason: FallbackReason },
}

impl<T> Resolved<T> {
    pub fn data(&self) -> &T {
        match self {
            Resolved::Live(data) | Resolved::Fallback { data, .. } => data,
        }
    }

    pub fn into_data(self) -> T {
        match self {
            Resolved::Live(data) | Resolved::Fallback { data, .. } => data,
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, Resolved::Live(_))
    }

    pub fn reason(&self) -> Option<&FallbackReason> {
        match self {
            Resolved::Live(_) => None,
            Resolved::Fallback { reason, .. } => Some(reason),
        }
    }

    pub fn source(&self) -> StageSource {
        StageSource {
            source: if self.is_live() { DataSource::Live } else { DataSource::Fallback },
            reason: self.reason().map(|r| r.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    Live,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageSource {
    pub source: DataSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceReport {
    pub product: StageSource,
    pub competitors: StageSource,
    pub insights: StageSource,
}

// ---------------------------------------------------------------------------
// Request / response
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BenchmarkRequest {
    #[serde(alias = "identifier")]
    pub asin: Option<String>,
    pub marketplace: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkReport {
    #[serde(flatten)]
    pub summary: MarketSummary,
    pub ai_insights: String,
    pub marketplace: String,
    pub sources: SourceReport,
    pub timestamp: String,
}
