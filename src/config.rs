use std::time::Duration;

use crate::error::{AppError, Result};
use crate::fallback::{self, FallbackTables};

pub const AMAZON_SP_API_URL: &str = "https://sandbox.sellingpartnerapi-na.amazon.com";
pub const AMAZON_TOKEN_URL: &str = "https://api.amazon.com/auth/o2/token";
pub const AMAZON_MARKETPLACE_ID: &str = "ATVPDKIKX0DER";
pub const DEEPSEEK_API_URL: &str = "https://api.deepseek.com";
pub const DEEPSEEK_MODEL: &str = "deepseek-r1";

pub const DEFAULT_MARKETPLACE: &str = "amazon.com";

/// Competitors kept per benchmark, both live and after aggregation.
pub const MAX_COMPETITORS: usize = 5;

/// Keywords kept per product record.
pub const MAX_KEYWORDS: usize = 4;

/// Keywords reported in `MarketInsights::top_keywords`.
pub const TOP_KEYWORDS: usize = 10;

/// Timeout applied to every outbound request (HTTP_TIMEOUT_SECS).
pub const HTTP_TIMEOUT_SECS: u64 = 30;

/// Narrative request parameters.
pub const INSIGHT_TEMPERATURE: f64 = 0.7;
pub const INSIGHT_MAX_TOKENS: u32 = 1500;

/// Substitutes used when none of the prioritized response paths is present.
pub mod extraction_defaults {
    pub const PRICE: f64 = 99.99;
    pub const RATING: f64 = 4.5;
    pub const REVIEW_COUNT: u32 = 250;
    pub const RANK: u32 = 200;
    pub const CATEGORY_ID: &str = "electronics";
    pub const CATEGORY_NAME: &str = "Electronics";
    pub const KEYWORDS: &[&str] = &["quality", "value", "popular", "reliable"];
}

/// Login-with-Amazon refresh-token credentials. `Debug` never prints secrets.
#[derive(Clone)]
pub struct AmazonCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
}

impl std::fmt::Debug for AmazonCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AmazonCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}

/// Everything the product and competitor resolvers need for one live call
/// and its fallback.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub base_url: String,
    pub token_url: String,
    pub marketplace_id: String,
    pub credentials: Option<AmazonCredentials>,
    pub fallback: &'static FallbackTables,
}

#[derive(Clone)]
pub struct InsightConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
}

impl std::fmt::Debug for InsightConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InsightConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub api_port: u16,
    pub http_timeout: Duration,
    pub catalog: CatalogConfig,
    pub insights: InsightConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            api_port: std::env::var("API_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse::<u16>()
                .map_err(|_| AppError::Config("API_PORT must be a valid port number".to_string()))?,
            http_timeout: Duration::from_secs(
                std::env::var("HTTP_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse::<u64>().ok())
                    .unwrap_or(HTTP_TIMEOUT_SECS),
            ),
            catalog: CatalogConfig {
                base_url: std::env::var("AMAZON_SP_API_URL")
                    .unwrap_or_else(|_| AMAZON_SP_API_URL.to_string()),
                token_url: std::env::var("AMAZON_TOKEN_URL")
                    .unwrap_or_else(|_| AMAZON_TOKEN_URL.to_string()),
                marketplace_id: std::env::var("AMAZON_MARKETPLACE_ID")
                    .unwrap_or_else(|_| AMAZON_MARKETPLACE_ID.to_string()),
                credentials: amazon_credentials_from_env(),
                fallback: fallback::tables(),
            },
            insights: InsightConfig {
                base_url: std::env::var("DEEPSEEK_API_URL")
                    .unwrap_or_else(|_| DEEPSEEK_API_URL.to_string()),
                api_key: non_empty_env("DEEPSEEK_API_KEY"),
                model: std::env::var("DEEPSEEK_MODEL")
                    .unwrap_or_else(|_| DEEPSEEK_MODEL.to_string()),
            },
        })
    }
}

/// All three values must be set for live catalog calls; otherwise the
/// resolvers go straight to fallback data.
fn amazon_credentials_from_env() -> Option<AmazonCredentials> {
    Some(AmazonCredentials {
        client_id: non_empty_env("AMAZON_CLIENT_ID")?,
        client_secret: non_empty_env("AMAZON_CLIENT_SECRET")?,
        refresh_token: non_empty_env("AMAZON_REFRESH_TOKEN")?,
    })
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
