use serde_json::json;
use tracing::{debug, warn};

use crate::config::{InsightConfig, INSIGHT_MAX_TOKENS, INSIGHT_TEMPERATURE};
use crate::error::{AppError, Result};
use crate::types::{FallbackReason, MarketSummary, Resolved, Stage};

/// Narrative generation: the external language model when a key is
/// configured, otherwise (or on any failure) the deterministic template.
pub struct InsightGenerator {
    client: reqwest::Client,
    config: InsightConfig,
}

impl InsightGenerator {
    pub fn new(client: reqwest::Client, config: InsightConfig) -> Self {
        Self { client, config }
    }

    pub async fn generate_insights(&self, summary: &MarketSummary) -> Resolved<String> {
        match self.request_narrative(summary).await {
            Ok(text) => {
                debug!(category = %summary.category, stage = %Stage::Insights, "[INSIGHTS] narrative generated");
                Resolved::Live(text)
            }
            Err(e) => {
                let reason = FallbackReason::from_error(&e);
                warn!(
                    category = %summary.category,
                    identifier = %summary.target_product.identifier,
                    stage = %Stage::Insights,
                    reason = %reason,
                    "[INSIGHTS] narrative service unavailable, using template"
                );
                Resolved::Fallback { data: render_template(summary), reason }
            }
        }
    }

    async fn request_narrative(&self, summary: &MarketSummary) -> Result<String> {
        let Some(api_key) = self.config.api_key.as_deref() else {
            return Err(AppError::MissingCredentials(Stage::Insights));
        };

        let body = json!({
            "model": self.config.model,
            "messages": [
                {
                    "role": "system",
                    "content": format!(
                        "You are an expert in e-commerce competitive analysis. Analyze the provided market data \
                         for products in the {} category and generate detailed strategic insights.",
                        summary.category
                    ),
                },
                {
                    "role": "user",
                    "content": format!(
                        "Analyze this {} market data and provide strategic insights: {}",
                        summary.category,
                        serde_json::to_string(summary)?
                    ),
                },
            ],
            "temperature": INSIGHT_TEMPERATURE,
            "max_tokens": INSIGHT_MAX_TOKENS,
        });

        let url = format!("{}/v1/chat/completions", self.config.base_url.trim_end_matches('/'));
        let resp = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(AppError::UpstreamUnavailable {
                stage: Stage::Insights,
                detail: format!("narrative service returned {status}"),
            });
        }

        let result: serde_json::Value = resp.json().await?;
        result
            .pointer("/choices/0/message/content")
            .and_then(|c| c.as_str())
            .filter(|c| !c.trim().is_empty())
            .map(str::to_string)
            .ok_or_else(|| AppError::UpstreamUnavailable {
                stage: Stage::Insights,
                detail: "response had no message content".to_string(),
            })
    }
}

/// Deterministic narrative built only from `summary`.
pub fn render_template(summary: &MarketSummary) -> String {
    let target = &summary.target_product;
    let insights = &summary.market_insights;
    let keyword = |i: usize| target.keywords.get(i).map(String::as_str).unwrap_or("core features");
    let top_three = insights
        .top_keywords
        .iter()
        .take(3)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "Based on the analysis of your product in the {category} category:

1. Market Position:
   - Your product is positioned in the mid-to-premium segment
   - Price point of ${price} is competitive within the market range
   - Current market share of {share}% indicates strong presence

2. Competitive Analysis:
   - Strong rating of {rating}/5 compared to category average of {avg_rating:.1}
   - {reviews} customer reviews show good market validation
   - Key differentiators: {keywords}

3. Recommendations:
   - Consider price optimization within {band_min}-{band_max} range
   - Focus on keywords: {top_three}
   - Potential to increase market share through targeted marketing

4. Growth Opportunities:
   - Expand product visibility in {category} category
   - Leverage positive ratings for marketing
   - Focus on competitive advantages in {first} and {second}

5. Action Items:
   - Monitor competitor pricing strategies
   - Enhance product listings with top-performing keywords
   - Focus on maintaining high customer satisfaction",
        category = summary.category,
        price = target.price,
        share = target.market_share,
        rating = target.rating,
        avg_rating = insights.average_rating,
        reviews = target.review_count,
        keywords = target.keywords.join(", "),
        band_min = insights.price_range.min,
        band_max = insights.price_range.max,
        first = keyword(0),
        second = keyword(1),
    )
}
