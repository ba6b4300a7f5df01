use chrono::{SecondsFormat, Utc};
use tracing::info;

use crate::analysis::{aggregate, InsightGenerator};
use crate::config::{CatalogConfig, InsightConfig, DEFAULT_MARKETPLACE};
use crate::error::{AppError, Result};
use crate::resolver::{CatalogClient, CompetitorResolver, ProductResolver};
use crate::types::{BenchmarkReport, BenchmarkRequest, SourceReport};

/// Product → competitors → aggregate → insights, strictly in sequence.
/// Holds only read-only configuration; every run is independent.
pub struct BenchmarkPipeline {
    products: ProductResolver,
    competitors: CompetitorResolver,
    insights: InsightGenerator,
}

impl BenchmarkPipeline {
    pub fn new(client: reqwest::Client, catalog: CatalogConfig, insights: InsightConfig) -> Self {
        let catalog = CatalogClient::new(client.clone(), catalog);
        Self {
            products: ProductResolver::new(catalog.clone()),
            competitors: CompetitorResolver::new(catalog),
            insights: InsightGenerator::new(client, insights),
        }
    }

    pub async fn run(&self, request: &BenchmarkRequest) -> Result<BenchmarkReport> {
        let raw = request
            .asin
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or(AppError::MissingIdentifier)?;
        let marketplace = request
            .marketplace
            .clone()
            .unwrap_or_else(|| DEFAULT_MARKETPLACE.to_string());

        let product = self.products.resolve(raw).await?;
        let target = product.data();
        let competitors = self
            .competitors
            .resolve_competitors(&target.category_id, &target.identifier)
            .await;

        let sources_product = product.source();
        let sources_competitors = competitors.source();
        let summary = aggregate(product.into_data(), competitors.into_data())?;

        let narrative = self.insights.generate_insights(&summary).await;
        let sources = SourceReport {
            product: sources_product,
            competitors: sources_competitors,
            insights: narrative.source(),
        };

        info!(
            identifier = %summary.target_product.identifier,
            category = %summary.category,
            competitors = summary.competitors.len(),
            product_source = ?sources.product.source,
            competitors_source = ?sources.competitors.source,
            insights_source = ?sources.insights.source,
            "[BENCHMARK] report ready"
        );

        Ok(BenchmarkReport {
            summary,
            ai_insights: narrative.into_data(),
            marketplace,
            sources,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::render_template;
    use crate::test_support::{catalog_config, insight_config};
    use crate::types::DataSource;

    fn offline_pipeline() -> BenchmarkPipeline {
        BenchmarkPipeline::new(
            reqwest::Client::new(),
            catalog_config("http://127.0.0.1:9", false),
            insight_config("http://127.0.0.1:9", None),
        )
    }

    fn request(asin: Option<&str>) -> BenchmarkRequest {
        BenchmarkRequest {
            asin: asin.map(str::to_string),
            marketplace: None,
        }
    }

    #[tokio::test]
    async fn offline_electronics_benchmark() {
        let report = offline_pipeline().run(&request(Some("B01DFKC2SO"))).await.unwrap();

        let summary = &report.summary;
        assert_eq!(summary.category, "Electronics");
        assert_eq!(summary.target_product.title, "Premium Wireless Headphones");
        assert_eq!(summary.target_product.price, 199.99);
        assert_eq!(summary.target_product.rating, 4.7);
        assert_eq!(summary.competitors.len(), 3);
        assert_eq!(summary.market_insights.average_price, 159.99);
        assert_eq!(report.marketplace, "amazon.com");
        assert_eq!(report.ai_insights, render_template(summary));
        assert_eq!(report.sources.product.source, DataSource::Fallback);
        assert_eq!(report.sources.competitors.source, DataSource::Fallback);
        assert_eq!(report.sources.insights.source, DataSource::Fallback);
        assert!(chrono::DateTime::parse_from_rfc3339(&report.timestamp).is_ok());
    }

    #[tokio::test]
    async fn competitors_follow_product_category() {
        let report = offline_pipeline().run(&request(Some("b07x2lsdm3"))).await.unwrap();
        assert_eq!(report.summary.category, "Home & Kitchen");
        let ids: Vec<_> = report.summary.competitors.iter().map(|c| c.identifier.as_str()).collect();
        assert_eq!(ids, ["B082VRM1VL", "B07PCMTW4Y", "B09STVN7JG"]);
    }

    #[tokio::test]
    async fn missing_identifier_is_rejected() {
        for req in [request(None), request(Some(""))] {
            let err = offline_pipeline().run(&req).await.unwrap_err();
            assert!(matches!(err, AppError::MissingIdentifier));
        }
    }

    #[tokio::test]
    async fn invalid_identifier_is_rejected() {
        let err = offline_pipeline().run(&request(Some("short"))).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidIdentifier { .. }));
    }

    #[tokio::test]
    async fn marketplace_is_echoed() {
        let req = BenchmarkRequest {
            asin: Some("B083TF7YD9".to_string()),
            marketplace: Some("amazon.co.uk".to_string()),
        };
        let report = offline_pipeline().run(&req).await.unwrap();
        assert_eq!(report.marketplace, "amazon.co.uk");
    }
}
