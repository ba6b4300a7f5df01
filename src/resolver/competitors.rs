use tracing::{debug, warn};

use crate::config::MAX_COMPETITORS;
use crate::error::Result;
use crate::extract;
use crate::resolver::CatalogClient;
use crate::types::{CompetitorRecord, FallbackReason, Resolved, Stage};

pub struct CompetitorResolver {
    catalog: CatalogClient,
}

impl CompetitorResolver {
    pub fn new(catalog: CatalogClient) -> Self {
        Self { catalog }
    }

    /// Returns 1..=5 competitors for `category_id`, never including
    /// `exclude_identifier`. An empty live result is treated as a failure.
    pub async fn resolve_competitors(
        &self,
        category_id: &str,
        exclude_identifier: &str,
    ) -> Resolved<Vec<CompetitorRecord>> {
        let reason = match self.fetch_live(category_id, exclude_identifier).await {
            Ok(live) if !live.is_empty() => {
                debug!(
                    category = %category_id,
                    count = live.len(),
                    stage = %Stage::Competitors,
                    "[COMPETITORS] resolved from live catalog"
                );
                return Resolved::Live(live);
            }
            Ok(_) => FallbackReason::EmptyLiveResult,
            Err(e) => FallbackReason::from_error(&e),
        };

        warn!(
            category = %category_id,
            identifier = %exclude_identifier,
            stage = %Stage::Competitors,
            reason = %reason,
            "[COMPETITORS] live search unusable, serving fallback table"
        );

        let data = self
            .catalog
            .config()
            .fallback
            .competitors(category_id)
            .iter()
            .filter(|c| c.identifier != exclude_identifier)
            .take(MAX_COMPETITORS)
            .cloned()
            .collect();
        Resolved::Fallback { data, reason }
    }

    async fn fetch_live(
        &self,
        category_id: &str,
        exclude_identifier: &str,
    ) -> Result<Vec<CompetitorRecord>> {
        let marketplace_id = self.catalog.config().marketplace_id.as_str();
        let body = self
            .catalog
            .get_json(
                Stage::Competitors,
                "/catalog/v0/items",
                &[("keywords", category_id), ("marketplaceIds", marketplace_id)],
            )
            .await?;

        let Some(items) = body.get("items").and_then(|i| i.as_array()) else {
            return Ok(Vec::new());
        };

        Ok(items
            .iter()
            .filter_map(|item| {
                let asin = item.get("asin")?.as_str()?.trim().to_uppercase();
                (!asin.is_empty() && asin != exclude_identifier).then_some((asin, item))
            })
            .take(MAX_COMPETITORS)
            .map(|(asin, item)| CompetitorRecord {
                category_id: category_id.to_string(),
                ..extract::product_from_item(&asin, item)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{catalog_client, mock_catalog, serve};
    use axum::{
        extract::Query,
        http::StatusCode,
        routing::get,
        Json, Router,
    };
    use serde_json::json;
    use std::collections::HashMap;

    fn ids(records: &[CompetitorRecord]) -> Vec<&str> {
        records.iter().map(|c| c.identifier.as_str()).collect()
    }

    #[tokio::test]
    async fn no_credentials_serves_category_bucket() {
        let resolver = CompetitorResolver::new(catalog_client("http://127.0.0.1:9", false));
        let resolved = resolver.resolve_competitors("electronics", "B01DFKC2SO").await;

        assert_eq!(resolved.reason(), Some(&FallbackReason::MissingCredentials));
        assert_eq!(
            ids(resolved.data()),
            ["B08X7JL3QL", "B07NDFT2NB", "B09KL7SV1M"]
        );
    }

    #[tokio::test]
    async fn unknown_category_serves_default_bucket() {
        let resolver = CompetitorResolver::new(catalog_client("http://127.0.0.1:9", false));
        let resolved = resolver.resolve_competitors("garden", "B01DFKC2SO").await;
        assert_eq!(ids(resolved.data()), ["B0123COMP1", "B0123COMP2", "B0123COMP3"]);
    }

    #[tokio::test]
    async fn fallback_never_includes_excluded_identifier() {
        let resolver = CompetitorResolver::new(catalog_client("http://127.0.0.1:9", false));
        let resolved = resolver.resolve_competitors("electronics", "B07NDFT2NB").await;
        assert_eq!(ids(resolved.data()), ["B08X7JL3QL", "B09KL7SV1M"]);
    }

    #[tokio::test]
    async fn live_results_are_filtered_and_truncated() {
        let items = Router::new().route(
            "/catalog/v0/items",
            get(|Query(q): Query<HashMap<String, String>>| async move {
                assert_eq!(q.get("keywords").map(String::as_str), Some("electronics"));
                assert_eq!(q.get("marketplaceIds").map(String::as_str), Some("ATVPDKIKX0DER"));
                let items: Vec<_> = ["B0000000A1", "B01DFKC2SO", "B0000000A2", "B0000000A3",
                    "B0000000A4", "B0000000A5", "B0000000A6"]
                    .iter()
                    .map(|asin| json!({ "asin": asin, "itemName": "Wireless Speaker", "price": { "amount": 50 } }))
                    .collect();
                Json(json!({ "items": items }))
            }),
        );
        let base = serve(mock_catalog(items)).await;
        let resolver = CompetitorResolver::new(catalog_client(&base, true));

        let resolved = resolver.resolve_competitors("electronics", "B01DFKC2SO").await;
        assert!(resolved.is_live());
        assert_eq!(
            ids(resolved.data()),
            ["B0000000A1", "B0000000A2", "B0000000A3", "B0000000A4", "B0000000A5"]
        );
        for c in resolved.data() {
            assert_eq!(c.category_id, "electronics");
            assert_eq!(c.price, 50.0);
            assert_eq!(c.keywords, ["wireless", "speaker"]);
        }
    }

    #[tokio::test]
    async fn live_identifiers_are_uppercased_before_exclusion() {
        let items = Router::new().route(
            "/catalog/v0/items",
            get(|| async {
                Json(json!({ "items": [
                    { "asin": " b01dfkc2so " },
                    { "asin": "b0000000a1", "price": 42 },
                ] }))
            }),
        );
        let base = serve(mock_catalog(items)).await;
        let resolver = CompetitorResolver::new(catalog_client(&base, true));

        let resolved = resolver.resolve_competitors("electronics", "B01DFKC2SO").await;
        assert!(resolved.is_live());
        assert_eq!(ids(resolved.data()), ["B0000000A1"]);
    }

    #[tokio::test]
    async fn empty_live_result_falls_back() {
        let items = Router::new().route(
            "/catalog/v0/items",
            get(|| async { Json(json!({ "items": [{ "asin": "B01DFKC2SO" }] })) }),
        );
        let base = serve(mock_catalog(items)).await;
        let resolver = CompetitorResolver::new(catalog_client(&base, true));

        let resolved = resolver.resolve_competitors("home_kitchen", "B01DFKC2SO").await;
        assert_eq!(resolved.reason(), Some(&FallbackReason::EmptyLiveResult));
        assert_eq!(ids(resolved.data()), ["B082VRM1VL", "B07PCMTW4Y", "B09STVN7JG"]);
    }

    #[tokio::test]
    async fn error_status_falls_back() {
        let items = Router::new().route(
            "/catalog/v0/items",
            get(|| async { StatusCode::FORBIDDEN }),
        );
        let base = serve(mock_catalog(items)).await;
        let resolver = CompetitorResolver::new(catalog_client(&base, true));

        let resolved = resolver.resolve_competitors("sports_outdoors", "B083TF7YD9").await;
        assert!(matches!(resolved.reason(), Some(FallbackReason::UpstreamUnavailable(_))));
        assert_eq!(resolved.data().len(), 3);
    }
}
