use tracing::{debug, warn};

use crate::error::{AppError, Result};
use crate::extract;
use crate::resolver::CatalogClient;
use crate::types::{FallbackReason, ProductRecord, Resolved, Stage};

/// Trim and uppercase, then require `^[A-Z0-9]{9,10}$`.
pub fn normalize_identifier(raw: &str) -> Result<String> {
    let id = raw.trim().to_uppercase();
    let valid = (9..=10).contains(&id.len())
        && id.bytes().all(|b| b.is_ascii_uppercase() || b.is_ascii_digit());
    if valid {
        Ok(id)
    } else {
        Err(AppError::InvalidIdentifier { identifier: raw.to_string() })
    }
}

pub struct ProductResolver {
    catalog: CatalogClient,
}

impl ProductResolver {
    pub fn new(catalog: CatalogClient) -> Self {
        Self { catalog }
    }

    /// Live lookup with a single attempt; any failure other than a malformed
    /// identifier is served from the fallback table.
    pub async fn resolve(&self, identifier: &str) -> Result<Resolved<ProductRecord>> {
        let id = normalize_identifier(identifier)?;

        match self.fetch_live(&id).await {
            Ok(record) => {
                debug!(identifier = %id, stage = %Stage::Product, "[PRODUCT] resolved from live catalog");
                Ok(Resolved::Live(record))
            }
            Err(e) => {
                let reason = FallbackReason::from_error(&e);
                warn!(
                    identifier = %id,
                    stage = %Stage::Product,
                    reason = %reason,
                    "[PRODUCT] live lookup failed, serving fallback record"
                );
                Ok(Resolved::Fallback {
                    data: self.catalog.config().fallback.product(&id),
                    reason,
                })
            }
        }
    }

    async fn fetch_live(&self, id: &str) -> Result<ProductRecord> {
        let path = format!("/products/v0/items/{id}");
        let body = self.catalog.get_json(Stage::Product, &path, &[]).await?;
        Ok(extract::product_from_item(id, &body))
    }
}
