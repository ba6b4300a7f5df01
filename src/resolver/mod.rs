pub mod competitors;
pub mod product;
pub mod token;

pub use competitors::CompetitorResolver;
pub use product::ProductResolver;

use crate::config::CatalogConfig;
use crate::error::{AppError, Result};
use crate::types::Stage;

/// Authenticated access to the live catalog. Shared by both resolvers.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: reqwest::Client,
    config: CatalogConfig,
}

impl CatalogClient {
    pub fn new(client: reqwest::Client, config: CatalogConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// One authenticated GET against `{base_url}{path}`. Any non-2xx status is
    /// reported as `UpstreamUnavailable`; there are no retries.
    pub async fn get_json(
        &self,
        stage: Stage,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<serde_json::Value> {
        let token = token::fetch_access_token(
            &self.client,
            &self.config.token_url,
            self.config.credentials.as_ref(),
            stage,
        )
        .await?;

        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), path);
        let resp = self
            .client
            .get(&url)
            .query(query)
            .bearer_auth(&token)
            .header("x-amz-access-token", &token)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(AppError::UpstreamUnavailable {
                stage,
                detail: format!("catalog returned {status} for {path}"),
            });
        }

        Ok(resp.json().await?)
    }
}
