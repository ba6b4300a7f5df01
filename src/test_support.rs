//! Local stand-ins for the upstream services, shared by unit tests.

use axum::{routing::post, Json, Router};

use crate::config::{AmazonCredentials, CatalogConfig, InsightConfig};
use crate::fallback;
use crate::resolver::CatalogClient;

/// Serve `app` on an ephemeral local port and return its base URL.
pub async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

pub fn test_credentials() -> AmazonCredentials {
    AmazonCredentials {
        client_id: "client".to_string(),
        client_secret: "secret".to_string(),
        refresh_token: "refresh".to_string(),
    }
}

/// Catalog config whose token endpoint lives at `{base}/token`.
pub fn catalog_config(base: &str, with_credentials: bool) -> CatalogConfig {
    CatalogConfig {
        base_url: base.to_string(),
        token_url: format!("{base}/token"),
        marketplace_id: "ATVPDKIKX0DER".to_string(),
        credentials: with_credentials.then(test_credentials),
        fallback: fallback::tables(),
    }
}

pub fn catalog_client(base: &str, with_credentials: bool) -> CatalogClient {
    CatalogClient::new(reqwest::Client::new(), catalog_config(base, with_credentials))
}

pub fn insight_config(base: &str, api_key: Option<&str>) -> InsightConfig {
    InsightConfig {
        base_url: base.to_string(),
        api_key: api_key.map(str::to_string),
        model: "deepseek-r1".to_string(),
    }
}

/// Adds a token endpoint that always grants, in front of the given catalog routes.
pub fn mock_catalog(routes: Router) -> Router {
    routes.route(
        "/token",
        post(|| async { Json(serde_json::json!({ "access_token": "test-token" })) }),
    )
}
