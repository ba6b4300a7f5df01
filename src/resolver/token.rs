use tracing::{debug, warn};

use crate::config::AmazonCredentials;
use crate::error::{AppError, Result};
use crate::types::Stage;

/// Exchange the configured refresh token for a short-lived access token.
/// No caching: every live call fetches its own token.
pub async fn fetch_access_token(
    client: &reqwest::Client,
    token_url: &str,
    credentials: Option<&AmazonCredentials>,
    stage: Stage,
) -> Result<String> {
    let Some(creds) = credentials else {
        return Err(AppError::MissingCredentials(stage));
    };

    let resp = client
        .post(token_url)
        .form(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", creds.refresh_token.as_str()),
            ("client_id", creds.client_id.as_str()),
            ("client_secret", creds.client_secret.as_str()),
        ])
        .send()
        .await?;

    let status = resp.status();
    if !status.is_success() {
        warn!(stage = %stage, status = status.as_u16(), "[TOKEN] access token request rejected");
        return Err(AppError::UpstreamUnavailable {
            stage,
            detail: format!("token endpoint returned {status}"),
        });
    }

    let body: serde_json::Value = resp.json().await?;
    let token = body
        .get("access_token")
        .and_then(|t| t.as_str())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::UpstreamUnavailable {
            stage,
            detail: "token response had no access_token".to_string(),
        })?;

    debug!(stage = %stage, "[TOKEN] access token obtained");
    Ok(token.to_string())
}
