use anyhow::{Context, Result as AnyResult};
use reqwest::{header, Client, Response, StatusCode};
use serde_json::Value;
use std::time::Duration;

use crate::auth::TokenSource;
use crate::error::{ApiError, Result};

/// Status and decoded body of a catalog API response, passed through as-is
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub body: Value,
}

/// Build the shared HTTP client used for token exchanges and catalog calls
pub fn build_client(connect_timeout: u64, request_timeout: u64) -> AnyResult<Client> {
    Client::builder()
        .connect_timeout(Duration::from_secs(connect_timeout))
        .timeout(Duration::from_secs(request_timeout))
        .build()
        .context("Failed to create HTTP client")
}

/// Bearer-authenticated GETs against the Spotify Web API
///
/// A 401 triggers exactly one token refresh and one retry. The retry's
/// response is returned whatever its status. Scope errors also come back as
/// 401 and take the same path.
pub struct AuthenticatedFetcher {
    /// Shared HTTP client with connection pooling
    client: Client,

    /// Base URL, e.g. `https://api.spotify.com/v1`
    api_url: String,
}

impl AuthenticatedFetcher {
    pub fn new(client: Client, api_url: impl Into<String>) -> Self {
        Self {
            client,
            api_url: api_url.into(),
        }
    }

    /// GET `{api_url}{endpoint}` with a token from `source`
    pub async fn get<S>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
        source: &S,
    ) -> Result<UpstreamResponse>
    where
        S: TokenSource,
    {
        let url = format!("{}{}", self.api_url, endpoint);

        let token = source.current_token().await?;
        let mut response = self.send(&url, params, &token).await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            tracing::warn!(url = %url, "Received 401, refreshing token and retrying once...");

            let token = source.force_refresh(&token).await?;
            response = self.send(&url, params, &token).await?;

            if response.status() == StatusCode::UNAUTHORIZED {
                tracing::warn!(url = %url, "Retry was also rejected with 401, giving up");
            }
        }

        Self::into_upstream(response).await
    }

    async fn send(&self, url: &str, params: &[(&str, String)], token: &str) -> Result<Response> {
        tracing::debug!(url = %url, "Sending Spotify API request");

        let result = self
            .client
            .get(url)
            .query(params)
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .send()
            .await;

        match result {
            Ok(response) => {
                tracing::debug!(status = %response.status(), "Received Spotify API response");
                Ok(response)
            }
            Err(e) => {
                // Categorize the error for better debugging
                let error_kind = if e.is_timeout() {
                    "timeout"
                } else if e.is_connect() {
                    "connection_failed"
                } else if e.is_request() {
                    "request_error"
                } else {
                    "unknown"
                };

                tracing::error!(
                    error_kind = error_kind,
                    error = %e,
                    url = %url,
                    "Spotify API request failed"
                );
                Err(ApiError::UpstreamUnavailable(format!(
                    "Spotify API request failed: {} (kind: {})",
                    e, error_kind
                )))
            }
        }
    }

    async fn into_upstream(response: Response) -> Result<UpstreamResponse> {
        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| {
            ApiError::UpstreamUnavailable(format!("Failed to read Spotify API response: {}", e))
        })?;

        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).map_err(|e| {
                ApiError::UpstreamUnavailable(format!(
                    "Spotify API returned a non-JSON body ({}): {}",
                    status, e
                ))
            })?
        };

        Ok(UpstreamResponse { status, body })
    }
}
