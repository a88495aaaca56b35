// Token endpoint exchanges (client credentials, authorization code, refresh token)

use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::{header, Client};

use super::preview;
use super::types::{TokenGrant, TokenResponse, DEFAULT_EXPIRES_IN};
use crate::error::{ApiError, Result};

/// Build the HTTP Basic header value for the application's credentials
pub fn basic_credentials(client_id: &str, client_secret: &str) -> String {
    format!(
        "Basic {}",
        STANDARD.encode(format!("{}:{}", client_id, client_secret))
    )
}

/// Client for the accounts service token endpoint
///
/// Both OAuth flows share the same application credentials.
#[derive(Clone)]
pub struct OAuthClient {
    client: Client,
    token_url: String,
    client_id: String,
    client_secret: String,
}

impl OAuthClient {
    pub fn new(
        client: Client,
        token_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            client,
            token_url: token_url.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// App-level token (`grant_type=client_credentials`)
    pub async fn client_credentials(&self) -> Result<TokenGrant> {
        tracing::info!("Requesting Spotify token via client credentials...");
        self.request_token(&[("grant_type", "client_credentials")])
            .await
    }

    /// Trade an authorization code for an access/refresh pair
    pub async fn authorization_code(&self, code: &str, redirect_uri: &str) -> Result<TokenGrant> {
        tracing::info!("Exchanging authorization code for user tokens...");
        self.request_token(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", redirect_uri),
        ])
        .await
    }

    /// New access token for the logged-in user
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<TokenGrant> {
        tracing::info!(
            "Refreshing user access token (refresh token: {}...)",
            preview(refresh_token)
        );
        self.request_token(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ])
        .await
    }

    async fn request_token(&self, form: &[(&str, &str)]) -> Result<TokenGrant> {
        let grant_type = form
            .iter()
            .find(|(key, _)| *key == "grant_type")
            .map(|(_, value)| *value)
            .unwrap_or("unknown");

        let response = self
            .client
            .post(&self.token_url)
            .header(
                header::AUTHORIZATION,
                basic_credentials(&self.client_id, &self.client_secret),
            )
            .form(form)
            .send()
            .await
            .map_err(|e| {
                ApiError::UpstreamAuth(format!("Failed to send {} request: {}", grant_type, e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!(
                grant_type = grant_type,
                status = %status,
                body = %error_text,
                "Token exchange failed"
            );
            return Err(ApiError::UpstreamAuth(format!(
                "{} exchange failed: {} - {}",
                grant_type, status, error_text
            )));
        }

        let data: TokenResponse = response.json().await.map_err(|e| {
            ApiError::UpstreamAuth(format!(
                "Failed to parse {} response: {}",
                grant_type, e
            ))
        })?;

        let access_token = data
            .access_token
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                ApiError::UpstreamAuth(format!(
                    "{} response does not contain access_token",
                    grant_type
                ))
            })?;

        let expires_in = data.expires_in.unwrap_or(DEFAULT_EXPIRES_IN);
        tracing::info!(
            grant_type = grant_type,
            expires_in = expires_in,
            "Token issued ({}...)",
            preview(&access_token)
        );

        Ok(TokenGrant {
            access_token,
            refresh_token: data.refresh_token,
            expires_in,
        })
    }
}
