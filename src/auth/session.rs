use reqwest::Url;
use std::collections::BTreeSet;
use tokio::sync::RwLock;

use super::exchange::OAuthClient;
use super::types::{TokenPair, UserSession};
use crate::error::{ApiError, Result};

/// Authorization-code flow state for the single logged-in user
///
/// Tokens live only in memory and are lost on restart. Access-token lifetime
/// is not tracked; expiry shows up as a 401 from the API.
pub struct UserSessionAuth {
    session: RwLock<UserSession>,
    oauth: OAuthClient,
    authorize_url: String,
    redirect_uri: String,
}

impl UserSessionAuth {
    pub fn new(
        oauth: OAuthClient,
        authorize_url: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            session: RwLock::new(UserSession::default()),
            oauth,
            authorize_url: authorize_url.into(),
            redirect_uri: redirect_uri.into(),
        }
    }

    /// Login URL on the accounts service for the given scopes
    pub fn begin_login<I, S>(&self, scopes: I) -> Result<Url>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let scopes: BTreeSet<String> = scopes.into_iter().map(Into::into).collect();
        let scope = scopes.into_iter().collect::<Vec<_>>().join(" ");

        Url::parse_with_params(
            &self.authorize_url,
            &[
                ("client_id", self.oauth.client_id()),
                ("response_type", "code"),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("scope", scope.as_str()),
            ],
        )
        .map_err(|e| {
            ApiError::Internal(anyhow::anyhow!(
                "Invalid authorize URL {}: {}",
                self.authorize_url,
                e
            ))
        })
    }

    /// Exchange the callback's code and start the session
    pub async fn complete_login(&self, code: &str) -> Result<TokenPair> {
        let grant = self
            .oauth
            .authorization_code(code, &self.redirect_uri)
            .await?;

        let mut session = self.session.write().await;
        session.access_token = Some(grant.access_token.clone());
        session.refresh_token = grant.refresh_token.clone();

        if grant.refresh_token.is_none() {
            tracing::warn!("Authorization server issued no refresh token; session cannot be refreshed");
        }
        tracing::info!("User session established");

        Ok(TokenPair {
            access_token: grant.access_token,
            refresh_token: grant.refresh_token,
        })
    }

    /// Renew the access token after the API rejected `rejected`
    ///
    /// Returns the current token without a call when another caller already
    /// replaced `rejected`, and `Ok(None)` when there is no refresh token to use.
    pub async fn refresh(&self, rejected: &str) -> Result<Option<String>> {
        // Held across the exchange so concurrent refreshes run one at a time
        let mut session = self.session.write().await;

        if let Some(current) = session.access_token.as_ref() {
            if current != rejected {
                tracing::debug!("Rejected user token already replaced, reusing the new one");
                return Ok(Some(current.clone()));
            }
        }

        let Some(refresh_token) = session.refresh_token.clone() else {
            tracing::debug!("No refresh token held, skipping user token refresh");
            return Ok(None);
        };

        let grant = self.oauth.refresh_token(&refresh_token).await?;

        session.access_token = Some(grant.access_token.clone());
        if let Some(rotated) = grant.refresh_token {
            session.refresh_token = Some(rotated);
        }

        Ok(Some(grant.access_token))
    }

    /// Access token of the logged-in user
    pub async fn access_token(&self) -> Result<String> {
        self.session
            .read()
            .await
            .access_token
            .clone()
            .ok_or_else(|| {
                ApiError::AuthError(
                    "No active Spotify user session; log in via /spotify/login".to_string(),
                )
            })
    }

    pub async fn snapshot(&self) -> UserSession {
        self.session.read().await.clone()
    }
}
