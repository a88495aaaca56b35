use chrono::Utc;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::exchange::OAuthClient;
use super::preview;
use crate::error::Result;
use crate::store::{CredentialStore, StoredToken};

/// Client-credentials token lifecycle
///
/// Two cache levels for the same token: `cache` in memory, `store` on disk.
/// `cache == None` means nothing has been read yet in this process. The mutex
/// is held across load, exchange and save, so concurrent callers that find
/// the token missing or expired wait for one exchange instead of each running
/// their own.
pub struct ClientCredentialsAuth {
    /// Latest token read from or written to the store
    cache: Mutex<Option<StoredToken>>,

    /// Durable single-row storage
    store: Arc<dyn CredentialStore>,

    /// Token endpoint client
    oauth: OAuthClient,
}

impl ClientCredentialsAuth {
    pub fn new(store: Arc<dyn CredentialStore>, oauth: OAuthClient) -> Self {
        Self {
            cache: Mutex::new(None),
            store,
            oauth,
        }
    }

    /// Get a valid app token, exchanging a new one if missing or expired
    pub async fn get_token(&self) -> Result<StoredToken> {
        let mut cache = self.cache.lock().await;

        // First use in this process: fall back to the durable copy
        if cache.is_none() {
            *cache = self.store.load()?;
            match cache.as_ref() {
                Some(token) => tracing::debug!(
                    expires_at = token.expires_at,
                    "Loaded client-credentials token from store"
                ),
                None => tracing::debug!("No client-credentials token stored yet"),
            }
        }

        match cache.as_ref() {
            Some(token) if !token.is_expired_at(Utc::now().timestamp()) => {
                return Ok(token.clone());
            }
            Some(token) => tracing::info!(
                expires_at = token.expires_at,
                "Client-credentials token expired, requesting a new one"
            ),
            None => tracing::info!("Requesting first client-credentials token"),
        }

        let token = self.exchange_and_persist().await?;
        *cache = Some(token.clone());
        Ok(token)
    }

    /// Replace a token the API rejected
    ///
    /// Callers that queued behind another refresh get the replacement
    /// instead of running their own exchange.
    pub async fn force_refresh(&self, rejected: &str) -> Result<StoredToken> {
        let mut cache = self.cache.lock().await;

        if let Some(token) = cache.as_ref() {
            if token.access_token != rejected && !token.is_expired_at(Utc::now().timestamp()) {
                tracing::debug!("Rejected token already replaced, reusing the new one");
                return Ok(token.clone());
            }
        }

        let token = self.exchange_and_persist().await?;
        *cache = Some(token.clone());
        Ok(token)
    }

    async fn exchange_and_persist(&self) -> Result<StoredToken> {
        let grant = self.oauth.client_credentials().await?;
        let token = self.store.save(&grant.access_token, grant.expires_in)?;

        tracing::info!(
            expires_at = token.expires_at,
            "Client-credentials token refreshed ({}...)",
            preview(&token.access_token)
        );
        Ok(token)
    }
}
