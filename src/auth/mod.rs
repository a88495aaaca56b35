// Authentication module
// Token lifecycle for the client-credentials and authorization-code flows

mod client_credentials;
mod exchange;
mod session;
mod types;

pub use client_credentials::ClientCredentialsAuth;
pub use exchange::{basic_credentials, OAuthClient};
pub use session::UserSessionAuth;
pub use types::{TokenGrant, TokenPair, UserSession, DEFAULT_EXPIRES_IN};

use std::future::Future;

use crate::error::Result;

/// Something that can put a bearer token on an outbound request
pub trait TokenSource: Send + Sync {
    /// Token to use for the next request
    fn current_token(&self) -> impl Future<Output = Result<String>> + Send;

    /// Replace `rejected` after the API refused it
    fn force_refresh(&self, rejected: &str) -> impl Future<Output = Result<String>> + Send;
}

impl TokenSource for ClientCredentialsAuth {
    async fn current_token(&self) -> Result<String> {
        Ok(self.get_token().await?.access_token)
    }

    async fn force_refresh(&self, rejected: &str) -> Result<String> {
        Ok(ClientCredentialsAuth::force_refresh(self, rejected)
            .await?
            .access_token)
    }
}

impl TokenSource for UserSessionAuth {
    async fn current_token(&self) -> Result<String> {
        self.access_token().await
    }

    async fn force_refresh(&self, rejected: &str) -> Result<String> {
        // Without a refresh token the retry goes out with the same token
        match self.refresh(rejected).await? {
            Some(token) => Ok(token),
            None => self.access_token().await,
        }
    }
}

/// First characters of a token, for logs
pub(crate) fn preview(token: &str) -> String {
    token.chars().take(8).collect()
}
