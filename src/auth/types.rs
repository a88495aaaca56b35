// Authentication types

use serde::{Deserialize, Serialize};

/// Lifetime assumed when the token endpoint omits `expires_in`
pub const DEFAULT_EXPIRES_IN: u64 = 3600;

/// Raw token endpoint response (RFC 6749 section 5.1)
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub expires_in: Option<u64>,
}

/// Validated result of a token exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenGrant {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: u64,
}

/// Access/refresh pair produced by the authorization-code exchange
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: Option<String>,
}

/// In-memory state of the single logged-in user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserSession {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}
