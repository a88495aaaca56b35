use serde::{Deserialize, Serialize};

/// GET /spotify/token
#[derive(Debug, Clone, Serialize)]
pub struct TokenInfo {
    pub access_token: String,
    pub expires_at: i64,
}

/// GET /spotify/artists query
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: Option<String>,
}

/// GET /spotify/callback query, as sent back by the accounts service
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallbackQuery {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// GET /spotify/callback response
#[derive(Debug, Clone, Serialize)]
pub struct CallbackResponse {
    pub message: String,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}
