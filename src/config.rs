use anyhow::{Context, Result};
use clap::Parser;
use reqwest::Url;
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Spotify Registry - users, favorite artists and a Spotify Web API proxy
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Server host address
    #[arg(short = 'H', long, env = "SERVER_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Server port
    #[arg(short, long, env = "SERVER_PORT", default_value = "5000")]
    pub port: u16,

    /// Path to the SQLite database holding users, artists and the app token
    #[arg(short = 'd', long, env = "DATABASE_FILE", default_value = "registry.sqlite3")]
    pub db_file: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Spotify application client ID
    #[arg(long, env = "SPOTIFY_CLIENT_ID")]
    pub client_id: Option<String>,

    /// Spotify application client secret
    #[arg(long, env = "SPOTIFY_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: Option<String>,

    /// Redirect URI registered for the authorization-code flow
    #[arg(long, env = "SPOTIFY_REDIRECT_URI")]
    pub redirect_uri: Option<String>,

    /// Scopes requested on /spotify/login (space separated)
    #[arg(long, env = "SPOTIFY_SCOPES", default_value = "user-read-private user-top-read")]
    pub scopes: String,

    /// Spotify accounts service base URL (token + authorize endpoints)
    #[arg(long, env = "SPOTIFY_ACCOUNTS_URL", default_value = "https://accounts.spotify.com")]
    pub accounts_url: String,

    /// Spotify Web API base URL
    #[arg(long, env = "SPOTIFY_API_URL", default_value = "https://api.spotify.com/v1")]
    pub api_url: String,

    /// HTTP connect timeout in seconds
    #[arg(long, env = "HTTP_CONNECT_TIMEOUT", default_value = "10")]
    pub http_connect_timeout: u64,

    /// HTTP request timeout in seconds
    #[arg(long, env = "HTTP_REQUEST_TIMEOUT", default_value = "30")]
    pub http_timeout: u64,

    /// Return raw access/refresh tokens from /spotify/callback
    #[arg(
        long,
        env = "EXPOSE_SESSION_TOKENS",
        default_value = "true",
        action = clap::ArgAction::Set
    )]
    pub expose_session_tokens: bool,
}

#[derive(Clone, Debug)]
pub struct Config {
    // Server settings
    pub server_host: String,
    pub server_port: u16,

    // Storage
    pub database_file: PathBuf,

    // Spotify application
    pub spotify_client_id: String,
    pub spotify_client_secret: String,
    pub spotify_redirect_uri: String,
    pub spotify_scopes: String,
    pub spotify_accounts_url: String,
    pub spotify_api_url: String,

    // HTTP client
    pub http_connect_timeout: u64,
    pub http_request_timeout: u64,

    // Callback diagnostics
    pub expose_session_tokens: bool,

    pub log_level: String,
}

impl Config {
    /// Load configuration from all sources with priority: CLI > ENV > defaults
    pub fn load() -> Result<Self> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        let args = CliArgs::parse();

        let config = Config {
            server_host: args.host,
            server_port: args.port,

            database_file: expand_tilde(&args.db_file),

            spotify_client_id: args
                .client_id
                .context("SPOTIFY_CLIENT_ID is required (use --client-id or set SPOTIFY_CLIENT_ID)")?,
            spotify_client_secret: args.client_secret.context(
                "SPOTIFY_CLIENT_SECRET is required (use --client-secret or set SPOTIFY_CLIENT_SECRET)",
            )?,
            spotify_redirect_uri: args.redirect_uri.context(
                "SPOTIFY_REDIRECT_URI is required (use --redirect-uri or set SPOTIFY_REDIRECT_URI)",
            )?,
            spotify_scopes: args.scopes,
            spotify_accounts_url: trim_base_url(&args.accounts_url),
            spotify_api_url: trim_base_url(&args.api_url),

            http_connect_timeout: args.http_connect_timeout,
            http_request_timeout: args.http_timeout,

            expose_session_tokens: args.expose_session_tokens,

            log_level: args.log_level,
        };

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.spotify_client_id.trim().is_empty() {
            anyhow::bail!("SPOTIFY_CLIENT_ID cannot be empty");
        }
        if self.spotify_client_secret.trim().is_empty() {
            anyhow::bail!("SPOTIFY_CLIENT_SECRET cannot be empty");
        }

        Url::parse(&self.spotify_redirect_uri).with_context(|| {
            format!(
                "SPOTIFY_REDIRECT_URI is not a valid URL: {}",
                self.spotify_redirect_uri
            )
        })?;
        Url::parse(&self.spotify_accounts_url).with_context(|| {
            format!(
                "SPOTIFY_ACCOUNTS_URL is not a valid URL: {}",
                self.spotify_accounts_url
            )
        })?;
        Url::parse(&self.spotify_api_url).with_context(|| {
            format!("SPOTIFY_API_URL is not a valid URL: {}", self.spotify_api_url)
        })?;

        if self.http_connect_timeout == 0 || self.http_request_timeout == 0 {
            anyhow::bail!("HTTP timeouts must be greater than zero");
        }

        Ok(())
    }

    /// Token endpoint shared by both OAuth flows
    pub fn token_url(&self) -> String {
        format!("{}/api/token", self.spotify_accounts_url)
    }

    /// Authorization endpoint for the authorization-code flow
    pub fn authorize_url(&self) -> String {
        format!("{}/authorize", self.spotify_accounts_url)
    }

    /// Configured login scopes as a set
    pub fn scopes(&self) -> BTreeSet<String> {
        self.spotify_scopes
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Expand tilde (~) in file paths to user's home directory
fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

fn trim_base_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}
