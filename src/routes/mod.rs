use anyhow::{Context, Result as AnyResult};
use axum::{
    response::IntoResponse,
    routing::{delete, get},
    Json, Router,
};
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;

use crate::auth::{ClientCredentialsAuth, OAuthClient, UserSessionAuth};
use crate::config::Config;
use crate::http_client::{self, AuthenticatedFetcher};
use crate::middleware;
use crate::store::{Database, SqliteCredentialStore, UserStore};

mod spotify;
mod users;

/// Application version from Cargo.toml
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application state shared across handlers
///
/// Owns both token caches; nothing lives in globals.
#[derive(Clone)]
pub struct AppState {
    pub users: UserStore,
    pub client_credentials: Arc<ClientCredentialsAuth>,
    pub user_session: Arc<UserSessionAuth>,
    pub fetcher: Arc<AuthenticatedFetcher>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Open the database and wire authenticators to one shared HTTP client
    pub fn from_config(config: Config) -> AnyResult<Self> {
        let db = Database::open(&config.database_file).with_context(|| {
            format!(
                "Failed to open database: {}",
                config.database_file.display()
            )
        })?;

        let client =
            http_client::build_client(config.http_connect_timeout, config.http_request_timeout)?;

        let oauth = OAuthClient::new(
            client.clone(),
            config.token_url(),
            config.spotify_client_id.clone(),
            config.spotify_client_secret.clone(),
        );

        let client_credentials = ClientCredentialsAuth::new(
            Arc::new(SqliteCredentialStore::new(db.clone())),
            oauth.clone(),
        );
        let user_session = UserSessionAuth::new(
            oauth,
            config.authorize_url(),
            config.spotify_redirect_uri.clone(),
        );
        let fetcher = AuthenticatedFetcher::new(client, config.spotify_api_url.clone());

        Ok(Self {
            users: UserStore::new(db),
            client_credentials: Arc::new(client_credentials),
            user_session: Arc::new(user_session),
            fetcher: Arc::new(fetcher),
            config: Arc::new(config),
        })
    }
}

/// Build the application with all routes and middleware
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .merge(health_routes())
        .merge(user_routes(state.clone()))
        .merge(spotify_routes(state))
        .layer(middleware::cors_layer())
        .layer(middleware::trace_layer())
}

/// Health check routes
pub fn health_routes() -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
}

/// User registry and favorite-artist routes
pub fn user_routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/users",
            get(users::list_users_handler).post(users::create_users_handler),
        )
        .route(
            "/users/:user_id",
            get(users::get_user_handler)
                .put(users::update_user_handler)
                .delete(users::delete_user_handler),
        )
        .route(
            "/users/:user_id/artists",
            get(users::list_artists_handler).post(users::add_artist_handler),
        )
        .route(
            "/users/:user_id/artists/:artist_id",
            delete(users::delete_artist_handler),
        )
        .with_state(state)
}

/// Spotify proxy routes (client-credentials and authorization-code flows)
pub fn spotify_routes(state: AppState) -> Router {
    Router::new()
        .route("/spotify/token", get(spotify::token_handler))
        .route("/spotify/artists", get(spotify::search_artists_handler))
        .route("/spotify/login", get(spotify::login_handler))
        .route("/spotify/callback", get(spotify::callback_handler))
        .route("/spotify/myartists", get(spotify::my_artists_handler))
        .route("/spotify/mysongs", get(spotify::my_songs_handler))
        .with_state(state)
}

/// GET / - Simple liveness check
async fn root_handler() -> impl IntoResponse {
    "Hello world!"
}

/// GET /health - Detailed health check
async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339(),
        "version": VERSION
    }))
}
