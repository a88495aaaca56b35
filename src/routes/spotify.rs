// Spotify proxy handlers

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use super::AppState;
use crate::error::{ApiError, Result};
use crate::http_client::UpstreamResponse;
use crate::models::spotify::{CallbackQuery, CallbackResponse, SearchQuery, TokenInfo};

/// Search term used when `q` is absent or blank
const DEFAULT_SEARCH: &str = "jamiroquai";
const SEARCH_LIMIT: &str = "10";

fn pass_through(upstream: UpstreamResponse) -> Response {
    (upstream.status, Json(upstream.body)).into_response()
}

/// GET /spotify/token - current client-credentials token
pub(super) async fn token_handler(State(state): State<AppState>) -> Result<Json<TokenInfo>> {
    let token = state.client_credentials.get_token().await?;
    Ok(Json(TokenInfo {
        access_token: token.access_token,
        expires_at: token.expires_at,
    }))
}

/// GET /spotify/artists?q= - artist search with the app token
pub(super) async fn search_artists_handler(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Response> {
    let q = query
        .q
        .map(|q| q.trim().to_string())
        .filter(|q| !q.is_empty())
        .unwrap_or_else(|| DEFAULT_SEARCH.to_string());

    tracing::info!("Searching Spotify artists: q={}", q);

    let params = [
        ("q", q),
        ("type", "artist".to_string()),
        ("limit", SEARCH_LIMIT.to_string()),
    ];
    let upstream = state
        .fetcher
        .get("/search", &params, state.client_credentials.as_ref())
        .await?;

    Ok(pass_through(upstream))
}

/// GET /spotify/login - redirect to the accounts service
pub(super) async fn login_handler(State(state): State<AppState>) -> Result<Response> {
    let url = state.user_session.begin_login(state.config.scopes())?;

    Ok((StatusCode::FOUND, [(header::LOCATION, url.to_string())]).into_response())
}

/// GET /spotify/callback?code= - finish the authorization-code flow
pub(super) async fn callback_handler(
    State(state): State<AppState>,
    Query(query): Query<CallbackQuery>,
) -> Result<Json<CallbackResponse>> {
    if let Some(error) = query.error {
        tracing::warn!("Spotify login was not granted: {}", error);
        return Err(ApiError::AuthError(format!("Spotify login failed: {}", error)));
    }

    let code = query
        .code
        .filter(|code| !code.is_empty())
        .ok_or_else(|| ApiError::ValidationError("Missing 'code' parameter".to_string()))?;

    let pair = state.user_session.complete_login(&code).await?;

    // Raw tokens are diagnostic output; disable with EXPOSE_SESSION_TOKENS=false
    let (access_token, refresh_token) = if state.config.expose_session_tokens {
        (Some(pair.access_token), pair.refresh_token)
    } else {
        (None, None)
    };

    Ok(Json(CallbackResponse {
        message: "Auth OK".to_string(),
        access_token,
        refresh_token,
    }))
}

/// GET /spotify/myartists - logged-in user's top artists
pub(super) async fn my_artists_handler(State(state): State<AppState>) -> Result<Response> {
    let upstream = state
        .fetcher
        .get("/me/top/artists", &[], state.user_session.as_ref())
        .await?;
    Ok(pass_through(upstream))
}

/// GET /spotify/mysongs - logged-in user's top tracks
pub(super) async fn my_songs_handler(State(state): State<AppState>) -> Result<Response> {
    let upstream = state
        .fetcher
        .get("/me/top/tracks", &[], state.user_session.as_ref())
        .await?;
    Ok(pass_through(upstream))
}
