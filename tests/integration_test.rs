// Integration tests for Spotify Registry
//
// These tests drive the full router: user registry over a temporary SQLite
// file, and the Spotify proxy against a mockito stand-in for both the
// accounts service and the Web API.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use mockito::{Matcher, Server, ServerGuard};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use spotify_registry::{
    config::Config,
    routes::{self, AppState},
    store::{CredentialStore, Database, SqliteCredentialStore},
};

// ==================================================================================================
// Test Helpers
// ==================================================================================================

fn test_config(dir: &TempDir, server_url: &str) -> Config {
    Config {
        server_host: "127.0.0.1".to_string(),
        server_port: 5000,
        database_file: dir.path().join("registry.sqlite3"),
        spotify_client_id: "client-id".to_string(),
        spotify_client_secret: "client-secret".to_string(),
        spotify_redirect_uri: "http://localhost:5000/spotify/callback".to_string(),
        spotify_scopes: "user-read-private user-top-read".to_string(),
        spotify_accounts_url: server_url.to_string(),
        spotify_api_url: format!("{}/v1", server_url),
        http_connect_timeout: 5,
        http_request_timeout: 5,
        expose_session_tokens: true,
        log_level: "debug".to_string(),
    }
}

/// Build the application router exactly as the binary serves it
fn build_test_app(config: Config) -> Router {
    let state = AppState::from_config(config).expect("Failed to create app state");
    routes::build_app(state)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, value)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None).await
}

async fn mock_client_credentials(
    server: &mut ServerGuard,
    token: &str,
    hits: usize,
) -> mockito::Mock {
    server
        .mock("POST", "/api/token")
        .match_body(Matcher::UrlEncoded(
            "grant_type".into(),
            "client_credentials".into(),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "access_token": token, "expires_in": 3600 }).to_string())
        .expect(hits)
        .create_async()
        .await
}

async fn mock_authorization_code(server: &mut ServerGuard) -> mockito::Mock {
    server
        .mock("POST", "/api/token")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("grant_type".into(), "authorization_code".into()),
            Matcher::UrlEncoded("code".into(), "validcode".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"access_token":"A","refresh_token":"R","expires_in":3600}"#)
        .create_async()
        .await
}

// ==================================================================================================
// Health Check Tests
// ==================================================================================================

#[tokio::test]
async fn test_root_endpoint() {
    let dir = tempfile::tempdir().unwrap();
    let app = build_test_app(test_config(&dir, "http://127.0.0.1:9"));

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"Hello world!");
}

#[tokio::test]
async fn test_health_endpoint() {
    let dir = tempfile::tempdir().unwrap();
    let app = build_test_app(test_config(&dir, "http://127.0.0.1:9"));

    let (status, body) = get(&app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_assembled_app_answers_cors_preflight() {
    let dir = tempfile::tempdir().unwrap();
    let app = build_test_app(test_config(&dir, "http://127.0.0.1:9"));

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/users")
                .header(header::ORIGIN, "http://localhost:3000")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "*"
    );
}

// ==================================================================================================
// User Registry Tests
// ==================================================================================================

#[tokio::test]
async fn test_user_lifecycle() {
    let dir = tempfile::tempdir().unwrap();
    let app = build_test_app(test_config(&dir, "http://127.0.0.1:9"));

    // Empty registry still answers 200
    let (status, body) = get(&app, "/users").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["users"], json!([]));

    let (status, body) = send(
        &app,
        Method::POST,
        "/users",
        Some(json!({ "users": [{ "name": "alice" }, { "name": "bob" }] })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "User(s) added successfully");
    assert_eq!(body["users_names"], json!(["alice", "bob"]));

    let (status, body) = get(&app, "/users").await;
    assert_eq!(status, StatusCode::OK);
    let users = body["users"].as_array().unwrap();
    assert_eq!(users.len(), 2);
    let alice_id = users[0]["id"].as_i64().unwrap();
    assert_eq!(users[0]["name"], "alice");

    let (status, body) = get(&app, &format!("/users/{}", alice_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["users"][0]["name"], "alice");

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/users/{}", alice_id),
        Some(json!({ "name": "alicia" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["name"], "alicia");
    assert_eq!(body["user"]["id"], alice_id);

    let (status, body) = send(&app, Method::DELETE, &format!("/users/{}", alice_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User deleted successfully");

    let (status, body) = get(&app, &format!("/users/{}", alice_id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["users"], json!([]));
}

#[tokio::test]
async fn test_create_duplicate_user_conflicts() {
    let dir = tempfile::tempdir().unwrap();
    let app = build_test_app(test_config(&dir, "http://127.0.0.1:9"));

    let payload = json!({ "users": [{ "name": "alice" }] });
    let (status, _) = send(&app, Method::POST, "/users", Some(payload.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, Method::POST, "/users", Some(payload)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["type"], "conflict");
    assert!(body["message"].as_str().unwrap().contains("alice"));

    // Batch with a duplicate inside it writes nothing
    let (status, _) = send(
        &app,
        Method::POST,
        "/users",
        Some(json!({ "users": [{ "name": "carol" }, { "name": "carol" }] })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, body) = get(&app, "/users").await;
    assert_eq!(body["users"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_create_user_without_name_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let app = build_test_app(test_config(&dir, "http://127.0.0.1:9"));

    let (status, body) = send(
        &app,
        Method::POST,
        "/users",
        Some(json!({ "users": [{ "name": "dave" }, { "nickname": "x" }] })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["type"], "validation_error");
    assert_eq!(body["message"], "Each user must have 'name' field");

    let (_, body) = get(&app, "/users").await;
    assert_eq!(body["users"], json!([]));
}

#[tokio::test]
async fn test_update_missing_user_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let app = build_test_app(test_config(&dir, "http://127.0.0.1:9"));

    let (status, body) = send(&app, Method::PUT, "/users/42", Some(json!({ "name": "x" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["type"], "not_found");

    let (status, _) = send(&app, Method::DELETE, "/users/42", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_artist_lifecycle_and_cascade() {
    let dir = tempfile::tempdir().unwrap();
    let app = build_test_app(test_config(&dir, "http://127.0.0.1:9"));

    send(
        &app,
        Method::POST,
        "/users",
        Some(json!({ "users": [{ "name": "alice" }] })),
    )
    .await;
    let (_, body) = get(&app, "/users").await;
    let user_id = body["users"][0]["id"].as_i64().unwrap();
    let artists_uri = format!("/users/{}/artists", user_id);

    let (status, body) = get(&app, &artists_uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["artists"], json!([]));

    let (status, body) = send(
        &app,
        Method::POST,
        &artists_uri,
        Some(json!({ "name": "Jamiroquai" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Artist added successfully");
    assert_eq!(body["artists"][0]["name"], "Jamiroquai");
    let artist_id = body["artists"][0]["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        Method::POST,
        &artists_uri,
        Some(json!({ "name": "Jamiroquai" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Artist already exists");

    let (status, body) = send(&app, Method::POST, &artists_uri, Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["type"], "validation_error");

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("{}/{}", artists_uri, artist_id + 100),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        &app,
        Method::DELETE,
        &format!("{}/{}", artists_uri, artist_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["artists"], json!([]));

    send(&app, Method::POST, &artists_uri, Some(json!({ "name": "Daft Punk" }))).await;
    send(&app, Method::DELETE, &format!("/users/{}", user_id), None).await;

    // Artists go with their user
    let (status, body) = get(&app, &artists_uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "User not found");
}

// ==================================================================================================
// Client-Credentials Proxy Tests
// ==================================================================================================

#[tokio::test]
async fn test_token_endpoint_fetches_and_persists() {
    let mut server = Server::new_async().await;
    let token_mock = mock_client_credentials(&mut server, "app-token", 1).await;
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&dir, &server.url());
    let db_file = config.database_file.clone();
    let app = build_test_app(config);

    let (status, body) = get(&app, "/spotify/token").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["access_token"], "app-token");
    assert!(body["expires_at"].as_i64().unwrap() > chrono::Utc::now().timestamp());

    // Served from cache the second time
    let (status, _) = get(&app, "/spotify/token").await;
    assert_eq!(status, StatusCode::OK);
    token_mock.assert_async().await;

    let store = SqliteCredentialStore::new(Database::open(&db_file).unwrap());
    let stored = store.load().unwrap().unwrap();
    assert_eq!(stored.access_token, "app-token");
}

#[tokio::test]
async fn test_token_endpoint_reports_upstream_auth_failure() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/api/token")
        .with_status(400)
        .with_body(r#"{"error":"invalid_client"}"#)
        .create_async()
        .await;
    let dir = tempfile::tempdir().unwrap();
    let app = build_test_app(test_config(&dir, &server.url()));

    let (status, body) = get(&app, "/spotify/token").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["type"], "upstream_auth_error");
}

#[tokio::test]
async fn test_artist_search_uses_default_query() {
    let mut server = Server::new_async().await;
    mock_client_credentials(&mut server, "app-token", 1).await;
    let search_mock = server
        .mock("GET", "/v1/search")
        .match_header("authorization", "Bearer app-token")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("q".into(), "jamiroquai".into()),
            Matcher::UrlEncoded("type".into(), "artist".into()),
            Matcher::UrlEncoded("limit".into(), "10".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"artists":{"items":[{"name":"Jamiroquai"}]}}"#)
        .expect(1)
        .create_async()
        .await;
    let dir = tempfile::tempdir().unwrap();
    let app = build_test_app(test_config(&dir, &server.url()));

    let (status, body) = get(&app, "/spotify/artists?q=%20").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["artists"]["items"][0]["name"], "Jamiroquai");
    search_mock.assert_async().await;
}

#[tokio::test]
async fn test_artist_search_retries_once_after_rejected_token() {
    let mut server = Server::new_async().await;
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&dir, &server.url());

    // Persisted token the API no longer accepts
    let store = SqliteCredentialStore::new(Database::open(&config.database_file).unwrap());
    store.save("stale", 3600).unwrap();

    let token_mock = mock_client_credentials(&mut server, "fresh", 1).await;
    let rejected = server
        .mock("GET", "/v1/search")
        .match_header("authorization", "Bearer stale")
        .match_query(Matcher::Any)
        .with_status(401)
        .with_body(r#"{"error":{"status":401,"message":"The access token expired"}}"#)
        .expect(1)
        .create_async()
        .await;
    let accepted = server
        .mock("GET", "/v1/search")
        .match_header("authorization", "Bearer fresh")
        .match_query(Matcher::UrlEncoded("q".into(), "daft punk".into()))
        .with_status(200)
        .with_body(r#"{"artists":{"items":[]}}"#)
        .expect(1)
        .create_async()
        .await;

    let app = build_test_app(config);
    let (status, body) = get(&app, "/spotify/artists?q=daft%20punk").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["artists"]["items"], json!([]));
    token_mock.assert_async().await;
    rejected.assert_async().await;
    accepted.assert_async().await;

    // Replacement was persisted as the single row
    assert_eq!(store.load().unwrap().unwrap().access_token, "fresh");
}

#[tokio::test]
async fn test_concurrent_rejections_trigger_single_exchange() {
    let mut server = Server::new_async().await;
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&dir, &server.url());

    let store = SqliteCredentialStore::new(Database::open(&config.database_file).unwrap());
    store.save("stale", 3600).unwrap();

    let token_mock = mock_client_credentials(&mut server, "fresh", 1).await;
    server
        .mock("GET", "/v1/search")
        .match_header("authorization", "Bearer stale")
        .match_query(Matcher::Any)
        .with_status(401)
        .with_body(r#"{"error":{"status":401,"message":"The access token expired"}}"#)
        .expect_at_least(1)
        .create_async()
        .await;
    let accepted = server
        .mock("GET", "/v1/search")
        .match_header("authorization", "Bearer fresh")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"artists":{"items":[]}}"#)
        .expect(8)
        .create_async()
        .await;

    let app = build_test_app(config);
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let app = app.clone();
            tokio::spawn(async move { get(&app, "/spotify/artists?q=daft%20punk").await })
        })
        .collect();

    for handle in handles {
        let (status, _) = handle.await.unwrap();
        assert_eq!(status, StatusCode::OK);
    }
    token_mock.assert_async().await;
    accepted.assert_async().await;
    assert_eq!(store.load().unwrap().unwrap().access_token, "fresh");
}

#[tokio::test]
async fn test_artist_search_passes_second_rejection_through() {
    let mut server = Server::new_async().await;
    let token_mock = mock_client_credentials(&mut server, "app-token", 2).await;
    let search_mock = server
        .mock("GET", "/v1/search")
        .match_query(Matcher::Any)
        .with_status(401)
        .with_body(r#"{"error":{"status":401,"message":"Invalid access token"}}"#)
        .expect(2)
        .create_async()
        .await;
    let dir = tempfile::tempdir().unwrap();
    let app = build_test_app(test_config(&dir, &server.url()));

    let (status, body) = get(&app, "/spotify/artists").await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["message"], "Invalid access token");
    token_mock.assert_async().await;
    search_mock.assert_async().await;
}

// ==================================================================================================
// Authorization-Code Flow Tests
// ==================================================================================================

#[tokio::test]
async fn test_login_redirects_to_authorize() {
    let server = Server::new_async().await;
    let dir = tempfile::tempdir().unwrap();
    let app = build_test_app(test_config(&dir, &server.url()));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/spotify/login")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FOUND);
    let location = response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(location.starts_with(&format!("{}/authorize?", server.url())));
    assert!(location.contains("response_type=code"));
    assert!(location.contains("client_id=client-id"));
    assert!(location.contains("user-read-private"));
}

#[tokio::test]
async fn test_callback_without_code_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let app = build_test_app(test_config(&dir, "http://127.0.0.1:9"));

    let (status, body) = get(&app, "/spotify/callback").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["type"], "validation_error");

    let (status, body) = get(&app, "/spotify/callback?error=access_denied").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["type"], "auth_error");
}

#[tokio::test]
async fn test_callback_returns_session_tokens() {
    let mut server = Server::new_async().await;
    mock_authorization_code(&mut server).await;
    let dir = tempfile::tempdir().unwrap();
    let app = build_test_app(test_config(&dir, &server.url()));

    let (status, body) = get(&app, "/spotify/callback?code=validcode").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Auth OK");
    assert_eq!(body["access_token"], "A");
    assert_eq!(body["refresh_token"], "R");
}

#[tokio::test]
async fn test_callback_redacts_tokens_when_disabled() {
    let mut server = Server::new_async().await;
    mock_authorization_code(&mut server).await;
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(&dir, &server.url());
    config.expose_session_tokens = false;
    let app = build_test_app(config);

    let (status, body) = get(&app, "/spotify/callback?code=validcode").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Auth OK");
    assert!(body["access_token"].is_null());
    assert!(body["refresh_token"].is_null());
}

#[tokio::test]
async fn test_top_artists_require_login() {
    let server = Server::new_async().await;
    let dir = tempfile::tempdir().unwrap();
    let app = build_test_app(test_config(&dir, &server.url()));

    let (status, body) = get(&app, "/spotify/myartists").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["type"], "auth_error");

    let (status, _) = get(&app, "/spotify/mysongs").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_top_artists_refresh_session_after_rejection() {
    let mut server = Server::new_async().await;
    mock_authorization_code(&mut server).await;
    let refresh_mock = server
        .mock("POST", "/api/token")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("grant_type".into(), "refresh_token".into()),
            Matcher::UrlEncoded("refresh_token".into(), "R".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"access_token":"A2","expires_in":3600}"#)
        .expect(1)
        .create_async()
        .await;
    let rejected = server
        .mock("GET", "/v1/me/top/artists")
        .match_header("authorization", "Bearer A")
        .with_status(401)
        .with_body(r#"{"error":{"status":401,"message":"The access token expired"}}"#)
        .expect(1)
        .create_async()
        .await;
    let accepted = server
        .mock("GET", "/v1/me/top/artists")
        .match_header("authorization", "Bearer A2")
        .with_status(200)
        .with_body(r#"{"items":[{"name":"Jamiroquai"}]}"#)
        .expect(1)
        .create_async()
        .await;
    let tracks = server
        .mock("GET", "/v1/me/top/tracks")
        .match_header("authorization", "Bearer A2")
        .with_status(200)
        .with_body(r#"{"items":[]}"#)
        .expect(1)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let app = build_test_app(test_config(&dir, &server.url()));

    let (status, _) = get(&app, "/spotify/callback?code=validcode").await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = get(&app, "/spotify/myartists").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"][0]["name"], "Jamiroquai");

    // Refreshed access token is reused without another exchange
    let (status, body) = get(&app, "/spotify/mysongs").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"], json!([]));

    refresh_mock.assert_async().await;
    rejected.assert_async().await;
    accepted.assert_async().await;
    tracks.assert_async().await;
}

#[tokio::test]
async fn test_session_without_refresh_token_retries_with_same_token() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/api/token")
        .match_body(Matcher::UrlEncoded(
            "grant_type".into(),
            "authorization_code".into(),
        ))
        .with_status(200)
        .with_body(r#"{"access_token":"A"}"#)
        .expect(1)
        .create_async()
        .await;
    let refresh_mock = server
        .mock("POST", "/api/token")
        .match_body(Matcher::UrlEncoded(
            "grant_type".into(),
            "refresh_token".into(),
        ))
        .expect(0)
        .create_async()
        .await;
    let rejected = server
        .mock("GET", "/v1/me/top/artists")
        .match_header("authorization", "Bearer A")
        .with_status(401)
        .with_body(r#"{"error":{"status":401,"message":"The access token expired"}}"#)
        .expect(2)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let app = build_test_app(test_config(&dir, &server.url()));

    let (status, body) = get(&app, "/spotify/callback?code=validcode").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["access_token"], "A");
    assert!(body["refresh_token"].is_null());

    let (status, body) = get(&app, "/spotify/myartists").await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["message"], "The access token expired");
    rejected.assert_async().await;
    refresh_mock.assert_async().await;
}
