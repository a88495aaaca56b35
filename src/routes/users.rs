// User registry handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use super::AppState;
use crate::error::{ApiError, Result};
use crate::models::users::{
    ArtistsResponse, CreatedUsersResponse, MessageResponse, NameField, NewUsersRequest,
    UserResponse, UsersResponse,
};

fn required_name(body: &NameField) -> Result<String> {
    body.name().map(str::to_string).ok_or_else(|| {
        ApiError::ValidationError("The request body must contain a 'name' field".to_string())
    })
}

/// GET /users - list every user (200 even when empty)
pub(super) async fn list_users_handler(State(state): State<AppState>) -> Result<Response> {
    let users = state.users.list_users()?;

    let message = if users.is_empty() {
        "User not found"
    } else {
        "Users retrieved successfully"
    };

    Ok(Json(UsersResponse {
        message: message.to_string(),
        users,
    })
    .into_response())
}

/// GET /users/{id}
pub(super) async fn get_user_handler(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Response> {
    let response = match state.users.find_user(user_id)? {
        Some(user) => (
            StatusCode::OK,
            Json(UsersResponse {
                message: "Users retrieved successfully".to_string(),
                users: vec![user],
            }),
        ),
        None => (
            StatusCode::NOT_FOUND,
            Json(UsersResponse {
                message: "User not found".to_string(),
                users: Vec::new(),
            }),
        ),
    };

    Ok(response.into_response())
}

/// POST /users - `{ "users": [{ "name": "..." }] }`
pub(super) async fn create_users_handler(
    State(state): State<AppState>,
    Json(body): Json<NewUsersRequest>,
) -> Result<Response> {
    let names = body
        .users
        .iter()
        .map(|user| {
            user.name().map(str::to_string).ok_or_else(|| {
                ApiError::ValidationError("Each user must have 'name' field".to_string())
            })
        })
        .collect::<Result<Vec<_>>>()?;

    state.users.create_users(&names)?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedUsersResponse {
            message: "User(s) added successfully".to_string(),
            users_names: names,
        }),
    )
        .into_response())
}

/// PUT /users/{id} - `{ "name": "..." }`
pub(super) async fn update_user_handler(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(body): Json<NameField>,
) -> Result<Json<UserResponse>> {
    let name = required_name(&body)?;
    let user = state.users.rename_user(user_id, &name)?;

    tracing::info!(user_id = user_id, "User renamed");
    Ok(Json(UserResponse {
        message: "User updated successfully".to_string(),
        user,
    }))
}

/// DELETE /users/{id}
pub(super) async fn delete_user_handler(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<MessageResponse>> {
    state.users.delete_user(user_id)?;

    tracing::info!(user_id = user_id, "User deleted");
    Ok(Json(MessageResponse {
        message: "User deleted successfully".to_string(),
    }))
}

/// GET /users/{id}/artists
pub(super) async fn list_artists_handler(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<ArtistsResponse>> {
    let artists = state.users.list_artists(user_id)?;
    Ok(Json(ArtistsResponse {
        message: None,
        artists,
    }))
}

/// POST /users/{id}/artists - `{ "name": "..." }`
pub(super) async fn add_artist_handler(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(body): Json<NameField>,
) -> Result<Json<ArtistsResponse>> {
    let name = required_name(&body)?;
    let artists = state.users.add_artist(user_id, &name)?;

    Ok(Json(ArtistsResponse {
        message: Some("Artist added successfully".to_string()),
        artists,
    }))
}

/// DELETE /users/{id}/artists/{artist_id}
pub(super) async fn delete_artist_handler(
    State(state): State<AppState>,
    Path((user_id, artist_id)): Path<(i64, i64)>,
) -> Result<Json<ArtistsResponse>> {
    let artists = state.users.delete_artist(user_id, artist_id)?;

    Ok(Json(ArtistsResponse {
        message: Some("Artist deleted successfully".to_string()),
        artists,
    }))
}
