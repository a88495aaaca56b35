use serde::{Deserialize, Serialize};

// ==================================================================================================
// Registry rows
// ==================================================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
}

/// A favorite artist attached to a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artist {
    pub id: i64,
    pub name: String,
}

// ==================================================================================================
// Request bodies
// ==================================================================================================

/// POST /users - `{ "users": [{ "name": "..." }, ...] }`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewUsersRequest {
    #[serde(default)]
    pub users: Vec<NameField>,
}

/// Body carrying a single `name`, used by PUT /users/{id} and POST /users/{id}/artists
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NameField {
    #[serde(default)]
    pub name: Option<String>,
}

impl NameField {
    /// Trimmed name, or `None` when missing or blank
    pub fn name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

// ==================================================================================================
// Response bodies
// ==================================================================================================

#[derive(Debug, Clone, Serialize)]
pub struct UsersResponse {
    pub message: String,
    pub users: Vec<User>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreatedUsersResponse {
    pub message: String,
    pub users_names: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub message: String,
    pub user: User,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArtistsResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub artists: Vec<Artist>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
