use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::shared::nullable_string;
use crate::id::Id;

/// An account as returned by `/admin/users` and `/auth/me`.
///
/// The password is write-only and never appears here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Id,
    #[serde(default, deserialize_with = "nullable_string")]
    pub username: String,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Body of `POST /admin/users`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    pub is_admin: bool,
}

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Body of `POST /auth/register`.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub is_admin: bool,
}

/// Successful login response.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    /// Bearer token to attach to authenticated requests.
    pub token: String,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub username: Option<String>,
}
