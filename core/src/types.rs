//! Wire DTOs for the account API.
//!
//! # Design
//! These mirror the mock-server's schema but are defined independently so the
//! client never links against axum. Integration tests catch schema drift.

use serde::{Deserialize, Serialize};

/// Username/password pair sent to `/register` and `/login`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Body of a successful `/register` or `/login` call. Only login carries a
/// token, and even then the backend may omit it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl AuthResponse {
    /// The token, treating an empty string the same as an absent one.
    pub fn session_token(&self) -> Option<&str> {
        self.token.as_deref().filter(|token| !token.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserEntry {
    pub username: String,
}

/// Body of a successful `/users` call.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UsersResponse {
    pub users: Vec<UserEntry>,
    pub me: String,
}

impl UsersResponse {
    pub fn usernames(&self) -> Vec<String> {
        self.users.iter().map(|user| user.username.clone()).collect()
    }
}

/// Body of a successful `/register` or `/logout` call. A `null` or missing
/// message decodes as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

impl MessageResponse {
    pub fn text(&self) -> &str {
        self.message.as_deref().unwrap_or_default()
    }
}
