//! Stateless HTTP request builder and response parser for the account API.
//!
//! # Design
//! `AccountClient` holds only the `/api` base and carries no mutable state
//! between calls. Each operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`. The caller executes the actual HTTP round-trip.

use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{AuthResponse, Credentials, MessageResponse, UsersResponse};

/// Path prefix every backend route lives under.
pub const API_PREFIX: &str = "/api";

/// Message reported for a successful logout whose body carries none.
pub const LOGGED_OUT: &str = "logged out";

/// Synchronous, stateless client for the account API.
#[derive(Debug, Clone)]
pub struct AccountClient {
    api_base: String,
}

impl AccountClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            api_base: format!("{}{API_PREFIX}", base_url.trim_end_matches('/')),
        }
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    pub fn build_register(&self, credentials: &Credentials) -> Result<HttpRequest, ApiError> {
        self.json_post("/register", credentials)
    }

    pub fn build_login(&self, credentials: &Credentials) -> Result<HttpRequest, ApiError> {
        self.json_post("/login", credentials)
    }

    pub fn build_list_users(&self, token: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/users", self.api_base),
            headers: authorized_headers(token),
            body: None,
        }
    }

    pub fn build_logout(&self, token: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}/logout", self.api_base),
            headers: authorized_headers(token),
            body: None,
        }
    }

    pub fn parse_register(&self, response: HttpResponse) -> Result<MessageResponse, ApiError> {
        decode(response)
    }

    /// A success without a token is still `Ok`; the caller decides what an
    /// absent token means.
    pub fn parse_login(&self, response: HttpResponse) -> Result<AuthResponse, ApiError> {
        decode(response)
    }

    pub fn parse_list_users(&self, response: HttpResponse) -> Result<UsersResponse, ApiError> {
        decode(response)
    }

    pub fn parse_logout(&self, response: HttpResponse) -> Result<MessageResponse, ApiError> {
        let mut parsed: MessageResponse = decode(response)?;
        if parsed.text().is_empty() {
            parsed.message = Some(LOGGED_OUT.to_string());
        }
        Ok(parsed)
    }

    fn json_post(&self, route: &str, credentials: &Credentials) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(credentials).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}{route}", self.api_base),
            headers: json_headers(),
            body: Some(body),
        })
    }
}

fn json_headers() -> Vec<(String, String)> {
    vec![("content-type".to_string(), "application/json".to_string())]
}

fn authorized_headers(token: &str) -> Vec<(String, String)> {
    let mut headers = json_headers();
    headers.push(("authorization".to_string(), format!("Bearer {token}")));
    headers
}

/// Map a non-2xx status to `ApiError::Request`, otherwise decode the body.
fn decode<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    if !response.is_success() {
        return Err(ApiError::request(response.status, &response.body));
    }
    serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::REQUEST_FAILED;

    fn client() -> AccountClient {
        AccountClient::new("http://localhost:8080")
    }

    fn alice() -> Credentials {
        Credentials::new("alice", "pw1")
    }

    #[test]
    fn build_register_produces_correct_request() {
        let req = client().build_register(&alice()).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:8080/api/register");
        assert_eq!(req.header("Content-Type"), Some("application/json"));
        assert!(req.header("authorization").is_none());
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["username"], "alice");
        assert_eq!(body["password"], "pw1");
    }

    #[test]
    fn build_login_targets_login_route() {
        let req = client().build_login(&alice()).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:8080/api/login");
    }

    #[test]
    fn build_list_users_carries_bearer_token() {
        let req = client().build_list_users("abc");
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:8080/api/users");
        assert_eq!(req.header("Authorization"), Some("Bearer abc"));
        assert!(req.body.is_none());
    }

    #[test]
    fn build_logout_carries_bearer_token() {
        let req = client().build_logout("abc");
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:8080/api/logout");
        assert_eq!(req.header("authorization"), Some("Bearer abc"));
        assert!(req.body.is_none());
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = AccountClient::new("http://localhost:8080/");
        assert_eq!(client.api_base(), "http://localhost:8080/api");
    }

    #[test]
    fn parse_register_success() {
        let response = HttpResponse::new(200, r#"{"message":"registered"}"#);
        let parsed = client().parse_register(response).unwrap();
        assert_eq!(parsed.text(), "registered");
    }

    #[test]
    fn parse_login_with_token() {
        let response = HttpResponse::new(200, r#"{"token":"abc","message":"ok"}"#);
        let parsed = client().parse_login(response).unwrap();
        assert_eq!(parsed.session_token(), Some("abc"));
        assert_eq!(parsed.message.as_deref(), Some("ok"));
    }

    #[test]
    fn parse_login_without_token_is_ok() {
        let response = HttpResponse::new(200, r#"{"message":"ok"}"#);
        let parsed = client().parse_login(response).unwrap();
        assert!(parsed.session_token().is_none());
    }

    #[test]
    fn parse_login_empty_token_counts_as_absent() {
        let response = HttpResponse::new(200, r#"{"token":"","message":"ok"}"#);
        let parsed = client().parse_login(response).unwrap();
        assert!(parsed.session_token().is_none());
    }

    #[test]
    fn parse_list_users_success() {
        let response = HttpResponse::new(200, r#"{"users":[{"username":"alice"},{"username":"bob"}],"me":"alice"}"#);
        let parsed = client().parse_list_users(response).unwrap();
        assert_eq!(parsed.usernames(), vec!["alice", "bob"]);
        assert_eq!(parsed.me, "alice");
    }

    #[test]
    fn parse_logout_defaults_message() {
        let response = HttpResponse::new(200, "{}");
        let parsed = client().parse_logout(response).unwrap();
        assert_eq!(parsed.text(), LOGGED_OUT);
    }

    #[test]
    fn parse_logout_null_message_defaults() {
        let response = HttpResponse::new(200, r#"{"message":null}"#);
        let parsed = client().parse_logout(response).unwrap();
        assert_eq!(parsed.text(), LOGGED_OUT);
    }

    #[test]
    fn parse_register_null_message_is_empty() {
        let response = HttpResponse::new(200, r#"{"message":null}"#);
        let parsed = client().parse_register(response).unwrap();
        assert!(parsed.message.is_none());
        assert_eq!(parsed.text(), "");
    }

    #[test]
    fn parse_login_null_message_keeps_token() {
        let response = HttpResponse::new(200, r#"{"token":"abc","message":null}"#);
        let parsed = client().parse_login(response).unwrap();
        assert_eq!(parsed.session_token(), Some("abc"));
        assert!(parsed.message.is_none());
    }

    #[test]
    fn parse_logout_keeps_backend_message() {
        let response = HttpResponse::new(200, r#"{"message":"alice logged out"}"#);
        let parsed = client().parse_logout(response).unwrap();
        assert_eq!(parsed.text(), "alice logged out");
    }

    #[test]
    fn non_success_surfaces_body_text() {
        let response = HttpResponse::new(409, "user exists");
        let err = client().parse_register(response).unwrap_err();
        assert!(matches!(err, ApiError::Request { status: 409, .. }));
        assert_eq!(err.request_message(), Some("user exists"));
    }

    #[test]
    fn non_success_with_empty_body_uses_fallback() {
        let response = HttpResponse::new(502, "");
        let err = client().parse_list_users(response).unwrap_err();
        assert_eq!(err.request_message(), Some(REQUEST_FAILED));
    }

    #[test]
    fn parse_users_bad_json() {
        let response = HttpResponse::new(200, "not json");
        let err = client().parse_list_users(response).unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
    }
}
