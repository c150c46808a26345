//! In-memory account backend serving the `/api` contract.
//!
//! Accounts and issued tokens live behind one `RwLock`. Failures answer with
//! a plain-text body, which is what clients show to the user.

use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, Method, StatusCode},
    routing::{get, post},
    Json, Router,
};
use rand::{distr::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Generated accounts added next to `admin` at startup.
pub const SEED_USERS: usize = 5;

const TOKEN_LEN: usize = 32;
const PASSWORD_LEN: usize = 8;
const PASSWORD_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
const ADJECTIVES: [&str; 8] = ["blue", "fast", "bright", "silent", "swift", "lucky", "sunny", "calm"];
const NOUNS: [&str; 8] = ["whale", "fox", "eagle", "panda", "koala", "tiger", "otter", "lynx"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserEntry {
    pub username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsersResponse {
    pub users: Vec<UserEntry>,
    pub me: String,
}

/// Registered accounts (username to password) and live tokens (token to
/// username).
#[derive(Debug, Default)]
pub struct Accounts {
    users: BTreeMap<String, String>,
    tokens: HashMap<String, String>,
}

impl Accounts {
    /// `admin`/`admin` plus `count` generated accounts.
    pub fn seeded(count: usize) -> Self {
        let mut accounts = Self::default().with_user("admin", "admin");
        let mut generated = 0;
        while generated < count {
            let username = random_username();
            if accounts.users.contains_key(&username) {
                continue;
            }
            accounts.users.insert(username, random_password());
            generated += 1;
        }
        accounts
    }

    pub fn with_user(mut self, username: &str, password: &str) -> Self {
        self.users.insert(username.to_string(), password.to_string());
        self
    }

    pub fn usernames(&self) -> impl Iterator<Item = &str> {
        self.users.keys().map(String::as_str)
    }

    fn issue_token(&mut self, username: &str) -> String {
        let token = generate_token();
        self.tokens.insert(token.clone(), username.to_string());
        token
    }
}

pub type Db = Arc<RwLock<Accounts>>;

type Rejection = (StatusCode, &'static str);

pub fn app() -> Router {
    router(Accounts::seeded(SEED_USERS))
}

pub fn router(accounts: Accounts) -> Router {
    let db: Db = Arc::new(RwLock::new(accounts));
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS]);

    Router::new()
        .route("/api/register", post(register).fallback(method_not_allowed))
        .route("/api/login", post(login).fallback(method_not_allowed))
        .route("/api/logout", post(logout).fallback(method_not_allowed))
        .route("/api/users", get(list_users).fallback(method_not_allowed))
        .route("/healthz", get(health))
        .with_state(db)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    serve(listener, Accounts::seeded(SEED_USERS)).await
}

/// Serve `accounts` on `listener` until the process exits.
pub async fn serve(listener: TcpListener, accounts: Accounts) -> Result<(), std::io::Error> {
    axum::serve(listener, router(accounts)).await
}

async fn register(State(db): State<Db>, body: Bytes) -> Result<Json<AuthResponse>, Rejection> {
    let input = decode_credentials(&body)?;
    if input.username.is_empty() || input.password.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "missing credentials"));
    }

    let mut accounts = db.write().await;
    if accounts.users.contains_key(&input.username) {
        return Err((StatusCode::CONFLICT, "user exists"));
    }
    accounts.users.insert(input.username.clone(), input.password);
    tracing::info!(username = %input.username, "user registered");
    Ok(Json(AuthResponse {
        token: None,
        message: "user registered".to_string(),
    }))
}

async fn login(State(db): State<Db>, body: Bytes) -> Result<Json<AuthResponse>, Rejection> {
    let input = decode_credentials(&body)?;

    let mut accounts = db.write().await;
    if accounts.users.get(&input.username) != Some(&input.password) {
        return Err((StatusCode::UNAUTHORIZED, "invalid credentials"));
    }
    let token = accounts.issue_token(&input.username);
    tracing::info!(username = %input.username, "login");
    Ok(Json(AuthResponse {
        token: Some(token),
        message: "login success".to_string(),
    }))
}

async fn logout(State(db): State<Db>, headers: HeaderMap) -> Result<Json<AuthResponse>, Rejection> {
    let token = bearer_token(&headers).ok_or((StatusCode::UNAUTHORIZED, "unauthorized"))?;

    let mut accounts = db.write().await;
    let username = accounts
        .tokens
        .remove(token)
        .ok_or((StatusCode::UNAUTHORIZED, "unauthorized"))?;
    tracing::info!(%username, "logout");
    Ok(Json(AuthResponse {
        token: None,
        message: format!("{username} logged out"),
    }))
}

async fn list_users(State(db): State<Db>, headers: HeaderMap) -> Result<Json<UsersResponse>, Rejection> {
    let token = bearer_token(&headers).ok_or((StatusCode::UNAUTHORIZED, "unauthorized"))?;

    let accounts = db.read().await;
    let me = accounts
        .tokens
        .get(token)
        .cloned()
        .ok_or((StatusCode::UNAUTHORIZED, "unauthorized"))?;
    let users = accounts
        .usernames()
        .map(|username| UserEntry {
            username: username.to_string(),
        })
        .collect();
    Ok(Json(UsersResponse { users, me }))
}

async fn health() -> &'static str {
    "ok"
}

async fn method_not_allowed() -> Rejection {
    (StatusCode::METHOD_NOT_ALLOWED, "method not allowed")
}

fn decode_credentials(body: &[u8]) -> Result<Credentials, Rejection> {
    serde_json::from_slice(body).map_err(|_| (StatusCode::BAD_REQUEST, "invalid payload"))
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

fn generate_token() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LEN)
        .map(char::from)
        .collect()
}

fn random_username() -> String {
    let mut rng = rand::rng();
    format!(
        "{}-{}-{:02}",
        ADJECTIVES[rng.random_range(0..ADJECTIVES.len())],
        NOUNS[rng.random_range(0..NOUNS.len())],
        rng.random_range(0..100u8),
    )
}

fn random_password() -> String {
    let mut rng = rand::rng();
    (0..PASSWORD_LEN)
        .map(|_| char::from(PASSWORD_CHARSET[rng.random_range(0..PASSWORD_CHARSET.len())]))
        .collect()
}
