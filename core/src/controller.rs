//! Authentication-state controller behind the two-screen view.
//!
//! # Design
//! `Controller` owns a single `ViewState` and exposes every user action as a
//! method. Actions that need the network return a `Call`; the host executes
//! its request and feeds the outcome back through `resolve`, which may in
//! turn return a follow-up call. Storing a new token emits
//! `SessionEvent::TokenSet`, and `on_session_event` is the only place a
//! directory fetch is issued.
//!
//! Directory and logout outcomes are fenced by token identity: an outcome
//! for a token that is no longer current is dropped.

use tracing::{debug, info, warn};

use crate::client::AccountClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::types::Credentials;

pub const LOGIN_PENDING: &str = "login succeeded, fetching user list";
pub const DIRECTORY_REFRESHED: &str = "user list updated";
pub const UNKNOWN_ERROR: &str = "unknown error";
pub const LOGOUT_FAILED: &str = "logout failed";

/// Which form the auth screen shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Login,
    Register,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Auth,
    Dashboard,
}

/// Everything the view renders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub mode: Mode,
    pub form: Credentials,
    pub token: Option<String>,
    pub users: Vec<String>,
    pub current_user: String,
    pub status: String,
    pub error: String,
}

impl ViewState {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn screen(&self) -> Screen {
        if self.is_authenticated() {
            Screen::Dashboard
        } else {
            Screen::Auth
        }
    }

    fn reset_feedback(&mut self) {
        self.status.clear();
        self.error.clear();
    }

    fn show_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    fn show_error(&mut self, err: &ApiError, fallback: &str) {
        self.error = match err.request_message() {
            Some(message) => message.to_string(),
            None => {
                warn!(error = %err, "unrecognised error, showing fallback");
                fallback.to_string()
            }
        };
    }

    fn clear_session(&mut self) {
        self.token = None;
        self.users.clear();
        self.current_user.clear();
    }
}

/// The logical operation a `Call` performs. Token-bound actions carry the
/// token they were issued with so late outcomes can be fenced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Register,
    Login,
    ListUsers { token: String },
    Logout { token: String },
}

/// A network call the host must execute.
#[derive(Debug, Clone)]
pub struct Call {
    pub action: Action,
    pub request: HttpRequest,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    TokenSet(String),
}

#[derive(Debug, Clone)]
pub struct Controller {
    client: AccountClient,
    state: ViewState,
}

impl Controller {
    pub fn new(client: AccountClient) -> Self {
        Self {
            client,
            state: ViewState::default(),
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.state.mode = mode;
    }

    pub fn set_username(&mut self, username: impl Into<String>) {
        self.state.form.username = username.into();
    }

    pub fn set_password(&mut self, password: impl Into<String>) {
        self.state.form.password = password.into();
    }

    /// Submit the auth form in its current mode.
    pub fn submit(&mut self) -> Option<Call> {
        self.state.reset_feedback();
        let (action, built) = match self.state.mode {
            Mode::Register => (Action::Register, self.client.build_register(&self.state.form)),
            Mode::Login => (Action::Login, self.client.build_login(&self.state.form)),
        };
        match built {
            Ok(request) => {
                debug!(?action, username = %self.state.form.username, "submitting auth form");
                Some(Call { action, request })
            }
            Err(err) => {
                self.state.show_error(&err, UNKNOWN_ERROR);
                None
            }
        }
    }

    /// Log out of the current session. Does nothing while unauthenticated.
    pub fn logout(&mut self) -> Option<Call> {
        let token = self.state.token.clone()?;
        self.state.reset_feedback();
        debug!("logging out");
        Some(Call {
            request: self.client.build_logout(&token),
            action: Action::Logout { token },
        })
    }

    /// Apply the outcome of a previously returned `Call`.
    pub fn resolve(&mut self, action: Action, outcome: Result<HttpResponse, ApiError>) -> Option<Call> {
        match action {
            Action::Register => {
                self.finish_register(outcome);
                None
            }
            Action::Login => self.finish_login(outcome),
            Action::ListUsers { token } => {
                self.finish_list_users(&token, outcome);
                None
            }
            Action::Logout { token } => {
                self.finish_logout(&token, outcome);
                None
            }
        }
    }

    /// Handle an event emitted by a state transition.
    pub fn on_session_event(&mut self, event: SessionEvent) -> Call {
        match event {
            SessionEvent::TokenSet(token) => {
                debug!("token set, fetching user directory");
                Call {
                    request: self.client.build_list_users(&token),
                    action: Action::ListUsers { token },
                }
            }
        }
    }

    /// Execute `call` and every follow-up it produces, one at a time.
    pub fn run<F>(&mut self, call: Option<Call>, mut execute: F)
    where
        F: FnMut(&HttpRequest) -> Result<HttpResponse, ApiError>,
    {
        let mut next = call;
        while let Some(call) = next {
            let outcome = execute(&call.request);
            next = self.resolve(call.action, outcome);
        }
    }

    fn finish_register(&mut self, outcome: Result<HttpResponse, ApiError>) {
        match outcome.and_then(|response| self.client.parse_register(response)) {
            Ok(registered) => {
                info!(username = %self.state.form.username, "registered");
                self.state.show_status(registered.text());
                self.state.mode = Mode::Login;
            }
            Err(err) => self.state.show_error(&err, UNKNOWN_ERROR),
        }
    }

    fn finish_login(&mut self, outcome: Result<HttpResponse, ApiError>) -> Option<Call> {
        let auth = match outcome.and_then(|response| self.client.parse_login(response)) {
            Ok(auth) => auth,
            Err(err) => {
                self.state.show_error(&err, UNKNOWN_ERROR);
                return None;
            }
        };
        let Some(token) = auth.session_token() else {
            warn!(message = ?auth.message, "login succeeded without a token, staying on the auth screen");
            return None;
        };
        let event = self.set_token(token.to_string());
        self.state.show_status(LOGIN_PENDING);
        event.map(|event| self.on_session_event(event))
    }

    fn finish_list_users(&mut self, token: &str, outcome: Result<HttpResponse, ApiError>) {
        if !self.is_current(token) {
            warn!("dropping user directory response for a stale token");
            return;
        }
        match outcome.and_then(|response| self.client.parse_list_users(response)) {
            Ok(directory) => {
                self.state.users = directory.usernames();
                self.state.current_user = directory.me;
                self.state.error.clear();
                self.state.show_status(DIRECTORY_REFRESHED);
                info!(count = self.state.users.len(), "user directory refreshed");
            }
            Err(err) => self.state.show_error(&err, UNKNOWN_ERROR),
        }
    }

    fn finish_logout(&mut self, token: &str, outcome: Result<HttpResponse, ApiError>) {
        if !self.is_current(token) {
            warn!("dropping logout response for a stale token");
            return;
        }
        match outcome.and_then(|response| self.client.parse_logout(response)) {
            Ok(done) => {
                self.state.show_status(done.text());
                self.state.clear_session();
                info!("logged out");
            }
            Err(err) => self.state.show_error(&err, LOGOUT_FAILED),
        }
    }

    /// Store `token`, emitting `TokenSet` only when the value changes.
    fn set_token(&mut self, token: String) -> Option<SessionEvent> {
        if self.is_current(&token) {
            return None;
        }
        info!("session started");
        self.state.token = Some(token.clone());
        Some(SessionEvent::TokenSet(token))
    }

    fn is_current(&self, token: &str) -> bool {
        self.state.token.as_deref() == Some(token)
    }
}
