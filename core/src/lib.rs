//! Client core for the account demo service.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern), and drives the two-screen
//! auth/dashboard view from a single owned `ViewState`.
//!
//! # Design
//! - `AccountClient` is stateless; it holds only the `/api` base.
//! - `Controller` turns user actions into `Call`s and applies their outcomes,
//!   so the host only ever executes one request at a time.
//! - `view::render` is a pure function of the state.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod controller;
pub mod error;
pub mod http;
pub mod types;
pub mod view;

pub use client::AccountClient;
pub use controller::{Action, Call, Controller, Mode, Screen, SessionEvent, ViewState};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use types::{AuthResponse, Credentials, MessageResponse, UserEntry, UsersResponse};
pub use view::{render, View};
