//! Client-side session layer for the todo API.
//!
//! # Overview
//! Token lifecycle (login/register/logout, persistence across a primary
//! store and a cookie mirror) plus an authenticated CRUD client and an
//! in-memory collection controller. The remote API is an external
//! collaborator reached over HTTP; the workspace's `mock-server` crate
//! implements the same contract for tests.
//!
//! # Design
//! - Storage and transport are injectable ports ([`StoragePort`],
//!   [`Transport`]), so every layer above them tests without a network or a
//!   filesystem.
//! - Two behaviorally equivalent HTTP clients: [`ApiClient`] takes the
//!   token per call, [`InterceptedClient`] injects it via middleware. Both
//!   share one response-normalization routine.
//! - [`AuthService`] and [`TodoController`] are the error boundary: nothing
//!   above them sees a raw failure, only message strings and state flags.

pub mod auth;
pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod http;
pub mod intercept;
pub mod store;
pub mod todos;
pub mod types;

pub use auth::{AuthService, Session};
pub use client::ApiClient;
pub use config::{Config, DEFAULT_API_URL};
pub use controller::{RefreshTicket, TodoController};
pub use error::{ApiError, AUTH_FAILED_MESSAGE, AUTH_REQUIRED_MESSAGE};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError, UreqTransport};
pub use intercept::InterceptedClient;
pub use store::{
    parse_cookie_header, token_from_cookie_header, CookieStorage, FileStorage, MemoryStorage,
    StoragePort, TokenStore, TOKEN_KEY, USER_KEY,
};
pub use todos::TodoAccess;
pub use types::{
    AuthPayload, CreateTodo, Credentials, Envelope, Priority, Registration, SortField, SortOrder,
    Todo, TodoFilters, TodoPage, UpdateTodo, User,
};
