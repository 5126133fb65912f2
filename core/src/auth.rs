//! Login, registration and session state.
//!
//! # Design
//! `AuthService` is the boundary between the HTTP client and consumers:
//! every failure is converted into a returned message string, and a failed
//! attempt never mutates stored state. Session state is constructed only
//! through [`Session::authenticated`] and [`Session::anonymous`], which keep
//! the invariant that `is_authenticated` holds exactly when both a user and
//! a non-empty token are present.

use serde::Serialize;

use crate::client::ApiClient;
use crate::store::TokenStore;
use crate::types::{AuthPayload, Credentials, Envelope, Registration, User};

/// Current identity, mirrored into the [`TokenStore`] for cross-restart
/// persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user: Option<User>,
    pub token: Option<String>,
    pub is_authenticated: bool,
}

impl Session {
    pub fn authenticated(user: User, token: String) -> Self {
        let is_authenticated = !token.is_empty();
        Self {
            user: Some(user),
            token: Some(token),
            is_authenticated,
        }
    }

    pub fn anonymous() -> Self {
        Self {
            user: None,
            token: None,
            is_authenticated: false,
        }
    }
}

/// Performs login/register calls and owns the in-memory [`Session`].
pub struct AuthService {
    client: ApiClient,
    store: TokenStore,
    session: Session,
}

impl AuthService {
    /// A store that already holds a token and user (from a prior visit)
    /// yields an authenticated session without any network call.
    pub fn new(client: ApiClient, store: TokenStore) -> Self {
        let session = match (store.token(), store.user()) {
            (Some(token), Some(user)) if !token.is_empty() => Session::authenticated(user, token),
            _ => Session::anonymous(),
        };
        Self {
            client,
            store,
            session,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn store(&self) -> &TokenStore {
        &self.store
    }

    /// `POST /auth/login`. On failure nothing is persisted and the session
    /// is untouched; the error surfaces only as the returned message.
    pub fn login(&mut self, credentials: &Credentials) -> Result<(), String> {
        self.authenticate("/auth/login", credentials)
    }

    /// `POST /auth/register`. Same contract as [`AuthService::login`].
    pub fn register(&mut self, registration: &Registration) -> Result<(), String> {
        self.authenticate("/auth/register", registration)
    }

    fn authenticate(&mut self, endpoint: &str, body: &impl Serialize) -> Result<(), String> {
        let envelope: Envelope<AuthPayload> = self
            .client
            .post(endpoint, body, None)
            .map_err(|e| e.to_string())?;

        let AuthPayload { token, user } = envelope.data;
        self.store.save_token(&token);
        self.store.save_user(&user);
        self.session = Session::authenticated(user, token);
        Ok(())
    }

    /// Clear the store and reset the session. Unconditional and idempotent;
    /// there is no error path.
    pub fn logout(&mut self) {
        self.store.remove_token();
        self.session = Session::anonymous();
    }
}
