//! Interceptor-style HTTP client.
//!
//! # Design
//! Where [`crate::client::ApiClient`] takes the token explicitly per call,
//! `InterceptedClient` wraps a `ureq` agent whose request middleware pulls
//! the bearer token out of the [`TokenStore`] on every outgoing call, and
//! whose response path rewrites any 401 before it reaches the caller. Both
//! clients funnel responses through the same normalization routine, so they
//! are behaviorally equivalent from the caller's perspective.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use ureq::http::header::AUTHORIZATION;
use ureq::http::{HeaderValue, Request, Response};
use ureq::middleware::{Middleware, MiddlewareNext};
use ureq::{Agent, Body, SendBody};

use crate::client::parse_response;
use crate::error::ApiError;
use crate::http::{read_response, HttpMethod};
use crate::store::TokenStore;

/// Request middleware: inject `Authorization: Bearer <token>` from the
/// token store on every outgoing call that has a non-empty token available.
struct BearerAuth {
    store: TokenStore,
}

impl Middleware for BearerAuth {
    fn handle(
        &self,
        mut request: Request<SendBody>,
        next: MiddlewareNext,
    ) -> Result<Response<Body>, ureq::Error> {
        if let Some(token) = self.store.token().filter(|t| !t.trim().is_empty()) {
            if let Ok(value) = HeaderValue::from_str(&format!("Bearer {token}")) {
                request.headers_mut().insert(AUTHORIZATION, value);
            }
        }
        next.handle(request)
    }
}

/// Client variant that owns its authentication: callers never pass a token.
pub struct InterceptedClient {
    agent: Agent,
    base_url: String,
}

impl InterceptedClient {
    pub fn new(base_url: &str, store: TokenStore) -> Self {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .middleware(BearerAuth { store })
            .build()
            .new_agent();
        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn execute(
        &self,
        method: HttpMethod,
        endpoint: &str,
        body: Option<String>,
    ) -> Result<Value, ApiError> {
        let url = format!("{}{endpoint}", self.base_url);
        log::debug!("{method:?} {url}");

        let result = match (method, body) {
            (HttpMethod::Get, _) => self.agent.get(&url).call(),
            (HttpMethod::Delete, _) => self.agent.delete(&url).call(),
            (HttpMethod::Post, Some(body)) => self
                .agent
                .post(&url)
                .content_type("application/json")
                .send(body.as_bytes()),
            (HttpMethod::Post, None) => self.agent.post(&url).send_empty(),
            (HttpMethod::Put, Some(body)) => self
                .agent
                .put(&url)
                .content_type("application/json")
                .send(body.as_bytes()),
            (HttpMethod::Put, None) => self.agent.put(&url).send_empty(),
        };

        let response = result.map_err(|e| ApiError::Network(e.to_string()))?;
        // parse_response applies the 401 rewrite, shared with ApiClient.
        parse_response(read_response(response))
    }

    pub fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        decode(self.execute(HttpMethod::Get, endpoint, None)?)
    }

    pub fn post<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &impl Serialize,
    ) -> Result<T, ApiError> {
        decode(self.execute(HttpMethod::Post, endpoint, Some(encode(body)?))?)
    }

    pub fn put<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &impl Serialize,
    ) -> Result<T, ApiError> {
        decode(self.execute(HttpMethod::Put, endpoint, Some(encode(body)?))?)
    }

    pub fn delete<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        decode(self.execute(HttpMethod::Delete, endpoint, None)?)
    }
}

fn encode(body: &impl Serialize) -> Result<String, ApiError> {
    serde_json::to_string(body).map_err(|e| ApiError::Serialization(e.to_string()))
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|e| ApiError::MalformedResponse(e.to_string()))
}
