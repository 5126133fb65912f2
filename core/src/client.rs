//! Fetch-style HTTP client for the todo API.
//!
//! # Design
//! `ApiClient` holds a base URL and a [`Transport`]; every call goes through
//! [`ApiClient::request`], which merges default headers, attaches the bearer
//! token when one is supplied, and funnels the response through
//! [`parse_response`] — the single normalization routine shared with the
//! interceptor client, so both variants are equivalent by construction.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{ApiError, AUTH_FAILED_MESSAGE};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport, UreqTransport};

/// Blocking client over a configured base URL.
pub struct ApiClient {
    base_url: String,
    transport: Box<dyn Transport>,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_transport(base_url, Box::new(UreqTransport::new()))
    }

    pub fn with_transport(base_url: &str, transport: Box<dyn Transport>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issue a request and return the parsed response payload.
    ///
    /// The URL is `base_url` + `endpoint`. A `Content-Type: application/json`
    /// header is always sent; `Authorization: Bearer <token>` is attached
    /// only when `token` is present and non-empty. JSON bodies parse into
    /// [`Value`], anything else comes back as a string value.
    pub fn request(
        &self,
        method: HttpMethod,
        endpoint: &str,
        body: Option<String>,
        token: Option<&str>,
    ) -> Result<Value, ApiError> {
        let mut headers = vec![("Content-Type".to_string(), "application/json".to_string())];
        if let Some(token) = token {
            if !token.trim().is_empty() {
                headers.push(("Authorization".to_string(), format!("Bearer {token}")));
            }
        }

        let request = HttpRequest {
            method,
            url: format!("{}{endpoint}", self.base_url),
            headers,
            body,
        };
        log::debug!("{:?} {}", request.method, request.url);

        let response = self
            .transport
            .send(&request)
            .map_err(|e| ApiError::Network(e.to_string()))?;
        parse_response(response)
    }

    pub fn get<T: DeserializeOwned>(&self, endpoint: &str, token: Option<&str>) -> Result<T, ApiError> {
        decode(self.request(HttpMethod::Get, endpoint, None, token)?)
    }

    pub fn post<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &impl Serialize,
        token: Option<&str>,
    ) -> Result<T, ApiError> {
        decode(self.request(HttpMethod::Post, endpoint, Some(encode(body)?), token)?)
    }

    pub fn put<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &impl Serialize,
        token: Option<&str>,
    ) -> Result<T, ApiError> {
        decode(self.request(HttpMethod::Put, endpoint, Some(encode(body)?), token)?)
    }

    pub fn delete<T: DeserializeOwned>(&self, endpoint: &str, token: Option<&str>) -> Result<T, ApiError> {
        decode(self.request(HttpMethod::Delete, endpoint, None, token)?)
    }
}

fn encode(body: &impl Serialize) -> Result<String, ApiError> {
    serde_json::to_string(body).map_err(|e| ApiError::Serialization(e.to_string()))
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|e| ApiError::MalformedResponse(e.to_string()))
}

/// Normalize a raw response into a payload or an [`ApiError`].
///
/// Success: a JSON body parses into [`Value`] (a declared-JSON body that does
/// not parse is malformed), any other body comes back as a string value.
/// Failure: the error message prefers a `message` field in a JSON body, then
/// a non-empty text body, then the status text — except 401, which always
/// carries [`AUTH_FAILED_MESSAGE`] no matter what the server sent.
pub(crate) fn parse_response(response: HttpResponse) -> Result<Value, ApiError> {
    if response.is_success() {
        return if response.is_json() {
            serde_json::from_str(&response.body)
                .map_err(|e| ApiError::MalformedResponse(e.to_string()))
        } else {
            Ok(Value::String(response.body))
        };
    }

    let payload: Option<Value> = if response.is_json() {
        serde_json::from_str(&response.body).ok()
    } else if response.body.is_empty() {
        None
    } else {
        Some(Value::String(response.body.clone()))
    };

    let message = if response.status == 401 {
        AUTH_FAILED_MESSAGE.to_string()
    } else {
        payload
            .as_ref()
            .and_then(|p| p.get("message"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .or_else(|| match &payload {
                Some(Value::String(text)) if !text.is_empty() => Some(text.clone()),
                _ => None,
            })
            .unwrap_or_else(|| response.status_text.clone())
    };

    Err(ApiError::Http {
        status: response.status,
        message,
        payload,
    })
}
