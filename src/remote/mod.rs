//! remote service access
//!
//! every call is a single request/response round-trip: no retries, no
//! caching, no pagination.

pub mod auth;
pub mod debts;
pub mod envelope;
pub mod transport;

#[cfg(test)]
pub(crate) mod fake;

use async_trait::async_trait;
use serde_json::Value;
use std::fmt;

use crate::errors::Result;
use crate::session::SessionToken;

pub use auth::{AuthGateway, AuthSession};
pub use debts::DebtGateway;
pub use envelope::Envelope;
pub use transport::ReqwestTransport;

pub const REGISTER_PATH: &str = "/auth/register";
pub const LOGIN_PATH: &str = "/auth/login";
pub const DEBTS_PATH: &str = "/finance/debt";

const AUTH_PREFIX: &str = "/auth";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpMethod::Get => f.write_str("GET"),
            HttpMethod::Post => f.write_str("POST"),
        }
    }
}

/// outbound request, relative to the service base url
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub path: String,
    pub bearer: Option<SessionToken>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn get(path: &str) -> Self {
        Self {
            method: HttpMethod::Get,
            path: path.to_string(),
            bearer: None,
            body: None,
        }
    }

    pub fn post(path: &str, body: Value) -> Self {
        Self {
            method: HttpMethod::Post,
            path: path.to_string(),
            bearer: None,
            body: Some(body),
        }
    }

    /// attach the bearer token, except on auth endpoints which never carry one
    pub fn authorized(mut self, token: SessionToken) -> Self {
        if !is_auth_path(&self.path) {
            self.bearer = Some(token);
        }
        self
    }
}

pub fn is_auth_path(path: &str) -> bool {
    path == AUTH_PREFIX || path.starts_with("/auth/")
}

/// raw reply: http status plus the undecoded body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiReply {
    pub status: u16,
    pub body: String,
}

impl ApiReply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// carries a request to the service and brings back whatever it answered
///
/// only transport failures are errors here; http error statuses come back
/// as replies and are judged by [`envelope::parse_reply`].
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<ApiReply>;
}
