// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! OAuth2 client-credentials token acquisition.
//!
//! [`exchange::exchange`] performs a single grant request,
//! [`retry::exchange_with_retries`] wraps it with bounded backoff, and
//! [`provider::TokenProvider`] caches the result until shortly before expiry
//! with single-flight refresh.

pub mod access;
pub mod exchange;
pub mod provider;
pub mod retry;

use std::fmt;
use std::sync::Once;
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub use access::AccessToken;
pub use provider::{TokenProvider, TokenState, TokenStatus};

use crate::token::retry::RetryPolicy;

/// How the client id/secret are presented to the token endpoint.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum AuthMethod {
    /// HTTP Basic `Authorization` header.
    #[default]
    Header,
    /// `client_id` / `client_secret` form fields.
    Body,
}

/// Client credentials for the token endpoint.
///
/// Every field may be empty; emptiness is only reported when an exchange is
/// attempted (see [`Credentials::missing_fields`]).
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub token_host: String,
    pub token_path: String,
    pub scope: Option<String>,
    pub auth_method: AuthMethod,
}

impl Credentials {
    /// `{token_host}{token_path}` joined by exactly one `/`.
    pub fn token_url(&self) -> String {
        let host = self.token_host.trim_end_matches('/');
        let path = self.token_path.trim();
        if path.is_empty() {
            return host.to_owned();
        }
        format!("{host}/{}", path.trim_start_matches('/'))
    }

    /// Names of required fields that are empty.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.client_id.is_empty() {
            missing.push("CLIENT_ID");
        }
        if self.client_secret.is_empty() {
            missing.push("CLIENT_SECRET");
        }
        if self.token_host.is_empty() {
            missing.push("TOKEN_HOST");
        }
        missing
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &if self.client_secret.is_empty() { "" } else { "<redacted>" })
            .field("token_url", &self.token_url())
            .field("scope", &self.scope)
            .field("auth_method", &self.auth_method)
            .finish()
    }
}

/// Token cache and transport tuning.
#[derive(Debug, Clone)]
pub struct TokenSettings {
    /// Reuse tokens across calls; when false every call performs an exchange.
    pub cache: bool,
    pub refresh_margin: Duration,
    pub fallback_ttl: Duration,
    pub request_timeout: Duration,
    pub prefetch_retry: Duration,
    pub retry: RetryPolicy,
}

impl Default for TokenSettings {
    fn default() -> Self {
        Self {
            cache: true,
            refresh_margin: Duration::from_secs(60),
            fallback_ttl: Duration::from_secs(300),
            request_timeout: Duration::from_secs(10),
            prefetch_retry: Duration::from_secs(30),
            retry: RetryPolicy::default(),
        }
    }
}

/// Standard OAuth2 token response.
///
/// Only `access_token` is strict. Optional fields of an unexpected type are
/// treated as absent, and `expires_in` also accepts floats and numeric strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_seconds", skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

fn lenient_string<'de, D: Deserializer<'de>>(de: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(de)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

fn lenient_seconds<'de, D: Deserializer<'de>>(de: D) -> Result<Option<u64>, D::Error> {
    let whole = |f: f64| (f.is_finite() && f >= 0.0).then_some(f as u64);
    Ok(match Value::deserialize(de)? {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().and_then(whole)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<u64>().ok().or_else(|| s.parse::<f64>().ok().and_then(whole))
        }
        _ => None,
    })
}

/// Failure to obtain an access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Required credential fields are empty; no request was sent.
    MissingCredentials { fields: Vec<&'static str> },
    /// The token URL could not be turned into a request.
    InvalidUrl(String),
    /// Connection, TLS or timeout failure.
    Network(String),
    /// The token endpoint answered with a non-2xx status.
    Rejected { status: u16, body: String },
    /// The response body was not a usable token response.
    Malformed(String),
}

impl TokenError {
    /// Whether a retry may succeed without a configuration change.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Rejected { status, .. } => *status == 429 || *status >= 500,
            Self::MissingCredentials { .. } | Self::InvalidUrl(_) | Self::Malformed(_) => false,
        }
    }

    /// Short message suitable for an end-user error page.
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingCredentials { fields } => {
                format!("Client credentials are not configured (missing {}).", fields.join(", "))
            }
            Self::InvalidUrl(_) => "The token endpoint URL is invalid.".to_owned(),
            Self::Network(_) => "The token server could not be reached.".to_owned(),
            Self::Rejected { status, .. } => {
                format!("The token server rejected the client credentials (HTTP {status}).")
            }
            Self::Malformed(_) => "The token server returned an unusable response.".to_owned(),
        }
    }
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCredentials { fields } => {
                write!(f, "missing credentials: {}", fields.join(", "))
            }
            Self::InvalidUrl(msg) => write!(f, "invalid token url: {msg}"),
            Self::Network(msg) => write!(f, "token request failed: {msg}"),
            Self::Rejected { status, body } => write!(f, "token request rejected ({status}): {body}"),
            Self::Malformed(msg) => write!(f, "malformed token response: {msg}"),
        }
    }
}

impl std::error::Error for TokenError {}

static CRYPTO_INIT: Once = Once::new();

/// Install the ring crypto provider for reqwest/rustls.
/// Only the first call has effect.
pub fn ensure_crypto() {
    CRYPTO_INIT.call_once(|| {
        let _ = rustls::crypto::ring::default_provider().install_default();
    });
}

/// Build the HTTP client used for token exchanges.
pub fn http_client(timeout: Duration) -> anyhow::Result<reqwest::Client> {
    ensure_crypto();
    reqwest::Client::builder().timeout(timeout).build().context("building token http client")
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
