// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::fmt;
use std::time::{Duration, Instant};

use crate::token::TokenResponse;

/// Longest lifetime honoured from `expires_in`; larger values are clamped.
const MAX_LIFETIME: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// A bearer token plus the instants that govern its reuse.
///
/// The token string is kept exactly as received.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    secret: String,
    token_type: Option<String>,
    issued_at: Instant,
    expires_at: Instant,
}

impl AccessToken {
    /// Build from a token response received at `now`.
    ///
    /// Without `expires_in` the token lives for `fallback_ttl`.
    pub fn from_response(resp: TokenResponse, fallback_ttl: Duration, now: Instant) -> Self {
        let lifetime =
            resp.expires_in.map(Duration::from_secs).unwrap_or(fallback_ttl).min(MAX_LIFETIME);
        Self {
            secret: resp.access_token,
            token_type: resp.token_type,
            issued_at: now,
            expires_at: now.checked_add(lifetime).unwrap_or(now),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.secret
    }

    pub fn token_type(&self) -> Option<&str> {
        self.token_type.as_deref()
    }

    pub fn issued_at(&self) -> Instant {
        self.issued_at
    }

    pub fn expires_at(&self) -> Instant {
        self.expires_at
    }

    pub fn lifetime(&self) -> Duration {
        self.expires_at.saturating_duration_since(self.issued_at)
    }

    /// Instant after which the token should be replaced.
    ///
    /// The margin is capped at half the lifetime so short-lived tokens still
    /// get reused for a while.
    pub fn refresh_at(&self, margin: Duration) -> Instant {
        let margin = margin.min(self.lifetime() / 2);
        self.expires_at.checked_sub(margin).unwrap_or(self.issued_at)
    }

    pub fn is_fresh(&self, now: Instant, margin: Duration) -> bool {
        now < self.refresh_at(margin)
    }

    /// Remaining time until hard expiry.
    pub fn expires_in(&self, now: Instant) -> Duration {
        self.expires_at.saturating_duration_since(now)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &"<redacted>")
            .field("token_type", &self.token_type)
            .field("lifetime", &self.lifetime())
            .finish()
    }
}

#[cfg(test)]
#[path = "access_tests.rs"]
mod tests;
