// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Token provider: caches the access token until shortly before expiry and
//! serializes refreshes so concurrent cache misses share one exchange.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::token::retry::exchange_with_retries;
use crate::token::{http_client, AccessToken, Credentials, TokenError, TokenSettings};

/// Shortest sleep of the background refresher, so tiny lifetimes cannot spin it.
const MIN_PREFETCH_SLEEP: Duration = Duration::from_secs(1);

#[derive(Default)]
struct CacheState {
    token: Option<AccessToken>,
    last_error: Option<(TokenError, Instant)>,
}

/// Coarse state reported by [`TokenProvider::status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenState {
    /// No token has been obtained yet.
    Empty,
    /// A cached token is within its reuse window.
    Fresh,
    /// A cached token exists but is due for refresh.
    Stale,
    /// The most recent exchange failed.
    Failed,
}

/// Token status for health reporting. Never includes the token itself.
#[derive(Debug, Clone, Serialize)]
pub struct TokenStatus {
    pub state: TokenState,
    pub cache_enabled: bool,
    pub token_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in_secs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    /// Completed exchanges (successful or not), retries excluded.
    pub exchanges: u64,
}

/// Shared access-token source for page renders.
pub struct TokenProvider {
    credentials: Credentials,
    settings: TokenSettings,
    http: reqwest::Client,
    state: RwLock<CacheState>,
    /// Held for the duration of a cached refresh (single flight).
    refresh_lock: Mutex<()>,
    exchanges: AtomicU64,
}

impl TokenProvider {
    pub fn new(credentials: Credentials, settings: TokenSettings) -> anyhow::Result<Arc<Self>> {
        let http = http_client(settings.request_timeout)?;
        Ok(Arc::new(Self {
            credentials,
            settings,
            http,
            state: RwLock::new(CacheState::default()),
            refresh_lock: Mutex::new(()),
            exchanges: AtomicU64::new(0),
        }))
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Return a usable access token, exchanging credentials when needed.
    ///
    /// With caching enabled, callers that miss the cache while another
    /// refresh is in flight wait for it and share its outcome. A transient
    /// refresh failure still serves the cached token until it hard-expires.
    pub async fn access_token(&self) -> Result<AccessToken, TokenError> {
        if !self.settings.cache {
            return self.exchange().await;
        }

        if let Some(token) = self.cached().await {
            return Ok(token);
        }

        let waiting_since = Instant::now();
        let _flight = self.refresh_lock.lock().await;

        // Another caller may have finished a refresh while we waited.
        if let Some(token) = self.cached().await {
            return Ok(token);
        }
        let result = match self.failed_since(waiting_since).await {
            Some(err) => Err(err),
            None => self.exchange().await,
        };
        match result {
            Err(e) if e.is_transient() => self.unexpired_or(e).await,
            other => other,
        }
    }

    /// Refresh unconditionally, replacing any cached token.
    pub async fn force_refresh(&self) -> Result<AccessToken, TokenError> {
        let _flight = self.refresh_lock.lock().await;
        self.exchange().await
    }

    /// Drop the cached token so the next call exchanges again.
    pub async fn invalidate(&self) {
        self.state.write().await.token = None;
    }

    pub async fn status(&self) -> TokenStatus {
        let state = self.state.read().await;
        let now = Instant::now();
        let failed_last = match (&state.token, &state.last_error) {
            (Some(token), Some((_, at))) => *at > token.issued_at(),
            (None, Some(_)) => true,
            _ => false,
        };
        let token_state = if failed_last {
            TokenState::Failed
        } else {
            match &state.token {
                None => TokenState::Empty,
                Some(t) if t.is_fresh(now, self.settings.refresh_margin) => TokenState::Fresh,
                Some(_) => TokenState::Stale,
            }
        };
        TokenStatus {
            state: token_state,
            cache_enabled: self.settings.cache,
            token_url: self.credentials.token_url(),
            token_type: state.token.as_ref().and_then(|t| t.token_type().map(str::to_owned)),
            expires_in_secs: state.token.as_ref().map(|t| t.expires_in(now).as_secs()),
            last_error: state.last_error.as_ref().map(|(e, _)| e.to_string()),
            exchanges: self.exchanges.load(Ordering::Relaxed),
        }
    }

    /// Spawn a task that keeps the cached token fresh until `shutdown`.
    pub fn spawn_refresh_loop(self: &Arc<Self>, shutdown: CancellationToken) -> JoinHandle<()> {
        let provider = Arc::clone(self);
        tokio::spawn(async move {
            provider.refresh_loop(shutdown).await;
        })
    }

    async fn refresh_loop(&self, shutdown: CancellationToken) {
        loop {
            let wait = match self.force_refresh().await {
                Ok(token) => token
                    .refresh_at(self.settings.refresh_margin)
                    .saturating_duration_since(Instant::now())
                    .max(MIN_PREFETCH_SLEEP),
                Err(_) => self.settings.prefetch_retry,
            };
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = tokio::time::sleep(wait) => {}
            }
        }
        tracing::debug!("token refresh loop stopped");
    }

    async fn cached(&self) -> Option<AccessToken> {
        if !self.settings.cache {
            return None;
        }
        let state = self.state.read().await;
        state
            .token
            .as_ref()
            .filter(|t| t.is_fresh(Instant::now(), self.settings.refresh_margin))
            .cloned()
    }

    /// The cached token if it has not reached `expires_at`, else `err`.
    async fn unexpired_or(&self, err: TokenError) -> Result<AccessToken, TokenError> {
        let state = self.state.read().await;
        match &state.token {
            Some(token) if Instant::now() < token.expires_at() => {
                tracing::warn!(
                    expires_in_secs = token.expires_in(Instant::now()).as_secs(),
                    err = %err,
                    "refresh failed; serving cached token"
                );
                Ok(token.clone())
            }
            _ => Err(err),
        }
    }

    async fn failed_since(&self, since: Instant) -> Option<TokenError> {
        let state = self.state.read().await;
        match &state.last_error {
            Some((err, at)) if *at >= since => Some(err.clone()),
            _ => None,
        }
    }

    async fn exchange(&self) -> Result<AccessToken, TokenError> {
        let result =
            exchange_with_retries(&self.http, &self.credentials, &self.settings.retry).await;
        self.exchanges.fetch_add(1, Ordering::Relaxed);
        let now = Instant::now();
        let mut state = self.state.write().await;
        match result {
            Ok(resp) => {
                let token = AccessToken::from_response(resp, self.settings.fallback_ttl, now);
                tracing::info!(
                    url = %self.credentials.token_url(),
                    lifetime_secs = token.lifetime().as_secs(),
                    "access token acquired"
                );
                state.token = Some(token.clone());
                state.last_error = None;
                Ok(token)
            }
            Err(e) => {
                tracing::warn!(url = %self.credentials.token_url(), err = %e, "token exchange failed");
                state.last_error = Some((e.clone(), now));
                Err(e)
            }
        }
    }
}

#[cfg(test)]
#[path = "provider_tests.rs"]
mod tests;
