// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::token::retry::RetryPolicy;
use crate::token::{AuthMethod, Credentials, TokenSettings};
use crate::view::builtin::Dataset;

/// Upper bound on `--token-max-retries`; each retry blocks a page render.
const MAX_TOKEN_RETRIES: u32 = 10;

/// Configuration for the propeldash server.
#[derive(Debug, Clone, Parser)]
#[command(name = "propeldash", version, about = "Analytics dashboard server with OAuth2 client-credentials auth")]
pub struct DashConfig {
    /// Host to bind on.
    #[arg(long, default_value = "127.0.0.1", env = "PROPELDASH_HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(long, default_value_t = 3000, env = "PROPELDASH_PORT")]
    pub port: u16,

    /// OAuth2 client id. Empty means unset; page renders will then fail to authenticate.
    #[arg(long, env = "CLIENT_ID", default_value = "", hide_env_values = true)]
    pub client_id: String,

    /// OAuth2 client secret.
    #[arg(long, env = "CLIENT_SECRET", default_value = "", hide_env_values = true)]
    pub client_secret: String,

    /// Token server base URL, e.g. `https://auth.example.com`.
    #[arg(long, env = "TOKEN_HOST", default_value = "")]
    pub token_host: String,

    /// Token endpoint path appended to the host, e.g. `/oauth/token`.
    #[arg(long, env = "TOKEN_PATH", default_value = "")]
    pub token_path: String,

    /// Optional scope requested with the client-credentials grant.
    #[arg(long, env = "TOKEN_SCOPE")]
    pub token_scope: Option<String>,

    /// How the client authenticates to the token endpoint.
    #[arg(long, value_enum, default_value_t = AuthMethod::Header, env = "TOKEN_AUTH_METHOD")]
    pub token_auth_method: AuthMethod,

    /// Reuse access tokens across page renders until shortly before expiry.
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set, env = "PROPELDASH_TOKEN_CACHE")]
    pub token_cache: bool,

    /// Refresh the cached token in the background ahead of its expiry.
    #[arg(long, default_value_t = false, action = clap::ArgAction::Set, env = "PROPELDASH_TOKEN_PREFETCH")]
    pub token_prefetch: bool,

    /// Seconds before expiry at which a cached token is considered stale.
    #[arg(long, default_value_t = 60, env = "PROPELDASH_TOKEN_REFRESH_MARGIN_SECS")]
    pub token_refresh_margin_secs: u64,

    /// Token lifetime assumed when the token response carries no `expires_in`.
    #[arg(long, default_value_t = 300, env = "PROPELDASH_TOKEN_FALLBACK_TTL_SECS")]
    pub token_fallback_ttl_secs: u64,

    /// Retries for transient token exchange failures.
    #[arg(long, default_value_t = 3, env = "PROPELDASH_TOKEN_MAX_RETRIES")]
    pub token_max_retries: u32,

    /// Initial retry backoff in milliseconds (doubles per attempt).
    #[arg(long, default_value_t = 500, env = "PROPELDASH_TOKEN_RETRY_BACKOFF_MS")]
    pub token_retry_backoff_ms: u64,

    /// Timeout for a single token exchange request in milliseconds.
    #[arg(long, default_value_t = 10000, env = "PROPELDASH_TOKEN_TIMEOUT_MS")]
    pub token_timeout_ms: u64,

    /// Delay before the background refresher retries after a failure, in seconds.
    #[arg(long, default_value_t = 30, env = "PROPELDASH_TOKEN_PREFETCH_RETRY_SECS")]
    pub token_prefetch_retry_secs: u64,

    /// Data pool queried by the built-in dashboards.
    #[arg(long, default_value = "flattened_orders", env = "PROPELDASH_DATA_POOL")]
    pub data_pool: String,

    /// Numeric column summed for revenue metrics.
    #[arg(long, default_value = "total_price", env = "PROPELDASH_MEASURE")]
    pub measure: String,

    /// Breakdown columns used for filters, leaderboards and pie charts.
    #[arg(
        long = "dimension",
        value_delimiter = ',',
        default_values = ["restaurant_name", "taco_name"],
        env = "PROPELDASH_DIMENSIONS"
    )]
    pub dimensions: Vec<String>,

    /// JSON file with additional dashboard layouts (overrides built-ins by name).
    #[arg(long, env = "PROPELDASH_LAYOUT_FILE")]
    pub layout_file: Option<PathBuf>,

    /// Layout served at `/`.
    #[arg(long, default_value = "last-30-days", env = "PROPELDASH_DEFAULT_LAYOUT")]
    pub default_layout: String,

    /// Log format (json or text).
    #[arg(long, env = "PROPELDASH_LOG_FORMAT", default_value = "text")]
    pub log_format: String,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, env = "PROPELDASH_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl DashConfig {
    /// Validate flag combinations. Credentials are deliberately not checked here.
    pub fn validate(&self) -> anyhow::Result<()> {
        match self.log_format.as_str() {
            "json" | "text" => {}
            other => anyhow::bail!("invalid --log-format {other:?} (expected json or text)"),
        }
        if self.token_max_retries > MAX_TOKEN_RETRIES {
            anyhow::bail!("--token-max-retries must be at most {MAX_TOKEN_RETRIES}");
        }
        if self.token_timeout_ms == 0 {
            anyhow::bail!("--token-timeout-ms must be greater than zero");
        }
        if self.default_layout.trim().is_empty() {
            anyhow::bail!("--default-layout must not be empty");
        }
        if self.data_pool.trim().is_empty() {
            anyhow::bail!("--data-pool must not be empty");
        }
        Ok(())
    }

    pub fn credentials(&self) -> Credentials {
        Credentials {
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
            token_host: self.token_host.clone(),
            token_path: self.token_path.clone(),
            scope: self.token_scope.clone().filter(|s| !s.is_empty()),
            auth_method: self.token_auth_method,
        }
    }

    pub fn token_settings(&self) -> TokenSettings {
        TokenSettings {
            cache: self.token_cache,
            refresh_margin: Duration::from_secs(self.token_refresh_margin_secs),
            fallback_ttl: Duration::from_secs(self.token_fallback_ttl_secs),
            request_timeout: Duration::from_millis(self.token_timeout_ms),
            prefetch_retry: Duration::from_secs(self.token_prefetch_retry_secs.max(1)),
            retry: self.retry_policy(),
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.token_max_retries,
            initial_backoff: Duration::from_millis(self.token_retry_backoff_ms),
            ..RetryPolicy::default()
        }
    }

    pub fn dataset(&self) -> Dataset {
        Dataset {
            data_pool: self.data_pool.clone(),
            measure: self.measure.clone(),
            dimensions: self.dimensions.iter().filter(|d| !d.is_empty()).cloned().collect(),
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
