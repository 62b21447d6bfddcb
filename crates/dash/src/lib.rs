// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Propeldash: analytics dashboard server authenticated with OAuth2 client
//! credentials.

pub mod config;
pub mod error;
pub mod state;
pub mod test_support;
pub mod token;
pub mod transport;
pub mod view;

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use crate::config::DashConfig;
use crate::state::AppState;
use crate::transport::build_router;

/// Install the global tracing subscriber. `RUST_LOG` overrides `--log-level`.
/// Later calls are no-ops.
pub fn init_tracing(config: &DashConfig) {
    use tracing_subscriber::fmt;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let result = match config.log_format.as_str() {
        "json" => fmt::fmt().with_env_filter(filter).json().try_init(),
        _ => fmt::fmt().with_env_filter(filter).try_init(),
    };
    drop(result);
}

/// Run the dashboard server until shutdown.
pub async fn run(config: DashConfig) -> anyhow::Result<()> {
    config.validate()?;

    let state = Arc::new(AppState::from_config(config, CancellationToken::new())?);
    let addr = format!("{}:{}", state.config.host, state.config.port);

    let missing = state.tokens.credentials().missing_fields();
    if !missing.is_empty() {
        tracing::warn!(
            missing = %missing.join(", "),
            "client credentials incomplete; dashboards will fail to authenticate"
        );
    }

    let _refresher = state.spawn_prefetch();

    {
        let shutdown = state.shutdown.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    tracing::info!("shutdown requested");
                    shutdown.cancel();
                }
                Err(e) => tracing::warn!(err = %e, "failed to listen for ctrl-c"),
            }
        });
    }

    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| anyhow::anyhow!("failed to bind {addr}: {e}"))?;
    tracing::info!(
        layouts = state.layouts.len(),
        default = %state.layouts.default_name(),
        token_url = %state.tokens.credentials().token_url(),
        "propeldash listening on {addr}"
    );

    let shutdown = state.shutdown.clone();
    let router = build_router(state);
    axum::serve(listener, router).with_graceful_shutdown(shutdown.cancelled_owned()).await?;

    Ok(())
}
