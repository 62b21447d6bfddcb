// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;

use anyhow::Context;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::DashConfig;
use crate::token::TokenProvider;
use crate::view::layout::{load_layout_file, LayoutRegistry};

/// Shared dashboard server state.
pub struct AppState {
    pub config: DashConfig,
    pub tokens: Arc<TokenProvider>,
    pub layouts: LayoutRegistry,
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(
        config: DashConfig,
        tokens: Arc<TokenProvider>,
        layouts: LayoutRegistry,
        shutdown: CancellationToken,
    ) -> Self {
        Self { config, tokens, layouts, shutdown }
    }

    /// Build the token provider and layout registry described by `config`.
    pub fn from_config(config: DashConfig, shutdown: CancellationToken) -> anyhow::Result<Self> {
        let extra = match config.layout_file {
            Some(ref path) => load_layout_file(path)?,
            None => Vec::new(),
        };
        let layouts =
            LayoutRegistry::with_builtins(&config.dataset(), extra, &config.default_layout)
                .context("building layout registry")?;
        let tokens = TokenProvider::new(config.credentials(), config.token_settings())?;
        Ok(Self::new(config, tokens, layouts, shutdown))
    }

    /// Start background token prefetch when caching and prefetch are both on.
    /// The loop stops when `shutdown` is cancelled.
    pub fn spawn_prefetch(&self) -> Option<JoinHandle<()>> {
        if !(self.config.token_cache && self.config.token_prefetch) {
            return None;
        }
        Some(self.tokens.spawn_refresh_loop(self.shutdown.clone()))
    }

    pub fn is_shutting_down(&self) -> bool {
        self.shutdown.is_cancelled()
    }
}
