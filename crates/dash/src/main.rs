// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use clap::Parser;
use tracing::error;

use propeldash::config::DashConfig;

#[tokio::main]
async fn main() {
    let config = DashConfig::parse();
    propeldash::init_tracing(&config);

    if let Err(e) = propeldash::run(config).await {
        error!("fatal: {e:#}");
        std::process::exit(1);
    }
}
