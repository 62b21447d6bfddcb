// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP transport for the dashboard server.

pub mod http;

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the axum `Router` with all dashboard routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/api/v1/health", get(http::health))
        .route("/api/v1/dashboards", get(http::list_dashboards))
        .route("/api/v1/dashboards/{name}", get(http::get_dashboard))
        .layer(CorsLayer::permissive());

    Router::new()
        // Pages
        .route("/", get(http::index))
        .route("/dashboards/{name}", get(http::dashboard))
        // Embedded assets
        .route("/assets/dashboard.js", get(http::dashboard_js))
        .route("/assets/dashboard.css", get(http::dashboard_css))
        .merge(api)
        .fallback(http::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
