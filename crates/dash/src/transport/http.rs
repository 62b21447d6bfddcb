// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP handlers for dashboard pages and the JSON API.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::error::DashError;
use crate::state::AppState;
use crate::token::TokenStatus;
use crate::view::context::AuthContext;
use crate::view::layout::LayoutSummary;
use crate::view::render::{render_auth_error, render_dashboard, render_error_page};

const DASHBOARD_JS: &str = include_str!("../web/dashboard.js");
const DASHBOARD_CSS: &str = include_str!("../web/dashboard.css");

// -- Response types -----------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub default_layout: String,
    pub layouts: usize,
    pub token: TokenStatus,
}

#[derive(Debug, Serialize)]
pub struct DashboardList {
    pub default: String,
    pub dashboards: Vec<LayoutSummary>,
}

// -- Pages --------------------------------------------------------------------

/// `GET /`: the default dashboard.
pub async fn index(State(s): State<Arc<AppState>>) -> Response {
    let name = s.layouts.default_name().to_owned();
    dashboard_page(&s, &name).await
}

/// `GET /dashboards/{name}`
pub async fn dashboard(State(s): State<Arc<AppState>>, Path(name): Path<String>) -> Response {
    dashboard_page(&s, &name).await
}

async fn dashboard_page(s: &AppState, name: &str) -> Response {
    let Some(layout) = s.layouts.get(name) else {
        let err = DashError::NotFound;
        let page = render_error_page(
            "Dashboard not found",
            err.as_str(),
            &format!("No dashboard named {name:?}."),
        );
        return (err.status_code(), Html(page)).into_response();
    };

    // The page is only composed once a token is in hand.
    let token = match s.tokens.access_token().await {
        Ok(token) => token,
        Err(e) => {
            let err = DashError::from_token_error(&e);
            tracing::warn!(layout = %name, code = %err, err = %e, "dashboard not rendered");
            let page = render_auth_error(err.as_str(), &e.user_message());
            return (err.status_code(), Html(page)).into_response();
        }
    };

    let ctx = AuthContext::from_token(&token);
    tracing::debug!(layout = %name, widgets = layout.widget_count(), "rendering dashboard");
    Html(render_dashboard(&layout, &ctx)).into_response()
}

// -- Assets -------------------------------------------------------------------

/// `GET /assets/dashboard.js`
pub async fn dashboard_js() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/javascript; charset=utf-8")], DASHBOARD_JS)
}

/// `GET /assets/dashboard.css`
pub async fn dashboard_css() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css; charset=utf-8")], DASHBOARD_CSS)
}

// -- API ----------------------------------------------------------------------

/// `GET /api/v1/health`
pub async fn health(State(s): State<Arc<AppState>>) -> impl IntoResponse {
    let status = if s.is_shutting_down() { "stopping" } else { "running" };
    Json(HealthResponse {
        status: status.to_owned(),
        default_layout: s.layouts.default_name().to_owned(),
        layouts: s.layouts.len(),
        token: s.tokens.status().await,
    })
}

/// `GET /api/v1/dashboards`
pub async fn list_dashboards(State(s): State<Arc<AppState>>) -> impl IntoResponse {
    Json(DashboardList {
        default: s.layouts.default_name().to_owned(),
        dashboards: s.layouts.summaries(),
    })
}

/// `GET /api/v1/dashboards/{name}`: layout descriptors, no token.
pub async fn get_dashboard(
    State(s): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> impl IntoResponse {
    let Some(layout) = s.layouts.get(&name) else {
        return DashError::NotFound
            .to_http_response(format!("no dashboard named {name:?}"))
            .into_response();
    };
    match serde_json::to_value(layout.as_ref()) {
        Ok(value) => Json(value).into_response(),
        Err(e) => {
            tracing::error!(layout = %name, err = %e, "failed to serialize layout");
            DashError::Internal.to_http_response(e.to_string()).into_response()
        }
    }
}

/// Fallback for unmatched routes.
pub async fn not_found() -> impl IntoResponse {
    DashError::NotFound.to_http_response("not found")
}
