// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test infrastructure: an in-process OAuth2 token endpoint and
//! assertion helpers.

use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::token::{AuthMethod, Credentials, TokenSettings};

/// Path served by [`MockTokenEndpoint`].
pub const MOCK_TOKEN_PATH: &str = "/oauth/token";

/// One scripted answer of the mock token endpoint.
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: u16,
    pub body: String,
}

impl MockResponse {
    /// 200 with `{"access_token": ..., "token_type": "Bearer"}` and optional expiry.
    pub fn token(access_token: &str, expires_in: Option<u64>) -> Self {
        let mut body = serde_json::json!({
            "access_token": access_token,
            "token_type": "Bearer",
        });
        if let Some(secs) = expires_in {
            body["expires_in"] = serde_json::json!(secs);
        }
        Self { status: 200, body: body.to_string() }
    }

    pub fn status(status: u16, body: &str) -> Self {
        Self { status, body: body.to_owned() }
    }
}

/// A request observed by the mock endpoint.
#[derive(Debug, Clone, Default)]
pub struct RecordedRequest {
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub form: HashMap<String, String>,
}

struct MockInner {
    scripted: Mutex<VecDeque<MockResponse>>,
    fallback: MockResponse,
    delay: Duration,
    hits: AtomicUsize,
    requests: Mutex<Vec<RecordedRequest>>,
}

/// OAuth2 token endpoint bound to `127.0.0.1:0`, stopped on drop.
///
/// Answers with the scripted responses in order, then with the fallback.
pub struct MockTokenEndpoint {
    addr: SocketAddr,
    inner: Arc<MockInner>,
    shutdown: CancellationToken,
}

impl MockTokenEndpoint {
    /// Start an endpoint that always answers with `fallback`.
    pub async fn start(fallback: MockResponse) -> anyhow::Result<Self> {
        Self::start_with(Vec::new(), fallback, Duration::ZERO).await
    }

    /// Start an endpoint with scripted responses and a per-request delay.
    pub async fn start_with(
        scripted: Vec<MockResponse>,
        fallback: MockResponse,
        delay: Duration,
    ) -> anyhow::Result<Self> {
        let inner = Arc::new(MockInner {
            scripted: Mutex::new(scripted.into()),
            fallback,
            delay,
            hits: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        });
        let router = Router::new()
            .route(MOCK_TOKEN_PATH, post(mock_token))
            .with_state(Arc::clone(&inner));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let stop = shutdown.clone();
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).with_graceful_shutdown(stop.cancelled_owned()).await;
        });

        Ok(Self { addr, inner, shutdown })
    }

    /// Base URL, usable as `TOKEN_HOST`.
    pub fn host(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Credentials `abc` / `xyz` pointed at this endpoint.
    pub fn credentials(&self) -> Credentials {
        Credentials {
            client_id: "abc".to_owned(),
            client_secret: "xyz".to_owned(),
            token_host: self.host(),
            token_path: MOCK_TOKEN_PATH.to_owned(),
            scope: None,
            auth_method: AuthMethod::Header,
        }
    }

    /// Number of requests received so far.
    pub fn hits(&self) -> usize {
        self.inner.hits.load(Ordering::SeqCst)
    }

    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.inner.requests.lock().await.clone()
    }
}

impl Drop for MockTokenEndpoint {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn mock_token(
    State(inner): State<Arc<MockInner>>,
    headers: HeaderMap,
    body: String,
) -> Response {
    inner.hits.fetch_add(1, Ordering::SeqCst);
    let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok()).map(str::to_owned);
    inner.requests.lock().await.push(RecordedRequest {
        authorization: header("authorization"),
        content_type: header("content-type"),
        form: parse_form(&body),
    });

    if !inner.delay.is_zero() {
        tokio::time::sleep(inner.delay).await;
    }

    let next = inner.scripted.lock().await.pop_front();
    let resp = next.unwrap_or_else(|| inner.fallback.clone());
    let status = StatusCode::from_u16(resp.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, [("content-type", "application/json")], resp.body).into_response()
}

/// Decode an `application/x-www-form-urlencoded` body.
pub fn parse_form(body: &str) -> HashMap<String, String> {
    body.split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
            (percent_decode(k), percent_decode(v))
        })
        .collect()
}

fn percent_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => out.push(b' '),
            b'%' if i + 2 < bytes.len() => {
                let hex = std::str::from_utf8(&bytes[i + 1..i + 3]).ok();
                match hex.and_then(|h| u8::from_str_radix(h, 16).ok()) {
                    Some(b) => {
                        out.push(b);
                        i += 2;
                    }
                    None => out.push(b'%'),
                }
            }
            b => out.push(b),
        }
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Token settings for tests: caching on, fast retries.
pub fn fast_settings() -> TokenSettings {
    TokenSettings {
        retry: crate::token::retry::RetryPolicy {
            max_retries: 2,
            initial_backoff: Duration::from_millis(10),
            max_backoff: Duration::from_millis(50),
        },
        request_timeout: Duration::from_secs(5),
        ..TokenSettings::default()
    }
}

/// Count `data-widget="` occurrences in rendered HTML.
pub fn widget_count(html: &str) -> usize {
    html.matches("data-widget=\"").count()
}

/// Extract the JSON text of the page's auth context block.
pub fn auth_context_json(html: &str) -> Option<&str> {
    let marker = format!("id=\"{}\">", crate::view::context::CONTEXT_ELEMENT_ID);
    let start = html.find(&marker)? + marker.len();
    let len = html[start..].find("</script>")?;
    Some(&html[start..start + len])
}

/// Assert that a `Result` is `Err` and its message contains a substring.
#[macro_export]
macro_rules! assert_err_contains {
    ($expr:expr, $substr:expr) => {{
        let result = $expr;
        let err = result.expect_err(concat!("expected Err for: ", stringify!($expr)));
        let msg = err.to_string();
        assert!(msg.contains($substr), "expected error containing {:?}, got: {msg:?}", $substr);
    }};
}
