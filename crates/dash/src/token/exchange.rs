// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Single client-credentials grant request.

use reqwest::header::ACCEPT;

use crate::token::{AuthMethod, Credentials, TokenError, TokenResponse};

/// Longest error body kept from a rejected response.
const MAX_ERROR_BODY: usize = 512;

/// Perform one `client_credentials` grant against `credentials.token_url()`.
///
/// Empty credentials fail before any request is sent.
pub async fn exchange(
    client: &reqwest::Client,
    credentials: &Credentials,
) -> Result<TokenResponse, TokenError> {
    let fields = credentials.missing_fields();
    if !fields.is_empty() {
        return Err(TokenError::MissingCredentials { fields });
    }

    let mut form: Vec<(&str, &str)> = vec![("grant_type", "client_credentials")];
    if let Some(scope) = credentials.scope.as_deref() {
        form.push(("scope", scope));
    }

    let mut req = client.post(credentials.token_url()).header(ACCEPT, "application/json");
    match credentials.auth_method {
        AuthMethod::Header => {
            req = req.basic_auth(
                urlencoding(&credentials.client_id),
                Some(urlencoding(&credentials.client_secret)),
            );
        }
        AuthMethod::Body => {
            form.push(("client_id", credentials.client_id.as_str()));
            form.push(("client_secret", credentials.client_secret.as_str()));
        }
    }

    let resp = req.form(&form).send().await.map_err(request_error)?;

    let status = resp.status();
    if !status.is_success() {
        let text = resp.text().await.unwrap_or_default();
        return Err(TokenError::Rejected { status: status.as_u16(), body: truncate(&text) });
    }

    let bytes = resp.bytes().await.map_err(request_error)?;
    parse_token_response(&bytes)
}

/// Parse a token endpoint body, rejecting an empty `access_token`.
pub fn parse_token_response(bytes: &[u8]) -> Result<TokenResponse, TokenError> {
    let token: TokenResponse =
        serde_json::from_slice(bytes).map_err(|e| TokenError::Malformed(e.to_string()))?;
    if token.access_token.is_empty() {
        return Err(TokenError::Malformed("empty access_token".to_owned()));
    }
    Ok(token)
}

fn request_error(e: reqwest::Error) -> TokenError {
    if e.is_builder() {
        TokenError::InvalidUrl(e.to_string())
    } else {
        TokenError::Network(e.to_string())
    }
}

fn truncate(text: &str) -> String {
    let text = text.trim();
    if text.len() <= MAX_ERROR_BODY {
        return text.to_owned();
    }
    let mut end = MAX_ERROR_BODY;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &text[..end])
}

/// Percent-encode a credential for the Basic header (RFC 6749 §2.3.1).
pub fn urlencoding(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(b as char)
            }
            _ => out.push_str(&format!("%{b:02X}")),
        }
    }
    out
}

#[cfg(test)]
#[path = "exchange_tests.rs"]
mod tests;
