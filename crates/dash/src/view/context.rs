// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Access-token context shared by every widget on a page.
//!
//! The token is written once, in a JSON block at the top of the page, and
//! the client bootstrap hands it to the widgets. Widget markup never
//! contains the token.

use std::fmt;

use crate::token::AccessToken;
use crate::view::html::script_json;

/// DOM id of the JSON block carrying the context.
pub const CONTEXT_ELEMENT_ID: &str = "propel-auth-context";

#[derive(Clone, PartialEq, Eq)]
pub struct AuthContext {
    access_token: String,
}

impl AuthContext {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self { access_token: access_token.into() }
    }

    pub fn from_token(token: &AccessToken) -> Self {
        Self::new(token.as_str())
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// `{"accessToken": ...}`, safe to place inside a `<script>` element.
    pub fn to_script_json(&self) -> String {
        script_json(&serde_json::json!({ "accessToken": self.access_token }))
    }

    /// Wrap `inner` in the provider element, preceded by the context block.
    pub fn wrap(&self, inner: &str) -> String {
        format!(
            r#"<script type="application/json" id="{CONTEXT_ELEMENT_ID}">{json}</script>
<div class="access-token-provider" data-context="{CONTEXT_ELEMENT_ID}">
{inner}
</div>"#,
            json = self.to_script_json(),
        )
    }
}

impl fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthContext").field("access_token", &"<redacted>").finish()
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
