// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::test_support::auth_context_json;

#[yare::parameterized(
    plain = { "tok123" },
    markup = { "</script><script>alert(1)</script>" },
    quotes_and_amp = { r#"a"b&c'd"# },
    unicode = { "tökén\u{2028}" },
    jwt_like = { "eyJhbGciOiJIUzI1NiJ9.eyJzdWIiOiIxIn0.sig-_+/=" },
)]
fn token_survives_context_block(token: &str) {
    let ctx = AuthContext::new(token);
    let html = ctx.wrap("<p>inner</p>");
    let json = auth_context_json(&html).expect("context block");
    let value: serde_json::Value = serde_json::from_str(json).expect("valid json");
    assert_eq!(value["accessToken"], token);
}

#[test]
fn script_json_cannot_close_element() {
    let ctx = AuthContext::new("</script>");
    let json = ctx.to_script_json();
    assert!(!json.contains('<'));
    assert!(!json.contains('>'));
    assert!(json.contains("\\u003c/script\\u003e"));
}

#[test]
fn wrap_places_inner_inside_provider() {
    let html = AuthContext::new("t").wrap("<p>inner</p>");
    let provider = html.find("access-token-provider").expect("provider element");
    let inner = html.find("<p>inner</p>").expect("inner html");
    let block = html.find(CONTEXT_ELEMENT_ID).expect("context block");
    assert!(block < provider && provider < inner);
    assert_eq!(html.matches("<script").count(), 1);
}

#[test]
fn debug_redacts_token() {
    let shown = format!("{:?}", AuthContext::new("very-secret"));
    assert!(!shown.contains("very-secret"));
}
