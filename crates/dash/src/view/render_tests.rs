// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::test_support::{auth_context_json, widget_count};
use crate::view::builtin::{self, Dataset};

fn render(layout: &DashboardLayout) -> String {
    render_dashboard(layout, &AuthContext::new("tok123"))
}

/// Unescape the attribute-encoded JSON values of every `data-query`.
fn queries(html: &str) -> Vec<serde_json::Value> {
    html.split("data-query=\"")
        .skip(1)
        .filter_map(|rest| rest.split('"').next())
        .map(|raw| {
            raw.replace("&quot;", "\"")
                .replace("&#39;", "'")
                .replace("&lt;", "<")
                .replace("&gt;", ">")
                .replace("&amp;", "&")
        })
        .map(|json| serde_json::from_str(&json).expect("query json"))
        .collect()
}

#[test]
fn dashboard_page_structure() {
    let layout = builtin::last_30_days(&Dataset::default());
    let html = render(&layout);

    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<title>Dashboard | Propel Next.js starter app</title>"));
    assert!(html.contains(
        "<meta name=\"description\" content=\"Propel is a Next.js starter app that includes a sample dashboard.\">"
    ));
    assert!(html.contains("<h1>Dashboard</h1>"));
    assert!(html.contains("Here you&#39;ll find an overview"));
    assert!(html.contains("href=\"/assets/dashboard.css\""));
    assert!(html.contains("src=\"/assets/dashboard.js\""));
    assert!(html.contains("data-default=\"last-30-days\""));
    assert!(html.contains("style=\"--columns: 3\""));
    assert!(html.contains("data-prefix=\"$\""));
    assert!(html.contains("data-color=\"indigo\""));
    assert!(html.contains("data-placeholder=\"Restaurant...\""));

    // 2 filters + picker + 3 counters + 2 series.
    assert_eq!(widget_count(&html), 8);
}

#[test]
fn every_widget_is_inside_one_context() {
    let html = render(&builtin::breakdown(&Dataset::default()));
    assert_eq!(html.matches("access-token-provider").count(), 1);
    let provider = html.find("access-token-provider").expect("provider");
    let first_widget = html.find("data-widget=").expect("widget");
    assert!(provider < first_widget);
    assert_eq!(auth_context_json(&html), Some(r#"{"accessToken":"tok123"}"#));
}

#[test]
fn token_only_appears_in_context_block() {
    let html = render(&builtin::today(&Dataset::default()));
    assert_eq!(html.matches("tok123").count(), 1);
}

#[test]
fn queries_match_layout_descriptors() -> anyhow::Result<()> {
    let layout = builtin::today(&Dataset::default());
    let html = render(&layout);
    let found = queries(&html);

    let mut expected = Vec::new();
    for filter in &layout.filters {
        expected.push(serde_json::to_value(&filter.query)?);
    }
    for widget in layout.rows.iter().flat_map(|r| &r.widgets) {
        match widget {
            Widget::Counter(w) => expected.push(serde_json::to_value(&w.query)?),
            Widget::TimeSeries(w) => expected.push(serde_json::to_value(&w.query)?),
            other => anyhow::bail!("unexpected widget {}", other.kind()),
        }
    }
    assert_eq!(found, expected);
    Ok(())
}

#[test]
fn tabs_render_all_panels_first_selected() {
    let html = render(&builtin::breakdown(&Dataset::default()));
    assert_eq!(html.matches("role=\"tab\"").count(), 2);
    assert_eq!(html.matches("role=\"tabpanel\"").count(), 2);
    assert!(html.contains("aria-selected=\"true\">Orders</button>"));
    assert!(html.contains("aria-selected=\"false\">Revenue</button>"));
    assert_eq!(html.matches(" hidden>").count(), 1);
    assert!(html.contains("data-widget=\"leaderboard\""));
    assert!(html.contains("data-widget=\"pie_chart\""));
    assert!(html.contains("data-variant=\"doughnut\""));
}

#[test]
fn renders_are_identical() {
    let layout = builtin::breakdown(&Dataset::default());
    assert_eq!(render(&layout), render(&layout));
}

#[test]
fn labels_are_escaped() -> anyhow::Result<()> {
    let mut layout = builtin::today(&Dataset::default());
    layout.title = "<b>Ops & Sales</b>".to_owned();
    let html = render(&layout);
    assert!(html.contains("&lt;b&gt;Ops &amp; Sales&lt;/b&gt;"));
    assert!(!html.contains("<b>"));
    Ok(())
}

#[test]
fn layout_without_toolbar() {
    let mut layout = builtin::today(&Dataset::default());
    layout.filters.clear();
    layout.time_range_picker = None;
    layout.intro = None;
    let html = render(&layout);
    assert!(!html.contains("class=\"toolbar\""));
    assert!(!html.contains("class=\"intro\""));
}

#[test]
fn auth_error_page_has_no_widgets_or_context() {
    let html = render_auth_error("AUTH_FAILED", "The token server rejected <it>.");
    assert!(html.contains("<title>Unable to authenticate | Propel Next.js starter app</title>"));
    assert!(html.contains("AUTH_FAILED"));
    assert!(html.contains("rejected &lt;it&gt;."));
    assert_eq!(widget_count(&html), 0);
    assert_eq!(auth_context_json(&html), None);
}
