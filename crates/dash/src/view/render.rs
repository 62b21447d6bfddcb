// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTML rendering for dashboard and error pages.
//!
//! Every widget becomes an element carrying `data-widget` (its kind) and
//! `data-query` (its descriptor as JSON). The embedded bootstrap script mounts
//! the analytics components onto those elements.

use serde::Serialize;

use crate::view::context::AuthContext;
use crate::view::html::escape;
use crate::view::layout::{DashboardLayout, FilterWidget, Row, TabsWidget, Widget};

/// Render a complete dashboard page for `layout`.
pub fn render_dashboard(layout: &DashboardLayout, ctx: &AuthContext) -> String {
    let mut body = String::new();
    body.push_str(&format!("<h1>{}</h1>\n", escape(&layout.title)));
    if let Some(intro) = &layout.intro {
        body.push_str(&format!("<p class=\"intro\">{}</p>\n", escape(intro)));
    }

    if !layout.filters.is_empty() || layout.time_range_picker.is_some() {
        body.push_str("<div class=\"toolbar\">\n<div class=\"panel filters\">\n");
        for filter in &layout.filters {
            body.push_str(&render_filter(filter));
        }
        body.push_str("</div>\n<div class=\"panel picker\">\n");
        if let Some(default) = &layout.time_range_picker {
            body.push_str(&format!(
                "<div class=\"time-range-picker\" data-widget=\"time_range_picker\" data-default=\"{}\"></div>\n",
                escape(default)
            ));
        }
        body.push_str("</div>\n</div>\n");
    }

    for row in &layout.rows {
        body.push_str(&render_row(row));
    }

    let providers = format!("<div class=\"filter-provider\">\n<main class=\"container\">\n{body}</main>\n</div>");
    document(&layout.title, &ctx.wrap(&providers))
}

/// Page shown when no access token could be obtained. Contains no widgets.
pub fn render_auth_error(code: &str, message: &str) -> String {
    render_error_page("Unable to authenticate", code, message)
}

pub fn render_error_page(title: &str, code: &str, message: &str) -> String {
    let body = format!(
        r#"<main class="container error">
<h1>{title}</h1>
<p class="message">{message}</p>
<p class="code"><code>{code}</code></p>
</main>"#,
        title = escape(title),
        message = escape(message),
        code = escape(code),
    );
    document(title, &body)
}

const SITE_TITLE: &str = "Propel Next.js starter app";
const SITE_DESCRIPTION: &str = "Propel is a Next.js starter app that includes a sample dashboard.";

fn document(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<meta name="description" content="{description}">
<title>{title} | {site}</title>
<link rel="stylesheet" href="/assets/dashboard.css">
</head>
<body>
{body}
<script src="/assets/dashboard.js" defer></script>
</body>
</html>
"#,
        title = escape(title),
        site = SITE_TITLE,
        description = escape(SITE_DESCRIPTION),
    )
}

fn render_row(row: &Row) -> String {
    let mut out = format!("<section class=\"row\" style=\"--columns: {}\">\n", row.widgets.len().max(1));
    for widget in &row.widgets {
        out.push_str(&render_widget(widget));
    }
    out.push_str("</section>\n");
    out
}

fn render_widget(widget: &Widget) -> String {
    match widget {
        Widget::Counter(w) => card(
            widget.kind(),
            &w.label,
            &[("prefix", w.prefix.as_str()), ("localize", bool_attr(w.localize))],
            &query_json(&w.query),
        ),
        Widget::TimeSeries(w) => card(
            widget.kind(),
            &w.label,
            &[("variant", w.variant.as_str()), ("color", w.color.as_deref().unwrap_or(""))],
            &query_json(&w.query),
        ),
        Widget::Leaderboard(w) => {
            card(widget.kind(), &w.label, &[("variant", w.variant.as_str())], &query_json(&w.query))
        }
        Widget::PieChart(w) => {
            card(widget.kind(), &w.label, &[("variant", w.variant.as_str())], &query_json(&w.query))
        }
        Widget::Tabs(tabs) => render_tabs(tabs),
    }
}

fn card(kind: &str, label: &str, attrs: &[(&str, &str)], query: &str) -> String {
    let mut extra = String::new();
    for (name, value) in attrs {
        if !value.is_empty() {
            extra.push_str(&format!(" data-{name}=\"{}\"", escape(value)));
        }
    }
    format!(
        r#"<div class="card widget" data-widget="{kind}" data-label="{label}"{extra} data-query="{query}">
<h2 class="widget-label">{label}</h2>
<div class="widget-mount"></div>
</div>
"#,
        label = escape(label),
        query = escape(query),
    )
}

fn render_tabs(tabs: &TabsWidget) -> String {
    let mut list = String::new();
    let mut panels = String::new();
    for (i, tab) in tabs.tabs.iter().enumerate() {
        let selected = i == 0;
        list.push_str(&format!(
            "<button role=\"tab\" data-tab=\"{i}\" aria-selected=\"{selected}\">{}</button>\n",
            escape(&tab.label)
        ));
        let hidden = if selected { "" } else { " hidden" };
        panels.push_str(&format!("<div class=\"tab-panel\" role=\"tabpanel\" data-tab=\"{i}\"{hidden}>\n"));
        for row in &tab.rows {
            panels.push_str(&render_row(row));
        }
        panels.push_str("</div>\n");
    }
    format!(
        "<div class=\"card tabs\" data-widget=\"tabs\">\n<div class=\"tab-list\" role=\"tablist\">\n{list}</div>\n{panels}</div>\n"
    )
}

fn render_filter(filter: &FilterWidget) -> String {
    format!(
        "<div class=\"simple-filter\" data-widget=\"simple_filter\" data-placeholder=\"{}\" data-query=\"{}\"></div>\n",
        escape(&filter.placeholder),
        escape(&query_json(&filter.query)),
    )
}

fn bool_attr(b: bool) -> &'static str {
    if b {
        "true"
    } else {
        "false"
    }
}

fn query_json<T: Serialize>(query: &T) -> String {
    serde_json::to_string(query).unwrap_or_else(|_| "null".to_owned())
}

#[cfg(test)]
#[path = "render_tests.rs"]
mod tests;
