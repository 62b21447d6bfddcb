// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dashboard layouts and the registry that serves them.
//!
//! A layout is the whole parameterization of a dashboard page: rows of
//! widgets, each bound to one query descriptor. Layouts are immutable once
//! registered and shared behind `Arc`.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::view::builtin::{self, Dataset};
use crate::view::query::{
    CounterQuery, FilterQuery, LeaderboardQuery, PieChartQuery, TimeSeriesQuery,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardLayout {
    pub name: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intro: Option<String>,
    #[serde(default)]
    pub filters: Vec<FilterWidget>,
    /// Default value of the time-range picker; no picker when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_range_picker: Option<String>,
    #[serde(default)]
    pub rows: Vec<Row>,
}

impl DashboardLayout {
    /// Number of data widgets, including filters and widgets nested in tabs.
    pub fn widget_count(&self) -> usize {
        self.filters.len() + self.rows.iter().map(Row::widget_count).sum::<usize>()
    }
}

/// A grid row; its widgets are laid out as equal-width columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    pub widgets: Vec<Widget>,
}

impl Row {
    pub fn new(widgets: Vec<Widget>) -> Self {
        Self { widgets }
    }

    fn widget_count(&self) -> usize {
        self.widgets
            .iter()
            .map(|w| match w {
                Widget::Tabs(tabs) => tabs
                    .tabs
                    .iter()
                    .flat_map(|t| &t.rows)
                    .map(Row::widget_count)
                    .sum::<usize>(),
                _ => 1,
            })
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Widget {
    Counter(CounterWidget),
    TimeSeries(TimeSeriesWidget),
    Leaderboard(LeaderboardWidget),
    PieChart(PieChartWidget),
    Tabs(TabsWidget),
}

impl Widget {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Counter(_) => "counter",
            Self::TimeSeries(_) => "time_series",
            Self::Leaderboard(_) => "leaderboard",
            Self::PieChart(_) => "pie_chart",
            Self::Tabs(_) => "tabs",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterWidget {
    pub label: String,
    /// Prepended to the value, e.g. `$`.
    #[serde(default)]
    pub prefix: String,
    #[serde(default = "default_true")]
    pub localize: bool,
    pub query: CounterQuery,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartVariant {
    #[default]
    Bar,
    Line,
}

impl ChartVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bar => "bar",
            Self::Line => "line",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSeriesWidget {
    pub label: String,
    #[serde(default)]
    pub variant: ChartVariant,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub query: TimeSeriesQuery,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaderboardVariant {
    #[default]
    Table,
    Bar,
}

impl LeaderboardVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::Bar => "bar",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardWidget {
    pub label: String,
    #[serde(default)]
    pub variant: LeaderboardVariant,
    pub query: LeaderboardQuery,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PieChartVariant {
    #[default]
    Pie,
    Doughnut,
}

impl PieChartVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pie => "pie",
            Self::Doughnut => "doughnut",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieChartWidget {
    pub label: String,
    #[serde(default)]
    pub variant: PieChartVariant,
    pub query: PieChartQuery,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabsWidget {
    pub tabs: Vec<Tab>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tab {
    pub label: String,
    pub rows: Vec<Row>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterWidget {
    pub placeholder: String,
    pub query: FilterQuery,
}

fn default_true() -> bool {
    true
}

/// Name and title of a registered layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayoutSummary {
    pub name: String,
    pub title: String,
}

/// Immutable set of layouts keyed by name, with a default.
#[derive(Debug, Clone)]
pub struct LayoutRegistry {
    layouts: BTreeMap<String, Arc<DashboardLayout>>,
    default: String,
}

impl LayoutRegistry {
    /// Build a registry. Later layouts replace earlier ones of the same name.
    pub fn new(layouts: Vec<DashboardLayout>, default: &str) -> anyhow::Result<Self> {
        let mut map = BTreeMap::new();
        for layout in layouts {
            if layout.name.is_empty() {
                anyhow::bail!("layout with title {:?} has an empty name", layout.title);
            }
            map.insert(layout.name.clone(), Arc::new(layout));
        }
        if !map.contains_key(default) {
            let known: Vec<&str> = map.keys().map(String::as_str).collect();
            anyhow::bail!("default layout {default:?} not found (known: {})", known.join(", "));
        }
        Ok(Self { layouts: map, default: default.to_owned() })
    }

    /// Built-in layouts for `dataset`, overridden by `extra`.
    pub fn with_builtins(
        dataset: &Dataset,
        extra: Vec<DashboardLayout>,
        default: &str,
    ) -> anyhow::Result<Self> {
        let mut layouts = builtin::all(dataset);
        layouts.extend(extra);
        Self::new(layouts, default)
    }

    pub fn get(&self, name: &str) -> Option<Arc<DashboardLayout>> {
        self.layouts.get(name).cloned()
    }

    pub fn default_name(&self) -> &str {
        &self.default
    }

    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }

    pub fn summaries(&self) -> Vec<LayoutSummary> {
        self.layouts
            .values()
            .map(|l| LayoutSummary { name: l.name.clone(), title: l.title.clone() })
            .collect()
    }
}

/// Load layouts from a JSON file holding either one layout or an array.
pub fn load_layout_file(path: &Path) -> anyhow::Result<Vec<DashboardLayout>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading layout file {}", path.display()))?;
    parse_layouts(&contents).with_context(|| format!("parsing layout file {}", path.display()))
}

pub fn parse_layouts(contents: &str) -> anyhow::Result<Vec<DashboardLayout>> {
    if contents.trim_start().starts_with('[') {
        Ok(serde_json::from_str(contents)?)
    } else {
        Ok(vec![serde_json::from_str(contents)?])
    }
}

#[cfg(test)]
#[path = "layout_tests.rs"]
mod tests;
