// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Built-in dashboard layouts for the orders dataset.

use crate::view::layout::{
    ChartVariant, CounterWidget, DashboardLayout, FilterWidget, LeaderboardVariant,
    LeaderboardWidget, PieChartVariant, PieChartWidget, Row, Tab, TabsWidget, TimeSeriesWidget,
    Widget,
};
use crate::view::query::{
    Column, CounterQuery, DataPool, FilterQuery, LeaderboardQuery, Metric, PieChartQuery, Sort,
    TimeRange, TimeSeriesQuery, DEFAULT_FILTER_MAX_VALUES,
};

pub const TODAY: &str = "today";
pub const LAST_30_DAYS: &str = "last-30-days";
pub const BREAKDOWN: &str = "breakdown";

const TITLE: &str = "Dashboard";
const INTRO: &str = "Welcome to your Propel dashboard. Here you'll find an overview of your data.";

/// The data pool and columns the built-in layouts query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    pub data_pool: String,
    /// Numeric column summed for revenue.
    pub measure: String,
    /// Breakdown columns, most significant first.
    pub dimensions: Vec<String>,
}

impl Default for Dataset {
    fn default() -> Self {
        Self {
            data_pool: "flattened_orders".to_owned(),
            measure: "total_price".to_owned(),
            dimensions: vec!["restaurant_name".to_owned(), "taco_name".to_owned()],
        }
    }
}

impl Dataset {
    fn orders(&self) -> Metric {
        Metric::count(&self.data_pool)
    }

    fn revenue(&self) -> Metric {
        Metric::sum(&self.data_pool, &self.measure)
    }

    fn average_order(&self) -> Metric {
        Metric::custom(&self.data_pool, format!("SUM({}) / COUNT()", self.measure))
    }

    fn filters(&self) -> Vec<FilterWidget> {
        self.dimensions
            .iter()
            .map(|column| FilterWidget {
                placeholder: placeholder_for(column),
                query: FilterQuery {
                    column_name: column.clone(),
                    data_pool: DataPool::new(&self.data_pool),
                    max_values: DEFAULT_FILTER_MAX_VALUES,
                },
            })
            .collect()
    }
}

/// `restaurant_name` -> `Restaurant...`
pub fn placeholder_for(column: &str) -> String {
    let word = column.split(['_', ' ']).find(|w| !w.is_empty()).unwrap_or(column);
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => format!("{}{}...", first.to_uppercase(), chars.as_str()),
        None => "...".to_owned(),
    }
}

/// Refresh cadence, range and bucket size shared by one layout's widgets.
struct Window {
    time_range: TimeRange,
    refetch_interval: u64,
    granularity: &'static str,
}

impl Window {
    fn counter(&self, label: &str, prefix: &str, metric: Metric) -> Widget {
        Widget::Counter(CounterWidget {
            label: label.to_owned(),
            prefix: prefix.to_owned(),
            localize: true,
            query: CounterQuery {
                metric,
                time_range: self.time_range.clone(),
                refetch_interval: self.refetch_interval,
            },
        })
    }

    fn series(&self, label: &str, color: Option<&str>, metric: Metric) -> Widget {
        Widget::TimeSeries(TimeSeriesWidget {
            label: label.to_owned(),
            variant: ChartVariant::Bar,
            color: color.map(str::to_owned),
            query: TimeSeriesQuery {
                metric,
                time_range: self.time_range.clone(),
                refetch_interval: self.refetch_interval,
                granularity: self.granularity.to_owned(),
            },
        })
    }
}

fn overview(
    name: &str,
    picker: &str,
    window: &Window,
    dataset: &Dataset,
    average: &str,
) -> DashboardLayout {
    DashboardLayout {
        name: name.to_owned(),
        title: TITLE.to_owned(),
        intro: Some(INTRO.to_owned()),
        filters: dataset.filters(),
        time_range_picker: Some(picker.to_owned()),
        rows: vec![
            Row::new(vec![
                window.counter("Orders", "", dataset.orders()),
                window.counter("Revenue", "$", dataset.revenue()),
                window.counter(average, "$", dataset.average_order()),
            ]),
            Row::new(vec![window.series("Daily orders", Some("indigo"), dataset.orders())]),
            Row::new(vec![window.series("Revenue", None, dataset.revenue())]),
        ],
    }
}

/// Today's activity at fifteen-minute resolution, refreshed every second.
pub fn today(dataset: &Dataset) -> DashboardLayout {
    let window = Window {
        time_range: TimeRange::today(),
        refetch_interval: 1000,
        granularity: "FIFTEEN_MINUTES",
    };
    overview(TODAY, "today", &window, dataset, "Average order")
}

/// Rolling thirty days at daily resolution, refreshed every ten seconds.
pub fn last_30_days(dataset: &Dataset) -> DashboardLayout {
    let window = Window {
        time_range: TimeRange::last_n_days(30),
        refetch_interval: 10_000,
        granularity: "DAY",
    };
    overview(LAST_30_DAYS, "last-30-days", &window, dataset, "Average revenue per order")
}

/// Revenue and order breakdowns by dimension over thirty days.
pub fn breakdown(dataset: &Dataset) -> DashboardLayout {
    let window = Window {
        time_range: TimeRange::last_n_days(30),
        refetch_interval: 10_000,
        granularity: "DAY",
    };

    let mut top = Vec::new();
    if let Some(primary) = dataset.dimensions.first() {
        top.push(Widget::Leaderboard(LeaderboardWidget {
            label: format!("Top {} by revenue", humanize(primary)),
            variant: LeaderboardVariant::Table,
            query: LeaderboardQuery {
                metric: dataset.revenue(),
                dimensions: vec![Column::new(primary)],
                time_range: window.time_range.clone(),
                sort: Sort::Desc,
                row_limit: 10,
                refetch_interval: window.refetch_interval,
            },
        }));
    }
    if let Some(secondary) = dataset.dimensions.get(1).or(dataset.dimensions.first()) {
        top.push(Widget::PieChart(PieChartWidget {
            label: format!("Orders by {}", humanize(secondary)),
            variant: PieChartVariant::Doughnut,
            query: PieChartQuery {
                metric: dataset.orders(),
                dimension: Column::new(secondary),
                time_range: window.time_range.clone(),
                row_limit: 8,
                refetch_interval: window.refetch_interval,
            },
        }));
    }

    let tabs = Widget::Tabs(TabsWidget {
        tabs: vec![
            Tab {
                label: "Orders".to_owned(),
                rows: vec![Row::new(vec![window.series(
                    "Daily orders",
                    Some("indigo"),
                    dataset.orders(),
                )])],
            },
            Tab {
                label: "Revenue".to_owned(),
                rows: vec![Row::new(vec![window.series(
                    "Daily revenue",
                    None,
                    dataset.revenue(),
                )])],
            },
        ],
    });

    let mut rows = Vec::new();
    if !top.is_empty() {
        rows.push(Row::new(top));
    }
    rows.push(Row::new(vec![tabs]));

    DashboardLayout {
        name: BREAKDOWN.to_owned(),
        title: "Breakdown".to_owned(),
        intro: Some("Where the orders and revenue come from.".to_owned()),
        filters: dataset.filters(),
        time_range_picker: Some("last-30-days".to_owned()),
        rows,
    }
}

/// All built-in layouts.
pub fn all(dataset: &Dataset) -> Vec<DashboardLayout> {
    vec![today(dataset), last_30_days(dataset), breakdown(dataset)]
}

/// `restaurant_name` -> `restaurants`
fn humanize(column: &str) -> String {
    let base = column.strip_suffix("_name").unwrap_or(column).replace('_', " ");
    format!("{base}s")
}

#[cfg(test)]
#[path = "builtin_tests.rs"]
mod tests;
