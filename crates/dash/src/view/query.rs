// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Declarative query descriptors handed to the analytics widgets.
//!
//! Serialized in the UI kit's camelCase shape. Time ranges, granularities and
//! refetch intervals are opaque values passed through unchanged.

use serde::{Deserialize, Serialize};

/// Default `maxValues` for filter suggestions.
pub const DEFAULT_FILTER_MAX_VALUES: u32 = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataPool {
    pub name: String,
}

impl DataPool {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub column_name: String,
}

impl Column {
    pub fn new(column_name: impl Into<String>) -> Self {
        Self { column_name: column_name.into() }
    }
}

/// Metric computed over a data pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Metric {
    Count { data_pool: DataPool },
    Sum { data_pool: DataPool, measure: Column },
    Custom { data_pool: DataPool, expression: String },
}

impl Metric {
    pub fn count(data_pool: &str) -> Self {
        Self::Count { data_pool: DataPool::new(data_pool) }
    }

    pub fn sum(data_pool: &str, measure: &str) -> Self {
        Self::Sum { data_pool: DataPool::new(data_pool), measure: Column::new(measure) }
    }

    pub fn custom(data_pool: &str, expression: impl Into<String>) -> Self {
        Self::Custom { data_pool: DataPool::new(data_pool), expression: expression.into() }
    }

    pub fn data_pool(&self) -> &str {
        match self {
            Self::Count { data_pool } | Self::Sum { data_pool, .. } | Self::Custom { data_pool, .. } => {
                &data_pool.name
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub relative: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n: Option<u32>,
}

impl TimeRange {
    pub fn relative(relative: impl Into<String>) -> Self {
        Self { relative: relative.into(), n: None }
    }

    pub fn today() -> Self {
        Self::relative("TODAY")
    }

    pub fn last_n_days(n: u32) -> Self {
        Self { relative: "LAST_N_DAYS".to_owned(), n: Some(n) }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Sort {
    Asc,
    #[default]
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterQuery {
    pub metric: Metric,
    pub time_range: TimeRange,
    pub refetch_interval: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeriesQuery {
    pub metric: Metric,
    pub time_range: TimeRange,
    pub refetch_interval: u64,
    pub granularity: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardQuery {
    pub metric: Metric,
    pub dimensions: Vec<Column>,
    pub time_range: TimeRange,
    #[serde(default)]
    pub sort: Sort,
    pub row_limit: u32,
    pub refetch_interval: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PieChartQuery {
    pub metric: Metric,
    pub dimension: Column,
    pub time_range: TimeRange,
    pub row_limit: u32,
    pub refetch_interval: u64,
}

/// Distinct-value lookup backing a filter dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterQuery {
    pub column_name: String,
    pub data_pool: DataPool,
    #[serde(default = "default_max_values")]
    pub max_values: u32,
}

fn default_max_values() -> u32 {
    DEFAULT_FILTER_MAX_VALUES
}

#[cfg(test)]
#[path = "query_tests.rs"]
mod tests;
