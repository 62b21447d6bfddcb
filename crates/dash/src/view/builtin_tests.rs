// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn counters(layout: &DashboardLayout) -> Vec<&CounterWidget> {
    layout
        .rows
        .iter()
        .flat_map(|r| &r.widgets)
        .filter_map(|w| match w {
            Widget::Counter(c) => Some(c),
            _ => None,
        })
        .collect()
}

fn series(layout: &DashboardLayout) -> Vec<&TimeSeriesWidget> {
    layout
        .rows
        .iter()
        .flat_map(|r| &r.widgets)
        .filter_map(|w| match w {
            Widget::TimeSeries(s) => Some(s),
            _ => None,
        })
        .collect()
}

#[test]
fn today_layout() {
    let layout = today(&Dataset::default());
    assert_eq!(layout.name, TODAY);
    assert_eq!(layout.title, "Dashboard");
    assert_eq!(layout.time_range_picker.as_deref(), Some("today"));

    let labels: Vec<&str> = counters(&layout).iter().map(|c| c.label.as_str()).collect();
    assert_eq!(labels, vec!["Orders", "Revenue", "Average order"]);
    for counter in counters(&layout) {
        assert_eq!(counter.query.time_range, TimeRange::today());
        assert_eq!(counter.query.refetch_interval, 1000);
    }
    for s in series(&layout) {
        assert_eq!(s.query.granularity, "FIFTEEN_MINUTES");
    }
}

#[test]
fn last_30_days_layout() {
    let layout = last_30_days(&Dataset::default());
    assert_eq!(layout.name, LAST_30_DAYS);
    assert_eq!(layout.time_range_picker.as_deref(), Some("last-30-days"));

    let c = counters(&layout);
    assert_eq!(c.len(), 3);
    assert_eq!(c[0].query.metric, Metric::count("flattened_orders"));
    assert_eq!(c[1].query.metric, Metric::sum("flattened_orders", "total_price"));
    assert_eq!(c[1].prefix, "$");
    assert_eq!(c[2].query.metric, Metric::custom("flattened_orders", "SUM(total_price) / COUNT()"));

    let s = series(&layout);
    assert_eq!(s.len(), 2);
    assert_eq!(s[0].label, "Daily orders");
    assert_eq!(s[0].color.as_deref(), Some("indigo"));
    assert_eq!(s[0].query.time_range, TimeRange::last_n_days(30));
    assert_eq!(s[0].query.refetch_interval, 10_000);
    assert_eq!(s[0].query.granularity, "DAY");
}

#[test]
fn filters_follow_dimensions() {
    let layout = last_30_days(&Dataset::default());
    let placeholders: Vec<&str> = layout.filters.iter().map(|f| f.placeholder.as_str()).collect();
    assert_eq!(placeholders, vec!["Restaurant...", "Taco..."]);
    for filter in &layout.filters {
        assert_eq!(filter.query.max_values, 1000);
        assert_eq!(filter.query.data_pool.name, "flattened_orders");
    }
}

#[test]
fn breakdown_layout() -> anyhow::Result<()> {
    let layout = breakdown(&Dataset::default());
    assert_eq!(layout.rows.len(), 2);

    match &layout.rows[0].widgets[..] {
        [Widget::Leaderboard(lb), Widget::PieChart(pie)] => {
            assert_eq!(lb.label, "Top restaurants by revenue");
            assert_eq!(lb.query.dimensions, vec![Column::new("restaurant_name")]);
            assert_eq!(lb.query.sort, Sort::Desc);
            assert_eq!(pie.label, "Orders by tacos");
            assert_eq!(pie.variant, PieChartVariant::Doughnut);
            assert_eq!(pie.query.dimension, Column::new("taco_name"));
        }
        other => anyhow::bail!("unexpected first row: {other:?}"),
    }

    match &layout.rows[1].widgets[..] {
        [Widget::Tabs(tabs)] => {
            let labels: Vec<&str> = tabs.tabs.iter().map(|t| t.label.as_str()).collect();
            assert_eq!(labels, vec!["Orders", "Revenue"]);
        }
        other => anyhow::bail!("unexpected second row: {other:?}"),
    }
    Ok(())
}

#[test]
fn breakdown_without_dimensions_keeps_tabs() {
    let dataset = Dataset { dimensions: Vec::new(), ..Dataset::default() };
    let layout = breakdown(&dataset);
    assert_eq!(layout.rows.len(), 1);
    assert!(layout.filters.is_empty());
}

#[test]
fn dataset_drives_every_descriptor() -> anyhow::Result<()> {
    let dataset = Dataset {
        data_pool: "sales".to_owned(),
        measure: "amount".to_owned(),
        dimensions: vec!["store_name".to_owned()],
    };
    for layout in all(&dataset) {
        let json = serde_json::to_string(&layout)?;
        assert!(!json.contains("flattened_orders"), "{} leaks default pool", layout.name);
        assert!(!json.contains("total_price"), "{} leaks default measure", layout.name);
    }
    Ok(())
}

#[yare::parameterized(
    restaurant = { "restaurant_name", "Restaurant..." },
    taco = { "taco_name", "Taco..." },
    single = { "city", "City..." },
    leading_underscore = { "_store", "Store..." },
    empty = { "", "..." },
)]
fn placeholder(column: &str, expected: &str) {
    assert_eq!(placeholder_for(column), expected);
}

#[test]
fn builds_are_deterministic() {
    assert_eq!(all(&Dataset::default()), all(&Dataset::default()));
}
