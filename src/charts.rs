//! Chart specifications for the dashboard
//!
//! Each chart is a self-contained Vega-Lite v5 document with inline data, so the
//! HTML page only has to hand it to `vegaEmbed`. Charts only read columns chosen
//! by [`select_columns`](crate::column_selector::select_columns); nothing is
//! recomputed here.
//!
//! | chart | rows | encoding |
//! |---|---|---|
//! | A | capacity > 0, price present | x = strike price, y = project (sorted by x desc), color = round |
//! | B | capacity > 0 | paired bars of production (TWh) and revenue (millions), faceted by metric |
//! | C | AR1..AR6 | bar = total capacity, line = average strike price |

use std::collections::HashMap;

use serde::Serialize;
use serde_json::{json, Value};
use tracing::warn;

use crate::column_selector::ColumnSelection;
use crate::pipeline::{project_chart_rows, summarize_rounds_by};
use crate::types::{AllocationRound, EnrichedRecord};

const VEGA_LITE_SCHEMA: &str = "https://vega.github.io/schema/vega-lite/v5.json";

/// Metric label used for production bars in Chart B
pub const PRODUCTION_METRIC: &str = "Estimated Annual Production (TWh)";

/// A chart ready to display, or the reason there is nothing to show
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ChartView {
    Rendered { title: String, spec: Value },
    NoData { title: String, message: String },
}

impl ChartView {
    pub fn title(&self) -> &str {
        match self {
            ChartView::Rendered { title, .. } | ChartView::NoData { title, .. } => title,
        }
    }

    pub fn is_rendered(&self) -> bool {
        matches!(self, ChartView::Rendered { .. })
    }

    /// Vega-Lite document, None for `NoData`
    pub fn spec(&self) -> Option<&Value> {
        match self {
            ChartView::Rendered { spec, .. } => Some(spec),
            ChartView::NoData { .. } => None,
        }
    }

    fn no_data(title: String, message: &str) -> Self {
        warn!(chart = %title, "no rows to display");
        ChartView::NoData {
            title,
            message: message.to_string(),
        }
    }
}

fn selection_caption(selection: &ColumnSelection) -> String {
    format!(
        "{} in {}",
        selection.strike_price.price_year().display_name(),
        selection.strike_price.currency().display_name()
    )
}

fn round_order() -> Vec<&'static str> {
    AllocationRound::ALL.iter().map(|r| r.label()).collect()
}

/// One y-axis key per row. Project names are not unique, so a repeated name
/// gets its round appended, and a repeat within the same round a counter.
fn project_keys(rows: &[&EnrichedRecord]) -> Vec<String> {
    let mut name_counts: HashMap<&str, usize> = HashMap::new();
    for r in rows {
        *name_counts.entry(r.project.project_name.as_str()).or_default() += 1;
    }

    let mut seen: HashMap<String, usize> = HashMap::new();
    rows.iter()
        .map(|r| {
            let name = r.project.project_name.as_str();
            let base = if name_counts[name] > 1 {
                format!("{} ({})", name, r.project.allocation_round)
            } else {
                name.to_string()
            };
            let n = seen.entry(base.clone()).or_default();
            *n += 1;
            if *n > 1 {
                format!("{} #{}", base, n)
            } else {
                base
            }
        })
        .collect()
}

// ============================================================================
// Chart A: Strike Price per Project
// ============================================================================

/// Chart A: strike price per project
pub fn strike_price_chart(records: &[EnrichedRecord], selection: &ColumnSelection) -> ChartView {
    let field = selection.strike_price;
    let title = format!(
        "CfD Strike Prices by Offshore Wind Project ({})",
        selection_caption(selection)
    );

    let mut rows: Vec<(&EnrichedRecord, f64)> = project_chart_rows(records)
        .into_iter()
        .filter_map(|r| field.value(r).map(|price| (r, price)))
        .collect();

    if rows.is_empty() {
        return ChartView::no_data(
            title,
            "No offshore wind projects found for the selected criteria to display strike prices.",
        );
    }

    rows.sort_by(|a, b| b.1.total_cmp(&a.1));

    let records: Vec<&EnrichedRecord> = rows.iter().map(|(r, _)| *r).collect();
    let values: Vec<Value> = rows
        .iter()
        .zip(project_keys(&records))
        .map(|((r, price), key)| {
            json!({
                "key": key,
                "project": r.project.project_name,
                "round": r.project.allocation_round.label(),
                "strike_price": price,
                "capacity_mw": r.project.capacity_mw,
            })
        })
        .collect();

    let axis_title = field.axis_title();
    let spec = json!({
        "$schema": VEGA_LITE_SCHEMA,
        "title": title,
        "width": "container",
        "data": { "values": values },
        "mark": "bar",
        "params": [{ "name": "zoom", "select": "interval", "bind": "scales" }],
        "encoding": {
            "x": { "field": "strike_price", "type": "quantitative", "title": axis_title },
            "y": {
                "field": "key",
                "type": "nominal",
                "sort": "-x",
                "title": "Project Name"
            },
            "color": {
                "field": "round",
                "type": "nominal",
                "title": "Allocation Round",
                "scale": { "domain": round_order() }
            },
            "tooltip": [
                { "field": "project", "type": "nominal", "title": "Project Name" },
                { "field": "round", "type": "nominal", "title": "Allocation Round" },
                { "field": "strike_price", "type": "quantitative", "format": ".2f", "title": axis_title },
                { "field": "capacity_mw", "type": "quantitative", "format": ".0f", "title": "Capacity (MW)" }
            ]
        }
    });

    ChartView::Rendered { title, spec }
}

// ============================================================================
// Chart B: Production and Revenue per Project
// ============================================================================

/// Chart B: annual production (TWh) and revenue (millions) per project
///
/// Data is in long format (one row per project and metric). Projects without
/// a strike price keep their production bar and get no revenue bar.
pub fn production_revenue_chart(
    records: &[EnrichedRecord],
    selection: &ColumnSelection,
) -> ChartView {
    let revenue = selection.revenue;
    let title = format!(
        "Estimated Annual Production (TWh) and Revenue ({}, 2025 Value) per Project",
        revenue.currency().symbol()
    );

    let rows = project_chart_rows(records);
    if rows.is_empty() {
        return ChartView::no_data(
            title,
            "No offshore wind projects found for the selected criteria to display production and revenue.",
        );
    }

    let revenue_metric = revenue.label();
    let mut values = Vec::with_capacity(rows.len() * 2);
    for (r, key) in rows.iter().zip(project_keys(&rows)) {
        values.push(json!({
            "key": key,
            "project": r.project.project_name,
            "round": r.project.allocation_round.label(),
            "metric": PRODUCTION_METRIC,
            "value": r.metrics.annual_production_twh,
        }));
        if let Some(value) = revenue.value(r) {
            values.push(json!({
                "key": key,
                "project": r.project.project_name,
                "round": r.project.allocation_round.label(),
                "metric": revenue_metric,
                "value": value,
            }));
        }
    }

    let spec = json!({
        "$schema": VEGA_LITE_SCHEMA,
        "title": title,
        "data": { "values": values },
        "mark": "bar",
        "encoding": {
            "x": { "field": "value", "type": "quantitative", "title": "Value" },
            "y": { "field": "key", "type": "nominal", "sort": "-x", "title": "Project Name" },
            "color": { "field": "metric", "type": "nominal", "title": "Metric" },
            "column": {
                "field": "metric",
                "type": "nominal",
                "header": { "titleOrient": "bottom", "labelOrient": "bottom" }
            },
            "tooltip": [
                { "field": "project", "type": "nominal", "title": "Project Name" },
                { "field": "metric", "type": "nominal", "title": "Metric" },
                { "field": "value", "type": "quantitative", "format": ".2f", "title": "Value" }
            ]
        },
        "resolve": { "scale": { "x": "independent" } }
    });

    ChartView::Rendered { title, spec }
}

// ============================================================================
// Chart C: Per-Round Capacity and Average Strike Price
// ============================================================================

/// Chart C: total capacity per round with the average strike price overlaid
///
/// Every round appears; rounds without priced projects carry a `null` average,
/// which breaks the line instead of drawing it through zero.
pub fn round_chart(records: &[EnrichedRecord], selection: &ColumnSelection) -> ChartView {
    let field = selection.strike_price;
    let title = format!(
        "Total Capacity and Average Strike Price per Allocation Round ({})",
        selection_caption(selection)
    );

    if records.is_empty() {
        return ChartView::no_data(
            title,
            "No CfD projects available to summarize by allocation round.",
        );
    }

    let values: Vec<Value> = summarize_rounds_by(records, field)
        .iter()
        .map(|s| {
            json!({
                "round": s.round.label(),
                "total_capacity_mw": s.total_capacity_mw,
                "mean_strike_price": s.mean_strike_price,
                "project_count": s.project_count,
            })
        })
        .collect();

    let axis_title = format!("Average {}", field.axis_title());
    let spec = json!({
        "$schema": VEGA_LITE_SCHEMA,
        "title": title,
        "width": "container",
        "data": { "values": values },
        "encoding": {
            "x": {
                "field": "round",
                "type": "ordinal",
                "sort": round_order(),
                "title": "Allocation Round"
            }
        },
        "layer": [
            {
                "mark": "bar",
                "encoding": {
                    "y": {
                        "field": "total_capacity_mw",
                        "type": "quantitative",
                        "title": "Total Capacity (MW)"
                    },
                    "tooltip": [
                        { "field": "round", "type": "nominal", "title": "Allocation Round" },
                        { "field": "total_capacity_mw", "type": "quantitative", "format": ".0f", "title": "Total Capacity (MW)" },
                        { "field": "project_count", "type": "quantitative", "title": "Projects" }
                    ]
                }
            },
            {
                "mark": { "type": "line", "point": true, "color": "#d62728" },
                "encoding": {
                    "y": {
                        "field": "mean_strike_price",
                        "type": "quantitative",
                        "title": axis_title
                    },
                    "tooltip": [
                        { "field": "round", "type": "nominal", "title": "Allocation Round" },
                        { "field": "mean_strike_price", "type": "quantitative", "format": ".2f", "title": axis_title }
                    ]
                }
            }
        ],
        "resolve": { "scale": { "y": "independent" } }
    });

    ChartView::Rendered { title, spec }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column_selector::select_columns;
    use crate::dataset::{default_constants, reference_projects};
    use crate::pipeline::compute_metrics;
    use crate::types::{Currency, PriceYear};

    fn table() -> Vec<EnrichedRecord> {
        compute_metrics(&reference_projects().unwrap(), &default_constants()).unwrap()
    }

    fn data_values(view: &ChartView) -> Vec<Value> {
        view.spec().unwrap()["data"]["values"]
            .as_array()
            .unwrap()
            .clone()
    }

    #[test]
    fn test_strike_price_chart_sorted_descending_without_placeholders() {
        let selection = select_columns(Currency::Gbp, PriceYear::Original2012);
        let view = strike_price_chart(&table(), &selection);
        assert!(view.is_rendered());

        let values = data_values(&view);
        assert_eq!(values.len(), 20);
        assert!(values.iter().all(|v| v["round"] != "AR4" && v["round"] != "AR5"));

        let prices: Vec<f64> = values
            .iter()
            .map(|v| v["strike_price"].as_f64().unwrap())
            .collect();
        assert!(prices.windows(2).all(|w| w[0] >= w[1]));
        assert_eq!(prices[0], 139.93);
    }

    #[test]
    fn test_strike_price_chart_uses_selected_currency() {
        let selection = select_columns(Currency::Usd, PriceYear::Adjusted2025);
        let view = strike_price_chart(&table(), &selection);
        let spec = view.spec().unwrap();

        assert_eq!(spec["encoding"]["x"]["title"], "Strike Price ($/MWh)");
        assert!(view.title().contains("2025 (Inflation Adjusted) in USD ($)"));

        let top = data_values(&view)[0]["strike_price"].as_f64().unwrap();
        let expected = 139.93 * (138.4 / 97.6) * 1.25;
        assert!((top - expected).abs() < 1e-9);
    }

    #[test]
    fn test_production_revenue_chart_long_format() {
        let selection = select_columns(Currency::Eur, PriceYear::Original2012);
        let view = production_revenue_chart(&table(), &selection);
        let values = data_values(&view);

        assert_eq!(values.len(), 40);
        let revenue_rows = values
            .iter()
            .filter(|v| v["metric"] == "Estimated Annual Revenue (€M, 2025 EUR)")
            .count();
        assert_eq!(revenue_rows, 20);
        assert_eq!(view.spec().unwrap()["encoding"]["column"]["field"], "metric");
    }

    #[test]
    fn test_duplicate_project_names_get_distinct_keys() {
        let csv = "allocation_round,project_name,strike_price_2012_gbp,capacity_mw
AR3,Phase 1,39.65,1200
AR6,Phase 1,58.87,2400
AR6,Other,54.23,100
AR6,Other,50.00,50";
        let table = crate::dataset::load_table(csv, &default_constants()).unwrap();
        let selection = select_columns(Currency::Gbp, PriceYear::Original2012);

        let view = strike_price_chart(&table, &selection);
        assert_eq!(view.spec().unwrap()["encoding"]["y"]["field"], "key");
        let values = data_values(&view);
        let keys: Vec<&str> = values.iter().map(|v| v["key"].as_str().unwrap()).collect();
        assert_eq!(
            keys,
            vec!["Phase 1 (AR6)", "Other (AR6)", "Other (AR6) #2", "Phase 1 (AR3)"]
        );
        assert_eq!(values[0]["project"], "Phase 1");
        assert_eq!(values[0]["strike_price"], 58.87);

        let view = production_revenue_chart(&table, &selection);
        assert_eq!(view.spec().unwrap()["encoding"]["y"]["field"], "key");
        let mut keys: Vec<String> = data_values(&view)
            .iter()
            .map(|v| v["key"].as_str().unwrap().to_string())
            .collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), 4);
    }

    #[test]
    fn test_round_chart_includes_every_round() {
        let selection = select_columns(Currency::Gbp, PriceYear::Adjusted2025);
        let view = round_chart(&table(), &selection);
        let values = data_values(&view);

        let rounds: Vec<&str> = values.iter().map(|v| v["round"].as_str().unwrap()).collect();
        assert_eq!(rounds, vec!["AR1", "AR2", "AR3", "AR4", "AR5", "AR6"]);

        assert_eq!(values[3]["total_capacity_mw"], 0.0);
        assert!(values[3]["mean_strike_price"].is_null());
        assert!(values[4]["mean_strike_price"].is_null());
        assert!(values[0]["mean_strike_price"].as_f64().unwrap() > 0.0);
    }

    #[test]
    fn test_empty_table_yields_no_data_views() {
        let selection = select_columns(Currency::Gbp, PriceYear::Original2012);

        for view in [
            strike_price_chart(&[], &selection),
            production_revenue_chart(&[], &selection),
            round_chart(&[], &selection),
        ] {
            assert!(!view.is_rendered());
            assert!(view.spec().is_none());
            match view {
                ChartView::NoData { message, .. } => assert!(!message.is_empty()),
                ChartView::Rendered { .. } => panic!("Expected NoData"),
            }
        }
    }

    #[test]
    fn test_placeholders_only_yield_no_data_for_project_charts() {
        let placeholders: Vec<EnrichedRecord> = table()
            .into_iter()
            .filter(|r| r.project.capacity_mw == 0.0)
            .collect();
        let selection = select_columns(Currency::Gbp, PriceYear::Original2012);

        assert!(!strike_price_chart(&placeholders, &selection).is_rendered());
        assert!(!production_revenue_chart(&placeholders, &selection).is_rendered());
        // Round chart still shows the rounds with zero capacity
        assert!(round_chart(&placeholders, &selection).is_rendered());
    }

    #[test]
    fn test_chart_view_serializes_with_status_tag() {
        let view = ChartView::NoData {
            title: "t".to_string(),
            message: "m".to_string(),
        };
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["status"], "no_data");
        assert_eq!(json["message"], "m");
    }
}
