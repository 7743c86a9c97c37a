//! Dashboard assembly and rendering
//!
//! Puts the three charts, the per-round table and the assumptions notes into
//! one document that can be written as JSON or as a standalone HTML page.

use askama::Template;
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::charts::{production_revenue_chart, round_chart, strike_price_chart, ChartView};
use crate::column_selector::{select_columns, ColumnSelection};
use crate::error::{CfdError, RenderError};
use crate::pipeline::summarize_rounds_by;
use crate::types::{Currency, EconomicConstants, EnrichedRecord, PriceYear, RoundSummary};

pub const DASHBOARD_TITLE: &str = "UK Offshore Wind CfD Project Analysis";

pub const DASHBOARD_DESCRIPTION: &str = "Explore Contracts for Difference (CfD) strike prices, \
estimated production, and revenue for UK offshore wind projects from Allocation Round 1 to 6.";

const VEGA_SCRIPTS: [&str; 3] = [
    "https://cdn.jsdelivr.net/npm/vega@5",
    "https://cdn.jsdelivr.net/npm/vega-lite@5",
    "https://cdn.jsdelivr.net/npm/vega-embed@6",
];

/// Output document format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Html,
    Json,
}

/// The two user-facing selectors
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardOptions {
    pub currency: Currency,
    pub price_year: PriceYear,
}

/// A fully assembled dashboard
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub title: String,
    pub description: String,
    pub options: DashboardOptions,
    pub selection: ColumnSelection,
    pub charts: Vec<ChartView>,
    pub rounds: Vec<RoundSummary>,
    pub notes: Vec<String>,
    pub constants: EconomicConstants,
}

/// Footnotes restating the assumptions behind the figures
pub fn assumption_notes(constants: &EconomicConstants) -> Vec<String> {
    let mut notes = vec![
        format!(
            "Capacity factor of {:.1}% is used for production calculations.",
            constants.capacity_factor * 100.0
        ),
        format!(
            "CPI for {} is {} and for {} is {}.",
            constants.cpi_base.label(),
            constants.cpi_base.index,
            constants.cpi_target.label(),
            constants.cpi_target.index
        ),
    ];

    let rates: Vec<String> = constants
        .fx_rates
        .iter()
        .filter(|(currency, _)| **currency != Currency::Gbp)
        .map(|(currency, rate)| format!("1 GBP = {} {}", rate, currency.code()))
        .collect();
    if !rates.is_empty() {
        notes.push(format!("Assumed exchange rates: {}.", rates.join(", ")));
    }

    notes.push(
        "\"Number of Turbines\" data is generally not available in public CfD results documents."
            .to_string(),
    );
    notes.push(
        "Allocation Round 4 (AR4) did not have specific offshore wind projects listed.".to_string(),
    );
    notes.push("Allocation Round 5 (AR5) had no offshore wind bids submitted.".to_string());
    notes
}

impl Dashboard {
    /// Assemble the dashboard for one selector combination
    pub fn build(
        records: &[EnrichedRecord],
        constants: &EconomicConstants,
        options: DashboardOptions,
    ) -> Self {
        let selection = select_columns(options.currency, options.price_year);

        let charts = vec![
            strike_price_chart(records, &selection),
            production_revenue_chart(records, &selection),
            round_chart(records, &selection),
        ];

        info!(
            currency = %options.currency,
            price_year = %options.price_year,
            records = records.len(),
            rendered = charts.iter().filter(|c| c.is_rendered()).count(),
            "built dashboard"
        );

        Dashboard {
            title: DASHBOARD_TITLE.to_string(),
            description: DASHBOARD_DESCRIPTION.to_string(),
            options,
            selection,
            charts,
            rounds: summarize_rounds_by(records, selection.strike_price),
            notes: assumption_notes(constants),
            constants: constants.clone(),
        }
    }

    /// Render in the requested format
    pub fn render(&self, format: OutputFormat) -> Result<String, CfdError> {
        let output = match format {
            OutputFormat::Html => self.to_html()?,
            OutputFormat::Json => self.to_json()?,
        };
        Ok(output)
    }

    /// Pretty-printed JSON document
    pub fn to_json(&self) -> Result<String, RenderError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Standalone HTML page rendering the charts with vega-embed
    pub fn to_html(&self) -> Result<String, RenderError> {
        let charts: Vec<ChartEntry<'_>> = self
            .charts
            .iter()
            .enumerate()
            .map(|(idx, chart)| match chart {
                ChartView::Rendered { title, spec } => ChartEntry {
                    id: format!("chart-{}", idx),
                    title,
                    spec: Some(spec),
                    message: "",
                },
                ChartView::NoData { title, message } => ChartEntry {
                    id: format!("chart-{}", idx),
                    title,
                    spec: None,
                    message,
                },
            })
            .collect();

        let rounds = self
            .rounds
            .iter()
            .map(|round| RoundRow {
                round: round.round.label(),
                project_count: round.project_count,
                total_capacity: format!("{:.0}", round.total_capacity_mw),
                mean_strike_price: round
                    .mean_strike_price
                    .map(|m| format!("{:.2}", m))
                    .unwrap_or_else(|| "n/a".to_string()),
            })
            .collect();

        let template = DashboardTemplate {
            title: &self.title,
            description: &self.description,
            currency: self.options.currency.display_name(),
            price_year: self.options.price_year.display_name(),
            currency_symbol: self.selection.currency_symbol(),
            scripts: &VEGA_SCRIPTS,
            has_embeds: charts.iter().any(|c| c.spec.is_some()),
            charts,
            rounds,
            notes: &self.notes,
        };
        Ok(template.render()?)
    }
}

#[derive(Template)]
#[template(path = "dashboard.html")]
struct DashboardTemplate<'a> {
    title: &'a str,
    description: &'a str,
    currency: String,
    price_year: &'a str,
    currency_symbol: &'a str,
    scripts: &'a [&'a str],
    has_embeds: bool,
    charts: Vec<ChartEntry<'a>>,
    rounds: Vec<RoundRow>,
    notes: &'a [String],
}

struct ChartEntry<'a> {
    id: String,
    title: &'a str,
    spec: Option<&'a Value>,
    message: &'a str,
}

struct RoundRow {
    round: &'static str,
    project_count: usize,
    total_capacity: String,
    mean_strike_price: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{default_constants, reference_projects};
    use crate::pipeline::compute_metrics;

    fn dashboard(options: DashboardOptions) -> Dashboard {
        let constants = default_constants();
        let table = compute_metrics(&reference_projects().unwrap(), &constants).unwrap();
        Dashboard::build(&table, &constants, options)
    }

    #[test]
    fn test_default_options() {
        let options = DashboardOptions::default();
        assert_eq!(options.currency, Currency::Gbp);
        assert_eq!(options.price_year, PriceYear::Original2012);
    }

    #[test]
    fn test_build_renders_three_charts() {
        let dashboard = dashboard(DashboardOptions::default());
        assert_eq!(dashboard.charts.len(), 3);
        assert!(dashboard.charts.iter().all(|c| c.is_rendered()));
        assert_eq!(dashboard.rounds.len(), 6);
    }

    #[test]
    fn test_notes_restate_assumptions() {
        let notes = assumption_notes(&default_constants());
        assert!(notes[0].contains("42.2%"));
        assert!(notes[1].contains("Dec 2012 is 97.6"));
        assert!(notes[1].contains("May 2025 is 138.4"));
        assert!(notes[2].contains("1 GBP = 1.25 USD"));
        assert!(notes[2].contains("1 GBP = 1.18 EUR"));
    }

    #[test]
    fn test_to_json_contains_selection() {
        let dashboard = dashboard(DashboardOptions {
            currency: Currency::Eur,
            price_year: PriceYear::Adjusted2025,
        });
        let json: serde_json::Value = serde_json::from_str(&dashboard.to_json().unwrap()).unwrap();

        assert_eq!(json["options"]["currency"], "EUR");
        assert_eq!(json["options"]["price_year"], "2025");
        assert_eq!(json["charts"].as_array().unwrap().len(), 3);
        assert_eq!(json["charts"][0]["status"], "rendered");
    }

    #[test]
    fn test_to_html_embeds_charts() {
        let html = dashboard(DashboardOptions::default()).to_html().unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("UK Offshore Wind CfD Project Analysis"));
        assert_eq!(html.matches("vegaEmbed('#chart-").count(), 3);
        assert!(html.contains("<td>AR5</td><td>1</td><td>0</td><td>n/a</td>"));
    }

    #[test]
    fn test_to_html_empty_table_shows_no_data() {
        let constants = default_constants();
        let dashboard = Dashboard::build(&[], &constants, DashboardOptions::default());
        let html = dashboard.to_html().unwrap();

        assert_eq!(html.matches("class=\"no-data\"").count(), 3);
        assert!(!html.contains("vegaEmbed("));
    }

    #[test]
    fn test_to_html_escapes_dataset_text() {
        let constants = default_constants();
        let csv = "allocation_round,project_name,strike_price_2012_gbp,capacity_mw
AR6,</script><b>Rogue & Co,50.0,100";
        let table = crate::dataset::load_table(csv, &constants).unwrap();
        let dashboard = Dashboard::build(&table, &constants, DashboardOptions::default());
        let html = dashboard.to_html().unwrap();

        assert!(!html.contains("<b>Rogue"));
        assert_eq!(html.matches("</script>").count(), 4);
        assert!(html.contains("Rogue"));
    }
}
