//! UK CfD Dashboard - offshore wind Contracts-for-Difference analysis
//!
//! Derives estimated annual production and revenue for UK offshore wind CfD
//! awards (Allocation Rounds 1-6) from a fixed reference table, and renders
//! them as Vega-Lite charts with currency and price-year selectors.
//!
//! # Features
//! - Metrics pipeline: production, CPI-normalized strike prices, revenue in GBP/USD/EUR
//! - Explicit "absent" strike prices that never count as zero in averages
//! - Per allocation round aggregation in AR1..AR6 order
//! - Typed column selection for the (currency, price year) selectors
//! - Dashboard output as JSON or standalone HTML, enriched table export as CSV
//!
//! # Example
//!
//! ```rust
//! use uk_cfd_dashboard::{
//!     compute_metrics, default_constants, reference_projects, Currency, Dashboard,
//!     DashboardOptions, PriceYear,
//! };
//!
//! let constants = default_constants();
//! let table = compute_metrics(&reference_projects().unwrap(), &constants).unwrap();
//!
//! let options = DashboardOptions { currency: Currency::Usd, price_year: PriceYear::Adjusted2025 };
//! let dashboard = Dashboard::build(&table, &constants, options);
//! assert_eq!(dashboard.charts.len(), 3);
//! ```

pub mod charts;
pub mod column_selector;
pub mod csv_parser;
pub mod csv_utils;
pub mod dashboard;
pub mod dataset;
mod error;
pub mod pipeline;
pub mod transformations;
pub mod types;

// Re-export public types for easier access
pub use charts::ChartView;
pub use column_selector::{select_columns, ColumnSelection, RevenueField, StrikePriceField};
pub use dashboard::{Dashboard, DashboardOptions, OutputFormat};
pub use dataset::{default_constants, load_table, reference_projects};
pub use error::{CfdError, RenderError, ValidationError};
pub use pipeline::{compute_metrics, summarize_rounds, summarize_rounds_by};
pub use types::{
    AllocationRound, CpiReading, Currency, CurrencyMetrics, DerivedMetrics, EconomicConstants,
    EnrichedRecord, PriceYear, ProjectRecord, RoundSummary,
};
