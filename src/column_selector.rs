//! Column selection for the dashboard views
//!
//! Maps the two sidebar selectors (currency, price year) to typed fields of the
//! enriched table, so the chart layer reads values instead of re-deriving them.
//!
//! # Mapping
//!
//! | currency | year | strike price field | revenue field |
//! |---|---|---|---|
//! | GBP | 2012 | awarded 2012 price | 2025 revenue, £M |
//! | USD/EUR | 2012 | 2012 price × fixed rate | 2025 revenue, $M / €M |
//! | any | 2025 | CPI-normalized price × fixed rate | 2025 revenue in currency, millions |
//!
//! # Example
//!
//! ```rust
//! use uk_cfd_dashboard::column_selector::*;
//! use uk_cfd_dashboard::types::{Currency, PriceYear};
//!
//! let selection = select_columns(Currency::Usd, PriceYear::Adjusted2025);
//! assert_eq!(selection.strike_price, StrikePriceField::Normalized2025(Currency::Usd));
//! assert_eq!(selection.revenue, RevenueField::Millions2025(Currency::Usd));
//! ```

use serde::{Deserialize, Serialize};

use crate::types::{Currency, EnrichedRecord, PriceYear};

/// Strike price column of the enriched table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrikePriceField {
    /// Strike price as awarded (£/MWh, 2012 prices)
    Awarded2012Gbp,

    /// 2012 strike price converted at the fixed rate
    Converted2012(Currency),

    /// CPI-normalized strike price converted at the fixed rate
    Normalized2025(Currency),
}

impl StrikePriceField {
    pub fn currency(&self) -> Currency {
        match self {
            StrikePriceField::Awarded2012Gbp => Currency::Gbp,
            StrikePriceField::Converted2012(c) | StrikePriceField::Normalized2025(c) => *c,
        }
    }

    pub fn price_year(&self) -> PriceYear {
        match self {
            StrikePriceField::Awarded2012Gbp | StrikePriceField::Converted2012(_) => {
                PriceYear::Original2012
            }
            StrikePriceField::Normalized2025(_) => PriceYear::Adjusted2025,
        }
    }

    /// Read this column from a row; None when the project has no strike price
    pub fn value(&self, record: &EnrichedRecord) -> Option<f64> {
        match self {
            StrikePriceField::Awarded2012Gbp => record.project.strike_price_2012_gbp,
            StrikePriceField::Converted2012(c) => record
                .metrics
                .currency(*c)
                .and_then(|m| m.strike_price_2012),
            StrikePriceField::Normalized2025(Currency::Gbp) => {
                record.metrics.normalized_strike_price_gbp_2025
            }
            StrikePriceField::Normalized2025(c) => record
                .metrics
                .currency(*c)
                .and_then(|m| m.strike_price_2025),
        }
    }

    /// Column header, e.g. "Normalized Strike Price ($/MWh, 2025 USD)"
    pub fn label(&self) -> String {
        match self {
            StrikePriceField::Awarded2012Gbp => "Strike Price (£/MWh, 2012 prices)".to_string(),
            StrikePriceField::Converted2012(c) => {
                format!("Strike Price ({}/MWh, 2012 prices, {})", c.symbol(), c.code())
            }
            StrikePriceField::Normalized2025(c) => {
                format!("Normalized Strike Price ({}/MWh, 2025 {})", c.symbol(), c.code())
            }
        }
    }

    /// Short axis title, e.g. "Strike Price (€/MWh)"
    pub fn axis_title(&self) -> String {
        format!("Strike Price ({}/MWh)", self.currency().symbol())
    }
}

/// Revenue column of the enriched table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RevenueField {
    /// Annual revenue at the normalized strike price, in millions
    Millions2025(Currency),
}

impl RevenueField {
    pub fn currency(&self) -> Currency {
        match self {
            RevenueField::Millions2025(c) => *c,
        }
    }

    pub fn value(&self, record: &EnrichedRecord) -> Option<f64> {
        match self {
            RevenueField::Millions2025(c) => record
                .metrics
                .currency(*c)
                .and_then(|m| m.revenue_2025_millions),
        }
    }

    /// Column header, e.g. "Estimated Annual Revenue (£M, 2025 GBP)"
    pub fn label(&self) -> String {
        match self {
            RevenueField::Millions2025(c) => {
                format!("Estimated Annual Revenue ({}M, 2025 {})", c.symbol(), c.code())
            }
        }
    }
}

/// Fields shown for one selector combination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSelection {
    pub strike_price: StrikePriceField,
    pub revenue: RevenueField,
}

impl ColumnSelection {
    pub fn currency_symbol(&self) -> &'static str {
        self.strike_price.currency().symbol()
    }
}

/// Map (currency, price year) to the columns the charts display
///
/// # Examples
///
/// ```
/// # use uk_cfd_dashboard::column_selector::{select_columns, StrikePriceField};
/// # use uk_cfd_dashboard::types::{Currency, PriceYear};
/// let selection = select_columns(Currency::Gbp, PriceYear::Original2012);
/// assert_eq!(selection.strike_price, StrikePriceField::Awarded2012Gbp);
///
/// let selection = select_columns(Currency::Eur, PriceYear::Original2012);
/// assert_eq!(selection.strike_price, StrikePriceField::Converted2012(Currency::Eur));
/// ```
pub fn select_columns(currency: Currency, year: PriceYear) -> ColumnSelection {
    let strike_price = match (currency, year) {
        (Currency::Gbp, PriceYear::Original2012) => StrikePriceField::Awarded2012Gbp,
        (c, PriceYear::Original2012) => StrikePriceField::Converted2012(c),
        (c, PriceYear::Adjusted2025) => StrikePriceField::Normalized2025(c),
    };

    ColumnSelection {
        strike_price,
        revenue: RevenueField::Millions2025(currency),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AllocationRound, CurrencyMetrics, DerivedMetrics, ProjectRecord};
    use std::collections::BTreeMap;

    fn record(strike: Option<f64>) -> EnrichedRecord {
        let by_currency = BTreeMap::from([
            (
                Currency::Gbp,
                CurrencyMetrics {
                    strike_price_2012: strike,
                    strike_price_2025: strike.map(|s| s * 2.0),
                    revenue_2025: strike.map(|s| s * 2.0e6),
                    revenue_2025_millions: strike.map(|s| s * 2.0),
                },
            ),
            (
                Currency::Usd,
                CurrencyMetrics {
                    strike_price_2012: strike.map(|s| s * 1.25),
                    strike_price_2025: strike.map(|s| s * 2.5),
                    revenue_2025: strike.map(|s| s * 2.5e6),
                    revenue_2025_millions: strike.map(|s| s * 2.5),
                },
            ),
        ]);

        EnrichedRecord {
            project: ProjectRecord {
                allocation_round: AllocationRound::Ar2,
                project_name: "Hornsea Project 2".to_string(),
                strike_price_2012_gbp: strike,
                capacity_mw: 1386.0,
                delivery_year: Some("2022/23".to_string()),
                number_of_turbines: None,
            },
            metrics: DerivedMetrics {
                annual_production_mwh: 1.0e6,
                annual_production_twh: 1.0,
                normalized_strike_price_gbp_2025: strike.map(|s| s * 2.0),
                annual_revenue_gbp_2012: strike.map(|s| s * 1.0e6),
                annual_revenue_gbp_2025: strike.map(|s| s * 2.0e6),
                by_currency,
            },
        }
    }

    #[test]
    fn test_all_selector_combinations_resolve() {
        for currency in Currency::ALL {
            for year in [PriceYear::Original2012, PriceYear::Adjusted2025] {
                let selection = select_columns(currency, year);
                assert_eq!(selection.strike_price.currency(), currency);
                assert_eq!(selection.strike_price.price_year(), year);
                assert_eq!(selection.revenue.currency(), currency);
            }
        }
    }

    #[test]
    fn test_gbp_2025_reads_normalized_column() {
        let row = record(Some(50.0));
        let selection = select_columns(Currency::Gbp, PriceYear::Adjusted2025);
        assert_eq!(selection.strike_price.value(&row), Some(100.0));
        assert_eq!(selection.revenue.value(&row), Some(100.0));
    }

    #[test]
    fn test_usd_selection_reads_usd_columns() {
        let row = record(Some(50.0));
        let selection = select_columns(Currency::Usd, PriceYear::Original2012);
        assert_eq!(selection.strike_price.value(&row), Some(62.5));
        assert_eq!(selection.revenue.value(&row), Some(125.0));
    }

    #[test]
    fn test_missing_price_reads_as_absent() {
        let row = record(None);
        let selection = select_columns(Currency::Gbp, PriceYear::Original2012);
        assert_eq!(selection.strike_price.value(&row), None);
        assert_eq!(selection.revenue.value(&row), None);
    }

    #[test]
    fn test_currency_missing_from_table_reads_as_absent() {
        let row = record(Some(50.0));
        let field = StrikePriceField::Normalized2025(Currency::Eur);
        assert_eq!(field.value(&row), None);
    }

    #[test]
    fn test_labels() {
        assert_eq!(
            StrikePriceField::Awarded2012Gbp.label(),
            "Strike Price (£/MWh, 2012 prices)"
        );
        assert_eq!(
            StrikePriceField::Normalized2025(Currency::Usd).label(),
            "Normalized Strike Price ($/MWh, 2025 USD)"
        );
        assert_eq!(
            RevenueField::Millions2025(Currency::Eur).label(),
            "Estimated Annual Revenue (€M, 2025 EUR)"
        );
        assert_eq!(
            StrikePriceField::Converted2012(Currency::Eur).axis_title(),
            "Strike Price (€/MWh)"
        );
    }
}
