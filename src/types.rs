//! Data structures for the CfD dashboard
//!
//! `ProjectRecord` is one CfD award as listed in the allocation round results.
//! `DerivedMetrics` are computed from it by the pipeline and never stored.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Hours in a (non-leap) year, used to turn MW into MWh/year
pub const HOURS_PER_YEAR: f64 = 8760.0;

/// CfD allocation round
///
/// Ordering follows the auction chronology, so `BTreeMap<AllocationRound, _>`
/// and sorted vectors come out AR1..AR6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AllocationRound {
    #[serde(rename = "AR1")]
    Ar1,
    #[serde(rename = "AR2")]
    Ar2,
    #[serde(rename = "AR3")]
    Ar3,
    #[serde(rename = "AR4")]
    Ar4,
    #[serde(rename = "AR5")]
    Ar5,
    #[serde(rename = "AR6")]
    Ar6,
}

impl AllocationRound {
    /// Canonical round order used by the per-round aggregation
    pub const ALL: [AllocationRound; 6] = [
        AllocationRound::Ar1,
        AllocationRound::Ar2,
        AllocationRound::Ar3,
        AllocationRound::Ar4,
        AllocationRound::Ar5,
        AllocationRound::Ar6,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            AllocationRound::Ar1 => "AR1",
            AllocationRound::Ar2 => "AR2",
            AllocationRound::Ar3 => "AR3",
            AllocationRound::Ar4 => "AR4",
            AllocationRound::Ar5 => "AR5",
            AllocationRound::Ar6 => "AR6",
        }
    }
}

impl fmt::Display for AllocationRound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AllocationRound {
    type Err = ValidationError;

    /// Accepts "AR1".."AR6", case-insensitive, surrounding whitespace ignored
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "AR1" => Ok(AllocationRound::Ar1),
            "AR2" => Ok(AllocationRound::Ar2),
            "AR3" => Ok(AllocationRound::Ar3),
            "AR4" => Ok(AllocationRound::Ar4),
            "AR5" => Ok(AllocationRound::Ar5),
            "AR6" => Ok(AllocationRound::Ar6),
            _ => Err(ValidationError::UnknownRound(s.to_string())),
        }
    }
}

/// Display currency for strike prices and revenue
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Gbp,
    Usd,
    Eur,
}

impl Currency {
    pub const ALL: [Currency; 3] = [Currency::Gbp, Currency::Usd, Currency::Eur];

    /// ISO 4217 code
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Gbp => "GBP",
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Gbp => "£",
            Currency::Usd => "$",
            Currency::Eur => "€",
        }
    }

    /// Selector label, e.g. "GBP (£)"
    pub fn display_name(&self) -> String {
        format!("{} ({})", self.code(), self.symbol())
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "GBP" | "£" => Ok(Currency::Gbp),
            "USD" | "$" => Ok(Currency::Usd),
            "EUR" | "€" => Ok(Currency::Eur),
            _ => Err(ValidationError::UnknownCurrency(s.to_string())),
        }
    }
}

/// Price basis for strike prices
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum PriceYear {
    /// Prices as awarded, in 2012 money
    #[default]
    #[serde(rename = "2012")]
    Original2012,
    /// CPI-adjusted to the target reference month
    #[serde(rename = "2025")]
    Adjusted2025,
}

impl PriceYear {
    pub fn year(&self) -> i32 {
        match self {
            PriceYear::Original2012 => 2012,
            PriceYear::Adjusted2025 => 2025,
        }
    }

    /// Selector label, e.g. "2012 (Original)"
    pub fn display_name(&self) -> &'static str {
        match self {
            PriceYear::Original2012 => "2012 (Original)",
            PriceYear::Adjusted2025 => "2025 (Inflation Adjusted)",
        }
    }
}

impl fmt::Display for PriceYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.year())
    }
}

impl FromStr for PriceYear {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "2012" => Ok(PriceYear::Original2012),
            "2025" => Ok(PriceYear::Adjusted2025),
            _ => Err(ValidationError::UnknownPriceYear(s.to_string())),
        }
    }
}

/// One CPI index reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CpiReading {
    /// First day of the reference month
    pub month: NaiveDate,
    pub index: f64,
}

impl CpiReading {
    /// Month label, e.g. "Dec 2012"
    pub fn label(&self) -> String {
        self.month.format("%b %Y").to_string()
    }
}

/// Economic constants for one run
///
/// Built once at startup and passed explicitly into every computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EconomicConstants {
    /// Index the strike prices are quoted against (Dec 2012)
    pub cpi_base: CpiReading,

    /// Index prices are normalized to (May 2025)
    pub cpi_target: CpiReading,

    /// Average offshore wind capacity factor in [0, 1]
    pub capacity_factor: f64,

    /// GBP-relative multipliers: 1 GBP = `rate` units of the currency
    ///
    /// GBP itself is implicit (rate 1.0) and need not be listed.
    pub fx_rates: BTreeMap<Currency, f64>,
}

impl EconomicConstants {
    /// Ratio applied to move a 2012 price to the target month
    pub fn cpi_ratio(&self) -> f64 {
        self.cpi_target.index / self.cpi_base.index
    }

    /// Multiplier from GBP into `currency`
    pub fn fx_rate(&self, currency: Currency) -> Result<f64, ValidationError> {
        match currency {
            Currency::Gbp => Ok(self.fx_rates.get(&Currency::Gbp).copied().unwrap_or(1.0)),
            other => self
                .fx_rates
                .get(&other)
                .copied()
                .ok_or_else(|| ValidationError::MissingFxRate(other.code().to_string())),
        }
    }

    /// GBP plus every configured currency, in `Currency` order
    pub fn currencies(&self) -> Vec<Currency> {
        let mut currencies: Vec<Currency> = self.fx_rates.keys().copied().collect();
        if !currencies.contains(&Currency::Gbp) {
            currencies.push(Currency::Gbp);
        }
        currencies.sort();
        currencies
    }
}

/// One CfD award
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub allocation_round: AllocationRound,

    /// Not unique: phased projects share a name stem
    pub project_name: String,

    /// Strike price in £/MWh, 2012 prices
    ///
    /// None for placeholder rounds with no offshore wind bids
    pub strike_price_2012_gbp: Option<f64>,

    /// Contracted capacity in MW (0 for placeholder rows)
    pub capacity_mw: f64,

    /// Target delivery year, e.g. "2018/19"
    pub delivery_year: Option<String>,

    /// Never published in the CfD results; kept for completeness
    pub number_of_turbines: Option<u32>,
}

impl ProjectRecord {
    pub fn has_strike_price(&self) -> bool {
        self.strike_price_2012_gbp.is_some()
    }
}

/// Price and revenue figures in one currency
///
/// Every field is None when the project has no strike price.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrencyMetrics {
    /// Awarded 2012 strike price converted at the fixed rate, per MWh
    pub strike_price_2012: Option<f64>,

    /// CPI-normalized strike price converted at the fixed rate, per MWh
    pub strike_price_2025: Option<f64>,

    /// Annual revenue at the normalized strike price
    pub revenue_2025: Option<f64>,

    /// `revenue_2025` / 1,000,000
    pub revenue_2025_millions: Option<f64>,
}

/// Figures derived from a `ProjectRecord` and the economic constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    /// capacity × capacity factor × 8760
    pub annual_production_mwh: f64,

    pub annual_production_twh: f64,

    pub normalized_strike_price_gbp_2025: Option<f64>,

    /// Production × 2012 strike price
    pub annual_revenue_gbp_2012: Option<f64>,

    /// Production × normalized strike price
    pub annual_revenue_gbp_2025: Option<f64>,

    /// Always holds GBP plus every currency in the constants' fx table
    pub by_currency: BTreeMap<Currency, CurrencyMetrics>,
}

impl DerivedMetrics {
    pub fn currency(&self, currency: Currency) -> Option<&CurrencyMetrics> {
        self.by_currency.get(&currency)
    }
}

/// A project record paired with its derived metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedRecord {
    pub project: ProjectRecord,
    pub metrics: DerivedMetrics,
}

/// Per allocation round aggregate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub round: AllocationRound,

    /// All records in the round, priced or not
    pub project_count: usize,

    /// Records that contributed to `mean_strike_price`
    pub priced_project_count: usize,

    /// Sum over ALL records in the round
    pub total_capacity_mw: f64,

    /// Mean over records with a present price; None when there are none
    pub mean_strike_price: Option<f64>,
}
