//! Metrics pipeline
//!
//! Turns the project records and economic constants into the enriched table
//! every chart reads from, and aggregates it per allocation round.
//!
//! # Semantics of missing strike prices
//!
//! A record without a strike price still gets production figures (they depend
//! on capacity only), but every price and revenue field stays `None`.
//! Aggregations skip `None` when averaging prices and never treat it as zero.
//!
//! # Example
//!
//! ```rust
//! use uk_cfd_dashboard::dataset::{default_constants, reference_projects};
//! use uk_cfd_dashboard::pipeline::{compute_metrics, summarize_rounds};
//!
//! let projects = reference_projects().unwrap();
//! let table = compute_metrics(&projects, &default_constants()).unwrap();
//! assert_eq!(table.len(), projects.len());
//!
//! let rounds = summarize_rounds(&table);
//! assert_eq!(rounds.len(), 6); // AR1..AR6, even without projects
//! ```

use std::collections::BTreeMap;

use tracing::debug;

use crate::column_selector::StrikePriceField;
use crate::error::ValidationError;
use crate::transformations::{
    annual_production_mwh, convert_currency, inflate_to_target, mean, mwh_to_twh, to_millions,
};
use crate::types::{
    AllocationRound, Currency, CurrencyMetrics, DerivedMetrics, EconomicConstants,
    EnrichedRecord, ProjectRecord, RoundSummary,
};

// ============================================================================
// Validation
// ============================================================================

/// Check the economic constants before any record is processed
///
/// # Returns
///
/// * `Err(ValidationError::InvalidCpi)` - CPI index not finite or not > 0
/// * `Err(ValidationError::InvalidCapacityFactor)` - outside [0, 1]
/// * `Err(ValidationError::InvalidFxRate)` - rate not finite or not > 0
pub fn validate_constants(constants: &EconomicConstants) -> Result<(), ValidationError> {
    for reading in [&constants.cpi_base, &constants.cpi_target] {
        if !reading.index.is_finite() || reading.index <= 0.0 {
            return Err(ValidationError::InvalidCpi {
                label: reading.label(),
                index: reading.index,
            });
        }
    }

    let cf = constants.capacity_factor;
    if !cf.is_finite() || !(0.0..=1.0).contains(&cf) {
        return Err(ValidationError::InvalidCapacityFactor(cf));
    }

    for (currency, rate) in &constants.fx_rates {
        if !rate.is_finite() || *rate <= 0.0 {
            return Err(ValidationError::InvalidFxRate {
                currency: currency.code().to_string(),
                rate: *rate,
            });
        }
    }

    Ok(())
}

/// Check one project record
///
/// Capacity must be finite and >= 0. Zero is valid (placeholder rounds).
pub fn validate_record(record: &ProjectRecord) -> Result<(), ValidationError> {
    if !record.capacity_mw.is_finite() {
        return Err(ValidationError::InvalidDecimal(record.capacity_mw.to_string()));
    }
    if record.capacity_mw < 0.0 {
        return Err(ValidationError::NegativeCapacity {
            project: record.project_name.clone(),
            capacity_mw: record.capacity_mw,
        });
    }
    if let Some(price) = record.strike_price_2012_gbp {
        if !price.is_finite() {
            return Err(ValidationError::InvalidDecimal(price.to_string()));
        }
    }
    Ok(())
}

// ============================================================================
// Derivation
// ============================================================================

/// Derive the metrics of a single record
///
/// Assumes `constants` already passed [`validate_constants`].
pub fn derive_metrics(
    record: &ProjectRecord,
    constants: &EconomicConstants,
) -> Result<DerivedMetrics, ValidationError> {
    validate_record(record)?;

    let production_mwh = annual_production_mwh(record.capacity_mw, constants.capacity_factor);
    let strike_2012 = record.strike_price_2012_gbp;
    let strike_2025 = strike_2012.map(|p| inflate_to_target(p, constants));
    let revenue_2012 = strike_2012.map(|p| production_mwh * p);
    let revenue_2025 = strike_2025.map(|p| production_mwh * p);

    let mut by_currency = BTreeMap::new();
    for currency in constants.currencies() {
        let rate = constants.fx_rate(currency)?;
        let revenue = revenue_2025.map(|r| convert_currency(r, rate));
        by_currency.insert(
            currency,
            CurrencyMetrics {
                strike_price_2012: strike_2012.map(|p| convert_currency(p, rate)),
                strike_price_2025: strike_2025.map(|p| convert_currency(p, rate)),
                revenue_2025: revenue,
                revenue_2025_millions: revenue.map(to_millions),
            },
        );
    }

    Ok(DerivedMetrics {
        annual_production_mwh: production_mwh,
        annual_production_twh: mwh_to_twh(production_mwh),
        normalized_strike_price_gbp_2025: strike_2025,
        annual_revenue_gbp_2012: revenue_2012,
        annual_revenue_gbp_2025: revenue_2025,
        by_currency,
    })
}

/// Build the enriched table
///
/// Output has the same length and order as `records`. An empty input yields an
/// empty table. The first invalid record rejects the whole dataset.
///
/// # Errors
///
/// * `ValidationError` for invalid constants or any invalid record
pub fn compute_metrics(
    records: &[ProjectRecord],
    constants: &EconomicConstants,
) -> Result<Vec<EnrichedRecord>, ValidationError> {
    validate_constants(constants)?;

    let table = records
        .iter()
        .map(|project| {
            derive_metrics(project, constants).map(|metrics| EnrichedRecord {
                project: project.clone(),
                metrics,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    debug!(
        records = table.len(),
        priced = table.iter().filter(|r| r.project.has_strike_price()).count(),
        cpi_ratio = constants.cpi_ratio(),
        "computed CfD metrics"
    );

    Ok(table)
}

// ============================================================================
// Aggregation
// ============================================================================

/// Per-round aggregate over the normalized GBP strike price
pub fn summarize_rounds(records: &[EnrichedRecord]) -> Vec<RoundSummary> {
    summarize_rounds_by(records, StrikePriceField::Normalized2025(Currency::Gbp))
}

/// Per-round aggregate over any strike price column
///
/// Always returns one entry per round in AR1..AR6 order. Capacity is summed
/// over every record of the round; the mean covers only records with a
/// present price and is `None` when there are none.
pub fn summarize_rounds_by(
    records: &[EnrichedRecord],
    field: StrikePriceField,
) -> Vec<RoundSummary> {
    AllocationRound::ALL
        .iter()
        .map(|&round| {
            let in_round: Vec<&EnrichedRecord> = records
                .iter()
                .filter(|r| r.project.allocation_round == round)
                .collect();

            let prices: Vec<f64> = in_round.iter().filter_map(|r| field.value(r)).collect();

            RoundSummary {
                round,
                project_count: in_round.len(),
                priced_project_count: prices.len(),
                total_capacity_mw: in_round.iter().map(|r| r.project.capacity_mw).sum(),
                mean_strike_price: mean(prices),
            }
        })
        .collect()
}

/// Rows shown in the per-project charts
///
/// Keeps records with capacity > 0, which drops the AR4/AR5 placeholder rows.
pub fn project_chart_rows(records: &[EnrichedRecord]) -> Vec<&EnrichedRecord> {
    records
        .iter()
        .filter(|r| r.project.capacity_mw > 0.0)
        .collect()
}
