//! Reference dataset and economic constants
//!
//! Offshore wind awards from CfD Allocation Rounds 1-6, with explicit
//! zero-capacity placeholder rows for AR4 (no offshore wind projects listed)
//! and AR5 (no offshore wind bids submitted).

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::csv_parser::parse_projects_csv;
use crate::error::{CfdError, ValidationError};
use crate::pipeline::compute_metrics;
use crate::types::{CpiReading, Currency, EconomicConstants, EnrichedRecord, ProjectRecord};

/// Embedded project table
pub const REFERENCE_CSV: &str = include_str!("../data/cfd_projects.csv");

/// CPI index, December 2012
pub const CPI_DEC_2012: f64 = 97.6;

/// CPI index, May 2025
pub const CPI_MAY_2025: f64 = 138.4;

/// Average UK offshore wind capacity factor
pub const CAPACITY_FACTOR: f64 = 0.422;

/// Assumed exchange rate, 1 GBP in USD
pub const GBP_TO_USD: f64 = 1.25;

/// Assumed exchange rate, 1 GBP in EUR
pub const GBP_TO_EUR: f64 = 1.18;

/// First day of a reference month, checked at compile time
const fn month_start(year: i32, month: u32) -> NaiveDate {
    match NaiveDate::from_ymd_opt(year, month, 1) {
        Some(date) => date,
        None => panic!("invalid reference month"),
    }
}

/// Reference month of the base CPI reading
pub const CPI_BASE_MONTH: NaiveDate = month_start(2012, 12);

/// Reference month of the target CPI reading
pub const CPI_TARGET_MONTH: NaiveDate = month_start(2025, 5);

/// The fixed constants every run uses
pub fn default_constants() -> EconomicConstants {
    EconomicConstants {
        cpi_base: CpiReading {
            month: CPI_BASE_MONTH,
            index: CPI_DEC_2012,
        },
        cpi_target: CpiReading {
            month: CPI_TARGET_MONTH,
            index: CPI_MAY_2025,
        },
        capacity_factor: CAPACITY_FACTOR,
        fx_rates: BTreeMap::from([(Currency::Usd, GBP_TO_USD), (Currency::Eur, GBP_TO_EUR)]),
    }
}

/// Parse the embedded project table
pub fn reference_projects() -> Result<Vec<ProjectRecord>, ValidationError> {
    parse_projects_csv(REFERENCE_CSV)
}

/// Parse a project table and compute its enriched metrics in one step
pub fn load_table(
    csv_content: &str,
    constants: &EconomicConstants,
) -> Result<Vec<EnrichedRecord>, CfdError> {
    let projects = parse_projects_csv(csv_content)?;
    Ok(compute_metrics(&projects, constants)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{project_chart_rows, summarize_rounds, validate_constants};
    use crate::types::AllocationRound;

    #[test]
    fn test_reference_projects_parse() {
        let projects = reference_projects().unwrap();
        assert_eq!(projects.len(), 22);
        assert!(projects.iter().all(|p| p.number_of_turbines.is_none()));
    }

    #[test]
    fn test_placeholder_rounds_have_no_price_and_no_capacity() {
        let projects = reference_projects().unwrap();
        for round in [AllocationRound::Ar4, AllocationRound::Ar5] {
            let rows: Vec<&ProjectRecord> = projects
                .iter()
                .filter(|p| p.allocation_round == round)
                .collect();
            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0].strike_price_2012_gbp, None);
            assert_eq!(rows[0].capacity_mw, 0.0);
        }
    }

    #[test]
    fn test_default_constants_are_valid() {
        let constants = default_constants();
        assert!(validate_constants(&constants).is_ok());
        assert_eq!(constants.cpi_base.label(), "Dec 2012");
        assert_eq!(constants.cpi_target.label(), "May 2025");
    }

    #[test]
    fn test_cpi_reference_months() {
        assert_eq!(CPI_BASE_MONTH, NaiveDate::from_ymd_opt(2012, 12, 1).unwrap());
        assert_eq!(CPI_TARGET_MONTH, NaiveDate::from_ymd_opt(2025, 5, 1).unwrap());
        assert!(CPI_BASE_MONTH < CPI_TARGET_MONTH);
    }

    #[test]
    fn test_reference_table_round_totals() {
        let projects = reference_projects().unwrap();
        let table = compute_metrics(&projects, &default_constants()).unwrap();
        let rounds = summarize_rounds(&table);

        assert_eq!(rounds[0].total_capacity_mw, 448.0 + 714.0);
        assert_eq!(rounds[2].project_count, 5);
        assert_eq!(rounds[3].total_capacity_mw, 0.0);
        assert_eq!(rounds[3].mean_strike_price, None);
        assert_eq!(rounds[4].mean_strike_price, None);
        assert_eq!(rounds[5].project_count, 10);

        // Capacity sum matches a direct sum per round
        for summary in &rounds {
            let direct: f64 = projects
                .iter()
                .filter(|p| p.allocation_round == summary.round)
                .map(|p| p.capacity_mw)
                .sum();
            assert!((summary.total_capacity_mw - direct).abs() < 1e-9);
        }

        assert_eq!(project_chart_rows(&table).len(), 20);
    }

    #[test]
    fn test_load_table_reports_validation_errors() {
        let table = load_table(REFERENCE_CSV, &default_constants()).unwrap();
        assert_eq!(table.len(), 22);

        let bad = "allocation_round,project_name,strike_price_2012_gbp,capacity_mw\nAR9,X,1,1";
        match load_table(bad, &default_constants()) {
            Err(CfdError::Validation(ValidationError::UnknownRound(round))) => {
                assert_eq!(round, "AR9")
            }
            other => panic!("Expected UnknownRound, got {:?}", other),
        }
    }
}
